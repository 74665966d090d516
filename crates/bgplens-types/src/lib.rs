pub mod elem;
pub mod error;
pub mod filter;
pub mod record;

pub use elem::{Elem, ElemType};
pub use error::{Error, Result};
pub use filter::{FilterKind, FilterSet, TimeWindow};
pub use record::{DumpPosition, DumpType, ElemCursor, Record, RecordStatus};
