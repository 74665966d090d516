pub mod error;
pub mod session;

pub use bgplens_backends::CancelToken;
pub use error::{Error, Result};
pub use session::Session;
