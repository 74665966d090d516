use std::path::PathBuf;
use std::time::Duration;

use bgplens_types::{DumpType, Record};

use crate::cancel::CancelToken;
use crate::error::Result;

/// Provenance metadata for one source dump file, independent of how the
/// catalog discovered it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DumpMeta {
    pub path: PathBuf,
    pub project: String,
    pub collector: String,
    pub dump_type: DumpType,
    /// When the dump file was produced, epoch seconds
    pub dump_time: u32,
}

/// A source of dump-file metadata: a directory scan, a CSV index, anything
/// that can be re-enumerated to discover freshly arrived dumps.
///
/// Enumeration must be repeatable; the caller tracks which paths it has
/// already consumed.
pub trait DumpCatalog: Send {
    fn enumerate(&mut self) -> Result<Vec<DumpMeta>>;
}

/// Pull contract between the session and a data backend.
pub trait DataBackend: Send {
    /// Produce the next record, or `Ok(None)` when all currently known
    /// data is exhausted. Must never suspend.
    fn next_record(&mut self) -> Result<Option<Record>>;

    /// Wait up to `budget` for new data to appear, returning `Ok(true)` if
    /// a subsequent `next_record` may yield something. Must poll the token
    /// and return promptly once it is cancelled.
    fn await_new_data(&mut self, token: &CancelToken, budget: Duration) -> Result<bool>;
}
