pub mod archive;
pub mod cancel;
pub mod csvfile;
pub mod dumpfile;
pub mod error;
pub mod registry;
pub mod textdump;
pub mod traits;

pub use archive::ArchiveBackend;
pub use cancel::CancelToken;
pub use csvfile::CsvCatalog;
pub use error::{Error, Result};
pub use registry::{
    BackendId, BackendMetadata, OptionHandle, OptionSpec, all_backends, backend_by_name,
    create_backend, default_backend, metadata, option_by_name, options_for,
};
pub use textdump::TextdumpCatalog;
pub use traits::{DataBackend, DumpCatalog, DumpMeta};
