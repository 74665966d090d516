use std::fmt;

/// Result type for bgplens-backends operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur in the backend layer
#[derive(Debug)]
pub enum Error {
    /// The backend could not be brought up (missing or rejected option,
    /// unreachable archive, unreadable index). Fatal for the session.
    Init(String),

    /// The backend failed while fetching data after a successful start
    Source(String),

    /// IO operation failed
    Io(std::io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Init(msg) => write!(f, "Could not initialize data interface: {}", msg),
            Error::Source(msg) => write!(f, "Data source error: {}", msg),
            Error::Io(err) => write!(f, "IO error: {}", err),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            Error::Init(_) | Error::Source(_) => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}
