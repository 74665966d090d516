use std::fmt;

/// Result type for bgplens-stream operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur in the session layer
#[derive(Debug)]
pub enum Error {
    /// Backend layer error
    Backend(bgplens_backends::Error),

    /// A session cannot start without at least one time window
    NoWindow,

    /// An option handle resolved for one data interface was applied while
    /// another was active
    OptionMismatch {
        expected: &'static str,
        got: &'static str,
    },

    /// Operation attempted in the wrong lifecycle state
    InvalidState {
        operation: &'static str,
        state: &'static str,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Backend(err) => write!(f, "{}", err),
            Error::NoWindow => {
                write!(f, "At least one time window must be specified using -w")
            }
            Error::OptionMismatch { expected, got } => write!(
                f,
                "Option belongs to data interface '{}' but '{}' is active",
                expected, got
            ),
            Error::InvalidState { operation, state } => {
                write!(f, "Cannot {} while the session is {}", operation, state)
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Backend(err) => Some(err),
            _ => None,
        }
    }
}

impl From<bgplens_backends::Error> for Error {
    fn from(err: bgplens_backends::Error) -> Self {
        Error::Backend(err)
    }
}
