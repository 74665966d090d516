use std::fmt;

/// Result type for bgplens-types operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur in the types layer
#[derive(Debug)]
pub enum Error {
    /// An element token could not be parsed
    MalformedElem(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::MalformedElem(token) => write!(f, "Malformed element: {}", token),
        }
    }
}

impl std::error::Error for Error {}
