use std::error::Error;
use std::fmt;
use std::io;

/// Error types for library collaborator operations
#[derive(Debug)]
pub enum LibraryError {
    Io(io::Error),
    Parse(String),
    Missing(String),
}

impl fmt::Display for LibraryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LibraryError::Io(e) => write!(f, "I/O error: {}", e),
            LibraryError::Parse(msg) => write!(f, "Parse error: {}", msg),
            LibraryError::Missing(id) => write!(f, "Missing entry: {}", id),
        }
    }
}

impl Error for LibraryError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            LibraryError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for LibraryError {
    fn from(err: io::Error) -> Self {
        LibraryError::Io(err)
    }
}

impl From<serde_json::Error> for LibraryError {
    fn from(err: serde_json::Error) -> Self {
        LibraryError::Parse(err.to_string())
    }
}
