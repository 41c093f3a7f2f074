use thiserror::Error;

/// Unified error type for document storage and processing operations.
///
/// Each variant represents a category of failure that callers can map to
/// an HTTP status code or a CLI exit message without inspecting strings.
#[derive(Error, Debug)]
pub enum DataDockError {
    /// A named document does not exist in the store
    #[error("File {0} not found")]
    NotFound(String),

    /// The request or document content is malformed
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Creating a document that already exists
    #[error("File {0} already exists")]
    Conflict(String),

    /// A transform operation name the engine does not recognize
    #[error("Unknown operation: {0}")]
    UnsupportedOperation(String),

    /// Data has the wrong JSON shape for the requested operation
    #[error("Type mismatch: {0}")]
    TypeMismatch(String),

    /// Errors related to IO operations
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Conversion from serde_json::Error to DataDockError
impl From<serde_json::Error> for DataDockError {
    fn from(error: serde_json::Error) -> Self {
        DataDockError::InvalidInput(error.to_string())
    }
}

/// Result type alias for operations that can result in a DataDockError
pub type DataDockResult<T> = Result<T, DataDockError>;
