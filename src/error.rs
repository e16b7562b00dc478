//! Session store error types

use std::fmt;

/// Errors that can occur during session store operations
#[derive(Debug)]
pub enum SessionError {
    /// Error from the document store
    StoreError(String),
    /// Error during serialization/deserialization
    SerializationError(String),
    /// Write rejected because the supplied revision is stale or missing
    Conflict(String),
    /// Document not found
    NotFound,
    /// Store connection could not be established at construction time
    Unavailable(String),
    /// HTTP transport error (when http-client feature is enabled)
    #[cfg(feature = "http-client")]
    HttpError(reqwest::Error),
}

impl SessionError {
    /// Whether this error means the document does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(self, SessionError::NotFound)
    }

    /// Whether this error is a revision conflict
    pub fn is_conflict(&self) -> bool {
        matches!(self, SessionError::Conflict(_))
    }
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::StoreError(msg) => write!(f, "Document store error: {}", msg),
            SessionError::SerializationError(msg) => write!(f, "Serialization error: {}", msg),
            SessionError::Conflict(msg) => write!(f, "Revision conflict: {}", msg),
            SessionError::NotFound => write!(f, "Document not found"),
            SessionError::Unavailable(msg) => write!(f, "Store unavailable: {}", msg),
            #[cfg(feature = "http-client")]
            SessionError::HttpError(e) => write!(f, "HTTP error: {}", e),
        }
    }
}

impl std::error::Error for SessionError {}

#[cfg(feature = "http-client")]
impl From<reqwest::Error> for SessionError {
    fn from(err: reqwest::Error) -> Self {
        SessionError::HttpError(err)
    }
}

impl From<serde_json::Error> for SessionError {
    fn from(err: serde_json::Error) -> Self {
        SessionError::SerializationError(err.to_string())
    }
}
