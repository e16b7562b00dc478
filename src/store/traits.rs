//! Session store trait

use async_trait::async_trait;

use crate::document::WriteAck;
use crate::error::SessionError;
use crate::session::SessionData;

/// Trait for session storage backends
///
/// This trait mirrors the express-session store interface.
/// Implementations store session bodies under the key
/// `prefix + session_id`.
#[async_trait]
pub trait SessionStore: Send + Sync + 'static {
    /// Get a session by ID
    ///
    /// Returns `None` if the session doesn't exist or has expired
    async fn get(&self, sid: &str) -> Result<Option<SessionData>, SessionError>;

    /// Insert or update a session
    ///
    /// The TTL is derived from the session cookie's max age, falling
    /// back to the store's configured default. Returns the store's
    /// write acknowledgment (document id and new revision).
    async fn set(&self, sid: &str, session: &SessionData) -> Result<WriteAck, SessionError>;

    /// Destroy/delete a session
    ///
    /// Destroying a session that doesn't exist is a no-op, not an error
    async fn destroy(&self, sid: &str) -> Result<(), SessionError>;

    /// Touch a session - refresh its TTL without modifying stored data
    ///
    /// Called when the session is accessed but not modified. Touching a
    /// missing session is a no-op.
    async fn touch(&self, sid: &str, session: &SessionData) -> Result<(), SessionError>;

    /// Clear all sessions (optional)
    async fn clear(&self) -> Result<(), SessionError> {
        Err(SessionError::StoreError("clear not implemented".to_string()))
    }

    /// Get the count of all sessions (optional)
    async fn length(&self) -> Result<usize, SessionError> {
        Err(SessionError::StoreError("length not implemented".to_string()))
    }

    /// Get all session IDs (optional)
    async fn ids(&self) -> Result<Vec<String>, SessionError> {
        Err(SessionError::StoreError("ids not implemented".to_string()))
    }

    /// Get all sessions (optional)
    async fn all(&self) -> Result<Vec<SessionData>, SessionError> {
        Err(SessionError::StoreError("all not implemented".to_string()))
    }
}
