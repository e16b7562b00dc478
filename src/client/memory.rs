//! In-memory document store
//!
//! Implements the same revision discipline as CouchDB: every write
//! bumps a `"{generation}-{token}"` revision, updates and deletes must
//! name the current revision, and a stale revision is a conflict.
//! Primarily for development and testing.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::document::{DocumentClient, Fetch, SessionDocument, WriteAck};
use crate::error::SessionError;

/// In-memory revisioned document store
///
/// Warning: not suitable for production use. Documents are lost on
/// restart and not shared across processes; it exists so the session
/// store's read-modify-write sequencing can be exercised without a
/// running CouchDB.
pub struct MemoryClient {
    documents: Arc<RwLock<HashMap<String, SessionDocument>>>,
    rev_seed: Arc<AtomicU64>,
}

impl MemoryClient {
    /// Create a new empty memory store
    pub fn new() -> Self {
        Self {
            documents: Arc::new(RwLock::new(HashMap::new())),
            rev_seed: Arc::new(AtomicU64::new(1)),
        }
    }

    /// Number of documents currently stored
    pub fn len(&self) -> usize {
        self.documents.read().len()
    }

    /// Whether the store holds no documents
    pub fn is_empty(&self) -> bool {
        self.documents.read().is_empty()
    }

    fn next_rev(&self, generation: u64) -> String {
        let token = self.rev_seed.fetch_add(1, Ordering::Relaxed);
        format!("{}-{:016x}", generation, token.wrapping_mul(0x9e37_79b9_7f4a_7c15))
    }

    fn generation(rev: &str) -> u64 {
        rev.split('-').next().and_then(|g| g.parse().ok()).unwrap_or(0)
    }
}

impl Default for MemoryClient {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for MemoryClient {
    fn clone(&self) -> Self {
        Self {
            documents: Arc::clone(&self.documents),
            rev_seed: Arc::clone(&self.rev_seed),
        }
    }
}

#[async_trait]
impl DocumentClient for MemoryClient {
    async fn fetch(&self, key: &str) -> Result<Fetch, SessionError> {
        match self.documents.read().get(key) {
            Some(document) => Ok(Fetch::Found(document.clone())),
            None => Ok(Fetch::NotFound),
        }
    }

    async fn upsert(&self, document: &SessionDocument) -> Result<WriteAck, SessionError> {
        let mut documents = self.documents.write();

        let new_rev = match documents.get(&document.id) {
            Some(current) => {
                if document.rev != current.rev {
                    return Err(SessionError::Conflict(format!(
                        "document update conflict on {}",
                        document.id
                    )));
                }
                let generation = current.rev.as_deref().map(Self::generation).unwrap_or(0);
                self.next_rev(generation + 1)
            }
            None => {
                if document.rev.is_some() {
                    // A revision naming a document that does not exist
                    // is a conflict in CouchDB, not a fresh insert.
                    return Err(SessionError::Conflict(format!(
                        "document update conflict on {}",
                        document.id
                    )));
                }
                self.next_rev(1)
            }
        };

        let mut stored = document.clone();
        stored.rev = Some(new_rev.clone());
        documents.insert(document.id.clone(), stored);

        Ok(WriteAck {
            id: document.id.clone(),
            rev: new_rev,
        })
    }

    async fn delete(&self, key: &str, rev: &str) -> Result<(), SessionError> {
        let mut documents = self.documents.write();

        match documents.get(key) {
            Some(current) if current.rev.as_deref() == Some(rev) => {
                documents.remove(key);
                Ok(())
            }
            Some(_) => Err(SessionError::Conflict(format!(
                "document update conflict on {}",
                key
            ))),
            None => Err(SessionError::NotFound),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionData;

    fn doc(id: &str) -> SessionDocument {
        SessionDocument::new(id.to_string(), SessionData::with_max_age_ms(2000), 2)
    }

    #[tokio::test]
    async fn insert_assigns_first_generation_rev() {
        let client = MemoryClient::new();
        let ack = client.upsert(&doc("sess:a")).await.unwrap();
        assert_eq!(ack.id, "sess:a");
        assert!(ack.rev.starts_with("1-"));
    }

    #[tokio::test]
    async fn update_requires_current_rev() {
        let client = MemoryClient::new();
        let ack = client.upsert(&doc("sess:a")).await.unwrap();

        // Stale write: no revision attached while the document exists.
        let err = client.upsert(&doc("sess:a")).await.unwrap_err();
        assert!(err.is_conflict());

        let mut update = doc("sess:a");
        update.rev = Some(ack.rev);
        let ack2 = client.upsert(&update).await.unwrap();
        assert!(ack2.rev.starts_with("2-"));
    }

    #[tokio::test]
    async fn insert_with_rev_on_missing_document_conflicts() {
        let client = MemoryClient::new();
        let mut document = doc("sess:a");
        document.rev = Some("1-deadbeef".to_string());
        let err = client.upsert(&document).await.unwrap_err();
        assert!(err.is_conflict());
    }

    #[tokio::test]
    async fn delete_is_conditioned_on_rev() {
        let client = MemoryClient::new();
        let ack = client.upsert(&doc("sess:a")).await.unwrap();

        let err = client.delete("sess:a", "1-bogus").await.unwrap_err();
        assert!(err.is_conflict());

        client.delete("sess:a", &ack.rev).await.unwrap();
        assert!(matches!(
            client.fetch("sess:a").await.unwrap(),
            Fetch::NotFound
        ));

        let err = client.delete("sess:a", &ack.rev).await.unwrap_err();
        assert!(err.is_not_found());
    }
}
