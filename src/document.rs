//! Persisted document shape and the document-store client contract
//!
//! A session is stored as one flat document: CouchDB bookkeeping fields
//! (`_id`, `_rev`), the store's own `ttl`/`expires` fields, and the
//! session body flattened at the top level. `_rev` is the revision token
//! CouchDB assigns on every successful write; it must accompany every
//! subsequent update or delete of the same document.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::SessionError;
use crate::session::SessionData;

/// One session record as stored in the database
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionDocument {
    /// Document key: `prefix + session_id`
    #[serde(rename = "_id")]
    pub id: String,

    /// Revision token from the last successful write; `None` on a
    /// fresh insert and omitted from the serialized document
    #[serde(rename = "_rev", skip_serializing_if = "Option::is_none")]
    pub rev: Option<String>,

    /// Time-to-live in seconds at the time of the last write
    pub ttl: u64,

    /// Absolute expiry computed from `ttl` at write time
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires: Option<DateTime<Utc>>,

    /// The session body, flattened into the document
    #[serde(flatten)]
    pub session: SessionData,
}

impl SessionDocument {
    /// Build a fresh document (no revision) for the given key and body
    pub fn new(id: String, session: SessionData, ttl: u64) -> Self {
        Self {
            id,
            rev: None,
            ttl,
            expires: Some(Utc::now() + chrono::Duration::seconds(ttl as i64)),
            session,
        }
    }

    /// Overwrite the ttl and recompute the absolute expiry
    pub fn refresh_ttl(&mut self, ttl: u64) {
        self.ttl = ttl;
        self.expires = Some(Utc::now() + chrono::Duration::seconds(ttl as i64));
    }

    /// Whether the record's expiry has passed at the given instant
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        match self.expires {
            Some(expires) => now >= expires,
            None => false,
        }
    }
}

/// Result of fetching a document by key
#[derive(Debug, Clone)]
pub enum Fetch {
    /// The document exists; `document.rev` carries its current revision
    Found(SessionDocument),
    /// No document under that key
    NotFound,
}

impl Fetch {
    /// The fetched document, if any
    pub fn into_document(self) -> Option<SessionDocument> {
        match self {
            Fetch::Found(document) => Some(document),
            Fetch::NotFound => None,
        }
    }
}

/// Write acknowledgment from the store
#[derive(Debug, Clone, Deserialize)]
pub struct WriteAck {
    /// Document key the write landed on
    pub id: String,
    /// Revision assigned to this version of the document
    pub rev: String,
}

/// Client for a CouchDB/Cloudant-style document store.
///
/// The store applies optimistic concurrency control: an upsert of an
/// existing document must carry the document's current revision or it
/// is rejected with [`SessionError::Conflict`]; a delete must name the
/// revision it deletes.
#[async_trait]
pub trait DocumentClient: Send + Sync + 'static {
    /// Fetch a document by key.
    ///
    /// A missing key is [`Fetch::NotFound`], not an error.
    async fn fetch(&self, key: &str) -> Result<Fetch, SessionError>;

    /// Insert or update a document.
    ///
    /// Inserts when `document.rev` is `None`; updates when it names the
    /// current revision. A stale or missing revision on an existing
    /// document yields [`SessionError::Conflict`].
    async fn upsert(&self, document: &SessionDocument) -> Result<WriteAck, SessionError>;

    /// Delete the document at `key`, conditioned on `rev`.
    async fn delete(&self, key: &str, rev: &str) -> Result<(), SessionError>;
}
