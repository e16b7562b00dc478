//! CouchDB/Cloudant HTTP client
//!
//! Speaks the CouchDB document API: `GET /{db}/{key}` to fetch,
//! `PUT /{db}/{key}` to insert or update (revision carried in the
//! `_rev` body field), `DELETE /{db}/{key}?rev=` to delete. Credentials
//! travel in the connection URL.

use async_trait::async_trait;
use reqwest::StatusCode;

use crate::config::CouchStoreConfig;
use crate::document::{DocumentClient, Fetch, SessionDocument, WriteAck};
use crate::error::SessionError;

/// HTTP client for one CouchDB/Cloudant database
pub struct CouchClient {
    http: reqwest::Client,
    base_url: String,
    database: String,
}

impl CouchClient {
    /// Connect to the database named in `config`.
    ///
    /// Verifies the database exists before returning; a connection or
    /// lookup failure here is [`SessionError::Unavailable`], and the
    /// client must be reconstructed before use.
    pub async fn connect(config: &CouchStoreConfig) -> Result<Self, SessionError> {
        let http = reqwest::Client::builder()
            .connect_timeout(config.connection_timeout_duration())
            .timeout(config.operation_timeout_duration())
            .build()
            .map_err(|e| SessionError::Unavailable(e.to_string()))?;

        let client = Self {
            http,
            base_url: config.url.trim_end_matches('/').to_string(),
            database: config.database_name.clone(),
        };

        let response = client
            .http
            .get(client.database_url())
            .send()
            .await
            .map_err(|e| SessionError::Unavailable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(SessionError::Unavailable(format!(
                "database {} not reachable: {}",
                client.database,
                response.status()
            )));
        }

        Ok(client)
    }

    fn database_url(&self) -> String {
        format!(
            "{}/{}",
            self.base_url,
            urlencoding::encode(&self.database)
        )
    }

    /// Document keys carry the prefix (e.g. "sess:") and must be
    /// percent-encoded in request paths.
    fn document_url(&self, key: &str) -> String {
        format!("{}/{}", self.database_url(), urlencoding::encode(key))
    }

    async fn status_error(response: reqwest::Response) -> SessionError {
        let status = response.status();
        let reason = response.text().await.unwrap_or_default();
        if status == StatusCode::CONFLICT {
            SessionError::Conflict(reason)
        } else if status == StatusCode::NOT_FOUND {
            SessionError::NotFound
        } else {
            SessionError::StoreError(format!("{}: {}", status, reason))
        }
    }
}

#[async_trait]
impl DocumentClient for CouchClient {
    async fn fetch(&self, key: &str) -> Result<Fetch, SessionError> {
        let response = self.http.get(self.document_url(key)).send().await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            Ok(Fetch::NotFound)
        } else if status.is_success() {
            let document: SessionDocument = response.json().await?;
            Ok(Fetch::Found(document))
        } else {
            Err(Self::status_error(response).await)
        }
    }

    async fn upsert(&self, document: &SessionDocument) -> Result<WriteAck, SessionError> {
        let response = self
            .http
            .put(self.document_url(&document.id))
            .json(document)
            .send()
            .await?;

        if response.status().is_success() {
            Ok(response.json::<WriteAck>().await?)
        } else {
            Err(Self::status_error(response).await)
        }
    }

    async fn delete(&self, key: &str, rev: &str) -> Result<(), SessionError> {
        let response = self
            .http
            .delete(self.document_url(key))
            .query(&[("rev", rev)])
            .send()
            .await?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(Self::status_error(response).await)
        }
    }
}
