//! Durable object storage for the wardrobe backend
//!
//! Image bytes (profile photos, garment photos, synthesis results) live in
//! an external object store reached over HTTP. This crate defines the
//! collaborator interface, the reqwest-backed implementation, and the
//! base64 payload transcoder shared by the try-on and profile-upload paths.

pub mod codec;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, StatusCode};
use thiserror::Error;
use uuid::Uuid;

/// Result type
pub type Result<T> = std::result::Result<T, StorageError>;

/// Error type
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("object not found: {0}")]
    NotFound(String),

    #[error("storage API error ({status}): {body}")]
    Api { status: StatusCode, body: String },

    #[error("network error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("invalid image encoding: {0}")]
    InvalidEncoding(#[from] base64::DecodeError),
}

/// Durable storage collaborator.
///
/// References returned by [`put`](ObjectStore::put) are opaque URLs; callers
/// persist them on records and hand them back to [`get`](ObjectStore::get).
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store a payload and return a durable reference to it.
    async fn put(&self, bytes: Bytes, content_type: &str) -> Result<String>;

    /// Fetch the payload behind a reference.
    async fn get(&self, reference: &str) -> Result<Bytes>;
}

/// HTTP object store client.
pub struct HttpObjectStore {
    base_url: String,
    api_key: String,
    http_client: Client,
}

impl HttpObjectStore {
    pub fn new(base_url: &str, api_key: &str, http_client: Client) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            http_client,
        }
    }

    fn object_url(&self, key: &str) -> String {
        format!("{}/objects/{}", self.base_url, key)
    }
}

#[async_trait]
impl ObjectStore for HttpObjectStore {
    /// Upload under a fresh uuid key; the returned reference doubles as the
    /// object's public URL.
    async fn put(&self, bytes: Bytes, content_type: &str) -> Result<String> {
        let key = Uuid::new_v4().to_string();
        let url = self.object_url(&key);

        let part = Part::bytes(bytes.to_vec())
            .file_name(key.clone())
            .mime_str(content_type)?;
        let form = Form::new().part("file", part);

        let response = self
            .http_client
            .post(&url)
            .header("apikey", &self.api_key)
            .header("Authorization", format!("Bearer {}", &self.api_key))
            .multipart(form)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await?;
            return Err(StorageError::Api { status, body });
        }

        log::debug!("stored object {}", key);
        Ok(url)
    }

    async fn get(&self, reference: &str) -> Result<Bytes> {
        let response = self
            .http_client
            .get(reference)
            .header("apikey", &self.api_key)
            .header("Authorization", format!("Bearer {}", &self.api_key))
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(StorageError::NotFound(reference.to_string()));
        }
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await?;
            return Err(StorageError::Api { status, body });
        }

        let bytes = response.bytes().await?;
        Ok(bytes)
    }
}
