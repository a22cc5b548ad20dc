//! Configuration for the wardrobe client
//!
//! Values are validated at construction time; it is recommended to load
//! them from environment variables or a secure config source.

use std::time::Duration;

use url::Url;

use crate::error::{Result, WardrobeError};

/// Configuration for the wardrobe client.
#[derive(Debug, Clone)]
pub struct WardrobeConfig {
    /// Base URL of the durable object store.
    pub storage_url: Url,
    /// API key presented to the object store.
    pub storage_key: String,
    /// Endpoint of the external try-on synthesis service.
    pub synthesis_url: Url,
    /// Upper bound on the synthesis round trip.
    pub synthesis_timeout: Duration,
}

impl WardrobeConfig {
    /// Creates a new configuration, validating both URLs.
    pub fn new(storage_url: &str, storage_key: String, synthesis_url: &str) -> Result<Self> {
        let storage_url = Url::parse(storage_url).map_err(WardrobeError::UrlParse)?;
        let synthesis_url = Url::parse(synthesis_url).map_err(WardrobeError::UrlParse)?;
        if storage_key.is_empty() {
            return Err(WardrobeError::Config(
                "storage_key cannot be empty".to_string(),
            ));
        }
        Ok(Self {
            storage_url,
            storage_key,
            synthesis_url,
            synthesis_timeout: wardrobe_rust_synthesis::DEFAULT_TIMEOUT,
        })
    }

    /// Override the synthesis timeout.
    pub fn with_synthesis_timeout(mut self, timeout: Duration) -> Self {
        self.synthesis_timeout = timeout;
        self
    }

    /// Attempts to create configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let storage_url = std::env::var("WARDROBE_STORAGE_URL").map_err(|_| {
            WardrobeError::Config("WARDROBE_STORAGE_URL environment variable not found".to_string())
        })?;
        let storage_key = std::env::var("WARDROBE_STORAGE_KEY").map_err(|_| {
            WardrobeError::Config("WARDROBE_STORAGE_KEY environment variable not found".to_string())
        })?;
        let synthesis_url = std::env::var("WARDROBE_SYNTHESIS_URL").map_err(|_| {
            WardrobeError::Config(
                "WARDROBE_SYNTHESIS_URL environment variable not found".to_string(),
            )
        })?;
        Self::new(&storage_url, storage_key, &synthesis_url)
    }
}
