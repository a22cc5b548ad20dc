//! Client for the external try-on synthesis endpoint
//!
//! The synthesis service composites a garment image onto a human image. Its
//! contract is fixed: a multipart POST carrying both images, a conditioning
//! description and a body-region category, answered by JSON with the result
//! image embedded as base64.
//!
//! Calls are never retried here: the remote service is a paid third-party
//! hop, so retries must be explicit caller decisions.

use std::time::Duration;

use bytes::Bytes;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use thiserror::Error;

/// Upper bound on the synthesis round trip unless the caller overrides it.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Result type
pub type Result<T> = std::result::Result<T, SynthesisError>;

/// Error type
#[derive(Error, Debug)]
pub enum SynthesisError {
    #[error("synthesis request timed out")]
    Timeout,

    #[error("synthesis service returned {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("network error: {0}")]
    Transport(reqwest::Error),

    #[error("malformed synthesis response: {0}")]
    MalformedResponse(String),
}

impl From<reqwest::Error> for SynthesisError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Transport(err)
        }
    }
}

/// One try-on job for the synthesis service.
#[derive(Debug, Clone)]
pub struct SynthesisRequest {
    pub human_image: Bytes,
    pub garment_image: Bytes,
    pub garment_description: String,
    /// `upper_body` or `lower_body`.
    pub category: String,
}

/// Successful synthesis output: the still-encoded result image payload.
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesisResponse {
    pub result_image: String,
}

#[derive(Debug, Deserialize)]
struct TryOnResponseBody {
    result_image: Option<String>,
}

/// Synthesis endpoint client
pub struct SynthesisClient {
    endpoint: String,
    http_client: Client,
    timeout: Duration,
}

impl SynthesisClient {
    /// Create a new synthesis client with the default timeout.
    pub fn new(endpoint: &str, http_client: Client) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            http_client,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Override the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Submit one try-on job.
    ///
    /// Masking is always automatic and cropping always disabled; the service
    /// is sensitive to these flags and the pipeline never varies them.
    pub async fn try_on(&self, request: SynthesisRequest) -> Result<SynthesisResponse> {
        let form = Form::new()
            .part(
                "human_image",
                Part::bytes(request.human_image.to_vec()).file_name("human.jpg"),
            )
            .part(
                "garment_image",
                Part::bytes(request.garment_image.to_vec()).file_name("garment.jpg"),
            )
            .text("garment_description", request.garment_description)
            .text("category", request.category)
            .text("use_auto_mask", "true")
            .text("use_auto_crop", "false");

        log::debug!("invoking synthesis endpoint {}", self.endpoint);
        let response = self
            .http_client
            .post(&self.endpoint)
            .timeout(self.timeout)
            .multipart(form)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await?;
            return Err(SynthesisError::Status { status, body });
        }

        let body = response
            .json::<TryOnResponseBody>()
            .await
            .map_err(|e| SynthesisError::MalformedResponse(e.to_string()))?;

        let result_image = body.result_image.ok_or_else(|| {
            SynthesisError::MalformedResponse("response is missing result_image".to_string())
        })?;

        Ok(SynthesisResponse { result_image })
    }
}
