//! Virtual try-on pipeline
//!
//! One request walks Validating, FetchingInputs, Invoking, Decoding and
//! Persisting in order, with a typed terminal failure reachable from every
//! stage. Each request is an independent unit of work: nothing is retried,
//! no partial result is returned, and a failed stage leaves no artifact
//! behind beyond what already completed.

use std::fmt;
use std::sync::Arc;

use bytes::Bytes;
use thiserror::Error;
use uuid::Uuid;

use wardrobe_rust_garments::{BodyRegion, GarmentError, GarmentStore};
use wardrobe_rust_identity::UserProfile;
use wardrobe_rust_storage::{codec, ObjectStore, StorageError};
use wardrobe_rust_synthesis::{SynthesisClient, SynthesisError, SynthesisRequest};

/// Result type
pub type Result<T> = std::result::Result<T, TryOnError>;

/// Input the Validating stage found missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingInput {
    ProfileImage,
    Garment,
}

impl fmt::Display for MissingInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ProfileImage => write!(f, "profile image"),
            Self::Garment => write!(f, "garment"),
        }
    }
}

/// Error type
///
/// Each variant names the stage that failed, specific enough for a caller to
/// tell bad input from a third-party failure from a persistence failure.
#[derive(Error, Debug)]
pub enum TryOnError {
    #[error("missing input: {0}")]
    MissingInput(MissingInput),

    #[error(transparent)]
    Garment(#[from] GarmentError),

    #[error("failed to fetch pipeline inputs: {0}")]
    InputFetch(StorageError),

    #[error(transparent)]
    Synthesis(#[from] SynthesisError),

    #[error("failed to persist try-on result: {0}")]
    ResultPersist(StorageError),
}

/// Successful pipeline output.
///
/// Besides the stored result, this echoes the category and description that
/// were actually sent to the synthesis service so callers can show what the
/// result was conditioned on.
#[derive(Debug, Clone, PartialEq)]
pub struct TryOnOutcome {
    pub result_url: String,
    pub garment_id: Uuid,
    pub category: BodyRegion,
    pub description: String,
}

/// The try-on orchestrator.
pub struct TryOnPipeline {
    objects: Arc<dyn ObjectStore>,
    garments: Arc<dyn GarmentStore>,
    synthesis: SynthesisClient,
}

impl TryOnPipeline {
    pub fn new(
        objects: Arc<dyn ObjectStore>,
        garments: Arc<dyn GarmentStore>,
        synthesis: SynthesisClient,
    ) -> Self {
        Self {
            objects,
            garments,
            synthesis,
        }
    }

    /// Run one try-on request to completion.
    pub async fn run(&self, requester: &UserProfile, garment_id: Uuid) -> Result<TryOnOutcome> {
        // Validating: both inputs must resolve before any side effect.
        let profile_image_url = requester
            .profile_image_url
            .as_deref()
            .ok_or(TryOnError::MissingInput(MissingInput::ProfileImage))?;
        let garment = self
            .garments
            .find_by_id(garment_id)
            .await?
            .ok_or(TryOnError::MissingInput(MissingInput::Garment))?;
        let profile = garment.try_on_profile()?;
        log::info!(
            "try-on: user {} garment {} category {}",
            requester.username,
            garment.id,
            profile.category.as_str()
        );

        // FetchingInputs: the two fetches are independent; run them
        // concurrently, but both must land before the service is invoked.
        let (human_image, garment_image) = tokio::try_join!(
            self.objects.get(profile_image_url),
            self.objects.get(&garment.image_url),
        )
        .map_err(TryOnError::InputFetch)?;

        // Invoking + Decoding: the client enforces the bounded timeout and
        // rejects a response without an embedded result image.
        let synthesized = self
            .synthesis
            .try_on(SynthesisRequest {
                human_image,
                garment_image,
                garment_description: profile.description.clone(),
                category: profile.category.as_str().to_string(),
            })
            .await?;

        // Persisting
        let result_bytes =
            codec::decode_image(&synthesized.result_image).map_err(TryOnError::ResultPersist)?;
        let result_url = self
            .objects
            .put(Bytes::from(result_bytes), "image/png")
            .await
            .map_err(TryOnError::ResultPersist)?;
        log::info!("try-on done: result stored at {}", result_url);

        Ok(TryOnOutcome {
            result_url,
            garment_id: garment.id,
            category: profile.category,
            description: profile.description,
        })
    }
}
