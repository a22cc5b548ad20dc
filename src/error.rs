//! Error handling for the wardrobe client

use thiserror::Error;

/// Unified error type wrapping every subsystem error.
#[derive(Error, Debug)]
pub enum WardrobeError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("garment error: {0}")]
    Garment(#[from] wardrobe_rust_garments::GarmentError),

    #[error("identity error: {0}")]
    Identity(#[from] wardrobe_rust_identity::IdentityError),

    #[error("sharing error: {0}")]
    Sharing(#[from] wardrobe_rust_sharing::SharingError),

    #[error("storage error: {0}")]
    Storage(#[from] wardrobe_rust_storage::StorageError),

    #[error("synthesis error: {0}")]
    Synthesis(#[from] wardrobe_rust_synthesis::SynthesisError),

    #[error("try-on error: {0}")]
    TryOn(#[from] wardrobe_rust_tryon::TryOnError),

    #[error("network request error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),
}

/// Result type
pub type Result<T> = std::result::Result<T, WardrobeError>;
