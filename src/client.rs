//! The wardrobe client
//!
//! Wires the subsystem clients and collaborator implementations together
//! and exposes the core operations. Every operation that acts on behalf of
//! a user takes that user's profile explicitly.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;

use bytes::Bytes;
use reqwest::Client as HttpClient;
use uuid::Uuid;

use wardrobe_rust_garments::{group_by_tag, GarmentDraft, GarmentRecord, GarmentStore};
use wardrobe_rust_identity::{IdentityProvider, UserProfile};
use wardrobe_rust_sharing::ShareGraph;
use wardrobe_rust_storage::{codec, HttpObjectStore, ObjectStore};
use wardrobe_rust_synthesis::SynthesisClient;
use wardrobe_rust_tryon::{TryOnOutcome, TryOnPipeline};

use crate::config::WardrobeConfig;
use crate::error::{Result, WardrobeError};

/// Image accompanying a garment ingestion.
pub enum GarmentImage {
    /// Raw bytes, stored before the record is created.
    Bytes(Bytes),
    /// An existing storage reference.
    Reference(String),
}

/// Wires the subsystem clients and manages the shared graph state.
pub struct WardrobeClient {
    objects: Arc<dyn ObjectStore>,
    garments: Arc<dyn GarmentStore>,
    identity: Arc<dyn IdentityProvider>,
    sharing: Arc<ShareGraph>,
    pipeline: TryOnPipeline,
}

impl WardrobeClient {
    /// Creates a new wardrobe client from configuration.
    ///
    /// Garment persistence and identity are external collaborators and must
    /// be supplied; the object store and synthesis clients are built from
    /// the configuration over one shared HTTP client.
    pub fn new(
        config: WardrobeConfig,
        garments: Arc<dyn GarmentStore>,
        identity: Arc<dyn IdentityProvider>,
    ) -> Result<Self> {
        let http_client = HttpClient::builder().build().map_err(WardrobeError::Network)?;

        let objects: Arc<dyn ObjectStore> = Arc::new(HttpObjectStore::new(
            config.storage_url.as_str(),
            &config.storage_key,
            http_client.clone(),
        ));
        let synthesis = SynthesisClient::new(config.synthesis_url.as_str(), http_client)
            .with_timeout(config.synthesis_timeout);
        let pipeline = TryOnPipeline::new(Arc::clone(&objects), Arc::clone(&garments), synthesis);

        log::info!("wardrobe client initialized");
        Ok(Self {
            objects,
            garments,
            identity,
            sharing: Arc::new(ShareGraph::new()),
            pipeline,
        })
    }

    /// Ingest a garment into `owner`'s wardrobe.
    ///
    /// Dispatch and attribute validation run first; a bad payload never
    /// reaches storage or the garment store.
    pub async fn add_garment(
        &self,
        owner: &UserProfile,
        type_token: &str,
        attributes: &HashMap<String, String>,
        image: GarmentImage,
    ) -> Result<GarmentRecord> {
        let draft = GarmentDraft::parse(&owner.username, type_token, attributes)?;
        let image_url = match image {
            GarmentImage::Reference(url) => url,
            GarmentImage::Bytes(bytes) => self.objects.put(bytes, "image/jpeg").await?,
        };
        let record = self.garments.create(draft, image_url).await?;
        Ok(record)
    }

    /// Every garment, grouped by variant tag.
    pub async fn outfits(&self) -> Result<BTreeMap<&'static str, Vec<GarmentRecord>>> {
        Ok(group_by_tag(self.garments.find_all().await?))
    }

    /// Grant `viewer` access to the caller's wardrobe.
    pub fn share_wardrobe(&self, owner: &UserProfile, viewer: &str) -> Result<()> {
        self.sharing.share(&owner.username, viewer)?;
        Ok(())
    }

    /// Revoke `viewer`'s access to the caller's wardrobe.
    pub fn unshare_wardrobe(&self, owner: &UserProfile, viewer: &str) {
        self.sharing.unshare(&owner.username, viewer);
    }

    /// Owners who shared their wardrobe with the caller.
    pub fn shared_wardrobes(&self, viewer: &UserProfile) -> BTreeSet<String> {
        self.sharing.owners_sharing_with(&viewer.username)
    }

    /// Everyone the caller has shared their wardrobe with.
    pub fn wardrobes_shared_by_me(&self, owner: &UserProfile) -> BTreeSet<String> {
        self.sharing.viewers_of(&owner.username)
    }

    /// List another owner's garments, gated by the sharing graph.
    pub async fn shared_wardrobe_items(
        &self,
        owner: &str,
        viewer: &UserProfile,
    ) -> Result<Vec<GarmentRecord>> {
        self.sharing.authorize_view(owner, &viewer.username)?;
        Ok(self.garments.find_by_owner(owner).await?)
    }

    /// Run the try-on pipeline for `requester` and the selected garment.
    pub async fn try_on(&self, requester: &UserProfile, garment_id: Uuid) -> Result<TryOnOutcome> {
        Ok(self.pipeline.run(requester, garment_id).await?)
    }

    /// Resolve the caller through the identity collaborator, then try on.
    pub async fn try_on_current(&self, garment_id: Uuid) -> Result<TryOnOutcome> {
        let requester = self.identity.current_identity().await?;
        Ok(self.pipeline.run(&requester, garment_id).await?)
    }

    /// Store a base64 (optionally data-URI-prefixed) image payload.
    ///
    /// Returns the new reference for the identity store to persist on the
    /// caller's profile.
    pub async fn upload_profile_image(&self, payload: &str) -> Result<String> {
        let bytes = codec::decode_image(payload)?;
        Ok(self.objects.put(Bytes::from(bytes), "image/jpeg").await?)
    }

    /// Direct access to the sharing graph.
    pub fn sharing(&self) -> &ShareGraph {
        &self.sharing
    }
}
