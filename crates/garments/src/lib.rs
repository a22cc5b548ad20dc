//! Garment taxonomy for the wardrobe backend
//!
//! This crate defines the closed set of garment variants, the record type
//! persisted for each garment, the ingestion dispatch that turns an untyped
//! attribute map into a typed draft, and the persistence collaborator
//! interface.

use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Result type
pub type Result<T> = std::result::Result<T, GarmentError>;

/// Error type
#[derive(Error, Debug)]
pub enum GarmentError {
    #[error("invalid clothing type: {0}")]
    InvalidGarmentType(String),

    #[error("unsupported clothing type for try-on: {0}")]
    UnsupportedGarmentType(&'static str),

    #[error("missing required field: {0}")]
    MissingAttribute(&'static str),

    #[error("garment store error: {0}")]
    Store(String),
}

/// Body region targeted by the synthesis service when placing a garment.
///
/// Always recomputed from the variant, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BodyRegion {
    UpperBody,
    LowerBody,
}

impl BodyRegion {
    /// Wire value expected by the synthesis endpoint.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UpperBody => "upper_body",
            Self::LowerBody => "lower_body",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TshirtAttributes {
    pub neck_type: String,
    pub sleeve_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweaterAttributes {
    pub neckline_type: String,
    pub sleeve_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlazerAttributes {
    pub sleeve_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JeansAttributes {
    pub fit_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrouserAttributes {
    pub trouser_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShortsAttributes {
    pub shorts_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkirtAttributes {
    pub skirt_type: String,
}

/// Garment variant with its variant-specific attributes.
///
/// The tag determines which attribute set is populated; exactly one set
/// exists per record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum GarmentKind {
    Tshirt(TshirtAttributes),
    Sweater(SweaterAttributes),
    Blazer(BlazerAttributes),
    Jeans(JeansAttributes),
    Trouser(TrouserAttributes),
    Shorts(ShortsAttributes),
    Skirt(SkirtAttributes),
}

impl GarmentKind {
    /// Lowercase tag used for ingestion dispatch and grouping.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Tshirt(_) => "tshirt",
            Self::Sweater(_) => "sweater",
            Self::Blazer(_) => "blazer",
            Self::Jeans(_) => "jeans",
            Self::Trouser(_) => "trouser",
            Self::Shorts(_) => "shorts",
            Self::Skirt(_) => "skirt",
        }
    }
}

/// A persisted garment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GarmentRecord {
    pub id: Uuid,
    /// Username of the wardrobe owner.
    pub owner: String,
    pub name: String,
    pub color: String,
    pub material: String,
    pub size: String,
    pub size_metrics: String,
    /// Reference into durable object storage.
    pub image_url: String,
    pub kind: GarmentKind,
    pub created_at: DateTime<Utc>,
}

/// Category and conditioning text handed to the synthesis service.
#[derive(Debug, Clone, PartialEq)]
pub struct TryOnProfile {
    pub category: BodyRegion,
    pub description: String,
}

impl GarmentRecord {
    /// Resolve the body region and conditioning description for this garment.
    ///
    /// Token order is part of the external contract, including the trailing
    /// space after the last token. Variants without a try-on mapping fail
    /// with [`GarmentError::UnsupportedGarmentType`].
    pub fn try_on_profile(&self) -> Result<TryOnProfile> {
        let mut description = format!(
            "{} {} {} {} ",
            self.color, self.material, self.size, self.size_metrics
        );
        let category = match &self.kind {
            GarmentKind::Tshirt(attrs) => {
                description.push_str(&attrs.neck_type);
                description.push_str(" neck ");
                description.push_str(&attrs.sleeve_type);
                description.push_str(" sleeve ");
                BodyRegion::UpperBody
            }
            GarmentKind::Jeans(attrs) => {
                description.push_str(&attrs.fit_type);
                description.push_str(" fit ");
                BodyRegion::LowerBody
            }
            GarmentKind::Skirt(attrs) => {
                description.push_str(&attrs.skirt_type);
                description.push_str(" style ");
                BodyRegion::LowerBody
            }
            GarmentKind::Shorts(attrs) => {
                description.push_str(&attrs.shorts_type);
                description.push_str(" style ");
                BodyRegion::LowerBody
            }
            other => return Err(GarmentError::UnsupportedGarmentType(other.tag())),
        };
        Ok(TryOnProfile {
            category,
            description,
        })
    }
}

/// A validated garment awaiting persistence.
#[derive(Debug, Clone, PartialEq)]
pub struct GarmentDraft {
    pub owner: String,
    pub name: String,
    pub color: String,
    pub material: String,
    pub size: String,
    pub size_metrics: String,
    pub kind: GarmentKind,
}

impl GarmentDraft {
    /// Build a draft from an ingestion payload.
    ///
    /// The type token is matched case-insensitively. An unknown token or a
    /// missing attribute fails here, before anything reaches the store.
    pub fn parse(
        owner: &str,
        type_token: &str,
        attributes: &HashMap<String, String>,
    ) -> Result<Self> {
        let kind = match type_token.to_lowercase().as_str() {
            "tshirt" => GarmentKind::Tshirt(TshirtAttributes {
                neck_type: required(attributes, "neck_type")?,
                sleeve_type: required(attributes, "sleeve_type")?,
            }),
            "sweater" => GarmentKind::Sweater(SweaterAttributes {
                neckline_type: required(attributes, "neckline_type")?,
                sleeve_type: required(attributes, "sleeve_type")?,
            }),
            "blazer" => GarmentKind::Blazer(BlazerAttributes {
                sleeve_type: required(attributes, "sleeve_type")?,
            }),
            "jeans" => GarmentKind::Jeans(JeansAttributes {
                fit_type: required(attributes, "fit_type")?,
            }),
            "trouser" => GarmentKind::Trouser(TrouserAttributes {
                trouser_type: required(attributes, "trouser_type")?,
            }),
            "shorts" => GarmentKind::Shorts(ShortsAttributes {
                shorts_type: required(attributes, "shorts_type")?,
            }),
            "skirt" => GarmentKind::Skirt(SkirtAttributes {
                skirt_type: required(attributes, "skirt_type")?,
            }),
            other => return Err(GarmentError::InvalidGarmentType(other.to_string())),
        };
        Ok(Self {
            owner: owner.to_string(),
            name: required(attributes, "name")?,
            color: required(attributes, "color")?,
            material: required(attributes, "material")?,
            size: required(attributes, "size")?,
            size_metrics: required(attributes, "size_metrics")?,
            kind,
        })
    }
}

fn required(attributes: &HashMap<String, String>, field: &'static str) -> Result<String> {
    attributes
        .get(field)
        .filter(|value| !value.is_empty())
        .cloned()
        .ok_or(GarmentError::MissingAttribute(field))
}

/// Group records by variant tag, in stable tag order.
pub fn group_by_tag(records: Vec<GarmentRecord>) -> BTreeMap<&'static str, Vec<GarmentRecord>> {
    let mut grouped: BTreeMap<&'static str, Vec<GarmentRecord>> = BTreeMap::new();
    for record in records {
        grouped.entry(record.kind.tag()).or_default().push(record);
    }
    grouped
}

/// Persistence collaborator for garment records.
#[async_trait]
pub trait GarmentStore: Send + Sync {
    /// Persist a validated draft under a fresh id.
    async fn create(&self, draft: GarmentDraft, image_url: String) -> Result<GarmentRecord>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<GarmentRecord>>;

    async fn find_all(&self) -> Result<Vec<GarmentRecord>>;

    /// All garments in one owner's wardrobe.
    async fn find_by_owner(&self, owner: &str) -> Result<Vec<GarmentRecord>>;
}

/// In-memory [`GarmentStore`] used by tests and small deployments.
#[derive(Default)]
pub struct InMemoryGarmentStore {
    records: RwLock<HashMap<Uuid, GarmentRecord>>,
}

impl InMemoryGarmentStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn sorted(mut records: Vec<GarmentRecord>) -> Vec<GarmentRecord> {
        records.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        records
    }
}

#[async_trait]
impl GarmentStore for InMemoryGarmentStore {
    async fn create(&self, draft: GarmentDraft, image_url: String) -> Result<GarmentRecord> {
        let record = GarmentRecord {
            id: Uuid::new_v4(),
            owner: draft.owner,
            name: draft.name,
            color: draft.color,
            material: draft.material,
            size: draft.size,
            size_metrics: draft.size_metrics,
            image_url,
            kind: draft.kind,
            created_at: Utc::now(),
        };
        let mut records = self
            .records
            .write()
            .map_err(|e| GarmentError::Store(e.to_string()))?;
        records.insert(record.id, record.clone());
        log::debug!("stored garment {} ({})", record.id, record.kind.tag());
        Ok(record)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<GarmentRecord>> {
        let records = self
            .records
            .read()
            .map_err(|e| GarmentError::Store(e.to_string()))?;
        Ok(records.get(&id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<GarmentRecord>> {
        let records = self
            .records
            .read()
            .map_err(|e| GarmentError::Store(e.to_string()))?;
        Ok(Self::sorted(records.values().cloned().collect()))
    }

    async fn find_by_owner(&self, owner: &str) -> Result<Vec<GarmentRecord>> {
        let records = self
            .records
            .read()
            .map_err(|e| GarmentError::Store(e.to_string()))?;
        Ok(Self::sorted(
            records
                .values()
                .filter(|record| record.owner == owner)
                .cloned()
                .collect(),
        ))
    }
}
