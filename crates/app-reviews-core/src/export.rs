use crate::aggregate::merge_review_sets;
use anyhow::{Context, Result};
use app_reviews_models::{Platform, StarRating, UnifiedReview};
use chrono::{DateTime, Utc};
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde::Deserialize;
use std::path::Path;
use tracing::info;

/// One exported review; `platform` is written as `OS`
#[derive(Debug, Clone, PartialEq, serde::Serialize, Deserialize)]
pub struct InterchangeRecord {
    pub updated: DateTime<Utc>,
    pub id: String,
    pub title: Option<String>,
    pub content: String,
    pub rating: StarRating,
    pub version: Option<String>,
    pub author: String,
    #[serde(rename = "OS")]
    pub os: Platform,
    pub country: String,
}

impl From<&UnifiedReview> for InterchangeRecord {
    fn from(review: &UnifiedReview) -> Self {
        Self {
            updated: review.updated,
            id: review.id.clone(),
            title: review.title.clone(),
            content: review.content.clone(),
            rating: review.rating,
            version: review.version.clone(),
            author: review.author.clone(),
            os: review.platform,
            country: review.country.clone(),
        }
    }
}

/// Merged reviews keyed by their position: `{"0": {...}, "1": {...}}`, in merge order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Interchange {
    records: Vec<InterchangeRecord>,
}

impl Interchange {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&InterchangeRecord> {
        self.records.get(index)
    }

    pub fn records(&self) -> &[InterchangeRecord] {
        &self.records
    }

    pub fn to_json_string(&self, pretty: bool) -> Result<String> {
        let json = if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        };
        Ok(json)
    }

    /// Write the document to `path`, creating parent directories
    pub fn write_to(&self, path: &Path, pretty: bool) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create export directory {}", parent.display()))?;
        }
        let json = self.to_json_string(pretty)?;
        std::fs::write(path, json).with_context(|| format!("Failed to write export to {}", path.display()))?;
        info!("Exported {} reviews to {}", self.len(), path.display());
        Ok(())
    }
}

impl Serialize for Interchange {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.records.len()))?;
        for (index, record) in self.records.iter().enumerate() {
            map.serialize_entry(&index.to_string(), record)?;
        }
        map.end()
    }
}

/// Concatenate the review sets and index them by position
pub fn to_interchange<S: AsRef<[UnifiedReview]>>(sets: &[S]) -> Interchange {
    Interchange {
        records: merge_review_sets(sets).iter().map(InterchangeRecord::from).collect(),
    }
}
