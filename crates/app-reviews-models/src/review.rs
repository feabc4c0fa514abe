use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use crate::platform::Platform;
use crate::rating::StarRating;

/// Store-independent review record produced by normalization
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UnifiedReview {
    pub id: String, // Unique within its platform only
    pub updated: DateTime<Utc>,
    pub title: Option<String>, // Play Store reviews have no title
    pub content: String,
    pub rating: StarRating,
    pub version: Option<String>,
    pub author: String,
    pub platform: Platform,
    pub country: String, // Country queried, not the reviewer's locale
}
