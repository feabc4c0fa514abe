use chrono::{DateTime, Utc};
use crate::platform::Platform;

/// Review as returned by the Play Store review endpoint
#[derive(Debug, Clone, PartialEq)]
pub struct AndroidRawReview {
    pub at: DateTime<Utc>,
    pub review_id: String,
    pub content: Option<String>, // Rating-only reviews have no body
    pub score: i64,
    pub review_created_version: Option<String>,
    pub user_name: String,
}

/// `<entry>` of the iTunes customer review feed, kept as the feed's text nodes
#[derive(Debug, Clone, PartialEq, Default)]
pub struct IosRawReview {
    pub updated: String,
    pub id: String,
    pub title: String,
    pub content: String,
    pub rating: String,
    pub version: String,
    pub author: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RawReviewRecord {
    Android(AndroidRawReview),
    Ios(IosRawReview),
}

impl RawReviewRecord {
    pub fn platform(&self) -> Platform {
        match self {
            RawReviewRecord::Android(_) => Platform::Android,
            RawReviewRecord::Ios(_) => Platform::Ios,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            RawReviewRecord::Android(r) => &r.review_id,
            RawReviewRecord::Ios(r) => &r.id,
        }
    }
}

/// A raw record stamped with the country it was requested for.
///
/// `country` is the query parameter sent to the store, not the reviewer's locale.
#[derive(Debug, Clone, PartialEq)]
pub struct RawReview {
    pub record: RawReviewRecord,
    pub country: String,
}

impl RawReview {
    pub fn android(record: AndroidRawReview, country: &str) -> Self {
        Self {
            record: RawReviewRecord::Android(record),
            country: country.to_string(),
        }
    }

    pub fn ios(record: IosRawReview, country: &str) -> Self {
        Self {
            record: RawReviewRecord::Ios(record),
            country: country.to_string(),
        }
    }

    pub fn platform(&self) -> Platform {
        self.record.platform()
    }
}
