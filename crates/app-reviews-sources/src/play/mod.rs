//! Play Store reviews: continuation-token pagination.

pub mod api;
pub mod fetcher;

pub use api::PlayStoreReviewSource;
pub use fetcher::{TokenPaginatedFetcher, DEFAULT_REVIEW_COUNT};

use crate::error::Result;
use app_reviews_models::AndroidRawReview;
use async_trait::async_trait;

/// Reviews returned per query when the caller does not name a count
pub const DEFAULT_QUERY_COUNT: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    MostRelevant,
    Newest,
    Rating,
}

impl SortOrder {
    /// Sort code understood by the review RPC
    pub fn code(&self) -> u8 {
        match self {
            SortOrder::MostRelevant => 1,
            SortOrder::Newest => 2,
            SortOrder::Rating => 3,
        }
    }
}

/// Opaque cursor plus the query it was issued for, so a follow-up call only needs the token
#[derive(Debug, Clone, PartialEq)]
pub struct ContinuationToken {
    pub token: String,
    pub lang: String,
    pub country: String,
    pub sort: SortOrder,
    pub count: usize,
}

#[derive(Debug, Clone)]
pub struct ReviewQuery {
    pub app_id: String,
    pub lang: String,
    pub country: String,
    pub sort: SortOrder,
    /// `None` reuses the continuation token's count, or [`DEFAULT_QUERY_COUNT`] without one
    pub count: Option<usize>,
    /// When set, its lang, country and sort take precedence over the fields above
    pub continuation: Option<ContinuationToken>,
}

impl ReviewQuery {
    /// Effective (lang, country, sort, count) for this query
    pub fn resolved(&self) -> (String, String, SortOrder, usize) {
        match &self.continuation {
            Some(token) => (
                token.lang.clone(),
                token.country.clone(),
                token.sort,
                self.count.unwrap_or(token.count),
            ),
            None => (
                self.lang.clone(),
                self.country.clone(),
                self.sort,
                self.count.unwrap_or(DEFAULT_QUERY_COUNT),
            ),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ReviewBatch {
    pub records: Vec<AndroidRawReview>,
    pub next_token: Option<ContinuationToken>,
}

#[async_trait]
pub trait AndroidReviewSource: Send + Sync {
    async fn query_reviews(&self, query: &ReviewQuery) -> Result<ReviewBatch>;
}
