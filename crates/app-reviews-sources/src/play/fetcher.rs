use crate::error::{Result, SourceError};
use crate::play::{AndroidReviewSource, ReviewQuery, SortOrder};
use crate::traits::ReviewFetcher;
use app_reviews_models::{Platform, RawReview};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info};

/// Reviews requested by the first call when the caller does not ask for a count
pub const DEFAULT_REVIEW_COUNT: usize = 200;

/// Two-call Play Store fetch: a bounded newest-first batch, then one drain call
/// from the continuation token.
///
/// The first batch must be full. A store holding fewer reviews than requested is
/// an error rather than a short read, so a successful fetch always returns at
/// least the requested count.
pub struct TokenPaginatedFetcher {
    source: Arc<dyn AndroidReviewSource>,
    lang: String,
}

impl TokenPaginatedFetcher {
    pub fn new(source: Arc<dyn AndroidReviewSource>, lang: impl Into<String>) -> Self {
        Self {
            source,
            lang: lang.into(),
        }
    }
}

#[async_trait]
impl ReviewFetcher for TokenPaginatedFetcher {
    fn platform(&self) -> Platform {
        Platform::Android
    }

    async fn fetch(&self, app_id: &str, country: &str, limit: Option<usize>) -> Result<Vec<RawReview>> {
        let requested = limit.unwrap_or(DEFAULT_REVIEW_COUNT);

        let first = self
            .source
            .query_reviews(&ReviewQuery {
                app_id: app_id.to_string(),
                lang: self.lang.clone(),
                country: country.to_string(),
                sort: SortOrder::Newest,
                count: Some(requested),
                continuation: None,
            })
            .await?;

        if first.records.len() < requested {
            return Err(SourceError::InsufficientReviews {
                app_id: app_id.to_string(),
                requested,
                available: first.records.len(),
            });
        }

        let mut records = first.records;

        if let Some(token) = first.next_token {
            let drained = self
                .source
                .query_reviews(&ReviewQuery {
                    app_id: app_id.to_string(),
                    lang: self.lang.clone(),
                    country: country.to_string(),
                    sort: SortOrder::Newest,
                    count: None,
                    continuation: Some(token),
                })
                .await?;
            debug!(app_id = %app_id, drained = drained.records.len(), "Drained continuation token");
            records.extend(drained.records);
        }

        info!("Fetched {} Android reviews for {} ({})", records.len(), app_id, country);

        Ok(records
            .into_iter()
            .map(|record| RawReview::android(record, country))
            .collect())
    }
}
