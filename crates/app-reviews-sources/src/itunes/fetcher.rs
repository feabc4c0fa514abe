use crate::error::Result;
use crate::itunes::{parse_entries, IosReviewSource};
use crate::traits::ReviewFetcher;
use app_reviews_config::MAX_RSS_PAGES;
use app_reviews_models::{Platform, RawReview};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info};

/// Walks feed pages 1..=max_pages, stopping at the first empty page.
///
/// The feed has no total count, so reviews past the page cap are unreachable.
pub struct PagedRssFetcher {
    source: Arc<dyn IosReviewSource>,
    max_pages: u32,
}

impl PagedRssFetcher {
    pub fn new(source: Arc<dyn IosReviewSource>) -> Self {
        Self {
            source,
            max_pages: MAX_RSS_PAGES,
        }
    }

    /// Lower the page cap; values above [`MAX_RSS_PAGES`] are clamped
    pub fn with_max_pages(mut self, max_pages: u32) -> Self {
        self.max_pages = max_pages.min(MAX_RSS_PAGES);
        self
    }
}

#[async_trait]
impl ReviewFetcher for PagedRssFetcher {
    fn platform(&self) -> Platform {
        Platform::Ios
    }

    /// `limit`, when given, stops paging once that many reviews are collected
    async fn fetch(&self, app_id: &str, country: &str, limit: Option<usize>) -> Result<Vec<RawReview>> {
        let mut reviews: Vec<RawReview> = Vec::new();
        let mut pages_read = 0;

        for page in 1..=self.max_pages {
            let document = self.source.fetch_review_page(app_id, country, page).await?;
            pages_read = page;
            let entries = parse_entries(&document)?;

            // The feed has no total; an empty page is the only end marker
            if entries.is_empty() {
                debug!(app_id = %app_id, page, "Empty feed page, stopping pagination");
                break;
            }

            debug!(app_id = %app_id, page, entries = entries.len(), "Fetched feed page");
            reviews.extend(entries.into_iter().map(|entry| RawReview::ios(entry, country)));

            // Stop early once the caller has enough
            if let Some(limit) = limit {
                if reviews.len() >= limit {
                    reviews.truncate(limit);
                    break;
                }
            }
        }

        info!(
            "Fetched {} iOS reviews for {} ({}) from {} pages",
            reviews.len(),
            app_id,
            country,
            pages_read
        );
        Ok(reviews)
    }
}
