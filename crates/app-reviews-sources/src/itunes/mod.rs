//! App Store reviews: page-number pagination over the customer review RSS feed.

pub mod fetcher;
pub mod rss;

pub use fetcher::PagedRssFetcher;
pub use rss::{parse_entries, ItunesRssSource};

use crate::error::Result;
use crate::markup::Document;
use async_trait::async_trait;

#[async_trait]
pub trait IosReviewSource: Send + Sync {
    /// One 1-indexed feed page as an XML document with zero or more `<entry>` elements
    async fn fetch_review_page(&self, app_id: &str, country: &str, page: u32) -> Result<Document>;
}
