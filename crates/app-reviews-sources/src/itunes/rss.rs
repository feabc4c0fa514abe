use crate::error::Result;
use crate::itunes::IosReviewSource;
use crate::markup::{Document, MarkupMode};
use crate::page::PageFetcher;
use app_reviews_models::IosRawReview;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

/// iTunes customer review feed, fetched through a [`PageFetcher`] in XML mode
pub struct ItunesRssSource {
    fetcher: Arc<dyn PageFetcher>,
}

impl ItunesRssSource {
    pub fn new(fetcher: Arc<dyn PageFetcher>) -> Self {
        Self { fetcher }
    }

    pub fn page_url(app_id: &str, country: &str, page: u32) -> String {
        format!(
            "https://itunes.apple.com/{}/rss/customerreviews/id={}/page={}/xml",
            country, app_id, page
        )
    }
}

#[async_trait]
impl IosReviewSource for ItunesRssSource {
    async fn fetch_review_page(&self, app_id: &str, country: &str, page: u32) -> Result<Document> {
        let url = Self::page_url(app_id, country, page);
        self.fetcher.fetch_document(&url, MarkupMode::Xml).await
    }
}

/// Review entries of one feed page.
///
/// Entries without a rating describe the app itself rather than a review and are skipped.
pub fn parse_entries(document: &Document) -> Result<Vec<IosRawReview>> {
    let records = document.xml_records("entry")?;
    let mut entries = Vec::with_capacity(records.len());

    for record in records {
        let rating = match record.field("rating") {
            Some(rating) => rating.to_string(),
            None => {
                debug!(id = ?record.field("id"), "Skipping feed entry without rating");
                continue;
            }
        };

        // <author> holds <name> and <uri>; older feeds only carry concatenated text
        let author = match record.field("author/name") {
            Some(name) => name.to_string(),
            None => record
                .field_or_empty("author")
                .split("https:")
                .next()
                .unwrap_or_default()
                .trim()
                .to_string(),
        };

        entries.push(IosRawReview {
            updated: record.field_or_empty("updated"),
            id: record.field_or_empty("id"),
            title: record.field_or_empty("title"),
            content: record.field_or_empty("content"),
            rating,
            version: record.field_or_empty("version"),
            author,
        });
    }

    Ok(entries)
}
