use crate::error::Result;
use crate::markup::MarkupMode;
use crate::page::PageFetcher;
use crate::resolver::android_id_from_href;
use app_reviews_config::Config;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::debug;

/// Collects the related apps listed on a Play Store detail page
pub struct SimilarAppFinder {
    fetcher: Arc<dyn PageFetcher>,
    selector: String,
}

impl SimilarAppFinder {
    pub fn new(fetcher: Arc<dyn PageFetcher>, config: &Config) -> Self {
        Self {
            fetcher,
            selector: config.android.similar_link_selector.clone(),
        }
    }

    /// Package names linked from `app_id`'s detail page, excluding `app_id` itself.
    /// An app with no related listings yields an empty set.
    pub async fn find_similar_android(&self, app_id: &str) -> Result<BTreeSet<String>> {
        let url = format!(
            "https://play.google.com/store/apps/details?id={}",
            urlencoding::encode(app_id)
        );
        let document = self.fetcher.fetch_document(&url, MarkupMode::Html).await?;

        let similar: BTreeSet<String> = document
            .links(&self.selector)?
            .iter()
            .filter_map(|href| android_id_from_href(href))
            .filter(|id| id != app_id)
            .collect();

        debug!(app_id = %app_id, similar = similar.len(), "Found similar apps");
        Ok(similar)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::Document;
    use async_trait::async_trait;

    struct DetailPage(&'static str);

    #[async_trait]
    impl PageFetcher for DetailPage {
        async fn fetch_document(&self, url: &str, mode: MarkupMode) -> Result<Document> {
            assert_eq!(url, "https://play.google.com/store/apps/details?id=com.airbnb.android");
            Ok(Document::new(url, mode, self.0))
        }
    }

    #[tokio::test]
    async fn test_similar_apps_deduplicated() {
        let finder = SimilarAppFinder::new(
            Arc::new(DetailPage(
                r#"<div>
                    <a href="/store/apps/details?id=com.airbnb.android">self</a>
                    <a href="/store/apps/details?id=com.booking">Booking</a>
                    <a href="/store/apps/details?id=com.vrbo">Vrbo</a>
                    <a href="/store/apps/details?id=com.booking">Booking again</a>
                    <a href="/store/apps/dev?id=42">Developer</a>
                </div>"#,
            )),
            &Config::default(),
        );

        let similar = finder.find_similar_android("com.airbnb.android").await.unwrap();
        let similar: Vec<&str> = similar.iter().map(|s| s.as_str()).collect();
        assert_eq!(similar, vec!["com.booking", "com.vrbo"]);
    }

    #[tokio::test]
    async fn test_no_similar_apps_is_empty() {
        let finder = SimilarAppFinder::new(
            Arc::new(DetailPage("<html><body>No related apps</body></html>")),
            &Config::default(),
        );

        let similar = finder.find_similar_android("com.airbnb.android").await.unwrap();
        assert!(similar.is_empty());
    }
}
