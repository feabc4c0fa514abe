use crate::error::{Result, SourceError};
use crate::markup::MarkupMode;
use crate::page::PageFetcher;
use app_reviews_config::Config;
use app_reviews_models::Platform;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};

pub(crate) const PLAY_DETAILS_PREFIX: &str = "/store/apps/details?id=";

/// Links considered on the apple.com results page
const MAX_IOS_CANDIDATES: usize = 10;

/// One App Store search hit, split from `.../app/<slug>/id<number>`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IosCandidate {
    pub app: String,
    pub id: String,
}

/// Resolves store identifiers from a human-readable app name via the store search pages
pub struct IdentifierResolver {
    fetcher: Arc<dyn PageFetcher>,
    android_selector: String,
    ios_selector: String,
    ios_search_region: String,
}

impl IdentifierResolver {
    pub fn new(fetcher: Arc<dyn PageFetcher>, config: &Config) -> Self {
        Self {
            fetcher,
            android_selector: config.android.search_link_selector.clone(),
            ios_selector: config.ios.candidate_link_selector.clone(),
            ios_search_region: config.ios.search_region.clone(),
        }
    }

    /// Package name of the first Play Store search result (e.g. `com.airbnb.android`)
    pub async fn resolve_android_id(&self, app_name: &str) -> Result<String> {
        let url = format!(
            "https://play.google.com/store/search?q={}&c=apps",
            urlencoding::encode(app_name)
        );
        let document = self.fetcher.fetch_document(&url, MarkupMode::Html).await?;
        let links = document.links(&self.android_selector)?;
        debug!(app_name = %app_name, links = links.len(), "Play Store search links");

        let app_id = links
            .iter()
            .find_map(|href| android_id_from_href(href))
            .ok_or_else(|| SourceError::Resolution {
                platform: Platform::Android,
                app_name: app_name.to_string(),
            })?;

        info!("Resolved Android app id for '{}': {}", app_name, app_id);
        Ok(app_id)
    }

    /// All App Store candidates for `app_name`, plus the numeric id of the first one
    pub async fn resolve_ios_id(&self, app_name: &str) -> Result<(Vec<IosCandidate>, String)> {
        let url = format!(
            "https://www.apple.com/{}/search/{}?sel=explore&src=serp",
            self.ios_search_region,
            urlencoding::encode(app_name)
        );
        let document = self.fetcher.fetch_document(&url, MarkupMode::Html).await?;
        let links = document.links(&self.ios_selector)?;

        let candidates: Vec<IosCandidate> = links
            .iter()
            .take(MAX_IOS_CANDIDATES)
            .filter(|href| href.as_str() != "#")
            .filter_map(|href| {
                let candidate = ios_candidate_from_href(href);
                if candidate.is_none() {
                    debug!(href = %href, "Skipping link without an app id");
                }
                candidate
            })
            .collect();

        let primary = candidates
            .first()
            .map(|c| c.id.clone())
            .ok_or_else(|| SourceError::Resolution {
                platform: Platform::Ios,
                app_name: app_name.to_string(),
            })?;

        info!(
            "Resolved iOS app id for '{}': {} ({} candidates)",
            app_name,
            primary,
            candidates.len()
        );
        Ok((candidates, primary))
    }
}

/// `/store/apps/details?id=com.example&hl=en` -> `com.example`
pub(crate) fn android_id_from_href(href: &str) -> Option<String> {
    let start = href.find(PLAY_DETAILS_PREFIX)? + PLAY_DETAILS_PREFIX.len();
    let id = href[start..]
        .split(|c: char| c == '&' || c == '#')
        .next()
        .unwrap_or_default();

    if id.is_empty() {
        None
    } else {
        Some(id.to_string())
    }
}

/// `https://apps.apple.com/gb/app/airbnb/id401626263?mt=8` -> (`airbnb`, `401626263`)
pub(crate) fn ios_candidate_from_href(href: &str) -> Option<IosCandidate> {
    let start = href.find("/app/")? + "/app/".len();
    let path = href[start..].split(|c: char| c == '?' || c == '#').next()?;

    let mut parts = path.trim_end_matches('/').split('/');
    let app = parts.next()?;
    let id = parts.next()?.strip_prefix("id")?;

    if app.is_empty() || id.is_empty() || !id.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }

    Some(IosCandidate {
        app: app.to_string(),
        id: id.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::Document;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct StaticPage {
        body: String,
        requested: Mutex<Vec<String>>,
    }

    impl StaticPage {
        fn new(body: &str) -> Arc<Self> {
            Arc::new(Self {
                body: body.to_string(),
                requested: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl PageFetcher for StaticPage {
        async fn fetch_document(&self, url: &str, mode: MarkupMode) -> Result<Document> {
            self.requested.lock().unwrap().push(url.to_string());
            Ok(Document::new(url, mode, self.body.clone()))
        }
    }

    #[test]
    fn test_android_id_from_href() {
        assert_eq!(
            android_id_from_href("/store/apps/details?id=com.airbnb.android"),
            Some("com.airbnb.android".to_string())
        );
        assert_eq!(
            android_id_from_href("https://play.google.com/store/apps/details?id=com.x&hl=en"),
            Some("com.x".to_string())
        );
        assert_eq!(android_id_from_href("/store/apps/details?id="), None);
        assert_eq!(android_id_from_href("/store/apps/dev?id=123"), None);
    }

    #[test]
    fn test_ios_candidate_from_href() {
        assert_eq!(
            ios_candidate_from_href("https://apps.apple.com/gb/app/airbnb/id401626263"),
            Some(IosCandidate { app: "airbnb".to_string(), id: "401626263".to_string() })
        );
        assert_eq!(
            ios_candidate_from_href("https://apps.apple.com/us/app/maps/id915056765?mt=8"),
            Some(IosCandidate { app: "maps".to_string(), id: "915056765".to_string() })
        );
        assert_eq!(ios_candidate_from_href("https://apps.apple.com/gb/app/airbnb"), None);
        assert_eq!(ios_candidate_from_href("https://apps.apple.com/gb/app/airbnb/idabc"), None);
        assert_eq!(ios_candidate_from_href("#"), None);
    }

    #[tokio::test]
    async fn test_resolve_android_takes_first_result() {
        let page = StaticPage::new(
            r#"<div>
                <a href="/store/apps/details?id=com.airbnb.android">Airbnb</a>
                <a href="/store/apps/details?id=com.other">Other</a>
            </div>"#,
        );
        let resolver = IdentifierResolver::new(page.clone(), &Config::default());

        let id = resolver.resolve_android_id("air bnb").await.unwrap();
        assert_eq!(id, "com.airbnb.android");
        assert_eq!(
            page.requested.lock().unwrap()[0],
            "https://play.google.com/store/search?q=air%20bnb&c=apps"
        );
    }

    #[tokio::test]
    async fn test_resolve_android_no_results() {
        let page = StaticPage::new("<div><a href=\"/store/search?q=x\">nothing</a></div>");
        let resolver = IdentifierResolver::new(page, &Config::default());

        let err = resolver.resolve_android_id("nothing").await.unwrap_err();
        assert!(matches!(err, SourceError::Resolution { platform: Platform::Android, .. }));
    }

    #[tokio::test]
    async fn test_resolve_ios_candidates() {
        let page = StaticPage::new(
            r#"<div class="as-explore-product">
                <a href="https://apps.apple.com/gb/app/airbnb/id401626263">Airbnb</a>
                <a href="https://apps.apple.com/gb/app/airbnb-host/id123456789">Host</a>
                <a href="https://apps.apple.com/gb/app/broken">Broken</a>
            </div>"#,
        );
        let resolver = IdentifierResolver::new(page.clone(), &Config::default());

        let (candidates, primary) = resolver.resolve_ios_id("airbnb").await.unwrap();
        assert_eq!(primary, "401626263");
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[1].app, "airbnb-host");
        assert_eq!(
            page.requested.lock().unwrap()[0],
            "https://www.apple.com/uk/search/airbnb?sel=explore&src=serp"
        );
    }

    #[tokio::test]
    async fn test_resolve_ios_caps_candidates() {
        let links: String = (0..15)
            .map(|i| format!("<a href=\"https://apps.apple.com/gb/app/app{i}/id{i}00\">x</a>"))
            .collect();
        let page = StaticPage::new(&links);
        let resolver = IdentifierResolver::new(page, &Config::default());

        let (candidates, primary) = resolver.resolve_ios_id("app").await.unwrap();
        assert_eq!(candidates.len(), MAX_IOS_CANDIDATES);
        assert_eq!(primary, "000");
    }

    #[tokio::test]
    async fn test_resolve_ios_placeholders_count_toward_cap() {
        // Two "#" links sit inside the first ten, so only eight candidates survive
        let mut links = vec!["<a href=\"#\">menu</a>".to_string(), "<a href=\"#\">top</a>".to_string()];
        links.extend((1..=12).map(|i| format!("<a href=\"https://apps.apple.com/gb/app/app{i}/id{i}\">x</a>")));
        let page = StaticPage::new(&links.concat());

        let mut config = Config::default();
        config.ios.candidate_link_selector = "a".to_string();
        let resolver = IdentifierResolver::new(page, &config);

        let (candidates, primary) = resolver.resolve_ios_id("app").await.unwrap();
        assert_eq!(candidates.len(), MAX_IOS_CANDIDATES - 2);
        assert_eq!(primary, "1");
        assert_eq!(candidates.last().unwrap().id, "8");
    }

    #[tokio::test]
    async fn test_resolve_ios_no_results() {
        let page = StaticPage::new("<html><body><p>No results</p></body></html>");
        let resolver = IdentifierResolver::new(page, &Config::default());

        let err = resolver.resolve_ios_id("zzzz").await.unwrap_err();
        assert!(matches!(err, SourceError::Resolution { platform: Platform::Ios, .. }));
    }
}
