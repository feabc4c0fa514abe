use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Upper bound on iTunes review feed pages; the feed does not serve more than this
pub const MAX_RSS_PAGES: u32 = 20;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub android: AndroidConfig,
    #[serde(default)]
    pub ios: IosConfig,
    #[serde(default)]
    pub export: ExportConfig,
    #[serde(default)]
    pub http: HttpConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AndroidConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_country")]
    pub country: String,
    #[serde(default = "default_language")]
    pub language: String,
    /// Reviews requested in the first (bounded) call; the store must have at least this many
    #[serde(default = "default_review_count")]
    pub review_count: usize,
    #[serde(default = "default_android_search_selector")]
    pub search_link_selector: String,
    #[serde(default = "default_android_similar_selector")]
    pub similar_link_selector: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IosConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_country")]
    pub country: String,
    /// Region segment of the apple.com search URL ("uk" for the GB store)
    #[serde(default = "default_search_region")]
    pub search_region: String,
    #[serde(default = "default_max_pages")]
    pub max_pages: u32,
    #[serde(default = "default_ios_candidate_selector")]
    pub candidate_link_selector: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Directory for interchange JSON files (defaults to <data dir>/exports)
    #[serde(default)]
    pub directory: Option<PathBuf>,
    #[serde(default = "default_true")]
    pub pretty: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_true() -> bool {
    true
}

fn default_country() -> String {
    "gb".to_string()
}

fn default_language() -> String {
    "en".to_string()
}

fn default_review_count() -> usize {
    200
}

fn default_search_region() -> String {
    "uk".to_string()
}

fn default_max_pages() -> u32 {
    MAX_RSS_PAGES
}

fn default_android_search_selector() -> String {
    r#"a[href*="/store/apps/details?id="]"#.to_string()
}

fn default_android_similar_selector() -> String {
    r#"a[href*="/store/apps/details?id="]"#.to_string()
}

fn default_ios_candidate_selector() -> String {
    r#"a[href*="/app/"]"#.to_string()
}

pub fn default_user_agent() -> String {
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36".to_string()
}

impl Default for AndroidConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            country: default_country(),
            language: default_language(),
            review_count: default_review_count(),
            search_link_selector: default_android_search_selector(),
            similar_link_selector: default_android_similar_selector(),
        }
    }
}

impl Default for IosConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            country: default_country(),
            search_region: default_search_region(),
            max_pages: default_max_pages(),
            candidate_link_selector: default_ios_candidate_selector(),
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            directory: None,
            pretty: default_true(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
        }
    }
}

impl Config {
    pub fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load the file if it exists, otherwise fall back to defaults
    pub fn load_or_default(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            Self::load_from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save_to_file(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if !self.android.enabled && !self.ios.enabled {
            return Err(anyhow::anyhow!("At least one of android or ios must be enabled"));
        }

        if self.android.enabled {
            if self.android.review_count == 0 {
                return Err(anyhow::anyhow!("android.review_count must be greater than zero"));
            }
            if self.android.country.trim().is_empty() {
                return Err(anyhow::anyhow!("android.country cannot be empty"));
            }
            if self.android.language.trim().is_empty() {
                return Err(anyhow::anyhow!("android.language cannot be empty"));
            }
            validate_selector("android.search_link_selector", &self.android.search_link_selector)?;
            validate_selector("android.similar_link_selector", &self.android.similar_link_selector)?;
        }

        if self.ios.enabled {
            if self.ios.max_pages == 0 || self.ios.max_pages > MAX_RSS_PAGES {
                return Err(anyhow::anyhow!(
                    "ios.max_pages must be between 1 and {}, got {}",
                    MAX_RSS_PAGES,
                    self.ios.max_pages
                ));
            }
            if self.ios.country.trim().is_empty() {
                return Err(anyhow::anyhow!("ios.country cannot be empty"));
            }
            if self.ios.search_region.trim().is_empty() {
                return Err(anyhow::anyhow!("ios.search_region cannot be empty"));
            }
            validate_selector("ios.candidate_link_selector", &self.ios.candidate_link_selector)?;
        }

        Ok(())
    }
}

fn validate_selector(field: &str, selector: &str) -> anyhow::Result<()> {
    scraper::Selector::parse(selector)
        .map(|_| ())
        .map_err(|e| anyhow::anyhow!("Invalid CSS selector in {}: {} ({})", field, selector, e))
}
