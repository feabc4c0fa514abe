use crate::aggregate::{aggregate, SentimentSeries};
use crate::export::{to_interchange, Interchange};
use anyhow::{anyhow, Context, Result};
use app_reviews_config::Config;
use app_reviews_models::{TimeBucket, UnifiedReview};
use app_reviews_sources::{
    create_store_client, normalize_all, AndroidReviewSource, HttpPageFetcher, IdentifierResolver,
    IosCandidate, IosReviewSource, ItunesRssSource, PageFetcher, PagedRssFetcher, PlayStoreReviewSource,
    ReviewFetcher, SimilarAppFinder, TokenPaginatedFetcher,
};
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;
use tracing::info;

/// Pipeline step, reported to the optional stage callback before it starts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    ResolveAndroid,
    FindSimilar,
    FetchAndroid,
    ResolveIos,
    FetchIos,
    Aggregate,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PipelineStage::ResolveAndroid => "Resolving Play Store id",
            PipelineStage::FindSimilar => "Looking up similar apps",
            PipelineStage::FetchAndroid => "Fetching Play Store reviews",
            PipelineStage::ResolveIos => "Resolving App Store id",
            PipelineStage::FetchIos => "Fetching App Store reviews",
            PipelineStage::Aggregate => "Aggregating sentiment",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AndroidRun {
    pub app_id: String,
    pub similar_apps: BTreeSet<String>,
    pub reviews: Vec<UnifiedReview>,
}

#[derive(Debug, Clone, Serialize)]
pub struct IosRun {
    pub app_id: String,
    pub candidates: Vec<IosCandidate>,
    pub reviews: Vec<UnifiedReview>,
}

/// Everything one run produced. Only built when every enabled stage succeeded.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineReport {
    pub app_name: String,
    pub android: Option<AndroidRun>,
    pub ios: Option<IosRun>,
    pub buckets: Vec<TimeBucket>,
}

impl PipelineReport {
    /// Review sets in merge order: App Store first, then Play Store
    pub fn review_sets(&self) -> Vec<&[UnifiedReview]> {
        let mut sets: Vec<&[UnifiedReview]> = Vec::new();
        if let Some(ios) = &self.ios {
            sets.push(&ios.reviews);
        }
        if let Some(android) = &self.android {
            sets.push(&android.reviews);
        }
        sets
    }

    pub fn review_count(&self) -> usize {
        self.review_sets().iter().map(|set| set.len()).sum()
    }

    pub fn series(&self) -> SentimentSeries {
        SentimentSeries::from_buckets(&self.buckets)
    }

    pub fn interchange(&self) -> Interchange {
        to_interchange(&self.review_sets())
    }
}

/// Resolution-only result, for callers that do not need reviews
#[derive(Debug, Clone, Serialize)]
pub struct Resolution {
    pub android_id: Option<String>,
    pub ios_id: Option<String>,
    pub ios_candidates: Vec<IosCandidate>,
}

type StageCallback = Box<dyn Fn(PipelineStage) + Send + Sync>;

/// Runs resolve -> fetch -> normalize for each enabled store, then aggregates.
///
/// Stages run one after another; the first failure aborts the run.
pub struct ReviewPipeline {
    config: Config,
    resolver: IdentifierResolver,
    similar: SimilarAppFinder,
    android: TokenPaginatedFetcher,
    ios: PagedRssFetcher,
    on_stage: Option<StageCallback>,
}

impl ReviewPipeline {
    pub fn new(
        config: Config,
        pages: Arc<dyn PageFetcher>,
        android_source: Arc<dyn AndroidReviewSource>,
        ios_source: Arc<dyn IosReviewSource>,
    ) -> Self {
        Self {
            resolver: IdentifierResolver::new(pages.clone(), &config),
            similar: SimilarAppFinder::new(pages, &config),
            android: TokenPaginatedFetcher::new(android_source, config.android.language.clone()),
            ios: PagedRssFetcher::new(ios_source).with_max_pages(config.ios.max_pages),
            config,
            on_stage: None,
        }
    }

    /// Pipeline backed by the live store endpoints
    pub fn from_config(config: Config) -> Self {
        let client = create_store_client(&config.http.user_agent);
        let pages: Arc<dyn PageFetcher> = Arc::new(HttpPageFetcher::new(client.clone()));
        let android_source = Arc::new(PlayStoreReviewSource::new(client));
        let ios_source = Arc::new(ItunesRssSource::new(pages.clone()));
        Self::new(config, pages, android_source, ios_source)
    }

    pub fn with_stage_callback(mut self, callback: impl Fn(PipelineStage) + Send + Sync + 'static) -> Self {
        self.on_stage = Some(Box::new(callback));
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn stage(&self, stage: PipelineStage) {
        if let Some(callback) = &self.on_stage {
            callback(stage);
        }
    }

    pub async fn resolve(&self, app_name: &str) -> Result<Resolution> {
        let android_id = if self.config.android.enabled {
            self.stage(PipelineStage::ResolveAndroid);
            Some(self.resolver.resolve_android_id(app_name).await?)
        } else {
            None
        };

        let (ios_candidates, ios_id) = if self.config.ios.enabled {
            self.stage(PipelineStage::ResolveIos);
            let (candidates, primary) = self.resolver.resolve_ios_id(app_name).await?;
            (candidates, Some(primary))
        } else {
            (Vec::new(), None)
        };

        Ok(Resolution {
            android_id,
            ios_id,
            ios_candidates,
        })
    }

    /// Resolve the Play Store id for `app_name` and list its related apps
    pub async fn similar_apps(&self, app_name: &str) -> Result<(String, BTreeSet<String>)> {
        self.stage(PipelineStage::ResolveAndroid);
        let app_id = self.resolver.resolve_android_id(app_name).await?;
        self.stage(PipelineStage::FindSimilar);
        let similar = self.similar.find_similar_android(&app_id).await?;
        Ok((app_id, similar))
    }

    pub async fn run(&self, app_name: &str) -> Result<PipelineReport> {
        if !self.config.android.enabled && !self.config.ios.enabled {
            return Err(anyhow!("Both Android and iOS are disabled; nothing to fetch"));
        }

        info!("Starting review pipeline for '{}'", app_name);

        let android = if self.config.android.enabled {
            Some(self.run_android(app_name).await?)
        } else {
            None
        };

        let ios = if self.config.ios.enabled {
            Some(self.run_ios(app_name).await?)
        } else {
            None
        };

        self.stage(PipelineStage::Aggregate);
        let mut report = PipelineReport {
            app_name: app_name.to_string(),
            android,
            ios,
            buckets: Vec::new(),
        };
        let buckets = aggregate(&report.review_sets());
        report.buckets = buckets;

        info!(
            "Pipeline finished for '{}': {} reviews in {} {} buckets",
            app_name,
            report.review_count(),
            report.buckets.len(),
            report
                .buckets
                .first()
                .map(|b| b.granularity.to_string())
                .unwrap_or_else(|| "empty".to_string())
        );
        Ok(report)
    }

    async fn run_android(&self, app_name: &str) -> Result<AndroidRun> {
        let settings = &self.config.android;

        self.stage(PipelineStage::ResolveAndroid);
        let app_id = self.resolver.resolve_android_id(app_name).await?;

        self.stage(PipelineStage::FindSimilar);
        let similar_apps = self.similar.find_similar_android(&app_id).await?;

        self.stage(PipelineStage::FetchAndroid);
        let raw = self
            .android
            .fetch(&app_id, &settings.country, Some(settings.review_count))
            .await?;
        let reviews = normalize_all(raw)
            .with_context(|| format!("Failed to normalize {} reviews for {}", self.android.platform(), app_id))?;

        Ok(AndroidRun {
            app_id,
            similar_apps,
            reviews,
        })
    }

    async fn run_ios(&self, app_name: &str) -> Result<IosRun> {
        self.stage(PipelineStage::ResolveIos);
        let (candidates, app_id) = self.resolver.resolve_ios_id(app_name).await?;

        self.stage(PipelineStage::FetchIos);
        let raw = self.ios.fetch(&app_id, &self.config.ios.country, None).await?;
        let reviews = normalize_all(raw)
            .with_context(|| format!("Failed to normalize {} reviews for {}", self.ios.platform(), app_id))?;

        Ok(IosRun {
            app_id,
            candidates,
            reviews,
        })
    }
}
