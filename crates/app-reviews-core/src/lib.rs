pub mod aggregate;
pub mod export;
pub mod pipeline;

pub use aggregate::{aggregate, choose_granularity, merge_review_sets, SentimentSeries, WEEKLY_MAX_MONTHS};
pub use export::{to_interchange, Interchange, InterchangeRecord};
pub use pipeline::{AndroidRun, IosRun, PipelineReport, PipelineStage, Resolution, ReviewPipeline};
