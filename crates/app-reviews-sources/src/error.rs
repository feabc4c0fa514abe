use app_reviews_models::Platform;
use thiserror::Error;

/// Failures of the resolve / fetch / normalize stages.
///
/// None of these are retried; any of them aborts the run.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("no {platform} app found for '{app_name}'")]
    Resolution { platform: Platform, app_name: String },

    #[error("request to {url} failed: {message}")]
    Fetch { url: String, message: String },

    #[error("{app_id} has less than {requested} reviews ({available} available). Try entering a lower review count.")]
    InsufficientReviews {
        app_id: String,
        requested: usize,
        available: usize,
    },

    #[error("invalid {platform} review '{id}': {message}")]
    Normalization {
        platform: Platform,
        id: String,
        message: String,
    },
}

impl SourceError {
    pub fn fetch(url: impl Into<String>, message: impl std::fmt::Display) -> Self {
        SourceError::Fetch {
            url: url.into(),
            message: message.to_string(),
        }
    }

    pub fn normalization(platform: Platform, id: &str, message: impl std::fmt::Display) -> Self {
        SourceError::Normalization {
            platform,
            id: id.to_string(),
            message: message.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SourceError>;
