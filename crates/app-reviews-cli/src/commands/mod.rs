pub mod config;
pub mod progress;
pub mod resolve;
pub mod reviews;
pub mod similar;

use crate::output::Output;
use app_reviews_config::{Config, PathManager};
use app_reviews_sources::SourceError;
use color_eyre::Result;
use std::path::{Path, PathBuf};

/// `--config` if given, otherwise the default location
pub fn config_path(explicit: Option<&Path>) -> PathBuf {
    match explicit {
        Some(path) => path.to_path_buf(),
        None => PathManager::default().config_file(),
    }
}

/// Load and validate configuration. A missing default file means defaults;
/// a missing explicit `--config` file is an error.
pub fn load_config(explicit: Option<&Path>) -> Result<Config> {
    let path = config_path(explicit);

    let config = if explicit.is_some() {
        Config::load_from_file(&path)
    } else {
        Config::load_or_default(&path)
    }
    .map_err(|e| color_eyre::eyre::eyre!("Failed to load config from {}: {}", path.display(), e))?;

    config
        .validate()
        .map_err(|e| color_eyre::eyre::eyre!("Invalid configuration in {}: {}", path.display(), e))?;

    tracing::debug!(path = %path.display(), "Loaded configuration");
    Ok(config)
}

/// Print a user-facing hint for source errors and convert to an eyre report
pub fn report_failure(err: anyhow::Error, output: &Output) -> color_eyre::eyre::Report {
    match err.downcast_ref::<SourceError>() {
        Some(SourceError::InsufficientReviews { requested, available, .. }) => {
            output.warn(format!(
                "Only {} Play Store reviews are available but {} were requested. Re-run with --android-count {}.",
                available, requested, available
            ));
        }
        Some(SourceError::Resolution { platform, app_name }) => {
            output.warn(format!(
                "No {} search result for '{}'. Check the spelling or try the name shown in the store.",
                platform, app_name
            ));
        }
        _ => {}
    }
    color_eyre::eyre::eyre!("{:#}", err)
}
