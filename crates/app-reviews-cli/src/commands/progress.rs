use app_reviews_core::PipelineStage;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::IsTerminal;
use std::time::Duration;

/// Spinner driven by pipeline stage callbacks. Falls back to log lines
/// when stdout/stderr are not terminals.
#[derive(Clone)]
pub struct StageSpinner {
    spinner: Option<ProgressBar>,
}

impl StageSpinner {
    pub fn new(enabled: bool) -> Self {
        if !enabled || !is_interactive() {
            return Self { spinner: None };
        }

        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
        {
            spinner.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ "));
        }
        spinner.enable_steady_tick(Duration::from_millis(100));
        Self { spinner: Some(spinner) }
    }

    pub fn stage(&self, stage: PipelineStage) {
        match &self.spinner {
            Some(spinner) => spinner.set_message(format!("{}...", stage)),
            None => tracing::info!(operation = "progress", stage = %stage, "Pipeline stage"),
        }
    }

    pub fn finish(&self) {
        if let Some(spinner) = &self.spinner {
            spinner.finish_and_clear();
        }
    }
}

pub fn is_interactive() -> bool {
    std::io::stdout().is_terminal() && std::io::stderr().is_terminal()
}
