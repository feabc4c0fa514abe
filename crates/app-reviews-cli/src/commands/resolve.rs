use super::{load_config, report_failure};
use crate::output::{new_table, Output};
use app_reviews_core::ReviewPipeline;
use color_eyre::Result;
use serde_json::json;
use std::path::Path;

pub async fn run_resolve(app_name: &str, config_path: Option<&Path>, output: &Output) -> Result<()> {
    let config = load_config(config_path)?;
    let pipeline = ReviewPipeline::from_config(config);

    let resolution = pipeline
        .resolve(app_name)
        .await
        .map_err(|e| report_failure(e, output))?;

    let mut table = new_table(["Store", "Candidate", "App id"]);
    if let Some(android_id) = &resolution.android_id {
        table.add_row(vec!["Play Store", app_name, android_id.as_str()]);
    }
    for (index, candidate) in resolution.ios_candidates.iter().enumerate() {
        let marker = if index == 0 { "App Store (used)" } else { "App Store" };
        table.add_row(vec![marker, candidate.app.as_str(), candidate.id.as_str()]);
    }

    output.heading(format!("Store identifiers for '{}'", app_name));
    output.table(&table, &json!({ "app_name": app_name, "resolution": resolution }));
    Ok(())
}
