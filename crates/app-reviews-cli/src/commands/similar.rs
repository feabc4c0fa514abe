use super::{load_config, report_failure};
use crate::commands::progress::StageSpinner;
use crate::output::{new_table, Output};
use app_reviews_core::ReviewPipeline;
use color_eyre::Result;
use serde_json::json;
use std::path::Path;

pub async fn run_similar(app_name: &str, config_path: Option<&Path>, output: &Output) -> Result<()> {
    let config = load_config(config_path)?;
    if !config.android.enabled {
        return Err(color_eyre::eyre::eyre!("Similar apps come from the Play Store, which is disabled in config"));
    }

    let spinner = StageSpinner::new(output.is_human() && !output.is_quiet());
    let callback = spinner.clone();
    let pipeline = ReviewPipeline::from_config(config).with_stage_callback(move |stage| callback.stage(stage));

    let result = pipeline.similar_apps(app_name).await;
    spinner.finish();
    let (app_id, similar) = result.map_err(|e| report_failure(e, output))?;

    if similar.is_empty() {
        output.warn(format!("The Play Store lists no related apps for {}", app_id));
    }

    let mut table = new_table(["Related app"]);
    for id in &similar {
        table.add_row(vec![id.as_str()]);
    }

    output.heading(format!("Apps related to {} ({})", app_name, app_id));
    output.table(
        &table,
        &json!({ "app_name": app_name, "app_id": app_id, "similar_apps": similar }),
    );
    Ok(())
}
