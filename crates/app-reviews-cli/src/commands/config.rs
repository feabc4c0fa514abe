use super::{config_path, load_config};
use crate::output::{new_table, Output};
use crate::ConfigCommands;
use app_reviews_config::{Config, PathManager};
use color_eyre::Result;
use serde_json::json;
use std::path::Path;

pub fn run_config(cmd: ConfigCommands, explicit: Option<&Path>, output: &Output) -> Result<()> {
    match cmd {
        ConfigCommands::Show => show_config(explicit, output),
        ConfigCommands::Init { force } => init_config(explicit, force, output),
    }
}

fn show_config(explicit: Option<&Path>, output: &Output) -> Result<()> {
    let path = config_path(explicit);
    let config = load_config(explicit)?;

    if !path.exists() {
        output.warn(format!(
            "No config file at {}; showing defaults. Run 'appreviews config init' to create one.",
            path.display()
        ));
    }

    let paths = PathManager::default();
    let export_dir = config
        .export
        .directory
        .clone()
        .unwrap_or_else(|| paths.export_dir());

    let mut table = new_table(["Setting", "Value"]);
    table.add_row(vec!["Config file".to_string(), path.display().to_string()]);
    table.add_row(vec!["android.enabled".to_string(), config.android.enabled.to_string()]);
    table.add_row(vec!["android.country".to_string(), config.android.country.clone()]);
    table.add_row(vec!["android.language".to_string(), config.android.language.clone()]);
    table.add_row(vec!["android.review_count".to_string(), config.android.review_count.to_string()]);
    table.add_row(vec!["ios.enabled".to_string(), config.ios.enabled.to_string()]);
    table.add_row(vec!["ios.country".to_string(), config.ios.country.clone()]);
    table.add_row(vec!["ios.search_region".to_string(), config.ios.search_region.clone()]);
    table.add_row(vec!["ios.max_pages".to_string(), config.ios.max_pages.to_string()]);
    table.add_row(vec!["export.directory".to_string(), export_dir.display().to_string()]);
    table.add_row(vec!["export.pretty".to_string(), config.export.pretty.to_string()]);

    output.heading("Configuration");
    output.table(&table, &json!({ "path": path.display().to_string(), "config": config }));
    Ok(())
}

fn init_config(explicit: Option<&Path>, force: bool, output: &Output) -> Result<()> {
    let path = config_path(explicit);

    if path.exists() && !force {
        return Err(color_eyre::eyre::eyre!(
            "Config file already exists at {}. Use --force to overwrite it.",
            path.display()
        ));
    }

    Config::default()
        .save_to_file(&path)
        .map_err(|e| color_eyre::eyre::eyre!("Failed to write config to {}: {}", path.display(), e))?;

    if explicit.is_none() {
        PathManager::default()
            .ensure_directories()
            .map_err(|e| color_eyre::eyre::eyre!("Failed to create data directories: {}", e))?;
    }

    output.success(format!("Wrote default configuration to {}", path.display()));
    Ok(())
}
