use super::{load_config, report_failure};
use crate::commands::progress::StageSpinner;
use crate::output::{new_table, Output};
use app_reviews_config::{Config, PathManager};
use app_reviews_core::{PipelineReport, ReviewPipeline};
use app_reviews_models::TimeBucket;
use color_eyre::Result;
use serde_json::json;
use std::path::{Path, PathBuf};

/// Command-line overrides for one `reviews` run
#[derive(Debug, Default)]
pub struct ReviewsOptions {
    pub android_count: Option<usize>,
    pub country: Option<String>,
    pub skip_android: bool,
    pub skip_ios: bool,
    pub export: Option<PathBuf>,
    pub no_export: bool,
}

pub async fn run_reviews(
    app_name: &str,
    options: ReviewsOptions,
    config_path: Option<&Path>,
    output: &Output,
) -> Result<()> {
    let mut config = load_config(config_path)?;
    apply_overrides(&mut config, &options);
    config
        .validate()
        .map_err(|e| color_eyre::eyre::eyre!("Invalid options: {}", e))?;

    let export_path = export_destination(app_name, &config, &options);
    let pretty = config.export.pretty;

    let spinner = StageSpinner::new(output.is_human() && !output.is_quiet());
    let callback = spinner.clone();
    let pipeline = ReviewPipeline::from_config(config).with_stage_callback(move |stage| callback.stage(stage));

    let result = pipeline.run(app_name).await;
    spinner.finish();
    let report = result.map_err(|e| report_failure(e, output))?;

    if let Some(path) = &export_path {
        report
            .interchange()
            .write_to(path, pretty)
            .map_err(|e| color_eyre::eyre::eyre!("Failed to export reviews to {}: {}", path.display(), e))?;
    }

    print_report(&report, export_path.as_deref(), output);
    Ok(())
}

fn apply_overrides(config: &mut Config, options: &ReviewsOptions) {
    if let Some(count) = options.android_count {
        config.android.review_count = count;
    }
    if let Some(country) = &options.country {
        let country = country.trim().to_lowercase();
        config.android.country = country.clone();
        config.ios.country = country;
    }
    if options.skip_android {
        config.android.enabled = false;
    }
    if options.skip_ios {
        config.ios.enabled = false;
    }
}

/// `--export` wins, then the configured export directory, then the data dir
fn export_destination(app_name: &str, config: &Config, options: &ReviewsOptions) -> Option<PathBuf> {
    if options.no_export {
        return None;
    }
    if let Some(path) = &options.export {
        return Some(path.clone());
    }

    let default_file = PathManager::default().export_file(app_name);
    match (&config.export.directory, default_file.file_name()) {
        (Some(dir), Some(name)) => Some(dir.join(name)),
        _ => Some(default_file),
    }
}

fn print_report(report: &PipelineReport, export_path: Option<&Path>, output: &Output) {
    let mut summary = new_table(["Store", "App id", "Reviews"]);
    if let Some(ios) = &report.ios {
        summary.add_row(vec!["App Store".to_string(), ios.app_id.clone(), ios.reviews.len().to_string()]);
    }
    if let Some(android) = &report.android {
        summary.add_row(vec![
            "Play Store".to_string(),
            android.app_id.clone(),
            android.reviews.len().to_string(),
        ]);
    }

    let series = report.series();
    let summary_json = json!({
        "app_name": report.app_name,
        "ios": report.ios.as_ref().map(|r| json!({ "app_id": r.app_id, "reviews": r.reviews.len() })),
        "android": report.android.as_ref().map(|r| json!({
            "app_id": r.app_id,
            "reviews": r.reviews.len(),
            "similar_apps": r.similar_apps,
        })),
        "sentiment": series,
        "export": export_path.map(|p| p.display().to_string()),
    });

    if !output.is_human() {
        output.json(&summary_json);
        return;
    }

    output.heading(format!("Reviews for '{}'", report.app_name));
    output.table(&summary, &summary_json);

    if let Some(android) = &report.android {
        if !android.similar_apps.is_empty() {
            let similar: Vec<&str> = android.similar_apps.iter().map(String::as_str).collect();
            output.info(format!("Similar apps: {}", similar.join(", ")));
        }
    }

    if report.buckets.is_empty() {
        output.warn("No reviews to aggregate");
    } else {
        output.heading(format!("Sentiment by {}", report.buckets[0].granularity.unit()));
        output.table(&sentiment_table(&report.buckets), &summary_json);
    }

    match export_path {
        Some(path) => output.success(format!("Exported {} reviews to {}", report.review_count(), path.display())),
        None => output.info(format!("Fetched {} reviews (export skipped)", report.review_count())),
    }
}

fn sentiment_table(buckets: &[TimeBucket]) -> comfy_table::Table {
    let mut table = new_table(["Starting", "Reviews", "Positive (4-5)", "Negative (1-2)"]);
    for bucket in buckets {
        table.add_row(vec![
            bucket.start.format("%Y-%m-%d").to_string(),
            bucket.review_count.to_string(),
            format!("{:.1}%", bucket.positive_ratio * 100.0),
            format!("{:.1}%", bucket.negative_ratio * 100.0),
        ]);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use app_reviews_models::Granularity;
    use chrono::NaiveDate;

    #[test]
    fn test_overrides_apply_to_both_stores() {
        let mut config = Config::default();
        let options = ReviewsOptions {
            android_count: Some(50),
            country: Some(" US ".to_string()),
            skip_ios: true,
            ..Default::default()
        };
        apply_overrides(&mut config, &options);

        assert_eq!(config.android.review_count, 50);
        assert_eq!(config.android.country, "us");
        assert_eq!(config.ios.country, "us");
        assert!(config.android.enabled);
        assert!(!config.ios.enabled);
    }

    #[test]
    fn test_export_destination_precedence() {
        let mut config = Config::default();

        let skipped = ReviewsOptions { no_export: true, ..Default::default() };
        assert_eq!(export_destination("Airbnb", &config, &skipped), None);

        let explicit = ReviewsOptions {
            export: Some(PathBuf::from("/tmp/out.json")),
            ..Default::default()
        };
        assert_eq!(export_destination("Airbnb", &config, &explicit), Some(PathBuf::from("/tmp/out.json")));

        config.export.directory = Some(PathBuf::from("/srv/exports"));
        assert_eq!(
            export_destination("Airbnb", &config, &ReviewsOptions::default()),
            Some(PathBuf::from("/srv/exports/airbnb.json"))
        );
    }

    #[test]
    fn test_sentiment_table_formats_percentages() {
        let buckets = vec![TimeBucket {
            start: NaiveDate::from_ymd_opt(2024, 4, 1).unwrap(),
            granularity: Granularity::Weekly,
            review_count: 5,
            positive_ratio: 0.6,
            negative_ratio: 0.4,
        }];
        let rendered = sentiment_table(&buckets).to_string();
        assert!(rendered.contains("2024-04-01"));
        assert!(rendered.contains("60.0%"));
        assert!(rendered.contains("40.0%"));
    }
}
