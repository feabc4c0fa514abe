use app_reviews_config::PathManager;
use clap::{ArgAction, Parser, Subcommand};
use commands::{config, resolve, reviews, similar};
use std::path::PathBuf;

mod commands;
mod logging;
mod output;

#[derive(Parser)]
#[command(name = "appreviews")]
#[command(about = "Collect Play Store and App Store reviews for an app and chart their sentiment")]
#[command(version)]
struct Cli {
    /// Enable verbose output (use multiple times for more verbosity: -v, -vv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "human", value_enum)]
    output: output::OutputFormat,

    /// Config file (defaults to <config dir>/app-reviews/config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Write logs to a daily-rolling file instead of stderr.
    /// Without a path, logs go to <config dir>/app-reviews/logs/appreviews.log
    #[arg(long, global = true, value_name = "PATH", num_args = 0..=1)]
    log_file: Option<Option<PathBuf>>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve store identifiers for an app name
    #[command(long_about = "Look up the Play Store package name and the App Store candidates for an app name. The first App Store candidate is the one used for fetching reviews.")]
    Resolve {
        /// App name as typed in a store search box
        app_name: String,
    },
    /// List apps the Play Store shows as related
    Similar {
        app_name: String,
    },
    /// Fetch, merge and aggregate reviews from both stores
    #[command(long_about = "Run the full pipeline for an app: resolve identifiers, fetch reviews from the Play Store and the App Store, normalize and merge them, print the sentiment table, and export the merged reviews as JSON.")]
    Reviews {
        app_name: String,

        /// Number of Play Store reviews to request in the first batch
        #[arg(long, value_name = "N")]
        android_count: Option<usize>,

        /// Two-letter store country code for both stores (e.g. gb, us)
        #[arg(long, value_name = "CC")]
        country: Option<String>,

        /// Skip the Play Store
        #[arg(long, action = ArgAction::SetTrue, conflicts_with = "skip_ios")]
        skip_android: bool,

        /// Skip the App Store
        #[arg(long, action = ArgAction::SetTrue)]
        skip_ios: bool,

        /// Export path (defaults to <data dir>/exports/<app>.json)
        #[arg(long, value_name = "PATH", conflicts_with = "no_export")]
        export: Option<PathBuf>,

        /// Do not write the export file
        #[arg(long, action = ArgAction::SetTrue)]
        no_export: bool,
    },
    /// Show or initialize configuration
    Config {
        #[command(subcommand)]
        cmd: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show the effective configuration
    Show,
    /// Write a config file with default values
    Init {
        /// Overwrite an existing config file
        #[arg(long, action = ArgAction::SetTrue)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    let log_file = cli
        .log_file
        .clone()
        .map(|path| path.unwrap_or_else(|| PathManager::default().log_file()));
    logging::init_logging_with_file(cli.verbose, cli.quiet, log_file)
        .map_err(|e| color_eyre::eyre::eyre!("{}", e))?;

    let output = output::Output::new(cli.output, cli.quiet);
    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Resolve { app_name } => resolve::run_resolve(&app_name, config_path, &output).await,
        Commands::Similar { app_name } => similar::run_similar(&app_name, config_path, &output).await,
        Commands::Reviews {
            app_name,
            android_count,
            country,
            skip_android,
            skip_ios,
            export,
            no_export,
        } => {
            let options = reviews::ReviewsOptions {
                android_count,
                country,
                skip_android,
                skip_ios,
                export,
                no_export,
            };
            reviews::run_reviews(&app_name, options, config_path, &output).await
        }
        Commands::Config { cmd } => config::run_config(cmd, config_path, &output),
    }
}
