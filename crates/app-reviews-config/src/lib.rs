pub mod config;
pub mod paths;

pub use config::{AndroidConfig, Config, ExportConfig, HttpConfig, IosConfig, MAX_RSS_PAGES, default_user_agent};
pub use paths::{PathManager, base_path_override};
