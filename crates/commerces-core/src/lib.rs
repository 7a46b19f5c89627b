pub mod app_config;
pub mod config;
pub mod record;
pub mod view;

pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env, resolve_api_url};
pub use record::{CanonicalRecord, Coordinates, Dataset, Record};
pub use view::{CrossTab, DatasetView, Summary, ValueCount};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for environment variable {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
