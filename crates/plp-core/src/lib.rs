pub mod app_config;
pub mod config;
pub mod products;
pub mod query;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use products::{Product, ProductPage};
pub use query::{apply_local_pipeline, FilterSpec, ListingPage, RemoteParams, SortKey};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
