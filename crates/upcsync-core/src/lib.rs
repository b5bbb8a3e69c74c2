pub mod app_config;
pub mod business_units;
pub mod config;
pub mod records;

use thiserror::Error;

pub use app_config::{AppConfig, ClientConfig};
pub use business_units::{BusinessUnit, UnknownBusinessUnit, Variant};
pub use config::{load_app_config, load_app_config_from_env};
pub use records::SkuUpcRecord;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
