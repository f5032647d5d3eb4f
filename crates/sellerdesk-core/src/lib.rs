use thiserror::Error;

mod app_config;
mod config;
mod orders;
pub mod status;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use orders::{NormalizedLineItem, NormalizedOrder};
pub use status::{
    check_archive, check_close, reconcile, ArchiveCheck, CarrierSignal, OrderStatus, StatusError,
    Transition,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),
    #[error("invalid value for environment variable {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
