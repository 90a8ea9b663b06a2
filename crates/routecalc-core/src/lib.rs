//! Shared domain types and configuration for the routecalc workspace.

pub mod app_config;
pub mod config;
pub mod location;
pub mod travel;

use thiserror::Error;

pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_with_key, load_log_level};
pub use location::{DistanceResult, LocationValue};
pub use travel::{RoutingStrategy, TravelMode, DRIVING_STRATEGIES};

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("unknown travel mode \"{0}\" (expected direct, driving, walking, bicycling or transit)")]
    UnknownTravelMode(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
