//! Error types for the sysid-app service layer.

use std::path::PathBuf;

use sysid_core::CoreError;
use sysid_lti::LtiError;
use sysid_optim::OptimError;
use sysid_sim::SimError;

/// Application error wrapping the backend crates' errors.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Failed to read config file: {path}")]
    ConfigFileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    ConfigParse(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Validation(String),

    #[error("Numeric error: {0}")]
    Core(#[from] CoreError),

    #[error("Simulation error: {0}")]
    Simulation(#[from] SimError),

    #[error("Optimizer error: {0}")]
    Optimizer(#[from] OptimError),

    #[error("Transfer function error: {0}")]
    Lti(#[from] LtiError),

    #[error("Failed to serialize report: {0}")]
    Report(#[from] serde_json::Error),

    #[error("Figure output failed: {message}")]
    Figure { message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for sysid-app operations.
pub type AppResult<T> = Result<T, AppError>;
