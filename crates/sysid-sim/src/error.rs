//! Error types for simulation operations.

use sysid_core::CoreError;
use thiserror::Error;

/// Errors encountered during simulation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Invalid time grid: {what}")]
    InvalidGrid { what: &'static str },

    #[error("Step size underflow at t={t}")]
    StepSizeUnderflow { t: f64 },

    #[error("Problem became stiff at t={t}")]
    StiffnessDetected { t: f64 },

    #[error("Step limit of {max_steps} exceeded before t={t}")]
    MaxStepsExceeded { t: f64, max_steps: usize },

    #[error("Non-finite state at t={t}")]
    NonFinite { t: f64 },

    #[error("Numeric error: {0}")]
    Core(#[from] CoreError),
}

pub type SimResult<T> = Result<T, SimError>;
