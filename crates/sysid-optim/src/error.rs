//! Error types for optimizer setup.

use sysid_core::CoreError;
use thiserror::Error;

/// Errors that can occur while configuring an optimization.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OptimError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Bounds length mismatch: {lower} lower, {upper} upper")]
    BoundsMismatch { lower: usize, upper: usize },

    #[error("Invalid bounds at index {index}: lower {lower} > upper {upper}")]
    InvalidBounds { index: usize, lower: f64, upper: f64 },

    #[error("Numeric error: {0}")]
    Core(#[from] CoreError),
}

pub type OptimResult<T> = Result<T, OptimError>;
