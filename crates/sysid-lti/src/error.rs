//! Error types for LTI descriptors.

use sysid_core::CoreError;
use sysid_sim::SimError;
use thiserror::Error;

/// Errors raised while building or analysing an LTI system.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LtiError {
    #[error("Denominator has no non-zero coefficient")]
    ZeroDenominator,

    #[error("Improper transfer function: numerator degree {num_degree} > denominator degree {den_degree}")]
    Improper { num_degree: usize, den_degree: usize },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Response simulation failed at sample {sample}: {source}")]
    Simulation { sample: usize, source: SimError },

    #[error("Simulation setup error: {0}")]
    Sim(#[from] SimError),

    #[error("Numeric error: {0}")]
    Core(#[from] CoreError),
}

pub type LtiResult<T> = Result<T, LtiError>;
