//! Linear time-invariant system descriptors.
//!
//! A [`TransferFunction`] is a proper polynomial ratio. From it this crate
//! derives poles and zeros, a controllable-canonical state-space
//! realization, impulse/step responses and the frequency response used for
//! Bode plots.

pub mod error;
pub mod freq;
pub mod poly;
pub mod response;
pub mod state_space;
pub mod transfer_function;

pub use error::{LtiError, LtiResult};
pub use freq::{FrequencyResponse, default_frequencies, frequency_response};
pub use nalgebra::Complex;
pub use poly::{polyval, roots};
pub use response::{TimeResponse, default_response_times, impulse_response, step_response};
pub use state_space::StateSpace;
pub use transfer_function::TransferFunction;
