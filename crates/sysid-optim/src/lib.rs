//! Bounded stochastic optimization.
//!
//! Provides a particle swarm optimizer over box-constrained parameter
//! spaces. Objective evaluations within one iteration may run in parallel;
//! all random draws and best-position updates happen serially so a seeded
//! run is reproducible regardless of thread count.

pub mod bounds;
pub mod error;
pub mod pso;

pub use bounds::Bounds;
pub use error::{OptimError, OptimResult};
pub use pso::{ParticleSwarm, PsoOptions, PsoResult, Termination};
