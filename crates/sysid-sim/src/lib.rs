//! Continuous-time simulation of the third-order identification model.
//!
//! Provides:
//! - Companion-form third-order ODE evaluator and parameter vector
//! - Pluggable `TransientModel` trait
//! - Fixed-step RK4 / forward Euler integrators and an adaptive Dormand-Prince 5(4)
//!   solver backed by `ode_solvers`
//! - Time grids and grid-sampled response simulation

pub mod adaptive;
pub mod error;
pub mod grid;
pub mod integrator;
pub mod model;
pub mod sim;
pub mod simulator;
pub mod third_order;

pub use adaptive::{AdaptiveSolver, AdaptiveStats, DEFAULT_ADAPTIVE_TOL};
pub use error::{SimError, SimResult};
pub use grid::TimeGrid;
pub use integrator::{ForwardEuler, Integrator, RK4};
pub use model::TransientModel;
pub use sim::{IntegrationFailure, IntegrationMethod, SimOptions, SimRecord, run_on_grid};
pub use simulator::{ResponseSimulator, Trajectory};
pub use third_order::{StateVector, ThirdOrderModel, ThirdOrderParams, derivative};
