//! Application service layer for third-order system identification.
//!
//! Wires the simulator, objective and particle swarm into one pipeline and
//! produces the descriptive analysis of the fixed transfer function. Frontends
//! supply a [`FigureSink`] to render plots; the pipeline itself is headless.

pub mod analysis;
pub mod config;
pub mod error;
pub mod figures;
pub mod identify;
pub mod objective;

pub use analysis::{ComplexPoint, PoleZeroMap, SystemAnalysis, analyze};
pub use config::{
    BoundsConfig, DescriptorConfig, GridConfig, IdentificationConfig, PlotScaling,
};
pub use error::{AppError, AppResult};
pub use figures::{FigureSink, NullSink, render_figures};
pub use identify::{
    DescriptorSummary, IdentificationReport, PipelineReport, build_objective, identify,
    run_pipeline,
};
pub use objective::{SseObjective, sum_squared_error};
