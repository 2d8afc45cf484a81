//! Identification pipeline.

use std::time::Instant;

use serde::Serialize;
use sysid_optim::{ParticleSwarm, Termination};
use sysid_sim::{ResponseSimulator, ThirdOrderParams};
use tracing::{info, warn};

use crate::analysis::{ComplexPoint, analyze};
use crate::config::IdentificationConfig;
use crate::error::AppResult;
use crate::figures::{FigureSink, render_figures};
use crate::objective::SseObjective;

/// Outcome of one swarm fit.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct IdentificationReport {
    pub true_params: ThirdOrderParams,
    pub identified: ThirdOrderParams,
    /// Final objective value
    pub objective: f64,
    pub iterations: usize,
    pub evaluations: usize,
    pub termination: Termination,
    /// Swarm best after initialization and after each iteration
    pub history: Vec<f64>,
    pub elapsed_secs: f64,
}

/// Compact description of the analysed transfer function.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DescriptorSummary {
    pub numerator: Vec<f64>,
    pub denominator: Vec<f64>,
    pub poles: Vec<ComplexPoint>,
    pub zeros: Vec<ComplexPoint>,
    pub dc_gain: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PipelineReport {
    pub descriptor: DescriptorSummary,
    pub identification: IdentificationReport,
}

impl PipelineReport {
    pub fn to_json(&self) -> AppResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Build the objective for `config`: simulate the true coefficients on the
/// configured grid and score candidates against that trajectory.
pub fn build_objective(config: &IdentificationConfig) -> AppResult<SseObjective> {
    let simulator = ResponseSimulator::new(config.time_grid()?)
        .with_initial_state(config.initial_state_vector())
        .with_options(config.simulation.clone())?;
    let objective = SseObjective::from_true_params(simulator, &config.true_params);
    if !objective.reference().is_finite() {
        warn!("reference trajectory contains non-finite samples");
    }
    Ok(objective)
}

/// Fit the six coefficients with the particle swarm.
pub fn identify(config: &IdentificationConfig) -> AppResult<IdentificationReport> {
    let objective = build_objective(config)?;
    let bounds = config.search_bounds()?;
    let swarm = ParticleSwarm::new(config.pso.clone())?;

    info!(
        samples = config.grid.samples,
        swarm_size = config.pso.swarm_size,
        max_iterations = config.pso.max_iterations,
        "starting identification"
    );
    let started = Instant::now();
    let result = swarm.minimize(|x: &[f64]| objective.cost_slice(x), &bounds)?;
    let elapsed_secs = started.elapsed().as_secs_f64();

    let identified = ThirdOrderParams::from_slice(&result.best_position)?;
    if result.termination == Termination::TimeBudget {
        warn!(iterations = result.iterations, "swarm stopped on its time budget");
    }
    if !result.best_value.is_finite() {
        warn!("no candidate produced a finite objective");
    }
    info!(
        objective = result.best_value,
        iterations = result.iterations,
        termination = ?result.termination,
        elapsed_secs,
        "identification finished"
    );

    Ok(IdentificationReport {
        true_params: config.true_params,
        identified,
        objective: result.best_value,
        iterations: result.iterations,
        evaluations: result.evaluations,
        termination: result.termination,
        history: result.history,
        elapsed_secs,
    })
}

/// Analyse the descriptor, hand its figures to `sink`, then identify.
pub fn run_pipeline(
    config: &IdentificationConfig,
    sink: &mut dyn FigureSink,
) -> AppResult<PipelineReport> {
    config.validate()?;

    let tf = config.transfer_function()?;
    let analysis = analyze(&tf)?;
    render_figures(&analysis, &config.plot_scaling, sink)?;

    let descriptor = DescriptorSummary {
        numerator: tf.numerator().to_vec(),
        denominator: tf.denominator().to_vec(),
        poles: analysis.pole_zero.poles.clone(),
        zeros: analysis.pole_zero.zeros.clone(),
        dc_gain: analysis.dc_gain,
    };

    Ok(PipelineReport {
        descriptor,
        identification: identify(config)?,
    })
}
