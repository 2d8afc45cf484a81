//! Run configuration, with defaults reproducing the fixed identification run.

use std::path::Path;

use serde::{Deserialize, Serialize};
use sysid_lti::TransferFunction;
use sysid_optim::{Bounds, ParticleSwarm, PsoOptions};
use sysid_sim::{SimOptions, StateVector, ThirdOrderParams, TimeGrid};

use crate::error::{AppError, AppResult};

/// Evenly spaced sample times shared by every simulation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub start: f64,
    pub end: f64,
    pub samples: usize,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            start: 0.0,
            end: 10.0,
            samples: 100,
        }
    }
}

/// Elementwise search box for `[a3, a2, a1, b3, b2, b1]`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoundsConfig {
    pub lower: Vec<f64>,
    pub upper: Vec<f64>,
}

impl Default for BoundsConfig {
    fn default() -> Self {
        Self {
            lower: vec![-10.0; ThirdOrderParams::DIM],
            upper: vec![10.0; ThirdOrderParams::DIM],
        }
    }
}

/// Descriptive transfer function, coefficients highest power first.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DescriptorConfig {
    pub numerator: Vec<f64>,
    pub denominator: Vec<f64>,
}

impl Default for DescriptorConfig {
    fn default() -> Self {
        Self {
            numerator: vec![13.0, 9.0],
            denominator: vec![1.0, 5.0, 17.0, 11.0],
        }
    }
}

/// Display-only multipliers applied to the time-response figures.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotScaling {
    pub impulse_time: f64,
    pub impulse_amplitude: f64,
    pub step_time: f64,
    pub step_amplitude: f64,
}

impl Default for PlotScaling {
    fn default() -> Self {
        Self {
            impulse_time: 33.0,
            impulse_amplitude: 33.0,
            step_time: 1.0,
            step_amplitude: 2.5,
        }
    }
}

impl PlotScaling {
    /// No rescaling.
    pub fn identity() -> Self {
        Self {
            impulse_time: 1.0,
            impulse_amplitude: 1.0,
            step_time: 1.0,
            step_amplitude: 1.0,
        }
    }

    pub fn impulse_is_scaled(&self) -> bool {
        self.impulse_time != 1.0 || self.impulse_amplitude != 1.0
    }

    pub fn step_is_scaled(&self) -> bool {
        self.step_time != 1.0 || self.step_amplitude != 1.0
    }
}

/// Everything one identification run needs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdentificationConfig {
    pub grid: GridConfig,
    /// Coefficients that synthesize the reference trajectory
    pub true_params: ThirdOrderParams,
    /// `(y, y', y'')` at the first grid sample
    pub initial_state: [f64; 3],
    pub bounds: BoundsConfig,
    pub pso: PsoOptions,
    pub simulation: SimOptions,
    pub descriptor: DescriptorConfig,
    pub plot_scaling: PlotScaling,
}

impl Default for IdentificationConfig {
    fn default() -> Self {
        Self {
            grid: GridConfig::default(),
            true_params: ThirdOrderParams::REFERENCE,
            initial_state: [0.0; 3],
            bounds: BoundsConfig::default(),
            pso: PsoOptions::default(),
            simulation: SimOptions::default(),
            descriptor: DescriptorConfig::default(),
            plot_scaling: PlotScaling::default(),
        }
    }
}

impl IdentificationConfig {
    /// Load from a YAML file. Missing keys keep their defaults.
    pub fn load(path: &Path) -> AppResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| AppError::ConfigFileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_yaml_str(&content)
    }

    pub fn from_yaml_str(content: &str) -> AppResult<Self> {
        let config: Self = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_yaml_string(&self) -> AppResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Check every section that can be checked without running anything.
    pub fn validate(&self) -> AppResult<()> {
        self.time_grid()?;
        self.search_bounds()?;
        self.transfer_function()?;
        self.simulation.validate()?;
        ParticleSwarm::new(self.pso.clone())?;
        if self.bounds.lower.len() != ThirdOrderParams::DIM {
            return Err(AppError::Validation(format!(
                "bounds must have {} elements, got {}",
                ThirdOrderParams::DIM,
                self.bounds.lower.len()
            )));
        }
        if self.initial_state.iter().any(|v| !v.is_finite()) {
            return Err(AppError::Validation(
                "initial_state must be finite".to_string(),
            ));
        }
        let scaling = &self.plot_scaling;
        let factors = [
            scaling.impulse_time,
            scaling.impulse_amplitude,
            scaling.step_time,
            scaling.step_amplitude,
        ];
        if factors.iter().any(|f| !f.is_finite() || *f == 0.0) {
            return Err(AppError::Validation(
                "plot scaling factors must be finite and non-zero".to_string(),
            ));
        }
        Ok(())
    }

    pub fn time_grid(&self) -> AppResult<TimeGrid> {
        Ok(TimeGrid::linspace(
            self.grid.start,
            self.grid.end,
            self.grid.samples,
        )?)
    }

    pub fn search_bounds(&self) -> AppResult<Bounds> {
        Ok(Bounds::new(
            self.bounds.lower.clone(),
            self.bounds.upper.clone(),
        )?)
    }

    pub fn transfer_function(&self) -> AppResult<TransferFunction> {
        Ok(TransferFunction::new(
            &self.descriptor.numerator,
            &self.descriptor.denominator,
        )?)
    }

    pub fn initial_state_vector(&self) -> StateVector {
        StateVector::from(self.initial_state)
    }
}
