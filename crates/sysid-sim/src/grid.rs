//! Time grids shared by every simulation of a run.

use sysid_core::{ensure_all_finite, ensure_finite, linspace};

use crate::error::{SimError, SimResult};

/// Strictly increasing, finite sample times.
#[derive(Clone, Debug, PartialEq)]
pub struct TimeGrid {
    samples: Vec<f64>,
}

impl TimeGrid {
    /// `n` evenly spaced samples over `[start, end]`.
    pub fn linspace(start: f64, end: f64, n: usize) -> SimResult<Self> {
        ensure_finite(start, "grid start")?;
        ensure_finite(end, "grid end")?;
        if n == 0 {
            return Err(SimError::InvalidGrid {
                what: "grid needs at least one sample",
            });
        }
        if n > 1 && end <= start {
            return Err(SimError::InvalidGrid {
                what: "grid end must exceed grid start",
            });
        }
        Self::from_samples(linspace(start, end, n))
    }

    /// Build a grid from explicit sample times.
    pub fn from_samples(samples: Vec<f64>) -> SimResult<Self> {
        if samples.is_empty() {
            return Err(SimError::InvalidGrid {
                what: "grid needs at least one sample",
            });
        }
        ensure_all_finite(&samples, "grid sample")?;
        if samples.windows(2).any(|w| w[1] <= w[0]) {
            return Err(SimError::InvalidGrid {
                what: "grid samples must be strictly increasing",
            });
        }
        Ok(Self { samples })
    }

    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn start(&self) -> f64 {
        self.samples[0]
    }

    pub fn end(&self) -> f64 {
        self.samples[self.samples.len() - 1]
    }
}

impl Default for TimeGrid {
    /// 100 evenly spaced samples over `[0, 10]`.
    fn default() -> Self {
        Self {
            samples: linspace(0.0, 10.0, 100),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_grid_shape() {
        let grid = TimeGrid::default();
        assert_eq!(grid.len(), 100);
        assert_eq!(grid.start(), 0.0);
        assert_eq!(grid.end(), 10.0);
    }

    #[test]
    fn linspace_matches_default() {
        assert_eq!(TimeGrid::linspace(0.0, 10.0, 100).unwrap(), TimeGrid::default());
    }

    #[test]
    fn rejects_reversed_range() {
        let err = TimeGrid::linspace(1.0, 0.0, 10).unwrap_err();
        assert!(matches!(err, SimError::InvalidGrid { .. }));
    }

    #[test]
    fn rejects_non_monotonic_samples() {
        assert!(TimeGrid::from_samples(vec![0.0, 1.0, 1.0]).is_err());
        assert!(TimeGrid::from_samples(vec![0.0, 2.0, 1.0]).is_err());
        assert!(TimeGrid::from_samples(Vec::new()).is_err());
    }

    #[test]
    fn rejects_non_finite_samples() {
        let err = TimeGrid::from_samples(vec![0.0, f64::NAN]).unwrap_err();
        assert!(matches!(err, SimError::Core(_)));
    }

    #[test]
    fn single_sample_grid() {
        let grid = TimeGrid::linspace(2.0, 2.0, 1).unwrap();
        assert_eq!(grid.samples(), &[2.0]);
    }
}
