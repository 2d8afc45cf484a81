//! Presentation boundary: the pipeline hands finished data to a sink.

use sysid_lti::{FrequencyResponse, TimeResponse};

use crate::analysis::{PoleZeroMap, SystemAnalysis};
use crate::config::PlotScaling;
use crate::error::AppResult;

/// Renders the four descriptive figures.
pub trait FigureSink {
    fn impulse(&mut self, response: &TimeResponse) -> AppResult<()>;
    fn step(&mut self, response: &TimeResponse) -> AppResult<()>;
    fn pole_zero(&mut self, map: &PoleZeroMap) -> AppResult<()>;
    fn bode(&mut self, response: &FrequencyResponse) -> AppResult<()>;
}

/// Discards every figure.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl FigureSink for NullSink {
    fn impulse(&mut self, _response: &TimeResponse) -> AppResult<()> {
        Ok(())
    }

    fn step(&mut self, _response: &TimeResponse) -> AppResult<()> {
        Ok(())
    }

    fn pole_zero(&mut self, _map: &PoleZeroMap) -> AppResult<()> {
        Ok(())
    }

    fn bode(&mut self, _response: &FrequencyResponse) -> AppResult<()> {
        Ok(())
    }
}

fn rescale(response: &TimeResponse, time: f64, amplitude: f64) -> TimeResponse {
    TimeResponse {
        t: response.t.iter().map(|t| t * time).collect(),
        y: response.y.iter().map(|y| y * amplitude).collect(),
    }
}

/// Send every figure to `sink`, with display scaling applied to the time
/// responses.
pub fn render_figures(
    analysis: &SystemAnalysis,
    scaling: &PlotScaling,
    sink: &mut dyn FigureSink,
) -> AppResult<()> {
    sink.impulse(&rescale(
        &analysis.impulse,
        scaling.impulse_time,
        scaling.impulse_amplitude,
    ))?;
    sink.step(&rescale(
        &analysis.step,
        scaling.step_time,
        scaling.step_amplitude,
    ))?;
    sink.pole_zero(&analysis.pole_zero)?;
    sink.bode(&analysis.bode)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::analyze;
    use sysid_lti::TransferFunction;

    #[derive(Default)]
    struct Recorder {
        impulse: Option<TimeResponse>,
        step: Option<TimeResponse>,
        calls: Vec<&'static str>,
    }

    impl FigureSink for Recorder {
        fn impulse(&mut self, response: &TimeResponse) -> AppResult<()> {
            self.impulse = Some(response.clone());
            self.calls.push("impulse");
            Ok(())
        }

        fn step(&mut self, response: &TimeResponse) -> AppResult<()> {
            self.step = Some(response.clone());
            self.calls.push("step");
            Ok(())
        }

        fn pole_zero(&mut self, _map: &PoleZeroMap) -> AppResult<()> {
            self.calls.push("pole_zero");
            Ok(())
        }

        fn bode(&mut self, _response: &FrequencyResponse) -> AppResult<()> {
            self.calls.push("bode");
            Ok(())
        }
    }

    #[test]
    fn scaling_applies_to_time_responses() {
        let tf = TransferFunction::new(&[1.0], &[1.0, 1.0]).unwrap();
        let analysis = analyze(&tf).unwrap();
        let mut sink = Recorder::default();
        render_figures(&analysis, &PlotScaling::default(), &mut sink).unwrap();

        assert_eq!(sink.calls, vec!["impulse", "step", "pole_zero", "bode"]);
        let impulse = sink.impulse.unwrap();
        assert!((impulse.t[99] - 7.0 * 33.0).abs() < 1e-9);
        assert!((impulse.y[0] - 33.0).abs() < 1e-9);
        let step = sink.step.unwrap();
        assert_eq!(step.t, analysis.step.t);
        assert!((step.y[99] - 2.5 * analysis.step.y[99]).abs() < 1e-12);
    }

    #[test]
    fn identity_scaling_passes_data_through() {
        let tf = TransferFunction::new(&[1.0], &[1.0, 1.0]).unwrap();
        let analysis = analyze(&tf).unwrap();
        let mut sink = Recorder::default();
        render_figures(&analysis, &PlotScaling::identity(), &mut sink).unwrap();
        assert_eq!(sink.impulse.unwrap(), analysis.impulse);
    }
}
