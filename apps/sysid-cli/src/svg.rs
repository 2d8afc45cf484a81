//! SVG figures rendered with plotters.

use std::fmt::Display;
use std::ops::Range;
use std::path::{Path, PathBuf};

use plotters::prelude::*;
use sysid_app::{AppError, AppResult, FigureSink, PlotScaling, PoleZeroMap};
use sysid_lti::{FrequencyResponse, TimeResponse};

const CAPTION_FONT: (&str, u32) = ("sans-serif", 24);

/// Writes `impulse.svg`, `step.svg`, `pole_zero.svg` and `bode.svg` into a
/// directory.
pub struct SvgFigures {
    dir: PathBuf,
    scaling: PlotScaling,
}

impl SvgFigures {
    /// `scaling` must be the one the time responses were rescaled with; it
    /// only affects captions here.
    pub fn new(dir: &Path, scaling: &PlotScaling) -> Self {
        Self {
            dir: dir.to_path_buf(),
            scaling: scaling.clone(),
        }
    }

    fn line_chart(
        &self,
        file: &str,
        caption: &str,
        y_desc: &str,
        response: &TimeResponse,
    ) -> AppResult<()> {
        let path = self.dir.join(file);
        let root = SVGBackend::new(&path, (800, 500)).into_drawing_area();
        root.fill(&WHITE).map_err(figure_err)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(caption, CAPTION_FONT)
            .margin(20)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(
                padded_range(response.t.iter().copied()),
                padded_range(response.y.iter().copied()),
            )
            .map_err(figure_err)?;
        chart
            .configure_mesh()
            .x_desc("Time [s]")
            .y_desc(y_desc)
            .draw()
            .map_err(figure_err)?;
        chart
            .draw_series(LineSeries::new(
                response.t.iter().copied().zip(response.y.iter().copied()),
                &BLUE,
            ))
            .map_err(figure_err)?;

        root.present().map_err(figure_err)
    }
}

impl FigureSink for SvgFigures {
    fn impulse(&mut self, response: &TimeResponse) -> AppResult<()> {
        let caption = caption("Impulse Response", self.scaling.impulse_is_scaled());
        self.line_chart("impulse.svg", &caption, "Amplitude", response)
    }

    fn step(&mut self, response: &TimeResponse) -> AppResult<()> {
        let caption = caption("Step Response", self.scaling.step_is_scaled());
        self.line_chart("step.svg", &caption, "Amplitude", response)
    }

    fn pole_zero(&mut self, map: &PoleZeroMap) -> AppResult<()> {
        let path = self.dir.join("pole_zero.svg");
        let root = SVGBackend::new(&path, (700, 600)).into_drawing_area();
        root.fill(&WHITE).map_err(figure_err)?;

        // The origin stays in view so the imaginary axis is visible.
        let points = || map.poles.iter().chain(&map.zeros);
        let re = padded_range(points().map(|p| p.re).chain([0.0]));
        let im = padded_range(points().map(|p| p.im).chain([0.0]));

        let mut chart = ChartBuilder::on(&root)
            .caption("Pole-Zero Map", CAPTION_FONT)
            .margin(20)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(re, im)
            .map_err(figure_err)?;
        chart
            .configure_mesh()
            .x_desc("Real")
            .y_desc("Imaginary")
            .draw()
            .map_err(figure_err)?;

        chart
            .draw_series(
                map.poles
                    .iter()
                    .map(|p| Cross::new((p.re, p.im), 6, RED.stroke_width(2))),
            )
            .map_err(figure_err)?
            .label("Poles")
            .legend(|(x, y)| Cross::new((x, y), 4, RED.stroke_width(2)));
        chart
            .draw_series(
                map.zeros
                    .iter()
                    .map(|z| Circle::new((z.re, z.im), 6, BLUE.stroke_width(2))),
            )
            .map_err(figure_err)?
            .label("Zeros")
            .legend(|(x, y)| Circle::new((x, y), 4, BLUE.stroke_width(2)));

        chart
            .configure_series_labels()
            .border_style(&BLACK)
            .background_style(&WHITE.mix(0.8))
            .draw()
            .map_err(figure_err)?;

        root.present().map_err(figure_err)
    }

    fn bode(&mut self, response: &FrequencyResponse) -> AppResult<()> {
        let path = self.dir.join("bode.svg");
        let root = SVGBackend::new(&path, (800, 700)).into_drawing_area();
        root.fill(&WHITE).map_err(figure_err)?;
        let root = root.titled("Bode Plot", CAPTION_FONT).map_err(figure_err)?;
        let (upper, lower) = root.split_vertically(320);

        let w = padded_frequencies(&response.w);
        let panels = [
            (&upper, "Magnitude [dB]", &response.magnitude_db),
            (&lower, "Phase [deg]", &response.phase_deg),
        ];
        for (area, y_desc, values) in panels {
            let mut chart = ChartBuilder::on(area)
                .margin(15)
                .x_label_area_size(40)
                .y_label_area_size(60)
                .build_cartesian_2d(w.clone().log_scale(), padded_range(values.iter().copied()))
                .map_err(figure_err)?;
            chart
                .configure_mesh()
                .x_desc("Frequency [rad/s]")
                .y_desc(y_desc)
                .draw()
                .map_err(figure_err)?;
            chart
                .draw_series(LineSeries::new(
                    response.w.iter().copied().zip(values.iter().copied()),
                    &BLUE,
                ))
                .map_err(figure_err)?;
        }

        root.present().map_err(figure_err)
    }
}

fn caption(title: &str, scaled: bool) -> String {
    if scaled {
        format!("{title} (Scaled)")
    } else {
        title.to_string()
    }
}

fn figure_err<E: Display>(e: E) -> AppError {
    AppError::Figure {
        message: e.to_string(),
    }
}

/// Finite extent of `values` with a 5% margin; `[-1, 1]` around a constant.
fn padded_range(values: impl Iterator<Item = f64>) -> Range<f64> {
    let (lo, hi) = values
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    if !lo.is_finite() {
        return -1.0..1.0;
    }
    if hi - lo <= f64::EPSILON * lo.abs().max(1.0) {
        return (lo - 1.0)..(hi + 1.0);
    }
    let pad = 0.05 * (hi - lo);
    (lo - pad)..(hi + pad)
}

/// Positive frequency extent for a log axis.
fn padded_frequencies(w: &[f64]) -> Range<f64> {
    let (lo, hi) = w
        .iter()
        .copied()
        .filter(|v| v.is_finite() && *v > 0.0)
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    if !lo.is_finite() {
        return 0.1..10.0;
    }
    if hi <= lo {
        return (lo / 10.0)..(hi * 10.0);
    }
    lo..hi
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_pads_extent() {
        let r = padded_range([0.0, 10.0].into_iter());
        assert!((r.start + 0.5).abs() < 1e-12);
        assert!((r.end - 10.5).abs() < 1e-12);
    }

    #[test]
    fn range_ignores_nan_and_widens_constants() {
        assert_eq!(padded_range([f64::NAN].into_iter()), -1.0..1.0);
        assert_eq!(padded_range([2.0, 2.0, f64::NAN].into_iter()), 1.0..3.0);
    }

    #[test]
    fn frequency_range_is_positive() {
        assert_eq!(padded_frequencies(&[0.0, 0.01, 100.0]), 0.01..100.0);
        assert_eq!(padded_frequencies(&[]), 0.1..10.0);
    }

    #[test]
    fn captions_mark_scaled_responses() {
        assert_eq!(caption("Step Response", true), "Step Response (Scaled)");
        assert_eq!(caption("Step Response", false), "Step Response");
    }

    #[test]
    fn unscaled_figures_keep_plain_captions() {
        use sysid_app::{IdentificationConfig, analyze, render_figures};

        let dir = std::env::temp_dir().join(format!("sysid-svg-plain-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let scaling = PlotScaling::identity();
        let analysis = analyze(&IdentificationConfig::default().transfer_function().unwrap()).unwrap();
        let mut sink = SvgFigures::new(&dir, &scaling);
        render_figures(&analysis, &scaling, &mut sink).unwrap();

        let step = std::fs::read_to_string(dir.join("step.svg")).unwrap();
        assert!(step.contains("Step Response"));
        assert!(!step.contains("(Scaled)"));
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn writes_all_four_figures() {
        use sysid_app::{IdentificationConfig, analyze, render_figures};

        let dir = std::env::temp_dir().join(format!("sysid-svg-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let config = IdentificationConfig::default();
        let analysis = analyze(&config.transfer_function().unwrap()).unwrap();
        let mut sink = SvgFigures::new(&dir, &config.plot_scaling);
        render_figures(&analysis, &config.plot_scaling, &mut sink).unwrap();

        for file in ["impulse.svg", "step.svg", "pole_zero.svg", "bode.svg"] {
            let content = std::fs::read_to_string(dir.join(file)).unwrap();
            assert!(content.contains("<svg"), "{file} is not an SVG document");
        }
        let impulse = std::fs::read_to_string(dir.join("impulse.svg")).unwrap();
        assert!(impulse.contains("Impulse Response (Scaled)"));
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
