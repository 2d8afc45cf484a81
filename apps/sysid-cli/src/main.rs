use clap::Parser;
use std::path::PathBuf;
use sysid_app::{AppResult, IdentificationConfig, NullSink, PipelineReport, run_pipeline};
use tracing::info;

mod svg;

use svg::SvgFigures;

#[derive(Parser)]
#[command(name = "sysid")]
#[command(
    about = "Third-order system identification with particle swarm optimization",
    long_about = None
)]
struct Cli {
    /// YAML configuration file; omitted keys keep the built-in run
    #[arg(long)]
    config: Option<PathBuf>,
    /// Seed for the swarm's random source
    #[arg(long)]
    seed: Option<u64>,
    /// Directory for the SVG figures
    #[arg(long, default_value = "figures")]
    out_dir: PathBuf,
    /// Skip figure output
    #[arg(long)]
    no_plots: bool,
    /// Print the full report as JSON instead of the text summary
    #[arg(long)]
    json: bool,
}

fn main() -> AppResult<()> {
    // Logs go to stderr so --json output stays parseable.
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => IdentificationConfig::load(path)?,
        None => IdentificationConfig::default(),
    };
    if cli.seed.is_some() {
        config.pso.seed = cli.seed;
    }

    let report = if cli.no_plots {
        run_pipeline(&config, &mut NullSink)?
    } else {
        std::fs::create_dir_all(&cli.out_dir)?;
        let mut sink = SvgFigures::new(&cli.out_dir, &config.plot_scaling);
        let report = run_pipeline(&config, &mut sink)?;
        info!(dir = %cli.out_dir.display(), "figures written");
        report
    };

    if cli.json {
        println!("{}", report.to_json()?);
    } else {
        print_summary(&report);
    }
    Ok(())
}

fn print_summary(report: &PipelineReport) {
    let descriptor = &report.descriptor;
    println!(
        "Transfer function: {:?} / {:?}",
        descriptor.numerator, descriptor.denominator
    );
    for p in &descriptor.poles {
        println!("  pole: {:.6} {:+.6}j", p.re, p.im);
    }
    for z in &descriptor.zeros {
        println!("  zero: {:.6} {:+.6}j", z.re, z.im);
    }
    println!("  DC gain: {:.6}", descriptor.dc_gain);

    let id = &report.identification;
    println!("Identified Parameters: {:?}", id.identified.to_array());
    println!("Final Objective Function Value: {}", id.objective);
    println!(
        "  {} iterations, {} evaluations, stopped: {:?} ({:.2}s)",
        id.iterations, id.evaluations, id.termination, id.elapsed_secs
    );
}
