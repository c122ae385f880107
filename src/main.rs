//! Command-line entry point running navigation scenarios headlessly.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use log::info;
use smooth_nav::{init_logging, run_headless, MoveMode, ScenarioFile};

/// Runs a smoothed-versus-raw navigation scenario headlessly
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
    /// Scenario JSON file; the bundled L-corridor demo runs when omitted
    #[arg(short, long)]
    scenario: Option<PathBuf>,
    /// Simulation ticks per second
    #[arg(long, default_value_t = 60)]
    tick_rate: u32,
    /// Upper bound on simulated ticks
    #[arg(long, default_value_t = 6000)]
    max_ticks: u32,
    /// Write the JSON report here instead of standard output
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let file = match &args.scenario {
        Some(path) => ScenarioFile::load(path)
            .with_context(|| format!("loading scenario {}", path.display()))?,
        None => ScenarioFile::demo(),
    };
    let report = run_headless(&file, args.tick_rate, args.max_ticks)?;

    for mode in [MoveMode::Smoothed, MoveMode::Raw] {
        let (count, seconds) = report
            .arrivals(mode)
            .fold((0, 0.0), |(n, total), record| (n + 1, total + record.seconds));
        info!("{mode:?}: {count} arrivals in {seconds:.2}s");
    }

    match &args.output {
        Some(path) => {
            let out = File::create(path)
                .with_context(|| format!("creating report {}", path.display()))?;
            let mut writer = BufWriter::new(out);
            serde_json::to_writer_pretty(&mut writer, &report)?;
            writer.flush()?;
            info!("report written to {}", path.display());
        }
        None => {
            let mut stdout = io::stdout().lock();
            serde_json::to_writer_pretty(&mut stdout, &report)?;
            writeln!(stdout)?;
        }
    }

    if !report.completed {
        bail!(
            "scenario did not complete within {} ticks ({} failures)",
            args.max_ticks,
            report.failures.len()
        );
    }
    Ok(())
}
