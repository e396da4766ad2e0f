//! CircuitLab command-line interface.

mod output;

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use circuitlab::{CircuitLab, LabConfig, Layout};
use clap::Parser;

#[derive(Parser)]
#[command(name = "circuitlab")]
#[command(about = "Simulate a breadboard layout", long_about = None)]
#[command(version)]
struct Cli {
    /// Layout file (JSON)
    #[arg(value_name = "LAYOUT")]
    layout: PathBuf,

    /// Lab configuration file (JSON)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Peg rows, overrides the configuration
    #[arg(long)]
    rows: Option<usize>,

    /// Peg columns, overrides the configuration
    #[arg(long)]
    cols: Option<usize>,

    /// Skip netlist validation before solving
    #[arg(long)]
    no_validate: bool,

    /// Show component labels
    #[arg(short, long)]
    labels: bool,

    /// Advance dynamic components this many ticks after loading
    #[arg(short, long, default_value_t = 0)]
    ticks: u32,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = load_config(&cli)?;
    let layout = Layout::load(&cli.layout)
        .with_context(|| format!("Failed to read layout: {}", cli.layout.display()))?;

    let mut lab = CircuitLab::new(config).context("Invalid lab configuration")?;
    if cli.labels {
        lab.toggle_labels();
    }

    let outcome = layout
        .apply(&mut lab)
        .with_context(|| format!("Failed to apply layout: {}", cli.layout.display()))?;
    for rejected in &outcome.rejected {
        log::warn!("skipped {:?}: {}", rejected.request, rejected.error);
    }
    if outcome.placed.is_empty() && !layout.components.is_empty() {
        bail!("no component of {} could be placed", cli.layout.display());
    }

    for tick in 1..=cli.ticks {
        if let Some(report) = lab.tick() {
            log::info!(
                "tick {}: pass {} with {} active circuit(s)",
                tick,
                report.generation,
                report.active_circuits
            );
        }
    }

    let summary = output::Summary::collect(&mut lab);
    if cli.json {
        output::print_json(&summary)?;
    } else {
        output::print_table(&summary);
    }
    Ok(())
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn load_config(cli: &Cli) -> Result<LabConfig> {
    let mut config = match &cli.config {
        Some(path) => LabConfig::load(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?,
        None => LabConfig::default(),
    };
    if let Some(rows) = cli.rows {
        config.rows = rows;
    }
    if let Some(cols) = cli.cols {
        config.cols = cols;
    }
    if cli.no_validate {
        config.validate_netlists = false;
    }
    Ok(config)
}
