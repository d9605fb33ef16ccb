use std::path::PathBuf;
use std::process::exit;

use clap::Parser;
use scenario_core::summary::export_timeline_csv;
use scenario_core::{generate, ScenarioConfig, ScenarioError};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

// ── CLI definition ─────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(
    name = "scenario-gen",
    about = "Generate traffic demand and disruption control files for a road-traffic simulator",
    long_about = "Merges background traffic with scheduled emergency and accident vehicles into\n\
                  one time-ordered demand file, and writes the matching speed signs and lane\n\
                  closures for every accident into an additional control file."
)]
struct Cli {
    /// Scenario configuration (JSON). Missing fields use the built-in crossroads scenario.
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// RNG seed; overrides the config. Unseeded runs draw from entropy.
    #[arg(long, env = "SCENARIO_SEED")]
    seed: Option<u64>,

    /// Number of background vehicles; overrides the config.
    #[arg(long, short = 'n')]
    vehicles: Option<usize>,

    /// Output path of the vehicle demand document
    #[arg(long, default_value = "generated_vehicles.rou.xml")]
    routes_out: PathBuf,

    /// Output path of the disruption control document
    #[arg(long, default_value = "accident_config.add.xml")]
    additional_out: PathBuf,

    /// Also write the run summary as JSON
    #[arg(long)]
    summary_json: Option<PathBuf>,

    /// Also write the departure timeline as CSV
    #[arg(long)]
    timeline_csv: Option<PathBuf>,

    /// Print the effective configuration as JSON and exit
    #[arg(long)]
    print_config: bool,
}

// ── helpers ────────────────────────────────────────────────────────

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();
}

fn load_config(cli: &Cli) -> Result<ScenarioConfig, ScenarioError> {
    let mut config = match &cli.config {
        Some(path) => {
            info!(path = %path.display(), "loading scenario config");
            ScenarioConfig::from_json_file(path)?
        }
        None => ScenarioConfig::default(),
    };
    if let Some(seed) = cli.seed {
        config = config.with_seed(seed);
    }
    if let Some(count) = cli.vehicles {
        config = config.with_background_count(count);
    }
    Ok(config)
}

fn run(cli: Cli) -> Result<(), ScenarioError> {
    let config = load_config(&cli)?;

    if cli.print_config {
        println!("{}", config.to_json_pretty()?);
        return Ok(());
    }

    let scenario = generate(&config)?;
    scenario.summary.log();
    scenario.write_documents(&cli.routes_out, &cli.additional_out)?;

    if let Some(path) = &cli.summary_json {
        scenario.summary.export_json(path)?;
        info!(path = %path.display(), "summary written");
    }
    if let Some(path) = &cli.timeline_csv {
        export_timeline_csv(&scenario.timeline, path)?;
        info!(path = %path.display(), "timeline written");
    }

    info!(
        "run the simulator with: sumo-gui -n <network>.net.xml -r {} -a {}",
        cli.routes_out.display(),
        cli.additional_out.display()
    );
    Ok(())
}

// ── main ───────────────────────────────────────────────────────────

fn main() {
    init_tracing();
    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        error!("{err}");
        exit(1);
    }
}
