use std::path::Path;
use std::process::{exit, Command, ExitStatus};

use clap::{Parser, Subcommand, ValueEnum};

// ── CLI definition ─────────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "xtask",
    about = "Task runner for the traffic scenario generator workspace",
    long_about = "A unified CLI for generating scenarios, running benchmarks,\n\
                  and CI checks in the scenario generator workspace."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the default crossroads scenario files
    Generate {
        /// RNG seed for a reproducible scenario
        #[arg(long)]
        seed: Option<u64>,
        /// Number of background vehicles
        #[arg(long, default_value_t = 100)]
        vehicles: usize,
        /// Scenario configuration (JSON)
        #[arg(long)]
        config: Option<String>,
    },
    /// Run Criterion benchmarks
    Bench,
    /// Compare benchmarks: stash changes, create baseline, restore, compare
    BenchCompare,
    /// Run CI checks (fmt, clippy, tests, generation smoke run, benchmarks)
    Ci {
        /// Job to run
        #[arg(value_enum, default_value_t = CiJob::Check)]
        job: CiJob,
    },
}

#[derive(Clone, ValueEnum)]
enum CiJob {
    /// Formatting, clippy, and tests
    Check,
    /// Generate a seeded scenario end to end
    Generate,
    /// Run benchmarks
    Bench,
    /// Run check + generate + bench
    All,
}

// ── helpers ────────────────────────────────────────────────────────

fn step(label: &str) {
    eprintln!("\n=== {label} ===");
}

fn cargo(args: &[&str]) -> ExitStatus {
    eprintln!("+ cargo {}", args.join(" "));
    Command::new("cargo")
        .args(args)
        .status()
        .expect("failed to execute cargo")
}

fn git(args: &[&str]) -> ExitStatus {
    eprintln!("+ git {}", args.join(" "));
    Command::new("git")
        .args(args)
        .status()
        .expect("failed to execute git")
}

fn run_cargo(args: &[&str]) {
    let status = cargo(args);
    if !status.success() {
        exit(status.code().unwrap_or(1));
    }
}

fn run_git(args: &[&str]) {
    let status = git(args);
    if !status.success() {
        exit(status.code().unwrap_or(1));
    }
}

fn generate(seed: Option<u64>, vehicles: usize, config: Option<&str>) {
    let vehicles = vehicles.to_string();
    let seed = seed.map(|s| s.to_string());

    let mut args = vec![
        "run",
        "-p",
        "scenario_cli",
        "--release",
        "--",
        "--vehicles",
        &vehicles,
    ];
    if let Some(seed) = &seed {
        args.extend(["--seed", seed.as_str()]);
    }
    if let Some(config) = config {
        args.extend(["--config", config]);
    }
    run_cargo(&args);
}

// ── CI jobs ────────────────────────────────────────────────────────

fn ci_check() {
    step("Check formatting");
    run_cargo(&["fmt", "--all", "--", "--check"]);

    step("Clippy");
    run_cargo(&[
        "clippy",
        "--all-targets",
        "--all-features",
        "--",
        "-D",
        "warnings",
    ]);

    step("Test scenario_core");
    run_cargo(&["test", "-p", "scenario_core"]);

    step("Test scenario_cli");
    run_cargo(&["test", "-p", "scenario_cli"]);
}

fn ci_generate() {
    step("Generate seeded scenario (100 vehicles)");
    let dir = Path::new("target/ci-scenario");
    std::fs::create_dir_all(dir).expect("failed to create target/ci-scenario");
    let routes_out = dir.join("generated_vehicles.rou.xml");
    let additional_out = dir.join("accident_config.add.xml");
    let summary_out = dir.join("summary.json");
    run_cargo(&[
        "run",
        "-p",
        "scenario_cli",
        "--release",
        "--",
        "--seed",
        "42",
        "--routes-out",
        &routes_out.to_string_lossy(),
        "--additional-out",
        &additional_out.to_string_lossy(),
        "--summary-json",
        &summary_out.to_string_lossy(),
    ]);
}

fn ci_bench() {
    step("Run benchmarks");
    run_cargo(&["bench", "--package", "scenario_core", "--bench", "performance"]);
}

// ── main ───────────────────────────────────────────────────────────

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            seed,
            vehicles,
            config,
        } => {
            generate(seed, vehicles, config.as_deref());
        }
        Commands::Bench => {
            run_cargo(&["bench", "--package", "scenario_core", "--bench", "performance"]);
        }
        Commands::BenchCompare => {
            let baseline_dir = Path::new("target/criterion");
            if baseline_dir.exists() {
                step("Removing existing benchmark data");
                std::fs::remove_dir_all(baseline_dir).expect("failed to remove target/criterion");
            }

            step("Stashing current changes");
            run_git(&[
                "stash",
                "push",
                "-m",
                "Temporary stash for benchmark comparison",
            ]);

            step("Running benchmark to create baseline");
            run_cargo(&[
                "bench",
                "--package",
                "scenario_core",
                "--bench",
                "performance",
                "--",
                "--save-baseline",
                "main",
            ]);

            step("Reapplying changes");
            run_git(&["stash", "pop"]);

            step("Running benchmark comparing against baseline");
            run_cargo(&[
                "bench",
                "--package",
                "scenario_core",
                "--bench",
                "performance",
                "--",
                "--baseline",
                "main",
            ]);

            eprintln!("\nDone! Check the output above to see performance comparison.");
        }
        Commands::Ci { job } => {
            match job {
                CiJob::Check => ci_check(),
                CiJob::Generate => ci_generate(),
                CiJob::Bench => ci_bench(),
                CiJob::All => {
                    ci_check();
                    ci_generate();
                    ci_bench();
                }
            }
            eprintln!("\nCI job passed.");
        }
    }
}
