use std::process::{exit, Command, ExitStatus};

use clap::{Parser, Subcommand, ValueEnum};

// ── CLI definition ─────────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "xtask",
    about = "Task runner for the ride matching workspace",
    long_about = "A unified CLI for running load experiments, benchmarks,\n\
                  and CI checks in the ride matching workspace."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the contention experiment with default parameters
    Run,
    /// Run a large contention experiment (1 000 drivers, 2 000 requests)
    RunLarge,
    /// Run Criterion benchmarks
    Bench,
    /// Run load tests (ignored tests in match_core)
    LoadTest,
    /// Run CI checks (fmt, clippy, tests, benchmarks)
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
    /// Run benchmarks
    Bench,
    /// Run check + bench
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

fn run_cargo(args: &[&str]) {
    let status = cargo(args);
    if !status.success() {
        exit(status.code().unwrap_or(1));
    }
}

// ── CI jobs ────────────────────────────────────────────────────────

fn ci_check() {
    step("Formatting");
    run_cargo(&["fmt", "--all", "--", "--check"]);

    step("Clippy");
    run_cargo(&["clippy", "--workspace", "--all-targets", "--", "-D", "warnings"]);

    step("Tests");
    run_cargo(&["test", "--workspace"]);
}

fn ci_bench() {
    step("Benchmarks");
    run_cargo(&["bench", "-p", "match_core"]);
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run => {
            run_cargo(&["run", "-p", "match_experiments", "--release"]);
        }
        Commands::RunLarge => {
            run_cargo(&[
                "run",
                "-p",
                "match_experiments",
                "--release",
                "--",
                "--drivers",
                "1000",
                "--riders",
                "2000",
                "--complete",
            ]);
        }
        Commands::Bench => {
            run_cargo(&["bench", "-p", "match_core"]);
        }
        Commands::LoadTest => {
            run_cargo(&[
                "test",
                "-p",
                "match_core",
                "--release",
                "--",
                "--ignored",
            ]);
        }
        Commands::Ci { job } => {
            match job {
                CiJob::Check => ci_check(),
                CiJob::Bench => ci_bench(),
                CiJob::All => {
                    ci_check();
                    ci_bench();
                }
            }
            eprintln!("\nCI job passed.");
        }
    }
}
