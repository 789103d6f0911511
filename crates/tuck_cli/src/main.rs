//! Tuck CLI
//!
//! Runs bottom sheet scenarios against the headless harness and validates
//! sheet configuration files.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use tuck_harness::{run_loaded_scenario, RunConfig, SheetScenario};
use tuck_sheet::SheetConfig;

#[derive(Parser)]
#[command(name = "tuck")]
#[command(author, version, about = "Tuck bottom sheet tooling", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log level when RUST_LOG is not set (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a JSON scenario against a headless sheet
    Run {
        /// Scenario file
        scenario: PathBuf,

        /// Sheet configuration (TOML)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Write the JSON report to this relative path instead of stdout
        #[arg(short, long)]
        report: Option<PathBuf>,

        /// Initial viewport width in pixels (overrides the scenario)
        #[arg(long)]
        width: Option<f32>,
    },

    /// Validate a sheet configuration file and print it with defaults filled in
    CheckConfig {
        /// Sheet configuration (TOML)
        file: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Run {
            scenario,
            config,
            report,
            width,
        } => cmd_run(&scenario, config.as_deref(), report.as_deref(), width),
        Commands::CheckConfig { file } => cmd_check_config(&file),
    };

    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<SheetConfig> {
    match path {
        Some(path) => SheetConfig::from_path(path)
            .with_context(|| format!("failed to load config {}", path.display())),
        None => Ok(SheetConfig::default()),
    }
}

/// Returns whether the scenario passed
fn cmd_run(
    scenario_path: &Path,
    config: Option<&Path>,
    report_path: Option<&Path>,
    width: Option<f32>,
) -> Result<bool> {
    let mut scenario = SheetScenario::from_path(scenario_path)?;
    if width.is_some() {
        scenario.width = width;
    }
    let run_config = RunConfig {
        sheet: load_config(config)?,
        ..RunConfig::default()
    };

    tracing::info!("Running scenario {}", scenario_path.display());
    let outcome = run_loaded_scenario(&scenario, run_config)?;
    let report = outcome.report();

    match report_path {
        Some(path) => {
            report
                .write_to_path(path)
                .with_context(|| format!("failed to write report {}", path.display()))?;
            tracing::info!("Report written to {}", path.display());
        }
        None => report.write_to_writer(&mut std::io::stdout().lock())?,
    }

    if outcome.is_failed() {
        eprintln!(
            "scenario failed at step {} ({}): {}",
            report.failed_step_index.unwrap_or_default(),
            report.step.as_deref().unwrap_or("?"),
            report.message.as_deref().unwrap_or("")
        );
    }
    Ok(!outcome.is_failed())
}

fn cmd_check_config(path: &Path) -> Result<bool> {
    let config = load_config(Some(path))?;
    print!("{}", config.to_toml_string()?);
    Ok(true)
}
