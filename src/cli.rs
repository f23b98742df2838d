//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{info, warn};

use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::text_report_adapter::TextReportAdapter;
use crate::domain::error::LookbackError;
use crate::domain::scenario::Scenario;
use crate::ports::config_port::ConfigPort;
use crate::ports::report_port::ReportPort;

/// Upper bound for `[report] precision`.
const MAX_PRECISION: i64 = 10;

#[derive(Parser, Debug)]
#[command(name = "lookback", about = "Live portfolio valuation")]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Value the portfolio described by a scenario file
    Value {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Load a scenario file and report whether it is valid
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Value { config, output } => run_value(&config, output.as_ref()),
        Command::Validate { config } => run_validate(&config),
    }
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = LookbackError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

/// Report settings from the optional `[report]` section.
pub fn build_report_adapter(config: &dyn ConfigPort) -> TextReportAdapter {
    let requested = config.get_int("report", "precision", 2);
    let precision = requested.clamp(0, MAX_PRECISION);
    if precision != requested {
        warn!(requested, used = precision, "report precision out of range");
    }
    let precision = precision as usize;
    let show_zero = config.get_bool("report", "show_zero", true);
    TextReportAdapter::new(precision, show_zero)
}

fn load_scenario(config_path: &PathBuf) -> Result<(FileConfigAdapter, Scenario), ExitCode> {
    info!(path = %config_path.display(), "loading scenario");
    let adapter = load_config(config_path)?;
    match Scenario::from_config(&adapter) {
        Ok(scenario) => Ok((adapter, scenario)),
        Err(e) => {
            eprintln!("error: {e}");
            Err((&e).into())
        }
    }
}

pub fn run_value(config_path: &PathBuf, output_path: Option<&PathBuf>) -> ExitCode {
    let (adapter, scenario) = match load_scenario(config_path) {
        Ok(loaded) => loaded,
        Err(code) => return code,
    };
    let report = build_report_adapter(&adapter);

    match output_path {
        Some(path) => {
            let path_str = path.display().to_string();
            if let Err(e) = report.write(scenario.portfolio(), &path_str) {
                eprintln!("error: {e}");
                return (&e).into();
            }
            info!(path = %path_str, "report written");
        }
        None => print!("{}", report.render(scenario.portfolio())),
    }
    ExitCode::SUCCESS
}

pub fn run_validate(config_path: &PathBuf) -> ExitCode {
    let (_, scenario) = match load_scenario(config_path) {
        Ok(loaded) => loaded,
        Err(code) => return code,
    };
    let market = scenario.market();
    println!(
        "Scenario valid: {} assets, {} fx rates, {} holdings",
        market.registered_codes().len(),
        market.registered_pairs().len(),
        scenario.portfolio().holding_count()
    );
    ExitCode::SUCCESS
}
