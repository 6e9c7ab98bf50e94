mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

use commands::analysis::{CompareArgs, RecordsArgs};
use commands::ratios::DeriveArgs;
use commands::EngineOverrides;

/// Financial statement ratio analysis
#[derive(Parser)]
#[command(
    name = "finratio",
    version,
    about = "Financial statement ratio analysis",
    long_about = "Derives liquidity, profitability, efficiency and solvency ratios \
                  from annual financial statements with decimal precision. Reads \
                  JSON, YAML or CSV statements and supports multi-entity comparison, \
                  cash conversion cycle, DuPont decomposition and trend analysis."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Day-count basis for days-outstanding ratios (default 365)
    #[arg(long, global = true)]
    days_in_period: Option<u32>,

    /// Derive on the calling thread only
    #[arg(long, global = true)]
    sequential: bool,

    /// Log per-ratio derivation detail to stderr
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Derive every ratio for each statement
    Derive(DeriveArgs),
    /// Compare entities side by side for one fiscal year
    Compare(CompareArgs),
    /// Cash conversion cycle (DIO + DSO - DPO)
    CashCycle(RecordsArgs),
    /// Three-way DuPont decomposition of ROE
    Dupont(RecordsArgs),
    /// Period-over-period ratio changes per entity
    Trend(RecordsArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let overrides = EngineOverrides {
        days_in_period: cli.days_in_period,
        sequential: cli.sequential,
    };
    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Derive(args) => commands::ratios::run_derive(args, overrides),
        Commands::Compare(args) => commands::analysis::run_compare(args, overrides),
        Commands::CashCycle(args) => commands::analysis::run_cash_cycle(args, overrides),
        Commands::Dupont(args) => commands::analysis::run_dupont(args, overrides),
        Commands::Trend(args) => commands::analysis::run_trend(args, overrides),
        Commands::Version => {
            println!("finratio {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
