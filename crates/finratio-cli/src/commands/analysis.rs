use clap::Args;
use serde_json::Value;

use finratio_core::analysis::comparison::{self, ComparisonInput};
use finratio_core::analysis::{dupont, trend, working_capital};
use finratio_core::RatioKind;

use super::{derive_sources, EngineOverrides, SourceArgs};

/// Arguments for same-year comparison across entities
#[derive(Args)]
pub struct CompareArgs {
    #[command(flatten)]
    pub sources: SourceArgs,

    /// Fiscal year to compare
    #[arg(long)]
    pub year: i32,

    /// Restrict to these ratios (e.g. current_ratio, roe); repeatable
    #[arg(long = "ratio")]
    pub ratios: Vec<RatioKind>,
}

/// Arguments for analyses that run over every derived record
#[derive(Args)]
pub struct RecordsArgs {
    #[command(flatten)]
    pub sources: SourceArgs,
}

pub fn run_compare(
    args: CompareArgs,
    overrides: EngineOverrides,
) -> Result<Value, Box<dyn std::error::Error>> {
    let (records, _) = derive_sources(&args.sources, overrides)?;
    let input = ComparisonInput {
        records,
        fiscal_year: args.year,
        ratios: args.ratios,
    };
    let result = comparison::compare_entities(&input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_cash_cycle(
    args: RecordsArgs,
    overrides: EngineOverrides,
) -> Result<Value, Box<dyn std::error::Error>> {
    let (records, _) = derive_sources(&args.sources, overrides)?;
    let result = working_capital::calculate_cash_conversion(&records)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_dupont(
    args: RecordsArgs,
    overrides: EngineOverrides,
) -> Result<Value, Box<dyn std::error::Error>> {
    let (records, _) = derive_sources(&args.sources, overrides)?;
    let result = dupont::calculate_dupont(&records)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_trend(
    args: RecordsArgs,
    overrides: EngineOverrides,
) -> Result<Value, Box<dyn std::error::Error>> {
    let (records, _) = derive_sources(&args.sources, overrides)?;
    let result = trend::ratio_trends(&records)?;
    Ok(serde_json::to_value(result)?)
}
