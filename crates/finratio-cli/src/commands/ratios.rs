use clap::Args;
use serde_json::Value;

use finratio_core::ratios::{self, RatioInput};

use super::{derive_sources, EngineOverrides, SourceArgs};
use crate::input;

/// Arguments for ratio derivation
#[derive(Args)]
pub struct DeriveArgs {
    #[command(flatten)]
    pub sources: SourceArgs,
}

pub fn run_derive(
    args: DeriveArgs,
    overrides: EngineOverrides,
) -> Result<Value, Box<dyn std::error::Error>> {
    // A single source keeps its embedded config and gets the full envelope.
    if args.sources.input.len() <= 1 {
        let mut ratio_input: RatioInput =
            input::load_ratio_input(args.sources.input.first().map(String::as_str))?;
        ratio_input.config = overrides.apply(ratio_input.config);
        let result = ratios::calculate_ratios(&ratio_input)?;
        return Ok(serde_json::to_value(result)?);
    }

    let (records, config) = derive_sources(&args.sources, overrides)?;
    let result = ratios::summarize(records, &config);
    Ok(serde_json::to_value(result)?)
}
