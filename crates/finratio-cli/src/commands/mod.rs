pub mod analysis;
pub mod ratios;

use clap::Args;
use tracing::debug;

use finratio_core::analysis::comparison::combine_entities;
use finratio_core::ratios::RatioInput;
use finratio_core::{EngineConfig, FinRatioError, FinRatioResult, RatioEngine, RatioRecord};

use crate::input;

/// Statement sources shared by every command that derives ratios.
#[derive(Args, Debug, Clone)]
pub struct SourceArgs {
    /// Statement file (.json, .yaml, .csv); repeat once per entity to combine
    #[arg(long)]
    pub input: Vec<String>,
}

/// Engine settings given on the command line; they win over file config.
#[derive(Debug, Clone, Copy, Default)]
pub struct EngineOverrides {
    pub days_in_period: Option<u32>,
    pub sequential: bool,
}

impl EngineOverrides {
    pub fn apply(&self, mut config: EngineConfig) -> EngineConfig {
        if let Some(days) = self.days_in_period {
            config = config.with_days_in_period(days);
        }
        if self.sequential {
            config.parallel = false;
        }
        config
    }
}

/// Derive ratios for every source, then combine them into one table.
pub fn derive_sources(
    sources: &SourceArgs,
    overrides: EngineOverrides,
) -> Result<(Vec<RatioRecord>, EngineConfig), Box<dyn std::error::Error>> {
    let loaded = if sources.input.is_empty() {
        vec![("stdin".to_string(), input::load_ratio_input(None)?)]
    } else {
        sources
            .input
            .iter()
            .map(|p| Ok((p.clone(), input::load_ratio_input(Some(p.as_str()))?)))
            .collect::<Result<Vec<_>, Box<dyn std::error::Error>>>()?
    };
    Ok(combine_sources(loaded, overrides)?)
}

/// Derive each source with its own config and concatenate the results.
///
/// Every source must resolve to the same day-count basis, which is the one
/// reported for the combined table.
pub fn combine_sources(
    loaded: Vec<(String, RatioInput)>,
    overrides: EngineOverrides,
) -> FinRatioResult<(Vec<RatioRecord>, EngineConfig)> {
    let mut per_source = Vec::with_capacity(loaded.len());
    let mut combined_config: Option<EngineConfig> = None;

    for (source, ratio_input) in loaded {
        let config = overrides.apply(ratio_input.config);
        if let Some(first) = &combined_config {
            if first.days_in_period != config.days_in_period {
                return Err(FinRatioError::InvalidInput {
                    field: "days_in_period".into(),
                    reason: format!(
                        "{} uses {} days but earlier sources use {}; pass --days-in-period to align them",
                        source, config.days_in_period, first.days_in_period
                    ),
                });
            }
        }

        let engine = RatioEngine::new(config.clone())?;
        let records = engine.derive(&ratio_input.statements)?;
        debug!(source = %source, records = records.len(), "derived source");
        per_source.push(records);
        if combined_config.is_none() {
            combined_config = Some(config);
        }
    }

    Ok((
        combine_entities(per_source)?,
        combined_config.unwrap_or_default(),
    ))
}
