use napi::Result as NapiResult;
use napi_derive::napi;

use finratio_core::analysis::{comparison, dupont, trend, working_capital};
use finratio_core::ratios::{self, RatioInput};
use finratio_core::{RatioKind, RatioRecord};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

fn parse_records(records_json: &str) -> NapiResult<Vec<RatioRecord>> {
    serde_json::from_str(records_json).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Derivation
// ---------------------------------------------------------------------------

/// `{statements, config?}` in, `ComputationOutput<RatioOutput>` out.
#[napi]
pub fn derive_ratios(input_json: String) -> NapiResult<String> {
    let input: RatioInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = ratios::calculate_ratios(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn combine_entities(per_entity_json: String) -> NapiResult<String> {
    let per_entity: Vec<Vec<RatioRecord>> =
        serde_json::from_str(&per_entity_json).map_err(to_napi_error)?;
    let combined = comparison::combine_entities(per_entity).map_err(to_napi_error)?;
    serde_json::to_string(&combined).map_err(to_napi_error)
}

#[napi]
pub fn ratio_catalogue() -> NapiResult<String> {
    let catalogue: Vec<serde_json::Value> = RatioKind::ALL
        .into_iter()
        .map(|k| {
            serde_json::json!({
                "ratio": k,
                "label": k.label(),
                "group": k.group(),
                "formula": k.formula(),
                "preference": k.preference(),
                "percentage": k.is_percentage(),
                "depends_on": k.dependency(),
            })
        })
        .collect();
    serde_json::to_string(&catalogue).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Analysis
// ---------------------------------------------------------------------------

#[napi]
pub fn compare_entities(input_json: String) -> NapiResult<String> {
    let input: comparison::ComparisonInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = comparison::compare_entities(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn cash_conversion_cycle(records_json: String) -> NapiResult<String> {
    let records = parse_records(&records_json)?;
    let output = working_capital::calculate_cash_conversion(&records).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn dupont_decomposition(records_json: String) -> NapiResult<String> {
    let records = parse_records(&records_json)?;
    let output = dupont::calculate_dupont(&records).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn ratio_trends(records_json: String) -> NapiResult<String> {
    let records = parse_records(&records_json)?;
    let output = trend::ratio_trends(&records).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}
