use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::FinRatioError;
use crate::ratios::{RatioKind, RatioRecord};
use crate::types::{with_metadata, ComputationOutput, Days};
use crate::FinRatioResult;

/// Cash conversion cycle for one entity-year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashConversionCycle {
    pub entity_id: String,
    pub fiscal_year: i32,
    pub dio: Option<Days>,
    pub dso: Option<Days>,
    pub dpo: Option<Days>,
    /// DIO + DSO - DPO; absent if any component is absent or the sum
    /// exceeds the decimal range.
    pub ccc: Option<Days>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub missing: Vec<RatioKind>,
}

/// Cash conversion cycle from an already-derived ratio record.
pub fn cash_conversion_cycle(record: &RatioRecord) -> CashConversionCycle {
    let dio = record.efficiency.days_inventory_outstanding;
    let dso = record.efficiency.days_sales_outstanding;
    let dpo = record.efficiency.days_payables_outstanding;

    let missing: Vec<RatioKind> = [
        (RatioKind::DaysInventoryOutstanding, dio),
        (RatioKind::DaysSalesOutstanding, dso),
        (RatioKind::DaysPayablesOutstanding, dpo),
    ]
    .into_iter()
    .filter(|(_, v)| v.is_none())
    .map(|(k, _)| k)
    .collect();

    let ccc = match (dio, dso, dpo) {
        (Some(i), Some(s), Some(p)) => i.checked_add(s).and_then(|x| x.checked_sub(p)),
        _ => None,
    };

    CashConversionCycle {
        entity_id: record.entity_id.clone(),
        fiscal_year: record.fiscal_year,
        dio,
        dso,
        dpo,
        ccc,
        missing,
    }
}

/// Cash conversion cycle for every record, in input order.
pub fn calculate_cash_conversion(
    records: &[RatioRecord],
) -> FinRatioResult<ComputationOutput<Vec<CashConversionCycle>>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if records.is_empty() {
        return Err(FinRatioError::InsufficientData(
            "At least one ratio record is required.".into(),
        ));
    }

    let cycles: Vec<CashConversionCycle> = records.iter().map(cash_conversion_cycle).collect();

    for c in &cycles {
        if c.ccc.is_none() && c.missing.is_empty() {
            warnings.push(format!(
                "{} / {}: cycle exceeds the decimal range; omitted.",
                c.entity_id, c.fiscal_year
            ));
        } else if c.ccc.is_none() {
            let names: Vec<&str> = c.missing.iter().map(|k| k.name()).collect();
            warnings.push(format!(
                "{} / {}: cycle undefined, missing {}.",
                c.entity_id,
                c.fiscal_year,
                names.join(", ")
            ));
        } else if c.ccc.is_some_and(|d| d.is_sign_negative()) {
            warnings.push(format!(
                "{} / {}: negative cycle, suppliers finance operations.",
                c.entity_id, c.fiscal_year
            ));
        }
    }

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({ "formula": "DIO + DSO - DPO" });

    Ok(with_metadata(
        "Cash Conversion Cycle (DIO + DSO - DPO)",
        &assumptions,
        warnings,
        elapsed,
        cycles,
    ))
}
