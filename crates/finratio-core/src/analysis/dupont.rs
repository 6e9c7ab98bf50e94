//! Three-way DuPont decomposition over derived ratios.
//!
//! ROE = Net Profit Margin x Asset Turnover x Equity Multiplier. The product
//! is compared with the directly derived ROE; the residual is rounding only.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::FinRatioError;
use crate::ratios::{RatioKind, RatioRecord};
use crate::types::{with_metadata, ComputationOutput, Multiple, Rate};
use crate::FinRatioResult;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DupontBreakdown {
    pub entity_id: String,
    pub fiscal_year: i32,
    pub net_profit_margin: Rate,
    pub asset_turnover: Multiple,
    pub equity_multiplier: Multiple,
    /// margin x turnover x multiplier
    pub roe_product: Rate,
    pub roe_derived: Rate,
    pub residual: Decimal,
    pub diagnosis: String,
}

/// Decompose ROE for one record. Fails if any component ratio is absent or
/// the product leaves the decimal range.
pub fn dupont_decomposition(record: &RatioRecord) -> FinRatioResult<DupontBreakdown> {
    let component = |kind: RatioKind| {
        record.get(kind).ok_or_else(|| {
            FinRatioError::InsufficientData(format!(
                "{} unavailable for {}; DuPont decomposition requires it.",
                kind.label(),
                record.key()
            ))
        })
    };

    let net_profit_margin = component(RatioKind::NetProfitMargin)?;
    let asset_turnover = component(RatioKind::AssetTurnover)?;
    let equity_multiplier = component(RatioKind::EquityMultiplier)?;
    let roe_derived = component(RatioKind::ReturnOnEquity)?;

    let overflow = || FinRatioError::Overflow {
        entity_id: record.entity_id.clone(),
        fiscal_year: record.fiscal_year,
        ratio: RatioKind::ReturnOnEquity,
    };
    let roe_product = net_profit_margin
        .checked_mul(asset_turnover)
        .and_then(|x| x.checked_mul(equity_multiplier))
        .ok_or_else(overflow)?;
    let residual = roe_product.checked_sub(roe_derived).ok_or_else(overflow)?;

    Ok(DupontBreakdown {
        entity_id: record.entity_id.clone(),
        fiscal_year: record.fiscal_year,
        net_profit_margin,
        asset_turnover,
        equity_multiplier,
        roe_product,
        roe_derived,
        residual,
        diagnosis: diagnose(net_profit_margin, asset_turnover, equity_multiplier),
    })
}

/// DuPont decomposition for every record that has all components.
pub fn calculate_dupont(
    records: &[RatioRecord],
) -> FinRatioResult<ComputationOutput<Vec<DupontBreakdown>>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let mut breakdowns = Vec::with_capacity(records.len());
    for record in records {
        match dupont_decomposition(record) {
            Ok(b) => breakdowns.push(b),
            Err(e) => warnings.push(e.to_string()),
        }
    }

    if breakdowns.is_empty() {
        return Err(FinRatioError::InsufficientData(
            "No record has the ratios required for DuPont decomposition.".into(),
        ));
    }

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "decomposition": "3-way",
        "components": ["net_profit_margin", "asset_turnover", "equity_multiplier"],
    });

    Ok(with_metadata(
        "DuPont Analysis (3-Way)",
        &assumptions,
        warnings,
        elapsed,
        breakdowns,
    ))
}

fn diagnose(margin: Decimal, turnover: Decimal, multiplier: Decimal) -> String {
    let mut parts = Vec::new();

    if margin < dec!(0.05) {
        parts.push("Low profit margins indicate pricing pressure or cost issues");
    } else if margin > dec!(0.20) {
        parts.push("Strong profit margins suggest competitive advantage");
    }

    if turnover < dec!(0.5) {
        parts.push(
            "Low asset turnover suggests capital-intensive operations or underutilized assets",
        );
    } else if turnover > dec!(2.0) {
        parts.push("High asset turnover indicates efficient asset utilization");
    }

    if multiplier < Decimal::ZERO {
        parts.push("Negative equity makes the leverage component unreliable");
    } else if multiplier > dec!(5.0) {
        parts.push("Very high financial leverage increases financial risk significantly");
    } else if multiplier > dec!(3.0) {
        parts.push("Elevated financial leverage increases risk");
    } else if multiplier < dec!(1.5) {
        parts.push("Conservative leverage with low financial risk");
    }

    if parts.is_empty() {
        "Balanced DuPont profile with no notable concerns".to_string()
    } else {
        parts.join(". ") + "."
    }
}
