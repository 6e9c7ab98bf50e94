use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::RatioKind;
use crate::error::FinRatioError;
use crate::types::{Days, Multiple, Rate, RecordKey};

// ---------------------------------------------------------------------------
// Grouped ratio fields
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LiquidityRatios {
    pub current_ratio: Option<Multiple>,
    pub quick_ratio: Option<Multiple>,
    pub cash_ratio: Option<Multiple>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfitabilityRatios {
    pub gross_profit_margin: Option<Rate>,
    pub operating_profit_margin: Option<Rate>,
    pub net_profit_margin: Option<Rate>,
    pub return_on_assets: Option<Rate>,
    pub return_on_equity: Option<Rate>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EfficiencyRatios {
    pub asset_turnover: Option<Multiple>,
    pub inventory_turnover: Option<Multiple>,
    pub days_inventory_outstanding: Option<Days>,
    pub receivables_turnover: Option<Multiple>,
    pub days_sales_outstanding: Option<Days>,
    pub payables_turnover: Option<Multiple>,
    pub days_payables_outstanding: Option<Days>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SolvencyRatios {
    pub debt_ratio: Option<Rate>,
    pub debt_to_equity: Option<Multiple>,
    pub equity_multiplier: Option<Multiple>,
}

// ---------------------------------------------------------------------------
// RatioRecord
// ---------------------------------------------------------------------------

/// Derived ratios for one entity and fiscal year.
///
/// A ratio is `None` exactly when `errors` holds an entry naming it. Present
/// values are always finite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatioRecord {
    pub entity_id: String,
    pub fiscal_year: i32,
    pub liquidity: LiquidityRatios,
    pub profitability: ProfitabilityRatios,
    pub efficiency: EfficiencyRatios,
    pub solvency: SolvencyRatios,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<FinRatioError>,
}

impl RatioRecord {
    /// A record with every ratio absent and no errors yet.
    pub fn empty(key: RecordKey) -> Self {
        Self {
            entity_id: key.entity_id,
            fiscal_year: key.fiscal_year,
            liquidity: LiquidityRatios::default(),
            profitability: ProfitabilityRatios::default(),
            efficiency: EfficiencyRatios::default(),
            solvency: SolvencyRatios::default(),
            errors: Vec::new(),
        }
    }

    pub fn key(&self) -> RecordKey {
        RecordKey::new(self.entity_id.clone(), self.fiscal_year)
    }

    pub fn get(&self, kind: RatioKind) -> Option<Decimal> {
        *self.slot(kind)
    }

    pub(crate) fn set(&mut self, kind: RatioKind, value: Decimal) {
        *self.slot_mut(kind) = Some(value);
    }

    /// The derivation error recorded against `kind`, if any.
    pub fn error_for(&self, kind: RatioKind) -> Option<&FinRatioError> {
        self.errors.iter().find(|e| e.ratio() == Some(kind))
    }

    pub fn is_complete(&self) -> bool {
        self.errors.is_empty()
    }

    /// Present ratios in catalogue order.
    pub fn values(&self) -> impl Iterator<Item = (RatioKind, Decimal)> + '_ {
        RatioKind::ALL
            .into_iter()
            .filter_map(|k| self.get(k).map(|v| (k, v)))
    }

    fn slot(&self, kind: RatioKind) -> &Option<Decimal> {
        match kind {
            RatioKind::CurrentRatio => &self.liquidity.current_ratio,
            RatioKind::QuickRatio => &self.liquidity.quick_ratio,
            RatioKind::CashRatio => &self.liquidity.cash_ratio,
            RatioKind::GrossProfitMargin => &self.profitability.gross_profit_margin,
            RatioKind::OperatingProfitMargin => &self.profitability.operating_profit_margin,
            RatioKind::NetProfitMargin => &self.profitability.net_profit_margin,
            RatioKind::ReturnOnAssets => &self.profitability.return_on_assets,
            RatioKind::ReturnOnEquity => &self.profitability.return_on_equity,
            RatioKind::AssetTurnover => &self.efficiency.asset_turnover,
            RatioKind::InventoryTurnover => &self.efficiency.inventory_turnover,
            RatioKind::DaysInventoryOutstanding => &self.efficiency.days_inventory_outstanding,
            RatioKind::ReceivablesTurnover => &self.efficiency.receivables_turnover,
            RatioKind::DaysSalesOutstanding => &self.efficiency.days_sales_outstanding,
            RatioKind::PayablesTurnover => &self.efficiency.payables_turnover,
            RatioKind::DaysPayablesOutstanding => &self.efficiency.days_payables_outstanding,
            RatioKind::DebtRatio => &self.solvency.debt_ratio,
            RatioKind::DebtToEquity => &self.solvency.debt_to_equity,
            RatioKind::EquityMultiplier => &self.solvency.equity_multiplier,
        }
    }

    fn slot_mut(&mut self, kind: RatioKind) -> &mut Option<Decimal> {
        match kind {
            RatioKind::CurrentRatio => &mut self.liquidity.current_ratio,
            RatioKind::QuickRatio => &mut self.liquidity.quick_ratio,
            RatioKind::CashRatio => &mut self.liquidity.cash_ratio,
            RatioKind::GrossProfitMargin => &mut self.profitability.gross_profit_margin,
            RatioKind::OperatingProfitMargin => &mut self.profitability.operating_profit_margin,
            RatioKind::NetProfitMargin => &mut self.profitability.net_profit_margin,
            RatioKind::ReturnOnAssets => &mut self.profitability.return_on_assets,
            RatioKind::ReturnOnEquity => &mut self.profitability.return_on_equity,
            RatioKind::AssetTurnover => &mut self.efficiency.asset_turnover,
            RatioKind::InventoryTurnover => &mut self.efficiency.inventory_turnover,
            RatioKind::DaysInventoryOutstanding => &mut self.efficiency.days_inventory_outstanding,
            RatioKind::ReceivablesTurnover => &mut self.efficiency.receivables_turnover,
            RatioKind::DaysSalesOutstanding => &mut self.efficiency.days_sales_outstanding,
            RatioKind::PayablesTurnover => &mut self.efficiency.payables_turnover,
            RatioKind::DaysPayablesOutstanding => &mut self.efficiency.days_payables_outstanding,
            RatioKind::DebtRatio => &mut self.solvency.debt_ratio,
            RatioKind::DebtToEquity => &mut self.solvency.debt_to_equity,
            RatioKind::EquityMultiplier => &mut self.solvency.equity_multiplier,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_set_and_get_round_through_groups() {
        let mut record = RatioRecord::empty(RecordKey::new("ACME", 2023));
        record.set(RatioKind::DaysSalesOutstanding, dec!(116.87));
        assert_eq!(record.efficiency.days_sales_outstanding, Some(dec!(116.87)));
        assert_eq!(record.get(RatioKind::DaysSalesOutstanding), Some(dec!(116.87)));
        assert_eq!(record.values().count(), 1);
    }

    #[test]
    fn test_error_lookup_by_ratio() {
        let mut record = RatioRecord::empty(RecordKey::new("ACME", 2023));
        record.errors.push(FinRatioError::DependencyUnavailable {
            entity_id: "ACME".into(),
            fiscal_year: 2023,
            ratio: RatioKind::DaysInventoryOutstanding,
            dependency: RatioKind::InventoryTurnover,
        });
        assert!(record.error_for(RatioKind::DaysInventoryOutstanding).is_some());
        assert!(record.error_for(RatioKind::InventoryTurnover).is_none());
        assert!(!record.is_complete());
    }

    #[test]
    fn test_errors_omitted_from_json_when_complete() {
        let record = RatioRecord::empty(RecordKey::new("ACME", 2023));
        let json = serde_json::to_value(&record).unwrap();
        assert!(json.get("errors").is_none());
        assert!(json["liquidity"]["current_ratio"].is_null());
    }
}
