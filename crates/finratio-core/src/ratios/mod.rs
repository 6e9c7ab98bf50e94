//! Ratio catalogue, derived ratio records, and the derivation engine.

pub mod engine;
pub mod record;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::FinRatioError;

pub use engine::{
    calculate_ratios, derive_ratios, summarize, RatioEngine, RatioInput, RatioOutput,
};
pub use record::{
    EfficiencyRatios, LiquidityRatios, ProfitabilityRatios, RatioRecord, SolvencyRatios,
};

/// Analytical family a ratio belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RatioGroup {
    Liquidity,
    Profitability,
    Efficiency,
    Solvency,
}

/// Which way a ratio moves when the underlying position improves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Preference {
    HigherIsBetter,
    LowerIsBetter,
}

/// Every ratio the engine derives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RatioKind {
    CurrentRatio,
    QuickRatio,
    CashRatio,
    GrossProfitMargin,
    OperatingProfitMargin,
    NetProfitMargin,
    ReturnOnAssets,
    ReturnOnEquity,
    AssetTurnover,
    InventoryTurnover,
    DaysInventoryOutstanding,
    ReceivablesTurnover,
    DaysSalesOutstanding,
    PayablesTurnover,
    DaysPayablesOutstanding,
    DebtRatio,
    DebtToEquity,
    EquityMultiplier,
}

impl RatioKind {
    /// All ratios in table order: liquidity, profitability, efficiency, solvency.
    pub const ALL: [RatioKind; 18] = [
        Self::CurrentRatio,
        Self::QuickRatio,
        Self::CashRatio,
        Self::GrossProfitMargin,
        Self::OperatingProfitMargin,
        Self::NetProfitMargin,
        Self::ReturnOnAssets,
        Self::ReturnOnEquity,
        Self::AssetTurnover,
        Self::InventoryTurnover,
        Self::DaysInventoryOutstanding,
        Self::ReceivablesTurnover,
        Self::DaysSalesOutstanding,
        Self::PayablesTurnover,
        Self::DaysPayablesOutstanding,
        Self::DebtRatio,
        Self::DebtToEquity,
        Self::EquityMultiplier,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::CurrentRatio => "current_ratio",
            Self::QuickRatio => "quick_ratio",
            Self::CashRatio => "cash_ratio",
            Self::GrossProfitMargin => "gross_profit_margin",
            Self::OperatingProfitMargin => "operating_profit_margin",
            Self::NetProfitMargin => "net_profit_margin",
            Self::ReturnOnAssets => "return_on_assets",
            Self::ReturnOnEquity => "return_on_equity",
            Self::AssetTurnover => "asset_turnover",
            Self::InventoryTurnover => "inventory_turnover",
            Self::DaysInventoryOutstanding => "days_inventory_outstanding",
            Self::ReceivablesTurnover => "receivables_turnover",
            Self::DaysSalesOutstanding => "days_sales_outstanding",
            Self::PayablesTurnover => "payables_turnover",
            Self::DaysPayablesOutstanding => "days_payables_outstanding",
            Self::DebtRatio => "debt_ratio",
            Self::DebtToEquity => "debt_to_equity",
            Self::EquityMultiplier => "equity_multiplier",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::CurrentRatio => "Current Ratio",
            Self::QuickRatio => "Quick Ratio",
            Self::CashRatio => "Cash Ratio",
            Self::GrossProfitMargin => "Gross Profit Margin",
            Self::OperatingProfitMargin => "Operating Profit Margin",
            Self::NetProfitMargin => "Net Profit Margin",
            Self::ReturnOnAssets => "Return on Assets",
            Self::ReturnOnEquity => "Return on Equity",
            Self::AssetTurnover => "Asset Turnover",
            Self::InventoryTurnover => "Inventory Turnover",
            Self::DaysInventoryOutstanding => "Days Inventory Outstanding",
            Self::ReceivablesTurnover => "Receivables Turnover",
            Self::DaysSalesOutstanding => "Days Sales Outstanding",
            Self::PayablesTurnover => "Payables Turnover",
            Self::DaysPayablesOutstanding => "Days Payables Outstanding",
            Self::DebtRatio => "Debt Ratio",
            Self::DebtToEquity => "Debt to Equity",
            Self::EquityMultiplier => "Equity Multiplier",
        }
    }

    pub fn group(&self) -> RatioGroup {
        match self {
            Self::CurrentRatio | Self::QuickRatio | Self::CashRatio => RatioGroup::Liquidity,
            Self::GrossProfitMargin
            | Self::OperatingProfitMargin
            | Self::NetProfitMargin
            | Self::ReturnOnAssets
            | Self::ReturnOnEquity => RatioGroup::Profitability,
            Self::AssetTurnover
            | Self::InventoryTurnover
            | Self::DaysInventoryOutstanding
            | Self::ReceivablesTurnover
            | Self::DaysSalesOutstanding
            | Self::PayablesTurnover
            | Self::DaysPayablesOutstanding => RatioGroup::Efficiency,
            Self::DebtRatio | Self::DebtToEquity | Self::EquityMultiplier => RatioGroup::Solvency,
        }
    }

    /// Human-readable formula, as listed in the ratio table.
    pub fn formula(&self) -> &'static str {
        match self {
            Self::CurrentRatio => "current_assets / current_liabilities",
            Self::QuickRatio => "(current_assets - inventory) / current_liabilities",
            Self::CashRatio => "cash_equivalents / current_liabilities",
            Self::GrossProfitMargin => "gross_profit / revenue",
            Self::OperatingProfitMargin => "operating_income / revenue",
            Self::NetProfitMargin => "net_income / revenue",
            Self::ReturnOnAssets => "net_income / total_assets",
            Self::ReturnOnEquity => "net_income / shareholders_equity",
            Self::AssetTurnover => "revenue / total_assets",
            Self::InventoryTurnover => "cost_of_sales / inventory",
            Self::DaysInventoryOutstanding => "days_in_period / inventory_turnover",
            Self::ReceivablesTurnover => "revenue / accounts_receivable",
            Self::DaysSalesOutstanding => "days_in_period / receivables_turnover",
            Self::PayablesTurnover => "cost_of_sales / accounts_payable",
            Self::DaysPayablesOutstanding => "days_in_period / payables_turnover",
            Self::DebtRatio => "total_liabilities / total_assets",
            Self::DebtToEquity => "total_liabilities / shareholders_equity",
            Self::EquityMultiplier => "total_assets / shareholders_equity",
        }
    }

    /// The turnover ratio a days-outstanding ratio is derived from.
    pub fn dependency(&self) -> Option<RatioKind> {
        match self {
            Self::DaysInventoryOutstanding => Some(Self::InventoryTurnover),
            Self::DaysSalesOutstanding => Some(Self::ReceivablesTurnover),
            Self::DaysPayablesOutstanding => Some(Self::PayablesTurnover),
            _ => None,
        }
    }

    pub fn is_dependent(&self) -> bool {
        self.dependency().is_some()
    }

    /// Margins, returns and the debt ratio are rates; everything else is a multiple or a day count.
    pub fn is_percentage(&self) -> bool {
        matches!(
            self,
            Self::GrossProfitMargin
                | Self::OperatingProfitMargin
                | Self::NetProfitMargin
                | Self::ReturnOnAssets
                | Self::ReturnOnEquity
                | Self::DebtRatio
        )
    }

    pub fn preference(&self) -> Preference {
        match self {
            Self::DaysInventoryOutstanding
            | Self::DaysSalesOutstanding
            | Self::DebtRatio
            | Self::DebtToEquity
            | Self::EquityMultiplier => Preference::LowerIsBetter,
            // Includes DPO: slower supplier payment preserves cash.
            _ => Preference::HigherIsBetter,
        }
    }
}

impl fmt::Display for RatioKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RatioKind {
    type Err = FinRatioError;

    /// Accepts snake_case names plus the short forms `roa`, `roe`, `dio`, `dso`, `dpo`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalised = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        let alias = match normalised.as_str() {
            "roa" => Some(Self::ReturnOnAssets),
            "roe" => Some(Self::ReturnOnEquity),
            "dio" => Some(Self::DaysInventoryOutstanding),
            "dso" => Some(Self::DaysSalesOutstanding),
            "dpo" => Some(Self::DaysPayablesOutstanding),
            _ => None,
        };
        alias
            .or_else(|| Self::ALL.into_iter().find(|k| k.name() == normalised))
            .ok_or_else(|| FinRatioError::InvalidInput {
                field: "ratio".into(),
                reason: format!("Unknown ratio '{s}'"),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalogue_covers_every_group() {
        let count = |g| RatioKind::ALL.iter().filter(|k| k.group() == g).count();
        assert_eq!(count(RatioGroup::Liquidity), 3);
        assert_eq!(count(RatioGroup::Profitability), 5);
        assert_eq!(count(RatioGroup::Efficiency), 7);
        assert_eq!(count(RatioGroup::Solvency), 3);
    }

    #[test]
    fn test_days_ratios_depend_on_turnover() {
        let dependents: Vec<_> = RatioKind::ALL.iter().filter(|k| k.is_dependent()).collect();
        assert_eq!(dependents.len(), 3);
        assert_eq!(
            RatioKind::DaysSalesOutstanding.dependency(),
            Some(RatioKind::ReceivablesTurnover)
        );
        assert!(RatioKind::InventoryTurnover.dependency().is_none());
    }

    #[test]
    fn test_parse_names_and_aliases() {
        assert_eq!("roe".parse::<RatioKind>().unwrap(), RatioKind::ReturnOnEquity);
        assert_eq!(
            "Current-Ratio".parse::<RatioKind>().unwrap(),
            RatioKind::CurrentRatio
        );
        assert_eq!(
            "days_payables_outstanding".parse::<RatioKind>().unwrap(),
            RatioKind::DaysPayablesOutstanding
        );
        assert!("ebitda_margin".parse::<RatioKind>().is_err());
    }

    #[test]
    fn test_serde_name_matches_display() {
        for kind in RatioKind::ALL {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{kind}\""));
        }
    }
}
