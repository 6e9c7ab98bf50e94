//! Raw annual financial-statement line items.
//!
//! A [`StatementRecord`] is one entity's statement for one fiscal year. Every
//! line item is optional so that an absent field can be reported per ratio
//! instead of being inferred.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::{Money, RecordKey};

/// One entity's financial statement for one fiscal period.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatementRecord {
    #[serde(alias = "company", alias = "Company")]
    pub entity_id: String,
    #[serde(alias = "year", alias = "Year")]
    pub fiscal_year: i32,

    // Income statement
    #[serde(default, alias = "Revenue")]
    pub revenue: Option<Money>,
    #[serde(default, alias = "Cost_of_Sales")]
    pub cost_of_sales: Option<Money>,
    #[serde(default, alias = "Gross_Profit")]
    pub gross_profit: Option<Money>,
    #[serde(default, alias = "Operating_Income")]
    pub operating_income: Option<Money>,
    #[serde(default, alias = "Net_Income")]
    pub net_income: Option<Money>,

    // Balance sheet
    #[serde(default, alias = "Current_Assets")]
    pub current_assets: Option<Money>,
    #[serde(default, alias = "Inventory")]
    pub inventory: Option<Money>,
    #[serde(default, alias = "Accounts_Receivable")]
    pub accounts_receivable: Option<Money>,
    #[serde(default, alias = "Cash_Equivalents")]
    pub cash_equivalents: Option<Money>,
    #[serde(default, alias = "Total_Assets")]
    pub total_assets: Option<Money>,
    #[serde(default, alias = "Current_Liabilities")]
    pub current_liabilities: Option<Money>,
    #[serde(default, alias = "Total_Liabilities")]
    pub total_liabilities: Option<Money>,
    #[serde(default, alias = "Shareholders_Equity")]
    pub shareholders_equity: Option<Money>,
    #[serde(default, alias = "Accounts_Payable")]
    pub accounts_payable: Option<Money>,

    // Cash flow and per-share
    #[serde(default, alias = "Operating_Cash_Flow")]
    pub operating_cash_flow: Option<Money>,
    #[serde(default, alias = "Depreciation")]
    pub depreciation: Option<Money>,
    /// Earnings per share in fils. Carried through, never used in ratios.
    #[serde(default, alias = "EPS_Fils")]
    pub eps_fils: Option<Money>,
}

/// Names a single statement line item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatementLine {
    Revenue,
    CostOfSales,
    GrossProfit,
    OperatingIncome,
    NetIncome,
    CurrentAssets,
    Inventory,
    AccountsReceivable,
    CashEquivalents,
    TotalAssets,
    CurrentLiabilities,
    TotalLiabilities,
    ShareholdersEquity,
    OperatingCashFlow,
    Depreciation,
    AccountsPayable,
    EpsFils,
}

impl StatementLine {
    pub const ALL: [StatementLine; 17] = [
        Self::Revenue,
        Self::CostOfSales,
        Self::GrossProfit,
        Self::OperatingIncome,
        Self::NetIncome,
        Self::CurrentAssets,
        Self::Inventory,
        Self::AccountsReceivable,
        Self::CashEquivalents,
        Self::TotalAssets,
        Self::CurrentLiabilities,
        Self::TotalLiabilities,
        Self::ShareholdersEquity,
        Self::OperatingCashFlow,
        Self::Depreciation,
        Self::AccountsPayable,
        Self::EpsFils,
    ];

    /// Field name as it appears in serialised input.
    pub fn field_name(&self) -> &'static str {
        match self {
            Self::Revenue => "revenue",
            Self::CostOfSales => "cost_of_sales",
            Self::GrossProfit => "gross_profit",
            Self::OperatingIncome => "operating_income",
            Self::NetIncome => "net_income",
            Self::CurrentAssets => "current_assets",
            Self::Inventory => "inventory",
            Self::AccountsReceivable => "accounts_receivable",
            Self::CashEquivalents => "cash_equivalents",
            Self::TotalAssets => "total_assets",
            Self::CurrentLiabilities => "current_liabilities",
            Self::TotalLiabilities => "total_liabilities",
            Self::ShareholdersEquity => "shareholders_equity",
            Self::OperatingCashFlow => "operating_cash_flow",
            Self::Depreciation => "depreciation",
            Self::AccountsPayable => "accounts_payable",
            Self::EpsFils => "eps_fils",
        }
    }
}

impl fmt::Display for StatementLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.field_name())
    }
}

impl StatementRecord {
    /// An empty statement for the given key; populate with [`Self::with`].
    pub fn new(entity_id: impl Into<String>, fiscal_year: i32) -> Self {
        Self {
            entity_id: entity_id.into(),
            fiscal_year,
            ..Self::default()
        }
    }

    /// Builder-style setter for a single line item.
    pub fn with(mut self, line: StatementLine, value: Money) -> Self {
        *self.slot_mut(line) = Some(value);
        self
    }

    pub fn key(&self) -> RecordKey {
        RecordKey::new(self.entity_id.clone(), self.fiscal_year)
    }

    pub fn value(&self, line: StatementLine) -> Option<Money> {
        match line {
            StatementLine::Revenue => self.revenue,
            StatementLine::CostOfSales => self.cost_of_sales,
            StatementLine::GrossProfit => self.gross_profit,
            StatementLine::OperatingIncome => self.operating_income,
            StatementLine::NetIncome => self.net_income,
            StatementLine::CurrentAssets => self.current_assets,
            StatementLine::Inventory => self.inventory,
            StatementLine::AccountsReceivable => self.accounts_receivable,
            StatementLine::CashEquivalents => self.cash_equivalents,
            StatementLine::TotalAssets => self.total_assets,
            StatementLine::CurrentLiabilities => self.current_liabilities,
            StatementLine::TotalLiabilities => self.total_liabilities,
            StatementLine::ShareholdersEquity => self.shareholders_equity,
            StatementLine::OperatingCashFlow => self.operating_cash_flow,
            StatementLine::Depreciation => self.depreciation,
            StatementLine::AccountsPayable => self.accounts_payable,
            StatementLine::EpsFils => self.eps_fils,
        }
    }

    fn slot_mut(&mut self, line: StatementLine) -> &mut Option<Money> {
        match line {
            StatementLine::Revenue => &mut self.revenue,
            StatementLine::CostOfSales => &mut self.cost_of_sales,
            StatementLine::GrossProfit => &mut self.gross_profit,
            StatementLine::OperatingIncome => &mut self.operating_income,
            StatementLine::NetIncome => &mut self.net_income,
            StatementLine::CurrentAssets => &mut self.current_assets,
            StatementLine::Inventory => &mut self.inventory,
            StatementLine::AccountsReceivable => &mut self.accounts_receivable,
            StatementLine::CashEquivalents => &mut self.cash_equivalents,
            StatementLine::TotalAssets => &mut self.total_assets,
            StatementLine::CurrentLiabilities => &mut self.current_liabilities,
            StatementLine::TotalLiabilities => &mut self.total_liabilities,
            StatementLine::ShareholdersEquity => &mut self.shareholders_equity,
            StatementLine::OperatingCashFlow => &mut self.operating_cash_flow,
            StatementLine::Depreciation => &mut self.depreciation,
            StatementLine::AccountsPayable => &mut self.accounts_payable,
            StatementLine::EpsFils => &mut self.eps_fils,
        }
    }
}
