use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Instant;
use tracing::{debug, warn};

use super::record::RatioRecord;
use super::RatioKind;
use crate::config::EngineConfig;
use crate::parallel::maybe_parallel_map;
use crate::statement::{StatementLine, StatementRecord};
use crate::types::{with_metadata, ComputationOutput, RecordKey};
use crate::{FinRatioError, FinRatioResult};

// ---------------------------------------------------------------------------
// Input / Output types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatioInput {
    /// Statements in caller order; (entity_id, fiscal_year) must be unique.
    pub statements: Vec<StatementRecord>,
    #[serde(default)]
    pub config: EngineConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatioOutput {
    /// One record per input statement, same order.
    pub records: Vec<RatioRecord>,
    /// Records where every ratio was derived.
    pub complete_records: usize,
    /// Total per-ratio derivation errors across all records.
    pub ratio_errors: usize,
}

// ---------------------------------------------------------------------------
// Formula table
// ---------------------------------------------------------------------------

/// Numerator of a base ratio.
#[derive(Debug, Clone, Copy)]
enum Numerator {
    Line(StatementLine),
    /// `minuend - subtrahend`
    Difference(StatementLine, StatementLine),
}

/// Numerator and denominator of a base ratio, or `None` for a dependent ratio.
fn base_formula(kind: RatioKind) -> Option<(Numerator, StatementLine)> {
    use Numerator::*;
    use StatementLine as L;

    let formula = match kind {
        RatioKind::CurrentRatio => (Line(L::CurrentAssets), L::CurrentLiabilities),
        RatioKind::QuickRatio => (
            Difference(L::CurrentAssets, L::Inventory),
            L::CurrentLiabilities,
        ),
        RatioKind::CashRatio => (Line(L::CashEquivalents), L::CurrentLiabilities),
        RatioKind::GrossProfitMargin => (Line(L::GrossProfit), L::Revenue),
        RatioKind::OperatingProfitMargin => (Line(L::OperatingIncome), L::Revenue),
        RatioKind::NetProfitMargin => (Line(L::NetIncome), L::Revenue),
        RatioKind::ReturnOnAssets => (Line(L::NetIncome), L::TotalAssets),
        RatioKind::ReturnOnEquity => (Line(L::NetIncome), L::ShareholdersEquity),
        RatioKind::AssetTurnover => (Line(L::Revenue), L::TotalAssets),
        RatioKind::InventoryTurnover => (Line(L::CostOfSales), L::Inventory),
        RatioKind::ReceivablesTurnover => (Line(L::Revenue), L::AccountsReceivable),
        RatioKind::PayablesTurnover => (Line(L::CostOfSales), L::AccountsPayable),
        RatioKind::DebtRatio => (Line(L::TotalLiabilities), L::TotalAssets),
        RatioKind::DebtToEquity => (Line(L::TotalLiabilities), L::ShareholdersEquity),
        RatioKind::EquityMultiplier => (Line(L::TotalAssets), L::ShareholdersEquity),
        RatioKind::DaysInventoryOutstanding
        | RatioKind::DaysSalesOutstanding
        | RatioKind::DaysPayablesOutstanding => return None,
    };
    Some(formula)
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Stateless transformation from statements to derived ratios.
#[derive(Debug, Clone, Default)]
pub struct RatioEngine {
    config: EngineConfig,
}

impl RatioEngine {
    pub fn new(config: EngineConfig) -> FinRatioResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Derive one [`RatioRecord`] per statement, preserving input order.
    ///
    /// Fails with [`FinRatioError::DuplicateKey`] before any computation if two
    /// statements share an (entity, year) key. Degenerate inputs never fail the
    /// batch; they are recorded on the affected ratio only.
    pub fn derive(&self, records: &[StatementRecord]) -> FinRatioResult<Vec<RatioRecord>> {
        ensure_unique_keys(records)?;
        debug!(
            records = records.len(),
            days_in_period = self.config.days_in_period,
            "deriving ratios"
        );
        Ok(maybe_parallel_map(records, &self.config, |r| {
            self.derive_record(r)
        }))
    }

    /// Derive all ratios for a single statement: base ratios, then days-outstanding.
    pub fn derive_record(&self, statement: &StatementRecord) -> RatioRecord {
        let key = statement.key();
        let mut out = RatioRecord::empty(key.clone());

        for kind in RatioKind::ALL.into_iter().filter(|k| !k.is_dependent()) {
            match compute_base(kind, statement, &key) {
                Ok(value) => out.set(kind, value),
                Err(e) => record_failure(&mut out, e),
            }
        }

        let days = self.config.days();
        for kind in RatioKind::ALL.into_iter().filter(|k| k.is_dependent()) {
            match compute_dependent(kind, days, &out, &key) {
                Ok(value) => out.set(kind, value),
                Err(e) => record_failure(&mut out, e),
            }
        }

        out
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Derive ratios with the default (annual, 365-day) configuration.
pub fn derive_ratios(records: &[StatementRecord]) -> FinRatioResult<Vec<RatioRecord>> {
    RatioEngine::default().derive(records)
}

/// Derive ratios for a statement batch and wrap them in the standard envelope.
pub fn calculate_ratios(
    input: &RatioInput,
) -> FinRatioResult<ComputationOutput<RatioOutput>> {
    let start = Instant::now();

    let engine = RatioEngine::new(input.config.clone())?;
    let records = engine.derive(&input.statements)?;

    Ok(build_output(records, &input.config, start))
}

/// Wrap records derived elsewhere (e.g. combined across sources) in the
/// standard envelope.
pub fn summarize(records: Vec<RatioRecord>, config: &EngineConfig) -> ComputationOutput<RatioOutput> {
    build_output(records, config, Instant::now())
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn build_output(
    records: Vec<RatioRecord>,
    config: &EngineConfig,
    start: Instant,
) -> ComputationOutput<RatioOutput> {
    let mut warnings: Vec<String> = Vec::new();

    for record in records.iter().filter(|r| negative_equity(r)) {
        warnings.push(format!(
            "Shareholders' equity is negative for {}; ROE, debt-to-equity and equity multiplier carry the negative sign.",
            record.key()
        ));
    }
    for record in records.iter().filter(|r| !r.is_complete()) {
        warnings.push(format!(
            "{}: {} of {} ratios could not be derived.",
            record.key(),
            record.errors.len(),
            RatioKind::ALL.len()
        ));
    }

    let output = RatioOutput {
        complete_records: records.iter().filter(|r| r.is_complete()).count(),
        ratio_errors: records.iter().map(|r| r.errors.len()).sum(),
        records,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "days_in_period": config.days_in_period,
        "zero_denominator": "ratio reported as error, siblings still derived",
        "negative_denominator": "passed through unmodified",
    });

    with_metadata(
        "Financial statement ratio analysis (liquidity, profitability, efficiency, solvency)",
        &assumptions,
        warnings,
        elapsed,
        output,
    )
}

/// Equity sign read back from the derived ratios: the equity multiplier when
/// present, otherwise debt-to-equity.
fn negative_equity(record: &RatioRecord) -> bool {
    record
        .solvency
        .equity_multiplier
        .or(record.solvency.debt_to_equity)
        .is_some_and(|r| r.is_sign_negative() && !r.is_zero())
}

fn ensure_unique_keys(records: &[StatementRecord]) -> FinRatioResult<()> {
    let mut seen: HashSet<(&str, i32)> = HashSet::with_capacity(records.len());
    for r in records {
        if !seen.insert((r.entity_id.as_str(), r.fiscal_year)) {
            return Err(FinRatioError::DuplicateKey {
                entity_id: r.entity_id.clone(),
                fiscal_year: r.fiscal_year,
            });
        }
    }
    Ok(())
}

fn record_failure(out: &mut RatioRecord, error: FinRatioError) {
    warn!(entity = %out.entity_id, fiscal_year = out.fiscal_year, %error, "ratio not derived");
    out.errors.push(error);
}

fn require(
    statement: &StatementRecord,
    line: StatementLine,
    ratio: RatioKind,
    key: &RecordKey,
) -> FinRatioResult<Decimal> {
    statement
        .value(line)
        .ok_or_else(|| FinRatioError::MissingField {
            entity_id: key.entity_id.clone(),
            fiscal_year: key.fiscal_year,
            ratio,
            field: line,
        })
}

fn compute_base(
    kind: RatioKind,
    statement: &StatementRecord,
    key: &RecordKey,
) -> FinRatioResult<Decimal> {
    let Some((numerator, denominator)) = base_formula(kind) else {
        return Err(FinRatioError::InvalidInput {
            field: kind.name().into(),
            reason: "Not a base ratio.".into(),
        });
    };

    let num = match numerator {
        Numerator::Line(line) => require(statement, line, kind, key)?,
        Numerator::Difference(minuend, subtrahend) => {
            let a = require(statement, minuend, kind, key)?;
            let b = require(statement, subtrahend, kind, key)?;
            a.checked_sub(b).ok_or_else(|| overflow(kind, key))?
        }
    };
    let den = require(statement, denominator, kind, key)?;

    safe_divide(num, den, kind, denominator.field_name(), key)
}

fn compute_dependent(
    kind: RatioKind,
    days: Decimal,
    derived: &RatioRecord,
    key: &RecordKey,
) -> FinRatioResult<Decimal> {
    let Some(dependency) = kind.dependency() else {
        return Err(FinRatioError::InvalidInput {
            field: kind.name().into(),
            reason: "Not a dependent ratio.".into(),
        });
    };
    let turnover = derived
        .get(dependency)
        .ok_or_else(|| FinRatioError::DependencyUnavailable {
            entity_id: key.entity_id.clone(),
            fiscal_year: key.fiscal_year,
            ratio: kind,
            dependency,
        })?;
    safe_divide(days, turnover, kind, dependency.name(), key)
}

fn safe_divide(
    numerator: Decimal,
    denominator: Decimal,
    ratio: RatioKind,
    denominator_name: &str,
    key: &RecordKey,
) -> FinRatioResult<Decimal> {
    if denominator.is_zero() {
        return Err(FinRatioError::DivisionByZero {
            entity_id: key.entity_id.clone(),
            fiscal_year: key.fiscal_year,
            ratio,
            denominator: denominator_name.to_string(),
        });
    }
    numerator
        .checked_div(denominator)
        .ok_or_else(|| overflow(ratio, key))
}

fn overflow(ratio: RatioKind, key: &RecordKey) -> FinRatioError {
    FinRatioError::Overflow {
        entity_id: key.entity_id.clone(),
        fiscal_year: key.fiscal_year,
        ratio,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
