//! Multi-entity tabulation and same-year comparison.
//!
//! The engine derives each entity independently; these adapters concatenate
//! and regroup the results for side-by-side presentation without any
//! cross-entity arithmetic beyond ranking.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Instant;

use crate::error::FinRatioError;
use crate::ratios::{Preference, RatioGroup, RatioKind, RatioRecord};
use crate::types::{with_metadata, ComputationOutput};
use crate::FinRatioResult;

// ---------------------------------------------------------------------------
// Input / Output
// ---------------------------------------------------------------------------

/// All ratio records for one entity, ordered by fiscal year ascending.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityRatios {
    pub entity_id: String,
    pub records: Vec<RatioRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonInput {
    pub records: Vec<RatioRecord>,
    pub fiscal_year: i32,
    /// Ratios to compare; empty means every ratio.
    #[serde(default)]
    pub ratios: Vec<RatioKind>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityValue {
    pub entity_id: String,
    pub value: Option<Decimal>,
}

/// One ratio across every entity reporting in the compared year.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonRow {
    pub ratio: RatioKind,
    pub label: String,
    pub group: RatioGroup,
    pub values: Vec<EntityValue>,
    /// Entity with the most favourable value; first listed wins ties.
    pub leader: Option<String>,
    /// Max minus min across present values (needs at least two).
    pub spread: Option<Decimal>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YearComparison {
    pub fiscal_year: i32,
    pub entities: Vec<String>,
    pub rows: Vec<ComparisonRow>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Concatenate per-entity ratio sequences in the order given.
///
/// Keys must stay unique across the combined table.
pub fn combine_entities(per_entity: Vec<Vec<RatioRecord>>) -> FinRatioResult<Vec<RatioRecord>> {
    let combined: Vec<RatioRecord> = per_entity.into_iter().flatten().collect();
    let mut seen = HashSet::with_capacity(combined.len());
    for r in &combined {
        if !seen.insert(r.key()) {
            return Err(FinRatioError::DuplicateKey {
                entity_id: r.entity_id.clone(),
                fiscal_year: r.fiscal_year,
            });
        }
    }
    Ok(combined)
}

/// Group records by entity (first-appearance order), years ascending.
pub fn group_by_entity(records: &[RatioRecord]) -> Vec<EntityRatios> {
    let mut groups: Vec<EntityRatios> = Vec::new();
    for r in records {
        match groups.iter_mut().find(|g| g.entity_id == r.entity_id) {
            Some(group) => group.records.push(r.clone()),
            None => groups.push(EntityRatios {
                entity_id: r.entity_id.clone(),
                records: vec![r.clone()],
            }),
        }
    }
    for group in &mut groups {
        group.records.sort_by_key(|r| r.fiscal_year);
    }
    groups
}

/// Compare entities side by side for one fiscal year.
pub fn compare_entities(
    input: &ComparisonInput,
) -> FinRatioResult<ComputationOutput<YearComparison>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let in_year: Vec<&RatioRecord> = input
        .records
        .iter()
        .filter(|r| r.fiscal_year == input.fiscal_year)
        .collect();
    if in_year.is_empty() {
        return Err(FinRatioError::InsufficientData(format!(
            "No ratio records for fiscal year {}.",
            input.fiscal_year
        )));
    }
    if in_year.len() < 2 {
        warnings.push(format!(
            "Only one entity reports for {}; leader is trivially that entity.",
            input.fiscal_year
        ));
    }

    let kinds: Vec<RatioKind> = if input.ratios.is_empty() {
        RatioKind::ALL.to_vec()
    } else {
        input.ratios.clone()
    };

    let rows: Vec<ComparisonRow> = kinds
        .iter()
        .map(|&kind| build_row(kind, &in_year, &mut warnings))
        .collect();

    let output = YearComparison {
        fiscal_year: input.fiscal_year,
        entities: in_year.iter().map(|r| r.entity_id.clone()).collect(),
        rows,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "fiscal_year": input.fiscal_year,
        "ranking": "per-ratio preferred direction; absent values are not ranked",
    });

    Ok(with_metadata(
        "Cross-entity ratio comparison",
        &assumptions,
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn build_row(
    kind: RatioKind,
    records: &[&RatioRecord],
    warnings: &mut Vec<String>,
) -> ComparisonRow {
    let values: Vec<EntityValue> = records
        .iter()
        .map(|r| EntityValue {
            entity_id: r.entity_id.clone(),
            value: r.get(kind),
        })
        .collect();

    for v in values.iter().filter(|v| v.value.is_none()) {
        warnings.push(format!("{} is unavailable for {}.", kind.label(), v.entity_id));
    }

    let present: Vec<(&str, Decimal)> = values
        .iter()
        .filter_map(|v| v.value.map(|x| (v.entity_id.as_str(), x)))
        .collect();

    let mut leader: Option<(&str, Decimal)> = None;
    for &(entity, value) in &present {
        let better = match leader {
            None => true,
            Some((_, best)) => match kind.preference() {
                Preference::HigherIsBetter => value > best,
                Preference::LowerIsBetter => value < best,
            },
        };
        if better {
            leader = Some((entity, value));
        }
    }

    let leader = leader.map(|(e, _)| e.to_string());
    let spread = if present.len() >= 2 {
        let max = present.iter().map(|p| p.1).max();
        let min = present.iter().map(|p| p.1).min();
        let spread = max.zip(min).and_then(|(hi, lo)| hi.checked_sub(lo));
        if spread.is_none() {
            warnings.push(format!(
                "{} spread exceeds the decimal range; omitted.",
                kind.label()
            ));
        }
        spread
    } else {
        None
    };

    ComparisonRow {
        ratio: kind,
        label: kind.label().to_string(),
        group: kind.group(),
        values,
        leader,
        spread,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
