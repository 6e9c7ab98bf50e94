use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::comparison::group_by_entity;
use crate::error::FinRatioError;
use crate::ratios::{Preference, RatioKind, RatioRecord};
use crate::types::{with_metadata, ComputationOutput};
use crate::FinRatioResult;

/// Absolute changes smaller than this are reported as stable.
const STABLE_BAND: Decimal = dec!(0.0001);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrendDirection {
    Improving,
    Deteriorating,
    Stable,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatioChange {
    pub ratio: RatioKind,
    pub from: Option<Decimal>,
    pub to: Option<Decimal>,
    /// `to - from`; absent if either side is absent or the difference
    /// exceeds the decimal range.
    pub change: Option<Decimal>,
    pub direction: Option<TrendDirection>,
}

/// Changes between two consecutive fiscal years of one entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodChange {
    pub entity_id: String,
    pub from_year: i32,
    pub to_year: i32,
    pub changes: Vec<RatioChange>,
}

/// Period-over-period change of every ratio, per entity.
///
/// Records are grouped by entity and ordered by fiscal year before pairing;
/// an entity with a single year produces no periods.
pub fn ratio_trends(
    records: &[RatioRecord],
) -> FinRatioResult<ComputationOutput<Vec<PeriodChange>>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let groups = group_by_entity(records);
    let mut periods = Vec::new();
    for group in &groups {
        if group.records.len() < 2 {
            warnings.push(format!(
                "{} has a single fiscal year; no trend available.",
                group.entity_id
            ));
            continue;
        }
        for pair in group.records.windows(2) {
            let period = period_change(&pair[0], &pair[1]);
            for c in period.changes.iter().filter(|c| overflowed(c)) {
                warnings.push(format!(
                    "{} {}-{}: {} change exceeds the decimal range; omitted.",
                    period.entity_id,
                    period.from_year,
                    period.to_year,
                    c.ratio.label()
                ));
            }
            periods.push(period);
        }
    }

    if periods.is_empty() {
        return Err(FinRatioError::InsufficientData(
            "Trend analysis requires at least two fiscal years for one entity.".into(),
        ));
    }

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "stable_band": STABLE_BAND.to_string(),
        "pairing": "consecutive fiscal years per entity",
    });

    Ok(with_metadata(
        "Period-over-period ratio trend",
        &assumptions,
        warnings,
        elapsed,
        periods,
    ))
}

/// Change of every ratio from `prior` to `current`.
pub fn period_change(prior: &RatioRecord, current: &RatioRecord) -> PeriodChange {
    let changes = RatioKind::ALL
        .into_iter()
        .map(|kind| {
            let from = prior.get(kind);
            let to = current.get(kind);
            let change = from.zip(to).and_then(|(a, b)| b.checked_sub(a));
            RatioChange {
                ratio: kind,
                from,
                to,
                change,
                direction: change.map(|c| classify(c, kind.preference())),
            }
        })
        .collect();

    PeriodChange {
        entity_id: current.entity_id.clone(),
        from_year: prior.fiscal_year,
        to_year: current.fiscal_year,
        changes,
    }
}

fn overflowed(change: &RatioChange) -> bool {
    change.from.is_some() && change.to.is_some() && change.change.is_none()
}

fn classify(change: Decimal, preference: Preference) -> TrendDirection {
    if change.abs() < STABLE_BAND {
        return TrendDirection::Stable;
    }
    match (preference, change > Decimal::ZERO) {
        (Preference::HigherIsBetter, true) | (Preference::LowerIsBetter, false) => {
            TrendDirection::Improving
        }
        _ => TrendDirection::Deteriorating,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RecordKey;

    fn record(entity: &str, year: i32, current: Decimal, dso: Decimal) -> RatioRecord {
        let mut r = RatioRecord::empty(RecordKey::new(entity, year));
        r.liquidity.current_ratio = Some(current);
        r.efficiency.days_sales_outstanding = Some(dso);
        r
    }

    fn change_for(p: &PeriodChange, kind: RatioKind) -> &RatioChange {
        p.changes.iter().find(|c| c.ratio == kind).unwrap()
    }

    #[test]
    fn test_directions_follow_preference() {
        let p = period_change(
            &record("NAPESCO", 2022, dec!(5.56), dec!(131.2)),
            &record("NAPESCO", 2023, dec!(3.12), dec!(116.9)),
        );
        let cr = change_for(&p, RatioKind::CurrentRatio);
        assert_eq!(cr.change, Some(dec!(-2.44)));
        assert_eq!(cr.direction, Some(TrendDirection::Deteriorating));

        // Collecting faster is an improvement.
        let dso = change_for(&p, RatioKind::DaysSalesOutstanding);
        assert_eq!(dso.direction, Some(TrendDirection::Improving));

        let absent = change_for(&p, RatioKind::DebtRatio);
        assert_eq!(absent.change, None);
        assert_eq!(absent.direction, None);
    }

    #[test]
    fn test_small_moves_are_stable() {
        let p = period_change(
            &record("IPG", 2022, dec!(1.08290), dec!(16.2)),
            &record("IPG", 2023, dec!(1.08295), dec!(16.2)),
        );
        assert_eq!(
            change_for(&p, RatioKind::CurrentRatio).direction,
            Some(TrendDirection::Stable)
        );
    }

    #[test]
    fn test_trends_pair_years_per_entity_regardless_of_input_order() {
        let records = vec![
            record("IPG", 2023, dec!(1.05), dec!(64)),
            record("NAPESCO", 2022, dec!(5.56), dec!(131)),
            record("IPG", 2022, dec!(1.08), dec!(16)),
            record("NAPESCO", 2023, dec!(3.12), dec!(117)),
        ];
        let out = ratio_trends(&records).unwrap();
        assert_eq!(out.result.len(), 2);
        assert_eq!(out.result[0].entity_id, "IPG");
        assert_eq!((out.result[0].from_year, out.result[0].to_year), (2022, 2023));
    }

    #[test]
    fn test_single_year_entities_warn_or_fail() {
        let only = vec![record("IPG", 2023, dec!(1.05), dec!(64))];
        assert!(ratio_trends(&only).is_err());

        let mixed = vec![
            record("IPG", 2022, dec!(1.08), dec!(16)),
            record("IPG", 2023, dec!(1.05), dec!(64)),
            record("ACME", 2023, dec!(2.0), dec!(30)),
        ];
        let out = ratio_trends(&mixed).unwrap();
        assert!(out.warnings.iter().any(|w| w.starts_with("ACME")));
    }

    #[test]
    fn test_change_outside_decimal_range_is_omitted() {
        let mut prior = RatioRecord::empty(RecordKey::new("ACME", 2022));
        prior.profitability.return_on_equity = Some(dec!(-50000000000000000000000000000));
        prior.liquidity.current_ratio = Some(dec!(1.2));
        let mut current = RatioRecord::empty(RecordKey::new("ACME", 2023));
        current.profitability.return_on_equity = Some(dec!(50000000000000000000000000000));
        current.liquidity.current_ratio = Some(dec!(1.5));

        let out = ratio_trends(&[prior, current]).unwrap();
        let period = &out.result[0];
        let roe = change_for(period, RatioKind::ReturnOnEquity);
        assert_eq!(roe.change, None);
        assert_eq!(roe.direction, None);
        assert_eq!(
            change_for(period, RatioKind::CurrentRatio).change,
            Some(dec!(0.3))
        );
        assert!(out
            .warnings
            .iter()
            .any(|w| w.starts_with("ACME 2022-2023: Return on Equity change")));
    }
}
