use finratio_core::ratios::derive_ratios;
use finratio_core::{RatioKind, StatementRecord};
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn money() -> impl Strategy<Value = Decimal> {
    (1i64..5_000_000_000).prop_map(Decimal::from)
}

fn signed_money() -> impl Strategy<Value = Decimal> {
    (-5_000_000_000i64..5_000_000_000).prop_map(Decimal::from)
}

prop_compose! {
    fn statement(entity: &'static str, year: i32)(
        revenue in money(),
        cost_of_sales in money(),
        net_income in signed_money(),
        current_assets in money(),
        inventory_share in 0u32..=100,
        accounts_receivable in money(),
        cash in money(),
        total_assets in money(),
        current_liabilities in money(),
        total_liabilities in money(),
        equity in signed_money(),
        accounts_payable in money(),
    ) -> StatementRecord {
        let inventory = current_assets * Decimal::from(inventory_share) / dec!(100);
        StatementRecord {
            entity_id: entity.into(),
            fiscal_year: year,
            revenue: Some(revenue),
            cost_of_sales: Some(cost_of_sales),
            gross_profit: Some(revenue - cost_of_sales),
            operating_income: Some(net_income),
            net_income: Some(net_income),
            current_assets: Some(current_assets),
            inventory: Some(inventory),
            accounts_receivable: Some(accounts_receivable),
            cash_equivalents: Some(cash),
            total_assets: Some(total_assets),
            current_liabilities: Some(current_liabilities),
            total_liabilities: Some(total_liabilities),
            shareholders_equity: Some(equity),
            operating_cash_flow: None,
            depreciation: None,
            accounts_payable: Some(accounts_payable),
            eps_fils: None,
        }
    }
}

fn batch() -> impl Strategy<Value = Vec<StatementRecord>> {
    (
        statement("A", 2021),
        statement("A", 2022),
        statement("B", 2021),
        statement("B", 2022),
    )
        .prop_map(|(a, b, c, d)| vec![d, a, c, b])
}

proptest! {
    #[test]
    fn derive_is_deterministic(records in batch()) {
        let first = derive_ratios(&records).unwrap();
        let second = derive_ratios(&records).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn derive_preserves_length_and_order(records in batch()) {
        let out = derive_ratios(&records).unwrap();
        prop_assert_eq!(out.len(), records.len());
        for (i, r) in out.iter().enumerate() {
            prop_assert_eq!(r.key(), records[i].key());
        }
    }

    #[test]
    fn days_times_turnover_is_day_basis(s in statement("A", 2023)) {
        let r = &derive_ratios(&[s]).unwrap()[0];
        for days in [
            RatioKind::DaysInventoryOutstanding,
            RatioKind::DaysSalesOutstanding,
            RatioKind::DaysPayablesOutstanding,
        ] {
            let turnover = days.dependency().unwrap();
            if let (Some(d), Some(t)) = (r.get(days), r.get(turnover)) {
                prop_assert!((d * t - dec!(365)).abs() < dec!(0.0000001), "{} x {} = {}", d, t, d * t);
            }
        }
    }

    #[test]
    fn quick_ratio_never_exceeds_current_ratio(s in statement("A", 2023)) {
        let r = &derive_ratios(&[s]).unwrap()[0];
        let quick = r.liquidity.quick_ratio.unwrap();
        let current = r.liquidity.current_ratio.unwrap();
        prop_assert!(quick <= current);
    }
}
