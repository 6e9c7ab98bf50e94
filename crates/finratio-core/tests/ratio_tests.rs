use finratio_core::ratios::{self, RatioEngine, RatioInput};
use finratio_core::{EngineConfig, FinRatioError, RatioKind, StatementLine, StatementRecord};
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// ===========================================================================
// Fixtures: two reporting entities, two fiscal years each
// ===========================================================================

fn napesco() -> Vec<StatementRecord> {
    vec![
        StatementRecord {
            entity_id: "NAPESCO".into(),
            fiscal_year: 2022,
            revenue: Some(dec!(37184789)),
            cost_of_sales: Some(dec!(27854616)),
            gross_profit: Some(dec!(9330173)),
            operating_income: Some(dec!(7287144)),
            net_income: Some(dec!(6824101)),
            current_assets: Some(dec!(40462604)),
            inventory: Some(dec!(5479455)),
            accounts_receivable: Some(dec!(13366220)),
            cash_equivalents: Some(dec!(2180992)),
            total_assets: Some(dec!(53151614)),
            current_liabilities: Some(dec!(7271369)),
            total_liabilities: Some(dec!(10888314)),
            shareholders_equity: Some(dec!(42263300)),
            operating_cash_flow: Some(dec!(10956411)),
            depreciation: Some(dec!(2183024)),
            accounts_payable: Some(dec!(7057298)),
            eps_fils: Some(dec!(70.35)),
        },
        StatementRecord {
            entity_id: "NAPESCO".into(),
            fiscal_year: 2023,
            revenue: Some(dec!(39522799)),
            cost_of_sales: Some(dec!(28650618)),
            gross_profit: Some(dec!(10872181)),
            operating_income: Some(dec!(9123378)),
            net_income: Some(dec!(8595511)),
            current_assets: Some(dec!(37040597)),
            inventory: Some(dec!(4531445)),
            accounts_receivable: Some(dec!(12655113)),
            cash_equivalents: Some(dec!(2660961)),
            total_assets: Some(dec!(70683248)),
            current_liabilities: Some(dec!(11883710)),
            total_liabilities: Some(dec!(14717109)),
            shareholders_equity: Some(dec!(55966139)),
            operating_cash_flow: Some(dec!(12565079)),
            depreciation: Some(dec!(2535625)),
            accounts_payable: Some(dec!(11650349)),
            eps_fils: Some(dec!(88.66)),
        },
    ]
}

fn ipg() -> Vec<StatementRecord> {
    vec![
        StatementRecord {
            entity_id: "IPG".into(),
            fiscal_year: 2022,
            revenue: Some(dec!(1646039000)),
            cost_of_sales: Some(dec!(1621337000)),
            gross_profit: Some(dec!(24702000)),
            operating_income: Some(dec!(8037000)),
            net_income: Some(dec!(7656000)),
            current_assets: Some(dec!(316031000)),
            inventory: Some(dec!(51741000)),
            accounts_receivable: Some(dec!(72997000)),
            cash_equivalents: Some(dec!(108513000)),
            total_assets: Some(dec!(439037000)),
            current_liabilities: Some(dec!(291838000)),
            total_liabilities: Some(dec!(338975000)),
            shareholders_equity: Some(dec!(100062000)),
            operating_cash_flow: Some(dec!(15399000)),
            depreciation: Some(dec!(1806000)),
            accounts_payable: Some(dec!(90011000)),
            eps_fils: Some(dec!(42.35)),
        },
        StatementRecord {
            entity_id: "IPG".into(),
            fiscal_year: 2023,
            revenue: Some(dec!(1067544000)),
            cost_of_sales: Some(dec!(1049408000)),
            gross_profit: Some(dec!(18136000)),
            operating_income: Some(dec!(8205000)),
            net_income: Some(dec!(7818000)),
            current_assets: Some(dec!(375971000)),
            inventory: Some(dec!(27236000)),
            accounts_receivable: Some(dec!(187345000)),
            cash_equivalents: Some(dec!(79298000)),
            total_assets: Some(dec!(493470000)),
            current_liabilities: Some(dec!(359199000)),
            total_liabilities: Some(dec!(388821000)),
            shareholders_equity: Some(dec!(104649000)),
            operating_cash_flow: Some(dec!(-16691000)),
            depreciation: Some(dec!(1677000)),
            accounts_payable: Some(dec!(149771000)),
            eps_fils: Some(dec!(43.24)),
        },
    ]
}

fn within(actual: Option<Decimal>, expected: Decimal, tol: Decimal) -> bool {
    actual.is_some_and(|a| (a - expected).abs() < tol)
}

// ===========================================================================
// Engine contract
// ===========================================================================

#[test]
fn test_napesco_2023_reference_ratios() {
    let out = ratios::derive_ratios(&napesco()).unwrap();
    let r = &out[1];
    assert_eq!(r.key().to_string(), "NAPESCO / 2023");
    assert!(within(r.liquidity.current_ratio, dec!(3.1169), dec!(0.0001)));
    assert!(within(r.liquidity.quick_ratio, dec!(2.7356), dec!(0.0001)));
    assert!(within(r.liquidity.cash_ratio, dec!(0.2239), dec!(0.0001)));
    assert!(within(r.profitability.gross_profit_margin, dec!(0.2751), dec!(0.0001)));
    assert!(within(r.profitability.net_profit_margin, dec!(0.2175), dec!(0.0001)));
    assert!(within(r.profitability.return_on_assets, dec!(0.1216), dec!(0.0001)));
    assert!(within(r.profitability.return_on_equity, dec!(0.1536), dec!(0.0001)));
    assert!(within(r.efficiency.inventory_turnover, dec!(6.3226), dec!(0.0001)));
    assert!(within(r.efficiency.days_inventory_outstanding, dec!(57.73), dec!(0.005)));
    assert!(within(r.efficiency.days_sales_outstanding, dec!(116.87), dec!(0.005)));
    assert!(within(r.efficiency.days_payables_outstanding, dec!(148.42), dec!(0.005)));
    assert!(within(r.solvency.debt_ratio, dec!(0.2082), dec!(0.0001)));
    assert!(within(r.solvency.equity_multiplier, dec!(1.2630), dec!(0.0001)));
}

#[test]
fn test_output_mirrors_input_order_and_keys() {
    let input: Vec<StatementRecord> = vec![ipg()[1].clone(), napesco()[0].clone(), ipg()[0].clone()];
    let out = ratios::derive_ratios(&input).unwrap();
    assert_eq!(out.len(), input.len());
    for (statement, record) in input.iter().zip(&out) {
        assert_eq!(statement.key(), record.key());
    }
}

#[test]
fn test_negative_operating_cash_flow_is_not_an_error() {
    let out = ratios::derive_ratios(&ipg()).unwrap();
    assert!(out.iter().all(|r| r.is_complete()));
}

#[test]
fn test_duplicate_key_produces_no_output() {
    let mut input = napesco();
    input.push(napesco()[0].clone());
    let err = ratios::derive_ratios(&input).unwrap_err();
    assert_eq!(
        err,
        FinRatioError::DuplicateKey {
            entity_id: "NAPESCO".into(),
            fiscal_year: 2022,
        }
    );
}

#[test]
fn test_zero_current_liabilities_scenario() {
    let mut input = napesco();
    input[0].current_liabilities = Some(Decimal::ZERO);
    let out = ratios::derive_ratios(&input).unwrap();

    let broken = &out[0];
    let mut failed: Vec<RatioKind> = broken.errors.iter().filter_map(|e| e.ratio()).collect();
    failed.sort();
    assert_eq!(
        failed,
        vec![RatioKind::CurrentRatio, RatioKind::QuickRatio, RatioKind::CashRatio]
    );
    assert!(broken.profitability.net_profit_margin.is_some());
    assert!(out[1].is_complete());
}

#[test]
fn test_every_absent_ratio_has_a_named_error() {
    let statement = StatementRecord::new("SPARSE", 2023)
        .with(StatementLine::Revenue, dec!(100))
        .with(StatementLine::NetIncome, dec!(-5))
        .with(StatementLine::Inventory, Decimal::ZERO);
    let out = ratios::derive_ratios(&[statement]).unwrap();
    let r = &out[0];

    for kind in RatioKind::ALL {
        assert_eq!(
            r.get(kind).is_none(),
            r.error_for(kind).is_some(),
            "{kind} presence and error disagree"
        );
    }
    assert_eq!(r.profitability.net_profit_margin, Some(dec!(-0.05)));
}

#[test]
fn test_envelope_round_trips_through_json() {
    let input = RatioInput {
        statements: napesco().into_iter().chain(ipg()).collect(),
        config: EngineConfig::default(),
    };
    let out = ratios::calculate_ratios(&input).unwrap();
    assert_eq!(out.result.complete_records, 4);
    assert_eq!(out.result.ratio_errors, 0);
    assert!(out.warnings.is_empty());

    let json = serde_json::to_value(&out).unwrap();
    assert_eq!(json["result"]["records"][3]["entity_id"], "IPG");
    assert!(json["result"]["records"][0]["liquidity"]["current_ratio"].is_string());
}

#[test]
fn test_input_document_defaults_config() {
    let input: RatioInput = serde_json::from_str(
        r#"{"statements": [{"entity_id": "X", "fiscal_year": 2024, "revenue": 10, "total_assets": 40}]}"#,
    )
    .unwrap();
    assert_eq!(input.config, EngineConfig::default());
    let engine = RatioEngine::new(input.config).unwrap();
    let out = engine.derive(&input.statements).unwrap();
    assert_eq!(out[0].efficiency.asset_turnover, Some(dec!(0.25)));
}

#[cfg(feature = "parallel")]
#[test]
fn test_parallel_and_sequential_agree() {
    let mut batch = Vec::new();
    for year in 1900..2400 {
        let mut s = napesco()[1].clone();
        s.fiscal_year = year;
        s.revenue = Some(dec!(39522799) + Decimal::from(year));
        batch.push(s);
    }
    let sequential = RatioEngine::new(EngineConfig::sequential()).unwrap();
    let parallel = RatioEngine::new(EngineConfig {
        parallel: true,
        parallel_threshold: 1,
        ..EngineConfig::default()
    })
    .unwrap();
    assert_eq!(sequential.derive(&batch).unwrap(), parallel.derive(&batch).unwrap());
}
