//! Classification of reference scenarios and randomized property checks.

use kessan_data::{Aggregate, BalanceSheet, CashFlow, Dividend, Period, ProfitLoss, Series};
use kessan_rules::{RiskRule, RiskThresholds, assess_risk, is_growing, risky};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

struct Figures {
    revenue: i64,
    ordinary_profit: i64,
    net_profit: i64,
    roe: f64,
    roa: f64,
    retained_earnings: i64,
    short_term_debt: i64,
    long_term_debt: i64,
    equity_ratio: f64,
    operating_cf: i64,
    cash: i64,
    payout: f64,
}

fn aggregate(year: i32, f: &Figures) -> Aggregate {
    Aggregate {
        code: "100A".to_string(),
        period: Period::new(year, 3).unwrap(),
        profit_loss: Some(ProfitLoss {
            revenue: Some(f.revenue),
            operating_profit: f.ordinary_profit + 10,
            ordinary_profit: f.ordinary_profit,
            net_profit: f.net_profit,
            roe: f.roe,
            roa: f.roa,
        }),
        balance_sheet: Some(BalanceSheet {
            retained_earnings: f.retained_earnings,
            short_term_debt: f.short_term_debt,
            long_term_debt: f.long_term_debt,
            equity_ratio: f.equity_ratio,
        }),
        cash_flow: Some(CashFlow {
            operating_cf: f.operating_cf,
            cash_and_equivalents: f.cash,
        }),
        dividend: Some(Dividend {
            payout_ratio: f.payout,
        }),
    }
}

fn first_period() -> Figures {
    Figures {
        revenue: 100,
        ordinary_profit: 80,
        net_profit: 60,
        roe: 12.0,
        roa: 7.0,
        retained_earnings: 100,
        short_term_debt: 300,
        long_term_debt: 600,
        equity_ratio: 25.0,
        operating_cf: 100,
        cash: 1000,
        payout: 30.0,
    }
}

fn second_period() -> Figures {
    Figures {
        revenue: 120,
        ordinary_profit: 100,
        net_profit: 80,
        roe: 11.0,
        roa: 6.0,
        retained_earnings: 200,
        short_term_debt: 200,
        long_term_debt: 500,
        equity_ratio: 35.0,
        operating_cf: 10,
        cash: 800,
        payout: 40.0,
    }
}

#[test]
fn test_scenario_safe_and_growing() {
    let series = Series::new(
        "100A",
        vec![aggregate(2022, &first_period()), aggregate(2023, &second_period())],
    );
    assert!(!risky(&series));
    assert!(is_growing(&series));
}

#[test]
fn test_scenario_risky_and_not_growing() {
    let first = Figures {
        short_term_debt: 500,
        ..first_period()
    };
    let second = Figures {
        revenue: 105,
        ordinary_profit: 85,
        ..second_period()
    };
    let series = Series::new("100A", vec![aggregate(2022, &first), aggregate(2023, &second)]);

    assert!(risky(&series));
    assert!(!is_growing(&series));

    let assessment = assess_risk(&series, &RiskThresholds::default());
    assert_eq!(
        assessment.violated_rules().into_iter().collect::<Vec<_>>(),
        vec![RiskRule::Liquidity]
    );
    assert_eq!(assessment.findings[0].index, 0);
}

#[test]
fn test_reverse_input_order_gives_same_verdict() {
    let series = Series::new(
        "100A",
        vec![aggregate(2023, &second_period()), aggregate(2022, &first_period())],
    );
    assert!(!risky(&series));
    assert!(is_growing(&series));
}

fn random_clean(rng: &mut StdRng, year: i32) -> Aggregate {
    let debt = rng.gen_range(0..1_000);
    let roa = rng.gen_range(1.0..10.0);
    aggregate(
        year,
        &Figures {
            revenue: rng.gen_range(1..10_000),
            ordinary_profit: rng.gen_range(1..1_000),
            net_profit: rng.gen_range(1..1_000),
            roe: roa * rng.gen_range(0.5..2.9),
            roa,
            retained_earnings: rng.gen_range(1..5_000),
            short_term_debt: debt,
            long_term_debt: debt,
            equity_ratio: rng.gen_range(20.0..90.0),
            operating_cf: rng.gen_range(1..1_000),
            cash: 2 * debt + rng.gen_range(1..1_000),
            payout: rng.gen_range(20.5..49.5),
        },
    )
}

fn random_violation(rng: &mut StdRng, year: i32) -> Aggregate {
    let mut aggregate = random_clean(rng, year);
    match rng.gen_range(0..8) {
        0 => aggregate.profit_loss.as_mut().unwrap().net_profit = -rng.gen_range(0..100),
        1 => aggregate.balance_sheet.as_mut().unwrap().retained_earnings = 0,
        2 => aggregate.balance_sheet.as_mut().unwrap().equity_ratio = rng.gen_range(0.0..19.9),
        3 => aggregate.cash_flow.as_mut().unwrap().operating_cf = -rng.gen_range(0..100),
        4 => aggregate.cash_flow.as_mut().unwrap().cash_and_equivalents = 0,
        5 => aggregate.dividend.as_mut().unwrap().payout_ratio = rng.gen_range(50.0..100.0),
        6 => aggregate.cash_flow = None,
        _ => aggregate.profit_loss.as_mut().unwrap().roe = 100.0,
    }
    aggregate
}

#[test]
fn test_risky_is_monotonic_under_added_violations() {
    let mut rng = StdRng::seed_from_u64(0x6b657373);
    for _ in 0..200 {
        let periods = rng.gen_range(1..6);
        let mut aggregates: Vec<Aggregate> = (0..periods)
            .map(|i| random_clean(&mut rng, 2010 + i))
            .collect();
        assert!(!risky(&Series::new("100A", aggregates.clone())));

        let year = rng.gen_range(2000..2030);
        aggregates.retain(|a| a.period.year() != year);
        aggregates.push(random_violation(&mut rng, year));
        assert!(risky(&Series::new("100A", aggregates)));
    }
}

#[test]
fn test_missing_fragment_anywhere_is_risky() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..100 {
        let periods = rng.gen_range(1..6);
        let mut aggregates: Vec<Aggregate> = (0..periods)
            .map(|i| random_clean(&mut rng, 2010 + i))
            .collect();
        let victim = rng.gen_range(0..aggregates.len());
        match rng.gen_range(0..4) {
            0 => aggregates[victim].profit_loss = None,
            1 => aggregates[victim].balance_sheet = None,
            2 => aggregates[victim].cash_flow = None,
            _ => aggregates[victim].dividend = None,
        }
        let series = Series::new("100A", aggregates);
        assert!(risky(&series));
        assert!(assess_risk(&series, &RiskThresholds::default()).is_incomplete());
    }
}

#[test]
fn test_short_series_never_grows() {
    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..50 {
        let single = vec![random_clean(&mut rng, 2023)];
        assert!(!is_growing(&Series::new("100A", single)));
    }
    assert!(!is_growing(&Series::new("100A", Vec::new())));
}
