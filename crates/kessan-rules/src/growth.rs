//! Growth rule set.
//!
//! Every check is universal: a single failing period or period pair anywhere
//! in the series makes the company non-growing.

use crate::config::GrowthThresholds;
use derive_more::Display;
use kessan_data::{Period, ProfitLoss, Series};
use serde::Serialize;

/// Why a period or period pair does not count as growth.
#[derive(Debug, Display, Clone, PartialEq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum GrowthReason {
    /// Profit and loss statement not available
    #[display("missing profit-and-loss statement")]
    MissingProfitLoss,
    /// Revenue not disclosed for this pair
    #[display("revenue not disclosed")]
    MissingRevenue,
    /// Ordinary profit grew too little, shrank, or started from zero or below
    #[display("ordinary profit {previous} -> {current} below required growth")]
    OrdinaryProfitGrowth {
        /// Prior period value
        previous: i64,
        /// This period value
        current: i64,
        /// `current / previous`, when `previous` is positive
        ratio: Option<f64>,
    },
    /// Revenue grew too little, shrank, or started from zero or below
    #[display("revenue {previous} -> {current} below required growth")]
    RevenueGrowth {
        /// Prior period value
        previous: i64,
        /// This period value
        current: i64,
        /// `current / previous`, when `previous` is positive
        ratio: Option<f64>,
    },
    /// ROE under the floor
    #[display("roe {roe}% < {floor}%")]
    LowRoe {
        /// Reported ROE (%)
        roe: f64,
        /// Configured floor (%)
        floor: f64,
    },
    /// ROA under the floor
    #[display("roa {roa}% < {floor}%")]
    LowRoa {
        /// Reported ROA (%)
        roa: f64,
        /// Configured floor (%)
        floor: f64,
    },
}

impl GrowthReason {
    /// Registry name of the check that failed.
    pub const fn rule_name(&self) -> &'static str {
        match self {
            Self::MissingProfitLoss => "history",
            Self::MissingRevenue | Self::RevenueGrowth { .. } => "revenue_growth",
            Self::OrdinaryProfitGrowth { .. } => "ordinary_profit_growth",
            Self::LowRoe { .. } => "roe_floor",
            Self::LowRoa { .. } => "roa_floor",
        }
    }
}

/// A growth failure located in the series.
///
/// Pair checks are reported at the later period of the pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GrowthFailure {
    /// Position of the period in the series
    pub index: usize,
    /// The period
    pub period: Period,
    /// What failed
    #[serde(flatten)]
    pub reason: GrowthReason,
}

/// Outcome of the growth rule set for one series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GrowthAssessment {
    /// Number of periods evaluated
    pub periods: usize,
    /// Periods needed before growth can be judged
    pub required_periods: usize,
    /// Every failure, in period order
    pub failures: Vec<GrowthFailure>,
}

impl GrowthAssessment {
    /// Whether the company is growing.
    pub fn is_growing(&self) -> bool {
        !self.too_short() && self.failures.is_empty()
    }

    /// Whether the series is too short to judge.
    pub const fn too_short(&self) -> bool {
        self.periods < self.required_periods
    }
}

/// Run the growth rule set with default thresholds.
pub fn is_growing(series: &Series) -> bool {
    assess_growth(series, &GrowthThresholds::default()).is_growing()
}

/// Run the growth rule set and collect every failure.
///
/// At least two periods are always required, whatever the configuration says;
/// growth needs something to grow from.
pub fn assess_growth(series: &Series, thresholds: &GrowthThresholds) -> GrowthAssessment {
    let aggregates = series.as_slice();
    let mut failures = Vec::new();
    let mut fail = |index: usize, reason: GrowthReason| {
        failures.push(GrowthFailure {
            index,
            period: aggregates[index].period,
            reason,
        });
    };

    for (index, aggregate) in aggregates.iter().enumerate() {
        let Some(pl) = &aggregate.profit_loss else {
            fail(index, GrowthReason::MissingProfitLoss);
            continue;
        };

        if pl.roe < thresholds.min_roe {
            fail(
                index,
                GrowthReason::LowRoe {
                    roe: pl.roe,
                    floor: thresholds.min_roe,
                },
            );
        }
        if pl.roa < thresholds.min_roa {
            fail(
                index,
                GrowthReason::LowRoa {
                    roa: pl.roa,
                    floor: thresholds.min_roa,
                },
            );
        }

        if index == 0 {
            continue;
        }
        // a missing previous statement is already reported at its own index
        let Some(prev) = &aggregates[index - 1].profit_loss else {
            continue;
        };

        for reason in pair_reasons(prev, pl, thresholds.min_growth_ratio) {
            fail(index, reason);
        }
    }

    GrowthAssessment {
        periods: aggregates.len(),
        required_periods: thresholds.min_periods.max(2),
        failures,
    }
}

fn pair_reasons(prev: &ProfitLoss, next: &ProfitLoss, min_ratio: f64) -> Vec<GrowthReason> {
    let mut reasons = Vec::new();

    let (previous, current) = (prev.ordinary_profit, next.ordinary_profit);
    if !grows(previous, current, min_ratio) {
        reasons.push(GrowthReason::OrdinaryProfitGrowth {
            previous,
            current,
            ratio: growth_ratio(previous, current),
        });
    }

    match (prev.revenue, next.revenue) {
        (Some(previous), Some(current)) => {
            if !grows(previous, current, min_ratio) {
                reasons.push(GrowthReason::RevenueGrowth {
                    previous,
                    current,
                    ratio: growth_ratio(previous, current),
                });
            }
        }
        _ => reasons.push(GrowthReason::MissingRevenue),
    }

    reasons
}

/// `current / previous`; undefined unless `previous` is positive.
fn growth_ratio(previous: i64, current: i64) -> Option<f64> {
    (previous > 0).then(|| current as f64 / previous as f64)
}

/// Strict increase, both sides non-negative, by at least `min_ratio`.
fn grows(previous: i64, current: i64, min_ratio: f64) -> bool {
    previous >= 0
        && current > previous
        && growth_ratio(previous, current).is_some_and(|ratio| ratio >= min_ratio)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use kessan_data::Aggregate;
    use rstest::rstest;

    fn period(year: i32) -> Aggregate {
        Aggregate::new("6861", Period::new(year, 3).unwrap())
    }

    fn with_pl(year: i32, revenue: Option<i64>, ordinary_profit: i64, roe: f64, roa: f64) -> Aggregate {
        let mut aggregate = period(year);
        aggregate.profit_loss = Some(ProfitLoss {
            revenue,
            operating_profit: ordinary_profit,
            ordinary_profit,
            net_profit: ordinary_profit / 2,
            roe,
            roa,
        });
        aggregate
    }

    fn grower(year: i32, revenue: i64, ordinary_profit: i64) -> Aggregate {
        with_pl(year, Some(revenue), ordinary_profit, 12.0, 6.0)
    }

    fn assess(aggregates: Vec<Aggregate>) -> GrowthAssessment {
        assess_growth(&Series::new("6861", aggregates), &GrowthThresholds::default())
    }

    #[test]
    fn test_steady_growth() {
        let assessment = assess(vec![
            grower(2021, 100, 80),
            grower(2022, 120, 100),
            grower(2023, 150, 125),
        ]);
        assert!(assessment.is_growing());
    }

    #[rstest]
    #[case(vec![])]
    #[case(vec![grower(2023, 100, 80)])]
    fn test_too_few_periods(#[case] aggregates: Vec<Aggregate>) {
        let assessment = assess(aggregates);
        assert!(assessment.too_short());
        assert!(!assessment.is_growing());
    }

    #[test]
    fn test_min_periods_cannot_go_below_two() {
        let thresholds = GrowthThresholds {
            min_periods: 0,
            ..GrowthThresholds::default()
        };
        let series = Series::new("6861", vec![grower(2023, 100, 80)]);
        assert!(!assess_growth(&series, &thresholds).is_growing());
    }

    #[test]
    fn test_longer_required_history() {
        let thresholds = GrowthThresholds {
            min_periods: 3,
            ..GrowthThresholds::default()
        };
        let series = Series::new("6861", vec![grower(2022, 100, 80), grower(2023, 120, 100)]);
        let assessment = assess_growth(&series, &thresholds);
        assert!(assessment.failures.is_empty());
        assert!(!assessment.is_growing());
    }

    #[rstest]
    #[case(100, 108, true)]
    #[case(100, 107, false)]
    #[case(100, 100, false)]
    #[case(100, 90, false)]
    #[case(0, 10, false)]
    #[case(-10, 10, false)]
    #[case(-20, -10, false)]
    fn test_ordinary_profit_growth(#[case] previous: i64, #[case] current: i64, #[case] ok: bool) {
        let assessment = assess(vec![grower(2022, 100, previous), grower(2023, 200, current)]);
        assert_eq!(assessment.is_growing(), ok);
    }

    #[test]
    fn test_revenue_growth_failure_records_ratio() {
        let assessment = assess(vec![grower(2022, 100, 80), grower(2023, 105, 100)]);
        assert!(!assessment.is_growing());
        assert_eq!(assessment.failures.len(), 1);

        let failure = &assessment.failures[0];
        assert_eq!(failure.index, 1);
        match failure.reason {
            GrowthReason::RevenueGrowth {
                previous,
                current,
                ratio,
            } => {
                assert_eq!((previous, current), (100, 105));
                assert_relative_eq!(ratio.unwrap(), 1.05);
            }
            ref other => panic!("unexpected reason {other:?}"),
        }
    }

    #[test]
    fn test_non_positive_prior_has_no_ratio() {
        let assessment = assess(vec![grower(2022, 100, 0), grower(2023, 200, 50)]);
        assert!(matches!(
            assessment.failures[0].reason,
            GrowthReason::OrdinaryProfitGrowth { ratio: None, .. }
        ));
    }

    #[test]
    fn test_missing_profit_loss() {
        let assessment = assess(vec![grower(2021, 100, 80), period(2022), grower(2023, 150, 125)]);
        assert!(!assessment.is_growing());
        assert_eq!(assessment.failures.len(), 1);
        assert_eq!(assessment.failures[0].reason, GrowthReason::MissingProfitLoss);
        assert_eq!(assessment.failures[0].index, 1);
    }

    #[test]
    fn test_missing_revenue() {
        let assessment = assess(vec![
            grower(2022, 100, 80),
            with_pl(2023, None, 100, 12.0, 6.0),
        ]);
        assert_eq!(assessment.failures.len(), 1);
        assert_eq!(assessment.failures[0].reason, GrowthReason::MissingRevenue);
    }

    #[rstest]
    #[case(9.9, 6.0)]
    #[case(12.0, 4.9)]
    fn test_profitability_floors(#[case] roe: f64, #[case] roa: f64) {
        // the weak period is the first one, which has no pair of its own
        let assessment = assess(vec![
            with_pl(2022, Some(100), 80, roe, roa),
            grower(2023, 120, 100),
        ]);
        assert!(!assessment.is_growing());
        assert_eq!(assessment.failures[0].index, 0);
    }

    #[test]
    fn test_order_of_input_does_not_matter() {
        let assessment = assess(vec![grower(2023, 120, 100), grower(2022, 100, 80)]);
        assert!(assessment.is_growing());
    }

    #[test]
    fn test_rule_names_are_registered() {
        let reasons = [
            GrowthReason::MissingProfitLoss,
            GrowthReason::MissingRevenue,
            GrowthReason::LowRoe {
                roe: 1.0,
                floor: 10.0,
            },
            GrowthReason::LowRoa {
                roa: 1.0,
                floor: 5.0,
            },
            GrowthReason::OrdinaryProfitGrowth {
                previous: 1,
                current: 1,
                ratio: Some(1.0),
            },
        ];
        for reason in reasons {
            assert!(crate::registry::get_rule_info(reason.rule_name()).is_some());
        }
    }

    #[test]
    fn test_is_growing_uses_defaults() {
        let series = Series::new("6861", vec![grower(2022, 100, 80), grower(2023, 120, 100)]);
        assert!(is_growing(&series));
    }
}
