//! Risk rule set.
//!
//! A company is risky when *any* period of its series breaks *any* rule.
//! Missing statements count as a breach: an incomplete series is never
//! treated as safe. Adding periods to a series can therefore only turn a
//! clean verdict into a risky one, never the reverse.

use crate::config::RiskThresholds;
use derive_more::Display;
use kessan_data::{Aggregate, FragmentKind, Period, Series};
use serde::Serialize;
use std::collections::BTreeSet;

/// Individual risk checks.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskRule {
    /// Every period carries all four statements
    #[display("completeness")]
    Completeness,
    /// Net profit is positive
    #[display("net_profit")]
    NetProfit,
    /// Retained earnings are positive and the equity ratio is high enough
    #[display("capital")]
    Capital,
    /// Operating cash flow is positive
    #[display("operating_cash_flow")]
    OperatingCashFlow,
    /// Cash exceeds interest-bearing debt
    #[display("liquidity")]
    Liquidity,
    /// Returns are not driven by leverage
    #[display("leverage")]
    Leverage,
    /// Payout ratio is inside the sustainable band
    #[display("payout")]
    Payout,
}

/// What a period did wrong.
#[derive(Debug, Display, Clone, PartialEq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum RiskReason {
    /// Statement not available for the period
    #[display("missing {kind} statement")]
    MissingFragment {
        /// Absent slot
        kind: FragmentKind,
    },
    /// Net profit is zero or negative
    #[display("net profit {net_profit} <= 0")]
    NonPositiveNetProfit {
        /// Reported net profit
        net_profit: i64,
    },
    /// Retained earnings are zero or negative
    #[display("retained earnings {retained_earnings} <= 0")]
    NonPositiveRetainedEarnings {
        /// Reported retained earnings
        retained_earnings: i64,
    },
    /// Equity ratio under the floor
    #[display("equity ratio {equity_ratio}% < {floor}%")]
    LowEquityRatio {
        /// Reported equity ratio (%)
        equity_ratio: f64,
        /// Configured floor (%)
        floor: f64,
    },
    /// Operating cash flow is zero or negative
    #[display("operating cash flow {operating_cf} <= 0")]
    NonPositiveOperatingCashFlow {
        /// Reported operating cash flow
        operating_cf: i64,
    },
    /// Cash does not cover interest-bearing debt
    #[display("cash {cash} <= debt {debt}")]
    LiquidityShortfall {
        /// Cash and equivalents
        cash: i64,
        /// Short-term plus long-term debt
        debt: i64,
    },
    /// ROE is a large multiple of ROA, or ROA is not positive
    #[display("roe {roe}% / roa {roa}% >= {limit}")]
    LeverageDrivenReturns {
        /// Reported ROE (%)
        roe: f64,
        /// Reported ROA (%)
        roa: f64,
        /// Configured limit
        limit: f64,
    },
    /// Payout ratio outside the band
    #[display("payout ratio {payout_ratio}% outside ({low}%, {high}%)")]
    PayoutOutOfBand {
        /// Reported payout ratio (%)
        payout_ratio: f64,
        /// Lower bound (%), exclusive
        low: f64,
        /// Upper bound (%), exclusive
        high: f64,
    },
}

impl RiskReason {
    /// The check this reason belongs to.
    pub const fn rule(&self) -> RiskRule {
        match self {
            Self::MissingFragment { .. } => RiskRule::Completeness,
            Self::NonPositiveNetProfit { .. } => RiskRule::NetProfit,
            Self::NonPositiveRetainedEarnings { .. } | Self::LowEquityRatio { .. } => {
                RiskRule::Capital
            }
            Self::NonPositiveOperatingCashFlow { .. } => RiskRule::OperatingCashFlow,
            Self::LiquidityShortfall { .. } => RiskRule::Liquidity,
            Self::LeverageDrivenReturns { .. } => RiskRule::Leverage,
            Self::PayoutOutOfBand { .. } => RiskRule::Payout,
        }
    }
}

/// A rule breach in one period.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskFinding {
    /// Position of the period in the series
    pub index: usize,
    /// The period
    pub period: Period,
    /// What was wrong
    #[serde(flatten)]
    pub reason: RiskReason,
}

/// Outcome of the risk rule set for one series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskAssessment {
    /// Number of periods evaluated
    pub periods: usize,
    /// Every breach, in period order
    pub findings: Vec<RiskFinding>,
}

impl RiskAssessment {
    /// Whether the company is risky.
    ///
    /// An empty series is risky: nothing observed is not evidence of safety.
    pub fn is_risky(&self) -> bool {
        self.periods == 0 || !self.findings.is_empty()
    }

    /// Whether the risk verdict comes from missing data.
    pub fn is_incomplete(&self) -> bool {
        self.periods == 0
            || self
                .findings
                .iter()
                .any(|f| f.reason.rule() == RiskRule::Completeness)
    }

    /// Distinct rules that were broken.
    pub fn violated_rules(&self) -> BTreeSet<RiskRule> {
        self.findings.iter().map(|f| f.reason.rule()).collect()
    }

    /// Breaches in the period at `index`.
    pub fn findings_at(&self, index: usize) -> impl Iterator<Item = &RiskFinding> {
        self.findings.iter().filter(move |f| f.index == index)
    }
}

/// Run the risk rule set with default thresholds.
pub fn risky(series: &Series) -> bool {
    assess_risk(series, &RiskThresholds::default()).is_risky()
}

/// Run the risk rule set and collect every breach.
pub fn assess_risk(series: &Series, thresholds: &RiskThresholds) -> RiskAssessment {
    let findings = series
        .iter()
        .enumerate()
        .flat_map(|(index, aggregate)| {
            period_reasons(aggregate, thresholds)
                .into_iter()
                .map(move |reason| RiskFinding {
                    index,
                    period: aggregate.period,
                    reason,
                })
        })
        .collect();

    RiskAssessment {
        periods: series.len(),
        findings,
    }
}

fn period_reasons(aggregate: &Aggregate, t: &RiskThresholds) -> Vec<RiskReason> {
    let mut reasons: Vec<RiskReason> = aggregate
        .missing()
        .into_iter()
        .map(|kind| RiskReason::MissingFragment { kind })
        .collect();

    if let Some(pl) = &aggregate.profit_loss {
        if pl.net_profit <= 0 {
            reasons.push(RiskReason::NonPositiveNetProfit {
                net_profit: pl.net_profit,
            });
        }
        if leverage_driven(pl.roe, pl.roa, t.max_roe_to_roa) {
            reasons.push(RiskReason::LeverageDrivenReturns {
                roe: pl.roe,
                roa: pl.roa,
                limit: t.max_roe_to_roa,
            });
        }
    }

    if let Some(bs) = &aggregate.balance_sheet {
        if bs.retained_earnings <= 0 {
            reasons.push(RiskReason::NonPositiveRetainedEarnings {
                retained_earnings: bs.retained_earnings,
            });
        }
        if bs.equity_ratio < t.min_equity_ratio {
            reasons.push(RiskReason::LowEquityRatio {
                equity_ratio: bs.equity_ratio,
                floor: t.min_equity_ratio,
            });
        }
    }

    if let Some(cf) = &aggregate.cash_flow {
        if cf.operating_cf <= 0 {
            reasons.push(RiskReason::NonPositiveOperatingCashFlow {
                operating_cf: cf.operating_cf,
            });
        }
    }

    // needs both statements; a missing one is already reported above
    if let (Some(bs), Some(cf)) = (&aggregate.balance_sheet, &aggregate.cash_flow) {
        let debt = bs.total_debt();
        if cf.cash_and_equivalents <= debt {
            reasons.push(RiskReason::LiquidityShortfall {
                cash: cf.cash_and_equivalents,
                debt,
            });
        }
    }

    if let Some(dividend) = &aggregate.dividend {
        let payout = dividend.payout_ratio;
        if payout <= t.min_payout_ratio || payout >= t.max_payout_ratio {
            reasons.push(RiskReason::PayoutOutOfBand {
                payout_ratio: payout,
                low: t.min_payout_ratio,
                high: t.max_payout_ratio,
            });
        }
    }

    reasons
}

/// ROE/ROA at or above `limit`. A non-positive ROA cannot carry any ROE.
fn leverage_driven(roe: f64, roa: f64, limit: f64) -> bool {
    roa <= 0.0 || roe / roa >= limit
}
