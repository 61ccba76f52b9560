//! Rule thresholds.

use serde::{Deserialize, Serialize};

/// Thresholds for the risk rule set.
///
/// The sign checks (net profit, retained earnings, operating cash flow) and
/// the liquidity check compare against zero and debt and are not configurable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskThresholds {
    /// Equity ratio (%) below which a period is risky (default: 20)
    pub min_equity_ratio: f64,
    /// ROE / ROA at or above which returns are considered leverage-driven (default: 3.0)
    pub max_roe_to_roa: f64,
    /// Payout ratio (%) at or below which dividends are unsustainably low (default: 20)
    pub min_payout_ratio: f64,
    /// Payout ratio (%) at or above which dividends are unsustainably high (default: 50)
    pub max_payout_ratio: f64,
}

impl Default for RiskThresholds {
    fn default() -> Self {
        Self {
            min_equity_ratio: 20.0,
            max_roe_to_roa: 3.0,
            min_payout_ratio: 20.0,
            max_payout_ratio: 50.0,
        }
    }
}

/// Thresholds for the growth rule set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrowthThresholds {
    /// Minimum period-over-period ratio for ordinary profit and revenue (default: 1.08)
    pub min_growth_ratio: f64,
    /// ROE (%) floor for every period (default: 10)
    pub min_roe: f64,
    /// ROA (%) floor for every period (default: 5)
    pub min_roa: f64,
    /// Minimum number of periods (default: 2)
    pub min_periods: usize,
}

impl Default for GrowthThresholds {
    fn default() -> Self {
        Self {
            min_growth_ratio: 1.08,
            min_roe: 10.0,
            min_roa: 5.0,
            min_periods: 2,
        }
    }
}

/// Thresholds for both rule sets.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleConfig {
    /// Risk thresholds
    pub risk: RiskThresholds,
    /// Growth thresholds
    pub growth: GrowthThresholds,
}
