//! Loader configuration and the "not disclosed" sentinel policy.
//!
//! Feeds mark undisclosed figures with a sentinel (`-` by default). What
//! happens to a row carrying one is decided per field:
//!
//! | Policy | Effect |
//! |---|---|
//! | [`SentinelPolicy::SkipRow`] | the row is dropped and reported |
//! | [`SentinelPolicy::Zero`] | the field is read as `0` |
//! | [`SentinelPolicy::Absent`] | the field is stored as not disclosed |
//!
//! `Absent` is only possible for fields a fragment can hold without a value
//! (currently revenue); elsewhere it falls back to `SkipRow`. Code, period and
//! net profit are structurally required and always abort the run.

use super::layout::FeedLayouts;
use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Default "not disclosed" marker.
pub const DEFAULT_SENTINEL: &str = "-";

/// Every field read from the feeds.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    /// Company code
    #[display("code")]
    Code,
    /// Reporting period
    #[display("period")]
    Period,
    /// Net sales
    #[display("revenue")]
    Revenue,
    /// Operating profit
    #[display("operating_profit")]
    OperatingProfit,
    /// Ordinary profit
    #[display("ordinary_profit")]
    OrdinaryProfit,
    /// Net profit
    #[display("net_profit")]
    NetProfit,
    /// Return on equity
    #[display("roe")]
    Roe,
    /// Return on assets
    #[display("roa")]
    Roa,
    /// Retained earnings
    #[display("retained_earnings")]
    RetainedEarnings,
    /// Short-term debt
    #[display("short_term_debt")]
    ShortTermDebt,
    /// Long-term debt
    #[display("long_term_debt")]
    LongTermDebt,
    /// Equity ratio
    #[display("equity_ratio")]
    EquityRatio,
    /// Operating cash flow
    #[display("operating_cf")]
    OperatingCf,
    /// Cash and cash equivalents
    #[display("cash_and_equivalents")]
    CashAndEquivalents,
    /// Dividend payout ratio
    #[display("payout_ratio")]
    PayoutRatio,
}

impl Field {
    /// Fields whose absence aborts ingestion.
    pub const fn is_required(&self) -> bool {
        matches!(self, Self::Code | Self::Period | Self::NetProfit)
    }

    /// Fields a supplied fragment may leave undisclosed.
    pub const fn may_be_absent(&self) -> bool {
        matches!(self, Self::Revenue)
    }
}

/// What to do with an undisclosed optional field.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SentinelPolicy {
    /// Drop the whole row
    #[display("skip-row")]
    SkipRow,
    /// Read the field as zero
    #[display("zero")]
    Zero,
    /// Keep the fragment and leave the field empty
    #[display("absent")]
    Absent,
}

/// Settings for [`FeedLoader`](super::FeedLoader).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Marker for undisclosed values. Empty cells are treated the same way.
    pub sentinel: String,
    /// Whether the first row of every feed is a header.
    pub has_headers: bool,
    /// Policy for optional fields without an override.
    pub default_policy: SentinelPolicy,
    /// Per-field overrides.
    pub policies: HashMap<Field, SentinelPolicy>,
    /// Column layouts.
    pub layouts: FeedLayouts,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            sentinel: DEFAULT_SENTINEL.to_string(),
            has_headers: true,
            default_policy: SentinelPolicy::SkipRow,
            policies: HashMap::from([(Field::Revenue, SentinelPolicy::Absent)]),
            layouts: FeedLayouts::default(),
        }
    }
}

impl LoaderConfig {
    /// Effective policy for an optional field.
    pub fn policy_for(&self, field: Field) -> SentinelPolicy {
        let policy = self
            .policies
            .get(&field)
            .copied()
            .unwrap_or(self.default_policy);
        if policy == SentinelPolicy::Absent && !field.may_be_absent() {
            SentinelPolicy::SkipRow
        } else {
            policy
        }
    }

    /// Set the policy for one field.
    pub fn with_policy(mut self, field: Field, policy: SentinelPolicy) -> Self {
        self.policies.insert(field, policy);
        self
    }

    /// Whether a trimmed cell means "not disclosed".
    pub fn is_undisclosed(&self, cell: &str) -> bool {
        cell.is_empty() || cell == self.sentinel
    }
}
