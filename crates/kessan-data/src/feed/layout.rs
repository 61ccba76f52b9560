//! Feed kinds and their column layouts.

use crate::statement::FragmentKind;
use derive_more::Display;
use serde::{Deserialize, Serialize};

/// Source feed for one statement type.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedKind {
    /// Profit and loss feed
    #[display("profit-and-loss")]
    ProfitLoss,
    /// Balance sheet feed
    #[display("balance-sheet")]
    BalanceSheet,
    /// Cash flow statement feed
    #[display("cash-flow-statement")]
    CashFlow,
    /// Stock dividend feed
    #[display("stock-dividend")]
    Dividend,
}

impl FeedKind {
    /// Every feed, in ingestion order.
    pub const ALL: [Self; 4] = [
        Self::ProfitLoss,
        Self::BalanceSheet,
        Self::CashFlow,
        Self::Dividend,
    ];

    /// File name the feed is published under.
    pub const fn file_name(&self) -> &'static str {
        match self {
            Self::ProfitLoss => "fy-profit-and-loss.csv",
            Self::BalanceSheet => "fy-balance-sheet.csv",
            Self::CashFlow => "fy-cash-flow-statement.csv",
            Self::Dividend => "fy-stock-dividend.csv",
        }
    }

    /// Aggregate slot the feed fills.
    pub const fn fragment_kind(&self) -> FragmentKind {
        match self {
            Self::ProfitLoss => FragmentKind::ProfitLoss,
            Self::BalanceSheet => FragmentKind::BalanceSheet,
            Self::CashFlow => FragmentKind::CashFlow,
            Self::Dividend => FragmentKind::Dividend,
        }
    }
}

/// Column positions (0-based) in the profit and loss feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfitLossColumns {
    /// Company code
    pub code: usize,
    /// Reporting period
    pub period: usize,
    /// Net sales; `None` for feed generations without it
    pub revenue: Option<usize>,
    /// Operating profit
    pub operating_profit: usize,
    /// Ordinary profit
    pub ordinary_profit: usize,
    /// Net profit
    pub net_profit: usize,
    /// ROE (%)
    pub roe: usize,
    /// ROA (%)
    pub roa: usize,
}

impl Default for ProfitLossColumns {
    fn default() -> Self {
        Self {
            code: 0,
            period: 1,
            revenue: Some(2),
            operating_profit: 3,
            ordinary_profit: 4,
            net_profit: 5,
            roe: 7,
            roa: 8,
        }
    }
}

/// Column positions (0-based) in the balance sheet feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BalanceSheetColumns {
    /// Company code
    pub code: usize,
    /// Reporting period
    pub period: usize,
    /// Retained earnings
    pub retained_earnings: usize,
    /// Short-term debt
    pub short_term_debt: usize,
    /// Long-term debt
    pub long_term_debt: usize,
    /// Equity ratio (%)
    pub equity_ratio: usize,
}

impl Default for BalanceSheetColumns {
    fn default() -> Self {
        Self {
            code: 0,
            period: 1,
            retained_earnings: 5,
            short_term_debt: 6,
            long_term_debt: 7,
            equity_ratio: 9,
        }
    }
}

/// Column positions (0-based) in the cash flow feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CashFlowColumns {
    /// Company code
    pub code: usize,
    /// Reporting period
    pub period: usize,
    /// Operating cash flow
    pub operating_cf: usize,
    /// Cash and cash equivalents
    pub cash_and_equivalents: usize,
}

impl Default for CashFlowColumns {
    fn default() -> Self {
        Self {
            code: 0,
            period: 1,
            operating_cf: 2,
            cash_and_equivalents: 7,
        }
    }
}

/// Column positions (0-based) in the dividend feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DividendColumns {
    /// Company code
    pub code: usize,
    /// Reporting period
    pub period: usize,
    /// Payout ratio (%)
    pub payout_ratio: usize,
}

impl Default for DividendColumns {
    fn default() -> Self {
        Self {
            code: 0,
            period: 1,
            payout_ratio: 5,
        }
    }
}

/// Column layouts for all four feeds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedLayouts {
    /// Profit and loss layout
    pub profit_loss: ProfitLossColumns,
    /// Balance sheet layout
    pub balance_sheet: BalanceSheetColumns,
    /// Cash flow layout
    pub cash_flow: CashFlowColumns,
    /// Dividend layout
    pub dividend: DividendColumns,
}
