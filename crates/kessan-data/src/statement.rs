//! Statement fragments.
//!
//! Each feed contributes one fragment type per company and period. Monetary
//! amounts are kept as the integers the feeds publish; ratios are percentages
//! (`25.0` means 25%).

use derive_more::{Display, From};
use serde::{Deserialize, Serialize};

/// Profit and loss statement figures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfitLoss {
    /// Net sales. Only published by later feed generations.
    pub revenue: Option<i64>,
    /// Operating profit
    pub operating_profit: i64,
    /// Ordinary profit (operating profit plus non-operating items)
    pub ordinary_profit: i64,
    /// Net profit attributable to owners
    pub net_profit: i64,
    /// Return on equity (%)
    pub roe: f64,
    /// Return on assets (%)
    pub roa: f64,
}

/// Balance sheet figures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceSheet {
    /// Retained earnings
    pub retained_earnings: i64,
    /// Short-term interest-bearing debt
    pub short_term_debt: i64,
    /// Long-term interest-bearing debt
    pub long_term_debt: i64,
    /// Equity ratio (%)
    pub equity_ratio: f64,
}

impl BalanceSheet {
    /// Short-term plus long-term debt.
    pub const fn total_debt(&self) -> i64 {
        self.short_term_debt.saturating_add(self.long_term_debt)
    }
}

/// Cash flow statement figures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashFlow {
    /// Cash flow from operating activities
    pub operating_cf: i64,
    /// Cash and cash equivalents at period end
    pub cash_and_equivalents: i64,
}

/// Dividend figures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dividend {
    /// Payout ratio (%)
    pub payout_ratio: f64,
}

/// The slot a fragment occupies in an [`Aggregate`](crate::Aggregate).
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FragmentKind {
    /// Profit and loss statement
    #[display("profit-and-loss")]
    ProfitLoss,
    /// Balance sheet
    #[display("balance-sheet")]
    BalanceSheet,
    /// Cash flow statement
    #[display("cash-flow")]
    CashFlow,
    /// Dividend record
    #[display("dividend")]
    Dividend,
}

impl FragmentKind {
    /// Every fragment kind, in slot order.
    pub const ALL: [Self; 4] = [
        Self::ProfitLoss,
        Self::BalanceSheet,
        Self::CashFlow,
        Self::Dividend,
    ];
}

/// One statement's contribution to an aggregate.
#[derive(Debug, Clone, PartialEq, From, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Fragment {
    /// Profit and loss statement
    ProfitLoss(ProfitLoss),
    /// Balance sheet
    BalanceSheet(BalanceSheet),
    /// Cash flow statement
    CashFlow(CashFlow),
    /// Dividend record
    Dividend(Dividend),
}

impl Fragment {
    /// The slot this fragment fills.
    pub const fn kind(&self) -> FragmentKind {
        match self {
            Self::ProfitLoss(_) => FragmentKind::ProfitLoss,
            Self::BalanceSheet(_) => FragmentKind::BalanceSheet,
            Self::CashFlow(_) => FragmentKind::CashFlow,
            Self::Dividend(_) => FragmentKind::Dividend,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fragment_kind() {
        let fragment: Fragment = Dividend { payout_ratio: 30.0 }.into();
        assert_eq!(fragment.kind(), FragmentKind::Dividend);

        let fragment: Fragment = CashFlow {
            operating_cf: 1,
            cash_and_equivalents: 2,
        }
        .into();
        assert_eq!(fragment.kind(), FragmentKind::CashFlow);
    }

    #[test]
    fn test_total_debt_saturates() {
        let bs = BalanceSheet {
            retained_earnings: 0,
            short_term_debt: i64::MAX,
            long_term_debt: 10,
            equity_ratio: 0.0,
        };
        assert_eq!(bs.total_debt(), i64::MAX);
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(FragmentKind::BalanceSheet.to_string(), "balance-sheet");
    }
}
