//! Merged per-period financial records.

use crate::period::Period;
use crate::statement::{BalanceSheet, CashFlow, Dividend, Fragment, FragmentKind, ProfitLoss};
use serde::{Deserialize, Serialize};

/// All statements known for one company and one reporting period.
///
/// Each slot is filled independently. An empty slot means the statement has
/// not been seen, which is different from a statement reporting zeros.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Aggregate {
    /// Company code
    pub code: String,
    /// Reporting period
    pub period: Period,
    /// Profit and loss statement
    pub profit_loss: Option<ProfitLoss>,
    /// Balance sheet
    pub balance_sheet: Option<BalanceSheet>,
    /// Cash flow statement
    pub cash_flow: Option<CashFlow>,
    /// Dividend record
    pub dividend: Option<Dividend>,
}

impl Aggregate {
    /// Create an aggregate with every slot empty.
    pub fn new(code: impl Into<String>, period: Period) -> Self {
        Self {
            code: code.into(),
            period,
            profit_loss: None,
            balance_sheet: None,
            cash_flow: None,
            dividend: None,
        }
    }

    /// Store `fragment` in its slot, returning whatever the slot held before.
    ///
    /// Other slots are left as they are.
    pub fn apply(&mut self, fragment: Fragment) -> Option<Fragment> {
        match fragment {
            Fragment::ProfitLoss(pl) => self.profit_loss.replace(pl).map(Fragment::from),
            Fragment::BalanceSheet(bs) => self.balance_sheet.replace(bs).map(Fragment::from),
            Fragment::CashFlow(cf) => self.cash_flow.replace(cf).map(Fragment::from),
            Fragment::Dividend(dv) => self.dividend.replace(dv).map(Fragment::from),
        }
    }

    /// Whether the given slot is filled.
    pub const fn has(&self, kind: FragmentKind) -> bool {
        match kind {
            FragmentKind::ProfitLoss => self.profit_loss.is_some(),
            FragmentKind::BalanceSheet => self.balance_sheet.is_some(),
            FragmentKind::CashFlow => self.cash_flow.is_some(),
            FragmentKind::Dividend => self.dividend.is_some(),
        }
    }

    /// Slots that are still empty, in slot order.
    pub fn missing(&self) -> Vec<FragmentKind> {
        FragmentKind::ALL
            .into_iter()
            .filter(|kind| !self.has(*kind))
            .collect()
    }

    /// Whether all four statements are present.
    pub const fn is_complete(&self) -> bool {
        self.profit_loss.is_some()
            && self.balance_sheet.is_some()
            && self.cash_flow.is_some()
            && self.dividend.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn period() -> Period {
        Period::new(2023, 3).unwrap()
    }

    fn pl(net_profit: i64) -> ProfitLoss {
        ProfitLoss {
            revenue: Some(1000),
            operating_profit: 120,
            ordinary_profit: 110,
            net_profit,
            roe: 10.0,
            roa: 5.0,
        }
    }

    #[test]
    fn test_new_aggregate_is_empty() {
        let aggregate = Aggregate::new("7203", period());
        assert_eq!(aggregate.missing(), FragmentKind::ALL.to_vec());
        assert!(!aggregate.is_complete());
    }

    #[test]
    fn test_apply_returns_previous_fragment() {
        let mut aggregate = Aggregate::new("7203", period());
        assert!(aggregate.apply(pl(60).into()).is_none());

        let previous = aggregate.apply(pl(80).into());
        assert_eq!(previous, Some(Fragment::ProfitLoss(pl(60))));
        assert_eq!(aggregate.profit_loss, Some(pl(80)));
    }

    #[test]
    fn test_apply_leaves_other_slots() {
        let mut aggregate = Aggregate::new("7203", period());
        aggregate.apply(Dividend { payout_ratio: 30.0 }.into());
        aggregate.apply(pl(60).into());

        assert!(aggregate.has(FragmentKind::Dividend));
        assert!(aggregate.has(FragmentKind::ProfitLoss));
        assert_eq!(
            aggregate.missing(),
            vec![FragmentKind::BalanceSheet, FragmentKind::CashFlow]
        );
    }
}
