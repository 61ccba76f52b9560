//! Aggregate store.
//!
//! The store has a single-writer lifecycle: create it, run ingestion passes
//! against it through `&mut`, then [`freeze`](AggregateStore::freeze) it into
//! a [`StoreSnapshot`] for evaluation. The snapshot is read-only and can be
//! shared across threads.

use crate::aggregate::Aggregate;
use crate::period::Period;
use crate::series::Series;
use crate::statement::{Fragment, FragmentKind};
use std::collections::HashMap;
use tracing::debug;

type Company = HashMap<Period, Aggregate>;

/// What an upsert did to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// No aggregate existed for the key; one was created.
    Created,
    /// The aggregate existed and the slot was empty.
    Filled,
    /// The slot already held a fragment, which was replaced.
    Overwritten,
}

/// Mutable store used during ingestion.
#[derive(Debug, Default)]
pub struct AggregateStore {
    companies: HashMap<String, Company>,
}

impl AggregateStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge a fragment into the aggregate for `(code, period)`.
    ///
    /// Only the fragment's own slot changes. Repeated fragments of the same
    /// kind for the same key replace each other; the last one wins.
    pub fn upsert(&mut self, code: &str, period: Period, fragment: Fragment) -> UpsertOutcome {
        let kind = fragment.kind();
        let company = self.companies.entry(code.to_string()).or_default();

        match company.get_mut(&period) {
            Some(aggregate) => {
                if aggregate.apply(fragment).is_some() {
                    debug!(code, %period, %kind, "overwrote fragment");
                    UpsertOutcome::Overwritten
                } else {
                    UpsertOutcome::Filled
                }
            }
            None => {
                let mut aggregate = Aggregate::new(code, period);
                aggregate.apply(fragment);
                company.insert(period, aggregate);
                debug!(code, %period, %kind, "created aggregate");
                UpsertOutcome::Created
            }
        }
    }

    /// Look up one aggregate.
    pub fn get(&self, code: &str, period: Period) -> Option<&Aggregate> {
        lookup(&self.companies, code, period)
    }

    /// Number of aggregates across all companies.
    pub fn len(&self) -> usize {
        count(&self.companies)
    }

    /// Whether no fragment has been stored.
    pub fn is_empty(&self) -> bool {
        self.companies.is_empty()
    }

    /// Company codes, sorted.
    pub fn codes(&self) -> Vec<String> {
        sorted_codes(&self.companies)
    }

    /// End ingestion and hand the data over for evaluation.
    pub fn freeze(self) -> StoreSnapshot {
        debug!(
            companies = self.companies.len(),
            aggregates = self.len(),
            "store frozen"
        );
        StoreSnapshot {
            companies: self.companies,
        }
    }
}

/// Read-only view of a fully ingested store.
#[derive(Debug, Default)]
pub struct StoreSnapshot {
    companies: HashMap<String, Company>,
}

impl StoreSnapshot {
    /// All aggregates of `code`, oldest period first.
    ///
    /// Unknown codes yield an empty series.
    pub fn series_for(&self, code: &str) -> Series {
        let aggregates = self
            .companies
            .get(code)
            .map(|company| company.values().cloned().collect())
            .unwrap_or_default();
        Series::new(code, aggregates)
    }

    /// Whether any fragment was stored for `code`.
    pub fn contains(&self, code: &str) -> bool {
        self.companies.contains_key(code)
    }

    /// Look up one aggregate.
    pub fn get(&self, code: &str, period: Period) -> Option<&Aggregate> {
        lookup(&self.companies, code, period)
    }

    /// Number of aggregates across all companies.
    pub fn len(&self) -> usize {
        count(&self.companies)
    }

    /// Whether the snapshot holds no data.
    pub fn is_empty(&self) -> bool {
        self.companies.is_empty()
    }

    /// Company codes, sorted.
    pub fn codes(&self) -> Vec<String> {
        sorted_codes(&self.companies)
    }

    /// Number of aggregates holding a fragment of each kind.
    pub fn coverage(&self) -> HashMap<FragmentKind, usize> {
        let mut coverage = HashMap::new();
        for aggregate in self.companies.values().flat_map(HashMap::values) {
            for kind in FragmentKind::ALL {
                if aggregate.has(kind) {
                    *coverage.entry(kind).or_insert(0) += 1;
                }
            }
        }
        coverage
    }
}

fn lookup<'a>(
    companies: &'a HashMap<String, Company>,
    code: &str,
    period: Period,
) -> Option<&'a Aggregate> {
    companies.get(code).and_then(|company| company.get(&period))
}

fn count(companies: &HashMap<String, Company>) -> usize {
    companies.values().map(HashMap::len).sum()
}

fn sorted_codes(companies: &HashMap<String, Company>) -> Vec<String> {
    let mut codes: Vec<String> = companies.keys().cloned().collect();
    codes.sort();
    codes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::statement::{BalanceSheet, CashFlow, Dividend, ProfitLoss};

    fn period(year: i32, month: u32) -> Period {
        Period::new(year, month).unwrap()
    }

    fn pl(net_profit: i64) -> Fragment {
        ProfitLoss {
            revenue: Some(500),
            operating_profit: 90,
            ordinary_profit: 80,
            net_profit,
            roe: 12.0,
            roa: 7.0,
        }
        .into()
    }

    fn bs(short_term_debt: i64) -> Fragment {
        BalanceSheet {
            retained_earnings: 100,
            short_term_debt,
            long_term_debt: 600,
            equity_ratio: 25.0,
        }
        .into()
    }

    fn cf() -> Fragment {
        CashFlow {
            operating_cf: 100,
            cash_and_equivalents: 1000,
        }
        .into()
    }

    #[test]
    fn test_merge_is_independent_of_kind_order() {
        let key = period(2023, 3);

        let mut forward = AggregateStore::new();
        forward.upsert("1301", key, bs(300));
        forward.upsert("1301", key, pl(60));
        forward.upsert("1301", key, cf());

        let mut reverse = AggregateStore::new();
        reverse.upsert("1301", key, cf());
        reverse.upsert("1301", key, pl(60));
        reverse.upsert("1301", key, bs(300));

        assert_eq!(forward.get("1301", key), reverse.get("1301", key));
        assert_eq!(forward.len(), 1);
    }

    #[test]
    fn test_reingest_overwrites_only_its_slot() {
        let key = period(2023, 3);
        let mut store = AggregateStore::new();
        assert_eq!(store.upsert("1301", key, pl(60)), UpsertOutcome::Created);
        assert_eq!(store.upsert("1301", key, bs(300)), UpsertOutcome::Filled);
        assert_eq!(
            store.upsert("1301", key, bs(500)),
            UpsertOutcome::Overwritten
        );

        let aggregate = store.get("1301", key).unwrap();
        assert_eq!(aggregate.balance_sheet.as_ref().unwrap().short_term_debt, 500);
        assert_eq!(aggregate.profit_loss.as_ref().unwrap().net_profit, 60);
        assert!(aggregate.cash_flow.is_none());
    }

    #[test]
    fn test_month_granularity_key() {
        let mut store = AggregateStore::new();
        let march: Period = "2023/03/01".parse().unwrap();
        let march_end: Period = "2023/03/31".parse().unwrap();
        store.upsert("1301", march, pl(60));
        store.upsert("1301", march_end, cf());
        store.upsert("1301", period(2023, 4), cf());
        store.upsert("1332", march, cf());

        assert_eq!(store.len(), 3);
        let merged = store.get("1301", march).unwrap();
        assert!(merged.profit_loss.is_some());
        assert!(merged.cash_flow.is_some());
    }

    #[test]
    fn test_snapshot_series_is_sorted() {
        let mut store = AggregateStore::new();
        store.upsert("1301", period(2023, 3), pl(3));
        store.upsert("1301", period(2021, 3), pl(1));
        store.upsert("1301", period(2022, 3), pl(2));

        let snapshot = store.freeze();
        let periods = snapshot.series_for("1301").periods();
        assert_eq!(
            periods,
            vec![period(2021, 3), period(2022, 3), period(2023, 3)]
        );
    }

    #[test]
    fn test_unknown_code_gives_empty_series() {
        let snapshot = AggregateStore::new().freeze();
        assert!(snapshot.series_for("9999").is_empty());
        assert!(!snapshot.contains("9999"));
        assert!(snapshot.is_empty());
    }

    #[test]
    fn test_codes_and_coverage() {
        let mut store = AggregateStore::new();
        store.upsert("9984", period(2023, 3), pl(1));
        store.upsert("1301", period(2023, 3), pl(1));
        store.upsert("1301", period(2023, 3), Dividend { payout_ratio: 30.0 }.into());

        assert_eq!(store.codes(), vec!["1301".to_string(), "9984".to_string()]);

        let coverage = store.freeze().coverage();
        assert_eq!(coverage.get(&FragmentKind::ProfitLoss), Some(&2));
        assert_eq!(coverage.get(&FragmentKind::Dividend), Some(&1));
        assert_eq!(coverage.get(&FragmentKind::CashFlow), None);
    }
}
