//! Period-ordered aggregate series.

use crate::aggregate::Aggregate;
use crate::period::Period;
use serde::Serialize;

/// One company's aggregates, oldest period first.
///
/// The only way to build a series sorts it, so consecutive elements are
/// always consecutive reporting periods in time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    code: String,
    aggregates: Vec<Aggregate>,
}

impl Series {
    /// Build a series, sorting `aggregates` by period.
    pub fn new(code: impl Into<String>, mut aggregates: Vec<Aggregate>) -> Self {
        aggregates.sort_by_key(|aggregate| aggregate.period);
        Self {
            code: code.into(),
            aggregates,
        }
    }

    /// Company code.
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Number of periods.
    pub fn len(&self) -> usize {
        self.aggregates.len()
    }

    /// Whether the series has no periods.
    pub fn is_empty(&self) -> bool {
        self.aggregates.is_empty()
    }

    /// Iterate oldest to newest.
    pub fn iter(&self) -> std::slice::Iter<'_, Aggregate> {
        self.aggregates.iter()
    }

    /// Oldest aggregate.
    pub fn first(&self) -> Option<&Aggregate> {
        self.aggregates.first()
    }

    /// Newest aggregate.
    pub fn last(&self) -> Option<&Aggregate> {
        self.aggregates.last()
    }

    /// Consecutive `(previous, next)` pairs.
    pub fn pairs(&self) -> impl Iterator<Item = (&Aggregate, &Aggregate)> {
        self.aggregates.windows(2).map(|w| (&w[0], &w[1]))
    }

    /// Periods in order.
    pub fn periods(&self) -> Vec<Period> {
        self.aggregates.iter().map(|a| a.period).collect()
    }

    /// Underlying aggregates in order.
    pub fn as_slice(&self) -> &[Aggregate] {
        &self.aggregates
    }
}

impl<'a> IntoIterator for &'a Series {
    type Item = &'a Aggregate;
    type IntoIter = std::slice::Iter<'a, Aggregate>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
