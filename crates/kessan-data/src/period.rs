//! Reporting period keys.
//!
//! Statements are matched by calendar month: two rows for `2023/03/31` and
//! `2023/03` land in the same [`Period`].

use crate::error::{DataError, Result};
use chrono::{Datelike, NaiveDate};
use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A (year, month) reporting period.
///
/// Ordering is chronological: year first, then month.
#[derive(
    Debug, Display, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[display("{year:04}/{month:02}")]
#[serde(try_from = "String", into = "String")]
pub struct Period {
    year: i32,
    month: u32,
}

impl Period {
    /// Create a period, validating the month.
    pub fn new(year: i32, month: u32) -> Result<Self> {
        if NaiveDate::from_ymd_opt(year, month, 1).is_none() {
            return Err(DataError::InvalidPeriod {
                value: format!("{year}/{month}"),
                reason: "month must be between 1 and 12".to_string(),
            });
        }
        Ok(Self { year, month })
    }

    /// Calendar year.
    pub const fn year(&self) -> i32 {
        self.year
    }

    /// Calendar month (1-12).
    pub const fn month(&self) -> u32 {
        self.month
    }

    /// First day of the period.
    pub fn first_day(&self) -> NaiveDate {
        // `new` and `From<NaiveDate>` only admit valid months
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }
}

impl From<NaiveDate> for Period {
    fn from(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }
}

impl FromStr for Period {
    type Err = DataError;

    /// Parse `YYYY/MM`, `YYYY/M` or `YYYY/MM/DD`. The day, if present, must be
    /// a valid date but is otherwise discarded.
    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let invalid = |reason: &str| DataError::InvalidPeriod {
            value: s.to_string(),
            reason: reason.to_string(),
        };

        let parts: Vec<&str> = trimmed.split('/').collect();
        match parts.as_slice() {
            [year, month] => {
                let year: i32 = year.parse().map_err(|_| invalid("year is not a number"))?;
                let month: u32 = month
                    .parse()
                    .map_err(|_| invalid("month is not a number"))?;
                Self::new(year, month).map_err(|_| invalid("month must be between 1 and 12"))
            }
            [_, _, _] => NaiveDate::parse_from_str(trimmed, "%Y/%m/%d")
                .map(Self::from)
                .map_err(|e| invalid(&e.to_string())),
            _ => Err(invalid("expected YEAR/MONTH")),
        }
    }
}

impl TryFrom<String> for Period {
    type Error = DataError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Period> for String {
    fn from(period: Period) -> Self {
        period.to_string()
    }
}
