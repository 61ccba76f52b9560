//! CSV feed loading.
//!
//! A load is one ingestion pass over one feed. Every row is validated before
//! anything is merged: a fatal error leaves the store untouched by that pass,
//! and skipped rows never reach it.

use super::layout::FeedKind;
use super::policy::{Field, LoaderConfig, SentinelPolicy};
use crate::error::{DataError, Result};
use crate::period::Period;
use crate::statement::{BalanceSheet, CashFlow, Dividend, Fragment, ProfitLoss};
use crate::store::{AggregateStore, UpsertOutcome};
use csv::{ReaderBuilder, StringRecord, Trim};
use serde::Serialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;
use tracing::{info, warn};

/// Why a row was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// The field carried the sentinel or was empty
    NotDisclosed,
    /// The field could not be parsed as a number
    Unparsable,
}

/// A row dropped during loading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedRow {
    /// 1-based line number in the source
    pub line: u64,
    /// Company code of the row
    pub code: String,
    /// Field that caused the skip
    pub field: Field,
    /// Raw cell contents
    pub value: String,
    /// Why the row was skipped
    pub reason: SkipReason,
}

/// Summary of one ingestion pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    /// Feed that was loaded
    pub feed: FeedKind,
    /// Data rows read (headers excluded)
    pub rows: usize,
    /// Rows that created a new aggregate
    pub created: usize,
    /// Rows that filled an empty slot of an existing aggregate
    pub filled: usize,
    /// Rows that replaced an existing fragment
    pub overwritten: usize,
    /// Rows dropped under the sentinel policy
    pub skipped: Vec<SkippedRow>,
}

impl LoadReport {
    const fn new(feed: FeedKind) -> Self {
        Self {
            feed,
            rows: 0,
            created: 0,
            filled: 0,
            overwritten: 0,
            skipped: Vec::new(),
        }
    }

    /// Rows merged into the store.
    pub const fn merged(&self) -> usize {
        self.created + self.filled + self.overwritten
    }
}

/// Loads statement feeds into an [`AggregateStore`].
#[derive(Debug, Clone, Default)]
pub struct FeedLoader {
    config: LoaderConfig,
}

impl FeedLoader {
    /// Create a loader.
    pub const fn new(config: LoaderConfig) -> Self {
        Self { config }
    }

    /// Loader settings.
    pub const fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Load a feed file.
    pub fn load_path(
        &self,
        feed: FeedKind,
        path: impl AsRef<Path>,
        store: &mut AggregateStore,
    ) -> Result<LoadReport> {
        let path = path.as_ref();
        info!(%feed, path = %path.display(), "loading feed");
        let file = File::open(path)?;
        self.load_reader(feed, file, store)
    }

    /// Load every feed found in `dir` under its standard file name.
    ///
    /// Feeds whose file does not exist are skipped with a warning; the
    /// companies they would have covered show up as incomplete later.
    pub fn load_dir(
        &self,
        dir: impl AsRef<Path>,
        store: &mut AggregateStore,
    ) -> Result<Vec<LoadReport>> {
        let dir = dir.as_ref();
        let mut reports = Vec::new();
        for feed in FeedKind::ALL {
            let path = dir.join(feed.file_name());
            if !path.is_file() {
                warn!(%feed, path = %path.display(), "feed file not found, skipping");
                continue;
            }
            reports.push(self.load_path(feed, &path, store)?);
        }
        Ok(reports)
    }

    /// Load a feed from any reader.
    pub fn load_reader<R: Read>(
        &self,
        feed: FeedKind,
        reader: R,
        store: &mut AggregateStore,
    ) -> Result<LoadReport> {
        let mut csv = ReaderBuilder::new()
            .has_headers(self.config.has_headers)
            .flexible(true)
            .trim(Trim::All)
            .from_reader(reader);

        let mut report = LoadReport::new(feed);
        let mut parsed = Vec::new();

        for record in csv.records() {
            let record = record?;
            report.rows += 1;
            let row = Row {
                feed,
                record: &record,
                config: &self.config,
            };
            match row.parse() {
                Ok(entry) => parsed.push(entry),
                Err(RowError::Skip(skipped)) => {
                    warn!(
                        %feed,
                        line = skipped.line,
                        code = %skipped.code,
                        field = %skipped.field,
                        value = %skipped.value,
                        reason = ?skipped.reason,
                        "skipping row"
                    );
                    report.skipped.push(skipped);
                }
                Err(RowError::Fatal(err)) => return Err(err),
            }
        }

        for (code, period, fragment) in parsed {
            match store.upsert(&code, period, fragment) {
                UpsertOutcome::Created => report.created += 1,
                UpsertOutcome::Filled => report.filled += 1,
                UpsertOutcome::Overwritten => report.overwritten += 1,
            }
        }

        info!(
            %feed,
            rows = report.rows,
            merged = report.merged(),
            overwritten = report.overwritten,
            skipped = report.skipped.len(),
            "feed loaded"
        );
        Ok(report)
    }
}

enum RowError {
    Fatal(DataError),
    Skip(SkippedRow),
}

impl From<DataError> for RowError {
    fn from(err: DataError) -> Self {
        Self::Fatal(err)
    }
}

type RowResult<T> = std::result::Result<T, RowError>;

/// Numbers that can stand in for an undisclosed value.
trait Numeric: FromStr + Default {
    /// `f64::from_str` accepts `NaN` and `inf`, which no statement reports.
    fn is_valid(&self) -> bool {
        true
    }
}

impl Numeric for i64 {}

impl Numeric for f64 {
    fn is_valid(&self) -> bool {
        self.is_finite()
    }
}

fn parse_number<T: Numeric>(cleaned: &str) -> Option<T> {
    cleaned.parse::<T>().ok().filter(|value| value.is_valid())
}

struct Row<'a> {
    feed: FeedKind,
    record: &'a StringRecord,
    config: &'a LoaderConfig,
}

impl Row<'_> {
    fn line(&self) -> u64 {
        self.record.position().map_or(0, |p| p.line())
    }

    fn cell(&self, column: usize) -> Option<&str> {
        self.record.get(column)
    }

    fn parse(&self) -> RowResult<(String, Period, Fragment)> {
        let (code_col, period_col) = self.key_columns();
        let code = self.code(code_col)?;
        let period = self.period(period_col)?;
        let fragment = match self.feed {
            FeedKind::ProfitLoss => self.profit_loss(&code)?,
            FeedKind::BalanceSheet => self.balance_sheet(&code)?,
            FeedKind::CashFlow => self.cash_flow(&code)?,
            FeedKind::Dividend => self.dividend(&code)?,
        };
        Ok((code, period, fragment))
    }

    const fn key_columns(&self) -> (usize, usize) {
        let layouts = &self.config.layouts;
        match self.feed {
            FeedKind::ProfitLoss => (layouts.profit_loss.code, layouts.profit_loss.period),
            FeedKind::BalanceSheet => (layouts.balance_sheet.code, layouts.balance_sheet.period),
            FeedKind::CashFlow => (layouts.cash_flow.code, layouts.cash_flow.period),
            FeedKind::Dividend => (layouts.dividend.code, layouts.dividend.period),
        }
    }

    fn code(&self, column: usize) -> RowResult<String> {
        match self.cell(column) {
            Some(code) if !self.config.is_undisclosed(code) => Ok(code.to_string()),
            _ => Err(DataError::MissingCode {
                feed: self.feed,
                line: self.line(),
            }
            .into()),
        }
    }

    fn period(&self, column: usize) -> RowResult<Period> {
        let raw = self.required_cell(Field::Period, column)?;
        raw.parse().map_err(|_| self.required_error(Field::Period, raw))
    }

    fn required_cell(&self, field: Field, column: usize) -> RowResult<&str> {
        self.cell(column).ok_or_else(|| {
            RowError::Fatal(DataError::MissingColumn {
                feed: self.feed,
                line: self.line(),
                field,
                column,
            })
        })
    }

    fn required_error(&self, field: Field, value: &str) -> RowError {
        RowError::Fatal(DataError::RequiredField {
            feed: self.feed,
            line: self.line(),
            field,
            value: value.to_string(),
        })
    }

    fn required<T: Numeric>(&self, field: Field, column: usize) -> RowResult<T> {
        let raw = self.required_cell(field, column)?;
        let cleaned = clean(raw);
        if self.config.is_undisclosed(&cleaned) {
            return Err(self.required_error(field, raw));
        }
        parse_number(&cleaned).ok_or_else(|| self.required_error(field, raw))
    }

    /// Read an optional field, applying the sentinel policy.
    ///
    /// Values that are present but unparsable always skip the row; only
    /// undisclosed values are subject to the policy.
    fn optional<T: Numeric>(&self, code: &str, field: Field, column: usize) -> RowResult<Option<T>> {
        let raw = self.cell(column).unwrap_or_default();
        let cleaned = clean(raw);

        if self.config.is_undisclosed(&cleaned) {
            return match self.config.policy_for(field) {
                SentinelPolicy::Absent => Ok(None),
                SentinelPolicy::Zero => Ok(Some(T::default())),
                SentinelPolicy::SkipRow => {
                    Err(self.skip(code, field, raw, SkipReason::NotDisclosed))
                }
            };
        }

        parse_number(&cleaned)
            .map(Some)
            .ok_or_else(|| self.skip(code, field, raw, SkipReason::Unparsable))
    }

    /// Optional field that must end up with a value.
    fn value<T: Numeric>(&self, code: &str, field: Field, column: usize) -> RowResult<T> {
        let raw = self.cell(column).unwrap_or_default();
        self.optional(code, field, column)?
            .ok_or_else(|| self.skip(code, field, raw, SkipReason::NotDisclosed))
    }

    fn skip(&self, code: &str, field: Field, raw: &str, reason: SkipReason) -> RowError {
        RowError::Skip(SkippedRow {
            line: self.line(),
            code: code.to_string(),
            field,
            value: raw.to_string(),
            reason,
        })
    }

    fn profit_loss(&self, code: &str) -> RowResult<Fragment> {
        let cols = &self.config.layouts.profit_loss;
        let revenue = match cols.revenue {
            Some(column) => self.optional(code, Field::Revenue, column)?,
            None => None,
        };
        Ok(ProfitLoss {
            revenue,
            operating_profit: self.value(code, Field::OperatingProfit, cols.operating_profit)?,
            ordinary_profit: self.value(code, Field::OrdinaryProfit, cols.ordinary_profit)?,
            net_profit: self.required(Field::NetProfit, cols.net_profit)?,
            roe: self.value(code, Field::Roe, cols.roe)?,
            roa: self.value(code, Field::Roa, cols.roa)?,
        }
        .into())
    }

    fn balance_sheet(&self, code: &str) -> RowResult<Fragment> {
        let cols = &self.config.layouts.balance_sheet;
        Ok(BalanceSheet {
            retained_earnings: self.value(code, Field::RetainedEarnings, cols.retained_earnings)?,
            short_term_debt: self.value(code, Field::ShortTermDebt, cols.short_term_debt)?,
            long_term_debt: self.value(code, Field::LongTermDebt, cols.long_term_debt)?,
            equity_ratio: self.value(code, Field::EquityRatio, cols.equity_ratio)?,
        }
        .into())
    }

    fn cash_flow(&self, code: &str) -> RowResult<Fragment> {
        let cols = &self.config.layouts.cash_flow;
        Ok(CashFlow {
            operating_cf: self.value(code, Field::OperatingCf, cols.operating_cf)?,
            cash_and_equivalents: self.value(
                code,
                Field::CashAndEquivalents,
                cols.cash_and_equivalents,
            )?,
        }
        .into())
    }

    fn dividend(&self, code: &str) -> RowResult<Fragment> {
        let cols = &self.config.layouts.dividend;
        Ok(Dividend {
            payout_ratio: self.value(code, Field::PayoutRatio, cols.payout_ratio)?,
        }
        .into())
    }
}

/// Strip whitespace and thousands separators.
fn clean(raw: &str) -> String {
    raw.trim().replace(',', "")
}
