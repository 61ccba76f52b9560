//! Per-company reports.
//!
//! Reports only lay out what the store and the rule sets produced; they never
//! classify anything themselves.

use chrono::{DateTime, Utc};
use kessan_data::{Aggregate, Period, Series};
use kessan_rules::{GrowthAssessment, RiskAssessment};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur during report generation.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// All metrics of one period, flattened.
///
/// Fields of a statement that has not been supplied are `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodRow {
    /// Reporting period
    pub period: Period,
    /// Net sales
    pub revenue: Option<i64>,
    /// Operating profit
    pub operating_profit: Option<i64>,
    /// Ordinary profit
    pub ordinary_profit: Option<i64>,
    /// Net profit
    pub net_profit: Option<i64>,
    /// ROE (%)
    pub roe: Option<f64>,
    /// ROA (%)
    pub roa: Option<f64>,
    /// Retained earnings
    pub retained_earnings: Option<i64>,
    /// Short-term debt
    pub short_term_debt: Option<i64>,
    /// Long-term debt
    pub long_term_debt: Option<i64>,
    /// Equity ratio (%)
    pub equity_ratio: Option<f64>,
    /// Operating cash flow
    pub operating_cf: Option<i64>,
    /// Cash and equivalents
    pub cash_and_equivalents: Option<i64>,
    /// Payout ratio (%)
    pub payout_ratio: Option<f64>,
}

impl From<&Aggregate> for PeriodRow {
    fn from(aggregate: &Aggregate) -> Self {
        let pl = aggregate.profit_loss.as_ref();
        let bs = aggregate.balance_sheet.as_ref();
        let cf = aggregate.cash_flow.as_ref();
        Self {
            period: aggregate.period,
            revenue: pl.and_then(|pl| pl.revenue),
            operating_profit: pl.map(|pl| pl.operating_profit),
            ordinary_profit: pl.map(|pl| pl.ordinary_profit),
            net_profit: pl.map(|pl| pl.net_profit),
            roe: pl.map(|pl| pl.roe),
            roa: pl.map(|pl| pl.roa),
            retained_earnings: bs.map(|bs| bs.retained_earnings),
            short_term_debt: bs.map(|bs| bs.short_term_debt),
            long_term_debt: bs.map(|bs| bs.long_term_debt),
            equity_ratio: bs.map(|bs| bs.equity_ratio),
            operating_cf: cf.map(|cf| cf.operating_cf),
            cash_and_equivalents: cf.map(|cf| cf.cash_and_equivalents),
            payout_ratio: aggregate.dividend.as_ref().map(|d| d.payout_ratio),
        }
    }
}

enum Metric {
    Amount(fn(&PeriodRow) -> Option<i64>),
    Ratio(fn(&PeriodRow) -> Option<f64>),
}

const METRICS: [(&str, Metric); 13] = [
    ("Revenue", Metric::Amount(|r| r.revenue)),
    ("Operating Profit", Metric::Amount(|r| r.operating_profit)),
    ("Ordinary Profit", Metric::Amount(|r| r.ordinary_profit)),
    ("Net Profit", Metric::Amount(|r| r.net_profit)),
    ("ROE %", Metric::Ratio(|r| r.roe)),
    ("ROA %", Metric::Ratio(|r| r.roa)),
    ("Retained Earnings", Metric::Amount(|r| r.retained_earnings)),
    ("Short-term Debt", Metric::Amount(|r| r.short_term_debt)),
    ("Long-term Debt", Metric::Amount(|r| r.long_term_debt)),
    ("Equity Ratio %", Metric::Ratio(|r| r.equity_ratio)),
    ("Operating CF", Metric::Amount(|r| r.operating_cf)),
    ("Cash & Equivalents", Metric::Amount(|r| r.cash_and_equivalents)),
    ("Payout Ratio %", Metric::Ratio(|r| r.payout_ratio)),
];

impl Metric {
    fn format(&self, row: &PeriodRow) -> String {
        match self {
            Self::Amount(get) => get(row).map_or_else(|| "-".to_string(), |v| v.to_string()),
            Self::Ratio(get) => get(row).map_or_else(|| "-".to_string(), |v| format!("{v:.2}")),
        }
    }
}

/// Per-period metrics of one company, oldest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesReport {
    /// Company code
    pub code: String,
    /// One row per period
    pub rows: Vec<PeriodRow>,
}

impl SeriesReport {
    /// Lay out a series.
    pub fn from_series(series: &Series) -> Self {
        Self {
            code: series.code().to_string(),
            rows: series.iter().map(PeriodRow::from).collect(),
        }
    }

    /// Metrics as rows, periods as columns.
    pub fn to_ascii_table(&self) -> String {
        let width = 20 + 13 * self.rows.len();
        let mut output = String::new();

        output.push_str(&format!("\nFinancials: {}\n", self.code));
        output.push_str(&"=".repeat(width));
        output.push('\n');

        output.push_str(&format!("{:<20}", "Metric"));
        for row in &self.rows {
            output.push_str(&format!(" {:>12}", row.period.to_string()));
        }
        output.push('\n');
        output.push_str(&"-".repeat(width));
        output.push('\n');

        for (label, metric) in &METRICS {
            output.push_str(&format!("{label:<20}"));
            for row in &self.rows {
                output.push_str(&format!(" {:>12}", metric.format(row)));
            }
            output.push('\n');
        }

        output.push_str(&"=".repeat(width));
        output.push('\n');
        output
    }

    /// Markdown table with the same layout as [`to_ascii_table`](Self::to_ascii_table).
    pub fn to_markdown(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!("## Financials: {}\n\n", self.code));

        output.push_str("| Metric |");
        for row in &self.rows {
            output.push_str(&format!(" {} |", row.period));
        }
        output.push('\n');
        output.push_str("|--------|");
        for _ in &self.rows {
            output.push_str("---:|");
        }
        output.push('\n');

        for (label, metric) in &METRICS {
            output.push_str(&format!("| {label} |"));
            for row in &self.rows {
                output.push_str(&format!(" {} |", metric.format(row)));
            }
            output.push('\n');
        }

        output
    }
}

/// One line of diagnostic detail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FindingRow {
    /// Period the finding refers to
    pub period: Period,
    /// Registry name of the rule
    pub rule: String,
    /// Human-readable explanation
    pub detail: String,
}

/// Full diagnosis of one company: metrics, verdicts and the reasons behind them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosisReport {
    /// Company code
    pub code: String,
    /// Report generation timestamp
    pub timestamp: DateTime<Utc>,
    /// Risk verdict
    pub risky: bool,
    /// Whether the risk verdict comes from missing data
    pub incomplete: bool,
    /// Growth verdict
    pub growing: bool,
    /// Whether the series was too short to judge growth
    pub too_short: bool,
    /// Periods needed to judge growth
    pub required_periods: usize,
    /// Risk rule breaches
    pub risk_findings: Vec<FindingRow>,
    /// Growth rule failures
    pub growth_failures: Vec<FindingRow>,
    /// Per-period metrics
    pub financials: SeriesReport,
}

impl DiagnosisReport {
    /// Build a report from a series and its assessments.
    pub fn new(series: &Series, risk: &RiskAssessment, growth: &GrowthAssessment) -> Self {
        let risk_findings = risk
            .findings
            .iter()
            .map(|f| FindingRow {
                period: f.period,
                rule: f.reason.rule().to_string(),
                detail: f.reason.to_string(),
            })
            .collect();
        let growth_failures = growth
            .failures
            .iter()
            .map(|f| FindingRow {
                period: f.period,
                rule: f.reason.rule_name().to_string(),
                detail: f.reason.to_string(),
            })
            .collect();

        Self {
            code: series.code().to_string(),
            timestamp: Utc::now(),
            risky: risk.is_risky(),
            incomplete: risk.is_incomplete(),
            growing: growth.is_growing(),
            too_short: growth.too_short(),
            required_periods: growth.required_periods,
            risk_findings,
            growth_failures,
            financials: SeriesReport::from_series(series),
        }
    }

    /// Convert report to JSON string.
    pub fn to_json(&self) -> Result<String, ReportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Plain-text rendering.
    pub fn to_ascii_table(&self) -> String {
        let mut output = self.financials.to_ascii_table();

        output.push_str(&format!(
            "{:<20} {}\n",
            "Risky",
            verdict(self.risky, self.incomplete.then_some("incomplete data"))
        ));
        output.push_str(&format!(
            "{:<20} {}\n",
            "Growing",
            verdict(self.growing, self.too_short.then_some("too few periods"))
        ));

        if self.financials.rows.is_empty() {
            output.push_str("No periods on record.\n");
        }
        if self.too_short {
            output.push_str(&format!(
                "Growth needs at least {} periods, found {}.\n",
                self.required_periods,
                self.financials.rows.len()
            ));
        }

        push_findings(&mut output, "Risk findings", &self.risk_findings);
        push_findings(&mut output, "Growth failures", &self.growth_failures);
        output
    }

    /// Markdown rendering.
    pub fn to_markdown(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!("# Diagnosis: {}\n\n", self.code));
        output.push_str(&format!(
            "- **Risky:** {}\n",
            verdict(self.risky, self.incomplete.then_some("incomplete data"))
        ));
        output.push_str(&format!(
            "- **Growing:** {}\n\n",
            verdict(self.growing, self.too_short.then_some("too few periods"))
        ));

        output.push_str(&self.financials.to_markdown());
        output.push('\n');

        for (title, findings) in [
            ("Risk findings", &self.risk_findings),
            ("Growth failures", &self.growth_failures),
        ] {
            if findings.is_empty() {
                continue;
            }
            output.push_str(&format!("## {title}\n\n"));
            output.push_str("| Period | Rule | Detail |\n");
            output.push_str("|--------|------|--------|\n");
            for finding in findings {
                output.push_str(&format!(
                    "| {} | {} | {} |\n",
                    finding.period, finding.rule, finding.detail
                ));
            }
            output.push('\n');
        }

        output
    }
}

fn verdict(value: bool, note: Option<&str>) -> String {
    let answer = if value { "yes" } else { "no" };
    match note {
        Some(note) => format!("{answer} ({note})"),
        None => answer.to_string(),
    }
}

fn push_findings(output: &mut String, title: &str, findings: &[FindingRow]) {
    if findings.is_empty() {
        return;
    }
    output.push_str(&format!("\n{title}:\n"));
    output.push_str(&"-".repeat(60));
    output.push('\n');
    for finding in findings {
        output.push_str(&format!(
            "{:<9} {:<24} {}\n",
            finding.period.to_string(),
            finding.rule,
            finding.detail
        ));
    }
}
