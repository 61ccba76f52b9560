//! Screening over a frozen store.
//!
//! The screener walks every company in a [`StoreSnapshot`], runs both rule
//! sets over its series and keeps the codes that meet the requested
//! [`ScreenCriteria`].

use derive_more::Display;
use kessan_data::{Series, StoreSnapshot};
use kessan_output::{DiagnosisReport, ScreenExport, VerdictExport};
use kessan_rules::{GrowthAssessment, RiskAssessment, RuleConfig, assess_growth, assess_risk};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;
use tracing::{debug, info};

/// Error returned when a criteria name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown screen criteria '{0}', expected safe-and-growing, safe or growing")]
pub struct UnknownCriteria(pub String);

/// What a company has to satisfy to become a candidate.
#[derive(
    Debug, Display, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum ScreenCriteria {
    /// Not risky and growing
    #[default]
    #[display("safe-and-growing")]
    SafeAndGrowing,
    /// Not risky
    #[display("safe")]
    Safe,
    /// Growing, whatever the risk verdict
    #[display("growing")]
    Growing,
}

impl ScreenCriteria {
    /// All criteria.
    pub const ALL: [Self; 3] = [Self::SafeAndGrowing, Self::Safe, Self::Growing];

    /// Whether a company with these verdicts qualifies.
    pub const fn admits(&self, risky: bool, growing: bool) -> bool {
        match self {
            Self::SafeAndGrowing => !risky && growing,
            Self::Safe => !risky,
            Self::Growing => growing,
        }
    }
}

impl FromStr for ScreenCriteria {
    type Err = UnknownCriteria;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.to_string().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownCriteria(s.to_string()))
    }
}

/// Verdicts for one company.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompanyVerdict {
    /// Company code
    pub code: String,
    /// Periods on record
    pub periods: usize,
    /// Whether any risk rule fired
    pub risky: bool,
    /// Whether any period is missing a statement
    pub incomplete: bool,
    /// Whether every growth rule held
    pub growing: bool,
    /// Whether the company met the criteria
    pub qualified: bool,
}

impl From<&CompanyVerdict> for VerdictExport {
    fn from(verdict: &CompanyVerdict) -> Self {
        Self {
            code: verdict.code.clone(),
            periods: verdict.periods,
            risky: verdict.risky,
            incomplete: verdict.incomplete,
            growing: verdict.growing,
            qualified: verdict.qualified,
        }
    }
}

/// Outcome of a screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScreenResult {
    /// Criteria applied
    pub criteria: ScreenCriteria,
    /// Qualifying codes, sorted lexicographically
    pub candidates: Vec<String>,
    /// One verdict per company, sorted by code
    pub verdicts: Vec<CompanyVerdict>,
}

impl ScreenResult {
    /// Number of companies evaluated.
    pub fn evaluated(&self) -> usize {
        self.verdicts.len()
    }

    /// Export view of this result.
    pub fn to_export(&self) -> ScreenExport {
        ScreenExport::new(
            self.criteria.to_string(),
            self.candidates.clone(),
            self.verdicts.iter().map(VerdictExport::from).collect(),
        )
    }
}

/// Everything the rule sets found for one company.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompanyDiagnosis {
    /// The company's periods, oldest first
    pub series: Series,
    /// Risk rule outcome
    pub risk: RiskAssessment,
    /// Growth rule outcome
    pub growth: GrowthAssessment,
}

impl CompanyDiagnosis {
    /// Report view of this diagnosis.
    pub fn report(&self) -> DiagnosisReport {
        DiagnosisReport::new(&self.series, &self.risk, &self.growth)
    }
}

/// Runs the rule sets over a snapshot.
#[derive(Debug, Clone, Default)]
pub struct Screener {
    config: RuleConfig,
}

impl Screener {
    /// Create a screener with the given thresholds.
    pub const fn new(config: RuleConfig) -> Self {
        Self { config }
    }

    /// Thresholds in use.
    pub const fn config(&self) -> &RuleConfig {
        &self.config
    }

    /// Assess one series.
    pub fn diagnose(&self, series: Series) -> CompanyDiagnosis {
        let risk = assess_risk(&series, &self.config.risk);
        let growth = assess_growth(&series, &self.config.growth);
        CompanyDiagnosis {
            series,
            risk,
            growth,
        }
    }

    /// Evaluate every company and collect those meeting `criteria`.
    pub fn screen(&self, snapshot: &StoreSnapshot, criteria: ScreenCriteria) -> ScreenResult {
        let mut candidates = Vec::new();
        let mut verdicts = Vec::new();

        for code in snapshot.codes() {
            let diagnosis = self.diagnose(snapshot.series_for(&code));
            let risky = diagnosis.risk.is_risky();
            let growing = diagnosis.growth.is_growing();
            let qualified = criteria.admits(risky, growing);
            debug!(%code, risky, growing, qualified, "evaluated company");

            if qualified {
                candidates.push(code.clone());
            }
            verdicts.push(CompanyVerdict {
                code,
                periods: diagnosis.series.len(),
                risky,
                incomplete: diagnosis.risk.is_incomplete(),
                growing,
                qualified,
            });
        }
        candidates.sort();

        info!(
            %criteria,
            evaluated = verdicts.len(),
            qualified = candidates.len(),
            "screen complete"
        );

        ScreenResult {
            criteria,
            candidates,
            verdicts,
        }
    }

    /// Full diagnosis for one company, or `None` if the code is unknown.
    pub fn inspect(&self, snapshot: &StoreSnapshot, code: &str) -> Option<CompanyDiagnosis> {
        snapshot
            .contains(code)
            .then(|| self.diagnose(snapshot.series_for(code)))
    }
}
