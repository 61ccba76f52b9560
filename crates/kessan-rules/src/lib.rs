#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/kessan/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod config;
pub mod growth;
pub mod registry;
pub mod risk;

pub use config::{GrowthThresholds, RiskThresholds, RuleConfig};
pub use growth::{GrowthAssessment, GrowthFailure, GrowthReason, assess_growth, is_growing};
pub use registry::{
    RuleCategory, RuleInfo, RuleSet, available_rules, get_rule_info, rules_by_category,
    rules_in_set,
};
pub use risk::{RiskAssessment, RiskFinding, RiskReason, RiskRule, assess_risk, risky};
