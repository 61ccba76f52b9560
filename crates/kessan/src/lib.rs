#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/kessan/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod screener;

// Re-export main types from sub-crates
pub use kessan_data as data;
pub use kessan_output as output;
pub use kessan_rules as rules;

pub use screener::{
    CompanyDiagnosis, CompanyVerdict, ScreenCriteria, ScreenResult, Screener, UnknownCriteria,
};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
