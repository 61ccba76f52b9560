#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/kessan/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod aggregate;
pub mod error;
pub mod feed;
pub mod period;
pub mod series;
pub mod statement;
pub mod store;

pub use aggregate::Aggregate;
pub use error::{DataError, Result};
pub use feed::{FeedKind, FeedLoader, LoadReport, LoaderConfig, SentinelPolicy};
pub use period::Period;
pub use series::Series;
pub use statement::{BalanceSheet, CashFlow, Dividend, Fragment, FragmentKind, ProfitLoss};
pub use store::{AggregateStore, StoreSnapshot, UpsertOutcome};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_snapshot_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<StoreSnapshot>();
        assert_send_sync::<Series>();
    }
}
