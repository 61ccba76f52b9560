//! Statement feeds.
//!
//! Each feed is a CSV file with one row per company and period, laid out at
//! fixed column positions. [`FeedLoader`] turns rows into fragments and merges
//! them into an [`AggregateStore`](crate::AggregateStore).

pub mod layout;
pub mod loader;
pub mod policy;

pub use layout::{
    BalanceSheetColumns, CashFlowColumns, DividendColumns, FeedKind, FeedLayouts,
    ProfitLossColumns,
};
pub use loader::{FeedLoader, LoadReport, SkipReason, SkippedRow};
pub use policy::{DEFAULT_SENTINEL, Field, LoaderConfig, SentinelPolicy};
