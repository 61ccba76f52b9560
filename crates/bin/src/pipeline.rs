//! Ingestion pipeline.
//!
//! Runs one pass per feed file against a fresh store and freezes it. Any
//! fatal error discards the whole store; nothing is screened on partial
//! ingestion.

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use kessan_data::{
    AggregateStore, DataError, FeedKind, FeedLoader, LoadReport, LoaderConfig, StoreSnapshot,
};
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Error type for the ingestion pipeline.
#[derive(Debug, thiserror::Error)]
pub(crate) enum PipelineError {
    /// The data directory does not exist.
    #[error("data directory not found: {0}")]
    MissingDataDir(PathBuf),
    /// A feed could not be loaded.
    #[error("failed to load {feed} feed: {source}")]
    Load {
        feed: FeedKind,
        source: DataError,
    },
}

/// Result of a complete ingestion run.
#[derive(Debug)]
pub(crate) struct Ingested {
    /// The frozen store
    pub(crate) snapshot: StoreSnapshot,
    /// One report per feed that was present
    pub(crate) reports: Vec<LoadReport>,
}

fn progress_bar(len: u64) -> ProgressBar {
    let pb = ProgressBar::new(len);
    if !std::io::stderr().is_terminal() {
        pb.set_draw_target(ProgressDrawTarget::hidden());
    }
    if let Ok(style) = ProgressStyle::default_bar()
        .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
    {
        pb.set_style(style.progress_chars("█▓░"));
    }
    pb
}

/// Load every feed under `dir` and freeze the store.
///
/// Missing feed files are skipped with a warning; the companies they would
/// have covered come out incomplete.
pub(crate) fn ingest(dir: &Path, config: LoaderConfig) -> Result<Ingested, PipelineError> {
    if !dir.is_dir() {
        return Err(PipelineError::MissingDataDir(dir.to_path_buf()));
    }

    let loader = FeedLoader::new(config);
    let mut store = AggregateStore::new();
    let mut reports = Vec::new();

    let pb = progress_bar(FeedKind::ALL.len() as u64);
    for feed in FeedKind::ALL {
        pb.set_message(format!("Loading {feed}..."));
        let path = dir.join(feed.file_name());
        if path.is_file() {
            match loader.load_path(feed, &path, &mut store) {
                Ok(report) => reports.push(report),
                Err(source) => {
                    pb.finish_with_message("Failed!");
                    return Err(PipelineError::Load { feed, source });
                }
            }
        } else {
            warn!(%feed, path = %path.display(), "feed file not found, skipping");
        }
        pb.inc(1);
    }

    let skipped: usize = reports.iter().map(|r| r.skipped.len()).sum();
    pb.finish_with_message(format!(
        "Loaded {} companies ({} rows skipped)",
        store.codes().len(),
        skipped
    ));
    info!(
        companies = store.codes().len(),
        aggregates = store.len(),
        skipped,
        "ingestion complete"
    );

    let snapshot = store.freeze();
    for (kind, aggregates) in snapshot.coverage() {
        debug!(%kind, aggregates, "statement coverage");
    }

    Ok(Ingested { snapshot, reports })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "kessan-pipeline-{}-{}",
            std::process::id(),
            name
        ));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_missing_data_dir() {
        let dir = std::env::temp_dir().join("kessan-pipeline-no-such-dir");
        assert!(matches!(
            ingest(&dir, LoaderConfig::default()),
            Err(PipelineError::MissingDataDir(_))
        ));
    }

    #[test]
    fn test_partial_feeds() {
        let dir = scratch_dir("partial");
        fs::write(
            dir.join(FeedKind::ProfitLoss.file_name()),
            "code,period,revenue,operating,ordinary,net,eps,roe,roa\n\
             100A,2023/03,120,110,100,80,12.0,11.0,6.0\n",
        )
        .unwrap();

        let ingested = ingest(&dir, LoaderConfig::default()).unwrap();
        assert_eq!(ingested.reports.len(), 1);
        assert_eq!(ingested.snapshot.codes(), vec!["100A".to_string()]);
        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_fatal_row_aborts() {
        let dir = scratch_dir("fatal");
        fs::write(
            dir.join(FeedKind::ProfitLoss.file_name()),
            "code,period,revenue,operating,ordinary,net,eps,roe,roa\n\
             100A,2023/03,120,110,100,-,12.0,11.0,6.0\n",
        )
        .unwrap();

        let err = ingest(&dir, LoaderConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Load {
                feed: FeedKind::ProfitLoss,
                ..
            }
        ));
        fs::remove_dir_all(dir).unwrap();
    }
}
