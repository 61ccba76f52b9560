//! Settings file.
//!
//! Settings come from `--config PATH` or, failing that, from
//! `<config dir>/kessan/config.json` when it exists. Every field is optional;
//! command-line flags override whatever the file says.

use kessan_data::LoaderConfig;
use kessan_rules::RuleConfig;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Error type for settings loading.
#[derive(Debug, thiserror::Error)]
pub(crate) enum ConfigError {
    /// The file could not be read.
    #[error("cannot read settings file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The file is not valid settings JSON.
    #[error("invalid settings file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Everything the binary can be configured with.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct Settings {
    /// Directory holding the four feed files
    pub(crate) data_dir: Option<PathBuf>,
    /// Rule thresholds
    pub(crate) rules: RuleConfig,
    /// Feed parsing
    pub(crate) loader: LoaderConfig,
}

/// Default settings location.
pub(crate) fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("kessan").join("config.json"))
}

impl Settings {
    /// Load settings from `explicit`, else from the default location if a
    /// file exists there, else defaults.
    ///
    /// An explicit path that does not exist is an error.
    pub(crate) fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => match default_config_path() {
                Some(path) if path.is_file() => Self::from_file(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    /// Parse a settings file.
    pub(crate) fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "loaded settings");
        Ok(settings)
    }

    /// Data directory: the flag if given, else the file's, else the
    /// working directory.
    pub(crate) fn resolve_data_dir(&self, flag: Option<PathBuf>) -> PathBuf {
        flag.or_else(|| self.data_dir.clone())
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kessan_data::feed::{Field, SentinelPolicy};

    fn write_settings(name: &str, contents: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("kessan-bin-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_partial_settings_keep_defaults() {
        let path = write_settings(
            "partial.json",
            r#"{"rules": {"growth": {"min_growth_ratio": 1.2}}}"#,
        );
        let settings = Settings::from_file(&path).unwrap();
        assert_eq!(settings.rules.growth.min_growth_ratio, 1.2);
        assert_eq!(settings.rules.growth.min_roe, 10.0);
        assert_eq!(settings.rules.risk, RuleConfig::default().risk);
        assert!(settings.data_dir.is_none());
        fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_loader_settings() {
        let path = write_settings(
            "loader.json",
            r#"{"data_dir": "/srv/feeds", "loader": {"sentinel": "n/a", "policies": {"payout_ratio": "zero"}}}"#,
        );
        let settings = Settings::from_file(&path).unwrap();
        assert_eq!(settings.loader.sentinel, "n/a");
        assert_eq!(
            settings.loader.policy_for(Field::PayoutRatio),
            SentinelPolicy::Zero
        );
        assert_eq!(
            settings.resolve_data_dir(None),
            PathBuf::from("/srv/feeds")
        );
        assert_eq!(
            settings.resolve_data_dir(Some(PathBuf::from("data"))),
            PathBuf::from("data")
        );
        fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        let path = write_settings("typo.json", r#"{"rulez": {}}"#);
        assert!(matches!(
            Settings::from_file(&path),
            Err(ConfigError::Parse { .. })
        ));
        fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_missing_explicit_file() {
        let missing = std::env::temp_dir().join("kessan-bin-does-not-exist.json");
        assert!(matches!(
            Settings::load(Some(&missing)),
            Err(ConfigError::Read { .. })
        ));
    }

    #[test]
    fn test_default_data_dir() {
        assert_eq!(Settings::default().resolve_data_dir(None), PathBuf::from("."));
    }
}
