//! Layered configuration for shelf.
//!
//! Values are merged from, in increasing order of precedence:
//! 1. built-in defaults,
//! 2. a TOML file (an explicit path, or `shelf.toml` in the platform
//!    configuration directory if it exists),
//! 3. environment variables prefixed with `SHELF_`, with `__` separating
//!    nested keys (`SHELF_REMOTE__BASE_URL`).

pub mod error;

use crate::error::{ErrorKind, Result};
use derive_more::Display;
use directories::ProjectDirs;
use exn::ResultExt;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};
use shelf_models::SeedSource;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CONFIG_FILE: &str = "shelf.toml";
pub const ENV_PREFIX: &str = "SHELF_";
const GOOGLE_BOOKS_URL: &str = "https://www.googleapis.com/books/v1/volumes";
const MAX_LOOKUP_RESULTS: u8 = 40;

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "shelf")
}

/// Medium the local cache is persisted to.
#[derive(Debug, Display, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    /// Single SQLite file (`shelf.db`) inside the data directory.
    #[default]
    #[display("sqlite")]
    Sqlite,
    /// One file per cached value inside the data directory.
    #[display("local")]
    Local,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    /// Base URL of the remote catalog. Without one the client works offline.
    pub base_url: Option<String>,
    pub timeout_secs: u64,
}
impl Default for RemoteConfig {
    fn default() -> Self {
        Self { base_url: None, timeout_secs: 10 }
    }
}
impl RemoteConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LookupConfig {
    pub base_url: String,
    pub country: String,
    pub max_results: u8,
    pub timeout_secs: u64,
}
impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            base_url: GOOGLE_BOOKS_URL.to_string(),
            country: "US".to_string(),
            max_results: MAX_LOOKUP_RESULTS,
            timeout_secs: 10,
        }
    }
}
impl LookupConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Artificial delay added to every remote attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LatencyConfig {
    pub min_ms: u64,
    pub max_ms: u64,
}
impl Default for LatencyConfig {
    fn default() -> Self {
        Self { min_ms: 140, max_ms: 320 }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub data_dir: PathBuf,
    /// Seed catalog used when nothing has been persisted yet.
    pub seed: SeedSource,
    pub storage: StorageConfig,
    pub remote: RemoteConfig,
    pub lookup: LookupConfig,
    pub latency: LatencyConfig,
}
impl Default for Config {
    fn default() -> Self {
        let data_dir = project_dirs().map(|dirs| dirs.data_dir().to_path_buf()).unwrap_or_else(|| PathBuf::from(".shelf"));
        Self {
            data_dir,
            seed: SeedSource::default(),
            storage: StorageConfig::default(),
            remote: RemoteConfig::default(),
            lookup: LookupConfig::default(),
            latency: LatencyConfig::default(),
        }
    }
}

impl Config {
    /// `shelf.toml` in the platform configuration directory.
    pub fn default_path() -> Option<PathBuf> {
        project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE))
    }

    /// Every layer merged, without extraction or validation.
    ///
    /// An explicit `path` is used as-is; otherwise the default path is used if
    /// the file exists.
    pub fn figment(path: Option<&Path>) -> Result<Figment> {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));
        match path {
            Some(path) if !path.is_file() => exn::bail!(ErrorKind::NotFound(path.to_path_buf())),
            Some(path) => figment = figment.merge(Toml::file_exact(path)),
            None => {
                if let Some(path) = Self::default_path().filter(|p| p.is_file()) {
                    tracing::debug!(path = %path.display(), "Using default configuration file");
                    figment = figment.merge(Toml::file_exact(path));
                }
            },
        }
        Ok(figment.merge(Env::prefixed(ENV_PREFIX).split("__")))
    }

    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config: Config = Self::figment(path)?.extract().or_raise(|| ErrorKind::Invalid)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.latency.min_ms > self.latency.max_ms {
            exn::bail!(ErrorKind::Validation(format!(
                "latency.min_ms ({}) is greater than latency.max_ms ({})",
                self.latency.min_ms, self.latency.max_ms
            )));
        }
        if !(1..=MAX_LOOKUP_RESULTS).contains(&self.lookup.max_results) {
            exn::bail!(ErrorKind::Validation(format!(
                "lookup.max_results must be between 1 and {MAX_LOOKUP_RESULTS}, got {}",
                self.lookup.max_results
            )));
        }
        if self.remote.base_url.as_deref().is_some_and(|url| url.trim().is_empty()) {
            exn::bail!(ErrorKind::Validation("remote.base_url is empty".to_string()));
        }
        Ok(())
    }

    pub fn latency(&self) -> (Duration, Duration) {
        (Duration::from_millis(self.latency.min_ms), Duration::from_millis(self.latency.max_ms))
    }

    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join("shelf.db")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;
    use rstest::rstest;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.seed, SeedSource::Compact);
        assert_eq!(config.storage.backend, StorageKind::Sqlite);
        assert_eq!(config.remote.base_url, None);
        assert_eq!(config.lookup.max_results, 40);
        assert_eq!(config.latency(), (Duration::from_millis(140), Duration::from_millis(320)));
        config.validate().unwrap();
    }

    #[test]
    fn test_file_then_env() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "custom.toml",
                r#"
                    data_dir = "/var/lib/shelf"
                    seed = "server"

                    [remote]
                    base_url = "http://localhost:3000"

                    [latency]
                    min_ms = 0
                    max_ms = 0
                "#,
            )?;
            jail.set_env("SHELF_REMOTE__TIMEOUT_SECS", "3");
            jail.set_env("SHELF_STORAGE__BACKEND", "local");

            let config = Config::load(Some(Path::new("custom.toml"))).unwrap();
            assert_eq!(config.data_dir, PathBuf::from("/var/lib/shelf"));
            assert_eq!(config.seed, SeedSource::Server);
            assert_eq!(config.storage.backend, StorageKind::Local);
            assert_eq!(config.remote.base_url.as_deref(), Some("http://localhost:3000"));
            assert_eq!(config.remote.timeout(), Duration::from_secs(3));
            assert_eq!(config.latency(), (Duration::ZERO, Duration::ZERO));
            // Untouched sections keep their defaults.
            assert_eq!(config.lookup, LookupConfig::default());
            Ok(())
        });
    }

    #[test]
    fn test_env_overrides_file() {
        Jail::expect_with(|jail| {
            jail.create_file("shelf.toml", "seed = \"server\"")?;
            jail.set_env("SHELF_SEED", "static");
            let config = Config::load(Some(Path::new("shelf.toml"))).unwrap();
            assert_eq!(config.seed, SeedSource::Compact);
            Ok(())
        });
    }

    #[test]
    fn test_missing_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(Some(&dir.path().join("missing.toml"))).unwrap_err();
        assert!(matches!(&*err, ErrorKind::NotFound(_)));
    }

    #[test]
    fn test_malformed_file() {
        Jail::expect_with(|jail| {
            jail.create_file("shelf.toml", "[latency]\nmin_ms = \"soon\"")?;
            let err = Config::load(Some(Path::new("shelf.toml"))).unwrap_err();
            assert!(matches!(&*err, ErrorKind::Invalid));
            Ok(())
        });
    }

    #[rstest]
    #[case(LatencyConfig { min_ms: 500, max_ms: 100 }, 40)]
    #[case(LatencyConfig::default(), 0)]
    #[case(LatencyConfig::default(), 41)]
    fn test_validation(#[case] latency: LatencyConfig, #[case] max_results: u8) {
        let config = Config { latency, lookup: LookupConfig { max_results, ..Default::default() }, ..Default::default() };
        let err = config.validate().unwrap_err();
        assert!(matches!(&*err, ErrorKind::Validation(_)));
    }
}
