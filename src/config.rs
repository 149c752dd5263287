//! # Configuration Management
//!
//! Runtime configuration for the OpenRank API. Configuration is stored in
//! Cloudflare KV under the `config` key and loaded once per isolate, with
//! defaults for every field so a partial (or absent) document is valid.
//!
//! ## Configuration Options
//!
//! - `bucket_binding`: R2 binding holding the dataset documents
//! - `datasets_prefix`: key prefix of the platform trees inside the bucket
//! - `dataset_roots`: filesystem candidates probed by the native store
//! - `default_base_url`: base URL advertised by `/api` without a Host header
//!
//! ## Example
//!
//! ```text
//! {
//!   "bucket_binding": "DATASETS",
//!   "datasets_prefix": "datasets",
//!   "dataset_roots": ["/var/task/datasets", "datasets"]
//! }
//! ```

use crate::constants::{
    API_CONFIG_KEY, DATASETS_BUCKET_NAME, DEFAULT_BASE_URL, DEFAULT_DATASETS_PREFIX,
};
use crate::log_data;
use crate::logging::Logger;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use worker::kv::KvStore;
use worker::Result;

/// Configuration structure for the dataset API.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Name of the R2 bucket binding holding dataset documents.
    /// Must match the binding name in wrangler.toml.
    pub bucket_binding: String,

    /// Prefix under which `{platform}/{file}.json` objects live.
    pub datasets_prefix: String,

    /// Candidate base directories for the filesystem store, in priority
    /// order. The first one that exists wins.
    pub dataset_roots: Vec<String>,

    pub default_base_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bucket_binding: DATASETS_BUCKET_NAME.to_string(),
            datasets_prefix: DEFAULT_DATASETS_PREFIX.to_string(),
            dataset_roots: vec![DEFAULT_DATASETS_PREFIX.to_string()],
            default_base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl Config {
    /// Loads configuration from KV storage with fallback to defaults.
    ///
    /// # Errors
    ///
    /// KV access failures are propagated; a missing key yields the defaults.
    pub async fn load(kv: &KvStore, log: &Logger) -> Result<Self> {
        match kv.get(API_CONFIG_KEY).json::<Config>().await? {
            Some(config) => {
                log.info("Configuration loaded from KV storage", None);
                Ok(config)
            }
            None => {
                log.info("Config not found in KV, using default", None);
                Ok(Self::default())
            }
        }
    }

    /// Filesystem candidates as paths, in probe order.
    pub fn dataset_root_candidates(&self) -> Vec<PathBuf> {
        self.dataset_roots.iter().map(PathBuf::from).collect()
    }
}

/// Outcome of looking up configuration for an isolate.
#[derive(Debug)]
pub enum ConfigLoad {
    Loaded(Config),
    /// The KV namespace is not bound. This holds for the isolate's lifetime.
    Unbound(worker::Error),
    /// The namespace is bound but could not be read this time.
    Unreadable(worker::Error),
}

impl ConfigLoad {
    /// Configuration to serve with, and whether it may be cached for the
    /// rest of the isolate's lifetime.
    pub fn settle(self, log: &Logger) -> (Config, bool) {
        match self {
            ConfigLoad::Loaded(config) => (config, true),
            ConfigLoad::Unbound(error) => {
                log.warn(
                    "Configuration namespace not bound, using defaults",
                    log_data!("error" => error.to_string()),
                );
                (Config::default(), true)
            }
            ConfigLoad::Unreadable(error) => {
                log.warn(
                    "Configuration unavailable, using defaults",
                    log_data!("error" => error.to_string()),
                );
                (Config::default(), false)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn log() -> Logger {
        Logger::new("config-test".to_string())
    }

    #[test]
    fn loaded_configuration_is_cached() {
        let config = Config {
            datasets_prefix: "scores".into(),
            ..Config::default()
        };
        let (settled, cache) = ConfigLoad::Loaded(config.clone()).settle(&log());
        assert_eq!(settled, config);
        assert!(cache);
    }

    #[test]
    fn missing_binding_caches_the_defaults() {
        let error = worker::Error::RustError("no binding found for `API_CONFIG`".into());
        let (settled, cache) = ConfigLoad::Unbound(error).settle(&log());
        assert_eq!(settled, Config::default());
        assert!(cache);
    }

    #[test]
    fn read_failures_are_retried() {
        let error = worker::Error::RustError("kv unavailable".into());
        let (settled, cache) = ConfigLoad::Unreadable(error).settle(&log());
        assert_eq!(settled, Config::default());
        assert!(!cache);
    }

    #[test]
    fn partial_documents_fill_in_defaults() {
        let config: Config =
            serde_json::from_str(r#"{ "datasets_prefix": "scores" }"#).unwrap();
        assert_eq!(config.datasets_prefix, "scores");
        assert_eq!(config.bucket_binding, DATASETS_BUCKET_NAME);
        assert_eq!(config.dataset_roots, vec!["datasets".to_string()]);
        assert_eq!(config.default_base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn root_candidates_keep_priority_order() {
        let config = Config {
            dataset_roots: vec!["/var/task/datasets".into(), "datasets".into()],
            ..Config::default()
        };
        assert_eq!(
            config.dataset_root_candidates(),
            vec![PathBuf::from("/var/task/datasets"), PathBuf::from("datasets")]
        );
    }
}
