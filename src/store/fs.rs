use super::{dataset_names, is_valid_file_name, DatasetStore};
use crate::config::Config;
use crate::constants::DATASET_EXTENSION;
use crate::log_data;
use crate::logging::Logger;
use crate::models::{Dataset, Platform};
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Dataset store over a `{root}/{platform}/{file}.json` directory tree.
///
/// The root is probed on every call from a prioritized candidate list; the
/// first candidate that exists wins, and the first candidate is used when
/// none does. Deployments that know their layout pass a single candidate.
#[derive(Clone, Debug)]
pub struct FsDatasetStore {
    candidates: Vec<PathBuf>,
    log: Logger,
}

impl FsDatasetStore {
    pub fn new(candidates: Vec<PathBuf>) -> Self {
        Self {
            candidates,
            log: Logger::new("dataset-store".to_string()),
        }
    }

    /// Store probing the configured `dataset_roots`.
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.dataset_root_candidates())
    }

    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self::new(vec![root.into()])
    }

    /// Currently effective base directory.
    pub fn root(&self) -> PathBuf {
        self.candidates
            .iter()
            .find(|candidate| candidate.exists())
            .or_else(|| self.candidates.first())
            .cloned()
            .unwrap_or_default()
    }

    fn dataset_path(&self, platform: Platform, file_name: &str) -> PathBuf {
        self.root()
            .join(platform.as_str())
            .join(format!("{}{}", file_name, DATASET_EXTENSION))
    }

    fn read(&self, path: &Path) -> Result<Dataset, String> {
        let raw = std::fs::read_to_string(path).map_err(|e| e.to_string())?;
        Dataset::from_json(&raw).map_err(|e| e.to_string())
    }
}

#[async_trait(?Send)]
impl DatasetStore for FsDatasetStore {
    async fn get(&self, platform: Platform, file_name: &str) -> Option<Dataset> {
        if !self.exists(platform, file_name).await {
            return None;
        }

        match self.read(&self.dataset_path(platform, file_name)) {
            Ok(dataset) => Some(dataset),
            Err(error) => {
                self.log.error(
                    "Error loading dataset",
                    log_data!(
                        "platform" => platform.as_str(),
                        "file_name" => file_name,
                        "error" => error
                    ),
                );
                None
            }
        }
    }

    async fn list(&self, platform: Platform) -> Vec<String> {
        let dir = self.root().join(platform.as_str());
        if !dir.is_dir() {
            return Vec::new();
        }

        match std::fs::read_dir(&dir) {
            Ok(entries) => dataset_names(
                entries
                    .flatten()
                    .filter(|entry| entry.path().is_file())
                    .map(|entry| entry.file_name().to_string_lossy().into_owned()),
            ),
            Err(error) => {
                self.log.error(
                    "Error listing datasets",
                    log_data!("platform" => platform.as_str(), "error" => error.to_string()),
                );
                Vec::new()
            }
        }
    }

    async fn exists(&self, platform: Platform, file_name: &str) -> bool {
        is_valid_file_name(file_name) && self.dataset_path(platform, file_name).is_file()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use futures::executor::block_on;
    use serde_json::json;

    pub(crate) fn fixture_root() -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/datasets")
    }

    pub(crate) fn fixture_store() -> FsDatasetStore {
        FsDatasetStore::with_root(fixture_root())
    }

    #[test]
    fn loads_an_existing_dataset() {
        let dataset = block_on(fixture_store().get(Platform::Discord, "ritual")).unwrap();
        assert_eq!(dataset.seed(), &json!(7));
        assert_eq!(dataset.field("server_id"), &json!("abc"));
        assert_eq!(dataset.scores().map(<[_]>::len), Some(5));
    }

    #[test]
    fn missing_files_are_absent() {
        let store = fixture_store();
        assert!(block_on(store.get(Platform::Discord, "does-not-exist")).is_none());
        assert!(!block_on(store.exists(Platform::Discord, "does-not-exist")));
        // Same name, wrong platform namespace.
        assert!(block_on(store.get(Platform::Github, "ritual")).is_none());
    }

    #[test]
    fn malformed_json_is_absent_not_fatal() {
        let store = fixture_store();
        assert!(block_on(store.exists(Platform::Discord, "broken")));
        assert!(block_on(store.get(Platform::Discord, "broken")).is_none());
    }

    #[test]
    fn traversal_names_are_never_read() {
        let store = fixture_store();
        assert!(block_on(store.get(Platform::Discord, "../github/bitcoin")).is_none());
        assert!(block_on(store.get(Platform::Discord, "..")).is_none());
    }

    #[test]
    fn lists_json_files_sorted_without_extension() {
        let names = block_on(fixture_store().list(Platform::Discord));
        assert_eq!(names, vec!["broken", "noscores", "ritual", "weekly digest"]);
    }

    #[test]
    fn missing_platform_directory_lists_empty() {
        assert!(block_on(fixture_store().list(Platform::Telegram)).is_empty());
    }

    #[test]
    fn first_existing_candidate_wins() {
        let store = FsDatasetStore::new(vec![
            PathBuf::from("/definitely/not/here/datasets"),
            fixture_root(),
            PathBuf::from("datasets"),
        ]);
        assert_eq!(store.root(), fixture_root());
        assert!(block_on(store.get(Platform::Github, "bitcoin")).is_some());
    }

    #[test]
    fn roots_come_from_configuration() {
        let config = Config {
            dataset_roots: vec!["/definitely/not/here".into(), fixture_root().display().to_string()],
            ..Config::default()
        };
        let store = FsDatasetStore::from_config(&config);
        assert_eq!(block_on(store.list(Platform::X)), vec!["ritual-community"]);
    }

    #[test]
    fn falls_back_to_the_first_candidate() {
        let store = FsDatasetStore::new(vec![
            PathBuf::from("/definitely/not/here/datasets"),
            PathBuf::from("/nor/here"),
        ]);
        assert_eq!(store.root(), PathBuf::from("/definitely/not/here/datasets"));
        assert!(block_on(store.list(Platform::Discord)).is_empty());
    }
}
