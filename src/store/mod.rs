//! # Dataset Store
//!
//! Read-only lookup of dataset documents by `(platform, file name)`.
//!
//! ## Implementations
//!
//! - **FsDatasetStore**: `{root}/{platform}/{file}.json` on a local disk
//! - **R2DatasetStore**: `{prefix}/{platform}/{file}.json` in an R2 bucket
//!
//! Storage failures never surface as errors: a document that cannot be read
//! or parsed is logged and reported as absent, and a listing that fails is
//! logged and reported as empty.

use crate::constants::DATASET_EXTENSION;
use crate::models::{Dataset, Platform};
use async_trait::async_trait;

pub mod fs;
pub mod r2;

pub use fs::FsDatasetStore;
pub use r2::R2DatasetStore;

#[async_trait(?Send)]
pub trait DatasetStore {
    /// Fetches and parses one dataset document.
    async fn get(&self, platform: Platform, file_name: &str) -> Option<Dataset>;

    /// Available file names for the platform, extension stripped, sorted.
    async fn list(&self, platform: Platform) -> Vec<String>;

    async fn exists(&self, platform: Platform, file_name: &str) -> bool {
        self.get(platform, file_name).await.is_some()
    }
}

/// File names that could escape the platform namespace are never looked up.
pub(crate) fn is_valid_file_name(file_name: &str) -> bool {
    !file_name.is_empty()
        && !file_name.starts_with('.')
        && !file_name.contains(['/', '\\'])
}

/// Keeps `.json` entries that can be looked up again, strips the extension
/// and sorts.
pub(crate) fn dataset_names<I>(entries: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut names: Vec<String> = entries
        .into_iter()
        .filter_map(|entry| entry.strip_suffix(DATASET_EXTENSION).map(str::to_string))
        .filter(|name| is_valid_file_name(name))
        .collect();
    names.sort();
    names
}

/// Object-key prefix holding one platform's datasets, with a trailing `/`.
/// Slashes around `prefix` are ignored and an empty prefix means the bucket
/// root.
pub(crate) fn platform_prefix(prefix: &str, platform: Platform) -> String {
    match prefix.trim_matches('/') {
        "" => format!("{}/", platform.as_str()),
        prefix => format!("{}/{}/", prefix, platform.as_str()),
    }
}

pub(crate) fn object_key(prefix: &str, platform: Platform, file_name: &str) -> String {
    format!(
        "{}{}{}",
        platform_prefix(prefix, platform),
        file_name,
        DATASET_EXTENSION
    )
}
