use super::{dataset_names, is_valid_file_name, object_key, platform_prefix, DatasetStore};
use crate::log_data;
use crate::logging::Logger;
use crate::models::{Dataset, Platform};
use async_trait::async_trait;
use worker::{Bucket, Result};

/// Dataset store over an R2 bucket laid out as
/// `{prefix}/{platform}/{file}.json`.
pub struct R2DatasetStore {
    bucket: Bucket,
    prefix: String,
    log: Logger,
}

impl R2DatasetStore {
    pub fn new(bucket: Bucket, prefix: &str, log: Logger) -> Self {
        Self {
            bucket,
            prefix: prefix.to_string(),
            log,
        }
    }

    async fn read(&self, key: &str) -> Result<Option<String>> {
        let Some(object) = self.bucket.get(key).execute().await? else {
            return Ok(None);
        };
        match object.body() {
            Some(body) => Ok(Some(body.text().await?)),
            None => Ok(None),
        }
    }

    /// Walks every listing page under the platform prefix.
    async fn list_keys(&self, platform: Platform) -> Result<Vec<String>> {
        let prefix = platform_prefix(&self.prefix, platform);
        let mut keys = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let mut request = self.bucket.list().prefix(prefix.clone());
            if let Some(cursor) = cursor.take() {
                request = request.cursor(cursor);
            }
            let page = request.execute().await?;

            keys.extend(
                page.objects()
                    .iter()
                    .filter_map(|object| object.key().strip_prefix(&prefix).map(str::to_string))
                    // Nested keys are not datasets of this platform.
                    .filter(|name| !name.contains('/')),
            );

            match page.cursor() {
                Some(next) if page.truncated() => cursor = Some(next),
                _ => break,
            }
        }

        Ok(keys)
    }
}

#[async_trait(?Send)]
impl DatasetStore for R2DatasetStore {
    async fn get(&self, platform: Platform, file_name: &str) -> Option<Dataset> {
        if !is_valid_file_name(file_name) {
            return None;
        }

        let key = object_key(&self.prefix, platform, file_name);
        let raw = match self.read(&key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(error) => {
                self.log.error(
                    "Error loading dataset",
                    log_data!("key" => key, "error" => error.to_string()),
                );
                return None;
            }
        };

        match Dataset::from_json(&raw) {
            Ok(dataset) => Some(dataset),
            Err(error) => {
                self.log.error(
                    "Error loading dataset",
                    log_data!("key" => key, "error" => error.to_string()),
                );
                None
            }
        }
    }

    async fn list(&self, platform: Platform) -> Vec<String> {
        match self.list_keys(platform).await {
            Ok(keys) => dataset_names(keys),
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
        if !is_valid_file_name(file_name) {
            return false;
        }
        matches!(
            self.bucket.head(object_key(&self.prefix, platform, file_name)).await,
            Ok(Some(_))
        )
    }
}
