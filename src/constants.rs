//! # Application Constants
//!
//! Application-wide constants for the OpenRank API: Worker binding names,
//! storage defaults, and the CORS policy applied to every response.

/// KV namespace binding holding the optional runtime configuration
pub const API_CONFIG_KV_NAME: &str = "API_CONFIG";

/// Key under which the configuration document is stored in KV
pub const API_CONFIG_KEY: &str = "config";

/// Standard R2 bucket binding name for dataset documents
pub const DATASETS_BUCKET_NAME: &str = "DATASETS";

/// Key prefix (R2) and directory name (filesystem) holding the platform trees
pub const DEFAULT_DATASETS_PREFIX: &str = "datasets";

/// Extension every dataset document carries
pub const DATASET_EXTENSION: &str = ".json";

/// Base URL advertised by the API index when the request has no Host header
pub const DEFAULT_BASE_URL: &str = "https://api.openrank.com";

/// CORS header for allowed origins
pub const CORS_ALLOW_ORIGIN: &str = "*";

/// CORS header for allowed methods
pub const CORS_ALLOW_METHODS: &str = "GET, OPTIONS";

/// CORS header for allowed headers
pub const CORS_ALLOW_HEADERS: &str = "Content-Type";

pub const CONTENT_TYPE_JSON: &str = "application/json";

pub const CONTENT_TYPE_HTML: &str = "text/html; charset=utf-8";
