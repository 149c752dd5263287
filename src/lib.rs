//! # OpenRank API - Cloudflare Workers
//!
//! A read-only JSON API serving pre-computed reputation scores for Discord,
//! GitHub, Telegram and X communities. Datasets are immutable JSON documents
//! stored as `datasets/{platform}/{file}.json`, in an R2 bucket when running
//! as a Worker and on disk when embedded in a native host.
//!
//! ## Architecture
//!
//! - **Router**: dispatches on the first path segment
//! - **Resolver**: turns path segments and query strings into dataset requests
//! - **Handlers**: one generic dataset handler for every platform, plus listing
//!   and index handlers
//! - **Store**: read-only dataset lookup (R2 or filesystem)
//! - **Pagination**: bounds-safe slicing of score sequences
//! - **Adapter**: emits identical responses on the Worker and `http` transports
//!
//! ## Endpoints
//!
//! ```text
//! GET /{platform}                           - List datasets
//! GET /{platform}/{file}                    - Full dataset
//! GET /{platform}/{file}/seed               - Seed
//! GET /{platform}/{file}/{id_field}         - Platform identifier
//! GET /{platform}/{file}/scores?start&size  - Paginated scores
//! GET /api                                  - API index
//! ```

use std::sync::{Arc, OnceLock};
use worker::*;

pub mod adapter;
pub mod config;
pub mod constants;
pub mod errors;
pub mod handlers;
pub mod logging;
pub mod models;
pub mod pagination;
pub mod request;
pub mod resolver;
pub mod router;
pub mod store;

use config::{Config, ConfigLoad};
use constants::API_CONFIG_KV_NAME;
use logging::Logger;

static CONFIG_CACHE: OnceLock<Arc<Config>> = OnceLock::new();

/// Main entry point for the Cloudflare Worker.
///
/// Installs the panic hook, loads configuration once per isolate and hands
/// the request to the router.
#[event(fetch)]
pub async fn main(req: Request, env: Env, _ctx: Context) -> Result<Response> {
    console_error_panic_hook::set_once();

    let config = load_config(&env).await;

    router::handle_request(req, env, config).await
}

/// Configuration from KV, or the defaults when the namespace is not bound
/// or cannot be read. A missing binding is final for the isolate, so its
/// defaults are cached too; read failures are retried on the next request.
async fn load_config(env: &Env) -> Arc<Config> {
    if let Some(config) = CONFIG_CACHE.get() {
        return config.clone();
    }

    let log = Logger::new("config".to_string());
    let outcome = match env.kv(API_CONFIG_KV_NAME) {
        Ok(kv) => match Config::load(&kv, &log).await {
            Ok(config) => ConfigLoad::Loaded(config),
            Err(error) => ConfigLoad::Unreadable(error),
        },
        Err(error) => ConfigLoad::Unbound(error),
    };

    let (config, cacheable) = outcome.settle(&log);
    let config = Arc::new(config);
    if cacheable {
        let _ = CONFIG_CACHE.set(config.clone());
    }
    config
}
