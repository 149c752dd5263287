//! # Request Routing and Dispatch
//!
//! Dispatches requests on their first path segment:
//!
//! - `OPTIONS *` - CORS preflight, answered before anything else
//! - `GET /` and `GET /index.html` - landing page
//! - `GET /api` - API index
//! - `GET /{platform}` - dataset listing
//! - `GET /{platform}/{file}[/{endpoint}]` - dataset handler
//! - anything else - 404
//!
//! Errors that escape a handler, and panics during dispatch, become a generic
//! 500. The cause is logged and never sent to the client.
//!
//! Two entry points feed [`route`]: [`handle_request`] for the Worker runtime
//! and [`handle_http_request`] for native `http` hosts.

use futures::FutureExt;
use http::Method;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use worker::{Env, Request, Response, Result};

use crate::adapter::{HttpAdapter, ResponseAdapter, WorkerAdapter};
use crate::config::Config;
use crate::constants::CONTENT_TYPE_HTML;
use crate::errors::AppResult;
use crate::handlers::{gate_method, handle_dataset, handle_index, handle_listing};
use crate::log_data;
use crate::logging::Logger;
use crate::models::Platform;
use crate::request::{ApiRequest, RouteParams};
use crate::resolver::decode_segment;
use crate::store::{DatasetStore, R2DatasetStore};

const LANDING_PAGE: &str = include_str!("../public/index.html");

/// Handles a Worker request against the R2 dataset bucket.
pub async fn handle_request(req: Request, env: Env, config: Arc<Config>) -> Result<Response> {
    let log = Logger::for_request();
    let mut res = WorkerAdapter::new();

    let api_req = match ApiRequest::from_worker(&req) {
        Ok(api_req) => api_req,
        Err(error) => {
            log.error("Unreadable request", log_data!("error" => error.to_string()));
            return Ok(internal_error(&mut res)?);
        }
    };

    let store = match env.bucket(&config.bucket_binding) {
        Ok(bucket) => R2DatasetStore::new(bucket, &config.datasets_prefix, log.clone()),
        Err(error) => {
            log.error(
                "Dataset bucket binding unavailable",
                log_data!("binding" => config.bucket_binding, "error" => error.to_string()),
            );
            return Ok(internal_error(&mut res)?);
        }
    };

    Ok(route(api_req, &store, &mut res, &config, &log).await?)
}

/// Handles a native `http` request. Only the request head is read.
pub async fn handle_http_request<B, S>(
    req: &http::Request<B>,
    store: &S,
    config: &Config,
) -> AppResult<http::Response<String>>
where
    S: DatasetStore + ?Sized,
{
    let log = Logger::for_request();
    let mut res = HttpAdapter::new();
    let api_req = ApiRequest::from_http(req)?;
    route(api_req, store, &mut res, config, &log).await
}

/// Routes one request and guarantees a response for anything but a
/// transport failure.
pub async fn route<S, A>(
    req: ApiRequest,
    store: &S,
    res: &mut A,
    config: &Config,
    log: &Logger,
) -> AppResult<A::Output>
where
    S: DatasetStore + ?Sized,
    A: ResponseAdapter,
{
    log.info(
        "Routing request",
        log_data!("method" => req.method.as_str(), "path" => req.path),
    );

    let outcome = AssertUnwindSafe(dispatch(req, store, res, config, log))
        .catch_unwind()
        .await;

    match outcome {
        Ok(Ok(output)) => Ok(output),
        Ok(Err(error)) => {
            log.error("Error handling request", log_data!("error" => error.to_string()));
            internal_error(res)
        }
        Err(_) => {
            log.error("Panic while handling request", None);
            internal_error(res)
        }
    }
}

async fn dispatch<S, A>(
    req: ApiRequest,
    store: &S,
    res: &mut A,
    config: &Config,
    log: &Logger,
) -> AppResult<A::Output>
where
    S: DatasetStore + ?Sized,
    A: ResponseAdapter,
{
    res.enable_cors();

    // Preflight is answered for every path, known or not.
    if req.method == Method::OPTIONS {
        return res.send_empty(200);
    }

    let path = req.path.strip_prefix('/').unwrap_or(&req.path);
    if path.is_empty() || path == "index.html" {
        if let Some(gated) = gate_method(&req.method, res) {
            return gated;
        }
        return res.send_document(200, CONTENT_TYPE_HTML, LANDING_PAGE.to_string());
    }

    let segments: Vec<String> = path
        .split('/')
        .filter(|segment| !segment.is_empty())
        .map(decode_segment)
        .collect();
    let Some((first, rest)) = segments.split_first() else {
        return res.send_error(404, "Not found");
    };

    if first == "api" && rest.is_empty() {
        return handle_index(&req, &config.default_base_url, res);
    }

    let Ok(platform) = first.parse::<Platform>() else {
        return res.send_error(404, "Not found");
    };

    if rest.is_empty() {
        handle_listing(platform, &req, store, res).await
    } else {
        let params = RouteParams::Segments(rest.to_vec());
        handle_dataset(platform, req.with_route_params(params), store, res, log).await
    }
}

fn internal_error<A: ResponseAdapter>(res: &mut A) -> AppResult<A::Output> {
    res.enable_cors();
    res.send_error(500, "Internal server error")
}
