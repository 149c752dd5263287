//! # Dataset Handler
//!
//! Serves one dataset document and its sub-resources for a platform:
//!
//! ```text
//! GET /{platform}/{file}                      → the whole document
//! GET /{platform}/{file}/seed                 → { "seed": ... }
//! GET /{platform}/{file}/{secondary_id_field} → { "<field>": ... }
//! GET /{platform}/{file}/scores?start&size    → { "scores": [...], "pagination": {...} }
//! ```
//!
//! A missing dataset is reported before the endpoint is looked at.

use super::{gate_method, send_app_error};
use crate::adapter::ResponseAdapter;
use crate::errors::{AppError, AppResult};
use crate::log_data;
use crate::logging::Logger;
use crate::models::{Dataset, Endpoint, Platform, RouteRequest, ScoresPage};
use crate::pagination::paginate;
use crate::request::ApiRequest;
use crate::resolver::{pagination_window, resolve};
use crate::store::DatasetStore;
use serde_json::{json, Value};

pub async fn handle_dataset<S, A>(
    platform: Platform,
    req: ApiRequest,
    store: &S,
    res: &mut A,
    log: &Logger,
) -> AppResult<A::Output>
where
    S: DatasetStore + ?Sized,
    A: ResponseAdapter,
{
    res.enable_cors();

    if let Some(gated) = gate_method(&req.method, res) {
        return gated;
    }

    let route = match resolve(platform, &req.path, req.route_params.clone()) {
        Ok(route) => route,
        Err(error) => return send_app_error(res, error),
    };

    let Some(dataset) = store.get(platform, &route.file_name).await else {
        log.info(
            "Dataset not found",
            log_data!("platform" => platform.as_str(), "file_name" => route.file_name),
        );
        return send_app_error(res, AppError::not_found("File not found"));
    };

    match &route.endpoint {
        Endpoint::Document => res.send_response(200, dataset.document()),
        Endpoint::Scores => {
            let scores = scores_of(&dataset, &route)?;
            let page = paginate(scores, pagination_window(&req.query));
            res.send_response(
                200,
                &ScoresPage {
                    scores: page.items,
                    pagination: page.meta(),
                },
            )
        }
        Endpoint::Seed | Endpoint::SecondaryId => {
            res.send_response(200, &field_body(&dataset, &route))
        }
        Endpoint::Unknown(_) => send_app_error(res, AppError::not_found("Endpoint not found")),
    }
}

/// `{ "<field>": value }` for the scalar endpoints.
fn field_body(dataset: &Dataset, route: &RouteRequest) -> Value {
    let field = match route.endpoint {
        Endpoint::SecondaryId => route.platform.secondary_id_field(),
        _ => "seed",
    };
    json!({ field: dataset.field(field) })
}

fn scores_of<'a>(dataset: &'a Dataset, route: &RouteRequest) -> AppResult<&'a [Value]> {
    dataset.scores().ok_or_else(|| {
        AppError::Internal(format!(
            "dataset {}/{} has no scores array",
            route.platform, route.file_name
        ))
    })
}
