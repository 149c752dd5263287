//! # Handlers Module
//!
//! Request handlers for the dataset API. Every handler enables CORS first,
//! answers preflight requests, and gates on `GET` before touching storage.
//!
//! - **dataset**: `/{platform}/{file}[/{endpoint}]`
//! - **listing**: `/{platform}`
//! - **index**: `/api`

use crate::adapter::ResponseAdapter;
use crate::errors::{AppError, AppResult};
use http::Method;

pub mod dataset;
pub mod index;
pub mod listing;

pub use dataset::handle_dataset;
pub use index::handle_index;
pub use listing::handle_listing;

/// Preflight answer for `OPTIONS`, a 405 for anything but `GET`.
/// Returns `None` when the handler should go on.
pub(crate) fn gate_method<A: ResponseAdapter>(
    method: &Method,
    res: &mut A,
) -> Option<AppResult<A::Output>> {
    if method == Method::OPTIONS {
        return Some(res.send_empty(200));
    }
    if method != Method::GET {
        return Some(send_app_error(res, AppError::MethodNotAllowed));
    }
    None
}

/// Renders client-class errors; anything else is handed back to the router.
pub(crate) fn send_app_error<A: ResponseAdapter>(
    res: &mut A,
    error: AppError,
) -> AppResult<A::Output> {
    if error.is_client_error() {
        res.send_error(error.status_code(), &error.to_string())
    } else {
        Err(error)
    }
}
