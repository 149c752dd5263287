use super::gate_method;
use crate::adapter::ResponseAdapter;
use crate::errors::AppResult;
use crate::models::{DatasetList, Platform};
use crate::request::ApiRequest;
use crate::store::DatasetStore;

/// `GET /{platform}` → `{ "datasets": [...] }`, sorted.
pub async fn handle_listing<S, A>(
    platform: Platform,
    req: &ApiRequest,
    store: &S,
    res: &mut A,
) -> AppResult<A::Output>
where
    S: DatasetStore + ?Sized,
    A: ResponseAdapter,
{
    res.enable_cors();

    if let Some(gated) = gate_method(&req.method, res) {
        return gated;
    }

    let datasets = store.list(platform).await;
    res.send_response(200, &DatasetList { datasets })
}
