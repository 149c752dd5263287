//! # Transport-neutral Requests
//!
//! Both transports (the Worker `Request` and a native `http::Request`) are
//! reduced to an [`ApiRequest`] before routing, so the router and handlers
//! never look at a transport type.

use crate::errors::{AppError, AppResult};
use http::Method;
use std::collections::BTreeMap;
use worker::Url;

/// Path segments handed to a platform handler by whoever mounted it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RouteParams {
    /// Already split, in path order.
    Segments(Vec<String>),
    /// One `/`-delimited string, as produced by catch-all route patterns.
    Joined(String),
}

impl RouteParams {
    pub fn into_segments(self) -> Vec<String> {
        match self {
            RouteParams::Segments(segments) => segments,
            RouteParams::Joined(joined) => joined.split('/').map(str::to_string).collect(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: BTreeMap<String, String>,
    pub route_params: Option<RouteParams>,
    pub host: Option<String>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: BTreeMap::new(),
            route_params: None,
            host: None,
        }
    }

    /// Builds a request from a parsed URL. Later duplicates of a query key
    /// win.
    pub fn from_url(method: Method, url: &Url, host: Option<String>) -> Self {
        Self {
            method,
            path: url.path().to_string(),
            query: url.query_pairs().into_owned().collect(),
            route_params: None,
            host,
        }
    }

    /// Converts a Worker request.
    pub fn from_worker(req: &worker::Request) -> AppResult<Self> {
        let method = parse_method(&req.method().to_string())?;
        let url = req.url()?;
        let host = req.headers().get("host")?;
        Ok(Self::from_url(method, &url, host))
    }

    /// Converts a native `http` request. Only the head is read.
    pub fn from_http<B>(req: &http::Request<B>) -> AppResult<Self> {
        let path_and_query = req
            .uri()
            .path_and_query()
            .map(|pq| pq.as_str())
            .unwrap_or("/");
        let url = Url::parse(&format!("http://localhost{}", path_and_query))
            .map_err(|e| AppError::Internal(format!("unparseable request URI: {}", e)))?;
        let host = req
            .headers()
            .get(http::header::HOST)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        Ok(Self::from_url(req.method().clone(), &url, host))
    }

    pub fn with_query(mut self, key: &str, value: &str) -> Self {
        self.query.insert(key.to_string(), value.to_string());
        self
    }

    pub fn with_route_params(mut self, params: RouteParams) -> Self {
        self.route_params = Some(params);
        self
    }

    pub fn with_host(mut self, host: &str) -> Self {
        self.host = Some(host.to_string());
        self
    }

    pub fn query_param(&self, key: &str) -> Option<&str> {
        self.query.get(key).map(String::as_str)
    }
}

fn parse_method(raw: &str) -> AppResult<Method> {
    Method::from_bytes(raw.as_bytes())
        .map_err(|_| AppError::Internal(format!("unsupported method: {}", raw)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joined_params_are_split_on_slashes() {
        let params = RouteParams::Joined("ritual-community/seed".into());
        assert_eq!(params.into_segments(), vec!["ritual-community", "seed"]);
    }

    #[test]
    fn segment_params_are_used_as_is() {
        let params = RouteParams::Segments(vec!["ritual".into(), "scores".into()]);
        assert_eq!(params.into_segments(), vec!["ritual", "scores"]);
    }

    #[test]
    fn http_requests_keep_path_query_and_host() {
        let req = http::Request::builder()
            .method(Method::GET)
            .uri("/discord/ritual/scores?start=2&size=2")
            .header("host", "api.example.com")
            .body(())
            .unwrap();

        let api = ApiRequest::from_http(&req).unwrap();
        assert_eq!(api.method, Method::GET);
        assert_eq!(api.path, "/discord/ritual/scores");
        assert_eq!(api.query_param("start"), Some("2"));
        assert_eq!(api.query_param("size"), Some("2"));
        assert_eq!(api.host.as_deref(), Some("api.example.com"));
        assert_eq!(api.route_params, None);
    }

    #[test]
    fn absolute_form_uris_keep_their_path() {
        let req = http::Request::builder()
            .uri("http://api.example.com/x?size=")
            .body(())
            .unwrap();

        let api = ApiRequest::from_http(&req).unwrap();
        assert_eq!(api.path, "/x");
        assert_eq!(api.query_param("size"), Some(""));
    }
}
