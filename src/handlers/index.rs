//! # API Index
//!
//! `GET /api` describes every platform endpoint, with URLs built from the
//! request's Host header.

use super::gate_method;
use crate::adapter::ResponseAdapter;
use crate::errors::AppResult;
use crate::models::Platform;
use crate::request::ApiRequest;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ApiIndex {
    pub name: &'static str,
    pub version: &'static str,
    pub description: &'static str,
    pub platforms: Vec<PlatformIndex>,
    pub documentation: String,
}

#[derive(Debug, Serialize)]
pub struct PlatformIndex {
    pub name: &'static str,
    pub endpoints: Vec<String>,
}

impl ApiIndex {
    pub fn new(base_url: &str) -> Self {
        let platforms = Platform::ALL
            .iter()
            .map(|platform| {
                let root = format!("{}/{}/{{file_name}}", base_url, platform);
                PlatformIndex {
                    name: platform.display_name(),
                    endpoints: vec![
                        root.clone(),
                        format!("{}/seed", root),
                        format!("{}/{}", root, platform.secondary_id_field()),
                        format!("{}/scores?start=0&size=10", root),
                    ],
                }
            })
            .collect();

        Self {
            name: "OpenRank API",
            version: env!("CARGO_PKG_VERSION"),
            description: "REST API for OpenRank data across Discord, GitHub, Telegram, and X",
            platforms,
            documentation: format!("{}/", base_url),
        }
    }
}

pub fn handle_index<A: ResponseAdapter>(
    req: &ApiRequest,
    default_base_url: &str,
    res: &mut A,
) -> AppResult<A::Output> {
    res.enable_cors();

    if let Some(gated) = gate_method(&req.method, res) {
        return gated;
    }

    let base_url = match req.host.as_deref() {
        Some(host) if !host.is_empty() => format!("https://{}", host),
        _ => default_base_url.trim_end_matches('/').to_string(),
    };
    res.send_response(200, &ApiIndex::new(&base_url))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::HttpAdapter;
    use crate::constants::DEFAULT_BASE_URL;
    use http::Method;
    use serde_json::Value;

    #[test]
    fn endpoints_use_the_host_header() {
        let req = ApiRequest::new(Method::GET, "/api").with_host("scores.example.com");
        let response = handle_index(&req, DEFAULT_BASE_URL, &mut HttpAdapter::new()).unwrap();
        let body: Value = serde_json::from_str(response.body()).unwrap();

        assert_eq!(body["name"], "OpenRank API");
        assert_eq!(body["documentation"], "https://scores.example.com/");
        assert_eq!(body["platforms"].as_array().map(Vec::len), Some(4));
        assert_eq!(
            body["platforms"][1]["endpoints"][2],
            "https://scores.example.com/github/{file_name}/ecosystem"
        );
        assert_eq!(
            body["platforms"][3]["endpoints"][3],
            "https://scores.example.com/x/{file_name}/scores?start=0&size=10"
        );
    }

    #[test]
    fn falls_back_to_the_configured_base_url() {
        let req = ApiRequest::new(Method::GET, "/api");
        let response = handle_index(&req, "https://fallback.example/", &mut HttpAdapter::new()).unwrap();
        let body: Value = serde_json::from_str(response.body()).unwrap();
        assert_eq!(body["platforms"][0]["name"], "Discord");
        assert_eq!(
            body["platforms"][0]["endpoints"][0],
            "https://fallback.example/discord/{file_name}"
        );
    }
}
