//! # Response Adapters
//!
//! Handlers emit responses through [`ResponseAdapter`] and never see the
//! transport. Two implementations produce semantically identical output:
//!
//! - **WorkerAdapter**: `worker::Response`, for the Cloudflare fetch handler
//! - **HttpAdapter**: `http::Response<String>`, for native hosts and tests
//!
//! Every response carries the CORS headers first once [`ResponseAdapter::enable_cors`]
//! has been called, followed by its content type.

use crate::constants::{
    CONTENT_TYPE_JSON, CORS_ALLOW_HEADERS, CORS_ALLOW_METHODS, CORS_ALLOW_ORIGIN,
};
use crate::errors::AppResult;
use crate::models::ErrorBody;
use serde::Serialize;
use worker::{Headers, Response};

const CORS_HEADERS: [(&str, &str); 3] = [
    ("Access-Control-Allow-Origin", CORS_ALLOW_ORIGIN),
    ("Access-Control-Allow-Methods", CORS_ALLOW_METHODS),
    ("Access-Control-Allow-Headers", CORS_ALLOW_HEADERS),
];

pub trait ResponseAdapter {
    type Output;

    /// Adds the CORS headers to every response sent afterwards. Idempotent.
    fn enable_cors(&mut self);

    /// Sends a full body with an explicit content type.
    fn send_document(
        &mut self,
        status: u16,
        content_type: &str,
        body: String,
    ) -> AppResult<Self::Output>;

    /// Sends headers only, as used for preflight answers.
    fn send_empty(&mut self, status: u16) -> AppResult<Self::Output>;

    fn send_response<T: Serialize + ?Sized>(
        &mut self,
        status: u16,
        body: &T,
    ) -> AppResult<Self::Output> {
        let body = serde_json::to_string(body)?;
        self.send_document(status, CONTENT_TYPE_JSON, body)
    }

    fn send_error(&mut self, status: u16, message: &str) -> AppResult<Self::Output> {
        self.send_response(status, &ErrorBody { error: message })
    }
}

/// Ordered header list shared by both adapters.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
struct HeaderList {
    entries: Vec<(&'static str, &'static str)>,
}

impl HeaderList {
    fn enable_cors(&mut self) {
        for (name, value) in CORS_HEADERS {
            if !self.entries.iter().any(|(existing, _)| *existing == name) {
                self.entries.push((name, value));
            }
        }
    }

    fn iter(&self) -> impl Iterator<Item = (&'static str, &'static str)> + '_ {
        self.entries.iter().copied()
    }
}

/// Adapter producing `worker::Response` values.
#[derive(Debug, Default)]
pub struct WorkerAdapter {
    headers: HeaderList,
}

impl WorkerAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    fn headers(&self, content_type: Option<&str>) -> AppResult<Headers> {
        let headers = Headers::new();
        for (name, value) in self.headers.iter() {
            headers.set(name, value)?;
        }
        if let Some(content_type) = content_type {
            headers.set("Content-Type", content_type)?;
        }
        Ok(headers)
    }
}

impl ResponseAdapter for WorkerAdapter {
    type Output = Response;

    fn enable_cors(&mut self) {
        self.headers.enable_cors();
    }

    fn send_document(&mut self, status: u16, content_type: &str, body: String) -> AppResult<Response> {
        let headers = self.headers(Some(content_type))?;
        Ok(Response::from_bytes(body.into_bytes())?
            .with_status(status)
            .with_headers(headers))
    }

    fn send_empty(&mut self, status: u16) -> AppResult<Response> {
        let headers = self.headers(None)?;
        Ok(Response::empty()?.with_status(status).with_headers(headers))
    }
}

/// Adapter producing `http::Response<String>` values.
#[derive(Debug, Default)]
pub struct HttpAdapter {
    headers: HeaderList,
}

impl HttpAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    fn builder(&self, status: u16) -> http::response::Builder {
        self.headers
            .iter()
            .fold(http::Response::builder().status(status), |builder, (name, value)| {
                builder.header(name, value)
            })
    }
}

impl ResponseAdapter for HttpAdapter {
    type Output = http::Response<String>;

    fn enable_cors(&mut self) {
        self.headers.enable_cors();
    }

    fn send_document(
        &mut self,
        status: u16,
        content_type: &str,
        body: String,
    ) -> AppResult<http::Response<String>> {
        Ok(self
            .builder(status)
            .header(http::header::CONTENT_TYPE, content_type)
            .body(body)?)
    }

    fn send_empty(&mut self, status: u16) -> AppResult<http::Response<String>> {
        Ok(self.builder(status).body(String::new())?)
    }
}
