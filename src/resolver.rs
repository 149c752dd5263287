//! # Path and Parameter Resolution
//!
//! Turns an inbound request for one platform into a [`RouteRequest`], and
//! reads the pagination window from the query string.
//!
//! Segments come from the route params when the caller already split the
//! path (the top-level router does), and from the raw path otherwise, so a
//! platform handler can also be mounted on its own with or without the
//! `/<platform>/` prefix in front of it.

use crate::errors::{AppError, AppResult};
use crate::models::{Endpoint, Platform, RouteRequest};
use crate::pagination::PaginationWindow;
use crate::request::RouteParams;
use percent_encoding::percent_decode_str;
use std::collections::BTreeMap;

pub fn resolve(
    platform: Platform,
    raw_path: &str,
    route_params: Option<RouteParams>,
) -> AppResult<RouteRequest> {
    let segments = match route_params {
        Some(params) => params.into_segments(),
        None => segments_from_path(platform, raw_path),
    };

    let mut segments = segments.into_iter();
    let file_name = match segments.next() {
        Some(first) if !first.is_empty() => first,
        _ => return Err(AppError::MissingParameters),
    };
    let endpoint = Endpoint::parse(segments.next().as_deref(), platform);

    Ok(RouteRequest {
        platform,
        file_name,
        endpoint,
    })
}

/// Splits the raw path, dropping the query string and a leading
/// `/<platform>/` when present.
fn segments_from_path(platform: Platform, raw_path: &str) -> Vec<String> {
    let path = raw_path.split('?').next().unwrap_or_default();
    let prefix = format!("/{}/", platform.as_str());

    let remainder = match path.find(&prefix) {
        Some(index) => &path[index + prefix.len()..],
        None => path.strip_prefix('/').unwrap_or(path),
    };

    if remainder.is_empty() {
        return Vec::new();
    }
    remainder.split('/').map(decode_segment).collect()
}

/// Percent-decodes one path segment. Invalid UTF-8 is replaced rather than
/// rejected, and a decoded `/` is left for file-name validation to refuse.
pub(crate) fn decode_segment(raw: &str) -> String {
    percent_decode_str(raw).decode_utf8_lossy().into_owned()
}

/// Reads `start` and `size` the way browsers' `parseInt` would: leading
/// digits count, anything unparseable falls back to the default. A size
/// that is not a positive number means "no limit".
pub fn pagination_window(query: &BTreeMap<String, String>) -> PaginationWindow {
    let start = query
        .get("start")
        .and_then(|raw| parse_leading_int(raw))
        .unwrap_or(0);
    let size = query
        .get("size")
        .filter(|raw| !raw.is_empty())
        .and_then(|raw| parse_leading_int(raw))
        .filter(|size| *size > 0)
        .map(|size| usize::try_from(size).unwrap_or(usize::MAX));

    PaginationWindow::new(start, size)
}

/// Parses an optional sign followed by at least one digit, ignoring
/// whatever follows. Saturates instead of overflowing.
fn parse_leading_int(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let digits: Vec<i64> = digits
        .bytes()
        .take_while(u8::is_ascii_digit)
        .map(|b| i64::from(b - b'0'))
        .collect();
    if digits.is_empty() {
        return None;
    }

    let magnitude = digits
        .into_iter()
        .fold(0i64, |acc, d| acc.saturating_mul(10).saturating_add(d));
    Some(if negative { -magnitude } else { magnitude })
}
