//! Header filtering in both directions.
//!
//! Inbound: only a short allowlist of request headers reaches upstream.
//! Outbound: upstream response headers pass through except hop-by-hop ones,
//! which describe the upstream connection rather than the payload.

use axum::http::{header, HeaderMap, HeaderName};

/// Request headers forwarded upstream. `HeaderName` is always lowercase, so
/// membership here is a case-insensitive name match.
const FORWARDED_REQUEST_HEADERS: [HeaderName; 6] = [
    header::RANGE,
    header::USER_AGENT,
    header::ACCEPT,
    header::ACCEPT_LANGUAGE,
    header::ACCEPT_ENCODING,
    header::CONTENT_TYPE,
];

const HOP_BY_HOP_HEADERS: [&str; 7] = [
    "connection",
    "keep-alive",
    "proxy-connection",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
];

pub fn is_forwarded_request_header(name: &HeaderName) -> bool {
    FORWARDED_REQUEST_HEADERS.contains(name)
}

/// Copy the allowlisted entries of `inbound` into a new map.
pub fn filter_request_headers(inbound: &HeaderMap) -> HeaderMap {
    let mut out = HeaderMap::new();
    for (name, value) in inbound.iter() {
        if is_forwarded_request_header(name) {
            out.append(name.clone(), value.clone());
        }
    }
    out
}

pub fn is_hop_by_hop(name: &HeaderName) -> bool {
    HOP_BY_HOP_HEADERS.contains(&name.as_str())
}

/// Copy upstream response headers, dropping hop-by-hop entries.
pub fn relay_response_headers(upstream: &HeaderMap) -> HeaderMap {
    let mut out = HeaderMap::with_capacity(upstream.len());
    for (name, value) in upstream.iter() {
        if !is_hop_by_hop(name) {
            out.append(name.clone(), value.clone());
        }
    }
    out
}
