//! Cross-origin response headers.
//!
//! Every response leaving the proxy (preflight, rejection, upstream error or
//! relayed upstream response) carries the same fixed set of headers. They are
//! written with `insert`, so a same-named header from upstream is replaced,
//! never appended to.

use axum::http::{header, HeaderMap, HeaderName, HeaderValue};

const CORS_HEADERS: [(HeaderName, &str); 4] = [
    (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
    (header::ACCESS_CONTROL_ALLOW_HEADERS, "*"),
    (header::ACCESS_CONTROL_ALLOW_METHODS, "GET, HEAD, OPTIONS"),
    (
        header::ACCESS_CONTROL_EXPOSE_HEADERS,
        "content-length, accept-ranges, content-type",
    ),
];

/// The fixed cross-origin header set.
///
/// Built once when the server starts and cloned into each response.
#[derive(Debug, Clone)]
pub struct CorsHeaders {
    headers: HeaderMap,
}

impl CorsHeaders {
    pub fn new() -> Self {
        let mut headers = HeaderMap::with_capacity(CORS_HEADERS.len());
        for (name, value) in CORS_HEADERS {
            headers.insert(name, HeaderValue::from_static(value));
        }
        Self { headers }
    }

    /// Overwrite every cross-origin header on `target`.
    pub fn apply(&self, target: &mut HeaderMap) {
        for (name, value) in self.headers.iter() {
            target.insert(name.clone(), value.clone());
        }
    }

    /// A fresh header map holding only the cross-origin set.
    pub fn to_header_map(&self) -> HeaderMap {
        self.headers.clone()
    }
}

impl Default for CorsHeaders {
    fn default() -> Self {
        Self::new()
    }
}
