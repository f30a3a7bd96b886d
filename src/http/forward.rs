//! The forwarder: validates the target, fetches it once, relays the result.
//!
//! # Flow
//! ```text
//! OPTIONS                      → 204 + CORS
//! ?u missing / empty           → 400 + CORS
//! ?u not an absolute URL       → 502 + CORS
//! host without allowed suffix  → 403 + CORS   (no upstream contact)
//! otherwise                    → GET/HEAD upstream, relay status/headers/body + CORS
//! ```

use std::time::Instant;

use axum::{
    body::Body,
    http::{HeaderMap, Method, Request, StatusCode},
    response::{IntoResponse, Response},
};
use reqwest::redirect::Policy;
use url::Url;

use crate::config::{ForwardConfig, UpstreamConfig};
use crate::http::cors::CorsHeaders;
use crate::http::error::ProxyError;
use crate::http::headers::{filter_request_headers, relay_response_headers};
use crate::observability::metrics;

/// Request-scoped forwarding logic plus the immutable pieces it shares.
#[derive(Debug, Clone)]
pub struct Forwarder {
    client: reqwest::Client,
    cors: CorsHeaders,
    target_param: String,
    allowed_host_suffix: String,
}

/// Build the outbound client. Content decoding stays off so upstream
/// `content-encoding` and `content-length` still describe the relayed bytes.
pub fn build_client(config: &UpstreamConfig) -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .redirect(Policy::limited(config.max_redirects))
        .build()
}

/// Only `HEAD` survives as itself; everything else is fetched with `GET`.
pub fn outbound_method(inbound: &Method) -> Method {
    if *inbound == Method::HEAD {
        Method::HEAD
    } else {
        Method::GET
    }
}

impl Forwarder {
    pub fn new(config: &ForwardConfig, client: reqwest::Client) -> Self {
        Self {
            client,
            cors: CorsHeaders::new(),
            target_param: config.target_param.clone(),
            allowed_host_suffix: config.allowed_host_suffix.clone(),
        }
    }

    /// First value of the target parameter, if present and non-empty.
    pub fn target_from_query(&self, query: Option<&str>) -> Option<String> {
        let query = query?;
        url::form_urlencoded::parse(query.as_bytes())
            .find(|(key, _)| key == self.target_param.as_str())
            .map(|(_, value)| value.into_owned())
            .filter(|value| !value.is_empty())
    }

    /// Extract, parse and check the target URL.
    pub fn resolve_target(&self, query: Option<&str>) -> Result<Url, ProxyError> {
        let raw = self
            .target_from_query(query)
            .ok_or_else(|| ProxyError::MissingTarget {
                param: self.target_param.clone(),
            })?;

        let target = Url::parse(&raw)?;

        // Suffix match, not domain match: "notehuggingface.co" passes.
        let host = target.host_str().unwrap_or_default();
        if !host.ends_with(&self.allowed_host_suffix) {
            return Err(ProxyError::ForbiddenHost {
                host: host.to_string(),
                suffix: self.allowed_host_suffix.clone(),
            });
        }

        Ok(target)
    }

    /// Handle one inbound request. Never fails: every error becomes a
    /// plain-text response carrying the CORS headers.
    pub async fn handle(&self, request: Request<Body>) -> Response {
        let start_time = Instant::now();
        let method = request.method().clone();
        let request_id = request
            .headers()
            .get("x-request-id")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("unknown")
            .to_string();

        if method == Method::OPTIONS {
            metrics::record_request(&method, 204, "preflight", start_time);
            return self.preflight();
        }

        let target = match self.resolve_target(request.uri().query()) {
            Ok(target) => target,
            Err(err) => {
                tracing::warn!(
                    request_id = %request_id,
                    kind = err.kind(),
                    error = %err,
                    "Rejected target"
                );
                let response = self.error_response(&err);
                metrics::record_request(
                    &method,
                    response.status().as_u16(),
                    err.kind(),
                    start_time,
                );
                return response;
            }
        };

        let outbound = outbound_method(&method);
        let headers = filter_request_headers(request.headers());

        tracing::debug!(
            request_id = %request_id,
            method = %method,
            outbound = %outbound,
            url = %target,
            "Forwarding request"
        );

        match self.forward(outbound, target, headers).await {
            Ok(response) => {
                tracing::debug!(
                    request_id = %request_id,
                    status = %response.status(),
                    "Upstream responded"
                );
                metrics::record_request(
                    &method,
                    response.status().as_u16(),
                    "relayed",
                    start_time,
                );
                response
            }
            Err(err) => {
                tracing::error!(request_id = %request_id, error = %err, "Upstream error");
                let response = self.error_response(&err);
                metrics::record_request(
                    &method,
                    response.status().as_u16(),
                    err.kind(),
                    start_time,
                );
                response
            }
        }
    }

    /// Single upstream attempt. Redirects are followed by the client.
    async fn forward(
        &self,
        method: Method,
        target: Url,
        headers: HeaderMap,
    ) -> Result<Response, ProxyError> {
        let upstream = self
            .client
            .request(method.clone(), target)
            .headers(headers)
            .send()
            .await?;

        let status = upstream.status();
        let mut headers = relay_response_headers(upstream.headers());
        self.cors.apply(&mut headers);

        let body = if method == Method::HEAD {
            Body::empty()
        } else {
            Body::from_stream(upstream.bytes_stream())
        };

        let mut response = Response::new(body);
        *response.status_mut() = status;
        *response.headers_mut() = headers;
        Ok(response)
    }

    /// 204 with nothing but the CORS headers.
    pub fn preflight(&self) -> Response {
        let mut response = StatusCode::NO_CONTENT.into_response();
        *response.headers_mut() = self.cors.to_header_map();
        response
    }

    pub fn error_response(&self, err: &ProxyError) -> Response {
        let mut response = (err.status(), err.to_string()).into_response();
        self.cors.apply(response.headers_mut());
        response
    }
}
