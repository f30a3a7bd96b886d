//! Failures of the forwarding path and their HTTP rendering.

use axum::http::StatusCode;
use thiserror::Error;

/// Everything that can stop a request from being relayed.
#[derive(Debug, Error)]
pub enum ProxyError {
    /// The target query parameter is absent or empty.
    #[error("Missing ?{param}=…")]
    MissingTarget { param: String },

    /// The target is not an absolute URL.
    #[error("Proxy error: {0}")]
    InvalidTarget(#[from] url::ParseError),

    /// The target host does not carry the allowed suffix.
    #[error("Only {suffix} allowed")]
    ForbiddenHost { host: String, suffix: String },

    /// The upstream fetch failed before a response arrived.
    #[error("Proxy error: {0}")]
    Upstream(#[from] reqwest::Error),
}

impl ProxyError {
    pub fn status(&self) -> StatusCode {
        match self {
            ProxyError::MissingTarget { .. } => StatusCode::BAD_REQUEST,
            ProxyError::InvalidTarget(_) => StatusCode::BAD_GATEWAY,
            ProxyError::ForbiddenHost { .. } => StatusCode::FORBIDDEN,
            ProxyError::Upstream(_) => StatusCode::BAD_GATEWAY,
        }
    }

    /// Short label used for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            ProxyError::MissingTarget { .. } => "missing_target",
            ProxyError::InvalidTarget(_) => "invalid_target",
            ProxyError::ForbiddenHost { .. } => "forbidden_host",
            ProxyError::Upstream(_) => "upstream_failure",
        }
    }
}
