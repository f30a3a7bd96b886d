//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from TOML. Every field
//! has a default so an empty file (or no file at all) yields a working proxy.

use serde::Deserialize;

/// Root configuration for the proxy.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ProxyConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Forwarding endpoint settings.
    pub proxy: ForwardConfig,

    /// Outbound client settings.
    pub upstream: UpstreamConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Forwarding endpoint configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ForwardConfig {
    /// Path the proxy endpoint is mounted at.
    pub path: String,

    /// Query parameter carrying the target URL.
    pub target_param: String,

    /// Literal suffix the target host must end with.
    pub allowed_host_suffix: String,
}

impl Default for ForwardConfig {
    fn default() -> Self {
        Self {
            path: "/api/proxy".to_string(),
            target_param: "u".to_string(),
            allowed_host_suffix: "huggingface.co".to_string(),
        }
    }
}

/// Outbound client configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Maximum redirect hops followed before giving up.
    pub max_redirects: usize,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self { max_redirects: 10 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
