//! Configuration validation.
//!
//! Serde handles syntax; this module checks the values make sense together.
//! All problems are collected and returned at once.

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::ProxyConfig;

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("listener.bind_address `{0}` is not a socket address")]
    BindAddress(String),

    #[error("proxy.path `{0}` must start with '/'")]
    ProxyPath(String),

    #[error("proxy.target_param must not be empty")]
    EmptyTargetParam,

    #[error("proxy.allowed_host_suffix must not be empty")]
    EmptyHostSuffix,

    #[error("observability.metrics_address `{0}` is not a socket address")]
    MetricsAddress(String),
}

/// Validate a parsed configuration.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    if !config.proxy.path.starts_with('/') {
        errors.push(ValidationError::ProxyPath(config.proxy.path.clone()));
    }

    if config.proxy.target_param.is_empty() {
        errors.push(ValidationError::EmptyTargetParam);
    }

    if config.proxy.allowed_host_suffix.is_empty() {
        errors.push(ValidationError::EmptyHostSuffix);
    }

    // Only checked when the exporter will actually bind.
    if config.observability.metrics_enabled
        && config
            .observability
            .metrics_address
            .parse::<SocketAddr>()
            .is_err()
    {
        errors.push(ValidationError::MetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
