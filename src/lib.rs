//! CORS passthrough proxy for a single upstream host suffix.
//!
//! One endpoint (`/api/proxy` by default) takes the target in `?u=`, checks
//! its host against the allowed suffix (`huggingface.co`), fetches it with
//! `GET` or `HEAD` using a small allowlist of request headers, and streams the
//! upstream response back with permissive cross-origin headers stamped on.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;

pub use config::schema::ProxyConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
