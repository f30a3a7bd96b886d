//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, trace span)
//!     → forward.rs (preflight / target validation / upstream fetch)
//!         → headers.rs (request allowlist, response hop-by-hop strip)
//!         → cors.rs (cross-origin headers on every response)
//!         → error.rs (failure → status + plain-text body)
//!     → Send to client
//! ```

pub mod cors;
pub mod error;
pub mod forward;
pub mod headers;
pub mod server;

pub use cors::CorsHeaders;
pub use error::ProxyError;
pub use forward::{build_client, outbound_method, Forwarder};
pub use server::HttpServer;
