//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! forwarder / server
//!     → logging.rs (structured log events, request ID in fields)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → stdout
//!     → Metrics endpoint (Prometheus scrape, opt-in)
//! ```

pub mod logging;
pub mod metrics;
