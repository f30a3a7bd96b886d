//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router with the single proxy endpoint
//! - Wire up middleware (tracing, request ID)
//! - Serve on a listener until shutdown is signalled

use axum::{
    body::Body,
    extract::State,
    http::Request,
    response::Response,
    routing::any,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{MakeRequestUuid, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::config::ProxyConfig;
use crate::http::forward::{build_client, Forwarder};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub forwarder: Forwarder,
}

/// HTTP server for the proxy.
pub struct HttpServer {
    router: Router,
    config: ProxyConfig,
}

impl HttpServer {
    /// Create a new HTTP server with an outbound client built from config.
    pub fn new(config: ProxyConfig) -> Result<Self, reqwest::Error> {
        let client = build_client(&config.upstream)?;
        Ok(Self::with_client(config, client))
    }

    /// Create a new HTTP server around a caller-supplied outbound client.
    pub fn with_client(config: ProxyConfig, client: reqwest::Client) -> Self {
        let state = AppState {
            forwarder: Forwarder::new(&config.proxy, client),
        };
        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &ProxyConfig, state: AppState) -> Router {
        // The request ID is kept inbound for log correlation only; echoing
        // it would add a header to the preflight response.
        Router::new()
            .route(&config.proxy.path, any(proxy_handler))
            .with_state(state)
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// The router, for in-process use.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            path = %self.config.proxy.path,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ProxyConfig {
        &self.config
    }
}

/// Proxy endpoint. All methods land here; the forwarder decides.
async fn proxy_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    state.forwarder.handle(request).await
}
