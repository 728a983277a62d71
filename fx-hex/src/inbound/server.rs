//! HTTP Server configuration and startup.

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use fx_types::RateProvider;

use super::handlers::{self, AppState};
use crate::ConversionService;
use crate::openapi::ApiDoc;

/// HTTP Server for the conversion API.
pub struct HttpServer<P: RateProvider> {
    state: Arc<AppState<P>>,
}

impl<P: RateProvider> HttpServer<P> {
    /// Creates a new HTTP server with the given service.
    pub fn new(service: ConversionService<P>) -> Self {
        Self {
            state: Arc::new(AppState { service }),
        }
    }

    /// Returns the conversion service behind the handlers.
    pub fn service(&self) -> &ConversionService<P> {
        &self.state.service
    }

    /// Builds the Axum router with all routes.
    pub fn router(&self) -> Router {
        // Build HTTP metrics layer (uses globally set MeterProvider)
        let metrics = axum_otel_metrics::HttpMetricsLayerBuilder::new().build();

        let api = Router::new()
            .route("/health", get(handlers::health))
            .route("/api/convert", get(handlers::convert::<P>))
            .route("/api/convert/refresh", post(handlers::refresh::<P>))
            .with_state(self.state.clone());

        api.merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
            .layer(metrics)
            .layer(CatchPanicLayer::custom(handlers::handle_panic))
            .layer(TraceLayer::new_for_http())
    }

    /// Runs the server on the given address with graceful shutdown.
    pub async fn run(self, addr: &str) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!("Server listening on {}", listener.local_addr()?);

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        Ok(())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown...");
}
