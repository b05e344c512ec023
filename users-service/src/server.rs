//! HTTP server with graceful shutdown

use axum::Router;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::{
    catch_panic::CatchPanicLayer,
    compression::CompressionLayer,
    cors::CorsLayer,
    limit::RequestBodyLimitLayer,
    timeout::TimeoutLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};

use crate::{
    config::Config,
    error::Result,
    middleware::{
        request_id_header, request_id_layer, request_id_propagation_layer,
        sensitive_headers_layer,
    },
};

/// Server instance
pub struct Server {
    config: Config,
}

impl Server {
    /// Create a new server instance
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Run the server with the given router until SIGINT or SIGTERM
    pub async fn serve(self, app: Router) -> Result<()> {
        let addr = SocketAddr::from(([0, 0, 0, 0], self.config.service.port));
        let listener = TcpListener::bind(&addr).await?;
        self.serve_with_listener(listener, app).await
    }

    /// Run the server on an already bound listener
    pub async fn serve_with_listener(self, listener: TcpListener, app: Router) -> Result<()> {
        let addr = listener.local_addr()?;
        tracing::info!("Starting {} on {}", self.config.service.name, addr);

        self.log_middleware_config();
        let app = self.apply_middleware(app);

        tracing::info!("Server listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }

    /// Wrap `app` in the middleware stack
    ///
    /// Layers are listed innermost last: panic recovery runs closest to the
    /// handlers and CORS runs first.
    pub fn apply_middleware(&self, app: Router) -> Router {
        let middleware = &self.config.middleware;
        let mut app = app;

        if middleware.catch_panic {
            app = app.layer(CatchPanicLayer::new());
        }

        if middleware.request_tracking.request_id_enabled {
            let header = request_id_header(&middleware.request_tracking);
            app = app
                .layer(request_id_propagation_layer(header.clone()))
                .layer(request_id_layer(header));
        }

        if middleware.request_tracking.mask_sensitive_headers {
            app = app.layer(sensitive_headers_layer());
        }

        app = app
            .layer(
                TraceLayer::new_for_http()
                    .make_span_with(DefaultMakeSpan::new().include_headers(true))
                    .on_response(DefaultOnResponse::new().include_headers(true)),
            )
            .layer(RequestBodyLimitLayer::new(self.config.body_limit_bytes()))
            .layer(TimeoutLayer::with_status_code(
                http::StatusCode::REQUEST_TIMEOUT,
                self.config.timeout(),
            ));

        if middleware.compression {
            app = app.layer(CompressionLayer::new());
        }

        match self.build_cors_layer() {
            Some(cors) => app.layer(cors),
            None => app,
        }
    }

    fn log_middleware_config(&self) {
        let middleware = &self.config.middleware;
        tracing::info!("Middleware configuration:");
        tracing::info!("  - Panic recovery: {}", enabled(middleware.catch_panic));
        tracing::info!(
            "  - Request ID tracking: {}",
            enabled(middleware.request_tracking.request_id_enabled)
        );
        tracing::info!(
            "  - Sensitive header masking: {}",
            enabled(middleware.request_tracking.mask_sensitive_headers)
        );
        tracing::info!("  - Request body limit: {} MB", middleware.body_limit_mb);
        tracing::info!("  - Compression: {}", enabled(middleware.compression));
        tracing::info!("  - CORS mode: {}", middleware.cors_mode);
        tracing::info!(
            "  - Request timeout: {} seconds",
            self.config.service.timeout_secs
        );
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Build CORS layer based on configuration, `None` when disabled
    fn build_cors_layer(&self) -> Option<CorsLayer> {
        match self.config.middleware.cors_mode.as_str() {
            "permissive" => {
                tracing::debug!("Enabling permissive CORS");
                Some(CorsLayer::permissive())
            }
            "restrictive" => {
                tracing::debug!("Enabling restrictive CORS (default deny)");
                Some(CorsLayer::new())
            }
            "disabled" => {
                tracing::debug!("CORS disabled");
                None
            }
            other => {
                tracing::warn!("Unknown CORS mode: {}, defaulting to permissive", other);
                Some(CorsLayer::permissive())
            }
        }
    }
}

fn enabled(flag: bool) -> &'static str {
    if flag {
        "enabled"
    } else {
        "disabled"
    }
}

/// Wait for shutdown signal (SIGTERM or SIGINT)
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl+C), starting graceful shutdown");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        },
    }

    tracing::info!("Shutdown signal received, draining requests...");
}
