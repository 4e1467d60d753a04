//! ServerBuilder for fluent API to build HTTP servers

use super::handlers::AppState;
use super::router::build_routes;
use crate::config::GateConfig;
use crate::core::engine::Engine;
use anyhow::Result;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Builder for creating HTTP servers around the validation engine
///
/// # Example
///
/// ```ignore
/// let app = ServerBuilder::new()
///     .with_config(GateConfig::from_yaml_file("gate.yaml")?)
///     .build();
/// ```
pub struct ServerBuilder {
    config: GateConfig,
    custom_routes: Vec<Router>,
}

impl ServerBuilder {
    /// Create a new ServerBuilder with the default configuration
    pub fn new() -> Self {
        Self {
            config: GateConfig::default(),
            custom_routes: Vec::new(),
        }
    }

    /// Set the gate configuration (unknown-field policy)
    pub fn with_config(mut self, config: GateConfig) -> Self {
        self.config = config;
        self
    }

    /// Add custom routes to the server
    ///
    /// Use this for routes that don't fit the schema-driven pattern, such
    /// as health checks or webhooks.
    pub fn with_custom_routes(mut self, routes: Router) -> Self {
        self.custom_routes.push(routes);
        self
    }

    /// Build the router with tracing and CORS layers applied
    pub fn build(self) -> Router {
        let state = AppState {
            engine: Engine::from_config(&self.config),
        };
        let mut app = build_routes(state);
        for routes in self.custom_routes {
            app = app.merge(routes);
        }
        app.layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive())
    }

    /// Serve the application with graceful shutdown
    ///
    /// This will:
    /// - Bind to the provided address
    /// - Start serving requests
    /// - Handle SIGTERM and SIGINT (Ctrl+C) for graceful shutdown
    pub async fn serve(self, addr: &str) -> Result<()> {
        let app = self.build();
        let listener = TcpListener::bind(addr).await?;

        tracing::info!("Server listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal, initiating graceful shutdown...");
        },
    }
}
