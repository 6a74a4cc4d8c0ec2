//! `SurikataServer`: Axum HTTP + `WebSocket` server.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::get;
use metrics_exporter_prometheus::PrometheusHandle;
use surikata_store::DataStorage;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::config::ServerConfig;
use crate::health::{self, HealthResponse};
use crate::rpc::context::RpcContext;
use crate::rpc::handlers::register_all;
use crate::rpc::registry::MethodRegistry;
use crate::shutdown::ShutdownCoordinator;
use crate::websocket::notifier::Notifier;
use crate::websocket::registry::ConnectionRegistry;
use crate::websocket::socket::{self, ConnectionLimiter};

/// Shared state accessible from Axum handlers.
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Context handed to RPC handlers (store and notifier).
    pub rpc: RpcContext,
    /// RPC method registry.
    pub methods: Arc<MethodRegistry>,
    /// Shutdown coordinator.
    pub shutdown: Arc<ShutdownCoordinator>,
    /// Open socket counter.
    pub limiter: Arc<ConnectionLimiter>,
    /// Prometheus handle, when a recorder is installed.
    pub metrics: Option<PrometheusHandle>,
    /// When the server started.
    pub start_time: Instant,
}

/// The live Q&A server.
pub struct SurikataServer {
    state: AppState,
}

impl SurikataServer {
    /// Create a server over `store`, with all RPC methods registered.
    pub fn new<S: DataStorage + 'static>(config: ServerConfig, store: Arc<S>) -> Self {
        let start_time = Instant::now();
        let registry = Arc::new(ConnectionRegistry::new());
        let notifier = Arc::new(Notifier::new(store.clone(), registry));

        let mut methods = MethodRegistry::with_timeout(config.rpc_timeout());
        register_all(&mut methods);

        let rpc = RpcContext {
            store,
            notifier,
            node_name: config.name.clone(),
            server_start_time: start_time,
        };

        Self {
            state: AppState {
                limiter: Arc::new(ConnectionLimiter::new(config.max_connections)),
                config: Arc::new(config),
                rpc,
                methods: Arc::new(methods),
                shutdown: Arc::new(ShutdownCoordinator::new()),
                metrics: None,
                start_time,
            },
        }
    }

    /// Serve Prometheus output at `/metrics` from `handle`.
    #[must_use]
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.state.metrics = Some(handle);
        self
    }

    /// Build the Axum router with all routes.
    pub fn router(&self) -> Router {
        Router::new()
            .route("/health", get(health_handler))
            .route("/metrics", get(metrics_handler))
            .route("/ws", get(socket::rpc_handler))
            .route("/live/{event_token}/{session_token}", get(socket::live_handler))
            .with_state(self.state.clone())
            .layer(
                ServiceBuilder::new()
                    .layer(TraceLayer::new_for_http())
                    .layer(CorsLayer::permissive()),
            )
    }

    /// Bind the configured address and serve until shutdown.
    ///
    /// Returns the bound address (useful with port `0`) and the serve task.
    pub async fn listen(&self) -> std::io::Result<(SocketAddr, JoinHandle<()>)> {
        let listener = TcpListener::bind((self.state.config.host.as_str(), self.state.config.port)).await?;
        let addr = listener.local_addr()?;
        let router = self.router();
        let token = self.state.shutdown.token();

        let handle = tokio::spawn(async move {
            let result = axum::serve(listener, router)
                .with_graceful_shutdown(async move { token.cancelled().await })
                .await;
            if let Err(e) = result {
                error!(error = %e, "server error");
            }
        });

        info!(%addr, name = %self.state.config.name, "surikata server listening");
        Ok((addr, handle))
    }

    /// Get the shutdown coordinator.
    pub fn shutdown(&self) -> &Arc<ShutdownCoordinator> {
        &self.state.shutdown
    }

    /// Get the server configuration.
    pub fn config(&self) -> &ServerConfig {
        &self.state.config
    }

    /// Get the method registry.
    pub fn methods(&self) -> &Arc<MethodRegistry> {
        &self.state.methods
    }

    /// Get the notifier (and through it, the connection registry).
    pub fn notifier(&self) -> &Arc<Notifier> {
        &self.state.rpc.notifier
    }
}

/// GET /health
async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let registry = state.rpc.notifier.registry();
    Json(health::health_check(
        &state.config.name,
        state.start_time,
        state.limiter.active(),
        registry.connection_count(),
        registry.scope_count(),
    ))
}

/// GET /metrics
async fn metrics_handler(State(state): State<AppState>) -> Response {
    match &state.metrics {
        Some(handle) => crate::metrics::render(handle).into_response(),
        None => (StatusCode::SERVICE_UNAVAILABLE, "metrics recorder not installed").into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use surikata_store::MemoryStore;
    use tower::ServiceExt;

    fn make_server() -> SurikataServer {
        SurikataServer::new(ServerConfig::default(), Arc::new(MemoryStore::new()))
    }

    async fn get(app: Router, uri: &str) -> Response {
        app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    #[test]
    fn server_registers_all_methods() {
        let server = make_server();
        assert!(server.methods().has_method("question.post"));
        assert!(server.methods().has_method("event.create"));
        assert_eq!(server.config().port, 0);
        assert!(!server.shutdown().is_shutting_down());
    }

    #[tokio::test]
    async fn health_endpoint_returns_ok() {
        let server = make_server();
        let resp = get(server.router(), "/health").await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body = axum::body::to_bytes(resp.into_body(), 10_000).await.unwrap();
        let parsed: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(parsed["status"], "ok");
        assert_eq!(parsed["name"], "core1");
        assert_eq!(parsed["connections"], 0);
        assert_eq!(parsed["viewers"], 0);
    }

    #[tokio::test]
    async fn metrics_unavailable_without_recorder() {
        let resp = get(make_server().router(), "/metrics").await;
        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn metrics_rendered_with_handle() {
        let handle = PrometheusBuilder::new().build_recorder().handle();
        let server = make_server().with_metrics(handle);
        let resp = get(server.router(), "/metrics").await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn ws_without_upgrade_is_rejected() {
        let resp = get(make_server().router(), "/ws").await;
        assert!(resp.status().is_client_error());
        let resp = get(make_server().router(), "/live/ev1/s1").await;
        assert!(resp.status().is_client_error());
    }

    #[tokio::test]
    async fn unknown_route_returns_404() {
        let resp = get(make_server().router(), "/nonexistent").await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn listen_binds_and_stops_on_shutdown() {
        let server = make_server();
        let (addr, handle) = server.listen().await.unwrap();
        assert_ne!(addr.port(), 0);

        server.shutdown().shutdown();
        tokio::time::timeout(std::time::Duration::from_secs(5), handle)
            .await
            .unwrap()
            .unwrap();
    }
}
