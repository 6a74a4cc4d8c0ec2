//! System handlers: ping, getInfo.

use async_trait::async_trait;
use serde_json::{Value, json};
use tracing::instrument;

use crate::rpc::context::RpcContext;
use crate::rpc::errors::RpcError;
use crate::rpc::registry::MethodHandler;

/// Returns a pong with the current server timestamp.
pub struct PingHandler;

#[async_trait]
impl MethodHandler for PingHandler {
    #[instrument(skip(self, _ctx), fields(method = "system.ping"))]
    async fn handle(&self, _params: Option<Value>, _ctx: &RpcContext) -> Result<Value, RpcError> {
        Ok(json!({
            "pong": true,
            "timestamp": chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
        }))
    }
}

/// Returns node name, version, uptime and live viewer counts.
pub struct GetInfoHandler;

#[async_trait]
impl MethodHandler for GetInfoHandler {
    #[instrument(skip(self, ctx), fields(method = "system.getInfo"))]
    async fn handle(&self, _params: Option<Value>, ctx: &RpcContext) -> Result<Value, RpcError> {
        let registry = ctx.notifier.registry();
        Ok(json!({
            "name": ctx.node_name,
            "version": env!("CARGO_PKG_VERSION"),
            "uptime": ctx.server_start_time.elapsed().as_secs(),
            "viewers": registry.connection_count(),
            "scopes": registry.scope_count(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rpc::handlers::test_helpers::make_test_context;
    use crate::websocket::connection::test_connection;
    use surikata_core::scope::Scope;

    #[tokio::test]
    async fn ping_returns_pong() {
        let ctx = make_test_context();
        let result = PingHandler.handle(None, &ctx).await.unwrap();
        assert_eq!(result["pong"], true);
        assert!(result["timestamp"].is_string());
    }

    #[tokio::test]
    async fn get_info_reports_node_and_counts() {
        let ctx = make_test_context();
        let (conn, _rx) = test_connection("c1", 1);
        ctx.notifier.registry().register(&Scope::new("ev1", "s1"), conn);

        let result = GetInfoHandler.handle(None, &ctx).await.unwrap();
        assert_eq!(result["name"], "test-node");
        assert!(result["version"].is_string());
        assert!(result["uptime"].as_u64().unwrap() < 5);
        assert_eq!(result["viewers"], 1);
        assert_eq!(result["scopes"], 1);
    }
}
