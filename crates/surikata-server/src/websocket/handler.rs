//! Inbound frame dispatch: parses text as `RpcRequest` and routes it through
//! the `MethodRegistry`.

use tracing::{debug, error, instrument, warn};

use crate::rpc::context::RpcContext;
use crate::rpc::errors;
use crate::rpc::registry::MethodRegistry;
use crate::rpc::types::{RpcRequest, RpcResponse};

/// Result of handling one inbound message.
pub struct HandleResult {
    /// Serialized response to send back.
    pub response_json: String,
    /// The method that was called (empty if parsing failed).
    pub method: String,
    /// Typed response.
    pub response: RpcResponse,
}

fn encode(response: &RpcResponse) -> String {
    serde_json::to_string(response).unwrap_or_else(|e| {
        error!(error = %e, "failed to serialize response");
        String::new()
    })
}

/// Handle an inbound text frame.
#[instrument(skip_all, fields(method))]
pub async fn handle_message(message: &str, registry: &MethodRegistry, ctx: &RpcContext) -> HandleResult {
    let request: RpcRequest = match serde_json::from_str(message) {
        Ok(r) => r,
        Err(e) => {
            warn!("invalid JSON received");
            let response = RpcResponse::error("unknown", errors::INVALID_PARAMS, format!("Invalid JSON: {e}"));
            return HandleResult {
                response_json: encode(&response),
                method: String::new(),
                response,
            };
        }
    };

    let method = request.method.clone();
    let _ = tracing::Span::current().record("method", method.as_str());
    debug!(method, id = %request.id, "dispatching RPC");
    if !registry.has_method(&method) {
        warn!(method, "unknown RPC method");
    }

    let response = registry.dispatch(request, ctx).await;
    HandleResult {
        response_json: encode(&response),
        method,
        response,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rpc::handlers::register_all;
    use crate::rpc::handlers::test_helpers::make_test_context;

    fn registry() -> MethodRegistry {
        let mut reg = MethodRegistry::new();
        register_all(&mut reg);
        reg
    }

    #[tokio::test]
    async fn valid_request_dispatches() {
        let ctx = make_test_context();
        let result = handle_message(r#"{"id":"r1","method":"system.ping"}"#, &registry(), &ctx).await;
        assert_eq!(result.method, "system.ping");
        assert!(result.response.success);
        assert_eq!(result.response.id, "r1");
        assert!(result.response_json.contains(r#""pong":true"#));
    }

    #[tokio::test]
    async fn invalid_json_returns_error() {
        let ctx = make_test_context();
        let result = handle_message("not json at all", &registry(), &ctx).await;
        let resp = result.response;
        assert!(!resp.success);
        assert_eq!(resp.id, "unknown");
        let err = resp.error.unwrap();
        assert_eq!(err.code, "INVALID_PARAMS");
        assert!(err.message.contains("Invalid JSON"));
        assert!(result.method.is_empty());
    }

    #[tokio::test]
    async fn missing_id_is_a_parse_error() {
        let ctx = make_test_context();
        let result = handle_message(r#"{"method":"system.ping"}"#, &registry(), &ctx).await;
        assert_eq!(result.response.id, "unknown");
        assert!(!result.response.success);
    }

    #[tokio::test]
    async fn unknown_method_returns_not_found() {
        let ctx = make_test_context();
        let result = handle_message(r#"{"id":"r2","method":"no.such"}"#, &registry(), &ctx).await;
        assert_eq!(result.response.error.unwrap().code, "METHOD_NOT_FOUND");
    }

    #[tokio::test]
    async fn handler_error_keeps_request_id() {
        let ctx = make_test_context();
        let msg = r#"{"id":"r3","method":"question.list","params":{}}"#;
        let result = handle_message(msg, &registry(), &ctx).await;
        assert_eq!(result.response.id, "r3");
        assert_eq!(result.response.error.unwrap().code, "INVALID_PARAMS");
    }
}
