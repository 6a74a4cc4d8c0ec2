//! Method registry and async dispatch.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use metrics::{counter, histogram};
use serde_json::Value;
use tracing::{error, warn};

use crate::metrics::{RPC_ERRORS_TOTAL, RPC_REQUEST_DURATION_SECONDS, RPC_REQUESTS_TOTAL};
use crate::rpc::context::RpcContext;
use crate::rpc::errors::{self, RpcError};
use crate::rpc::types::{RpcRequest, RpcResponse};

/// Requests slower than this are logged.
const SLOW_REQUEST: Duration = Duration::from_secs(1);

/// Trait implemented by every RPC method handler.
#[async_trait]
pub trait MethodHandler: Send + Sync {
    /// Execute the handler with the given params and context.
    async fn handle(&self, params: Option<Value>, ctx: &RpcContext) -> Result<Value, RpcError>;
}

/// Registry mapping method names to handlers.
pub struct MethodRegistry {
    handlers: HashMap<String, Arc<dyn MethodHandler>>,
    timeout: Duration,
}

impl MethodRegistry {
    /// Default time a single handler may run.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Create an empty registry with the default handler timeout.
    pub fn new() -> Self {
        Self::with_timeout(Self::DEFAULT_TIMEOUT)
    }

    /// Create an empty registry with a custom handler timeout.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            handlers: HashMap::new(),
            timeout,
        }
    }

    /// Register a handler for a method name.
    pub fn register(&mut self, method: &str, handler: impl MethodHandler + 'static) {
        let _ = self.handlers.insert(method.to_owned(), Arc::new(handler));
    }

    /// Dispatch a request to the appropriate handler.
    pub async fn dispatch(&self, request: RpcRequest, ctx: &RpcContext) -> RpcResponse {
        let method = request.method.clone();
        counter!(RPC_REQUESTS_TOTAL, "method" => method.clone()).increment(1);

        let Some(handler) = self.handlers.get(&method) else {
            counter!(RPC_ERRORS_TOTAL, "method" => method.clone(), "error_type" => "method_not_found")
                .increment(1);
            return RpcResponse::error(
                &request.id,
                errors::METHOD_NOT_FOUND,
                format!("Method '{method}' not found"),
            );
        };

        let start = Instant::now();
        let result = tokio::time::timeout(self.timeout, handler.handle(request.params, ctx)).await;

        let response = match result {
            Ok(Ok(value)) => RpcResponse::success(&request.id, value),
            Ok(Err(err)) => {
                counter!(RPC_ERRORS_TOTAL, "method" => method.clone(), "error_type" => err.code().to_owned())
                    .increment(1);
                RpcResponse::failure(request.id, err.to_error_body())
            }
            Err(_elapsed) => {
                counter!(RPC_ERRORS_TOTAL, "method" => method.clone(), "error_type" => "timeout").increment(1);
                error!(method, timeout = ?self.timeout, "RPC handler timed out");
                RpcResponse::error(
                    &request.id,
                    errors::TIMEOUT,
                    format!("Handler for '{method}' timed out"),
                )
            }
        };

        let duration = start.elapsed();
        histogram!(RPC_REQUEST_DURATION_SECONDS, "method" => method.clone()).record(duration.as_secs_f64());
        if duration >= SLOW_REQUEST {
            warn!(method, duration_secs = duration.as_secs_f64(), "slow RPC request");
        }

        response
    }

    /// List all registered method names (sorted).
    pub fn methods(&self) -> Vec<String> {
        let mut names: Vec<String> = self.handlers.keys().cloned().collect();
        names.sort();
        names
    }

    /// Check whether a method is registered.
    pub fn has_method(&self, method: &str) -> bool {
        self.handlers.contains_key(method)
    }
}

impl Default for MethodRegistry {
    fn default() -> Self {
        Self::new()
    }
}
