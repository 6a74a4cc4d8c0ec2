//! Shared state handed to every RPC handler.

use std::sync::Arc;
use std::time::Instant;

use surikata_store::DataStorage;

use crate::websocket::notifier::Notifier;

/// Dependencies available to handlers.
#[derive(Clone)]
pub struct RpcContext {
    /// Backend for questions, events and speakers.
    pub store: Arc<dyn DataStorage>,
    /// Fan-out to live viewers after writes.
    pub notifier: Arc<Notifier>,
    /// Node name reported by `system.getInfo`.
    pub node_name: String,
    /// Server start time (for uptime).
    pub server_start_time: Instant,
}
