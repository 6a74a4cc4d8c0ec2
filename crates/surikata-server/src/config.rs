//! Server configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use surikata_settings::SurikataSettings;

/// Runtime configuration for [`crate::server::SurikataServer`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind.
    pub host: String,
    /// Port to bind (`0` picks a free port).
    pub port: u16,
    /// Node name reported by `/health` and `system.ping`.
    pub name: String,
    /// Maximum concurrent WebSocket connections.
    pub max_connections: usize,
    /// Heartbeat interval in seconds.
    pub heartbeat_interval_secs: u64,
    /// Close a socket after this many seconds without a pong.
    pub heartbeat_timeout_secs: u64,
    /// Outbound queue depth per connection.
    pub send_queue: usize,
    /// Per-method RPC timeout in milliseconds.
    pub rpc_timeout_ms: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 0,
            name: "core1".into(),
            max_connections: 1_000,
            heartbeat_interval_secs: 30,
            heartbeat_timeout_secs: 90,
            send_queue: 256,
            rpc_timeout_ms: 10_000,
        }
    }
}

impl ServerConfig {
    /// Build from loaded settings.
    pub fn from_settings(settings: &SurikataSettings) -> Self {
        let server = &settings.server;
        Self {
            host: server.host.clone(),
            port: server.port,
            name: settings.name.clone(),
            max_connections: server.max_connections,
            heartbeat_interval_secs: server.heartbeat_interval_secs,
            heartbeat_timeout_secs: server.heartbeat_timeout_secs,
            send_queue: server.send_queue,
            rpc_timeout_ms: server.rpc_timeout_ms,
        }
    }

    /// Heartbeat ping interval.
    pub fn heartbeat_interval(&self) -> Duration {
        Duration::from_secs(self.heartbeat_interval_secs)
    }

    /// Heartbeat liveness timeout.
    pub fn heartbeat_timeout(&self) -> Duration {
        Duration::from_secs(self.heartbeat_timeout_secs)
    }

    /// RPC handler timeout.
    pub fn rpc_timeout(&self) -> Duration {
        Duration::from_millis(self.rpc_timeout_ms)
    }
}
