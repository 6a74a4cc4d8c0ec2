//! Server and logging settings.

use serde::{Deserialize, Serialize};

/// Network, connection and RPC settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServerSettings {
    /// Bind address.
    pub host: String,
    /// HTTP / WebSocket port.
    pub port: u16,
    /// Maximum simultaneous WebSocket connections.
    pub max_connections: usize,
    /// Ping interval for live sockets, in seconds.
    pub heartbeat_interval_secs: u64,
    /// Close a socket after this long without a pong, in seconds.
    pub heartbeat_timeout_secs: u64,
    /// Outbound queue depth per connection. A full queue counts as a failed delivery.
    pub send_queue: usize,
    /// Per-method RPC timeout, in milliseconds.
    pub rpc_timeout_ms: u64,
    /// Time allowed for in-flight work after shutdown is requested, in seconds.
    pub shutdown_timeout_secs: u64,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 7070,
            max_connections: 10_000,
            heartbeat_interval_secs: 30,
            heartbeat_timeout_secs: 90,
            send_queue: 256,
            rpc_timeout_ms: 10_000,
            shutdown_timeout_secs: 5,
        }
    }
}

/// Logging configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoggingSettings {
    /// Minimum level or `EnvFilter` directive.
    pub level: String,
    /// Emit JSON lines instead of compact text.
    pub json: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}
