//! Settings type definitions.
//!
//! All types use `#[serde(rename_all = "camelCase")]` and
//! `#[serde(default)]`, so a settings file only needs the keys it changes.

mod server;

pub use server::*;

use serde::{Deserialize, Serialize};

use crate::errors::{Result, SettingsError};

/// Root settings for a Surikata node.
///
/// ```json
/// {
///   "name": "core1",
///   "server": { "port": 7070 },
///   "logging": { "level": "debug" }
/// }
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SurikataSettings {
    /// Node name, reported by `/health` and `system.ping`.
    pub name: String,
    /// Network and connection settings.
    pub server: ServerSettings,
    /// Logging configuration.
    pub logging: LoggingSettings,
}

impl Default for SurikataSettings {
    fn default() -> Self {
        Self {
            name: "core1".to_string(),
            server: ServerSettings::default(),
            logging: LoggingSettings::default(),
        }
    }
}

impl SurikataSettings {
    /// Reject combinations the server cannot run with.
    pub fn validate(&self) -> Result<()> {
        let server = &self.server;
        if server.send_queue == 0 {
            return Err(SettingsError::InvalidValue("server.sendQueue must be at least 1".into()));
        }
        if server.heartbeat_interval_secs == 0 {
            return Err(SettingsError::InvalidValue(
                "server.heartbeatIntervalSecs must be at least 1".into(),
            ));
        }
        if server.heartbeat_timeout_secs < server.heartbeat_interval_secs {
            return Err(SettingsError::InvalidValue(format!(
                "server.heartbeatTimeoutSecs ({}) is shorter than the interval ({})",
                server.heartbeat_timeout_secs, server.heartbeat_interval_secs
            )));
        }
        Ok(())
    }
}
