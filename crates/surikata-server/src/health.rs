//! `/health` endpoint.

use serde::Serialize;
use std::time::Instant;

/// Health check response body.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Always `"ok"` when the server is running.
    pub status: String,
    /// Node name.
    pub name: String,
    /// Seconds since the server started.
    pub uptime_secs: u64,
    /// Open WebSocket connections (live and RPC).
    pub connections: usize,
    /// Live viewers registered across all scopes.
    pub viewers: usize,
    /// Scopes with at least one registration since startup.
    pub scopes: usize,
}

/// Build a health response from live counters.
pub fn health_check(
    name: &str,
    start_time: Instant,
    connections: usize,
    viewers: usize,
    scopes: usize,
) -> HealthResponse {
    HealthResponse {
        status: "ok".into(),
        name: name.to_owned(),
        uptime_secs: start_time.elapsed().as_secs(),
        connections,
        viewers,
        scopes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_is_ok() {
        let resp = health_check("core1", Instant::now(), 0, 0, 0);
        assert_eq!(resp.status, "ok");
        assert!(resp.uptime_secs < 2);
    }

    #[test]
    fn uptime_increases() {
        let start = Instant::now()
            .checked_sub(std::time::Duration::from_secs(60))
            .unwrap();
        let resp = health_check("core1", start, 0, 0, 0);
        assert!(resp.uptime_secs >= 59);
    }

    #[test]
    fn serialization() {
        let resp = health_check("core1", Instant::now(), 3, 2, 1);
        let parsed = serde_json::to_value(&resp).unwrap();
        assert_eq!(parsed["status"], "ok");
        assert_eq!(parsed["name"], "core1");
        assert_eq!(parsed["connections"], 3);
        assert_eq!(parsed["viewers"], 2);
        assert_eq!(parsed["scopes"], 1);
        assert!(parsed["uptime_secs"].is_number());
    }
}
