//! # surikata-server
//!
//! Axum HTTP + `WebSocket` server for live Q&A.
//!
//! - Connection registry: (event, session) scope to live viewer connections
//! - Notifier: pushes the current question list of a scope to its viewers
//! - Viewer sockets at `/live/{event_token}/{session_token}`, plain RPC sockets at `/ws`
//! - JSON-RPC method registry for posting, voting and event administration
//! - `/health` and Prometheus `/metrics`
//! - Graceful shutdown via `CancellationToken`

#![deny(unsafe_code)]

pub mod config;
pub mod health;
pub mod metrics;
pub mod rpc;
pub mod server;
pub mod shutdown;
pub mod websocket;
