//! Viewer connections, scope registry, fan-out, heartbeat and socket tasks.

pub mod connection;
pub mod handler;
pub mod heartbeat;
pub mod notifier;
pub mod registry;
pub mod socket;
