//! `WebSocket` upgrade handlers and the per-socket task.
//!
//! Each socket runs a writer task (queued payloads plus pings), a heartbeat
//! task and the reader loop below. All three share a child of the server's
//! shutdown token; whichever side finishes first cancels the others.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use futures::stream::SplitSink;
use futures::{SinkExt, StreamExt};
use metrics::{counter, gauge};
use surikata_core::ids::ConnectionId;
use surikata_core::scope::Scope;
use tokio::sync::mpsc;
use tokio::time;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

use super::connection::{SendError, ViewerConnection};
use super::handler::handle_message;
use super::heartbeat::{HeartbeatResult, run_heartbeat};
use crate::metrics::{
    WS_CONNECTIONS_ACTIVE, WS_CONNECTIONS_REJECTED_TOTAL, WS_CONNECTIONS_TOTAL, WS_DISCONNECTIONS_TOTAL,
};
use crate::server::AppState;

/// Caps the number of open sockets.
pub struct ConnectionLimiter {
    active: AtomicUsize,
    max: usize,
}

impl ConnectionLimiter {
    /// Allow at most `max` concurrent sockets.
    pub fn new(max: usize) -> Self {
        Self {
            active: AtomicUsize::new(0),
            max,
        }
    }

    /// Reserve a slot, or `None` when the limit is reached.
    pub fn try_acquire(self: &Arc<Self>) -> Option<ConnectionSlot> {
        let _ = self
            .active
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| (n < self.max).then_some(n + 1))
            .ok()?;
        gauge!(WS_CONNECTIONS_ACTIVE).increment(1.0);
        Some(ConnectionSlot {
            limiter: Arc::clone(self),
        })
    }

    /// Sockets currently open.
    pub fn active(&self) -> usize {
        self.active.load(Ordering::SeqCst)
    }
}

/// A reserved socket slot, released on drop.
pub struct ConnectionSlot {
    limiter: Arc<ConnectionLimiter>,
}

impl Drop for ConnectionSlot {
    fn drop(&mut self) {
        let _ = self.limiter.active.fetch_sub(1, Ordering::SeqCst);
        gauge!(WS_CONNECTIONS_ACTIVE).decrement(1.0);
    }
}

fn reject() -> Response {
    counter!(WS_CONNECTIONS_REJECTED_TOTAL).increment(1);
    warn!("connection limit reached, refusing upgrade");
    (StatusCode::SERVICE_UNAVAILABLE, "too many connections").into_response()
}

/// `GET /live/{event_token}/{session_token}`: viewer socket for one scope.
pub async fn live_handler(
    Path((event_token, session_token)): Path<(String, String)>,
    State(state): State<AppState>,
    ws: WebSocketUpgrade,
) -> Response {
    let Some(slot) = state.limiter.try_acquire() else {
        return reject();
    };
    let scope = Scope::new(event_token, session_token);
    ws.on_upgrade(move |socket| run_socket(socket, Some(scope), state, slot))
}

/// `GET /ws`: RPC-only socket without scope membership.
pub async fn rpc_handler(State(state): State<AppState>, ws: WebSocketUpgrade) -> Response {
    let Some(slot) = state.limiter.try_acquire() else {
        return reject();
    };
    ws.on_upgrade(move |socket| run_socket(socket, None, state, slot))
}

/// Drive one socket until it closes, times out or the server shuts down.
async fn run_socket(socket: WebSocket, scope: Option<Scope>, state: AppState, _slot: ConnectionSlot) {
    let kind = if scope.is_some() { "live" } else { "rpc" };
    let (tx, rx) = mpsc::channel(state.config.send_queue.max(1));
    let connection = Arc::new(ViewerConnection::new(ConnectionId::generate(), tx));
    let cancel = state.shutdown.token().child_token();
    counter!(WS_CONNECTIONS_TOTAL, "kind" => kind).increment(1);
    info!(connection_id = %connection.id, kind, scope = ?scope, "websocket connected");

    let (sink, mut stream) = socket.split();
    let writer = tokio::spawn(write_loop(
        sink,
        rx,
        state.config.heartbeat_interval(),
        cancel.clone(),
        connection.id.clone(),
    ));

    if let Some(scope) = &scope {
        let notifier = &state.rpc.notifier;
        if let Err(error) = notifier.on_viewer_connected(scope, Arc::clone(&connection)).await {
            warn!(connection_id = %connection.id, %scope, %error, "initial push failed, closing");
            cancel.cancel();
            let _ = writer.await;
            counter!(WS_DISCONNECTIONS_TOTAL, "kind" => kind).increment(1);
            return;
        }
    }

    let heartbeat = tokio::spawn({
        let connection = Arc::clone(&connection);
        let cancel = cancel.clone();
        let interval = state.config.heartbeat_interval();
        let timeout = state.config.heartbeat_timeout();
        async move {
            let id = connection.id.clone();
            if run_heartbeat(connection, interval, timeout, cancel.clone()).await == HeartbeatResult::TimedOut {
                warn!(connection_id = %id, "heartbeat timed out");
                cancel.cancel();
            }
        }
    });

    loop {
        tokio::select! {
            frame = stream.next() => match frame {
                Some(Ok(Message::Text(text))) => {
                    let result = handle_message(text.as_str(), &state.methods, &state.rpc).await;
                    match connection.send(Arc::new(result.response_json)) {
                        Ok(()) => {}
                        Err(SendError::QueueFull) => {
                            warn!(connection_id = %connection.id, method = %result.method, "response dropped, queue full");
                        }
                        Err(SendError::Closed) => break,
                    }
                }
                Some(Ok(Message::Pong(_))) => connection.mark_alive(),
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(_)) => {}
                Some(Err(error)) => {
                    debug!(connection_id = %connection.id, %error, "websocket read error");
                    break;
                }
            },
            () = cancel.cancelled() => break,
        }
    }

    if let Some(scope) = &scope {
        let _ = state.rpc.notifier.on_viewer_disconnected(scope, &connection.id);
    }
    cancel.cancel();
    let _ = writer.await;
    let _ = heartbeat.await;

    counter!(WS_DISCONNECTIONS_TOTAL, "kind" => kind).increment(1);
    info!(
        connection_id = %connection.id,
        kind,
        age_secs = connection.age().as_secs(),
        dropped = connection.drop_count(),
        "websocket disconnected"
    );
}

/// Forward queued payloads to the socket and ping every `ping_every`.
async fn write_loop(
    mut sink: SplitSink<WebSocket, Message>,
    mut rx: mpsc::Receiver<Arc<String>>,
    ping_every: Duration,
    cancel: CancellationToken,
    connection_id: ConnectionId,
) {
    let mut ping = time::interval_at(time::Instant::now() + ping_every, ping_every);
    loop {
        tokio::select! {
            msg = rx.recv() => {
                let Some(msg) = msg else { break };
                if sink.send(Message::Text(msg.as_str().into())).await.is_err() {
                    break;
                }
            }
            _ = ping.tick() => {
                if sink.send(Message::Ping(Vec::new().into())).await.is_err() {
                    break;
                }
                trace!(%connection_id, "sent ping");
            }
            () = cancel.cancelled() => {
                let _ = sink.send(Message::Close(None)).await;
                break;
            }
        }
    }
    cancel.cancel();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limiter_caps_and_releases() {
        let limiter = Arc::new(ConnectionLimiter::new(2));
        let a = limiter.try_acquire().unwrap();
        let _b = limiter.try_acquire().unwrap();
        assert!(limiter.try_acquire().is_none());
        assert_eq!(limiter.active(), 2);

        drop(a);
        assert_eq!(limiter.active(), 1);
        assert!(limiter.try_acquire().is_some());
    }

    #[test]
    fn zero_limit_refuses_everything() {
        let limiter = Arc::new(ConnectionLimiter::new(0));
        assert!(limiter.try_acquire().is_none());
        assert_eq!(limiter.active(), 0);
    }
}
