//! Viewer connection handle.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use surikata_core::ids::ConnectionId;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

/// Why a payload could not be queued for a connection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum SendError {
    /// The outbound queue is full; the viewer is not keeping up.
    #[error("send queue full")]
    QueueFull,
    /// The socket writer has exited.
    #[error("connection closed")]
    Closed,
}

impl SendError {
    /// Short label for metrics.
    pub fn as_label(self) -> &'static str {
        match self {
            Self::QueueFull => "queue_full",
            Self::Closed => "closed",
        }
    }
}

/// One open WebSocket, as seen by the registry and notifier.
///
/// Sending only enqueues onto the socket writer's bounded channel, so a
/// send never blocks. Closing the socket is the writer task's job.
pub struct ViewerConnection {
    /// Unique connection ID.
    pub id: ConnectionId,
    /// Send channel to the socket writer task.
    tx: mpsc::Sender<Arc<String>>,
    /// When this connection was established.
    pub connected_at: Instant,
    /// Whether the client has responded to the last ping.
    pub is_alive: AtomicBool,
    /// When the last pong was received.
    last_pong: Mutex<Instant>,
    /// Count of payloads that could not be queued.
    pub dropped_messages: AtomicU64,
}

impl ViewerConnection {
    /// Create a new connection handle.
    pub fn new(id: ConnectionId, tx: mpsc::Sender<Arc<String>>) -> Self {
        let now = Instant::now();
        Self {
            id,
            tx,
            connected_at: now,
            is_alive: AtomicBool::new(true),
            last_pong: Mutex::new(now),
            dropped_messages: AtomicU64::new(0),
        }
    }

    /// Queue an encoded payload for the socket writer.
    pub fn send(&self, message: Arc<String>) -> Result<(), SendError> {
        self.tx.try_send(message).map_err(|e| {
            let _ = self.dropped_messages.fetch_add(1, Ordering::Relaxed);
            match e {
                TrySendError::Full(_) => SendError::QueueFull,
                TrySendError::Closed(_) => SendError::Closed,
            }
        })
    }

    /// Total payloads dropped for this connection.
    pub fn drop_count(&self) -> u64 {
        self.dropped_messages.load(Ordering::Relaxed)
    }

    /// Mark the connection as alive (pong received).
    pub fn mark_alive(&self) {
        self.is_alive.store(true, Ordering::Relaxed);
        *self.last_pong.lock() = Instant::now();
    }

    /// Duration since the last pong (or connection establishment).
    pub fn last_pong_elapsed(&self) -> Duration {
        self.last_pong.lock().elapsed()
    }

    /// Check and reset the alive flag.
    ///
    /// Returns `true` if the connection was alive since the last check.
    pub fn check_alive(&self) -> bool {
        self.is_alive.swap(false, Ordering::Relaxed)
    }

    /// Connection age.
    pub fn age(&self) -> Duration {
        self.connected_at.elapsed()
    }
}

#[cfg(test)]
pub(crate) fn test_connection(
    id: &str,
    capacity: usize,
) -> (Arc<ViewerConnection>, mpsc::Receiver<Arc<String>>) {
    let (tx, rx) = mpsc::channel(capacity);
    (Arc::new(ViewerConnection::new(ConnectionId::from(id), tx)), rx)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn send_message_success() {
        let (conn, mut rx) = test_connection("c1", 4);
        conn.send(Arc::new("hello".into())).unwrap();
        let msg = rx.recv().await.unwrap();
        assert_eq!(&*msg, "hello");
        assert_eq!(conn.drop_count(), 0);
    }

    #[test]
    fn send_to_closed_channel() {
        let (conn, rx) = test_connection("c1", 4);
        drop(rx);
        assert_eq!(conn.send(Arc::new("x".into())), Err(SendError::Closed));
        assert_eq!(conn.drop_count(), 1);
    }

    #[test]
    fn send_to_full_channel() {
        let (conn, _rx) = test_connection("c1", 1);
        conn.send(Arc::new("a".into())).unwrap();
        assert_eq!(conn.send(Arc::new("b".into())), Err(SendError::QueueFull));
        assert_eq!(conn.drop_count(), 1);
    }

    #[test]
    fn mark_alive_and_check() {
        let (conn, _rx) = test_connection("c1", 1);
        assert!(conn.check_alive());
        assert!(!conn.check_alive());
        conn.mark_alive();
        assert!(conn.check_alive());
        assert!(conn.last_pong_elapsed() < Duration::from_secs(1));
    }

    #[test]
    fn send_error_labels() {
        assert_eq!(SendError::QueueFull.as_label(), "queue_full");
        assert_eq!(SendError::Closed.to_string(), "connection closed");
    }
}
