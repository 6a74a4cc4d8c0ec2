//! Pong-based liveness check for viewer sockets.

use std::sync::Arc;
use std::time::Duration;

use tokio::time;
use tokio_util::sync::CancellationToken;

use super::connection::ViewerConnection;

/// Why the heartbeat loop stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HeartbeatResult {
    /// No pong within the timeout window.
    TimedOut,
    /// The socket closed or the server is shutting down.
    Cancelled,
}

/// Number of consecutive silent intervals tolerated before timing out.
fn max_missed(interval: Duration, timeout: Duration) -> u32 {
    let interval_ms = interval.as_millis().max(1);
    u32::try_from(timeout.as_millis() / interval_ms)
        .unwrap_or(u32::MAX)
        .max(1)
}

/// Watch `connection` until it stops answering pings or `cancel` fires.
///
/// Each `interval` tick consumes the alive flag set by the reader on pong.
/// After `timeout / interval` consecutive ticks without a pong the loop
/// returns [`HeartbeatResult::TimedOut`].
pub async fn run_heartbeat(
    connection: Arc<ViewerConnection>,
    interval: Duration,
    timeout: Duration,
    cancel: CancellationToken,
) -> HeartbeatResult {
    let mut ticker = time::interval_at(time::Instant::now() + interval, interval);
    let limit = max_missed(interval, timeout);
    let mut missed: u32 = 0;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if connection.check_alive() {
                    missed = 0;
                } else {
                    missed += 1;
                    if missed >= limit {
                        return HeartbeatResult::TimedOut;
                    }
                }
            }
            () = cancel.cancelled() => return HeartbeatResult::Cancelled,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::websocket::connection::test_connection;
    use std::sync::atomic::Ordering;

    #[test]
    fn max_missed_is_ratio_clamped_to_one() {
        assert_eq!(max_missed(Duration::from_secs(30), Duration::from_secs(90)), 3);
        assert_eq!(max_missed(Duration::from_secs(30), Duration::from_secs(10)), 1);
        assert_eq!(max_missed(Duration::from_millis(100), Duration::from_millis(300)), 3);
    }

    #[tokio::test]
    async fn cancelled_before_first_tick() {
        let (conn, _rx) = test_connection("hb", 1);
        let cancel = CancellationToken::new();
        cancel.cancel();
        let result = run_heartbeat(conn, Duration::from_secs(100), Duration::from_secs(300), cancel).await;
        assert_eq!(result, HeartbeatResult::Cancelled);
    }

    #[tokio::test(start_paused = true)]
    async fn silent_connection_times_out() {
        let (conn, _rx) = test_connection("hb", 1);
        conn.is_alive.store(false, Ordering::Relaxed);
        let result = run_heartbeat(
            conn,
            Duration::from_millis(100),
            Duration::from_millis(300),
            CancellationToken::new(),
        )
        .await;
        assert_eq!(result, HeartbeatResult::TimedOut);
    }

    #[tokio::test(start_paused = true)]
    async fn pongs_keep_connection_alive() {
        let (conn, _rx) = test_connection("hb", 1);
        let cancel = CancellationToken::new();
        let handle = tokio::spawn(run_heartbeat(
            conn.clone(),
            Duration::from_millis(100),
            Duration::from_millis(200),
            cancel.clone(),
        ));

        for _ in 0..10 {
            time::sleep(Duration::from_millis(50)).await;
            conn.mark_alive();
        }
        cancel.cancel();
        assert_eq!(handle.await.unwrap(), HeartbeatResult::Cancelled);
    }
}
