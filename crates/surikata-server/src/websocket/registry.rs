//! Scope to live-viewer membership.
//!
//! A single mutex guards the outer scope map and every inner set. Critical
//! sections only touch the maps; payloads are sent by callers after
//! [`ConnectionRegistry::connections_for`] has returned its snapshot, so a
//! slow viewer never holds the lock.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use surikata_core::ids::ConnectionId;
use surikata_core::scope::Scope;
use tracing::debug;

use super::connection::ViewerConnection;

type ConnectionSet = HashMap<ConnectionId, Arc<ViewerConnection>>;

/// Tracks which live connections watch which scope.
///
/// Holds shared handles for lookup and send only. It never closes a
/// connection.
#[derive(Default)]
pub struct ConnectionRegistry {
    scopes: Mutex<HashMap<Scope, ConnectionSet>>,
}

impl ConnectionRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `connection` to `scope`, creating the scope's set if needed.
    ///
    /// Registering the same connection id twice keeps a single entry.
    pub fn register(&self, scope: &Scope, connection: Arc<ViewerConnection>) {
        let mut scopes = self.scopes.lock();
        let set = scopes.entry(scope.clone()).or_default();
        let id = connection.id.clone();
        let replaced = set.insert(id.clone(), connection).is_some();
        debug!(%scope, connection_id = %id, replaced, members = set.len(), "viewer registered");
    }

    /// Remove a connection from `scope`. Returns whether it was present.
    ///
    /// The scope's (possibly empty) set stays in the map.
    pub fn unregister(&self, scope: &Scope, connection_id: &ConnectionId) -> bool {
        let mut scopes = self.scopes.lock();
        let removed = scopes
            .get_mut(scope)
            .is_some_and(|set| set.remove(connection_id).is_some());
        if removed {
            debug!(%scope, %connection_id, "viewer unregistered");
        }
        removed
    }

    /// Snapshot of the connections currently registered in `scope`.
    pub fn connections_for(&self, scope: &Scope) -> Vec<Arc<ViewerConnection>> {
        self.scopes
            .lock()
            .get(scope)
            .map(|set| set.values().cloned().collect())
            .unwrap_or_default()
    }

    /// Whether `connection_id` is registered in `scope`.
    pub fn contains(&self, scope: &Scope, connection_id: &ConnectionId) -> bool {
        self.scopes
            .lock()
            .get(scope)
            .is_some_and(|set| set.contains_key(connection_id))
    }

    /// Number of scope entries, including emptied ones.
    pub fn scope_count(&self) -> usize {
        self.scopes.lock().len()
    }

    /// Total registrations across all scopes.
    pub fn connection_count(&self) -> usize {
        self.scopes.lock().values().map(HashMap::len).sum()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::websocket::connection::test_connection;

    fn ids(conns: &[Arc<ViewerConnection>]) -> Vec<String> {
        let mut out: Vec<String> = conns.iter().map(|c| c.id.to_string()).collect();
        out.sort();
        out
    }

    #[test]
    fn register_then_unregister() {
        let reg = ConnectionRegistry::new();
        let scope = Scope::new("ev1", "s1");
        let (c1, _rx) = test_connection("c1", 1);

        reg.register(&scope, c1.clone());
        assert!(reg.contains(&scope, &c1.id));
        assert_eq!(ids(&reg.connections_for(&scope)), ["c1"]);

        assert!(reg.unregister(&scope, &c1.id));
        assert!(!reg.contains(&scope, &c1.id));
        assert!(reg.connections_for(&scope).is_empty());
    }

    #[test]
    fn double_register_is_one_member() {
        let reg = ConnectionRegistry::new();
        let scope = Scope::new("ev1", "s1");
        let (c1, _rx) = test_connection("c1", 1);

        reg.register(&scope, c1.clone());
        reg.register(&scope, c1);
        assert_eq!(reg.connections_for(&scope).len(), 1);
        assert_eq!(reg.connection_count(), 1);
    }

    #[test]
    fn unregister_unknown_is_noop() {
        let reg = ConnectionRegistry::new();
        let scope = Scope::new("ev1", "s1");
        assert!(!reg.unregister(&scope, &ConnectionId::from("ghost")));
        assert_eq!(reg.scope_count(), 0);

        let (c1, _rx) = test_connection("c1", 1);
        reg.register(&scope, c1);
        assert!(!reg.unregister(&scope, &ConnectionId::from("ghost")));
        assert_eq!(reg.connection_count(), 1);
    }

    #[test]
    fn empty_scope_set_is_retained() {
        let reg = ConnectionRegistry::new();
        let scope = Scope::new("ev1", "s1");
        let (c1, _rx) = test_connection("c1", 1);
        reg.register(&scope, c1.clone());
        let _ = reg.unregister(&scope, &c1.id);
        assert_eq!(reg.scope_count(), 1);
        assert_eq!(reg.connection_count(), 0);
    }

    #[test]
    fn membership_is_per_scope() {
        let reg = ConnectionRegistry::new();
        let a = Scope::new("ab", "c");
        let b = Scope::new("a", "bc");
        let (c1, _rx1) = test_connection("c1", 1);
        let (c2, _rx2) = test_connection("c2", 1);

        reg.register(&a, c1.clone());
        reg.register(&b, c2);
        assert_eq!(ids(&reg.connections_for(&a)), ["c1"]);
        assert_eq!(ids(&reg.connections_for(&b)), ["c2"]);
        assert!(!reg.unregister(&b, &c1.id));
    }

    #[test]
    fn snapshot_is_detached_from_later_changes() {
        let reg = ConnectionRegistry::new();
        let scope = Scope::new("ev1", "s1");
        let (c1, _rx1) = test_connection("c1", 1);
        let (c2, _rx2) = test_connection("c2", 1);
        reg.register(&scope, c1.clone());

        let snapshot = reg.connections_for(&scope);
        reg.register(&scope, c2);
        let _ = reg.unregister(&scope, &c1.id);

        assert_eq!(ids(&snapshot), ["c1"]);
        assert_eq!(ids(&reg.connections_for(&scope)), ["c2"]);
    }

    #[test]
    fn concurrent_register_unregister() {
        let reg = Arc::new(ConnectionRegistry::new());
        let scope = Scope::new("ev1", "s1");

        let handles: Vec<_> = (0..8)
            .map(|t| {
                let reg = reg.clone();
                let scope = scope.clone();
                std::thread::spawn(move || {
                    for i in 0..100 {
                        let (conn, _rx) = test_connection(&format!("t{t}-{i}"), 1);
                        reg.register(&scope, conn.clone());
                        let _ = reg.connections_for(&scope);
                        if i % 2 == 0 {
                            assert!(reg.unregister(&scope, &conn.id));
                        }
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        assert_eq!(reg.connection_count(), 8 * 50);
    }
}
