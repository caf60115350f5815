//! Connection registry — tracks all active connections indexed by user.

use std::sync::Arc;

use dashmap::DashMap;

use socialhub_core::types::id::UserId;

use super::handle::{ConnectionHandle, ConnectionId};

/// Thread-safe registry of all active WebSocket connections.
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    /// User ID → connection handles (one user can have multiple connections).
    by_user: DashMap<UserId, Vec<Arc<ConnectionHandle>>>,
    /// Connection ID → connection handle for direct lookup.
    by_id: DashMap<ConnectionId, Arc<ConnectionHandle>>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a connection to the registry.
    pub fn add(&self, handle: Arc<ConnectionHandle>) {
        self.by_id.insert(handle.id, handle.clone());
        self.by_user.entry(handle.user_id).or_default().push(handle);
    }

    /// Removes a connection from the registry.
    pub fn remove(&self, conn_id: &ConnectionId) -> Option<Arc<ConnectionHandle>> {
        if let Some((_, handle)) = self.by_id.remove(conn_id) {
            if let Some(mut connections) = self.by_user.get_mut(&handle.user_id) {
                connections.retain(|c| c.id != *conn_id);
                if connections.is_empty() {
                    drop(connections);
                    self.by_user.remove(&handle.user_id);
                }
            }
            Some(handle)
        } else {
            None
        }
    }

    /// Snapshot of a user's connections.
    pub fn user_connections(&self, user_id: UserId) -> Vec<Arc<ConnectionHandle>> {
        self.by_user
            .get(&user_id)
            .map(|entry| entry.value().clone())
            .unwrap_or_default()
    }

    pub fn get(&self, conn_id: &ConnectionId) -> Option<Arc<ConnectionHandle>> {
        self.by_id.get(conn_id).map(|entry| entry.value().clone())
    }

    pub fn is_online(&self, user_id: UserId) -> bool {
        self.by_user
            .get(&user_id)
            .is_some_and(|entry| !entry.value().is_empty())
    }

    /// Total number of active connections.
    pub fn connection_count(&self) -> usize {
        self.by_id.len()
    }

    /// Number of distinct connected users.
    pub fn user_count(&self) -> usize {
        self.by_user.len()
    }
}

#[cfg(test)]
mod tests {
    use tokio::sync::mpsc;

    use super::*;

    fn handle(user_id: UserId) -> Arc<ConnectionHandle> {
        let (tx, _rx) = mpsc::channel(8);
        Arc::new(ConnectionHandle::new(user_id, "tester".into(), tx))
    }

    #[test]
    fn test_multiple_connections_per_user() {
        let registry = ConnectionRegistry::new();
        let user = UserId::new();
        let a = handle(user);
        let b = handle(user);
        registry.add(a.clone());
        registry.add(b.clone());

        assert_eq!(registry.user_connections(user).len(), 2);
        assert_eq!(registry.connection_count(), 2);
        assert_eq!(registry.user_count(), 1);
    }

    #[test]
    fn test_remove_clears_empty_user_entry() {
        let registry = ConnectionRegistry::new();
        let user = UserId::new();
        let a = handle(user);
        registry.add(a.clone());

        assert!(registry.is_online(user));
        registry.remove(&a.id);
        assert!(!registry.is_online(user));
        assert_eq!(registry.user_count(), 0);
        assert!(registry.get(&a.id).is_none());
    }
}
