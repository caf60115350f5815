//! Connection lifecycle and inbound frame handling.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info};

use socialhub_core::config::RealtimeConfig;
use socialhub_core::types::id::UserId;
use socialhub_database::repositories::NotificationRepository;

use crate::message::types::{InboundFrame, OutboundFrame};

use super::handle::{ConnectionHandle, ConnectionId};
use super::registry::ConnectionRegistry;

/// Registers connections, answers inbound frames, and fans frames out
/// to a user's live connections.
#[derive(Clone)]
pub struct ConnectionManager {
    registry: Arc<ConnectionRegistry>,
    notifications: Arc<dyn NotificationRepository>,
    config: RealtimeConfig,
}

impl ConnectionManager {
    pub fn new(
        registry: Arc<ConnectionRegistry>,
        notifications: Arc<dyn NotificationRepository>,
        config: RealtimeConfig,
    ) -> Self {
        Self {
            registry,
            notifications,
            config,
        }
    }

    pub fn registry(&self) -> &Arc<ConnectionRegistry> {
        &self.registry
    }

    /// Register a new authenticated connection. The confirmation frame
    /// is queued before anything else can be pushed, so the client
    /// always sees it first.
    pub fn register(
        &self,
        user_id: UserId,
        username: String,
    ) -> (Arc<ConnectionHandle>, mpsc::Receiver<OutboundFrame>) {
        let limit = self.config.max_connections_per_user;
        if limit > 0 {
            let mut existing = self.registry.user_connections(user_id);
            existing.sort_by_key(|c| c.connected_at);
            while existing.len() >= limit {
                let oldest = existing.remove(0);
                debug!(
                    connection_id = %oldest.id,
                    user_id = %user_id,
                    "Connection limit reached, evicting oldest connection"
                );
                self.unregister(&oldest.id);
            }
        }

        let (tx, rx) = mpsc::channel(self.config.channel_buffer_size);
        let handle = Arc::new(ConnectionHandle::new(user_id, username, tx));
        handle.send(OutboundFrame::established(user_id));
        self.registry.add(handle.clone());
        info!(
            connection_id = %handle.id,
            user_id = %user_id,
            "WebSocket connection registered"
        );
        (handle, rx)
    }

    /// Drop a connection from the registry.
    pub fn unregister(&self, conn_id: &ConnectionId) {
        if let Some(handle) = self.registry.remove(conn_id) {
            handle.mark_dead();
            info!(
                connection_id = %conn_id,
                user_id = %handle.user_id,
                "WebSocket connection unregistered"
            );
        }
    }

    /// Handle one raw text frame from a client. Unknown frame types are
    /// ignored; malformed JSON gets an error frame back.
    pub async fn handle_inbound(&self, handle: &ConnectionHandle, text: &str) {
        let frame = match serde_json::from_str::<InboundFrame>(text) {
            Ok(frame) => frame,
            Err(_) => {
                handle.send(OutboundFrame::error("Invalid JSON format"));
                return;
            }
        };

        match frame {
            InboundFrame::Ping { timestamp } => {
                handle.send(OutboundFrame::Pong { timestamp });
            }
            InboundFrame::GetNotifications => {
                match self.notifications.count_unread(handle.user_id).await {
                    Ok(unread_count) => {
                        handle.send(OutboundFrame::NotificationsCount { unread_count });
                    }
                    Err(e) => {
                        debug!(error = %e, "Unread count lookup failed");
                        handle.send(OutboundFrame::error("Failed to load unread count"));
                    }
                }
            }
            InboundFrame::Unknown => {
                debug!(connection_id = %handle.id, "Ignoring unknown frame type");
            }
        }
    }

    /// Fan a frame out to every live connection of one user. Returns
    /// how many connections accepted it.
    pub fn send_to_user(&self, user_id: UserId, frame: &OutboundFrame) -> usize {
        let mut delivered = 0;
        for conn in self.registry.user_connections(user_id) {
            if conn.send(frame.clone()) {
                delivered += 1;
            }
        }
        delivered
    }

    pub fn is_online(&self, user_id: UserId) -> bool {
        self.registry.is_online(user_id)
    }
}

#[cfg(test)]
mod tests {
    use socialhub_database::memory::MemoryNotificationRepository;
    use socialhub_entity::notification::{NewNotification, NotificationKind};

    use super::*;

    fn manager() -> (ConnectionManager, Arc<MemoryNotificationRepository>) {
        let repo = Arc::new(MemoryNotificationRepository::new());
        let manager = ConnectionManager::new(
            Arc::new(ConnectionRegistry::new()),
            repo.clone(),
            RealtimeConfig::default(),
        );
        (manager, repo)
    }

    #[tokio::test]
    async fn test_register_sends_confirmation_first() {
        let (manager, _) = manager();
        let user = UserId::new();
        let (handle, mut rx) = manager.register(user, "alice".into());
        handle.send(OutboundFrame::NotificationsCount { unread_count: 0 });

        match rx.recv().await.unwrap() {
            OutboundFrame::ConnectionEstablished { user_id, message } => {
                assert_eq!(user_id, user);
                assert_eq!(message, "Connected to notifications");
            }
            other => panic!("expected connection_established, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_ping_echoes_timestamp() {
        let (manager, _) = manager();
        let (handle, mut rx) = manager.register(UserId::new(), "alice".into());
        rx.recv().await.unwrap(); // connection_established

        manager
            .handle_inbound(&handle, r#"{"type":"ping","timestamp":42}"#)
            .await;
        match rx.recv().await.unwrap() {
            OutboundFrame::Pong { timestamp } => assert_eq!(timestamp, serde_json::json!(42)),
            other => panic!("expected pong, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_get_notifications_returns_unread_count() {
        let (manager, repo) = manager();
        let user = UserId::new();
        let n = NewNotification {
            recipient_id: user,
            sender: None,
            kind: NotificationKind::System,
            title: "t".into(),
            message: "m".into(),
            subject: None,
            payload: serde_json::Value::Null,
        }
        .into_notification(chrono::Utc::now());
        repo.insert(&n).await.unwrap();

        let (handle, mut rx) = manager.register(user, "alice".into());
        rx.recv().await.unwrap();

        manager
            .handle_inbound(&handle, r#"{"type":"get_notifications"}"#)
            .await;
        match rx.recv().await.unwrap() {
            OutboundFrame::NotificationsCount { unread_count } => assert_eq!(unread_count, 1),
            other => panic!("expected notifications_count, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_malformed_json_gets_error_frame() {
        let (manager, _) = manager();
        let (handle, mut rx) = manager.register(UserId::new(), "alice".into());
        rx.recv().await.unwrap();

        manager.handle_inbound(&handle, "{not json").await;
        match rx.recv().await.unwrap() {
            OutboundFrame::Error { message } => assert_eq!(message, "Invalid JSON format"),
            other => panic!("expected error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unknown_frame_ignored() {
        let (manager, _) = manager();
        let (handle, mut rx) = manager.register(UserId::new(), "alice".into());
        rx.recv().await.unwrap();

        manager
            .handle_inbound(&handle, r#"{"type":"subscribe","channel":"x"}"#)
            .await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_connection_limit_evicts_oldest() {
        let repo = Arc::new(MemoryNotificationRepository::new());
        let manager = ConnectionManager::new(
            Arc::new(ConnectionRegistry::new()),
            repo,
            RealtimeConfig {
                max_connections_per_user: 2,
                ..Default::default()
            },
        );
        let user = UserId::new();
        let (first, _rx1) = manager.register(user, "alice".into());
        let (_second, _rx2) = manager.register(user, "alice".into());
        let (_third, _rx3) = manager.register(user, "alice".into());

        assert_eq!(manager.registry().user_connections(user).len(), 2);
        assert!(!first.is_alive());
        // The socket task waiting on the evicted handle wakes up so it
        // can close the connection.
        tokio::time::timeout(std::time::Duration::from_millis(100), first.closed())
            .await
            .expect("evicted handle never signalled close");
    }

    #[tokio::test]
    async fn test_unregister_takes_user_offline() {
        let (manager, _) = manager();
        let user = UserId::new();
        let (handle, _rx) = manager.register(user, "alice".into());
        assert!(manager.is_online(user));

        manager.unregister(&handle.id);
        assert!(!manager.is_online(user));
        assert!(!handle.is_alive());
    }
}
