//! Fan-out dispatcher — pushes stored notifications to live connections.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tracing::debug;

use socialhub_core::result::AppResult;
use socialhub_core::types::id::{NotificationId, UserId};
use socialhub_entity::notification::Notification;
use socialhub_service::delivery::{DeliverySink, NotificationUpdate};
use socialhub_service::preference::PreferenceService;

use crate::connection::manager::ConnectionManager;
use crate::message::types::{NotificationView, OutboundFrame};

/// Production [`DeliverySink`]: fans frames out to the recipient's live
/// connections, honoring the recipient's in-app preferences and quiet
/// hours. The store is already updated by the time a frame gets here,
/// so every path is a silent success from the caller's point of view.
#[derive(Clone)]
pub struct FanoutDispatcher {
    connections: Arc<ConnectionManager>,
    preferences: Arc<PreferenceService>,
}

impl FanoutDispatcher {
    pub fn new(connections: Arc<ConnectionManager>, preferences: Arc<PreferenceService>) -> Self {
        Self {
            connections,
            preferences,
        }
    }
}

#[async_trait]
impl DeliverySink for FanoutDispatcher {
    async fn deliver(&self, notification: &Notification) -> AppResult<()> {
        let recipient = notification.recipient_id;
        if !self.connections.is_online(recipient) {
            return Ok(());
        }

        if !self
            .preferences
            .allows_live_push(recipient, notification.kind, Utc::now())
            .await?
        {
            debug!(
                notification_id = %notification.id,
                recipient_id = %recipient,
                kind = %notification.kind,
                "Live push suppressed by recipient preferences"
            );
            return Ok(());
        }

        let frame = OutboundFrame::Notification {
            notification: NotificationView::from(notification),
        };
        let delivered = self.connections.send_to_user(recipient, &frame);
        debug!(
            notification_id = %notification.id,
            recipient_id = %recipient,
            connections = delivered,
            "Notification fanned out"
        );
        Ok(())
    }

    // State updates are synchronization, not new content, so they skip
    // the preference gate.
    async fn deliver_update(
        &self,
        recipient_id: UserId,
        notification_id: NotificationId,
        update: &NotificationUpdate,
    ) -> AppResult<()> {
        let frame = OutboundFrame::NotificationUpdate {
            notification_id,
            update_data: update.clone(),
        };
        self.connections.send_to_user(recipient_id, &frame);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveTime;
    use serde_json::Value;

    use socialhub_core::config::RealtimeConfig;
    use socialhub_database::memory::{MemoryNotificationRepository, MemoryPreferenceRepository};
    use socialhub_entity::notification::{
        NewNotification, NotificationKind, NotificationPreference,
    };

    use crate::connection::registry::ConnectionRegistry;

    use super::*;

    struct Fixture {
        manager: Arc<ConnectionManager>,
        preferences: Arc<PreferenceService>,
        dispatcher: FanoutDispatcher,
    }

    fn fixture() -> Fixture {
        let manager = Arc::new(ConnectionManager::new(
            Arc::new(ConnectionRegistry::new()),
            Arc::new(MemoryNotificationRepository::new()),
            RealtimeConfig::default(),
        ));
        let preferences = Arc::new(PreferenceService::new(Arc::new(
            MemoryPreferenceRepository::new(),
        )));
        let dispatcher = FanoutDispatcher::new(manager.clone(), preferences.clone());
        Fixture {
            manager,
            preferences,
            dispatcher,
        }
    }

    fn notification(recipient: UserId, kind: NotificationKind) -> Notification {
        NewNotification {
            recipient_id: recipient,
            sender: None,
            kind,
            title: "t".into(),
            message: "m".into(),
            subject: None,
            payload: Value::Null,
        }
        .into_notification(Utc::now())
    }

    #[tokio::test]
    async fn test_fans_out_to_all_connections_of_recipient() {
        let f = fixture();
        let user = UserId::new();
        let (_h1, mut rx1) = f.manager.register(user, "alice".into());
        let (_h2, mut rx2) = f.manager.register(user, "alice".into());
        rx1.recv().await.unwrap();
        rx2.recv().await.unwrap();

        let n = notification(user, NotificationKind::System);
        f.dispatcher.deliver(&n).await.unwrap();

        for rx in [&mut rx1, &mut rx2] {
            match rx.recv().await.unwrap() {
                OutboundFrame::Notification { notification } => assert_eq!(notification.id, n.id),
                other => panic!("expected notification frame, got {other:?}"),
            }
        }
    }

    #[tokio::test]
    async fn test_offline_recipient_is_silent_noop() {
        let f = fixture();
        let n = notification(UserId::new(), NotificationKind::Like);
        f.dispatcher.deliver(&n).await.unwrap();
    }

    #[tokio::test]
    async fn test_disabled_kind_suppresses_push() {
        let f = fixture();
        let user = UserId::new();
        let mut prefs = NotificationPreference::default_for_user(user);
        prefs.in_app_likes = false;
        f.preferences.save(user, prefs).await.unwrap();

        let (_h, mut rx) = f.manager.register(user, "alice".into());
        rx.recv().await.unwrap();

        f.dispatcher
            .deliver(&notification(user, NotificationKind::Like))
            .await
            .unwrap();
        assert!(rx.try_recv().is_err());

        // Other kinds still go through.
        f.dispatcher
            .deliver(&notification(user, NotificationKind::Follow))
            .await
            .unwrap();
        assert!(matches!(
            rx.recv().await.unwrap(),
            OutboundFrame::Notification { .. }
        ));
    }

    #[tokio::test]
    async fn test_quiet_hours_suppress_push() {
        let f = fixture();
        let user = UserId::new();
        let mut prefs = NotificationPreference::default_for_user(user);
        prefs.quiet_hours_enabled = true;
        // Whole day, so the test does not depend on the clock.
        prefs.quiet_hours_start = Some(NaiveTime::from_hms_opt(0, 0, 0).unwrap());
        prefs.quiet_hours_end = Some(NaiveTime::from_hms_opt(23, 59, 59).unwrap());
        f.preferences.save(user, prefs).await.unwrap();

        let (_h, mut rx) = f.manager.register(user, "alice".into());
        rx.recv().await.unwrap();

        f.dispatcher
            .deliver(&notification(user, NotificationKind::Mention))
            .await
            .unwrap();
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_updates_bypass_preference_gate() {
        let f = fixture();
        let user = UserId::new();
        let mut prefs = NotificationPreference::default_for_user(user);
        prefs.in_app_likes = false;
        f.preferences.save(user, prefs).await.unwrap();

        let (_h, mut rx) = f.manager.register(user, "alice".into());
        rx.recv().await.unwrap();

        let id = NotificationId::new();
        f.dispatcher
            .deliver_update(user, id, &NotificationUpdate::archived(true))
            .await
            .unwrap();
        match rx.recv().await.unwrap() {
            OutboundFrame::NotificationUpdate {
                notification_id, ..
            } => assert_eq!(notification_id, id),
            other => panic!("expected notification_update, got {other:?}"),
        }
    }
}
