//! Individual WebSocket connection handle.

use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Utc};
use tokio::sync::{Notify, mpsc};
use uuid::Uuid;

use socialhub_core::types::id::UserId;

use crate::message::types::OutboundFrame;

/// Unique connection identifier
pub type ConnectionId = Uuid;

/// A handle to a single WebSocket connection.
///
/// Holds the sender channel for pushing frames to the client, plus
/// metadata about the connected user.
#[derive(Debug)]
pub struct ConnectionHandle {
    /// Unique connection ID
    pub id: ConnectionId,
    /// User who owns this connection
    pub user_id: UserId,
    /// Username (cached for display)
    pub username: String,
    /// Sender for outbound frames
    pub sender: mpsc::Sender<OutboundFrame>,
    /// When the connection was established
    pub connected_at: DateTime<Utc>,
    /// Whether the connection is still alive
    pub alive: AtomicBool,
    /// Signalled when the connection is marked dead
    shutdown: Notify,
}

impl ConnectionHandle {
    pub fn new(user_id: UserId, username: String, sender: mpsc::Sender<OutboundFrame>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            username,
            sender,
            connected_at: Utc::now(),
            alive: AtomicBool::new(true),
            shutdown: Notify::new(),
        }
    }

    /// Send an outbound frame to this connection. A full buffer drops
    /// the frame; a closed channel marks the connection dead.
    pub fn send(&self, frame: OutboundFrame) -> bool {
        if !self.is_alive() {
            return false;
        }
        match self.sender.try_send(frame) {
            Ok(_) => true,
            Err(mpsc::error::TrySendError::Full(_)) => {
                tracing::warn!("Connection {} send buffer full, dropping frame", self.id);
                false
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                self.mark_dead();
                false
            }
        }
    }

    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::SeqCst)
    }

    pub fn mark_dead(&self) {
        self.alive.store(false, Ordering::SeqCst);
        self.shutdown.notify_one();
    }

    /// Resolve once the connection has been marked dead. The socket
    /// task uses this to tear down an evicted connection that would
    /// otherwise sit blocked on its outbound channel.
    pub async fn closed(&self) {
        if !self.is_alive() {
            return;
        }
        self.shutdown.notified().await;
    }
}
