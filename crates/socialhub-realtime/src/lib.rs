//! # socialhub-realtime
//!
//! Real-time WebSocket engine for SocialHub. Provides:
//!
//! - Per-user connection registry (one user, many connections)
//! - Inbound frame handling (ping, on-demand unread counts)
//! - Fan-out dispatch of stored notifications and state updates,
//!   gated by the recipient's delivery preferences

pub mod connection;
pub mod dispatcher;
pub mod message;

pub use connection::manager::ConnectionManager;
pub use connection::registry::ConnectionRegistry;
pub use dispatcher::FanoutDispatcher;
