//! HTTP and WebSocket handlers.

pub mod admin;
pub mod events;
pub mod health;
pub mod notification;
pub mod preference;
pub mod ws;
