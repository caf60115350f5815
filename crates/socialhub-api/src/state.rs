//! Application state shared across all handlers.

use std::sync::Arc;

use socialhub_core::config::AppConfig;
use socialhub_database::repositories::UserRepository;
use socialhub_realtime::connection::manager::ConnectionManager;
use socialhub_service::notification::producers::EventProducers;
use socialhub_service::notification::service::NotificationService;
use socialhub_service::preference::service::PreferenceService;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Notification lifecycle service
    pub notifications: Arc<NotificationService>,
    /// Delivery preference service
    pub preferences: Arc<PreferenceService>,
    /// Domain-event producers
    pub producers: Arc<EventProducers>,
    /// User lookup (admin recipient filter)
    pub users: Arc<dyn UserRepository>,
    /// Live connection manager
    pub connections: Arc<ConnectionManager>,
}
