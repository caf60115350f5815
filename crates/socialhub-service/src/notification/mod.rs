//! Notification lifecycle and the domain-event producers that feed it.

pub mod excerpt;
pub mod mention;
pub mod producers;
pub mod service;

pub use producers::EventProducers;
pub use service::NotificationService;
