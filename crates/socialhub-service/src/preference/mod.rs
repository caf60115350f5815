//! Preference management.

pub mod service;

pub use service::PreferenceService;
