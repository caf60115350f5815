//! In-memory repository implementations.
//!
//! Behaviorally equivalent to the PostgreSQL repositories, used by unit
//! and handler tests that must run without a database.

pub mod notification;
pub mod preference;
pub mod user;

pub use notification::MemoryNotificationRepository;
pub use preference::MemoryPreferenceRepository;
pub use user::MemoryUserRepository;
