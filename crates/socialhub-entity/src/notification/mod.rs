//! Notification entities: the durable record, its kind, subject
//! references, per-user preferences, and aggregate statistics.

pub mod kind;
pub mod model;
pub mod preference;
pub mod stats;
pub mod subject;

pub use kind::NotificationKind;
pub use model::{NewNotification, Notification, Sender};
pub use preference::{DeliveryChannel, NotificationPreference};
pub use stats::NotificationStats;
pub use subject::SubjectRef;
