//! Wire-level frame types.

pub mod types;

pub use types::{InboundFrame, NotificationView, OutboundFrame};
