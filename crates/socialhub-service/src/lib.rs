//! # socialhub-service
//!
//! Business logic service layer for SocialHub. Each service orchestrates
//! repositories and the live delivery sink to implement application-level
//! use cases.
//!
//! Services follow constructor injection: all dependencies are provided
//! at construction time via `Arc` references.

pub mod context;
pub mod delivery;
pub mod notification;
pub mod preference;

pub use context::RequestContext;
pub use delivery::{DeliverySink, NotificationUpdate, NullDeliverySink};
pub use notification::{EventProducers, NotificationService};
pub use preference::PreferenceService;
