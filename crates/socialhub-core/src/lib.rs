//! Core building blocks shared by every SocialHub crate.
//!
//! Contains the unified error type, newtype identifiers, pagination
//! types, configuration schemas, and domain event definitions.

pub mod config;
pub mod error;
pub mod events;
pub mod result;
pub mod types;

pub use error::{AppError, ErrorKind};
pub use result::AppResult;
