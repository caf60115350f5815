//! Domain entity models for SocialHub.

pub mod notification;
pub mod user;
