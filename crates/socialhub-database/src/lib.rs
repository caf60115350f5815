//! # socialhub-database
//!
//! PostgreSQL connection management, repository traits, and the
//! concrete Postgres and in-memory repository implementations.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod repositories;

pub use connection::DatabasePool;
