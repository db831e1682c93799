//! SEA Salon Database Layer
//!
//! This crate provides the persistence layer for the salon backend:
//! credential records, reservations and reviews, stored in SQLite via sqlx.

pub mod error;
pub mod models;
pub mod repository;
pub mod utils;

pub use error::{DbError, UniqueField};
pub use models::*;
pub use repository::Database;

/// Re-export sqlx types for convenience
pub use sqlx::SqlitePool;
