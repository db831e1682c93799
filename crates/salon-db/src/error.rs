//! Database error types

use std::fmt;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Database connection error: {0}")]
    Connection(#[from] sqlx::Error),

    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Duplicate entry: {0} is already registered")]
    Duplicate(UniqueField),
}

/// Column guarded by a UNIQUE constraint on the users table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueField {
    Email,
    PhoneNumber,
}

impl UniqueField {
    /// Identify the violated column from a SQLite constraint message,
    /// e.g. `UNIQUE constraint failed: users.email`
    pub fn from_constraint_message(message: &str) -> Option<Self> {
        if message.contains("users.email") {
            Some(UniqueField::Email)
        } else if message.contains("users.phone_number") {
            Some(UniqueField::PhoneNumber)
        } else {
            None
        }
    }
}

impl fmt::Display for UniqueField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UniqueField::Email => write!(f, "email"),
            UniqueField::PhoneNumber => write!(f, "phone number"),
        }
    }
}

/// Convert a sqlx error into `DbError::Duplicate` when it is a unique violation
pub(crate) fn map_unique_violation(err: sqlx::Error) -> DbError {
    if let sqlx::Error::Database(db_err) = &err
        && db_err.is_unique_violation()
        && let Some(field) = UniqueField::from_constraint_message(db_err.message())
    {
        return DbError::Duplicate(field);
    }
    DbError::Connection(err)
}
