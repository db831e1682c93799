//! Authentication error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuthError {
    /// Any signature, issuer, time-window or structural failure.
    /// Callers treat every cause the same way, so no finer kinds exist.
    #[error("Invalid token")]
    InvalidToken,

    #[error("Stored password hash is malformed: {0}")]
    MalformedHash(String),

    #[error("Password hashing error: {0}")]
    PasswordHash(String),

    #[error("Session lifetime out of range: {0}s")]
    InvalidLifetime(i64),

    #[error("Token signing error: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),
}
