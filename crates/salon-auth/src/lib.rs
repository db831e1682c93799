//! SEA Salon Authentication and Authorization
//!
//! This crate provides the session core of the salon backend: Argon2id
//! password hashing, HS256 session tokens, the session/role cookie
//! contract, and the gate that guards page routes.

pub mod cookie;
pub mod error;
pub mod jwt;
pub mod middleware;
pub mod password;

pub use cookie::{ACCESS_TOKEN_COOKIE, USER_ROLE_COOKIE};
pub use error::AuthError;
pub use jwt::{AuthUser, Claims, ISSUER, JwtManager, SESSION_TTL_SECS};
pub use middleware::{PageRoute, SessionState, page_gate};
pub use password::{HashCost, PasswordManager};
