//! Password hashing and verification using Argon2id

use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{
        PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng,
    },
};
use std::sync::Arc;
use tracing::warn;

use crate::error::AuthError;

/// Lowest accepted memory cost (16 MiB)
pub const MIN_MEMORY_KIB: u32 = 16 * 1024;
/// Lowest accepted number of passes
pub const MIN_TIME_COST: u32 = 2;
/// Lanes are pinned to one so every hash costs the same resources
pub const PARALLELISM: u32 = 1;

/// Argon2id cost settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashCost {
    pub memory_kib: u32,
    pub time_cost: u32,
}

impl Default for HashCost {
    fn default() -> Self {
        Self {
            memory_kib: 19_456,
            time_cost: 2,
        }
    }
}

impl HashCost {
    /// Raise values below the accepted minimums, logging a warning for each
    pub fn validated(self) -> Self {
        let memory_kib = if self.memory_kib < MIN_MEMORY_KIB {
            warn!(
                "password memory_kib {} is below minimum {}, using minimum",
                self.memory_kib, MIN_MEMORY_KIB
            );
            MIN_MEMORY_KIB
        } else {
            self.memory_kib
        };

        let time_cost = if self.time_cost < MIN_TIME_COST {
            warn!(
                "password time_cost {} is below minimum {}, using minimum",
                self.time_cost, MIN_TIME_COST
            );
            MIN_TIME_COST
        } else {
            self.time_cost
        };

        Self {
            memory_kib,
            time_cost,
        }
    }
}

/// Hashes and verifies credentials.
///
/// Cheap to clone; hashing runs on the blocking pool through the
/// `*_blocking` methods so a slow hash never stalls request handling.
#[derive(Clone)]
pub struct PasswordManager {
    params: Params,
    /// Hash of a random throwaway password, verified against when the
    /// account does not exist so both paths cost one Argon2 run
    dummy_hash: Arc<str>,
}

impl PasswordManager {
    /// Create a new password manager with the given cost
    pub fn new(cost: HashCost) -> Result<Self, AuthError> {
        let cost = cost.validated();
        let params = Params::new(cost.memory_kib, cost.time_cost, PARALLELISM, None)
            .map_err(|e| AuthError::PasswordHash(e.to_string()))?;

        let mut manager = Self {
            params,
            dummy_hash: Arc::from(""),
        };
        let throwaway = SaltString::generate(&mut OsRng);
        manager.dummy_hash = Arc::from(manager.hash(throwaway.as_str())?);
        Ok(manager)
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    /// Hash a password into a PHC string with a fresh random salt
    pub fn hash(&self, password: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);

        let password_hash = self
            .argon2()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AuthError::PasswordHash(e.to_string()))?;

        Ok(password_hash.to_string())
    }

    /// Verify a password against a stored PHC hash.
    ///
    /// A mismatch is `Ok(false)`; only an unparseable stored hash or an
    /// internal Argon2 failure is an error.
    pub fn verify(&self, stored_hash: &str, password: &str) -> Result<bool, AuthError> {
        let parsed_hash =
            PasswordHash::new(stored_hash).map_err(|e| AuthError::MalformedHash(e.to_string()))?;

        match self.argon2().verify_password(password.as_bytes(), &parsed_hash) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(AuthError::PasswordHash(e.to_string())),
        }
    }

    /// Verify against `stored_hash`, or against the dummy hash when there is
    /// no account. The dummy path always yields `false`.
    pub fn verify_or_dummy(
        &self,
        stored_hash: Option<&str>,
        password: &str,
    ) -> Result<bool, AuthError> {
        match stored_hash {
            Some(hash) => self.verify(hash, password),
            None => {
                self.verify(&self.dummy_hash, password)?;
                Ok(false)
            }
        }
    }

    /// [`hash`](Self::hash) on the blocking thread pool
    pub async fn hash_blocking(&self, password: String) -> Result<String, AuthError> {
        let manager = self.clone();
        tokio::task::spawn_blocking(move || manager.hash(&password))
            .await
            .map_err(|e| AuthError::PasswordHash(e.to_string()))?
    }

    /// [`verify_or_dummy`](Self::verify_or_dummy) on the blocking thread pool
    pub async fn verify_blocking(
        &self,
        stored_hash: Option<String>,
        password: String,
    ) -> Result<bool, AuthError> {
        let manager = self.clone();
        tokio::task::spawn_blocking(move || {
            manager.verify_or_dummy(stored_hash.as_deref(), &password)
        })
        .await
        .map_err(|e| AuthError::PasswordHash(e.to_string()))?
    }
}
