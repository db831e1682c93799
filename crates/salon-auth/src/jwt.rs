//! JWT token management

use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use salon_db::UserRole;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::AuthError;

/// Issuer claim stamped on, and required of, every session token
pub const ISSUER: &str = "sea_salon";

/// Session lifetime: one synthetic month
pub const SESSION_TTL_SECS: i64 = 2_628_000;

/// JWT claims
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Issuer
    pub iss: String,
    /// Subject (credential ID)
    pub sub: String,
    /// User role
    pub role: UserRole,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Not before (Unix timestamp)
    pub nbf: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

/// Identity extracted from a verified session token.
///
/// Only [`JwtManager::verify`] constructs this, so holding one proves the
/// token behind it was valid. The role cookie never feeds into it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    subject: String,
    role: UserRole,
    issued_at: i64,
    expires_at: i64,
}

impl AuthUser {
    fn from_claims(claims: Claims) -> Self {
        Self {
            subject: claims.sub,
            role: claims.role,
            issued_at: claims.iat,
            expires_at: claims.exp,
        }
    }

    /// Credential ID the token was issued for
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// Role carried by the verified token
    pub fn current_role(&self) -> UserRole {
        self.role
    }

    pub fn issued_at(&self) -> i64 {
        self.issued_at
    }

    pub fn expires_at(&self) -> i64 {
        self.expires_at
    }

    /// Seconds left until expiry at `now`, never negative
    pub fn remaining_secs(&self, now: i64) -> i64 {
        (self.expires_at - now).max(0)
    }
}

/// JWT manager for token generation and validation
#[derive(Clone)]
pub struct JwtManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    session_ttl_secs: i64,
}

impl JwtManager {
    /// Create a new JWT manager
    pub fn new(secret: &str, session_ttl_secs: i64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[ISSUER]);
        validation.set_required_spec_claims(&["iss", "sub", "nbf", "exp"]);
        // The time window is checked in verify_at with zero leeway, so that
        // a token is already dead at exactly `exp`.
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            session_ttl_secs,
        }
    }

    /// Lifetime applied to login sessions and their cookies
    pub fn session_ttl_secs(&self) -> i64 {
        self.session_ttl_secs
    }

    /// Generate a session token valid for the configured session lifetime
    pub fn issue_session(&self, subject: &str, role: UserRole) -> Result<String, AuthError> {
        self.issue(subject, role, self.session_ttl_secs)
    }

    /// Generate a token valid for `ttl_secs` from now
    pub fn issue(&self, subject: &str, role: UserRole, ttl_secs: i64) -> Result<String, AuthError> {
        self.issue_at(subject, role, ttl_secs, Utc::now().timestamp())
    }

    /// Generate a token as if issued at `now`
    pub fn issue_at(
        &self,
        subject: &str,
        role: UserRole,
        ttl_secs: i64,
        now: i64,
    ) -> Result<String, AuthError> {
        let exp = now
            .checked_add(ttl_secs)
            .ok_or(AuthError::InvalidLifetime(ttl_secs))?;
        let claims = Claims {
            iss: ISSUER.to_string(),
            sub: subject.to_string(),
            role,
            iat: now,
            nbf: now,
            exp,
        };

        debug!("Issuing {} token for subject {}", role, subject);

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(AuthError::Signing)
    }

    /// Validate a token against the current time
    pub fn verify(&self, token: &str) -> Result<AuthUser, AuthError> {
        self.verify_at(token, Utc::now().timestamp())
    }

    /// Validate a token against `now`.
    ///
    /// Checks run in order: signature, issuer, not-before, expiration.
    /// Every failure collapses into [`AuthError::InvalidToken`].
    pub fn verify_at(&self, token: &str, now: i64) -> Result<AuthUser, AuthError> {
        // Signature, then issuer and claim structure
        let token_data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            debug!("Rejected token: {}", e);
            AuthError::InvalidToken
        })?;
        let claims = token_data.claims;

        if now < claims.nbf {
            debug!("Rejected token for {}: not valid before {}", claims.sub, claims.nbf);
            return Err(AuthError::InvalidToken);
        }

        if now >= claims.exp {
            debug!("Rejected token for {}: expired at {}", claims.sub, claims.exp);
            return Err(AuthError::InvalidToken);
        }

        Ok(AuthUser::from_claims(claims))
    }
}
