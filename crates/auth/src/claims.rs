use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use jobboard_core::UserId;

use crate::Role;

/// JWT claims model (transport-agnostic).
///
/// `role` stays a plain string on the wire; it is parsed into a [`Role`] when
/// the claims are turned into a [`crate::Viewer`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwtClaims {
    /// Subject / actor identifier.
    pub sub: UserId,

    /// Role granted at registration.
    pub role: String,

    /// Issued-at, seconds since the Unix epoch.
    pub iat: i64,

    /// Expiration, seconds since the Unix epoch.
    pub exp: i64,
}

impl JwtClaims {
    pub fn new(sub: UserId, role: Role, issued_at: DateTime<Utc>, ttl: Duration) -> Self {
        Self {
            sub,
            role: role.as_str().to_string(),
            iat: issued_at.timestamp(),
            exp: (issued_at + ttl).timestamp(),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("token has expired")]
    Expired,

    #[error("token not yet valid (issued_at is in the future)")]
    NotYetValid,

    #[error("invalid token time window (exp <= iat)")]
    InvalidTimeWindow,

    #[error("invalid token: {0}")]
    Invalid(String),

    #[error("failed to encode token: {0}")]
    Encoding(String),
}

/// Deterministically validate JWT claims.
///
/// Note: this validates the *claims* only. Signature verification / decoding
/// lives in [`crate::jwt`].
pub fn validate_claims(claims: &JwtClaims, now: DateTime<Utc>) -> Result<(), TokenError> {
    let now = now.timestamp();
    if claims.exp <= claims.iat {
        return Err(TokenError::InvalidTimeWindow);
    }
    if now < claims.iat {
        return Err(TokenError::NotYetValid);
    }
    if now >= claims.exp {
        return Err(TokenError::Expired);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims_at(now: DateTime<Utc>) -> JwtClaims {
        JwtClaims::new(UserId::new(), Role::Recruiter, now, Duration::hours(1))
    }

    #[test]
    fn fresh_claims_are_valid() {
        let now = Utc::now();
        assert_eq!(validate_claims(&claims_at(now), now), Ok(()));
    }

    #[test]
    fn claims_expire_at_exp() {
        let now = Utc::now();
        let claims = claims_at(now);
        assert_eq!(validate_claims(&claims, now + Duration::hours(1)), Err(TokenError::Expired));
    }

    #[test]
    fn claims_from_the_future_are_rejected() {
        let now = Utc::now();
        let claims = claims_at(now + Duration::minutes(5));
        assert_eq!(validate_claims(&claims, now), Err(TokenError::NotYetValid));
    }

    #[test]
    fn inverted_window_is_rejected() {
        let now = Utc::now();
        let mut claims = claims_at(now);
        claims.exp = claims.iat;
        assert_eq!(validate_claims(&claims, now), Err(TokenError::InvalidTimeWindow));
    }
}
