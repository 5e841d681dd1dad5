//! HS256 token issuance and verification.

use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};

use crate::claims::{JwtClaims, TokenError, validate_claims};

/// Verifies a bearer token and returns its claims.
pub trait JwtValidator: Send + Sync {
    fn validate(&self, token: &str, now: DateTime<Utc>) -> Result<JwtClaims, TokenError>;
}

/// Signs claims into a bearer token.
pub trait TokenIssuer: Send + Sync {
    fn issue(&self, claims: &JwtClaims) -> Result<String, TokenError>;
}

/// Shared-secret HS256 implementation of both halves.
pub struct Hs256Jwt {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl Hs256Jwt {
    pub fn new(secret: impl AsRef<[u8]>) -> Self {
        let secret = secret.as_ref();
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
        }
    }
}

impl TokenIssuer for Hs256Jwt {
    fn issue(&self, claims: &JwtClaims) -> Result<String, TokenError> {
        jsonwebtoken::encode(&Header::new(Algorithm::HS256), claims, &self.encoding)
            .map_err(|e| TokenError::Encoding(e.to_string()))
    }
}

impl JwtValidator for Hs256Jwt {
    fn validate(&self, token: &str, now: DateTime<Utc>) -> Result<JwtClaims, TokenError> {
        // Time checks run in `validate_claims` against the injected clock.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        let data = jsonwebtoken::decode::<JwtClaims>(token, &self.decoding, &validation)
            .map_err(|e| TokenError::Invalid(e.to_string()))?;

        validate_claims(&data.claims, now)?;
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use jobboard_core::UserId;

    use super::*;
    use crate::Role;

    #[test]
    fn issued_tokens_validate_with_the_same_secret() {
        let jwt = Hs256Jwt::new("secret");
        let now = Utc::now();
        let claims = JwtClaims::new(UserId::new(), Role::Jobseeker, now, Duration::hours(24));
        let token = jwt.issue(&claims).unwrap();
        assert_eq!(jwt.validate(&token, now).unwrap(), claims);
    }

    #[test]
    fn tokens_signed_elsewhere_are_invalid() {
        let now = Utc::now();
        let claims = JwtClaims::new(UserId::new(), Role::Admin, now, Duration::hours(1));
        let token = Hs256Jwt::new("other").issue(&claims).unwrap();
        assert!(matches!(
            Hs256Jwt::new("secret").validate(&token, now),
            Err(TokenError::Invalid(_))
        ));
    }

    #[test]
    fn expired_tokens_are_distinguished_from_invalid_ones() {
        let jwt = Hs256Jwt::new("secret");
        let issued = Utc::now() - Duration::hours(2);
        let claims = JwtClaims::new(UserId::new(), Role::Recruiter, issued, Duration::hours(1));
        let token = jwt.issue(&claims).unwrap();
        assert_eq!(jwt.validate(&token, Utc::now()), Err(TokenError::Expired));
    }

    #[test]
    fn garbage_is_invalid() {
        assert!(matches!(
            Hs256Jwt::new("secret").validate("not.a.token", Utc::now()),
            Err(TokenError::Invalid(_))
        ));
    }
}
