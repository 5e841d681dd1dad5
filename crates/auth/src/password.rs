//! Credential hashing.

use argon2::Argon2;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{self, PasswordHash, PasswordVerifier, SaltString};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PasswordError {
    #[error("failed to hash password: {0}")]
    Hash(String),

    #[error("stored password hash is malformed")]
    MalformedHash,
}

/// `hash(plaintext) -> digest`, `verify(plaintext, digest) -> bool`.
pub trait PasswordHasher: Send + Sync {
    fn hash(&self, plaintext: &str) -> Result<String, PasswordError>;
    fn verify(&self, plaintext: &str, digest: &str) -> Result<bool, PasswordError>;
}

/// Argon2id with the crate's default parameters; digests are PHC strings.
#[derive(Debug, Default, Clone, Copy)]
pub struct Argon2Hasher;

impl PasswordHasher for Argon2Hasher {
    fn hash(&self, plaintext: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);
        argon2::PasswordHasher::hash_password(&Argon2::default(), plaintext.as_bytes(), &salt)
            .map(|h| h.to_string())
            .map_err(|e| PasswordError::Hash(e.to_string()))
    }

    fn verify(&self, plaintext: &str, digest: &str) -> Result<bool, PasswordError> {
        let parsed = PasswordHash::new(digest).map_err(|_| PasswordError::MalformedHash)?;
        match Argon2::default().verify_password(plaintext.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(e) => Err(PasswordError::Hash(e.to_string())),
        }
    }
}
