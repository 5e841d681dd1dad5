use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use jobboard_auth::Role;
use jobboard_core::{DomainError, DomainResult, Email, Entity, PhoneNumber, UserId};

use crate::profile::Profile;

/// How long a password-reset token stays usable.
pub const RESET_TOKEN_TTL_MINUTES: i64 = 60;

const MIN_PASSWORD_LEN: usize = 6;

/// Account status. Actors are never deleted, only deactivated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    #[default]
    Active,
    Inactive,
}

/// Pending password reset: only a digest of the emailed token is kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordReset {
    pub token_hash: String,
    pub expires_at: DateTime<Utc>,
}

/// A registered actor.
///
/// # Invariants
/// - `email` is unique across all actors (enforced by the store).
/// - `role` is fixed at registration; there is no operation that changes it.
/// - Only the bootstrap path creates an `Admin`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub fullname: String,
    pub email: Email,
    pub phone_number: PhoneNumber,
    pub password_hash: String,
    pub role: Role,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub status: UserStatus,
    pub password_reset: Option<PasswordReset>,
    pub profile: Profile,
    pub created_at: DateTime<Utc>,
}

/// Self-service registration input (password still in plaintext).
#[derive(Debug, Clone)]
pub struct RegisterUser {
    pub fullname: String,
    pub email: String,
    pub phone_number: String,
    pub password: String,
    pub role: Role,
}

impl RegisterUser {
    /// Check the form before any hashing or storage work happens.
    pub fn validate(&self) -> DomainResult<(Email, PhoneNumber)> {
        DomainError::require("fullname", &self.fullname)?;
        DomainError::require("email", &self.email)?;
        DomainError::require("phoneNumber", &self.phone_number)?;
        DomainError::require("password", &self.password)?;

        if self.role == Role::Admin {
            return Err(DomainError::validation("admin accounts cannot be self-registered"));
        }
        validate_password(&self.password)?;

        Ok((Email::parse(&self.email)?, PhoneNumber::parse(&self.phone_number)?))
    }
}

pub(crate) fn validate_password(password: &str) -> DomainResult<()> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(DomainError::validation(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}

impl User {
    /// Build a new actor from a validated registration.
    pub fn register(
        cmd: RegisterUser,
        password_hash: String,
        profile_photo: Option<String>,
        now: DateTime<Utc>,
    ) -> DomainResult<Self> {
        let (email, phone_number) = cmd.validate()?;
        Ok(Self {
            id: UserId::new(),
            fullname: cmd.fullname.trim().to_string(),
            email,
            phone_number,
            password_hash,
            role: cmd.role,
            address: None,
            city: None,
            state: None,
            status: UserStatus::Active,
            password_reset: None,
            profile: Profile {
                profile_photo,
                ..Profile::default()
            },
            created_at: now,
        })
    }

    /// The built-in administrator created at process start.
    pub fn seed_admin(
        fullname: &str,
        email: &str,
        phone_number: &str,
        password_hash: String,
        now: DateTime<Utc>,
    ) -> DomainResult<Self> {
        DomainError::require("fullname", fullname)?;
        Ok(Self {
            id: UserId::new(),
            fullname: fullname.trim().to_string(),
            email: Email::parse(email)?,
            phone_number: PhoneNumber::parse(phone_number)?,
            password_hash,
            role: Role::Admin,
            address: None,
            city: None,
            state: None,
            status: UserStatus::Active,
            password_reset: None,
            profile: Profile::default(),
            created_at: now,
        })
    }

    pub fn is_active(&self) -> bool {
        self.status == UserStatus::Active
    }

    /// Soft-disable the account.
    pub fn disable(&mut self) -> DomainResult<()> {
        if self.role == Role::Admin {
            return Err(DomainError::invariant("admin accounts cannot be disabled"));
        }
        if self.status == UserStatus::Inactive {
            return Err(DomainError::conflict("user is already inactive"));
        }
        self.status = UserStatus::Inactive;
        Ok(())
    }

    pub fn enable(&mut self) -> DomainResult<()> {
        if self.status == UserStatus::Active {
            return Err(DomainError::conflict("user is already active"));
        }
        self.status = UserStatus::Active;
        Ok(())
    }

    /// Record a fresh reset token (replacing any earlier one).
    pub fn begin_password_reset(&mut self, token: &str, now: DateTime<Utc>) {
        self.password_reset = Some(PasswordReset {
            token_hash: hash_reset_token(token),
            expires_at: now + Duration::minutes(RESET_TOKEN_TTL_MINUTES),
        });
    }

    /// Consume a reset token. The new password must already be validated
    /// with [`User::check_new_password`] and hashed by the caller.
    pub fn complete_password_reset(
        &mut self,
        token: &str,
        new_password_hash: String,
        now: DateTime<Utc>,
    ) -> DomainResult<()> {
        let reset = self
            .password_reset
            .as_ref()
            .ok_or_else(|| DomainError::validation("invalid or expired reset token"))?;

        if reset.token_hash != hash_reset_token(token) || now > reset.expires_at {
            return Err(DomainError::validation("invalid or expired reset token"));
        }

        self.password_hash = new_password_hash;
        self.password_reset = None;
        Ok(())
    }

    pub fn check_new_password(password: &str) -> DomainResult<()> {
        validate_password(password)
    }
}

impl Entity for User {
    type Id = UserId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// SHA-256 of a reset token, lowercase hex.
pub fn hash_reset_token(token: &str) -> String {
    format!("{:x}", Sha256::digest(token.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registration(role: Role) -> RegisterUser {
        RegisterUser {
            fullname: "Jane Doe".into(),
            email: "Jane@Example.com".into(),
            phone_number: "9876543210".into(),
            password: "hunter22".into(),
            role,
        }
    }

    fn jobseeker() -> User {
        User::register(registration(Role::Jobseeker), "hash".into(), None, Utc::now()).unwrap()
    }

    #[test]
    fn registration_normalizes_email_and_starts_active() {
        let user = jobseeker();
        assert_eq!(user.email.as_str(), "jane@example.com");
        assert_eq!(user.status, UserStatus::Active);
        assert_eq!(user.role, Role::Jobseeker);
    }

    #[test]
    fn admins_cannot_self_register() {
        let err = User::register(registration(Role::Admin), "hash".into(), None, Utc::now()).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn short_passwords_are_rejected() {
        let mut cmd = registration(Role::Recruiter);
        cmd.password = "abc".into();
        assert!(cmd.validate().is_err());
    }

    #[test]
    fn bad_phone_is_rejected() {
        let mut cmd = registration(Role::Recruiter);
        cmd.phone_number = "12345".into();
        assert!(matches!(cmd.validate(), Err(DomainError::Validation(_))));
    }

    #[test]
    fn disable_is_one_step_and_never_applies_to_admins() {
        let mut user = jobseeker();
        user.disable().unwrap();
        assert!(!user.is_active());
        assert!(matches!(user.disable(), Err(DomainError::Conflict(_))));
        user.enable().unwrap();
        assert!(user.is_active());

        let mut admin =
            User::seed_admin("Admin", "admin@jobboard.local", "0000000000", "h".into(), Utc::now()).unwrap();
        assert!(matches!(admin.disable(), Err(DomainError::InvariantViolation(_))));
    }

    #[test]
    fn reset_tokens_are_single_use() {
        let mut user = jobseeker();
        let now = Utc::now();
        user.begin_password_reset("tok", now);
        assert_ne!(user.password_reset.as_ref().unwrap().token_hash, "tok");

        user.complete_password_reset("tok", "new-hash".into(), now).unwrap();
        assert_eq!(user.password_hash, "new-hash");
        assert!(user.complete_password_reset("tok", "again".into(), now).is_err());
    }

    #[test]
    fn reset_tokens_expire() {
        let mut user = jobseeker();
        let now = Utc::now();
        user.begin_password_reset("tok", now);
        let later = now + Duration::minutes(RESET_TOKEN_TTL_MINUTES + 1);
        assert!(user.complete_password_reset("tok", "x".into(), later).is_err());
        assert!(user.complete_password_reset("wrong", "x".into(), now).is_err());
    }
}
