//! Process-start bootstrap.

use chrono::{DateTime, Utc};
use tracing::instrument;

use jobboard_core::{DomainError, Email};
use jobboard_users::User;

use super::{JobBoard, ServiceResult};
use crate::store::StoreError;

/// Identity of the built-in administrator.
#[derive(Debug, Clone)]
pub struct AdminSeed {
    pub fullname: String,
    pub email: String,
    pub phone_number: String,
    pub password: String,
}

impl JobBoard {
    /// Ensure the seeded admin exists. Safe to run on every start.
    #[instrument(skip(self, seed), fields(email = %seed.email), err)]
    pub async fn bootstrap_admin(&self, seed: &AdminSeed, now: DateTime<Utc>) -> ServiceResult<User> {
        let email = Email::parse(&seed.email)?;
        if let Some(existing) = self.store.user_by_email(&email).await? {
            if !existing.role.is_admin() {
                return Err(DomainError::invariant("seed admin email belongs to a non-admin account").into());
            }
            tracing::debug!(user_id = %existing.id, "seed admin already present");
            return Ok(existing);
        }

        User::check_new_password(&seed.password)?;
        let hash = self.hash_password(&seed.password).await?;
        let admin = User::seed_admin(&seed.fullname, &seed.email, &seed.phone_number, hash, now)?;
        match self.store.insert_user(&admin).await {
            Ok(()) => {
                tracing::info!(user_id = %admin.id, "seed admin created");
                Ok(admin)
            }
            // Another process seeded it first.
            Err(StoreError::Duplicate(_)) => self
                .store
                .user_by_email(&email)
                .await?
                .ok_or_else(|| DomainError::not_found("seed admin").into()),
            Err(e) => Err(e.into()),
        }
    }
}
