//! Identity operations: registration, sessions, password reset, profiles
//! and admin account management.

use chrono::{DateTime, Utc};
use tracing::instrument;
use uuid::Uuid;

use jobboard_auth::{AuthzError, JwtClaims, Operation, Role, Viewer};
use jobboard_core::{DomainError, Email, UserId};
use jobboard_users::{ProfileUpdate, RegisterUser, User};

use super::{JobBoard, ServiceError, ServiceResult, actor_of, folders};
use crate::collaborators::{Mail, Upload};

/// A successful login.
#[derive(Debug, Clone)]
pub struct Session {
    pub user: User,
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Files accompanying a profile update.
#[derive(Debug, Default)]
pub struct ProfileFiles {
    pub resume: Option<Upload>,
    pub profile_photo: Option<Upload>,
}

fn new_reset_token() -> String {
    format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple())
}

impl JobBoard {
    /// Self-service registration for jobseekers and recruiters.
    #[instrument(skip(self, cmd, photo), fields(role = %cmd.role), err)]
    pub async fn register(&self, cmd: RegisterUser, photo: Option<Upload>, now: DateTime<Utc>) -> ServiceResult<User> {
        let (email, _) = cmd.validate()?;
        if self.store.user_by_email(&email).await?.is_some() {
            return Err(DomainError::conflict("email already registered").into());
        }

        let password_hash = self.hash_password(&cmd.password).await?;
        let photo_url = match photo {
            Some(file) => Some(self.blobs.upload(folders::PROFILE_PHOTOS, file).await?),
            None => None,
        };

        let user = User::register(cmd, password_hash, photo_url, now)?;
        self.store.insert_user(&user).await?;
        tracing::info!(user_id = %user.id, "user registered");
        Ok(user)
    }

    /// Verify credentials for the claimed role and issue a token.
    #[instrument(skip(self, password), err)]
    pub async fn login(&self, email: &str, password: &str, role: Role, now: DateTime<Utc>) -> ServiceResult<Session> {
        DomainError::require("email", email)?;
        DomainError::require("password", password)?;

        let bad_credentials = || ServiceError::Credentials("incorrect email or password".into());
        let email = Email::parse(email).map_err(|_| bad_credentials())?;
        let user = self.store.user_by_email(&email).await?.ok_or_else(bad_credentials)?;
        if !self.verify_password(password, &user.password_hash).await? {
            return Err(bad_credentials());
        }
        if user.role != role {
            return Err(ServiceError::Credentials("account does not exist with this role".into()));
        }
        if !user.is_active() {
            return Err(AuthzError::Forbidden("account is disabled".into()).into());
        }

        let claims = JwtClaims::new(user.id, user.role, now, self.settings.token_ttl);
        let token = self.tokens.issue(&claims)?;
        tracing::info!(user_id = %user.id, "user logged in");
        Ok(Session {
            expires_at: now + self.settings.token_ttl,
            user,
            token,
        })
    }

    /// Email a reset link. Unknown addresses get the same (silent) outcome.
    #[instrument(skip(self, email), err)]
    pub async fn forgot_password(&self, email: &str, now: DateTime<Utc>) -> ServiceResult<()> {
        DomainError::require("email", email)?;
        let Ok(email) = Email::parse(email) else {
            return Ok(());
        };
        let Some(user) = self.store.user_by_email(&email).await? else {
            tracing::debug!("password reset requested for unknown email");
            return Ok(());
        };

        let token = new_reset_token();
        let pending = token.clone();
        self.store
            .update_user(
                user.id,
                Box::new(move |u: &mut User| {
                    u.begin_password_reset(&pending, now);
                    Ok(())
                }),
            )
            .await?;

        let link = format!("{}/reset-password/{}", self.settings.client_url.trim_end_matches('/'), token);
        self.mailer
            .send(Mail {
                to: user.email.clone(),
                subject: "Password reset".into(),
                body: format!(
                    "Hello {},\n\nUse the link below to reset your password. It expires in one hour.\n\n{}\n",
                    user.fullname, link
                ),
            })
            .await?;
        tracing::info!(user_id = %user.id, "password reset issued");
        Ok(())
    }

    /// Consume a reset token and set a new password.
    #[instrument(skip(self, token, new_password), err)]
    pub async fn reset_password(&self, token: &str, new_password: &str, now: DateTime<Utc>) -> ServiceResult<()> {
        DomainError::require("token", token)?;
        User::check_new_password(new_password)?;

        let invalid = || ServiceError::from(DomainError::validation("invalid or expired reset token"));
        let user = self
            .store
            .user_by_reset_token(&jobboard_users::hash_reset_token(token))
            .await?
            .ok_or_else(invalid)?;

        let new_hash = self.hash_password(new_password).await?;
        let token = token.to_string();
        self.store
            .update_user(user.id, Box::new(move |u: &mut User| u.complete_password_reset(&token, new_hash, now)))
            .await?
            .ok_or_else(invalid)?;
        tracing::info!(user_id = %user.id, "password reset completed");
        Ok(())
    }

    #[instrument(skip(self), err)]
    pub async fn me(&self, viewer: &Viewer) -> ServiceResult<User> {
        self.authorize(viewer, Operation::ViewOwnProfile, None).await?;
        let actor = actor_of(viewer)?;
        self.store
            .user_by_id(actor.id)
            .await?
            .ok_or_else(|| DomainError::not_found("user").into())
    }

    /// Apply an allow-listed profile update, uploading any attached files.
    #[instrument(skip(self, update, files), err)]
    pub async fn update_profile(
        &self,
        viewer: &Viewer,
        mut update: ProfileUpdate,
        files: ProfileFiles,
    ) -> ServiceResult<User> {
        self.authorize(viewer, Operation::UpdateProfile, None).await?;
        let actor = actor_of(viewer)?;
        if update.is_empty() && files.resume.is_none() && files.profile_photo.is_none() {
            return Err(DomainError::validation("no profile fields to update").into());
        }

        if let Some(resume) = files.resume {
            let original_name = resume.file_name.clone();
            let url = self.blobs.upload(folders::RESUMES, resume).await?;
            update.resume = Some((url, original_name));
        }
        if let Some(photo) = files.profile_photo {
            update.profile_photo = Some(self.blobs.upload(folders::PROFILE_PHOTOS, photo).await?);
        }

        let user = self
            .store
            .update_user(actor.id, Box::new(move |u: &mut User| update.apply_to(u)))
            .await?
            .ok_or_else(|| DomainError::not_found("user"))?;
        tracing::info!(user_id = %user.id, "profile updated");
        Ok(user)
    }

    #[instrument(skip(self), err)]
    pub async fn list_users(&self, viewer: &Viewer) -> ServiceResult<Vec<User>> {
        self.authorize(viewer, Operation::ListUsers, None).await?;
        Ok(self.store.list_users().await?)
    }

    #[instrument(skip(self), err)]
    pub async fn disable_user(&self, viewer: &Viewer, id: UserId) -> ServiceResult<User> {
        self.authorize(viewer, Operation::DisableUser, None).await?;
        let user = self
            .store
            .update_user(id, Box::new(|u: &mut User| u.disable()))
            .await?
            .ok_or_else(|| DomainError::not_found("user"))?;
        tracing::info!(user_id = %id, "user disabled");
        Ok(user)
    }

    #[instrument(skip(self), err)]
    pub async fn enable_user(&self, viewer: &Viewer, id: UserId) -> ServiceResult<User> {
        self.authorize(viewer, Operation::EnableUser, None).await?;
        let user = self
            .store
            .update_user(id, Box::new(|u: &mut User| u.enable()))
            .await?
            .ok_or_else(|| DomainError::not_found("user"))?;
        tracing::info!(user_id = %id, "user enabled");
        Ok(user)
    }
}
