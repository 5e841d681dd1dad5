//! Service layer: every job board operation, end to end.
//!
//! Each operation follows the same pipeline:
//!
//! ```text
//! request (viewer + input)
//!   ↓
//! 1. Load the target document (missing → NotFound)
//!   ↓
//! 2. Ask the authorization gate, with the document's owner (deny → Authz);
//!    an actor whose account was disabled is refused here too
//!   ↓
//! 3. Conditional write: the mutation re-checks scope and state on the
//!    locked document (no match → NotFound)
//! ```
//!
//! Loading before authorizing keeps "not found" distinct from "forbidden".
//! The re-check inside the mutation keeps the write atomic even if the
//! document changed between steps 1 and 3.
//!
//! Time is passed in explicitly (`now`) so tests control it.

use std::sync::Arc;

use chrono::Duration;
use thiserror::Error;

use jobboard_auth::{Actor, AuthzError, Operation, PasswordError, PasswordHasher, Scope, TokenError, TokenIssuer, Viewer};
use jobboard_core::{DomainError, UserId};

use crate::collaborators::{BlobError, BlobStore, MailError, Mailer};
use crate::store::{JobBoardStore, StoreError};

pub mod applications;
pub mod bootstrap;
pub mod companies;
pub mod events;
pub mod jobs;
pub mod users;

pub use applications::{ApplicantView, AppliedJob};
pub use bootstrap::AdminSeed;
pub use events::EventSummary;
pub use jobs::JobDetail;
pub use users::{ProfileFiles, Session};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ServiceError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Authz(#[from] AuthzError),

    /// Login failed (unknown email, wrong password or wrong role).
    #[error("invalid credentials: {0}")]
    Credentials(String),

    #[error(transparent)]
    Store(StoreError),

    /// A collaborator (hashing, tokens, mail, blobs) failed.
    #[error("upstream failure: {0}")]
    Upstream(String),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl From<StoreError> for ServiceError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::Duplicate(msg) => ServiceError::Domain(DomainError::Conflict(msg)),
            StoreError::Rejected(err) => ServiceError::Domain(err),
            other => ServiceError::Store(other),
        }
    }
}

impl From<PasswordError> for ServiceError {
    fn from(value: PasswordError) -> Self {
        ServiceError::Upstream(value.to_string())
    }
}

impl From<TokenError> for ServiceError {
    fn from(value: TokenError) -> Self {
        ServiceError::Upstream(value.to_string())
    }
}

impl From<MailError> for ServiceError {
    fn from(value: MailError) -> Self {
        ServiceError::Upstream(value.to_string())
    }
}

impl From<BlobError> for ServiceError {
    fn from(value: BlobError) -> Self {
        match value {
            BlobError::Empty => ServiceError::Domain(DomainError::validation("uploaded file is empty")),
            other => ServiceError::Upstream(other.to_string()),
        }
    }
}

/// Knobs the services need from configuration.
#[derive(Debug, Clone)]
pub struct ServiceSettings {
    pub token_ttl: Duration,
    /// Base URL of the web client; reset links point at `<client_url>/reset-password/<token>`.
    pub client_url: String,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            token_ttl: Duration::hours(24),
            client_url: "http://localhost:5173".to_string(),
        }
    }
}

/// The job board: store plus collaborators.
#[derive(Clone)]
pub struct JobBoard {
    store: Arc<dyn JobBoardStore>,
    passwords: Arc<dyn PasswordHasher>,
    tokens: Arc<dyn TokenIssuer>,
    mailer: Arc<dyn Mailer>,
    blobs: Arc<dyn BlobStore>,
    settings: ServiceSettings,
}

impl JobBoard {
    pub fn new(
        store: Arc<dyn JobBoardStore>,
        passwords: Arc<dyn PasswordHasher>,
        tokens: Arc<dyn TokenIssuer>,
        mailer: Arc<dyn Mailer>,
        blobs: Arc<dyn BlobStore>,
        settings: ServiceSettings,
    ) -> Self {
        Self {
            store,
            passwords,
            tokens,
            mailer,
            blobs,
            settings,
        }
    }

    pub fn store(&self) -> &Arc<dyn JobBoardStore> {
        &self.store
    }

    pub fn settings(&self) -> &ServiceSettings {
        &self.settings
    }
}

impl JobBoard {
    /// The authorization gate, then a refusal for callers whose account is
    /// disabled. Public operations skip the account lookup.
    pub(crate) async fn authorize(
        &self,
        viewer: &Viewer,
        op: Operation,
        owner: Option<UserId>,
    ) -> ServiceResult<Scope> {
        let scope = jobboard_auth::authorize(viewer, op, owner)?;
        if op.is_public() {
            return Ok(scope);
        }
        if let Some(actor) = viewer.actor() {
            let user = self
                .store
                .user_by_id(actor.id)
                .await?
                .ok_or(ServiceError::Authz(AuthzError::Unauthenticated))?;
            if !user.is_active() {
                tracing::debug!(user_id = %actor.id, %op, "disabled account refused");
                return Err(AuthzError::Forbidden("account is disabled".into()).into());
            }
        }
        Ok(scope)
    }

    /// Argon2 is CPU-bound; keep it off the async workers.
    pub(crate) async fn hash_password(&self, plaintext: &str) -> ServiceResult<String> {
        let passwords = Arc::clone(&self.passwords);
        let plaintext = plaintext.to_string();
        tokio::task::spawn_blocking(move || passwords.hash(&plaintext))
            .await
            .map_err(|e| ServiceError::Upstream(format!("password hashing task failed: {e}")))?
            .map_err(ServiceError::from)
    }

    pub(crate) async fn verify_password(&self, plaintext: &str, digest: &str) -> ServiceResult<bool> {
        let passwords = Arc::clone(&self.passwords);
        let (plaintext, digest) = (plaintext.to_string(), digest.to_string());
        tokio::task::spawn_blocking(move || passwords.verify(&plaintext, &digest))
            .await
            .map_err(|e| ServiceError::Upstream(format!("password verification task failed: {e}")))?
            .map_err(ServiceError::from)
    }
}

/// The actor behind a viewer that already passed the gate.
pub(crate) fn actor_of(viewer: &Viewer) -> ServiceResult<Actor> {
    viewer.actor().copied().ok_or(ServiceError::Authz(AuthzError::Unauthenticated))
}

/// Upload folders.
pub(crate) mod folders {
    pub const PROFILE_PHOTOS: &str = "profile-photos";
    pub const RESUMES: &str = "resumes";
    pub const COMPANY_LOGOS: &str = "company-logos";
}
