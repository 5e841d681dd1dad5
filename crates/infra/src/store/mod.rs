//! Document storage for the job board.
//!
//! Every collection is a set of JSON-shaped documents keyed by id. Two
//! backends implement the repository traits:
//!
//! - [`InMemoryStore`]: one lock over every collection, for tests and local dev
//! - [`PostgresStore`]: one `jsonb` table per collection, unique indexes for
//!   the uniqueness invariants
//!
//! ## Conditional writes
//!
//! Updates take a [`Mutation`]: the store locks the current document, runs the
//! mutation against it and persists the result only if the mutation returns
//! `Ok`. A mutation that returns a `DomainError` leaves the document untouched
//! and surfaces as [`StoreError::Rejected`]. This is how "update only if status
//! is X" and "only if the caller owns it" become a single atomic write.
//!
//! ## Uniqueness
//!
//! Both backends enforce the same constraints and report them as
//! [`StoreError::Duplicate`]:
//!
//! | Collection | Unique on |
//! |------------|-----------|
//! | users | email |
//! | companies | name, created_by |
//! | applications | (job, applicant) |

use async_trait::async_trait;
use thiserror::Error;

use jobboard_applications::Application;
use jobboard_companies::{Company, CompanyFilter};
use jobboard_core::{ApplicationId, CompanyId, DomainError, DomainResult, Email, EventId, JobId, UserId};
use jobboard_event_registry::Event;
use jobboard_jobs::Job;
use jobboard_users::User;

pub mod in_memory;
pub mod postgres;

pub use in_memory::InMemoryStore;
pub use postgres::PostgresStore;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// A unique constraint rejected the write.
    #[error("duplicate: {0}")]
    Duplicate(String),

    /// The mutation (or guard) refused the current document.
    #[error(transparent)]
    Rejected(#[from] DomainError),

    /// A stored document could not be decoded.
    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("store backend error: {0}")]
    Backend(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// In-place edit of a locked document. Returning `Err` aborts the write.
pub type Mutation<'a, T> = Box<dyn FnOnce(&mut T) -> DomainResult<()> + Send + 'a>;

/// Precondition checked against a document inside the same write.
pub type Guard<'a, T> = Box<dyn Fn(&T) -> DomainResult<()> + Send + Sync + 'a>;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn insert_user(&self, user: &User) -> StoreResult<()>;
    async fn user_by_id(&self, id: UserId) -> StoreResult<Option<User>>;
    async fn user_by_email(&self, email: &Email) -> StoreResult<Option<User>>;
    /// Look up the user holding a pending reset with this token digest.
    async fn user_by_reset_token(&self, token_hash: &str) -> StoreResult<Option<User>>;
    async fn users_by_ids(&self, ids: &[UserId]) -> StoreResult<Vec<User>>;
    /// Newest first.
    async fn list_users(&self) -> StoreResult<Vec<User>>;
    async fn update_user(&self, id: UserId, mutate: Mutation<'_, User>) -> StoreResult<Option<User>>;
}

#[async_trait]
pub trait CompanyRepository: Send + Sync {
    /// Insert the company and link it on the owner's profile, atomically.
    async fn insert_company(&self, company: &Company) -> StoreResult<()>;
    async fn company_by_id(&self, id: CompanyId) -> StoreResult<Option<Company>>;
    async fn company_by_owner(&self, owner: UserId) -> StoreResult<Option<Company>>;
    async fn companies_by_ids(&self, ids: &[CompanyId]) -> StoreResult<Vec<Company>>;
    /// Newest first.
    async fn list_companies(&self, filter: CompanyFilter) -> StoreResult<Vec<Company>>;
    async fn update_company(&self, id: CompanyId, mutate: Mutation<'_, Company>) -> StoreResult<Option<Company>>;
}

#[async_trait]
pub trait JobRepository: Send + Sync {
    async fn insert_job(&self, job: &Job) -> StoreResult<()>;
    async fn job_by_id(&self, id: JobId) -> StoreResult<Option<Job>>;
    async fn jobs_by_ids(&self, ids: &[JobId]) -> StoreResult<Vec<Job>>;
    /// Title/description keyword search, newest first.
    async fn search_jobs(&self, keyword: &str) -> StoreResult<Vec<Job>>;
    /// Jobs posted by `poster`, or every job for `None`. Newest first.
    async fn jobs_posted_by(&self, poster: Option<UserId>) -> StoreResult<Vec<Job>>;
    async fn update_job(&self, id: JobId, mutate: Mutation<'_, Job>) -> StoreResult<Option<Job>>;
}

#[async_trait]
pub trait ApplicationRepository: Send + Sync {
    /// Create the application and append its id to the job's list in one
    /// write. `guard` sees the locked job; a missing job is `Rejected(NotFound)`.
    async fn create_application(&self, application: &Application, guard: Guard<'_, Job>) -> StoreResult<()>;
    async fn application_by_id(&self, id: ApplicationId) -> StoreResult<Option<Application>>;
    /// Newest first.
    async fn applications_for_job(&self, job: JobId) -> StoreResult<Vec<Application>>;
    /// Newest first.
    async fn applications_by_applicant(&self, applicant: UserId) -> StoreResult<Vec<Application>>;
    async fn update_application(
        &self,
        id: ApplicationId,
        mutate: Mutation<'_, Application>,
    ) -> StoreResult<Option<Application>>;
}

#[async_trait]
pub trait EventRepository: Send + Sync {
    async fn insert_event(&self, event: &Event) -> StoreResult<()>;
    async fn event_by_id(&self, id: EventId) -> StoreResult<Option<Event>>;
    /// Newest first.
    async fn list_events(&self) -> StoreResult<Vec<Event>>;
    async fn update_event(&self, id: EventId, mutate: Mutation<'_, Event>) -> StoreResult<Option<Event>>;
}

/// Every collection the job board persists.
pub trait JobBoardStore:
    UserRepository + CompanyRepository + JobRepository + ApplicationRepository + EventRepository
{
}

impl<T> JobBoardStore for T where
    T: UserRepository + CompanyRepository + JobRepository + ApplicationRepository + EventRepository
{
}
