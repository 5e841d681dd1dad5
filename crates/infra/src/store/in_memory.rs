//! In-memory document store for tests and local development.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;

use jobboard_applications::Application;
use jobboard_companies::{Company, CompanyFilter};
use jobboard_core::{ApplicationId, CompanyId, DomainError, Email, EventId, JobId, UserId, entity::newest_first};
use jobboard_event_registry::Event;
use jobboard_jobs::Job;
use jobboard_users::User;

use super::{
    ApplicationRepository, CompanyRepository, EventRepository, Guard, JobRepository, Mutation, StoreError,
    StoreResult, UserRepository,
};

#[derive(Debug, Default)]
struct Collections {
    users: HashMap<UserId, User>,
    companies: HashMap<CompanyId, Company>,
    jobs: HashMap<JobId, Job>,
    applications: HashMap<ApplicationId, Application>,
    events: HashMap<EventId, Event>,
}

impl Collections {
    fn check_user(&self, user: &User) -> StoreResult<()> {
        if self.users.values().any(|u| u.id != user.id && u.email == user.email) {
            return Err(StoreError::Duplicate("email already registered".into()));
        }
        Ok(())
    }

    fn check_company(&self, company: &Company) -> StoreResult<()> {
        for other in self.companies.values().filter(|c| c.id != company.id) {
            if other.name == company.name {
                return Err(StoreError::Duplicate("company name already exists".into()));
            }
            if other.created_by == company.created_by {
                return Err(StoreError::Duplicate("recruiter already owns a company".into()));
            }
        }
        Ok(())
    }

    fn check_application(&self, application: &Application) -> StoreResult<()> {
        if self
            .applications
            .values()
            .any(|a| a.id != application.id && a.job == application.job && a.applicant == application.applicant)
        {
            return Err(StoreError::Duplicate("already applied to this job".into()));
        }
        Ok(())
    }
}

/// All collections behind a single lock, so a write spanning two documents
/// is observed entirely or not at all.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    inner: RwLock<Collections>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, Collections>> {
        self.inner
            .read()
            .map_err(|_| StoreError::Backend("in-memory store lock poisoned".into()))
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, Collections>> {
        self.inner
            .write()
            .map_err(|_| StoreError::Backend("in-memory store lock poisoned".into()))
    }
}

fn sorted<T: jobboard_core::Entity + Clone>(items: impl Iterator<Item = T>) -> Vec<T> {
    let mut items: Vec<T> = items.collect();
    newest_first(&mut items);
    items
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn insert_user(&self, user: &User) -> StoreResult<()> {
        let mut c = self.write()?;
        c.check_user(user)?;
        c.users.insert(user.id, user.clone());
        Ok(())
    }

    async fn user_by_id(&self, id: UserId) -> StoreResult<Option<User>> {
        Ok(self.read()?.users.get(&id).cloned())
    }

    async fn user_by_email(&self, email: &Email) -> StoreResult<Option<User>> {
        Ok(self.read()?.users.values().find(|u| &u.email == email).cloned())
    }

    async fn user_by_reset_token(&self, token_hash: &str) -> StoreResult<Option<User>> {
        Ok(self
            .read()?
            .users
            .values()
            .find(|u| u.password_reset.as_ref().is_some_and(|r| r.token_hash == token_hash))
            .cloned())
    }

    async fn users_by_ids(&self, ids: &[UserId]) -> StoreResult<Vec<User>> {
        let c = self.read()?;
        Ok(ids.iter().filter_map(|id| c.users.get(id).cloned()).collect())
    }

    async fn list_users(&self) -> StoreResult<Vec<User>> {
        Ok(sorted(self.read()?.users.values().cloned()))
    }

    async fn update_user(&self, id: UserId, mutate: Mutation<'_, User>) -> StoreResult<Option<User>> {
        let mut c = self.write()?;
        let Some(mut user) = c.users.get(&id).cloned() else {
            return Ok(None);
        };
        mutate(&mut user)?;
        c.check_user(&user)?;
        c.users.insert(id, user.clone());
        Ok(Some(user))
    }
}

#[async_trait]
impl CompanyRepository for InMemoryStore {
    async fn insert_company(&self, company: &Company) -> StoreResult<()> {
        let mut c = self.write()?;
        c.check_company(company)?;
        let owner = c
            .users
            .get_mut(&company.created_by)
            .ok_or_else(|| DomainError::not_found("company owner"))?;
        owner.profile.company = Some(company.id);
        c.companies.insert(company.id, company.clone());
        Ok(())
    }

    async fn company_by_id(&self, id: CompanyId) -> StoreResult<Option<Company>> {
        Ok(self.read()?.companies.get(&id).cloned())
    }

    async fn company_by_owner(&self, owner: UserId) -> StoreResult<Option<Company>> {
        Ok(self.read()?.companies.values().find(|c| c.created_by == owner).cloned())
    }

    async fn companies_by_ids(&self, ids: &[CompanyId]) -> StoreResult<Vec<Company>> {
        let c = self.read()?;
        Ok(ids.iter().filter_map(|id| c.companies.get(id).cloned()).collect())
    }

    async fn list_companies(&self, filter: CompanyFilter) -> StoreResult<Vec<Company>> {
        Ok(sorted(self.read()?.companies.values().filter(|c| filter.matches(c)).cloned()))
    }

    async fn update_company(&self, id: CompanyId, mutate: Mutation<'_, Company>) -> StoreResult<Option<Company>> {
        let mut c = self.write()?;
        let Some(mut company) = c.companies.get(&id).cloned() else {
            return Ok(None);
        };
        mutate(&mut company)?;
        c.check_company(&company)?;
        c.companies.insert(id, company.clone());
        Ok(Some(company))
    }
}

#[async_trait]
impl JobRepository for InMemoryStore {
    async fn insert_job(&self, job: &Job) -> StoreResult<()> {
        self.write()?.jobs.insert(job.id, job.clone());
        Ok(())
    }

    async fn job_by_id(&self, id: JobId) -> StoreResult<Option<Job>> {
        Ok(self.read()?.jobs.get(&id).cloned())
    }

    async fn jobs_by_ids(&self, ids: &[JobId]) -> StoreResult<Vec<Job>> {
        let c = self.read()?;
        Ok(ids.iter().filter_map(|id| c.jobs.get(id).cloned()).collect())
    }

    async fn search_jobs(&self, keyword: &str) -> StoreResult<Vec<Job>> {
        Ok(sorted(self.read()?.jobs.values().filter(|j| j.matches_keyword(keyword)).cloned()))
    }

    async fn jobs_posted_by(&self, poster: Option<UserId>) -> StoreResult<Vec<Job>> {
        Ok(sorted(
            self.read()?
                .jobs
                .values()
                .filter(|j| poster.is_none_or(|p| j.created_by == p))
                .cloned(),
        ))
    }

    async fn update_job(&self, id: JobId, mutate: Mutation<'_, Job>) -> StoreResult<Option<Job>> {
        let mut c = self.write()?;
        let Some(job) = c.jobs.get_mut(&id) else {
            return Ok(None);
        };
        let mut updated = job.clone();
        mutate(&mut updated)?;
        *job = updated.clone();
        Ok(Some(updated))
    }
}

#[async_trait]
impl ApplicationRepository for InMemoryStore {
    async fn create_application(&self, application: &Application, guard: Guard<'_, Job>) -> StoreResult<()> {
        let mut c = self.write()?;
        let job = c
            .jobs
            .get(&application.job)
            .ok_or_else(|| DomainError::not_found("job"))?;
        guard(job)?;
        c.check_application(application)?;

        if let Some(job) = c.jobs.get_mut(&application.job) {
            job.attach_application(application.id);
        }
        c.applications.insert(application.id, application.clone());
        Ok(())
    }

    async fn application_by_id(&self, id: ApplicationId) -> StoreResult<Option<Application>> {
        Ok(self.read()?.applications.get(&id).cloned())
    }

    async fn applications_for_job(&self, job: JobId) -> StoreResult<Vec<Application>> {
        Ok(sorted(self.read()?.applications.values().filter(|a| a.job == job).cloned()))
    }

    async fn applications_by_applicant(&self, applicant: UserId) -> StoreResult<Vec<Application>> {
        Ok(sorted(
            self.read()?
                .applications
                .values()
                .filter(|a| a.applicant == applicant)
                .cloned(),
        ))
    }

    async fn update_application(
        &self,
        id: ApplicationId,
        mutate: Mutation<'_, Application>,
    ) -> StoreResult<Option<Application>> {
        let mut c = self.write()?;
        let Some(application) = c.applications.get_mut(&id) else {
            return Ok(None);
        };
        let mut updated = application.clone();
        mutate(&mut updated)?;
        *application = updated.clone();
        Ok(Some(updated))
    }
}

#[async_trait]
impl EventRepository for InMemoryStore {
    async fn insert_event(&self, event: &Event) -> StoreResult<()> {
        self.write()?.events.insert(event.id, event.clone());
        Ok(())
    }

    async fn event_by_id(&self, id: EventId) -> StoreResult<Option<Event>> {
        Ok(self.read()?.events.get(&id).cloned())
    }

    async fn list_events(&self) -> StoreResult<Vec<Event>> {
        Ok(sorted(self.read()?.events.values().cloned()))
    }

    async fn update_event(&self, id: EventId, mutate: Mutation<'_, Event>) -> StoreResult<Option<Event>> {
        let mut c = self.write()?;
        let Some(event) = c.events.get_mut(&id) else {
            return Ok(None);
        };
        let mut updated = event.clone();
        mutate(&mut updated)?;
        *event = updated.clone();
        Ok(Some(updated))
    }
}
