//! Job catalog operations.

use chrono::{DateTime, Utc};
use tracing::instrument;

use jobboard_auth::{AuthzError, Operation, Scope, Viewer};
use jobboard_companies::Company;
use jobboard_core::{DomainError, JobId};
use jobboard_jobs::{Job, JobPatch, JobStatus, PostJob};

use super::applications::ApplicantView;
use super::{JobBoard, ServiceResult, actor_of};

/// A job with its company and applications (each with its applicant).
#[derive(Debug, Clone)]
pub struct JobDetail {
    pub job: Job,
    pub company: Option<Company>,
    pub applications: Vec<ApplicantView>,
}

impl JobBoard {
    /// Recruiters post under their own company; admins name one explicitly.
    #[instrument(skip(self, cmd), err)]
    pub async fn post_job(&self, viewer: &Viewer, cmd: PostJob, now: DateTime<Utc>) -> ServiceResult<Job> {
        self.authorize(viewer, Operation::PostJob, None).await?;
        let actor = actor_of(viewer)?;

        let company = if actor.is_admin() {
            let id = cmd
                .company_id
                .ok_or_else(|| DomainError::validation("companyId is required"))?;
            self.store
                .company_by_id(id)
                .await?
                .ok_or_else(|| DomainError::not_found("company"))?
        } else {
            let own = self
                .store
                .company_by_owner(actor.id)
                .await?
                .ok_or_else(|| DomainError::not_found("company for this recruiter"))?;
            if cmd.company_id.is_some_and(|requested| requested != own.id) {
                return Err(AuthzError::Forbidden("jobs can only be posted under your own company".into()).into());
            }
            own
        };

        let job = Job::post(cmd, company.id, actor.id, now)?;
        self.store.insert_job(&job).await?;
        tracing::info!(job_id = %job.id, company_id = %company.id, "job posted");
        Ok(job)
    }

    /// Keyword search over title and description, newest first.
    pub async fn list_jobs(&self, viewer: &Viewer, keyword: &str) -> ServiceResult<Vec<Job>> {
        self.authorize(viewer, Operation::ListJobs, None).await?;
        Ok(self.store.search_jobs(keyword).await?)
    }

    pub async fn get_job(&self, viewer: &Viewer, id: JobId) -> ServiceResult<JobDetail> {
        self.authorize(viewer, Operation::GetJob, None).await?;
        let job = self.load_job(id).await?;
        let company = self.store.company_by_id(job.company).await?;
        let applications = self.applicant_views(job.id).await?;
        Ok(JobDetail {
            job,
            company,
            applications,
        })
    }

    /// Jobs the caller posted; every job for admins.
    pub async fn posted_jobs(&self, viewer: &Viewer) -> ServiceResult<Vec<Job>> {
        let scope = self.authorize(viewer, Operation::ListPostedJobs, None).await?;
        let poster = match scope {
            Scope::Unscoped => None,
            Scope::OwnedBy(id) => Some(id),
        };
        Ok(self.store.jobs_posted_by(poster).await?)
    }

    pub(crate) async fn load_job(&self, id: JobId) -> ServiceResult<Job> {
        self.store
            .job_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("job").into())
    }

    #[instrument(skip(self), err)]
    pub async fn disable_job(&self, viewer: &Viewer, id: JobId) -> ServiceResult<Job> {
        let job = self
            .transition_job(viewer, id, Operation::DisableJob, JobStatus::Open, JobStatus::Disabled)
            .await?;
        tracing::info!(job_id = %id, "job disabled");
        Ok(job)
    }

    #[instrument(skip(self), err)]
    pub async fn enable_job(&self, viewer: &Viewer, id: JobId) -> ServiceResult<Job> {
        let job = self
            .transition_job(viewer, id, Operation::EnableJob, JobStatus::Disabled, JobStatus::Open)
            .await?;
        tracing::info!(job_id = %id, "job enabled");
        Ok(job)
    }

    async fn transition_job(
        &self,
        viewer: &Viewer,
        id: JobId,
        op: Operation,
        from: JobStatus,
        to: JobStatus,
    ) -> ServiceResult<Job> {
        let current = self.load_job(id).await?;
        let scope = self.authorize(viewer, op, Some(current.created_by)).await?;
        self.store
            .update_job(
                id,
                Box::new(move |job: &mut Job| {
                    if !scope.permits(job.created_by) {
                        return Err(DomainError::not_found("job"));
                    }
                    job.transition(from, to)
                }),
            )
            .await?
            .ok_or_else(|| DomainError::not_found("job").into())
    }

    #[instrument(skip(self, patch), err)]
    pub async fn update_job(&self, viewer: &Viewer, id: JobId, patch: JobPatch) -> ServiceResult<Job> {
        let current = self.load_job(id).await?;
        let scope = self.authorize(viewer, Operation::UpdateJob, Some(current.created_by)).await?;

        let job = self
            .store
            .update_job(
                id,
                Box::new(move |job: &mut Job| {
                    if !scope.permits(job.created_by) {
                        return Err(DomainError::not_found("job"));
                    }
                    patch.apply(job)
                }),
            )
            .await?
            .ok_or_else(|| DomainError::not_found("job"))?;
        tracing::info!(job_id = %id, "job updated");
        Ok(job)
    }
}
