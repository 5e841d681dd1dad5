//! Application ledger operations.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tracing::instrument;

use jobboard_applications::{Application, ApplicationStatus};
use jobboard_auth::{Operation, Viewer};
use jobboard_companies::Company;
use jobboard_core::{ApplicationId, DomainError, JobId};
use jobboard_jobs::Job;
use jobboard_users::{User, check_profile_completeness};

use super::{JobBoard, ServiceResult, actor_of};

/// An application with its applicant populated.
#[derive(Debug, Clone)]
pub struct ApplicantView {
    pub application: Application,
    pub applicant: Option<User>,
}

/// An application with its job and the job's company populated.
#[derive(Debug, Clone)]
pub struct AppliedJob {
    pub application: Application,
    pub job: Option<Job>,
    pub company: Option<Company>,
}

impl JobBoard {
    /// Apply to an open job. The application and the job's back-reference
    /// are written together; a second application for the same pair is a
    /// conflict.
    #[instrument(skip(self), err)]
    pub async fn apply(&self, viewer: &Viewer, job_id: JobId, now: DateTime<Utc>) -> ServiceResult<Application> {
        self.authorize(viewer, Operation::ApplyJob, None).await?;
        let actor = actor_of(viewer)?;

        let applicant = self
            .store
            .user_by_id(actor.id)
            .await?
            .ok_or_else(|| DomainError::not_found("user"))?;
        if let Err(gaps) = check_profile_completeness(&applicant.profile) {
            let reasons: Vec<&str> = gaps.iter().map(|g| g.reason()).collect();
            return Err(DomainError::validation(format!(
                "complete your profile before applying: {}",
                reasons.join("; ")
            ))
            .into());
        }

        let application = Application::submit(job_id, actor.id, now);
        self.store
            .create_application(
                &application,
                Box::new(|job: &Job| {
                    if !job.is_open() {
                        return Err(DomainError::conflict("job is not accepting applications"));
                    }
                    Ok(())
                }),
            )
            .await?;
        tracing::info!(application_id = %application.id, %job_id, applicant = %actor.id, "application created");
        Ok(application)
    }

    /// The caller's applications, newest first, with job and company.
    pub async fn applied_jobs(&self, viewer: &Viewer) -> ServiceResult<Vec<AppliedJob>> {
        self.authorize(viewer, Operation::ListAppliedJobs, None).await?;
        let actor = actor_of(viewer)?;

        let applications = self.store.applications_by_applicant(actor.id).await?;
        let job_ids: Vec<JobId> = applications.iter().map(|a| a.job).collect();
        let jobs: HashMap<_, _> = self
            .store
            .jobs_by_ids(&job_ids)
            .await?
            .into_iter()
            .map(|j| (j.id, j))
            .collect();
        let company_ids: Vec<_> = jobs.values().map(|j| j.company).collect();
        let companies: HashMap<_, _> = self
            .store
            .companies_by_ids(&company_ids)
            .await?
            .into_iter()
            .map(|c| (c.id, c))
            .collect();

        Ok(applications
            .into_iter()
            .map(|application| {
                let job = jobs.get(&application.job).cloned();
                let company = job.as_ref().and_then(|j| companies.get(&j.company).cloned());
                AppliedJob {
                    application,
                    job,
                    company,
                }
            })
            .collect())
    }

    /// A job's applications with applicant detail, newest first. Recruiters
    /// only see applicants of jobs they posted.
    pub async fn job_applicants(&self, viewer: &Viewer, job_id: JobId) -> ServiceResult<Vec<ApplicantView>> {
        let job = self.load_job(job_id).await?;
        self.authorize(viewer, Operation::ViewJobApplicants, Some(job.created_by)).await?;
        self.applicant_views(job.id).await
    }

    pub(crate) async fn applicant_views(&self, job_id: JobId) -> ServiceResult<Vec<ApplicantView>> {
        let applications = self.store.applications_for_job(job_id).await?;
        let ids: Vec<_> = applications.iter().map(|a| a.applicant).collect();
        let users: HashMap<_, _> = self
            .store
            .users_by_ids(&ids)
            .await?
            .into_iter()
            .map(|u| (u.id, u))
            .collect();

        Ok(applications
            .into_iter()
            .map(|application| ApplicantView {
                applicant: users.get(&application.applicant).cloned(),
                application,
            })
            .collect())
    }

    /// Set an application's status. Any of the three values may be set.
    #[instrument(skip(self), err)]
    pub async fn update_application_status(
        &self,
        viewer: &Viewer,
        id: ApplicationId,
        status: &str,
    ) -> ServiceResult<Application> {
        let application = self
            .store
            .application_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("application"))?;
        let job = self.load_job(application.job).await?;
        self.authorize(viewer, Operation::UpdateApplicationStatus, Some(job.created_by)).await?;
        let status: ApplicationStatus = status.parse()?;

        let updated = self
            .store
            .update_application(
                id,
                Box::new(move |a: &mut Application| {
                    a.set_status(status);
                    Ok(())
                }),
            )
            .await?
            .ok_or_else(|| DomainError::not_found("application"))?;
        tracing::info!(application_id = %id, status = %status, "application status updated");
        Ok(updated)
    }
}
