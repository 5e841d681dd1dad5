use serde::Serialize;

use crate::Role;

/// Every gated operation the job board exposes.
///
/// Each operation carries its own access rule: which roles may call it, and
/// whether a non-admin caller must own the target resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    // public reads
    ListJobs,
    GetJob,
    ListCompanies,
    GetCompany,
    ListEvents,
    GetEvent,

    // any authenticated actor
    ViewOwnProfile,
    UpdateProfile,

    // jobseeker
    ApplyJob,
    ListAppliedJobs,
    RegisterForEvent,

    // recruiter or admin
    RegisterCompany,
    UpdateCompany,
    DisableCompany,
    PostJob,
    ListPostedJobs,
    UpdateJob,
    DisableJob,
    EnableJob,
    ViewJobApplicants,
    UpdateApplicationStatus,
    CreateEvent,
    ViewEventAttendees,
    DisableEvent,

    // admin only
    ActivateCompany,
    ListUsers,
    DisableUser,
    EnableUser,
}

const ANY_ROLE: &[Role] = &[Role::Jobseeker, Role::Recruiter, Role::Admin];
const JOBSEEKER: &[Role] = &[Role::Jobseeker];
const RECRUITER_OR_ADMIN: &[Role] = &[Role::Recruiter, Role::Admin];
const ADMIN: &[Role] = &[Role::Admin];

impl Operation {
    /// Reachable without authentication.
    pub fn is_public(&self) -> bool {
        matches!(
            self,
            Operation::ListJobs
                | Operation::GetJob
                | Operation::ListCompanies
                | Operation::GetCompany
                | Operation::ListEvents
                | Operation::GetEvent
        )
    }

    /// Roles allowed to attempt the operation (ignored for public operations).
    pub fn allowed_roles(&self) -> &'static [Role] {
        match self {
            Operation::ListJobs
            | Operation::GetJob
            | Operation::ListCompanies
            | Operation::GetCompany
            | Operation::ListEvents
            | Operation::GetEvent
            | Operation::ViewOwnProfile
            | Operation::UpdateProfile => ANY_ROLE,

            Operation::ApplyJob | Operation::ListAppliedJobs | Operation::RegisterForEvent => JOBSEEKER,

            Operation::RegisterCompany
            | Operation::UpdateCompany
            | Operation::DisableCompany
            | Operation::PostJob
            | Operation::ListPostedJobs
            | Operation::UpdateJob
            | Operation::DisableJob
            | Operation::EnableJob
            | Operation::ViewJobApplicants
            | Operation::UpdateApplicationStatus
            | Operation::CreateEvent
            | Operation::ViewEventAttendees
            | Operation::DisableEvent => RECRUITER_OR_ADMIN,

            Operation::ActivateCompany
            | Operation::ListUsers
            | Operation::DisableUser
            | Operation::EnableUser => ADMIN,
        }
    }

    /// Non-admin callers must own the target resource.
    pub fn is_owner_scoped(&self) -> bool {
        matches!(
            self,
            Operation::UpdateCompany
                | Operation::DisableCompany
                | Operation::UpdateJob
                | Operation::DisableJob
                | Operation::EnableJob
                | Operation::ViewJobApplicants
                | Operation::UpdateApplicationStatus
                | Operation::ViewEventAttendees
                | Operation::DisableEvent
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::ListJobs => "list jobs",
            Operation::GetJob => "view a job",
            Operation::ListCompanies => "list companies",
            Operation::GetCompany => "view a company",
            Operation::ListEvents => "list events",
            Operation::GetEvent => "view an event",
            Operation::ViewOwnProfile => "view own profile",
            Operation::UpdateProfile => "update profile",
            Operation::ApplyJob => "apply to a job",
            Operation::ListAppliedJobs => "list applied jobs",
            Operation::RegisterForEvent => "register for an event",
            Operation::RegisterCompany => "register a company",
            Operation::UpdateCompany => "update a company",
            Operation::DisableCompany => "disable a company",
            Operation::PostJob => "post a job",
            Operation::ListPostedJobs => "list posted jobs",
            Operation::UpdateJob => "update a job",
            Operation::DisableJob => "disable a job",
            Operation::EnableJob => "enable a job",
            Operation::ViewJobApplicants => "view job applicants",
            Operation::UpdateApplicationStatus => "update an application status",
            Operation::CreateEvent => "create an event",
            Operation::ViewEventAttendees => "view event attendees",
            Operation::DisableEvent => "disable an event",
            Operation::ActivateCompany => "activate a company",
            Operation::ListUsers => "list users",
            Operation::DisableUser => "disable a user",
            Operation::EnableUser => "enable a user",
        }
    }
}

impl core::fmt::Display for Operation {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}
