use core::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use jobboard_core::{ApplicationId, DomainError, Entity, JobId, UserId};

/// Review outcome of an application.
///
/// Any of the three values may be set at any time; there is no transition
/// guard beyond the value being known.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    #[default]
    Pending,
    Accepted,
    Rejected,
}

impl ApplicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Accepted => "accepted",
            ApplicationStatus::Rejected => "rejected",
        }
    }
}

impl core::fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApplicationStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(ApplicationStatus::Pending),
            "accepted" => Ok(ApplicationStatus::Accepted),
            "rejected" => Ok(ApplicationStatus::Rejected),
            "" => Err(DomainError::validation("status is required")),
            other => Err(DomainError::validation(format!("invalid application status: {other}"))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub id: ApplicationId,
    pub job: JobId,
    pub applicant: UserId,
    pub status: ApplicationStatus,
    pub created_at: DateTime<Utc>,
}

impl Application {
    pub fn submit(job: JobId, applicant: UserId, now: DateTime<Utc>) -> Self {
        Self {
            id: ApplicationId::new(),
            job,
            applicant,
            status: ApplicationStatus::Pending,
            created_at: now,
        }
    }

    pub fn set_status(&mut self, status: ApplicationStatus) {
        self.status = status;
    }
}

impl Entity for Application {
    type Id = ApplicationId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_applications_are_pending() {
        let app = Application::submit(JobId::new(), UserId::new(), Utc::now());
        assert_eq!(app.status, ApplicationStatus::Pending);
    }

    #[test]
    fn status_parses_case_insensitively_and_writes_lowercase() {
        let status: ApplicationStatus = " Accepted ".parse().unwrap();
        assert_eq!(status, ApplicationStatus::Accepted);
        assert_eq!(serde_json::to_string(&status).unwrap(), "\"accepted\"");
        assert_eq!("REJECTED".parse::<ApplicationStatus>().unwrap(), ApplicationStatus::Rejected);
    }

    #[test]
    fn unknown_or_blank_status_is_a_validation_error() {
        assert!(matches!("hired".parse::<ApplicationStatus>(), Err(DomainError::Validation(_))));
        assert_eq!(
            "".parse::<ApplicationStatus>(),
            Err(DomainError::validation("status is required"))
        );
    }

    #[test]
    fn status_can_move_back_and_forth() {
        let mut app = Application::submit(JobId::new(), UserId::new(), Utc::now());
        app.set_status(ApplicationStatus::Accepted);
        app.set_status(ApplicationStatus::Pending);
        assert_eq!(app.status, ApplicationStatus::Pending);
    }
}
