use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use jobboard_applications::Application;
use jobboard_auth::Role;
use jobboard_companies::Company;
use jobboard_core::{Email, EventId, PhoneNumber, UserId};
use jobboard_event_registry::{Event, EventCategory, EventStatus};
use jobboard_infra::services::{ApplicantView, AppliedJob, EventSummary, JobDetail, Session};
use jobboard_jobs::Job;
use jobboard_users::{Profile, User, UserStatus};

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    pub role: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResetPasswordRequest {
    pub password: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateStatusRequest {
    #[serde(default)]
    pub status: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct KeywordQuery {
    #[serde(default)]
    pub keyword: Option<String>,
}

// -------------------------
// Response DTOs
// -------------------------

/// A user as the outside world sees it: no password hash, no reset token.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: UserId,
    pub fullname: String,
    pub email: Email,
    pub phone_number: PhoneNumber,
    pub role: Role,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub status: UserStatus,
    pub profile: Profile,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            fullname: user.fullname,
            email: user.email,
            phone_number: user.phone_number,
            role: user.role,
            address: user.address,
            city: user.city,
            state: user.state,
            status: user.status,
            profile: user.profile,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub user: UserResponse,
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

impl From<Session> for SessionResponse {
    fn from(session: Session) -> Self {
        Self {
            user: session.user.into(),
            token: session.token,
            expires_at: session.expires_at,
        }
    }
}

/// Who created something, without the rest of their profile.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatorSummary {
    pub id: UserId,
    pub fullname: String,
    pub email: Email,
}

impl From<&User> for CreatorSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            fullname: user.fullname.clone(),
            email: user.email.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicantResponse {
    pub application: Application,
    pub applicant: Option<UserResponse>,
}

impl From<ApplicantView> for ApplicantResponse {
    fn from(view: ApplicantView) -> Self {
        Self {
            application: view.application,
            applicant: view.applicant.map(UserResponse::from),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobDetailResponse {
    pub job: Job,
    pub company: Option<Company>,
    pub applications: Vec<ApplicantResponse>,
}

impl From<JobDetail> for JobDetailResponse {
    fn from(detail: JobDetail) -> Self {
        Self {
            job: detail.job,
            company: detail.company,
            applications: detail.applications.into_iter().map(ApplicantResponse::from).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppliedJobResponse {
    pub application: Application,
    pub job: Option<Job>,
    pub company: Option<Company>,
}

impl From<AppliedJob> for AppliedJobResponse {
    fn from(applied: AppliedJob) -> Self {
        Self {
            application: applied.application,
            job: applied.job,
            company: applied.company,
        }
    }
}

/// Event as listed publicly: the roster is reduced to a count.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventListItem {
    pub id: EventId,
    pub title: String,
    pub organizer: String,
    pub event_type: String,
    pub description: String,
    pub event_date: NaiveDate,
    pub event_start_time: DateTime<Utc>,
    pub registration_deadline: DateTime<Utc>,
    pub location: String,
    pub category: EventCategory,
    pub price: f64,
    pub status: EventStatus,
    pub external_link: Option<String>,
    pub attendee_count: usize,
    pub creator: Option<CreatorSummary>,
    pub created_at: DateTime<Utc>,
}

impl From<EventSummary> for EventListItem {
    fn from(summary: EventSummary) -> Self {
        let creator = summary.creator.as_ref().map(CreatorSummary::from);
        let event = summary.event;
        Self {
            id: event.id,
            title: event.title,
            organizer: event.organizer,
            event_type: event.event_type,
            description: event.description,
            event_date: event.event_date,
            event_start_time: event.event_start_time,
            registration_deadline: event.registration_deadline,
            location: event.location,
            category: event.category,
            price: event.price,
            status: event.status,
            external_link: event.external_link,
            attendee_count: event.attendees.len(),
            creator,
            created_at: event.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDetailResponse {
    #[serde(flatten)]
    pub event: Event,
    pub creator: Option<CreatorSummary>,
}

impl From<EventSummary> for EventDetailResponse {
    fn from(summary: EventSummary) -> Self {
        Self {
            creator: summary.creator.as_ref().map(CreatorSummary::from),
            event: summary.event,
        }
    }
}

/// `{ "items": [...] }`
pub fn items<T: Serialize>(items: Vec<T>) -> serde_json::Value {
    serde_json::json!({ "items": items })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use jobboard_users::RegisterUser;

    fn user() -> User {
        let now = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).single().expect("valid date");
        let cmd = RegisterUser {
            fullname: "Jane Doe".into(),
            email: "jane@example.com".into(),
            phone_number: "1234567890".into(),
            password: "secret123".into(),
            role: Role::Jobseeker,
        };
        User::register(cmd, "$argon2id$hash".into(), None, now).expect("valid registration")
    }

    #[test]
    fn user_response_never_carries_the_password_hash() {
        let json = serde_json::to_value(UserResponse::from(user())).expect("serializes");
        assert!(json.get("passwordHash").is_none());
        assert!(json.get("passwordReset").is_none());
        assert_eq!(json["email"], "jane@example.com");
        assert_eq!(json["role"], "Jobseeker");
    }

    #[test]
    fn items_wraps_lists() {
        let json = items(vec![1, 2, 3]);
        assert_eq!(json["items"].as_array().map(Vec::len), Some(3));
    }
}
