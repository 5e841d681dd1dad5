use core::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use jobboard_core::{DomainError, DomainResult, Entity, EventId, UserId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventCategory {
    Technology,
    Management,
    Networking,
    #[serde(rename = "Career Development")]
    CareerDevelopment,
    Career,
    Other,
}

impl FromStr for EventCategory {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "technology" => Ok(EventCategory::Technology),
            "management" => Ok(EventCategory::Management),
            "networking" => Ok(EventCategory::Networking),
            "career development" => Ok(EventCategory::CareerDevelopment),
            "career" => Ok(EventCategory::Career),
            "other" => Ok(EventCategory::Other),
            other => Err(DomainError::validation(format!("unknown event category: {other}"))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventStatus {
    Active,
    Disabled,
}

/// A recruiting event.
///
/// # Invariants
/// - `attendees` contains each actor at most once.
/// - Registration is accepted only while `now <= registration_deadline`
///   and the event is active.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
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
    pub attendees: Vec<UserId>,
    pub created_by: UserId,
    pub status: EventStatus,
    pub external_link: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateEvent {
    pub title: String,
    pub organizer: String,
    pub event_type: String,
    pub description: String,
    pub event_date: NaiveDate,
    pub event_start_time: DateTime<Utc>,
    pub registration_deadline: DateTime<Utc>,
    pub location: String,
    pub category: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub external_link: Option<String>,
}

impl Event {
    pub fn create(cmd: CreateEvent, created_by: UserId, now: DateTime<Utc>) -> DomainResult<Self> {
        for (field, value) in [
            ("title", &cmd.title),
            ("organizer", &cmd.organizer),
            ("eventType", &cmd.event_type),
            ("description", &cmd.description),
            ("location", &cmd.location),
        ] {
            DomainError::require(field, value)?;
        }

        if cmd.event_date < now.date_naive() {
            return Err(DomainError::validation("eventDate must be in the future"));
        }
        if cmd.event_start_time < now {
            return Err(DomainError::validation("eventStartTime must be in the future"));
        }
        if cmd.registration_deadline < now {
            return Err(DomainError::validation("registrationDeadline must be in the future"));
        }
        if cmd.event_date != cmd.event_start_time.date_naive() {
            return Err(DomainError::validation("eventDate must be the day of eventStartTime"));
        }
        if cmd.registration_deadline > cmd.event_start_time {
            return Err(DomainError::validation(
                "registrationDeadline must not be after eventStartTime",
            ));
        }
        if !cmd.price.is_finite() || cmd.price < 0.0 {
            return Err(DomainError::validation("price must not be negative"));
        }

        Ok(Self {
            id: EventId::new(),
            title: cmd.title.trim().to_string(),
            organizer: cmd.organizer.trim().to_string(),
            event_type: cmd.event_type.trim().to_string(),
            description: cmd.description.trim().to_string(),
            event_date: cmd.event_date,
            event_start_time: cmd.event_start_time,
            registration_deadline: cmd.registration_deadline,
            location: cmd.location.trim().to_string(),
            category: cmd.category.parse()?,
            price: cmd.price,
            attendees: Vec::new(),
            created_by,
            status: EventStatus::Active,
            external_link: cmd.external_link.filter(|l| !l.trim().is_empty()),
            created_at: now,
        })
    }

    pub fn registration_open(&self, now: DateTime<Utc>) -> bool {
        now <= self.registration_deadline
    }

    /// Detail reads fail once the deadline has passed.
    pub fn ensure_viewable(&self, now: DateTime<Utc>) -> DomainResult<()> {
        if self.registration_deadline < now {
            return Err(DomainError::validation("registration deadline has passed"));
        }
        Ok(())
    }

    /// Add `attendee` to the roster.
    pub fn register(&mut self, attendee: UserId, now: DateTime<Utc>) -> DomainResult<()> {
        if self.status == EventStatus::Disabled {
            return Err(DomainError::conflict("event is disabled"));
        }
        if !self.registration_open(now) {
            return Err(DomainError::validation("registration deadline has passed"));
        }
        if self.attendees.contains(&attendee) {
            return Err(DomainError::conflict("already registered for this event"));
        }
        self.attendees.push(attendee);
        Ok(())
    }

    /// One-way: there is no reactivation.
    pub fn disable(&mut self) -> DomainResult<()> {
        if self.status == EventStatus::Disabled {
            return Err(DomainError::not_found("active event"));
        }
        self.status = EventStatus::Disabled;
        Ok(())
    }
}

impl Entity for Event {
    type Id = EventId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
