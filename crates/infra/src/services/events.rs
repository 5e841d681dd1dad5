//! Event registry operations.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tracing::instrument;

use jobboard_auth::{Operation, Viewer};
use jobboard_core::{DomainError, Email, EventId};
use jobboard_event_registry::{CreateEvent, Event};
use jobboard_users::User;

use super::{JobBoard, ServiceResult, actor_of};

/// An event with its creator populated.
#[derive(Debug, Clone)]
pub struct EventSummary {
    pub event: Event,
    pub creator: Option<User>,
}

impl JobBoard {
    #[instrument(skip(self, cmd), err)]
    pub async fn create_event(&self, viewer: &Viewer, cmd: CreateEvent, now: DateTime<Utc>) -> ServiceResult<Event> {
        self.authorize(viewer, Operation::CreateEvent, None).await?;
        let actor = actor_of(viewer)?;

        let event = Event::create(cmd, actor.id, now)?;
        self.store.insert_event(&event).await?;
        tracing::info!(event_id = %event.id, "event created");
        Ok(event)
    }

    /// Fails once the registration deadline has passed, even for viewing.
    pub async fn event_details(&self, viewer: &Viewer, id: EventId, now: DateTime<Utc>) -> ServiceResult<EventSummary> {
        self.authorize(viewer, Operation::GetEvent, None).await?;
        let event = self.load_event(id).await?;
        event.ensure_viewable(now)?;
        let creator = self.store.user_by_id(event.created_by).await?;
        Ok(EventSummary { event, creator })
    }

    pub async fn list_events(&self, viewer: &Viewer) -> ServiceResult<Vec<EventSummary>> {
        self.authorize(viewer, Operation::ListEvents, None).await?;
        let events = self.store.list_events().await?;
        let creator_ids: Vec<_> = events.iter().map(|e| e.created_by).collect();
        let creators: HashMap<_, _> = self
            .store
            .users_by_ids(&creator_ids)
            .await?
            .into_iter()
            .map(|u| (u.id, u))
            .collect();

        Ok(events
            .into_iter()
            .map(|event| EventSummary {
                creator: creators.get(&event.created_by).cloned(),
                event,
            })
            .collect())
    }

    #[instrument(skip(self), err)]
    pub async fn register_for_event(&self, viewer: &Viewer, id: EventId, now: DateTime<Utc>) -> ServiceResult<Event> {
        self.authorize(viewer, Operation::RegisterForEvent, None).await?;
        let actor = actor_of(viewer)?;

        let attendee = self
            .store
            .user_by_id(actor.id)
            .await?
            .ok_or_else(|| DomainError::not_found("user"))?;
        if !Email::is_valid(attendee.email.as_str()) {
            return Err(DomainError::validation("a valid email is required to register").into());
        }

        let event = self
            .store
            .update_event(id, Box::new(move |e: &mut Event| e.register(actor.id, now)))
            .await?
            .ok_or_else(|| DomainError::not_found("event"))?;
        tracing::info!(event_id = %id, attendee = %actor.id, "event registration recorded");
        Ok(event)
    }

    /// The creator (or an admin) may read the roster.
    pub async fn event_attendees(&self, viewer: &Viewer, id: EventId) -> ServiceResult<Vec<User>> {
        let event = self.load_event(id).await?;
        self.authorize(viewer, Operation::ViewEventAttendees, Some(event.created_by)).await?;
        Ok(self.store.users_by_ids(&event.attendees).await?)
    }

    #[instrument(skip(self), err)]
    pub async fn disable_event(&self, viewer: &Viewer, id: EventId) -> ServiceResult<Event> {
        let current = self.load_event(id).await?;
        let scope = self.authorize(viewer, Operation::DisableEvent, Some(current.created_by)).await?;

        let event = self
            .store
            .update_event(
                id,
                Box::new(move |e: &mut Event| {
                    if !scope.permits(e.created_by) {
                        return Err(DomainError::not_found("event"));
                    }
                    e.disable()
                }),
            )
            .await?
            .ok_or_else(|| DomainError::not_found("event"))?;
        tracing::info!(event_id = %id, "event disabled");
        Ok(event)
    }

    async fn load_event(&self, id: EventId) -> ServiceResult<Event> {
        self.store
            .event_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("event").into())
    }
}
