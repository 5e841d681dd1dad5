//! Event registry domain module.
//!
//! Recruiting events created by recruiters or admins, with a registration
//! window and an attendee roster.

pub mod event;

pub use event::{CreateEvent, Event, EventCategory, EventStatus};
