//! Entity trait: identity + continuity across state changes.

use chrono::{DateTime, Utc};

/// Entity marker + minimal interface.
///
/// Every stored document in the job board (users, companies, jobs,
/// applications, events) is an entity: it has a stable identifier and a
/// creation timestamp used for "newest first" listings.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;

    /// When the entity was first persisted.
    fn created_at(&self) -> DateTime<Utc>;
}

/// Sort entities newest first (ties keep their relative order).
pub fn newest_first<E: Entity>(items: &mut [E]) {
    items.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
}
