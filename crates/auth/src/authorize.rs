//! The authorization gate.
//!
//! - No IO
//! - No panics
//! - No business logic (pure policy check)
//!
//! Callers load the resource first (so a missing id stays "not found"), then
//! ask the gate with the resource's owner, then perform the write.

use thiserror::Error;

use jobboard_core::UserId;

use crate::{Operation, Viewer};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("authentication required")]
    Unauthenticated,

    #[error("forbidden: {0}")]
    Forbidden(String),
}

/// Which documents a permitted caller may touch.
///
/// Recruiters are confined to what they own; admins (and public reads) are
/// not. Stores apply the scope as an extra filter on conditional writes.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Scope {
    Unscoped,
    OwnedBy(UserId),
}

impl Scope {
    pub fn permits(&self, owner: UserId) -> bool {
        match self {
            Scope::Unscoped => true,
            Scope::OwnedBy(id) => *id == owner,
        }
    }
}

/// Decide whether `viewer` may perform `op`.
///
/// `owner` is the owning actor of the target resource for owner-scoped
/// operations; pass `None` when the operation has no single target.
pub fn authorize(viewer: &Viewer, op: Operation, owner: Option<UserId>) -> Result<Scope, AuthzError> {
    if op.is_public() {
        return Ok(Scope::Unscoped);
    }

    let actor = viewer.actor().ok_or(AuthzError::Unauthenticated)?;

    if !op.allowed_roles().contains(&actor.role) {
        return Err(AuthzError::Forbidden(format!("{} may not {}", actor.role, op)));
    }

    if actor.is_admin() {
        return Ok(Scope::Unscoped);
    }

    if !op.is_owner_scoped() {
        return Ok(Scope::OwnedBy(actor.id));
    }

    match owner {
        Some(owner) if owner == actor.id => Ok(Scope::OwnedBy(actor.id)),
        Some(_) => Err(AuthzError::Forbidden(format!("only the owner may {op}"))),
        None => Ok(Scope::OwnedBy(actor.id)),
    }
}
