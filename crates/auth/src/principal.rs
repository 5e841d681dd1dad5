use serde::Serialize;

use jobboard_core::UserId;

use crate::Role;

/// An authenticated actor: identity plus its (immutable) role.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Actor {
    pub id: UserId,
    pub role: Role,
}

impl Actor {
    pub fn new(id: UserId, role: Role) -> Self {
        Self { id, role }
    }

    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

/// Whoever is making a request.
///
/// A token carrying a role this system does not know resolves to
/// `Anonymous`, so it can only reach public operations.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum Viewer {
    #[default]
    Anonymous,
    Authenticated(Actor),
}

impl Viewer {
    /// Build a viewer from decoded token facts.
    pub fn from_token(sub: UserId, role: &str) -> Self {
        match role.parse::<Role>() {
            Ok(role) => Viewer::Authenticated(Actor::new(sub, role)),
            Err(_) => {
                tracing::debug!(%sub, "token carries an unrecognized role; treating as anonymous");
                Viewer::Anonymous
            }
        }
    }

    pub fn actor(&self) -> Option<&Actor> {
        match self {
            Viewer::Anonymous => None,
            Viewer::Authenticated(actor) => Some(actor),
        }
    }

    pub fn role(&self) -> Option<Role> {
        self.actor().map(|a| a.role)
    }
}

impl From<Actor> for Viewer {
    fn from(actor: Actor) -> Self {
        Viewer::Authenticated(actor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_token_roles_become_anonymous() {
        let viewer = Viewer::from_token(UserId::new(), "moderator");
        assert_eq!(viewer, Viewer::Anonymous);
        assert!(viewer.actor().is_none());
    }

    #[test]
    fn known_token_roles_are_case_insensitive() {
        let id = UserId::new();
        let viewer = Viewer::from_token(id, "ADMIN");
        assert_eq!(viewer.actor(), Some(&Actor::new(id, Role::Admin)));
    }
}
