//! Capability-based authorization.
//!
//! Roles are only a storage convenience. Every workflow decision is made
//! against the [`CapabilitySet`] an [`Actor`] resolved to once, at the start
//! of the operation.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::{DomainError, ErrorCode, UserId, ValidationError};

/// A named permission an actor either holds or lacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    Propose,
    Approve,
    DirectApply,
    View,
}

impl Capability {
    const fn bit(self) -> u8 {
        match self {
            Capability::Propose => 0b0001,
            Capability::Approve => 0b0010,
            Capability::DirectApply => 0b0100,
            Capability::View => 0b1000,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::Propose => "propose",
            Capability::Approve => "approve",
            Capability::DirectApply => "direct_apply",
            Capability::View => "view",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Set of capabilities held by one actor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct CapabilitySet(u8);

impl CapabilitySet {
    pub const fn empty() -> Self {
        Self(0)
    }

    pub fn of(capabilities: &[Capability]) -> Self {
        capabilities
            .iter()
            .fold(Self::empty(), |set, cap| set.with(*cap))
    }

    pub const fn with(self, capability: Capability) -> Self {
        Self(self.0 | capability.bit())
    }

    pub const fn contains(&self, capability: Capability) -> bool {
        self.0 & capability.bit() != 0
    }

    /// Holds `view` and nothing else.
    pub fn is_view_only(&self) -> bool {
        *self == Self::of(&[Capability::View])
    }

    pub fn iter(&self) -> impl Iterator<Item = Capability> + '_ {
        [
            Capability::Propose,
            Capability::Approve,
            Capability::DirectApply,
            Capability::View,
        ]
        .into_iter()
        .filter(move |cap| self.contains(*cap))
    }
}

/// Stored role of a user; expands to a fixed capability set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Viewer,
    Editor,
    Admin,
}

impl Role {
    pub fn capabilities(&self) -> CapabilitySet {
        match self {
            Role::Viewer => CapabilitySet::of(&[Capability::View]),
            Role::Editor => CapabilitySet::of(&[Capability::View, Capability::Propose]),
            Role::Admin => CapabilitySet::of(&[
                Capability::View,
                Capability::Propose,
                Capability::Approve,
                Capability::DirectApply,
            ]),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Viewer => "viewer",
            Role::Editor => "editor",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "viewer" => Ok(Role::Viewer),
            "editor" => Ok(Role::Editor),
            "admin" => Ok(Role::Admin),
            other => Err(ValidationError::invalid_format(
                "role",
                format!("unknown role '{}'", other),
            )),
        }
    }
}

/// Audience of a fan-out, resolved to members at dispatch time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleGroup {
    /// Everyone holding `approve`.
    Reviewers,
    /// Everyone whose capabilities are exactly `{view}`.
    Viewers,
}

impl RoleGroup {
    pub fn includes(&self, capabilities: &CapabilitySet) -> bool {
        match self {
            RoleGroup::Reviewers => capabilities.contains(Capability::Approve),
            RoleGroup::Viewers => capabilities.is_view_only(),
        }
    }
}

impl fmt::Display for RoleGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoleGroup::Reviewers => f.write_str("reviewers"),
            RoleGroup::Viewers => f.write_str("viewers"),
        }
    }
}

/// A user together with the capabilities resolved for this operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub id: UserId,
    pub capabilities: CapabilitySet,
}

impl Actor {
    pub fn new(id: UserId, capabilities: CapabilitySet) -> Self {
        Self { id, capabilities }
    }

    pub fn can(&self, capability: Capability) -> bool {
        self.capabilities.contains(capability)
    }

    /// Fails with `Forbidden` when the capability is missing.
    pub fn require(&self, capability: Capability) -> Result<(), DomainError> {
        if self.can(capability) {
            Ok(())
        } else {
            Err(DomainError::new(
                ErrorCode::Forbidden,
                format!("Missing capability '{}'", capability),
            )
            .with_detail("user_id", self.id.as_str())
            .with_detail("capability", capability.as_str()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn actor(role: Role) -> Actor {
        Actor::new(UserId::new("someone").unwrap(), role.capabilities())
    }

    #[test]
    fn roles_expand_to_expected_capabilities() {
        assert!(Role::Viewer.capabilities().is_view_only());
        assert!(Role::Editor.capabilities().contains(Capability::Propose));
        assert!(!Role::Editor.capabilities().contains(Capability::Approve));
        let admin = Role::Admin.capabilities();
        assert_eq!(admin.iter().count(), 4);
    }

    #[test]
    fn require_returns_forbidden_when_missing() {
        let err = actor(Role::Viewer).require(Capability::Propose).unwrap_err();
        assert_eq!(err.code, ErrorCode::Forbidden);
        assert!(actor(Role::Admin).require(Capability::DirectApply).is_ok());
    }

    #[test]
    fn role_groups_select_members() {
        assert!(RoleGroup::Reviewers.includes(&Role::Admin.capabilities()));
        assert!(!RoleGroup::Reviewers.includes(&Role::Editor.capabilities()));
        assert!(RoleGroup::Viewers.includes(&Role::Viewer.capabilities()));
        assert!(!RoleGroup::Viewers.includes(&Role::Editor.capabilities()));
    }

    #[test]
    fn role_parses_from_lowercase_name() {
        assert_eq!("editor".parse::<Role>().unwrap(), Role::Editor);
        assert!("owner".parse::<Role>().is_err());
    }
}
