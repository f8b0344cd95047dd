//! Participant type definitions
//!
//! A participant is either a mentor or a mentee. Role-specific state lives
//! only in its own branch of [`Role`].

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Error;

/// Opaque participant identifier
pub type ParticipantId = String;

/// Opaque group identifier
pub type GroupId = String;

/// Generate a fresh unique id
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

// ─────────────────────────────────────────────────────────────────
// Profile
// ─────────────────────────────────────────────────────────────────

/// Profile fields shared by both roles
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// Display name
    pub name: String,

    /// Registration email (unique within a directory)
    pub email: String,

    /// Age in years
    pub age: u32,

    /// Free-text location, compared exactly
    pub location: String,

    /// Interests, treated as a set when scoring
    #[serde(default)]
    pub interests: Vec<String>,

    /// Origin/affiliation tag, compared exactly
    pub background: String,
}

impl Profile {
    /// Interests as a set, so repeated entries count once
    pub fn interest_set(&self) -> HashSet<&str> {
        self.interests.iter().map(String::as_str).collect()
    }

    /// Number of distinct interests shared with another profile
    pub fn shared_interests(&self, other: &Profile) -> usize {
        let theirs = other.interest_set();
        self.interest_set()
            .into_iter()
            .filter(|interest| theirs.contains(interest))
            .count()
    }
}

// ─────────────────────────────────────────────────────────────────
// Role
// ─────────────────────────────────────────────────────────────────

/// Mentor-only state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MentorState {
    /// Points accumulated from mentee feedback
    pub reward_points: u32,

    /// Owned groups, in creation order
    pub groups: Vec<GroupId>,
}

/// Mentee-only state; both references are absent until assigned
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenteeState {
    pub mentor_id: Option<ParticipantId>,
    pub group_id: Option<GroupId>,
}

impl MenteeState {
    /// Whether an allocation run has placed this mentee in a group
    pub fn is_assigned(&self) -> bool {
        self.group_id.is_some()
    }
}

/// Closed set of participant roles
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum Role {
    Mentor(MentorState),
    Mentee(MenteeState),
}

impl Role {
    /// The kind of this role without its state
    pub fn kind(&self) -> RoleKind {
        match self {
            Role::Mentor(_) => RoleKind::Mentor,
            Role::Mentee(_) => RoleKind::Mentee,
        }
    }
}

/// Role name without state, as given at registration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoleKind {
    Mentor,
    Mentee,
}

impl RoleKind {
    /// Lowercase name used in CLI args and population files
    pub fn as_str(&self) -> &'static str {
        match self {
            RoleKind::Mentor => "mentor",
            RoleKind::Mentee => "mentee",
        }
    }

    /// Fresh, unassigned role state for this kind
    pub fn initial_state(&self) -> Role {
        match self {
            RoleKind::Mentor => Role::Mentor(MentorState::default()),
            RoleKind::Mentee => Role::Mentee(MenteeState::default()),
        }
    }
}

impl fmt::Display for RoleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RoleKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mentor" => Ok(RoleKind::Mentor),
            "mentee" => Ok(RoleKind::Mentee),
            _ => Err(Error::InvalidRole(s.to_string())),
        }
    }
}

// ─────────────────────────────────────────────────────────────────
// Participant
// ─────────────────────────────────────────────────────────────────

/// A registered participant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    /// Unique participant id
    pub id: ParticipantId,

    /// Shared profile
    #[serde(flatten)]
    pub profile: Profile,

    /// Role and its state
    #[serde(flatten)]
    pub role: Role,
}

impl Participant {
    /// Create a participant with a fresh id and unassigned role state
    pub fn new(profile: Profile, kind: RoleKind) -> Self {
        Self {
            id: new_id(),
            profile,
            role: kind.initial_state(),
        }
    }

    pub fn kind(&self) -> RoleKind {
        self.role.kind()
    }

    pub fn is_mentor(&self) -> bool {
        matches!(self.role, Role::Mentor(_))
    }

    pub fn is_mentee(&self) -> bool {
        matches!(self.role, Role::Mentee(_))
    }

    /// Mentor state, if this participant is a mentor
    pub fn as_mentor(&self) -> Option<&MentorState> {
        match &self.role {
            Role::Mentor(state) => Some(state),
            Role::Mentee(_) => None,
        }
    }

    /// Mentee state, if this participant is a mentee
    pub fn as_mentee(&self) -> Option<&MenteeState> {
        match &self.role {
            Role::Mentee(state) => Some(state),
            Role::Mentor(_) => None,
        }
    }

    pub fn as_mentor_mut(&mut self) -> Option<&mut MentorState> {
        match &mut self.role {
            Role::Mentor(state) => Some(state),
            Role::Mentee(_) => None,
        }
    }

    pub fn as_mentee_mut(&mut self) -> Option<&mut MenteeState> {
        match &mut self.role {
            Role::Mentee(state) => Some(state),
            Role::Mentor(_) => None,
        }
    }
}
