//! Group type definitions
//!
//! A group is owned by exactly one mentor for its whole lifetime and holds
//! at most [`MAX_GROUP_MEMBERS`] mentees.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

use super::participant::{new_id, GroupId, ParticipantId};

/// Hard capacity of every group
pub const MAX_GROUP_MEMBERS: usize = 5;

/// Name given to groups created without one
pub const DEFAULT_GROUP_NAME: &str = "Skill Swap Group";

/// A chat message posted to a group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub sender_id: ParticipantId,
    pub content: String,
    pub sent_at: DateTime<Utc>,
}

/// A mentor-owned group of mentees
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    /// Unique group ID
    pub id: GroupId,

    /// Display name
    pub name: String,

    /// Owning mentor, fixed at creation
    mentor_id: ParticipantId,

    /// Member mentees in assignment order
    members: Vec<ParticipantId>,

    /// Group chat history
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    messages: Vec<Message>,

    /// When the group was created
    pub created_at: DateTime<Utc>,
}

impl Group {
    /// Create an empty group owned by `mentor_id`
    pub fn new(mentor_id: impl Into<ParticipantId>, name: impl Into<String>) -> Self {
        Self {
            id: new_id(),
            name: name.into(),
            mentor_id: mentor_id.into(),
            members: Vec::new(),
            messages: Vec::new(),
            created_at: Utc::now(),
        }
    }

    pub fn mentor_id(&self) -> &str {
        &self.mentor_id
    }

    pub fn members(&self) -> &[ParticipantId] {
        &self.members
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.members.len() >= MAX_GROUP_MEMBERS
    }

    pub fn has_member(&self, participant_id: &str) -> bool {
        self.members.iter().any(|m| m == participant_id)
    }

    /// Whether the participant may post to this group
    pub fn is_participant(&self, participant_id: &str) -> bool {
        self.mentor_id == participant_id || self.has_member(participant_id)
    }

    /// Append a mentee; refuses beyond capacity. Re-adding a member is a no-op.
    pub fn add_member(&mut self, mentee_id: impl Into<ParticipantId>) -> Result<()> {
        let mentee_id = mentee_id.into();
        if self.has_member(&mentee_id) {
            return Ok(());
        }
        if self.is_full() {
            return Err(Error::GroupFull {
                group_id: self.id.clone(),
                capacity: MAX_GROUP_MEMBERS,
            });
        }
        self.members.push(mentee_id);
        Ok(())
    }

    /// Append a chat message
    pub fn add_message(&mut self, sender_id: impl Into<ParticipantId>, content: impl Into<String>) {
        self.messages.push(Message {
            sender_id: sender_id.into(),
            content: content.into(),
            sent_at: Utc::now(),
        });
    }
}
