//! Participant store — the registered population in registration order

use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::types::{GroupId, Participant, ParticipantId};

/// Ordered table of participants with an id index
#[derive(Debug, Default)]
pub struct ParticipantStore {
    participants: Vec<Participant>,
    index: HashMap<ParticipantId, usize>,
}

impl ParticipantStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a participant; registration order is population order
    pub fn insert(&mut self, participant: Participant) {
        self.index
            .insert(participant.id.clone(), self.participants.len());
        self.participants.push(participant);
    }

    /// The full population, in registration order
    pub fn all(&self) -> &[Participant] {
        &self.participants
    }

    pub fn len(&self) -> usize {
        self.participants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Participant> {
        self.index.get(id).map(|&i| &self.participants[i])
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Participant> {
        self.index.get(id).map(|&i| &mut self.participants[i])
    }

    /// Look up a participant, failing if absent
    pub fn require(&self, id: &str) -> Result<&Participant> {
        self.get(id)
            .ok_or_else(|| Error::ParticipantNotFound(id.to_string()))
    }

    /// Look up a participant mutably, failing if absent
    pub fn require_mut(&mut self, id: &str) -> Result<&mut Participant> {
        self.get_mut(id)
            .ok_or_else(|| Error::ParticipantNotFound(id.to_string()))
    }

    /// Find a participant by exact email
    pub fn find_by_email(&self, email: &str) -> Option<&Participant> {
        self.participants.iter().find(|p| p.profile.email == email)
    }

    /// Mentors in registration order
    pub fn mentors(&self) -> impl Iterator<Item = &Participant> {
        self.participants.iter().filter(|p| p.is_mentor())
    }

    /// Mentees in registration order
    pub fn mentees(&self) -> impl Iterator<Item = &Participant> {
        self.participants.iter().filter(|p| p.is_mentee())
    }

    /// Set a mentee's mentor and group references
    pub fn assign_mentee(&mut self, mentee_id: &str, mentor_id: &str, group_id: &str) -> Result<()> {
        let state = self
            .require_mut(mentee_id)?
            .as_mentee_mut()
            .ok_or_else(|| Error::not_a_mentee(mentee_id))?;
        state.mentor_id = Some(mentor_id.to_string());
        state.group_id = Some(group_id.to_string());
        Ok(())
    }

    /// Append a group to a mentor's owned-group list
    pub fn add_owned_group(&mut self, mentor_id: &str, group_id: GroupId) -> Result<()> {
        let state = self
            .require_mut(mentor_id)?
            .as_mentor_mut()
            .ok_or_else(|| Error::not_a_mentor(mentor_id))?;
        state.groups.push(group_id);
        Ok(())
    }

    /// Credit feedback points to a mentor
    pub fn add_reward_points(&mut self, mentor_id: &str, points: u32) -> Result<u32> {
        let state = self
            .require_mut(mentor_id)?
            .as_mentor_mut()
            .ok_or_else(|| Error::not_a_mentor(mentor_id))?;
        state.reward_points = state.reward_points.saturating_add(points);
        Ok(state.reward_points)
    }

    /// Drop every participant
    pub fn clear(&mut self) {
        self.participants.clear();
        self.index.clear();
    }
}
