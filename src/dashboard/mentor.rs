use std::fmt::Write as _;

use serde::Serialize;

use super::{group_members, render_people};
use crate::chat::ChatManager;
use crate::error::{Error, Result};
use crate::store::Directory;
use crate::types::{Group, Participant, ParticipantId};

/// Contact card for one mentee
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MenteeContact {
    pub name: String,
    pub email: String,
    pub location: String,
    pub interests: Vec<String>,
    pub background: String,
}

impl From<&Participant> for MenteeContact {
    fn from(p: &Participant) -> Self {
        Self {
            name: p.profile.name.clone(),
            email: p.profile.email.clone(),
            location: p.profile.location.clone(),
            interests: p.profile.interests.clone(),
            background: p.profile.background.clone(),
        }
    }
}

/// Dashboard for a logged-in mentor
pub struct MentorDashboard<'a> {
    directory: &'a Directory,
    chat: &'a ChatManager<'a>,
    mentor_id: ParticipantId,
}

impl<'a> MentorDashboard<'a> {
    pub fn new(directory: &'a Directory, chat: &'a ChatManager<'a>, mentor_id: &str) -> Result<Self> {
        if !directory.read().participants.require(mentor_id)?.is_mentor() {
            return Err(Error::not_a_mentor(mentor_id));
        }
        Ok(Self {
            directory,
            chat,
            mentor_id: mentor_id.to_string(),
        })
    }

    pub fn mentor(&self) -> Result<Participant> {
        self.directory
            .participant(&self.mentor_id)
            .ok_or_else(|| Error::ParticipantNotFound(self.mentor_id.clone()))
    }

    /// Owned groups in creation order
    pub fn groups(&self) -> Vec<Group> {
        self.directory
            .read()
            .groups
            .groups_by_mentor(&self.mentor_id)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Mentees of one group; empty for an unknown group
    pub fn group_mentees(&self, group_id: &str) -> Vec<Participant> {
        let tables = self.directory.read();
        tables
            .groups
            .get(group_id)
            .map(|g| group_members(&tables.participants, g))
            .unwrap_or_default()
    }

    /// Mentees across all owned groups
    pub fn all_mentees(&self) -> Vec<Participant> {
        let tables = self.directory.read();
        tables
            .groups
            .groups_by_mentor(&self.mentor_id)
            .into_iter()
            .flat_map(|g| group_members(&tables.participants, g))
            .collect()
    }

    pub fn contact_info(&self, mentee_id: &str) -> Result<MenteeContact> {
        let tables = self.directory.read();
        let mentee = tables.participants.require(mentee_id)?;
        if !mentee.is_mentee() {
            return Err(Error::not_a_mentee(mentee_id));
        }
        Ok(MenteeContact::from(mentee))
    }

    /// Post to a group this mentor owns
    pub fn send_message(&self, group_id: &str, content: &str) -> Result<()> {
        let owner = self
            .directory
            .read()
            .groups
            .require(group_id)?
            .mentor_id()
            .to_string();
        if owner != self.mentor_id {
            return Err(Error::NotGroupOwner {
                mentor_id: self.mentor_id.clone(),
                group_id: group_id.to_string(),
            });
        }
        self.chat.send_group_message(&self.mentor_id, group_id, content)
    }

    pub fn update_location(&self, location: &str) -> Result<()> {
        let mut tables = self.directory.write();
        tables.participants.require_mut(&self.mentor_id)?.profile.location = location.to_string();
        Ok(())
    }

    pub fn render(&self) -> Result<String> {
        let me = self.mentor()?;
        let points = me.as_mentor().map(|m| m.reward_points).unwrap_or(0);
        let mut out = String::new();

        let _ = writeln!(out, "===== MENTOR DASHBOARD =====");
        let _ = writeln!(out, "Name: {}", me.profile.name);
        let _ = writeln!(out, "Email: {}", me.profile.email);
        let _ = writeln!(out, "Location: {}", me.profile.location);
        let _ = writeln!(out, "Reward Points: {}", points);
        let _ = writeln!(out);
        let _ = writeln!(out, "Your Groups:");

        let groups = self.groups();
        if groups.is_empty() {
            let _ = writeln!(out, "You don't have any groups yet");
        }
        for group in &groups {
            let _ = writeln!(out);
            let _ = writeln!(out, "Group: {} (ID: {})", group.name, group.id);
            let mentees = self.group_mentees(&group.id);
            if mentees.is_empty() {
                let _ = writeln!(out, "No mentees in this group");
            } else {
                let _ = writeln!(out, "Mentees:");
                render_people(&mut out, &mentees);
                let _ = writeln!(out, "Current Mentees: {}", mentees.len());
            }
            let unread = self.chat.unread_count(&self.mentor_id, &group.id);
            if unread > 0 {
                let _ = writeln!(out, "Unread messages: {}", unread);
            }
        }

        Ok(out)
    }
}
