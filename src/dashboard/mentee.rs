use std::fmt::Write as _;
use std::ops::RangeInclusive;

use tracing::info;

use super::{group_members, render_people, ProfileUpdate};
use crate::chat::ChatManager;
use crate::config::FeedbackSettings;
use crate::error::{Error, Result};
use crate::store::Directory;
use crate::types::{Group, Message, Participant, ParticipantId};

/// Dashboard for a logged-in mentee
pub struct MenteeDashboard<'a> {
    directory: &'a Directory,
    chat: &'a ChatManager<'a>,
    ratings: RangeInclusive<u32>,
    mentee_id: ParticipantId,
}

impl<'a> MenteeDashboard<'a> {
    /// Open the dashboard; fails unless `mentee_id` is a registered mentee
    pub fn new(
        directory: &'a Directory,
        chat: &'a ChatManager<'a>,
        feedback: &FeedbackSettings,
        mentee_id: &str,
    ) -> Result<Self> {
        if !directory.read().participants.require(mentee_id)?.is_mentee() {
            return Err(Error::not_a_mentee(mentee_id));
        }
        Ok(Self {
            directory,
            chat,
            ratings: feedback.min_rating..=feedback.max_rating,
            mentee_id: mentee_id.to_string(),
        })
    }

    pub fn mentee(&self) -> Result<Participant> {
        self.directory
            .participant(&self.mentee_id)
            .ok_or_else(|| Error::ParticipantNotFound(self.mentee_id.clone()))
    }

    /// The group this mentee was placed in
    pub fn group(&self) -> Option<Group> {
        let tables = self.directory.read();
        let group_id = tables
            .participants
            .get(&self.mentee_id)?
            .as_mentee()?
            .group_id
            .clone()?;
        tables.groups.get(&group_id).cloned()
    }

    /// The assigned mentor
    pub fn mentor(&self) -> Option<Participant> {
        let tables = self.directory.read();
        let mentor_id = tables
            .participants
            .get(&self.mentee_id)?
            .as_mentee()?
            .mentor_id
            .clone()?;
        tables
            .participants
            .get(&mentor_id)
            .filter(|p| p.is_mentor())
            .cloned()
    }

    /// Other mentees in the same group
    pub fn group_mates(&self) -> Vec<Participant> {
        let Some(group) = self.group() else {
            return Vec::new();
        };
        let tables = self.directory.read();
        group_members(&tables.participants, &group)
            .into_iter()
            .filter(|p| p.id != self.mentee_id)
            .collect()
    }

    pub fn messages(&self) -> Vec<Message> {
        self.group()
            .map(|g| self.chat.group_messages(&g.id))
            .unwrap_or_default()
    }

    pub fn unread(&self) -> u32 {
        self.group()
            .map(|g| self.chat.unread_count(&self.mentee_id, &g.id))
            .unwrap_or(0)
    }

    /// Post to the mentee's group
    pub fn send_message(&self, content: &str) -> Result<()> {
        let group = self
            .group()
            .ok_or_else(|| Error::NotAssigned(self.mentee_id.clone()))?;
        self.chat.send_group_message(&self.mentee_id, &group.id, content)
    }

    pub fn update_profile(&self, update: ProfileUpdate) -> Result<Participant> {
        let mut tables = self.directory.write();
        let mentee = tables.participants.require_mut(&self.mentee_id)?;
        if let Some(name) = update.name {
            if name.trim().is_empty() {
                return Err(Error::invalid_profile("name", "Name cannot be empty"));
            }
            mentee.profile.name = name;
        }
        if let Some(location) = update.location {
            mentee.profile.location = location;
        }
        if let Some(interests) = update.interests {
            mentee.profile.interests = interests;
        }
        Ok(mentee.clone())
    }

    /// Other mentees sharing at least one interest, in registration order
    pub fn find_similar_mentees(&self) -> Vec<Participant> {
        let tables = self.directory.read();
        let Some(me) = tables.participants.get(&self.mentee_id) else {
            return Vec::new();
        };
        tables
            .participants
            .mentees()
            .filter(|other| other.id != me.id)
            .filter(|other| me.profile.shared_interests(&other.profile) > 0)
            .cloned()
            .collect()
    }

    /// Rate the assigned mentor; the points are added to the mentor's reward total.
    ///
    /// Returns the mentor's new total.
    pub fn give_feedback(&self, rating: u32) -> Result<u32> {
        if !self.ratings.contains(&rating) {
            return Err(Error::InvalidRating {
                rating,
                min: *self.ratings.start(),
                max: *self.ratings.end(),
            });
        }

        let mut tables = self.directory.write();
        let mentor_id = tables
            .participants
            .require(&self.mentee_id)?
            .as_mentee()
            .ok_or_else(|| Error::not_a_mentee(&self.mentee_id))?
            .mentor_id
            .clone()
            .ok_or_else(|| Error::NotAssigned(self.mentee_id.clone()))?;

        let total = tables.participants.add_reward_points(&mentor_id, rating)?;
        info!(mentee = %self.mentee_id, mentor = %mentor_id, rating, total, "Feedback recorded");
        Ok(total)
    }

    pub fn render(&self) -> Result<String> {
        let me = self.mentee()?;
        let mut out = String::new();

        let _ = writeln!(out, "===== MENTEE DASHBOARD =====");
        let _ = writeln!(out, "Name: {}", me.profile.name);
        let _ = writeln!(out, "Email: {}", me.profile.email);
        let _ = writeln!(out, "Location: {}", me.profile.location);
        let _ = writeln!(out, "Interests: {}", me.profile.interests.join(", "));

        match self.group() {
            Some(group) => {
                let _ = writeln!(out);
                let _ = writeln!(out, "Your Group: {} (ID: {})", group.name, group.id);
                if let Some(mentor) = self.mentor() {
                    let _ = writeln!(
                        out,
                        "Your Mentor: {} ({})",
                        mentor.profile.name, mentor.profile.email
                    );
                }
                let mates = self.group_mates();
                if mates.is_empty() {
                    let _ = writeln!(out, "You have no group mates yet");
                } else {
                    let _ = writeln!(out, "Your Group Mates:");
                    render_people(&mut out, &mates);
                }
                let _ = writeln!(out, "Unread messages: {}", self.unread());
            }
            None => {
                let _ = writeln!(out);
                let _ = writeln!(out, "You are not assigned to any group yet");
            }
        }

        Ok(out)
    }
}
