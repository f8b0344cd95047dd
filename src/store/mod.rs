//! In-memory record store
//!
//! The [`Directory`] is the process-wide handle over the participant store and
//! the group registry. Both tables sit behind one `RwLock` so an assignment
//! (mentee references, group membership, mentor ownership) is applied inside a
//! single write section and never observed half-done.
//!
//! Allocation runs must be serialized: callers take [`Directory::begin_allocation`]
//! for the whole run. Two concurrent runs over the same directory would
//! otherwise race on the assigned-mentee bookkeeping.

mod groups;
mod participants;

pub use groups::GroupRegistry;
pub use participants::ParticipantStore;

use parking_lot::{Mutex, MutexGuard, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::error::{Error, Result};
use crate::types::{Group, GroupId, Participant};

// ─────────────────────────────────────────────────────────────────
// Tables
// ─────────────────────────────────────────────────────────────────

/// Participant and group tables, always locked together
#[derive(Debug, Default)]
pub struct Tables {
    pub participants: ParticipantStore,
    pub groups: GroupRegistry,
}

impl Tables {
    /// Place a mentee in a group and update both sides of the relation.
    ///
    /// All checks run before any mutation, so on error nothing changes.
    pub fn assign_to_group(&mut self, group_id: &str, mentee_id: &str) -> Result<()> {
        let mentee = self.participants.require(mentee_id)?;
        let state = mentee
            .as_mentee()
            .ok_or_else(|| Error::not_a_mentee(mentee_id))?;
        if let Some(current) = &state.group_id {
            if current != group_id {
                return Err(Error::Internal(format!(
                    "mentee {} already belongs to group {}",
                    mentee_id, current
                )));
            }
        }

        let group = self.groups.require_mut(group_id)?;
        let mentor_id = group.mentor_id().to_string();
        group.add_member(mentee_id)?;

        self.participants
            .assign_mentee(mentee_id, &mentor_id, group_id)
    }

    /// Create a group for a mentor and record it in the mentor's owned list
    pub fn create_group_for(&mut self, mentor_id: &str, name: Option<&str>) -> Result<GroupId> {
        if !self.participants.require(mentor_id)?.is_mentor() {
            return Err(Error::not_a_mentor(mentor_id));
        }
        let group_id = self.groups.create_group(mentor_id, name).id.clone();
        self.participants
            .add_owned_group(mentor_id, group_id.clone())?;
        Ok(group_id)
    }
}

// ─────────────────────────────────────────────────────────────────
// Directory
// ─────────────────────────────────────────────────────────────────

/// Thread-safe handle over the participant and group tables
#[derive(Debug, Default)]
pub struct Directory {
    tables: RwLock<Tables>,
    allocation: Mutex<()>,
}

impl Directory {
    /// Create a new empty directory
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a directory whose registry names unnamed groups `default_group_name`
    pub fn with_default_group_name(default_group_name: impl Into<String>) -> Self {
        Self {
            tables: RwLock::new(Tables {
                participants: ParticipantStore::new(),
                groups: GroupRegistry::with_default_name(default_group_name),
            }),
            allocation: Mutex::new(()),
        }
    }

    /// Shared access to both tables
    pub fn read(&self) -> RwLockReadGuard<'_, Tables> {
        self.tables.read()
    }

    /// Exclusive access to both tables
    pub fn write(&self) -> RwLockWriteGuard<'_, Tables> {
        self.tables.write()
    }

    /// Acquire the allocation run lock; hold it for the whole run
    pub fn begin_allocation(&self) -> MutexGuard<'_, ()> {
        self.allocation.lock()
    }

    /// Clone of a participant
    pub fn participant(&self, id: &str) -> Option<Participant> {
        self.read().participants.get(id).cloned()
    }

    /// Clone of a participant looked up by email
    pub fn participant_by_email(&self, email: &str) -> Option<Participant> {
        self.read().participants.find_by_email(email).cloned()
    }

    /// Snapshot of the full population in registration order
    pub fn all_participants(&self) -> Vec<Participant> {
        self.read().participants.all().to_vec()
    }

    /// Clone of a group
    pub fn group(&self, group_id: &str) -> Option<Group> {
        self.read().groups.get(group_id).cloned()
    }

    /// Snapshot of every group in creation order
    pub fn all_groups(&self) -> Vec<Group> {
        self.read().groups.all().to_vec()
    }

    pub fn participant_count(&self) -> usize {
        self.read().participants.len()
    }

    pub fn group_count(&self) -> usize {
        self.read().groups.len()
    }

    /// Drop every participant and group
    pub fn clear(&self) {
        let mut tables = self.write();
        tables.participants.clear();
        tables.groups.clear();
    }
}
