//! Group registry — creates and stores groups

use crate::error::{Error, Result};
use crate::types::{Group, DEFAULT_GROUP_NAME};

/// Registry of all groups, in creation order
#[derive(Debug)]
pub struct GroupRegistry {
    groups: Vec<Group>,
    default_name: String,
}

impl GroupRegistry {
    /// Create a new empty registry using the built-in default group name
    pub fn new() -> Self {
        Self::with_default_name(DEFAULT_GROUP_NAME)
    }

    /// Create a registry with a custom default group name
    pub fn with_default_name(default_name: impl Into<String>) -> Self {
        Self {
            groups: Vec::new(),
            default_name: default_name.into(),
        }
    }

    pub fn default_name(&self) -> &str {
        &self.default_name
    }

    /// Create a fresh, empty group owned by `mentor_id`
    pub fn create_group(&mut self, mentor_id: &str, name: Option<&str>) -> &mut Group {
        let name = name.unwrap_or(&self.default_name).to_string();
        self.groups.push(Group::new(mentor_id, name));
        let last = self.groups.len() - 1;
        &mut self.groups[last]
    }

    pub fn get(&self, group_id: &str) -> Option<&Group> {
        self.groups.iter().find(|g| g.id == group_id)
    }

    pub fn get_mut(&mut self, group_id: &str) -> Option<&mut Group> {
        self.groups.iter_mut().find(|g| g.id == group_id)
    }

    /// Look up a group, failing if absent
    pub fn require(&self, group_id: &str) -> Result<&Group> {
        self.get(group_id)
            .ok_or_else(|| Error::GroupNotFound(group_id.to_string()))
    }

    /// Look up a group mutably, failing if absent
    pub fn require_mut(&mut self, group_id: &str) -> Result<&mut Group> {
        self.get_mut(group_id)
            .ok_or_else(|| Error::GroupNotFound(group_id.to_string()))
    }

    /// Groups owned by a mentor, in creation order
    pub fn groups_by_mentor(&self, mentor_id: &str) -> Vec<&Group> {
        self.groups
            .iter()
            .filter(|g| g.mentor_id() == mentor_id)
            .collect()
    }

    /// The group a mentee belongs to, if any
    pub fn group_by_mentee(&self, mentee_id: &str) -> Option<&Group> {
        self.groups.iter().find(|g| g.has_member(mentee_id))
    }

    /// All groups in creation order
    pub fn all(&self) -> &[Group] {
        &self.groups
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Drop every group
    pub fn clear(&mut self) {
        self.groups.clear();
    }
}

impl Default for GroupRegistry {
    fn default() -> Self {
        Self::new()
    }
}
