//! Role-specific dashboards
//!
//! A dashboard is a view over the [`Directory`](crate::store::Directory) for
//! one logged-in participant. Queries return snapshots; updates go through
//! the directory's write lock.

mod mentee;
mod mentor;

pub use mentee::MenteeDashboard;
pub use mentor::{MenteeContact, MentorDashboard};

use std::fmt::Write as _;

use crate::store::ParticipantStore;
use crate::types::{Group, Participant};

/// Optional profile changes; `None` leaves a field untouched
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub location: Option<String>,
    pub interests: Option<Vec<String>>,
}

impl ProfileUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.location.is_none() && self.interests.is_none()
    }
}

/// Members of a group that still resolve to mentees, in membership order
fn group_members(store: &ParticipantStore, group: &Group) -> Vec<Participant> {
    group
        .members()
        .iter()
        .filter_map(|id| store.get(id))
        .filter(|p| p.is_mentee())
        .cloned()
        .collect()
}

/// "- Name (email)" lines for a list of participants
fn render_people(out: &mut String, people: &[Participant]) {
    for p in people {
        let _ = writeln!(out, "- {} ({})", p.profile.name, p.profile.email);
    }
}
