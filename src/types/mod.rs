//! Type definitions for LinkUp
//!
//! Participants (mentors and mentees) and the groups they are allocated to.

mod group;
mod participant;

pub use group::*;
pub use participant::*;
