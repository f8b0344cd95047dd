//! LinkUp - mentor/mentee skill-swap matching
//!
//! Students register as mentors or mentees. Every mentee/mentor pair gets a
//! compatibility score from shared interests, background and location, and a
//! greedy allocator forms one group of up to five mentees per mentor.

pub mod chat;
pub mod cli;
pub mod config;
pub mod console;
pub mod dashboard;
pub mod error;
pub mod logging;
pub mod matching;
pub mod questionnaire;
pub mod registration;
pub mod report;
pub mod sample;
pub mod store;
pub mod types;
pub mod version;

pub use error::{Error, Result};
