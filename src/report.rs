//! Allocation results as printable and serializable reports

use std::fmt::Write as _;

use serde::Serialize;

use crate::matching::{calculate_match_score, GroupPlan};
use crate::store::{Directory, Tables};
use crate::types::{Group, Participant};

#[derive(Debug, Clone, Serialize)]
pub struct PersonSummary {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct MemberSummary {
    pub name: String,
    pub email: String,
    pub score: u32,
}

/// One group with its mentor and scored members
#[derive(Debug, Clone, Serialize)]
pub struct GroupReport {
    /// `None` for a planned group that was not committed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,
    pub name: String,
    pub mentor: PersonSummary,
    pub members: Vec<MemberSummary>,
}

/// Full result of a matching run
#[derive(Debug, Clone, Serialize)]
pub struct MatchReport {
    pub dry_run: bool,
    pub groups: Vec<GroupReport>,
    pub unassigned: Vec<PersonSummary>,
}

fn person(p: &Participant) -> PersonSummary {
    PersonSummary {
        name: p.profile.name.clone(),
        email: p.profile.email.clone(),
    }
}

fn member(tables: &Tables, mentor: Option<&Participant>, mentee_id: &str) -> Option<MemberSummary> {
    let mentee = tables.participants.get(mentee_id)?;
    let score = mentor
        .map(|m| calculate_match_score(&mentee.profile, &m.profile))
        .unwrap_or(0);
    Some(MemberSummary {
        name: mentee.profile.name.clone(),
        email: mentee.profile.email.clone(),
        score,
    })
}

fn mentor_summary(tables: &Tables, mentor_id: &str) -> PersonSummary {
    tables
        .participants
        .get(mentor_id)
        .map(person)
        .unwrap_or_else(|| PersonSummary {
            name: mentor_id.to_string(),
            email: String::new(),
        })
}

impl MatchReport {
    /// Report committed groups
    pub fn from_groups(directory: &Directory, groups: &[Group]) -> Self {
        let tables = directory.read();
        let reports = groups
            .iter()
            .map(|group| {
                let mentor = tables.participants.get(group.mentor_id());
                GroupReport {
                    group_id: Some(group.id.clone()),
                    name: group.name.clone(),
                    mentor: mentor_summary(&tables, group.mentor_id()),
                    members: group
                        .members()
                        .iter()
                        .filter_map(|id| member(&tables, mentor, id))
                        .collect(),
                }
            })
            .collect();
        Self {
            dry_run: false,
            groups: reports,
            unassigned: unassigned(&tables, &[]),
        }
    }

    /// Report plans that were not committed
    pub fn from_plans(directory: &Directory, plans: &[GroupPlan], group_name: &str) -> Self {
        let tables = directory.read();
        let reports = plans
            .iter()
            .map(|plan| GroupReport {
                group_id: None,
                name: group_name.to_string(),
                mentor: mentor_summary(&tables, &plan.mentor_id),
                members: plan
                    .members
                    .iter()
                    .filter_map(|c| {
                        tables.participants.get(&c.mentee_id).map(|p| MemberSummary {
                            name: p.profile.name.clone(),
                            email: p.profile.email.clone(),
                            score: c.score,
                        })
                    })
                    .collect(),
            })
            .collect();
        let planned: Vec<&str> = plans
            .iter()
            .flat_map(|p| p.members.iter().map(|c| c.mentee_id.as_str()))
            .collect();
        Self {
            dry_run: true,
            groups: reports,
            unassigned: unassigned(&tables, &planned),
        }
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "===== ALL GROUPS =====");
        if self.groups.is_empty() {
            let _ = writeln!(out, "No groups have been formed yet");
        }
        for group in &self.groups {
            let _ = writeln!(out);
            match &group.group_id {
                Some(id) => {
                    let _ = writeln!(out, "Group: {} (ID: {})", group.name, id);
                }
                None => {
                    let _ = writeln!(out, "Group: {} (planned)", group.name);
                }
            }
            let _ = writeln!(out, "Mentor: {} ({})", group.mentor.name, group.mentor.email);
            if group.members.is_empty() {
                let _ = writeln!(out, "No mentees in this group");
            }
            for m in &group.members {
                let _ = writeln!(out, "- {} ({}) score {}", m.name, m.email, m.score);
            }
        }
        if !self.unassigned.is_empty() {
            let _ = writeln!(out);
            let _ = writeln!(out, "Unassigned mentees: {}", self.unassigned.len());
            for p in &self.unassigned {
                let _ = writeln!(out, "- {} ({})", p.name, p.email);
            }
        }
        out
    }
}

/// Mentees with no group that are not in `planned`
fn unassigned(tables: &Tables, planned: &[&str]) -> Vec<PersonSummary> {
    tables
        .participants
        .mentees()
        .filter(|p| p.as_mentee().is_some_and(|m| !m.is_assigned()))
        .filter(|p| !planned.contains(&p.id.as_str()))
        .map(person)
        .collect()
}
