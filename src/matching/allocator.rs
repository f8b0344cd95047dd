//! Greedy group allocation
//!
//! Mentors are processed in registration order. Each mentor gets a new group
//! filled with the highest-scoring mentees still unassigned, up to the group
//! capacity. Earlier mentors have first pick; nothing is revisited once
//! committed, so the result is deterministic but not a maximum-weight
//! matching.

use std::collections::HashSet;

use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::store::{Directory, Tables};
use crate::types::{Group, Participant, ParticipantId, Role, MAX_GROUP_MEMBERS};

use super::score::calculate_match_score;

// ─────────────────────────────────────────────────────────────────
// Run State
// ─────────────────────────────────────────────────────────────────

/// Mentees already placed, visible across a whole run
#[derive(Debug, Clone, Default)]
pub struct RunState {
    assigned: HashSet<ParticipantId>,
}

impl RunState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed with mentees already holding a group from an earlier run
    pub fn from_mentees<'a>(mentees: impl IntoIterator<Item = &'a Participant>) -> Self {
        let assigned = mentees
            .into_iter()
            .filter(|p| p.as_mentee().is_some_and(|m| m.is_assigned()))
            .map(|p| p.id.clone())
            .collect();
        Self { assigned }
    }

    pub fn is_assigned(&self, mentee_id: &str) -> bool {
        self.assigned.contains(mentee_id)
    }

    /// Record a mentee as placed; returns false if it already was
    pub fn mark_assigned(&mut self, mentee_id: impl Into<ParticipantId>) -> bool {
        self.assigned.insert(mentee_id.into())
    }

    pub fn len(&self) -> usize {
        self.assigned.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assigned.is_empty()
    }
}

// ─────────────────────────────────────────────────────────────────
// Planning
// ─────────────────────────────────────────────────────────────────

/// A mentee with its score against one mentor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub mentee_id: ParticipantId,
    pub score: u32,
}

/// The members chosen for one mentor's group, best first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupPlan {
    pub mentor_id: ParticipantId,
    pub members: Vec<Candidate>,
}

/// Split a population into mentors and mentees, keeping registration order
pub fn partition(population: &[Participant]) -> (Vec<&Participant>, Vec<&Participant>) {
    let mut mentors = Vec::new();
    let mut mentees = Vec::new();
    for participant in population {
        match participant.role {
            Role::Mentor(_) => mentors.push(participant),
            Role::Mentee(_) => mentees.push(participant),
        }
    }
    (mentors, mentees)
}

/// Score every unassigned mentee against `mentor`, best first.
///
/// The sort is stable, so equal scores keep the mentees' registration order.
pub fn rank_candidates(
    mentor: &Participant,
    mentees: &[&Participant],
    state: &RunState,
) -> Vec<Candidate> {
    let mut candidates: Vec<Candidate> = mentees
        .iter()
        .filter(|mentee| !state.is_assigned(&mentee.id))
        .map(|mentee| Candidate {
            mentee_id: mentee.id.clone(),
            score: calculate_match_score(&mentee.profile, &mentor.profile),
        })
        .collect();

    candidates.sort_by(|a, b| b.score.cmp(&a.score));
    candidates
}

/// Plan one group per mentor, marking chosen mentees in `state`.
///
/// Pure apart from `state`; nothing is written to any store. Mentors left
/// with no candidates still get a plan with zero members.
pub fn allocate(
    mentors: &[&Participant],
    mentees: &[&Participant],
    state: &mut RunState,
    capacity: usize,
) -> Vec<GroupPlan> {
    let capacity = capacity.min(MAX_GROUP_MEMBERS);

    mentors
        .iter()
        .map(|mentor| {
            let mut members = rank_candidates(mentor, mentees, state);
            members.truncate(capacity);
            for candidate in &members {
                state.mark_assigned(candidate.mentee_id.clone());
            }
            GroupPlan {
                mentor_id: mentor.id.clone(),
                members,
            }
        })
        .collect()
}

// ─────────────────────────────────────────────────────────────────
// Group Allocator
// ─────────────────────────────────────────────────────────────────

/// Runs allocation against a [`Directory`]
pub struct GroupAllocator<'a> {
    directory: &'a Directory,
    capacity: usize,
    group_name: Option<String>,
}

impl<'a> GroupAllocator<'a> {
    /// Create an allocator using the full group capacity
    pub fn new(directory: &'a Directory) -> Self {
        Self {
            directory,
            capacity: MAX_GROUP_MEMBERS,
            group_name: None,
        }
    }

    /// Limit groups to `capacity` members (never above the hard cap)
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity.min(MAX_GROUP_MEMBERS);
        self
    }

    /// Name new groups `name` instead of the registry default
    pub fn with_group_name(mut self, name: impl Into<String>) -> Self {
        self.group_name = Some(name.into());
        self
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Score a mentee against a mentor, both looked up by id
    pub fn score(&self, mentee_id: &str, mentor_id: &str) -> Result<u32> {
        let tables = self.directory.read();
        let mentee = tables.participants.require(mentee_id)?;
        if !mentee.is_mentee() {
            return Err(Error::not_a_mentee(mentee_id));
        }
        let mentor = tables.participants.require(mentor_id)?;
        if !mentor.is_mentor() {
            return Err(Error::not_a_mentor(mentor_id));
        }
        Ok(calculate_match_score(&mentee.profile, &mentor.profile))
    }

    /// Compute the plans a run would commit, without committing them
    pub fn plan(&self) -> Vec<GroupPlan> {
        let _run = self.directory.begin_allocation();
        self.plan_locked()
    }

    fn plan_locked(&self) -> Vec<GroupPlan> {
        let population = self.directory.all_participants();
        let (mentors, mentees) = partition(&population);
        let mut state = RunState::from_mentees(mentees.iter().copied());

        info!(
            mentors = mentors.len(),
            mentees = mentees.len(),
            already_assigned = state.len(),
            capacity = self.capacity,
            "Planning group allocation"
        );

        allocate(&mentors, &mentees, &mut state, self.capacity)
    }

    /// Form one new group per mentor and commit the assignments.
    ///
    /// Holds the directory's allocation lock for the whole run. Mentees placed
    /// by earlier runs are never reassigned. Returns the new groups in
    /// mentor-processing order, empty groups included.
    pub fn form_groups(&self) -> Result<Vec<Group>> {
        let _run = self.directory.begin_allocation();
        let plans = self.plan_locked();

        let mut tables = self.directory.write();
        let formed = commit_plans(&mut tables, &plans, self.group_name.as_deref())?;

        let unassigned = tables
            .participants
            .mentees()
            .filter(|p| p.as_mentee().is_some_and(|m| !m.is_assigned()))
            .count();
        drop(tables);

        info!(
            groups = formed.len(),
            assigned = formed.iter().map(Group::len).sum::<usize>(),
            unassigned,
            "Group allocation complete"
        );

        Ok(formed)
    }
}

/// Check that every plan can be applied to `tables` as it stands.
///
/// Mentors must exist and be mentors; members must be unassigned mentees,
/// listed at most once across all plans and at most [`MAX_GROUP_MEMBERS`]
/// per plan.
pub fn validate_plans(tables: &Tables, plans: &[GroupPlan]) -> Result<()> {
    let mut seen = HashSet::new();
    for plan in plans {
        if !tables.participants.require(&plan.mentor_id)?.is_mentor() {
            return Err(Error::not_a_mentor(&plan.mentor_id));
        }
        if plan.members.len() > MAX_GROUP_MEMBERS {
            return Err(Error::GroupFull {
                group_id: format!("planned group of {}", plan.mentor_id),
                capacity: MAX_GROUP_MEMBERS,
            });
        }
        for candidate in &plan.members {
            let state = tables
                .participants
                .require(&candidate.mentee_id)?
                .as_mentee()
                .ok_or_else(|| Error::not_a_mentee(&candidate.mentee_id))?;
            if state.is_assigned() || !seen.insert(candidate.mentee_id.as_str()) {
                return Err(Error::Internal(format!(
                    "mentee {} is already placed",
                    candidate.mentee_id
                )));
            }
        }
    }
    Ok(())
}

/// Apply plans in order, creating one group per plan.
///
/// Plans are validated first, so either every plan is committed or nothing is.
pub fn commit_plans(tables: &mut Tables, plans: &[GroupPlan], group_name: Option<&str>) -> Result<Vec<Group>> {
    validate_plans(tables, plans)?;

    let mut formed = Vec::with_capacity(plans.len());
    for plan in plans {
        let group_id = tables.create_group_for(&plan.mentor_id, group_name)?;
        for candidate in &plan.members {
            tables.assign_to_group(&group_id, &candidate.mentee_id)?;
        }

        debug!(
            mentor_id = %plan.mentor_id,
            group_id = %group_id,
            members = plan.members.len(),
            scores = ?plan.members.iter().map(|c| c.score).collect::<Vec<_>>(),
            "Group formed"
        );

        formed.push(tables.groups.require(&group_id)?.clone());
    }
    Ok(formed)
}

/// Mentees without a group, in registration order
pub fn unassigned_mentees(directory: &Directory) -> Vec<Participant> {
    directory
        .read()
        .participants
        .mentees()
        .filter(|p| p.as_mentee().is_some_and(|m| !m.is_assigned()))
        .cloned()
        .collect()
}

// ─────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Profile, RoleKind};

    fn person(name: &str, kind: RoleKind, interests: &[&str], background: &str, location: &str) -> Participant {
        Participant::new(
            Profile {
                name: name.to_string(),
                email: format!("{}@student.monash", name.to_lowercase().replace(' ', ".")),
                age: 20,
                location: location.to_string(),
                interests: interests.iter().map(|s| s.to_string()).collect(),
                background: background.to_string(),
            },
            kind,
        )
    }

    fn directory_with(people: Vec<Participant>) -> Directory {
        let directory = Directory::new();
        {
            let mut tables = directory.write();
            for p in people {
                tables.participants.insert(p);
            }
        }
        directory
    }

    fn names(directory: &Directory, group: &Group) -> Vec<String> {
        group
            .members()
            .iter()
            .map(|id| directory.participant(id).unwrap().profile.name)
            .collect()
    }

    /// One mentor and six mentees: a full match, a location-only match, four with nothing in common
    fn scenario() -> Vec<Participant> {
        let mut people = vec![person(
            "Mentor",
            RoleKind::Mentor,
            &["Programming", "Sports"],
            "Australia",
            "Melbourne",
        )];
        people.push(person("Mentee 1", RoleKind::Mentee, &["Programming", "Sports"], "Australia", "Melbourne"));
        people.push(person("Mentee 2", RoleKind::Mentee, &["Art"], "International", "Melbourne"));
        for i in 3..=6 {
            people.push(person(&format!("Mentee {}", i), RoleKind::Mentee, &["Travel"], "International", "Clayton"));
        }
        people
    }

    #[test]
    fn test_partition_preserves_order() {
        let people = vec![
            person("E1", RoleKind::Mentee, &[], "X", "Y"),
            person("M1", RoleKind::Mentor, &[], "X", "Y"),
            person("E2", RoleKind::Mentee, &[], "X", "Y"),
            person("M2", RoleKind::Mentor, &[], "X", "Y"),
        ];
        let (mentors, mentees) = partition(&people);
        let mentor_names: Vec<_> = mentors.iter().map(|p| p.profile.name.as_str()).collect();
        let mentee_names: Vec<_> = mentees.iter().map(|p| p.profile.name.as_str()).collect();
        assert_eq!(mentor_names, ["M1", "M2"]);
        assert_eq!(mentee_names, ["E1", "E2"]);
    }

    #[test]
    fn test_rank_candidates_stable_ties() {
        let people = scenario();
        let (mentors, mentees) = partition(&people);
        let ranked = rank_candidates(mentors[0], &mentees, &RunState::new());

        let scores: Vec<u32> = ranked.iter().map(|c| c.score).collect();
        assert_eq!(scores, [9, 2, 0, 0, 0, 0]);

        // Zero-score tail keeps registration order
        let tail: Vec<&str> = ranked[2..].iter().map(|c| c.mentee_id.as_str()).collect();
        let expected: Vec<&str> = mentees[2..].iter().map(|p| p.id.as_str()).collect();
        assert_eq!(tail, expected);
    }

    #[test]
    fn test_rank_candidates_skips_assigned() {
        let people = scenario();
        let (mentors, mentees) = partition(&people);
        let mut state = RunState::new();
        state.mark_assigned(mentees[0].id.clone());

        let ranked = rank_candidates(mentors[0], &mentees, &state);
        assert_eq!(ranked.len(), 5);
        assert!(ranked.iter().all(|c| c.mentee_id != mentees[0].id));
    }

    #[test]
    fn test_allocate_respects_capacity() {
        let people = scenario();
        let (mentors, mentees) = partition(&people);
        let mut state = RunState::new();

        let plans = allocate(&mentors, &mentees, &mut state, 3);
        assert_eq!(plans[0].members.len(), 3);

        let mut state = RunState::new();
        let plans = allocate(&mentors, &mentees, &mut state, 50);
        assert_eq!(plans[0].members.len(), MAX_GROUP_MEMBERS);
        assert_eq!(state.len(), MAX_GROUP_MEMBERS);
    }

    #[test]
    fn test_scenario_one_mentor_six_mentees() {
        let directory = directory_with(scenario());
        let groups = GroupAllocator::new(&directory).form_groups().unwrap();

        assert_eq!(groups.len(), 1);
        let group = &groups[0];
        assert_eq!(group.len(), 5);

        let members = names(&directory, group);
        assert_eq!(members[0], "Mentee 1");
        assert_eq!(members[1], "Mentee 2");
        assert_eq!(members[2..], ["Mentee 3", "Mentee 4", "Mentee 5"]);

        let left = unassigned_mentees(&directory);
        assert_eq!(left.len(), 1);
        assert_eq!(left[0].profile.name, "Mentee 6");
    }

    #[test]
    fn test_empty_pool_gets_empty_group() {
        let directory = directory_with(vec![person("Mentor", RoleKind::Mentor, &["AI"], "X", "Y")]);
        let groups = GroupAllocator::new(&directory).form_groups().unwrap();

        assert_eq!(groups.len(), 1);
        assert!(groups[0].is_empty());

        let mentor = directory.all_participants().remove(0);
        assert_eq!(groups[0].mentor_id(), mentor.id);
        assert_eq!(mentor.as_mentor().unwrap().groups, vec![groups[0].id.clone()]);
    }

    #[test]
    fn test_no_mentors_no_groups() {
        let directory = directory_with(vec![person("E", RoleKind::Mentee, &[], "X", "Y")]);
        let groups = GroupAllocator::new(&directory).form_groups().unwrap();
        assert!(groups.is_empty());
        assert_eq!(unassigned_mentees(&directory).len(), 1);
    }

    #[test]
    fn test_assignment_updates_mentee_refs() {
        let directory = directory_with(scenario());
        let groups = GroupAllocator::new(&directory).form_groups().unwrap();
        let group = &groups[0];

        for id in group.members() {
            let mentee = directory.participant(id).unwrap();
            let state = mentee.as_mentee().unwrap();
            assert_eq!(state.group_id.as_deref(), Some(group.id.as_str()));
            assert_eq!(state.mentor_id.as_deref(), Some(group.mentor_id()));
        }
    }

    #[test]
    fn test_greedy_precedence() {
        // Both mentors want the same mentee; the first registered wins
        let people = vec![
            person("A", RoleKind::Mentor, &["Rust"], "X", "L"),
            person("B", RoleKind::Mentor, &["Rust"], "X", "L"),
            person("Star", RoleKind::Mentee, &["Rust"], "X", "L"),
        ];
        let directory = directory_with(people);
        let groups = GroupAllocator::new(&directory).form_groups().unwrap();

        assert_eq!(names(&directory, &groups[0]), ["Star"]);
        assert!(groups[1].is_empty());
    }

    #[test]
    fn test_repeated_runs_do_not_reassign() {
        let directory = directory_with(scenario());
        let allocator = GroupAllocator::new(&directory);

        let first = allocator.form_groups().unwrap();
        let second = allocator.form_groups().unwrap();

        assert_eq!(first[0].len(), 5);
        assert_eq!(names(&directory, &second[0]), ["Mentee 6"]);

        let third = allocator.form_groups().unwrap();
        assert!(third[0].is_empty());

        let mentor = directory.participant(first[0].mentor_id()).unwrap();
        assert_eq!(mentor.as_mentor().unwrap().groups.len(), 3);
        assert_eq!(directory.group_count(), 3);
    }

    #[test]
    fn test_custom_capacity_and_name() {
        let directory = directory_with(scenario());
        let groups = GroupAllocator::new(&directory)
            .with_capacity(2)
            .with_group_name("Pair Up")
            .form_groups()
            .unwrap();
        assert_eq!(groups[0].len(), 2);
        assert_eq!(groups[0].name, "Pair Up");
    }

    #[test]
    fn test_plan_does_not_commit() {
        let directory = directory_with(scenario());
        let plans = GroupAllocator::new(&directory).plan();
        assert_eq!(plans.len(), 1);
        assert_eq!(plans[0].members[0].score, 9);
        assert_eq!(directory.group_count(), 0);
        assert_eq!(unassigned_mentees(&directory).len(), 6);
    }

    #[test]
    fn test_score_by_id() {
        let people = scenario();
        let mentor_id = people[0].id.clone();
        let mentee_id = people[1].id.clone();
        let directory = directory_with(people);
        let allocator = GroupAllocator::new(&directory);

        assert_eq!(allocator.score(&mentee_id, &mentor_id).unwrap(), 9);
        assert!(matches!(
            allocator.score(&mentor_id, &mentee_id),
            Err(Error::RoleMismatch { .. })
        ));
        assert!(matches!(
            allocator.score("nobody", &mentor_id),
            Err(Error::ParticipantNotFound(_))
        ));
    }

    #[test]
    fn test_failed_commit_leaves_tables_untouched() {
        let people = scenario();
        let mentor_id = people[0].id.clone();
        let mentee_id = people[1].id.clone();
        let directory = directory_with(people);

        let plans = vec![
            GroupPlan {
                mentor_id: mentor_id.clone(),
                members: vec![Candidate { mentee_id: mentee_id.clone(), score: 9 }],
            },
            GroupPlan {
                mentor_id: mentor_id.clone(),
                members: vec![Candidate { mentee_id: "ghost".to_string(), score: 0 }],
            },
        ];

        let mut tables = directory.write();
        let err = commit_plans(&mut tables, &plans, None).unwrap_err();
        assert!(matches!(err, Error::ParticipantNotFound(_)));
        assert!(tables.groups.is_empty());
        assert!(!tables.participants.get(&mentee_id).unwrap().as_mentee().unwrap().is_assigned());
        assert!(tables.participants.get(&mentor_id).unwrap().as_mentor().unwrap().groups.is_empty());
    }

    #[test]
    fn test_validate_rejects_mentee_in_two_plans() {
        let people = scenario();
        let mentor_id = people[0].id.clone();
        let mentee_id = people[1].id.clone();
        let directory = directory_with(people);

        let plan = GroupPlan {
            mentor_id,
            members: vec![Candidate { mentee_id, score: 9 }],
        };
        let tables = directory.read();
        assert!(validate_plans(&tables, std::slice::from_ref(&plan)).is_ok());
        assert!(matches!(
            validate_plans(&tables, &[plan.clone(), plan]),
            Err(Error::Internal(_))
        ));
    }

    #[test]
    fn test_validate_rejects_already_assigned_mentee() {
        let directory = directory_with(scenario());
        let first = GroupAllocator::new(&directory).form_groups().unwrap();
        let placed = first[0].members()[0].clone();

        let plan = GroupPlan {
            mentor_id: first[0].mentor_id().to_string(),
            members: vec![Candidate { mentee_id: placed, score: 9 }],
        };
        assert!(validate_plans(&directory.read(), &[plan]).is_err());
    }
}
