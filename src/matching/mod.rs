//! Matching module
//!
//! Pairwise compatibility scoring and the greedy, capacity-bounded
//! allocation of mentees into mentor-owned groups.

pub mod allocator;
pub mod score;

pub use allocator::{
    allocate, commit_plans, partition, rank_candidates, unassigned_mentees, validate_plans,
    Candidate, GroupAllocator, GroupPlan, RunState,
};
pub use score::{calculate_match_score, BACKGROUND_WEIGHT, INTEREST_WEIGHT, LOCATION_WEIGHT};
