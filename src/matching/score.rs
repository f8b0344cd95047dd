//! Mentee/mentor compatibility score

use crate::types::Profile;

/// Points per distinct shared interest
pub const INTEREST_WEIGHT: u32 = 2;

/// Points for an identical background
pub const BACKGROUND_WEIGHT: u32 = 3;

/// Points for an identical location
pub const LOCATION_WEIGHT: u32 = 2;

/// Compatibility score for one (mentee, mentor) pair.
///
/// `2 × |shared interests| + 3 (same background) + 2 (same location)`.
/// Interests count once each even if repeated; background and location use
/// exact, case-sensitive equality.
pub fn calculate_match_score(mentee: &Profile, mentor: &Profile) -> u32 {
    let shared = mentee.shared_interests(mentor) as u32;
    let mut score = shared * INTEREST_WEIGHT;

    if mentee.background == mentor.background {
        score += BACKGROUND_WEIGHT;
    }
    if mentee.location == mentor.location {
        score += LOCATION_WEIGHT;
    }

    score
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(interests: &[&str], background: &str, location: &str) -> Profile {
        Profile {
            name: "P".to_string(),
            email: "p@student.monash".to_string(),
            age: 22,
            location: location.to_string(),
            interests: interests.iter().map(|s| s.to_string()).collect(),
            background: background.to_string(),
        }
    }

    #[test]
    fn test_full_match() {
        let mentor = profile(&["Programming", "Sports"], "Australia", "Melbourne");
        let mentee = profile(&["Sports", "Programming"], "Australia", "Melbourne");
        assert_eq!(calculate_match_score(&mentee, &mentor), 2 * 2 + 3 + 2);
    }

    #[test]
    fn test_k_shared_interests() {
        let mentor = profile(&["A", "B", "C", "D"], "X", "L");
        for k in 0..=4 {
            let shared: Vec<&str> = ["A", "B", "C", "D"][..k].to_vec();
            let mentee = profile(&shared, "X", "L");
            assert_eq!(calculate_match_score(&mentee, &mentor), 2 * k as u32 + 3 + 2);
        }
    }

    #[test]
    fn test_location_only() {
        let mentor = profile(&["Programming"], "Australia", "Melbourne");
        let mentee = profile(&["Art"], "International", "Melbourne");
        assert_eq!(calculate_match_score(&mentee, &mentor), 2);
    }

    #[test]
    fn test_background_only() {
        let mentor = profile(&[], "Australia", "Melbourne");
        let mentee = profile(&[], "Australia", "Clayton");
        assert_eq!(calculate_match_score(&mentee, &mentor), 3);
    }

    #[test]
    fn test_no_overlap_is_zero() {
        let mentor = profile(&["Programming"], "Australia", "Melbourne");
        let mentee = profile(&["Art"], "International", "Caulfield");
        assert_eq!(calculate_match_score(&mentee, &mentor), 0);
    }

    #[test]
    fn test_empty_interests() {
        let mentor = profile(&[], "A", "B");
        let mentee = profile(&[], "C", "D");
        assert_eq!(calculate_match_score(&mentee, &mentor), 0);
    }

    #[test]
    fn test_duplicate_interests_count_once() {
        let mentor = profile(&["Music", "Music"], "A", "B");
        let mentee = profile(&["Music", "Music", "Music"], "C", "D");
        assert_eq!(calculate_match_score(&mentee, &mentor), 2);
    }

    #[test]
    fn test_equality_is_case_sensitive() {
        let mentor = profile(&["music"], "australia", "melbourne");
        let mentee = profile(&["Music"], "Australia", "Melbourne");
        assert_eq!(calculate_match_score(&mentee, &mentor), 0);
    }

    #[test]
    fn test_swapping_sides_gives_same_score() {
        let a = profile(&["AI", "Art"], "Australia", "Clayton");
        let b = profile(&["AI"], "Australia", "Caulfield");
        assert_eq!(calculate_match_score(&a, &b), calculate_match_score(&b, &a));
    }
}
