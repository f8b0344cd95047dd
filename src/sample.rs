//! Built-in sample population
//!
//! 3 mentors and 15 mentees with interests, locations and backgrounds spread
//! so every mentor has a clear best match. One run fills all 15 places.

use crate::error::Result;
use crate::registration::{PopulationEntry, Registrar, RegistrationRequest};
use crate::store::Directory;
use crate::types::{Participant, RoleKind};

pub const SAMPLE_MENTORS: u32 = 3;
pub const SAMPLE_MENTEES: u32 = 15;

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn mentor(i: u32, domain: &str) -> PopulationEntry {
    let even = i % 2 == 0;
    PopulationEntry {
        role: RoleKind::Mentor,
        request: RegistrationRequest {
            name: format!("Mentor {}", i),
            email: format!("mentor{}{}", i, domain),
            age: 25 + i,
            location: "Melbourne".to_string(),
            interests: strings(&["Programming", if even { "Sports" } else { "Music" }]),
            background: if even { "Australia" } else { "International" }.to_string(),
        },
    }
}

fn mentee(i: u32, domain: &str) -> PopulationEntry {
    let interests = match i % 3 {
        0 => strings(&["Programming", "AI"]),
        1 => strings(&["Sports", "Music"]),
        _ => strings(&["Art", "Travel"]),
    };
    PopulationEntry {
        role: RoleKind::Mentee,
        request: RegistrationRequest {
            name: format!("Mentee {}", i),
            email: format!("mentee{}{}", i, domain),
            age: 18 + i % 7,
            location: if i % 3 == 0 { "Clayton" } else { "Caulfield" }.to_string(),
            interests,
            background: if i % 5 == 0 { "Australia" } else { "International" }.to_string(),
        },
    }
}

/// The sample population, mentors first, with emails under `domain`
pub fn sample_population(domain: &str) -> Vec<PopulationEntry> {
    (1..=SAMPLE_MENTORS)
        .map(|i| mentor(i, domain))
        .chain((1..=SAMPLE_MENTEES).map(|i| mentee(i, domain)))
        .collect()
}

/// Register the sample population through `registrar`
pub fn load_sample_data(directory: &Directory, registrar: &Registrar) -> Result<Vec<Participant>> {
    let registered = registrar.register_all(directory, sample_population(registrar.email_domain()))?;
    tracing::info!(participants = registered.len(), "Sample data loaded");
    Ok(registered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RegistrationSettings;

    #[test]
    fn test_sample_shape() {
        let entries = sample_population("@student.monash");
        assert_eq!(entries.len(), 18);
        assert_eq!(entries.iter().filter(|e| e.role == RoleKind::Mentor).count(), 3);

        let m2 = &entries[1].request;
        assert_eq!(m2.name, "Mentor 2");
        assert_eq!(m2.email, "mentor2@student.monash");
        assert_eq!(m2.age, 27);
        assert_eq!(m2.interests, vec!["Programming", "Sports"]);
        assert_eq!(m2.background, "Australia");

        let e5 = &entries[3 + 4].request;
        assert_eq!(e5.name, "Mentee 5");
        assert_eq!(e5.age, 23);
        assert_eq!(e5.location, "Caulfield");
        assert_eq!(e5.interests, vec!["Art", "Travel"]);
        assert_eq!(e5.background, "Australia");
    }

    #[test]
    fn test_load_sample_data() {
        let directory = Directory::new();
        let registrar = Registrar::new(&RegistrationSettings::default());
        let registered = load_sample_data(&directory, &registrar).unwrap();
        assert_eq!(registered.len(), 18);
        assert!(directory.participant_by_email("mentee15@student.monash").is_some());

        // Loading twice collides on email
        assert!(load_sample_data(&directory, &registrar).is_err());
    }
}
