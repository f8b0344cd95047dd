//! Shared test fixtures

#![allow(dead_code)]

use std::path::PathBuf;

use linkup::store::Directory;
use linkup::types::{Participant, Profile, RoleKind};

pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
}

pub fn fixture_path(name: &str) -> PathBuf {
    fixtures_dir().join(name)
}

pub fn valid_config_fixture() -> PathBuf {
    fixture_path("valid_config.toml")
}

pub fn invalid_config_fixture() -> PathBuf {
    fixture_path("invalid_config.toml")
}

pub fn population_fixture() -> PathBuf {
    fixture_path("population.json")
}

/// Participant with a generated email under the default domain
pub fn person(
    name: &str,
    kind: RoleKind,
    interests: &[&str],
    background: &str,
    location: &str,
) -> Participant {
    Participant::new(
        Profile {
            name: name.to_string(),
            email: format!("{}@student.monash", name.to_lowercase().replace(' ', ".")),
            age: 21,
            location: location.to_string(),
            interests: interests.iter().map(|s| s.to_string()).collect(),
            background: background.to_string(),
        },
        kind,
    )
}

/// Directory holding `people` in the given order
pub fn directory_with(people: Vec<Participant>) -> Directory {
    let directory = Directory::new();
    {
        let mut tables = directory.write();
        for p in people {
            tables.participants.insert(p);
        }
    }
    directory
}

/// Member names of a group, in membership order
pub fn member_names(directory: &Directory, members: &[String]) -> Vec<String> {
    members
        .iter()
        .filter_map(|id| directory.participant(id))
        .map(|p| p.profile.name)
        .collect()
}
