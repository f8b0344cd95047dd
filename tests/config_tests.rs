//! Configuration loading and validation through the public API and the CLI

mod common;

use std::fs;
use std::path::PathBuf;

use linkup::config::LinkupConfig;
use linkup::error::Error;
use tempfile::TempDir;

struct ConfigFixture {
    _temp_dir: TempDir,
    config_path: PathBuf,
}

impl ConfigFixture {
    fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("linkup.toml");
        Self {
            _temp_dir: temp_dir,
            config_path,
        }
    }

    fn write_config(&self, content: &str) {
        fs::write(&self.config_path, content).unwrap();
    }

    fn path(&self) -> &str {
        self.config_path.to_str().unwrap()
    }
}

fn validate_cmd(path: &str) -> assert_cmd::assert::Assert {
    assert_cmd::Command::cargo_bin("linkup")
        .unwrap()
        .env_remove("LINKUP_GROUP_CAPACITY")
        .env_remove("LINKUP_EMAIL_DOMAIN")
        .args(["config", "validate", "--config", path])
        .assert()
}

// ─────────────────────────────────────────────────────────────────
// Valid Configuration Tests
// ─────────────────────────────────────────────────────────────────

#[test]
fn test_empty_config_uses_defaults() {
    let fixture = ConfigFixture::new();
    fixture.write_config("");

    let config = LinkupConfig::load(Some(fixture.path())).unwrap();
    assert_eq!(config.registration.email_domain, "@student.monash");
    assert_eq!(config.matching.group_capacity, 5);
    assert_eq!(config.groups.default_name, "Skill Swap Group");
    assert_eq!(config.feedback.min_rating, 1);
    assert_eq!(config.feedback.max_rating, 5);
}

#[test]
fn test_partial_sections() {
    let fixture = ConfigFixture::new();
    fixture.write_config(
        r#"
[groups]
default_name = "Peer Circle"
"#,
    );

    let config = LinkupConfig::load(Some(fixture.path())).unwrap();
    assert_eq!(config.groups.default_name, "Peer Circle");
    assert_eq!(config.matching.group_capacity, 5);
}

#[test]
fn test_valid_fixture() {
    let path = common::valid_config_fixture();
    let config = LinkupConfig::load(path.to_str()).unwrap();
    assert_eq!(config.matching.group_capacity, 3);
    assert_eq!(config.groups.default_name, "Study Circle");
    assert_eq!(config.logging.level, "warn");
}

#[test]
fn test_full_config_validates_via_cli() {
    let fixture = ConfigFixture::new();
    fixture.write_config(
        r#"
[registration]
email_domain = "@monash.edu"

[matching]
group_capacity = 4

[groups]
default_name = "Skill Swap Group"

[feedback]
min_rating = 1
max_rating = 10

[logging]
level = "debug"
max_files = 3
json_format = true

[storage]
population_file = "~/linkup/people.json"
"#,
    );

    validate_cmd(fixture.path())
        .success()
        .stdout(predicates::str::contains("Configuration is valid"));
}

#[test]
fn test_population_path_is_expanded() {
    let fixture = ConfigFixture::new();
    fixture.write_config(
        r#"
[storage]
population_file = "~/people.json"
"#,
    );

    let config = LinkupConfig::load(Some(fixture.path())).unwrap();
    let path = config.storage.population_file.unwrap();
    assert!(!path.starts_with('~'));
    assert!(path.ends_with("people.json"));
}

// ─────────────────────────────────────────────────────────────────
// Invalid Configuration Tests
// ─────────────────────────────────────────────────────────────────

#[test]
fn test_capacity_zero_rejected() {
    let fixture = ConfigFixture::new();
    fixture.write_config("[matching]\ngroup_capacity = 0\n");

    let err = LinkupConfig::load(Some(fixture.path())).unwrap_err();
    assert!(matches!(err, Error::ConfigValidation { .. }));
    validate_cmd(fixture.path()).code(10);
}

#[test]
fn test_capacity_above_cap_rejected() {
    let err = LinkupConfig::load(common::invalid_config_fixture().to_str()).unwrap_err();
    assert!(matches!(
        err,
        Error::ConfigValidation { field: Some(ref f), .. } if f == "matching.group_capacity"
    ));
}

#[test]
fn test_empty_domain_rejected() {
    let fixture = ConfigFixture::new();
    fixture.write_config("[registration]\nemail_domain = \"\"\n");
    assert!(LinkupConfig::load(Some(fixture.path())).is_err());
}

#[test]
fn test_inverted_rating_range_rejected() {
    let fixture = ConfigFixture::new();
    fixture.write_config("[feedback]\nmin_rating = 4\nmax_rating = 2\n");
    assert!(LinkupConfig::load(Some(fixture.path())).is_err());
}

#[test]
fn test_invalid_log_level_rejected() {
    let fixture = ConfigFixture::new();
    fixture.write_config("[logging]\nlevel = \"chatty\"\n");
    validate_cmd(fixture.path())
        .failure()
        .stderr(predicates::str::contains("chatty"));
}

#[test]
fn test_malformed_toml() {
    let fixture = ConfigFixture::new();
    fixture.write_config("[matching\ngroup_capacity = ");

    let err = LinkupConfig::load(Some(fixture.path())).unwrap_err();
    assert!(matches!(err, Error::ConfigParse { .. }));
    validate_cmd(fixture.path()).code(10).stderr(predicates::str::contains("E101"));
}

#[test]
fn test_wrong_type() {
    let fixture = ConfigFixture::new();
    fixture.write_config("[matching]\ngroup_capacity = \"five\"\n");
    assert!(matches!(
        LinkupConfig::load(Some(fixture.path())),
        Err(Error::ConfigParse { .. })
    ));
}

#[test]
fn test_missing_explicit_file() {
    assert!(matches!(
        LinkupConfig::load(Some("/nonexistent/linkup.toml")),
        Err(Error::ConfigNotFound { .. })
    ));
}
