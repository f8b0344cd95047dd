//! Configuration system for LinkUp
//!
//! Supports multiple configuration sources with the following precedence (highest to lowest):
//! 1. CLI arguments
//! 2. Environment variables (LINKUP_* prefix)
//! 3. Configuration file (TOML)
//! 4. Default values

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::types::{DEFAULT_GROUP_NAME, MAX_GROUP_MEMBERS};

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkupConfig {
    /// Registration policy
    pub registration: RegistrationSettings,

    /// Allocation settings
    pub matching: MatchingSettings,

    /// Group defaults
    pub groups: GroupSettings,

    /// Mentor feedback settings
    pub feedback: FeedbackSettings,

    /// Logging configuration
    pub logging: LoggingSettings,

    /// Data file locations
    pub storage: StorageSettings,
}

/// Registration policy
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistrationSettings {
    /// Required email suffix, e.g. "@student.monash"
    pub email_domain: String,
}

/// Allocation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchingSettings {
    /// Members per group (1-5)
    pub group_capacity: usize,
}

/// Group defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupSettings {
    /// Name given to groups created without one
    pub default_name: String,
}

/// Mentor feedback settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedbackSettings {
    /// Lowest accepted rating
    pub min_rating: u32,

    /// Highest accepted rating
    pub max_rating: u32,
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Log level: trace, debug, info, warn, error
    pub level: String,

    /// Log file path (empty = no file logging)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,

    /// Number of rotated log files to keep
    pub max_files: u32,

    /// Enable JSON formatted logging
    pub json_format: bool,
}

/// Data file locations
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// Population file loaded when no --population flag is given
    #[serde(skip_serializing_if = "Option::is_none")]
    pub population_file: Option<String>,
}

// Default implementations

impl Default for RegistrationSettings {
    fn default() -> Self {
        Self {
            email_domain: "@student.monash".to_string(),
        }
    }
}

impl Default for MatchingSettings {
    fn default() -> Self {
        Self {
            group_capacity: MAX_GROUP_MEMBERS,
        }
    }
}

impl Default for GroupSettings {
    fn default() -> Self {
        Self {
            default_name: DEFAULT_GROUP_NAME.to_string(),
        }
    }
}

impl Default for FeedbackSettings {
    fn default() -> Self {
        Self {
            min_rating: 1,
            max_rating: 5,
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
            max_files: 5,
            json_format: false,
        }
    }
}

impl LinkupConfig {
    /// Load configuration from file with environment variable overrides
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        let mut config = Self::default();

        // 1. Load from config file if it exists
        if let Some(path) = Self::find_config_file(config_path)? {
            debug!(path = %path.display(), "Loading configuration file");
            let content = fs::read_to_string(&path).map_err(|e| Error::IoRead {
                path: path.clone(),
                source: e,
            })?;
            config = toml::from_str(&content).map_err(|e| Error::ConfigParse {
                message: e.to_string(),
                source: Some(e),
            })?;
            info!(path = %path.display(), "Configuration loaded from file");
        }

        // 2. Apply environment variable overrides
        config.apply_env_overrides();

        // 3. Expand paths
        config.expand_paths();

        // 4. Validate
        config.validate()?;

        Ok(config)
    }

    /// Find the configuration file to use
    fn find_config_file(explicit_path: Option<&str>) -> Result<Option<PathBuf>> {
        // If explicit path provided, use it (error if not found)
        if let Some(path) = explicit_path {
            let path = PathBuf::from(expand_path(path));
            if path.exists() {
                return Ok(Some(path));
            }
            return Err(Error::config_not_found(path));
        }

        // Search in standard locations
        let search_paths = [
            PathBuf::from("linkup.toml"),
            dirs::config_dir()
                .map(|p| p.join("linkup").join("linkup.toml"))
                .unwrap_or_default(),
            dirs::home_dir()
                .map(|p| p.join(".linkup").join("linkup.toml"))
                .unwrap_or_default(),
        ];

        for path in &search_paths {
            if !path.as_os_str().is_empty() && path.exists() {
                debug!(path = %path.display(), "Found configuration file");
                return Ok(Some(path.clone()));
            }
        }

        debug!("No configuration file found, using defaults");
        Ok(None)
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("LINKUP_EMAIL_DOMAIN") {
            self.registration.email_domain = val;
        }

        if let Ok(val) = std::env::var("LINKUP_GROUP_CAPACITY") {
            if let Ok(n) = val.parse() {
                self.matching.group_capacity = n;
            }
        }
        if let Ok(val) = std::env::var("LINKUP_GROUP_NAME") {
            self.groups.default_name = val;
        }

        if let Ok(val) = std::env::var("LINKUP_LOG_LEVEL") {
            self.logging.level = val;
        }
        if let Ok(val) = std::env::var("LINKUP_LOG_FILE") {
            self.logging.file = Some(val);
        }
        if let Ok(val) = std::env::var("LINKUP_LOG_JSON") {
            self.logging.json_format = val.to_lowercase() == "true" || val == "1";
        }

        if let Ok(val) = std::env::var("LINKUP_POPULATION_FILE") {
            self.storage.population_file = Some(val);
        }
    }

    /// Expand ~ and other path variables
    fn expand_paths(&mut self) {
        if let Some(ref file) = self.logging.file {
            self.logging.file = Some(expand_path(file));
        }
        if let Some(ref file) = self.storage.population_file {
            self.storage.population_file = Some(expand_path(file));
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.registration.email_domain.trim().is_empty() {
            return Err(Error::config_field_invalid(
                "registration.email_domain",
                "Email domain cannot be empty",
            ));
        }

        if self.matching.group_capacity == 0 || self.matching.group_capacity > MAX_GROUP_MEMBERS {
            return Err(Error::config_field_invalid(
                "matching.group_capacity",
                format!("group_capacity must be between 1 and {}", MAX_GROUP_MEMBERS),
            ));
        }

        if self.groups.default_name.trim().is_empty() {
            return Err(Error::config_field_invalid(
                "groups.default_name",
                "Default group name cannot be empty",
            ));
        }

        if self.feedback.min_rating == 0 || self.feedback.min_rating > self.feedback.max_rating {
            return Err(Error::config_field_invalid(
                "feedback",
                "Ratings need 1 <= min_rating <= max_rating",
            ));
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(Error::config_field_invalid(
                "logging.level",
                format!(
                    "Invalid log level '{}'. Must be one of: {}",
                    self.logging.level,
                    valid_levels.join(", ")
                ),
            ));
        }

        Ok(())
    }
}

/// Expand ~ and environment variables in paths
fn expand_path(path: &str) -> String {
    shellexpand::full(path)
        .unwrap_or_else(|_| std::borrow::Cow::Borrowed(path))
        .into_owned()
}

/// Initialize a new configuration file
pub fn init_config(path: Option<&str>, force: bool) -> Result<PathBuf> {
    let config_path = path
        .map(|p| PathBuf::from(expand_path(p)))
        .unwrap_or_else(|| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".linkup")
                .join("linkup.toml")
        });

    if config_path.exists() && !force {
        return Err(Error::Config(format!(
            "Configuration file already exists: {}. Use --force to overwrite.",
            config_path.display()
        )));
    }

    if let Some(parent) = config_path.parent() {
        fs::create_dir_all(parent).map_err(|e| Error::IoWrite {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    fs::write(&config_path, generate_default_config()).map_err(|e| Error::IoWrite {
        path: config_path.clone(),
        source: e,
    })?;

    Ok(config_path)
}

/// Generate default configuration content with comments
fn generate_default_config() -> String {
    r#"# LinkUp Configuration

[registration]
# Only emails ending with this suffix may register
email_domain = "@student.monash"

[matching]
# Mentees per group (1-5)
group_capacity = 5

[groups]
# Name given to newly formed groups
default_name = "Skill Swap Group"

[feedback]
# Accepted mentor rating range
min_rating = 1
max_rating = 5

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log file path (comment out to disable file logging)
# file = "~/.linkup/logs/linkup.log"

# Number of rotated log files to keep
max_files = 5

# Enable JSON formatted logging
json_format = false

[storage]
# Population loaded when --population is not given
# population_file = "~/.linkup/population.json"
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn test_default_config() {
        let config = LinkupConfig::default();
        assert_eq!(config.registration.email_domain, "@student.monash");
        assert_eq!(config.matching.group_capacity, 5);
        assert_eq!(config.groups.default_name, "Skill Swap Group");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_env_override() {
        env::set_var("LINKUP_EMAIL_DOMAIN", "@uni.test");
        env::set_var("LINKUP_GROUP_CAPACITY", "3");

        let mut config = LinkupConfig::default();
        config.apply_env_overrides();

        assert_eq!(config.registration.email_domain, "@uni.test");
        assert_eq!(config.matching.group_capacity, 3);

        env::remove_var("LINKUP_EMAIL_DOMAIN");
        env::remove_var("LINKUP_GROUP_CAPACITY");
    }

    #[test]
    fn test_validation_valid_config() {
        assert!(LinkupConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validation_capacity_bounds() {
        let mut config = LinkupConfig::default();
        config.matching.group_capacity = 0;
        assert!(config.validate().is_err());

        config.matching.group_capacity = 6;
        assert!(config.validate().is_err());

        config.matching.group_capacity = 1;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_empty_domain() {
        let mut config = LinkupConfig::default();
        config.registration.email_domain = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rating_range() {
        let mut config = LinkupConfig::default();
        config.feedback.min_rating = 4;
        config.feedback.max_rating = 2;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_invalid_log_level() {
        let mut config = LinkupConfig::default();
        config.logging.level = "loud".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_generated_default_parses() {
        let parsed: LinkupConfig = toml::from_str(&generate_default_config()).unwrap();
        assert!(parsed.validate().is_ok());
        assert_eq!(parsed.matching.group_capacity, 5);
    }

    #[test]
    fn test_parse_partial_config() {
        let config: LinkupConfig = toml::from_str(
            r#"
[matching]
group_capacity = 4

[groups]
default_name = "Study Circle"
"#,
        )
        .unwrap();

        assert_eq!(config.matching.group_capacity, 4);
        assert_eq!(config.groups.default_name, "Study Circle");
        assert_eq!(config.registration.email_domain, "@student.monash");
    }

    #[test]
    fn test_serialize_deserialize() {
        let config = LinkupConfig::default();
        let toml_str = toml::to_string(&config).unwrap();
        let parsed: LinkupConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(config.groups.default_name, parsed.groups.default_name);
    }
}
