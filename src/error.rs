//! Error types for LinkUp
//!
//! Provides structured error handling with:
//! - Numeric error codes for machine parsing
//! - User-friendly messages with suggestions
//! - Exit codes for CLI

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for LinkUp operations
pub type Result<T> = std::result::Result<T, Error>;

/// Numeric error codes for machine parsing and documentation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum ErrorCode {
    // Configuration errors (1xx)
    ConfigNotFound = 100,
    ConfigParseError = 101,
    ConfigValidation = 102,

    // IO errors (2xx)
    IoRead = 200,
    IoWrite = 201,
    IoPermission = 202,
    IoNotFound = 203,
    SerializationError = 204,

    // Registration errors (3xx)
    InvalidEmailDomain = 300,
    DuplicateEmail = 301,
    InvalidRole = 302,
    InvalidProfile = 303,

    // Lookup errors (4xx)
    ParticipantNotFound = 400,
    GroupNotFound = 401,
    RoleMismatch = 402,
    LoginFailed = 403,

    // Group and chat errors (5xx)
    GroupFull = 500,
    NotGroupMember = 501,
    NotGroupOwner = 502,
    InvalidRating = 503,
    NotAssigned = 504,

    // Internal errors (9xx)
    InternalError = 900,
}

impl ErrorCode {
    /// Get the string code (e.g., "E100")
    pub fn as_str(&self) -> String {
        format!("E{}", *self as u16)
    }

    /// Get the exit code for CLI (maps to 1-125 range)
    pub fn exit_code(&self) -> i32 {
        match *self as u16 {
            100..=199 => 10, // Config errors
            200..=299 => 20, // IO errors
            300..=399 => 30, // Registration errors
            400..=499 => 40, // Lookup errors
            500..=599 => 50, // Group/chat errors
            900..=999 => 90, // Internal errors
            _ => 1,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Main error type
#[derive(Error, Debug)]
pub enum Error {
    // ─────────────────────────────────────────────────────────────
    // Configuration Errors
    // ─────────────────────────────────────────────────────────────

    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Configuration parse error
    #[error("Failed to parse configuration: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<toml::de::Error>,
    },

    /// Configuration validation error
    #[error("Configuration validation failed: {message}")]
    ConfigValidation { message: String, field: Option<String> },

    /// Generic configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    // ─────────────────────────────────────────────────────────────
    // IO Errors
    // ─────────────────────────────────────────────────────────────

    /// File read error
    #[error("Failed to read file: {path}")]
    IoRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File write error
    #[error("Failed to write file: {path}")]
    IoWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Generic IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML serialization error
    #[error("TOML serialization error: {0}")]
    Toml(#[from] toml::ser::Error),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // ─────────────────────────────────────────────────────────────
    // Registration Errors
    // ─────────────────────────────────────────────────────────────

    /// Email is outside the allowed registration domain
    #[error("Email {email} is not allowed: only {domain} addresses may register")]
    InvalidEmailDomain { email: String, domain: String },

    /// Email already registered
    #[error("Email already registered: {email}")]
    DuplicateEmail { email: String },

    /// Unknown role name
    #[error("Unknown role '{0}'. Valid: mentor, mentee")]
    InvalidRole(String),

    /// A profile field is missing or malformed
    #[error("Invalid profile field '{field}': {message}")]
    InvalidProfile { field: String, message: String },

    // ─────────────────────────────────────────────────────────────
    // Lookup Errors
    // ─────────────────────────────────────────────────────────────

    /// No participant with this id
    #[error("Participant not found: {0}")]
    ParticipantNotFound(String),

    /// No group with this id
    #[error("Group not found: {0}")]
    GroupNotFound(String),

    /// Participant exists but has the other role
    #[error("Participant {id} is not a {expected}")]
    RoleMismatch { id: String, expected: &'static str },

    /// No account for this email
    #[error("Login failed for {email}")]
    LoginFailed { email: String },

    // ─────────────────────────────────────────────────────────────
    // Group and Chat Errors
    // ─────────────────────────────────────────────────────────────

    /// Group is at capacity
    #[error("Group {group_id} is full ({capacity} members)")]
    GroupFull { group_id: String, capacity: usize },

    /// Sender is neither a member nor the owning mentor
    #[error("Participant {participant_id} is not part of group {group_id}")]
    NotGroupMember {
        participant_id: String,
        group_id: String,
    },

    /// Mentor does not own the group
    #[error("Mentor {mentor_id} does not own group {group_id}")]
    NotGroupOwner { mentor_id: String, group_id: String },

    /// Feedback rating out of range
    #[error("Rating {rating} is out of range {min}-{max}")]
    InvalidRating { rating: u32, min: u32, max: u32 },

    /// Mentee has no mentor or group yet
    #[error("Mentee {0} has not been assigned to a group yet")]
    NotAssigned(String),

    // ─────────────────────────────────────────────────────────────
    // Internal Errors
    // ─────────────────────────────────────────────────────────────

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    // ─────────────────────────────────────────────────────────────
    // Error Classification
    // ─────────────────────────────────────────────────────────────

    /// Get the numeric error code
    pub fn code(&self) -> ErrorCode {
        match self {
            Error::ConfigNotFound { .. } => ErrorCode::ConfigNotFound,
            Error::ConfigParse { .. } => ErrorCode::ConfigParseError,
            Error::ConfigValidation { .. } => ErrorCode::ConfigValidation,
            Error::Config(_) => ErrorCode::ConfigValidation,

            Error::IoRead { .. } => ErrorCode::IoRead,
            Error::IoWrite { .. } => ErrorCode::IoWrite,
            Error::Io(e) => match e.kind() {
                std::io::ErrorKind::NotFound => ErrorCode::IoNotFound,
                std::io::ErrorKind::PermissionDenied => ErrorCode::IoPermission,
                _ => ErrorCode::IoRead,
            },
            Error::Toml(_) => ErrorCode::ConfigParseError,
            Error::Json(_) => ErrorCode::SerializationError,

            Error::InvalidEmailDomain { .. } => ErrorCode::InvalidEmailDomain,
            Error::DuplicateEmail { .. } => ErrorCode::DuplicateEmail,
            Error::InvalidRole(_) => ErrorCode::InvalidRole,
            Error::InvalidProfile { .. } => ErrorCode::InvalidProfile,

            Error::ParticipantNotFound(_) => ErrorCode::ParticipantNotFound,
            Error::GroupNotFound(_) => ErrorCode::GroupNotFound,
            Error::RoleMismatch { .. } => ErrorCode::RoleMismatch,
            Error::LoginFailed { .. } => ErrorCode::LoginFailed,

            Error::GroupFull { .. } => ErrorCode::GroupFull,
            Error::NotGroupMember { .. } => ErrorCode::NotGroupMember,
            Error::NotGroupOwner { .. } => ErrorCode::NotGroupOwner,
            Error::InvalidRating { .. } => ErrorCode::InvalidRating,
            Error::NotAssigned(_) => ErrorCode::NotAssigned,

            Error::Internal(_) => ErrorCode::InternalError,
        }
    }

    /// Check if the error is fatal for the interactive console
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Error::ConfigNotFound { .. }
                | Error::ConfigParse { .. }
                | Error::ConfigValidation { .. }
                | Error::Config(_)
                | Error::Internal(_)
        )
    }

    /// Get the exit code for CLI
    pub fn exit_code(&self) -> i32 {
        self.code().exit_code()
    }

    // ─────────────────────────────────────────────────────────────
    // User-Friendly Messages
    // ─────────────────────────────────────────────────────────────

    /// Get a user-friendly suggestion for how to fix this error
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            Error::ConfigNotFound { .. } => Some(
                "Run 'linkup config init' to create a default configuration file."
            ),
            Error::ConfigParse { .. } => Some(
                "Check your configuration file syntax. Run 'linkup config validate' to see details."
            ),
            Error::ConfigValidation { .. } => Some(
                "Review the configuration file and fix the invalid values."
            ),
            Error::InvalidEmailDomain { .. } => Some(
                "Register with your student email address, or change 'registration.email_domain'."
            ),
            Error::DuplicateEmail { .. } => Some(
                "This email already has an account. Log in instead of registering again."
            ),
            Error::InvalidRole(_) => Some("Use 'mentor' or 'mentee' as the role."),
            Error::LoginFailed { .. } => Some(
                "Check the email address, or register a new account first."
            ),
            Error::InvalidRating { .. } => Some(
                "Ratings use the range configured under [feedback] (1-5 by default)."
            ),
            Error::NotAssigned(_) => Some(
                "Run the matching algorithm ('linkup match') to assign mentees to groups."
            ),
            Error::Json(_) => Some(
                "Population files must be a JSON array of participant objects. See 'linkup sample'."
            ),
            _ => None,
        }
    }

    /// Format the error for terminal display with colors
    pub fn format_for_terminal(&self) -> String {
        let code = self.code();
        let suggestion = self.suggestion();

        let mut output = format!(
            "\x1b[31mError [{}]\x1b[0m: {}\n",
            code.as_str(),
            self
        );

        if let Some(hint) = suggestion {
            output.push_str(&format!("\n\x1b[33mHint\x1b[0m: {}\n", hint));
        }

        output
    }

    /// Format the error for logging (no colors)
    pub fn format_for_log(&self) -> String {
        format!("[{}] {}", self.code().as_str(), self)
    }
}

// ─────────────────────────────────────────────────────────────────
// Error Constructors
// ─────────────────────────────────────────────────────────────────

impl Error {
    /// Create a config not found error
    pub fn config_not_found(path: impl Into<PathBuf>) -> Self {
        Error::ConfigNotFound { path: path.into() }
    }

    /// Create a config validation error with field name
    pub fn config_field_invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Error::ConfigValidation {
            message: message.into(),
            field: Some(field.into()),
        }
    }

    /// Create an invalid profile error
    pub fn invalid_profile(field: impl Into<String>, message: impl Into<String>) -> Self {
        Error::InvalidProfile {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a role mismatch error for an expected mentor
    pub fn not_a_mentor(id: impl Into<String>) -> Self {
        Error::RoleMismatch {
            id: id.into(),
            expected: "mentor",
        }
    }

    /// Create a role mismatch error for an expected mentee
    pub fn not_a_mentee(id: impl Into<String>) -> Self {
        Error::RoleMismatch {
            id: id.into(),
            expected: "mentee",
        }
    }
}

// ─────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_format() {
        assert_eq!(ErrorCode::ConfigNotFound.as_str(), "E100");
        assert_eq!(ErrorCode::InvalidEmailDomain.as_str(), "E300");
        assert_eq!(ErrorCode::GroupFull.as_str(), "E500");
        assert_eq!(ErrorCode::InternalError.as_str(), "E900");
    }

    #[test]
    fn test_error_exit_codes() {
        assert_eq!(ErrorCode::ConfigNotFound.exit_code(), 10);
        assert_eq!(ErrorCode::IoRead.exit_code(), 20);
        assert_eq!(ErrorCode::DuplicateEmail.exit_code(), 30);
        assert_eq!(ErrorCode::ParticipantNotFound.exit_code(), 40);
        assert_eq!(ErrorCode::NotGroupOwner.exit_code(), 50);
        assert_eq!(ErrorCode::InternalError.exit_code(), 90);
    }

    #[test]
    fn test_error_display() {
        let err = Error::InvalidEmailDomain {
            email: "someone@gmail.com".into(),
            domain: "@student.monash".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("someone@gmail.com"));
        assert!(msg.contains("@student.monash"));
    }

    #[test]
    fn test_role_mismatch_constructors() {
        let err = Error::not_a_mentor("p-1");
        assert_eq!(err.code(), ErrorCode::RoleMismatch);
        assert!(err.to_string().contains("mentor"));

        let err = Error::not_a_mentee("p-2");
        assert!(err.to_string().contains("mentee"));
    }

    #[test]
    fn test_error_fatal() {
        assert!(Error::config_not_found("/test").is_fatal());
        assert!(Error::Config("bad".into()).is_fatal());
        assert!(!Error::ParticipantNotFound("x".into()).is_fatal());
        assert!(!Error::InvalidRole("admin".into()).is_fatal());
    }

    #[test]
    fn test_error_suggestions() {
        let err = Error::config_not_found("/test");
        assert!(err.suggestion().unwrap().contains("config init"));

        let err = Error::NotAssigned("m-1".into());
        assert!(err.suggestion().unwrap().contains("linkup match"));

        assert!(Error::GroupNotFound("g".into()).suggestion().is_none());
    }

    #[test]
    fn test_format_for_terminal() {
        let err = Error::config_not_found("/test/linkup.toml");
        let formatted = err.format_for_terminal();

        assert!(formatted.contains("E100"));
        assert!(formatted.contains("\x1b[31m"));
        assert!(formatted.contains("Hint"));
    }

    #[test]
    fn test_format_for_log() {
        let err = Error::GroupFull {
            group_id: "g-1".into(),
            capacity: 5,
        };
        let formatted = err.format_for_log();

        assert!(formatted.contains("[E500]"));
        assert!(!formatted.contains("\x1b["));
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();

        assert_eq!(err.code(), ErrorCode::IoNotFound);
    }

    #[test]
    fn test_error_from_json() {
        let json_err = serde_json::from_str::<Vec<u32>>("not json").unwrap_err();
        let err: Error = json_err.into();

        assert_eq!(err.code(), ErrorCode::SerializationError);
        assert!(err.suggestion().is_some());
    }
}
