//! Registration and login
//!
//! Enforces the email-domain policy before a participant reaches the store,
//! and loads whole populations from JSON files.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::RegistrationSettings;
use crate::error::{Error, Result};
use crate::store::Directory;
use crate::types::{Participant, Profile, RoleKind};

/// Profile data submitted at registration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationRequest {
    pub name: String,
    pub email: String,
    pub age: u32,
    pub location: String,
    #[serde(default)]
    pub interests: Vec<String>,
    pub background: String,
}

impl From<RegistrationRequest> for Profile {
    fn from(req: RegistrationRequest) -> Self {
        Profile {
            name: req.name,
            email: req.email,
            age: req.age,
            location: req.location,
            interests: req.interests,
            background: req.background,
        }
    }
}

/// One entry of a population file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopulationEntry {
    pub role: RoleKind,
    #[serde(flatten)]
    pub request: RegistrationRequest,
}

/// Applies registration policy to a directory
#[derive(Debug, Clone)]
pub struct Registrar {
    email_domain: String,
}

impl Registrar {
    pub fn new(settings: &RegistrationSettings) -> Self {
        Self {
            email_domain: settings.email_domain.clone(),
        }
    }

    /// Required email suffix
    pub fn email_domain(&self) -> &str {
        &self.email_domain
    }

    /// Name and email-domain checks that need no store access
    fn check_request(&self, request: &RegistrationRequest) -> Result<()> {
        if request.name.trim().is_empty() {
            return Err(Error::invalid_profile("name", "Name cannot be empty"));
        }
        if !request.email.ends_with(&self.email_domain) {
            return Err(Error::InvalidEmailDomain {
                email: request.email.clone(),
                domain: self.email_domain.clone(),
            });
        }
        Ok(())
    }

    /// Validate and register a participant, appending it to the population
    pub fn register(
        &self,
        directory: &Directory,
        request: RegistrationRequest,
        role: RoleKind,
    ) -> Result<Participant> {
        self.check_request(&request)?;

        let mut tables = directory.write();
        if tables.participants.find_by_email(&request.email).is_some() {
            return Err(Error::DuplicateEmail {
                email: request.email,
            });
        }

        let participant = Participant::new(request.into(), role);
        tables.participants.insert(participant.clone());

        debug!(
            id = %participant.id,
            email = %participant.profile.email,
            role = %role,
            "Participant registered"
        );
        Ok(participant)
    }

    /// Register every entry in order.
    ///
    /// All entries are checked before the first insert; one rejected entry
    /// leaves the directory unchanged.
    pub fn register_all(
        &self,
        directory: &Directory,
        entries: impl IntoIterator<Item = PopulationEntry>,
    ) -> Result<Vec<Participant>> {
        let entries: Vec<PopulationEntry> = entries.into_iter().collect();

        let mut tables = directory.write();
        let mut emails = HashSet::new();
        for entry in &entries {
            self.check_request(&entry.request)?;
            let email = entry.request.email.as_str();
            if tables.participants.find_by_email(email).is_some() || !emails.insert(email) {
                return Err(Error::DuplicateEmail {
                    email: email.to_string(),
                });
            }
        }

        let registered: Vec<Participant> = entries
            .into_iter()
            .map(|entry| Participant::new(entry.request.into(), entry.role))
            .collect();
        for participant in &registered {
            tables.participants.insert(participant.clone());
        }

        debug!(participants = registered.len(), "Participants registered");
        Ok(registered)
    }

    /// Log in by email. The pin is not verified.
    pub fn login(&self, directory: &Directory, email: &str, _pin: &str) -> Result<Participant> {
        directory
            .participant_by_email(email)
            .ok_or_else(|| Error::LoginFailed {
                email: email.to_string(),
            })
    }
}

/// Read a population file (a JSON array of [`PopulationEntry`])
pub fn read_population(path: &Path) -> Result<Vec<PopulationEntry>> {
    let content = fs::read_to_string(path).map_err(|e| Error::IoRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(serde_json::from_str(&content)?)
}

/// Read a population file and register it into `directory`
pub fn load_population(
    registrar: &Registrar,
    directory: &Directory,
    path: &Path,
) -> Result<Vec<Participant>> {
    let entries = read_population(path)?;
    let registered = registrar.register_all(directory, entries)?;
    info!(
        path = %path.display(),
        participants = registered.len(),
        "Population loaded"
    );
    Ok(registered)
}
