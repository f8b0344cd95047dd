//! Interactive console
//!
//! Menu-driven front end over registration, login, matching and the
//! dashboards. Input and output are generic so sessions can be scripted.

use std::io::{BufRead, Write};

use tracing::{error, info, warn};

use crate::chat::ChatManager;
use crate::config::LinkupConfig;
use crate::dashboard::{MenteeDashboard, MentorDashboard, ProfileUpdate};
use crate::error::{Error, Result};
use crate::matching::GroupAllocator;
use crate::questionnaire::{parse_interests, prompt, read_answer, Questionnaire};
use crate::registration::{Registrar, RegistrationRequest};
use crate::report::MatchReport;
use crate::store::Directory;
use crate::types::{GroupId, Participant, RoleKind};
use crate::version;

#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Exit,
}

pub struct Console<'a, R, W> {
    input: R,
    output: W,
    directory: &'a Directory,
    registrar: &'a Registrar,
    config: &'a LinkupConfig,
    chat: ChatManager<'a>,
    session: Option<Participant>,
}

impl<'a, R: BufRead, W: Write> Console<'a, R, W> {
    pub fn new(
        input: R,
        output: W,
        directory: &'a Directory,
        registrar: &'a Registrar,
        config: &'a LinkupConfig,
    ) -> Self {
        Self {
            input,
            output,
            directory,
            registrar,
            config,
            chat: ChatManager::new(directory),
            session: None,
        }
    }

    /// Currently logged-in participant
    pub fn session(&self) -> Option<&Participant> {
        self.session.as_ref()
    }

    /// Run until the user exits or input ends
    pub fn run(&mut self) -> Result<()> {
        writeln!(self.output, "{}", version::build_info().banner())?;

        loop {
            writeln!(self.output)?;
            writeln!(self.output, "===== SKILL SWAP PLATFORM =====")?;
            let flow = if self.session.is_some() {
                self.logged_in_menu()?
            } else {
                self.logged_out_menu()?
            };
            if let Flow::Exit = flow {
                writeln!(self.output, "Goodbye!")?;
                return Ok(());
            }
        }
    }

    fn logged_out_menu(&mut self) -> Result<Flow> {
        writeln!(self.output, "1. Take the questionnaire to register")?;
        writeln!(self.output, "2. Manual registration")?;
        writeln!(self.output, "3. Login with existing account")?;
        writeln!(self.output, "4. Run matching algorithm")?;
        writeln!(self.output, "5. Exit")?;

        let Some(choice) = read_answer(&mut self.input, &mut self.output, "Select an option (1-5): ")? else {
            return Ok(Flow::Exit);
        };

        let outcome = match choice.as_str() {
            "1" => self.register_with_questionnaire(),
            "2" => self.register_manually(),
            "3" => self.login(),
            "4" => self.run_matching(),
            "5" => return Ok(Flow::Exit),
            _ => {
                writeln!(self.output, "Invalid option selected.")?;
                Ok(())
            }
        };
        self.report(outcome)
    }

    fn logged_in_menu(&mut self) -> Result<Flow> {
        let Some(user) = self.session.clone() else {
            return Ok(Flow::Continue);
        };

        match self.render_dashboard(&user) {
            Ok(text) => write!(self.output, "{}", text)?,
            Err(e) => writeln!(self.output, "Error: {}", e)?,
        }

        let actions = self.show_unread(&user).and_then(|()| {
            if user.is_mentor() {
                self.mentor_actions(&user.id)
            } else {
                self.mentee_actions(&user.id)
            }
        });
        if let Flow::Exit = self.report(actions)? {
            return Ok(Flow::Exit);
        }

        writeln!(self.output)?;
        writeln!(self.output, "1. Logout")?;
        writeln!(self.output, "2. Exit")?;

        match read_answer(&mut self.input, &mut self.output, "Select an option: ")?.as_deref() {
            None | Some("2") => Ok(Flow::Exit),
            Some("1") => {
                if let Some(p) = self.session.take() {
                    info!(email = %p.profile.email, "Logged out");
                }
                writeln!(self.output, "Logged out successfully")?;
                Ok(Flow::Continue)
            }
            Some(_) => {
                writeln!(self.output, "Invalid option selected.")?;
                Ok(Flow::Continue)
            }
        }
    }

    /// Print an operation error; fatal errors and end of input stop the loop
    fn report(&mut self, outcome: Result<()>) -> Result<Flow> {
        match outcome {
            Ok(()) => Ok(Flow::Continue),
            Err(Error::Io(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => Ok(Flow::Exit),
            Err(e) if e.is_fatal() => {
                error!(error = %e.format_for_log(), "Console stopped");
                writeln!(self.output, "Error: {}", e)?;
                Ok(Flow::Exit)
            }
            Err(e) => {
                warn!(error = %e.format_for_log(), "Console operation failed");
                writeln!(self.output, "Error: {}", e)?;
                Ok(Flow::Continue)
            }
        }
    }

    /// Print messages the user has not seen yet, then mark them read
    fn show_unread(&mut self, user: &Participant) -> Result<()> {
        if self.chat.total_unread(&user.id) == 0 {
            return Ok(());
        }
        let group_ids: Vec<GroupId> = {
            let tables = self.directory.read();
            if user.is_mentor() {
                tables
                    .groups
                    .groups_by_mentor(&user.id)
                    .into_iter()
                    .map(|g| g.id.clone())
                    .collect()
            } else {
                tables
                    .groups
                    .group_by_mentee(&user.id)
                    .map(|g| g.id.clone())
                    .into_iter()
                    .collect()
            }
        };

        for group_id in group_ids {
            let unread = self.chat.unread_count(&user.id, &group_id) as usize;
            if unread == 0 {
                continue;
            }
            let messages = self.chat.group_messages(&group_id);
            writeln!(self.output)?;
            writeln!(self.output, "New messages:")?;
            for message in messages.iter().skip(messages.len().saturating_sub(unread)) {
                let sender = self
                    .directory
                    .participant(&message.sender_id)
                    .map(|p| p.profile.name)
                    .unwrap_or_else(|| message.sender_id.clone());
                writeln!(self.output, "[{}] {}", sender, message.content)?;
            }
            self.chat.mark_read(&user.id, &group_id);
        }
        Ok(())
    }

    fn mentee_actions(&mut self, mentee_id: &str) -> Result<()> {
        let config = self.config;
        let feedback = &config.feedback;
        let dashboard = MenteeDashboard::new(self.directory, &self.chat, feedback, mentee_id)?;

        if let Some(group) = dashboard.group() {
            if confirm(
                &mut self.input,
                &mut self.output,
                "Would you like to give feedback to your mentor? (yes/no): ",
            )? {
                let answer = prompt(
                    &mut self.input,
                    &mut self.output,
                    &format!("Rate your mentor ({}-{}): ", feedback.min_rating, feedback.max_rating),
                )?;
                let outcome = match answer.parse::<u32>() {
                    Ok(rating) => dashboard.give_feedback(rating).map(Some),
                    Err(_) => Ok(None),
                };
                match outcome {
                    Ok(Some(_)) => writeln!(self.output, "Feedback submitted. Thank you!")?,
                    Ok(None) | Err(Error::InvalidRating { .. }) => writeln!(
                        self.output,
                        "Invalid rating. Please use a scale of {}-{}.",
                        feedback.min_rating, feedback.max_rating
                    )?,
                    Err(e) => return Err(e),
                }
            }

            if confirm(
                &mut self.input,
                &mut self.output,
                "Would you like to send a message to your group? (yes/no): ",
            )? {
                let content = prompt(&mut self.input, &mut self.output, "Enter your message: ")?;
                dashboard.send_message(&content)?;
                writeln!(self.output, "Message sent to {}", group.name)?;
            }
        }

        if confirm(
            &mut self.input,
            &mut self.output,
            "Do you want to update your interests? (yes/no): ",
        )? {
            let interests = parse_interests(&prompt(
                &mut self.input,
                &mut self.output,
                "Enter new interests (comma-separated): ",
            )?);
            let updated = dashboard.update_profile(ProfileUpdate {
                interests: Some(interests),
                ..ProfileUpdate::default()
            })?;
            writeln!(self.output, "Interests updated successfully")?;
            self.session = Some(updated);
        }
        Ok(())
    }

    fn mentor_actions(&mut self, mentor_id: &str) -> Result<()> {
        let dashboard = MentorDashboard::new(self.directory, &self.chat, mentor_id)?;

        if confirm(
            &mut self.input,
            &mut self.output,
            "Do you want to update your profile? (yes/no): ",
        )? {
            let location = prompt(&mut self.input, &mut self.output, "Enter new location: ")?;
            dashboard.update_location(&location)?;
            writeln!(self.output, "Profile updated successfully")?;
            self.session = Some(dashboard.mentor()?);
        }

        let groups = dashboard.groups();
        if !groups.is_empty()
            && confirm(
                &mut self.input,
                &mut self.output,
                "Would you like to send a message to one of your groups? (yes/no): ",
            )?
        {
            writeln!(self.output, "Select a group to message:")?;
            for (i, group) in groups.iter().enumerate() {
                writeln!(self.output, "{}. {} (ID: {})", i + 1, group.name, group.id)?;
            }
            let choice = prompt(&mut self.input, &mut self.output, "Group number: ")?;
            let selected = choice
                .parse::<usize>()
                .ok()
                .and_then(|n| n.checked_sub(1))
                .and_then(|i| groups.get(i));
            match selected {
                Some(group) => {
                    let content = prompt(&mut self.input, &mut self.output, "Enter your message: ")?;
                    dashboard.send_message(&group.id, &content)?;
                    writeln!(self.output, "Message sent to {}", group.name)?;
                }
                None => writeln!(self.output, "Invalid group selection")?,
            }
        }
        Ok(())
    }

    fn register_with_questionnaire(&mut self) -> Result<()> {
        let answers = Questionnaire::collect(&mut self.input, &mut self.output)?;
        let role = answers.role();
        let request = answers.into_request(self.registrar.email_domain());
        self.complete_registration(request, role)
    }

    fn register_manually(&mut self) -> Result<()> {
        let name = prompt(&mut self.input, &mut self.output, "Enter name: ")?;
        let email = prompt(
            &mut self.input,
            &mut self.output,
            &format!("Enter email (must end with {}): ", self.registrar.email_domain()),
        )?;
        let age_answer = prompt(&mut self.input, &mut self.output, "Enter age: ")?;
        let age = age_answer
            .parse::<u32>()
            .map_err(|_| Error::invalid_profile("age", format!("'{}' is not a number", age_answer)))?;
        let location = prompt(&mut self.input, &mut self.output, "Enter location: ")?;
        let interests = parse_interests(&prompt(
            &mut self.input,
            &mut self.output,
            "Enter interests (comma-separated): ",
        )?);
        let background = prompt(&mut self.input, &mut self.output, "Enter background: ")?;
        let role: RoleKind = prompt(&mut self.input, &mut self.output, "Register as mentor or mentee? ")?.parse()?;

        let request = RegistrationRequest {
            name,
            email,
            age,
            location,
            interests,
            background,
        };
        self.complete_registration(request, role)
    }

    fn complete_registration(&mut self, request: RegistrationRequest, role: RoleKind) -> Result<()> {
        let participant = self.registrar.register(self.directory, request, role)?;
        writeln!(
            self.output,
            "User registered: {} ({}, {})",
            participant.profile.name, participant.profile.email, role
        )?;
        self.session = Some(participant);
        Ok(())
    }

    fn login(&mut self) -> Result<()> {
        let email = prompt(&mut self.input, &mut self.output, "Enter email: ")?;
        let pin = prompt(&mut self.input, &mut self.output, "Enter PIN: ")?;
        let participant = self.registrar.login(self.directory, &email, &pin)?;
        writeln!(self.output, "Login successful for: {}", participant.profile.name)?;
        info!(email = %email, "Logged in");
        self.session = Some(participant);
        Ok(())
    }

    fn run_matching(&mut self) -> Result<()> {
        writeln!(self.output, "Running matching algorithm...")?;
        let formed = GroupAllocator::new(self.directory)
            .with_capacity(self.config.matching.group_capacity)
            .with_group_name(self.config.groups.default_name.clone())
            .form_groups()?;
        writeln!(self.output, "Created {} groups", formed.len())?;

        let all = self.directory.all_groups();
        write!(self.output, "{}", MatchReport::from_groups(self.directory, &all).render())?;
        Ok(())
    }

    fn render_dashboard(&self, user: &Participant) -> Result<String> {
        if user.is_mentor() {
            MentorDashboard::new(self.directory, &self.chat, &user.id)?.render()
        } else {
            MenteeDashboard::new(self.directory, &self.chat, &self.config.feedback, &user.id)?.render()
        }
    }
}

/// Ask a yes/no question; anything but "yes" is a no
fn confirm<R: BufRead, W: Write>(input: &mut R, output: &mut W, question: &str) -> Result<bool> {
    Ok(prompt(input, output, question)?.eq_ignore_ascii_case("yes"))
}
