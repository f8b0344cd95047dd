//! Interactive registration questionnaire

use std::io::{self, BufRead, Write};

use crate::error::{Error, Result};
use crate::registration::RegistrationRequest;
use crate::types::RoleKind;

/// Answers collected from one questionnaire session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionnaireAnswers {
    pub name: String,
    pub age: u32,
    pub location: String,
    pub interests: Vec<String>,
    pub background: String,
    pub role: String,
}

impl QuestionnaireAnswers {
    /// Mentor if the role answer mentions "mentor", otherwise mentee
    pub fn role(&self) -> RoleKind {
        if self.role.to_lowercase().contains("mentor") {
            RoleKind::Mentor
        } else {
            RoleKind::Mentee
        }
    }

    /// Email derived from the name: lowercased, spaces become dots
    pub fn generated_email(&self, domain: &str) -> String {
        format!("{}{}", self.name.to_lowercase().replace(' ', "."), domain)
    }

    pub fn into_request(self, domain: &str) -> RegistrationRequest {
        let email = self.generated_email(domain);
        RegistrationRequest {
            name: self.name,
            email,
            age: self.age,
            location: self.location,
            interests: self.interests,
            background: self.background,
        }
    }
}

pub struct Questionnaire;

impl Questionnaire {
    /// Ask each question in turn, writing prompts to `output`
    pub fn collect<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> Result<QuestionnaireAnswers> {
        writeln!(output, "Welcome to the LinkUp Questionnaire")?;

        let name = prompt(input, output, "Enter your name: ")?;
        let age_answer = prompt(input, output, "Enter your age: ")?;
        let age = age_answer
            .parse::<u32>()
            .map_err(|_| Error::invalid_profile("age", format!("'{}' is not a number", age_answer)))?;
        let location = prompt(input, output, "Enter your location: ")?;
        let interests = parse_interests(&prompt(
            input,
            output,
            "What are your hobbies/interests? (comma-separated): ",
        )?);
        let background = prompt(
            input,
            output,
            "What is your country of origin or preferred language? ",
        )?;
        let role = prompt(input, output, "Would you like to be a Mentor or Mentee? ")?;

        let answers = QuestionnaireAnswers {
            name,
            age,
            location,
            interests,
            background,
            role,
        };

        writeln!(output)?;
        writeln!(output, "Thanks for completing the questionnaire!")?;
        writeln!(output, "  Name:       {}", answers.name)?;
        writeln!(output, "  Age:        {}", answers.age)?;
        writeln!(output, "  Location:   {}", answers.location)?;
        writeln!(output, "  Interests:  {}", answers.interests.join(", "))?;
        writeln!(output, "  Background: {}", answers.background)?;
        writeln!(output, "  Role:       {}", answers.role())?;

        Ok(answers)
    }
}

/// Split a comma-separated answer, trimming items and dropping empty ones
pub fn parse_interests(answer: &str) -> Vec<String> {
    answer
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Write a prompt and read one trimmed line. End of input is an error.
pub(crate) fn prompt<R: BufRead, W: Write>(input: &mut R, output: &mut W, label: &str) -> Result<String> {
    read_answer(input, output, label)?
        .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "input closed").into())
}

/// Like [`prompt`] but `None` at end of input
pub(crate) fn read_answer<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    label: &str,
) -> Result<Option<String>> {
    write!(output, "{}", label)?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}
