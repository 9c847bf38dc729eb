//! Interactive prompts for missing credentials.
use anyhow::Result;
use inquire::Password;
use inquire::PasswordDisplayMode;
use inquire::Text;

use super::Prompter;

/// Prompt for credentials on the controlling terminal.
pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn hostname(&self) -> Result<String> {
        let hostname = Text::new("Hostname:").prompt()?;
        Ok(hostname)
    }

    fn username(&self, admin: bool) -> Result<String> {
        let prompt = match admin {
            true => "Admin username:",
            false => "Username:",
        };
        let username = Text::new(prompt).prompt()?;
        Ok(username)
    }

    fn password(&self, label: &str) -> Result<String> {
        let prompt = format!("Password for {}:", label);
        let password = Password::new(&prompt)
            .with_display_mode(PasswordDisplayMode::Masked)
            .without_confirmation()
            .prompt()?;
        Ok(password)
    }
}
