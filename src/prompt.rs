//! Interactive prompt seam
//!
//! Commands confirm destructive or cascading plans through this trait so the
//! flows stay testable and `--yes` can short-circuit every question.

use inquire::{Confirm, Select};

use crate::error::{LocaldevError, Result};

pub trait Prompt {
    /// Yes/no question; `default` is taken on a bare Enter
    fn confirm(&self, message: &str, default: bool) -> Result<bool>;

    /// Pick one option by index; `default` is preselected
    fn select(&self, message: &str, options: &[String], default: usize) -> Result<usize>;
}

/// Real terminal prompts via inquire
pub struct InteractivePrompt;

impl Prompt for InteractivePrompt {
    fn confirm(&self, message: &str, default: bool) -> Result<bool> {
        Confirm::new(message)
            .with_default(default)
            .with_help_message("Press Enter to accept the default")
            .prompt()
            .map_err(LocaldevError::prompt)
    }

    fn select(&self, message: &str, options: &[String], default: usize) -> Result<usize> {
        let chosen = Select::new(message, options.to_vec())
            .with_starting_cursor(default)
            .prompt()
            .map_err(LocaldevError::prompt)?;

        Ok(options
            .iter()
            .position(|o| *o == chosen)
            .unwrap_or(default))
    }
}

/// Non-interactive mode (`--yes`): every confirmation is accepted and
/// selections take their default.
pub struct AssumeYes;

impl Prompt for AssumeYes {
    fn confirm(&self, _message: &str, _default: bool) -> Result<bool> {
        Ok(true)
    }

    fn select(&self, _message: &str, _options: &[String], default: usize) -> Result<usize> {
        Ok(default)
    }
}
