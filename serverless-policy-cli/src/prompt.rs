//! Interactive prompting

use anyhow::{Context, Result};
use dialoguer::{Confirm, Input};

/// Source of answers for values the user did not provide up front
pub trait Prompter {
    /// Ask for free text, returning `default` when the user just presses enter
    fn input(&mut self, message: &str, default: &str) -> Result<String>;

    /// Ask a yes/no question, defaulting to no
    fn confirm(&mut self, message: &str) -> Result<bool>;
}

/// Terminal prompter backed by `dialoguer`
#[derive(Debug, Default)]
pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn input(&mut self, message: &str, default: &str) -> Result<String> {
        Input::<String>::new()
            .with_prompt(message)
            .default(default.to_string())
            .show_default(!default.is_empty())
            .allow_empty(true)
            .interact_text()
            .with_context(|| format!("Failed to read answer to '{message}'"))
    }

    fn confirm(&mut self, message: &str) -> Result<bool> {
        Confirm::new()
            .with_prompt(message)
            .default(false)
            .interact()
            .with_context(|| format!("Failed to read answer to '{message}'"))
    }
}
