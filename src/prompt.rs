//! Operator input behind a trait, so workflows can be driven
//! non-interactively in tests.

use anyhow::Result;
use dialoguer::{Input, Password};

/// Source of interactive answers.
pub trait Prompter {
    /// Ask for a visible line of input.
    ///
    /// # Errors
    ///
    /// Returns an error when the terminal interaction fails.
    fn input(&self, prompt: &str) -> Result<String>;

    /// Ask for a hidden value (API tokens).
    ///
    /// # Errors
    ///
    /// Returns an error when the terminal interaction fails.
    fn secret(&self, prompt: &str) -> Result<String>;
}

/// Production prompter backed by dialoguer.
pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn input(&self, prompt: &str) -> Result<String> {
        Ok(Input::<String>::new().with_prompt(prompt).interact_text()?)
    }

    fn secret(&self, prompt: &str) -> Result<String> {
        Ok(Password::new().with_prompt(prompt).interact()?)
    }
}
