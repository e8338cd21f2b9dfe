//! Operator prompts used by the interactive update.

use std::io;

use dialoguer::{Confirm, Input};

pub trait Prompter {
    /// Yes/no question; blank answers mean no.
    fn confirm(&mut self, prompt: &str) -> io::Result<bool>;
    /// Free-text answer, possibly empty.
    fn input(&mut self, prompt: &str) -> io::Result<String>;
}

/// Prompts on the controlling terminal.
#[derive(Debug, Default)]
pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn confirm(&mut self, prompt: &str) -> io::Result<bool> {
        Confirm::new()
            .with_prompt(prompt)
            .default(false)
            .show_default(true)
            .interact()
    }

    fn input(&mut self, prompt: &str) -> io::Result<String> {
        Input::<String>::new()
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()
    }
}
