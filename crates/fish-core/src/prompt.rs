//! Interactive prompt interface
//!
//! Workflows ask questions through `Prompter` so the terminal implementation
//! (`tui::ClackPrompter`) can be swapped for a scripted one in tests.

use crate::error::FishResult;

/// One entry of a selection list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    pub value: String,
    pub label: String,
}

impl Choice {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// Question kinds used by the workflows
pub trait Prompter {
    /// Pick one of `choices`; returns the chosen value
    fn select(&mut self, message: &str, choices: &[Choice], default: Option<&str>)
        -> FishResult<String>;

    /// Free text
    fn input(&mut self, message: &str) -> FishResult<String>;

    /// Hidden input
    fn password(&mut self, message: &str) -> FishResult<String>;

    fn confirm(&mut self, message: &str, default: bool) -> FishResult<bool>;

    /// Informational line shown to the operator
    fn info(&mut self, message: &str) -> FishResult<()>;

    /// Warning shown to the operator
    fn warning(&mut self, message: &str) -> FishResult<()>;

    /// Success line shown to the operator
    fn success(&mut self, message: &str) -> FishResult<()>;
}
