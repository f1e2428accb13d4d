//! Session filter state and the command-palette filter syntax.
//!
//! `> filter if > 10` sets a minimum impact factor for suggestions;
//! `reset-filter` clears it. The state is owned by the caller and handed to
//! search through [`SessionState::search_options`].

use lazy_static::lazy_static;
use regex::Regex;

use crate::search::SearchOptions;

lazy_static! {
    static ref FILTER_IF: Regex =
        Regex::new(r"(?i)^\s*>\s*filter\s+if\s*>\s*(\d+(?:\.\d+)?)\s*$").unwrap();
}

/// Command key that clears the IF filter.
pub const RESET_FILTER: &str = "reset-filter";

/// Threshold from a `> filter if > N` command, or `None` for any other input.
pub fn parse_filter_command(input: &str) -> Option<f64> {
    let caps = FILTER_IF.captures(input)?;
    caps.get(1)?.as_str().parse().ok()
}

/// A command that changes the session filter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SessionCommand {
    FilterIf(f64),
    ResetFilter,
}

impl SessionCommand {
    pub fn parse(input: &str) -> Option<Self> {
        if let Some(threshold) = parse_filter_command(input) {
            return Some(SessionCommand::FilterIf(threshold));
        }
        (input.trim().eq_ignore_ascii_case(RESET_FILTER)).then_some(SessionCommand::ResetFilter)
    }
}

/// Per-session search state.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SessionState {
    pub min_if: Option<f64>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, command: SessionCommand) {
        match command {
            SessionCommand::FilterIf(threshold) => self.min_if = Some(threshold),
            SessionCommand::ResetFilter => self.min_if = None,
        }
    }

    /// Parse and apply a command-palette input. Returns whether it was a filter command.
    pub fn apply_command(&mut self, input: &str) -> bool {
        match SessionCommand::parse(input) {
            Some(command) => {
                self.apply(command);
                true
            }
            None => false,
        }
    }

    /// Display hint for the active filter, e.g. `"IF >= 10"`.
    pub fn filter_hint(&self) -> Option<String> {
        self.min_if.map(|v| format!("IF >= {}", v))
    }

    pub fn search_options(&self, limit: usize) -> SearchOptions {
        SearchOptions {
            limit,
            min_if: self.min_if,
        }
    }
}
