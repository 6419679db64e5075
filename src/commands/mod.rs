use crate::app::App;
use crate::error::Result;
use crate::store::{HistoryStore, UrlStore};

pub mod builtin;

/// Result of command execution
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandResult {
    /// Continue view loop
    Continue,
    /// Exit view loop
    Exit,
}

/// Commands understood inside the interactive view loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewCommand {
    Next,
    History,
    List,
    ClearHistory,
    Add(String),
    Help,
    Quit,
}

impl ViewCommand {
    /// Parses one line of input; an empty line means "next"
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();
        let (head, rest) = match input.split_once(char::is_whitespace) {
            Some((head, rest)) => (head, rest.trim()),
            None => (input, ""),
        };

        match (head.to_lowercase().as_str(), rest) {
            ("" | "n" | "next", "") => Some(ViewCommand::Next),
            ("h" | "history", "") => Some(ViewCommand::History),
            ("l" | "list", "") => Some(ViewCommand::List),
            ("c" | "clear", "") => Some(ViewCommand::ClearHistory),
            ("a" | "add", url) if !url.is_empty() => Some(ViewCommand::Add(url.to_string())),
            ("?" | "help", "") => Some(ViewCommand::Help),
            ("q" | "quit" | "exit", "") => Some(ViewCommand::Quit),
            _ => None,
        }
    }

    pub fn execute<S>(&self, app: &mut App<S>) -> Result<CommandResult>
    where
        S: UrlStore + HistoryStore,
    {
        match self {
            ViewCommand::Next => builtin::next_command(app),
            ViewCommand::History => builtin::history_command(app),
            ViewCommand::List => builtin::list_command(app),
            ViewCommand::ClearHistory => builtin::clear_command(app),
            ViewCommand::Add(url) => builtin::add_command(app, url),
            ViewCommand::Help => builtin::help_command(),
            ViewCommand::Quit => builtin::quit_command(),
        }
    }
}
