use super::CommandResult;
use crate::app::App;
use crate::error::Result;
use crate::store::{HistoryStore, UrlStore};
use crate::ui::UI;

pub fn next_command<S: UrlStore + HistoryStore>(app: &mut App<S>) -> Result<CommandResult> {
    app.next()?;
    Ok(CommandResult::Continue)
}

pub fn history_command<S: UrlStore + HistoryStore>(app: &mut App<S>) -> Result<CommandResult> {
    app.history()?;
    Ok(CommandResult::Continue)
}

pub fn list_command<S: UrlStore + HistoryStore>(app: &mut App<S>) -> Result<CommandResult> {
    app.list()?;
    Ok(CommandResult::Continue)
}

pub fn clear_command<S: UrlStore + HistoryStore>(app: &mut App<S>) -> Result<CommandResult> {
    app.clear_history()?;
    Ok(CommandResult::Continue)
}

pub fn add_command<S: UrlStore + HistoryStore>(
    app: &mut App<S>,
    url: &str,
) -> Result<CommandResult> {
    app.add(url)?;
    Ok(CommandResult::Continue)
}

pub fn help_command() -> Result<CommandResult> {
    UI::print_view_help();
    Ok(CommandResult::Continue)
}

pub fn quit_command() -> Result<CommandResult> {
    Ok(CommandResult::Exit)
}
