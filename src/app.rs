use crate::commands::{CommandResult, ViewCommand};
use crate::error::Result;
use crate::link::Link;
use crate::selection::Selection;
use crate::store::{HistoryStore, OwnerScope, UrlStore};
use crate::ui::UI;
use crate::error_ext::ResultExt;
use crate::viewer::Viewer;
use colored::Colorize;
use std::io::{self, BufRead, Write};
use tokio::runtime::Runtime;

/// Terminal front end: one-shot commands and the interactive view loop.
///
/// Storage calls are async; the front end stays synchronous and drives them
/// on its own runtime.
pub struct App<S> {
    runtime: Runtime,
    viewer: Viewer<S>,
}

impl<S> App<S>
where
    S: UrlStore + HistoryStore,
{
    pub fn with_viewer(runtime: Runtime, viewer: Viewer<S>) -> Self {
        Self { runtime, viewer }
    }

    fn scope(&self) -> &OwnerScope {
        self.viewer.scope()
    }

    pub fn add(&self, url: &str) -> Result<Link> {
        let link = Link::parse(url)?;
        self.runtime
            .block_on(self.viewer.store().create(self.scope(), link.clone()))?;
        tracing::info!(url = %link, scope = %self.scope(), "url added");
        UI::print_success(format!("Added {}", link));
        Ok(link)
    }

    pub fn remove(&self, url: &str) -> Result<bool> {
        let link = Link::parse(url)?;
        let removed = self
            .runtime
            .block_on(self.viewer.store().remove(self.scope(), &link))?;
        if removed {
            tracing::info!(url = %link, scope = %self.scope(), "url removed");
            UI::print_success(format!("Removed {}", link));
        } else {
            UI::print_warning(format!("{} was not in the list", link));
        }
        Ok(removed)
    }

    pub fn edit(&self, old: &str, new: &str) -> Result<()> {
        let old = Link::parse(old)?;
        let new = Link::parse(new)?;
        self.runtime
            .block_on(self.viewer.store().replace(self.scope(), &old, new.clone()))?;
        tracing::info!(old = %old, new = %new, scope = %self.scope(), "url replaced");
        UI::print_success(format!("Replaced {} with {}", old, new));
        Ok(())
    }

    pub fn list(&self) -> Result<Vec<Link>> {
        let store = self.viewer.store();
        let (urls, updated_at) = self.runtime.block_on(async {
            futures::try_join!(store.list(self.scope()), store.last_updated(self.scope()))
        })?;
        UI::print_urls(&urls, self.scope(), updated_at);
        Ok(urls)
    }

    pub fn next(&mut self) -> Result<Selection> {
        let selection = self.runtime.block_on(self.viewer.next())?;
        UI::print_selection(&selection);
        Ok(selection)
    }

    pub fn history(&self) -> Result<Vec<Link>> {
        let history = self.runtime.block_on(self.viewer.history())?;
        UI::print_history(&history, self.viewer.params().history_size);
        Ok(history)
    }

    pub fn clear_history(&self) -> Result<()> {
        self.runtime.block_on(self.viewer.clear_history())?;
        UI::print_success("History cleared");
        Ok(())
    }

    pub fn check(&self, url: &str) -> Result<()> {
        let link = Link::parse(url)?;
        let verdict = self.runtime.block_on(self.viewer.check(&link))?;
        UI::print_verdict(&link, &verdict);
        Ok(())
    }

    /// Shows one URL, then waits for the next command until the user quits
    /// or input ends.
    pub fn view(&mut self) -> Result<()> {
        println!(
            "{} {}",
            "Random view:".bright_cyan().bold(),
            format!("{} • {} policy", self.scope(), self.viewer.params().policy.as_str()).dimmed()
        );
        UI::print_view_help();
        println!();

        self.report(ViewCommand::Next);

        let stdin = io::stdin();
        let mut input = String::new();
        loop {
            print!("{} ", "›".bright_green().bold());
            io::stdout().flush().context("Failed to write the prompt")?;

            input.clear();
            let read = stdin
                .lock()
                .read_line(&mut input)
                .context("Failed to read from stdin")?;
            if read == 0 {
                println!();
                break;
            }

            let Some(command) = ViewCommand::parse(&input) else {
                UI::print_warning(format!("Unknown command: {}", input.trim()));
                UI::print_view_help();
                continue;
            };

            if self.report(command) == CommandResult::Exit {
                break;
            }
        }

        Ok(())
    }

    /// Runs a view command, printing failures instead of ending the loop
    fn report(&mut self, command: ViewCommand) -> CommandResult {
        match command.execute(self) {
            Ok(result) => result,
            Err(e) => {
                UI::print_error(&e);
                CommandResult::Continue
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RandviewError;
    use crate::selection::SelectionParams;
    use crate::store::MemoryStore;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn app(store: MemoryStore, scope: OwnerScope) -> App<MemoryStore> {
        let viewer = Viewer::with_rng(
            store,
            scope,
            SelectionParams::default(),
            StdRng::seed_from_u64(5),
        );
        App::with_viewer(Runtime::new().unwrap(), viewer)
    }

    #[test]
    fn test_add_validates_before_storing() {
        let store = MemoryStore::default();
        let app = app(store.clone(), OwnerScope::Local);

        let err = app.add("not-a-url").unwrap_err();
        assert!(matches!(err, RandviewError::InvalidUrl(_)));

        app.add("https://a.example").unwrap();
        let err = app.add("https://a.example").unwrap_err();
        assert!(matches!(err, RandviewError::DuplicateUrl(_)));

        assert_eq!(app.list().unwrap().len(), 1);
    }

    #[test]
    fn test_edit_remove_and_next() {
        let app_store = MemoryStore::default();
        let mut app = app(app_store, OwnerScope::Local);

        app.add("https://a.example").unwrap();
        app.edit("https://a.example", "https://b.example").unwrap();
        let sel = app.next().unwrap();
        assert_eq!(sel.chosen.as_str(), "https://b.example");
        assert_eq!(app.history().unwrap().len(), 1);

        assert!(app.remove("https://b.example").unwrap());
        assert!(!app.remove("https://b.example").unwrap());
        let err = app.next().unwrap_err();
        assert!(matches!(err, RandviewError::EmptyCandidateSet));

        app.clear_history().unwrap();
        assert!(app.history().unwrap().is_empty());
    }

    #[test]
    fn test_all_scope_is_read_only() {
        let app = app(MemoryStore::default(), OwnerScope::All);
        let err = app.add("https://a.example").unwrap_err();
        assert!(matches!(err, RandviewError::ReadOnlyScope));
    }
}
