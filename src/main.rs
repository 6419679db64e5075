mod app;
mod cli;
mod commands;
mod config;
mod error;
mod error_ext;
mod link;
mod selection;
mod store;
mod ui;
mod viewer;

use app::App;
use clap::Parser;
use cli::{Cli, Command};
use colored::Colorize;
use config::RandviewConfig;
use error::{RandviewError, Result};
use error_ext::ResultExt;
use store::{FileStore, HistoryStore, MemoryStore, UrlStore};
use tokio::runtime::Runtime;
use ui::UI;
use viewer::Viewer;

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(cli.log_level().into()),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli) {
        UI::print_error(&e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let workspace = std::env::current_dir().map_err(|e| {
        RandviewError::Config(format!("Failed to get current directory: {}", e))
    })?;

    let config = RandviewConfig::load(&workspace, &cli.overrides())?;
    let scope = cli.scope()?;

    if scope.is_read_only() && is_mutation(&cli.command) {
        return Err(RandviewError::ReadOnlyScope);
    }

    let store = FileStore::new(&config.data_dir);
    tracing::info!(
        data_dir = %store.data_dir().display(),
        scope = %scope,
        policy = config.selection.policy.as_str(),
        dry_run = cli.dry_run,
        "starting"
    );

    let runtime = Runtime::new().context("Failed to start the async runtime")?;

    if cli.dry_run {
        let (urls, history) = runtime.block_on(async {
            futures::try_join!(store.list(&scope), store.load(&scope))
        })?;
        eprintln!("{}", "Dry run: changes will not be saved".dimmed());
        let snapshot = MemoryStore::snapshot(&scope, urls, history);
        let app = App::with_viewer(runtime, Viewer::new(snapshot, scope, config.selection));
        dispatch(app, cli.command)
    } else {
        let app = App::with_viewer(runtime, Viewer::new(store, scope, config.selection));
        dispatch(app, cli.command)
    }
}

fn dispatch<S: UrlStore + HistoryStore>(mut app: App<S>, command: Command) -> Result<()> {
    match command {
        Command::Add { url } => app.add(&url).map(|_| ()),
        Command::Remove { url } => app.remove(&url).map(|_| ()),
        Command::Edit { old, new } => app.edit(&old, &new),
        Command::List => app.list().map(|_| ()),
        Command::Next => app.next().map(|_| ()),
        Command::View => app.view(),
        Command::History { clear: true } => app.clear_history(),
        Command::History { clear: false } => app.history().map(|_| ()),
        Command::Check { url } => app.check(&url),
    }
}

fn is_mutation(command: &Command) -> bool {
    matches!(
        command,
        Command::Add { .. } | Command::Remove { .. } | Command::Edit { .. }
    )
}
