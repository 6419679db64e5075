use crate::error::RandviewError;
use crate::link::Link;
use crate::selection::{FrequencyVerdict, Selection};
use crate::store::OwnerScope;
use colored::Colorize;

const VIEW_HELP: &str =
    "Enter/n: next • h: history • l: list • a <URL>: add • c: clear history • ?: help • q: quit";

/// Message severity levels for consistent UI feedback
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MessageSeverity {
    /// Designed degradation, e.g. every URL was shown recently
    Notice,
    /// Recoverable issues, non-critical problems
    Warning,
    /// Actual failures (storage, validation)
    Error,
    Success,
}

impl MessageSeverity {
    pub fn prefix(&self) -> colored::ColoredString {
        match self {
            Self::Notice => "Notice:".truecolor(0xFF, 0xA5, 0x00).bold(), // Orange
            Self::Warning => "Warning:".bright_yellow().bold(),
            Self::Error => "Error:".bright_red().bold(),
            Self::Success => "Success:".bright_green().bold(),
        }
    }
}

/// Structured message for consistent formatting
pub struct FormattedMessage {
    pub severity: MessageSeverity,
    pub title: String,
    pub details: Option<String>,
    pub hint: Option<String>,
}

impl FormattedMessage {
    pub fn new(severity: MessageSeverity, title: impl Into<String>) -> Self {
        Self {
            severity,
            title: title.into(),
            details: None,
            hint: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    pub fn print(&self) {
        eprintln!("{} {}", self.severity.prefix(), self.title);
        if let Some(ref details) = self.details {
            eprintln!("  {}", details.dimmed());
        }
        if let Some(ref hint) = self.hint {
            eprintln!("  {} {}", "Hint:".bright_cyan(), hint);
        }
    }
}

pub struct UI;

impl UI {
    pub fn print_error(err: &RandviewError) {
        let title = match err.root() {
            RandviewError::EmptyCandidateSet => "No URLs available".to_string(),
            RandviewError::SourceUnavailable(_) => "Could not reach your URL store".to_string(),
            RandviewError::InvalidUrl(_) => "That doesn't look like a valid URL".to_string(),
            RandviewError::DuplicateUrl(_) => "This URL is already in the list".to_string(),
            other => other.to_string(),
        };

        let mut message = FormattedMessage::new(MessageSeverity::Error, title);
        if !matches!(err.root(), RandviewError::EmptyCandidateSet) {
            message = message.with_details(err.to_string());
        }
        if let Some(hint) = err.hint() {
            message = message.with_hint(hint);
        }
        message.print();
    }

    pub fn print_success(title: impl Into<String>) {
        FormattedMessage::new(MessageSeverity::Success, title).print();
    }

    pub fn print_warning(title: impl Into<String>) {
        FormattedMessage::new(MessageSeverity::Warning, title).print();
    }

    pub fn print_selection(selection: &Selection) {
        println!(
            "{} {}",
            "→".bright_green().bold(),
            selection.chosen.as_str().bright_white().underline()
        );
        if selection.used_fallback {
            FormattedMessage::new(
                MessageSeverity::Notice,
                "You've seen everything recently, so this one was picked at random.",
            )
            .with_hint("Add more URLs for more variety")
            .print();
        }
    }

    pub fn print_urls(urls: &[Link], scope: &OwnerScope, updated_at: Option<i64>) {
        if urls.is_empty() {
            println!("{}", format!("No URLs for {}.", scope).yellow());
            return;
        }

        let updated = updated_at
            .map(|ts| format!(" • updated {}", format_timestamp(ts)))
            .unwrap_or_default();
        println!(
            "{} {}",
            format!("URLs for {}", scope).bright_cyan().bold(),
            format!("({}{})", count(urls.len(), "URL"), updated).dimmed()
        );
        for (i, url) in urls.iter().enumerate() {
            println!("  {} {}", format!("[{}]", i + 1).bright_green().bold(), url);
        }
    }

    pub fn print_history(history: &[Link], capacity: usize) {
        if history.is_empty() {
            println!("{}", "Nothing shown recently.".yellow());
            return;
        }

        println!(
            "{} {}",
            "Recently shown".bright_cyan().bold(),
            format!("({} of {}, most recent first)", history.len(), capacity).dimmed()
        );
        for (i, url) in history.iter().enumerate() {
            println!("  {} {}", format!("{:>2}.", i + 1).dimmed(), url);
        }
    }

    pub fn print_verdict(url: &Link, verdict: &FrequencyVerdict) {
        if verdict.should_display {
            println!(
                "{} {} {}",
                "Eligible:".bright_green().bold(),
                url,
                format!("(shown {} recently)", count(verdict.occurrences, "time")).dimmed()
            );
        } else {
            println!(
                "{} {}",
                "Held back:".truecolor(0xFF, 0xA5, 0x00).bold(),
                verdict.reason.as_deref().unwrap_or("shown too often recently")
            );
        }
    }

    pub fn print_view_help() {
        println!("{}", VIEW_HELP.dimmed());
    }
}

fn count(n: usize, noun: &str) -> String {
    format!("{} {}{}", n, noun, if n == 1 { "" } else { "s" })
}

fn format_timestamp(timestamp: i64) -> String {
    use chrono::{DateTime, Utc};

    let diff = Utc::now().timestamp() - timestamp;

    if diff < 60 {
        "just now".to_string()
    } else if diff < 3600 {
        let mins = diff / 60;
        format!("{} min{} ago", mins, if mins == 1 { "" } else { "s" })
    } else if diff < 86400 {
        let hours = diff / 3600;
        format!("{} hour{} ago", hours, if hours == 1 { "" } else { "s" })
    } else if diff < 604800 {
        let days = diff / 86400;
        format!("{} day{} ago", days, if days == 1 { "" } else { "s" })
    } else {
        DateTime::<Utc>::from_timestamp(timestamp, 0)
            .map(|dt| dt.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "a long time ago".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::ViewCommand;
    use chrono::Utc;

    #[test]
    fn test_view_help_lists_every_command() {
        for input in ["n", "h", "l", "a https://a.example", "c", "?", "q"] {
            assert!(ViewCommand::parse(input).is_some(), "{} not accepted", input);
        }
        for key in ["Enter/n:", "h:", "l:", "a <URL>:", "c:", "?:", "q:"] {
            assert!(VIEW_HELP.contains(key), "help is missing {}", key);
        }
    }

    #[test]
    fn test_format_timestamp() {
        let now = Utc::now().timestamp();
        assert_eq!(format_timestamp(now), "just now");
        assert_eq!(format_timestamp(now - 60), "1 min ago");
        assert_eq!(format_timestamp(now - 2 * 3600), "2 hours ago");
        assert_eq!(format_timestamp(now - 86400), "1 day ago");
        assert_eq!(format_timestamp(0), "1970-01-01");
    }

    #[test]
    fn test_count() {
        assert_eq!(count(1, "URL"), "1 URL");
        assert_eq!(count(3, "time"), "3 times");
    }
}
