use crate::error::{RandviewError, Result};

/// Attaches a human-readable step ("Failed to load URLs for local") to an
/// error while keeping the original condition reachable through `root()`.
pub trait ResultExt<T> {
    fn context(self, message: impl Into<String>) -> Result<T>;

    /// Like `context`, but only builds the message on failure
    fn with_context<F>(self, message: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<RandviewError>,
{
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.with_context(|| message.into())
    }

    fn with_context<F>(self, message: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| wrap(message(), e.into()))
    }
}

fn wrap(message: String, source: RandviewError) -> RandviewError {
    RandviewError::Context {
        message,
        source: Box::new(source),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_io_failure_keeps_its_root() {
        let result: io::Result<usize> = Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"));
        let err = result.context("Failed to read from stdin").unwrap_err();

        assert_eq!(
            err.to_string(),
            "Failed to read from stdin: IO error: closed"
        );
        assert!(matches!(err.root(), RandviewError::Io(_)));
        assert_eq!(err.hint(), None);
    }

    #[test]
    fn test_nested_context_reaches_store_failure() {
        let result: Result<()> = Err(RandviewError::SourceUnavailable("gone".to_string()));
        let err = result
            .with_context(|| format!("Failed to load history for {}", "local"))
            .context("Next URL")
            .unwrap_err();

        assert!(err.to_string().starts_with("Next URL: Failed to load history for local"));
        assert!(matches!(err.root(), RandviewError::SourceUnavailable(_)));
        assert!(err.hint().is_some());
    }

    #[test]
    fn test_message_is_built_only_on_failure() {
        let ok: Result<u8> = Ok(3);
        let value = ok
            .with_context(|| panic!("message built for a success"))
            .unwrap();
        assert_eq!(value, 3);
    }
}
