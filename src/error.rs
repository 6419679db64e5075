use thiserror::Error;

#[derive(Error, Debug)]
pub enum RandviewError {
    #[error("No URLs available")]
    EmptyCandidateSet,

    #[error("URL source unavailable: {0}")]
    SourceUnavailable(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("URL is already in the list: {0}")]
    DuplicateUrl(String),

    #[error("URL not found: {0}")]
    UrlNotFound(String),

    #[error("The aggregate view of all owners is read-only")]
    ReadOnlyScope,

    #[error("Invalid owner id: {0}")]
    InvalidOwner(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{message}: {source}")]
    Context {
        message: String,
        #[source]
        source: Box<RandviewError>,
    },
}

impl RandviewError {
    /// Strips `Context` wrappers to reach the underlying condition
    pub fn root(&self) -> &RandviewError {
        match self {
            RandviewError::Context { source, .. } => source.root(),
            other => other,
        }
    }

    /// What the user should do about it, if there is anything to say
    pub fn hint(&self) -> Option<&'static str> {
        match self.root() {
            RandviewError::EmptyCandidateSet => Some("Add some URLs first: randview add <URL>"),
            RandviewError::SourceUnavailable(_) => Some("Check the data directory and try again"),
            RandviewError::InvalidUrl(_) => {
                Some("Please enter a valid URL (e.g., https://example.com)")
            }
            RandviewError::ReadOnlyScope => Some("Drop --all to edit your own list"),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, RandviewError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_unwraps_context() {
        let err = RandviewError::Context {
            message: "Failed to load".to_string(),
            source: Box::new(RandviewError::Context {
                message: "inner".to_string(),
                source: Box::new(RandviewError::EmptyCandidateSet),
            }),
        };

        assert!(matches!(err.root(), RandviewError::EmptyCandidateSet));
        assert_eq!(err.hint(), Some("Add some URLs first: randview add <URL>"));
    }

    #[test]
    fn test_source_unavailable_is_distinct_from_empty() {
        let err = RandviewError::SourceUnavailable("disk".to_string());
        assert!(!matches!(err.root(), RandviewError::EmptyCandidateSet));
        assert!(err.hint().unwrap().contains("try again"));
    }
}
