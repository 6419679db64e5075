use crate::error::{RandviewError, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use url::Url;

const ALLOWED_SCHEMES: &[&str] = &["http", "https"];

/// A validated absolute web address.
///
/// Equality is exact and case-sensitive on the text the user entered (after
/// trimming), not on the normalized form `url` would produce. Two entries
/// that only differ in host case are two different links.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Link(String);

impl Link {
    pub fn parse(text: &str) -> Result<Self> {
        let text = text.trim();
        if text.is_empty() {
            return Err(RandviewError::InvalidUrl("URL is empty".to_string()));
        }

        let parsed = Url::parse(text)
            .map_err(|e| RandviewError::InvalidUrl(format!("'{}': {}", text, e)))?;

        if !ALLOWED_SCHEMES.contains(&parsed.scheme()) {
            return Err(RandviewError::InvalidUrl(format!(
                "'{}': unsupported scheme '{}' (expected http or https)",
                text,
                parsed.scheme()
            )));
        }

        if parsed.host_str().map_or(true, str::is_empty) {
            return Err(RandviewError::InvalidUrl(format!("'{}': missing host", text)));
        }

        Ok(Self(text.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for Link {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Link {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Link::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// Rejects `candidate` if it is already in `existing`.
///
/// `replacing` names the entry being edited; editing an entry to its own
/// value is allowed.
pub fn ensure_unique(existing: &[Link], candidate: &Link, replacing: Option<&Link>) -> Result<()> {
    if replacing == Some(candidate) {
        return Ok(());
    }
    if existing.contains(candidate) {
        return Err(RandviewError::DuplicateUrl(candidate.to_string()));
    }
    Ok(())
}
