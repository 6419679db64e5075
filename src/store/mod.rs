pub mod file;
pub mod memory;

#[cfg(test)]
mod tests;

pub use file::FileStore;
pub use memory::MemoryStore;

use crate::error::{RandviewError, Result};
use crate::link::Link;
use std::fmt;
use std::future::Future;

const LOCAL_OWNER: &str = "local";

/// Whose URLs and history an operation touches
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum OwnerScope {
    /// The single implicit owner of a local-only installation
    Local,
    User(String),
    /// Read-only union over every owner
    All,
}

impl OwnerScope {
    pub fn user(id: &str) -> Result<Self> {
        validate_owner_id(id)?;
        Ok(OwnerScope::User(id.to_string()))
    }

    /// Key of the owner's own records; `None` for the aggregate scope
    pub fn owner_key(&self) -> Option<&str> {
        match self {
            OwnerScope::Local => Some(LOCAL_OWNER),
            OwnerScope::User(id) => Some(id),
            OwnerScope::All => None,
        }
    }

    /// Key under which this scope's history is kept
    pub fn history_key(&self) -> &str {
        self.owner_key().unwrap_or("_all")
    }

    pub fn is_read_only(&self) -> bool {
        matches!(self, OwnerScope::All)
    }

    fn writable_key(&self) -> Result<&str> {
        self.owner_key().ok_or(RandviewError::ReadOnlyScope)
    }
}

impl fmt::Display for OwnerScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OwnerScope::Local => write!(f, "local"),
            OwnerScope::User(id) => write!(f, "user '{}'", id),
            OwnerScope::All => write!(f, "all owners"),
        }
    }
}

fn validate_owner_id(id: &str) -> Result<()> {
    if id.is_empty() {
        return Err(RandviewError::InvalidOwner("owner id is empty".to_string()));
    }
    if id == LOCAL_OWNER || id.starts_with('_') {
        return Err(RandviewError::InvalidOwner(format!("'{}' is reserved", id)));
    }
    if !id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(RandviewError::InvalidOwner(format!(
            "'{}' may only contain letters, digits, '-' and '_'",
            id
        )));
    }
    Ok(())
}

/// Persistent URL list, one per owner.
///
/// Implementations validate uniqueness before writing and leave the list
/// untouched on failure. Mutating [`OwnerScope::All`] fails with
/// `ReadOnlyScope`. Backend failures surface as `SourceUnavailable`.
pub trait UrlStore {
    fn list(&self, scope: &OwnerScope) -> impl Future<Output = Result<Vec<Link>>>;

    fn create(&self, scope: &OwnerScope, link: Link) -> impl Future<Output = Result<()>>;

    /// Returns whether anything was removed; removing an absent URL is not an error.
    fn remove(&self, scope: &OwnerScope, link: &Link) -> impl Future<Output = Result<bool>>;

    fn replace(&self, scope: &OwnerScope, old: &Link, new: Link)
        -> impl Future<Output = Result<()>>;

    /// Unix time of the last change to the scope's list, when the backend tracks it
    fn last_updated(&self, scope: &OwnerScope) -> impl Future<Output = Result<Option<i64>>> {
        let _ = scope;
        async { Ok(None) }
    }
}

/// Persistent recent history, most recent first
pub trait HistoryStore {
    fn load(&self, scope: &OwnerScope) -> impl Future<Output = Result<Vec<Link>>>;

    fn save(&self, scope: &OwnerScope, history: &[Link]) -> impl Future<Output = Result<()>>;
}

/// Adds `link` to `urls`, checking uniqueness first.
pub(crate) fn apply_create(urls: &mut Vec<Link>, link: Link) -> Result<()> {
    crate::link::ensure_unique(urls, &link, None)?;
    urls.push(link);
    Ok(())
}

pub(crate) fn apply_remove(urls: &mut Vec<Link>, link: &Link) -> bool {
    let before = urls.len();
    urls.retain(|u| u != link);
    urls.len() != before
}

/// Replaces `old` with `new` in place, keeping its position.
pub(crate) fn apply_replace(urls: &mut [Link], old: &Link, new: Link) -> Result<()> {
    let pos = urls
        .iter()
        .position(|u| u == old)
        .ok_or_else(|| RandviewError::UrlNotFound(old.to_string()))?;
    crate::link::ensure_unique(urls, &new, Some(old))?;
    urls[pos] = new;
    Ok(())
}

/// Union of several owners' lists, first occurrence wins
pub(crate) fn merge_unique<I>(lists: I) -> Vec<Link>
where
    I: IntoIterator<Item = Vec<Link>>,
{
    let mut seen = std::collections::HashSet::new();
    let mut merged = Vec::new();
    for link in lists.into_iter().flatten() {
        if seen.insert(link.clone()) {
            merged.push(link);
        }
    }
    merged
}
