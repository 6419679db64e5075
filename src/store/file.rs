use super::{
    apply_create, apply_remove, apply_replace, merge_unique, HistoryStore, OwnerScope, UrlStore,
};
use crate::error::{RandviewError, Result};
use crate::link::Link;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;

const URLS_DIR: &str = "urls";
const HISTORY_DIR: &str = "history";
const EXTENSION: &str = "json";

#[derive(Debug, Default, Serialize, Deserialize)]
struct UrlDocument {
    urls: Vec<Link>,
    #[serde(default)]
    updated_at: i64,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct HistoryDocument {
    entries: Vec<Link>,
    #[serde(default)]
    updated_at: i64,
}

/// JSON documents on disk, one URL list and one history per owner:
///
/// ```text
/// <data_dir>/urls/<owner>.json
/// <data_dir>/history/<owner>.json
/// ```
///
/// Writes go through a temporary file and a rename, so the last writer wins
/// when two sessions touch the same owner.
#[derive(Debug, Clone)]
pub struct FileStore {
    data_dir: PathBuf,
}

impl FileStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn urls_path(&self, key: &str) -> PathBuf {
        self.data_dir
            .join(URLS_DIR)
            .join(format!("{}.{}", key, EXTENSION))
    }

    fn history_path(&self, key: &str) -> PathBuf {
        self.data_dir
            .join(HISTORY_DIR)
            .join(format!("{}.{}", key, EXTENSION))
    }

    async fn read_urls(&self, key: &str) -> Result<UrlDocument> {
        read_document(&self.urls_path(key)).await
    }

    async fn write_urls(&self, key: &str, urls: Vec<Link>) -> Result<()> {
        let doc = UrlDocument {
            urls,
            updated_at: chrono::Utc::now().timestamp(),
        };
        write_document(&self.urls_path(key), &doc).await
    }

    /// Owner keys with a URL list on disk, sorted
    async fn owner_keys(&self) -> Result<Vec<String>> {
        let dir = self.data_dir.join(URLS_DIR);
        let mut entries = match fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(unavailable(&dir, e)),
        };

        let mut keys = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| unavailable(&dir, e))?
        {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                keys.push(stem.to_string());
            }
        }
        keys.sort();
        Ok(keys)
    }
}

impl UrlStore for FileStore {
    async fn list(&self, scope: &OwnerScope) -> Result<Vec<Link>> {
        if let Some(key) = scope.owner_key() {
            return Ok(self.read_urls(key).await?.urls);
        }

        let mut lists = Vec::new();
        for key in self.owner_keys().await? {
            lists.push(self.read_urls(&key).await?.urls);
        }
        Ok(merge_unique(lists))
    }

    async fn create(&self, scope: &OwnerScope, link: Link) -> Result<()> {
        let key = scope.writable_key()?;
        let mut urls = self.read_urls(key).await?.urls;
        apply_create(&mut urls, link)?;
        self.write_urls(key, urls).await
    }

    async fn remove(&self, scope: &OwnerScope, link: &Link) -> Result<bool> {
        let key = scope.writable_key()?;
        let mut urls = self.read_urls(key).await?.urls;
        if !apply_remove(&mut urls, link) {
            tracing::warn!(url = %link, scope = %scope, "URL to delete not found");
            return Ok(false);
        }
        self.write_urls(key, urls).await?;
        Ok(true)
    }

    async fn replace(&self, scope: &OwnerScope, old: &Link, new: Link) -> Result<()> {
        let key = scope.writable_key()?;
        let mut urls = self.read_urls(key).await?.urls;
        apply_replace(&mut urls, old, new)?;
        self.write_urls(key, urls).await
    }

    async fn last_updated(&self, scope: &OwnerScope) -> Result<Option<i64>> {
        let Some(key) = scope.owner_key() else {
            return Ok(None);
        };
        let doc = self.read_urls(key).await?;
        Ok((doc.updated_at > 0).then_some(doc.updated_at))
    }
}

impl HistoryStore for FileStore {
    async fn load(&self, scope: &OwnerScope) -> Result<Vec<Link>> {
        let doc: HistoryDocument = read_document(&self.history_path(scope.history_key())).await?;
        Ok(doc.entries)
    }

    async fn save(&self, scope: &OwnerScope, history: &[Link]) -> Result<()> {
        let doc = HistoryDocument {
            entries: history.to_vec(),
            updated_at: chrono::Utc::now().timestamp(),
        };
        write_document(&self.history_path(scope.history_key()), &doc).await
    }
}

fn unavailable(path: &Path, err: impl std::fmt::Display) -> RandviewError {
    RandviewError::SourceUnavailable(format!("{}: {}", path.display(), err))
}

/// Reads a JSON document; a missing file reads as the default document.
async fn read_document<T: DeserializeOwned + Default>(path: &Path) -> Result<T> {
    let content = match fs::read_to_string(path).await {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(T::default()),
        Err(e) => return Err(unavailable(path, e)),
    };
    serde_json::from_str(&content).map_err(|e| unavailable(path, e))
}

async fn write_document<T: Serialize>(path: &Path, doc: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .await
            .map_err(|e| unavailable(parent, e))?;
    }

    let content = serde_json::to_string_pretty(doc).map_err(|e| unavailable(path, e))?;
    let tmp = path.with_extension(format!("{}.tmp", EXTENSION));
    fs::write(&tmp, content)
        .await
        .map_err(|e| unavailable(&tmp, e))?;
    fs::rename(&tmp, path)
        .await
        .map_err(|e| unavailable(path, e))?;

    tracing::debug!(path = %path.display(), "wrote document");
    Ok(())
}
