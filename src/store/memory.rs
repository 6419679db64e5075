use super::{
    apply_create, apply_remove, apply_replace, merge_unique, HistoryStore, OwnerScope, UrlStore,
};
use crate::error::Result;
use crate::link::Link;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::Mutex;

const SNAPSHOT_OWNER: &str = "_snapshot";

/// In-process store. Clones share the same data, so one instance can be
/// handed to several viewers the way a browser shares its local storage.
#[derive(Clone, Default)]
pub struct MemoryStore {
    urls: Arc<Mutex<BTreeMap<String, Vec<Link>>>>,
    history: Arc<Mutex<BTreeMap<String, Vec<Link>>>>,
}

impl MemoryStore {
    /// Store pre-populated with `urls` for the given owner
    #[cfg(test)]
    pub async fn seeded(scope: &OwnerScope, urls: Vec<Link>) -> Result<Self> {
        let store = Self::default();
        for link in urls {
            store.create(scope, link).await?;
        }
        Ok(store)
    }

    /// In-memory copy of one scope's current state, for runs that must not
    /// write anything back. An aggregate list is kept as a single owner.
    pub fn snapshot(scope: &OwnerScope, urls: Vec<Link>, history: Vec<Link>) -> Self {
        let owner = scope.owner_key().unwrap_or(SNAPSHOT_OWNER).to_string();
        Self {
            urls: Arc::new(Mutex::new(BTreeMap::from([(owner, urls)]))),
            history: Arc::new(Mutex::new(BTreeMap::from([(
                scope.history_key().to_string(),
                history,
            )]))),
        }
    }
}

impl UrlStore for MemoryStore {
    async fn list(&self, scope: &OwnerScope) -> Result<Vec<Link>> {
        let urls = self.urls.lock().await;
        Ok(match scope.owner_key() {
            Some(key) => urls.get(key).cloned().unwrap_or_default(),
            None => merge_unique(urls.values().cloned()),
        })
    }

    async fn create(&self, scope: &OwnerScope, link: Link) -> Result<()> {
        let key = scope.writable_key()?;
        let mut urls = self.urls.lock().await;
        apply_create(urls.entry(key.to_string()).or_default(), link)
    }

    async fn remove(&self, scope: &OwnerScope, link: &Link) -> Result<bool> {
        let key = scope.writable_key()?;
        let mut urls = self.urls.lock().await;
        let removed = urls
            .get_mut(key)
            .map(|list| apply_remove(list, link))
            .unwrap_or(false);
        if !removed {
            tracing::warn!(url = %link, scope = %scope, "URL to delete not found");
        }
        Ok(removed)
    }

    async fn replace(&self, scope: &OwnerScope, old: &Link, new: Link) -> Result<()> {
        let key = scope.writable_key()?;
        let mut urls = self.urls.lock().await;
        apply_replace(urls.entry(key.to_string()).or_default(), old, new)
    }
}

impl HistoryStore for MemoryStore {
    async fn load(&self, scope: &OwnerScope) -> Result<Vec<Link>> {
        let history = self.history.lock().await;
        Ok(history.get(scope.history_key()).cloned().unwrap_or_default())
    }

    async fn save(&self, scope: &OwnerScope, history: &[Link]) -> Result<()> {
        self.history
            .lock()
            .await
            .insert(scope.history_key().to_string(), history.to_vec());
        Ok(())
    }
}
