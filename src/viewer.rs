use crate::error::Result;
use crate::error_ext::ResultExt;
use crate::link::Link;
use crate::selection::{self, effective_cap, FrequencyVerdict, Selection, SelectionParams};
use crate::store::{HistoryStore, OwnerScope, UrlStore};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// "Get the next URL to show" for one owner scope.
///
/// The viewer only wires a candidate+history source to the selection
/// engine; it works the same over any store.
pub struct Viewer<S> {
    store: S,
    scope: OwnerScope,
    params: SelectionParams,
    rng: StdRng,
}

impl<S> Viewer<S>
where
    S: UrlStore + HistoryStore,
{
    pub fn new(store: S, scope: OwnerScope, params: SelectionParams) -> Self {
        Self::with_rng(store, scope, params, StdRng::from_os_rng())
    }

    pub fn with_rng(store: S, scope: OwnerScope, params: SelectionParams, rng: StdRng) -> Self {
        Self {
            store,
            scope,
            params,
            rng,
        }
    }

    pub fn scope(&self) -> &OwnerScope {
        &self.scope
    }

    pub fn params(&self) -> &SelectionParams {
        &self.params
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Loads candidates and history, picks, and saves the new history.
    ///
    /// Nothing is written when there is nothing to pick from.
    pub async fn next(&mut self) -> Result<Selection> {
        let (candidates, history) = self.load().await?;
        let selection = self.select_from(&candidates, &history)?;

        self.store
            .save(&self.scope, &selection.history)
            .await
            .with_context(|| format!("Failed to save history for {}", self.scope))?;

        Ok(selection)
    }

    /// Picks from caller-supplied data without touching the store
    pub fn select_from(&mut self, candidates: &[Link], history: &[Link]) -> Result<Selection> {
        selection::select(candidates, history, &self.params, &mut self.rng)
    }

    pub async fn history(&self) -> Result<Vec<Link>> {
        self.store
            .load(&self.scope)
            .await
            .with_context(|| format!("Failed to load history for {}", self.scope))
    }

    pub async fn clear_history(&self) -> Result<()> {
        self.store
            .save(&self.scope, &[])
            .await
            .with_context(|| format!("Failed to clear history for {}", self.scope))?;
        tracing::info!(scope = %self.scope, "history cleared");
        Ok(())
    }

    /// Whether `link` would currently pass the frequency limit
    pub async fn check(&self, link: &Link) -> Result<FrequencyVerdict> {
        let (candidates, history) = self.load().await?;
        let cap = effective_cap(self.params.frequency_cap, candidates.len());
        Ok(selection::limit_frequency(link, &history, cap))
    }

    async fn load(&self) -> Result<(Vec<Link>, Vec<Link>)> {
        let candidates = async {
            self.store
                .list(&self.scope)
                .await
                .with_context(|| format!("Failed to load URLs for {}", self.scope))
        };
        let history = async {
            self.store
                .load(&self.scope)
                .await
                .with_context(|| format!("Failed to load history for {}", self.scope))
        };
        futures::try_join!(candidates, history)
    }
}
