use super::uniform;
use crate::link::Link;
use rand::seq::IndexedRandom;
use rand::Rng;
use std::collections::HashSet;

/// Pick uniformly among candidates absent from the history. When all of them
/// were shown recently, pick from everything and report the fallback so the
/// caller starts the history over.
///
/// `candidates` must be non-empty.
pub(super) fn pick<R: Rng + ?Sized>(
    candidates: &[Link],
    history: &[Link],
    rng: &mut R,
) -> (Link, bool) {
    let recent: HashSet<&Link> = history.iter().collect();
    let available: Vec<&Link> = candidates.iter().filter(|c| !recent.contains(c)).collect();

    if let Some(found) = available.choose(rng) {
        return ((*found).clone(), false);
    }

    tracing::warn!(
        candidates = candidates.len(),
        "every candidate was shown recently, resetting history"
    );
    (uniform(candidates, rng), true)
}
