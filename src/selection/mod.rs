//! Recency-aware random selection.
//!
//! Given the candidate URLs and the recent history (most recent first), pick
//! the next URL to show while steering away from what was just shown. The
//! engine is pure: it borrows its inputs and returns a fresh history, leaving
//! persistence to the caller.

mod exclusion;
mod frequency;

pub use frequency::{limit_frequency, FrequencyVerdict};

use crate::error::{RandviewError, Result};
use crate::link::Link;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Number of recently shown URLs kept by default
pub const DEFAULT_HISTORY_SIZE: usize = 10;

/// How repeats are avoided. Exactly one policy is in force per run.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum SelectionPolicy {
    /// Skip URLs that already appear `F` times in the history. When every
    /// candidate is overexposed, pick at random and let old entries age out.
    #[default]
    Frequency,
    /// Skip any URL present in the history. When nothing is left, pick at
    /// random and start the history over.
    Exclusion,
}

impl SelectionPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            SelectionPolicy::Frequency => "frequency",
            SelectionPolicy::Exclusion => "exclusion",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionParams {
    pub policy: SelectionPolicy,
    /// Maximum history length `H`
    pub history_size: usize,
    /// Fixed frequency cap; derived from the candidate count when `None`
    pub frequency_cap: Option<usize>,
}

impl Default for SelectionParams {
    fn default() -> Self {
        Self {
            policy: SelectionPolicy::default(),
            history_size: DEFAULT_HISTORY_SIZE,
            frequency_cap: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub chosen: Link,
    /// History after the pick, most recent first
    pub history: Vec<Link>,
    /// Set when no candidate satisfied the repeat constraint
    pub used_fallback: bool,
}

/// Default cap: a third of the candidates, never below one.
pub fn frequency_cap(candidate_count: usize) -> usize {
    (candidate_count / 3).max(1)
}

/// Cap actually applied for a call; a supplied zero is treated as one.
pub fn effective_cap(supplied: Option<usize>, candidate_count: usize) -> usize {
    supplied
        .map(|cap| cap.max(1))
        .unwrap_or_else(|| frequency_cap(candidate_count))
}

pub fn select<R: Rng + ?Sized>(
    candidates: &[Link],
    history: &[Link],
    params: &SelectionParams,
    rng: &mut R,
) -> Result<Selection> {
    if candidates.is_empty() {
        return Err(RandviewError::EmptyCandidateSet);
    }

    let (chosen, base_history, used_fallback) = match params.policy {
        SelectionPolicy::Frequency => {
            let cap = effective_cap(params.frequency_cap, candidates.len());
            let (chosen, used_fallback) = frequency::pick(candidates, history, cap, rng);
            (chosen, history, used_fallback)
        }
        SelectionPolicy::Exclusion => {
            let (chosen, used_fallback) = exclusion::pick(candidates, history, rng);
            let base: &[Link] = if used_fallback { &[] } else { history };
            (chosen, base, used_fallback)
        }
    };

    let history = push_history(base_history, &chosen, params.history_size);

    tracing::debug!(
        chosen = %chosen,
        policy = params.policy.as_str(),
        candidates = candidates.len(),
        history_len = history.len(),
        used_fallback,
        "selected next url"
    );

    Ok(Selection {
        chosen,
        history,
        used_fallback,
    })
}

/// Uniform pick; callers have already rejected an empty slice
fn uniform<R: Rng + ?Sized>(candidates: &[Link], rng: &mut R) -> Link {
    debug_assert!(!candidates.is_empty());
    candidates[rng.random_range(0..candidates.len())].clone()
}

/// New history with `link` at the front, truncated to `max_len` entries.
pub fn push_history(history: &[Link], link: &Link, max_len: usize) -> Vec<Link> {
    std::iter::once(link)
        .chain(history.iter())
        .take(max_len)
        .cloned()
        .collect()
}
