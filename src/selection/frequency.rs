use super::uniform;
use crate::link::Link;
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashMap;

/// Whether a URL may be shown again given how often it appears in the
/// recent history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyVerdict {
    pub should_display: bool,
    pub occurrences: usize,
    pub reason: Option<String>,
}

pub fn limit_frequency(url: &Link, recent: &[Link], max_frequency: usize) -> FrequencyVerdict {
    let max_frequency = max_frequency.max(1);
    let occurrences = recent.iter().filter(|r| *r == url).count();

    if is_overexposed(occurrences, max_frequency) {
        FrequencyVerdict {
            should_display: false,
            occurrences,
            reason: Some(format!(
                "'{}' was shown {} time{} recently, reaching the limit of {}",
                url,
                occurrences,
                if occurrences == 1 { "" } else { "s" },
                max_frequency
            )),
        }
    } else {
        FrequencyVerdict {
            should_display: true,
            occurrences,
            reason: None,
        }
    }
}

fn is_overexposed(occurrences: usize, cap: usize) -> bool {
    occurrences >= cap
}

/// Shuffle the candidates and take the first one seen fewer than `cap`
/// times; fall back to a uniform pick over all candidates.
///
/// `candidates` must be non-empty.
pub(super) fn pick<R: Rng + ?Sized>(
    candidates: &[Link],
    history: &[Link],
    cap: usize,
    rng: &mut R,
) -> (Link, bool) {
    let mut counts: HashMap<&Link, usize> = HashMap::new();
    for entry in history {
        *counts.entry(entry).or_default() += 1;
    }

    let mut order: Vec<&Link> = candidates.iter().collect();
    order.shuffle(rng);

    if let Some(found) = order
        .into_iter()
        .find(|link| !is_overexposed(counts.get(link).copied().unwrap_or(0), cap))
    {
        return (found.clone(), false);
    }

    tracing::warn!(
        candidates = candidates.len(),
        cap,
        "every candidate reached the frequency cap, picking at random"
    );
    (uniform(candidates, rng), true)
}
