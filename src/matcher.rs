//! Candidate matching
//!
//! Submits a track's search query to the media provider and selects one
//! candidate locator. The selection policy is "first candidate in provider
//! order wins" — no secondary ranking and no duration or popularity
//! cross-check. The policy lives entirely in this module, so a scored
//! strategy can replace it behind the same contract without touching the
//! rest of the pipeline.

use crate::provider::MediaProvider;
use crate::types::MediaLocator;

/// Find the media locator to download for a search query
///
/// Issues a bounded search (`max_candidates` results) and returns the first
/// candidate. Returns `None` when the provider returns zero candidates or
/// when the request itself fails: a provider-level failure is logged and
/// treated identically to an empty result, so a single bad query never halts
/// the run.
pub async fn find_match(
    provider: &dyn MediaProvider,
    query: &str,
    max_candidates: usize,
) -> Option<MediaLocator> {
    match provider.search(query, max_candidates).await {
        Ok(candidates) => {
            let selected = candidates.into_iter().next();
            if selected.is_none() {
                tracing::info!(query = %query, "No candidates found");
            }
            selected
        }
        Err(e) => {
            tracing::warn!(query = %query, error = %e, "Search failed, treating as no match");
            None
        }
    }
}
