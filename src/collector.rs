//! Track collection
//!
//! Walks the playlist source's pages from the first cursor to the last and
//! assembles the ordered track list for a run. The page sequence is finite
//! and non-restartable: each cursor is fetched once, in order.

use crate::config::RetryConfig;
use crate::error::{Error, Result};
use crate::retry::with_retry;
use crate::source::PlaylistSource;
use crate::types::{ItemKind, PlaylistId, Track};

/// Collect the full ordered track list for a playlist
///
/// An item is included iff the source reports it as a playable track with a
/// present payload; every other item (episodes, removed content, null slots)
/// is silently skipped without counting. Pagination continues while the
/// source reports a next cursor.
///
/// Transient page fetch failures are retried per `retry`; once retries are
/// exhausted the whole collection fails with [`Error::CollectionFailed`] —
/// deliberately no partial lists, a half-collected playlist would silently
/// truncate the run.
pub async fn collect_tracks(
    source: &dyn PlaylistSource,
    id: &PlaylistId,
    retry: &RetryConfig,
) -> Result<Vec<Track>> {
    let mut tracks = Vec::new();
    let mut cursor: Option<String> = None;
    let mut page_count = 0usize;

    loop {
        let page = with_retry(retry, || source.tracks_page(id, cursor.as_deref()))
            .await
            .map_err(|e| Error::CollectionFailed(e.to_string()))?;
        page_count += 1;

        let page_total = page.items.len();
        let mut page_playable = 0usize;
        for item in page.items {
            if item.kind == ItemKind::Track
                && let Some(track) = item.track
            {
                tracks.push(track);
                page_playable += 1;
            }
        }

        tracing::debug!(
            playlist_id = %id,
            page = page_count,
            items = page_total,
            playable = page_playable,
            "Collected playlist page"
        );

        match page.next_cursor {
            Some(next) => cursor = Some(next),
            None => break,
        }
    }

    tracing::info!(
        playlist_id = %id,
        tracks = tracks.len(),
        pages = page_count,
        "Track collection complete"
    );

    Ok(tracks)
}
