//! Core types for playlist-dl

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Canonical playlist identifier extracted from a reference string
///
/// Immutable once derived. The token is opaque to the pipeline; only the
/// playlist source gives it meaning.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlaylistId(String);

impl PlaylistId {
    /// Create a new PlaylistId from a raw token
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the inner token
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PlaylistId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for PlaylistId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Opaque reference to a specific downloadable media item
///
/// Returned by the media provider's search and consumed by its download
/// operation. Ephemeral: valid only within the run that obtained it, never
/// persisted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MediaLocator(String);

impl MediaLocator {
    /// Create a new MediaLocator from a provider-specific reference
    pub fn new(locator: impl Into<String>) -> Self {
        Self(locator.into())
    }

    /// Get the inner reference string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for MediaLocator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One track's metadata snapshot, taken at collection time
///
/// Owned solely by the pipeline run that collected it; never mutated after
/// collection.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Track {
    /// Track title
    pub title: String,
    /// Ordered artist names (non-empty for playable tracks)
    pub artists: Vec<String>,
    /// Album name
    pub album: String,
    /// Track duration in milliseconds
    pub duration_ms: u64,
    /// Source popularity score, when the source reports one
    #[serde(default)]
    pub popularity: Option<u32>,
    /// Whether the source offers an audio preview for this track
    #[serde(default)]
    pub preview_available: bool,
}

/// Playlist-level metadata from the source
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistInfo {
    /// Playlist display name
    pub name: String,
    /// Owner display name
    pub owner: String,
    /// Total number of items the source reports for the playlist
    pub total_tracks: u64,
}

/// What kind of item a playlist slot holds
///
/// Sources can hold non-track items (episodes, removed content, local files).
/// Only `Track` items with a present payload are collected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    /// A playable track
    Track,
    /// Anything else the source can place in a playlist
    #[serde(other)]
    Other,
}

/// One raw playlist slot as reported by the source
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PageItem {
    /// The item kind
    pub kind: ItemKind,
    /// Track payload; absent for removed or unavailable items
    pub track: Option<Track>,
}

/// One page of playlist items plus the cursor for the next page
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TracksPage {
    /// Items in this page, in playlist order
    pub items: Vec<PageItem>,
    /// Cursor for the next page; `None` means this is the last page
    pub next_cursor: Option<String>,
}

/// Terminal result for one track, produced exactly once per run
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DownloadOutcome {
    /// Audio was fetched to the given path
    Success {
        /// Final path of the downloaded file, extension included
        path: PathBuf,
    },
    /// No candidate media was found for the track
    NotFound,
    /// A candidate was found but the fetch or transcode failed
    DownloadFailed {
        /// Why the download failed
        reason: String,
    },
}

impl DownloadOutcome {
    /// Whether this outcome counts as a success in the run report
    pub fn is_success(&self) -> bool {
        matches!(self, DownloadOutcome::Success { .. })
    }
}

/// Final accounting for a completed run
///
/// Derived purely by folding the ordered outcome log; there is no other
/// source of truth. `successful + failed == total` always holds.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    /// Number of tracks processed
    pub total: usize,
    /// Number of tracks downloaded successfully
    pub successful: usize,
    /// Number of tracks that ended in `NotFound` or `DownloadFailed`
    pub failed: usize,
    /// Directory the run wrote into
    pub output_dir: PathBuf,
}

impl RunReport {
    /// Fold an outcome log into a report
    pub fn from_outcomes(outcomes: &[DownloadOutcome], output_dir: PathBuf) -> Self {
        let successful = outcomes.iter().filter(|o| o.is_success()).count();
        Self {
            total: outcomes.len(),
            successful,
            failed: outcomes.len() - successful,
            output_dir,
        }
    }

    /// An empty report for runs aborted before processing started
    pub fn empty(output_dir: PathBuf) -> Self {
        Self {
            total: 0,
            successful: 0,
            failed: 0,
            output_dir,
        }
    }
}

/// Pipeline events broadcast to subscribers
///
/// Advisory only: consumers may render progress from these, but the run
/// report is the only stable result of a run.
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Event {
    /// Metadata collection started for a playlist
    CollectionStarted {
        /// The playlist being collected
        id: PlaylistId,
    },

    /// Playlist-level metadata was resolved
    PlaylistResolved {
        /// Playlist display name
        name: String,
        /// Owner display name
        owner: String,
        /// Total items the source reports
        total_tracks: u64,
    },

    /// A track entered the per-track pipeline
    TrackStarted {
        /// Zero-based position in the playlist order
        index: usize,
        /// Number of tracks in the run
        total: usize,
        /// Display label ("Artist & Artist - Title")
        label: String,
    },

    /// The matcher selected a candidate for a track
    Matched {
        /// Zero-based position in the playlist order
        index: usize,
        /// The selected media locator
        locator: MediaLocator,
    },

    /// A track finished with a successful download
    TrackCompleted {
        /// Zero-based position in the playlist order
        index: usize,
        /// Final path of the downloaded file
        path: PathBuf,
    },

    /// A track finished with a failure outcome
    TrackFailed {
        /// Zero-based position in the playlist order
        index: usize,
        /// Failure description ("no match found", download error text)
        reason: String,
    },

    /// The run reached the reporting state
    RunComplete {
        /// The folded run report
        report: RunReport,
        /// When the run finished
        finished_at: chrono::DateTime<chrono::Utc>,
    },
}
