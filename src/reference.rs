//! Playlist reference parsing
//!
//! A playlist reference is whatever the user pasted: a share URL
//! (`https://music.example.com/playlist/abc123?si=...`) or a URI
//! (`service:playlist:abc123`). Extraction applies an ordered list of
//! recognized shapes and returns the first captured token.

use regex::Regex;
use std::sync::LazyLock;

use crate::error::{Error, Result};
use crate::types::PlaylistId;

/// Recognized reference shapes, tried in order. The URL path form is checked
/// before the URI form so a URL containing both separators resolves the same
/// way every time.
static REFERENCE_SHAPES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [r"playlist/([A-Za-z0-9]+)", r"playlist:([A-Za-z0-9]+)"]
        .iter()
        .map(|pattern| Regex::new(pattern).unwrap_or_else(|e| panic!("invalid shape regex: {e}")))
        .collect()
});

/// Extract the canonical playlist identifier from a reference string
///
/// Returns the first structural match's captured token. Fails with
/// [`Error::InvalidReference`] when no shape matches; the orchestrator treats
/// that as fatal before any network activity.
///
/// # Examples
///
/// ```
/// use playlist_dl::reference::extract;
///
/// let id = extract("https://music.example.com/playlist/37i9dQZF1DXcBWIGoYBM5M").unwrap();
/// assert_eq!(id.as_str(), "37i9dQZF1DXcBWIGoYBM5M");
///
/// assert!(extract("not-a-url").is_err());
/// ```
pub fn extract(reference: &str) -> Result<PlaylistId> {
    for shape in REFERENCE_SHAPES.iter() {
        if let Some(captures) = shape.captures(reference)
            && let Some(token) = captures.get(1)
        {
            return Ok(PlaylistId::new(token.as_str()));
        }
    }
    Err(Error::InvalidReference(reference.to_string()))
}
