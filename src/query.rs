//! Search query construction
//!
//! A search query is a pure function of a track's metadata: all artist names
//! space-joined, a literal " - ", then the title, stripped of everything that
//! is not alphanumeric, whitespace, or a hyphen. Punctuation in titles hurts
//! backend search relevance, so it goes.

use crate::types::Track;

/// Derive the normalized search string for a track
///
/// Pure and deterministic: identical input always yields the identical query.
/// An empty result (a title made entirely of stripped punctuation) is still
/// submitted as-is; the backend returns no results rather than this function
/// rejecting the track.
///
/// # Examples
///
/// ```
/// use playlist_dl::query::build_search_query;
/// use playlist_dl::types::Track;
///
/// let track = Track {
///     title: "Song!".to_string(),
///     artists: vec!["A".to_string(), "B".to_string()],
///     album: "Album".to_string(),
///     duration_ms: 180_000,
///     popularity: None,
///     preview_available: false,
/// };
/// assert_eq!(build_search_query(&track), "A B - Song");
/// ```
pub fn build_search_query(track: &Track) -> String {
    let artists = track.artists.join(" ");
    let raw = format!("{} - {}", artists, track.title);
    raw.chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace() || *c == '-')
        .collect()
}
