//! Filename derivation
//!
//! Builds the filesystem-safe stem for a track's output file: artists joined
//! with " & ", a literal " - ", then the title. Each metadata field is
//! stripped to alphanumerics, whitespace, and hyphens before assembly, so the
//! joiner itself survives while path-hostile characters in names do not. The
//! strip rule is the same character class the query builder uses, applied
//! independently on purpose — the two strings differ in artist joiner and
//! must not be unified into one value.
//!
//! Two distinct tracks can sanitize to the same stem, in which case the later
//! download silently overwrites the earlier file. Documented limitation.

use crate::types::Track;

fn strip_field(field: &str) -> String {
    field
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace() || *c == '-')
        .collect()
}

/// Derive the deterministic, filesystem-safe filename stem for a track
///
/// The extension is not part of the stem; the media provider appends it based
/// on the transcode target.
///
/// # Examples
///
/// ```
/// use playlist_dl::naming::sanitize_filename;
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
/// assert_eq!(sanitize_filename(&track), "A & B - Song");
/// ```
pub fn sanitize_filename(track: &Track) -> String {
    let artists = track
        .artists
        .iter()
        .map(|artist| strip_field(artist))
        .collect::<Vec<_>>()
        .join(" & ");
    format!("{} - {}", artists, strip_field(&track.title))
}
