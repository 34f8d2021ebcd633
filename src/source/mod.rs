//! Playlist metadata sources
//!
//! A [`PlaylistSource`] is the capability that turns a playlist identifier
//! into playlist-level metadata and pages of track records. The pipeline
//! never talks to a metadata backend directly; it drives this trait.

mod http;

pub use http::HttpPlaylistSource;

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{PlaylistId, PlaylistInfo, TracksPage};

/// Capability for fetching playlist metadata in pages
///
/// Implementations must be cheap to call repeatedly: the collector walks
/// pages one at a time, passing back each page's `next_cursor` until the
/// source reports no further page.
///
/// # Examples
///
/// ```no_run
/// use playlist_dl::source::{HttpPlaylistSource, PlaylistSource};
/// use playlist_dl::config::SourceConfig;
/// use playlist_dl::types::PlaylistId;
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let source = HttpPlaylistSource::new(&SourceConfig::default())?;
/// let info = source.playlist_info(&PlaylistId::new("abc123")).await?;
/// println!("{} ({} tracks)", info.name, info.total_tracks);
/// # Ok(())
/// # }
/// ```
#[async_trait]
pub trait PlaylistSource: Send + Sync {
    /// Fetch playlist-level metadata (name, owner, reported track total)
    async fn playlist_info(&self, id: &PlaylistId) -> Result<PlaylistInfo>;

    /// Fetch one page of playlist items
    ///
    /// # Arguments
    ///
    /// * `id` - The playlist to page through
    /// * `cursor` - `None` for the first page, otherwise the `next_cursor`
    ///   returned by the previous page
    async fn tracks_page(&self, id: &PlaylistId, cursor: Option<&str>) -> Result<TracksPage>;

    /// Name of this source implementation (for logging)
    fn name(&self) -> &str;
}
