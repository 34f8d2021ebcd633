//! Media search and download providers
//!
//! A [`MediaProvider`] is the capability that resolves a search query into
//! candidate media locators and fetches audio for a chosen locator. The
//! bundled [`CliMediaProvider`] drives an external yt-dlp-compatible binary;
//! anything implementing the trait plugs into the same pipeline.

mod cli;

pub use cli::CliMediaProvider;

use async_trait::async_trait;
use std::path::{Path, PathBuf};

use crate::config::QualityConfig;
use crate::error::Result;
use crate::types::MediaLocator;

/// Capability for searching and downloading media
///
/// # Errors
///
/// Both operations may fail at the provider level (network error, tool
/// failure). Callers decide what a failure means: the matcher treats a search
/// failure as zero candidates, the executor converts a download failure into
/// a per-track outcome. Neither escalates past the track boundary.
#[async_trait]
pub trait MediaProvider: Send + Sync {
    /// Search for candidate media matching a query
    ///
    /// Returns up to `max_results` locators in provider-preferred order.
    /// An empty vector is a valid result (nothing matched).
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<MediaLocator>>;

    /// Fetch and transcode audio for a locator
    ///
    /// # Arguments
    ///
    /// * `locator` - A locator previously returned by [`search`](Self::search)
    /// * `target_template` - Output path template ending in the provider's
    ///   extension placeholder; the provider substitutes the real extension
    /// * `quality` - Target codec and bitrate for the transcode step
    ///
    /// # Returns
    ///
    /// The final path of the written file, extension included.
    async fn download(
        &self,
        locator: &MediaLocator,
        target_template: &Path,
        quality: &QualityConfig,
    ) -> Result<PathBuf>;

    /// Name of this provider implementation (for logging)
    fn name(&self) -> &str;
}
