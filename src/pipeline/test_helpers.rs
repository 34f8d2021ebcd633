//! Shared test helpers for exercising the pipeline with mock capabilities.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::Mutex;
use std::time::Duration;

use crate::config::{Config, QualityConfig, RetryConfig};
use crate::error::{Error, Result};
use crate::pipeline::PlaylistDownloader;
use crate::provider::MediaProvider;
use crate::source::PlaylistSource;
use crate::types::{
    ItemKind, MediaLocator, PageItem, PlaylistId, PlaylistInfo, Track, TracksPage,
};

/// Build a metadata snapshot for tests
pub(crate) fn make_track(title: &str, artists: &[&str]) -> Track {
    Track {
        title: title.to_string(),
        artists: artists.iter().map(|a| a.to_string()).collect(),
        album: "Album".to_string(),
        duration_ms: 180_000,
        popularity: Some(40),
        preview_available: false,
    }
}

/// Playlist source serving a fixed track list in pages of `page_size`
pub(crate) struct MockPlaylistSource {
    pub(crate) tracks: Vec<Track>,
    pub(crate) page_size: usize,
    pub(crate) fail_pages: bool,
    pub(crate) fail_info: bool,
}

impl MockPlaylistSource {
    pub(crate) fn with_tracks(tracks: Vec<Track>) -> Self {
        Self {
            tracks,
            page_size: 2,
            fail_pages: false,
            fail_info: false,
        }
    }
}

#[async_trait]
impl PlaylistSource for MockPlaylistSource {
    async fn playlist_info(&self, _id: &PlaylistId) -> Result<PlaylistInfo> {
        if self.fail_info {
            return Err(Error::Source("playlist lookup failed".to_string()));
        }
        Ok(PlaylistInfo {
            name: "Mock Playlist".to_string(),
            owner: "Mock Owner".to_string(),
            total_tracks: self.tracks.len() as u64,
        })
    }

    async fn tracks_page(&self, _id: &PlaylistId, cursor: Option<&str>) -> Result<TracksPage> {
        if self.fail_pages {
            return Err(Error::Source("page fetch failed".to_string()));
        }
        let offset: usize = cursor.map(|c| c.parse().unwrap()).unwrap_or(0);
        let end = (offset + self.page_size).min(self.tracks.len());
        let items = self.tracks[offset..end]
            .iter()
            .map(|t| PageItem {
                kind: ItemKind::Track,
                track: Some(t.clone()),
            })
            .collect();
        let next_cursor = (end < self.tracks.len()).then(|| end.to_string());
        Ok(TracksPage { items, next_cursor })
    }

    fn name(&self) -> &str {
        "mock"
    }
}

/// Media provider with scripted per-title behavior
///
/// Queries containing a title listed in `unmatched` return zero candidates;
/// titles listed in `failing` match but fail to download. Everything else
/// downloads by writing an empty `.mp3` file where the template points.
#[derive(Default)]
pub(crate) struct MockMediaProvider {
    pub(crate) unmatched: Vec<String>,
    pub(crate) failing: Vec<String>,
    pub(crate) searches: Mutex<Vec<String>>,
    pub(crate) downloads: Mutex<Vec<MediaLocator>>,
}

#[async_trait]
impl MediaProvider for MockMediaProvider {
    async fn search(&self, query: &str, _max_results: usize) -> Result<Vec<MediaLocator>> {
        self.searches.lock().unwrap().push(query.to_string());
        if self.unmatched.iter().any(|t| query.contains(t.as_str())) {
            return Ok(vec![]);
        }
        Ok(vec![
            MediaLocator::new(format!("mock://{query}")),
            MediaLocator::new(format!("mock://{query}/second")),
        ])
    }

    async fn download(
        &self,
        locator: &MediaLocator,
        target_template: &Path,
        _quality: &QualityConfig,
    ) -> Result<PathBuf> {
        self.downloads.lock().unwrap().push(locator.clone());
        if self.failing.iter().any(|t| locator.as_str().contains(t.as_str())) {
            return Err(Error::ExternalTool("transcode failed".to_string()));
        }
        let path = PathBuf::from(
            target_template
                .to_string_lossy()
                .replace("%(ext)s", "mp3"),
        );
        tokio::fs::write(&path, b"").await?;
        Ok(path)
    }

    fn name(&self) -> &str {
        "mock"
    }
}

/// Config tuned for fast tests: no throttle delay, single retry attempt
pub(crate) fn test_config(output_dir: &Path) -> Config {
    let mut config = Config::default();
    config.download.output_dir = output_dir.to_path_buf();
    config.download.track_delay = Duration::ZERO;
    config.retry = RetryConfig {
        max_attempts: 1,
        initial_delay: Duration::from_millis(1),
        max_delay: Duration::from_millis(1),
        backoff_multiplier: 1.0,
        jitter: false,
    };
    config
}

/// Helper to create a pipeline over mock capabilities.
/// Returns the pipeline and the tempdir (which must be kept alive).
pub(crate) fn create_test_pipeline(
    source: MockPlaylistSource,
    provider: MockMediaProvider,
) -> (PlaylistDownloader, Arc<MockMediaProvider>, tempfile::TempDir) {
    let temp_dir = tempfile::tempdir().unwrap();
    let config = test_config(&temp_dir.path().join("downloads"));
    let provider = Arc::new(provider);
    let pipeline =
        PlaylistDownloader::new(config, Arc::new(source), provider.clone()).unwrap();
    (pipeline, provider, temp_dir)
}
