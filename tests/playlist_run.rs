//! End-to-end pipeline tests: wiremock-backed playlist API, in-process media
//! provider that writes real files into a temp directory.

use async_trait::async_trait;
use serde_json::json;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::Mutex;
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use playlist_dl::config::{Config, QualityConfig, RetryConfig, SourceConfig};
use playlist_dl::{
    Error, HttpPlaylistSource, MediaLocator, MediaProvider, PlaylistDownloader, Result,
};

/// Media provider that writes empty files; titles in `unmatched` return zero
/// search candidates.
struct FileWritingProvider {
    unmatched: Vec<&'static str>,
    downloads: Mutex<Vec<String>>,
}

impl FileWritingProvider {
    fn new(unmatched: Vec<&'static str>) -> Self {
        Self {
            unmatched,
            downloads: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl MediaProvider for FileWritingProvider {
    async fn search(&self, query: &str, _max_results: usize) -> Result<Vec<MediaLocator>> {
        if self.unmatched.iter().any(|t| query.contains(t)) {
            return Ok(vec![]);
        }
        Ok(vec![MediaLocator::new(format!("mock://{query}"))])
    }

    async fn download(
        &self,
        locator: &MediaLocator,
        target_template: &Path,
        quality: &QualityConfig,
    ) -> Result<PathBuf> {
        self.downloads.lock().unwrap().push(locator.to_string());
        let path = PathBuf::from(
            target_template
                .to_string_lossy()
                .replace("%(ext)s", &quality.codec),
        );
        tokio::fs::write(&path, b"audio").await?;
        Ok(path)
    }

    fn name(&self) -> &str {
        "file-writing"
    }
}

fn track_json(title: &str, artist: &str) -> serde_json::Value {
    json!({
        "kind": "track",
        "track": {
            "title": title,
            "artists": [artist],
            "album": "Album",
            "duration_ms": 180_000,
            "popularity": 61,
        }
    })
}

async fn mount_playlist(server: &MockServer, id: &str, name: &str, total: u64) {
    Mock::given(method("GET"))
        .and(path(format!("/playlists/{id}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": name,
            "owner": "integration",
            "total_tracks": total,
        })))
        .mount(server)
        .await;
}

fn pipeline_config(server: &MockServer, output_dir: &Path) -> Config {
    let mut config = Config::default();
    config.download.output_dir = output_dir.to_path_buf();
    config.download.track_delay = Duration::ZERO;
    config.source = SourceConfig {
        api_base_url: server.uri(),
        bearer_token: None,
        page_size: 2,
    };
    config.retry = RetryConfig {
        max_attempts: 2,
        initial_delay: Duration::from_millis(1),
        max_delay: Duration::from_millis(5),
        backoff_multiplier: 2.0,
        jitter: false,
    };
    config
}

fn build_pipeline(
    server: &MockServer,
    output_dir: &Path,
    provider: FileWritingProvider,
) -> PlaylistDownloader {
    let config = pipeline_config(server, output_dir);
    let source = Arc::new(HttpPlaylistSource::new(&config.source).unwrap());
    PlaylistDownloader::new(config, source, Arc::new(provider)).unwrap()
}

#[tokio::test]
async fn full_run_pages_through_api_and_writes_files() {
    let server = MockServer::start().await;
    mount_playlist(&server, "abc123", "Integration Mix", 3).await;

    // Two pages at page_size 2
    Mock::given(method("GET"))
        .and(path("/playlists/abc123/tracks"))
        .and(query_param("offset", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [track_json("One", "Ada"), track_json("Two", "Brin")],
            "next_offset": 2,
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/playlists/abc123/tracks"))
        .and(query_param("offset", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [track_json("Three", "Cleo")],
            "next_offset": null,
        })))
        .mount(&server)
        .await;

    let tmp = TempDir::new().unwrap();
    let out = tmp.path().join("downloads");
    let pipeline = build_pipeline(&server, &out, FileWritingProvider::new(vec![]));

    let report = pipeline
        .run("https://music.example.com/playlist/abc123")
        .await
        .unwrap();

    assert_eq!(report.total, 3);
    assert_eq!(report.successful, 3);
    assert_eq!(report.failed, 0);
    for name in ["Ada - One.mp3", "Brin - Two.mp3", "Cleo - Three.mp3"] {
        assert!(out.join(name).exists(), "missing {name}");
    }
}

#[tokio::test]
async fn unmatched_track_yields_partial_report_and_single_file() {
    let server = MockServer::start().await;
    mount_playlist(&server, "p2", "Half Luck", 2).await;
    Mock::given(method("GET"))
        .and(path("/playlists/p2/tracks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [track_json("Found", "Ada"), track_json("Ghost", "Brin")],
            "next_offset": null,
        })))
        .mount(&server)
        .await;

    let tmp = TempDir::new().unwrap();
    let out = tmp.path().join("downloads");
    let pipeline = build_pipeline(&server, &out, FileWritingProvider::new(vec!["Ghost"]));

    let report = pipeline
        .run("service:playlist:p2")
        .await
        .unwrap();

    assert_eq!(report.total, 2);
    assert_eq!(report.successful, 1);
    assert_eq!(report.failed, 1);

    let files: Vec<_> = std::fs::read_dir(&out).unwrap().collect();
    assert_eq!(files.len(), 1, "exactly one file expected on disk");
}

#[tokio::test]
async fn non_track_items_are_dropped_from_the_run() {
    let server = MockServer::start().await;
    mount_playlist(&server, "p3", "Mixed Content", 3).await;
    Mock::given(method("GET"))
        .and(path("/playlists/p3/tracks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [
                { "kind": "other", "track": null },
                track_json("Kept", "Ada"),
                { "kind": "track", "track": null },
            ],
            "next_offset": null,
        })))
        .mount(&server)
        .await;

    let tmp = TempDir::new().unwrap();
    let out = tmp.path().join("downloads");
    let pipeline = build_pipeline(&server, &out, FileWritingProvider::new(vec![]));

    let report = pipeline.run("service:playlist:p3").await.unwrap();

    // Only the playable item was processed; the skips are not counted anywhere
    assert_eq!(report.total, 1);
    assert_eq!(report.successful, 1);
}

#[tokio::test]
async fn transient_page_error_is_retried_to_success() {
    let server = MockServer::start().await;
    mount_playlist(&server, "p4", "Flaky Backend", 1).await;

    // First fetch 503s, the retry succeeds
    Mock::given(method("GET"))
        .and(path("/playlists/p4/tracks"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/playlists/p4/tracks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [track_json("Recovered", "Ada")],
            "next_offset": null,
        })))
        .mount(&server)
        .await;

    let tmp = TempDir::new().unwrap();
    let out = tmp.path().join("downloads");
    let pipeline = build_pipeline(&server, &out, FileWritingProvider::new(vec![]));

    let report = pipeline.run("service:playlist:p4").await.unwrap();
    assert_eq!(report.successful, 1);
}

#[tokio::test]
async fn persistent_collection_failure_aborts_with_no_files() {
    let server = MockServer::start().await;
    mount_playlist(&server, "p5", "Dead Backend", 10).await;
    Mock::given(method("GET"))
        .and(path("/playlists/p5/tracks"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let tmp = TempDir::new().unwrap();
    let out = tmp.path().join("downloads");
    let pipeline = build_pipeline(&server, &out, FileWritingProvider::new(vec![]));

    let err = pipeline.run("service:playlist:p5").await.unwrap_err();

    assert!(matches!(err, Error::CollectionFailed(_)));
    assert!(!out.exists(), "no output directory for an aborted run");
}

#[test]
fn invalid_reference_aborts_without_any_http_traffic() {
    // The source points at a dead address: the run must fail on the
    // reference shape alone, before the first request is ever issued
    let tmp = TempDir::new().unwrap();
    let out = tmp.path().join("downloads");

    let mut config = Config::default();
    config.download.output_dir = out.clone();
    config.source.api_base_url = "http://127.0.0.1:9/".to_string();
    let source = Arc::new(HttpPlaylistSource::new(&config.source).unwrap());
    let pipeline =
        PlaylistDownloader::new(config, source, Arc::new(FileWritingProvider::new(vec![])))
            .unwrap();

    let result = tokio_test::block_on(pipeline.run("not-a-url"));

    assert!(matches!(result, Err(Error::InvalidReference(_))));
    assert!(!out.exists());
}

#[tokio::test]
async fn outcome_is_download_failed_when_provider_reports_tool_error() {
    struct BrokenProvider;

    #[async_trait]
    impl MediaProvider for BrokenProvider {
        async fn search(&self, query: &str, _max: usize) -> Result<Vec<MediaLocator>> {
            Ok(vec![MediaLocator::new(format!("mock://{query}"))])
        }

        async fn download(
            &self,
            _locator: &MediaLocator,
            _target_template: &Path,
            _quality: &QualityConfig,
        ) -> Result<PathBuf> {
            Err(Error::ExternalTool("transcoder binary missing".to_string()))
        }

        fn name(&self) -> &str {
            "broken"
        }
    }

    let server = MockServer::start().await;
    mount_playlist(&server, "p6", "Tool Trouble", 1).await;
    Mock::given(method("GET"))
        .and(path("/playlists/p6/tracks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [track_json("Doomed", "Ada")],
            "next_offset": null,
        })))
        .mount(&server)
        .await;

    let tmp = TempDir::new().unwrap();
    let config = pipeline_config(&server, &tmp.path().join("downloads"));
    let source = Arc::new(HttpPlaylistSource::new(&config.source).unwrap());
    let pipeline = PlaylistDownloader::new(config, source, Arc::new(BrokenProvider)).unwrap();

    let mut events = pipeline.subscribe();
    let report = pipeline.run("service:playlist:p6").await.unwrap();

    assert_eq!(report.total, 1);
    assert_eq!(report.failed, 1);

    // The terminal event carries the tool error text
    let mut saw_failure = false;
    while let Ok(event) = events.try_recv() {
        if let playlist_dl::Event::TrackFailed { reason, .. } = event {
            assert!(reason.contains("transcoder binary missing"));
            saw_failure = true;
        }
    }
    assert!(saw_failure);
}
