//! Configuration types for playlist-dl

use serde::{Deserialize, Serialize};
use std::{path::PathBuf, time::Duration};

use crate::error::{Error, Result};

/// Download behavior configuration (output directory, matching, throttling)
///
/// Groups settings related to how tracks are matched and fetched.
/// Used as a nested sub-config within [`Config`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DownloadConfig {
    /// Output directory (default: "downloads", created if absent)
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Maximum concurrent track downloads (default: 1 = strictly sequential)
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent_downloads: usize,

    /// Delay enforced between track requests (default: 1 second)
    ///
    /// Applied as a shared rate limit across workers so the aggregate request
    /// rate against the media backend honors the configured spacing.
    #[serde(default = "default_track_delay", with = "duration_ms_serde")]
    pub track_delay: Duration,

    /// Number of search candidates requested per track (default: 5)
    #[serde(default = "default_max_candidates")]
    pub max_candidates: usize,

    /// Target audio quality and codec
    #[serde(default)]
    pub quality: QualityConfig,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            max_concurrent_downloads: default_max_concurrent(),
            track_delay: default_track_delay(),
            max_candidates: default_max_candidates(),
            quality: QualityConfig::default(),
        }
    }
}

/// Target audio quality for the media provider's transcode step
///
/// Passed through to the download executor as an explicit value rather than
/// shared mutable state; the provider decides how to honor it.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct QualityConfig {
    /// Preferred audio codec (default: "mp3")
    #[serde(default = "default_codec")]
    pub codec: String,

    /// Preferred bitrate in kbit/s (default: 320)
    #[serde(default = "default_bitrate")]
    pub bitrate_kbps: u32,
}

impl Default for QualityConfig {
    fn default() -> Self {
        Self {
            codec: default_codec(),
            bitrate_kbps: default_bitrate(),
        }
    }
}

/// Playlist source configuration (API endpoint, pagination, auth token)
///
/// Credential acquisition is out of scope; when the source requires auth, a
/// pre-obtained bearer token is carried here verbatim.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Base URL of the playlist metadata API
    #[serde(default = "default_api_base")]
    pub api_base_url: String,

    /// Bearer token sent with metadata requests (None = unauthenticated)
    #[serde(default)]
    pub bearer_token: Option<String>,

    /// Items requested per page (default: 100)
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base(),
            bearer_token: None,
            page_size: default_page_size(),
        }
    }
}

/// External tool paths (media downloader, transcoder)
///
/// Groups settings for external binaries. Used as a nested sub-config within
/// [`Config`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ToolsConfig {
    /// Path to the media downloader executable (auto-detected if None)
    #[serde(default)]
    pub downloader_path: Option<PathBuf>,

    /// Directory containing the ffmpeg transcoder (provider default if None)
    #[serde(default)]
    pub transcoder_location: Option<PathBuf>,

    /// Whether to search PATH for external binaries if explicit paths not set (default: true)
    #[serde(default = "default_true")]
    pub search_path: bool,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            downloader_path: None,
            transcoder_location: None,
            search_path: true,
        }
    }
}

/// Retry behavior for transient playlist source failures
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of attempts including the first (default: 3)
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Initial delay before first retry (default: 1 second)
    #[serde(default = "default_initial_delay", with = "duration_serde")]
    pub initial_delay: Duration,

    /// Maximum delay between retries (default: 30 seconds)
    #[serde(default = "default_max_delay", with = "duration_serde")]
    pub max_delay: Duration,

    /// Multiplier for exponential backoff (default: 2.0)
    #[serde(default = "default_backoff_multiplier")]
    pub backoff_multiplier: f64,

    /// Add random jitter to delays (default: true)
    #[serde(default = "default_true")]
    pub jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(30),
            backoff_multiplier: 2.0,
            jitter: true,
        }
    }
}

/// Main configuration for the playlist pipeline
///
/// Fields are organized into logical sub-configs:
/// - [`download`](DownloadConfig) — output directory, matching, throttling
/// - [`source`](SourceConfig) — playlist metadata API
/// - [`tools`](ToolsConfig) — external binary paths
/// - [`retry`](RetryConfig) — transient failure retry behavior
///
/// All sub-config fields are flattened for serialization, so the JSON/TOML
/// format stays un-nested.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Config {
    /// Download behavior settings
    #[serde(flatten)]
    pub download: DownloadConfig,

    /// Playlist source settings
    #[serde(flatten)]
    pub source: SourceConfig,

    /// External tool paths
    #[serde(flatten)]
    pub tools: ToolsConfig,

    /// Retry behavior for page fetches
    #[serde(flatten)]
    pub retry: RetryConfig,
}

impl Config {
    /// Output directory
    pub fn output_dir(&self) -> &PathBuf {
        &self.download.output_dir
    }

    /// Validate configuration values that would otherwise fail mid-run
    pub fn validate(&self) -> Result<()> {
        if self.download.max_concurrent_downloads == 0 {
            return Err(Error::config(
                "max_concurrent_downloads",
                "must be at least 1",
            ));
        }
        if self.download.max_candidates == 0 {
            return Err(Error::config("max_candidates", "must be at least 1"));
        }
        if self.download.output_dir.as_os_str().is_empty() {
            return Err(Error::config("output_dir", "must not be empty"));
        }
        if self.retry.max_attempts == 0 {
            return Err(Error::config("max_attempts", "must be at least 1"));
        }
        Ok(())
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("downloads")
}

fn default_max_concurrent() -> usize {
    1
}

fn default_track_delay() -> Duration {
    Duration::from_secs(1)
}

fn default_max_candidates() -> usize {
    5
}

fn default_codec() -> String {
    "mp3".to_string()
}

fn default_bitrate() -> u32 {
    320
}

fn default_api_base() -> String {
    "https://api.example.com/v1".to_string()
}

fn default_page_size() -> usize {
    100
}

fn default_max_attempts() -> u32 {
    3
}

fn default_initial_delay() -> Duration {
    Duration::from_secs(1)
}

fn default_max_delay() -> Duration {
    Duration::from_secs(30)
}

fn default_backoff_multiplier() -> f64 {
    2.0
}

fn default_true() -> bool {
    true
}

// Duration serialization helper (whole seconds)
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}

// Duration serialization helper (milliseconds, for sub-second delays)
mod duration_ms_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_millis() as u64)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}
