//! CLI-based media provider using an external yt-dlp-compatible binary
//!
//! Search uses the binary's `<backend>searchK:` pseudo-URL with per-line JSON
//! output; download uses best-available audio with a forced transcode to the
//! configured codec, so the final extension is the codec name.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Output;
use tokio::process::Command;

use super::MediaProvider;
use crate::config::{QualityConfig, ToolsConfig};
use crate::error::{Error, Result};
use crate::types::MediaLocator;

/// Default binary name searched in PATH
const DEFAULT_BINARY: &str = "yt-dlp";

/// Media provider that shells out to a yt-dlp-compatible downloader
///
/// # Examples
///
/// ```no_run
/// use playlist_dl::provider::{CliMediaProvider, MediaProvider};
/// use std::path::PathBuf;
///
/// // Create with explicit path
/// let provider = CliMediaProvider::new(PathBuf::from("/usr/bin/yt-dlp"));
///
/// // Or auto-discover from PATH
/// let provider = CliMediaProvider::from_path()
///     .expect("yt-dlp not found in PATH");
/// ```
#[derive(Debug)]
pub struct CliMediaProvider {
    binary_path: PathBuf,
    transcoder_location: Option<PathBuf>,
}

impl CliMediaProvider {
    /// Create a new provider with an explicit binary path
    pub fn new(binary_path: PathBuf) -> Self {
        Self {
            binary_path,
            transcoder_location: None,
        }
    }

    /// Attempt to find the downloader binary in PATH
    ///
    /// Returns `Some(CliMediaProvider)` if the binary is found, `None` otherwise.
    pub fn from_path() -> Option<Self> {
        which::which(DEFAULT_BINARY).ok().map(Self::new)
    }

    /// Build a provider from tool configuration
    ///
    /// Uses the explicitly configured binary path when present, otherwise
    /// searches PATH if `search_path` allows it. Fails with
    /// [`Error::NotSupported`] when no binary can be located — unlike
    /// verification tooling there is no degraded mode for fetching audio.
    pub fn from_config(tools: &ToolsConfig) -> Result<Self> {
        let provider = if let Some(path) = &tools.downloader_path {
            Some(Self::new(path.clone()))
        } else if tools.search_path {
            Self::from_path()
        } else {
            None
        };

        provider
            .map(|p| p.with_transcoder_location(tools.transcoder_location.clone()))
            .ok_or_else(|| {
                Error::NotSupported(format!(
                    "no media downloader binary configured and '{DEFAULT_BINARY}' not found in PATH"
                ))
            })
    }

    /// Set the directory containing the ffmpeg transcoder
    #[must_use]
    pub fn with_transcoder_location(mut self, location: Option<PathBuf>) -> Self {
        self.transcoder_location = location;
        self
    }

    async fn run(&self, args: &[String]) -> Result<Output> {
        let output = Command::new(&self.binary_path)
            .args(args)
            .output()
            .await
            .map_err(|e| {
                Error::ExternalTool(format!(
                    "failed to execute {}: {}",
                    self.binary_path.display(),
                    e
                ))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::ExternalTool(format!(
                "{} exited with {}: {}",
                self.binary_path.display(),
                output.status,
                stderr.lines().last().unwrap_or("no error output")
            )));
        }

        Ok(output)
    }
}

/// Build the argument list for a bounded search
fn search_args(query: &str, max_results: usize) -> Vec<String> {
    vec![
        "--dump-json".to_string(),
        "--flat-playlist".to_string(),
        "--no-warnings".to_string(),
        format!("ytsearch{max_results}:{query}"),
    ]
}

/// Build the argument list for a download with forced audio transcode
fn download_args(
    locator: &MediaLocator,
    target_template: &Path,
    quality: &QualityConfig,
    transcoder_location: Option<&Path>,
) -> Vec<String> {
    let mut args = vec![
        "--format".to_string(),
        "bestaudio/best".to_string(),
        "--extract-audio".to_string(),
        "--audio-format".to_string(),
        quality.codec.clone(),
        "--audio-quality".to_string(),
        format!("{}k", quality.bitrate_kbps),
        "--no-warnings".to_string(),
        "--output".to_string(),
        target_template.to_string_lossy().into_owned(),
    ];
    if let Some(location) = transcoder_location {
        args.push("--ffmpeg-location".to_string());
        args.push(location.to_string_lossy().into_owned());
    }
    args.push(locator.as_str().to_string());
    args
}

/// Parse per-line JSON search output into locators, provider order preserved
///
/// Each line is one candidate object; the media URL lives in `url` (flat
/// playlist entries) or `webpage_url` (full extraction). Lines that parse but
/// carry neither field are skipped.
fn parse_search_output(stdout: &str) -> Result<Vec<MediaLocator>> {
    let mut locators = Vec::new();
    for line in stdout.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let entry: serde_json::Value = serde_json::from_str(line)
            .map_err(|e| Error::Provider(format!("unparseable search result line: {e}")))?;
        let url = entry
            .get("url")
            .or_else(|| entry.get("webpage_url"))
            .and_then(|v| v.as_str());
        if let Some(url) = url {
            locators.push(MediaLocator::new(url));
        }
    }
    Ok(locators)
}

/// Final output path for a template and transcode target
///
/// The forced `--audio-format` makes the transcoded extension equal to the
/// codec name, so the placeholder resolves deterministically.
fn resolve_target(target_template: &Path, quality: &QualityConfig) -> PathBuf {
    PathBuf::from(
        target_template
            .to_string_lossy()
            .replace("%(ext)s", &quality.codec),
    )
}

#[async_trait]
impl MediaProvider for CliMediaProvider {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<MediaLocator>> {
        let output = self.run(&search_args(query, max_results)).await?;
        parse_search_output(&String::from_utf8_lossy(&output.stdout))
    }

    async fn download(
        &self,
        locator: &MediaLocator,
        target_template: &Path,
        quality: &QualityConfig,
    ) -> Result<PathBuf> {
        let args = download_args(
            locator,
            target_template,
            quality,
            self.transcoder_location.as_deref(),
        );
        self.run(&args).await?;

        let path = resolve_target(target_template, quality);
        if !path.exists() {
            return Err(Error::ExternalTool(format!(
                "downloader reported success but '{}' was not written",
                path.display()
            )));
        }
        Ok(path)
    }

    fn name(&self) -> &str {
        "cli-ytdlp"
    }
}
