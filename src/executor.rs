//! Download execution
//!
//! Drives the media provider to fetch audio for a chosen locator into the
//! output directory. Every provider-level failure (network error, transcode
//! failure, missing external binary) is caught here and reported as a
//! `DownloadFailed` outcome; nothing propagates past the track boundary.

use std::path::Path;

use crate::config::Config;
use crate::provider::MediaProvider;
use crate::types::{DownloadOutcome, MediaLocator};

/// Extension placeholder substituted by the provider/transcoder
///
/// The executor never chooses the extension; the provider appends whatever
/// the transcode step produced.
const EXT_PLACEHOLDER: &str = "%(ext)s";

/// Fetch audio for a locator into `<output_dir>/<filename>.<ext>`
///
/// Ensures the output directory exists (no error if already present), builds
/// the target template from the sanitized filename, and passes the configured
/// quality through to the provider. A same-named file from an earlier track
/// is silently overwritten.
pub async fn execute(
    provider: &dyn MediaProvider,
    locator: &MediaLocator,
    filename: &str,
    config: &Config,
) -> DownloadOutcome {
    let output_dir: &Path = config.output_dir();
    if let Err(e) = tokio::fs::create_dir_all(output_dir).await {
        return DownloadOutcome::DownloadFailed {
            reason: format!(
                "failed to create output directory '{}': {}",
                output_dir.display(),
                e
            ),
        };
    }

    let target_template = output_dir.join(format!("{filename}.{EXT_PLACEHOLDER}"));

    match provider
        .download(locator, &target_template, &config.download.quality)
        .await
    {
        Ok(path) => {
            tracing::info!(locator = %locator, path = %path.display(), "Download complete");
            DownloadOutcome::Success { path }
        }
        Err(e) => {
            tracing::warn!(locator = %locator, error = %e, "Download failed");
            DownloadOutcome::DownloadFailed {
                reason: e.to_string(),
            }
        }
    }
}
