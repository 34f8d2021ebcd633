//! # playlist-dl
//!
//! Library for mirroring a reference playlist into a local directory of audio
//! files: collect track metadata from a playlist source, match each track on
//! a media search backend, and download the audio one file per track.
//!
//! ## Design Philosophy
//!
//! playlist-dl is designed to be:
//! - **Capability-driven** - The metadata source and the media backend are
//!   traits; the bundled implementations are replaceable
//! - **Failure-isolating** - One bad track never aborts a run; failures are
//!   counted, not thrown
//! - **Library-first** - No CLI or UI, purely a Rust crate for embedding
//! - **Event-driven** - Consumers subscribe to events, no polling required
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use playlist_dl::{CliMediaProvider, Config, HttpPlaylistSource, PlaylistDownloader};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::default();
//!     let source = Arc::new(HttpPlaylistSource::new(&config.source)?);
//!     let provider = Arc::new(CliMediaProvider::from_config(&config.tools)?);
//!
//!     let pipeline = PlaylistDownloader::new(config, source, provider)?;
//!
//!     // Subscribe to events
//!     let mut events = pipeline.subscribe();
//!     tokio::spawn(async move {
//!         while let Ok(event) = events.recv().await {
//!             println!("Event: {:?}", event);
//!         }
//!     });
//!
//!     let report = pipeline
//!         .run("https://music.example.com/playlist/abc123")
//!         .await?;
//!     println!(
//!         "{}/{} tracks downloaded to {}",
//!         report.successful,
//!         report.total,
//!         report.output_dir.display()
//!     );
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Track collection via paginated sources
pub mod collector;
/// Configuration types
pub mod config;
/// Error types
pub mod error;
/// Per-track download execution
pub mod executor;
/// Candidate selection
pub mod matcher;
/// Filename derivation
pub mod naming;
/// Run orchestration (decomposed into focused submodules)
pub mod pipeline;
/// Media search/download providers
pub mod provider;
/// Search query construction
pub mod query;
/// Playlist reference parsing
pub mod reference;
/// Retry logic with exponential backoff
pub mod retry;
/// Playlist metadata sources
pub mod source;
/// Request throttling with a token bucket
pub mod throttle;
/// Core types and events
pub mod types;

// Re-export commonly used types
pub use config::{Config, DownloadConfig, QualityConfig, RetryConfig, SourceConfig, ToolsConfig};
pub use error::{Error, Result};
pub use pipeline::PlaylistDownloader;
pub use provider::{CliMediaProvider, MediaProvider};
pub use source::{HttpPlaylistSource, PlaylistSource};
pub use throttle::Throttle;
pub use types::{
    DownloadOutcome, Event, MediaLocator, PlaylistId, PlaylistInfo, RunReport, Track, TracksPage,
};

/// Helper function to run a playlist download with graceful signal handling.
///
/// Races the run against a termination signal and reports the interruption as
/// [`Error::Interrupted`] instead of letting the process die mid-write.
///
/// - **Unix:** listens for SIGTERM and SIGINT, with fallbacks if signal
///   registration fails.
/// - **Windows/other:** listens for Ctrl+C via `tokio::signal::ctrl_c()`.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use playlist_dl::{
///     CliMediaProvider, Config, HttpPlaylistSource, PlaylistDownloader, run_with_interrupt,
/// };
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = Config::default();
///     let source = Arc::new(HttpPlaylistSource::new(&config.source)?);
///     let provider = Arc::new(CliMediaProvider::from_config(&config.tools)?);
///     let pipeline = PlaylistDownloader::new(config, source, provider)?;
///
///     let report = run_with_interrupt(&pipeline, "service:playlist:abc123").await?;
///     println!("downloaded {} of {}", report.successful, report.total);
///     Ok(())
/// }
/// ```
pub async fn run_with_interrupt(
    pipeline: &PlaylistDownloader,
    playlist_reference: &str,
) -> Result<types::RunReport> {
    tokio::select! {
        result = pipeline.run(playlist_reference) => result,
        () = wait_for_signal() => {
            tracing::warn!("Run interrupted, partially written output may remain");
            Err(Error::Interrupted)
        }
    }
}

#[cfg(unix)]
async fn wait_for_signal() {
    use tokio::signal::unix::{SignalKind, signal};

    // Set up signal handlers - these may fail in restricted environments (containers, tests)
    let sigterm_result = signal(SignalKind::terminate());
    let sigint_result = signal(SignalKind::interrupt());

    match (sigterm_result, sigint_result) {
        (Ok(mut sigterm), Ok(mut sigint)) => {
            tokio::select! {
                _ = sigterm.recv() => {
                    tracing::info!("Received SIGTERM signal");
                }
                _ = sigint.recv() => {
                    tracing::info!("Received SIGINT signal (Ctrl+C)");
                }
            }
        }
        (Err(e), _) => {
            tracing::warn!(error = %e, "Could not register SIGTERM handler, waiting for SIGINT only");
            if let Ok(mut sigint) = signal(SignalKind::interrupt()) {
                sigint.recv().await;
                tracing::info!("Received SIGINT signal (Ctrl+C)");
            } else {
                tracing::error!("Could not register any signal handlers, using ctrl_c fallback");
                tokio::signal::ctrl_c().await.ok();
            }
        }
        (_, Err(e)) => {
            tracing::warn!(error = %e, "Could not register SIGINT handler, waiting for SIGTERM only");
            if let Ok(mut sigterm) = signal(SignalKind::terminate()) {
                sigterm.recv().await;
                tracing::info!("Received SIGTERM signal");
            } else {
                tracing::error!("Could not register any signal handlers, using ctrl_c fallback");
                tokio::signal::ctrl_c().await.ok();
            }
        }
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => {
            tracing::info!("Received Ctrl+C signal");
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C signal");
        }
    }
}
