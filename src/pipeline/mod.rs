//! Run orchestration
//!
//! The [`PlaylistDownloader`] owns the capabilities and shared state for a
//! run and sequences the pipeline: reference extraction, track collection,
//! per-track match/download dispatch, and report folding. The run state
//! machine itself lives in the `run` submodule.

mod run;

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
pub(crate) mod test_helpers;

use std::sync::Arc;

use crate::config::Config;
use crate::error::Result;
use crate::provider::MediaProvider;
use crate::source::PlaylistSource;
use crate::throttle::Throttle;
use crate::types::Event;

/// Main pipeline instance (cloneable - all fields are Arc-wrapped)
#[derive(Clone)]
pub struct PlaylistDownloader {
    /// Event broadcast channel sender (multiple subscribers supported)
    pub(crate) event_tx: tokio::sync::broadcast::Sender<Event>,
    /// Configuration (wrapped in Arc for sharing across workers)
    pub(crate) config: Arc<Config>,
    /// Playlist metadata capability
    pub(crate) source: Arc<dyn PlaylistSource>,
    /// Media search/download capability
    pub(crate) provider: Arc<dyn MediaProvider>,
    /// Semaphore bounding concurrent track downloads
    pub(crate) concurrent_limit: Arc<tokio::sync::Semaphore>,
    /// Shared inter-request throttle (one bucket across all workers)
    pub(crate) throttle: Throttle,
}

impl PlaylistDownloader {
    /// Create a new PlaylistDownloader instance
    ///
    /// Validates the configuration and sets up the event channel, the
    /// concurrency limiter, and the request throttle. No network activity
    /// happens here; the first external call is made by [`run`](Self::run).
    pub fn new(
        config: Config,
        source: Arc<dyn PlaylistSource>,
        provider: Arc<dyn MediaProvider>,
    ) -> Result<Self> {
        config.validate()?;

        // Buffer sized so a slow subscriber does not stall the run
        let (event_tx, _rx) = tokio::sync::broadcast::channel(1000);

        let concurrent_limit = Arc::new(tokio::sync::Semaphore::new(
            config.download.max_concurrent_downloads,
        ));
        let throttle = Throttle::new(config.download.track_delay);

        tracing::info!(
            source = source.name(),
            provider = provider.name(),
            output_dir = %config.output_dir().display(),
            max_concurrent = config.download.max_concurrent_downloads,
            "Pipeline initialized"
        );

        Ok(Self {
            event_tx,
            config: Arc::new(config),
            source,
            provider,
            concurrent_limit,
            throttle,
        })
    }

    /// Subscribe to pipeline events
    ///
    /// Multiple subscribers are supported; each receives all events
    /// independently. Events are buffered, but a subscriber lagging by more
    /// than the channel capacity receives a `RecvError::Lagged` error.
    pub fn subscribe(&self) -> tokio::sync::broadcast::Receiver<Event> {
        self.event_tx.subscribe()
    }

    /// Get the current configuration
    pub fn get_config(&self) -> Arc<Config> {
        Arc::clone(&self.config)
    }

    /// Emit an event to all subscribers
    ///
    /// If there are no active subscribers the event is silently dropped; the
    /// run continues whether or not anyone is listening.
    pub(crate) fn emit_event(&self, event: Event) {
        self.event_tx.send(event).ok();
    }
}
