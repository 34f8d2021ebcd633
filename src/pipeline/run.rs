//! Run state machine — drives one playlist from reference to report.

use std::sync::Arc;

use super::PlaylistDownloader;
use crate::error::{Error, Result};
use crate::types::{DownloadOutcome, Event, RunReport, Track};
use crate::{collector, executor, matcher, naming, query, reference};

impl PlaylistDownloader {
    /// Download every track of the referenced playlist
    ///
    /// States, in order:
    /// 1. **Init** — extract the playlist identifier. An unrecognized
    ///    reference aborts here, before any network activity.
    /// 2. **Collecting** — resolve playlist info and collect the full track
    ///    list. A failed or empty collection ends the run with an empty
    ///    report (failed) or zero-track report (empty).
    /// 3. **Processing** — dispatch each track through query → match →
    ///    sanitize → download. Per-track failures become outcomes; they
    ///    never abort the run.
    /// 4. **Reporting** — after every dispatched track has produced an
    ///    outcome, fold the ordered outcome log into the final report.
    ///
    /// Only `InvalidReference` and `CollectionFailed` are fatal.
    pub async fn run(&self, playlist_reference: &str) -> Result<RunReport> {
        // Init
        let id = reference::extract(playlist_reference)?;
        tracing::info!(playlist_id = %id, "Playlist reference resolved");

        // Collecting
        self.emit_event(Event::CollectionStarted { id: id.clone() });

        let info = self
            .source
            .playlist_info(&id)
            .await
            .map_err(|e| Error::CollectionFailed(e.to_string()))?;
        tracing::info!(
            name = %info.name,
            owner = %info.owner,
            total_tracks = info.total_tracks,
            "Playlist resolved"
        );
        self.emit_event(Event::PlaylistResolved {
            name: info.name,
            owner: info.owner,
            total_tracks: info.total_tracks,
        });

        let tracks = collector::collect_tracks(self.source.as_ref(), &id, &self.config.retry).await?;
        if tracks.is_empty() {
            tracing::warn!(playlist_id = %id, "No tracks found, nothing to do");
            let report = RunReport::empty(self.config.output_dir().clone());
            self.emit_event(Event::RunComplete {
                report: report.clone(),
                finished_at: chrono::Utc::now(),
            });
            return Ok(report);
        }

        // Processing
        let total = tracks.len();
        let outcomes: Arc<tokio::sync::Mutex<Vec<Option<DownloadOutcome>>>> =
            Arc::new(tokio::sync::Mutex::new(vec![None; total]));

        let mut workers = tokio::task::JoinSet::new();
        for (index, track) in tracks.into_iter().enumerate() {
            // Acquire before spawning so dispatch order follows playlist order
            let permit = self
                .concurrent_limit
                .clone()
                .acquire_owned()
                .await
                .map_err(|_| Error::Other("concurrency limiter closed".to_string()))?;

            let pipeline = self.clone();
            let outcomes = Arc::clone(&outcomes);
            workers.spawn(async move {
                let _permit = permit;
                let outcome = pipeline.process_track(index, total, track).await;
                // Index-addressed slot: append is mutually exclusive and
                // playlist order survives out-of-order completion
                let mut slots = outcomes.lock().await;
                slots[index] = Some(outcome);
            });
        }

        // Join barrier: the report is only folded once every worker is done
        while let Some(joined) = workers.join_next().await {
            if let Err(e) = joined {
                tracing::error!(error = %e, "Track worker terminated abnormally");
            }
        }

        // Reporting
        let slots = Arc::try_unwrap(outcomes)
            .map_err(|_| Error::Other("outcome log still shared after join".to_string()))?
            .into_inner();
        let log: Vec<DownloadOutcome> = slots
            .into_iter()
            .map(|slot| {
                slot.unwrap_or(DownloadOutcome::DownloadFailed {
                    reason: "worker terminated before producing an outcome".to_string(),
                })
            })
            .collect();

        let report = RunReport::from_outcomes(&log, self.config.output_dir().clone());
        tracing::info!(
            total = report.total,
            successful = report.successful,
            failed = report.failed,
            output_dir = %report.output_dir.display(),
            "Run complete"
        );
        self.emit_event(Event::RunComplete {
            report: report.clone(),
            finished_at: chrono::Utc::now(),
        });

        Ok(report)
    }

    /// Process one track to its terminal outcome
    ///
    /// Never returns an error: every failure mode maps to a `NotFound` or
    /// `DownloadFailed` outcome at this boundary.
    async fn process_track(&self, index: usize, total: usize, track: Track) -> DownloadOutcome {
        let label = format!("{} - {}", track.artists.join(" & "), track.title);
        tracing::info!(position = index + 1, total, track = %label, "Processing track");
        self.emit_event(Event::TrackStarted {
            index,
            total,
            label: label.clone(),
        });

        // Shared throttle: spaces this worker's backend requests against
        // everyone else's
        self.throttle.acquire().await;

        let search_query = query::build_search_query(&track);
        let Some(locator) =
            matcher::find_match(self.provider.as_ref(), &search_query, self.config.download.max_candidates).await
        else {
            tracing::warn!(track = %label, "No match found");
            self.emit_event(Event::TrackFailed {
                index,
                reason: "no match found".to_string(),
            });
            return DownloadOutcome::NotFound;
        };

        tracing::info!(track = %label, locator = %locator, "Matched");
        self.emit_event(Event::Matched {
            index,
            locator: locator.clone(),
        });

        let filename = naming::sanitize_filename(&track);
        let outcome =
            executor::execute(self.provider.as_ref(), &locator, &filename, &self.config).await;

        match &outcome {
            DownloadOutcome::Success { path } => {
                self.emit_event(Event::TrackCompleted {
                    index,
                    path: path.clone(),
                });
            }
            DownloadOutcome::DownloadFailed { reason } => {
                self.emit_event(Event::TrackFailed {
                    index,
                    reason: reason.clone(),
                });
            }
            DownloadOutcome::NotFound => {
                // The executor never produces NotFound; matching already happened
            }
        }

        outcome
    }
}
