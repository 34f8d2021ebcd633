//! Request throttling using a token bucket
//!
//! The Throttle spaces requests against the external media backend. One token
//! is one request permit; tokens refill at a fixed interval and the bucket
//! holds at most one token, so permits can never burst. All workers share the
//! same bucket, which turns the configured inter-track delay into an
//! aggregate rate limit rather than a per-worker sleep.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Shared inter-request throttle
///
/// Cloneable; clones share the same bucket.
///
/// # Implementation
///
/// Uses AtomicU64 for lock-free permit tracking:
/// - `interval_nanos`: spacing between permits (0 = no throttling)
/// - `next_permit`: earliest monotonic timestamp the next permit is granted
#[derive(Clone)]
pub struct Throttle {
    /// Spacing between permits in nanoseconds (0 = disabled)
    interval_nanos: Arc<AtomicU64>,
    /// Earliest timestamp (nanoseconds since process epoch) for the next permit
    next_permit: Arc<AtomicU64>,
}

impl Throttle {
    /// Create a new Throttle with the given spacing between requests
    ///
    /// # Arguments
    ///
    /// * `interval` - Minimum delay between consecutive permits
    ///   (`Duration::ZERO` disables throttling)
    ///
    /// # Examples
    ///
    /// ```
    /// use playlist_dl::throttle::Throttle;
    /// use std::time::Duration;
    ///
    /// // One request per second
    /// let throttle = Throttle::new(Duration::from_secs(1));
    ///
    /// // Disabled
    /// let unthrottled = Throttle::new(Duration::ZERO);
    /// ```
    #[must_use]
    pub fn new(interval: Duration) -> Self {
        Self {
            interval_nanos: Arc::new(AtomicU64::new(interval.as_nanos() as u64)),
            next_permit: Arc::new(AtomicU64::new(Self::now_nanos())),
        }
    }

    /// Change the spacing between permits
    ///
    /// Takes effect from the next permit onward.
    pub fn set_interval(&self, interval: Duration) {
        self.interval_nanos
            .store(interval.as_nanos() as u64, Ordering::SeqCst);
    }

    /// Get the current spacing between permits
    pub fn interval(&self) -> Duration {
        Duration::from_nanos(self.interval_nanos.load(Ordering::Relaxed))
    }

    /// Acquire a request permit, waiting until the spacing allows it
    ///
    /// Returns immediately when throttling is disabled. Concurrent callers
    /// are each granted a distinct slot `interval` apart; no two permits are
    /// ever granted closer together than the configured spacing.
    pub async fn acquire(&self) {
        // Fast path: throttling disabled
        let interval = self.interval_nanos.load(Ordering::Relaxed);
        if interval == 0 {
            return;
        }

        loop {
            let now = Self::now_nanos();
            let next = self.next_permit.load(Ordering::SeqCst);
            let grant_at = next.max(now);

            // Claim the slot by advancing next_permit past it
            if self
                .next_permit
                .compare_exchange(next, grant_at + interval, Ordering::SeqCst, Ordering::SeqCst)
                .is_ok()
            {
                let wait = grant_at.saturating_sub(now);
                if wait > 0 {
                    tokio::time::sleep(Duration::from_nanos(wait)).await;
                }
                return;
            }
            // CAS lost to another worker; retry with the updated slot
        }
    }

    /// Get current monotonic time in nanoseconds
    ///
    /// The epoch is arbitrary but consistent within a process lifetime.
    fn now_nanos() -> u64 {
        static START: std::sync::OnceLock<Instant> = std::sync::OnceLock::new();
        let start = START.get_or_init(Instant::now);
        start.elapsed().as_nanos() as u64
    }
}
