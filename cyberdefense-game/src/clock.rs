//! Per-match elapsed-time clock.
//!
//! The clock is owned by a single match. Ticking samples wall time into a
//! whole-second counter that never decreases; stopping freezes it. Clones
//! share the same counter so a background ticker can drive the clock the
//! engine reads from.
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Instant;

#[derive(Debug)]
struct ClockInner {
    started: Instant,
    elapsed_secs: AtomicU64,
    stopped: AtomicBool,
}

/// Shared handle to one match's elapsed time.
#[derive(Debug, Clone)]
pub struct MatchClock {
    inner: Arc<ClockInner>,
}

impl MatchClock {
    /// Start a clock at zero.
    #[must_use]
    pub fn start() -> Self {
        Self {
            inner: Arc::new(ClockInner {
                started: Instant::now(),
                elapsed_secs: AtomicU64::new(0),
                stopped: AtomicBool::new(false),
            }),
        }
    }

    /// Sample wall time. No effect once stopped.
    pub fn tick(&self) -> u64 {
        self.record(self.inner.started.elapsed().as_secs())
    }

    pub(crate) fn record(&self, secs: u64) -> u64 {
        if self.is_stopped() {
            return self.elapsed_seconds();
        }
        let previous = self.inner.elapsed_secs.fetch_max(secs, Ordering::AcqRel);
        previous.max(secs)
    }

    /// Take a final sample and freeze the counter.
    pub fn stop(&self) -> u64 {
        let final_secs = self.tick();
        self.inner.stopped.store(true, Ordering::Release);
        final_secs
    }

    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.inner.stopped.load(Ordering::Acquire)
    }

    /// Last sampled whole seconds since the match started.
    #[must_use]
    pub fn elapsed_seconds(&self) -> u64 {
        self.inner.elapsed_secs.load(Ordering::Acquire)
    }
}

#[cfg(feature = "async")]
pub use ticker::MatchTicker;

#[cfg(feature = "async")]
mod ticker {
    use super::MatchClock;
    use std::time::Duration;
    use tokio::task::JoinHandle;

    /// Background task ticking a [`MatchClock`] on a fixed period.
    ///
    /// The task ends by itself once the clock is stopped and is aborted when
    /// the handle is dropped, so a match torn down mid-way leaves no timer.
    #[derive(Debug)]
    pub struct MatchTicker {
        handle: JoinHandle<()>,
    }

    impl MatchTicker {
        /// Tick once per second. Must be called inside a tokio runtime.
        #[must_use]
        pub fn spawn(clock: MatchClock) -> Self {
            Self::spawn_with_period(clock, Duration::from_secs(1))
        }

        #[must_use]
        pub fn spawn_with_period(clock: MatchClock, period: Duration) -> Self {
            let handle = tokio::spawn(async move {
                let mut interval = tokio::time::interval(period);
                loop {
                    interval.tick().await;
                    if clock.is_stopped() {
                        break;
                    }
                    clock.tick();
                }
            });
            Self { handle }
        }

        #[must_use]
        pub fn is_finished(&self) -> bool {
            self.handle.is_finished()
        }

        pub fn cancel(&self) {
            self.handle.abort();
        }
    }

    impl Drop for MatchTicker {
        fn drop(&mut self) {
            self.handle.abort();
        }
    }
}
