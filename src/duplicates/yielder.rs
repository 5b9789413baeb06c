//! Cooperative yield points for long scans.
//!
//! The scanner is synchronous CPU-bound work. At regular wall-clock intervals
//! it hands control to a [`Yielder`] so the host can service other work. A
//! thread-based host sleeps briefly; an event-loop host can supply its own
//! primitive; tests can make yields observable or free.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Default pause for [`SleepYielder`].
pub const DEFAULT_YIELD_PAUSE: Duration = Duration::from_millis(1);

/// Capability to suspend the current scan briefly.
pub trait Yielder: Send + Sync {
    /// Give the host scheduler a chance to run.
    fn yield_now(&self);
}

/// Yields by sleeping the current thread.
#[derive(Debug, Clone, Copy)]
pub struct SleepYielder {
    pause: Duration,
}

impl SleepYielder {
    /// Create a yielder that sleeps for `pause` at every yield point.
    #[must_use]
    pub fn new(pause: Duration) -> Self {
        Self { pause }
    }

    /// The pause applied at every yield point.
    #[must_use]
    pub fn pause(&self) -> Duration {
        self.pause
    }
}

impl Default for SleepYielder {
    fn default() -> Self {
        Self::new(DEFAULT_YIELD_PAUSE)
    }
}

impl Yielder for SleepYielder {
    fn yield_now(&self) {
        if self.pause.is_zero() {
            std::thread::yield_now();
        } else {
            std::thread::sleep(self.pause);
        }
    }
}

/// Never suspends.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopYielder;

impl Yielder for NoopYielder {
    fn yield_now(&self) {}
}

/// Counts yield points, then delegates to an inner yielder.
#[derive(Debug, Default)]
pub struct CountingYielder<Y = NoopYielder> {
    inner: Y,
    count: AtomicUsize,
}

impl<Y: Yielder> CountingYielder<Y> {
    /// Wrap `inner`.
    #[must_use]
    pub fn new(inner: Y) -> Self {
        Self {
            inner,
            count: AtomicUsize::new(0),
        }
    }

    /// Number of yields so far.
    #[must_use]
    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }
}

impl<Y: Yielder> Yielder for CountingYielder<Y> {
    fn yield_now(&self) {
        self.count.fetch_add(1, Ordering::SeqCst);
        self.inner.yield_now();
    }
}
