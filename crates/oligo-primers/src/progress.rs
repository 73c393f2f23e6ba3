use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::sync::Arc;

/// A progress tick. `end` may change once during a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Progress {
    pub current: u64,
    pub end: u64,
}

impl Progress {
    /// Completed fraction in `[0, 1]`; 0 while the total is unknown.
    pub fn fraction(&self) -> f64 {
        if self.end == 0 {
            0.0
        } else {
            (self.current as f64 / self.end as f64).min(1.0)
        }
    }
}

/// Receiver of progress ticks from a running search.
pub trait ProgressSink {
    fn report(&self, progress: Progress);
}

impl<F: Fn(Progress)> ProgressSink for F {
    fn report(&self, progress: Progress) {
        self(progress)
    }
}

impl ProgressSink for Sender<Progress> {
    fn report(&self, progress: Progress) {
        // The receiving side may already be gone.
        let _ = self.send(progress);
    }
}

/// Sink that discards every tick.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn report(&self, _progress: Progress) {}
}

/// Cooperative cancellation flag shared between a search and its controller.
#[derive(Debug, Default, Clone)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    pub fn reset(&self) {
        self.0.store(false, Ordering::Relaxed);
    }
}
