//! Progress reporting and cancellation for conversions

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Receives conversion progress as a percentage, once per finished image.
///
/// Values never decrease and the last one for a successful conversion is 100.
pub trait ProgressSink {
    fn report(&mut self, percent: u8);
}

impl<F: FnMut(u8)> ProgressSink for F {
    fn report(&mut self, percent: u8) {
        self(percent)
    }
}

/// Sink that drops every report
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn report(&mut self, _percent: u8) {}
}

/// Percentage complete after `done` of `total` images, rounded to nearest
pub fn progress_percent(done: usize, total: usize) -> u8 {
    if total == 0 {
        return 100;
    }
    let done = done.min(total);
    ((done as f64 / total as f64) * 100.0).round() as u8
}

/// Shared flag that asks a running conversion to stop before its next image
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Clear a previous cancellation so the token can guard another run
    pub fn reset(&self) {
        self.0.store(false, Ordering::SeqCst);
    }
}
