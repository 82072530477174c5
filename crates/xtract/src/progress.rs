//! Progress reporting for extraction jobs.

/// Receives per-target progress from running jobs.
///
/// Jobs for different targets report from different threads at the same
/// time, so implementations must be thread safe. Every call names the target
/// it belongs to.
pub trait ProgressSink: Send + Sync {
    /// A target starts; it has `total` archive pairs to process.
    fn begin(&self, target: &str, total: u64);

    /// One archive pair of `target` was processed.
    fn advance(&self, target: &str, current: &str);

    /// All archive pairs of `target` were processed.
    fn finish(&self, _target: &str) {}
}

/// Sink that discards all progress.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn begin(&self, _target: &str, _total: u64) {}

    fn advance(&self, _target: &str, _current: &str) {}
}
