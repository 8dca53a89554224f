/// Trait for reporting pipeline progress.
///
/// The CLI implements this with indicatif bars; library callers that want no
/// output use `SilentReporter`. All methods have default no-op implementations.
pub trait ProgressReporter: Send + Sync {
    fn on_scan_start(&self) {}
    fn on_scan_complete(&self, _sessions: usize, _duration_secs: f64) {}
    fn on_fetch_start(&self) {}
    fn on_fetch_complete(&self, _entries: usize, _duration_secs: f64) {}
    fn on_sync_start(&self, _total: usize) {}
    fn on_sync_progress(&self, _done: usize, _total: usize) {}
    fn on_sync_complete(&self, _created: usize, _updated: usize, _duration_secs: f64) {}
}

/// No-op progress reporter for silent operation.
pub struct SilentReporter;

impl ProgressReporter for SilentReporter {}
