/// Trait for reporting check progress.
///
/// CLI implements with indicatif. All methods have default no-op implementations.
pub trait ProgressReporter: Send + Sync {
    fn on_scan_start(&self) {}
    fn on_scan_progress(&self, _files_found: usize, _current_folder: &str) {}
    fn on_scan_complete(&self, _total_files: usize, _duration_secs: f64) {}
    fn on_fingerprint_start(&self, _total_files: usize) {}
    fn on_fingerprint_progress(&self, _files_done: usize, _total_files: usize) {}
    fn on_fingerprint_complete(&self, _total_files: usize, _duration_secs: f64) {}
    fn on_compare_start(&self, _folder_pairs: usize) {}
    fn on_compare_progress(&self, _pairs_done: usize, _folder_pairs: usize) {}
    fn on_compare_complete(&self, _findings: usize, _duration_secs: f64) {}
}

/// No-op progress reporter for silent operation.
pub struct SilentReporter;

impl ProgressReporter for SilentReporter {}
