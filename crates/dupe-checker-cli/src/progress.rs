use dupe_checker_core::ProgressReporter;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::{Arc, Mutex};
use std::time::Duration;

const TICK_CHARS: &str = "⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏";

/// The bar currently on screen, shared between the reporter and the log
/// writer.
#[derive(Clone, Default)]
pub struct ActiveBar(Arc<Mutex<Option<ProgressBar>>>);

impl ActiveBar {
    pub fn current(&self) -> Option<ProgressBar> {
        self.0.lock().ok().and_then(|guard| guard.clone())
    }

    /// Swap in a new bar, returning the old one.
    pub fn replace(&self, pb: Option<ProgressBar>) -> Option<ProgressBar> {
        match self.0.lock() {
            Ok(mut guard) => std::mem::replace(&mut *guard, pb),
            Err(_) => None,
        }
    }
}

/// CLI progress reporter using indicatif progress bars.
///
/// - Listing phase: spinner (file count unknown upfront)
/// - Fingerprint phase: progress bar over files
/// - Compare phase: progress bar over folder pairs
pub struct CliReporter {
    bar: ActiveBar,
}

impl CliReporter {
    pub fn new(bar: ActiveBar) -> Self {
        Self { bar }
    }

    fn set_bar(&self, pb: ProgressBar) {
        if let Some(old) = self.bar.replace(Some(pb)) {
            old.finish_and_clear();
        }
    }

    fn finish_bar(&self) {
        if let Some(pb) = self.bar.replace(None) {
            pb.finish_and_clear();
        }
    }

    fn with_bar(&self, f: impl FnOnce(&ProgressBar)) {
        if let Some(pb) = self.bar.current() {
            f(&pb);
        }
    }

    fn counting_bar(template: &str, len: usize) -> ProgressBar {
        let pb = ProgressBar::new(len as u64);
        if let Ok(style) = ProgressStyle::with_template(template) {
            pb.set_style(style.progress_chars("━╸─").tick_chars(TICK_CHARS));
        }
        pb.enable_steady_tick(Duration::from_millis(80));
        pb
    }
}

impl ProgressReporter for CliReporter {
    fn on_scan_start(&self) {
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
            pb.set_style(style.tick_chars(TICK_CHARS));
        }
        pb.set_message("Listing folders...");
        pb.enable_steady_tick(Duration::from_millis(80));
        self.set_bar(pb);
    }

    fn on_scan_progress(&self, files_found: usize, current_folder: &str) {
        self.with_bar(|pb| {
            pb.set_message(format!(
                "Listing '{}'... {} files found",
                current_folder, files_found
            ))
        });
    }

    fn on_scan_complete(&self, total_files: usize, duration_secs: f64) {
        self.finish_bar();
        eprintln!(
            "  \x1b[32m✓\x1b[0m Listing complete: {} files in {:.2}s",
            total_files, duration_secs
        );
    }

    fn on_fingerprint_start(&self, total_files: usize) {
        self.set_bar(Self::counting_bar(
            "  {spinner:.cyan} Fingerprinting [{bar:30.cyan/dim}] {pos}/{len} files ({eta} remaining)",
            total_files,
        ));
    }

    fn on_fingerprint_progress(&self, files_done: usize, _total_files: usize) {
        self.with_bar(|pb| pb.set_position(files_done as u64));
    }

    fn on_fingerprint_complete(&self, total_files: usize, duration_secs: f64) {
        self.finish_bar();
        eprintln!(
            "  \x1b[32m✓\x1b[0m Fingerprints complete: {} files in {:.2}s",
            total_files, duration_secs
        );
    }

    fn on_compare_start(&self, folder_pairs: usize) {
        self.set_bar(Self::counting_bar(
            "  {spinner:.cyan} Comparing [{bar:30.cyan/dim}] {pos}/{len} folder pairs",
            folder_pairs,
        ));
    }

    fn on_compare_progress(&self, pairs_done: usize, _folder_pairs: usize) {
        self.with_bar(|pb| pb.set_position(pairs_done as u64));
    }

    fn on_compare_complete(&self, findings: usize, duration_secs: f64) {
        self.finish_bar();
        eprintln!(
            "  \x1b[32m✓\x1b[0m Comparison complete: {} duplicates in {:.2}s",
            findings, duration_secs
        );
    }
}
