use crate::config::DEFAULT_QUARANTINE_DIR;
use crate::error::{Error, Result};
use crate::observer::DuplicateObserver;
use crate::report::DuplicateFinding;
use serde::Serialize;
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct RelocationSummary {
    /// `(from, to)` for every file moved.
    pub moved: Vec<(PathBuf, PathBuf)>,
    /// Files left in place because the destination already existed or the
    /// source had disappeared.
    pub skipped: Vec<PathBuf>,
}

/// Moves each duplicate into a quarantine subfolder of its owning folder.
///
/// A physical file is handled at most once, however many findings name it.
/// A file that was kept as the original of a moved file is never moved, and a
/// finding whose original has itself been moved is skipped, so every moved
/// file keeps a live copy outside quarantine.
/// Existing destinations are never overwritten. Moves are not transactional:
/// a failure leaves earlier moves in place.
#[derive(Debug)]
pub struct Relocator {
    quarantine_dir: String,
    handled: HashSet<PathBuf>,
    relocated: HashSet<PathBuf>,
    kept_originals: HashSet<PathBuf>,
    summary: RelocationSummary,
}

impl Default for Relocator {
    fn default() -> Self {
        Self::new(DEFAULT_QUARANTINE_DIR)
    }
}

impl Relocator {
    pub fn new(quarantine_dir: &str) -> Self {
        Self {
            quarantine_dir: quarantine_dir.to_string(),
            handled: HashSet::new(),
            relocated: HashSet::new(),
            kept_originals: HashSet::new(),
            summary: RelocationSummary::default(),
        }
    }

    pub fn summary(&self) -> &RelocationSummary {
        &self.summary
    }

    pub fn into_summary(self) -> RelocationSummary {
        info!(
            "Relocation done: {} moved, {} skipped",
            self.summary.moved.len(),
            self.summary.skipped.len()
        );
        self.summary
    }

    fn skip(&mut self, file: &Path) {
        if !self.summary.skipped.iter().any(|p| p == file) {
            self.summary.skipped.push(file.to_path_buf());
        }
    }

    /// Returns whether the file was moved.
    fn relocate(&mut self, file: &Path) -> Result<bool> {
        let owning_folder = file.parent().unwrap_or_else(|| Path::new("."));
        let file_name = match file.file_name() {
            Some(name) => name,
            None => {
                warn!("'{}' has no file name, skipping", file.display());
                self.skip(file);
                return Ok(false);
            }
        };

        if !file.exists() {
            warn!("File '{}' no longer exists, skipping", file.display());
            self.skip(file);
            return Ok(false);
        }

        let quarantine = owning_folder.join(&self.quarantine_dir);
        let destination = quarantine.join(file_name);

        if destination.exists() {
            warn!(
                "'{}' already exists, leaving '{}' in place",
                destination.display(),
                file.display()
            );
            self.skip(file);
            return Ok(false);
        }

        fs::create_dir_all(&quarantine).map_err(|source| Error::Relocation {
            path: file.to_path_buf(),
            source,
        })?;
        move_file(file, &destination).map_err(|source| Error::Relocation {
            path: file.to_path_buf(),
            source,
        })?;

        debug!("moved: {} -> {}", file.display(), destination.display());
        self.summary.skipped.retain(|p| p != file);
        self.summary
            .moved
            .push((file.to_path_buf(), destination));
        Ok(true)
    }
}

impl DuplicateObserver for Relocator {
    fn on_duplicate_found(&mut self, finding: &DuplicateFinding) -> Result<()> {
        let duplicate = &finding.duplicate_path;
        if self.handled.contains(duplicate) {
            debug!(
                "'{}' already handled, ignoring {} finding",
                duplicate.display(),
                finding.method
            );
            return Ok(());
        }

        // Not marked as handled: a later finding may pair it with a live original
        if self.relocated.contains(&finding.original_path) {
            warn!(
                "Original '{}' was already moved, leaving '{}' in place",
                finding.original_path.display(),
                duplicate.display()
            );
            self.skip(duplicate);
            return Ok(());
        }
        if self.kept_originals.contains(duplicate) {
            warn!(
                "'{}' is the kept original of a moved file, leaving it in place",
                duplicate.display()
            );
            self.skip(duplicate);
            return Ok(());
        }

        self.handled.insert(duplicate.clone());
        if self.relocate(duplicate)? {
            self.relocated.insert(duplicate.clone());
            self.kept_originals.insert(finding.original_path.clone());
        }
        Ok(())
    }
}

#[cfg(unix)]
const CROSS_DEVICE_ERROR: Option<i32> = Some(18); // EXDEV
#[cfg(windows)]
const CROSS_DEVICE_ERROR: Option<i32> = Some(17); // ERROR_NOT_SAME_DEVICE
#[cfg(not(any(unix, windows)))]
const CROSS_DEVICE_ERROR: Option<i32> = None;

fn crosses_devices(err: &io::Error) -> bool {
    CROSS_DEVICE_ERROR.is_some() && err.raw_os_error() == CROSS_DEVICE_ERROR
}

/// Rename, falling back to copy and remove when the rename crosses devices.
/// A failed fallback leaves the file only at `from`.
fn move_file(from: &Path, to: &Path) -> io::Result<()> {
    let rename_err = match fs::rename(from, to) {
        Ok(()) => return Ok(()),
        Err(e) if crosses_devices(&e) => e,
        Err(e) => return Err(e),
    };
    debug!(
        "rename of '{}' crosses devices ({}), copying instead",
        from.display(),
        rename_err
    );

    if let Err(copy_err) = fs::copy(from, to) {
        let _ = fs::remove_file(to);
        return Err(copy_err);
    }
    if let Err(remove_err) = fs::remove_file(from) {
        let _ = fs::remove_file(to);
        return Err(remove_err);
    }
    Ok(())
}
