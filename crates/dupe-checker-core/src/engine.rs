use crate::analysis::aliases::resolve_aliases;
use crate::analysis::matching::{find_cross_duplicates, find_self_duplicates};
use crate::config::AppConfig;
use crate::error::{Error, Result};
use crate::hasher::Method;
use crate::observer::DuplicateObserver;
use crate::progress::ProgressReporter;
use crate::report::{DuplicateFinding, DuplicateReport, FolderReport, StatusMatrix};
use crate::scanner;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Checks an ordered set of folders for duplicate files.
///
/// Folders earlier in the list have higher priority: when two files match,
/// the one in the earlier folder is the original and the other one is the
/// duplicate. Inside a folder the first file (by name) is the original.
pub struct DuplicateChecker {
    methods: Vec<Method>,
    ignore_patterns: Vec<String>,
    skip_unreadable: bool,
}

/// Files of one folder and their fingerprints, one list per method.
/// `fingerprints[m][k]` belongs to `files[k]`.
struct FolderRecords {
    alias: String,
    path: PathBuf,
    files: Vec<PathBuf>,
    fingerprints: Vec<Vec<String>>,
}

impl Default for DuplicateChecker {
    fn default() -> Self {
        Self::new(vec![Method::Checksum])
    }
}

impl DuplicateChecker {
    /// Repeated methods are dropped; an empty list means checksum only.
    pub fn new(methods: Vec<Method>) -> Self {
        let mut unique: Vec<Method> = Vec::new();
        for method in methods {
            if !unique.contains(&method) {
                unique.push(method);
            }
        }
        if unique.is_empty() {
            unique.push(Method::Checksum);
        }

        Self {
            methods: unique,
            ignore_patterns: Vec::new(),
            skip_unreadable: false,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.methods.clone())
            .with_ignore_patterns(config.ignore_patterns.clone())
            .with_skip_unreadable(config.skip_unreadable)
    }

    pub fn with_ignore_patterns(mut self, patterns: Vec<String>) -> Self {
        self.ignore_patterns = patterns;
        self
    }

    /// Record unreadable files in the report instead of aborting.
    pub fn with_skip_unreadable(mut self, skip: bool) -> Self {
        self.skip_unreadable = skip;
        self
    }

    pub fn methods(&self) -> &[Method] {
        &self.methods
    }

    /// Run the full check:
    /// 1. Preconditions (every path is a directory, alias count matches)
    /// 2. List and fingerprint the files of every folder
    /// 3. Compare every folder pair `(i, j)` with `i <= j`, notifying observers
    pub fn check<P: AsRef<Path>>(
        &self,
        folders: &[P],
        aliases: &[String],
        reporter: &dyn ProgressReporter,
        observers: &mut [&mut dyn DuplicateObserver],
    ) -> Result<DuplicateReport> {
        let folders: Vec<PathBuf> = folders.iter().map(|f| f.as_ref().to_path_buf()).collect();

        if let Some(not_dir) = folders.iter().find(|f| !f.is_dir()) {
            return Err(Error::NotADirectory(not_dir.clone()));
        }
        let aliases = resolve_aliases(&folders, aliases)?;
        warn_on_repeated_folders(&folders);

        info!(
            "Checking {} folders with methods {:?}",
            folders.len(),
            self.methods
        );

        // Phase 1: List
        reporter.on_scan_start();
        let scan_start = Instant::now();
        let patterns = scanner::compile_ignore_patterns(&self.ignore_patterns);
        let mut listings: Vec<Vec<PathBuf>> = Vec::with_capacity(folders.len());
        let mut files_found = 0usize;
        for (folder, alias) in folders.iter().zip(&aliases) {
            let files = scanner::list_folder_files(folder, &patterns)?;
            files_found += files.len();
            reporter.on_scan_progress(files_found, alias);
            debug!("{} files in '{}'", files.len(), alias);
            listings.push(files);
        }
        reporter.on_scan_complete(files_found, scan_start.elapsed().as_secs_f64());

        // Phase 2: Fingerprint
        reporter.on_fingerprint_start(files_found);
        let fingerprint_start = Instant::now();
        let mut unreadable: Vec<PathBuf> = Vec::new();
        let mut records: Vec<FolderRecords> = Vec::with_capacity(folders.len());
        let mut files_done = 0usize;
        for ((folder, alias), files) in folders.iter().zip(&aliases).zip(listings) {
            let mut record = FolderRecords {
                alias: alias.clone(),
                path: folder.clone(),
                files: Vec::with_capacity(files.len()),
                fingerprints: vec![Vec::with_capacity(files.len()); self.methods.len()],
            };

            for file in files {
                files_done += 1;
                reporter.on_fingerprint_progress(files_done, files_found);
                match self.fingerprint_all(&file) {
                    Ok(fingerprints) => {
                        for (list, fingerprint) in record.fingerprints.iter_mut().zip(fingerprints) {
                            list.push(fingerprint);
                        }
                        record.files.push(file);
                    }
                    Err(Error::Fingerprint { path, source }) if self.skip_unreadable => {
                        warn!("Skipping unreadable file {}: {}", path.display(), source);
                        unreadable.push(path);
                    }
                    Err(e) => return Err(e),
                }
            }
            records.push(record);
        }
        reporter.on_fingerprint_complete(files_done, fingerprint_start.elapsed().as_secs_f64());

        // Phase 3: Compare
        let folder_count = records.len();
        let pair_count = folder_count * (folder_count + 1) / 2;
        reporter.on_compare_start(pair_count);
        let compare_start = Instant::now();

        // Indices already claimed as duplicates, per (folder, method). For a
        // given folder j the pairs (0, j), (1, j), ..., (j, j) are visited in
        // that order, so the leftmost folder claims a duplicate first.
        let mut claimed: Vec<Vec<HashSet<usize>>> =
            vec![vec![HashSet::new(); self.methods.len()]; folder_count];
        let mut matrices: Vec<StatusMatrix> = (0..folder_count)
            .map(|i| StatusMatrix::new(&self.methods, &aliases[i..]))
            .collect();
        let mut findings: Vec<DuplicateFinding> = Vec::new();
        let mut pairs_done = 0usize;

        for i in 0..folder_count {
            for j in i..folder_count {
                for (m, method) in self.methods.iter().enumerate() {
                    let matches = if i == j {
                        find_self_duplicates(&records[j].fingerprints[m], &claimed[j][m])
                    } else {
                        find_cross_duplicates(
                            &records[i].fingerprints[m],
                            &records[j].fingerprints[m],
                            &claimed[j][m],
                        )
                    };

                    if !matches.is_empty() {
                        debug!(
                            "{} duplicates of '{}' in '{}' by {}",
                            matches.len(),
                            records[i].alias,
                            records[j].alias,
                            method
                        );
                    }

                    for (dup, org) in matches.pairs() {
                        if is_same_file(&records[j].files[dup], &records[i].files[org]) {
                            debug!(
                                "'{}' matched itself, not a duplicate",
                                records[j].files[dup].display()
                            );
                            continue;
                        }
                        matrices[i].increment(m, j - i);
                        claimed[j][m].insert(dup);

                        let finding = DuplicateFinding {
                            method: *method,
                            duplicate_alias: records[j].alias.clone(),
                            duplicate_path: records[j].files[dup].clone(),
                            duplicate_index: dup,
                            original_alias: records[i].alias.clone(),
                            original_path: records[i].files[org].clone(),
                            original_index: org,
                            fingerprint: records[j].fingerprints[m][dup].clone(),
                        };
                        for observer in observers.iter_mut() {
                            observer.on_duplicate_found(&finding)?;
                        }
                        findings.push(finding);
                    }
                }
                pairs_done += 1;
                reporter.on_compare_progress(pairs_done, pair_count);
            }
        }
        reporter.on_compare_complete(findings.len(), compare_start.elapsed().as_secs_f64());

        let folders: Vec<FolderReport> = records
            .into_iter()
            .zip(matrices)
            .zip(&claimed)
            .map(|((record, matrix), claimed_by_method)| {
                let duplicate_files = claimed_by_method
                    .iter()
                    .flatten()
                    .collect::<HashSet<_>>()
                    .len();
                FolderReport {
                    alias: record.alias,
                    path: record.path,
                    file_count: record.files.len(),
                    duplicate_files,
                    total: matrix.total(),
                    matrix,
                }
            })
            .collect();

        info!(
            "{} findings across {} folders",
            findings.len(),
            folders.len()
        );

        Ok(DuplicateReport {
            methods: self.methods.clone(),
            folders,
            findings,
            unreadable,
            relocation: None,
        })
    }

    fn fingerprint_all(&self, file: &Path) -> Result<Vec<String>> {
        self.methods
            .iter()
            .map(|method| method.fingerprint(file))
            .collect()
    }
}

fn canonical(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

/// Two listed paths that resolve to one file, e.g. a folder given twice.
fn is_same_file(a: &Path, b: &Path) -> bool {
    a == b || canonical(a) == canonical(b)
}

fn warn_on_repeated_folders(folders: &[PathBuf]) {
    let mut seen: HashSet<PathBuf> = HashSet::new();
    for folder in folders {
        if !seen.insert(canonical(folder)) {
            warn!(
                "Folder '{}' is listed more than once; its files are not reported as duplicates of themselves",
                folder.display()
            );
        }
    }
}
