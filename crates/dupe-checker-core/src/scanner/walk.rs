use glob::Pattern;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{error, trace};
use walkdir::WalkDir;

/// Compile glob ignore patterns, logging and dropping the invalid ones.
pub fn compile_ignore_patterns(ignore_globs: &[String]) -> Vec<Pattern> {
    ignore_globs
        .iter()
        .filter_map(|glob| match Pattern::new(glob) {
            Ok(p) => Some(p),
            Err(e) => {
                error!("Invalid glob pattern '{}': {}", glob, e);
                None
            }
        })
        .collect()
}

fn is_ignored(path: &Path, ignore_patterns: &[Pattern]) -> bool {
    let file_name = path.file_name().map(|f| f.to_string_lossy());
    ignore_patterns.iter().any(|pattern| {
        pattern.matches_path(path)
            || file_name
                .as_deref()
                .map(|name| pattern.matches(name))
                .unwrap_or(false)
    })
}

/// Regular files directly inside `dir`, sorted by file name.
/// Subdirectories (including the quarantine folder) are not entered.
pub fn list_folder_files(dir: &Path, ignore_patterns: &[Pattern]) -> io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|err| {
            let message = format!("Error reading directory {}: {}", dir.display(), err);
            io::Error::new(
                err.io_error()
                    .map(|e| e.kind())
                    .unwrap_or(io::ErrorKind::Other),
                message,
            )
        })?;

        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        if is_ignored(path, ignore_patterns) {
            trace!("Ignoring {}", path.display());
            continue;
        }
        files.push(path.to_path_buf());
    }

    Ok(files)
}
