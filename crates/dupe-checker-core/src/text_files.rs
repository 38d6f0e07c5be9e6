use crate::error::{Error, Result};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

pub const REQUIREMENTS_FILE_NAME: &str = "requirements.txt";

/// Sort the lines of a text file alphabetically, ignoring case.
///
/// Blank lines are dropped. Lines comparing equal keep their relative order.
/// A file without any non-blank line is left untouched. Returns the number
/// of lines written.
pub fn sort_lines(path: &Path) -> Result<usize> {
    if !path.exists() {
        return Err(Error::InvalidInput(format!(
            "File '{}' does not exist",
            path.display()
        )));
    }
    if !path.is_file() {
        return Err(Error::InvalidInput(format!(
            "'{}' is not a regular file",
            path.display()
        )));
    }

    let content = fs::read_to_string(path)?;
    let mut lines: Vec<&str> = content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .collect();

    if lines.is_empty() {
        info!("'{}' has no lines to sort", path.display());
        return Ok(0);
    }

    lines.sort_by_cached_key(|line| line.to_lowercase());

    let mut sorted = String::with_capacity(content.len());
    for line in &lines {
        sorted.push_str(line);
        sorted.push('\n');
    }
    fs::write(path, sorted)?;

    info!("Sorted {} lines in '{}'", lines.len(), path.display());
    Ok(lines.len())
}

/// Merge every `requirements.txt` below `root` into `output`.
///
/// Files are taken in path order; each is preceded by a `# <relative path>`
/// comment and followed by a blank line. `output` itself is never read as an
/// input. Returns the number of files merged.
pub fn combine_requirements(root: &Path, output: &Path) -> Result<usize> {
    if !root.is_dir() {
        return Err(Error::NotADirectory(root.to_path_buf()));
    }

    let output_canonical = fs::canonicalize(output).ok();
    let mut inputs: Vec<PathBuf> = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.map_err(|e| Error::InvalidInput(e.to_string()))?;
        if !entry.file_type().is_file() || entry.file_name() != REQUIREMENTS_FILE_NAME {
            continue;
        }
        let path = entry.into_path();
        if output_canonical.is_some() && fs::canonicalize(&path).ok() == output_canonical {
            continue;
        }
        inputs.push(path);
    }
    inputs.sort();

    // Read everything first: `output` may live under `root`.
    let mut sections: Vec<(String, String)> = Vec::with_capacity(inputs.len());
    for path in &inputs {
        let relative = path.strip_prefix(root).unwrap_or(path);
        let content = fs::read_to_string(path)?;
        debug!("Merging {}", path.display());
        sections.push((relative.display().to_string(), content));
    }

    let mut file = fs::File::create(output)?;
    for (relative, content) in &sections {
        writeln!(file, "# {}", relative)?;
        file.write_all(content.as_bytes())?;
        writeln!(file)?;
    }
    file.flush()?;

    info!(
        "Combined {} requirement files into '{}'",
        sections.len(),
        output.display()
    );
    Ok(sections.len())
}
