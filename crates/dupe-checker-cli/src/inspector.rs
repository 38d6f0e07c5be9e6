use colored::*;
use dupe_checker_core::error::Result;
use dupe_checker_core::{DuplicateFinding, DuplicateObserver};

fn file_name(finding_path: &std::path::Path) -> String {
    finding_path
        .file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_else(|| finding_path.display().to_string())
}

/// Prints every finding as it is found.
pub struct ConsoleInspector;

impl DuplicateObserver for ConsoleInspector {
    fn on_duplicate_found(&mut self, finding: &DuplicateFinding) -> Result<()> {
        println!("\n{}", "-".repeat(50));
        println!(
            "Duplicated file ({}): {}",
            finding.duplicate_alias.cyan(),
            file_name(&finding.duplicate_path).yellow()
        );
        println!(
            "Duplicate of ({}): {}",
            finding.original_alias.cyan(),
            file_name(&finding.original_path).green()
        );
        println!(
            "Reason: Same {} ({})",
            finding.method.to_string().bold(),
            finding.fingerprint
        );
        Ok(())
    }
}
