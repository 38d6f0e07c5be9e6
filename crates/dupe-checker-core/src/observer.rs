use crate::error::Result;
use crate::report::DuplicateFinding;

/// Side effect run for every duplicate the checker finds.
///
/// Observers are called in registration order, once per finding. A file
/// flagged by several methods produces several findings. Returning an error
/// aborts the check.
pub trait DuplicateObserver {
    fn on_duplicate_found(&mut self, finding: &DuplicateFinding) -> Result<()>;
}

/// Keeps every finding it sees.
#[derive(Debug, Default)]
pub struct FindingRecorder {
    pub findings: Vec<DuplicateFinding>,
}

impl DuplicateObserver for FindingRecorder {
    fn on_duplicate_found(&mut self, finding: &DuplicateFinding) -> Result<()> {
        self.findings.push(finding.clone());
        Ok(())
    }
}
