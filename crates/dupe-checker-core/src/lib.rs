pub mod analysis;
pub mod config;
pub mod engine;
pub mod error;
pub mod hasher;
pub mod observer;
pub mod progress;
pub mod report;
pub mod scanner;
pub mod text_files;

pub use analysis::relocation::{RelocationSummary, Relocator};
pub use config::AppConfig;
pub use engine::DuplicateChecker;
pub use error::Error;
pub use hasher::Method;
pub use observer::{DuplicateObserver, FindingRecorder};
pub use progress::{ProgressReporter, SilentReporter};
pub use report::{DuplicateFinding, DuplicateReport, FolderReport, StatusMatrix};
