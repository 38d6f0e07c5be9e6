pub mod walk;

pub use walk::{compile_ignore_patterns, list_folder_files};
