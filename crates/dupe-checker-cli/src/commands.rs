use clap::{Args, Parser, Subcommand};
use dupe_checker_core::{AppConfig, Method};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "dupe-checker")]
#[command(about = "Check duplicated files inside a folder and across folders", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Check duplicated files inside each folder and across folders
    Check(CheckArgs),
    /// Sort the lines of a text file alphabetically
    SortLines {
        /// File to sort (asked for when omitted)
        file: Option<PathBuf>,
    },
    /// Merge every requirements.txt below a directory into one file
    CombineRequirements {
        #[arg(long, default_value = ".")]
        root: PathBuf,
        #[arg(long, default_value = "requirements.txt")]
        output: PathBuf,
    },
    /// Print configuration values
    PrintConfig,
}

#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Folders to check, priority decreases from left to right
    #[arg(long, num_args = 1..)]
    pub folders: Vec<String>,
    /// Aliases for folders
    #[arg(long, num_args = 1..)]
    pub aliases: Vec<String>,
    /// Methods to check duplicated files (checksum, name)
    #[arg(long, num_args = 1..)]
    pub methods: Vec<Method>,
    /// Glob patterns of files to leave out
    #[arg(long, num_args = 1..)]
    pub ignore: Vec<String>,
    /// Print every duplicated file with its original
    #[arg(long)]
    pub show: bool,
    /// Move duplicated files into a subfolder of their folder
    #[arg(long = "move")]
    pub move_duplicates: bool,
    /// Name of the subfolder receiving moved duplicates
    #[arg(long)]
    pub quarantine_dir: Option<String>,
    /// Do not ask before moving files
    #[arg(short, long)]
    pub yes: bool,
    /// Report unreadable files instead of stopping
    #[arg(long)]
    pub skip_unreadable: bool,
    /// Write the full report as JSON
    #[arg(long)]
    pub json: Option<PathBuf>,
    /// Write the duplicate counts as CSV
    #[arg(long)]
    pub csv: Option<PathBuf>,
}

impl CheckArgs {
    /// Command line values take precedence over the configuration file.
    pub fn apply_to(&self, config: &mut AppConfig) {
        if !self.folders.is_empty() {
            config.folders = self.folders.clone();
            config.aliases = self.aliases.clone();
        } else if !self.aliases.is_empty() {
            config.aliases = self.aliases.clone();
        }
        if !self.methods.is_empty() {
            config.methods = self.methods.clone();
        }
        if !self.ignore.is_empty() {
            config.ignore_patterns = self.ignore.clone();
        }
        if let Some(dir) = &self.quarantine_dir {
            config.quarantine_dir = dir.clone();
        }
        config.skip_unreadable |= self.skip_unreadable;
    }
}
