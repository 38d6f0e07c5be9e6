use crate::hasher::Method;
use config::{Config, ConfigError, Environment, File as ConfigFile};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_QUARANTINE_DIR: &str = "duplicated";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Folders to check, highest priority first.
    pub folders: Vec<String>,
    pub aliases: Vec<String>,
    pub methods: Vec<Method>,
    pub ignore_patterns: Vec<String>,
    pub quarantine_dir: String,
    pub skip_unreadable: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            folders: Vec::new(),
            aliases: Vec::new(),
            methods: vec![Method::Checksum],
            ignore_patterns: Vec::new(),
            quarantine_dir: DEFAULT_QUARANTINE_DIR.to_string(),
            skip_unreadable: false,
        }
    }
}

fn environment() -> Environment {
    Environment::with_prefix("DUPE_CHECKER")
        .try_parsing(true)
        .list_separator(",")
        .with_list_parse_key("folders")
        .with_list_parse_key("aliases")
        .with_list_parse_key("methods")
        .with_list_parse_key("ignore_patterns")
}

/// Optional `Config.{toml,json,yaml,...}` in the working directory, then
/// `DUPE_CHECKER_*` environment variables.
pub fn load_configuration() -> Result<AppConfig, ConfigError> {
    let builder = Config::builder()
        .add_source(ConfigFile::with_name("Config").required(false))
        .add_source(environment())
        .build()?;
    builder.try_deserialize::<AppConfig>()
}

pub fn load_configuration_from(path: &Path) -> Result<AppConfig, ConfigError> {
    let builder = Config::builder()
        .add_source(ConfigFile::from(path).required(true))
        .build()?;
    builder.try_deserialize::<AppConfig>()
}
