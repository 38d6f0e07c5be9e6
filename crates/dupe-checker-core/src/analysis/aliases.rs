use crate::error::{Error, Result};
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// Display name of a folder when the caller did not give one.
pub fn default_alias(folder: &Path) -> String {
    folder
        .file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_else(|| folder.display().to_string())
}

/// Resolve the alias of every folder.
///
/// Without explicit aliases the folder base names are used. Repeated aliases
/// get a `(n)` suffix from a per-alias counter; the first occurrence keeps its
/// name and a suffix already taken by another alias is skipped.
pub fn resolve_aliases<P: AsRef<Path>>(folders: &[P], aliases: &[String]) -> Result<Vec<String>> {
    let requested: Vec<String> = if aliases.is_empty() {
        folders.iter().map(|f| default_alias(f.as_ref())).collect()
    } else {
        aliases.to_vec()
    };

    let resolved = disambiguate(&requested);

    if resolved.len() != folders.len() {
        return Err(Error::AliasCountMismatch {
            aliases: resolved.len(),
            folders: folders.len(),
        });
    }

    Ok(resolved)
}

pub fn disambiguate(aliases: &[String]) -> Vec<String> {
    let mut taken: HashSet<String> = aliases.iter().cloned().collect();
    let mut seen: HashSet<&str> = HashSet::new();
    let mut counters: HashMap<&str, usize> = HashMap::new();
    let mut resolved = Vec::with_capacity(aliases.len());

    for alias in aliases {
        if seen.insert(alias.as_str()) {
            resolved.push(alias.clone());
            continue;
        }

        let counter = counters.entry(alias.as_str()).or_insert(1);
        let mut candidate = format!("{}({})", alias, counter);
        while taken.contains(&candidate) {
            *counter += 1;
            candidate = format!("{}({})", alias, counter);
        }
        *counter += 1;

        taken.insert(candidate.clone());
        resolved.push(candidate);
    }

    resolved
}
