pub mod checksum;

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// How two files are compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    /// MD5 of the full file content.
    Checksum,
    /// Base name including extension, compared verbatim.
    Name,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Checksum => "checksum",
            Method::Name => "name",
        }
    }

    pub fn fingerprint(&self, file: &Path) -> Result<String> {
        match self {
            Method::Checksum => fingerprint_by_checksum(file),
            Method::Name => Ok(fingerprint_by_name(file)),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "checksum" => Ok(Method::Checksum),
            "name" => Ok(Method::Name),
            other => Err(format!(
                "unknown method '{}' (expected 'checksum' or 'name')",
                other
            )),
        }
    }
}

pub fn fingerprint_by_checksum(file: &Path) -> Result<String> {
    checksum::md5_hex(file).map_err(|source| Error::Fingerprint {
        path: file.to_path_buf(),
        source,
    })
}

pub fn fingerprint_by_name(file: &Path) -> String {
    file.file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_method_parse_and_display() {
        assert_eq!("checksum".parse::<Method>().unwrap(), Method::Checksum);
        assert_eq!("NAME".parse::<Method>().unwrap(), Method::Name);
        assert!("size".parse::<Method>().is_err());
        assert_eq!(Method::Checksum.to_string(), "checksum");
    }

    #[test]
    fn test_name_fingerprint_keeps_case_and_extension() {
        assert_eq!(fingerprint_by_name(Path::new("/a/b/Photo 1.JPG")), "Photo 1.JPG");
        assert_ne!(
            fingerprint_by_name(Path::new("/a/photo.jpg")),
            fingerprint_by_name(Path::new("/a/Photo.jpg"))
        );
    }

    #[test]
    fn test_checksum_ignores_name() {
        let tmp = tempdir().unwrap();
        let a = tmp.path().join("a.txt");
        let b = tmp.path().join("b.dat");
        fs::write(&a, "same bytes").unwrap();
        fs::write(&b, "same bytes").unwrap();
        assert_eq!(
            fingerprint_by_checksum(&a).unwrap(),
            fingerprint_by_checksum(&b).unwrap()
        );
    }

    #[test]
    fn test_checksum_error_names_path() {
        let tmp = tempdir().unwrap();
        let missing = tmp.path().join("gone.txt");
        match fingerprint_by_checksum(&missing) {
            Err(Error::Fingerprint { path, .. }) => assert_eq!(path, missing),
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
