//! Program version lookup in the editor's `main.cpp`.
//!
//! The version is set with a four-part string, e.g.
//! `setProgramVersion("0.9.4.2")`; release names use the first three parts.

use super::ReleaseError;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs;
use std::path::Path;

static PROGRAM_VERSION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"setProgramVersion\("([0-9]+\.[0-9]+\.[0-9]+)\.[0-9]+""#).unwrap()
});

/// Three-part version from the first line that sets one.
pub fn extract_version(source: &str) -> Option<String> {
    source
        .lines()
        .find_map(|line| PROGRAM_VERSION.captures(line))
        .map(|caps| caps[1].to_string())
}

/// Read `path` and extract its program version.
pub fn read_version(path: &Path) -> Result<String, ReleaseError> {
    let source = fs::read_to_string(path).map_err(|source| ReleaseError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    extract_version(&source).ok_or_else(|| ReleaseError::VersionNotFound(path.to_path_buf()))
}
