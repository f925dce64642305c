//! Release packaging: version lookup, binary packing, and archive creation.
//!
//! `package` turns a freshly built editor binary into a distributable
//! archive under the versions directory:
//!
//! | Platform | Selected when | Steps | Archive |
//! |---|---|---|---|
//! | Windows | binary name ends in `exe` | stage READMEs (CRLF, `.txt`) and binary, `upx`, zip | `<program>_<ver>_win32.zip` |
//! | Linux | anything else | `patchelf`, `upx`, `tar czf` | `<program>_<ver>_linux32.tar.gz` |
//!
//! Either way a `<archive>.sha256` file is written next to the archive.
//! External programs go through [`ToolRunner`] so the flow can be tested
//! without them.

pub mod archive;
pub mod tools;
pub mod version;

pub use tools::{SystemTools, ToolRunner};
pub use version::{extract_version, read_version};

use crate::config::ReleaseConfig;
use sha2::{Digest, Sha256};
use std::ffi::OsString;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReleaseError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Couldn't determine version from {0}")]
    VersionNotFound(PathBuf),
    #[error("Binary not found: {0}")]
    MissingBinary(PathBuf),
    #[error("Failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{program} exited with status {status}")]
    ToolFailed { program: String, status: i32 },
    #[error("{0} is already packed")]
    AlreadyPacked(PathBuf),
    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),
}

/// Target platform of a binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Windows,
    Linux,
}

impl Platform {
    /// Windows for names ending in `exe`, Linux otherwise.
    pub fn detect(binary: &Path) -> Self {
        if binary.to_string_lossy().ends_with("exe") {
            Platform::Windows
        } else {
            Platform::Linux
        }
    }

    /// READMEs shipped for this platform.
    pub fn readmes(self, config: &ReleaseConfig) -> &[String] {
        match self {
            Platform::Windows => &config.windows_readmes,
            Platform::Linux => &config.linux_readmes,
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Platform::Windows => write!(f, "Windows"),
            Platform::Linux => write!(f, "Linux"),
        }
    }
}

/// A finished release archive.
#[derive(Debug, Clone, PartialEq)]
pub struct ReleasePackage {
    pub version: String,
    pub platform: Platform,
    pub archive: PathBuf,
    pub checksum_file: PathBuf,
    pub digest: String,
}

/// Package `binary` (relative to `root`, or absolute) for release.
pub fn package(
    root: &Path,
    config: &ReleaseConfig,
    binary: &Path,
    tools: &dyn ToolRunner,
) -> Result<ReleasePackage, ReleaseError> {
    let version = read_version(&root.join(&config.main_source))?;
    let binary_path = root.join(binary);
    if !binary_path.is_file() {
        return Err(ReleaseError::MissingBinary(binary_path));
    }

    let platform = Platform::detect(binary);
    let archive = match platform {
        Platform::Windows => archive::windows(root, config, &version, binary, tools)?,
        Platform::Linux => archive::linux(root, config, &version, binary, tools)?,
    };
    let (checksum_file, digest) = write_checksum(&archive)?;

    Ok(ReleasePackage {
        version,
        platform,
        archive,
        checksum_file,
        digest,
    })
}

/// Write `<archive>.sha256` in `sha256sum` format and return it with the digest.
pub fn write_checksum(archive: &Path) -> Result<(PathBuf, String), ReleaseError> {
    let bytes = fs::read(archive).map_err(|source| ReleaseError::Io {
        path: archive.to_path_buf(),
        source,
    })?;
    let digest = format!("{:x}", Sha256::digest(&bytes));

    let mut name = OsString::from(archive.as_os_str());
    name.push(".sha256");
    let checksum_file = PathBuf::from(name);
    let file_name = archive
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    fs::write(&checksum_file, format!("{digest}  {file_name}\n")).map_err(|source| {
        ReleaseError::Io {
            path: checksum_file.clone(),
            source,
        }
    })?;

    Ok((checksum_file, digest))
}
