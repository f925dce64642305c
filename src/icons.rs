//! Icon archive: zip every PNG the Qt resource manifest references.
//!
//! The editor ships its icons in a resource file (`iconResources.qrc`):
//!
//! ```xml
//! <RCC>
//!   <qresource>
//!     <file>icons/fileopen.png</file>
//!     <file>icons/zoomIn.png</file>
//!   </qresource>
//! </RCC>
//! ```
//!
//! Each `icons/<name>.png` reference is read from the icon directory and
//! stored in the archive as `<name>.png`. The archive is rebuilt from
//! scratch on every run.

use crate::config::IconsConfig;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

static ICON_REF: Lazy<Regex> = Lazy::new(|| Regex::new(r"icons/(.*\.png)").unwrap());

#[derive(Error, Debug)]
pub enum IconsError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Icon referenced by the resource file does not exist: {0}")]
    MissingIcon(PathBuf),
    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),
}

/// Result of an icon archive run.
#[derive(Debug)]
pub struct IconArchive {
    pub archive: PathBuf,
    pub icons: Vec<String>,
}

/// Icon names referenced by a resource manifest, in order of appearance.
pub fn referenced_icons(resources: &str) -> Vec<String> {
    ICON_REF
        .captures_iter(resources)
        .map(|caps| caps[1].to_string())
        .collect()
}

/// Build the icon archive described by `config`, relative to `root`.
pub fn archive_icons(root: &Path, config: &IconsConfig) -> Result<IconArchive, IconsError> {
    let resource_path = root.join(&config.resource_file);
    let resources = fs::read_to_string(&resource_path).map_err(|source| IconsError::Io {
        path: resource_path.clone(),
        source,
    })?;
    let icons = referenced_icons(&resources);

    let icon_dir = root.join(&config.icon_dir);
    for icon in &icons {
        let path = icon_dir.join(icon);
        if !path.is_file() {
            return Err(IconsError::MissingIcon(path));
        }
    }

    let archive = root.join(&config.archive);
    let file = File::create(&archive).map_err(|source| IconsError::Io {
        path: archive.clone(),
        source,
    })?;
    let mut zip = ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    for icon in &icons {
        let path = icon_dir.join(icon);
        let data = fs::read(&path).map_err(|source| IconsError::Io {
            path: path.clone(),
            source,
        })?;
        zip.start_file(icon.as_str(), options)?;
        zip.write_all(&data).map_err(|source| IconsError::Io {
            path: archive.clone(),
            source,
        })?;
    }
    zip.finish()?;

    Ok(IconArchive { archive, icons })
}
