//! Project configuration module.
//!
//! Handles loading, validating, and merging the `tools.toml` file found at
//! the project root. Every key is optional: stock defaults describe the
//! usual cstitch source tree, and the file only needs to override what
//! differs.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [docs]
//! source = "doc/docData.xml"          # Documentation XML
//! template = "doc/html_template.html" # Template with @@title, @@css, @@body
//!
//! [docs.multi]
//! output_dir = "doc"                  # One file per page lands here
//! image_prefix = ":"                  # Inserted in front of every <img src>
//! # css_file = "doc/qt.css"           # Inline this instead of the built-in CSS
//!
//! [docs.single]
//! output_dir = "doc"
//! output_file = "cstitchDoc.html"
//! title = "Cstitch documentation"
//! stylesheet = "doc.css"              # Linked, not inlined
//! image_prefix = "images/32x32_"
//!
//! [icons]
//! resource_file = "iconResources.qrc"
//! icon_dir = "icons"
//! archive = "icons/icons.zip"
//!
//! [floss]
//! source = "dmc.xml"
//! list_name = "dmc"
//!
//! [release]
//! main_source = "main.cpp"
//! readme_dir = "doc/web"
//! versions_dir = "versions"
//! program_name = "cstitch"
//! display_name = "Cstitch"
//! interpreter = "/lib/ld-linux.so.2"
//! windows_readmes = []
//! linux_readmes = ["README_linux"]
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// File name looked up in the project root.
pub const CONFIG_FILENAME: &str = "tools.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Project configuration loaded from `tools.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ToolsConfig {
    /// Documentation generator settings.
    pub docs: DocsConfig,
    /// Icon archive settings.
    pub icons: IconsConfig,
    /// Floss table conversion settings.
    pub floss: FlossConfig,
    /// Release packaging settings.
    pub release: ReleaseConfig,
}

impl ToolsConfig {
    /// Validate that every path and name the tools depend on is set.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let required = [
            ("docs.source", &self.docs.source),
            ("docs.template", &self.docs.template),
            ("docs.single.output_file", &self.docs.single.output_file),
            ("docs.single.stylesheet", &self.docs.single.stylesheet),
            ("icons.resource_file", &self.icons.resource_file),
            ("icons.archive", &self.icons.archive),
            ("floss.source", &self.floss.source),
            ("floss.list_name", &self.floss.list_name),
            ("release.main_source", &self.release.main_source),
            ("release.program_name", &self.release.program_name),
            ("release.display_name", &self.release.display_name),
        ];
        for (key, value) in required {
            if value.trim().is_empty() {
                return Err(ConfigError::Validation(format!("{key} must not be empty")));
            }
        }
        if self.docs.multi.css_file.as_deref().is_some_and(str::is_empty) {
            return Err(ConfigError::Validation(
                "docs.multi.css_file must not be empty when set".into(),
            ));
        }
        Ok(())
    }
}

/// Documentation generator settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DocsConfig {
    /// Documentation XML, one element per page under the root.
    pub source: String,
    /// HTML template containing the `@@title`, `@@css` and `@@body` tokens.
    pub template: String,
    /// Multi-page (help browser) layout.
    pub multi: MultiPageConfig,
    /// Single-page (website) layout.
    pub single: SinglePageConfig,
}

impl Default for DocsConfig {
    fn default() -> Self {
        Self {
            source: "doc/docData.xml".to_string(),
            template: "doc/html_template.html".to_string(),
            multi: MultiPageConfig::default(),
            single: SinglePageConfig::default(),
        }
    }
}

/// Multi-page layout settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MultiPageConfig {
    pub output_dir: String,
    /// Prefix for image sources; `:` addresses the Qt resource system.
    pub image_prefix: String,
    /// Stylesheet to inline in every page. The built-in one is used when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub css_file: Option<String>,
}

impl Default for MultiPageConfig {
    fn default() -> Self {
        Self {
            output_dir: "doc".to_string(),
            image_prefix: ":".to_string(),
            css_file: None,
        }
    }
}

/// Single-page layout settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SinglePageConfig {
    pub output_dir: String,
    pub output_file: String,
    /// Document title placed in the head.
    pub title: String,
    /// Stylesheet referenced with a `<link>` element.
    pub stylesheet: String,
    pub image_prefix: String,
}

impl Default for SinglePageConfig {
    fn default() -> Self {
        Self {
            output_dir: "doc".to_string(),
            output_file: "cstitchDoc.html".to_string(),
            title: "Cstitch documentation".to_string(),
            stylesheet: "doc.css".to_string(),
            image_prefix: "images/32x32_".to_string(),
        }
    }
}

/// Icon archive settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IconsConfig {
    /// Qt resource manifest listing the icons.
    pub resource_file: String,
    /// Directory the `icons/...` entries are read from.
    pub icon_dir: String,
    pub archive: String,
}

impl Default for IconsConfig {
    fn default() -> Self {
        Self {
            resource_file: "iconResources.qrc".to_string(),
            icon_dir: "icons".to_string(),
            archive: "icons/icons.zip".to_string(),
        }
    }
}

/// Floss table conversion settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FlossConfig {
    /// Floss table in kxstitch XML format.
    pub source: String,
    /// C++ vector the generated lines push into.
    pub list_name: String,
}

impl Default for FlossConfig {
    fn default() -> Self {
        Self {
            source: "dmc.xml".to_string(),
            list_name: "dmc".to_string(),
        }
    }
}

/// Release packaging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReleaseConfig {
    /// Source file holding the `setProgramVersion("X.Y.Z.B")` call.
    pub main_source: String,
    pub readme_dir: String,
    pub versions_dir: String,
    /// Lower-case name used in archive and binary names.
    pub program_name: String,
    /// Capitalized name used for the Windows staging directory.
    pub display_name: String,
    /// ELF interpreter patched into Linux binaries.
    pub interpreter: String,
    pub windows_readmes: Vec<String>,
    pub linux_readmes: Vec<String>,
}

impl Default for ReleaseConfig {
    fn default() -> Self {
        Self {
            main_source: "main.cpp".to_string(),
            readme_dir: "doc/web".to_string(),
            versions_dir: "versions".to_string(),
            program_name: "cstitch".to_string(),
            display_name: "Cstitch".to_string(),
            interpreter: "/lib/ld-linux.so.2".to_string(),
            windows_readmes: Vec::new(),
            linux_readmes: vec!["README_linux".to_string()],
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(ToolsConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `tools.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_raw_config(root: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = root.join(CONFIG_FILENAME);
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<ToolsConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: ToolsConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `tools.toml` in the project root.
pub fn load_config(root: &Path) -> Result<ToolsConfig, ConfigError> {
    let base = stock_defaults_value();
    let overlay = load_raw_config(root)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `tools.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# cstitch-tools configuration
# ==========================
# All settings are optional. Values shown below are the defaults.
# Paths are relative to the project root (the --root flag).
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Documentation
# ---------------------------------------------------------------------------
[docs]
# XML source: the root element's children are the pages, each with optional
# <title>, <intro>, <mainBody> and <outro> children holding HTML.
source = "doc/docData.xml"

# HTML template. @@title, @@css and @@body are replaced in one pass.
template = "doc/html_template.html"

# One file per page, named after the page title, with navigation links.
[docs.multi]
output_dir = "doc"
# Inserted in front of every <img src>. ":" addresses the Qt resource system.
image_prefix = ":"
# Stylesheet inlined into each page. Omit to use the built-in stylesheet.
# css_file = "doc/qt.css"

# All page bodies concatenated into a single document.
[docs.single]
output_dir = "doc"
output_file = "cstitchDoc.html"
title = "Cstitch documentation"
# Referenced with <link rel="stylesheet">, not inlined.
stylesheet = "doc.css"
image_prefix = "images/32x32_"

# ---------------------------------------------------------------------------
# Icons
# ---------------------------------------------------------------------------
[icons]
# Every icons/*.png referenced here is added to the archive.
resource_file = "iconResources.qrc"
icon_dir = "icons"
archive = "icons/icons.zip"

# ---------------------------------------------------------------------------
# Floss table
# ---------------------------------------------------------------------------
[floss]
source = "dmc.xml"
# Generated lines read: <list_name>.push_back(floss(...));
list_name = "dmc"

# ---------------------------------------------------------------------------
# Release packaging
# ---------------------------------------------------------------------------
[release]
# Holds setProgramVersion("X.Y.Z.B"); X.Y.Z becomes the release version.
main_source = "main.cpp"
readme_dir = "doc/web"
versions_dir = "versions"
program_name = "cstitch"
display_name = "Cstitch"
# ELF interpreter patched into Linux binaries.
interpreter = "/lib/ld-linux.so.2"
windows_readmes = []
linux_readmes = ["README_linux"]
"##
}
