//! Floss table conversion: kxstitch floss XML to C++ source lines.
//!
//! The editor's DMC color list is compiled in. This module turns a floss
//! scheme in kxstitch format into the lines pasted into `colorLists.cpp`:
//!
//! ```xml
//! <flossScheme>
//!   <title>DMC</title>
//!   <floss>
//!     <name>310</name>
//!     <description>Black</description>
//!     <color><red>0</red><green>0</green><blue>0</blue></color>
//!   </floss>
//! </flossScheme>
//! ```
//!
//! becomes
//!
//! ```text
//!   dmc.push_back(floss(310, "Black", triC(0,0,0)));
//! ```
//!
//! Note the naming: kxstitch's `name` is the floss code, its `description`
//! is the floss name. Root children without a description (such as the
//! scheme's `title`) are skipped.

use quick_xml::Reader;
use quick_xml::events::Event;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FlossError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),
    #[error("Floss \"{0}\" has no code")]
    MissingCode(String),
    #[error("Floss \"{name}\" has no {component} component")]
    MissingColor { name: String, component: &'static str },
    #[error("Floss \"{name}\" has invalid {component} value \"{value}\"")]
    InvalidColor {
        name: String,
        component: &'static str,
        value: String,
    },
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// One floss color.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Floss {
    /// Manufacturer code, e.g. `310`.
    pub code: String,
    /// Color name, e.g. `Black`.
    pub name: String,
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl Floss {
    /// The C++ statement adding this floss to `list_name`.
    pub fn to_cpp(&self, list_name: &str) -> String {
        format!(
            "  {}.push_back(floss({}, \"{}\", triC({},{},{})));",
            list_name,
            self.code,
            escape_cpp_string(&self.name),
            self.red,
            self.green,
            self.blue
        )
    }
}

fn escape_cpp_string(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Output format for the `floss` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum FlossFormat {
    /// C++ `push_back` lines.
    #[default]
    Cpp,
    /// JSON array of floss objects.
    Json,
}

/// Render a floss list in `format`.
pub fn render(
    flosses: &[Floss],
    format: FlossFormat,
    list_name: &str,
) -> Result<String, FlossError> {
    match format {
        FlossFormat::Cpp => Ok(flosses
            .iter()
            .map(|f| format!("{}\n", f.to_cpp(list_name)))
            .collect()),
        FlossFormat::Json => Ok(serde_json::to_string_pretty(flosses)? + "\n"),
    }
}

/// Read and parse a floss table file.
pub fn load_floss_table(path: &Path) -> Result<Vec<Floss>, FlossError> {
    let content = fs::read_to_string(path).map_err(|source| FlossError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_floss_table(&content)
}

/// Fields gathered for one root child before validation.
#[derive(Default)]
struct RawFloss {
    code: Option<String>,
    name: Option<String>,
    red: Option<String>,
    green: Option<String>,
    blue: Option<String>,
}

impl RawFloss {
    fn slot(&mut self, path: &[String]) -> Option<&mut Option<String>> {
        match path {
            [tag] if tag == "name" => Some(&mut self.code),
            [tag] if tag == "description" => Some(&mut self.name),
            [color, tag] if color == "color" => match tag.as_str() {
                "red" => Some(&mut self.red),
                "green" => Some(&mut self.green),
                "blue" => Some(&mut self.blue),
                _ => None,
            },
            _ => None,
        }
    }

    /// `Ok(None)` for entries without a description.
    fn into_floss(self) -> Result<Option<Floss>, FlossError> {
        let Some(name) = self.name else {
            return Ok(None);
        };
        let code = self
            .code
            .filter(|c| !c.is_empty())
            .ok_or_else(|| FlossError::MissingCode(name.clone()))?;
        let red = parse_component(&name, "red", self.red)?;
        let green = parse_component(&name, "green", self.green)?;
        let blue = parse_component(&name, "blue", self.blue)?;
        Ok(Some(Floss {
            code,
            name,
            red,
            green,
            blue,
        }))
    }
}

fn parse_component(
    name: &str,
    component: &'static str,
    value: Option<String>,
) -> Result<u8, FlossError> {
    let value = value.ok_or_else(|| FlossError::MissingColor {
        name: name.to_string(),
        component,
    })?;
    value.parse::<u8>().map_err(|_| FlossError::InvalidColor {
        name: name.to_string(),
        component,
        value,
    })
}

/// Parse a floss table held in memory.
pub fn parse_floss_table(xml: &str) -> Result<Vec<Floss>, FlossError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(false);

    let mut flosses = Vec::new();
    let mut current: Option<RawFloss> = None;
    // Element names below the current root child.
    let mut path: Vec<String> = Vec::new();
    let mut text = String::new();
    let mut depth = 0usize;

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                depth += 1;
                match depth {
                    1 => {}
                    2 => current = Some(RawFloss::default()),
                    _ => path.push(String::from_utf8_lossy(e.name().as_ref()).to_string()),
                }
                text.clear();
            }
            Event::Text(e) => text.push_str(&String::from_utf8_lossy(e.as_ref())),
            Event::CData(e) => text.push_str(&String::from_utf8_lossy(&e)),
            Event::GeneralRef(e) => {
                let entity = String::from_utf8_lossy(e.as_ref());
                match entity.as_ref() {
                    "amp" => text.push('&'),
                    "lt" => text.push('<'),
                    "gt" => text.push('>'),
                    "quot" => text.push('"'),
                    "apos" => text.push('\''),
                    other => {
                        text.push('&');
                        text.push_str(other);
                        text.push(';');
                    }
                }
            }
            Event::End(_) => {
                if depth == 2 {
                    if let Some(raw) = current.take()
                        && let Some(floss) = raw.into_floss()?
                    {
                        flosses.push(floss);
                    }
                } else if depth > 2 {
                    if let Some(slot) = current.as_mut().and_then(|raw| raw.slot(&path))
                        && slot.is_none()
                    {
                        *slot = Some(text.trim().to_string());
                    }
                    path.pop();
                }
                text.clear();
                depth = depth.saturating_sub(1);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(flosses)
}
