//! Documentation generation: XML page data to HTML in two layouts.
//!
//! The editor's documentation lives in one XML file. Each element child of
//! the root is a page with optional `title`, `intro`, `mainBody` and `outro`
//! children holding HTML fragments. Two layouts are produced from it:
//!
//! | Layout | Record | Processor | Output |
//! |---|---|---|---|
//! | `multi` | [`MultiPage`] | [`MultiPageProcessor`] | one file per page, with previous/next/top links and inline CSS |
//! | `singleWeb` | [`SinglePage`] | [`SingleWebProcessor`] | one file holding every page's main body, external stylesheet |
//!
//! The pipeline is:
//!
//! ```text
//! docData.xml ─→ sections (loader) ─→ page records (link rewriting) ─→ processor ─→ template ─→ *.html
//! ```
//!
//! - [`sections`]: parses the XML into ordered [`PageFields`] and builds
//!   records through the [`PageRecord`] trait.
//! - [`page`]: the two record variants and the `<img>`/`<a>` rewriting each
//!   layout needs.
//! - [`processor`]: navigation and page assembly.
//! - [`template`]: single-pass `@@title`/`@@css`/`@@body` substitution.

pub mod page;
pub mod processor;
pub mod sections;
pub mod template;

pub use page::{MultiPage, PageFields, PageRecord, SinglePage};
pub use processor::{
    GeneratedPage, MultiPageProcessor, NavLink, SectionsProcessor, SingleWebProcessor,
};
pub use sections::{LoadedSections, RecordType, Sections};
pub use template::{Css, Template, TemplateError};

use crate::config::DocsConfig;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DocsError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("XML error in {path}: {source}")]
    Xml {
        path: PathBuf,
        #[source]
        source: quick_xml::Error,
    },
    #[error("Document has no root element: {0}")]
    NoRoot(PathBuf),
    #[error("Unrecognized parts type: {0}")]
    UnknownRecordType(String),
    #[error(transparent)]
    Template(#[from] TemplateError),
}

/// Everything one `docs` run wrote, per layout.
#[derive(Debug, Default)]
pub struct DocsReport {
    pub multi: Vec<GeneratedPage>,
    pub single: Vec<GeneratedPage>,
}

impl DocsReport {
    pub fn file_count(&self) -> usize {
        self.multi.len() + self.single.len()
    }
}

/// Run the documentation processors configured in `config`.
///
/// `layout` restricts the run to one layout; `None` runs both, multi-page
/// first. All paths in `config` are resolved against `root`.
pub fn generate(
    root: &Path,
    config: &DocsConfig,
    layout: Option<RecordType>,
) -> Result<DocsReport, DocsError> {
    let source = root.join(&config.source);
    let template = Template::load(&root.join(&config.template))?;
    let record_types = match layout {
        Some(record_type) => vec![record_type],
        None => vec![RecordType::Multi, RecordType::SingleWeb],
    };
    let mut report = DocsReport::default();

    for record_type in record_types {
        let image_prefix = match record_type {
            RecordType::Multi => &config.multi.image_prefix,
            RecordType::SingleWeb => &config.single.image_prefix,
        };
        match LoadedSections::load(&source, record_type, image_prefix)? {
            LoadedSections::Multi(sections) => {
                let css = multi_page_css(root, config)?;
                let processor = MultiPageProcessor::new(sections, template.clone(), css);
                report.multi =
                    processor.process_sections(&root.join(&config.multi.output_dir))?;
            }
            LoadedSections::SingleWeb(sections) => {
                let processor = SingleWebProcessor::new(sections, template.clone())
                    .with_title(&config.single.title)
                    .with_stylesheet(&config.single.stylesheet)
                    .with_output_file(&config.single.output_file);
                report.single =
                    processor.process_sections(&root.join(&config.single.output_dir))?;
            }
        }
    }

    Ok(report)
}

/// What `check` found in the documentation inputs.
#[derive(Debug, Default)]
pub struct DocsCheck {
    /// `(title, file name)` for every page, in section order.
    pub pages: Vec<(String, String)>,
    /// File names claimed by more than one page, with the titles involved.
    pub collisions: Vec<(String, Vec<String>)>,
}

/// Parse the documentation inputs without writing anything.
///
/// Fails on the same errors [`generate`] would. Filename collisions are
/// reported, not rejected: when written, the later page overwrites the
/// earlier one.
pub fn check(root: &Path, config: &DocsConfig) -> Result<DocsCheck, DocsError> {
    Template::load(&root.join(&config.template))?;
    multi_page_css(root, config)?;
    let sections: Sections<MultiPage> =
        Sections::load(&root.join(&config.source), &config.multi.image_prefix)?;

    let pages: Vec<(String, String)> = sections
        .pages
        .iter()
        .map(|p| (p.title().to_string(), p.filename()))
        .collect();

    let mut collisions: Vec<(String, Vec<String>)> = Vec::new();
    for (title, file) in &pages {
        match collisions.iter_mut().find(|(f, _)| f == file) {
            Some((_, titles)) => titles.push(title.clone()),
            None => collisions.push((file.clone(), vec![title.clone()])),
        }
    }
    collisions.retain(|(_, titles)| titles.len() > 1);

    Ok(DocsCheck { pages, collisions })
}

/// Stylesheet inlined into multi-page output: the configured file, or the
/// built-in one.
fn multi_page_css(root: &Path, config: &DocsConfig) -> Result<String, DocsError> {
    match &config.multi.css_file {
        Some(css_file) => {
            let path = root.join(css_file);
            std::fs::read_to_string(&path).map_err(|source| DocsError::Io { path, source })
        }
        None => Ok(processor::DEFAULT_CSS.to_string()),
    }
}
