//! Section processors: page records to HTML files.
//!
//! ## Multi-page navigation
//!
//! Every page of the multi-page layout is wrapped in the same navigation
//! paragraph, top and bottom:
//!
//! ```text
//! <p>
//! Previous: <a href="overview.html">Overview</a>;
//! Next: <a href="colors.html">The Colors panel</a>;
//! Top: <a href="overview.html">Overview</a>
//! </p>
//! ```
//!
//! Page 0 is the overview. It has no previous or top link, and it keeps its
//! literal title wherever it is linked. Other pages are linked as
//! "The … panel"; on the previous side the title is lower-cased. The last
//! page has no next link.

use super::DocsError;
use super::page::{MultiPage, PageRecord, SinglePage};
use super::sections::Sections;
use super::template::{Css, Template};
use maud::html;
use std::fs;
use std::path::{Path, PathBuf};

/// Stylesheet inlined into multi-page output when none is configured.
pub const DEFAULT_CSS: &str = "h1 {color: #00B300; }
h2 {color: #009900; }
h3 {color: #004D00; }
div.h2Div {margin-left: 15px;}
div.h3Div {margin-left: 30px;}
body {
    max-width: 950px;
    margin-left: auto;
    margin-right: auto;
}";

/// One written HTML file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedPage {
    pub title: String,
    pub path: PathBuf,
}

/// Formats loaded sections and writes them out.
pub trait SectionsProcessor {
    /// Write every output file into `output_dir`, creating it if needed.
    fn process_sections(&self, output_dir: &Path) -> Result<Vec<GeneratedPage>, DocsError>;
}

fn create_output_dir(output_dir: &Path) -> Result<(), DocsError> {
    fs::create_dir_all(output_dir).map_err(|source| DocsError::Io {
        path: output_dir.to_path_buf(),
        source,
    })
}

// ============================================================================
// Multi-page
// ============================================================================

/// A navigation target: file to link and the text shown for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavLink {
    pub file: String,
    pub title: String,
}

/// Writes one file per page with previous/next/top navigation.
pub struct MultiPageProcessor {
    sections: Sections<MultiPage>,
    template: Template,
    css: String,
}

impl MultiPageProcessor {
    pub fn new(sections: Sections<MultiPage>, template: Template, css: impl Into<String>) -> Self {
        Self {
            sections,
            template,
            css: css.into(),
        }
    }

    pub fn sections(&self) -> &Sections<MultiPage> {
        &self.sections
    }

    /// Link to the page before `index`, if both pages exist.
    pub fn previous_link(&self, index: usize) -> Option<NavLink> {
        self.sections.pages.get(index)?;
        let prev_index = index.checked_sub(1)?;
        let prev = self.sections.pages.get(prev_index)?;
        let title = if prev_index == 0 {
            prev.title().to_string()
        } else {
            format!("The {} panel", prev.title().to_lowercase())
        };
        Some(NavLink {
            file: prev.filename(),
            title,
        })
    }

    /// Link to the page after `index`, if any.
    pub fn next_link(&self, index: usize) -> Option<NavLink> {
        let next = self.sections.pages.get(index + 1)?;
        Some(NavLink {
            file: next.filename(),
            title: format!("The {} panel", next.title()),
        })
    }

    /// Link to the overview (page 0), for every other page in the set.
    pub fn top_link(&self, index: usize) -> Option<NavLink> {
        if index == 0 || index >= self.sections.len() {
            return None;
        }
        let overview = self.sections.pages.first()?;
        Some(NavLink {
            file: overview.filename(),
            title: overview.title().to_string(),
        })
    }

    /// The navigation paragraph for the page at `index`.
    pub fn nav_block(&self, index: usize) -> String {
        let entries: Vec<String> = [
            ("Previous", self.previous_link(index)),
            ("Next", self.next_link(index)),
            ("Top", self.top_link(index)),
        ]
        .into_iter()
        .filter_map(|(direction, link)| link.map(|l| nav_entry(direction, &l)))
        .collect();
        format!("<p>\n{}\n</p>", entries.join(";\n"))
    }

    /// Full page body: navigation, the page's text, navigation again.
    fn page_body(&self, index: usize, page: &MultiPage) -> String {
        let nav = self.nav_block(index);
        format!("{nav}{}{nav}", page.all_text_parts())
    }
}

fn nav_entry(direction: &str, link: &NavLink) -> String {
    html! {
        (direction) ": " a href=(link.file) { (link.title) }
    }
    .into_string()
}

impl SectionsProcessor for MultiPageProcessor {
    fn process_sections(&self, output_dir: &Path) -> Result<Vec<GeneratedPage>, DocsError> {
        create_output_dir(output_dir)?;
        let css = Css::Inline(self.css.clone());
        let mut written = Vec::with_capacity(self.sections.len());

        for (index, page) in self.sections.pages.iter().enumerate() {
            let path = output_dir.join(page.filename());
            let body = self.page_body(index, page);
            self.template.write_html(&path, page.title(), &css, &body)?;
            written.push(GeneratedPage {
                title: page.title().to_string(),
                path,
            });
        }
        Ok(written)
    }
}

// ============================================================================
// Single page
// ============================================================================

/// Writes all pages' main bodies into one document.
pub struct SingleWebProcessor {
    sections: Sections<SinglePage>,
    template: Template,
    title: String,
    stylesheet: String,
    output_file: String,
}

impl SingleWebProcessor {
    pub fn new(sections: Sections<SinglePage>, template: Template) -> Self {
        Self {
            sections,
            template,
            title: "Cstitch documentation".to_string(),
            stylesheet: "doc.css".to_string(),
            output_file: "cstitchDoc.html".to_string(),
        }
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.title = title.to_string();
        self
    }

    pub fn with_stylesheet(mut self, stylesheet: &str) -> Self {
        self.stylesheet = stylesheet.to_string();
        self
    }

    pub fn with_output_file(mut self, output_file: &str) -> Self {
        self.output_file = output_file.to_string();
        self
    }

    /// Every page's main body in section order. Intros and outros are left out.
    pub fn body(&self) -> String {
        self.sections
            .pages
            .iter()
            .map(|page| page.main_body())
            .collect()
    }
}

impl SectionsProcessor for SingleWebProcessor {
    fn process_sections(&self, output_dir: &Path) -> Result<Vec<GeneratedPage>, DocsError> {
        create_output_dir(output_dir)?;
        let path = output_dir.join(&self.output_file);
        let css = Css::External(self.stylesheet.clone());
        self.template
            .write_html(&path, &self.title, &css, &self.body())?;
        Ok(vec![GeneratedPage {
            title: self.title.clone(),
            path,
        }])
    }
}
