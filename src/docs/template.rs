//! HTML template substitution.
//!
//! Templates are plain HTML files carrying three tokens:
//!
//! | Token | Replaced with |
//! |---|---|
//! | `@@title` | the page title, HTML-escaped |
//! | `@@css` | a `<style>` block or a `<link>` to a stylesheet, see [`Css`] |
//! | `@@body` | the assembled page body, verbatim |
//!
//! Substitution is a single left-to-right pass over the template. Text
//! inserted for one token is never scanned again, so a page body that
//! happens to contain `@@title` is written out unchanged.

use maud::{DOCTYPE, PreEscaped, html};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| Regex::new(r"@@(title|css|body)").unwrap());

#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("Failed to read template {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// How a page gets its stylesheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Css {
    /// Stylesheet text placed in the head inside `<style>`.
    Inline(String),
    /// Stylesheet file name referenced with `<link rel="stylesheet">`.
    External(String),
}

impl Css {
    /// Markup that replaces `@@css`.
    pub fn to_head_markup(&self) -> String {
        match self {
            Css::Inline(css) => html! {
                style type="text/css" { (PreEscaped(format!("\n{css}\n  "))) }
            }
            .into_string(),
            // Self-closing, as in the XHTML templates.
            Css::External(href) => format!(
                r#"<link rel="stylesheet" type="text/css" href="{}" />"#,
                html! { (href) }.into_string()
            ),
        }
    }
}

/// A loaded HTML template.
#[derive(Debug, Clone)]
pub struct Template {
    source: String,
}

impl Template {
    /// Read the template at `path`.
    pub fn load(path: &Path) -> Result<Self, TemplateError> {
        let source = fs::read_to_string(path).map_err(|source| TemplateError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self { source })
    }

    pub fn from_source(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
        }
    }

    /// Substitute every token occurrence in one pass.
    pub fn render(&self, title: &str, css: &Css, body: &str) -> String {
        let title = html! { (title) }.into_string();
        let css = css.to_head_markup();
        PLACEHOLDER
            .replace_all(&self.source, |caps: &Captures| match &caps[1] {
                "title" => title.clone(),
                "css" => css.clone(),
                _ => body.to_string(),
            })
            .into_owned()
    }

    /// Render and write to `output`, replacing any existing file.
    pub fn write_html(
        &self,
        output: &Path,
        title: &str,
        css: &Css,
        body: &str,
    ) -> Result<(), TemplateError> {
        fs::write(output, self.render(title, css, body)).map_err(|source| TemplateError::Write {
            path: output.to_path_buf(),
            source,
        })
    }
}

/// A minimal template carrying all three tokens.
///
/// Used by the `gen-template` CLI command.
pub fn stock_template() -> String {
    let markup = html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                title { "@@title" }
                (PreEscaped("@@css"))
            }
            body {
                (PreEscaped("@@body"))
            }
        }
    };
    markup.into_string()
}
