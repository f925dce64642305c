//! Page records and the link rewriting each layout applies.
//!
//! The XML source is written once for both layouts, so image sources and
//! links inside the HTML fragments are stored in a neutral form:
//!
//! ```text
//! <img src="colorChooser.png" />      bare image name
//! <a href="squareWindow">             another page
//! <a href="squareWindow#tools">       an anchor on another page
//! ```
//!
//! Each record variant rewrites them once, at construction:
//!
//! | Source | [`MultiPage`] (`:` prefix) | [`SinglePage`] (`images/32x32_` prefix) |
//! |---|---|---|
//! | `<img src="x.png"` | `<img src=":x.png"` | `<img src="images/32x32_x.png"` |
//! | `<a href="page">` | `<a href="page.html">` | `<a href="#page">` |
//! | `<a href="page#frag">` | `<a href="page.html#frag">` | `<a href="#frag">` |
//!
//! Only the `intro`, `mainBody` and `outro` fragments are rewritten; the
//! title is plain text.

use crate::naming;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// Start of an image tag up to and including `src="`.
static IMG_SRC: Lazy<Regex> = Lazy::new(|| Regex::new(r#"(<img[^>]+src=")"#).unwrap());

/// A link to another page, optionally with a fragment.
static PAGE_HREF: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(<a href="[A-Za-z0-9_]+)(#|")"#).unwrap());

/// Page name in front of a fragment: `<a href="page#`.
static ANCHORED_HREF: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(<a href=")[A-Za-z0-9_]+#"#).unwrap());

/// A link naming a page with no fragment: `<a href="page"`.
static BARE_HREF: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(<a href=")([A-Za-z0-9_]+")"#).unwrap());

/// The four text fields of one documentation page, as read from the XML.
///
/// Every field is always present; an element missing from the source is
/// an empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageFields {
    pub title: String,
    pub intro: String,
    pub main_body: String,
    pub outro: String,
}

impl PageFields {
    /// Apply `rewrite` to the three HTML fragments, leaving the title alone.
    fn map_fragments(self, rewrite: impl Fn(&str) -> String) -> Self {
        Self {
            intro: rewrite(&self.intro),
            main_body: rewrite(&self.main_body),
            outro: rewrite(&self.outro),
            title: self.title,
        }
    }
}

/// A documentation page prepared for one output layout.
///
/// Implementations rewrite their fragments in [`PageRecord::from_fields`]
/// and are read-only afterwards.
pub trait PageRecord: Sized {
    /// Build the record, rewriting image and link references with `image_prefix`.
    fn from_fields(fields: PageFields, image_prefix: &str) -> Self;

    fn fields(&self) -> &PageFields;

    fn title(&self) -> &str {
        &self.fields().title
    }

    fn intro(&self) -> &str {
        &self.fields().intro
    }

    fn main_body(&self) -> &str {
        &self.fields().main_body
    }

    fn outro(&self) -> &str {
        &self.fields().outro
    }

    /// Intro, main body and outro concatenated.
    fn all_text_parts(&self) -> String {
        let fields = self.fields();
        [
            fields.intro.as_str(),
            fields.main_body.as_str(),
            fields.outro.as_str(),
        ]
        .concat()
    }
}

/// Page destined for the multi-page (help browser) layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiPage {
    fields: PageFields,
}

impl MultiPage {
    /// Output file name, derived from the title. See [`naming::page_filename`].
    pub fn filename(&self) -> String {
        naming::page_filename(&self.fields.title)
    }
}

impl PageRecord for MultiPage {
    fn from_fields(fields: PageFields, image_prefix: &str) -> Self {
        Self {
            fields: fields.map_fragments(|text| rewrite_for_multi_page(text, image_prefix)),
        }
    }

    fn fields(&self) -> &PageFields {
        &self.fields
    }
}

/// Page destined for the single-page (website) layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SinglePage {
    fields: PageFields,
}

impl PageRecord for SinglePage {
    fn from_fields(fields: PageFields, image_prefix: &str) -> Self {
        Self {
            fields: fields.map_fragments(|text| rewrite_for_single_page(text, image_prefix)),
        }
    }

    fn fields(&self) -> &PageFields {
        &self.fields
    }
}

fn prefix_image_sources(text: &str, image_prefix: &str) -> String {
    IMG_SRC
        .replace_all(text, |caps: &Captures| format!("{}{}", &caps[1], image_prefix))
        .into_owned()
}

/// Images get `image_prefix`; page links point at the page's own file.
pub fn rewrite_for_multi_page(text: &str, image_prefix: &str) -> String {
    let text = prefix_image_sources(text, image_prefix);
    PAGE_HREF.replace_all(&text, "${1}.html${2}").into_owned()
}

/// Images get `image_prefix`; every link becomes an in-document fragment.
pub fn rewrite_for_single_page(text: &str, image_prefix: &str) -> String {
    let text = prefix_image_sources(text, image_prefix);
    let text = ANCHORED_HREF.replace_all(&text, "${1}#");
    BARE_HREF.replace_all(&text, "${1}#${2}").into_owned()
}
