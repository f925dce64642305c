//! Section loading: documentation XML to an ordered list of page records.
//!
//! ```xml
//! <docs>
//!   <page>
//!     <title>Overview</title>
//!     <intro><![CDATA[<p>Cstitch turns images into patterns.</p>]]></intro>
//!     <mainBody>&lt;h2&gt;Getting started&lt;/h2&gt;</mainBody>
//!     <outro/>
//!   </page>
//!   ...
//! </docs>
//! ```
//!
//! Every element child of the root becomes one page, in document order;
//! text, comments and processing instructions between pages are skipped.
//! The element names of the pages themselves are not checked. A field is
//! the content of the first element with that name inside the page:
//! escaped text and CDATA are decoded into the HTML fragment, and inline
//! XHTML children are kept as markup. Fields missing from a page are empty.

use super::DocsError;
use super::page::{MultiPage, PageFields, PageRecord, SinglePage};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

/// Which record constructor the loader uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordType {
    /// One file per page; see [`MultiPage`].
    Multi,
    /// Everything in one document; see [`SinglePage`].
    SingleWeb,
}

impl FromStr for RecordType {
    type Err = DocsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "multi" => Ok(RecordType::Multi),
            "singleWeb" => Ok(RecordType::SingleWeb),
            other => Err(DocsError::UnknownRecordType(other.to_string())),
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordType::Multi => f.write_str("multi"),
            RecordType::SingleWeb => f.write_str("singleWeb"),
        }
    }
}

/// Ordered page records loaded from one documentation source.
#[derive(Debug, Clone)]
pub struct Sections<P> {
    pub pages: Vec<P>,
}

impl<P: PageRecord> Sections<P> {
    /// Load and parse the XML file at `path`.
    pub fn load(path: &Path, image_prefix: &str) -> Result<Self, DocsError> {
        let content = fs::read_to_string(path).map_err(|source| DocsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_str_with_prefix(&content, image_prefix).map_err(|e| match e {
            ParseError::Xml(source) => DocsError::Xml {
                path: path.to_path_buf(),
                source,
            },
            ParseError::NoRoot => DocsError::NoRoot(path.to_path_buf()),
        })
    }

    /// Parse an in-memory document.
    pub fn parse(xml: &str, image_prefix: &str) -> Result<Self, DocsError> {
        Self::from_str_with_prefix(xml, image_prefix).map_err(|e| match e {
            ParseError::Xml(source) => DocsError::Xml {
                path: "<memory>".into(),
                source,
            },
            ParseError::NoRoot => DocsError::NoRoot("<memory>".into()),
        })
    }

    fn from_str_with_prefix(xml: &str, image_prefix: &str) -> Result<Self, ParseError> {
        let pages = parse_page_fields(xml)?
            .into_iter()
            .map(|fields| P::from_fields(fields, image_prefix))
            .collect();
        Ok(Self { pages })
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

/// Sections loaded as the record type chosen at run time.
#[derive(Debug, Clone)]
pub enum LoadedSections {
    Multi(Sections<MultiPage>),
    SingleWeb(Sections<SinglePage>),
}

impl LoadedSections {
    /// Load `path`, building records of `record_type`. Selector strings
    /// (`multi`, `singleWeb`) become a [`RecordType`] through `FromStr`,
    /// which rejects anything else.
    pub fn load(
        path: &Path,
        record_type: RecordType,
        image_prefix: &str,
    ) -> Result<Self, DocsError> {
        match record_type {
            RecordType::Multi => Ok(Self::Multi(Sections::load(path, image_prefix)?)),
            RecordType::SingleWeb => Ok(Self::SingleWeb(Sections::load(path, image_prefix)?)),
        }
    }
}

#[derive(Debug)]
enum ParseError {
    Xml(quick_xml::Error),
    NoRoot,
}

impl From<quick_xml::Error> for ParseError {
    fn from(e: quick_xml::Error) -> Self {
        ParseError::Xml(e)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Title,
    Intro,
    MainBody,
    Outro,
}

impl Field {
    fn from_name(name: &[u8]) -> Option<Self> {
        match name {
            b"title" => Some(Field::Title),
            b"intro" => Some(Field::Intro),
            b"mainBody" => Some(Field::MainBody),
            b"outro" => Some(Field::Outro),
            _ => None,
        }
    }

    fn slot(self, fields: &mut PageFields) -> &mut String {
        match self {
            Field::Title => &mut fields.title,
            Field::Intro => &mut fields.intro,
            Field::MainBody => &mut fields.main_body,
            Field::Outro => &mut fields.outro,
        }
    }
}

/// Field currently being read.
struct Capture {
    field: Field,
    /// Depth of the field element itself.
    depth: usize,
    text: String,
}

/// Per-page state while its element is open.
#[derive(Default)]
struct PageState {
    fields: PageFields,
    seen: Vec<Field>,
    capture: Option<Capture>,
}

impl PageState {
    fn start_capture(&mut self, field: Field, depth: usize) -> bool {
        if self.capture.is_some() || self.seen.contains(&field) {
            return false;
        }
        self.seen.push(field);
        self.capture = Some(Capture {
            field,
            depth,
            text: String::new(),
        });
        true
    }

    fn finish_capture(&mut self) {
        if let Some(capture) = self.capture.take() {
            *capture.field.slot(&mut self.fields) = capture.text;
        }
    }
}

/// Split a documentation document into raw page fields, in document order.
fn parse_page_fields(xml: &str) -> Result<Vec<PageFields>, ParseError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(false);

    let mut pages = Vec::new();
    let mut page: Option<PageState> = None;
    let mut seen_root = false;
    // 0 = outside the root, 1 = inside the root, 2 = inside a page, ...
    let mut depth = 0usize;

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                depth += 1;
                match depth {
                    1 => seen_root = true,
                    2 => page = Some(PageState::default()),
                    _ => {
                        if let Some(state) = page.as_mut() {
                            open_in_page(state, &e, depth, false);
                        }
                    }
                }
            }
            Event::Empty(e) => match depth + 1 {
                1 => seen_root = true,
                2 => pages.push(PageFields::default()),
                child_depth => {
                    if let Some(state) = page.as_mut() {
                        open_in_page(state, &e, child_depth, true);
                    }
                }
            },
            Event::End(e) => {
                if let Some(state) = page.as_mut() {
                    let closes_field = state.capture.as_ref().is_some_and(|c| c.depth == depth);
                    if closes_field {
                        state.finish_capture();
                    } else if let Some(capture) = state.capture.as_mut() {
                        capture.text.push_str("</");
                        capture
                            .text
                            .push_str(&String::from_utf8_lossy(e.name().as_ref()));
                        capture.text.push('>');
                    }
                }
                if depth == 2
                    && let Some(state) = page.take()
                {
                    pages.push(state.fields);
                }
                depth = depth.saturating_sub(1);
            }
            Event::Text(e) => {
                if let Some(capture) = page.as_mut().and_then(|s| s.capture.as_mut()) {
                    capture.text.push_str(&String::from_utf8_lossy(e.as_ref()));
                }
            }
            Event::CData(e) => {
                if let Some(capture) = page.as_mut().and_then(|s| s.capture.as_mut()) {
                    capture.text.push_str(&String::from_utf8_lossy(&e));
                }
            }
            Event::GeneralRef(e) => {
                if let Some(capture) = page.as_mut().and_then(|s| s.capture.as_mut()) {
                    let entity = String::from_utf8_lossy(e.as_ref());
                    if depth == capture.depth {
                        // Escaped HTML directly in the field: decode it.
                        match resolve_entity(&entity) {
                            Some(resolved) => capture.text.push_str(&resolved),
                            None => {
                                capture.text.push('&');
                                capture.text.push_str(&entity);
                                capture.text.push(';');
                            }
                        }
                    } else {
                        // Inside inline markup the reference stays a reference.
                        capture.text.push('&');
                        capture.text.push_str(&entity);
                        capture.text.push(';');
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !seen_root {
        return Err(ParseError::NoRoot);
    }
    Ok(pages)
}

/// Handle an element opening inside a page at `depth`.
fn open_in_page(state: &mut PageState, e: &BytesStart<'_>, depth: usize, is_empty: bool) {
    if let Some(capture) = state.capture.as_mut() {
        // Inline markup inside a field.
        capture.text.push('<');
        capture.text.push_str(&String::from_utf8_lossy(e));
        capture.text.push_str(if is_empty { "/>" } else { ">" });
        return;
    }
    if let Some(field) = Field::from_name(e.name().as_ref())
        && state.start_capture(field, depth)
        && is_empty
    {
        state.finish_capture();
    }
}

/// Resolve XML entity references.
fn resolve_entity(entity: &str) -> Option<String> {
    match entity {
        "apos" => return Some("'".to_string()),
        "quot" => return Some("\"".to_string()),
        "lt" => return Some("<".to_string()),
        "gt" => return Some(">".to_string()),
        "amp" => return Some("&".to_string()),
        _ => {}
    }

    let code = if let Some(hex) = entity.strip_prefix("#x") {
        u32::from_str_radix(hex, 16).ok()
    } else if let Some(dec) = entity.strip_prefix('#') {
        dec.parse::<u32>().ok()
    } else {
        None
    };
    code.and_then(char::from_u32).map(|c| c.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const THREE_PAGES: &str = r#"<?xml version="1.0"?>
<docs>
  <page>
    <title>Overview</title>
    <intro><![CDATA[<p>Welcome</p>]]></intro>
    <mainBody>&lt;p&gt;See &lt;a href="fabric"&gt;fabric&lt;/a&gt;&lt;/p&gt;</mainBody>
    <outro>bye</outro>
  </page>
  <!-- a comment between pages -->
  <page>
    <title>Fabric</title>
    <mainBody><![CDATA[<img src="fabric.png" />]]></mainBody>
  </page>
  <page><title>Colors</title></page>
</docs>
"#;

    fn raw(xml: &str) -> Vec<PageFields> {
        parse_page_fields(xml).unwrap()
    }

    #[test]
    fn pages_in_document_order() {
        let pages = raw(THREE_PAGES);
        let titles: Vec<&str> = pages.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["Overview", "Fabric", "Colors"]);
    }

    #[test]
    fn cdata_is_taken_verbatim() {
        let pages = raw(THREE_PAGES);
        assert_eq!(pages[0].intro, "<p>Welcome</p>");
    }

    #[test]
    fn escaped_text_is_decoded() {
        let pages = raw(THREE_PAGES);
        assert_eq!(pages[0].main_body, r#"<p>See <a href="fabric">fabric</a></p>"#);
    }

    #[test]
    fn missing_fields_are_empty() {
        let pages = raw(THREE_PAGES);
        assert_eq!(pages[1].intro, "");
        assert_eq!(pages[1].outro, "");
        assert_eq!(pages[2].main_body, "");
    }

    #[test]
    fn empty_field_element_is_empty_string() {
        let pages = raw("<docs><page><title>A</title><intro/><outro></outro></page></docs>");
        assert_eq!(pages[0].intro, "");
        assert_eq!(pages[0].outro, "");
    }

    #[test]
    fn empty_page_element_yields_empty_record() {
        let pages = raw("<docs><page/><page><title>B</title></page></docs>");
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0], PageFields::default());
        assert_eq!(pages[1].title, "B");
    }

    #[test]
    fn inline_markup_is_preserved() {
        let pages = raw(
            r#"<docs><page><mainBody><p class="x">a &amp; <b>b</b><br/></p></mainBody></page></docs>"#,
        );
        assert_eq!(pages[0].main_body, r#"<p class="x">a &amp; <b>b</b><br/></p>"#);
    }

    #[test]
    fn first_matching_element_wins() {
        let pages =
            raw("<docs><page><title>First</title><title>Second</title></page></docs>");
        assert_eq!(pages[0].title, "First");
    }

    #[test]
    fn nested_field_is_found() {
        let pages = raw("<docs><page><meta><title>Deep</title></meta></page></docs>");
        assert_eq!(pages[0].title, "Deep");
    }

    #[test]
    fn numeric_entities_are_decoded() {
        let pages = raw("<docs><page><title>Caf&#233; &#x41;</title></page></docs>");
        assert_eq!(pages[0].title, "Café A");
    }

    #[test]
    fn empty_root_has_no_pages() {
        assert!(raw("<docs/>").is_empty());
        assert!(raw("<docs>\n</docs>").is_empty());
    }

    #[test]
    fn document_without_root_is_error() {
        assert!(matches!(
            parse_page_fields("<?xml version=\"1.0\"?>"),
            Err(ParseError::NoRoot)
        ));
    }

    #[test]
    fn malformed_xml_is_error() {
        let result = Sections::<MultiPage>::parse("<docs><page></docs>", ":");
        assert!(matches!(result, Err(DocsError::Xml { .. })));
    }

    #[test]
    fn sections_apply_record_rewriting() {
        let sections = Sections::<MultiPage>::parse(THREE_PAGES, ":").unwrap();
        assert_eq!(sections.len(), 3);
        assert_eq!(
            sections.pages[0].main_body(),
            r#"<p>See <a href="fabric.html">fabric</a></p>"#
        );
        assert_eq!(sections.pages[1].main_body(), r#"<img src=":fabric.png" />"#);

        let single = Sections::<SinglePage>::parse(THREE_PAGES, "images/32x32_").unwrap();
        assert_eq!(
            single.pages[0].main_body(),
            r##"<p>See <a href="#fabric">fabric</a></p>"##
        );
    }

    #[test]
    fn record_type_selectors() {
        assert_eq!("multi".parse::<RecordType>().unwrap(), RecordType::Multi);
        assert_eq!(
            "singleWeb".parse::<RecordType>().unwrap(),
            RecordType::SingleWeb
        );
        assert_eq!(RecordType::SingleWeb.to_string(), "singleWeb");
    }

    #[test]
    fn unknown_selector_is_error() {
        let result = "qt".parse::<RecordType>();
        assert!(matches!(result, Err(DocsError::UnknownRecordType(s)) if s == "qt"));
    }

    #[test]
    fn loaded_sections_follow_record_type() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("docData.xml");
        fs::write(&path, THREE_PAGES).unwrap();

        let multi = LoadedSections::load(&path, RecordType::Multi, ":").unwrap();
        assert!(matches!(multi, LoadedSections::Multi(s) if s.len() == 3));

        let single = LoadedSections::load(&path, RecordType::SingleWeb, "images/").unwrap();
        assert!(matches!(single, LoadedSections::SingleWeb(s) if s.len() == 3));
    }

    #[test]
    fn selector_is_case_sensitive() {
        assert!("Multi".parse::<RecordType>().is_err());
        assert!("singleweb".parse::<RecordType>().is_err());
    }
}
