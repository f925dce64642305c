//! Page filename derivation for the multi-page documentation layout.
//!
//! A page's file name is its identity for cross-page links, so every
//! consumer (the processor writing files, the navigation builder, the CLI
//! summary) goes through [`page_filename`].
//!
//! ## Rule
//!
//! Spaces are removed and the first character is lower-cased, then `.html`
//! is appended:
//! - `"Overview"` → `overview.html`
//! - `"Color Chooser"` → `colorChooser.html`
//! - `"Square Editing Tools"` → `squareEditingTools.html`
//!
//! Titles that differ only in spacing map to the same name; the later page
//! overwrites the earlier one when written.

/// Extension appended to every derived page name.
pub const PAGE_EXTENSION: &str = ".html";

/// Lower-camel-case a title: drop spaces and lower-case the first character.
pub fn lower_camel(title: &str) -> String {
    let joined: String = title.chars().filter(|c| *c != ' ').collect();
    let mut chars = joined.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Derive the output file name for a page title.
pub fn page_filename(title: &str) -> String {
    format!("{}{}", lower_camel(title), PAGE_EXTENSION)
}
