//! # cstitch-tools
//!
//! Maintenance tooling for the Cstitch cross-stitch pattern editor: the
//! build-side chores that turn project sources into shippable artifacts.
//!
//! # Tasks
//!
//! ```text
//! docs      doc/docData.xml  →  doc/*.html, doc/cstitchDoc.html
//! icons     iconResources.qrc  →  icons/icons.zip
//! floss     dmc.xml  →  C++ push_back lines (or JSON)
//! package   built binary + main.cpp version  →  versions/<archive>
//! ```
//!
//! The documentation generator is the core. One XML file holds every help
//! page; it is rendered once as a multi-page set for the in-app help browser
//! (inline CSS, previous/next/top navigation, Qt resource image paths) and
//! once as a single web page (external stylesheet, in-document anchors,
//! web image paths).
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`docs`] | XML sections → page records → processors → templated HTML |
//! | [`naming`] | Page title → lower-camel HTML file name |
//! | [`icons`] | Zip every PNG referenced by the Qt resource manifest |
//! | [`floss`] | kxstitch floss table → C++ source lines or JSON |
//! | [`release`] | Version lookup, `upx`/`patchelf`/`tar` packing, zip archives, checksums |
//! | [`config`] | `tools.toml` loading, merging over stock defaults, validation |
//! | [`output`] | CLI output formatting, information-first display |
//!
//! # Design Decisions
//!
//! ## Single-Pass Templating
//!
//! The HTML template carries `@@title`, `@@css` and `@@body` tokens. They are
//! replaced in one scan of the template, so a page body that happens to
//! contain `@@css` is written as-is instead of being substituted again.
//!
//! ## Tools Behind a Trait
//!
//! Packaging shells out to `upx`, `patchelf` and `tar`. Those calls go
//! through [`release::ToolRunner`]; tests drive the whole packaging flow
//! with a recording mock.

pub mod config;
pub mod docs;
pub mod floss;
pub mod icons;
pub mod naming;
pub mod output;
pub mod release;

#[cfg(test)]
pub(crate) mod test_helpers;
