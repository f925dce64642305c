//! Shared test utilities for the cstitch-tools test suite.
//!
//! Provides fixture setup and small helpers for the documentation
//! pipeline, which most module tests exercise end to end.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = setup_fixtures();
//! let config = fixture_docs_config();
//! docs::generate(tmp.path(), &config, None).unwrap();
//!
//! let html = read_output(tmp.path(), "out/multi/overview.html");
//! assert_eq!(nav_count(&html, "Top:"), 0);
//! ```

use std::fs;
use std::path::Path;
use tempfile::TempDir;

use crate::config::DocsConfig;

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/docs/` to a temp directory and return it.
///
/// Tests get an isolated copy they can mutate without affecting other tests
/// or the source fixtures.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/docs");
    for entry in fs::read_dir(&fixtures).unwrap() {
        let entry = entry.unwrap();
        fs::copy(entry.path(), tmp.path().join(entry.file_name())).unwrap();
    }
    tmp
}

/// Docs config pointing at the fixture files, writing under `out/`.
pub fn fixture_docs_config() -> DocsConfig {
    let mut config = DocsConfig {
        source: "docData.xml".to_string(),
        template: "html_template.html".to_string(),
        ..DocsConfig::default()
    };
    config.multi.output_dir = "out/multi".to_string();
    config.single.output_dir = "out/single".to_string();
    config
}

/// Replace the fixture `docData.xml` with one page per `(title, main body)`.
pub fn write_doc_source(root: &Path, pages: &[(&str, &str)]) {
    let mut xml = String::from("<docs>\n");
    for (title, body) in pages {
        xml.push_str(&format!(
            "  <page><title>{title}</title><mainBody><![CDATA[{body}]]></mainBody></page>\n"
        ));
    }
    xml.push_str("</docs>\n");
    fs::write(root.join("docData.xml"), xml).unwrap();
}

// =========================================================================
// Output lookups: panic with a clear message on miss
// =========================================================================

/// Read a generated file relative to `root`. Panics if missing.
pub fn read_output(root: &Path, relative: &str) -> String {
    let path = root.join(relative);
    fs::read_to_string(&path).unwrap_or_else(|e| {
        let dir = path.parent().unwrap_or(root);
        let names: Vec<String> = fs::read_dir(dir)
            .map(|entries| {
                entries
                    .flatten()
                    .map(|e| e.file_name().to_string_lossy().to_string())
                    .collect()
            })
            .unwrap_or_default();
        panic!("cannot read '{relative}': {e}. Present: {names:?}")
    })
}

/// Number of `direction` navigation entries (e.g. `"Next:"`) in a page.
pub fn nav_count(html: &str, direction: &str) -> usize {
    html.matches(direction).count()
}
