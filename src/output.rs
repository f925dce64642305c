//! CLI output formatting for every command.
//!
//! # Information-First Display
//!
//! Output names things by what they are before where they live: a page is
//! shown by position and title, its file as the target of an arrow. Paths
//! are printed relative to the project root.
//!
//! # Output Format
//!
//! ## Docs
//!
//! ```text
//! Multi-page → doc/
//! 001 Overview → overview.html
//! 002 Color Chooser → colorChooser.html
//!
//! Single page → doc/
//! Cstitch documentation → cstitchDoc.html
//!
//! Generated 2 pages, 1 single page
//! ```
//!
//! ## Check
//!
//! ```text
//! Pages
//! 001 Overview → overview.html
//! 002 Color Chooser → colorChooser.html
//! 003 ColorChooser → colorChooser.html
//!
//! Warnings
//!     colorChooser.html is written by 2 pages: Color Chooser, ColorChooser (last one wins)
//! ```
//!
//! ## Icons
//!
//! ```text
//!     fileopen.png
//!     zoomIn.png
//! Wrote 2 files to icons/icons.zip
//! ```
//!
//! ## Package
//!
//! ```text
//! Version 0.9.4 (Linux)
//!     Archive: versions/cstitch_0.9.4_linux32.tar.gz
//!     SHA-256: 3a7bd3e2…
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.

use crate::docs::{DocsCheck, DocsReport, GeneratedPage};
use crate::icons::IconArchive;
use crate::release::ReleasePackage;
use std::path::Path;

// ============================================================================
// Shared helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// `path` relative to `root` when it lies under it, as given otherwise.
fn display_path(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .display()
        .to_string()
}

/// Directory of the first page, relative to `root`, with a trailing slash.
fn output_dir(pages: &[GeneratedPage], root: &Path) -> String {
    pages
        .first()
        .and_then(|p| p.path.parent())
        .map(|dir| format!("{}/", display_path(dir, root)))
        .unwrap_or_default()
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default()
}

fn plural(n: usize, one: &str, many: &str) -> String {
    if n == 1 {
        format!("{} {}", n, one)
    } else {
        format!("{} {}", n, many)
    }
}

// ============================================================================
// Docs
// ============================================================================

pub fn format_docs_output(report: &DocsReport, root: &Path) -> Vec<String> {
    let mut lines = Vec::new();

    if !report.multi.is_empty() {
        lines.push(format!("Multi-page \u{2192} {}", output_dir(&report.multi, root)));
        for (i, page) in report.multi.iter().enumerate() {
            lines.push(format!(
                "{} {} \u{2192} {}",
                format_index(i + 1),
                page.title,
                file_name(&page.path)
            ));
        }
        lines.push(String::new());
    }

    if !report.single.is_empty() {
        lines.push(format!("Single page \u{2192} {}", output_dir(&report.single, root)));
        for page in &report.single {
            lines.push(format!("{} \u{2192} {}", page.title, file_name(&page.path)));
        }
        lines.push(String::new());
    }

    lines.push(format!(
        "Generated {}, {}",
        plural(report.multi.len(), "page", "pages"),
        plural(report.single.len(), "single page", "single pages")
    ));
    lines
}

pub fn print_docs_output(report: &DocsReport, root: &Path) {
    for line in format_docs_output(report, root) {
        println!("{}", line);
    }
}

// ============================================================================
// Check
// ============================================================================

pub fn format_check_output(check: &DocsCheck) -> Vec<String> {
    let mut lines = vec!["Pages".to_string()];
    for (i, (title, file)) in check.pages.iter().enumerate() {
        lines.push(format!("{} {} \u{2192} {}", format_index(i + 1), title, file));
    }

    if !check.collisions.is_empty() {
        lines.push(String::new());
        lines.push("Warnings".to_string());
        for (file, titles) in &check.collisions {
            lines.push(format!(
                "{}{} is written by {} pages: {} (last one wins)",
                indent(1),
                file,
                titles.len(),
                titles.join(", ")
            ));
        }
    }
    lines
}

pub fn print_check_output(check: &DocsCheck) {
    for line in format_check_output(check) {
        println!("{}", line);
    }
}

// ============================================================================
// Icons
// ============================================================================

pub fn format_icons_output(result: &IconArchive, root: &Path) -> Vec<String> {
    let mut lines: Vec<String> = result
        .icons
        .iter()
        .map(|icon| format!("{}{}", indent(1), icon))
        .collect();
    lines.push(format!(
        "Wrote {} to {}",
        plural(result.icons.len(), "file", "files"),
        display_path(&result.archive, root)
    ));
    lines
}

pub fn print_icons_output(result: &IconArchive, root: &Path) {
    for line in format_icons_output(result, root) {
        println!("{}", line);
    }
}

// ============================================================================
// Floss
// ============================================================================

/// Summary after a floss conversion. Without a destination file the
/// generated lines went to stdout, so the summary is the trailing count.
pub fn format_floss_summary(count: usize, destination: Option<&Path>) -> Vec<String> {
    match destination {
        Some(path) => vec![format!(
            "Wrote {} to {}",
            plural(count, "floss", "flosses"),
            path.display()
        )],
        None => vec![String::new(), format!(" Count: {}", count)],
    }
}

// ============================================================================
// Package
// ============================================================================

pub fn format_package_output(package: &ReleasePackage, root: &Path) -> Vec<String> {
    vec![
        format!("Version {} ({})", package.version, package.platform),
        format!("{}Archive: {}", indent(1), display_path(&package.archive, root)),
        format!("{}SHA-256: {}", indent(1), package.digest),
    ]
}

pub fn print_package_output(package: &ReleasePackage, root: &Path) {
    for line in format_package_output(package, root) {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================
