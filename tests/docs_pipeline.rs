//! End-to-end documentation runs against a project laid out on disk.

use cstitch_tools::config;
use cstitch_tools::docs::{self, RecordType};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const TEMPLATE: &str = "<html><head><title>@@title</title>\n@@css</head>\n<body>\n@@body\n</body></html>\n";

/// A project root with `doc/docData.xml` holding `pages` as
/// `(title, intro, main body, outro)` and the default template location.
fn project(pages: &[(&str, &str, &str, &str)]) -> TempDir {
    let tmp = TempDir::new().unwrap();
    let doc = tmp.path().join("doc");
    fs::create_dir_all(&doc).unwrap();

    let mut xml = String::from("<?xml version=\"1.0\"?>\n<docs>\n");
    for (title, intro, main, outro) in pages {
        xml.push_str(&format!(
            "  <page>\n    <title>{title}</title>\n    <intro><![CDATA[{intro}]]></intro>\n    \
             <mainBody><![CDATA[{main}]]></mainBody>\n    <outro><![CDATA[{outro}]]></outro>\n  </page>\n"
        ));
    }
    xml.push_str("</docs>\n");
    fs::write(doc.join("docData.xml"), xml).unwrap();
    fs::write(doc.join("html_template.html"), TEMPLATE).unwrap();
    tmp
}

fn html_files(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .flatten()
        .map(|e| e.file_name().to_string_lossy().to_string())
        .filter(|n| n.ends_with(".html") && n != "html_template.html")
        .collect();
    names.sort();
    names
}

fn multi_only(root: &Path) -> docs::DocsReport {
    let config = config::load_config(root).unwrap();
    docs::generate(root, &config.docs, Some(RecordType::Multi)).unwrap()
}

#[test]
fn single_overview_page_has_no_navigation() {
    let tmp = project(&[("Overview", "", "<p>Welcome</p>", "")]);
    let report = multi_only(tmp.path());

    assert_eq!(report.multi.len(), 1);
    assert_eq!(html_files(&tmp.path().join("doc")), vec!["overview.html"]);

    let html = fs::read_to_string(tmp.path().join("doc/overview.html")).unwrap();
    assert!(!html.contains("Previous:"));
    assert!(!html.contains("Next:"));
    assert!(!html.contains("Top:"));
    assert!(html.contains("<p>Welcome</p>"));
}

#[test]
fn three_page_navigation() {
    let tmp = project(&[
        ("Overview", "", "", ""),
        ("Fabric", "", "<p>Fabric body</p>", ""),
        ("Colors", "", "", ""),
    ]);
    multi_only(tmp.path());

    let fabric = fs::read_to_string(tmp.path().join("doc/fabric.html")).unwrap();
    let nav = "<p>\n\
               Previous: <a href=\"overview.html\">Overview</a>;\n\
               Next: <a href=\"colors.html\">The Colors panel</a>;\n\
               Top: <a href=\"overview.html\">Overview</a>\n\
               </p>";
    assert_eq!(fabric.matches(nav).count(), 2);
    assert!(fabric.contains(&format!("{nav}<p>Fabric body</p>{nav}")));

    let colors = fs::read_to_string(tmp.path().join("doc/colors.html")).unwrap();
    assert!(colors.contains("Previous: <a href=\"fabric.html\">The fabric panel</a>"));
    assert!(!colors.contains("Next:"));
}

#[test]
fn multi_page_file_count_matches_page_count() {
    let titles = [
        "Overview",
        "Color Chooser",
        "Square Window",
        "Pattern Window",
        "Pattern Printing",
    ];
    let pages: Vec<(&str, &str, &str, &str)> = titles.iter().map(|t| (*t, "", "", "")).collect();
    let tmp = project(&pages);
    let report = multi_only(tmp.path());

    assert_eq!(report.multi.len(), titles.len());
    assert_eq!(html_files(&tmp.path().join("doc")).len(), titles.len());
    for (i, page) in report.multi.iter().enumerate() {
        let html = fs::read_to_string(&page.path).unwrap();
        let expected_previous = if i == 0 { 0 } else { 2 };
        let expected_next = if i == titles.len() - 1 { 0 } else { 2 };
        assert_eq!(html.matches("Previous:").count(), expected_previous, "{}", page.title);
        assert_eq!(html.matches("Next:").count(), expected_next, "{}", page.title);
        assert_eq!(html.matches("Top:").count(), expected_previous, "{}", page.title);
    }
}

#[test]
fn single_page_holds_main_bodies_in_order() {
    let tmp = project(&[
        ("Overview", "<p>intro zero</p>", "<h2>First</h2>", "<p>outro zero</p>"),
        ("Fabric", "<p>intro one</p>", "<h2>Second</h2>", "<p>outro one</p>"),
    ]);
    let config = config::load_config(tmp.path()).unwrap();
    let report = docs::generate(tmp.path(), &config.docs, Some(RecordType::SingleWeb)).unwrap();

    assert_eq!(report.single.len(), 1);
    let html = fs::read_to_string(tmp.path().join("doc/cstitchDoc.html")).unwrap();
    assert!(html.contains("<title>Cstitch documentation</title>"));
    assert!(html.contains(r#"<link rel="stylesheet" type="text/css" href="doc.css" />"#));
    assert!(html.contains("<h2>First</h2><h2>Second</h2>"));
    assert!(!html.contains("intro"));
    assert!(!html.contains("outro"));
}

#[test]
fn body_text_with_template_tokens_is_not_substituted() {
    let tmp = project(&[("Overview", "", "<p>Write @@css or @@title here</p>", "")]);
    multi_only(tmp.path());

    let html = fs::read_to_string(tmp.path().join("doc/overview.html")).unwrap();
    assert!(html.contains("<p>Write @@css or @@title here</p>"));
    assert_eq!(html.matches("<style").count(), 1);
}

#[test]
fn rerun_is_byte_identical() {
    let tmp = project(&[
        ("Overview", "<p>i</p>", "<p>m</p>", "<p>o</p>"),
        ("Fabric", "", "<a href=\"overview\">back</a>", ""),
    ]);
    let config = config::load_config(tmp.path()).unwrap();

    docs::generate(tmp.path(), &config.docs, None).unwrap();
    let first: Vec<Vec<u8>> = ["overview.html", "fabric.html", "cstitchDoc.html"]
        .iter()
        .map(|f| fs::read(tmp.path().join("doc").join(f)).unwrap())
        .collect();

    docs::generate(tmp.path(), &config.docs, None).unwrap();
    let second: Vec<Vec<u8>> = ["overview.html", "fabric.html", "cstitchDoc.html"]
        .iter()
        .map(|f| fs::read(tmp.path().join("doc").join(f)).unwrap())
        .collect();

    assert_eq!(first, second);
}

#[test]
fn tools_toml_overrides_output_locations() {
    let tmp = project(&[("Overview", "", "", ""), ("Fabric", "", "", "")]);
    fs::write(
        tmp.path().join(config::CONFIG_FILENAME),
        "[docs.multi]\noutput_dir = \"help\"\n\n[docs.single]\noutput_dir = \"web\"\noutput_file = \"index.html\"\n",
    )
    .unwrap();
    let config = config::load_config(tmp.path()).unwrap();
    docs::generate(tmp.path(), &config.docs, None).unwrap();

    assert_eq!(
        html_files(&tmp.path().join("help")),
        vec!["fabric.html", "overview.html"]
    );
    assert!(tmp.path().join("web/index.html").exists());
}

#[test]
fn unknown_layout_name_is_rejected() {
    let result = "multiPage".parse::<RecordType>();
    assert!(matches!(result, Err(docs::DocsError::UnknownRecordType(s)) if s == "multiPage"));
}
