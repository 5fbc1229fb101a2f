use std::fs;
use std::path::PathBuf;

use opdoc_ops::{ExportOptions, Operations};
use opdoc_test_support::{config_in, sample_catalog_config, test_config, write_file};
use tempfile::TempDir;

#[test]
fn dry_run_lists_files_without_writing() {
    let temp = TempDir::new().expect("tempdir");
    let ops = Operations::new(sample_catalog_config(temp.path())).expect("operations");
    let output = temp.path().join("site");

    let outcome = ops
        .export(ExportOptions {
            output: Some(output.clone()),
            dry_run: true,
        })
        .expect("export");

    assert!(outcome.dry_run);
    assert_eq!(
        outcome.files,
        vec![
            PathBuf::from("index.html"),
            PathBuf::from("catalog.json"),
            PathBuf::from("operator/bare.html"),
            PathBuf::from("operator/first.html"),
            PathBuf::from("operator/last.html"),
        ]
    );
    assert!(!output.exists());
}

#[test]
fn export_writes_pages_index_and_snapshot() {
    let temp = TempDir::new().expect("tempdir");
    let mut config = sample_catalog_config(temp.path());
    config.site.default_operator = "first".into();
    config.export.output = temp.path().join("public");
    let ops = Operations::new(config).expect("operations");

    let outcome = ops.export(ExportOptions::default()).expect("export");
    assert_eq!(outcome.output_dir, temp.path().join("public"));

    let index = fs::read_to_string(outcome.output_dir.join("index.html")).expect("index");
    assert!(index.contains("url=operator/first.html"));

    let page = fs::read_to_string(outcome.output_dir.join("operator/first.html")).expect("page");
    assert!(page.contains("<h1>first</h1>"));
    assert!(page.contains("<a href=\"bare.html\">bare</a>"));
    assert!(page.contains("<li class=\"unresolved\">missing</li>"));
    assert!(page.contains("&lt;p&gt;"));
    assert!(!page.contains("<p>${"));

    let snapshot = fs::read_to_string(outcome.output_dir.join("catalog.json")).expect("json");
    let value: serde_json::Value = serde_json::from_str(&snapshot).expect("parse");
    assert_eq!(value["defaultOperator"], "first");
    assert_eq!(value["operators"]["first"]["examples"][0]["copyState"], "0");
    assert_eq!(value["menu"][0]["title"], "Sample");
    assert!(value["operators"]["first"]["examples"][0]
        .get("safeCode")
        .is_none());
}

#[test]
fn export_of_reference_catalog_covers_every_operator() {
    let temp = TempDir::new().expect("tempdir");
    let ops = Operations::new(test_config()).expect("operations");
    let output = temp.path().join("site");

    let outcome = ops
        .export(ExportOptions {
            output: Some(output.clone()),
            dry_run: false,
        })
        .expect("export");

    assert_eq!(outcome.files.len(), ops.catalog().len() + 2);
    for identifier in ops.catalog().identifiers() {
        let page = output.join("operator").join(format!("{identifier}.html"));
        assert!(page.exists(), "missing page for {identifier}");
    }
    let index = fs::read_to_string(output.join("index.html")).expect("index");
    assert!(index.contains("operator/defer.html"));
}

#[test]
fn encoded_identifiers_link_to_their_files() {
    let temp = TempDir::new().expect("tempdir");
    let catalog = write_file(
        temp.path(),
        "catalog.toml",
        r#"
[[menu]]
title = "Spaced"
operators = ["a b", "plain"]

[operators."a b"]
description = "Needs encoding."
signature = "ab(): void"
related = ["plain"]
examples = []

[operators.plain]
description = "Links back."
signature = "plain(): void"
related = ["a b"]
examples = []
"#,
    );
    let mut config = config_in(temp.path());
    config.catalog.path = Some(catalog);
    config.site.default_operator = "a b".into();
    let ops = Operations::new(config).expect("operations");
    let output = temp.path().join("site");

    let outcome = ops
        .export(ExportOptions {
            output: Some(output.clone()),
            dry_run: false,
        })
        .expect("export");

    assert!(outcome
        .files
        .contains(&PathBuf::from("operator/a%20b.html")));
    assert!(output.join("operator/a%20b.html").exists());

    // Browsers and static servers decode the href once before resolving the file.
    let page = fs::read_to_string(output.join("operator/plain.html")).expect("page");
    assert!(page.contains("<a href=\"a%2520b.html\">a b</a>"));
    let index = fs::read_to_string(output.join("index.html")).expect("index");
    assert!(index.contains("url=operator/a%2520b.html"));
}
