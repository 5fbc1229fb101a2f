use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use opdoc_config::{
    Config, ConfigError, ConfigSourceKind, LintRule, LoadOptions, SeverityLevel,
};
use tempfile::TempDir;

fn write_file(path: impl AsRef<Path>, contents: &str) {
    let mut file = fs::File::create(path).expect("create config");
    file.write_all(contents.as_bytes()).expect("write config");
}

fn canonical(path: impl AsRef<Path>) -> PathBuf {
    fs::canonicalize(path).expect("canonicalize path")
}

fn expect_validation(err: ConfigError) -> String {
    match err {
        ConfigError::Validation(errors) => errors.to_string(),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn loads_defaults_when_no_files_present() {
    let temp = TempDir::new().expect("tempdir");
    let working_dir = canonical(temp.path());

    let config = Config::load(LoadOptions::default().with_working_dir(working_dir.clone()))
        .expect("load defaults");

    assert_eq!(config.site.default_operator, "defer");
    assert_eq!(config.site.language, "javascript");
    assert_eq!(config.site.title, "RxJS 操作符");
    assert!(config.catalog.path.is_none());
    assert!(config.clipboard.command.is_none());
    assert_eq!(config.export.output, working_dir.join("site"));
    assert_eq!(config.lint.rules, LintRule::ALL.to_vec());
    assert!(config.lint.severity.is_empty());
    assert!(config.lint.ignore.is_empty());

    assert_eq!(config.sources.layers.len(), 1);
    assert_eq!(config.sources.layers[0].kind, ConfigSourceKind::Default);
}

#[test]
fn applies_precedence_and_merges_fields() {
    let temp = TempDir::new().expect("tempdir");
    let git_root = canonical(temp.path());
    fs::create_dir(git_root.join(".git")).expect("create .git");

    write_file(
        git_root.join(".opdoc.toml"),
        r#"
        [site]
        title = "root"
        default_operator = "of"

        [catalog]
        path = "ops.toml"

        [lint]
        rules = ["dangling-related", "empty-examples"]

        [lint.severity]
        empty-examples = "error"

        [[lint.ignore]]
        operator = "generate"
        rules = ["dangling-related"]
        "#,
    );

    let workspace = git_root.join("workspace");
    fs::create_dir(&workspace).expect("create workspace");

    write_file(
        workspace.join(".opdoc.toml"),
        r#"
        [site]
        title = "workspace"

        [export]
        output = "public"

        [lint.severity]
        dangling-related = "ignore"

        [[lint.ignore]]
        operator = "take*"
        rules = ["*"]
        "#,
    );

    let override_path = workspace.join("override.toml");
    write_file(
        &override_path,
        r#"
        [site]
        language = "typescript"

        [clipboard]
        command = ["wl-copy", "--trim-newline"]
        "#,
    );

    let config = Config::load(
        LoadOptions::default()
            .with_working_dir(&workspace)
            .with_override_path(&override_path),
    )
    .expect("load config with precedence");

    assert_eq!(config.site.title, "workspace");
    assert_eq!(config.site.default_operator, "of");
    assert_eq!(config.site.language, "typescript");
    assert_eq!(config.catalog.path, Some(git_root.join("ops.toml")));
    assert_eq!(config.export.output, canonical(&workspace).join("public"));
    assert_eq!(
        config.clipboard.command,
        Some(vec!["wl-copy".to_string(), "--trim-newline".to_string()])
    );
    assert_eq!(
        config.lint.rules,
        vec![LintRule::DanglingRelated, LintRule::EmptyExamples]
    );
    assert_eq!(
        config.lint.severity_for(LintRule::EmptyExamples),
        SeverityLevel::Error
    );
    assert_eq!(
        config.lint.severity_for(LintRule::DanglingRelated),
        SeverityLevel::Ignore
    );
    assert_eq!(
        config.lint.severity_for(LintRule::UnresolvedMenuEntry),
        SeverityLevel::Warning
    );

    assert_eq!(config.lint.ignore.len(), 2);
    assert!(config.lint.is_ignored("generate", LintRule::DanglingRelated));
    assert!(config.lint.is_ignored("takeLast", LintRule::UnresolvedMenuEntry));
    assert!(!config.lint.is_ignored("of", LintRule::DanglingRelated));

    let kinds: Vec<_> = config
        .sources
        .layers
        .iter()
        .map(|layer| layer.kind)
        .collect();
    assert_eq!(
        kinds,
        vec![
            ConfigSourceKind::Default,
            ConfigSourceKind::GitRoot,
            ConfigSourceKind::Local,
            ConfigSourceKind::Override
        ]
    );
}

#[test]
fn missing_override_is_reported() {
    let temp = TempDir::new().expect("tempdir");
    let working_dir = canonical(temp.path());

    let err = Config::load(
        LoadOptions::default()
            .with_working_dir(&working_dir)
            .with_override_path("missing.toml"),
    )
    .expect_err("expected missing override");

    assert!(matches!(err, ConfigError::OverrideNotFound { .. }));
}

#[test]
fn invalid_lint_rule_surfaces_validation_error() {
    let temp = TempDir::new().expect("tempdir");
    let working_dir = canonical(temp.path());
    write_file(
        working_dir.join(".opdoc.toml"),
        r#"
        [lint]
        rules = ["dangling-related", "unknown-rule"]
        "#,
    );

    let err = Config::load(LoadOptions::default().with_working_dir(&working_dir))
        .expect_err("expected validation failure");

    let joined = expect_validation(err);
    assert!(
        joined.contains("unknown lint rule 'unknown-rule'"),
        "unexpected error output: {joined}"
    );
}

#[test]
fn unsupported_language_is_rejected() {
    let temp = TempDir::new().expect("tempdir");
    let working_dir = canonical(temp.path());
    write_file(
        working_dir.join(".opdoc.toml"),
        r#"
        [site]
        language = "cobol"
        "#,
    );

    let err = Config::load(LoadOptions::default().with_working_dir(&working_dir))
        .expect_err("expected validation failure");

    let joined = expect_validation(err);
    assert!(
        joined.contains("site.language: unsupported language 'cobol'"),
        "unexpected error output: {joined}"
    );
    assert!(joined.contains("local config at"), "unexpected error output: {joined}");
}

#[test]
fn invalid_glob_pattern_is_rejected() {
    let temp = TempDir::new().expect("tempdir");
    let working_dir = canonical(temp.path());
    write_file(
        working_dir.join(".opdoc.toml"),
        r#"
        [[lint.ignore]]
        operator = "[["
        rules = ["empty-examples"]
        "#,
    );

    let err = Config::load(LoadOptions::default().with_working_dir(&working_dir))
        .expect_err("expected validation failure");

    let joined = expect_validation(err);
    assert!(
        joined.contains("invalid glob pattern '[['"),
        "unexpected error output: {joined}"
    );
}

#[test]
fn ignore_entries_require_rules() {
    let temp = TempDir::new().expect("tempdir");
    let working_dir = canonical(temp.path());
    write_file(
        working_dir.join(".opdoc.toml"),
        r#"
        [[lint.ignore]]
        operator = "map*"
        "#,
    );

    let err = Config::load(LoadOptions::default().with_working_dir(&working_dir))
        .expect_err("expected validation failure");

    let joined = expect_validation(err);
    assert!(
        joined.contains("must specify at least one rule"),
        "unexpected error output: {joined}"
    );
}

#[test]
fn empty_clipboard_command_is_rejected() {
    let temp = TempDir::new().expect("tempdir");
    let working_dir = canonical(temp.path());
    write_file(
        working_dir.join(".opdoc.toml"),
        r#"
        [clipboard]
        command = []
        "#,
    );

    let err = Config::load(LoadOptions::default().with_working_dir(&working_dir))
        .expect_err("expected validation failure");

    let joined = expect_validation(err);
    assert!(
        joined.contains("clipboard.command must name a program"),
        "unexpected error output: {joined}"
    );
}
