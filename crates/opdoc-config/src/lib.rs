//! Configuration primitives and loader for the opdoc toolkit.
//!
//! The loader resolves configuration using a fixed precedence stack:
//! override flag → working directory → git root → built-in defaults.
//! Parsed settings are normalised into typed structures so downstream crates
//! can operate without touching raw TOML.

use std::collections::{HashMap, HashSet};
use std::env;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use globset::{Glob, GlobMatcher};
use serde::Deserialize;
use thiserror::Error;

const CONFIG_FILE_NAME: &str = ".opdoc.toml";

/// Identifier shown when the root path is requested.
pub const DEFAULT_OPERATOR: &str = "defer";

/// Languages the highlighter knows how to tokenize.
pub const SUPPORTED_LANGUAGES: &[&str] = &["javascript", "typescript"];

/// Complete configuration resolved from defaults and on-disk overrides.
#[derive(Clone, Debug)]
pub struct Config {
    pub site: SiteSettings,
    pub catalog: CatalogSettings,
    pub clipboard: ClipboardSettings,
    pub export: ExportSettings,
    pub lint: LintSettings,
    pub sources: ConfigSources,
}

/// Presentation settings shared by every front end.
#[derive(Clone, Debug)]
pub struct SiteSettings {
    pub title: String,
    pub default_operator: String,
    pub language: String,
}

/// Where operator records come from. `None` means the embedded catalog.
#[derive(Clone, Debug, Default)]
pub struct CatalogSettings {
    pub path: Option<PathBuf>,
}

/// External command receiving copied code on stdin.
#[derive(Clone, Debug, Default)]
pub struct ClipboardSettings {
    pub command: Option<Vec<String>>,
}

/// Settings for the static site export.
#[derive(Clone, Debug)]
pub struct ExportSettings {
    pub output: PathBuf,
}

/// Settings covering catalog lint behaviour.
#[derive(Clone, Debug)]
pub struct LintSettings {
    pub rules: Vec<LintRule>,
    pub severity: HashMap<LintRule, SeverityLevel>,
    pub ignore: Vec<LintIgnore>,
}

impl LintSettings {
    /// Returns the effective severity for `rule`, falling back to the rule default.
    pub fn severity_for(&self, rule: LintRule) -> SeverityLevel {
        self.severity
            .get(&rule)
            .copied()
            .unwrap_or_else(|| rule.default_severity())
    }

    /// Whether findings of `rule` on `operator` are suppressed by an ignore entry.
    pub fn is_ignored(&self, operator: &str, rule: LintRule) -> bool {
        self.ignore
            .iter()
            .any(|entry| entry.rules.contains(&rule) && entry.matcher.is_match(operator))
    }
}

/// Pattern plus compiled matcher helper.
#[derive(Clone, Debug)]
pub struct Pattern {
    original: String,
    glob: Glob,
}

impl Pattern {
    fn new(source: ConfigSource, value: String) -> Result<Self, ConfigValidationError> {
        match Glob::new(&value) {
            Ok(glob) => Ok(Pattern {
                original: value,
                glob,
            }),
            Err(err) => Err(ConfigValidationError::new(
                Some(source),
                format!("invalid glob pattern '{value}': {err}"),
            )),
        }
    }

    pub fn original(&self) -> &str {
        &self.original
    }

    pub fn glob(&self) -> &Glob {
        &self.glob
    }
}

/// Supported lint rules.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Ord, PartialOrd)]
pub enum LintRule {
    DanglingRelated,
    UnresolvedMenuEntry,
    EmptyExamples,
}

impl LintRule {
    pub const ALL: &'static [LintRule] = &[
        LintRule::DanglingRelated,
        LintRule::UnresolvedMenuEntry,
        LintRule::EmptyExamples,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            LintRule::DanglingRelated => "dangling-related",
            LintRule::UnresolvedMenuEntry => "unresolved-menu-entry",
            LintRule::EmptyExamples => "empty-examples",
        }
    }

    /// Catalog references are tolerated at runtime, so nothing fails a run by default.
    pub fn default_severity(self) -> SeverityLevel {
        SeverityLevel::Warning
    }
}

impl fmt::Display for LintRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for LintRule {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "dangling-related" => Ok(LintRule::DanglingRelated),
            "unresolved-menu-entry" => Ok(LintRule::UnresolvedMenuEntry),
            "empty-examples" => Ok(LintRule::EmptyExamples),
            _ => Err(()),
        }
    }
}

/// Severity configuration surfaced to lint consumers.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SeverityLevel {
    Error,
    Warning,
    Ignore,
}

impl SeverityLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            SeverityLevel::Error => "error",
            SeverityLevel::Warning => "warning",
            SeverityLevel::Ignore => "ignore",
        }
    }
}

impl fmt::Display for SeverityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SeverityLevel {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "error" => Ok(SeverityLevel::Error),
            "warning" => Ok(SeverityLevel::Warning),
            "ignore" => Ok(SeverityLevel::Ignore),
            _ => Err(()),
        }
    }
}

/// Ignore rule describing which lint rules to suppress for matching operators.
#[derive(Clone, Debug)]
pub struct LintIgnore {
    pub operator: Pattern,
    pub matcher: GlobMatcher,
    pub rules: LintIgnoreRules,
    pub source: ConfigSource,
}

/// Target set for lint ignore entries.
#[derive(Clone, Debug)]
pub enum LintIgnoreRules {
    All,
    Specific(Vec<LintRule>),
}

impl LintIgnoreRules {
    pub fn contains(&self, rule: &LintRule) -> bool {
        match self {
            LintIgnoreRules::All => true,
            LintIgnoreRules::Specific(rules) => rules.contains(rule),
        }
    }
}

/// Provenance information for resolved configuration.
#[derive(Clone, Debug)]
pub struct ConfigSources {
    pub working_directory: PathBuf,
    pub layers: Vec<ConfigSource>,
}

/// Specific layer of configuration (default/git/local/override).
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ConfigSource {
    pub kind: ConfigSourceKind,
    pub path: Option<PathBuf>,
    pub base_dir: PathBuf,
}

impl ConfigSource {
    fn default(base_dir: PathBuf) -> Self {
        ConfigSource {
            kind: ConfigSourceKind::Default,
            path: None,
            base_dir,
        }
    }

    fn for_file(kind: ConfigSourceKind, path: PathBuf) -> Self {
        let base_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        ConfigSource {
            kind,
            path: Some(path),
            base_dir,
        }
    }

    fn describe(&self) -> String {
        match (&self.kind, &self.path) {
            (ConfigSourceKind::Default, _) => "built-in defaults".to_owned(),
            (kind, Some(path)) => format!("{} at {}", kind, path.display()),
            (kind, None) => kind.to_string(),
        }
    }
}

/// Kinds of configuration sources, ordered from lowest to highest precedence.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ConfigSourceKind {
    Default,
    GitRoot,
    Local,
    Override,
}

impl fmt::Display for ConfigSourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ConfigSourceKind::Default => "defaults",
            ConfigSourceKind::GitRoot => "git-root config",
            ConfigSourceKind::Local => "local config",
            ConfigSourceKind::Override => "override config",
        };
        f.write_str(label)
    }
}

/// Loader options, typically supplied by the CLI layer.
#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub override_path: Option<PathBuf>,
    pub working_dir: Option<PathBuf>,
}

impl LoadOptions {
    pub fn with_override_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.override_path = Some(path.into());
        self
    }

    pub fn with_working_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(path.into());
        self
    }
}

/// Errors surfaced while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to resolve working directory {attempted}: {source}")]
    WorkingDirectory {
        attempted: PathBuf,
        source: io::Error,
    },
    #[error("override config {path} not found")]
    OverrideNotFound { path: PathBuf },
    #[error("failed to read config {path}: {source}")]
    Io { path: PathBuf, source: io::Error },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("configuration validation failed:\n{0}")]
    Validation(ConfigValidationErrors),
}

impl Config {
    /// Loads configuration using the precedence rules and returns typed settings.
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let working_dir = resolve_working_dir(options.working_dir)?;
        let override_path = options
            .override_path
            .map(|path| make_absolute(&path, &working_dir));

        if let Some(path) = &override_path {
            if !path.exists() {
                return Err(ConfigError::OverrideNotFound { path: path.clone() });
            }
        }

        let default_source = ConfigSource::default(working_dir.clone());
        let mut merged = PartialConfig::default();
        merged.merge(defaults_layer(default_source.clone()));

        let mut source_layers = vec![default_source];

        let git_root = find_git_root(&working_dir);
        let git_config_path = git_root.as_ref().map(|root| root.join(CONFIG_FILE_NAME));
        let local_config_path = working_dir.join(CONFIG_FILE_NAME);

        if let Some(path) = git_config_path.as_ref() {
            if path.exists() && Some(path) != override_path.as_ref() && path != &local_config_path {
                let source = ConfigSource::for_file(ConfigSourceKind::GitRoot, path.clone());
                merged.merge(load_layer(path, source.clone())?);
                source_layers.push(source);
            }
        }

        if local_config_path.exists() && Some(&local_config_path) != override_path.as_ref() {
            let source = ConfigSource::for_file(ConfigSourceKind::Local, local_config_path.clone());
            merged.merge(load_layer(&local_config_path, source.clone())?);
            source_layers.push(source);
        }

        if let Some(path) = override_path {
            let source = ConfigSource::for_file(ConfigSourceKind::Override, path.clone());
            merged.merge(load_layer(&path, source.clone())?);
            source_layers.push(source);
        }

        let config = merged.finalize().map_err(ConfigError::Validation)?;
        Ok(Config {
            site: config.site,
            catalog: config.catalog,
            clipboard: config.clipboard,
            export: config.export,
            lint: config.lint,
            sources: ConfigSources {
                working_directory: working_dir,
                layers: source_layers,
            },
        })
    }

    /// Configuration built purely from the built-in defaults, rooted at `working_dir`.
    ///
    /// Unlike [`Config::load`] this never touches the filesystem. The built-in
    /// defaults always validate; `defaults_are_valid` locks that down.
    pub fn defaults(working_dir: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let working_dir = working_dir.into();
        let source = ConfigSource::default(working_dir.clone());
        let mut merged = PartialConfig::default();
        merged.merge(defaults_layer(source.clone()));
        let resolved = merged.finalize().map_err(ConfigError::Validation)?;
        Ok(Config {
            site: resolved.site,
            catalog: resolved.catalog,
            clipboard: resolved.clipboard,
            export: resolved.export,
            lint: resolved.lint,
            sources: ConfigSources {
                working_directory: working_dir,
                layers: vec![source],
            },
        })
    }
}

fn resolve_working_dir(override_dir: Option<PathBuf>) -> Result<PathBuf, ConfigError> {
    match override_dir {
        Some(path) => fs::canonicalize(&path).map_err(|source| ConfigError::WorkingDirectory {
            attempted: path,
            source,
        }),
        None => env::current_dir().map_err(|source| ConfigError::WorkingDirectory {
            attempted: PathBuf::from("."),
            source,
        }),
    }
}

fn make_absolute(path: &Path, base: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

fn load_layer(path: &Path, source: ConfigSource) -> Result<PartialConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.into(),
        source,
    })?;
    let raw: RawConfig = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.into(),
        source,
    })?;
    Ok(raw.into_partial(source))
}

fn defaults_layer(source: ConfigSource) -> PartialConfig {
    let site = SitePartial {
        title: Some(Located::new("RxJS 操作符".into(), source.clone())),
        default_operator: Some(Located::new(DEFAULT_OPERATOR.into(), source.clone())),
        language: Some(Located::new("javascript".into(), source.clone())),
    };

    let export = ExportPartial {
        output: Some(Located::new(PathBuf::from("site"), source.clone())),
    };

    let lint = LintPartial {
        rules: Some(Located::new(
            LintRule::ALL.iter().map(|rule| rule.to_string()).collect(),
            source,
        )),
        ..LintPartial::default()
    };

    PartialConfig {
        site: Some(site),
        catalog: None,
        clipboard: None,
        export: Some(export),
        lint: Some(lint),
    }
}

fn find_git_root(start: &Path) -> Option<PathBuf> {
    let mut current = Some(start);
    while let Some(dir) = current {
        if dir.join(".git").exists() {
            return Some(dir.to_path_buf());
        }
        current = dir.parent();
    }
    None
}

#[derive(Clone, Debug, Default)]
struct PartialConfig {
    site: Option<SitePartial>,
    catalog: Option<CatalogPartial>,
    clipboard: Option<ClipboardPartial>,
    export: Option<ExportPartial>,
    lint: Option<LintPartial>,
}

impl PartialConfig {
    fn merge(&mut self, mut other: PartialConfig) {
        if let Some(other_site) = other.site.take() {
            match &mut self.site {
                Some(site) => site.merge(other_site),
                None => self.site = Some(other_site),
            }
        }

        if let Some(other_catalog) = other.catalog.take() {
            match &mut self.catalog {
                Some(catalog) => catalog.merge(other_catalog),
                None => self.catalog = Some(other_catalog),
            }
        }

        if let Some(other_clipboard) = other.clipboard.take() {
            match &mut self.clipboard {
                Some(clipboard) => clipboard.merge(other_clipboard),
                None => self.clipboard = Some(other_clipboard),
            }
        }

        if let Some(other_export) = other.export.take() {
            match &mut self.export {
                Some(export) => export.merge(other_export),
                None => self.export = Some(other_export),
            }
        }

        if let Some(other_lint) = other.lint.take() {
            match &mut self.lint {
                Some(lint) => lint.merge(other_lint),
                None => self.lint = Some(other_lint),
            }
        }
    }

    fn finalize(self) -> Result<ResolvedConfig, ConfigValidationErrors> {
        let mut errors = Vec::new();

        let site_partial = self.site.unwrap_or_default();
        let title = site_partial
            .title
            .map(|located| located.value)
            .unwrap_or_default();

        let default_operator = site_partial
            .default_operator
            .unwrap_or_else(|| Located::fallback(DEFAULT_OPERATOR.to_string()));
        if default_operator.value.trim().is_empty() {
            errors.push(
                ConfigValidationError::new(
                    Some(default_operator.source.clone()),
                    "default operator cannot be empty".into(),
                )
                .with_context("site.default_operator"),
            );
        }

        let language = site_partial
            .language
            .unwrap_or_else(|| Located::fallback("javascript".to_string()));
        if !SUPPORTED_LANGUAGES.contains(&language.value.as_str()) {
            errors.push(
                ConfigValidationError::new(
                    Some(language.source.clone()),
                    format!(
                        "unsupported language '{}' (expected one of: {})",
                        language.value,
                        SUPPORTED_LANGUAGES.join(", ")
                    ),
                )
                .with_context("site.language"),
            );
        }

        let catalog_path = self
            .catalog
            .unwrap_or_default()
            .path
            .map(|located| resolve_path(&located));

        let clipboard_command = self.clipboard.unwrap_or_default().command;
        if let Some(command) = &clipboard_command {
            if command.value.first().map_or(true, |program| program.trim().is_empty()) {
                errors.push(
                    ConfigValidationError::new(
                        Some(command.source.clone()),
                        "clipboard.command must name a program".into(),
                    )
                    .with_context("clipboard.command"),
                );
            }
        }

        let export_output = self
            .export
            .unwrap_or_default()
            .output
            .unwrap_or_else(|| Located::fallback(PathBuf::from("site")));

        let lint_partial = self.lint.unwrap_or_default();
        let rules_loc = lint_partial.rules.unwrap_or_else(|| {
            Located::fallback(LintRule::ALL.iter().map(|rule| rule.to_string()).collect())
        });
        let rules = parse_rules(rules_loc, &mut errors);
        let severity = parse_severity_map(lint_partial.severity, &mut errors);
        let ignore = parse_ignore_list(lint_partial.ignore, &mut errors);

        if !errors.is_empty() {
            return Err(ConfigValidationErrors(errors));
        }

        Ok(ResolvedConfig {
            site: SiteSettings {
                title,
                default_operator: default_operator.value,
                language: language.value,
            },
            catalog: CatalogSettings { path: catalog_path },
            clipboard: ClipboardSettings {
                command: clipboard_command.map(|located| located.value),
            },
            export: ExportSettings {
                output: resolve_path(&export_output),
            },
            lint: LintSettings {
                rules,
                severity,
                ignore,
            },
        })
    }
}

#[derive(Clone, Debug, Default)]
struct SitePartial {
    title: Option<Located<String>>,
    default_operator: Option<Located<String>>,
    language: Option<Located<String>>,
}

impl SitePartial {
    fn merge(&mut self, other: SitePartial) {
        if other.title.is_some() {
            self.title = other.title;
        }
        if other.default_operator.is_some() {
            self.default_operator = other.default_operator;
        }
        if other.language.is_some() {
            self.language = other.language;
        }
    }
}

#[derive(Clone, Debug, Default)]
struct CatalogPartial {
    path: Option<Located<PathBuf>>,
}

impl CatalogPartial {
    fn merge(&mut self, other: CatalogPartial) {
        if other.path.is_some() {
            self.path = other.path;
        }
    }
}

#[derive(Clone, Debug, Default)]
struct ClipboardPartial {
    command: Option<Located<Vec<String>>>,
}

impl ClipboardPartial {
    fn merge(&mut self, other: ClipboardPartial) {
        if other.command.is_some() {
            self.command = other.command;
        }
    }
}

#[derive(Clone, Debug, Default)]
struct ExportPartial {
    output: Option<Located<PathBuf>>,
}

impl ExportPartial {
    fn merge(&mut self, other: ExportPartial) {
        if other.output.is_some() {
            self.output = other.output;
        }
    }
}

#[derive(Clone, Debug, Default)]
struct LintPartial {
    rules: Option<Located<Vec<String>>>,
    severity: HashMap<String, Located<String>>,
    ignore: Vec<Located<LintIgnorePartial>>,
}

impl LintPartial {
    fn merge(&mut self, other: LintPartial) {
        if other.rules.is_some() {
            self.rules = other.rules;
        }
        for (key, value) in other.severity {
            self.severity.insert(key, value);
        }
        self.ignore.extend(other.ignore);
    }
}

#[derive(Clone, Debug)]
struct LintIgnorePartial {
    operator: String,
    rules: Vec<String>,
}

#[derive(Clone, Debug)]
struct Located<T> {
    value: T,
    source: ConfigSource,
}

impl<T> Located<T> {
    fn new(value: T, source: ConfigSource) -> Self {
        Located { value, source }
    }

    fn fallback(value: T) -> Self {
        Located::new(value, ConfigSource::default(PathBuf::from(".")))
    }
}

fn resolve_path(located: &Located<PathBuf>) -> PathBuf {
    let path = &located.value;
    if path.is_absolute() {
        path.clone()
    } else {
        located.source.base_dir.join(path)
    }
}

fn parse_rules(
    located: Located<Vec<String>>,
    errors: &mut Vec<ConfigValidationError>,
) -> Vec<LintRule> {
    let mut result = Vec::new();
    let mut seen = HashSet::new();
    for rule_name in located.value {
        match rule_name.parse::<LintRule>() {
            Ok(rule) => {
                if !seen.insert(rule) {
                    errors.push(
                        ConfigValidationError::new(
                            Some(located.source.clone()),
                            format!("duplicate lint rule '{rule}' in lint.rules"),
                        )
                        .with_context("lint.rules"),
                    );
                } else {
                    result.push(rule);
                }
            }
            Err(_) => errors.push(
                ConfigValidationError::new(
                    Some(located.source.clone()),
                    format!("unknown lint rule '{rule_name}'"),
                )
                .with_context("lint.rules"),
            ),
        }
    }
    result
}

fn parse_severity_map(
    raw: HashMap<String, Located<String>>,
    errors: &mut Vec<ConfigValidationError>,
) -> HashMap<LintRule, SeverityLevel> {
    let mut result = HashMap::new();
    for (rule_name, located_value) in raw {
        match rule_name.parse::<LintRule>() {
            Ok(rule) => match located_value.value.parse::<SeverityLevel>() {
                Ok(level) => {
                    result.insert(rule, level);
                }
                Err(_) => errors.push(
                    ConfigValidationError::new(
                        Some(located_value.source.clone()),
                        format!(
                            "invalid severity '{}' for rule '{}'",
                            located_value.value, rule
                        ),
                    )
                    .with_context("lint.severity"),
                ),
            },
            Err(_) => errors.push(
                ConfigValidationError::new(
                    Some(located_value.source.clone()),
                    format!("unknown lint rule '{rule_name}' in lint.severity"),
                )
                .with_context("lint.severity"),
            ),
        }
    }
    result
}

fn parse_ignore_list(
    entries: Vec<Located<LintIgnorePartial>>,
    errors: &mut Vec<ConfigValidationError>,
) -> Vec<LintIgnore> {
    let mut result = Vec::new();
    for entry in entries {
        let Located { value, source } = entry;
        let pattern = match Pattern::new(source.clone(), value.operator.clone()) {
            Ok(pattern) => pattern,
            Err(err) => {
                errors.push(err.with_context("lint.ignore"));
                continue;
            }
        };
        let matcher = pattern.glob().compile_matcher();

        if value.rules.is_empty() {
            errors.push(
                ConfigValidationError::new(
                    Some(source.clone()),
                    format!(
                        "lint.ignore entry for operator '{}' must specify at least one rule",
                        pattern.original()
                    ),
                )
                .with_context("lint.ignore"),
            );
            continue;
        }

        let mut all_rules = false;
        let mut rules = Vec::new();
        for rule_name in value.rules {
            if rule_name == "*" {
                all_rules = true;
                continue;
            }
            match rule_name.parse::<LintRule>() {
                Ok(rule) => rules.push(rule),
                Err(_) => errors.push(
                    ConfigValidationError::new(
                        Some(source.clone()),
                        format!(
                            "unknown lint rule '{}' in lint.ignore entry for operator '{}'",
                            rule_name,
                            pattern.original()
                        ),
                    )
                    .with_context("lint.ignore"),
                ),
            }
        }

        if !all_rules && rules.is_empty() {
            continue;
        }

        let rules = if all_rules {
            LintIgnoreRules::All
        } else {
            LintIgnoreRules::Specific(rules)
        };

        result.push(LintIgnore {
            operator: pattern,
            matcher,
            rules,
            source,
        });
    }
    result
}

#[derive(Clone, Debug)]
struct ResolvedConfig {
    site: SiteSettings,
    catalog: CatalogSettings,
    clipboard: ClipboardSettings,
    export: ExportSettings,
    lint: LintSettings,
}

/// Container for validation failures, formatted as a bullet list.
#[derive(Debug)]
pub struct ConfigValidationErrors(pub Vec<ConfigValidationError>);

impl fmt::Display for ConfigValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, err) in self.0.iter().enumerate() {
            if idx > 0 {
                writeln!(f)?;
            }
            write!(f, "- {err}")?;
        }
        Ok(())
    }
}

impl ConfigValidationErrors {
    pub fn iter(&self) -> impl Iterator<Item = &ConfigValidationError> {
        self.0.iter()
    }
}

/// Validation failure with optional provenance.
#[derive(Clone, Debug)]
pub struct ConfigValidationError {
    pub source: Option<ConfigSource>,
    pub message: String,
    pub context: Option<String>,
}

impl ConfigValidationError {
    fn new(source: Option<ConfigSource>, message: String) -> Self {
        ConfigValidationError {
            source,
            message,
            context: None,
        }
    }

    fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }
}

impl fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(context) = &self.context {
            write!(f, "{}: {}", context, self.message)?;
        } else {
            write!(f, "{}", self.message)?;
        }
        if let Some(source) = &self.source {
            write!(f, " ({})", source.describe())?;
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    #[serde(default)]
    site: Option<RawSite>,
    #[serde(default)]
    catalog: Option<RawCatalog>,
    #[serde(default)]
    clipboard: Option<RawClipboard>,
    #[serde(default)]
    export: Option<RawExport>,
    #[serde(default)]
    lint: Option<RawLint>,
}

impl RawConfig {
    fn into_partial(self, source: ConfigSource) -> PartialConfig {
        PartialConfig {
            site: self.site.map(|site| SitePartial {
                title: site.title.map(|value| Located::new(value, source.clone())),
                default_operator: site
                    .default_operator
                    .map(|value| Located::new(value, source.clone())),
                language: site
                    .language
                    .map(|value| Located::new(value, source.clone())),
            }),
            catalog: self.catalog.map(|catalog| CatalogPartial {
                path: catalog.path.map(|value| Located::new(value, source.clone())),
            }),
            clipboard: self.clipboard.map(|clipboard| ClipboardPartial {
                command: clipboard
                    .command
                    .map(|value| Located::new(value, source.clone())),
            }),
            export: self.export.map(|export| ExportPartial {
                output: export.output.map(|value| Located::new(value, source.clone())),
            }),
            lint: self.lint.map(|lint| lint.into_partial(source.clone())),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawSite {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    default_operator: Option<String>,
    #[serde(default)]
    language: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawCatalog {
    #[serde(default)]
    path: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
struct RawClipboard {
    #[serde(default)]
    command: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct RawExport {
    #[serde(default)]
    output: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
struct RawLint {
    #[serde(default)]
    rules: Option<Vec<String>>,
    #[serde(default)]
    severity: HashMap<String, String>,
    #[serde(default)]
    ignore: Vec<RawLintIgnore>,
}

impl RawLint {
    fn into_partial(self, source: ConfigSource) -> LintPartial {
        let severity = self
            .severity
            .into_iter()
            .map(|(key, value)| (key, Located::new(value, source.clone())))
            .collect();

        let ignore = self
            .ignore
            .into_iter()
            .map(|entry| {
                Located::new(
                    LintIgnorePartial {
                        operator: entry.operator,
                        rules: entry.rules.unwrap_or_default(),
                    },
                    source.clone(),
                )
            })
            .collect();

        LintPartial {
            rules: self.rules.map(|value| Located::new(value, source.clone())),
            severity,
            ignore,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawLintIgnore {
    operator: String,
    #[serde(default)]
    rules: Option<Vec<String>>,
}
