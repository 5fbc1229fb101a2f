use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use opdoc_format::{export_file_name, render_page, render_redirect, LinkStyle, Page, ShowView};
use opdoc_render::encode_segment;
use opdoc_utils::{atomic_write, parallel_try_for_each};
use serde_json::json;
use tracing::{info, warn};

use crate::{OperationError, Operations};

const OPERATOR_DIR: &str = "operator";

#[derive(Clone, Debug, Default)]
pub struct ExportOptions {
    /// Overrides `export.output` from configuration.
    pub output: Option<PathBuf>,
    pub dry_run: bool,
}

#[derive(Clone, Debug)]
pub struct ExportOutcome {
    pub output_dir: PathBuf,
    /// Files written (or that would be written), relative to `output_dir`.
    pub files: Vec<PathBuf>,
    pub dry_run: bool,
}

pub(crate) fn run(ops: &Operations, options: ExportOptions) -> Result<ExportOutcome, OperationError> {
    let output_dir = options
        .output
        .unwrap_or_else(|| ops.config().export.output.clone());
    let catalog = ops.catalog();
    let default_operator = ops.config().site.default_operator.as_str();

    if !catalog.contains(default_operator) {
        warn!(
            operator = default_operator,
            "default operator is not documented; index will point at a missing page"
        );
    }

    let pages: Vec<(&str, PathBuf)> = catalog
        .identifiers()
        .map(|identifier| (identifier, operator_file(identifier)))
        .collect();

    let mut files = vec![PathBuf::from("index.html"), PathBuf::from("catalog.json")];
    files.extend(pages.iter().map(|(_, file)| file.clone()));

    if options.dry_run {
        return Ok(ExportOutcome {
            output_dir,
            files,
            dry_run: true,
        });
    }

    let target = format!(
        "{OPERATOR_DIR}/{}",
        encode_segment(&export_file_name(default_operator))
    );
    let index = render_redirect(&ops.config().site.title, &target);
    write_file(&output_dir, Path::new("index.html"), &index)?;

    let snapshot = json!({
        "title": ops.config().site.title,
        "defaultOperator": default_operator,
        "menu": catalog.menu(),
        "operators": catalog.iter().collect::<BTreeMap<_, _>>(),
    });
    let snapshot = serde_json::to_string_pretty(&snapshot)?;
    write_file(&output_dir, Path::new("catalog.json"), &snapshot)?;

    let menu = ops.menu_view();
    parallel_try_for_each(&pages, |page: &(&str, PathBuf)| {
        let (identifier, file) = page;
        let mut viewer = ops.viewer();
        viewer.navigate(identifier);
        let html = render_page(&Page {
            site_title: &ops.config().site.title,
            language: ops.language(),
            menu: &menu,
            view: ShowView {
                requested: Some(*identifier),
                operator: viewer.displayed(),
                suggestion: None,
            },
            links: LinkStyle::Export,
        });
        write_file(&output_dir, file, &html)
    })?;

    info!(
        pages = pages.len(),
        output = %output_dir.display(),
        "exported static site"
    );

    Ok(ExportOutcome {
        output_dir,
        files,
        dry_run: false,
    })
}

fn operator_file(identifier: &str) -> PathBuf {
    Path::new(OPERATOR_DIR).join(export_file_name(identifier))
}

fn write_file(root: &Path, relative: &Path, contents: &str) -> Result<(), OperationError> {
    let path = root.join(relative);
    atomic_write(&path, contents).map_err(|source| OperationError::Io { path, source })
}
