use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use opdoc_config::{Config, LoadOptions};
use opdoc_core::OpDoc;
use opdoc_format::{ReportFormat, ShowFormat};
use opdoc_ops::{
    CatalogError, CopyOptions, ExportOptions, ExportOutcome, LintOptions, LintOutcome,
    ListOptions, MenuOptions, OperationError, Operations, ShowOptions, ShowTarget,
};
use serde_json::json;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter.
const LOG_ENV: &str = "OPDOC_LOG";

/// Entry point for CLI execution. Returns the desired exit code.
pub fn run() -> Result<i32> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut options = LoadOptions::default();
    if let Some(path) = &cli.config {
        options = options.with_override_path(path.clone());
    }
    let config = match Config::load(options) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            return Ok(2);
        }
    };
    debug!(layers = config.sources.layers.len(), "configuration loaded");

    let engine = match OpDoc::bootstrap(config) {
        Ok(engine) => engine,
        Err(OperationError::Catalog(err)) => {
            let code = match err {
                CatalogError::Io { .. } => 4,
                CatalogError::Parse(_) | CatalogError::Validation(_) => 2,
            };
            report(err);
            return Ok(code);
        }
        Err(err) => return Err(err.into()),
    };
    let ops = engine.operations();

    match cli.command {
        Command::Show(args) => handle_show(ops, args),
        Command::Copy(args) => handle_copy(ops, args),
        Command::List(args) => handle_list(ops, args),
        Command::Menu(args) => handle_menu(ops, args),
        Command::Lint(args) => handle_lint(ops, args),
        Command::Export(args) => handle_export(ops, args),
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn handle_show(ops: &Operations, args: ShowArgs) -> Result<i32> {
    let ShowArgs {
        identifier,
        path,
        format,
    } = args;

    let target = match (identifier, path) {
        (_, Some(path)) => ShowTarget::Path(path),
        (Some(identifier), None) => ShowTarget::Identifier(identifier),
        (None, None) => ShowTarget::Path(String::new()),
    };
    let format = match format.unwrap_or(ShowFormatValue::Plain) {
        ShowFormatValue::Plain => ShowFormat::Plain,
        ShowFormatValue::Json => ShowFormat::Json,
        ShowFormatValue::Html => ShowFormat::Html,
    };

    let outcome = ops.show(ShowOptions { target, format })?;
    emit(&outcome.rendered)?;
    Ok(0)
}

fn handle_copy(ops: &Operations, args: CopyArgs) -> Result<i32> {
    let CopyArgs {
        identifier,
        example,
        stdout,
    } = args;

    let options = CopyOptions {
        identifier,
        example,
        force_stdout: stdout,
    };

    match ops.copy(options) {
        Ok(outcome) => {
            eprintln!(
                "copied example {} of '{}' ({}, {} bytes)",
                outcome.example, outcome.identifier, outcome.title, outcome.bytes
            );
            Ok(0)
        }
        Err(err @ OperationError::UnknownOperator { .. })
        | Err(err @ OperationError::MissingExample { .. }) => {
            eprintln!("{err}");
            Ok(1)
        }
        Err(OperationError::Clipboard(err)) => {
            report(err);
            Ok(4)
        }
        Err(err) => Err(err.into()),
    }
}

fn handle_list(ops: &Operations, args: ListArgs) -> Result<i32> {
    let ListArgs { filter, format } = args;
    let options = ListOptions {
        filter,
        format: report_format(format),
    };

    match ops.list(options) {
        Ok(outcome) => {
            emit(&outcome.rendered)?;
            Ok(0)
        }
        Err(OperationError::InvalidInput(message)) => {
            eprintln!("{message}");
            Ok(2)
        }
        Err(err) => Err(err.into()),
    }
}

fn handle_menu(ops: &Operations, args: MenuArgs) -> Result<i32> {
    let outcome = ops.menu(MenuOptions {
        format: report_format(args.format),
    })?;
    emit(&outcome.rendered)?;
    Ok(0)
}

fn handle_lint(ops: &Operations, args: LintArgs) -> Result<i32> {
    let LintOutcome {
        rendered,
        exit_code,
        ..
    } = ops.lint(LintOptions {
        format: report_format(args.format),
    })?;

    emit(&rendered)?;
    Ok(exit_code)
}

fn handle_export(ops: &Operations, args: ExportArgs) -> Result<i32> {
    let ExportArgs {
        output,
        dry_run,
        json,
    } = args;

    match ops.export(ExportOptions { output, dry_run }) {
        Ok(ExportOutcome {
            output_dir,
            files,
            dry_run,
        }) => {
            if json {
                let payload = json!({
                    "output": output_dir,
                    "dry_run": dry_run,
                    "files": files,
                });
                println!("{}", serde_json::to_string_pretty(&payload)?);
            } else {
                let verb = if dry_run { "would write" } else { "wrote" };
                for file in &files {
                    println!("{verb} {}", output_dir.join(file).display());
                }
            }
            Ok(0)
        }
        Err(err @ OperationError::Io { .. }) => {
            report(err);
            Ok(4)
        }
        Err(err) => Err(err.into()),
    }
}

fn report_format(value: Option<ReportFormatValue>) -> ReportFormat {
    match value.unwrap_or(ReportFormatValue::Plain) {
        ReportFormatValue::Plain => ReportFormat::Plain,
        ReportFormatValue::Json => ReportFormat::Json,
    }
}

/// Print an error with its source chain on one line.
fn report(err: impl std::error::Error + Send + Sync + 'static) {
    eprintln!("{:#}", anyhow::Error::new(err));
}

fn emit(content: &str) -> Result<()> {
    print!("{}", content);
    if !content.ends_with('\n') {
        println!();
    }
    Ok(())
}

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Browse RxJS operator documentation",
    propagate_version = true
)]
struct Cli {
    /// Configuration file applied over discovered `.opdoc.toml` files
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Enable debug logging (overrides OPDOC_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show one operator with highlighted examples
    Show(ShowArgs),
    /// Copy an example's code to the clipboard
    Copy(CopyArgs),
    /// List documented operators
    List(ListArgs),
    /// Print the navigation menu
    Menu(MenuArgs),
    /// Check catalog consistency
    Lint(LintArgs),
    /// Write the catalog as a static HTML site
    Export(ExportArgs),
}

#[derive(Args)]
struct ShowArgs {
    /// Operator identifier (case-sensitive)
    #[arg(value_name = "IDENTIFIER", conflicts_with = "path")]
    identifier: Option<String>,
    /// Navigation path such as `/operator/of`
    #[arg(long, value_name = "PATH")]
    path: Option<String>,
    /// Output format
    #[arg(long, value_enum)]
    format: Option<ShowFormatValue>,
}

#[derive(Args)]
struct CopyArgs {
    /// Operator identifier
    #[arg(value_name = "IDENTIFIER")]
    identifier: String,
    /// 1-based example number
    #[arg(long, default_value_t = 1, value_name = "N")]
    example: usize,
    /// Print the code to stdout instead of the configured clipboard command
    #[arg(long)]
    stdout: bool,
}

#[derive(Args)]
struct ListArgs {
    /// Case-insensitive regex applied to identifiers
    #[arg(long, value_name = "REGEX")]
    filter: Option<String>,
    /// Output format
    #[arg(long, value_enum)]
    format: Option<ReportFormatValue>,
}

#[derive(Args)]
struct MenuArgs {
    /// Output format
    #[arg(long, value_enum)]
    format: Option<ReportFormatValue>,
}

#[derive(Args)]
struct LintArgs {
    /// Select lint output format
    #[arg(long, value_enum)]
    format: Option<ReportFormatValue>,
}

#[derive(Args)]
struct ExportArgs {
    /// Output directory (defaults to `export.output`)
    #[arg(long, value_name = "DIR")]
    output: Option<PathBuf>,
    /// List files without writing them
    #[arg(long = "dry-run")]
    dry_run: bool,
    /// Emit a machine-readable JSON summary
    #[arg(long)]
    json: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum ShowFormatValue {
    Plain,
    Json,
    Html,
}

#[derive(Clone, Copy, ValueEnum)]
enum ReportFormatValue {
    Plain,
    Json,
}
