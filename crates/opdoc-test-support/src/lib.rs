//! Shared test harness utilities for opdoc crates.

use std::fs;
use std::path::{Path, PathBuf};

use opdoc_config::Config;

/// Small catalog with one clean operator, one without examples, a dangling
/// `related` entry, and a menu entry that does not resolve.
pub const SAMPLE_CATALOG: &str = r#"
[[menu]]
title = "Sample"
operators = ["first", "bare", "missing"]

[operators.first]
description = "Emits only the first value."
signature = "first<T>(): OperatorFunction<T, T>"
related = ["bare", "lst"]

[[operators.first.examples]]
title = "Basic"
code = '''
import { of, first } from 'rxjs';
of(1, 2).pipe(first()).subscribe(console.log);
'''

[[operators.first.examples]]
title = "Markup"
code = '''
const html = `<p>${value}</p>`;
'''

[operators.last]
description = "Emits only the last value."
signature = "last<T>(): OperatorFunction<T, T>"

[[operators.last.examples]]
title = "Basic"
code = "of(1, 2).pipe(last());"

[operators.bare]
description = "No examples yet."
signature = "bare(): void"
examples = []
"#;

/// Returns a baseline configuration for tests.
pub fn test_config() -> Config {
    Config::defaults(std::env::temp_dir()).expect("default config")
}

/// Baseline configuration rooted at `dir`.
pub fn config_in(dir: &Path) -> Config {
    Config::defaults(dir).expect("default config")
}

/// Write `contents` to `dir/relative`, creating parent directories.
pub fn write_file(dir: &Path, relative: &str, contents: &str) -> PathBuf {
    let path = dir.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent directory");
    }
    fs::write(&path, contents).expect("write fixture");
    path
}

/// Configuration rooted at `dir` that reads [`SAMPLE_CATALOG`] from disk.
pub fn sample_catalog_config(dir: &Path) -> Config {
    let path = write_file(dir, "catalog.toml", SAMPLE_CATALOG);
    let mut config = config_in(dir);
    config.catalog.path = Some(path);
    config
}
