//! Shared utilities for opdoc crates.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use rayon::iter::{IntoParallelIterator, ParallelIterator};
use tempfile::Builder;

/// Run `func` over `items` in parallel, stopping at the first error.
pub fn parallel_try_for_each<T, F, E>(items: T, func: F) -> Result<(), E>
where
    T: IntoParallelIterator,
    F: Fn(T::Item) -> Result<(), E> + Send + Sync,
    E: Send,
{
    items.into_par_iter().try_for_each(func)
}

/// Atomically write `contents` to `path`. Readers never observe a partially
/// written file: the data goes to a temporary sibling that is then renamed.
pub fn atomic_write(path: &Path, contents: &str) -> io::Result<()> {
    let parent = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| Path::new(".").to_path_buf());
    fs::create_dir_all(&parent)?;

    let mut tmp = Builder::new().prefix(".opdoc").tempfile_in(&parent)?;

    tmp.as_file_mut().write_all(contents.as_bytes())?;
    tmp.as_file_mut().sync_all()?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        if let Ok(metadata) = fs::metadata(path) {
            let perm = metadata.permissions().mode();
            let _ = fs::set_permissions(tmp.path(), fs::Permissions::from_mode(perm));
        }
    }

    tmp.persist(path).map(|_| ()).map_err(|err| err.error)
}
