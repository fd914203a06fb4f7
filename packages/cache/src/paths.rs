#![allow(clippy::module_name_repetitions)]
//! Default on-disk locations for the caches.

use std::path::{Path, PathBuf};

/// Directory name used under the working directory when no cache
/// directory is configured.
pub const DEFAULT_CACHE_DIR: &str = "data/cache";

/// Returns the cache directory, relative to the current working directory
/// unless `configured` is absolute.
#[must_use]
pub fn cache_dir(configured: Option<&Path>) -> PathBuf {
    configured.map_or_else(|| PathBuf::from(DEFAULT_CACHE_DIR), Path::to_path_buf)
}

/// Ensures a directory exists, creating it if necessary.
///
/// # Errors
///
/// Returns an I/O error if the directory cannot be created.
pub fn ensure_dir(path: &Path) -> std::io::Result<()> {
    if !path.as_os_str().is_empty() && !path.exists() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn falls_back_to_default_dir() {
        assert_eq!(cache_dir(None), PathBuf::from("data/cache"));
        assert_eq!(
            cache_dir(Some(Path::new("/var/lib/cards"))),
            PathBuf::from("/var/lib/cards")
        );
    }

    #[test]
    fn empty_path_is_left_alone() {
        ensure_dir(Path::new("")).unwrap();
    }
}
