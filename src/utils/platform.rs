//! Path helpers.

use anyhow::{Context, Result};
use std::path::PathBuf;

/// Expand a leading `~` and `$VAR` / `${VAR}` references in a path.
///
/// # Errors
///
/// Fails when the path references an environment variable that is not set.
pub fn resolve_path(path: &str) -> Result<PathBuf> {
    let expanded = shellexpand::full(path).with_context(|| {
        format!(
            "Failed to expand path: {path}\n\n\
            Environment variables in paths must be set (use $VAR or ${{VAR}})"
        )
    })?;
    Ok(PathBuf::from(expanded.into_owned()))
}

/// The user's home directory, if it can be determined.
pub fn home_dir() -> Option<PathBuf> {
    dirs::home_dir()
}
