//! File system helpers.

use anyhow::{Context, Result};
use std::fs;
use std::io::Write;
use std::path::Path;

/// Ensures a directory exists, creating it and all parents if necessary.
pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)
            .with_context(|| format!("Failed to create directory: {}", path.display()))?;
    } else if !path.is_dir() {
        return Err(anyhow::anyhow!("Path exists but is not a directory: {}", path.display()));
    }
    Ok(())
}

/// Atomically writes bytes to a file.
///
/// The content goes to a temporary file in the target's directory, is synced,
/// and then renamed over the target, so readers never see a partial file.
pub fn atomic_write(path: &Path, content: &[u8]) -> Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    ensure_dir(parent)?;

    let mut temp = tempfile::NamedTempFile::new_in(parent)
        .with_context(|| format!("Failed to create temp file in: {}", parent.display()))?;
    temp.write_all(content)
        .with_context(|| format!("Failed to write to temp file: {}", temp.path().display()))?;
    temp.as_file().sync_all().with_context(|| "Failed to sync file to disk")?;

    temp.persist(path)
        .with_context(|| format!("Failed to rename temp file to: {}", path.display()))?;

    Ok(())
}

/// Atomically writes a string to a file.
pub fn safe_write(path: &Path, content: &str) -> Result<()> {
    atomic_write(path, content.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_safe_write_creates_parents() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("nested/dir/out.conf");

        safe_write(&target, "accent = #1a1a1a\n").unwrap();
        assert_eq!(fs::read_to_string(&target).unwrap(), "accent = #1a1a1a\n");
    }

    #[test]
    fn test_atomic_write_replaces_existing() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("out.conf");
        fs::write(&target, "old").unwrap();

        atomic_write(&target, b"new").unwrap();
        assert_eq!(fs::read_to_string(&target).unwrap(), "new");

        // No temp files left behind
        let entries = fs::read_dir(temp.path()).unwrap().count();
        assert_eq!(entries, 1);
    }

    #[test]
    fn test_ensure_dir_rejects_file() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("file");
        fs::write(&file, "").unwrap();
        assert!(ensure_dir(&file).is_err());
    }
}
