//! Loading variables from YAML files and directories.
//!
//! A variable source is either a YAML file whose top level is a mapping, or a
//! directory whose files are such documents. Sources are merged in order; a
//! later source replaces whole keys of an earlier one (no deep merge).
//!
//! ```text
//! vars/
//! ├── 00-base.yaml      font_size: 11
//! └── 10-theme.yaml     accent: "{{ @base|norm_hex }}"
//! ```

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::core::ZenfigError;
use crate::models::{Value, Variables};
use crate::utils::platform;

/// Environment variable holding extra variable sources.
pub const VARS_PATH_ENV: &str = "ZENFIG_VARS_PATH";

/// Load and merge every source, in order.
///
/// Paths may start with `~` or contain `$VAR` references. A directory
/// contributes its regular files, non-recursively, sorted by file name; hidden
/// files are skipped.
///
/// # Errors
///
/// A missing source, an unreadable file, invalid YAML or a document that is not
/// a mapping is an error naming the path.
pub async fn load_variables<P: AsRef<Path>>(sources: &[P]) -> Result<Variables, ZenfigError> {
    let mut variables = Variables::new();

    for source in sources {
        let path = expand(source.as_ref())?;
        let metadata = tokio::fs::metadata(&path).await.map_err(|_| {
            ZenfigError::VariableSourceNotFound {
                path: path.display().to_string(),
            }
        })?;

        let files = if metadata.is_dir() {
            directory_files(&path)?
        } else {
            vec![path]
        };

        for file in files {
            let loaded = load_file(&file).await?;
            tracing::debug!("Loaded {} variable(s) from {}", loaded.len(), file.display());
            variables.extend(loaded);
        }
    }

    Ok(variables)
}

fn expand(path: &Path) -> Result<PathBuf, ZenfigError> {
    platform::resolve_path(&path.to_string_lossy()).map_err(|e| {
        ZenfigError::VariableSourceUnreadable {
            path: path.display().to_string(),
            reason: e.to_string(),
        }
    })
}

fn directory_files(dir: &Path) -> Result<Vec<PathBuf>, ZenfigError> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| ZenfigError::VariableSourceUnreadable {
            path: dir.display().to_string(),
            reason: e.to_string(),
        })?;

        let hidden = entry.file_name().to_string_lossy().starts_with('.');
        if entry.file_type().is_file() && !hidden {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

async fn load_file(path: &Path) -> Result<Variables, ZenfigError> {
    let content = tokio::fs::read_to_string(path).await.map_err(|e| {
        ZenfigError::VariableSourceUnreadable {
            path: path.display().to_string(),
            reason: e.to_string(),
        }
    })?;

    parse_variables(&content).map_err(|reason| ZenfigError::MalformedVariables {
        path: path.display().to_string(),
        reason,
    })
}

/// Parse one YAML document into variables.
///
/// An empty document (or one holding only comments) is an empty mapping.
pub fn parse_variables(content: &str) -> Result<Variables, String> {
    if content.trim().is_empty() {
        return Ok(Variables::new());
    }

    let document: serde_yaml::Value = serde_yaml::from_str(content).map_err(|e| e.to_string())?;
    match Value::from(document) {
        Value::Mapping(map) => Ok(map),
        Value::Null => Ok(Variables::new()),
        other => Err(format!("expected a mapping at the top level, found {}", other.type_name())),
    }
}

/// Split a colon-separated list of paths.
///
/// Returns `None` when the list is empty or has an empty entry, which includes
/// a leading or trailing colon.
///
/// ```
/// use std::path::PathBuf;
/// use zenfig::variables::parse_search_path;
///
/// assert_eq!(parse_search_path("/home"), Some(vec![PathBuf::from("/home")]));
/// assert_eq!(parse_search_path("hello:there:"), None);
/// ```
pub fn parse_search_path(text: &str) -> Option<Vec<PathBuf>> {
    if text.is_empty() {
        return None;
    }

    let mut paths = Vec::new();
    for part in text.split(':') {
        if part.is_empty() {
            return None;
        }
        paths.push(PathBuf::from(part));
    }
    Some(paths)
}

/// Sources listed in `ZENFIG_VARS_PATH`, or none when it is unset.
pub fn search_path_from_env() -> Result<Vec<PathBuf>, ZenfigError> {
    match std::env::var(VARS_PATH_ENV) {
        Ok(value) => {
            parse_search_path(&value).ok_or(ZenfigError::InvalidSearchPath { value })
        }
        Err(_) => Ok(Vec::new()),
    }
}
