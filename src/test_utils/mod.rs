//! Test utilities for zenfig
//!
//! Shared by unit tests and the integration suite (through the `test-utils`
//! feature):
//! - [`init_test_logging`] - tracing output inside tests
//! - [`TestWorkspace`] - a scratch directory for variable files and templates
//! - [`variables`] - variables from an inline YAML document
//!
//! # Example
//!
//! ```rust,no_run
//! use zenfig::test_utils::{TestWorkspace, init_test_logging};
//!
//! init_test_logging(None);
//! let workspace = TestWorkspace::new().unwrap();
//! let vars = workspace
//!     .write("vars/theme.yaml", "accent: '{{ @base|norm_hex }}'\nbase: fff\n")
//!     .unwrap();
//! assert!(vars.exists());
//! ```

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Once;
use tempfile::TempDir;
use tracing::Level;
use tracing_subscriber::EnvFilter;

use crate::models::Variables;

/// Global flag to ensure logging is only initialized once in tests
static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// Uses `level` when given, otherwise `RUST_LOG`; with neither, nothing is
/// installed. Only the first call has any effect.
///
/// ```bash
/// RUST_LOG=zenfig=debug cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .with_thread_ids(false)
            .try_init();
    });
}

/// A temporary directory, removed on drop.
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl TestWorkspace {
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new().context("Failed to create temp directory")?;
        Ok(Self { temp_dir })
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Write `content` to `relative`, creating parent directories.
    pub fn write(&self, relative: impl AsRef<Path>, content: &str) -> Result<PathBuf> {
        let path = self.path().join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        std::fs::write(&path, content)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(path)
    }

    pub fn read(&self, relative: impl AsRef<Path>) -> Result<String> {
        let path = self.path().join(relative);
        std::fs::read_to_string(&path).with_context(|| format!("Failed to read {}", path.display()))
    }
}

/// Parse an inline YAML mapping into variables.
///
/// # Panics
///
/// Panics if `yaml` is not a mapping.
pub fn variables(yaml: &str) -> Variables {
    crate::variables::parse_variables(yaml)
        .unwrap_or_else(|e| panic!("invalid test variables: {e}"))
}
