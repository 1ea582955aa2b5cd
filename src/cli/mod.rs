//! Command-line interface for zenfig.
//!
//! # Commands
//!
//! - `render` - resolve variables and render a template with them
//! - `vars` - print the resolved variables, or their dependency trees
//!
//! # Global Options
//!
//! - `--verbose` - debug logging
//! - `--quiet` - errors only
//! - `--config` - path to the configuration file (default: `$ZENFIG_CONFIG` or
//!   `<config_dir>/zenfig/config.toml`)
//!
//! # Example
//!
//! ```bash
//! # Resolve ~/.config/zenfig/vars plus a theme file and render a config
//! zenfig render -I themes/dark.yaml -o ~/.config/kitty/kitty.conf kitty.conf.tera
//!
//! # Inspect what a variable depends on
//! zenfig vars -I themes/dark.yaml --tree
//! ```

mod common;
mod render;
mod vars;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

pub use common::VariableArgs;
pub use render::RenderCommand;
pub use vars::{OutputFormat, VarsCommand};

/// Runtime settings derived from the global flags.
///
/// Commands receive this instead of reading the flags or mutating the process
/// environment, so tests can drive them directly.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    /// Log filter override; `None` means `RUST_LOG`, or `warn` when unset.
    pub log_level: Option<String>,

    /// Configuration file given with `--config`.
    pub config_path: Option<PathBuf>,
}

impl CliConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the stderr log subscriber. Later calls are ignored.
    pub fn init_logging(&self) {
        let filter = match &self.log_level {
            Some(level) => EnvFilter::new(level),
            None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "zenfig",
    about = "Resolve interdependent configuration variables and render templates with them",
    version,
    long_about = "zenfig loads variables from YAML files, resolves the references between them \
                  ({{ @name|filter }}), and renders Tera templates with the result."
)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug output
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only print errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to the configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Render a template with the resolved variables
    Render(RenderCommand),

    /// Print the resolved variables
    Vars(VarsCommand),
}

impl Cli {
    pub async fn execute(self) -> Result<()> {
        let config = self.build_config();
        config.init_logging();
        self.execute_with_config(config).await
    }

    #[must_use]
    pub fn build_config(&self) -> CliConfig {
        let log_level = if self.verbose {
            Some("debug".to_string())
        } else if self.quiet {
            Some("error".to_string())
        } else {
            None
        };

        CliConfig {
            log_level,
            config_path: self.config.clone(),
        }
    }

    pub async fn execute_with_config(self, config: CliConfig) -> Result<()> {
        match self.command {
            Commands::Render(cmd) => cmd.execute(&config).await,
            Commands::Vars(cmd) => cmd.execute(&config).await,
        }
    }
}
