//! Shared pieces of the `render` and `vars` commands.

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use super::CliConfig;
use crate::config::GlobalConfig;
use crate::models::Variables;
use crate::resolver::ResolverOptions;
use crate::variables;

/// Where variables come from and how strictly they are resolved.
#[derive(Args, Debug, Clone, Default)]
pub struct VariableArgs {
    /// Variable file or directory; repeatable, later sources override earlier ones
    #[arg(short = 'I', long = "include", value_name = "PATH")]
    pub include: Vec<PathBuf>,

    /// Fail on references to undefined variables instead of rendering them empty
    #[arg(long)]
    pub strict: bool,
}

/// Unresolved variables plus the options to resolve them with.
#[derive(Debug)]
pub struct Prepared {
    pub variables: Variables,
    pub options: ResolverOptions,
}

impl VariableArgs {
    /// Load the configuration and every variable source.
    ///
    /// Precedence, lowest first: configuration `include`, `ZENFIG_VARS_PATH`,
    /// then `-I/--include`.
    pub async fn prepare(&self, config: &CliConfig) -> Result<Prepared> {
        let global = GlobalConfig::load_with_optional(config.config_path.clone()).await?;

        let mut sources = global.include_sources();
        sources.extend(variables::search_path_from_env()?);
        sources.extend(self.include.iter().cloned());
        tracing::debug!("Variable sources: {sources:?}");

        let variables = variables::load_variables(&sources).await?;
        tracing::info!("Loaded {} variable(s) from {} source(s)", variables.len(), sources.len());

        Ok(Prepared {
            variables,
            options: global.resolver_options(self.strict),
        })
    }
}
