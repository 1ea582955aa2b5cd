//! `zenfig render`: resolve variables and render a template with them.

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

use super::CliConfig;
use super::common::VariableArgs;
use crate::core::ZenfigError;
use crate::resolver;
use crate::templating::{Registry, Renderer};
use crate::utils::fs::safe_write;

/// Render a template with the resolved variables.
///
/// Variables are available by name inside the template, the environment as
/// `env`, and every built-in filter and function can be used.
#[derive(Args, Debug)]
pub struct RenderCommand {
    /// Template file to render
    pub template: PathBuf,

    #[command(flatten)]
    pub vars: VariableArgs,

    /// Write the result to this file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

impl RenderCommand {
    pub async fn execute(self, config: &CliConfig) -> Result<()> {
        let template = tokio::fs::read_to_string(&self.template).await.map_err(|_| {
            ZenfigError::TemplateNotFound {
                path: self.template.display().to_string(),
            }
        })?;

        let prepared = self.vars.prepare(config).await?;
        let registry = Registry::with_builtins();
        let (resolved, diagnostics) =
            resolver::resolve(prepared.variables, registry.clone(), prepared.options)
                .map_err(ZenfigError::from)?;
        if !diagnostics.is_empty() {
            tracing::info!("Resolved with {} warning(s)", diagnostics.len());
        }

        let rendered = Renderer::new(registry)
            .render_template(&template, &resolved)
            .map_err(ZenfigError::from)?;

        match &self.output {
            Some(path) => {
                safe_write(path, &rendered)
                    .with_context(|| format!("Failed to write output to {}", path.display()))?;
                tracing::info!("Wrote {}", path.display());
            }
            None => print!("{rendered}"),
        }

        Ok(())
    }
}
