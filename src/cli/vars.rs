//! `zenfig vars`: print resolved variables or their dependency trees.

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};

use super::CliConfig;
use super::common::VariableArgs;
use crate::core::ZenfigError;
use crate::models::Variables;
use crate::resolver::DependencyGraph;
use crate::templating::Registry;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Yaml,
    Json,
}

/// Print the resolved variables.
#[derive(Args, Debug)]
pub struct VarsCommand {
    #[command(flatten)]
    pub vars: VariableArgs,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Yaml)]
    pub format: OutputFormat,

    /// Show the dependency tree of every variable instead of its value
    #[arg(long)]
    pub tree: bool,
}

impl VarsCommand {
    pub async fn execute(self, config: &CliConfig) -> Result<()> {
        let prepared = self.vars.prepare(config).await?;
        let mut graph =
            DependencyGraph::build(prepared.variables, Registry::with_builtins(), prepared.options)
                .map_err(ZenfigError::from)?;

        if self.tree {
            for key in graph.keys() {
                if let Some(tree) = graph.to_tree_string(key) {
                    print!("{tree}");
                }
            }
            return Ok(());
        }

        let resolved = graph.evaluate().map_err(ZenfigError::from)?;
        print!("{}", format_variables(&resolved, self.format)?);
        Ok(())
    }
}

fn format_variables(vars: &Variables, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Yaml => {
            if vars.is_empty() {
                return Ok(String::new());
            }
            serde_yaml::to_string(vars).context("Failed to serialize variables as YAML")
        }
        OutputFormat::Json => {
            let mut json = serde_json::to_string_pretty(vars)
                .context("Failed to serialize variables as JSON")?;
            json.push('\n');
            Ok(json)
        }
    }
}
