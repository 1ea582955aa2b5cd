//! Resolution errors and non-fatal diagnostics.

use std::fmt;

use thiserror::Error;

use crate::templating::RenderError;

/// Failures that stop a resolution run.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ResolveError {
    /// A variable was reached again while it was still being evaluated.
    ///
    /// `chain` lists the keys in visitation order and ends with the repeated
    /// key, e.g. `["a", "b", "c", "a"]`.
    #[error("Circular dependency detected: {}", .chain.join(" ~> "))]
    CircularDependency { chain: Vec<String> },

    /// A reference names no variable and stubs are disabled.
    #[error("Variable '{referenced_by}' references '{variable}', which is not defined")]
    UndefinedReference {
        variable: String,
        referenced_by: String,
    },
}

/// A problem that was contained locally; the rest of the graph still resolved.
#[derive(Debug, Clone, PartialEq)]
pub enum Diagnostic {
    /// A reference named no variable and was replaced by an undefined stub.
    UndefinedReference {
        variable: String,
        referenced_by: String,
        /// Defined keys close to `variable`, closest first.
        suggestions: Vec<String>,
    },
    /// Rendering failed; the variable kept its unresolved raw value.
    RenderFailed { key: String, error: RenderError },
}

impl Diagnostic {
    /// The variable this diagnostic is attached to.
    pub fn key(&self) -> &str {
        match self {
            Diagnostic::UndefinedReference { referenced_by, .. } => referenced_by,
            Diagnostic::RenderFailed { key, .. } => key,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::UndefinedReference {
                variable,
                referenced_by,
                suggestions,
            } => {
                write!(f, "'{referenced_by}' references undefined variable '{variable}'")?;
                if !suggestions.is_empty() {
                    write!(f, " (did you mean {}?)", suggestions.join(", "))?;
                }
                Ok(())
            }
            Diagnostic::RenderFailed { key, error } => {
                write!(f, "'{key}' could not be rendered: {error}")
            }
        }
    }
}
