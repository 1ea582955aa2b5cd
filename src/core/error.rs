//! Error handling for zenfig
//!
//! Library modules return their own typed errors ([`ResolveError`],
//! [`RenderError`]); everything that touches files, configuration or the
//! command line reports a [`ZenfigError`]. Application code works with
//! `anyhow::Result` and adds context as it goes.
//!
//! At the top of the binary, [`user_friendly_error`] turns any failure into an
//! [`ErrorContext`]: the error itself plus optional details and a suggestion,
//! printed in color.
//!
//! ```rust,no_run
//! use zenfig::core::{ErrorContext, ZenfigError};
//!
//! let context = ErrorContext::new(ZenfigError::TemplateNotFound {
//!     path: "theme.tera".to_string(),
//! })
//! .with_suggestion("Check the template path");
//!
//! context.display();
//! ```

use colored::Colorize;
use std::fmt;
use thiserror::Error;

use crate::resolver::ResolveError;
use crate::templating::RenderError;

/// Errors reported by zenfig outside the resolution core.
#[derive(Error, Debug)]
pub enum ZenfigError {
    /// A variable file or directory given as a source does not exist.
    #[error("Variable source not found: {path}")]
    VariableSourceNotFound { path: String },

    /// A variable source exists but could not be read.
    #[error("Failed to read variable source {path}: {reason}")]
    VariableSourceUnreadable { path: String, reason: String },

    /// A variable file is not YAML, or its top level is not a mapping.
    #[error("Invalid variable file {path}: {reason}")]
    MalformedVariables { path: String, reason: String },

    #[error("Template not found: {path}")]
    TemplateNotFound { path: String },

    /// The global configuration file could not be read or parsed.
    #[error("Configuration error in {path}: {reason}")]
    ConfigError { path: String, reason: String },

    /// `ZENFIG_VARS_PATH` is not a valid colon-separated path list.
    #[error("Invalid search path: '{value}'")]
    InvalidSearchPath { value: String },

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Render(#[from] RenderError),

    /// Anything without a more specific variant.
    #[error("{message}")]
    Other { message: String },
}

/// A [`ZenfigError`] with optional details and a suggestion for the user.
#[derive(Debug)]
pub struct ErrorContext {
    pub error: ZenfigError,
    pub suggestion: Option<String>,
    pub details: Option<String>,
}

impl ErrorContext {
    #[must_use]
    pub const fn new(error: ZenfigError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Print the error to stderr: error in red, details in yellow, suggestion
    /// in green.
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

/// Convert any error into an [`ErrorContext`] with a suggestion where one is
/// known.
///
/// Typed errors are recovered from the `anyhow` chain first; anything else is
/// reported with its full cause chain.
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    let error = match error.downcast::<ZenfigError>() {
        Ok(zenfig_error) => return create_error_context(zenfig_error),
        Err(error) => error,
    };
    let error = match error.downcast::<ResolveError>() {
        Ok(resolve_error) => return create_error_context(ZenfigError::Resolve(resolve_error)),
        Err(error) => error,
    };
    let error = match error.downcast::<RenderError>() {
        Ok(render_error) => return create_error_context(ZenfigError::Render(render_error)),
        Err(error) => error,
    };

    if let Some(io_error) = error.downcast_ref::<std::io::Error>() {
        match io_error.kind() {
            std::io::ErrorKind::PermissionDenied => {
                return ErrorContext::new(ZenfigError::Other {
                    message: chain_message(&error),
                })
                .with_suggestion("Check the file permissions of the sources and the output path")
                .with_details("zenfig does not have permission to read or write a file");
            }
            std::io::ErrorKind::NotFound => {
                return ErrorContext::new(ZenfigError::Other {
                    message: chain_message(&error),
                })
                .with_suggestion("Check that the file or directory exists and the path is correct");
            }
            _ => {}
        }
    }

    if error.downcast_ref::<toml::de::Error>().is_some() {
        return ErrorContext::new(ZenfigError::Other {
            message: chain_message(&error),
        })
        .with_suggestion("Check the TOML syntax of the configuration file")
        .with_details("Supported keys are 'strict' (boolean) and 'include' (list of paths)");
    }

    ErrorContext::new(ZenfigError::Other {
        message: chain_message(&error),
    })
}

/// The error message followed by its numbered causes.
fn chain_message(error: &anyhow::Error) -> String {
    let mut message = error.to_string();
    let chain: Vec<String> = error.chain().skip(1).map(std::string::ToString::to_string).collect();

    if !chain.is_empty() {
        message.push_str("\n\nCaused by:");
        for (i, cause) in chain.iter().enumerate() {
            message.push_str(&format!("\n  {}: {}", i + 1, cause));
        }
    }
    message
}

fn create_error_context(error: ZenfigError) -> ErrorContext {
    let (suggestion, details) = guidance(&error);
    let mut context = ErrorContext::new(error);
    if let Some(suggestion) = suggestion {
        context = context.with_suggestion(suggestion);
    }
    if let Some(details) = details {
        context = context.with_details(details);
    }
    context
}

/// Suggestion and details for each kind of error.
fn guidance(error: &ZenfigError) -> (Option<&'static str>, Option<&'static str>) {
    match error {
        ZenfigError::VariableSourceNotFound { .. } => (
            Some("Check the -I/--include arguments, ZENFIG_VARS_PATH and the 'include' list of the configuration file"),
            None,
        ),
        ZenfigError::MalformedVariables { .. } => (
            Some("Variable files must be YAML documents with a mapping at the top level, e.g. 'accent: \"#1a1a1a\"'"),
            None,
        ),
        ZenfigError::TemplateNotFound { .. } => (Some("Check the template path"), None),
        ZenfigError::InvalidSearchPath { .. } => (
            Some("ZENFIG_VARS_PATH is a colon-separated list of paths without empty entries, e.g. '~/vars:/etc/zenfig'"),
            None,
        ),
        ZenfigError::ConfigError { .. } => (
            Some("Fix or remove the configuration file, or point ZENFIG_CONFIG at another one"),
            None,
        ),
        ZenfigError::Resolve(ResolveError::CircularDependency { .. }) => (
            Some("Break the cycle by replacing one of the references with a literal value"),
            Some("Each variable in the chain references the next one, and the last references the first"),
        ),
        ZenfigError::Resolve(ResolveError::UndefinedReference { .. }) => (
            Some("Define the variable, fix the reference, or drop --strict to render undefined variables as empty text"),
            None,
        ),
        ZenfigError::Render(_) => (
            Some("Check the template syntax: variables use {{ var }}, control flow uses {% %}"),
            Some("Resolved variables are available by name and the environment as 'env'"),
        ),
        ZenfigError::VariableSourceUnreadable { .. }
        | ZenfigError::Other { .. } => (None, None),
    }
}
