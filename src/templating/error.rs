//! Render errors.
//!
//! Rendering failures are local: the graph records them as diagnostics and keeps
//! the offending value as its unresolved literal, so one bad expression never
//! stops the rest of the configuration from resolving.

use thiserror::Error;

/// Name Tera gives to templates rendered through `render_str`.
const ONE_OFF_TEMPLATE: &str = "__tera_one_off";

#[derive(Debug, Clone, Error, PartialEq)]
pub enum RenderError {
    /// The expression names a filter that is not in the registry.
    #[error("Unknown filter '{name}'")]
    UnknownFilter { name: String },

    /// The expression names a function that is not in the registry.
    #[error("Unknown function '{name}'")]
    UnknownFunction { name: String },

    /// A filter or function was found but failed on its input.
    #[error("'{name}' failed: {message}")]
    FilterFailed { name: String, message: String },

    /// A reference token had no resolved value to substitute.
    #[error("Reference '@{name}' has no resolved value")]
    UnresolvedReference { name: String },

    /// The engine produced something that could not be read back as a value.
    #[error("Could not read rendered value: {message}")]
    InvalidOutput { message: String },

    /// Any other template engine failure (syntax errors, unknown variables, ...).
    #[error("Template error: {message}")]
    Engine { message: String },
}

impl RenderError {
    /// Classify a Tera error by walking its source chain.
    pub(crate) fn from_tera(error: &tera::Error) -> Self {
        use std::error::Error as _;

        let mut current: Option<&(dyn std::error::Error + 'static)> = Some(error);
        while let Some(err) = current {
            if let Some(tera_err) = err.downcast_ref::<tera::Error>() {
                match &tera_err.kind {
                    tera::ErrorKind::FilterNotFound(name) => {
                        return RenderError::UnknownFilter { name: name.clone() };
                    }
                    tera::ErrorKind::FunctionNotFound(name) => {
                        return RenderError::UnknownFunction { name: name.clone() };
                    }
                    tera::ErrorKind::CallFilter(name) | tera::ErrorKind::CallFunction(name) => {
                        let message = tera_err
                            .source()
                            .map(|cause| cause.to_string())
                            .unwrap_or_else(|| tera_err.to_string());
                        return RenderError::FilterFailed { name: name.clone(), message };
                    }
                    _ => {}
                }
            }
            current = err.source();
        }

        RenderError::Engine { message: format_tera_error(error) }
    }
}

/// Flatten a Tera error chain into one readable line.
///
/// Tera wraps the real cause in "Failed to render '__tera_one_off'" layers; those
/// are dropped and the internal template name is never shown.
pub fn format_tera_error(error: &tera::Error) -> String {
    use std::error::Error;

    let mut all_messages = vec![error.to_string()];
    let mut current_error: Option<&dyn Error> = error.source();
    while let Some(err) = current_error {
        all_messages.push(err.to_string());
        current_error = err.source();
    }

    let messages: Vec<String> = all_messages
        .into_iter()
        .map(|msg| {
            msg.replace(&format!("while rendering '{ONE_OFF_TEMPLATE}'"), "")
                .replace(&format!("Failed to render '{ONE_OFF_TEMPLATE}'"), "")
                .replace(&format!("Failed to parse '{ONE_OFF_TEMPLATE}'"), "")
                .replace(&format!("'{ONE_OFF_TEMPLATE}'"), "template")
                .trim()
                .to_string()
        })
        .filter(|msg| !msg.is_empty())
        .collect();

    if messages.is_empty() {
        "template could not be rendered".to_string()
    } else {
        messages.join(" -> ")
    }
}
