//! Value rendering with Tera.
//!
//! [`Renderer::render`] turns a variable's raw value into its final value once
//! every variable it references has been resolved. Reference tokens inside each
//! `{{ ... }}` expression are replaced by engine bindings that carry the
//! referenced value, and the rewritten text is handed to Tera, so expressions
//! can use the engine's own syntax (filters, math, literals) around references.
//!
//! # Type preservation
//!
//! A string that is exactly one expression, with no surrounding text (not even
//! whitespace), takes the native type of the expression's result:
//!
//! ```yaml
//! n: 5
//! same: "{{ @n }}"            # integer 5
//! next: "{{ @n + 1 }}"        # integer 6
//! label: "n is {{ @n }}"      # string "n is 5"
//! ```
//!
//! Anything else renders to a string.

use std::collections::HashMap;

use tera::Context as TeraContext;

use super::error::RenderError;
use super::filters::Registry;
use crate::models::{Value, Variables};
use crate::resolver::scanner;

/// Prefix of the engine variables that stand in for reference tokens.
const BINDING_PREFIX: &str = "__zenfig_ref_";

/// Engine variable holding the result of a sole expression.
const RESULT_BINDING: &str = "__zenfig_result";

/// Outcome of rendering one value.
///
/// Render failures never abort: the failing string keeps its raw text and the
/// error is returned alongside so the caller can report it.
#[derive(Debug, Clone, PartialEq)]
pub struct Rendered {
    pub value: Value,
    pub errors: Vec<RenderError>,
}

/// Renders variable values and output templates against a [`Registry`].
#[derive(Debug, Clone, Default)]
pub struct Renderer {
    registry: Registry,
}

impl Renderer {
    pub fn new(registry: Registry) -> Self {
        Self { registry }
    }

    /// Render `raw` using the already-resolved values of its dependencies.
    ///
    /// Scalars other than strings pass through unchanged. Sequences and mappings
    /// are rendered element by element, keeping their shape; mapping keys are
    /// left untouched.
    pub fn render(&self, raw: &Value, resolved: &Variables) -> Rendered {
        let mut errors = Vec::new();
        let value = self.render_value(raw, resolved, &mut errors);
        Rendered { value, errors }
    }

    fn render_value(
        &self,
        raw: &Value,
        resolved: &Variables,
        errors: &mut Vec<RenderError>,
    ) -> Value {
        match raw {
            Value::String(text) => match self.render_str(text, resolved) {
                Ok(value) => value,
                Err(err) => {
                    errors.push(err);
                    raw.clone()
                }
            },
            Value::Sequence(items) => Value::Sequence(
                items.iter().map(|item| self.render_value(item, resolved, errors)).collect(),
            ),
            Value::Mapping(map) => Value::Mapping(
                map.iter()
                    .map(|(key, item)| (key.clone(), self.render_value(item, resolved, errors)))
                    .collect(),
            ),
            Value::Undefined
            | Value::Null
            | Value::Bool(_)
            | Value::Integer(_)
            | Value::Float(_) => raw.clone(),
        }
    }

    /// Render a single string value.
    ///
    /// Strings without any `{{ ... }}` expression are returned as-is and never
    /// reach the engine.
    pub fn render_str(&self, text: &str, resolved: &Variables) -> Result<Value, RenderError> {
        let spans: Vec<_> = scanner::expressions(text).collect();
        if spans.is_empty() {
            return Ok(Value::String(text.to_string()));
        }

        let mut bindings = Bindings::default();
        let mut rewritten = String::with_capacity(text.len());
        let mut last_end = 0;
        for span in &spans {
            rewritten.push_str(&text[last_end..span.start()]);
            rewritten.push_str(&scanner::replace_references(span.as_str(), |key| {
                bindings.bind(key, resolved)
            }));
            last_end = span.end();
        }
        rewritten.push_str(&text[last_end..]);

        if let Some(name) = bindings.missing {
            return Err(RenderError::UnresolvedReference { name });
        }

        let sole_expression =
            spans.len() == 1 && spans[0].start() == 0 && spans[0].end() == text.len();
        tracing::debug!(
            "Rendering {:?} as {:?} ({})",
            text,
            rewritten,
            if sole_expression { "typed" } else { "text" }
        );

        let mut tera = self.registry.build_engine();
        if sole_expression {
            // Evaluate into a variable and read it back as JSON to keep its type
            let inner = expression_body(&rewritten);
            let template = format!(
                "{{% set {RESULT_BINDING} = {inner} %}}{{{{ {RESULT_BINDING} | json_encode() }}}}"
            );
            let json = tera
                .render_str(&template, &bindings.context)
                .map_err(|e| RenderError::from_tera(&e))?;
            let parsed: serde_json::Value = serde_json::from_str(&json)
                .map_err(|e| RenderError::InvalidOutput { message: e.to_string() })?;
            Ok(Value::from(parsed))
        } else {
            let rendered = tera
                .render_str(&rewritten, &bindings.context)
                .map_err(|e| RenderError::from_tera(&e))?;
            Ok(Value::String(rendered))
        }
    }

    /// Render an output template with the resolved variables in scope.
    ///
    /// Each variable is available under its own key, and the process environment
    /// is available as `env`.
    pub fn render_template(&self, content: &str, vars: &Variables) -> Result<String, RenderError> {
        let mut context = TeraContext::new();
        for (key, value) in vars {
            context.insert(key.as_str(), &engine_value(value));
        }
        let env: HashMap<String, String> = std::env::vars().collect();
        context.insert("env", &env);

        tracing::debug!("Rendering template with {} variable(s)", vars.len());
        self.registry
            .build_engine()
            .render_str(content, &context)
            .map_err(|e| RenderError::from_tera(&e))
    }
}

/// The text between the delimiters of a `{{ ... }}` span.
///
/// A `-` is whitespace control only when it touches a delimiter (`{{-`, `-}}`);
/// anywhere else it belongs to the expression, as in `{{ -1 }}`.
fn expression_body(span: &str) -> &str {
    let body = span.strip_prefix("{{-").or_else(|| span.strip_prefix("{{")).unwrap_or(span);
    let body = body.strip_suffix("-}}").or_else(|| body.strip_suffix("}}")).unwrap_or(body);
    body.trim()
}

/// Engine-side form of a value. Undefined references render as empty text.
fn engine_value(value: &Value) -> serde_json::Value {
    if value.is_undefined() {
        serde_json::Value::String(String::new())
    } else {
        value.to_json()
    }
}

/// Reference → engine variable assignments for one string.
#[derive(Default)]
struct Bindings {
    context: TeraContext,
    slots: HashMap<String, String>,
    missing: Option<String>,
}

impl Bindings {
    fn bind(&mut self, key: &str, resolved: &Variables) -> String {
        if let Some(slot) = self.slots.get(key) {
            return slot.clone();
        }

        let slot = format!("{BINDING_PREFIX}{}", self.slots.len());
        match resolved.get(key) {
            Some(value) => self.context.insert(slot.as_str(), &engine_value(value)),
            None => {
                self.missing.get_or_insert_with(|| key.to_string());
            }
        }
        self.slots.insert(key.to_string(), slot.clone());
        slot
    }
}
