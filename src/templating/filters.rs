//! Filter and function registry for variable expressions and output templates.
//!
//! A [`Registry`] is an explicit name → function table handed to the renderer at
//! construction time. Nothing is registered globally: two graphs built with two
//! registries never see each other's filters.
//!
//! # Built-ins
//!
//! [`Registry::with_builtins`] provides color helpers and a boolean formatter:
//!
//! | Filter       | Input                   | Output                  |
//! |--------------|-------------------------|-------------------------|
//! | `norm_hex`   | `"fff"`, `"#1A1A1A"`    | `"#ffffff"`, `"#1a1a1a"`|
//! | `hex_to_rgb` | `"#13d4a2"`             | `[19, 212, 162]`        |
//! | `rgb_to_hex` | `[255, 255, 255]`       | `"#ffffff"`             |
//! | `norm_rgb`   | `[300, -1, 12]`         | `[255, 0, 12]`          |
//! | `bool2str`   | any value               | `"true"` / `"false"`    |
//!
//! The same color helpers are available as functions for output templates:
//! `color_normalize_hex(color=...)`, `color_hex_to_rgb(color=...)` and
//! `color_rgb_to_hex(rgb=...)`.
//!
//! # Examples
//!
//! ```yaml
//! accent: "1a1a1a"
//! accent_hex: "{{ @accent|norm_hex }}"          # "#1a1a1a"
//! accent_rgb: "{{ @accent|hex_to_rgb }}"        # [26, 26, 26]
//! ```

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

use tera::{Tera, Value};

/// A filter: transforms the piped value, optionally using named arguments.
pub type FilterFn =
    Arc<dyn Fn(&Value, &HashMap<String, Value>) -> tera::Result<Value> + Send + Sync>;

/// A global function: called with named arguments only.
pub type FunctionFn = Arc<dyn Fn(&HashMap<String, Value>) -> tera::Result<Value> + Send + Sync>;

/// Named filters and functions available to the renderer.
#[derive(Clone, Default)]
pub struct Registry {
    filters: BTreeMap<String, FilterFn>,
    functions: BTreeMap<String, FunctionFn>,
}

impl Registry {
    /// An empty registry; only Tera's own built-in filters are available.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry preloaded with the color and boolean helpers.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();

        registry.register_filter("norm_hex", |value, _| {
            let color = expect_str(value, "norm_hex")?;
            Ok(Value::String(normalize_hex(color)?))
        });
        registry.register_filter("hex_to_rgb", |value, _| {
            let color = expect_str(value, "hex_to_rgb")?;
            Ok(rgb_to_value(hex_to_rgb(color)?))
        });
        registry.register_filter("rgb_to_hex", |value, _| {
            let triplet = expect_triplet(value, "rgb_to_hex")?;
            Ok(Value::String(rgb_to_hex(triplet)))
        });
        registry.register_filter("norm_rgb", |value, _| {
            let triplet = expect_triplet(value, "norm_rgb")?;
            Ok(rgb_to_value(clamp_triplet(triplet)))
        });
        registry.register_filter("bool2str", |value, _| {
            Ok(Value::String(is_truthy(value).to_string()))
        });

        registry.register_function("color_normalize_hex", |args| {
            let color = expect_str(required_arg(args, "color", "color_normalize_hex")?, "color")?;
            Ok(Value::String(normalize_hex(color)?))
        });
        registry.register_function("color_hex_to_rgb", |args| {
            let color = expect_str(required_arg(args, "color", "color_hex_to_rgb")?, "color")?;
            Ok(rgb_to_value(hex_to_rgb(color)?))
        });
        registry.register_function("color_rgb_to_hex", |args| {
            let triplet = expect_triplet(required_arg(args, "rgb", "color_rgb_to_hex")?, "rgb")?;
            Ok(Value::String(rgb_to_hex(triplet)))
        });

        registry
    }

    /// Add or replace a filter.
    pub fn register_filter<F>(&mut self, name: impl Into<String>, filter: F) -> &mut Self
    where
        F: Fn(&Value, &HashMap<String, Value>) -> tera::Result<Value> + Send + Sync + 'static,
    {
        self.filters.insert(name.into(), Arc::new(filter));
        self
    }

    /// Add or replace a global function.
    pub fn register_function<F>(&mut self, name: impl Into<String>, function: F) -> &mut Self
    where
        F: Fn(&HashMap<String, Value>) -> tera::Result<Value> + Send + Sync + 'static,
    {
        self.functions.insert(name.into(), Arc::new(function));
        self
    }

    pub fn has_filter(&self, name: &str) -> bool {
        self.filters.contains_key(name)
    }

    /// Build a fresh Tera instance with every filter and function registered.
    ///
    /// Instances are cheap (empty maps plus `Arc` clones), so each render gets its
    /// own and no engine state leaks between renders.
    pub(crate) fn build_engine(&self) -> Tera {
        let mut tera = Tera::default();
        for (name, filter) in &self.filters {
            let filter = Arc::clone(filter);
            tera.register_filter(name, move |value: &Value, args: &HashMap<String, Value>| {
                filter(value, args)
            });
        }
        for (name, function) in &self.functions {
            let function = Arc::clone(function);
            tera.register_function(name, move |args: &HashMap<String, Value>| function(args));
        }
        tera
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("filters", &self.filters.keys().collect::<Vec<_>>())
            .field("functions", &self.functions.keys().collect::<Vec<_>>())
            .finish()
    }
}

fn expect_str<'a>(value: &'a Value, what: &str) -> tera::Result<&'a str> {
    value
        .as_str()
        .ok_or_else(|| tera::Error::msg(format!("{what} expects a string, got {value}")))
}

fn required_arg<'a>(
    args: &'a HashMap<String, Value>,
    name: &str,
    function: &str,
) -> tera::Result<&'a Value> {
    args.get(name)
        .ok_or_else(|| tera::Error::msg(format!("{function} requires a `{name}` argument")))
}

fn expect_triplet(value: &Value, what: &str) -> tera::Result<[i64; 3]> {
    let invalid = || tera::Error::msg(format!("{what} expects three integers, got {value}"));
    let items = value.as_array().ok_or_else(invalid)?;
    if items.len() != 3 {
        return Err(invalid());
    }
    let mut triplet = [0i64; 3];
    for (slot, item) in triplet.iter_mut().zip(items) {
        *slot = item.as_i64().ok_or_else(invalid)?;
    }
    Ok(triplet)
}

/// Normalize a hex color to `#` plus six lowercase hex digits.
///
/// A bare digit string gets its `#` first, then 3-digit forms are expanded.
pub fn normalize_hex(color: &str) -> tera::Result<String> {
    let candidate = if !color.is_empty() && color.chars().all(|c| c.is_ascii_hexdigit()) {
        format!("#{color}")
    } else {
        color.to_string()
    };

    let digits = candidate
        .strip_prefix('#')
        .filter(|d| d.chars().all(|c| c.is_ascii_hexdigit()))
        .ok_or_else(|| tera::Error::msg(format!("'{color}' is not a valid hex color")))?;

    match digits.len() {
        3 => Ok(digits.chars().fold(String::from("#"), |mut out, c| {
            out.push(c.to_ascii_lowercase());
            out.push(c.to_ascii_lowercase());
            out
        })),
        6 => Ok(format!("#{}", digits.to_ascii_lowercase())),
        _ => Err(tera::Error::msg(format!(
            "'{color}' is not a valid hex color: expected 3 or 6 digits"
        ))),
    }
}

/// Convert a hex color into its `(r, g, b)` components.
pub fn hex_to_rgb(color: &str) -> tera::Result<[i64; 3]> {
    let normalized = normalize_hex(color)?;
    let mut rgb = [0i64; 3];
    for (i, slot) in rgb.iter_mut().enumerate() {
        let pair = &normalized[1 + i * 2..3 + i * 2];
        *slot = i64::from_str_radix(pair, 16).map_err(|e| tera::Error::msg(e.to_string()))?;
    }
    Ok(rgb)
}

/// Convert `(r, g, b)` into a normalized hex color; components are clamped to 0..=255.
pub fn rgb_to_hex(rgb: [i64; 3]) -> String {
    let [r, g, b] = clamp_triplet(rgb);
    format!("#{r:02x}{g:02x}{b:02x}")
}

fn clamp_triplet(rgb: [i64; 3]) -> [i64; 3] {
    rgb.map(|component| component.clamp(0, 255))
}

fn rgb_to_value(rgb: [i64; 3]) -> Value {
    Value::Array(rgb.iter().map(|c| Value::from(*c)).collect())
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|x| x != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}
