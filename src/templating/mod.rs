//! Tera-backed rendering for variable values and output templates.
//!
//! Two kinds of rendering happen here:
//!
//! - **Value rendering** ([`Renderer::render`]): turns one variable's raw value
//!   into its resolved value, given its dependencies' resolved values. This is
//!   what the resolver calls for every node.
//! - **Template rendering** ([`Renderer::render_template`]): renders an output
//!   document once every variable is resolved.
//!
//! Both use the same explicit [`Registry`] of filters and functions; there is
//! no global engine state.
//!
//! # Expression syntax
//!
//! ```yaml
//! font_size: 11
//! accent: "1A1A1A"
//! accent_hex: "{{ @accent|norm_hex }}"      # "#1a1a1a"
//! bigger: "{{ @font_size * 2 }}"            # 22 (integer)
//! title: "Size {{ @font_size }}pt"          # "Size 11pt"
//! ```
//!
//! Inside an output template, variables are plain Tera variables:
//!
//! ```text
//! font = "{{ font_size }}"
//! accent = "{{ accent_hex | upper }}"
//! home = "{{ env.HOME }}"
//! ```

pub mod error;
pub mod filters;
pub mod renderer;

pub use error::{RenderError, format_tera_error};
pub use filters::{FilterFn, FunctionFn, Registry};
pub use renderer::{Rendered, Renderer};
