//! zenfig - dependency-aware configuration variables
//!
//! zenfig resolves a set of named variables whose values may reference each
//! other, then renders output templates with the fully resolved values.
//!
//! ```yaml
//! # vars/theme.yaml
//! base: "1a1a1a"
//! accent: "{{ @base|norm_hex }}"       # "#1a1a1a"
//! font_size: 11
//! title_size: "{{ @font_size + 2 }}"   # 13 (stays an integer)
//! banner: "size {{ @title_size }}pt"   # "size 13pt"
//! ```
//!
//! # Architecture Overview
//!
//! - A [`resolver::scanner`] finds the `@name` references inside each value's
//!   `{{ ... }}` expressions.
//! - A [`resolver::DependencyGraph`] holds one node per variable and evaluates
//!   them depth-first with memoization, reporting reference cycles with the full
//!   chain (`a ~> b ~> a`).
//! - A [`templating::Renderer`] substitutes resolved values into expressions and
//!   lets Tera evaluate them, using an explicit [`templating::Registry`] of
//!   filters such as `norm_hex`.
//!
//! # Core Modules
//!
//! - [`models`] - the [`models::Value`] variant carried by every variable
//! - [`resolver`] - reference scanning, the dependency graph and evaluation
//! - [`templating`] - value and template rendering, filters
//! - [`variables`] - loading variables from YAML files and directories
//! - [`config`] - the global configuration file
//! - [`core`] - application errors and user-facing error reporting
//! - [`cli`] - the `zenfig` command line
//! - [`utils`] - file system and path helpers

pub mod cli;
pub mod config;
pub mod core;
pub mod models;
pub mod resolver;
pub mod templating;
pub mod utils;
pub mod variables;

// test_utils module is available for both unit tests and integration tests
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
