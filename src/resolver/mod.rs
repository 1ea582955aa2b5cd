//! Dependency-aware variable resolution.
//!
//! Variables may reference one another inside `{{ ... }}` expressions with an
//! `@` marker. Resolution runs in three steps:
//!
//! 1. **Scan**: [`scanner`] finds the keys each raw value references.
//! 2. **Build**: [`DependencyGraph::build`] creates one [`Node`] per variable and
//!    links the edges, inserting undefined stubs for unknown keys (or failing,
//!    with [`MissingReferencePolicy::Strict`]).
//! 3. **Evaluate**: [`DependencyGraph::evaluate`] renders every node after its
//!    dependencies, memoizing results and reporting cycles with the full chain.
//!
//! # Example
//!
//! ```
//! use zenfig::models::{Value, Variables};
//! use zenfig::resolver::{ResolverOptions, resolve};
//! use zenfig::templating::Registry;
//!
//! let mut vars = Variables::new();
//! vars.insert("color".into(), Value::from("1a1a1a"));
//! vars.insert("accent".into(), Value::from("{{ @color|norm_hex }}"));
//!
//! let (resolved, diagnostics) =
//!     resolve(vars, Registry::with_builtins(), ResolverOptions::default())?;
//! assert_eq!(resolved["accent"], Value::from("#1a1a1a"));
//! assert!(diagnostics.is_empty());
//! # Ok::<(), zenfig::resolver::ResolveError>(())
//! ```

pub mod dependency_graph;
pub mod error;
pub mod node;
pub mod scanner;

pub use dependency_graph::{DependencyGraph, MissingReferencePolicy, ResolverOptions};
pub use error::{Diagnostic, ResolveError};
pub use node::{Node, NodeKind, NodeState};

use crate::models::Variables;
use crate::templating::Registry;

/// Build a graph from `initial`, evaluate it and return the resolved variables
/// together with every diagnostic recorded along the way.
pub fn resolve(
    initial: Variables,
    registry: Registry,
    options: ResolverOptions,
) -> Result<(Variables, Vec<Diagnostic>), ResolveError> {
    let mut graph = DependencyGraph::build(initial, registry, options)?;
    let resolved = graph.evaluate()?;
    Ok((resolved, graph.diagnostics().to_vec()))
}
