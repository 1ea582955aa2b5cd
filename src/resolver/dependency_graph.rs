//! Dependency graph construction and evaluation.
//!
//! Every variable becomes a [`Node`] stored in a petgraph arena; an edge
//! `a → b` means `a` references `b`. The storage is flat, so the logical graph
//! may contain cycles without any ownership cycle. Those are caught during
//! evaluation by tracking the active path.
//!
//! Evaluation is a depth-first walk: a node first evaluates its dependencies
//! (in the order they were discovered), then renders its own value from theirs.
//! Results are memoized on the node, so each variable renders at most once no
//! matter how many dependents reach it.

use std::collections::HashMap;

use petgraph::graph::{DiGraph, NodeIndex};
use strsim::levenshtein;

use super::error::{Diagnostic, ResolveError};
use super::node::Node;
use crate::models::{Value, Variables};
use crate::templating::{Registry, Rendered, Renderer};

/// Maximum edit distance for "did you mean" suggestions, as a percentage of the
/// unknown name's length.
const SIMILARITY_THRESHOLD_PERCENT: usize = 50;

/// What to do when a reference names no variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingReferencePolicy {
    /// Insert an undefined stand-in, record a diagnostic and keep going.
    /// Undefined values render as empty text.
    #[default]
    Stub,
    /// Fail [`DependencyGraph::build`] on the first undefined reference.
    Strict,
}

/// Options for building a [`DependencyGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ResolverOptions {
    pub missing_references: MissingReferencePolicy,
}

impl ResolverOptions {
    pub fn strict() -> Self {
        Self {
            missing_references: MissingReferencePolicy::Strict,
        }
    }
}

/// All variables of one resolution run.
pub struct DependencyGraph {
    /// Node arena; edges point from a dependent to its dependency.
    graph: DiGraph<Node, ()>,
    /// Variable key to arena index.
    node_map: HashMap<String, NodeIndex>,
    renderer: Renderer,
    diagnostics: Vec<Diagnostic>,
}

impl DependencyGraph {
    /// Build a graph from the initial variables.
    ///
    /// All nodes are created first and edges are linked afterwards, so
    /// references may point forwards or backwards in the input. References to
    /// unknown keys are handled according to `options`.
    pub fn build(
        initial: Variables,
        registry: Registry,
        options: ResolverOptions,
    ) -> Result<Self, ResolveError> {
        let mut this = Self {
            graph: DiGraph::new(),
            node_map: HashMap::new(),
            renderer: Renderer::new(registry),
            diagnostics: Vec::new(),
        };

        for (key, value) in initial {
            let index = this.graph.add_node(Node::new(key.clone(), value));
            this.node_map.insert(key, index);
        }

        this.link(options)?;
        tracing::debug!(
            "Built dependency graph with {} node(s) and {} edge(s)",
            this.node_count(),
            this.edge_count()
        );
        Ok(this)
    }

    fn link(&mut self, options: ResolverOptions) -> Result<(), ResolveError> {
        let defined: Vec<NodeIndex> = self.graph.node_indices().collect();

        for from in defined {
            let dependencies = self.graph[from].dependencies().to_vec();
            for dependency in dependencies {
                let to = match self.node_map.get(&dependency) {
                    Some(&index) => {
                        if self.graph[index].is_stub() {
                            self.record_undefined(&dependency, from);
                        }
                        index
                    }
                    None => self.insert_missing(&dependency, from, options)?,
                };

                if !self.graph.contains_edge(from, to) {
                    self.graph.add_edge(from, to, ());
                }
            }
        }

        Ok(())
    }

    fn insert_missing(
        &mut self,
        variable: &str,
        from: NodeIndex,
        options: ResolverOptions,
    ) -> Result<NodeIndex, ResolveError> {
        match options.missing_references {
            MissingReferencePolicy::Strict => Err(ResolveError::UndefinedReference {
                variable: variable.to_string(),
                referenced_by: self.graph[from].key().to_string(),
            }),
            MissingReferencePolicy::Stub => {
                self.record_undefined(variable, from);
                let index = self.graph.add_node(Node::stub(variable));
                self.node_map.insert(variable.to_string(), index);
                Ok(index)
            }
        }
    }

    fn record_undefined(&mut self, variable: &str, from: NodeIndex) {
        let diagnostic = Diagnostic::UndefinedReference {
            variable: variable.to_string(),
            referenced_by: self.graph[from].key().to_string(),
            suggestions: self.similar_keys(variable),
        };
        tracing::warn!("{diagnostic}");
        self.diagnostics.push(diagnostic);
    }

    /// Defined keys within editing distance of `target`, closest first.
    fn similar_keys(&self, target: &str) -> Vec<String> {
        let mut scored: Vec<_> = self
            .graph
            .node_weights()
            .filter(|node| !node.is_stub())
            .map(|node| (node.key().to_string(), levenshtein(target, node.key())))
            .collect();

        scored.sort_by(|(a_key, a_dist), (b_key, b_dist)| {
            a_dist.cmp(b_dist).then_with(|| a_key.cmp(b_key))
        });

        scored
            .into_iter()
            .filter(|(_, dist)| *dist <= target.len() * SIMILARITY_THRESHOLD_PERCENT / 100)
            .take(3)
            .map(|(key, _)| key)
            .collect()
    }

    /// Evaluate every variable and return the resolved mapping.
    ///
    /// Roots are visited in key order, so a cycle is always reported starting
    /// from the same key. The output holds exactly the input keys; stubs are
    /// left out. A cycle aborts the whole run.
    pub fn evaluate(&mut self) -> Result<Variables, ResolveError> {
        let mut roots: Vec<(String, NodeIndex)> = self
            .graph
            .node_indices()
            .filter(|&index| !self.graph[index].is_stub())
            .map(|index| (self.graph[index].key().to_string(), index))
            .collect();
        roots.sort();

        let mut resolved = Variables::new();
        for (key, index) in roots {
            let mut path = Vec::new();
            let value = self.evaluate_node(index, &mut path)?;
            resolved.insert(key, value);
        }

        Ok(resolved)
    }

    /// Evaluate one node, recursing into its dependencies first.
    ///
    /// `path` is the chain of keys currently being evaluated, outermost first.
    fn evaluate_node(
        &mut self,
        index: NodeIndex,
        path: &mut Vec<String>,
    ) -> Result<Value, ResolveError> {
        let key = self.graph[index].key().to_string();

        if let Some(start) = path.iter().position(|visited| *visited == key) {
            let mut chain = path[start..].to_vec();
            chain.push(key);
            return Err(ResolveError::CircularDependency { chain });
        }

        if let Some(value) = self.graph[index].resolved() {
            return Ok(value.clone());
        }

        tracing::debug!("Evaluating '{key}'");
        self.graph[index].begin();
        path.push(key.clone());

        let mut dependencies = Variables::new();
        for dependency in self.graph[index].dependencies().to_vec() {
            // Every dependency is linked at build time, either to a node or a stub
            let Some(&dep_index) = self.node_map.get(&dependency) else {
                continue;
            };
            let value = self.evaluate_node(dep_index, path)?;
            dependencies.insert(dependency, value);
        }

        path.pop();

        let Rendered { value, errors } =
            self.renderer.render(self.graph[index].value(), &dependencies);
        for error in errors {
            let diagnostic = Diagnostic::RenderFailed {
                key: key.clone(),
                error,
            };
            tracing::warn!("{diagnostic}");
            self.diagnostics.push(diagnostic);
        }

        self.graph[index].settle(value.clone());
        Ok(value)
    }

    /// Diagnostics recorded so far, in the order they occurred.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn node(&self, key: &str) -> Option<&Node> {
        self.node_map.get(key).map(|&index| &self.graph[index])
    }

    /// Keys a variable references directly, in discovery order.
    pub fn direct_dependencies(&self, key: &str) -> Vec<String> {
        self.node(key).map(|node| node.dependencies().to_vec()).unwrap_or_default()
    }

    /// Number of nodes, stubs included.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Defined variable keys in sorted order.
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self
            .graph
            .node_weights()
            .filter(|node| !node.is_stub())
            .map(Node::key)
            .collect();
        keys.sort_unstable();
        keys
    }

    /// Human-readable dependency tree rooted at `key`.
    ///
    /// A node that reappears on its own branch is printed once more and marked
    /// as a circular reference instead of being expanded again.
    pub fn to_tree_string(&self, key: &str) -> Option<String> {
        let root = *self.node_map.get(key)?;
        let mut result = String::new();
        let mut branch = Vec::new();
        self.build_tree_string(root, &mut result, "", true, &mut branch);
        Some(result)
    }

    fn build_tree_string(
        &self,
        index: NodeIndex,
        result: &mut String,
        prefix: &str,
        is_last: bool,
        branch: &mut Vec<NodeIndex>,
    ) {
        let connector = if is_last {
            "└── "
        } else {
            "├── "
        };
        result.push_str(&format!("{}{}{}\n", prefix, connector, self.graph[index]));

        let child_prefix = if is_last {
            format!("{prefix}    ")
        } else {
            format!("{prefix}│   ")
        };

        if branch.contains(&index) {
            result.push_str(&format!("{child_prefix}└── (circular reference)\n"));
            return;
        }

        branch.push(index);
        let deps: Vec<NodeIndex> = self.graph[index]
            .dependencies()
            .iter()
            .filter_map(|dep| self.node_map.get(dep).copied())
            .collect();
        for (i, dep) in deps.iter().enumerate() {
            let is_last_child = i == deps.len() - 1;
            self.build_tree_string(*dep, result, &child_prefix, is_last_child, branch);
        }
        branch.pop();
    }
}
