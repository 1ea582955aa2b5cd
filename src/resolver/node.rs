//! The evaluation unit for one named variable.

use std::fmt;

use super::scanner;
use crate::models::Value;

/// Where a node is in its evaluation.
///
/// ```text
/// Unevaluated ──► Evaluating ──► Evaluated
///                     │
///                     └── cycle detected: stays Evaluating, value undefined
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeState {
    Unevaluated,
    Evaluating,
    Evaluated,
}

/// Whether a node came from the input or stands in for a missing variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Defined,
    /// Inserted for a reference that names no variable; its value is
    /// [`Value::Undefined`] and it never appears in the resolved output.
    Stub,
}

/// One variable in a [`DependencyGraph`](super::DependencyGraph).
///
/// The value starts as the raw input and is replaced in place by the rendered
/// value when the node settles. Dependencies are discovered once, at
/// construction, and kept in first-appearance order.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    key: String,
    value: Value,
    dependencies: Vec<String>,
    state: NodeState,
    kind: NodeKind,
}

impl Node {
    pub fn new(key: impl Into<String>, value: Value) -> Self {
        let dependencies = scanner::scan(&value);
        Self {
            key: key.into(),
            value,
            dependencies,
            state: NodeState::Unevaluated,
            kind: NodeKind::Defined,
        }
    }

    /// A stand-in for an undefined variable. It has nothing to render, so it
    /// starts out evaluated.
    pub fn stub(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: Value::Undefined,
            dependencies: Vec::new(),
            state: NodeState::Evaluated,
            kind: NodeKind::Stub,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Current value: raw until the node is evaluated, rendered afterwards.
    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn dependencies(&self) -> &[String] {
        &self.dependencies
    }

    pub fn state(&self) -> NodeState {
        self.state
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn is_stub(&self) -> bool {
        self.kind == NodeKind::Stub
    }

    /// The memoized value, if this node has already been evaluated.
    pub fn resolved(&self) -> Option<&Value> {
        match self.state {
            NodeState::Evaluated => Some(&self.value),
            NodeState::Unevaluated | NodeState::Evaluating => None,
        }
    }

    /// Mark the node as on the active evaluation path.
    pub(crate) fn begin(&mut self) {
        debug_assert_ne!(self.state, NodeState::Evaluated, "node '{}' evaluated twice", self.key);
        self.state = NodeState::Evaluating;
    }

    /// Store the rendered value and finish evaluation.
    pub(crate) fn settle(&mut self, value: Value) {
        self.value = value;
        self.state = NodeState::Evaluated;
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            NodeKind::Defined => write!(f, "{}", self.key),
            NodeKind::Stub => write!(f, "{} (undefined)", self.key),
        }
    }
}
