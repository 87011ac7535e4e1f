//! Concrete realizations of a specification tree.
//!
//! A [`TscInstanceNode`] is a tree congruent to a subset of a [`TscNode`](crate::tree::TscNode)
//! tree. Instances are produced in two ways: by enumerating every possible instance of a tree
//! (see [`Tsc::possible_instances`](crate::tree::Tsc::possible_instances)), or by evaluating a
//! tree against a tick (see [`Tsc::evaluate`](crate::tree::Tsc::evaluate)), in which case the
//! instance is wrapped in a [`TscInstance`] that records where it came from.
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

use crate::tree::Bounds;

/// Value extracted from a tick by the value function of a node.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum NodeValue {
    #[default]
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl From<bool> for NodeValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for NodeValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for NodeValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<String> for NodeValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for NodeValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl<T> From<Option<T>> for NodeValue
where
    T: Into<NodeValue>,
{
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::None, Into::into)
    }
}

impl Display for NodeValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => write!(f, "-"),
            Self::Bool(value) => write!(f, "{}", value),
            Self::Int(value) => write!(f, "{}", value),
            Self::Float(value) => write!(f, "{}", value),
            Self::Text(value) => write!(f, "{}", value),
        }
    }
}

/// An edge of an instance tree.
#[derive(Debug, Clone, PartialEq)]
pub struct TscInstanceEdge {
    label: String,
    destination: TscInstanceNode,
    unknown: bool,
}

impl TscInstanceEdge {
    pub(crate) fn new(label: &str, destination: TscInstanceNode, unknown: bool) -> Self {
        Self {
            label: label.to_owned(),
            destination,
            unknown,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn destination(&self) -> &TscInstanceNode {
        &self.destination
    }

    /// `true` if neither the condition nor the inverse condition of the edge held when the
    /// instance was evaluated.
    pub fn is_unknown(&self) -> bool {
        self.unknown
    }
}

/// A node of an instance tree.
#[derive(Debug, Clone, PartialEq)]
pub struct TscInstanceNode {
    label: String,
    bounds: Bounds,
    monitor_results: BTreeMap<String, bool>,
    value: NodeValue,
    edges: Vec<TscInstanceEdge>,
}

impl TscInstanceNode {
    pub(crate) fn new(
        label: &str,
        bounds: Bounds,
        monitor_results: BTreeMap<String, bool>,
        value: NodeValue,
        edges: Vec<TscInstanceEdge>,
    ) -> Self {
        Self {
            label: label.to_owned(),
            bounds,
            monitor_results,
            value,
            edges,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Bounds of the specification node this instance node was produced from.
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn edges(&self) -> &[TscInstanceEdge] {
        &self.edges
    }

    pub fn is_leaf(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn value(&self) -> &NodeValue {
        &self.value
    }

    /// Results of the monitors of the node, ordered by monitor name.
    pub fn monitor_results(&self) -> &BTreeMap<String, bool> {
        &self.monitor_results
    }

    pub fn monitor(&self, name: &str) -> Option<bool> {
        self.monitor_results.get(name).copied()
    }

    /// Determine if the number of edges of every node lies within the bounds of the specification
    /// node it was produced from.
    pub fn is_valid(&self) -> bool {
        self.iter().all(|node| node.bounds.contains(node.edges.len()))
    }

    /// Determine if any edge in the tree is unknown.
    pub fn has_unknown(&self) -> bool {
        self.iter().any(|node| node.edges.iter().any(TscInstanceEdge::is_unknown))
    }

    /// Iterate over the nodes of the tree in depth-first pre-order.
    pub fn iter(&self) -> InstanceNodes<'_> {
        InstanceNodes { stack: vec![self] }
    }

    /// Labels of the leaf nodes of the tree in depth-first pre-order.
    pub fn leaf_labels(&self) -> Vec<&str> {
        self.iter()
            .filter(|node| node.is_leaf())
            .map(TscInstanceNode::label)
            .collect()
    }

    /// Determine if two instances have the same structure.
    ///
    /// Two instances match if their labels match and their edges match pairwise, in order. The
    /// monitor results, values, and unknown flags are not compared.
    pub fn matches(&self, other: &TscInstanceNode) -> bool {
        self.label == other.label
            && self.edges.len() == other.edges.len()
            && self
                .edges
                .iter()
                .zip(&other.edges)
                .all(|(left, right)| left.label == right.label && left.destination.matches(&right.destination))
    }

    fn render(&self, f: &mut Formatter<'_>, depth: usize) -> std::fmt::Result {
        for edge in &self.edges {
            let marker = if edge.unknown { " [?]" } else { "" };
            write!(f, "\n{:indent$}{}{}", "", edge.label, marker, indent = depth * 2)?;

            if edge.label != edge.destination.label {
                write!(f, " -> {}", edge.destination.label)?;
            }

            edge.destination.render(f, depth + 1)?;
        }

        Ok(())
    }
}

/// Renders the tree with one edge per line, indented by depth. Unknown edges are marked `[?]`.
impl Display for TscInstanceNode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label)?;
        self.render(f, 1)
    }
}

/// Depth-first pre-order iterator over the nodes of an instance tree.
pub struct InstanceNodes<'a> {
    stack: Vec<&'a TscInstanceNode>,
}

impl<'a> Iterator for InstanceNodes<'a> {
    type Item = &'a TscInstanceNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.edges.iter().rev().map(TscInstanceEdge::destination));

        Some(node)
    }
}

/// The result of evaluating a specification tree against a single tick.
#[derive(Debug, Clone, PartialEq)]
pub struct TscInstance<U> {
    tree: String,
    source: String,
    unit: U,
    root: TscInstanceNode,
}

impl<U> TscInstance<U> {
    pub(crate) fn new(tree: &str, source: &str, unit: U, root: TscInstanceNode) -> Self {
        Self {
            tree: tree.to_owned(),
            source: source.to_owned(),
            unit,
            root,
        }
    }

    /// Identifier of the tree that was evaluated.
    pub fn tree(&self) -> &str {
        &self.tree
    }

    /// Source of the tick sequence the evaluated tick belongs to.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn unit(&self) -> &U {
        &self.unit
    }

    pub fn root(&self) -> &TscInstanceNode {
        &self.root
    }

    pub fn into_root(self) -> TscInstanceNode {
        self.root
    }

    pub fn is_valid(&self) -> bool {
        self.root.is_valid()
    }
}
