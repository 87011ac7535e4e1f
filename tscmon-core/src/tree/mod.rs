//! Specification trees describing the permitted combinations of behaviors.
//!
//! A Traffic Sequence Chart is represented as a [`Tsc`], which is an identified tree of
//! [`TscNode`] values. Every node is either a leaf, or a bounded node with a list of guarded
//! [`TscEdge`] values and [`Bounds`] on the number of edges an instance of the node may take.
//!
//! ```rust
//! use tscmon::tree::{Tsc, TscEdge, TscNode};
//!
//! let root = TscNode::all("scenario", vec![
//!     TscEdge::new(TscNode::exclusive("lane", vec![
//!         TscEdge::new(TscNode::leaf("left")),
//!         TscEdge::new(TscNode::leaf("right")),
//!     ]).unwrap()),
//!     TscEdge::new(TscNode::optional("events", vec![
//!         TscEdge::new(TscNode::leaf("braking")),
//!         TscEdge::new(TscNode::leaf("overtaking")),
//!     ]).unwrap()),
//! ]).unwrap();
//!
//! let tree: Tsc<i64, u64> = Tsc::new("highway", root).unwrap();
//!
//! // 2 lanes times 4 subsets of events
//! assert_eq!(tree.instance_count().to_string(), "8");
//! assert_eq!(tree.possible_instances().len(), 8);
//! ```
//!
//! # Conditions
//!
//! Edges are guarded by a condition and an optional inverse condition, and nodes can carry named
//! monitors. All of these are predicates over a [`Tick`], typically composed from the operators in
//! [`operators`](crate::operators). Predicates may be infallible (returning `bool`) or fallible
//! (returning `Result<bool, OperatorError>`), the latter being required for the prevalence
//! operators.
//!
//! # Instances
//!
//! The number of possible instances of a tree and the instances themselves are computed on first
//! access and cached for the lifetime of the tree. Counting uses arbitrary precision integers since
//! the number of instances grows exponentially with the number of edges.
pub mod combinatorics;

use std::collections::{BTreeMap, HashSet};
use std::fmt::{Debug, Formatter};
use std::sync::Arc;

use log::debug;
use num_bigint::BigUint;
use once_cell::sync::OnceCell;
use thiserror::Error;

use crate::instance::{NodeValue, TscInstanceNode};
use crate::operators::OperatorError;
use crate::sequence::Tick;

/// Shared fallible predicate over a tick, used for edge guards and node monitors.
pub type Condition<U, E> = Arc<dyn for<'a> Fn(Tick<'a, U, E>) -> Result<bool, OperatorError> + Send + Sync>;

/// Shared function extracting a [`NodeValue`] from a tick.
pub type ValueFunction<U, E> = Arc<dyn for<'a> Fn(Tick<'a, U, E>) -> NodeValue + Send + Sync>;

const ILLEGAL_IDENTIFIER_CHARACTERS: [char; 7] = ['"', '*', '<', '>', '?', '|', '\0'];

/// Error produced when constructing a malformed tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    #[error("Node {node} has lower bound {lower} greater than its upper bound {upper}")]
    InvertedBounds { node: String, lower: usize, upper: usize },

    #[error("Node {node} has upper bound {upper} but only {edges} edges")]
    UpperBoundExceedsEdges { node: String, upper: usize, edges: usize },

    #[error("Node {node} has more than one edge labeled {label}")]
    DuplicateEdgeLabel { node: String, label: String },

    #[error("Tree identifier {identifier:?} contains illegal character {character:?}")]
    IllegalIdentifier { identifier: String, character: char },
}

/// Inclusive bounds on the number of edges an instance of a node may take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Bounds {
    lower: usize,
    upper: usize,
}

impl Bounds {
    pub(crate) fn new(lower: usize, upper: usize) -> Self {
        Self { lower, upper }
    }

    /// Bounds of a leaf node, which admits no edges.
    pub fn leaf() -> Self {
        Self::new(0, 0)
    }

    pub fn lower(&self) -> usize {
        self.lower
    }

    pub fn upper(&self) -> usize {
        self.upper
    }

    /// Determine if `count` edges satisfy the bounds.
    pub fn contains(&self, count: usize) -> bool {
        self.lower <= count && count <= self.upper
    }

    /// Determine if the bounds admit every subset of `edges` edges.
    pub fn is_unconstrained(&self, edges: usize) -> bool {
        self.lower == 0 && self.upper == edges
    }
}

fn always<U, E>() -> Condition<U, E> {
    Arc::new(|_: Tick<'_, U, E>| -> Result<bool, OperatorError> { Ok(true) })
}

fn fallible<U, E, F>(predicate: F) -> Condition<U, E>
where
    U: 'static,
    E: 'static,
    F: for<'a> Fn(Tick<'a, U, E>) -> bool + Send + Sync + 'static,
{
    Arc::new(move |tick: Tick<'_, U, E>| -> Result<bool, OperatorError> { Ok(predicate(tick)) })
}

/// A guarded edge between a bounded node and one of its children.
pub struct TscEdge<U, E> {
    label: String,
    destination: TscNode<U, E>,
    condition: Condition<U, E>,
    inverse_condition: Option<Condition<U, E>>,
}

impl<U, E> Clone for TscEdge<U, E> {
    fn clone(&self) -> Self {
        Self {
            label: self.label.clone(),
            destination: self.destination.clone(),
            condition: self.condition.clone(),
            inverse_condition: self.inverse_condition.clone(),
        }
    }
}

impl<U, E> Debug for TscEdge<U, E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TscEdge")
            .field("label", &self.label)
            .field("destination", &self.destination)
            .field("inverse_condition", &self.inverse_condition.is_some())
            .finish()
    }
}

impl<U, E> TscEdge<U, E> {
    /// Create an edge to `destination` that is always taken.
    ///
    /// The label of the edge defaults to the label of the destination node.
    pub fn new(destination: TscNode<U, E>) -> Self {
        Self {
            label: destination.label.clone(),
            destination,
            condition: always(),
            inverse_condition: None,
        }
    }

    pub fn with_label<S>(self, label: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            label: label.into(),
            ..self
        }
    }

    /// Guard the edge with an infallible condition.
    pub fn with_condition<F>(self, condition: F) -> Self
    where
        U: 'static,
        E: 'static,
        F: for<'a> Fn(Tick<'a, U, E>) -> bool + Send + Sync + 'static,
    {
        Self {
            condition: fallible(condition),
            ..self
        }
    }

    /// Guard the edge with a condition that may fail, like the prevalence operators.
    pub fn try_with_condition<F>(self, condition: F) -> Self
    where
        F: for<'a> Fn(Tick<'a, U, E>) -> Result<bool, OperatorError> + Send + Sync + 'static,
    {
        Self {
            condition: Arc::new(condition),
            ..self
        }
    }

    /// Set the inverse condition of the edge, which witnesses that the edge was definitely not
    /// taken.
    pub fn with_inverse_condition<F>(self, condition: F) -> Self
    where
        U: 'static,
        E: 'static,
        F: for<'a> Fn(Tick<'a, U, E>) -> bool + Send + Sync + 'static,
    {
        Self {
            inverse_condition: Some(fallible(condition)),
            ..self
        }
    }

    pub fn try_with_inverse_condition<F>(self, condition: F) -> Self
    where
        F: for<'a> Fn(Tick<'a, U, E>) -> Result<bool, OperatorError> + Send + Sync + 'static,
    {
        Self {
            inverse_condition: Some(Arc::new(condition)),
            ..self
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn destination(&self) -> &TscNode<U, E> {
        &self.destination
    }

    pub fn condition(&self) -> &Condition<U, E> {
        &self.condition
    }

    pub fn inverse_condition(&self) -> Option<&Condition<U, E>> {
        self.inverse_condition.as_ref()
    }
}

/// The shape of a node.
pub enum NodeKind<U, E> {
    Leaf,
    Bounded { edges: Vec<TscEdge<U, E>>, bounds: Bounds },
}

impl<U, E> Clone for NodeKind<U, E> {
    fn clone(&self) -> Self {
        match self {
            Self::Leaf => Self::Leaf,
            Self::Bounded { edges, bounds } => Self::Bounded {
                edges: edges.clone(),
                bounds: *bounds,
            },
        }
    }
}

impl<U, E> Debug for NodeKind<U, E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Leaf => write!(f, "Leaf"),
            Self::Bounded { edges, bounds } => f
                .debug_struct("Bounded")
                .field("edges", edges)
                .field("bounds", bounds)
                .finish(),
        }
    }
}

/// A node of a specification tree.
pub struct TscNode<U, E> {
    label: String,
    monitors: BTreeMap<String, Condition<U, E>>,
    value: Option<ValueFunction<U, E>>,
    kind: NodeKind<U, E>,
}

impl<U, E> Clone for TscNode<U, E> {
    fn clone(&self) -> Self {
        Self {
            label: self.label.clone(),
            monitors: self.monitors.clone(),
            value: self.value.clone(),
            kind: self.kind.clone(),
        }
    }
}

impl<U, E> Debug for TscNode<U, E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TscNode")
            .field("label", &self.label)
            .field("monitors", &self.monitors.keys().collect::<Vec<_>>())
            .field("kind", &self.kind)
            .finish()
    }
}

impl<U, E> TscNode<U, E> {
    pub fn leaf<S>(label: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            label: label.into(),
            monitors: BTreeMap::new(),
            value: None,
            kind: NodeKind::Leaf,
        }
    }

    /// Create a node whose instances take between `lower` and `upper` of its edges (inclusive).
    ///
    /// # Errors
    ///
    /// Fails if `lower > upper`, if `upper` exceeds the number of edges, or if two edges share a
    /// label.
    ///
    /// ```rust
    /// use tscmon::tree::{TreeError, TscEdge, TscNode};
    ///
    /// let edges = vec![TscEdge::new(TscNode::leaf("a")), TscEdge::new(TscNode::leaf("b"))];
    /// let result = TscNode::<i64, u64>::bounded("root", (3, 2), edges);
    ///
    /// assert!(matches!(result, Err(TreeError::InvertedBounds { .. })));
    /// ```
    pub fn bounded<S>(label: S, (lower, upper): (usize, usize), edges: Vec<TscEdge<U, E>>) -> Result<Self, TreeError>
    where
        S: Into<String>,
    {
        let label = label.into();

        if lower > upper {
            return Err(TreeError::InvertedBounds {
                node: label,
                lower,
                upper,
            });
        }

        if upper > edges.len() {
            return Err(TreeError::UpperBoundExceedsEdges {
                node: label,
                upper,
                edges: edges.len(),
            });
        }

        let mut seen = HashSet::with_capacity(edges.len());

        for edge in &edges {
            if !seen.insert(edge.label.as_str()) {
                return Err(TreeError::DuplicateEdgeLabel {
                    node: label,
                    label: edge.label.clone(),
                });
            }
        }

        Ok(Self {
            label,
            monitors: BTreeMap::new(),
            value: None,
            kind: NodeKind::Bounded {
                edges,
                bounds: Bounds::new(lower, upper),
            },
        })
    }

    /// Create a node whose instances take every edge.
    pub fn all<S>(label: S, edges: Vec<TscEdge<U, E>>) -> Result<Self, TreeError>
    where
        S: Into<String>,
    {
        let count = edges.len();
        Self::bounded(label, (count, count), edges)
    }

    /// Create a node whose instances take exactly one edge.
    pub fn exclusive<S>(label: S, edges: Vec<TscEdge<U, E>>) -> Result<Self, TreeError>
    where
        S: Into<String>,
    {
        Self::bounded(label, (1, 1), edges)
    }

    /// Create a node whose instances take any subset of its edges.
    pub fn optional<S>(label: S, edges: Vec<TscEdge<U, E>>) -> Result<Self, TreeError>
    where
        S: Into<String>,
    {
        let count = edges.len();
        Self::bounded(label, (0, count), edges)
    }

    /// Attach a named monitor to the node. A monitor with the same name is replaced.
    pub fn with_monitor<S, F>(self, name: S, monitor: F) -> Self
    where
        U: 'static,
        E: 'static,
        S: Into<String>,
        F: for<'a> Fn(Tick<'a, U, E>) -> bool + Send + Sync + 'static,
    {
        self.try_with_monitor_arc(name.into(), fallible(monitor))
    }

    pub fn try_with_monitor<S, F>(self, name: S, monitor: F) -> Self
    where
        S: Into<String>,
        F: for<'a> Fn(Tick<'a, U, E>) -> Result<bool, OperatorError> + Send + Sync + 'static,
    {
        self.try_with_monitor_arc(name.into(), Arc::new(monitor))
    }

    fn try_with_monitor_arc(mut self, name: String, monitor: Condition<U, E>) -> Self {
        self.monitors.insert(name, monitor);
        self
    }

    /// Attach a function extracting a value from the tick an instance of the node is created for.
    pub fn with_value<F, V>(self, value: F) -> Self
    where
        U: 'static,
        E: 'static,
        F: for<'a> Fn(Tick<'a, U, E>) -> V + Send + Sync + 'static,
        V: Into<NodeValue>,
    {
        let value: ValueFunction<U, E> = Arc::new(move |tick: Tick<'_, U, E>| -> NodeValue { value(tick).into() });

        Self {
            value: Some(value),
            ..self
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn kind(&self) -> &NodeKind<U, E> {
        &self.kind
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, NodeKind::Leaf)
    }

    /// Edges of the node, which are empty for a leaf.
    pub fn edges(&self) -> &[TscEdge<U, E>] {
        match &self.kind {
            NodeKind::Leaf => &[],
            NodeKind::Bounded { edges, .. } => edges,
        }
    }

    pub fn bounds(&self) -> Bounds {
        match &self.kind {
            NodeKind::Leaf => Bounds::leaf(),
            NodeKind::Bounded { bounds, .. } => *bounds,
        }
    }

    /// Monitors of the node ordered by name.
    pub fn monitors(&self) -> impl Iterator<Item = (&str, &Condition<U, E>)> {
        self.monitors.iter().map(|(name, monitor)| (name.as_str(), monitor))
    }

    pub fn value_function(&self) -> Option<&ValueFunction<U, E>> {
        self.value.as_ref()
    }

    /// Iterate over this node and its descendants in depth-first pre-order.
    pub fn iter(&self) -> Nodes<'_, U, E> {
        Nodes { stack: vec![self] }
    }
}

/// Depth-first pre-order iterator over the nodes of a tree.
pub struct Nodes<'a, U, E> {
    stack: Vec<&'a TscNode<U, E>>,
}

impl<'a, U, E> Iterator for Nodes<'a, U, E> {
    type Item = &'a TscNode<U, E>;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.edges().iter().rev().map(TscEdge::destination));

        Some(node)
    }
}

/// An identified specification tree.
pub struct Tsc<U, E> {
    identifier: String,
    root: TscNode<U, E>,
    instance_count: OnceCell<BigUint>,
    possible_instances: OnceCell<Vec<TscInstanceNode>>,
}

impl<U, E> Debug for Tsc<U, E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tsc")
            .field("identifier", &self.identifier)
            .field("root", &self.root)
            .finish()
    }
}

impl<U, E> Tsc<U, E> {
    /// Create a tree from its root node.
    ///
    /// # Errors
    ///
    /// Fails if the identifier contains one of the characters `" * < > ? |` or a null character.
    pub fn new<S>(identifier: S, root: TscNode<U, E>) -> Result<Self, TreeError>
    where
        S: Into<String>,
    {
        let identifier = identifier.into();

        if let Some(character) = identifier.chars().find(|c| ILLEGAL_IDENTIFIER_CHARACTERS.contains(c)) {
            return Err(TreeError::IllegalIdentifier { identifier, character });
        }

        let tree = Self {
            identifier,
            root,
            instance_count: OnceCell::new(),
            possible_instances: OnceCell::new(),
        };

        debug!("Created tree {} with {} nodes", tree.identifier, tree.node_count());

        Ok(tree)
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn root(&self) -> &TscNode<U, E> {
        &self.root
    }

    /// Iterate over the nodes of the tree in depth-first pre-order.
    pub fn nodes(&self) -> Nodes<'_, U, E> {
        self.root.iter()
    }

    pub fn node_count(&self) -> usize {
        self.nodes().count()
    }

    /// Labels of the nodes of the tree in depth-first pre-order.
    pub fn labels(&self) -> Vec<&str> {
        self.nodes().map(TscNode::label).collect()
    }

    /// The number of valid instances of the tree, computed on first access.
    pub fn instance_count(&self) -> &BigUint {
        self.instance_count.get_or_init(|| {
            let count = combinatorics::count_all_instances(&self.root);
            debug!("Tree {} admits {} instances", self.identifier, count);
            count
        })
    }

    /// Every valid instance of the tree, generated on first access.
    ///
    /// The instances carry no monitor results and no values. The number of instances is equal to
    /// [`instance_count`](Self::instance_count), which should be checked before calling this
    /// method on large trees.
    pub fn possible_instances(&self) -> &[TscInstanceNode] {
        self.possible_instances.get_or_init(|| {
            let instances = combinatorics::generate_all_instances(&self.root);
            debug!("Generated {} instances of tree {}", instances.len(), self.identifier);
            instances
        })
    }

    /// Find the index of the possible instance that structurally matches `observed`.
    ///
    /// Returns `None` if the observed instance is not a valid instance of the tree.
    pub fn possible_instance_index(&self, observed: &TscInstanceNode) -> Option<usize> {
        self.possible_instances()
            .iter()
            .position(|instance| instance.matches(observed))
    }
}
