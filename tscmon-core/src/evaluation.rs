//! Evaluation of a specification tree against a single tick.
//!
//! Every edge of a bounded node is decided using its condition and, if present, its inverse
//! condition:
//!
//! | condition | inverse condition | edge                     |
//! | --------- | ----------------- | ------------------------ |
//! | true      | true              | error                    |
//! | true      | false or absent   | taken                    |
//! | false     | false             | taken, marked as unknown |
//! | false     | true or absent    | not taken                |
//!
//! Destinations of taken edges are evaluated recursively. The resulting instance may violate the
//! bounds of the tree, which can be checked afterward using
//! [`TscInstance::is_valid`](crate::instance::TscInstance::is_valid).
use std::collections::BTreeMap;

use log::trace;
use thiserror::Error;

use crate::instance::{NodeValue, TscInstance, TscInstanceEdge, TscInstanceNode};
use crate::operators::OperatorError;
use crate::sequence::{Tick, TickUnit};
use crate::tree::{Tsc, TscNode};

/// Error produced while evaluating a tree.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvaluationError {
    #[error("Condition and inverse condition of edge {edge} of node {node} both hold at tick {unit}")]
    ContradictoryGuards { node: String, edge: String, unit: String },

    #[error("Predicate of node {node} failed at tick {unit}")]
    Predicate {
        node: String,
        unit: String,
        #[source]
        source: OperatorError,
    },
}

fn predicate_error<U>(node: &str, unit: U, source: OperatorError) -> EvaluationError
where
    U: TickUnit,
{
    EvaluationError::Predicate {
        node: node.to_owned(),
        unit: format!("{:?}", unit),
        source,
    }
}

/// Evaluate the tree rooted at `node` against `tick`.
///
/// The `depth` of the node is only used for diagnostics.
pub fn evaluate<U, E>(node: &TscNode<U, E>, tick: Tick<'_, U, E>, depth: usize) -> Result<TscInstanceNode, EvaluationError>
where
    U: TickUnit,
{
    let mut monitor_results = BTreeMap::new();

    for (name, monitor) in node.monitors() {
        let result = monitor(tick).map_err(|error| predicate_error(node.label(), tick.unit(), error))?;
        monitor_results.insert(name.to_owned(), result);
    }

    let value = node
        .value_function()
        .map_or(NodeValue::None, |value| value(tick));

    let mut edges = Vec::new();

    for edge in node.edges() {
        let guard = (edge.condition())(tick).map_err(|error| predicate_error(node.label(), tick.unit(), error))?;
        let inverse = edge
            .inverse_condition()
            .map(|inverse| inverse(tick))
            .transpose()
            .map_err(|error| predicate_error(node.label(), tick.unit(), error))?;

        trace!(
            "{:indent$}{} -> {}: condition {}, inverse {:?}",
            "",
            node.label(),
            edge.label(),
            guard,
            inverse,
            indent = depth * 2
        );

        let unknown = match (guard, inverse) {
            (true, Some(true)) => {
                return Err(EvaluationError::ContradictoryGuards {
                    node: node.label().to_owned(),
                    edge: edge.label().to_owned(),
                    unit: format!("{:?}", tick.unit()),
                })
            }
            (true, _) => false,
            (false, Some(false)) => true,
            (false, _) => continue,
        };

        let destination = evaluate(edge.destination(), tick, depth + 1)?;
        edges.push(TscInstanceEdge::new(edge.label(), destination, unknown));
    }

    Ok(TscInstanceNode::new(
        node.label(),
        node.bounds(),
        monitor_results,
        value,
        edges,
    ))
}

impl<U, E> Tsc<U, E>
where
    U: TickUnit,
{
    /// Evaluate the tree against `tick`, producing an instance that records the identifier of the
    /// tree, the source of the sequence, and the unit of the tick.
    ///
    /// ```rust
    /// use tscmon::sequence::TickSequence;
    /// use tscmon::tree::{Tsc, TscEdge, TscNode};
    ///
    /// let root = TscNode::optional("root", vec![
    ///     TscEdge::new(TscNode::leaf("crowded")).with_condition(|tick| tick.entities().len() > 2),
    ///     TscEdge::new(TscNode::leaf("empty"))
    ///         .with_condition(|tick| tick.entities().len() == 1)
    ///         .with_inverse_condition(|tick| tick.entities().len() > 1),
    /// ]).unwrap();
    ///
    /// let tree: Tsc<i64, u64> = Tsc::new("traffic", root).unwrap();
    /// let sequence = TickSequence::new("recording", 1, [(0i64, vec![1u64, 2])]).unwrap();
    /// let instance = tree.evaluate(sequence.first()).unwrap();
    ///
    /// assert!(instance.root().is_leaf());
    /// assert!(instance.is_valid());
    /// ```
    pub fn evaluate(&self, tick: Tick<'_, U, E>) -> Result<TscInstance<U>, EvaluationError> {
        let root = evaluate(self.root(), tick, 0)?;

        Ok(TscInstance::new(
            self.identifier(),
            tick.sequence().source(),
            tick.unit(),
            root,
        ))
    }
}
