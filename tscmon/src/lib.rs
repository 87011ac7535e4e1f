//! Evaluation of recorded traffic against [Traffic Sequence Charts].
//!
//! A Traffic Sequence Chart describes the behaviors a system may exhibit as a tree of alternatives.
//! Every node of the tree either describes a single behavior (a leaf), or bounds how many of its
//! guarded children an observation may take. As an example, a highway scenario could require the
//! ego vehicle to drive in exactly one of several lanes while any combination of braking and
//! overtaking maneuvers is permitted:
//!
//! ```text
//! scenario (all)
//! ├── lane (exactly one)
//! │   ├── left
//! │   └── right
//! └── events (any subset)
//!     ├── braking
//!     └── overtaking
//! ```
//!
//! Recordings of a system are provided as [`TickSequence`]s, which are ordered lists of
//! timestamped world states called ticks. Evaluating a [`Tsc`] against a tick produces a
//! [`TscInstance`], which records which branches of the tree were taken at that tick. Because the
//! tree also knows every instance it admits, comparing the observed instances with the possible
//! ones answers the coverage question _did we observe every legal combination of behaviors?_
//!
//! [Traffic Sequence Charts]: https://link.springer.com/chapter/10.1007/978-3-030-03424-5_9
//!
//! # Examples
//!
//! Edge conditions are predicates over a [`Tick`], usually built from the temporal [`operators`].
//!
//! ```rust
//! use tscmon::{Tsc, TscEdge, TscNode, TickSequence};
//! use tscmon::interval::Interval;
//! use tscmon::operators::eventually;
//!
//! fn crowded(tick: tscmon::Tick<'_, i64, u64>) -> bool {
//!     tick.entities().len() > 2
//! }
//!
//! let root = TscNode::optional("traffic", vec![
//!     TscEdge::new(TscNode::leaf("dense"))
//!         .with_condition(|tick| eventually(tick, Interval::closed(0, 2).ok(), crowded)),
//!     TscEdge::new(TscNode::leaf("alone"))
//!         .with_condition(|tick| tick.entities().len() == 1),
//! ]).unwrap();
//!
//! let tree = Tsc::new("traffic", root).unwrap();
//!
//! let sequence = TickSequence::new("recording-01", 1, [
//!     (0i64, vec![1u64]),
//!     (1i64, vec![1u64, 2]),
//!     (2i64, vec![1u64, 2, 3]),
//! ]).unwrap();
//!
//! let instance = tree.evaluate(sequence.first()).unwrap();
//!
//! assert_eq!(instance.root().leaf_labels(), vec!["dense", "alone"]);
//! assert_eq!(tree.possible_instance_index(instance.root()), Some(3));
//! ```
//!
//! # Hooks
//!
//! With the `hooks` feature enabled, the [`hooks`] module provides an evaluation runner that
//! drives trees over many sequences and can skip, cancel, or abort evaluation at the granularity
//! of trees, sequences, and ticks.

extern crate tscmon_core as core;

#[doc(inline)]
pub use core::{EvaluationError, NodeValue, Tsc, TscEdge, TscInstance, TscInstanceNode, TscNode};

#[doc(inline)]
pub use core::sequence::{Entity, EntityId, Tick, TickSequence, TickUnit};

#[doc(inline)]
pub use core::evaluation;

#[doc(inline)]
pub use core::instance;

#[doc(inline)]
pub use core::interval;

#[doc(inline)]
pub use core::operators;

#[doc(inline)]
pub use core::sequence;

#[doc(inline)]
pub use core::tree;

#[cfg(feature = "hooks")]
#[doc(inline)]
pub use tscmon_hooks as hooks;
