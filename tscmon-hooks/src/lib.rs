//! Hooks controlling the evaluation of specification trees over tick sequences.
//!
//! Hooks are attached to one of three granularities: trees, sequences, and ticks. Every hook
//! inspects a unit of its granularity and returns a [`HookResult`]. The results of all hooks of a
//! granularity are combined into the most severe one, which decides whether the unit is evaluated
//! ([`HookResult::Ok`]), ignored ([`HookResult::Skip`]), or whether the whole evaluation stops
//! gracefully ([`HookResult::Cancel`]) or with an error ([`HookResult::Abort`]).
//!
//! The [`Evaluation`] runner applies the hooks while evaluating every tree against every tick, and
//! passes the resulting instances to the registered [`InstanceConsumer`]s.

mod hook;
mod runner;

pub use crate::hook::{
    combine, evaluate_hooks, filter_trees, AbortError, Hook, HookResult, SequenceHook, TickHook, TreeHook, Verdict,
};
pub use crate::runner::{Evaluation, EvaluationSummary, InstanceConsumer, Outcome, RunError};
