use std::borrow::Borrow;

use log::{debug, info};
use thiserror::Error;
use tscmon_core::evaluation::EvaluationError;
use tscmon_core::instance::TscInstance;
use tscmon_core::sequence::{Tick, TickSequence, TickUnit};
use tscmon_core::tree::Tsc;

use crate::hook::{evaluate_hooks, filter_trees, AbortError, Hook, HookResult, SequenceHook, TickHook, TreeHook, Verdict};

/// Receiver of the instances produced by an [`Evaluation`].
///
/// Metric providers implement this trait to collect statistics over the evaluated instances, for
/// example by comparing them with the [possible instances](Tsc::possible_instances) of a tree.
pub trait InstanceConsumer<U, E> {
    /// Called once for every instance, in the order the ticks are evaluated.
    fn consume(&mut self, tree: &Tsc<U, E>, instance: &TscInstance<U>);

    /// Called once when the evaluation completes or is cancelled, with the trees that took part in
    /// the evaluation.
    fn finish(&mut self, _trees: &[&Tsc<U, E>]) {}
}

/// Error that stops an evaluation without finalizing the consumers.
#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Abort(#[from] AbortError),

    #[error("Evaluation of tree {tree} failed on sequence {sequence}")]
    Evaluation {
        tree: String,
        sequence: String,
        #[source]
        error: EvaluationError,
    },
}

/// How an evaluation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Outcome {
    #[default]
    Completed,
    Cancelled,
}

/// Counts of the units processed by an evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EvaluationSummary {
    pub outcome: Outcome,
    pub sequences: usize,
    pub skipped_sequences: usize,
    pub ticks: usize,
    pub skipped_ticks: usize,
    pub instances: usize,
}

impl EvaluationSummary {
    fn cancelled(self) -> Self {
        Self {
            outcome: Outcome::Cancelled,
            ..self
        }
    }
}

/// Evaluation of a set of trees over tick sequences, controlled by hooks.
///
/// Every tick of every admitted sequence is evaluated against every admitted tree, and the
/// resulting instances are handed to the consumers.
///
/// ```rust
/// use tscmon::{Tsc, TscInstance, TscNode, TickSequence};
/// use tscmon::hooks::{Evaluation, HookResult, InstanceConsumer, Outcome};
///
/// #[derive(Default)]
/// struct Counter(usize);
///
/// impl InstanceConsumer<i64, u64> for Counter {
///     fn consume(&mut self, _: &Tsc<i64, u64>, _: &TscInstance<i64>) {
///         self.0 += 1;
///     }
/// }
///
/// let tree: Tsc<i64, u64> = Tsc::new("tree", TscNode::leaf("root")).unwrap();
/// let sequence = TickSequence::new("recording", 1, [(0i64, vec![1u64]), (1, vec![1])]).unwrap();
/// let mut counter = Counter::default();
///
/// let summary = Evaluation::new(vec![tree])
///     .with_tick_hook("odd", |tick| if tick.unit() % 2 == 1 { HookResult::Skip } else { HookResult::Ok })
///     .with_consumer(&mut counter)
///     .run([&sequence])
///     .unwrap();
///
/// assert_eq!(summary.outcome, Outcome::Completed);
/// assert_eq!(summary.skipped_ticks, 1);
/// assert_eq!(counter.0, 1);
/// ```
pub struct Evaluation<'c, U, E> {
    trees: Vec<Tsc<U, E>>,
    tree_hooks: Vec<TreeHook<U, E>>,
    sequence_hooks: Vec<SequenceHook<U, E>>,
    tick_hooks: Vec<TickHook<U, E>>,
    consumers: Vec<&'c mut dyn InstanceConsumer<U, E>>,
}

impl<'c, U, E> Evaluation<'c, U, E> {
    pub fn new(trees: Vec<Tsc<U, E>>) -> Self {
        Self {
            trees,
            tree_hooks: Vec::new(),
            sequence_hooks: Vec::new(),
            tick_hooks: Vec::new(),
            consumers: Vec::new(),
        }
    }

    /// Register a hook that decides which trees take part in the evaluation. Hooks are applied in
    /// registration order.
    pub fn with_tree_hook<S, F>(mut self, identifier: S, hook: F) -> Self
    where
        S: Into<String>,
        F: Fn(&Tsc<U, E>) -> HookResult + Send + Sync + 'static,
    {
        self.tree_hooks.push(Hook::tree(identifier, hook));
        self
    }

    pub fn with_sequence_hook<S, F>(mut self, identifier: S, hook: F) -> Self
    where
        S: Into<String>,
        F: Fn(&TickSequence<U, E>) -> HookResult + Send + Sync + 'static,
    {
        self.sequence_hooks.push(Hook::sequence(identifier, hook));
        self
    }

    pub fn with_tick_hook<S, F>(mut self, identifier: S, hook: F) -> Self
    where
        S: Into<String>,
        F: for<'a> Fn(Tick<'a, U, E>) -> HookResult + Send + Sync + 'static,
    {
        self.tick_hooks.push(Hook::tick(identifier, hook));
        self
    }

    pub fn with_consumer(mut self, consumer: &'c mut dyn InstanceConsumer<U, E>) -> Self {
        self.consumers.push(consumer);
        self
    }

    pub fn trees(&self) -> &[Tsc<U, E>] {
        &self.trees
    }
}

fn finish<U, E>(consumers: &mut [&mut dyn InstanceConsumer<U, E>], trees: &[&Tsc<U, E>]) {
    for consumer in consumers.iter_mut() {
        consumer.finish(trees);
    }
}

impl<'c, U, E> Evaluation<'c, U, E>
where
    U: TickUnit,
{
    /// Evaluate every sequence in order.
    ///
    /// Skipped sequences and ticks are ignored. Cancelling at any level stops the evaluation after
    /// the current unit, and the consumers are finalized as if the evaluation had completed.
    ///
    /// # Errors
    ///
    /// Fails if a hook aborts the evaluation or a tree cannot be evaluated. The consumers are not
    /// finalized in either case.
    pub fn run<I, S>(&mut self, sequences: I) -> Result<EvaluationSummary, RunError>
    where
        I: IntoIterator<Item = S>,
        S: Borrow<TickSequence<U, E>>,
    {
        let mut summary = EvaluationSummary::default();

        let Some(trees) = filter_trees(&self.tree_hooks, &self.trees)? else {
            debug!("Evaluation cancelled while selecting trees");
            finish(&mut self.consumers, &[]);
            return Ok(summary.cancelled());
        };

        'sequences: for sequence in sequences {
            let sequence: &TickSequence<U, E> = sequence.borrow();

            match evaluate_hooks(&self.sequence_hooks, |hook| hook(sequence), sequence.source())? {
                Verdict::Proceed => summary.sequences += 1,
                Verdict::Skip => {
                    summary.skipped_sequences += 1;
                    continue;
                }
                Verdict::Cancel => {
                    summary = summary.cancelled();
                    break;
                }
            }

            for tick in sequence.ticks() {
                let unit = format!("{}@{:?}", sequence.source(), tick.unit());

                match evaluate_hooks(&self.tick_hooks, |hook| hook(tick), &unit)? {
                    Verdict::Proceed => summary.ticks += 1,
                    Verdict::Skip => {
                        summary.skipped_ticks += 1;
                        continue;
                    }
                    Verdict::Cancel => {
                        summary = summary.cancelled();
                        break 'sequences;
                    }
                }

                for tree in &trees {
                    let instance = tree.evaluate(tick).map_err(|error| RunError::Evaluation {
                        tree: tree.identifier().to_owned(),
                        sequence: sequence.source().to_owned(),
                        error,
                    })?;

                    for consumer in self.consumers.iter_mut() {
                        consumer.consume(tree, &instance);
                    }

                    summary.instances += 1;
                }
            }
        }

        finish(&mut self.consumers, &trees);

        info!(
            "Evaluation {:?}: {} sequences ({} skipped), {} ticks ({} skipped), {} instances",
            summary.outcome,
            summary.sequences,
            summary.skipped_sequences,
            summary.ticks,
            summary.skipped_ticks,
            summary.instances
        );

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use tscmon_core::instance::TscInstance;
    use tscmon_core::sequence::TickSequence;
    use tscmon_core::tree::{Tsc, TscEdge, TscNode};

    use super::{Evaluation, InstanceConsumer, Outcome, RunError};
    use crate::hook::HookResult;

    type Tree = Tsc<i64, u64>;

    #[derive(Default)]
    struct Recorder {
        instances: Vec<(String, i64)>,
        finished: Option<Vec<String>>,
    }

    impl InstanceConsumer<i64, u64> for Recorder {
        fn consume(&mut self, tree: &Tree, instance: &TscInstance<i64>) {
            self.instances.push((tree.identifier().to_string(), *instance.unit()));
        }

        fn finish(&mut self, trees: &[&Tree]) {
            self.finished = Some(trees.iter().map(|tree| tree.identifier().to_string()).collect());
        }
    }

    fn trees() -> Vec<Tree> {
        vec![
            Tsc::new("first", TscNode::leaf("root")).unwrap(),
            Tsc::new("second", TscNode::leaf("root")).unwrap(),
        ]
    }

    fn sequence(source: &str, units: &[i64]) -> TickSequence<i64, u64> {
        TickSequence::new(source, 1, units.iter().map(|unit| (*unit, vec![1u64]))).unwrap()
    }

    #[test]
    fn evaluates_every_tree_at_every_tick() -> Result<(), RunError> {
        let mut recorder = Recorder::default();
        let sequences = vec![sequence("a", &[0, 1]), sequence("b", &[5])];
        let summary = Evaluation::new(trees()).with_consumer(&mut recorder).run(&sequences)?;

        assert_eq!(summary.outcome, Outcome::Completed);
        assert_eq!(summary.sequences, 2);
        assert_eq!(summary.ticks, 3);
        assert_eq!(summary.instances, 6);
        assert_eq!(recorder.instances[0], ("first".to_string(), 0));
        assert_eq!(recorder.instances[1], ("second".to_string(), 0));
        assert_eq!(recorder.instances[5], ("second".to_string(), 5));
        assert_eq!(recorder.finished, Some(vec!["first".to_string(), "second".to_string()]));

        Ok(())
    }

    #[test]
    fn skipped_units() -> Result<(), RunError> {
        let mut recorder = Recorder::default();
        let sequences = vec![sequence("skip", &[0, 1]), sequence("keep", &[0, 1, 2])];
        let summary = Evaluation::new(trees())
            .with_tree_hook("only-first", |tree| {
                if tree.identifier() == "first" {
                    HookResult::Ok
                } else {
                    HookResult::Skip
                }
            })
            .with_sequence_hook("by-source", |sequence| {
                if sequence.source() == "skip" {
                    HookResult::Skip
                } else {
                    HookResult::Ok
                }
            })
            .with_tick_hook("odd", |tick| {
                if tick.unit() % 2 == 1 {
                    HookResult::Skip
                } else {
                    HookResult::Ok
                }
            })
            .with_consumer(&mut recorder)
            .run(&sequences)?;

        assert_eq!(summary.sequences, 1);
        assert_eq!(summary.skipped_sequences, 1);
        assert_eq!(summary.ticks, 2);
        assert_eq!(summary.skipped_ticks, 1);
        assert_eq!(recorder.instances, vec![("first".to_string(), 0), ("first".to_string(), 2)]);
        assert_eq!(recorder.finished, Some(vec!["first".to_string()]));

        Ok(())
    }

    #[test]
    fn cancellation_finishes_consumers() -> Result<(), RunError> {
        let mut recorder = Recorder::default();
        let sequences = vec![sequence("a", &[0, 1, 2, 3]), sequence("b", &[0])];
        let summary = Evaluation::new(trees())
            .with_tick_hook("stop", |tick| if tick.unit() >= 2 { HookResult::Cancel } else { HookResult::Ok })
            .with_consumer(&mut recorder)
            .run(&sequences)?;

        assert_eq!(summary.outcome, Outcome::Cancelled);
        assert_eq!(summary.ticks, 2);
        assert_eq!(summary.instances, 4);
        assert!(recorder.finished.is_some());

        Ok(())
    }

    #[test]
    fn tree_cancellation() -> Result<(), RunError> {
        let mut recorder = Recorder::default();
        let sequences = vec![sequence("a", &[0])];
        let summary = Evaluation::new(trees())
            .with_tree_hook("cancel-second", |tree| {
                if tree.identifier() == "second" {
                    HookResult::Cancel
                } else {
                    HookResult::Ok
                }
            })
            .with_consumer(&mut recorder)
            .run(&sequences)?;

        assert_eq!(summary.outcome, Outcome::Cancelled);
        assert_eq!(summary.instances, 0);
        assert_eq!(recorder.finished, Some(vec![]));

        Ok(())
    }

    #[test]
    fn abort_skips_finalization() {
        let mut recorder = Recorder::default();
        let sequences = vec![sequence("a", &[0, 1])];
        let result = Evaluation::new(trees())
            .with_sequence_hook("abort", |_| HookResult::Abort)
            .with_consumer(&mut recorder)
            .run(&sequences);

        match result {
            Err(RunError::Abort(error)) => assert_eq!(error.unit(), "a"),
            other => panic!("expected an abort, got {:?}", other),
        }

        assert!(recorder.finished.is_none());
        assert!(recorder.instances.is_empty());
    }

    #[test]
    fn evaluation_errors_stop_the_run() {
        let mut recorder = Recorder::default();
        let root = TscNode::optional("root", vec![TscEdge::new(TscNode::leaf("a"))
            .with_condition(|_| true)
            .with_inverse_condition(|_| true)])
        .unwrap();
        let sequences = vec![sequence("a", &[0])];
        let result = Evaluation::new(vec![Tsc::new("broken", root).unwrap()])
            .with_consumer(&mut recorder)
            .run(&sequences);

        assert!(matches!(result, Err(RunError::Evaluation { ref tree, .. }) if tree == "broken"));
        assert!(recorder.finished.is_none());
    }
}
