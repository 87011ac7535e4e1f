use std::fmt::{Debug, Formatter};

use log::{debug, warn};
use nonempty::NonEmpty;
use thiserror::Error;
use tscmon_core::sequence::{Tick, TickSequence};
use tscmon_core::tree::Tsc;

/// Decision of a hook about a unit of evaluation, ordered by severity.
///
/// | result   | effect                                                  |
/// | -------- | ------------------------------------------------------- |
/// | `Ok`     | the unit is evaluated                                   |
/// | `Skip`   | the unit is ignored, evaluation continues with the next |
/// | `Cancel` | evaluation stops gracefully                             |
/// | `Abort`  | evaluation stops with an error                          |
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum HookResult {
    #[default]
    Ok,
    Skip,
    Cancel,
    Abort,
}

/// Combine the results of several hooks into the most severe one.
///
/// ```rust
/// use tscmon::hooks::{combine, HookResult};
///
/// assert_eq!(combine([HookResult::Ok, HookResult::Skip, HookResult::Ok]), HookResult::Skip);
/// assert_eq!(combine([HookResult::Cancel, HookResult::Abort]), HookResult::Abort);
/// assert_eq!(combine([]), HookResult::Ok);
/// ```
pub fn combine<I>(results: I) -> HookResult
where
    I: IntoIterator<Item = HookResult>,
{
    results.into_iter().max().unwrap_or_default()
}

/// A named function deciding whether a unit of evaluation should be evaluated.
///
/// The function type is a trait object, which is fixed by the [`TreeHook`], [`SequenceHook`], and
/// [`TickHook`] aliases.
pub struct Hook<F: ?Sized> {
    identifier: String,
    function: Box<F>,
}

/// Hook deciding whether a tree takes part in an evaluation.
pub type TreeHook<U, E> = Hook<dyn Fn(&Tsc<U, E>) -> HookResult + Send + Sync>;

/// Hook deciding whether a tick sequence is evaluated.
pub type SequenceHook<U, E> = Hook<dyn Fn(&TickSequence<U, E>) -> HookResult + Send + Sync>;

/// Hook deciding whether a tick is evaluated.
pub type TickHook<U, E> = Hook<dyn for<'a> Fn(Tick<'a, U, E>) -> HookResult + Send + Sync>;

impl<F: ?Sized> Hook<F> {
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn function(&self) -> &F {
        &self.function
    }
}

impl<F: ?Sized> Debug for Hook<F> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Hook").field("identifier", &self.identifier).finish()
    }
}

impl<U, E> Hook<dyn Fn(&Tsc<U, E>) -> HookResult + Send + Sync> {
    pub fn tree<S, F>(identifier: S, function: F) -> Self
    where
        S: Into<String>,
        F: Fn(&Tsc<U, E>) -> HookResult + Send + Sync + 'static,
    {
        Self {
            identifier: identifier.into(),
            function: Box::new(function),
        }
    }
}

impl<U, E> Hook<dyn Fn(&TickSequence<U, E>) -> HookResult + Send + Sync> {
    pub fn sequence<S, F>(identifier: S, function: F) -> Self
    where
        S: Into<String>,
        F: Fn(&TickSequence<U, E>) -> HookResult + Send + Sync + 'static,
    {
        Self {
            identifier: identifier.into(),
            function: Box::new(function),
        }
    }
}

impl<U, E> Hook<dyn for<'a> Fn(Tick<'a, U, E>) -> HookResult + Send + Sync> {
    pub fn tick<S, F>(identifier: S, function: F) -> Self
    where
        S: Into<String>,
        F: for<'a> Fn(Tick<'a, U, E>) -> HookResult + Send + Sync + 'static,
    {
        Self {
            identifier: identifier.into(),
            function: Box::new(function),
        }
    }
}

fn join(hooks: &NonEmpty<String>) -> String {
    hooks.iter().map(String::as_str).collect::<Vec<_>>().join(", ")
}

/// Error produced when at least one hook aborts the evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Evaluation of {unit} aborted by hooks: {}", join(.hooks))]
pub struct AbortError {
    hooks: NonEmpty<String>,
    unit: String,
}

impl AbortError {
    /// Identifiers of every hook that aborted the evaluation.
    pub fn hooks(&self) -> &NonEmpty<String> {
        &self.hooks
    }

    /// Description of the unit the hooks aborted on.
    pub fn unit(&self) -> &str {
        &self.unit
    }
}

/// Combined decision of all hooks about a unit that did not abort the evaluation, ordered by
/// severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verdict {
    Proceed,
    Skip,
    Cancel,
}

/// Apply every hook to a unit using `call` and combine the results.
///
/// All hooks are applied even if one of them aborts, so that the error lists every aborting hook.
/// The `unit` description is used for diagnostics only.
pub fn evaluate_hooks<F, C>(hooks: &[Hook<F>], call: C, unit: &str) -> Result<Verdict, AbortError>
where
    F: ?Sized,
    C: Fn(&F) -> HookResult,
{
    let mut verdict = Verdict::Proceed;
    let mut aborting = Vec::new();

    for hook in hooks {
        match call(hook.function()) {
            HookResult::Ok => {}
            HookResult::Skip => verdict = verdict.max(Verdict::Skip),
            HookResult::Cancel => verdict = Verdict::Cancel,
            HookResult::Abort => aborting.push(hook.identifier().to_owned()),
        }
    }

    if let Some(hooks) = NonEmpty::from_vec(aborting) {
        let error = AbortError {
            hooks,
            unit: unit.to_owned(),
        };

        warn!("{}", error);
        return Err(error);
    }

    if verdict != Verdict::Proceed {
        debug!("Hooks decided {:?} for {}", verdict, unit);
    }

    Ok(verdict)
}

/// Select the trees that take part in an evaluation.
///
/// Trees are checked in order. The first tree that a hook aborts on stops the selection with an
/// error, and the first tree that a hook cancels on stops it with `None`; later trees are not
/// passed to the hooks. Otherwise the trees that were not skipped are returned in order.
pub fn filter_trees<'t, U, E>(
    hooks: &[TreeHook<U, E>],
    trees: &'t [Tsc<U, E>],
) -> Result<Option<Vec<&'t Tsc<U, E>>>, AbortError> {
    let mut admitted = Vec::new();

    for tree in trees {
        match evaluate_hooks(hooks, |hook| hook(tree), tree.identifier())? {
            Verdict::Proceed => admitted.push(tree),
            Verdict::Skip => {}
            Verdict::Cancel => return Ok(None),
        }
    }

    Ok(Some(admitted))
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use nonempty::nonempty;
    use tscmon_core::tree::{Tsc, TscNode};

    use super::{combine, evaluate_hooks, filter_trees, AbortError, HookResult, TreeHook, Verdict};

    type Tree = Tsc<i64, u64>;

    fn tree(identifier: &str) -> Tree {
        Tsc::new(identifier, TscNode::leaf("root")).unwrap()
    }

    fn constant(identifier: &str, result: HookResult) -> TreeHook<i64, u64> {
        TreeHook::tree(identifier, move |_| result)
    }

    #[test]
    fn severity_order() {
        assert!(HookResult::Ok < HookResult::Skip);
        assert!(HookResult::Skip < HookResult::Cancel);
        assert!(HookResult::Cancel < HookResult::Abort);
    }

    #[test]
    fn combination_table() {
        use HookResult::*;

        let results = [Ok, Skip, Cancel, Abort];

        for left in results {
            for right in results {
                assert_eq!(combine([left, right]), left.max(right));
            }
        }

        assert_eq!(combine([Ok, Ok]), Ok);
        assert_eq!(combine([Skip, Ok]), Skip);
        assert_eq!(combine([Skip, Cancel]), Cancel);
        assert_eq!(combine([Abort, Skip]), Abort);
    }

    #[test]
    fn every_aborting_hook_is_reported() {
        let hooks = vec![
            constant("first", HookResult::Abort),
            constant("second", HookResult::Skip),
            constant("third", HookResult::Abort),
        ];
        let tree = tree("tree");
        let error = evaluate_hooks(&hooks, |hook| hook(&tree), "tree").unwrap_err();

        assert_eq!(error.hooks(), &nonempty!["first".to_string(), "third".to_string()]);
        assert_eq!(error.unit(), "tree");
        assert_eq!(error.to_string(), "Evaluation of tree aborted by hooks: first, third");
    }

    #[test]
    fn verdicts() -> Result<(), AbortError> {
        let tree = tree("tree");
        let skip = vec![constant("a", HookResult::Ok), constant("b", HookResult::Skip)];
        let cancel = vec![constant("a", HookResult::Cancel), constant("b", HookResult::Skip)];

        let none: Vec<TreeHook<i64, u64>> = Vec::new();

        assert_eq!(evaluate_hooks(&skip, |hook| hook(&tree), "tree")?, Verdict::Skip);
        assert_eq!(evaluate_hooks(&cancel, |hook| hook(&tree), "tree")?, Verdict::Cancel);
        assert_eq!(evaluate_hooks(&none, |hook| hook(&tree), "tree")?, Verdict::Proceed);

        Ok(())
    }

    #[test]
    fn tree_filtering() -> Result<(), AbortError> {
        let trees = vec![tree("keep"), tree("skip-me"), tree("also-keep")];
        let skip = vec![TreeHook::tree("skip", |tree: &Tree| {
            if tree.identifier().starts_with("skip") {
                HookResult::Skip
            } else {
                HookResult::Ok
            }
        })];

        let admitted = filter_trees(&skip, &trees)?.unwrap();
        let identifiers: Vec<&str> = admitted.iter().map(|tree| tree.identifier()).collect();

        assert_eq!(identifiers, vec!["keep", "also-keep"]);
        assert!(filter_trees(&[constant("cancel", HookResult::Cancel)], &trees)?.is_none());
        assert!(filter_trees(&[constant("abort", HookResult::Abort)], &trees).is_err());

        Ok(())
    }

    #[test]
    fn tree_filtering_stops_at_first_cancel() -> Result<(), AbortError> {
        let trees = vec![tree("stop"), tree("fail"), tree("never")];
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);

        let hooks = vec![TreeHook::tree("by-name", move |tree: &Tree| {
            counter.fetch_add(1, Ordering::SeqCst);

            match tree.identifier() {
                "stop" => HookResult::Cancel,
                "fail" => HookResult::Abort,
                _ => HookResult::Ok,
            }
        })];

        assert!(filter_trees(&hooks, &trees)?.is_none());
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        let error = filter_trees(&hooks, &trees[1..]).unwrap_err();
        assert_eq!(error.unit(), "fail");
        assert_eq!(calls.load(Ordering::SeqCst), 2);

        Ok(())
    }
}
