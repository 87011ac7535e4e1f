use std::collections::{BTreeMap, BTreeSet};
use std::error::Error;

use approx::assert_relative_eq;
use tscmon::hooks::{Evaluation, HookResult, InstanceConsumer, Outcome, RunError};
use tscmon::{TickSequence, Tsc, TscEdge, TscInstance, TscNode};

type Tree = Tsc<i64, u64>;

/// Records which possible instances of every tree were observed.
#[derive(Default)]
struct Coverage {
    observed: BTreeMap<String, BTreeSet<usize>>,
    invalid: usize,
    ratios: BTreeMap<String, f64>,
}

impl InstanceConsumer<i64, u64> for Coverage {
    fn consume(&mut self, tree: &Tree, instance: &TscInstance<i64>) {
        match tree.possible_instance_index(instance.root()) {
            Some(index) => {
                self.observed.entry(tree.identifier().to_string()).or_default().insert(index);
            }
            None => self.invalid += 1,
        }
    }

    fn finish(&mut self, trees: &[&Tree]) {
        for tree in trees {
            let observed = self.observed.get(tree.identifier()).map_or(0, BTreeSet::len);
            let ratio = observed as f64 / tree.possible_instances().len() as f64;

            self.ratios.insert(tree.identifier().to_string(), ratio);
        }
    }
}

fn presence(label: &str, id: u64) -> TscEdge<i64, u64> {
    TscEdge::new(TscNode::leaf(label)).with_condition(move |tick| tick.entities().contains(&id))
}

fn trees() -> Result<Vec<Tree>, Box<dyn Error>> {
    let pair = TscNode::optional("pair", vec![presence("a", 1), presence("b", 2)])?;
    let single = TscNode::exclusive("single", vec![presence("a", 1), presence("b", 2)])?;

    Ok(vec![Tsc::new("pair", pair)?, Tsc::new("single", single)?])
}

fn sequences() -> Result<Vec<TickSequence<i64, u64>>, Box<dyn Error>> {
    Ok(vec![
        TickSequence::new("first", 0, [(0i64, vec![0u64, 1]), (1, vec![0, 1, 2]), (2, vec![0])])?,
        TickSequence::new("second", 0, [(0i64, vec![0u64, 2]), (1, vec![0, 2])])?,
    ])
}

#[test]
fn coverage_over_sequences() -> Result<(), Box<dyn Error>> {
    let trees = trees()?;
    let sequences = sequences()?;
    let mut coverage = Coverage::default();

    let summary = Evaluation::new(trees).with_consumer(&mut coverage).run(&sequences)?;

    assert_eq!(summary.outcome, Outcome::Completed);
    assert_eq!(summary.sequences, 2);
    assert_eq!(summary.ticks, 5);
    assert_eq!(summary.instances, 10);

    // The "single" tree observes two valid instances, and is invalid when both or neither entity
    // is present.
    assert_eq!(coverage.invalid, 2);
    assert_relative_eq!(coverage.ratios["pair"], 1.0);
    assert_relative_eq!(coverage.ratios["single"], 1.0);

    Ok(())
}

#[test]
fn skipping_changes_coverage() -> Result<(), Box<dyn Error>> {
    let trees = trees()?;
    let sequences = sequences()?;
    let mut coverage = Coverage::default();

    let summary = Evaluation::new(trees)
        .with_tree_hook("only-pairs", |tree| {
            if tree.identifier() == "pair" {
                HookResult::Ok
            } else {
                HookResult::Skip
            }
        })
        .with_sequence_hook("first-only", |sequence| {
            if sequence.source() == "first" {
                HookResult::Ok
            } else {
                HookResult::Skip
            }
        })
        .with_consumer(&mut coverage)
        .run(&sequences)?;

    assert_eq!(summary.skipped_sequences, 1);
    assert_eq!(summary.instances, 3);
    assert!(!coverage.ratios.contains_key("single"));
    assert_relative_eq!(coverage.ratios["pair"], 0.75);

    Ok(())
}

#[test]
fn aborting_tick_hook() -> Result<(), Box<dyn Error>> {
    let trees = trees()?;
    let sequences = sequences()?;
    let mut coverage = Coverage::default();

    let result = Evaluation::new(trees)
        .with_tick_hook("late", |tick| if tick.unit() > 1 { HookResult::Abort } else { HookResult::Ok })
        .with_tick_hook("also-late", |tick| if tick.unit() > 1 { HookResult::Abort } else { HookResult::Skip })
        .with_consumer(&mut coverage)
        .run(&sequences);

    let error = match result {
        Err(RunError::Abort(error)) => error,
        other => return Err(format!("expected an abort, got {:?}", other).into()),
    };

    assert_eq!(error.hooks().len(), 2);
    assert_eq!(error.unit(), "first@2");
    assert!(coverage.ratios.is_empty());
    assert!(coverage.observed.is_empty());

    Ok(())
}
