//! Point-wise temporal operators for constructing edge conditions and monitors.
//!
//! Every operator in this module is a pure function that evaluates a temporal formula at a single
//! [`Tick`] of a [`TickSequence`](crate::sequence::TickSequence). The sub-formulas of an operator
//! are provided as closures over ticks, which means that operators compose simply by nesting
//! closures:
//!
//! ```rust
//! use tscmon::operators::{eventually, globally, next};
//! use tscmon::sequence::{Tick, TickSequence};
//!
//! fn is_fast(tick: Tick<'_, i64, u64>) -> bool {
//!     tick.entities().len() > 1
//! }
//!
//! let sequence = TickSequence::new("sample", 1, [
//!     (0i64, vec![1u64]),
//!     (1i64, vec![1u64, 2]),
//!     (2i64, vec![1u64, 2]),
//! ]).unwrap();
//!
//! let start = sequence.first();
//!
//! assert!(next(start, None, is_fast));
//! assert!(eventually(start, None, |tick| globally(tick, None, is_fast)));
//! ```
//!
//! # Future Operators
//!
//! Future operators scan the sequence forward from the current tick. For a visual representation,
//! consider the following sequence and a future operator evaluated at `T2`:
//!
//! ```text
//! T1 T2 T3 T4 T5 T6
//!     |-----------|
//! ```
//!
//! The operators [`next`], [`until`], [`eventually`], [`globally`], and [`release`] are future
//! operators.
//!
//! # Past Operators
//!
//! Past operators are the mirror images of the future operators, scanning the sequence backward
//! from the current tick:
//!
//! ```text
//! T1 T2 T3 T4 T5 T6
//! |--------|
//! ```
//!
//! The operators [`previous`], [`since`], [`once`], and [`historically`] are past operators.
//!
//! # Intervals
//!
//! Every operator accepts an optional [`Interval`] of tick differences which bounds how far from
//! the current tick the operator looks. An absent interval does not constrain the operator. For an
//! operator bounded by `[0, 3]` evaluated at `T2`, and a sequence with one unit between ticks, the
//! evaluation would consider the following ticks:
//!
//! ```text
//! T1 T2 T3 T4 T5 T6
//!     |--------|
//! ```
//!
//! # Prevalence Operators
//!
//! The prevalence operators [`min_prevalence`], [`max_prevalence`], [`past_min_prevalence`], and
//! [`past_max_prevalence`] require a sub-formula to hold for at least (or at most) a fraction of
//! the ticks in a window. Unlike the other operators they can fail, so they return a [`Result`].

mod backward;
mod forward;
mod prevalence;

use thiserror::Error;

use crate::interval::{self, Interval};
use crate::sequence::{Direction, Tick, TickUnit};

pub use backward::{historically, once, previous, since};
pub use forward::{eventually, globally, next, release, until};
pub use prevalence::{max_prevalence, min_prevalence, past_max_prevalence, past_min_prevalence};

/// Error produced during the evaluation of a fallible operator.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OperatorError {
    #[error("Prevalence fraction {0} is outside of [0, 1]")]
    InvalidFraction(f64),

    #[error("Window {interval} before tick {unit} lies before the start of the time domain")]
    WindowUnderflow { unit: String, interval: String },
}

/// Scan from `tick` in `direction` until `phi2` holds within `interval`, requiring `phi1` to hold
/// at every tick visited before that.
fn until_in<'a, U, E, F1, F2>(
    tick: Tick<'a, U, E>,
    direction: Direction,
    interval: Option<Interval<U::Difference>>,
    phi1: F1,
    phi2: F2,
) -> bool
where
    U: TickUnit,
    F1: Fn(Tick<'a, U, E>) -> bool,
    F2: Fn(Tick<'a, U, E>) -> bool,
{
    for current in tick.scan(direction) {
        let offset = tick.offset(&current, direction);

        if interval.as_ref().map_or(false, |interval| interval.is_before(offset)) {
            if !phi1(current) {
                return false;
            }

            continue;
        }

        if interval.as_ref().map_or(false, |interval| interval.is_after(offset)) {
            return false;
        }

        if phi2(current) {
            return true;
        }

        if !phi1(current) {
            return false;
        }
    }

    false
}

/// Check that `neighbor` exists, lies within `interval` of `tick`, and satisfies `phi`.
fn neighbor_in<'a, U, E, F>(
    tick: Tick<'a, U, E>,
    neighbor: Option<Tick<'a, U, E>>,
    direction: Direction,
    interval: Option<Interval<U::Difference>>,
    phi: F,
) -> bool
where
    U: TickUnit,
    F: Fn(Tick<'a, U, E>) -> bool,
{
    neighbor.map_or(false, |neighbor| {
        interval::includes(&interval, tick.offset(&neighbor, direction)) && phi(neighbor)
    })
}
