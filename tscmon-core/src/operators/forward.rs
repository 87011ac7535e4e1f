use crate::interval::Interval;
use crate::sequence::{Direction, Tick, TickUnit};

use super::{neighbor_in, until_in};

/// Temporal operator that requires its sub-formula to hold at the next tick.
///
/// The `next` operator holds at a tick `t` if `t` has a successor `t'`, the difference
/// `t'.unit - t.unit` lies within the interval, and `phi` holds at `t'`. At the last tick of a
/// sequence the operator never holds.
///
/// | unit | phi   | next  |
/// | ---- | ----- | ----- |
/// |    0 | false | true  |
/// |    1 | true  | false |
/// |    2 | false | false |
pub fn next<'a, U, E, F>(tick: Tick<'a, U, E>, interval: Option<Interval<U::Difference>>, phi: F) -> bool
where
    U: TickUnit,
    F: Fn(Tick<'a, U, E>) -> bool,
{
    neighbor_in(tick, tick.next(), Direction::Forward, interval, phi)
}

/// Temporal operator that requires its right sub-formula to hold within the interval and its left
/// sub-formula to hold at every tick before that.
///
/// The operator scans forward from the current tick (inclusive). While the offset from the current
/// tick lies before the interval, `phi1` must hold. Once the offset lies within the interval, the
/// operator holds as soon as `phi2` holds, and otherwise requires `phi1` to keep holding. Running
/// past the end of the interval or the end of the sequence without `phi2` holding means the
/// operator does not hold.
///
/// For the interval `[1, 2]`:
///
/// | offset | phi1  | phi2  |                  |
/// | ------ | ----- | ----- | ---------------- |
/// |      0 | true  | false | before interval  |
/// |      1 | true  | false | keep scanning    |
/// |      2 | false | true  | holds            |
pub fn until<'a, U, E, F1, F2>(
    tick: Tick<'a, U, E>,
    interval: Option<Interval<U::Difference>>,
    phi1: F1,
    phi2: F2,
) -> bool
where
    U: TickUnit,
    F1: Fn(Tick<'a, U, E>) -> bool,
    F2: Fn(Tick<'a, U, E>) -> bool,
{
    until_in(tick, Direction::Forward, interval, phi1, phi2)
}

/// Temporal operator that requires its sub-formula to hold at the current tick or at some tick in
/// the future, equivalent to `until(true, phi)`.
pub fn eventually<'a, U, E, F>(tick: Tick<'a, U, E>, interval: Option<Interval<U::Difference>>, phi: F) -> bool
where
    U: TickUnit,
    F: Fn(Tick<'a, U, E>) -> bool,
{
    until(tick, interval, |_| true, phi)
}

/// Temporal operator that requires its sub-formula to hold at every tick from the current one,
/// equivalent to `!eventually(!phi)`.
pub fn globally<'a, U, E, F>(tick: Tick<'a, U, E>, interval: Option<Interval<U::Difference>>, phi: F) -> bool
where
    U: TickUnit,
    F: Fn(Tick<'a, U, E>) -> bool,
{
    !eventually(tick, interval, |t| !phi(t))
}

/// Dual of [`until`], equivalent to `!until(!phi1, !phi2)`.
///
/// The right sub-formula has to hold up to and including the first tick at which the left
/// sub-formula holds. If the left sub-formula never holds, the right sub-formula has to hold
/// until the end of the interval or the sequence.
pub fn release<'a, U, E, F1, F2>(
    tick: Tick<'a, U, E>,
    interval: Option<Interval<U::Difference>>,
    phi1: F1,
    phi2: F2,
) -> bool
where
    U: TickUnit,
    F1: Fn(Tick<'a, U, E>) -> bool,
    F2: Fn(Tick<'a, U, E>) -> bool,
{
    !until(tick, interval, |t| !phi1(t), |t| !phi2(t))
}
