use crate::interval::Interval;
use crate::sequence::{Direction, Tick, TickUnit};

use super::{neighbor_in, until_in};

/// Past operator that requires its sub-formula to hold at the previous tick.
///
/// Mirror image of [`next`](super::next). At the first tick of a sequence the operator never
/// holds.
pub fn previous<'a, U, E, F>(tick: Tick<'a, U, E>, interval: Option<Interval<U::Difference>>, phi: F) -> bool
where
    U: TickUnit,
    F: Fn(Tick<'a, U, E>) -> bool,
{
    neighbor_in(tick, tick.previous(), Direction::Backward, interval, phi)
}

/// Past operator that requires its right sub-formula to have held within the interval and its
/// left sub-formula to have held at every tick since then.
///
/// Mirror image of [`until`](super::until), scanning backward from the current tick (inclusive).
pub fn since<'a, U, E, F1, F2>(
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
    until_in(tick, Direction::Backward, interval, phi1, phi2)
}

/// Past operator that requires its sub-formula to have held at the current tick or at some tick
/// in the past, equivalent to `since(true, phi)`.
pub fn once<'a, U, E, F>(tick: Tick<'a, U, E>, interval: Option<Interval<U::Difference>>, phi: F) -> bool
where
    U: TickUnit,
    F: Fn(Tick<'a, U, E>) -> bool,
{
    since(tick, interval, |_| true, phi)
}

/// Past operator that requires its sub-formula to have held at every tick up to the current one,
/// equivalent to `!once(!phi)`.
pub fn historically<'a, U, E, F>(tick: Tick<'a, U, E>, interval: Option<Interval<U::Difference>>, phi: F) -> bool
where
    U: TickUnit,
    F: Fn(Tick<'a, U, E>) -> bool,
{
    !once(tick, interval, |t| !phi(t))
}

#[cfg(test)]
mod tests {
    use crate::interval::{Interval, IntervalError};
    use crate::operators::test::{flags, has};

    use super::{historically, once, previous, since};

    #[test]
    fn previous_tick() {
        let sequence = flags(&[&[1], &[], &[]]);

        assert!(previous(sequence.get(1).unwrap(), None, has(1)));
        assert!(!previous(sequence.get(2).unwrap(), None, has(1)));
        assert!(!previous(sequence.first(), None, |_| true));
    }

    #[test]
    fn bounded_since() -> Result<(), IntervalError> {
        // Mirror image of the bounded until case: scanning backward from the last tick.
        let holds = flags(&[&[], &[2], &[1], &[1]]);
        let early = flags(&[&[2], &[], &[1], &[1]]);
        let interval = Interval::closed(1, 2)?;

        assert!(since(holds.last(), Some(interval), has(1), has(2)));
        assert!(!since(early.last(), Some(interval), has(1), has(2)));

        Ok(())
    }

    #[test]
    fn once_and_historically() -> Result<(), IntervalError> {
        let sequence = flags(&[&[1, 2], &[1], &[1], &[1]]);

        assert!(once(sequence.last(), None, has(2)));
        assert!(!once(sequence.last(), Some(Interval::closed(0, 2)?), has(2)));
        assert!(historically(sequence.last(), None, has(1)));
        assert!(!historically(sequence.last(), None, has(2)));
        assert!(historically(sequence.first(), None, has(2)));

        Ok(())
    }
}
