//! Ordered sequences of timed world states.
//!
//! A [`TickSequence`] is a non-empty list of [`TickData`] values, each of which associates a tick
//! unit (the time of the state) with the set of entities observed at that time. The units of a
//! sequence must be strictly increasing. Every sequence is identified by the source it was loaded
//! from and designates a _primary entity_, which must be present exactly once in every tick.
//!
//! Predicates and temporal operators do not operate on `TickData` directly. Instead, they receive a
//! [`Tick`], which is a lightweight cursor into the sequence that supports looking at the
//! neighboring ticks and iterating over windows of the sequence relative to the current tick.
//!
//! # Examples
//!
//! ```rust
//! use tscmon::sequence::TickSequence;
//!
//! // Entities are identified by an integer id. Plain ids can be used as entities directly.
//! let sequence = TickSequence::new("recording-01", 1, [
//!     (0i64, vec![1u64, 2]),
//!     (1i64, vec![1u64]),
//!     (2i64, vec![1u64, 3]),
//! ]).unwrap();
//!
//! let first = sequence.first();
//! let second = first.next().unwrap();
//!
//! assert_eq!(second.unit(), 1);
//! assert_eq!(second.previous().map(|tick| tick.unit()), Some(0));
//! assert_eq!(sequence.units().collect::<Vec<_>>(), vec![0, 1, 2]);
//! ```
//!
//! # Units
//!
//! Any type implementing [`TickUnit`] can be used as the time domain of a sequence. The difference
//! between two units is expressed using the associated [`TickUnit::Difference`] type, which is the
//! type used to bound the temporal operators. Implementations are provided for [`i64`], [`u64`]
//! (with signed differences), and [`NotNan<f64>`].
use std::fmt::Debug;
use std::iter::Rev;
use std::ops::{Bound, RangeBounds, Sub};

use either::Either;
use num_traits::Zero;
use ordered_float::NotNan;
use thiserror::Error;

use crate::interval::Interval;

/// Integer identity of an [`Entity`].
pub type EntityId = u64;

/// Opaque domain payload attached to a tick.
pub trait Entity {
    fn id(&self) -> EntityId;
}

impl Entity for EntityId {
    fn id(&self) -> EntityId {
        *self
    }
}

impl<T> Entity for &T
where
    T: Entity + ?Sized,
{
    fn id(&self) -> EntityId {
        (**self).id()
    }
}

/// Difference between two tick units.
///
/// This trait is implemented for every totally ordered type that is closed under addition and
/// subtraction and has a zero value.
pub trait TickDifference: Copy + Ord + Debug + Zero + Sub<Output = Self> {}

impl<T> TickDifference for T where T: Copy + Ord + Debug + Zero + Sub<Output = T> {}

/// A point in a time-like domain.
///
/// Units can be subtracted from each other to produce a [`TickDifference`], and a difference can
/// be added to or subtracted from a unit to produce another unit. The checked variants return
/// [`None`] if the result is not representable in the unit domain.
pub trait TickUnit: Copy + Ord + Debug {
    type Difference: TickDifference;

    /// Compute the difference `self - earlier`.
    fn since(self, earlier: Self) -> Self::Difference;

    /// Compute `self + difference`.
    fn checked_add(self, difference: Self::Difference) -> Option<Self>;

    /// Compute `self - difference`.
    fn checked_sub(self, difference: Self::Difference) -> Option<Self>;
}

impl TickUnit for i64 {
    type Difference = i64;

    fn since(self, earlier: Self) -> Self::Difference {
        self.saturating_sub(earlier)
    }

    fn checked_add(self, difference: Self::Difference) -> Option<Self> {
        i64::checked_add(self, difference)
    }

    fn checked_sub(self, difference: Self::Difference) -> Option<Self> {
        i64::checked_sub(self, difference)
    }
}

impl TickUnit for u64 {
    type Difference = i64;

    fn since(self, earlier: Self) -> Self::Difference {
        let difference = i128::from(self) - i128::from(earlier);
        i64::try_from(difference).unwrap_or(if difference > 0 { i64::MAX } else { i64::MIN })
    }

    fn checked_add(self, difference: Self::Difference) -> Option<Self> {
        u64::checked_add_signed(self, difference)
    }

    fn checked_sub(self, difference: Self::Difference) -> Option<Self> {
        if difference >= 0 {
            u64::checked_sub(self, difference.unsigned_abs())
        } else {
            u64::checked_add(self, difference.unsigned_abs())
        }
    }
}

impl TickUnit for NotNan<f64> {
    type Difference = NotNan<f64>;

    /// The difference between two equal infinities is zero.
    fn since(self, earlier: Self) -> Self::Difference {
        NotNan::new(self.into_inner() - earlier.into_inner()).unwrap_or_else(|_| NotNan::zero())
    }

    fn checked_add(self, difference: Self::Difference) -> Option<Self> {
        NotNan::new(self.into_inner() + difference.into_inner()).ok()
    }

    fn checked_sub(self, difference: Self::Difference) -> Option<Self> {
        NotNan::new(self.into_inner() - difference.into_inner()).ok()
    }
}

/// Errors produced while constructing or inspecting a tick sequence.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SequenceError {
    #[error("Tick sequence {sequence} contains no ticks")]
    Empty { sequence: String },

    #[error("Tick sequence {sequence} is not strictly increasing: tick {current} follows tick {previous}")]
    NonIncreasing {
        sequence: String,
        previous: String,
        current: String,
    },

    #[error("Primary entity {id} of tick sequence {sequence} is missing at tick {unit}")]
    MissingPrimaryEntity { sequence: String, id: EntityId, unit: String },

    #[error("Primary entity {id} of tick sequence {sequence} occurs {count} times at tick {unit}")]
    AmbiguousPrimaryEntity {
        sequence: String,
        id: EntityId,
        unit: String,
        count: usize,
    },
}

/// The state of the world at a single tick.
#[derive(Debug, Clone, PartialEq)]
pub struct TickData<U, E> {
    unit: U,
    entities: Vec<E>,
}

impl<U, E> TickData<U, E> {
    pub fn new(unit: U, entities: Vec<E>) -> Self {
        Self { unit, entities }
    }

    pub fn unit(&self) -> &U {
        &self.unit
    }

    pub fn entities(&self) -> &[E] {
        &self.entities
    }
}

impl<U, E> From<(U, Vec<E>)> for TickData<U, E> {
    fn from((unit, entities): (U, Vec<E>)) -> Self {
        Self::new(unit, entities)
    }
}

/// A non-empty, strictly increasing sequence of ticks.
///
/// See the [`sequence`](self) module for more information about the semantics of this type.
#[derive(Debug, Clone, PartialEq)]
pub struct TickSequence<U, E> {
    source: String,
    primary_entity_id: EntityId,
    ticks: Vec<TickData<U, E>>,
}

impl<U, E> TickSequence<U, E>
where
    U: TickUnit,
{
    /// Create a new tick sequence.
    ///
    /// Fails if no ticks are provided or if the tick units are not strictly increasing. The
    /// presence of the primary entity is not checked here, see [`TickSequence::validate`].
    pub fn new<S, I, T>(source: S, primary_entity_id: EntityId, ticks: I) -> Result<Self, SequenceError>
    where
        S: Into<String>,
        I: IntoIterator<Item = T>,
        T: Into<TickData<U, E>>,
    {
        let source = source.into();
        let ticks: Vec<TickData<U, E>> = ticks.into_iter().map(Into::into).collect();

        if ticks.is_empty() {
            return Err(SequenceError::Empty { sequence: source });
        }

        if let Some(pair) = ticks.windows(2).find(|pair| pair[0].unit >= pair[1].unit) {
            return Err(SequenceError::NonIncreasing {
                previous: format!("{:?}", pair[0].unit),
                current: format!("{:?}", pair[1].unit),
                sequence: source,
            });
        }

        Ok(Self {
            source,
            primary_entity_id,
            ticks,
        })
    }

    /// Identifier of the source this sequence was loaded from.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn primary_entity_id(&self) -> EntityId {
        self.primary_entity_id
    }

    /// Number of ticks in the sequence
    pub fn len(&self) -> usize {
        self.ticks.len()
    }

    /// Always `false`, a tick sequence contains at least one tick.
    pub fn is_empty(&self) -> bool {
        self.ticks.is_empty()
    }

    pub fn first(&self) -> Tick<'_, U, E> {
        Tick { sequence: self, index: 0 }
    }

    pub fn last(&self) -> Tick<'_, U, E> {
        Tick {
            sequence: self,
            index: self.ticks.len() - 1,
        }
    }

    /// Get the tick at a given position in the sequence.
    pub fn get(&self, index: usize) -> Option<Tick<'_, U, E>> {
        (index < self.ticks.len()).then_some(Tick { sequence: self, index })
    }

    /// Get the tick with a given unit. Returns [`None`] if no tick has the unit.
    pub fn at_unit(&self, unit: U) -> Option<Tick<'_, U, E>> {
        self.ticks
            .binary_search_by(|data| data.unit.cmp(&unit))
            .ok()
            .map(|index| Tick { sequence: self, index })
    }

    /// Iterate over the ticks of the sequence in chronological order.
    pub fn ticks(&self) -> Ticks<'_, U, E> {
        Ticks {
            sequence: self,
            front: 0,
            back: self.ticks.len(),
        }
    }

    /// Iterate over the units of the sequence in chronological order.
    pub fn units(&self) -> Units<'_, U, E> {
        Units(self.ticks())
    }

    /// Iterate over the ticks whose units lie in the given range.
    pub fn range<R>(&self, bounds: R) -> Ticks<'_, U, E>
    where
        R: RangeBounds<U>,
    {
        let (front, back) = self.index_range(bounds.start_bound().cloned(), bounds.end_bound().cloned());
        Ticks { sequence: self, front, back }
    }

    /// Check that the primary entity occurs exactly once in every tick.
    pub fn validate(&self) -> Result<(), SequenceError>
    where
        E: Entity,
    {
        self.ticks().try_for_each(|tick| tick.primary_entity().map(|_| ()))
    }

    fn index_range(&self, start: Bound<U>, end: Bound<U>) -> (usize, usize) {
        let front = match start {
            Bound::Unbounded => 0,
            Bound::Included(unit) => self.ticks.partition_point(|data| data.unit < unit),
            Bound::Excluded(unit) => self.ticks.partition_point(|data| data.unit <= unit),
        };

        let back = match end {
            Bound::Unbounded => self.ticks.len(),
            Bound::Included(unit) => self.ticks.partition_point(|data| data.unit <= unit),
            Bound::Excluded(unit) => self.ticks.partition_point(|data| data.unit < unit),
        };

        (front, back.max(front))
    }
}

/// Direction in which a temporal operator scans a sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

/// A cursor pointing at a single tick of a [`TickSequence`].
///
/// A `Tick` is cheap to copy and gives access to the state at the tick as well as to the rest of
/// the sequence relative to the tick.
pub struct Tick<'a, U, E> {
    sequence: &'a TickSequence<U, E>,
    index: usize,
}

impl<'a, U, E> Clone for Tick<'a, U, E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, U, E> Copy for Tick<'a, U, E> {}

impl<'a, U, E> Debug for Tick<'a, U, E>
where
    U: Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tick")
            .field("source", &self.sequence.source)
            .field("index", &self.index)
            .field("unit", &self.data().unit)
            .finish()
    }
}

impl<'a, U, E> PartialEq for Tick<'a, U, E> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.sequence, other.sequence) && self.index == other.index
    }
}

impl<'a, U, E> Tick<'a, U, E> {
    fn data(&self) -> &'a TickData<U, E> {
        &self.sequence.ticks[self.index]
    }

    /// The sequence this tick belongs to.
    pub fn sequence(&self) -> &'a TickSequence<U, E> {
        self.sequence
    }

    /// Position of this tick in its sequence.
    pub fn index(&self) -> usize {
        self.index
    }

    /// All the entities observed at this tick.
    pub fn entities(&self) -> &'a [E] {
        &self.data().entities
    }

    pub fn is_first(&self) -> bool {
        self.index == 0
    }

    pub fn is_last(&self) -> bool {
        self.index + 1 == self.sequence.ticks.len()
    }

    /// The tick directly after this one, if any.
    pub fn next(&self) -> Option<Self> {
        (!self.is_last()).then_some(Self {
            sequence: self.sequence,
            index: self.index + 1,
        })
    }

    /// The tick directly before this one, if any.
    pub fn previous(&self) -> Option<Self> {
        self.index.checked_sub(1).map(|index| Self {
            sequence: self.sequence,
            index,
        })
    }

    /// Ticks from this one (inclusive) to the end of the sequence in chronological order.
    pub fn following(&self) -> Ticks<'a, U, E> {
        Ticks {
            sequence: self.sequence,
            front: self.index,
            back: self.sequence.ticks.len(),
        }
    }

    /// Ticks from this one (inclusive) to the start of the sequence in reverse chronological order.
    pub fn preceding(&self) -> Rev<Ticks<'a, U, E>> {
        Ticks {
            sequence: self.sequence,
            front: 0,
            back: self.index + 1,
        }
        .rev()
    }

    /// Ticks starting at this one (inclusive) in the order a scan in `direction` visits them.
    pub fn scan(&self, direction: Direction) -> Either<Ticks<'a, U, E>, Rev<Ticks<'a, U, E>>> {
        match direction {
            Direction::Forward => Either::Left(self.following()),
            Direction::Backward => Either::Right(self.preceding()),
        }
    }
}

impl<'a, U, E> Tick<'a, U, E>
where
    U: TickUnit,
{
    pub fn unit(&self) -> U {
        self.data().unit
    }

    /// Non-negative distance from this tick to `other` when scanning in `direction`.
    pub fn offset(&self, other: &Self, direction: Direction) -> U::Difference {
        match direction {
            Direction::Forward => other.unit().since(self.unit()),
            Direction::Backward => self.unit().since(other.unit()),
        }
    }

    /// Ticks whose units lie in the window `[unit + a, unit + b]` for the interval `[a, b]`.
    ///
    /// If no interval is given every tick from this one to the end of the sequence is included.
    pub fn forward(&self, interval: Option<&Interval<U::Difference>>) -> Ticks<'a, U, E> {
        let interval = match interval {
            Some(interval) => interval,
            None => return self.following(),
        };

        let unit = self.unit();
        let start = interval.start().map(|offset| unit.checked_add(offset));
        let end = interval.end().map(|offset| unit.checked_add(offset));

        match start {
            // The window starts beyond the end of the unit domain, so it cannot contain any tick.
            None => self.empty(),
            Some(start) => self.sequence.range((Bound::from(start), end.map_or(Bound::Unbounded, Bound::from))),
        }
    }

    /// Ticks whose units lie in the window `[unit - b, unit - a]` for the interval `[a, b]`.
    ///
    /// If no interval is given every tick from the start of the sequence to this one is included.
    /// Returns [`None`] if `unit - a` is not representable, which means that the entire window
    /// lies before the start of the unit domain.
    pub fn backward(&self, interval: Option<&Interval<U::Difference>>) -> Option<Ticks<'a, U, E>> {
        let interval = match interval {
            Some(interval) => interval,
            None => {
                return Some(Ticks {
                    sequence: self.sequence,
                    front: 0,
                    back: self.index + 1,
                })
            }
        };

        let unit = self.unit();
        let start = interval.end().map(|offset| unit.checked_sub(offset));
        let end = interval.start().map(|offset| unit.checked_sub(offset))?;
        let range = (start.map_or(Bound::Unbounded, Bound::from), Bound::from(end));

        Some(self.sequence.range(range))
    }

    fn empty(&self) -> Ticks<'a, U, E> {
        Ticks {
            sequence: self.sequence,
            front: self.index,
            back: self.index,
        }
    }
}

impl<'a, U, E> Tick<'a, U, E>
where
    U: TickUnit,
    E: Entity,
{
    /// Find an entity of this tick by its id.
    pub fn entity(&self, id: EntityId) -> Option<&'a E> {
        self.entities().iter().find(|entity| entity.id() == id)
    }

    /// The primary entity of the sequence at this tick.
    ///
    /// Fails if the primary entity is absent or present more than once.
    pub fn primary_entity(&self) -> Result<&'a E, SequenceError> {
        let id = self.sequence.primary_entity_id;
        let mut matches = self.entities().iter().filter(|entity| entity.id() == id);

        match (matches.next(), matches.count()) {
            (Some(entity), 0) => Ok(entity),
            (None, _) => Err(SequenceError::MissingPrimaryEntity {
                sequence: self.sequence.source.clone(),
                unit: format!("{:?}", self.unit()),
                id,
            }),
            (Some(_), rest) => Err(SequenceError::AmbiguousPrimaryEntity {
                sequence: self.sequence.source.clone(),
                unit: format!("{:?}", self.unit()),
                count: rest + 1,
                id,
            }),
        }
    }
}

/// Iterator over a contiguous run of ticks in a sequence. The ticks are yielded in chronological
/// order (lower units -> higher units).
///
/// This iterator can be constructed by calling the `ticks()` or `range()` methods on a
/// [`TickSequence`], or the `following()`, `forward()`, or `backward()` methods on a [`Tick`].
pub struct Ticks<'a, U, E> {
    sequence: &'a TickSequence<U, E>,
    front: usize,
    back: usize,
}

impl<'a, U, E> Iterator for Ticks<'a, U, E> {
    type Item = Tick<'a, U, E>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.front >= self.back {
            return None;
        }

        let tick = Tick {
            sequence: self.sequence,
            index: self.front,
        };

        self.front += 1;
        Some(tick)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.back - self.front;
        (len, Some(len))
    }
}

impl<'a, U, E> DoubleEndedIterator for Ticks<'a, U, E> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.front >= self.back {
            return None;
        }

        self.back -= 1;

        Some(Tick {
            sequence: self.sequence,
            index: self.back,
        })
    }
}

impl<'a, U, E> ExactSizeIterator for Ticks<'a, U, E> {
    fn len(&self) -> usize {
        self.back - self.front
    }
}

impl<'a, U, E> Ticks<'a, U, E>
where
    U: TickUnit,
{
    /// Create an iterator over the units of the ticks, ignoring the entities.
    pub fn units(self) -> Units<'a, U, E> {
        Units(self)
    }
}

/// Iterator over the units of a run of ticks, in chronological order.
pub struct Units<'a, U, E>(Ticks<'a, U, E>);

impl<'a, U, E> Iterator for Units<'a, U, E>
where
    U: TickUnit,
{
    type Item = U;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|tick| tick.unit())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl<'a, U, E> DoubleEndedIterator for Units<'a, U, E>
where
    U: TickUnit,
{
    fn next_back(&mut self) -> Option<Self::Item> {
        self.0.next_back().map(|tick| tick.unit())
    }
}

impl<'a, U, E> ExactSizeIterator for Units<'a, U, E>
where
    U: TickUnit,
{
    fn len(&self) -> usize {
        self.0.len()
    }
}

impl<'a, U, E> IntoIterator for &'a TickSequence<U, E>
where
    U: TickUnit,
{
    type Item = Tick<'a, U, E>;
    type IntoIter = Ticks<'a, U, E>;

    fn into_iter(self) -> Self::IntoIter {
        self.ticks()
    }
}

#[cfg(test)]
mod tests {
    use ordered_float::NotNan;

    use super::{Direction, Entity, EntityId, SequenceError, TickSequence, TickUnit};
    use crate::interval::Interval;

    struct Vehicle {
        id: EntityId,
    }

    impl Entity for Vehicle {
        fn id(&self) -> EntityId {
            self.id
        }
    }

    fn sequence() -> TickSequence<i64, u64> {
        TickSequence::new("test", 1, (0..6).map(|unit| (unit * 2, vec![1u64]))).unwrap()
    }

    #[test]
    fn rejects_empty_sequence() {
        let result = TickSequence::<i64, u64>::new("empty", 1, Vec::<(i64, Vec<u64>)>::new());
        assert_eq!(result, Err(SequenceError::Empty { sequence: "empty".to_string() }));
    }

    #[test]
    fn rejects_non_increasing_units() {
        let result = TickSequence::new("broken", 1, [(0i64, vec![1u64]), (2, vec![1]), (2, vec![1])]);

        assert!(matches!(result, Err(SequenceError::NonIncreasing { .. })));
    }

    #[test]
    fn neighbors() {
        let sequence = sequence();
        let first = sequence.first();
        let last = sequence.last();

        assert!(first.previous().is_none());
        assert!(last.next().is_none());
        assert_eq!(first.next().map(|tick| tick.unit()), Some(2));
        assert_eq!(last.previous().map(|tick| tick.unit()), Some(8));
        assert_eq!(sequence.at_unit(6).map(|tick| tick.index()), Some(3));
        assert!(sequence.at_unit(5).is_none());
    }

    #[test]
    fn scans() {
        let sequence = sequence();
        let tick = sequence.get(2).unwrap();

        let forward: Vec<i64> = tick.scan(Direction::Forward).map(|t| t.unit()).collect();
        let backward: Vec<i64> = tick.scan(Direction::Backward).map(|t| t.unit()).collect();

        assert_eq!(forward, vec![4, 6, 8, 10]);
        assert_eq!(backward, vec![4, 2, 0]);
        assert_eq!(tick.offset(&sequence.last(), Direction::Forward), 6);
        assert_eq!(tick.offset(&sequence.first(), Direction::Backward), 4);
    }

    #[test]
    fn forward_window() {
        let sequence = sequence();
        let tick = sequence.get(1).unwrap();
        let interval = Interval::closed(2, 5).unwrap();

        let units: Vec<i64> = tick.forward(Some(&interval)).units().collect();
        assert_eq!(units, vec![4, 6]);

        let unbounded: Vec<i64> = tick.forward(None).units().collect();
        assert_eq!(unbounded, vec![2, 4, 6, 8, 10]);
    }

    #[test]
    fn backward_window() {
        let sequence = sequence();
        let tick = sequence.get(4).unwrap();
        let interval = Interval::half_open(0, 4).unwrap();

        let units: Vec<i64> = tick.backward(Some(&interval)).unwrap().units().collect();
        assert_eq!(units, vec![6, 8]);
    }

    #[test]
    fn backward_window_underflow() {
        let sequence = TickSequence::new("unsigned", 1, [(0u64, vec![1u64]), (1, vec![1])]).unwrap();
        let tick = sequence.get(1).unwrap();
        let interval = Interval::closed(2, 3).unwrap();
        let clamped = Interval::closed(0, 3).unwrap();

        assert!(tick.backward(Some(&interval)).is_none());
        assert_eq!(tick.backward(Some(&clamped)).map(|ticks| ticks.len()), Some(2));
    }

    #[test]
    fn primary_entity() {
        let sequence = TickSequence::new(
            "entities",
            7,
            [
                (0i64, vec![Vehicle { id: 7 }, Vehicle { id: 8 }]),
                (1, vec![Vehicle { id: 8 }]),
                (2, vec![Vehicle { id: 7 }, Vehicle { id: 7 }]),
            ],
        )
        .unwrap();

        assert_eq!(sequence.first().primary_entity().map(|e| e.id()), Ok(7));
        assert!(matches!(
            sequence.get(1).unwrap().primary_entity(),
            Err(SequenceError::MissingPrimaryEntity { id: 7, .. })
        ));
        assert!(matches!(
            sequence.get(2).unwrap().primary_entity(),
            Err(SequenceError::AmbiguousPrimaryEntity { count: 2, .. })
        ));
        assert!(sequence.validate().is_err());
        assert_eq!(sequence.first().entity(8).map(|e| e.id()), Some(8));
    }

    #[test]
    fn unit_arithmetic() {
        assert_eq!(5u64.since(7), -2);
        assert_eq!(TickUnit::checked_add(5u64, -2), Some(3));
        assert_eq!(TickUnit::checked_sub(5u64, 6), None);
        assert_eq!(TickUnit::checked_sub(5u64, -1), Some(6));

        let a = NotNan::new(1.5).unwrap();
        let b = NotNan::new(0.5).unwrap();
        assert_eq!(a.since(b), NotNan::new(1.0).unwrap());
        assert_eq!(TickUnit::checked_sub(a, b), Some(NotNan::new(1.0).unwrap()));

        let infinity = NotNan::new(f64::INFINITY).unwrap();
        assert_eq!(infinity.since(infinity), NotNan::new(0.0).unwrap());
        assert_eq!(infinity.since(b), infinity);
    }
}
