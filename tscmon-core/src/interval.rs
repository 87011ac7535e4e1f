//! Bounded windows of tick differences used by the temporal operators.
//!
//! An [`Interval`] constrains how far (in tick differences, not in tick counts) a temporal
//! operator may look from the tick it is evaluated at. Each endpoint can either be open or closed,
//! and an interval can be constructed from the standard range types.
//!
//! ```rust
//! use tscmon::interval::Interval;
//!
//! let closed = Interval::closed(1, 3).unwrap();      // [1,3]
//! let half_open = Interval::try_from(0..5).unwrap(); // [0,5)
//! let inclusive = Interval::try_from(2..=2).unwrap(); // [2,2]
//!
//! assert!(Interval::closed(3, 1).is_err());
//! ```
use std::fmt::{Debug, Display, Formatter};
use std::ops::{Bound, RangeBounds};

use thiserror::Error;

use crate::sequence::TickDifference;

/// One side of an [`Interval`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint<D> {
    Open(D),
    Closed(D),
}

impl<D> Endpoint<D>
where
    D: Copy,
{
    /// The difference value of the endpoint, regardless of whether it is open or closed.
    pub fn value(&self) -> D {
        match self {
            Self::Open(value) => *value,
            Self::Closed(value) => *value,
        }
    }

    pub(crate) fn map<F, T>(self, f: F) -> Option<Endpoint<T>>
    where
        F: Fn(D) -> Option<T>,
    {
        match self {
            Self::Open(value) => f(value).map(Endpoint::Open),
            Self::Closed(value) => f(value).map(Endpoint::Closed),
        }
    }
}

impl<D> From<Endpoint<D>> for Bound<D> {
    fn from(endpoint: Endpoint<D>) -> Self {
        match endpoint {
            Endpoint::Open(value) => Bound::Excluded(value),
            Endpoint::Closed(value) => Bound::Included(value),
        }
    }
}

/// Error produced when constructing an interval whose end lies before its start.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntervalError {
    #[error("Interval end {end} lies before its start {start}")]
    Reversed { start: String, end: String },
}

/// A window of tick differences `[a, b]`, where either endpoint may be open.
///
/// See the [`interval`](self) module for more information.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval<D> {
    start: Endpoint<D>,
    end: Endpoint<D>,
}

impl<D> Interval<D>
where
    D: TickDifference,
{
    /// Create an interval from two endpoints.
    ///
    /// Fails if the value of the end endpoint is smaller than the value of the start endpoint.
    pub fn new(start: Endpoint<D>, end: Endpoint<D>) -> Result<Self, IntervalError> {
        if end.value() < start.value() {
            return Err(IntervalError::Reversed {
                start: format!("{:?}", start.value()),
                end: format!("{:?}", end.value()),
            });
        }

        Ok(Self { start, end })
    }

    /// Create the interval `[start, end]`.
    pub fn closed(start: D, end: D) -> Result<Self, IntervalError> {
        Self::new(Endpoint::Closed(start), Endpoint::Closed(end))
    }

    /// Create the interval `[start, end)`.
    pub fn half_open(start: D, end: D) -> Result<Self, IntervalError> {
        Self::new(Endpoint::Closed(start), Endpoint::Open(end))
    }

    /// Create the interval `(start, end)`.
    pub fn open(start: D, end: D) -> Result<Self, IntervalError> {
        Self::new(Endpoint::Open(start), Endpoint::Open(end))
    }

    pub fn start(&self) -> Endpoint<D> {
        self.start
    }

    pub fn end(&self) -> Endpoint<D> {
        self.end
    }

    /// Determine if an offset lies before the start of the interval.
    pub fn is_before(&self, offset: D) -> bool {
        match self.start {
            Endpoint::Open(start) => offset <= start,
            Endpoint::Closed(start) => offset < start,
        }
    }

    /// Determine if an offset lies after the end of the interval.
    pub fn is_after(&self, offset: D) -> bool {
        match self.end {
            Endpoint::Open(end) => offset >= end,
            Endpoint::Closed(end) => offset > end,
        }
    }

    /// Determine if an offset lies within the interval.
    pub fn includes(&self, offset: D) -> bool {
        !self.is_before(offset) && !self.is_after(offset)
    }
}

impl<D> RangeBounds<D> for Interval<D> {
    fn start_bound(&self) -> Bound<&D> {
        match &self.start {
            Endpoint::Open(start) => Bound::Excluded(start),
            Endpoint::Closed(start) => Bound::Included(start),
        }
    }

    fn end_bound(&self) -> Bound<&D> {
        match &self.end {
            Endpoint::Open(end) => Bound::Excluded(end),
            Endpoint::Closed(end) => Bound::Included(end),
        }
    }
}

impl<D> Display for Interval<D>
where
    D: Copy + Debug,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let opening = match &self.start {
            Endpoint::Open(_) => '(',
            Endpoint::Closed(_) => '[',
        };

        let closing = match &self.end {
            Endpoint::Open(_) => ')',
            Endpoint::Closed(_) => ']',
        };

        write!(f, "{}{:?},{:?}{}", opening, self.start.value(), self.end.value(), closing)
    }
}

impl<D> TryFrom<std::ops::Range<D>> for Interval<D>
where
    D: TickDifference,
{
    type Error = IntervalError;

    fn try_from(std::ops::Range { start, end }: std::ops::Range<D>) -> Result<Self, Self::Error> {
        Self::half_open(start, end)
    }
}

impl<D> TryFrom<std::ops::RangeInclusive<D>> for Interval<D>
where
    D: TickDifference,
{
    type Error = IntervalError;

    fn try_from(range: std::ops::RangeInclusive<D>) -> Result<Self, Self::Error> {
        let (start, end) = range.into_inner();
        Self::closed(start, end)
    }
}

/// Determine if an offset lies within an optional interval. An absent interval is unconstrained.
pub(crate) fn includes<D>(interval: &Option<Interval<D>>, offset: D) -> bool
where
    D: TickDifference,
{
    interval.as_ref().map_or(true, |interval| interval.includes(offset))
}

#[cfg(test)]
mod tests {
    use super::{Endpoint, Interval, IntervalError};

    #[test]
    fn reversed_interval() {
        let result = Interval::closed(5i64, 2);

        assert_eq!(
            result,
            Err(IntervalError::Reversed {
                start: "5".to_string(),
                end: "2".to_string()
            })
        );
    }

    #[test]
    fn containment() -> Result<(), IntervalError> {
        let closed = Interval::closed(1i64, 3)?;
        let open = Interval::open(1i64, 3)?;

        assert!(closed.is_before(0));
        assert!(closed.includes(1));
        assert!(closed.includes(3));
        assert!(closed.is_after(4));

        assert!(open.is_before(1));
        assert!(open.includes(2));
        assert!(open.is_after(3));

        Ok(())
    }

    #[test]
    fn from_ranges() -> Result<(), IntervalError> {
        let half_open = Interval::try_from(0i64..4)?;
        let inclusive = Interval::try_from(0i64..=4)?;

        assert_eq!(half_open.end(), Endpoint::Open(4));
        assert_eq!(inclusive.end(), Endpoint::Closed(4));
        assert_eq!(half_open.to_string(), "[0,4)");
        assert_eq!(inclusive.to_string(), "[0,4]");

        Ok(())
    }

    #[test]
    fn degenerate_interval() -> Result<(), IntervalError> {
        let point = Interval::closed(2i64, 2)?;

        assert!(point.includes(2));
        assert!(!point.includes(1));
        assert!(!point.includes(3));

        Ok(())
    }
}
