use crate::interval::Interval;
use crate::sequence::{Tick, TickUnit, Ticks};

use super::OperatorError;

fn check_fraction(fraction: f64) -> Result<f64, OperatorError> {
    if (0.0..=1.0).contains(&fraction) {
        Ok(fraction)
    } else {
        Err(OperatorError::InvalidFraction(fraction))
    }
}

fn prevalence<'a, U, E, F>(window: Ticks<'a, U, E>, fraction: f64, phi: F) -> bool
where
    F: Fn(Tick<'a, U, E>) -> bool,
{
    let total = window.len();
    let true_count = window.filter(|tick| phi(*tick)).count();

    true_count as f64 >= fraction * total as f64
}

fn backward_window<'a, U, E>(
    tick: Tick<'a, U, E>,
    interval: &Option<Interval<U::Difference>>,
) -> Result<Ticks<'a, U, E>, OperatorError>
where
    U: TickUnit,
{
    tick.backward(interval.as_ref())
        .ok_or_else(|| OperatorError::WindowUnderflow {
            unit: format!("{:?}", tick.unit()),
            interval: interval.as_ref().map_or_else(String::new, ToString::to_string),
        })
}

/// Prevalence operator that requires its sub-formula to hold for at least `fraction` of the ticks
/// in the forward window `[unit + a, unit + b]`.
///
/// The fraction must lie in `[0, 1]`. An empty window trivially satisfies the operator.
///
/// | unit | phi   |
/// | ---- | ----- |
/// |    0 | true  |
/// |    1 | false |
/// |    2 | true  |
/// |    3 | true  |
///
/// For the table above `min_prevalence(0, 0.75, None, phi)` holds, while
/// `min_prevalence(0, 0.8, None, phi)` does not.
pub fn min_prevalence<'a, U, E, F>(
    tick: Tick<'a, U, E>,
    fraction: f64,
    interval: Option<Interval<U::Difference>>,
    phi: F,
) -> Result<bool, OperatorError>
where
    U: TickUnit,
    F: Fn(Tick<'a, U, E>) -> bool,
{
    let fraction = check_fraction(fraction)?;
    Ok(prevalence(tick.forward(interval.as_ref()), fraction, phi))
}

/// Prevalence operator that requires its sub-formula to hold for at most `fraction` of the ticks in
/// the forward window, equivalent to `min_prevalence(1 - fraction, !phi)`.
pub fn max_prevalence<'a, U, E, F>(
    tick: Tick<'a, U, E>,
    fraction: f64,
    interval: Option<Interval<U::Difference>>,
    phi: F,
) -> Result<bool, OperatorError>
where
    U: TickUnit,
    F: Fn(Tick<'a, U, E>) -> bool,
{
    let fraction = check_fraction(fraction)?;
    min_prevalence(tick, 1.0 - fraction, interval, |t| !phi(t))
}

/// Past prevalence operator that requires its sub-formula to have held for at least `fraction` of
/// the ticks in the backward window `[unit - b, unit - a]`.
///
/// Fails with [`OperatorError::WindowUnderflow`] if `unit - a` is not representable, which means
/// there is not enough history before the current tick to form the window.
pub fn past_min_prevalence<'a, U, E, F>(
    tick: Tick<'a, U, E>,
    fraction: f64,
    interval: Option<Interval<U::Difference>>,
    phi: F,
) -> Result<bool, OperatorError>
where
    U: TickUnit,
    F: Fn(Tick<'a, U, E>) -> bool,
{
    let fraction = check_fraction(fraction)?;
    let window = backward_window(tick, &interval)?;

    Ok(prevalence(window, fraction, phi))
}

/// Past prevalence operator that requires its sub-formula to have held for at most `fraction` of
/// the ticks in the backward window, equivalent to `past_min_prevalence(1 - fraction, !phi)`.
pub fn past_max_prevalence<'a, U, E, F>(
    tick: Tick<'a, U, E>,
    fraction: f64,
    interval: Option<Interval<U::Difference>>,
    phi: F,
) -> Result<bool, OperatorError>
where
    U: TickUnit,
    F: Fn(Tick<'a, U, E>) -> bool,
{
    let fraction = check_fraction(fraction)?;
    past_min_prevalence(tick, 1.0 - fraction, interval, |t| !phi(t))
}
