//! # Bounded random perturbation of a nominal delay.
//!
//! [`jitter`] spreads tick intervals so that many polls against the same
//! backend do not fire in lockstep. The perturbation is symmetric: a random
//! direction, a random magnitude up to `base * factor`, then rounding to
//! whole milliseconds and a clamp into `[min, max]`.
//!
//! The clamp is the contract callers rely on: whatever `base` and `factor`
//! are, the result lies in `[min, max]`. A zero `factor` skips the random
//! draws entirely, which keeps timing exact for tests and debugging.

use std::time::Duration;

use rand::{Rng, RngCore};

/// Applies symmetric jitter to `base` and clamps the result to `[min, max]`.
///
/// - `factor == 0.0` returns `base` rounded to whole milliseconds, clamped.
/// - Otherwise draws a direction in `{-1, +1}` and a magnitude in
///   `[0, base * |factor|)`, rounds, takes the absolute value, and clamps.
///
/// The absolute value guarantees non-negativity when the perturbation
/// drives the candidate below zero; the clamp bounds everything else.
pub fn jitter(
    base: Duration,
    factor: f64,
    min: Duration,
    max: Duration,
    rng: &mut dyn RngCore,
) -> Duration {
    let base_ms = as_millis(base) as f64;
    let candidate = if factor == 0.0 {
        base_ms.round()
    } else {
        let direction = if rng.random::<bool>() { 1.0 } else { -1.0 };
        let delta = rng.random::<f64>() * base_ms * factor.abs() * direction;
        (base_ms + delta).round().abs()
    };
    let clamped = (candidate as u64).clamp(as_millis(min), as_millis(max));
    Duration::from_millis(clamped)
}

fn as_millis(d: Duration) -> u64 {
    d.as_millis().min(u128::from(u64::MAX)) as u64
}
