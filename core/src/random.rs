//! Bounded random helpers used by generation and actors.
//!
//! Both helpers draw from an injected [`Rng`] so callers decide between a
//! seeded stream (replays, tests) and anything else. Neither panics on
//! degenerate ranges.

use rand::Rng;

/// Uniform value in `[0, max)`. Non-positive or non-finite `max` yields `0`.
pub fn random<R: Rng + ?Sized>(rng: &mut R, max: f32) -> f32 {
    if !(max.is_finite() && max > 0.0) {
        return 0.0;
    }
    rng.gen::<f32>() * max
}

/// Integer in `[ceil(min), floor(max))`. Empty ranges yield `ceil(min)`.
pub fn random_int<R: Rng + ?Sized>(rng: &mut R, min: f32, max: f32) -> i32 {
    let low = min.ceil() as i32;
    let high = max.floor() as i32;
    if high <= low {
        return low;
    }
    rng.gen_range(low..high)
}

/// Returns `true` with the given probability.
pub fn chance<R: Rng + ?Sized>(rng: &mut R, probability: f32) -> bool {
    random(rng, 1.0) < probability
}
