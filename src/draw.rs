//! Clamped unit-interval draws shared by the skip/budget arithmetic.
//!
//! Raw draws from `[0, 1)` can be exactly zero, and `u.powf(1.0 / w)` can
//! round up to exactly one for large weights. Either value would feed a later
//! `ln` with a degenerate argument, so draws are kept strictly inside (0, 1).

use num_traits::Float;
use rand::distr::{Distribution, StandardUniform};
use rand::Rng;

/// Uniform draw clamped away from zero.
#[inline]
pub(crate) fn unit_nonzero<R, G>(rng: &mut G) -> R
where
    R: Float,
    G: Rng,
    StandardUniform: Distribution<R>,
{
    rng.random::<R>().max(R::min_positive_value())
}

/// Clamp strictly below one so the logarithm stays negative.
#[inline]
pub(crate) fn below_one<R: Float>(x: R) -> R {
    x.min(R::one() - R::epsilon())
}
