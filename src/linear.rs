//! Single-element weighted sampling for short streams.
//!
//! [`LinearWeightedSampler`] keeps exactly one element, chosen with
//! probability proportional to its integer weight. It draws one random number
//! per offered element (none for the first), so the cost is O(N) draws: the
//! opposite trade-off from the jump-based samplers, and the better one for
//! short streams where per-element cost matters more than draw count.
//!
//! The weight sum is accumulated in `W`; the caller must ensure the sum of
//! all offered weights fits, overflow is not checked.

use num_traits::Unsigned;
use rand::distr::uniform::SampleUniform;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// A weighted sampler that retains a single element.
#[derive(Debug, Clone)]
pub struct LinearWeightedSampler<T, W = u32, G = StdRng> {
    weight_sum: W,
    selected: Option<T>,
    rng: G,
}

impl<T> LinearWeightedSampler<T> {
    /// Create a sampler seeded from the OS.
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_os_rng())
    }
}

impl<T> Default for LinearWeightedSampler<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, W, G> LinearWeightedSampler<T, W, G>
where
    W: Copy + Unsigned + PartialOrd + SampleUniform,
    G: Rng,
{
    /// Create a sampler using the given generator (owned, or `&mut` borrowed).
    pub fn with_rng(rng: G) -> Self {
        Self {
            weight_sum: W::zero(),
            selected: None,
            rng,
        }
    }

    /// Offer a weighted item; zero weight is ignored.
    #[inline]
    pub fn sample(&mut self, item: T, weight: W) {
        self.sample_with(weight, move || item);
    }

    /// Offer a weighted item built on demand: `make` runs only if the item
    /// becomes the retained element.
    pub fn sample_with<F: FnOnce() -> T>(&mut self, weight: W, make: F) {
        if weight == W::zero() {
            return;
        }
        self.weight_sum = self.weight_sum + weight;

        if self.selected.is_none() {
            // First retained element: no draw needed, it wins outright.
            self.selected = Some(make());
        } else if self.rng.random_range(W::zero()..self.weight_sum) < weight {
            self.selected = Some(make());
        }
    }

    /// The retained element, if any positively-weighted element was offered.
    pub fn selected(&self) -> Option<&T> {
        self.selected.as_ref()
    }

    /// Sum of the weights offered so far.
    pub fn weight_sum(&self) -> W {
        self.weight_sum
    }

    /// Move the retained element out and reset to the empty state.
    pub fn take(&mut self) -> Option<T> {
        self.weight_sum = W::zero();
        self.selected.take()
    }

    /// Drop the retained element and return to the empty state.
    pub fn reset(&mut self) {
        self.weight_sum = W::zero();
        self.selected = None;
    }
}
