//! Uniform reservoir sampling.
//!
//! Keeps a fixed-size uniform sample over a stream whose length is unknown
//! until it ends.
//!
//! The samplers implement **Algorithm L** (Li, 1994): once the reservoir is
//! full, a geometrically distributed counter says how many upcoming elements
//! lose outright, so randomness is spent only when a replacement actually
//! happens, for O(k * (1 + log(N/k))) draws in total rather than one per
//! element.
//!
//! Two storage flavors are provided:
//!
//! - [`ReservoirSampler`]: capacity chosen at runtime, reservoir kept in a
//!   single lazily-made heap allocation.
//! - [`InlineReservoirSampler`]: capacity fixed at compile time, reservoir
//!   stored inline with the sampler, no heap allocation of its own.
//!
//! ## References
//!
//! - Vitter (1985): reservoir sampling “Algorithm R”.
//! - Li (1994): reservoir sampling “Algorithm L” (skip-based).
//!
//! Notes:
//! - Samplers own their generator; pass `&mut rng` to share a caller-owned one.
//! - The skip counter is exposed (`skips_remaining`, `skip_next`,
//!   `jump_ahead`) so callers iterating a cheap cursor can decline to
//!   materialize elements the sampler would discard anyway.

use num_traits::{AsPrimitive, Float};
use rand::distr::{Distribution, StandardUniform};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::draw;

/// Uniform sampler holding up to `k` stream elements, chosen by Algorithm L.
///
/// `G` is the owned random generator; `R` is the floating-point type used for
/// the skip arithmetic (`f32` by default, use `f64` for very large streams).
#[derive(Debug, Clone)]
pub struct ReservoirSampler<T, G = StdRng, R = f32> {
    k: usize,
    seen: usize,
    samples: Vec<T>,
    skip: usize,
    w: R,
    rng: G,
}

impl<T> ReservoirSampler<T> {
    /// Create a sampler that keeps `k` samples, seeded from the OS.
    ///
    /// # Panics
    ///
    /// Panics if `k == 0`.
    pub fn new(k: usize) -> Self {
        Self::with_rng(k, StdRng::from_os_rng())
    }
}

impl<T, G, R> ReservoirSampler<T, G, R>
where
    G: Rng,
    R: Float + 'static,
    usize: AsPrimitive<R>,
    StandardUniform: Distribution<R>,
{
    /// Create a sampler that keeps `k` samples, using the given generator.
    ///
    /// The generator is stored by value; `&mut G` implements `Rng`, so a
    /// caller-owned generator can be lent instead of moved.
    ///
    /// # Panics
    ///
    /// Panics if `k == 0`.
    pub fn with_rng(k: usize, rng: G) -> Self {
        assert!(k > 0, "reservoir capacity must be > 0");
        Self {
            k,
            seen: 0,
            samples: Vec::new(),
            skip: 0,
            w: R::zero(),
            rng,
        }
    }

    /// Offer an item from the stream.
    #[inline]
    pub fn sample(&mut self, item: T) {
        self.sample_with(move || item);
    }

    /// Offer an item built on demand: `make` runs only if the item is
    /// actually placed into the reservoir.
    pub fn sample_with<F: FnOnce() -> T>(&mut self, make: F) {
        self.seen += 1;

        // Phase 1: filling the reservoir.
        if self.samples.len() < self.k {
            if self.samples.capacity() == 0 {
                self.samples.reserve_exact(self.k);
            }
            self.samples.push(make());

            if self.samples.len() == self.k {
                self.w = Self::clamp_weight(self.weight_factor());
                self.update_skip();
            }
            return;
        }

        // Phase 2: skip items until the counter runs out.
        if self.skip > 0 {
            self.skip -= 1;
            return;
        }

        // Replace a uniformly chosen incumbent, then schedule the next stop.
        let pos = self.rng.random_range(0..self.k);
        self.samples[pos] = make();

        self.w = Self::clamp_weight(self.w * self.weight_factor());
        self.update_skip();
    }

    /// True iff the next [`sample`](Self::sample) call will examine its
    /// element (always true while the reservoir is still filling).
    #[inline]
    pub fn will_consider_next(&self) -> bool {
        self.skip == 0
    }

    /// Declare that one stream element passed without being materialized.
    ///
    /// # Panics
    ///
    /// Panics if the next element would be considered; check
    /// [`will_consider_next`](Self::will_consider_next) first.
    pub fn skip_next(&mut self) {
        assert!(
            !self.will_consider_next(),
            "skip_next: the next element would be considered"
        );
        self.skip -= 1;
        self.seen += 1;
    }

    /// Number of upcoming elements that will be discarded unexamined.
    #[inline]
    pub fn skips_remaining(&self) -> usize {
        self.skip
    }

    /// Advance past `n` elements in one step.
    ///
    /// # Panics
    ///
    /// Panics if `n > self.skips_remaining()`.
    pub fn jump_ahead(&mut self, n: usize) {
        assert!(
            n <= self.skip,
            "jump_ahead: cannot jump past the next considered element"
        );
        self.skip -= n;
        self.seen += n;
    }

    /// The retained sample, at most `k` elements. Order carries no meaning.
    pub fn samples(&self) -> &[T] {
        &self.samples
    }

    /// Move the retained sample out and reset to the empty state.
    pub fn take_samples(&mut self) -> Vec<T> {
        let out = std::mem::take(&mut self.samples);
        self.clear_state();
        out
    }

    /// Drop any retained elements and return to the empty state.
    pub fn reset(&mut self) {
        self.samples.clear();
        self.clear_state();
    }

    /// Make the reservoir allocation eagerly instead of on first acceptance.
    /// Idempotent.
    pub fn reserve(&mut self) {
        let need = self.k - self.samples.len();
        self.samples.reserve_exact(need);
    }

    /// How many items the stream has offered so far, skipped ones included.
    pub fn seen(&self) -> usize {
        self.seen
    }

    /// Number of retained elements, `min(seen, k)`.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// True iff no elements are retained.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// The configured reservoir capacity `k`.
    pub fn capacity(&self) -> usize {
        self.k
    }

    fn clear_state(&mut self) {
        self.seen = 0;
        self.skip = 0;
        self.w = R::zero();
    }

    fn weight_factor(&mut self) -> R {
        let u: R = draw::unit_nonzero(&mut self.rng);
        (u.ln() / self.k.as_()).exp()
    }

    // Keep w inside [ε, 1-ε]: at either end 1-w collapses in float math and
    // the skip formula divides by ln(1) = 0.
    fn clamp_weight(w: R) -> R {
        draw::below_one(w.max(R::epsilon()))
    }

    /// Skip counts follow Li's formula: S = floor(ln U / ln(1 - w)).
    fn update_skip(&mut self) {
        let u: R = draw::unit_nonzero(&mut self.rng);
        let denom = (R::one() - self.w).max(R::min_positive_value()).ln();
        self.skip = (u.ln() / denom).floor().to_usize().unwrap_or(usize::MAX);
    }
}

/// [`ReservoirSampler`] with the capacity fixed at compile time and the
/// reservoir stored inline; the sampler itself never touches the heap.
#[derive(Debug, Clone)]
pub struct InlineReservoirSampler<T, const K: usize, G = StdRng, R = f32> {
    seen: usize,
    filled: usize,
    skip: usize,
    w: R,
    rng: G,
    slots: [Option<T>; K],
}

impl<T, const K: usize> InlineReservoirSampler<T, K> {
    /// Create a sampler seeded from the OS.
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_os_rng())
    }
}

impl<T, const K: usize> Default for InlineReservoirSampler<T, K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, const K: usize, G, R> InlineReservoirSampler<T, K, G, R>
where
    G: Rng,
    R: Float + 'static,
    usize: AsPrimitive<R>,
    StandardUniform: Distribution<R>,
{
    const CAPACITY_NONZERO: () = assert!(K > 0, "reservoir capacity must be > 0");

    /// Create a sampler using the given generator (owned, or `&mut` borrowed).
    ///
    /// `K == 0` fails to compile.
    pub fn with_rng(rng: G) -> Self {
        let () = Self::CAPACITY_NONZERO;
        Self {
            seen: 0,
            filled: 0,
            skip: 0,
            w: R::zero(),
            rng,
            slots: std::array::from_fn(|_| None),
        }
    }

    /// Offer an item from the stream.
    #[inline]
    pub fn sample(&mut self, item: T) {
        self.sample_with(move || item);
    }

    /// Offer an item built on demand: `make` runs only if the item is
    /// actually placed into the reservoir.
    pub fn sample_with<F: FnOnce() -> T>(&mut self, make: F) {
        self.seen += 1;

        if self.filled < K {
            self.slots[self.filled] = Some(make());
            self.filled += 1;

            if self.filled == K {
                self.w = Self::clamp_weight(self.weight_factor());
                self.update_skip();
            }
            return;
        }

        if self.skip > 0 {
            self.skip -= 1;
            return;
        }

        let pos = self.rng.random_range(0..K);
        self.slots[pos] = Some(make());

        self.w = Self::clamp_weight(self.w * self.weight_factor());
        self.update_skip();
    }

    /// True iff the next [`sample`](Self::sample) call will examine its
    /// element.
    #[inline]
    pub fn will_consider_next(&self) -> bool {
        self.skip == 0
    }

    /// Declare that one stream element passed without being materialized.
    ///
    /// # Panics
    ///
    /// Panics if the next element would be considered.
    pub fn skip_next(&mut self) {
        assert!(
            !self.will_consider_next(),
            "skip_next: the next element would be considered"
        );
        self.skip -= 1;
        self.seen += 1;
    }

    /// Number of upcoming elements that will be discarded unexamined.
    #[inline]
    pub fn skips_remaining(&self) -> usize {
        self.skip
    }

    /// Advance past `n` elements in one step.
    ///
    /// # Panics
    ///
    /// Panics if `n > self.skips_remaining()`.
    pub fn jump_ahead(&mut self, n: usize) {
        assert!(
            n <= self.skip,
            "jump_ahead: cannot jump past the next considered element"
        );
        self.skip -= n;
        self.seen += n;
    }

    /// Iterate the current sample (size ≤ K), in no meaningful order.
    pub fn samples(&self) -> impl Iterator<Item = &T> {
        self.slots[..self.filled].iter().flatten()
    }

    /// Move the retained sample out and reset to the empty state.
    pub fn take_samples(&mut self) -> Vec<T> {
        let out = self.slots[..self.filled]
            .iter_mut()
            .filter_map(Option::take)
            .collect();
        self.filled = 0;
        self.clear_state();
        out
    }

    /// Drop any retained elements and return to the empty state.
    pub fn reset(&mut self) {
        for slot in &mut self.slots[..self.filled] {
            *slot = None;
        }
        self.filled = 0;
        self.clear_state();
    }

    /// How many items the stream has offered so far, skipped ones included.
    pub fn seen(&self) -> usize {
        self.seen
    }

    /// Number of retained elements, `min(seen, K)`.
    pub fn len(&self) -> usize {
        self.filled
    }

    /// True iff no elements are retained.
    pub fn is_empty(&self) -> bool {
        self.filled == 0
    }

    /// The compile-time reservoir capacity `K`.
    pub const fn capacity(&self) -> usize {
        K
    }

    fn clear_state(&mut self) {
        self.seen = 0;
        self.skip = 0;
        self.w = R::zero();
    }

    fn weight_factor(&mut self) -> R {
        let u: R = draw::unit_nonzero(&mut self.rng);
        (u.ln() / K.as_()).exp()
    }

    fn clamp_weight(w: R) -> R {
        draw::below_one(w.max(R::epsilon()))
    }

    fn update_skip(&mut self) {
        let u: R = draw::unit_nonzero(&mut self.rng);
        let denom = (R::one() - self.w).max(R::min_positive_value()).ln();
        self.skip = (u.ln() / denom).floor().to_usize().unwrap_or(usize::MAX);
    }
}
