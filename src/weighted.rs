//! Weighted reservoir sampling.
//!
//! Maintains a sample of size `k` from a stream in which each element carries
//! a weight; inclusion probability is proportional to weight.
//!
//! Uses **Algorithm A-ExpJ** (Efraimidis & Spirakis, 2006). Each accepted
//! element draws a key `u^(1/w)`, `u ~ Uniform(0,1)`; the reservoir keeps
//! the k largest keys, tracked by a min-heap whose root is the eviction
//! threshold. Between replacements the sampler burns down an exponentially
//! distributed *weight budget*, so it only draws random numbers
//! O(k log(N/k)) times instead of once per element.
//!
//! Elements whose weight is zero, negative, or non-finite are treated as
//! absent from the stream: they are counted as seen and nothing else changes.
//!
//! Two storage flavors mirror the uniform module: [`WeightedReservoirSampler`]
//! (runtime capacity, lazily allocated) and
//! [`InlineWeightedReservoirSampler`] (compile-time capacity, inline storage).
//!
//! ## References
//!
//! - Efraimidis & Spirakis (2006): weighted reservoir sampling (A-Res/A-ExpJ).

use num_traits::{AsPrimitive, Float};
use rand::distr::uniform::SampleUniform;
use rand::distr::{Distribution, StandardUniform};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::draw;

/// One incumbent: its key and the slot its payload lives in.
#[derive(Debug, Clone, Copy)]
struct KeyEntry<R> {
    key: R,
    slot: usize,
}

// Min-heap by key over a plain slice, so the same code serves the Vec-backed
// and the inline array-backed samplers. The root is the smallest key.

fn sift_up<R: Float>(heap: &mut [KeyEntry<R>], mut i: usize) {
    while i > 0 {
        let parent = (i - 1) / 2;
        if heap[i].key < heap[parent].key {
            heap.swap(i, parent);
            i = parent;
        } else {
            break;
        }
    }
}

fn sift_down<R: Float>(heap: &mut [KeyEntry<R>], mut i: usize) {
    loop {
        let left = 2 * i + 1;
        if left >= heap.len() {
            break;
        }
        let right = left + 1;
        let mut child = left;
        if right < heap.len() && heap[right].key < heap[left].key {
            child = right;
        }
        if heap[child].key < heap[i].key {
            heap.swap(i, child);
            i = child;
        } else {
            break;
        }
    }
}

/// A weighted reservoir sampler keeping `k` elements with probability
/// proportional to their weights.
///
/// Weights are any numeric type convertible to the key type `R` (`f32` by
/// default; use `f64` when large weight sums demand more precision).
#[derive(Debug, Clone)]
pub struct WeightedReservoirSampler<T, G = StdRng, R = f32> {
    k: usize,
    seen: usize,
    budget: R,
    rng: G,
    heap: Vec<KeyEntry<R>>,
    slots: Vec<T>,
}

impl<T> WeightedReservoirSampler<T> {
    /// Create a sampler that keeps `k` elements, seeded from the OS.
    ///
    /// # Panics
    ///
    /// Panics if `k == 0`.
    pub fn new(k: usize) -> Self {
        Self::with_rng(k, StdRng::from_os_rng())
    }
}

impl<T, G, R> WeightedReservoirSampler<T, G, R>
where
    G: Rng,
    R: Float + SampleUniform + 'static,
    StandardUniform: Distribution<R>,
{
    /// Create a sampler that keeps `k` elements, using the given generator
    /// (owned, or `&mut` borrowed).
    ///
    /// # Panics
    ///
    /// Panics if `k == 0`.
    pub fn with_rng(k: usize, rng: G) -> Self {
        assert!(k > 0, "reservoir capacity must be > 0");
        Self {
            k,
            seen: 0,
            budget: R::zero(),
            rng,
            heap: Vec::new(),
            slots: Vec::new(),
        }
    }

    /// Offer a weighted item from the stream.
    #[inline]
    pub fn sample<W: AsPrimitive<R>>(&mut self, item: T, weight: W) {
        self.sample_with(weight, move || item);
    }

    /// Offer a weighted item built on demand: `make` runs only if the item is
    /// actually placed into the reservoir.
    pub fn sample_with<W, F>(&mut self, weight: W, make: F)
    where
        W: AsPrimitive<R>,
        F: FnOnce() -> T,
    {
        self.seen += 1;
        let w: R = weight.as_();
        if !w.is_finite() || w <= R::zero() {
            return;
        }

        if self.slots.len() < self.k {
            if self.heap.capacity() == 0 {
                self.heap.reserve_exact(self.k);
                self.slots.reserve_exact(self.k);
            }
            let key = self.fresh_key(w);
            let slot = self.slots.len();
            self.slots.push(make());
            self.heap.push(KeyEntry { key, slot });
            sift_up(&mut self.heap, slot);

            if self.slots.len() == self.k {
                self.budget = self.next_budget();
            }
            return;
        }

        self.budget = self.budget - w;
        if self.budget > R::zero() {
            return;
        }

        // The budget is spent: this element replaces the weakest incumbent.
        // Its key is drawn from the truncated distribution above the old
        // threshold so marginal inclusion stays proportional to weight.
        let threshold = self.heap[0];
        let t = draw::below_one(threshold.key.powf(w));
        let u = self.rng.random_range(t..R::one()).max(R::min_positive_value());
        let key = draw::below_one(u.powf(R::one() / w));

        self.heap[0] = KeyEntry {
            key,
            slot: threshold.slot,
        };
        sift_down(&mut self.heap, 0);
        self.slots[threshold.slot] = make();

        self.budget = self.next_budget();
    }

    /// True iff offering weight `w` next would exhaust the budget and be
    /// examined. Trivially true while the reservoir is still filling, where
    /// every positively-weighted element is accepted.
    #[inline]
    pub fn will_consider_next<W: AsPrimitive<R>>(&self, weight: W) -> bool {
        self.budget - weight.as_() <= R::zero()
    }

    /// Declare that one stream element of weight `w` passed without being
    /// materialized, spending its weight from the budget.
    ///
    /// # Panics
    ///
    /// Panics if the next element of this weight would be considered; check
    /// [`will_consider_next`](Self::will_consider_next) first.
    pub fn skip_next<W: AsPrimitive<R>>(&mut self, weight: W) {
        assert!(
            !self.will_consider_next(weight),
            "skip_next: the next element would be considered"
        );
        self.seen += 1;
        let w: R = weight.as_();
        if w.is_finite() && w > R::zero() {
            self.budget = self.budget - w;
        }
    }

    /// The retained sample, at most `k` elements. Order carries no meaning.
    pub fn samples(&self) -> &[T] {
        &self.slots
    }

    /// Move the retained sample out and reset to the empty state.
    pub fn take_samples(&mut self) -> Vec<T> {
        let out = std::mem::take(&mut self.slots);
        self.heap = Vec::new();
        self.clear_state();
        out
    }

    /// Drop any retained elements and return to the empty state.
    pub fn reset(&mut self) {
        self.slots.clear();
        self.heap.clear();
        self.clear_state();
    }

    /// Make the reservoir allocations eagerly instead of on first acceptance.
    /// Idempotent.
    pub fn reserve(&mut self) {
        self.heap.reserve_exact(self.k - self.heap.len());
        self.slots.reserve_exact(self.k - self.slots.len());
    }

    /// How many items the stream has offered so far, ignored and skipped
    /// ones included.
    pub fn seen(&self) -> usize {
        self.seen
    }

    /// Number of retained elements.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// True iff no elements are retained.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// The configured reservoir capacity `k`.
    pub fn capacity(&self) -> usize {
        self.k
    }

    fn clear_state(&mut self) {
        self.seen = 0;
        self.budget = R::zero();
    }

    fn fresh_key(&mut self, w: R) -> R {
        let u: R = draw::unit_nonzero(&mut self.rng);
        draw::below_one(u.powf(R::one() / w))
    }

    /// Budget until the next replacement: ln(U) / ln(threshold key), positive
    /// because both logarithms are negative.
    fn next_budget(&mut self) -> R {
        let u: R = draw::unit_nonzero(&mut self.rng);
        u.ln() / self.heap[0].key.ln()
    }
}

/// [`WeightedReservoirSampler`] with the capacity fixed at compile time; the
/// heap and the element slots live inline, so the sampler itself never
/// touches the heap allocator.
#[derive(Debug, Clone)]
pub struct InlineWeightedReservoirSampler<T, const K: usize, G = StdRng, R = f32> {
    seen: usize,
    filled: usize,
    budget: R,
    rng: G,
    heap: [KeyEntry<R>; K],
    slots: [Option<T>; K],
}

impl<T, const K: usize> InlineWeightedReservoirSampler<T, K> {
    /// Create a sampler seeded from the OS.
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_os_rng())
    }
}

impl<T, const K: usize> Default for InlineWeightedReservoirSampler<T, K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, const K: usize, G, R> InlineWeightedReservoirSampler<T, K, G, R>
where
    G: Rng,
    R: Float + SampleUniform + 'static,
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
            budget: R::zero(),
            rng,
            heap: [KeyEntry {
                key: R::zero(),
                slot: 0,
            }; K],
            slots: std::array::from_fn(|_| None),
        }
    }

    /// Offer a weighted item from the stream.
    #[inline]
    pub fn sample<W: AsPrimitive<R>>(&mut self, item: T, weight: W) {
        self.sample_with(weight, move || item);
    }

    /// Offer a weighted item built on demand: `make` runs only if the item is
    /// actually placed into the reservoir.
    pub fn sample_with<W, F>(&mut self, weight: W, make: F)
    where
        W: AsPrimitive<R>,
        F: FnOnce() -> T,
    {
        self.seen += 1;
        let w: R = weight.as_();
        if !w.is_finite() || w <= R::zero() {
            return;
        }

        if self.filled < K {
            let key = self.fresh_key(w);
            let slot = self.filled;
            self.slots[slot] = Some(make());
            self.heap[slot] = KeyEntry { key, slot };
            sift_up(&mut self.heap[..slot + 1], slot);
            self.filled += 1;

            if self.filled == K {
                self.budget = self.next_budget();
            }
            return;
        }

        self.budget = self.budget - w;
        if self.budget > R::zero() {
            return;
        }

        let threshold = self.heap[0];
        let t = draw::below_one(threshold.key.powf(w));
        let u = self.rng.random_range(t..R::one()).max(R::min_positive_value());
        let key = draw::below_one(u.powf(R::one() / w));

        self.heap[0] = KeyEntry {
            key,
            slot: threshold.slot,
        };
        sift_down(&mut self.heap[..K], 0);
        self.slots[threshold.slot] = Some(make());

        self.budget = self.next_budget();
    }

    /// True iff offering weight `w` next would exhaust the budget and be
    /// examined. Trivially true while the reservoir is still filling.
    #[inline]
    pub fn will_consider_next<W: AsPrimitive<R>>(&self, weight: W) -> bool {
        self.budget - weight.as_() <= R::zero()
    }

    /// Declare that one stream element of weight `w` passed without being
    /// materialized, spending its weight from the budget.
    ///
    /// # Panics
    ///
    /// Panics if the next element of this weight would be considered.
    pub fn skip_next<W: AsPrimitive<R>>(&mut self, weight: W) {
        assert!(
            !self.will_consider_next(weight),
            "skip_next: the next element would be considered"
        );
        self.seen += 1;
        let w: R = weight.as_();
        if w.is_finite() && w > R::zero() {
            self.budget = self.budget - w;
        }
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

    /// How many items the stream has offered so far, ignored and skipped
    /// ones included.
    pub fn seen(&self) -> usize {
        self.seen
    }

    /// Number of retained elements.
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
        self.budget = R::zero();
    }

    fn fresh_key(&mut self, w: R) -> R {
        let u: R = draw::unit_nonzero(&mut self.rng);
        draw::below_one(u.powf(R::one() / w))
    }

    fn next_budget(&mut self) -> R {
        let u: R = draw::unit_nonzero(&mut self.rng);
        u.ln() / self.heap[0].key.ln()
    }
}
