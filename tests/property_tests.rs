use std::collections::HashMap;

use ikesu::{
    InlineReservoirSampler, InlineWeightedReservoirSampler, LinearWeightedSampler,
    ReservoirSampler, WeightedReservoirSampler,
};
use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn count_multiset<T: std::hash::Hash + Eq>(items: impl IntoIterator<Item = T>) -> HashMap<T, usize> {
    let mut counts = HashMap::new();
    for item in items {
        *counts.entry(item).or_insert(0) += 1;
    }
    counts
}

proptest! {
    #[test]
    fn prop_uniform_size_invariant(
        k in 1usize..20,
        items in prop::collection::vec(0u32..1000, 0..50)
    ) {
        let mut s = ReservoirSampler::new(k);
        for &item in &items {
            s.sample(item);
        }

        let n = items.len();
        prop_assert_eq!(s.samples().len(), std::cmp::min(n, k));
        prop_assert_eq!(s.seen(), n);
    }

    #[test]
    fn prop_uniform_retained_is_sub_multiset_of_offered(
        k in 1usize..10,
        seed in 0u64..1000,
        items in prop::collection::vec(0u32..8, 0..60)
    ) {
        let mut s: ReservoirSampler<u32, ChaCha8Rng> =
            ReservoirSampler::with_rng(k, ChaCha8Rng::seed_from_u64(seed));
        for &item in &items {
            s.sample(item);
        }

        let offered = count_multiset(items.iter().copied());
        let retained = count_multiset(s.samples().iter().copied());
        for (item, count) in retained {
            prop_assert!(
                offered.get(&item).is_some_and(|&have| count <= have),
                "retained {item} more often than offered"
            );
        }
    }

    #[test]
    fn prop_uniform_skip_protocol_counts_stream(
        seed in 0u64..1000,
        n in 0usize..300
    ) {
        let mut s: ReservoirSampler<usize, ChaCha8Rng> =
            ReservoirSampler::with_rng(5, ChaCha8Rng::seed_from_u64(seed));
        for i in 0..n {
            if s.will_consider_next() {
                s.sample(i);
            } else {
                s.skip_next();
            }
        }
        prop_assert_eq!(s.seen(), n);
        prop_assert_eq!(s.samples().len(), std::cmp::min(n, 5));
    }

    #[test]
    fn prop_inline_uniform_size_invariant(
        items in prop::collection::vec(0u32..1000, 0..50)
    ) {
        let mut s = InlineReservoirSampler::<u32, 7>::new();
        for &item in &items {
            s.sample(item);
        }

        let n = items.len();
        prop_assert_eq!(s.len(), std::cmp::min(n, 7));
        prop_assert_eq!(s.samples().count(), std::cmp::min(n, 7));
        prop_assert_eq!(s.seen(), n);
    }

    #[test]
    fn prop_weighted_size_counts_positive_weights(
        k in 1usize..20,
        items in prop::collection::vec((0u32..1000, 0.0f32..5.0), 0..50)
    ) {
        let mut s = WeightedReservoirSampler::new(k);
        for &(item, weight) in &items {
            s.sample(item, weight);
        }

        let n_positive = items.iter().filter(|&&(_, w)| w > 0.0).count();
        prop_assert_eq!(s.samples().len(), std::cmp::min(n_positive, k));
        prop_assert_eq!(s.seen(), items.len());
    }

    #[test]
    fn prop_weighted_retained_is_sub_multiset_of_offered(
        k in 1usize..10,
        seed in 0u64..1000,
        items in prop::collection::vec((0u32..8, 0.1f32..5.0), 0..60)
    ) {
        let mut s: WeightedReservoirSampler<u32, ChaCha8Rng> =
            WeightedReservoirSampler::with_rng(k, ChaCha8Rng::seed_from_u64(seed));
        for &(item, weight) in &items {
            s.sample(item, weight);
        }

        let offered = count_multiset(items.iter().map(|&(item, _)| item));
        let retained = count_multiset(s.samples().iter().copied());
        for (item, count) in retained {
            prop_assert!(
                offered.get(&item).is_some_and(|&have| count <= have),
                "retained {item} more often than offered"
            );
        }
    }

    #[test]
    fn prop_inline_weighted_size_counts_positive_weights(
        items in prop::collection::vec((0u32..1000, 0.0f32..5.0), 0..50)
    ) {
        let mut s = InlineWeightedReservoirSampler::<u32, 7>::new();
        for &(item, weight) in &items {
            s.sample(item, weight);
        }

        let n_positive = items.iter().filter(|&&(_, w)| w > 0.0).count();
        prop_assert_eq!(s.len(), std::cmp::min(n_positive, 7));
        prop_assert_eq!(s.seen(), items.len());
    }

    #[test]
    fn prop_linear_selects_iff_any_positive_weight(
        items in prop::collection::vec((0u32..1000, 0u32..5), 0..50)
    ) {
        let mut s = LinearWeightedSampler::new();
        for &(item, weight) in &items {
            s.sample(item, weight);
        }

        let any_positive = items.iter().any(|&(_, w)| w > 0);
        prop_assert_eq!(s.selected().is_some(), any_positive);

        let total: u32 = items.iter().map(|&(_, w)| w).sum();
        prop_assert_eq!(s.weight_sum(), total);

        if let Some(&picked) = s.selected() {
            prop_assert!(items.iter().any(|&(item, w)| item == picked && w > 0));
        }
    }

    #[test]
    fn prop_reset_allows_reuse(
        k in 1usize..10,
        seed in 0u64..1000,
        first in prop::collection::vec(0u32..1000, 0..40),
        second in prop::collection::vec(0u32..1000, 0..40)
    ) {
        let mut s: ReservoirSampler<u32, ChaCha8Rng> =
            ReservoirSampler::with_rng(k, ChaCha8Rng::seed_from_u64(seed));
        for &item in &first {
            s.sample(item);
        }
        s.reset();
        prop_assert!(s.is_empty());
        prop_assert_eq!(s.seen(), 0);

        for &item in &second {
            s.sample(item);
        }
        prop_assert_eq!(s.samples().len(), std::cmp::min(second.len(), k));
        prop_assert_eq!(s.seen(), second.len());
    }
}
