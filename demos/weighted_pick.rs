//! Weighted candidate selection two ways: an A-ExpJ reservoir for a top-k
//! style pick, and the linear single-slot sampler for a one-winner draw.
//!
//! Candidate weights follow a power-law decay, so most of the probability
//! mass sits in the first handful of indices while a long thin tail still
//! gets the occasional pick, the typical profile of scored retrieval
//! candidates.

use ikesu::{LinearWeightedSampler, WeightedReservoirSampler};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn main() {
    let weights: Vec<f64> = (0..50)
        .map(|i| 1.0 / (1.0 + (i as f64)).powf(1.3))
        .collect();

    let k = 10usize;

    let mut reservoir: WeightedReservoirSampler<usize, ChaCha8Rng, f64> =
        WeightedReservoirSampler::with_rng(k, ChaCha8Rng::seed_from_u64(7));
    for (i, &w) in weights.iter().enumerate() {
        reservoir.sample(i, w);
    }
    let mut picked: Vec<usize> = reservoir.samples().to_vec();
    picked.sort_unstable();

    let mut single: LinearWeightedSampler<usize, u32, ChaCha8Rng> =
        LinearWeightedSampler::with_rng(ChaCha8Rng::seed_from_u64(7));
    for (i, &w) in weights.iter().enumerate() {
        // The linear sampler wants integer weights; scale to thousandths.
        single.sample(i, (w * 1000.0) as u32);
    }

    println!("weights[0..10]:");
    for (i, w) in weights.iter().take(10).enumerate() {
        println!("  i={i:2}  w={w:.6}");
    }
    println!();
    println!("weighted reservoir (A-ExpJ, k={k}) indices: {picked:?}");
    println!(
        "linear single pick winner:                 {:?}",
        single.selected()
    );
}
