//! # ikesu
//!
//! Streaming reservoir samplers: uniform (Algorithm L), weighted (A-ExpJ),
//! and a single-slot weighted pick.
//!
//! (ikesu: a holding tank for live fish in Japanese, i.e. a reservoir)
//!
//! ## Modules
//!
//! - `uniform`: Uniform sampling with geometric skip jumps (Algorithm L)
//! - `weighted`: Weight-proportional sampling with exponential jumps (A-ExpJ)
//! - `linear`: Single-element integer-weighted pick for short streams
//!
//! Each algorithm comes in two storage flavors: a heap-backed sampler whose
//! capacity is chosen at runtime, and an `Inline*` sampler whose capacity is
//! a const generic and whose reservoir lives inside the sampler itself.
//!
//! ## Quick Start
//!
//! ```rust
//! use ikesu::ReservoirSampler;
//!
//! let mut sampler = ReservoirSampler::new(5);
//! for i in 0..100 {
//!     sampler.sample(i);
//! }
//! assert_eq!(sampler.samples().len(), 5);
//! ```
//!
//! Samplers own their random generator; pass one explicitly (owned or `&mut`
//! borrowed) for deterministic behavior:
//!
//! ```rust
//! use ikesu::WeightedReservoirSampler;
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//!
//! let rng = StdRng::seed_from_u64(42);
//! let mut sampler: WeightedReservoirSampler<&str, StdRng> =
//!     WeightedReservoirSampler::with_rng(2, rng);
//! sampler.sample("rare", 1.0);
//! sampler.sample("common", 10.0);
//! sampler.sample("ignored", 0.0);
//! assert_eq!(sampler.samples().len(), 2);
//! ```
//!
//! ## Research Context
//!
//! ### Uniform reservoir sampling
//!
//! - **Algorithm R** (Vitter, 1985): the classic approach, spending one
//!   draw on every stream element.
//! - **Algorithm L** (Li, 1994): $O(k(1 + \log(N/k)))$ draws by computing how
//!   many elements to *skip* between replacements. This is what
//!   [`ReservoirSampler`] and [`InlineReservoirSampler`] implement; the skip
//!   counter is exposed so callers can avoid even producing the elements that
//!   would be skipped.
//!
//! ### Weighted reservoir sampling
//!
//! - **A-Res / A-ExpJ** (Efraimidis–Spirakis, 2006): each element draws a key
//!   $u_i^{1/w_i}$ and the top-$k$ keys win, which makes inclusion
//!   probability proportional to weight. The exponential-jump variant
//!   (A-ExpJ) burns a weight budget between replacements instead of drawing
//!   per element; [`WeightedReservoirSampler`] and
//!   [`InlineWeightedReservoirSampler`] implement it.
//! - For $k = 1$ on short integer-weighted streams the classic linear scheme
//!   is cheaper per element; [`LinearWeightedSampler`] implements it.

pub mod linear;
pub mod uniform;
pub mod weighted;

mod draw;

pub use linear::LinearWeightedSampler;
pub use uniform::{InlineReservoirSampler, ReservoirSampler};
pub use weighted::{InlineWeightedReservoirSampler, WeightedReservoirSampler};
