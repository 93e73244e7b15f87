//! # Random Number Generation Infrastructure
//!
//! This module provides the standard normal draws that drive Heston path
//! simulation: pseudo-random streams, Sobol quasi-random points and the
//! antithetic pairing layer.
//!
//! ## Design Rationale
//!
//! - **Reproducibility**: every draw is addressed by its index, so a fixed
//!   seed yields bit-identical normals however the draws are chunked
//! - **Efficiency**: zero-allocation batch fills via `&mut [f64]` slices
//! - **Static dispatch**: sources are generic over [`NormalGenerator`]; no
//!   `Box<dyn Trait>` in the simulation loop
//!
//! ## Module Structure
//!
//! - [`prng`]: Pseudo-random number generator wrapper with seed management
//! - [`qmc`]: Low-discrepancy sequence trait and Sobol implementation
//! - [`source`]: Draw generators and the antithetic [`RandomSource`]
//!
//! ## Usage Example
//!
//! ```rust
//! use pricer_pricing::rng::{PseudoRandomGenerator, RandomSource, RandomSourceKind};
//!
//! let mut source = RandomSource::new(PseudoRandomGenerator::new(12345), false);
//! assert_eq!(source.kind(), RandomSourceKind::PseudoRandom);
//!
//! // 8 draws of 4 steps: 8 rows of 2 * 4 normals
//! let batch = source.next_batch(0, 8, 4).unwrap();
//! assert_eq!(batch.n_rows(), 8);
//! assert_eq!(batch.row(0).len(), 8);
//! ```

pub mod prng;
pub mod qmc;
pub mod source;

// Public re-exports
pub use prng::PricerRng;
pub use qmc::{LowDiscrepancySequence, SobolSequence, SOBOL_MAX_DIMENSION, SOBOL_MAX_POINTS};
pub use source::{
    NormalBatch, NormalGenerator, PseudoRandomGenerator, QuasiRandomGenerator, RandomSource,
    RandomSourceKind,
};
