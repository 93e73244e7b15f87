//! Standard normal draw sources for path simulation.
//!
//! A *draw* is the full set of `2 * n_steps` independent standard normals one
//! path consumes, stored as `[z1_0, z2_0, z1_1, z2_1, ...]`. Generators are
//! addressed by draw index, so any work unit can fetch any disjoint range of
//! draws and the result never depends on how draws are split.
//!
//! - [`PseudoRandomGenerator`]: one [`PricerRng`] stream per draw
//! - [`QuasiRandomGenerator`]: one Sobol point per draw, mapped through the
//!   inverse normal CDF
//! - [`RandomSource`]: wraps a generator with the antithetic pairing policy

use std::fmt;

use pricer_core::math::distributions::inverse_norm_cdf;

use super::prng::{splitmix64, PricerRng};
use super::qmc::{LowDiscrepancySequence, SobolSequence, SOBOL_MAX_DIMENSION};
use crate::mc::ConfigError;

/// Kind of random numbers feeding a simulation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum RandomSourceKind {
    /// Pseudo-random normals (StdRng + Ziggurat).
    PseudoRandom,
    /// Sobol points mapped through the inverse normal CDF.
    QuasiRandom,
}

impl fmt::Display for RandomSourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PseudoRandom => f.write_str("pseudo-random"),
            Self::QuasiRandom => f.write_str("quasi-random (Sobol)"),
        }
    }
}

/// Source of standard normal draws addressed by draw index.
///
/// Implementations must be deterministic: the normals written for draw `i`
/// depend only on the generator configuration and `i`.
pub trait NormalGenerator: Clone + Send + Sync {
    /// The kind of numbers produced.
    fn kind(&self) -> RandomSourceKind;

    /// Writes draws `[first_draw, first_draw + n_draws)` into `out`,
    /// row-major with shape `(n_draws, n_steps, 2)`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `out` has the wrong length, `n_steps` is 0,
    /// or the generator cannot serve `n_steps` steps.
    fn fill_draws(
        &mut self,
        first_draw: usize,
        n_draws: usize,
        n_steps: usize,
        out: &mut [f64],
    ) -> Result<(), ConfigError>;
}

fn check_buffer(n_draws: usize, n_steps: usize, out: &[f64]) -> Result<(), ConfigError> {
    if n_steps == 0 {
        return Err(ConfigError::InvalidStepCount(n_steps));
    }
    let expected = n_draws * n_steps * 2;
    if out.len() != expected {
        return Err(ConfigError::InvalidParameter {
            name: "out",
            value: format!("buffer length {} (expected {})", out.len(), expected),
        });
    }
    Ok(())
}

/// Pseudo-random normal generator with one independent stream per draw.
///
/// # Examples
///
/// ```rust
/// use pricer_pricing::rng::{NormalGenerator, PseudoRandomGenerator};
///
/// let mut generator = PseudoRandomGenerator::new(42);
/// let mut whole = vec![0.0; 4 * 3 * 2];
/// generator.fill_draws(0, 4, 3, &mut whole).unwrap();
///
/// // Draws 2..4 fetched on their own are identical
/// let mut tail = vec![0.0; 2 * 3 * 2];
/// generator.fill_draws(2, 2, 3, &mut tail).unwrap();
/// assert_eq!(&whole[12..], &tail[..]);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PseudoRandomGenerator {
    seed: u64,
}

impl PseudoRandomGenerator {
    /// Creates a generator for the batch seeded by `seed`.
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Returns the batch seed.
    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl NormalGenerator for PseudoRandomGenerator {
    #[inline]
    fn kind(&self) -> RandomSourceKind {
        RandomSourceKind::PseudoRandom
    }

    fn fill_draws(
        &mut self,
        first_draw: usize,
        n_draws: usize,
        n_steps: usize,
        out: &mut [f64],
    ) -> Result<(), ConfigError> {
        check_buffer(n_draws, n_steps, out)?;
        if n_draws == 0 {
            return Ok(());
        }
        for (offset, row) in out.chunks_exact_mut(2 * n_steps).enumerate() {
            let mut rng = PricerRng::for_stream(self.seed, (first_draw + offset) as u64);
            rng.fill_normal(row);
        }
        Ok(())
    }
}

/// Quasi-random normal generator over a Sobol sequence of dimension
/// `2 * n_steps`.
///
/// Draw `i` is Sobol point `offset + i + 1`; the origin is never used. With a
/// seed, every point receives the same Cranley-Patterson shift
/// `u -> (u + s) mod 1`, drawn once from the seed.
///
/// Clones share the Sobol direction numbers, so handing one clone to each
/// parallel work unit is cheap; each clone jumps straight to its own range.
#[derive(Clone)]
pub struct QuasiRandomGenerator {
    n_steps: usize,
    offset: u64,
    seed: Option<u64>,
    shift: Option<Vec<f64>>,
    sequence: Option<SobolSequence>,
}

impl QuasiRandomGenerator {
    /// Creates a generator for paths of `n_steps` steps.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnsupportedDimension`] when `2 * n_steps`
    /// exceeds [`SOBOL_MAX_DIMENSION`], and [`ConfigError::InvalidStepCount`]
    /// for zero steps.
    pub fn new(n_steps: usize, offset: u64, seed: Option<u64>) -> Result<Self, ConfigError> {
        if n_steps == 0 {
            return Err(ConfigError::InvalidStepCount(n_steps));
        }
        let dimension = 2 * n_steps;
        if dimension > SOBOL_MAX_DIMENSION {
            return Err(ConfigError::UnsupportedDimension {
                requested: dimension,
                max: SOBOL_MAX_DIMENSION,
            });
        }

        let shift = seed.map(|seed| {
            let mut rng = PricerRng::from_seed(splitmix64(seed));
            let mut shift = vec![0.0; dimension];
            rng.fill_uniform(&mut shift);
            shift
        });

        Ok(Self {
            n_steps,
            offset,
            seed,
            shift,
            sequence: None,
        })
    }

    /// Sobol dimension `2 * n_steps`.
    pub fn dimension(&self) -> usize {
        2 * self.n_steps
    }

    /// Returns the seed of the random shift, if any.
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }
}

/// Positions `slot` so that its next point is `index`.
fn seek(
    slot: &mut Option<SobolSequence>,
    dimension: usize,
    index: u64,
) -> Result<&mut SobolSequence, ConfigError> {
    if slot.is_none() {
        *slot = SobolSequence::new(dimension);
    }
    let sequence = slot.as_mut().ok_or(ConfigError::UnsupportedDimension {
        requested: dimension,
        max: SOBOL_MAX_DIMENSION,
    })?;
    if sequence.position() > index {
        sequence.reset();
    }
    let position = sequence.position();
    sequence.skip(index - position);
    if sequence.position() != index {
        return Err(sobol_exhausted(index));
    }
    Ok(sequence)
}

fn sobol_exhausted(index: u64) -> ConfigError {
    ConfigError::InvalidParameter {
        name: "qmc_offset",
        value: format!("Sobol sequence exhausted before point {}", index),
    }
}

impl fmt::Debug for QuasiRandomGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuasiRandomGenerator")
            .field("n_steps", &self.n_steps)
            .field("offset", &self.offset)
            .field("seed", &self.seed)
            .field("shifted", &self.shift.is_some())
            .finish()
    }
}

impl NormalGenerator for QuasiRandomGenerator {
    #[inline]
    fn kind(&self) -> RandomSourceKind {
        RandomSourceKind::QuasiRandom
    }

    fn fill_draws(
        &mut self,
        first_draw: usize,
        n_draws: usize,
        n_steps: usize,
        out: &mut [f64],
    ) -> Result<(), ConfigError> {
        if n_steps != self.n_steps {
            return Err(ConfigError::InvalidParameter {
                name: "n_steps",
                value: format!(
                    "generator built for {} steps, asked for {}",
                    self.n_steps, n_steps
                ),
            });
        }
        check_buffer(n_draws, n_steps, out)?;
        if n_draws == 0 {
            return Ok(());
        }

        let first_index = self.offset + first_draw as u64 + 1;
        let dimension = self.dimension();
        let sequence = seek(&mut self.sequence, dimension, first_index)?;
        let shift = self.shift.as_deref();

        for (row_index, row) in out.chunks_exact_mut(2 * n_steps).enumerate() {
            let point = sequence
                .next_point()
                .ok_or_else(|| sobol_exhausted(first_index + row_index as u64))?;
            match shift {
                Some(shift) => {
                    for ((z, &u), &s) in row.iter_mut().zip(point).zip(shift) {
                        let shifted = u + s;
                        let u = if shifted >= 1.0 { shifted - 1.0 } else { shifted };
                        *z = inverse_norm_cdf(u);
                    }
                }
                None => {
                    for (z, &u) in row.iter_mut().zip(point) {
                        *z = inverse_norm_cdf(u);
                    }
                }
            }
        }
        Ok(())
    }
}

/// Normals for a block of consecutive draws, with antithetic mirrors.
///
/// Rows `[0, n_draws)` are the base draws; under antithetic pairing rows
/// `[n_draws, 2 * n_draws)` are their exact negations in the same order.
#[derive(Clone, Debug, PartialEq)]
pub struct NormalBatch {
    first_draw: usize,
    n_draws: usize,
    n_steps: usize,
    antithetic: bool,
    values: Vec<f64>,
}

impl NormalBatch {
    /// Index of the first base draw.
    #[inline]
    pub fn first_draw(&self) -> usize {
        self.first_draw
    }

    /// Number of base draws.
    #[inline]
    pub fn n_draws(&self) -> usize {
        self.n_draws
    }

    /// Number of time steps per row.
    #[inline]
    pub fn n_steps(&self) -> usize {
        self.n_steps
    }

    /// Whether the batch carries antithetic mirrors.
    #[inline]
    pub fn is_antithetic(&self) -> bool {
        self.antithetic
    }

    /// Number of rows (base plus mirrored).
    #[inline]
    pub fn n_rows(&self) -> usize {
        if self.antithetic {
            2 * self.n_draws
        } else {
            self.n_draws
        }
    }

    /// Row `i` of the batch, `2 * n_steps` normals.
    ///
    /// # Panics
    ///
    /// Panics if `i >= n_rows()`.
    #[inline]
    pub fn row(&self, i: usize) -> &[f64] {
        let width = 2 * self.n_steps;
        &self.values[i * width..(i + 1) * width]
    }

    /// Base draw `i`.
    #[inline]
    pub fn base_row(&self, i: usize) -> &[f64] {
        assert!(i < self.n_draws, "base row {} out of range", i);
        self.row(i)
    }

    /// Mirror of base draw `i`, if antithetic pairing is on.
    #[inline]
    pub fn mirrored_row(&self, i: usize) -> Option<&[f64]> {
        (self.antithetic && i < self.n_draws).then(|| self.row(self.n_draws + i))
    }

    /// Iterates over all rows, base rows first.
    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        self.values.chunks_exact(2 * self.n_steps)
    }
}

/// A [`NormalGenerator`] together with the antithetic pairing policy.
///
/// # Examples
///
/// ```rust
/// use pricer_pricing::rng::{PseudoRandomGenerator, RandomSource};
///
/// let mut source = RandomSource::new(PseudoRandomGenerator::new(7), true);
/// let batch = source.next_batch(0, 3, 5).unwrap();
///
/// assert_eq!(batch.n_rows(), 6);
/// for i in 0..3 {
///     let base = batch.base_row(i);
///     let mirror = batch.mirrored_row(i).unwrap();
///     assert!(base.iter().zip(mirror).all(|(b, m)| m.to_bits() == (-b).to_bits()));
/// }
/// ```
#[derive(Clone, Debug)]
pub struct RandomSource<G> {
    generator: G,
    antithetic: bool,
}

impl<G: NormalGenerator> RandomSource<G> {
    /// Wraps `generator`; with `antithetic` every batch also carries the
    /// negated draws.
    pub fn new(generator: G, antithetic: bool) -> Self {
        Self {
            generator,
            antithetic,
        }
    }

    /// The kind of numbers produced.
    pub fn kind(&self) -> RandomSourceKind {
        self.generator.kind()
    }

    /// Whether batches carry antithetic mirrors.
    pub fn antithetic(&self) -> bool {
        self.antithetic
    }

    /// Generates base draws `[first_draw, first_draw + n_draws)` and, under
    /// antithetic pairing, their mirrors.
    ///
    /// # Errors
    ///
    /// Propagates generator errors.
    pub fn next_batch(
        &mut self,
        first_draw: usize,
        n_draws: usize,
        n_steps: usize,
    ) -> Result<NormalBatch, ConfigError> {
        let base_len = n_draws * n_steps * 2;
        let total_len = if self.antithetic { 2 * base_len } else { base_len };
        let mut values = vec![0.0; total_len];

        self.generator
            .fill_draws(first_draw, n_draws, n_steps, &mut values[..base_len])?;

        if self.antithetic {
            let (base, mirrored) = values.split_at_mut(base_len);
            for (m, &b) in mirrored.iter_mut().zip(base.iter()) {
                *m = -b;
            }
        }

        Ok(NormalBatch {
            first_draw,
            n_draws,
            n_steps,
            antithetic: self.antithetic,
            values,
        })
    }
}
