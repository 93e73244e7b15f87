//! Quasi-Monte Carlo low-discrepancy sequences.
//!
//! This module defines the interface for low-discrepancy sequences used in
//! quasi-Monte Carlo (QMC) methods and its Sobol implementation backed by the
//! `sobol` crate with Joe-Kuo D6 direction numbers (up to 21,201 dimensions).

use std::sync::{Arc, OnceLock};

use sobol::params::JoeKuoD6;
use sobol::{Sobol, SobolType};

/// Largest dimension covered by the extended Joe-Kuo D6 direction numbers.
pub const SOBOL_MAX_DIMENSION: usize = 21_201;

/// Bits of resolution per coordinate (the `f32` significand).
const SOBOL_RESOLUTION: usize = <f32 as SobolType>::MAX_RESOLUTION;

/// Number of points a [`SobolSequence`] can produce, origin included.
pub const SOBOL_MAX_POINTS: u64 = (1 << SOBOL_RESOLUTION) - 1;

/// Scale from the 32-bit integer state to `[0, 1)`.
const TWO_POW_32: f64 = 4_294_967_296.0;

/// Trait for low-discrepancy sequences used in quasi-Monte Carlo methods.
///
/// Low-discrepancy sequences provide more uniform coverage of the unit
/// hypercube than pseudo-random sequences, often leading to faster
/// convergence in numerical integration problems.
pub trait LowDiscrepancySequence {
    /// Returns the dimensionality of the sequence.
    fn dimension(&self) -> usize;

    /// Number of points produced (or skipped) since the last reset.
    fn position(&self) -> u64;

    /// Advances the sequence and returns the next point.
    ///
    /// Returns `None` once the sequence is exhausted; otherwise a slice of
    /// `dimension()` values, each in the interval [0, 1).
    fn next_point(&mut self) -> Option<&[f64]>;

    /// Resets the sequence to its initial state.
    ///
    /// After calling this method, the sequence will produce the same
    /// points as a newly initialised instance.
    fn reset(&mut self);

    /// Skips ahead by `n` points in the sequence.
    ///
    /// Used to hand disjoint index ranges to parallel work units.
    fn skip(&mut self, n: u64);
}

fn joe_kuo_params() -> &'static JoeKuoD6 {
    static PARAMS: OnceLock<JoeKuoD6> = OnceLock::new();
    PARAMS.get_or_init(JoeKuoD6::extended)
}

/// Sobol sequence generator.
///
/// The first point produced is the origin. Direction numbers come from the
/// `sobol` crate (Joe-Kuo D6, 24-bit resolution) and points are built in
/// Gray-code order, so point `n` equals the XOR of the direction numbers
/// selected by the bits of `n ^ (n >> 1)`. This gives the same points as
/// iterating [`sobol::Sobol`] while letting [`skip`](LowDiscrepancySequence::skip)
/// jump to any index in `O(dimension)`.
///
/// # Examples
///
/// ```rust
/// use pricer_pricing::rng::{LowDiscrepancySequence, SobolSequence};
///
/// let mut sobol = SobolSequence::new(4).unwrap();
/// sobol.skip(1);
///
/// let point = sobol.next_point().unwrap();
/// assert_eq!(point.len(), 4);
/// assert!(point.iter().all(|&u| (0.0..1.0).contains(&u)));
/// assert_eq!(sobol.position(), 2);
/// ```
#[derive(Clone)]
pub struct SobolSequence {
    dimension: usize,
    /// `directions[d][b]`: direction number of bit `b` in dimension `d`.
    directions: Arc<Vec<Vec<u32>>>,
    /// Integer state of point `position - 1`.
    state: Vec<u32>,
    buffer: Vec<f64>,
    position: u64,
}

impl SobolSequence {
    /// Creates a Sobol sequence of the given dimension.
    ///
    /// Returns `None` when `dimension` is 0 or above [`SOBOL_MAX_DIMENSION`].
    pub fn new(dimension: usize) -> Option<Self> {
        if dimension == 0 || dimension > SOBOL_MAX_DIMENSION {
            return None;
        }
        let directions =
            Sobol::<f32>::init_direction_vals::<u32>(dimension, SOBOL_RESOLUTION, joe_kuo_params());
        Some(Self {
            dimension,
            directions: Arc::new(directions),
            state: vec![0; dimension],
            buffer: vec![0.0; dimension],
            position: 0,
        })
    }

    /// Moves the state to point `index` in one pass over the Gray code bits.
    fn jump_to(&mut self, index: u64) {
        let gray = index ^ (index >> 1);
        for (value, dirs) in self.state.iter_mut().zip(self.directions.iter()) {
            *value = dirs
                .iter()
                .enumerate()
                .filter(|(bit, _)| (gray >> bit) & 1 == 1)
                .fold(0, |acc, (_, &dir)| acc ^ dir);
        }
    }
}

impl LowDiscrepancySequence for SobolSequence {
    #[inline]
    fn dimension(&self) -> usize {
        self.dimension
    }

    #[inline]
    fn position(&self) -> u64 {
        self.position
    }

    fn next_point(&mut self) -> Option<&[f64]> {
        if self.position >= SOBOL_MAX_POINTS {
            return None;
        }
        if self.position > 0 {
            // Gray code step: flip the bit of the rightmost zero of n - 1
            let bit = (self.position - 1).trailing_ones() as usize;
            for (value, dirs) in self.state.iter_mut().zip(self.directions.iter()) {
                *value ^= dirs[bit];
            }
        }
        for (slot, &value) in self.buffer.iter_mut().zip(&self.state) {
            *slot = f64::from(value) / TWO_POW_32;
        }
        self.position += 1;
        Some(&self.buffer)
    }

    fn reset(&mut self) {
        self.state.fill(0);
        self.position = 0;
    }

    fn skip(&mut self, n: u64) {
        let target = self.position.saturating_add(n).min(SOBOL_MAX_POINTS);
        if target > 0 {
            self.jump_to(target - 1);
        }
        self.position = target;
    }
}

impl std::fmt::Debug for SobolSequence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SobolSequence")
            .field("dimension", &self.dimension)
            .field("position", &self.position)
            .finish()
    }
}
