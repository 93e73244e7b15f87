//! Batch path simulation for the Heston model.
//!
//! [`simulate_paths`] splits the draws of a batch into chunks of
//! `chunk_size`, simulates every chunk independently (on the rayon pool when
//! `parallel` is set) and assembles the results in chunk order.
//!
//! # Memory Layout
//!
//! Terminal values are indexed by path. Under antithetic pairing paths
//! `[0, n_draws)` use the base draws and paths `[n_draws, 2 * n_draws)` their
//! mirrors, in the same order. Retained histories are row-major:
//! `spots[path_idx * (n_steps + 1) + step_idx]`, where `step_idx = 0` holds
//! the initial state.

use pricer_models::models::HestonParams;
use rayon::prelude::*;
use tracing::{debug, warn};

use super::config::{DiscretisationScheme, SimulationSpec};
use super::correlation::CorrelationCoupler;
use super::error::{ConfigError, NumericalWarning};
use super::scheme::{HestonStepper, PathState};
use crate::rng::{
    NormalGenerator, PseudoRandomGenerator, QuasiRandomGenerator, RandomSource, RandomSourceKind,
};

/// Full `(S, V)` histories of every simulated path.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PathHistory {
    n_points: usize,
    spots: Vec<f64>,
    variances: Vec<f64>,
}

impl PathHistory {
    /// Number of stored paths.
    #[inline]
    pub fn n_paths(&self) -> usize {
        if self.n_points == 0 {
            0
        } else {
            self.spots.len() / self.n_points
        }
    }

    /// Time points per path (`n_steps + 1`).
    #[inline]
    pub fn n_points(&self) -> usize {
        self.n_points
    }

    /// Asset path `i`, from `S0` to `S_T`.
    #[inline]
    pub fn spot_path(&self, i: usize) -> &[f64] {
        &self.spots[i * self.n_points..(i + 1) * self.n_points]
    }

    /// Variance path `i`, from `V0` to `V_T`.
    #[inline]
    pub fn variance_path(&self, i: usize) -> &[f64] {
        &self.variances[i * self.n_points..(i + 1) * self.n_points]
    }
}

/// Diagnostics describing how a batch was simulated.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SimulationDiagnostics {
    /// Variance discretisation scheme.
    pub scheme: DiscretisationScheme,
    /// Kind of random numbers used.
    pub source: RandomSourceKind,
    /// Whether antithetic pairing was on.
    pub antithetic: bool,
    /// Number of variance steps floored at zero.
    pub floor_hits: u64,
    /// Number of simulated variance steps (`effective_paths * n_steps`).
    pub total_steps: u64,
    /// Seed actually used; drawn from entropy when none was configured.
    /// Unshifted quasi-random batches have none.
    pub seed: Option<u64>,
}

impl SimulationDiagnostics {
    /// Share of variance steps that hit the floor.
    pub fn floor_hit_rate(&self) -> f64 {
        if self.total_steps == 0 {
            0.0
        } else {
            self.floor_hits as f64 / self.total_steps as f64
        }
    }
}

/// Output of [`simulate_paths`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SimulationResult {
    /// Terminal asset prices, one per effective path.
    pub terminal_spots: Vec<f64>,
    /// Terminal variances, one per effective path.
    pub terminal_variances: Vec<f64>,
    /// Full histories when `retain_paths` was set.
    pub paths: Option<PathHistory>,
    /// How the batch was simulated.
    pub diagnostics: SimulationDiagnostics,
    /// Non-fatal numerical warnings.
    pub warnings: Vec<NumericalWarning>,
}

impl SimulationResult {
    /// Number of simulated paths.
    #[inline]
    pub fn n_paths(&self) -> usize {
        self.terminal_spots.len()
    }

    /// Discounted payoffs `exp(-r T) * f(S_T, V_T)` for every path.
    pub fn discounted_payoffs<F>(&self, discount_factor: f64, payoff: F) -> Vec<f64>
    where
        F: Fn(f64, f64) -> f64,
    {
        self.terminal_spots
            .iter()
            .zip(&self.terminal_variances)
            .map(|(&s, &v)| discount_factor * payoff(s, v))
            .collect()
    }
}

/// Simulated paths of one set of rows (base or mirrored) of a chunk.
#[derive(Default)]
struct PathBlock {
    terminal_spots: Vec<f64>,
    terminal_variances: Vec<f64>,
    spots: Vec<f64>,
    variances: Vec<f64>,
}

impl PathBlock {
    fn with_capacity(n_paths: usize, n_points: usize, retain: bool) -> Self {
        let history = if retain { n_paths * n_points } else { 0 };
        Self {
            terminal_spots: Vec::with_capacity(n_paths),
            terminal_variances: Vec::with_capacity(n_paths),
            spots: Vec::with_capacity(history),
            variances: Vec::with_capacity(history),
        }
    }

    fn append(&mut self, other: PathBlock) {
        self.terminal_spots.extend(other.terminal_spots);
        self.terminal_variances.extend(other.terminal_variances);
        self.spots.extend(other.spots);
        self.variances.extend(other.variances);
    }
}

struct ChunkOutput {
    base: PathBlock,
    mirrored: PathBlock,
    floor_hits: u64,
}

struct Kernel<'a> {
    params: &'a HestonParams,
    stepper: HestonStepper,
    coupler: CorrelationCoupler,
    n_steps: usize,
    retain: bool,
}

impl Kernel<'_> {
    /// Simulates one path from its row of normals.
    fn run_path(&self, row: &[f64], block: &mut PathBlock) -> u64 {
        let mut state = PathState::initial(self.params);
        let mut floor_hits = 0;

        if self.retain {
            block.spots.push(state.spot);
            block.variances.push(state.variance);
        }

        for z in row.chunks_exact(2) {
            let (w1, w2) = self.coupler.couple(z[0], z[1]);
            let (next, floored) = self.stepper.step(state, w1, w2);
            floor_hits += u64::from(floored);
            state = next;

            if self.retain {
                block.spots.push(state.spot);
                block.variances.push(state.variance);
            }
        }

        block.terminal_spots.push(state.spot);
        block.terminal_variances.push(state.variance);
        floor_hits
    }

    fn run_chunk<G: NormalGenerator>(
        &self,
        source: &mut RandomSource<G>,
        first_draw: usize,
        n_draws: usize,
    ) -> Result<ChunkOutput, ConfigError> {
        let batch = source.next_batch(first_draw, n_draws, self.n_steps)?;
        let n_points = self.n_steps + 1;

        let mut base = PathBlock::with_capacity(n_draws, n_points, self.retain);
        let mut mirrored = PathBlock::default();
        let mut floor_hits = 0;

        for i in 0..n_draws {
            floor_hits += self.run_path(batch.base_row(i), &mut base);
        }
        if batch.is_antithetic() {
            mirrored = PathBlock::with_capacity(n_draws, n_points, self.retain);
            for i in 0..n_draws {
                if let Some(row) = batch.mirrored_row(i) {
                    floor_hits += self.run_path(row, &mut mirrored);
                }
            }
        }

        Ok(ChunkOutput {
            base,
            mirrored,
            floor_hits,
        })
    }
}

/// Simulates a batch of Heston paths.
///
/// Pure function of its inputs and the seed: a fixed seed gives bit-identical
/// results whatever the chunk size, thread count or `parallel` flag. Without a
/// seed, pseudo-random batches draw one from entropy and report it in the
/// diagnostics.
///
/// # Errors
///
/// Returns `ConfigError` for invalid parameters or configuration, or when
/// quasi-random draws need more than 21,201 dimensions.
///
/// # Examples
///
/// ```rust
/// use pricer_models::models::HestonParams;
/// use pricer_pricing::mc::{simulate_paths, SimulationSpec};
///
/// let params = HestonParams::default();
/// let spec = SimulationSpec::builder()
///     .n_paths(1_000)
///     .n_steps(50)
///     .antithetic(true)
///     .seed(42)
///     .build()
///     .unwrap();
///
/// let result = simulate_paths(&params, &spec).unwrap();
/// assert_eq!(result.n_paths(), 1_000);
/// assert!(result.terminal_spots.iter().all(|&s| s > 0.0));
/// assert!(result.terminal_variances.iter().all(|&v| v >= 0.0));
/// ```
pub fn simulate_paths(
    params: &HestonParams,
    spec: &SimulationSpec,
) -> Result<SimulationResult, ConfigError> {
    params.validate()?;
    spec.validate()?;

    if spec.quasi_random() {
        let generator = QuasiRandomGenerator::new(spec.n_steps(), spec.qmc_offset(), spec.seed())?;
        run_batch(params, spec, generator, spec.seed())
    } else {
        let seed = spec.seed().unwrap_or_else(rand::random);
        run_batch(params, spec, PseudoRandomGenerator::new(seed), Some(seed))
    }
}

fn run_batch<G: NormalGenerator>(
    params: &HestonParams,
    spec: &SimulationSpec,
    generator: G,
    seed: Option<u64>,
) -> Result<SimulationResult, ConfigError> {
    let dt = spec.dt(params.maturity);
    if !(dt > 0.0 && dt.is_finite()) {
        return Err(ConfigError::InvalidParameter {
            name: "dt",
            value: format!("{} (must be positive and finite)", dt),
        });
    }

    let n_steps = spec.n_steps();
    let n_draws = spec.n_draws();
    let source = RandomSource::new(generator, spec.antithetic());
    let kernel = Kernel {
        params,
        stepper: HestonStepper::new(params, spec.scheme(), dt),
        coupler: CorrelationCoupler::new(params.rho),
        n_steps,
        retain: spec.retain_paths(),
    };

    debug!(
        scheme = %spec.scheme(),
        source = %source.kind(),
        antithetic = spec.antithetic(),
        n_paths = spec.effective_paths(),
        n_steps,
        dt,
        seed = ?seed,
        "Simulating Heston paths"
    );

    let chunks: Vec<(usize, usize)> = (0..n_draws)
        .step_by(spec.chunk_size())
        .map(|first| (first, spec.chunk_size().min(n_draws - first)))
        .collect();

    let outputs: Vec<ChunkOutput> = if spec.parallel() {
        chunks
            .par_iter()
            .map(|&(first, n)| {
                let mut source = source.clone();
                kernel.run_chunk(&mut source, first, n)
            })
            .collect::<Result<_, _>>()?
    } else {
        let mut source = source.clone();
        chunks
            .iter()
            .map(|&(first, n)| kernel.run_chunk(&mut source, first, n))
            .collect::<Result<_, _>>()?
    };

    let n_points = n_steps + 1;
    let retain = spec.retain_paths();
    let mut all = PathBlock::with_capacity(spec.effective_paths(), n_points, retain);
    let mut mirrored = PathBlock::with_capacity(
        if spec.antithetic() { n_draws } else { 0 },
        n_points,
        retain,
    );
    let mut floor_hits = 0;
    for output in outputs {
        floor_hits += output.floor_hits;
        all.append(output.base);
        mirrored.append(output.mirrored);
    }
    all.append(mirrored);

    let total_steps = (all.terminal_spots.len() * n_steps) as u64;
    let diagnostics = SimulationDiagnostics {
        scheme: spec.scheme(),
        source: source.kind(),
        antithetic: spec.antithetic(),
        floor_hits,
        total_steps,
        seed,
    };
    let warnings = collect_warnings(params, spec, &diagnostics);

    debug!(
        n_paths = all.terminal_spots.len(),
        floor_hits,
        floor_hit_rate = diagnostics.floor_hit_rate(),
        "Heston simulation complete"
    );

    let paths = retain.then(|| PathHistory {
        n_points,
        spots: all.spots,
        variances: all.variances,
    });

    Ok(SimulationResult {
        terminal_spots: all.terminal_spots,
        terminal_variances: all.terminal_variances,
        paths,
        diagnostics,
        warnings,
    })
}

fn collect_warnings(
    params: &HestonParams,
    spec: &SimulationSpec,
    diagnostics: &SimulationDiagnostics,
) -> Vec<NumericalWarning> {
    let mut warnings = Vec::new();

    if !params.satisfies_feller() {
        let (lhs, rhs) = params.feller_terms();
        warnings.push(NumericalWarning::FellerViolated { lhs, rhs });
    }

    let rate = diagnostics.floor_hit_rate();
    if rate > spec.floor_hit_threshold() {
        warnings.push(NumericalWarning::VarianceFloorHits {
            rate,
            threshold: spec.floor_hit_threshold(),
        });
    }

    for warning in &warnings {
        warn!(%warning, "Numerical warning during Heston simulation");
    }
    warnings
}
