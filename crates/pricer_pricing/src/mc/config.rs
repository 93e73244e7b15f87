//! Monte Carlo simulation configuration.
//!
//! This module provides [`SimulationSpec`], the validated description of a
//! simulation batch, and its builder.

use std::fmt;
use std::str::FromStr;

use super::error::ConfigError;
use crate::rng::SOBOL_MAX_POINTS;

/// Maximum number of simulation paths allowed.
pub const MAX_PATHS: usize = 10_000_000;

/// Maximum number of time steps allowed per path.
pub const MAX_STEPS: usize = 10_000;

/// Default number of draws simulated per work unit.
pub const DEFAULT_CHUNK_SIZE: usize = 4096;

/// Default floor-hit rate above which a warning is attached to results.
pub const DEFAULT_FLOOR_HIT_THRESHOLD: f64 = 0.01;

/// Variance discretisation scheme.
///
/// Both schemes share the log-Euler asset step and the full-truncation
/// variance floor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum DiscretisationScheme {
    /// First-order Euler-Maruyama on the variance.
    #[default]
    Euler,

    /// Euler plus the Milstein correction ¼·eta²·dt·(W2² - 1).
    Milstein,
}

impl DiscretisationScheme {
    /// Lower-case scheme name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Euler => "euler",
            Self::Milstein => "milstein",
        }
    }
}

impl fmt::Display for DiscretisationScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DiscretisationScheme {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "euler" => Ok(Self::Euler),
            "milstein" => Ok(Self::Milstein),
            other => Err(ConfigError::InvalidParameter {
                name: "scheme",
                value: format!("unknown scheme '{}', expected 'euler' or 'milstein'", other),
            }),
        }
    }
}

/// Simulation batch configuration.
///
/// Immutable once built. Use [`SimulationSpecBuilder`] to construct instances.
///
/// # Examples
///
/// ```rust
/// use pricer_pricing::mc::{DiscretisationScheme, SimulationSpec};
///
/// let spec = SimulationSpec::builder()
///     .n_paths(10_001)
///     .n_steps(100)
///     .scheme(DiscretisationScheme::Milstein)
///     .antithetic(true)
///     .seed(42)
///     .build()
///     .expect("valid configuration");
///
/// assert_eq!(spec.n_draws(), 5_001);
/// assert_eq!(spec.effective_paths(), 10_002);
/// assert!((spec.dt(1.0) - 0.01).abs() < 1e-15);
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SimulationSpec {
    n_paths: usize,
    n_steps: usize,
    scheme: DiscretisationScheme,
    antithetic: bool,
    quasi_random: bool,
    seed: Option<u64>,
    retain_paths: bool,
    parallel: bool,
    chunk_size: usize,
    floor_hit_threshold: f64,
    qmc_offset: u64,
}

impl SimulationSpec {
    /// Creates a new configuration builder.
    #[inline]
    pub fn builder() -> SimulationSpecBuilder {
        SimulationSpecBuilder::default()
    }

    /// Returns the requested number of paths.
    #[inline]
    pub fn n_paths(&self) -> usize {
        self.n_paths
    }

    /// Returns the number of time steps per path.
    #[inline]
    pub fn n_steps(&self) -> usize {
        self.n_steps
    }

    /// Returns the variance discretisation scheme.
    #[inline]
    pub fn scheme(&self) -> DiscretisationScheme {
        self.scheme
    }

    /// Returns whether antithetic pairing is enabled.
    #[inline]
    pub fn antithetic(&self) -> bool {
        self.antithetic
    }

    /// Returns whether Sobol points replace pseudo-random draws.
    #[inline]
    pub fn quasi_random(&self) -> bool {
        self.quasi_random
    }

    /// Returns the optional seed.
    #[inline]
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Returns whether full path histories are kept.
    #[inline]
    pub fn retain_paths(&self) -> bool {
        self.retain_paths
    }

    /// Returns whether chunks run on the rayon thread pool.
    #[inline]
    pub fn parallel(&self) -> bool {
        self.parallel
    }

    /// Returns the number of draws per work unit.
    #[inline]
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Returns the floor-hit rate warning threshold.
    #[inline]
    pub fn floor_hit_threshold(&self) -> f64 {
        self.floor_hit_threshold
    }

    /// Returns the index of the first Sobol point used (after the origin).
    #[inline]
    pub fn qmc_offset(&self) -> u64 {
        self.qmc_offset
    }

    /// Time step `T / n_steps` for the given maturity.
    #[inline]
    pub fn dt(&self, maturity: f64) -> f64 {
        maturity / self.n_steps as f64
    }

    /// Number of independent random draws generated.
    ///
    /// Under antithetic pairing this is `ceil(n_paths / 2)`.
    #[inline]
    pub fn n_draws(&self) -> usize {
        if self.antithetic {
            self.n_paths.div_ceil(2)
        } else {
            self.n_paths
        }
    }

    /// Number of simulated paths, including antithetic mirrors.
    ///
    /// Odd `n_paths` under antithetic pairing rounds up to the next even count.
    #[inline]
    pub fn effective_paths(&self) -> usize {
        if self.antithetic {
            2 * self.n_draws()
        } else {
            self.n_paths
        }
    }

    /// Copy of this configuration with a fixed seed.
    pub fn with_seed(&self, seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..self.clone()
        }
    }

    /// Copy of this configuration with another scheme.
    pub fn with_scheme(&self, scheme: DiscretisationScheme) -> Self {
        Self {
            scheme,
            ..self.clone()
        }
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - `n_paths` is 0 or greater than 10,000,000
    /// - `n_steps` is 0 or greater than 10,000
    /// - antithetic pairing is requested with a single path
    /// - `chunk_size` is 0
    /// - `floor_hit_threshold` is negative or not finite
    /// - quasi-random draws would run past the end of the Sobol sequence
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.n_paths == 0 || self.n_paths > MAX_PATHS {
            return Err(ConfigError::InvalidPathCount(self.n_paths));
        }
        if self.n_steps == 0 || self.n_steps > MAX_STEPS {
            return Err(ConfigError::InvalidStepCount(self.n_steps));
        }
        if self.antithetic && self.n_paths < 2 {
            return Err(ConfigError::AntitheticRequiresPair(self.n_paths));
        }
        if self.chunk_size == 0 {
            return Err(ConfigError::InvalidParameter {
                name: "chunk_size",
                value: "must be positive".to_string(),
            });
        }
        if !(self.floor_hit_threshold >= 0.0 && self.floor_hit_threshold.is_finite()) {
            return Err(ConfigError::InvalidParameter {
                name: "floor_hit_threshold",
                value: format!("{} (must be non-negative and finite)", self.floor_hit_threshold),
            });
        }
        // Draw i reads Sobol point qmc_offset + i + 1
        let last_point = self.qmc_offset.saturating_add(self.n_draws() as u64);
        if self.quasi_random && last_point >= SOBOL_MAX_POINTS {
            return Err(ConfigError::InvalidParameter {
                name: "qmc_offset",
                value: format!(
                    "{} + {} draws exceeds the {} Sobol points available",
                    self.qmc_offset,
                    self.n_draws(),
                    SOBOL_MAX_POINTS
                ),
            });
        }
        Ok(())
    }
}

/// Builder for [`SimulationSpec`].
///
/// `n_paths` and `n_steps` are required; everything else has a default:
/// Euler scheme, no variance reduction, no seed, parallel execution,
/// 4096 draws per chunk, 1% floor-hit threshold, QMC offset 0.
#[derive(Clone, Debug)]
pub struct SimulationSpecBuilder {
    n_paths: Option<usize>,
    n_steps: Option<usize>,
    scheme: DiscretisationScheme,
    antithetic: bool,
    quasi_random: bool,
    seed: Option<u64>,
    retain_paths: bool,
    parallel: bool,
    chunk_size: usize,
    floor_hit_threshold: f64,
    qmc_offset: u64,
}

impl Default for SimulationSpecBuilder {
    fn default() -> Self {
        Self {
            n_paths: None,
            n_steps: None,
            scheme: DiscretisationScheme::default(),
            antithetic: false,
            quasi_random: false,
            seed: None,
            retain_paths: false,
            parallel: true,
            chunk_size: DEFAULT_CHUNK_SIZE,
            floor_hit_threshold: DEFAULT_FLOOR_HIT_THRESHOLD,
            qmc_offset: 0,
        }
    }
}

impl SimulationSpecBuilder {
    /// Sets the number of simulation paths, in [1, 10_000_000].
    #[inline]
    pub fn n_paths(mut self, n_paths: usize) -> Self {
        self.n_paths = Some(n_paths);
        self
    }

    /// Sets the number of time steps per path, in [1, 10_000].
    #[inline]
    pub fn n_steps(mut self, n_steps: usize) -> Self {
        self.n_steps = Some(n_steps);
        self
    }

    /// Sets the variance discretisation scheme.
    #[inline]
    pub fn scheme(mut self, scheme: DiscretisationScheme) -> Self {
        self.scheme = scheme;
        self
    }

    /// Enables or disables antithetic pairing.
    #[inline]
    pub fn antithetic(mut self, antithetic: bool) -> Self {
        self.antithetic = antithetic;
        self
    }

    /// Enables or disables Sobol quasi-random draws.
    #[inline]
    pub fn quasi_random(mut self, quasi_random: bool) -> Self {
        self.quasi_random = quasi_random;
        self
    }

    /// Sets the seed for reproducibility.
    #[inline]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets or clears the seed.
    #[inline]
    pub fn maybe_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    /// Keeps full `(S, V)` histories for every path.
    #[inline]
    pub fn retain_paths(mut self, retain_paths: bool) -> Self {
        self.retain_paths = retain_paths;
        self
    }

    /// Runs chunks on the rayon thread pool.
    #[inline]
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Sets the number of draws per work unit.
    #[inline]
    pub fn chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Sets the floor-hit rate warning threshold.
    #[inline]
    pub fn floor_hit_threshold(mut self, threshold: f64) -> Self {
        self.floor_hit_threshold = threshold;
        self
    }

    /// Sets the index of the first Sobol point used.
    #[inline]
    pub fn qmc_offset(mut self, offset: u64) -> Self {
        self.qmc_offset = offset;
        self
    }

    /// Builds the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `n_paths` or `n_steps` is missing, or if
    /// [`SimulationSpec::validate`] fails.
    pub fn build(self) -> Result<SimulationSpec, ConfigError> {
        let n_paths = self.n_paths.ok_or(ConfigError::InvalidParameter {
            name: "n_paths",
            value: "must be specified".to_string(),
        })?;

        let n_steps = self.n_steps.ok_or(ConfigError::InvalidParameter {
            name: "n_steps",
            value: "must be specified".to_string(),
        })?;

        let spec = SimulationSpec {
            n_paths,
            n_steps,
            scheme: self.scheme,
            antithetic: self.antithetic,
            quasi_random: self.quasi_random,
            seed: self.seed,
            retain_paths: self.retain_paths,
            parallel: self.parallel,
            chunk_size: self.chunk_size,
            floor_hit_threshold: self.floor_hit_threshold,
            qmc_offset: self.qmc_offset,
        };

        spec.validate()?;
        Ok(spec)
    }
}
