//! Error and warning types for the Heston Monte Carlo engine.
//!
//! - [`ConfigError`]: fatal, raised before any simulation work starts
//! - [`NumericalWarning`]: non-fatal, attached to results and logged

use std::fmt;

use pricer_models::models::HestonError;
use thiserror::Error;

use super::config::{MAX_PATHS, MAX_STEPS};

/// Configuration error for the Monte Carlo engine.
///
/// Invalid inputs are rejected, never clamped.
#[derive(Error, Clone, Debug, PartialEq)]
pub enum ConfigError {
    /// Path count outside valid range [1, 10_000_000].
    #[error("Invalid path count {0}: must be in range [1, {max}]", max = MAX_PATHS)]
    InvalidPathCount(usize),

    /// Step count outside valid range [1, 10_000].
    #[error("Invalid step count {0}: must be in range [1, {max}]", max = MAX_STEPS)]
    InvalidStepCount(usize),

    /// Invalid parameter value with name and description.
    #[error("Invalid parameter '{name}': {value}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Description of the invalid value.
        value: String,
    },

    /// Antithetic pairing needs at least two paths.
    #[error("Antithetic pairing requires at least 2 paths, got {0}")]
    AntitheticRequiresPair(usize),

    /// Quasi-random dimension beyond the available direction numbers.
    #[error("Unsupported quasi-random dimension {requested}: at most {max} (2 per time step)")]
    UnsupportedDimension {
        /// Requested dimension (2 * n_steps).
        requested: usize,
        /// Largest supported dimension.
        max: usize,
    },

    /// Finite-difference bump size that is not positive and finite, or that
    /// pushes the parameter out of its domain.
    #[error("Invalid bump for {parameter}: {bump}")]
    InvalidBump {
        /// Bumped parameter name.
        parameter: &'static str,
        /// Requested bump size.
        bump: f64,
    },

    /// Model parameter validation failure.
    #[error("Invalid model parameters: {0}")]
    Model(#[from] HestonError),
}

/// Non-fatal numerical diagnostic attached to simulation and pricing results.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum NumericalWarning {
    /// Feller condition 2 * kappa * theta > eta^2 does not hold.
    FellerViolated {
        /// 2 * kappa * theta
        lhs: f64,
        /// eta^2
        rhs: f64,
    },
    /// Share of variance steps hitting the zero floor exceeded the threshold.
    VarianceFloorHits {
        /// Observed floor hits per simulated variance step.
        rate: f64,
        /// Configured warning threshold.
        threshold: f64,
    },
}

impl fmt::Display for NumericalWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FellerViolated { lhs, rhs } => write!(
                f,
                "Feller condition violated: 2*kappa*theta = {:.6} <= eta^2 = {:.6}",
                lhs, rhs
            ),
            Self::VarianceFloorHits { rate, threshold } => write!(
                f,
                "Variance floor hit on {:.4}% of steps (threshold {:.4}%)",
                rate * 100.0,
                threshold * 100.0
            ),
        }
    }
}
