//! Greeks calculation result types.

use std::fmt;

use super::config::BumpParameter;
use crate::mc::{PriceEstimate, Z_95};

/// Finite-difference sensitivity with its Monte Carlo standard error.
///
/// The standard error is taken over the per-path differences of the bumped
/// runs, which share their random draws.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct GreekEstimate {
    /// Estimated derivative.
    pub value: f64,
    /// Standard error of the estimate.
    pub standard_error: f64,
    /// Absolute bump applied in each direction.
    pub bump: f64,
    /// Differentiated parameter.
    pub parameter: BumpParameter,
}

impl GreekEstimate {
    /// Returns the 95% confidence interval half-width.
    #[inline]
    pub fn confidence_95(&self) -> f64 {
        Z_95 * self.standard_error
    }

    /// Same estimate with the sign flipped, as theta is `-dP/dT`.
    pub(crate) fn negated(self) -> Self {
        Self {
            value: -self.value,
            ..self
        }
    }
}

impl fmt::Display for GreekEstimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.6} (SE {:.6}, bump {} = {:.3e})",
            self.value, self.standard_error, self.parameter, self.bump
        )
    }
}

/// Price and full first-order Greeks set with gamma.
///
/// All figures come from runs sharing the same draws.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct GreeksResult {
    /// Base price estimate.
    pub price: PriceEstimate,
    /// dP/dS0.
    pub delta: GreekEstimate,
    /// d2P/dS0^2.
    pub gamma: GreekEstimate,
    /// dP/dsigma0 with `V0 = sigma0^2`.
    pub vega: GreekEstimate,
    /// -dP/dT (time decay).
    pub theta: GreekEstimate,
    /// dP/dr.
    pub rho: GreekEstimate,
}

impl GreeksResult {
    /// Named Greeks in display order.
    pub fn sensitivities(&self) -> [(&'static str, &GreekEstimate); 5] {
        [
            ("delta", &self.delta),
            ("gamma", &self.gamma),
            ("vega", &self.vega),
            ("theta", &self.theta),
            ("rho", &self.rho),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_negated_keeps_error() {
        let estimate = GreekEstimate {
            value: 1.5,
            standard_error: 0.1,
            bump: 0.01,
            parameter: BumpParameter::Maturity,
        };
        let theta = estimate.negated();
        assert_eq!(theta.value, -1.5);
        assert_eq!(theta.standard_error, 0.1);
        assert_relative_eq!(theta.confidence_95(), 0.196, epsilon = 1e-15);
    }

    #[test]
    fn test_display() {
        let estimate = GreekEstimate {
            value: 0.5,
            standard_error: 0.01,
            bump: 1.0,
            parameter: BumpParameter::Spot,
        };
        let text = estimate.to_string();
        assert!(text.starts_with("0.500000"));
        assert!(text.contains("S0"));
    }
}
