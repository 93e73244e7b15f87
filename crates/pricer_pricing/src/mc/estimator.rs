//! Statistical aggregation of discounted payoffs.
//!
//! - [`estimate`]: sample mean, standard error and 95% confidence interval
//! - [`ParityCheck`]: put-call parity on one shared batch
//! - [`estimate_variance_reduction`]: variance comparison of two estimators
//! - [`PriceEstimate::compare_to_reference`]: agreement with an external price

use super::error::NumericalWarning;

/// Two-sided 95% normal quantile.
pub const Z_95: f64 = 1.96;

/// Monte Carlo price estimate.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PriceEstimate {
    /// Sample mean of the discounted payoffs.
    pub price: f64,
    /// Standard error of the mean (sample std with n-1, over sqrt(n)).
    pub standard_error: f64,
    /// 95% confidence interval `price ± 1.96 * standard_error`.
    pub confidence_interval: (f64, f64),
    /// Number of samples, antithetic mirrors included.
    pub n_paths_effective: usize,
    /// Numerical warnings raised while simulating the batch.
    pub warnings: Vec<NumericalWarning>,
}

impl PriceEstimate {
    /// Returns the 95% confidence interval half-width.
    #[inline]
    pub fn confidence_95(&self) -> f64 {
        Z_95 * self.standard_error
    }

    /// Returns the estimate with `warnings` attached.
    pub fn with_warnings(mut self, warnings: Vec<NumericalWarning>) -> Self {
        self.warnings = warnings;
        self
    }

    /// Compares the estimate with a reference price (for instance a
    /// closed-form value computed elsewhere).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pricer_pricing::mc::estimate;
    ///
    /// let estimate = estimate(&[9.0, 11.0, 10.0, 10.0]);
    /// let comparison = estimate.compare_to_reference(10.1);
    /// assert!(comparison.within_confidence_interval);
    /// assert!((comparison.absolute_error - 0.1).abs() < 1e-12);
    /// ```
    pub fn compare_to_reference(&self, reference: f64) -> ReferenceComparison {
        let error = self.price - reference;
        let z_score = if self.standard_error > 0.0 {
            error / self.standard_error
        } else if error == 0.0 {
            0.0
        } else {
            f64::INFINITY.copysign(error)
        };
        let (lower, upper) = self.confidence_interval;

        ReferenceComparison {
            reference,
            absolute_error: error.abs(),
            relative_error: if reference != 0.0 {
                error.abs() / reference.abs()
            } else {
                f64::NAN
            },
            z_score,
            within_confidence_interval: (lower..=upper).contains(&reference),
        }
    }
}

/// Agreement between an estimate and a reference price.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ReferenceComparison {
    /// Reference price.
    pub reference: f64,
    /// `|price - reference|`.
    pub absolute_error: f64,
    /// Absolute error relative to `|reference|`; NaN for a zero reference.
    pub relative_error: f64,
    /// `(price - reference) / standard_error`.
    pub z_score: f64,
    /// Whether the reference lies inside the 95% confidence interval.
    pub within_confidence_interval: bool,
}

/// Sample mean and unbiased (n-1) variance, two passes.
///
/// A single sample has variance 0.
pub fn mean_and_variance(samples: &[f64]) -> (f64, f64) {
    let n = samples.len();
    if n == 0 {
        return (f64::NAN, f64::NAN);
    }
    let mean = samples.iter().sum::<f64>() / n as f64;
    if n == 1 {
        return (mean, 0.0);
    }
    let variance = samples.iter().map(|&x| (x - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
    (mean, variance)
}

/// Estimates a price from discounted payoffs.
///
/// The standard error is taken over all samples, antithetic mirrors
/// included. An empty slice yields NaN price and error.
///
/// # Examples
///
/// ```rust
/// use pricer_pricing::mc::estimate;
///
/// let estimate = estimate(&[1.0, 2.0, 3.0]);
/// assert_eq!(estimate.price, 2.0);
/// assert!((estimate.standard_error - 1.0 / 3.0_f64.sqrt()).abs() < 1e-15);
/// assert_eq!(estimate.n_paths_effective, 3);
/// ```
pub fn estimate(discounted_payoffs: &[f64]) -> PriceEstimate {
    let n = discounted_payoffs.len();
    let (price, variance) = mean_and_variance(discounted_payoffs);
    let standard_error = (variance / n as f64).sqrt();
    let half_width = Z_95 * standard_error;

    PriceEstimate {
        price,
        standard_error,
        confidence_interval: (price - half_width, price + half_width),
        n_paths_effective: n,
        warnings: Vec::new(),
    }
}

/// Put-call parity check `C - P = S0 - K exp(-r T)` on one batch.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ParityCheck {
    /// Monte Carlo `C - P`.
    pub call_minus_put: f64,
    /// Theoretical `S0 - K exp(-r T)`.
    pub theoretical: f64,
    /// `|C - P - theoretical|`.
    pub difference: f64,
    /// Standard error of the per-path `C - P` differences.
    pub standard_error: f64,
}

impl ParityCheck {
    /// Builds the check from per-path discounted call and put payoffs.
    ///
    /// # Panics
    ///
    /// Panics if the slices have different lengths.
    pub fn from_payoffs(calls: &[f64], puts: &[f64], theoretical: f64) -> Self {
        assert_eq!(calls.len(), puts.len(), "call and put batches differ in size");
        let differences: Vec<f64> = calls.iter().zip(puts).map(|(c, p)| c - p).collect();
        let spread = estimate(&differences);

        Self {
            call_minus_put: spread.price,
            theoretical,
            difference: (spread.price - theoretical).abs(),
            standard_error: spread.standard_error,
        }
    }

    /// Difference in units of standard error.
    pub fn z_score(&self) -> f64 {
        if self.standard_error > 0.0 {
            self.difference / self.standard_error
        } else if self.difference == 0.0 {
            0.0
        } else {
            f64::INFINITY
        }
    }

    /// Whether parity holds within `n_se` standard errors.
    pub fn holds_within(&self, n_se: f64) -> bool {
        self.difference <= n_se * self.standard_error
    }
}

/// Variance comparison between a plain and a variance-reduced estimator.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct VarianceReductionReport {
    /// Sample variance (n-1) of the plain payoffs.
    pub variance_standard: f64,
    /// Sample variance (n-1) of the variance-reduced payoffs.
    pub variance_reduced: f64,
    /// `(1 - reduced / standard) * 100`; 0 when the plain variance is 0.
    pub reduction_pct: f64,
    /// `standard / reduced`; infinite when the reduced variance is 0.
    pub efficiency_ratio: f64,
}

/// Compares the payoff variances of two estimators.
///
/// # Examples
///
/// ```rust
/// use pricer_pricing::mc::estimate_variance_reduction;
///
/// let report = estimate_variance_reduction(&[0.0, 2.0, 4.0], &[1.0, 2.0, 3.0]);
/// assert_eq!(report.variance_standard, 4.0);
/// assert_eq!(report.variance_reduced, 1.0);
/// assert_eq!(report.reduction_pct, 75.0);
/// assert_eq!(report.efficiency_ratio, 4.0);
/// ```
pub fn estimate_variance_reduction(standard: &[f64], reduced: &[f64]) -> VarianceReductionReport {
    let (_, variance_standard) = mean_and_variance(standard);
    let (_, variance_reduced) = mean_and_variance(reduced);

    let reduction_pct = if variance_standard == 0.0 {
        0.0
    } else {
        (1.0 - variance_reduced / variance_standard) * 100.0
    };
    let efficiency_ratio = if variance_reduced > 0.0 {
        variance_standard / variance_reduced
    } else {
        f64::INFINITY
    };

    VarianceReductionReport {
        variance_standard,
        variance_reduced,
        reduction_pct,
        efficiency_ratio,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_estimate_single_sample_has_zero_error() {
        let estimate = estimate(&[4.2]);
        assert_eq!(estimate.price, 4.2);
        assert_eq!(estimate.standard_error, 0.0);
        assert_eq!(estimate.confidence_interval, (4.2, 4.2));
        assert_eq!(estimate.n_paths_effective, 1);
    }

    #[test]
    fn test_estimate_matches_textbook_formula() {
        let samples = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let estimate = estimate(&samples);

        // mean 5, sum of squares 32, sample variance 32 / 7
        assert_relative_eq!(estimate.price, 5.0, epsilon = 1e-15);
        let se = (32.0_f64 / 7.0 / 8.0).sqrt();
        assert_relative_eq!(estimate.standard_error, se, epsilon = 1e-15);
        assert_relative_eq!(estimate.confidence_95(), 1.96 * se, epsilon = 1e-15);
        assert_relative_eq!(estimate.confidence_interval.0, 5.0 - 1.96 * se, epsilon = 1e-15);
        assert_relative_eq!(estimate.confidence_interval.1, 5.0 + 1.96 * se, epsilon = 1e-15);
    }

    #[test]
    fn test_estimate_empty_is_nan() {
        let estimate = estimate(&[]);
        assert!(estimate.price.is_nan());
        assert!(estimate.standard_error.is_nan());
        assert_eq!(estimate.n_paths_effective, 0);
    }

    #[test]
    fn test_compare_to_reference() {
        let estimate = estimate(&[9.0, 11.0]);
        // mean 10, variance 2, se 1
        let inside = estimate.compare_to_reference(11.0);
        assert_relative_eq!(inside.z_score, -1.0, epsilon = 1e-15);
        assert!(inside.within_confidence_interval);
        assert_relative_eq!(inside.relative_error, 1.0 / 11.0, epsilon = 1e-15);

        let outside = estimate.compare_to_reference(13.0);
        assert!(!outside.within_confidence_interval);
        assert_relative_eq!(outside.absolute_error, 3.0, epsilon = 1e-15);
    }

    #[test]
    fn test_compare_to_reference_zero_error() {
        let estimate = estimate(&[1.0]);
        let exact = estimate.compare_to_reference(1.0);
        assert_eq!(exact.z_score, 0.0);
        assert!(exact.within_confidence_interval);

        let off = estimate.compare_to_reference(2.0);
        assert_eq!(off.z_score, f64::NEG_INFINITY);
    }

    #[test]
    fn test_parity_check() {
        let calls = [10.0, 0.0, 5.0];
        let puts = [0.0, 8.0, 1.0];
        let check = ParityCheck::from_payoffs(&calls, &puts, 3.0);

        // differences 10, -8, 4: mean 2
        assert_relative_eq!(check.call_minus_put, 2.0, epsilon = 1e-15);
        assert_relative_eq!(check.difference, 1.0, epsilon = 1e-15);
        assert!(check.standard_error > 0.0);
        assert!(check.holds_within(3.0));
        assert!(check.z_score() < 1.0);
    }

    #[test]
    fn test_variance_reduction_zero_variances() {
        let report = estimate_variance_reduction(&[1.0, 1.0], &[2.0, 2.0]);
        assert_eq!(report.reduction_pct, 0.0);
        assert_eq!(report.efficiency_ratio, f64::INFINITY);
    }

    #[test]
    fn test_with_warnings() {
        let warning = NumericalWarning::FellerViolated { lhs: 0.1, rhs: 0.2 };
        let estimate = estimate(&[1.0, 2.0]).with_warnings(vec![warning.clone()]);
        assert_eq!(estimate.warnings, vec![warning]);
    }
}
