//! Heston stochastic volatility model parameters.
//!
//! The Heston model is described by the SDE system:
//! ```text
//! dS = r * S * dt + sqrt(V) * S * dW_1
//! dV = kappa * (theta - V) * dt + eta * sqrt(V) * dW_2
//! E[dW_1 * dW_2] = rho * dt
//! ```
//! where:
//! - S = asset price
//! - V = instantaneous variance
//! - r = risk-free rate (continuously compounded)
//! - kappa = mean-reversion speed
//! - theta = long-run variance
//! - eta = volatility of variance (vol-of-vol)
//! - rho = correlation between the asset and variance drivers
//!
//! ## Feller condition
//!
//! Sufficient condition for the continuous-time variance to stay strictly
//! positive:
//! ```text
//! 2 * kappa * theta > eta^2
//! ```
//!
//! The condition is soft: parameters violating it are accepted, and the
//! simulation layer reports the violation as a numerical warning.
//!
//! ## Example
//!
//! ```
//! use pricer_models::models::heston::HestonParams;
//!
//! let params = HestonParams::new(
//!     100.0, // spot
//!     0.04,  // initial variance
//!     0.04,  // long-run variance
//!     2.0,   // mean-reversion speed
//!     0.3,   // vol-of-vol
//!     -0.7,  // correlation
//!     0.05,  // risk-free rate
//!     1.0,   // maturity
//! )
//! .unwrap();
//!
//! assert!(params.satisfies_feller());
//! assert!((params.sigma0() - 0.2).abs() < 1e-12);
//! ```

use std::fmt;

use thiserror::Error;

/// Heston parameter validation error.
///
/// Every variant carries the offending value.
///
/// # Examples
///
/// ```
/// use pricer_models::models::heston::HestonError;
///
/// let err = HestonError::InvalidSpot(-100.0);
/// assert!(format!("{}", err).contains("-100"));
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HestonError {
    /// Spot price must be positive and finite.
    #[error("Invalid spot price: S0 = {0} (must be positive and finite)")]
    InvalidSpot(f64),

    /// Initial variance must be positive and finite.
    #[error("Invalid initial variance: V0 = {0} (must be positive and finite)")]
    InvalidV0(f64),

    /// Long-run variance must be positive and finite.
    #[error("Invalid long-run variance: theta = {0} (must be positive and finite)")]
    InvalidTheta(f64),

    /// Mean-reversion speed must be positive and finite.
    #[error("Invalid mean-reversion speed: kappa = {0} (must be positive and finite)")]
    InvalidKappa(f64),

    /// Vol-of-vol must be positive and finite.
    #[error("Invalid vol-of-vol: eta = {0} (must be positive and finite)")]
    InvalidEta(f64),

    /// Correlation must lie in [-1, 1].
    #[error("Invalid correlation: rho = {0} (must be in [-1, 1])")]
    InvalidRho(f64),

    /// Risk-free rate must be finite.
    #[error("Invalid risk-free rate: r = {0} (must be finite)")]
    InvalidRate(f64),

    /// Maturity must be positive and finite.
    #[error("Invalid maturity: T = {0} (must be positive and finite)")]
    InvalidMaturity(f64),
}

/// Heston model parameters.
///
/// Immutable once constructed through [`HestonParams::new`]. Bumped copies for
/// finite-difference sensitivities are produced by the `with_*` helpers, which
/// re-run validation.
///
/// # Fields
///
/// * `spot` - Spot price (S0 > 0)
/// * `v0` - Initial variance (V0 > 0)
/// * `theta` - Long-run variance (theta > 0)
/// * `kappa` - Mean-reversion speed (kappa > 0)
/// * `eta` - Volatility of variance (eta > 0)
/// * `rho` - Correlation (-1 <= rho <= 1)
/// * `rate` - Risk-free rate
/// * `maturity` - Time to maturity in years (T > 0)
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HestonParams {
    /// Spot price (S0)
    pub spot: f64,
    /// Initial variance (V0)
    pub v0: f64,
    /// Long-run variance (theta)
    pub theta: f64,
    /// Mean-reversion speed (kappa)
    pub kappa: f64,
    /// Volatility of variance (eta)
    pub eta: f64,
    /// Asset/variance correlation (rho)
    pub rho: f64,
    /// Risk-free rate (r)
    pub rate: f64,
    /// Time to maturity in years (T)
    pub maturity: f64,
}

#[inline]
fn positive_finite(x: f64) -> bool {
    x > 0.0 && x.is_finite()
}

impl HestonParams {
    /// Create validated Heston parameters.
    ///
    /// # Errors
    ///
    /// Returns the [`HestonError`] variant of the first parameter out of its
    /// domain.
    ///
    /// # Examples
    ///
    /// ```
    /// use pricer_models::models::heston::HestonParams;
    ///
    /// let params = HestonParams::new(100.0, 0.04, 0.04, 2.0, 0.3, -0.7, 0.05, 1.0);
    /// assert!(params.is_ok());
    ///
    /// let invalid = HestonParams::new(-100.0, 0.04, 0.04, 2.0, 0.3, -0.7, 0.05, 1.0);
    /// assert!(invalid.is_err());
    /// ```
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        spot: f64,
        v0: f64,
        theta: f64,
        kappa: f64,
        eta: f64,
        rho: f64,
        rate: f64,
        maturity: f64,
    ) -> Result<Self, HestonError> {
        let params = Self {
            spot,
            v0,
            theta,
            kappa,
            eta,
            rho,
            rate,
            maturity,
        };
        params.validate()?;
        Ok(params)
    }

    /// Validate the parameter domain.
    ///
    /// NaN fails every check, so a NaN field is always rejected.
    pub fn validate(&self) -> Result<(), HestonError> {
        if !positive_finite(self.spot) {
            return Err(HestonError::InvalidSpot(self.spot));
        }
        if !positive_finite(self.v0) {
            return Err(HestonError::InvalidV0(self.v0));
        }
        if !positive_finite(self.theta) {
            return Err(HestonError::InvalidTheta(self.theta));
        }
        if !positive_finite(self.kappa) {
            return Err(HestonError::InvalidKappa(self.kappa));
        }
        if !positive_finite(self.eta) {
            return Err(HestonError::InvalidEta(self.eta));
        }
        if !(-1.0..=1.0).contains(&self.rho) {
            return Err(HestonError::InvalidRho(self.rho));
        }
        if !self.rate.is_finite() {
            return Err(HestonError::InvalidRate(self.rate));
        }
        if !positive_finite(self.maturity) {
            return Err(HestonError::InvalidMaturity(self.maturity));
        }
        Ok(())
    }

    /// Check the Feller condition (2 * kappa * theta > eta^2).
    ///
    /// # Examples
    ///
    /// ```
    /// use pricer_models::models::heston::HestonParams;
    ///
    /// // 2 * 2.0 * 0.04 = 0.16 > 0.3^2 = 0.09
    /// let params = HestonParams::new(100.0, 0.04, 0.04, 2.0, 0.3, -0.7, 0.05, 1.0).unwrap();
    /// assert!(params.satisfies_feller());
    ///
    /// // 2 * 0.5 * 0.04 = 0.04 < 0.5^2 = 0.25
    /// let params2 = HestonParams::new(100.0, 0.04, 0.04, 0.5, 0.5, -0.7, 0.05, 1.0).unwrap();
    /// assert!(!params2.satisfies_feller());
    /// ```
    pub fn satisfies_feller(&self) -> bool {
        let (lhs, rhs) = self.feller_terms();
        lhs > rhs
    }

    /// Feller ratio 2 * kappa * theta / eta^2.
    ///
    /// The condition holds when the ratio exceeds 1.
    pub fn feller_ratio(&self) -> f64 {
        let (lhs, rhs) = self.feller_terms();
        if rhs > 0.0 {
            lhs / rhs
        } else {
            f64::INFINITY
        }
    }

    /// Both sides of the Feller inequality: `(2 * kappa * theta, eta^2)`.
    pub fn feller_terms(&self) -> (f64, f64) {
        (2.0 * self.kappa * self.theta, self.eta * self.eta)
    }

    /// Initial volatility sigma0 = sqrt(V0).
    #[inline]
    pub fn sigma0(&self) -> f64 {
        self.v0.sqrt()
    }

    /// Discount factor exp(-r * T).
    #[inline]
    pub fn discount_factor(&self) -> f64 {
        (-self.rate * self.maturity).exp()
    }

    /// Copy with a different spot price.
    pub fn with_spot(&self, spot: f64) -> Result<Self, HestonError> {
        Self { spot, ..*self }.validated()
    }

    /// Copy with a different initial variance.
    pub fn with_v0(&self, v0: f64) -> Result<Self, HestonError> {
        Self { v0, ..*self }.validated()
    }

    /// Copy with a different initial volatility, setting V0 = sigma0^2.
    pub fn with_sigma0(&self, sigma0: f64) -> Result<Self, HestonError> {
        self.with_v0(sigma0 * sigma0)
    }

    /// Copy with a different risk-free rate.
    pub fn with_rate(&self, rate: f64) -> Result<Self, HestonError> {
        Self { rate, ..*self }.validated()
    }

    /// Copy with a different maturity.
    pub fn with_maturity(&self, maturity: f64) -> Result<Self, HestonError> {
        Self { maturity, ..*self }.validated()
    }

    fn validated(self) -> Result<Self, HestonError> {
        self.validate()?;
        Ok(self)
    }
}

impl Default for HestonParams {
    /// Reference parameter set:
    /// - spot = 100.0
    /// - v0 = 0.04 (20% vol)
    /// - theta = 0.04
    /// - kappa = 2.0
    /// - eta = 0.3
    /// - rho = -0.7
    /// - rate = 0.05
    /// - maturity = 1.0
    fn default() -> Self {
        Self {
            spot: 100.0,
            v0: 0.04,
            theta: 0.04,
            kappa: 2.0,
            eta: 0.3,
            rho: -0.7,
            rate: 0.05,
            maturity: 1.0,
        }
    }
}

impl fmt::Display for HestonParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Heston parameters:")?;
        writeln!(f, "  S0    = {:.4}", self.spot)?;
        writeln!(f, "  V0    = {:.4} (sigma0 = {:.2}%)", self.v0, self.sigma0() * 100.0)?;
        writeln!(f, "  kappa = {:.4}", self.kappa)?;
        writeln!(
            f,
            "  theta = {:.4} (long-run vol = {:.2}%)",
            self.theta,
            self.theta.sqrt() * 100.0
        )?;
        writeln!(f, "  eta   = {:.4}", self.eta)?;
        writeln!(f, "  rho   = {:.4}", self.rho)?;
        writeln!(f, "  r     = {:.4}", self.rate)?;
        writeln!(f, "  T     = {:.4}", self.maturity)?;
        let (lhs, rhs) = self.feller_terms();
        write!(
            f,
            "  Feller: 2*kappa*theta = {:.4} {} eta^2 = {:.4} ({})",
            lhs,
            if lhs > rhs { ">" } else { "<=" },
            rhs,
            if lhs > rhs { "satisfied" } else { "violated" }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_heston_error_invalid_spot_display() {
        let msg = format!("{}", HestonError::InvalidSpot(-100.0));
        assert!(msg.contains("spot"));
        assert!(msg.contains("-100"));
    }

    #[test]
    fn test_heston_error_invalid_rho_display() {
        let msg = format!("{}", HestonError::InvalidRho(1.5));
        assert!(msg.contains("rho"));
        assert!(msg.contains("1.5"));
    }

    #[test]
    fn test_heston_params_new_valid() {
        let params = HestonParams::new(100.0, 0.04, 0.04, 2.0, 0.3, -0.7, 0.05, 1.0).unwrap();
        assert_eq!(params.spot, 100.0);
        assert_eq!(params.v0, 0.04);
        assert_eq!(params.theta, 0.04);
        assert_eq!(params.kappa, 2.0);
        assert_eq!(params.eta, 0.3);
        assert_eq!(params.rho, -0.7);
        assert_eq!(params.rate, 0.05);
        assert_eq!(params.maturity, 1.0);
    }

    #[test]
    fn test_heston_params_default_is_valid() {
        let params = HestonParams::default();
        assert!(params.validate().is_ok());
        let expected = HestonParams::new(100.0, 0.04, 0.04, 2.0, 0.3, -0.7, 0.05, 1.0).unwrap();
        assert_eq!(params, expected);
    }

    #[test]
    fn test_heston_params_validate_all_errors() {
        let base = HestonParams::default();
        let cases = vec![
            (HestonParams { spot: 0.0, ..base }, HestonError::InvalidSpot(0.0)),
            (HestonParams { v0: -0.01, ..base }, HestonError::InvalidV0(-0.01)),
            (HestonParams { theta: 0.0, ..base }, HestonError::InvalidTheta(0.0)),
            (HestonParams { kappa: -1.0, ..base }, HestonError::InvalidKappa(-1.0)),
            (HestonParams { eta: 0.0, ..base }, HestonError::InvalidEta(0.0)),
            (HestonParams { rho: 1.01, ..base }, HestonError::InvalidRho(1.01)),
            (HestonParams { rho: -1.01, ..base }, HestonError::InvalidRho(-1.01)),
            (
                HestonParams { rate: f64::INFINITY, ..base },
                HestonError::InvalidRate(f64::INFINITY),
            ),
            (HestonParams { maturity: 0.0, ..base }, HestonError::InvalidMaturity(0.0)),
        ];

        for (params, expected) in cases {
            assert_eq!(params.validate(), Err(expected));
        }
    }

    #[test]
    fn test_heston_params_rejects_nan() {
        let base = HestonParams::default();
        assert!(HestonParams { spot: f64::NAN, ..base }.validate().is_err());
        assert!(HestonParams { rho: f64::NAN, ..base }.validate().is_err());
        assert!(HestonParams { rate: f64::NAN, ..base }.validate().is_err());
    }

    #[test]
    fn test_heston_params_rho_boundaries_accepted() {
        let base = HestonParams::default();
        assert!(HestonParams { rho: 1.0, ..base }.validate().is_ok());
        assert!(HestonParams { rho: -1.0, ..base }.validate().is_ok());
    }

    #[test]
    fn test_heston_params_negative_rate_accepted() {
        let params = HestonParams::default().with_rate(-0.01).unwrap();
        assert_eq!(params.rate, -0.01);
    }

    #[test]
    fn test_heston_params_feller() {
        let params = HestonParams::default();
        assert!(params.satisfies_feller());
        assert_relative_eq!(params.feller_ratio(), 0.16 / 0.09, epsilon = 1e-12);

        let violating = HestonParams { kappa: 0.5, eta: 0.5, ..params };
        assert!(!violating.satisfies_feller());
        assert!(violating.feller_ratio() < 1.0);
    }

    #[test]
    fn test_heston_params_derived_values() {
        let params = HestonParams::default();
        assert_relative_eq!(params.sigma0(), 0.2, epsilon = 1e-15);
        assert_relative_eq!(params.discount_factor(), (-0.05_f64).exp(), epsilon = 1e-15);
    }

    #[test]
    fn test_heston_params_bump_helpers() {
        let params = HestonParams::default();

        assert_eq!(params.with_spot(101.0).unwrap().spot, 101.0);
        assert_eq!(params.with_v0(0.05).unwrap().v0, 0.05);
        assert_eq!(params.with_maturity(2.0).unwrap().maturity, 2.0);
        assert_relative_eq!(params.with_sigma0(0.25).unwrap().v0, 0.0625, epsilon = 1e-15);

        // The original is untouched
        assert_eq!(params, HestonParams::default());
    }

    #[test]
    fn test_heston_params_bump_helpers_revalidate() {
        let params = HestonParams::default();
        assert_eq!(params.with_spot(-1.0), Err(HestonError::InvalidSpot(-1.0)));
        assert_eq!(params.with_maturity(0.0), Err(HestonError::InvalidMaturity(0.0)));
        assert!(params.with_sigma0(0.0).is_err());
    }

    #[test]
    fn test_heston_params_display() {
        let text = format!("{}", HestonParams::default());
        assert!(text.contains("S0    = 100.0000"));
        assert!(text.contains("sigma0 = 20.00%"));
        assert!(text.contains("satisfied"));

        let violating = HestonParams { kappa: 0.5, eta: 0.5, ..HestonParams::default() };
        assert!(format!("{}", violating).contains("violated"));
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(200))]

            #[test]
            fn test_feller_ratio_agrees_with_condition(
                kappa in 0.1_f64..5.0,
                theta in 0.01_f64..0.2,
                eta in 0.05_f64..1.5,
            ) {
                let params = HestonParams { kappa, theta, eta, ..HestonParams::default() };
                if params.satisfies_feller() {
                    prop_assert!(params.feller_ratio() >= 1.0);
                } else {
                    prop_assert!(params.feller_ratio() <= 1.0);
                }
            }
        }
    }
}
