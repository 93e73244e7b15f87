//! Cholesky coupling of independent normals into correlated Brownian drivers.
//!
//! For a 2x2 correlation matrix the Cholesky factor gives
//! ```text
//! W1 = Z1
//! W2 = rho * Z1 + sqrt(1 - rho^2) * Z2
//! ```

/// Precomputed 2x2 Cholesky coupler.
///
/// # Examples
///
/// ```rust
/// use pricer_pricing::mc::CorrelationCoupler;
///
/// let coupler = CorrelationCoupler::new(-0.7);
/// let (w1, w2) = coupler.couple(1.0, 0.0);
/// assert_eq!(w1, 1.0);
/// assert_eq!(w2, -0.7);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CorrelationCoupler {
    rho: f64,
    rho_bar: f64,
}

impl CorrelationCoupler {
    /// Creates the coupler for correlation `rho`.
    ///
    /// `rho_bar = sqrt(max(0, 1 - rho^2))`, so `rho = ±1` yields exactly 0.
    #[inline]
    pub fn new(rho: f64) -> Self {
        Self {
            rho,
            rho_bar: (1.0 - rho * rho).max(0.0).sqrt(),
        }
    }

    /// Correlation coefficient.
    #[inline]
    pub fn rho(&self) -> f64 {
        self.rho
    }

    /// Complementary loading `sqrt(1 - rho^2)`.
    #[inline]
    pub fn rho_bar(&self) -> f64 {
        self.rho_bar
    }

    /// Couples one pair of independent normals into `(W1, W2)`.
    #[inline]
    pub fn couple(&self, z1: f64, z2: f64) -> (f64, f64) {
        (z1, self.rho * z1 + self.rho_bar * z2)
    }
}
