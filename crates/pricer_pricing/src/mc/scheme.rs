//! Euler and Milstein discretisation of the Heston SDE.
//!
//! Per step, with the floored variance `V_t >= 0` and coupled drivers
//! `(W1, W2)`:
//! ```text
//! S_{t+1} = S_t * exp((r - V_t / 2) * dt + sqrt(V_t) * sqrt(dt) * W1)
//! raw     = V_t + kappa * (theta - V_t) * dt + eta * sqrt(V_t) * sqrt(dt) * W2
//!         [+ 1/4 * eta^2 * dt * (W2^2 - 1)]     (Milstein only)
//! V_{t+1} = max(0, raw)                          (full truncation)
//! ```
//!
//! The asset step is log-Euler in both schemes, so `S` stays positive.

use pricer_models::models::HestonParams;

use super::config::DiscretisationScheme;

/// State of one path at one time point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PathState {
    /// Asset price, always positive.
    pub spot: f64,
    /// Instantaneous variance, never negative.
    pub variance: f64,
}

impl PathState {
    /// Initial state `(S0, V0)`.
    #[inline]
    pub fn initial(params: &HestonParams) -> Self {
        Self {
            spot: params.spot,
            variance: params.v0,
        }
    }
}

/// One-step Heston update with precomputed coefficients.
///
/// # Examples
///
/// ```rust
/// use pricer_models::models::HestonParams;
/// use pricer_pricing::mc::{DiscretisationScheme, HestonStepper, PathState};
///
/// let params = HestonParams::default();
/// let stepper = HestonStepper::new(&params, DiscretisationScheme::Euler, 1.0);
///
/// let (next, floored) = stepper.step(PathState::initial(&params), 0.0, 0.0);
/// assert!((next.spot - 100.0 * 0.03_f64.exp()).abs() < 1e-12);
/// assert!((next.variance - 0.04).abs() < 1e-15);
/// assert!(!floored);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HestonStepper {
    scheme: DiscretisationScheme,
    rate: f64,
    kappa: f64,
    theta: f64,
    eta: f64,
    dt: f64,
    sqrt_dt: f64,
    milstein_coefficient: f64,
}

impl HestonStepper {
    /// Creates the stepper for time step `dt`.
    pub fn new(params: &HestonParams, scheme: DiscretisationScheme, dt: f64) -> Self {
        Self {
            scheme,
            rate: params.rate,
            kappa: params.kappa,
            theta: params.theta,
            eta: params.eta,
            dt,
            sqrt_dt: dt.sqrt(),
            milstein_coefficient: 0.25 * params.eta * params.eta * dt,
        }
    }

    /// Discretisation scheme.
    #[inline]
    pub fn scheme(&self) -> DiscretisationScheme {
        self.scheme
    }

    /// Time step.
    #[inline]
    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// Advances `state` by one step with coupled drivers `(w1, w2)`.
    ///
    /// Returns the new state and whether the raw variance update was negative
    /// and had to be floored at zero.
    #[inline]
    pub fn step(&self, state: PathState, w1: f64, w2: f64) -> (PathState, bool) {
        let v = state.variance;
        let sqrt_v = v.sqrt();

        let spot =
            state.spot * ((self.rate - 0.5 * v) * self.dt + sqrt_v * self.sqrt_dt * w1).exp();

        let mut raw =
            v + self.kappa * (self.theta - v) * self.dt + self.eta * sqrt_v * self.sqrt_dt * w2;
        if self.scheme == DiscretisationScheme::Milstein {
            raw += self.milstein_coefficient * (w2 * w2 - 1.0);
        }

        let floored = raw < 0.0;
        let variance = if floored { 0.0 } else { raw };

        (PathState { spot, variance }, floored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_single_euler_step_closed_form() {
        let params = HestonParams::default();
        let stepper = HestonStepper::new(&params, DiscretisationScheme::Euler, 1.0);
        let (next, floored) = stepper.step(PathState::initial(&params), 0.0, 0.0);

        assert_relative_eq!(next.spot, 100.0 * (0.03_f64).exp(), epsilon = 1e-12);
        assert_relative_eq!(next.spot, 103.045_453_395_351_7, epsilon = 1e-9);
        assert_relative_eq!(next.variance, 0.04, epsilon = 1e-15);
        assert!(!floored);
    }

    #[test]
    fn test_milstein_correction() {
        let params = HestonParams::default();
        let dt = 0.01;
        let euler = HestonStepper::new(&params, DiscretisationScheme::Euler, dt);
        let milstein = HestonStepper::new(&params, DiscretisationScheme::Milstein, dt);
        let state = PathState::initial(&params);

        for w2 in [-1.5, -0.3, 0.0, 0.8, 2.0] {
            let (e, _) = euler.step(state, 0.1, w2);
            let (m, _) = milstein.step(state, 0.1, w2);
            assert_eq!(e.spot, m.spot);
            assert_relative_eq!(
                m.variance - e.variance,
                0.25 * 0.09 * dt * (w2 * w2 - 1.0),
                epsilon = 1e-15
            );
        }
    }

    #[test]
    fn test_full_truncation_counts_floor_hit() {
        let params = HestonParams::default();
        let stepper = HestonStepper::new(&params, DiscretisationScheme::Euler, 0.1);
        let state = PathState {
            spot: 100.0,
            variance: 0.01,
        };

        let (next, floored) = stepper.step(state, 0.0, -10.0);
        assert!(floored);
        assert_eq!(next.variance, 0.0);

        // At zero variance the asset drifts deterministically at r
        let (after, _) = stepper.step(next, 3.0, 0.0);
        assert_relative_eq!(after.spot, next.spot * (0.05_f64 * 0.1).exp(), epsilon = 1e-12);
    }

    #[test]
    fn test_zero_variance_step_is_not_a_floor_hit() {
        let params = HestonParams::default();
        let stepper = HestonStepper::new(&params, DiscretisationScheme::Milstein, 0.5);
        let state = PathState {
            spot: 100.0,
            variance: 0.0,
        };
        // raw = kappa * theta * dt + 1/4 eta^2 dt (w2^2 - 1) > 0 for w2 = 0
        let (next, floored) = stepper.step(state, 0.0, 0.0);
        assert!(!floored);
        assert!(next.variance > 0.0);
    }
}
