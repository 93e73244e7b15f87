//! Shared helpers for integration tests: closed-form reference prices.

#![allow(dead_code)]

use std::f64::consts::PI;

use num_complex::Complex64;
use pricer_core::math::distributions::{norm_cdf, norm_pdf};
use pricer_models::models::HestonParams;
use pricer_pricing::mc::{CorrelationCoupler, DiscretisationScheme, HestonStepper, PathState};
use pricer_pricing::rng::PricerRng;

/// Characteristic function of `ln(S_T / F)` in the Gatheral formulation.
fn log_forward_cf(params: &HestonParams, u: Complex64) -> Complex64 {
    let i = Complex64::new(0.0, 1.0);
    let one = Complex64::new(1.0, 0.0);
    let t = params.maturity;
    let eta2 = params.eta * params.eta;

    let iu = i * u;
    let beta = Complex64::new(params.kappa, 0.0) - params.rho * params.eta * iu;
    let mut d = (beta * beta + eta2 * (u * u + iu)).sqrt();
    if d.re < 0.0 {
        d = -d;
    }

    let g = (beta - d) / (beta + d);
    let exp_neg_dt = (-d * t).exp();
    let log_term = ((one - g * exp_neg_dt) / (one - g)).ln();

    let a = params.kappa * params.theta / eta2 * ((beta - d) * t - 2.0 * log_term);
    let b = (beta - d) / eta2 * ((one - exp_neg_dt) / (one - g * exp_neg_dt));
    (a + b * params.v0).exp()
}

/// Heston European call by the Lewis single-integral formula, integrated
/// with composite Simpson on `[0, 200]`.
pub fn heston_call(params: &HestonParams, strike: f64) -> f64 {
    let df = params.discount_factor();
    let forward = params.spot / df;
    let log_moneyness = (forward / strike).ln();
    let half_i = Complex64::new(0.0, 0.5);
    let i = Complex64::new(0.0, 1.0);

    let integrand = |x: f64| {
        let u = Complex64::new(x, 0.0);
        let psi = log_forward_cf(params, u - half_i);
        ((i * u * log_moneyness).exp() * psi).re / (x * x + 0.25)
    };

    let n = 20_000;
    let upper = 200.0;
    let h = upper / n as f64;
    let mut integral = integrand(0.0) + integrand(upper);
    for k in 1..n {
        let weight = if k % 2 == 1 { 4.0 } else { 2.0 };
        integral += weight * integrand(k as f64 * h);
    }
    integral *= h / 3.0;

    df * (forward - (forward * strike).sqrt() * integral / PI)
}

/// Heston European put via put-call parity.
pub fn heston_put(params: &HestonParams, strike: f64) -> f64 {
    heston_call(params, strike) - params.spot + strike * params.discount_factor()
}

/// Black-Scholes call with constant volatility `vol`.
pub fn black_scholes_call(spot: f64, strike: f64, rate: f64, vol: f64, maturity: f64) -> f64 {
    let sqrt_t = maturity.sqrt();
    let d1 = ((spot / strike).ln() + (rate + 0.5 * vol * vol) * maturity) / (vol * sqrt_t);
    let d2 = d1 - vol * sqrt_t;
    spot * norm_cdf(d1) - strike * (-rate * maturity).exp() * norm_cdf(d2)
}

/// Black-Scholes vega (per unit of volatility).
pub fn black_scholes_vega(spot: f64, strike: f64, rate: f64, vol: f64, maturity: f64) -> f64 {
    let sqrt_t = maturity.sqrt();
    let d1 = ((spot / strike).ln() + (rate + 0.5 * vol * vol) * maturity) / (vol * sqrt_t);
    spot * norm_pdf(d1) * sqrt_t
}

/// Discounted call prices of `scheme` on each grid in `levels`, all driven by
/// the same Brownian paths.
///
/// Normals are drawn on the finest grid; a coarser grid with `m` steps sums
/// each block of `finest / m` fine increments and rescales by its square
/// root. Every level must divide the finest one. Paths come in antithetic
/// pairs, so `2 * n_pairs` paths are used.
pub fn brownian_consistent_calls(
    params: &HestonParams,
    scheme: DiscretisationScheme,
    strike: f64,
    levels: &[usize],
    n_pairs: usize,
    seed: u64,
) -> Vec<f64> {
    let finest = levels.iter().copied().max().unwrap_or(1);
    assert!(levels.iter().all(|&m| m > 0 && finest % m == 0));

    let coupler = CorrelationCoupler::new(params.rho);
    let steppers: Vec<HestonStepper> = levels
        .iter()
        .map(|&m| HestonStepper::new(params, scheme, params.maturity / m as f64))
        .collect();

    let mut fine = vec![0.0; 2 * finest];
    let mut sums = vec![0.0; levels.len()];

    for pair in 0..n_pairs {
        PricerRng::for_stream(seed, pair as u64).fill_normal(&mut fine);
        for sign in [1.0, -1.0] {
            for ((&m, stepper), sum) in levels.iter().zip(&steppers).zip(sums.iter_mut()) {
                let block = finest / m;
                let scale = sign / (block as f64).sqrt();
                let mut state = PathState::initial(params);
                for step in fine.chunks_exact(2 * block) {
                    let z1: f64 = step.iter().step_by(2).sum();
                    let z2: f64 = step.iter().skip(1).step_by(2).sum();
                    let (w1, w2) = coupler.couple(scale * z1, scale * z2);
                    state = stepper.step(state, w1, w2).0;
                }
                *sum += (state.spot - strike).max(0.0);
            }
        }
    }

    let scale = params.discount_factor() / (2 * n_pairs) as f64;
    sums.into_iter().map(|sum| sum * scale).collect()
}

/// Reference parameter set used across the integration tests.
pub fn reference_params() -> HestonParams {
    HestonParams::new(100.0, 0.04, 0.04, 2.0, 0.3, -0.7, 0.05, 1.0).unwrap()
}
