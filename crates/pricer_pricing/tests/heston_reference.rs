//! Monte Carlo prices against closed-form Heston references.

mod common;

use common::{
    black_scholes_call, black_scholes_vega, brownian_consistent_calls, heston_call, heston_put,
    reference_params,
};
use pricer_models::models::HestonParams;
use pricer_pricing::greeks::BumpParameter;
use pricer_pricing::mc::{
    DiscretisationScheme, HestonMonteCarloPricer, SimulationSpec, VanillaPayoff,
};

fn pricer(
    params: HestonParams,
    scheme: DiscretisationScheme,
    quasi_random: bool,
) -> HestonMonteCarloPricer {
    let spec = SimulationSpec::builder()
        .n_paths(50_000)
        .n_steps(100)
        .scheme(scheme)
        .antithetic(!quasi_random)
        .quasi_random(quasi_random)
        .seed(20_240_601)
        .build()
        .unwrap();
    HestonMonteCarloPricer::new(params, spec).unwrap()
}

#[test]
fn test_reference_reduces_to_black_scholes() {
    // Almost no vol-of-vol and V0 = theta: constant 20% volatility
    let params = HestonParams::new(100.0, 0.04, 0.04, 2.0, 0.01, 0.0, 0.05, 1.0).unwrap();
    let heston = heston_call(&params, 100.0);
    let bs = black_scholes_call(100.0, 100.0, 0.05, 0.2, 1.0);
    assert!((heston - bs).abs() < 1e-3, "heston {} bs {}", heston, bs);
}

#[test]
fn test_both_schemes_match_closed_form_call() {
    let params = reference_params();
    let reference = heston_call(&params, 100.0);

    for scheme in [DiscretisationScheme::Euler, DiscretisationScheme::Milstein] {
        let estimate = pricer(params, scheme, false)
            .price(&VanillaPayoff::call(100.0))
            .unwrap();
        let comparison = estimate.compare_to_reference(reference);

        // Discretisation bias at 100 steps is a few cents
        assert!(
            comparison.absolute_error < 3.0 * estimate.standard_error + 0.05,
            "{}: mc {} reference {} se {}",
            scheme,
            estimate.price,
            reference,
            estimate.standard_error
        );
    }
}

#[test]
fn test_out_of_the_money_put_matches_closed_form() {
    let params = reference_params();
    let reference = heston_put(&params, 90.0);
    let estimate = pricer(params, DiscretisationScheme::Milstein, false)
        .price(&VanillaPayoff::put(90.0))
        .unwrap();

    assert!(
        (estimate.price - reference).abs() < 3.0 * estimate.standard_error + 0.05,
        "mc {} reference {}",
        estimate.price,
        reference
    );
}

#[test]
fn test_quasi_random_matches_closed_form() {
    let params = reference_params();
    let reference = heston_call(&params, 110.0);
    let estimate = pricer(params, DiscretisationScheme::Milstein, true)
        .price(&VanillaPayoff::call(110.0))
        .unwrap();

    assert!(
        (estimate.price - reference).abs() < 3.0 * estimate.standard_error + 0.05,
        "qmc {} reference {}",
        estimate.price,
        reference
    );
}

#[test]
fn test_feller_violating_error_shrinks_with_refinement() {
    // 2 kappa theta = 0.04 < eta^2 = 0.36
    let params = HestonParams::new(100.0, 0.04, 0.04, 0.5, 0.6, -0.5, 0.03, 1.0).unwrap();
    let reference = heston_call(&params, 100.0);

    let spec = SimulationSpec::builder()
        .n_paths(2_000)
        .n_steps(100)
        .seed(3)
        .build()
        .unwrap();
    let estimate = HestonMonteCarloPricer::new(params, spec)
        .unwrap()
        .price(&VanillaPayoff::call(100.0))
        .unwrap();
    assert!(!estimate.warnings.is_empty());

    // Full truncation is biased upwards when the variance sits at zero
    // often; the bias decays slowly, so check that each refinement of the
    // same Brownian paths moves the price towards the reference.
    let levels = [25, 100, 400];
    let prices = brownian_consistent_calls(
        &params,
        DiscretisationScheme::Euler,
        100.0,
        &levels,
        15_000,
        41,
    );
    let errors: Vec<f64> = prices.iter().map(|price| price - reference).collect();

    assert!(errors.iter().all(|&e| e > 0.0), "errors {:?}", errors);
    for pair in errors.windows(2) {
        assert!(pair[0] - pair[1] > 0.03, "errors {:?}", errors);
    }
}

#[test]
fn test_vega_matches_black_scholes_without_vol_of_vol() {
    // Negligible kappa and eta: the variance stays at V0 and sigma0 is the
    // Black-Scholes volatility
    let params = HestonParams::new(100.0, 0.04, 0.04, 1e-8, 1e-4, 0.0, 0.05, 1.0).unwrap();
    let spec = SimulationSpec::builder()
        .n_paths(20_000)
        .n_steps(10)
        .antithetic(true)
        .seed(97)
        .build()
        .unwrap();
    let pricer = HestonMonteCarloPricer::new(params, spec).unwrap();

    let vega = pricer
        .greek(&VanillaPayoff::call(100.0), BumpParameter::Sigma0, 0.002)
        .unwrap();
    let expected = black_scholes_vega(100.0, 100.0, 0.05, 0.2, 1.0);

    assert!(
        (vega.value - expected).abs() < 4.0 * vega.standard_error + 0.05,
        "mc vega {} (se {}) black-scholes {}",
        vega.value,
        vega.standard_error,
        expected
    );
}
