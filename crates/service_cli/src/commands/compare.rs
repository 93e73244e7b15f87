//! Compare command implementation
//!
//! Prices the configured option under both discretisation schemes and under
//! each variance reduction technique with the same path budget.

use pricer_models::models::HestonParams;
use pricer_pricing::mc::{
    estimate, estimate_variance_reduction, DiscretisationScheme, HestonMonteCarloPricer, Payoff,
    PriceEstimate, SimulationSpec, TerminalState, VanillaPayoff,
};
use tracing::info;

use super::{print_estimate, print_header};
use crate::config::RunConfig;
use crate::Result;

/// Run the compare command
pub fn run(config: &RunConfig, reference: Option<f64>) -> Result<()> {
    let params = config.params()?;
    let base = config.spec()?;
    let payoff = config.payoff()?;
    print_header(&params, &base);

    info!("Comparing discretisation schemes...");
    println!("1. SCHEME COMPARISON (antithetic)");
    println!("{}", "-".repeat(60));
    for scheme in [DiscretisationScheme::Euler, DiscretisationScheme::Milstein] {
        let spec = config
            .spec_builder()?
            .scheme(scheme)
            .antithetic(true)
            .quasi_random(false)
            .build()?;
        let estimate = HestonMonteCarloPricer::new(params, spec)?.price(&payoff)?;
        report(&format!("{} scheme", scheme), &estimate, reference);
    }

    info!("Comparing variance reduction...");
    println!();
    println!("2. VARIANCE REDUCTION COMPARISON ({} scheme)", base.scheme());
    println!("{}", "-".repeat(60));

    let plain_spec = config.spec_builder()?.antithetic(false).quasi_random(false).build()?;
    let plain = discounted_payoffs(&params, &plain_spec, &payoff)?;
    let plain_estimate = estimate(&plain);
    report("Plain Monte Carlo", &plain_estimate, reference);

    let antithetic_spec = config.spec_builder()?.antithetic(true).quasi_random(false).build()?;
    let antithetic = discounted_payoffs(&params, &antithetic_spec, &payoff)?;
    let antithetic_estimate = estimate(&antithetic);
    report("Antithetic variates", &antithetic_estimate, reference);

    let sobol_spec = config.spec_builder()?.antithetic(false).quasi_random(true).build()?;
    let sobol = HestonMonteCarloPricer::new(params, sobol_spec)?.price(&payoff)?;
    report("Sobol quasi-random", &sobol, reference);

    let reduction = estimate_variance_reduction(&plain, &pair_samples(&antithetic));
    println!();
    println!("Antithetic variance reduction:  {:.1}%", reduction.reduction_pct);
    println!("Efficiency ratio:               {:.2}", reduction.efficiency_ratio);

    info!("Comparison complete");
    Ok(())
}

fn report(label: &str, estimate: &PriceEstimate, reference: Option<f64>) {
    print_estimate(label, estimate);
    println!("  CI Width:       {:.4}", 2.0 * estimate.confidence_95());
    if let Some(reference) = reference {
        let comparison = estimate.compare_to_reference(reference);
        println!(
            "  vs {:.4}:     error {:.4}, z-score {:.2}, {}",
            reference,
            comparison.absolute_error,
            comparison.z_score,
            if comparison.within_confidence_interval {
                "inside CI"
            } else {
                "outside CI"
            }
        );
    }
}

fn discounted_payoffs(
    params: &HestonParams,
    spec: &SimulationSpec,
    payoff: &VanillaPayoff,
) -> Result<Vec<f64>> {
    let result = HestonMonteCarloPricer::new(*params, spec.clone())?.simulate()?;
    Ok(result.discounted_payoffs(params.discount_factor(), |spot, variance| {
        payoff.payoff(&TerminalState { spot, variance })
    }))
}

/// Antithetic pairs folded into `(Y + Y') / sqrt(2)`.
///
/// The variance of these samples is the per-path variance of the antithetic
/// estimator, so it compares directly with plain per-path payoffs at the
/// same path budget. Mirrors live in the second half of the batch.
fn pair_samples(antithetic: &[f64]) -> Vec<f64> {
    let (base, mirrored) = antithetic.split_at(antithetic.len() / 2);
    base.iter()
        .zip(mirrored)
        .map(|(y, y_mirror)| (y + y_mirror) / std::f64::consts::SQRT_2)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_pair_samples_fold_mirrors() {
        let samples = [1.0, 3.0, 2.0, -3.0];
        let folded = pair_samples(&samples);
        assert_eq!(folded.len(), 2);
        assert_relative_eq!(folded[0], 3.0 / std::f64::consts::SQRT_2);
        assert_relative_eq!(folded[1], 0.0);
    }
}
