//! Greeks command implementation
//!
//! Computes finite-difference sensitivities with common random numbers,
//! either the full set or a single bumped parameter.

use pricer_models::models::HestonParams;
use pricer_pricing::greeks::{BumpParameter, GreeksConfig};
use pricer_pricing::mc::HestonMonteCarloPricer;
use tracing::info;

use super::{print_estimate, print_header, print_json, print_warnings, OutputFormat};
use crate::config::RunConfig;
use crate::Result;

const DAYS_PER_YEAR: f64 = 365.0;

/// Run the greeks command
pub fn run(
    config: &RunConfig,
    parameter: Option<&str>,
    bump: Option<f64>,
    format: OutputFormat,
) -> Result<()> {
    let pricer = HestonMonteCarloPricer::new(config.params()?, config.spec()?)?;
    let payoff = config.payoff()?;
    let greeks_config = GreeksConfig::default();

    if let Some(name) = parameter {
        let parameter: BumpParameter = name.parse()?;
        let bump = bump.unwrap_or_else(|| default_bump(&greeks_config, pricer.params(), parameter));
        info!(%parameter, bump, "Computing single Greek...");

        let greek = pricer.greek(&payoff, parameter, bump)?;
        match format {
            OutputFormat::Json => print_json(&greek)?,
            OutputFormat::Table => {
                print_header(pricer.params(), pricer.spec());
                println!("dP/d{}:  {}", parameter, greek);
            }
        }
        return Ok(());
    }

    info!("Computing Greeks...");
    let greeks = pricer.greeks(&payoff, &greeks_config)?;

    match format {
        OutputFormat::Json => print_json(&greeks)?,
        OutputFormat::Table => {
            print_header(pricer.params(), pricer.spec());
            print_estimate(
                &format!("European {} (K = {})", payoff.kind, payoff.strike),
                &greeks.price,
            );
            println!();
            for (name, greek) in greeks.sensitivities() {
                println!(
                    "{:<18} {:>12.4}   (SE {:.4})",
                    name, greek.value, greek.standard_error
                );
            }
            println!(
                "{:<18} {:>12.4}",
                "theta (per day)",
                greeks.theta.value / DAYS_PER_YEAR
            );
            print_warnings(&greeks.price.warnings);
        }
    }

    info!("Greeks complete");
    Ok(())
}

/// Bump used when none is given on the command line.
fn default_bump(config: &GreeksConfig, params: &HestonParams, parameter: BumpParameter) -> f64 {
    match parameter {
        BumpParameter::Spot => config.spot_bump(params.spot),
        BumpParameter::Sigma0 => config.vol_bump(params.sigma0()),
        BumpParameter::V0 => config.vol_bump_relative * params.v0,
        BumpParameter::Rate => config.rate_bump,
        BumpParameter::Maturity => config.time_bump,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_default_bumps_follow_config() {
        let config = GreeksConfig::default();
        let params = HestonParams::default();

        assert_relative_eq!(
            default_bump(&config, &params, BumpParameter::Spot),
            1.0,
            epsilon = 1e-12
        );
        assert_relative_eq!(
            default_bump(&config, &params, BumpParameter::Sigma0),
            0.002,
            epsilon = 1e-12
        );
        assert_relative_eq!(
            default_bump(&config, &params, BumpParameter::V0),
            0.0004,
            epsilon = 1e-12
        );
        assert_eq!(default_bump(&config, &params, BumpParameter::Rate), 1e-4);
        assert_eq!(default_bump(&config, &params, BumpParameter::Maturity), 1.0 / 365.0);
    }
}
