//! Price command implementation
//!
//! Prices the configured European option.

use pricer_pricing::mc::HestonMonteCarloPricer;
use tracing::info;

use super::{print_estimate, print_header, print_json, print_warnings, OutputFormat};
use crate::config::RunConfig;
use crate::Result;

/// Run the price command
pub fn run(config: &RunConfig, format: OutputFormat) -> Result<()> {
    let params = config.params()?;
    let spec = config.spec()?;
    let payoff = config.payoff()?;
    info!(kind = %payoff.kind, strike = payoff.strike, "Starting pricing...");

    let pricer = HestonMonteCarloPricer::new(params, spec)?;
    let estimate = pricer.price(&payoff)?;

    match format {
        OutputFormat::Json => print_json(&estimate)?,
        OutputFormat::Table => {
            print_header(pricer.params(), pricer.spec());
            print_estimate(&format!("European {} (K = {})", payoff.kind, payoff.strike), &estimate);
            print_warnings(&estimate.warnings);
        }
    }

    info!("Pricing complete");
    Ok(())
}
