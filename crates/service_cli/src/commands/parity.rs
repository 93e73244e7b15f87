//! Parity command implementation
//!
//! Prices a call and a put on one batch and checks put-call parity.

use pricer_pricing::mc::HestonMonteCarloPricer;
use tracing::{info, warn};

use super::{print_estimate, print_header, print_json, print_warnings, OutputFormat};
use crate::config::RunConfig;
use crate::Result;

/// Parity tolerance in standard errors.
const PARITY_TOLERANCE_SE: f64 = 3.0;

/// Run the parity command
pub fn run(config: &RunConfig, format: OutputFormat) -> Result<()> {
    let pricer = HestonMonteCarloPricer::new(config.params()?, config.spec()?)?;
    let pricing = pricer.price_call_put(config.option.strike)?;
    let parity = &pricing.parity;

    if !parity.holds_within(PARITY_TOLERANCE_SE) {
        warn!(
            z_score = parity.z_score(),
            "Put-call parity violated beyond {} standard errors", PARITY_TOLERANCE_SE
        );
    }

    match format {
        OutputFormat::Json => print_json(&pricing)?,
        OutputFormat::Table => {
            print_header(pricer.params(), pricer.spec());
            print_estimate("Call", &pricing.call);
            print_estimate("Put", &pricing.put);
            println!();
            println!("C - P:              {:.4}", parity.call_minus_put);
            println!("S - K*exp(-rT):     {:.4}", parity.theoretical);
            println!("Difference:         {:.6}", parity.difference);
            if parity.theoretical != 0.0 {
                println!(
                    "Relative Error:     {:.6}%",
                    100.0 * parity.difference / parity.theoretical.abs()
                );
            }
            println!(
                "z-score:            {:.3} ({})",
                parity.z_score(),
                if parity.holds_within(PARITY_TOLERANCE_SE) {
                    "holds"
                } else {
                    "violated"
                }
            );
            print_warnings(&pricing.call.warnings);
        }
    }

    info!("Parity check complete");
    Ok(())
}
