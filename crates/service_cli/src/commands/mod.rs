//! CLI command implementations
//!
//! Each submodule implements a specific CLI command.

pub mod compare;
pub mod greeks;
pub mod parity;
pub mod price;
pub mod simulate;

use pricer_models::models::HestonParams;
use pricer_pricing::mc::{NumericalWarning, PriceEstimate, SimulationSpec};
use serde::Serialize;

use crate::Result;

/// Output format for results.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    #[default]
    Table,
    /// Pretty-printed JSON
    Json,
}

/// Prints `value` as pretty JSON on stdout.
pub(crate) fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Prints the model parameters and the simulation setup.
pub(crate) fn print_header(params: &HestonParams, spec: &SimulationSpec) {
    println!("{}", params);
    println!("Simulation:");
    println!(
        "  paths = {} ({} effective), steps = {}, scheme = {}",
        spec.n_paths(),
        spec.effective_paths(),
        spec.n_steps(),
        spec.scheme()
    );
    println!(
        "  antithetic = {}, quasi-random = {}, seed = {}",
        spec.antithetic(),
        spec.quasi_random(),
        spec.seed()
            .map_or_else(|| "entropy".to_string(), |seed| seed.to_string())
    );
    println!();
}

/// Prints one price estimate block.
pub(crate) fn print_estimate(label: &str, estimate: &PriceEstimate) {
    let (lower, upper) = estimate.confidence_interval;
    println!("{}:", label);
    println!("  Price:          {:.4}", estimate.price);
    println!("  Std Error:      {:.4}", estimate.standard_error);
    println!("  95% CI:         [{:.4}, {:.4}]", lower, upper);
}

/// Prints numerical warnings, if any.
pub(crate) fn print_warnings(warnings: &[NumericalWarning]) {
    for warning in warnings {
        println!("Warning: {}", warning);
    }
}
