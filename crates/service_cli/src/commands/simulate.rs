//! Simulate command implementation
//!
//! Simulates a batch of paths, prints terminal statistics against their
//! model expectations and optionally dumps path histories to CSV.

use std::path::Path;

use pricer_models::models::HestonParams;
use pricer_pricing::mc::{mean_and_variance, simulate_paths, PathHistory, SimulationResult};
use serde::Serialize;
use tracing::info;

use super::{print_header, print_warnings};
use crate::config::RunConfig;
use crate::Result;

/// One row of the path dump.
#[derive(Debug, Serialize)]
struct PathRecord {
    path: usize,
    step: usize,
    time: f64,
    spot: f64,
    variance: f64,
}

/// Run the simulate command
pub fn run(config: &RunConfig, output: Option<&Path>, max_paths: usize) -> Result<()> {
    let params = config.params()?;
    let spec = config.spec_builder()?.retain_paths(output.is_some()).build()?;
    print_header(&params, &spec);

    info!("Simulating paths...");
    let result = simulate_paths(&params, &spec)?;
    print_statistics(&params, &result);
    print_warnings(&result.warnings);

    if let (Some(path), Some(history)) = (output, result.paths.as_ref()) {
        let dt = spec.dt(params.maturity);
        let written = write_paths(path, history, dt, max_paths)?;
        info!(paths = written, file = %path.display(), "Path histories written");
        println!();
        println!("Wrote {} paths to {}", written, path.display());
    }

    Ok(())
}

fn print_statistics(params: &HestonParams, result: &SimulationResult) {
    let (spot_mean, spot_variance) = mean_and_variance(&result.terminal_spots);
    let (variance_mean, variance_variance) = mean_and_variance(&result.terminal_variances);
    let min_spot = result.terminal_spots.iter().copied().fold(f64::INFINITY, f64::min);
    let max_spot = result.terminal_spots.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    let forward = params.spot / params.discount_factor();
    let expected_variance =
        params.theta + (params.v0 - params.theta) * (-params.kappa * params.maturity).exp();

    println!("Terminal statistics ({} paths):", result.n_paths());
    println!(
        "  S_T mean:       {:.4}   (forward {:.4})",
        spot_mean, forward
    );
    println!("  S_T std:        {:.4}", spot_variance.sqrt());
    println!("  S_T range:      [{:.4}, {:.4}]", min_spot, max_spot);
    println!(
        "  V_T mean:       {:.6} (expected {:.6})",
        variance_mean, expected_variance
    );
    println!("  V_T std:        {:.6}", variance_variance.sqrt());
    println!(
        "  Floor hits:     {} of {} steps ({:.4}%)",
        result.diagnostics.floor_hits,
        result.diagnostics.total_steps,
        100.0 * result.diagnostics.floor_hit_rate()
    );
    if let Some(seed) = result.diagnostics.seed {
        println!("  Seed:           {}", seed);
    }
}

/// Writes up to `max_paths` histories as `path,step,time,spot,variance` rows.
fn write_paths(path: &Path, history: &PathHistory, dt: f64, max_paths: usize) -> Result<usize> {
    let mut writer = csv::Writer::from_path(path)?;
    let n_paths = history.n_paths().min(max_paths);

    for i in 0..n_paths {
        let spots = history.spot_path(i);
        let variances = history.variance_path(i);
        for (step, (&spot, &variance)) in spots.iter().zip(variances).enumerate() {
            writer.serialize(PathRecord {
                path: i,
                step,
                time: step as f64 * dt,
                spot,
                variance,
            })?;
        }
    }
    writer.flush()?;
    Ok(n_paths)
}
