//! Finite-difference Greeks for the Heston Monte Carlo pricer.
//!
//! Sensitivities are central differences with common random numbers: the up
//! and down runs replay the same seed (or Sobol position), so most of the
//! Monte Carlo noise cancels in the difference.
//!
//! ```text
//! dP/dx    ~ (P(x + h) - P(x - h)) / (2h)
//! d2P/dx2  ~ (P(x + h) - 2 P(x) + P(x - h)) / h^2
//! ```
//!
//! The computation itself lives on
//! [`HestonMonteCarloPricer`](crate::mc::HestonMonteCarloPricer); this module
//! holds the configuration and result types.

mod config;
mod result;


pub use config::{BumpParameter, GreeksConfig};
pub use result::{GreekEstimate, GreeksResult};
