//! # Heston Monte Carlo Engine
//!
//! Monte Carlo pricing of European options under the Heston stochastic
//! volatility model:
//!
//! - [`rng`]: pseudo-random streams, Sobol points and antithetic batches
//! - [`mc`]: discretisation schemes, batch path simulation, payoffs,
//!   estimators and the [`HestonMonteCarloPricer`]
//! - [`greeks`]: finite-difference sensitivities with common random numbers
//!
//! Model parameters come from `pricer_models`; normal quantiles from
//! `pricer_core`.
//!
//! ## Usage Example
//!
//! ```rust
//! use pricer_models::models::HestonParams;
//! use pricer_pricing::mc::{DiscretisationScheme, HestonMonteCarloPricer, SimulationSpec};
//!
//! let spec = SimulationSpec::builder()
//!     .n_paths(20_000)
//!     .n_steps(100)
//!     .scheme(DiscretisationScheme::Milstein)
//!     .antithetic(true)
//!     .seed(42)
//!     .build()
//!     .unwrap();
//!
//! let pricer = HestonMonteCarloPricer::new(HestonParams::default(), spec).unwrap();
//! let pricing = pricer.price_call_put(100.0).unwrap();
//!
//! assert!(pricing.parity.holds_within(3.0));
//! ```
//!
//! ## Determinism
//!
//! A fixed seed gives bit-identical results regardless of the chunk size,
//! the rayon thread count and the `parallel` flag: every draw owns its own
//! random stream (or Sobol index), and chunk outputs are assembled in order.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
// Allow unknown lints for clippy compatibility across versions
#![allow(unknown_lints)]

pub mod greeks;
pub mod mc;
pub mod rng;

pub use greeks::{BumpParameter, GreekEstimate, GreeksConfig, GreeksResult};
pub use mc::{
    price_european, simulate_paths, HestonMonteCarloPricer, PriceEstimate, SimulationResult,
    SimulationSpec,
};
