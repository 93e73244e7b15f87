//! Monte Carlo simulation and pricing for the Heston model.
//!
//! # Architecture
//!
//! ```text
//! HestonMonteCarloPricer
//! ├── HestonParams      (model parameters, pricer_models)
//! ├── SimulationSpec    (paths, steps, scheme, randomness)
//! └── Orchestration
//!     ├── simulate_paths()      RandomSource -> CorrelationCoupler -> HestonStepper
//!     ├── Payoff                terminal cash flow
//!     └── estimate()            mean, standard error, confidence interval
//! ```
//!
//! # Examples
//!
//! ```rust
//! use pricer_models::models::HestonParams;
//! use pricer_pricing::mc::{price_european, SimulationSpec, VanillaPayoff};
//!
//! let spec = SimulationSpec::builder()
//!     .n_paths(10_000)
//!     .n_steps(50)
//!     .seed(42)
//!     .build()
//!     .unwrap();
//!
//! let params = HestonParams::default();
//! let call = price_european(&params, &spec, &VanillaPayoff::call(100.0)).unwrap();
//! let (lower, upper) = call.confidence_interval;
//! assert!(lower < call.price && call.price < upper);
//! ```

mod config;
mod correlation;
mod error;
mod estimator;
mod paths;
mod payoff;
mod pricer;
mod scheme;

pub use config::{
    DiscretisationScheme, SimulationSpec, SimulationSpecBuilder, DEFAULT_CHUNK_SIZE,
    DEFAULT_FLOOR_HIT_THRESHOLD, MAX_PATHS, MAX_STEPS,
};
pub use correlation::CorrelationCoupler;
pub use error::{ConfigError, NumericalWarning};
pub use estimator::{
    estimate, estimate_variance_reduction, mean_and_variance, ParityCheck, PriceEstimate,
    ReferenceComparison, VarianceReductionReport, Z_95,
};
pub use paths::{simulate_paths, PathHistory, SimulationDiagnostics, SimulationResult};
pub use payoff::{OptionKind, Payoff, PayoffFn, TerminalState, VanillaPayoff};
pub use pricer::{price_european, CallPutPricing, HestonMonteCarloPricer};
pub use scheme::{HestonStepper, PathState};
