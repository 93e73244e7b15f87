//! Stochastic process models.
//!
//! - [`heston`]: Heston stochastic volatility model parameters
//!
//! ## Example
//!
//! ```
//! use pricer_models::models::HestonParams;
//!
//! let params = HestonParams::default();
//! assert!(params.satisfies_feller());
//! ```

pub mod heston;

pub use heston::{HestonError, HestonParams};
