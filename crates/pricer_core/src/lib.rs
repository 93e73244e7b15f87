//! # pricer_core: Numerical Foundation
//!
//! ## Layer 1 (Foundation) Role
//!
//! pricer_core is the bottom layer of the Heston Monte Carlo workspace. It holds
//! the numerical building blocks shared by the model and pricing layers:
//! - Standard normal distribution helpers (`math::distributions`), including the
//!   inverse CDF used to map quasi-random points onto normal variates
//!
//! ## Zero Dependency Principle
//!
//! Layer 1 has no dependencies on other pricer_* crates. The only external
//! dependency is `num-traits`, so every function is generic over `T: Float`.
//!
//! ## Usage Example
//!
//! ```rust
//! use pricer_core::math::distributions::{inverse_norm_cdf, norm_cdf};
//!
//! let z = inverse_norm_cdf(0.975_f64);
//! assert!((z - 1.959964).abs() < 1e-5);
//! assert!((norm_cdf(z) - 0.975).abs() < 1e-6);
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod math;
