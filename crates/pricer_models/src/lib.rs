//! # Pricer Models (L2: Business Logic)
//!
//! Stochastic model definitions for the Heston Monte Carlo engine.
//!
//! This crate provides:
//! - `HestonParams`: the validated, immutable parameter set of the Heston
//!   stochastic volatility model
//! - `HestonError`: parameter validation errors
//!
//! ## Design Principles
//!
//! - **Validated value objects**: parameters are checked once at construction
//!   and every bump helper returns a re-validated copy
//! - **Soft Feller condition**: a violation is reported, never rejected

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod models;
