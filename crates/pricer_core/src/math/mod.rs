//! Mathematical utilities.
//!
//! - [`distributions`]: standard normal CDF, PDF and inverse CDF

pub mod distributions;
