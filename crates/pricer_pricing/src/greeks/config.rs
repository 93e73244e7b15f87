//! Greeks calculation configuration.
//!
//! Provides [`GreeksConfig`] for the finite-difference bump widths and
//! [`BumpParameter`] for selecting the model input to differentiate.

use std::fmt;
use std::str::FromStr;

use crate::mc::ConfigError;

/// Model input bumped by a finite-difference Greek.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum BumpParameter {
    /// Spot price `S0`.
    Spot,
    /// Initial variance `V0`.
    V0,
    /// Initial volatility `sigma0 = sqrt(V0)`.
    Sigma0,
    /// Risk-free rate `r`.
    Rate,
    /// Maturity `T`.
    Maturity,
}

impl BumpParameter {
    /// Short name used in messages and on the command line.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Spot => "S0",
            Self::V0 => "V0",
            Self::Sigma0 => "sigma0",
            Self::Rate => "r",
            Self::Maturity => "T",
        }
    }

    /// Whether the parameter must stay strictly positive when bumped down.
    pub(crate) fn requires_positive(&self) -> bool {
        !matches!(self, Self::Rate)
    }
}

impl fmt::Display for BumpParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BumpParameter {
    type Err = ConfigError;

    /// Parses `"S0"`, `"V0"`, `"sigma0"`, `"r"` or `"T"`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pricer_pricing::greeks::BumpParameter;
    ///
    /// assert_eq!("S0".parse::<BumpParameter>().unwrap(), BumpParameter::Spot);
    /// assert_eq!("T".parse::<BumpParameter>().unwrap(), BumpParameter::Maturity);
    /// assert!("kappa".parse::<BumpParameter>().is_err());
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "S0" | "spot" => Ok(Self::Spot),
            "V0" | "v0" => Ok(Self::V0),
            "sigma0" | "vol" => Ok(Self::Sigma0),
            "r" | "rate" => Ok(Self::Rate),
            "T" | "maturity" => Ok(Self::Maturity),
            other => Err(ConfigError::InvalidParameter {
                name: "parameter",
                value: format!(
                    "unknown bump parameter '{}' (expected S0, V0, sigma0, r or T)",
                    other
                ),
            }),
        }
    }
}

/// Bump widths for [`HestonMonteCarloPricer::greeks`](crate::mc::HestonMonteCarloPricer::greeks).
///
/// # Default Values
///
/// | Parameter | Default | Bump applied |
/// |-----------|---------|--------------|
/// | `spot_bump_relative` | 0.01 | `0.01 * S0` |
/// | `vol_bump_relative` | 0.01 | `0.01 * sigma0` |
/// | `time_bump` | 1/365 | one calendar day |
/// | `rate_bump` | 1e-4 | one basis point |
///
/// # Examples
///
/// ```rust
/// use pricer_pricing::greeks::GreeksConfig;
///
/// let config = GreeksConfig::default();
/// assert!((config.spot_bump(100.0) - 1.0).abs() < 1e-12);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GreeksConfig {
    /// Relative spot bump for delta and gamma.
    pub spot_bump_relative: f64,
    /// Relative `sigma0` bump for vega.
    pub vol_bump_relative: f64,
    /// Absolute maturity bump in years for theta.
    pub time_bump: f64,
    /// Absolute rate bump for rho.
    pub rate_bump: f64,
}

impl Default for GreeksConfig {
    fn default() -> Self {
        Self {
            spot_bump_relative: 0.01,
            vol_bump_relative: 0.01,
            time_bump: 1.0 / 365.0,
            rate_bump: 1e-4,
        }
    }
}

impl GreeksConfig {
    /// Absolute spot bump for `spot`.
    #[inline]
    pub fn spot_bump(&self, spot: f64) -> f64 {
        self.spot_bump_relative * spot
    }

    /// Absolute volatility bump for `sigma0`.
    #[inline]
    pub fn vol_bump(&self, sigma0: f64) -> f64 {
        self.vol_bump_relative * sigma0
    }

    /// Checks that every bump is positive and finite.
    ///
    /// Relative bumps must also stay below 1, otherwise the down bump leaves
    /// the parameter domain.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let checks = [
            ("spot_bump_relative", self.spot_bump_relative, true),
            ("vol_bump_relative", self.vol_bump_relative, true),
            ("time_bump", self.time_bump, false),
            ("rate_bump", self.rate_bump, false),
        ];
        for (parameter, bump, relative) in checks {
            let in_range = bump > 0.0 && bump.is_finite() && (!relative || bump < 1.0);
            if !in_range {
                return Err(ConfigError::InvalidBump { parameter, bump });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_parse_round_trips_names() {
        for parameter in [
            BumpParameter::Spot,
            BumpParameter::V0,
            BumpParameter::Sigma0,
            BumpParameter::Rate,
            BumpParameter::Maturity,
        ] {
            assert_eq!(parameter.name().parse::<BumpParameter>().unwrap(), parameter);
        }
    }

    #[test]
    fn test_parse_unknown_name() {
        let err = "rho".parse::<BumpParameter>().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidParameter { name: "parameter", .. }));
    }

    #[test]
    fn test_default_bumps() {
        let config = GreeksConfig::default();
        assert_relative_eq!(config.spot_bump(250.0), 2.5, epsilon = 1e-15);
        assert_relative_eq!(config.vol_bump(0.2), 0.002, epsilon = 1e-15);
        assert_eq!(config.time_bump, 1.0 / 365.0);
        assert_eq!(config.rate_bump, 1e-4);
    }

    #[test]
    fn test_validate_rejects_bad_bumps() {
        let zero_spot = GreeksConfig {
            spot_bump_relative: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            zero_spot.validate(),
            Err(ConfigError::InvalidBump {
                parameter: "spot_bump_relative",
                ..
            })
        ));

        let full_vol = GreeksConfig {
            vol_bump_relative: 1.0,
            ..Default::default()
        };
        assert!(full_vol.validate().is_err());

        let nan_time = GreeksConfig {
            time_bump: f64::NAN,
            ..Default::default()
        };
        assert!(nan_time.validate().is_err());

        let negative_rate = GreeksConfig {
            rate_bump: -1e-4,
            ..Default::default()
        };
        assert!(negative_rate.validate().is_err());
    }

    #[test]
    fn test_rate_may_go_negative() {
        assert!(!BumpParameter::Rate.requires_positive());
        assert!(BumpParameter::Maturity.requires_positive());
    }
}
