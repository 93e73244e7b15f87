//! Monte Carlo pricing engine for the Heston model.
//!
//! [`HestonMonteCarloPricer`] ties together path simulation, payoff
//! evaluation, discounting and aggregation, and computes finite-difference
//! Greeks with common random numbers.

use pricer_models::models::{HestonError, HestonParams};
use tracing::debug;

use super::config::SimulationSpec;
use super::error::{ConfigError, NumericalWarning};
use super::estimator::{estimate, ParityCheck, PriceEstimate};
use super::paths::{simulate_paths, SimulationResult};
use super::payoff::{Payoff, TerminalState, VanillaPayoff};
use crate::greeks::{BumpParameter, GreekEstimate, GreeksConfig, GreeksResult};

/// Call, put and put-call parity from one shared batch of paths.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct CallPutPricing {
    /// Strike of both options.
    pub strike: f64,
    /// European call estimate.
    pub call: PriceEstimate,
    /// European put estimate.
    pub put: PriceEstimate,
    /// Parity check on the per-path differences.
    pub parity: ParityCheck,
}

/// Monte Carlo pricer for European payoffs under the Heston model.
///
/// # Examples
///
/// ```rust
/// use pricer_models::models::HestonParams;
/// use pricer_pricing::mc::{HestonMonteCarloPricer, SimulationSpec, VanillaPayoff};
///
/// let spec = SimulationSpec::builder()
///     .n_paths(10_000)
///     .n_steps(50)
///     .antithetic(true)
///     .seed(7)
///     .build()
///     .unwrap();
/// let pricer = HestonMonteCarloPricer::new(HestonParams::default(), spec).unwrap();
///
/// let call = pricer.price(&VanillaPayoff::call(100.0)).unwrap();
/// assert!(call.price > 5.0 && call.price < 15.0);
/// assert!(call.standard_error > 0.0);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct HestonMonteCarloPricer {
    params: HestonParams,
    spec: SimulationSpec,
}

impl HestonMonteCarloPricer {
    /// Creates a pricer after validating both inputs.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` for invalid model parameters or configuration.
    pub fn new(params: HestonParams, spec: SimulationSpec) -> Result<Self, ConfigError> {
        params.validate()?;
        spec.validate()?;
        Ok(Self { params, spec })
    }

    /// Model parameters.
    #[inline]
    pub fn params(&self) -> &HestonParams {
        &self.params
    }

    /// Simulation configuration.
    #[inline]
    pub fn spec(&self) -> &SimulationSpec {
        &self.spec
    }

    /// Simulates one batch of paths.
    pub fn simulate(&self) -> Result<SimulationResult, ConfigError> {
        simulate_paths(&self.params, &self.spec)
    }

    /// Prices a European payoff.
    pub fn price<P: Payoff + ?Sized>(&self, payoff: &P) -> Result<PriceEstimate, ConfigError> {
        let (payoffs, warnings) = discounted_run(&self.params, &self.spec, payoff)?;
        let price = estimate(&payoffs).with_warnings(warnings);

        debug!(
            price = price.price,
            standard_error = price.standard_error,
            n_paths = price.n_paths_effective,
            "Priced European payoff"
        );
        Ok(price)
    }

    /// Prices a call and a put with strike `strike` on the same paths and
    /// checks put-call parity `C - P = S0 - K exp(-r T)`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidParameter` for a negative or non-finite
    /// strike.
    pub fn price_call_put(&self, strike: f64) -> Result<CallPutPricing, ConfigError> {
        if !(strike >= 0.0 && strike.is_finite()) {
            return Err(ConfigError::InvalidParameter {
                name: "strike",
                value: format!("{} (must be non-negative and finite)", strike),
            });
        }

        let result = self.simulate()?;
        let df = self.params.discount_factor();
        let call = VanillaPayoff::call(strike);
        let put = VanillaPayoff::put(strike);
        let calls = result.discounted_payoffs(df, |spot, variance| {
            call.payoff(&TerminalState { spot, variance })
        });
        let puts = result.discounted_payoffs(df, |spot, variance| {
            put.payoff(&TerminalState { spot, variance })
        });

        let parity = ParityCheck::from_payoffs(&calls, &puts, self.params.spot - strike * df);
        debug!(
            strike,
            difference = parity.difference,
            z_score = parity.z_score(),
            "Put-call parity check"
        );

        Ok(CallPutPricing {
            strike,
            call: estimate(&calls).with_warnings(result.warnings.clone()),
            put: estimate(&puts).with_warnings(result.warnings),
            parity,
        })
    }

    /// Central finite-difference sensitivity of the price of `payoff` to
    /// `parameter`, bumped by `bump` in each direction.
    ///
    /// The up and down runs share their draws. Without a configured seed a
    /// pseudo-random one is drawn once and reused for both runs.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidBump` when `bump` is not positive and
    /// finite or when the down bump leaves the parameter domain.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pricer_models::models::HestonParams;
    /// use pricer_pricing::greeks::BumpParameter;
    /// use pricer_pricing::mc::{HestonMonteCarloPricer, SimulationSpec, VanillaPayoff};
    ///
    /// let spec = SimulationSpec::builder().n_paths(5_000).n_steps(20).build().unwrap();
    /// let pricer = HestonMonteCarloPricer::new(HestonParams::default(), spec).unwrap();
    ///
    /// let delta = pricer.greek(&VanillaPayoff::call(100.0), BumpParameter::Spot, 1.0).unwrap();
    /// assert!(delta.value > 0.0 && delta.value < 1.0);
    /// ```
    pub fn greek<P: Payoff + ?Sized>(
        &self,
        payoff: &P,
        parameter: BumpParameter,
        bump: f64,
    ) -> Result<GreekEstimate, ConfigError> {
        let spec = self.common_random_spec();
        let (up, down) = self.bumped_pair(parameter, bump)?;
        let (up_payoffs, _) = discounted_run(&up, &spec, payoff)?;
        let (down_payoffs, _) = discounted_run(&down, &spec, payoff)?;

        let greek = central_difference(parameter, bump, &up_payoffs, &down_payoffs);
        debug!(
            parameter = %parameter,
            bump,
            value = greek.value,
            standard_error = greek.standard_error,
            "Finite-difference Greek"
        );
        Ok(greek)
    }

    /// Base price with delta, gamma, vega, theta and rho, all on shared
    /// draws.
    ///
    /// Vega is taken with respect to `sigma0 = sqrt(V0)` and theta is
    /// `-dP/dT`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidBump` for an invalid configuration, or
    /// when the maturity is not longer than the time bump.
    pub fn greeks<P: Payoff + ?Sized>(
        &self,
        payoff: &P,
        config: &GreeksConfig,
    ) -> Result<GreeksResult, ConfigError> {
        config.validate()?;
        let spec = self.common_random_spec();

        let (base_payoffs, warnings) = discounted_run(&self.params, &spec, payoff)?;
        let price = estimate(&base_payoffs).with_warnings(warnings);

        let spot_bump = config.spot_bump(self.params.spot);
        let (spot_up, spot_down) = self.bumped_pair(BumpParameter::Spot, spot_bump)?;
        let (up_payoffs, _) = discounted_run(&spot_up, &spec, payoff)?;
        let (down_payoffs, _) = discounted_run(&spot_down, &spec, payoff)?;
        let delta = central_difference(BumpParameter::Spot, spot_bump, &up_payoffs, &down_payoffs);
        let gamma = second_difference(spot_bump, &up_payoffs, &base_payoffs, &down_payoffs);

        let vega = self.greek_with_spec(
            payoff,
            &spec,
            BumpParameter::Sigma0,
            config.vol_bump(self.params.sigma0()),
        )?;
        let theta = self
            .greek_with_spec(payoff, &spec, BumpParameter::Maturity, config.time_bump)?
            .negated();
        let rho = self.greek_with_spec(payoff, &spec, BumpParameter::Rate, config.rate_bump)?;

        debug!(
            price = price.price,
            delta = delta.value,
            gamma = gamma.value,
            vega = vega.value,
            theta = theta.value,
            rho = rho.value,
            "Greeks computed"
        );

        Ok(GreeksResult {
            price,
            delta,
            gamma,
            vega,
            theta,
            rho,
        })
    }

    fn greek_with_spec<P: Payoff + ?Sized>(
        &self,
        payoff: &P,
        spec: &SimulationSpec,
        parameter: BumpParameter,
        bump: f64,
    ) -> Result<GreekEstimate, ConfigError> {
        let (up, down) = self.bumped_pair(parameter, bump)?;
        let (up_payoffs, _) = discounted_run(&up, spec, payoff)?;
        let (down_payoffs, _) = discounted_run(&down, spec, payoff)?;
        Ok(central_difference(parameter, bump, &up_payoffs, &down_payoffs))
    }

    /// Spec with a fixed seed so bumped runs replay the same draws.
    fn common_random_spec(&self) -> SimulationSpec {
        match self.spec.seed() {
            None if !self.spec.quasi_random() => self.spec.with_seed(rand::random()),
            _ => self.spec.clone(),
        }
    }

    fn bumped_pair(
        &self,
        parameter: BumpParameter,
        bump: f64,
    ) -> Result<(HestonParams, HestonParams), ConfigError> {
        let invalid = ConfigError::InvalidBump {
            parameter: parameter.name(),
            bump,
        };
        if !(bump > 0.0 && bump.is_finite()) {
            return Err(invalid);
        }

        let base = parameter_value(&self.params, parameter);
        if parameter.requires_positive() && base - bump <= 0.0 {
            return Err(invalid);
        }

        let up = with_parameter(&self.params, parameter, base + bump)?;
        let down = with_parameter(&self.params, parameter, base - bump)?;
        Ok((up, down))
    }
}

/// Prices a European payoff in one call.
///
/// # Examples
///
/// ```rust
/// use pricer_models::models::HestonParams;
/// use pricer_pricing::mc::{price_european, SimulationSpec, VanillaPayoff};
///
/// let spec = SimulationSpec::builder().n_paths(2_000).n_steps(10).seed(1).build().unwrap();
/// let put = price_european(&HestonParams::default(), &spec, &VanillaPayoff::put(100.0)).unwrap();
/// assert!(put.price > 0.0);
/// ```
pub fn price_european<P: Payoff + ?Sized>(
    params: &HestonParams,
    spec: &SimulationSpec,
    payoff: &P,
) -> Result<PriceEstimate, ConfigError> {
    HestonMonteCarloPricer::new(*params, spec.clone())?.price(payoff)
}

fn discounted_run<P: Payoff + ?Sized>(
    params: &HestonParams,
    spec: &SimulationSpec,
    payoff: &P,
) -> Result<(Vec<f64>, Vec<NumericalWarning>), ConfigError> {
    let result = simulate_paths(params, spec)?;
    let payoffs = result.discounted_payoffs(params.discount_factor(), |spot, variance| {
        payoff.payoff(&TerminalState { spot, variance })
    });
    Ok((payoffs, result.warnings))
}

fn parameter_value(params: &HestonParams, parameter: BumpParameter) -> f64 {
    match parameter {
        BumpParameter::Spot => params.spot,
        BumpParameter::V0 => params.v0,
        BumpParameter::Sigma0 => params.sigma0(),
        BumpParameter::Rate => params.rate,
        BumpParameter::Maturity => params.maturity,
    }
}

fn with_parameter(
    params: &HestonParams,
    parameter: BumpParameter,
    value: f64,
) -> Result<HestonParams, HestonError> {
    match parameter {
        BumpParameter::Spot => params.with_spot(value),
        BumpParameter::V0 => params.with_v0(value),
        BumpParameter::Sigma0 => params.with_sigma0(value),
        BumpParameter::Rate => params.with_rate(value),
        BumpParameter::Maturity => params.with_maturity(value),
    }
}

fn central_difference(
    parameter: BumpParameter,
    bump: f64,
    up: &[f64],
    down: &[f64],
) -> GreekEstimate {
    let differences: Vec<f64> = up
        .iter()
        .zip(down)
        .map(|(u, d)| (u - d) / (2.0 * bump))
        .collect();
    let fd = estimate(&differences);

    GreekEstimate {
        value: fd.price,
        standard_error: fd.standard_error,
        bump,
        parameter,
    }
}

fn second_difference(bump: f64, up: &[f64], base: &[f64], down: &[f64]) -> GreekEstimate {
    let h2 = bump * bump;
    let differences: Vec<f64> = up
        .iter()
        .zip(base)
        .zip(down)
        .map(|((u, b), d)| (u - 2.0 * b + d) / h2)
        .collect();
    let fd = estimate(&differences);

    GreekEstimate {
        value: fd.price,
        standard_error: fd.standard_error,
        bump,
        parameter: BumpParameter::Spot,
    }
}
