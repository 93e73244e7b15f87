//! Terminal payoffs for European options.
//!
//! A payoff maps the terminal state of a path to an undiscounted cash flow.
//! Concrete call and put payoffs are provided by [`VanillaPayoff`]; any
//! closure on `S_T` can be used through [`PayoffFn`].

use std::fmt;

/// Terminal state of a path handed to payoffs.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TerminalState {
    /// Asset price at maturity.
    pub spot: f64,
    /// Variance at maturity.
    pub variance: f64,
}

/// European payoff on the terminal state.
pub trait Payoff: Sync {
    /// Undiscounted cash flow for one path.
    fn payoff(&self, state: &TerminalState) -> f64;
}

/// Option type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum OptionKind {
    /// Pays `max(S_T - K, 0)`.
    Call,
    /// Pays `max(K - S_T, 0)`.
    Put,
}

impl fmt::Display for OptionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Call => f.write_str("call"),
            Self::Put => f.write_str("put"),
        }
    }
}

/// European call or put.
///
/// # Examples
///
/// ```rust
/// use pricer_pricing::mc::{Payoff, TerminalState, VanillaPayoff};
///
/// let call = VanillaPayoff::call(100.0);
/// let put = VanillaPayoff::put(100.0);
/// let state = TerminalState { spot: 110.0, variance: 0.04 };
///
/// assert_eq!(call.payoff(&state), 10.0);
/// assert_eq!(put.payoff(&state), 0.0);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct VanillaPayoff {
    /// Call or put.
    pub kind: OptionKind,
    /// Strike price.
    pub strike: f64,
}

impl VanillaPayoff {
    /// Creates a vanilla payoff.
    #[inline]
    pub fn new(kind: OptionKind, strike: f64) -> Self {
        Self { kind, strike }
    }

    /// European call with strike `strike`.
    #[inline]
    pub fn call(strike: f64) -> Self {
        Self::new(OptionKind::Call, strike)
    }

    /// European put with strike `strike`.
    #[inline]
    pub fn put(strike: f64) -> Self {
        Self::new(OptionKind::Put, strike)
    }
}

impl Payoff for VanillaPayoff {
    #[inline]
    fn payoff(&self, state: &TerminalState) -> f64 {
        match self.kind {
            OptionKind::Call => (state.spot - self.strike).max(0.0),
            OptionKind::Put => (self.strike - state.spot).max(0.0),
        }
    }
}

/// Adapter turning a closure on `S_T` into a [`Payoff`].
///
/// # Examples
///
/// ```rust
/// use pricer_pricing::mc::{Payoff, PayoffFn, TerminalState};
///
/// let digital = PayoffFn(|s: f64| if s > 100.0 { 1.0 } else { 0.0 });
/// let state = TerminalState { spot: 101.0, variance: 0.0 };
/// assert_eq!(digital.payoff(&state), 1.0);
/// ```
#[derive(Clone, Copy)]
pub struct PayoffFn<F>(pub F);

impl<F> Payoff for PayoffFn<F>
where
    F: Fn(f64) -> f64 + Sync,
{
    #[inline]
    fn payoff(&self, state: &TerminalState) -> f64 {
        (self.0)(state.spot)
    }
}

impl<F> fmt::Debug for PayoffFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PayoffFn(..)")
    }
}

impl<P: Payoff + ?Sized> Payoff for &P {
    #[inline]
    fn payoff(&self, state: &TerminalState) -> f64 {
        (**self).payoff(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(spot: f64) -> TerminalState {
        TerminalState {
            spot,
            variance: 0.04,
        }
    }

    #[test]
    fn test_call_payoff() {
        let call = VanillaPayoff::call(100.0);
        assert_eq!(call.payoff(&state(120.0)), 20.0);
        assert_eq!(call.payoff(&state(100.0)), 0.0);
        assert_eq!(call.payoff(&state(80.0)), 0.0);
    }

    #[test]
    fn test_put_payoff() {
        let put = VanillaPayoff::put(100.0);
        assert_eq!(put.payoff(&state(80.0)), 20.0);
        assert_eq!(put.payoff(&state(120.0)), 0.0);
    }

    #[test]
    fn test_call_minus_put_is_forward() {
        let call = VanillaPayoff::call(95.0);
        let put = VanillaPayoff::put(95.0);
        for s in [50.0, 95.0, 130.0] {
            assert_eq!(call.payoff(&state(s)) - put.payoff(&state(s)), s - 95.0);
        }
    }

    #[test]
    fn test_closure_adapter_and_reference() {
        let forward = PayoffFn(|s: f64| s - 100.0);
        assert_eq!(forward.payoff(&state(105.0)), 5.0);

        let by_ref: &dyn Payoff = &forward;
        assert_eq!(by_ref.payoff(&state(99.0)), -1.0);
        assert_eq!((&VanillaPayoff::call(1.0)).payoff(&state(2.0)), 1.0);
    }

    #[test]
    fn test_option_kind_display() {
        assert_eq!(OptionKind::Call.to_string(), "call");
        assert_eq!(OptionKind::Put.to_string(), "put");
    }
}
