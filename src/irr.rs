//! Internal Rate of Return (IRR) calculation
//!
//! Newton-Raphson search for the discount rate at which the NPV of a
//! cash-flow series is zero. Only the root nearest the initial guess is
//! sought: there is no bracketing or bisection fallback.

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::ConfigError;

/// Default starting rate for the Newton-Raphson iteration
pub const DEFAULT_INITIAL_GUESS: f64 = 0.10;

/// Default convergence threshold on the step size
pub const DEFAULT_TOLERANCE: f64 = 1e-5;

/// Default iteration cap
pub const DEFAULT_MAX_ITERATIONS: u32 = 1000;

/// Solver parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IrrConfig {
    /// Rate the iteration starts from
    pub initial_guess: f64,

    /// Stop when |r_next - r| falls below this
    pub tolerance: f64,

    /// Give up after this many iterations
    pub max_iterations: u32,
}

impl Default for IrrConfig {
    fn default() -> Self {
        Self {
            initial_guess: DEFAULT_INITIAL_GUESS,
            tolerance: DEFAULT_TOLERANCE,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

impl IrrConfig {
    /// Same defaults with a different iteration cap
    pub fn with_max_iterations(max_iterations: u32) -> Self {
        Self {
            max_iterations,
            ..Self::default()
        }
    }

    /// Reject parameters the solver cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_iterations == 0 {
            return Err(ConfigError::ZeroIterations);
        }
        if !self.tolerance.is_finite() || self.tolerance <= 0.0 {
            return Err(ConfigError::InvalidTolerance(self.tolerance));
        }
        if !self.initial_guess.is_finite() || self.initial_guess <= -1.0 {
            return Err(ConfigError::InvalidInitialGuess(self.initial_guess));
        }
        Ok(())
    }
}

/// Reasons the solver reports no rate. Every variant means "unconverged".
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum IrrError {
    #[error("cash-flow series is empty")]
    EmptySeries,

    #[error("NPV derivative is zero at rate {rate} (iteration {iteration})")]
    ZeroDerivative { rate: f64, iteration: u32 },

    #[error("non-finite value reached at rate {rate} (iteration {iteration})")]
    NonFinite { rate: f64, iteration: u32 },

    #[error("no convergence after {iterations} iterations (last rate {last_rate})")]
    IterationLimit { iterations: u32, last_rate: f64 },
}

/// NPV of `cashflows` at `rate`, period 0 undiscounted
pub fn npv(cashflows: &[f64], rate: f64) -> f64 {
    cashflows
        .iter()
        .enumerate()
        .map(|(t, &cf)| cf / (1.0 + rate).powi(t as i32))
        .sum()
}

/// Calculate NPV and its derivative with respect to rate
pub fn npv_and_derivative(cashflows: &[f64], rate: f64) -> (f64, f64) {
    let mut npv = 0.0;
    let mut dnpv = 0.0;

    for (t, &cf) in cashflows.iter().enumerate() {
        npv += cf / (1.0 + rate).powi(t as i32);
        dnpv -= (t as f64) * cf / (1.0 + rate).powi(t as i32 + 1);
    }

    (npv, dnpv)
}

/// Calculate the Internal Rate of Return (IRR) for a series of cash flows
/// using the Newton-Raphson method.
///
/// # Arguments
/// * `cashflows` - Cash flows by period (index 0 = initial outlay)
/// * `config` - Initial guess, tolerance and iteration cap
///
/// # Returns
/// * `Result<f64, IrrError>` - Periodic IRR as a decimal (0.10 for 10%)
///
/// The series is not checked for a sign change; a series without a real
/// root simply fails to converge.
pub fn solve_irr(cashflows: &[f64], config: &IrrConfig) -> Result<f64, IrrError> {
    if cashflows.is_empty() {
        return Err(IrrError::EmptySeries);
    }

    let mut rate = config.initial_guess;

    for iteration in 0..config.max_iterations {
        let (npv, dnpv) = npv_and_derivative(cashflows, rate);

        if !npv.is_finite() || !dnpv.is_finite() {
            warn!("IRR diverged to a non-finite NPV at rate {rate}");
            return Err(IrrError::NonFinite { rate, iteration });
        }

        if dnpv == 0.0 {
            warn!("IRR derivative vanished at rate {rate}");
            return Err(IrrError::ZeroDerivative { rate, iteration });
        }

        let new_rate = rate - npv / dnpv;

        if !new_rate.is_finite() {
            warn!("IRR update left the finite range from rate {rate}");
            return Err(IrrError::NonFinite { rate, iteration });
        }

        if (new_rate - rate).abs() < config.tolerance {
            debug!("IRR converged to {new_rate} after {} iterations", iteration + 1);
            return Ok(new_rate);
        }

        rate = new_rate;
    }

    warn!(
        "IRR did not converge within {} iterations",
        config.max_iterations
    );
    Err(IrrError::IterationLimit {
        iterations: config.max_iterations,
        last_rate: rate,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_simple_irr() {
        // Invest 100, get 110 back one period later
        let irr = solve_irr(&[-100.0, 110.0], &IrrConfig::default()).unwrap();
        assert_abs_diff_eq!(irr, 0.10, epsilon = 1e-5);
    }

    #[test]
    fn test_multi_period_irr() {
        let flows = [-1000.0, 300.0, 400.0, 500.0];
        let irr = solve_irr(&flows, &IrrConfig::default()).unwrap();
        // Root satisfies NPV ~ 0
        assert!(npv(&flows, irr).abs() < 1e-3, "NPV at IRR: {}", npv(&flows, irr));
        assert!((irr - 0.0889633947).abs() < 1e-4, "Expected ~8.9%, got {}", irr);
    }

    #[test]
    fn test_negative_irr() {
        let irr = solve_irr(&[-100.0, 90.0], &IrrConfig::default()).unwrap();
        assert_abs_diff_eq!(irr, -0.10, epsilon = 1e-5);
    }

    #[test]
    fn test_all_positive_is_unconverged() {
        // Rate runs off to ~1e209 where every derivative term underflows to zero
        let err = solve_irr(&[100.0, 50.0, 25.0], &IrrConfig::default()).unwrap_err();
        assert!(matches!(err, IrrError::ZeroDerivative { .. }), "got {:?}", err);
    }

    #[test]
    fn test_all_negative_is_unconverged() {
        let err = solve_irr(&[-100.0, -50.0, -25.0], &IrrConfig::default()).unwrap_err();
        assert!(matches!(err, IrrError::ZeroDerivative { .. }), "got {:?}", err);
    }

    #[test]
    fn test_rate_of_minus_one_is_non_finite() {
        // 1 + r = 0 makes the period-1 discount factor zero
        let config = IrrConfig { initial_guess: -1.0, ..IrrConfig::default() };
        let err = solve_irr(&[-100.0, 110.0], &config).unwrap_err();
        assert!(matches!(err, IrrError::NonFinite { iteration: 0, .. }), "got {:?}", err);
    }

    #[test]
    fn test_single_flow_has_zero_derivative() {
        let err = solve_irr(&[-100.0], &IrrConfig::default()).unwrap_err();
        assert!(matches!(err, IrrError::ZeroDerivative { iteration: 0, .. }));
    }

    #[test]
    fn test_empty_series() {
        assert_eq!(
            solve_irr(&[], &IrrConfig::default()),
            Err(IrrError::EmptySeries)
        );
    }

    #[test]
    fn test_iteration_cap_is_configurable() {
        // One iteration cannot reach tolerance from 10% for a 25% root
        let flows = [-100.0, 125.0];
        let err = solve_irr(&flows, &IrrConfig::with_max_iterations(1)).unwrap_err();
        assert!(matches!(err, IrrError::IterationLimit { iterations: 1, .. }));

        let irr = solve_irr(&flows, &IrrConfig::with_max_iterations(100)).unwrap();
        assert_abs_diff_eq!(irr, 0.25, epsilon = 1e-5);
    }

    #[test]
    fn test_npv_and_derivative() {
        let (value, slope) = npv_and_derivative(&[-100.0, 110.0], 0.10);
        assert_abs_diff_eq!(value, 0.0, epsilon = 1e-12);
        // d/dr 110/(1+r) = -110/(1+r)^2
        assert_abs_diff_eq!(slope, -110.0 / 1.21, epsilon = 1e-9);
        assert_abs_diff_eq!(npv(&[-100.0, 110.0], 0.0), 10.0, epsilon = 1e-12);
    }

    #[test]
    fn test_config_validation() {
        assert!(IrrConfig::default().validate().is_ok());
        assert!(IrrConfig::with_max_iterations(0).validate().is_err());

        let bad_tolerance = IrrConfig { tolerance: 0.0, ..IrrConfig::default() };
        assert!(bad_tolerance.validate().is_err());

        let bad_guess = IrrConfig { initial_guess: -1.0, ..IrrConfig::default() };
        assert!(bad_guess.validate().is_err());
    }
}
