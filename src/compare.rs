//! Comparison of two investment alternatives by IRR

use std::cmp::Ordering;

use log::info;
use serde::{Deserialize, Serialize};

use crate::irr::{solve_irr, IrrConfig, IrrError};

/// An investment: initial outlay followed by per-period flows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alternative {
    pub cashflows: Vec<f64>,
}

impl Alternative {
    pub fn new(cashflows: Vec<f64>) -> Self {
        Self { cashflows }
    }

    /// `initial_investment` is entered as a positive amount and becomes the
    /// period-0 outflow
    pub fn from_investment(initial_investment: f64, annual_flows: &[f64]) -> Self {
        let mut cashflows = Vec::with_capacity(annual_flows.len() + 1);
        cashflows.push(-initial_investment);
        cashflows.extend_from_slice(annual_flows);
        Self { cashflows }
    }

    pub fn irr(&self, config: &IrrConfig) -> Result<f64, IrrError> {
        solve_irr(&self.cashflows, config)
    }
}

/// Which alternative has the higher IRR
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Preference {
    First,
    Second,
    Equivalent,
}

impl Preference {
    pub fn describe(&self) -> &'static str {
        match self {
            Preference::First => "Alternative 1 is better",
            Preference::Second => "Alternative 2 is better",
            Preference::Equivalent => "Both alternatives are equivalent",
        }
    }
}

/// Result of comparing two alternatives
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    pub first_irr: f64,
    pub second_irr: f64,
    pub preferred: Preference,
}

/// Solve both IRRs and rank them.
///
/// Fails with the first unconverged IRR: a rate is never compared against
/// a missing one.
pub fn compare_alternatives(
    first: &Alternative,
    second: &Alternative,
    config: &IrrConfig,
) -> Result<Comparison, IrrError> {
    let first_irr = first.irr(config)?;
    let second_irr = second.irr(config)?;

    let preferred = match first_irr.partial_cmp(&second_irr) {
        Some(Ordering::Greater) => Preference::First,
        Some(Ordering::Less) => Preference::Second,
        _ => Preference::Equivalent,
    };

    info!(
        "IRR comparison: {:.6} vs {:.6} -> {:?}",
        first_irr, second_irr, preferred
    );

    Ok(Comparison {
        first_irr,
        second_irr,
        preferred,
    })
}
