//! Depreciation schedules and method selection

mod methods;
mod selector;

pub use methods::{
    declining_balance, round_cents, straight_line, sum_of_years_digits, units_of_production,
    whole_periods, MAX_PERIODS, SALVAGE_TOLERANCE,
};
pub use selector::{
    population_variance, select_best, select_best_by_name, Selection, SelectionCriterion,
    UnknownCriterion, NOT_APPLICABLE,
};

use std::fmt;

use serde::{Deserialize, Serialize};

/// Supported depreciation methods
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DepreciationMethod {
    StraightLine,
    DecliningBalance,
    SumOfYearsDigits,
    UnitsOfProduction,
}

impl DepreciationMethod {
    pub const ALL: [DepreciationMethod; 4] = [
        DepreciationMethod::StraightLine,
        DepreciationMethod::DecliningBalance,
        DepreciationMethod::SumOfYearsDigits,
        DepreciationMethod::UnitsOfProduction,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DepreciationMethod::StraightLine => "StraightLine",
            DepreciationMethod::DecliningBalance => "DecliningBalance",
            DepreciationMethod::SumOfYearsDigits => "SumOfYearsDigits",
            DepreciationMethod::UnitsOfProduction => "UnitsOfProduction",
        }
    }
}

impl fmt::Display for DepreciationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Schedules keyed by method, in insertion order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MethodResults {
    entries: Vec<(DepreciationMethod, Vec<f64>)>,
}

impl MethodResults {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a schedule; an existing entry for `method` is replaced in place
    pub fn insert(&mut self, method: DepreciationMethod, schedule: Vec<f64>) {
        match self.entries.iter_mut().find(|(m, _)| *m == method) {
            Some(entry) => entry.1 = schedule,
            None => self.entries.push((method, schedule)),
        }
    }

    pub fn get(&self, method: DepreciationMethod) -> Option<&[f64]> {
        self.entries
            .iter()
            .find(|(m, _)| *m == method)
            .map(|(_, schedule)| schedule.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (DepreciationMethod, &[f64])> {
        self.entries
            .iter()
            .map(|(method, schedule)| (*method, schedule.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Asset parameters for a full set of schedules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetInput {
    pub cost: f64,
    pub salvage: f64,
    pub useful_life: f64,

    /// Per-period usage; units-of-production is only run when present
    #[serde(default)]
    pub usage: Option<Vec<f64>>,

    /// Lifetime usage; defaults to the sum of `usage`
    #[serde(default)]
    pub total_usage: Option<f64>,
}

impl AssetInput {
    pub fn new(cost: f64, salvage: f64, useful_life: f64) -> Self {
        Self {
            cost,
            salvage,
            useful_life,
            usage: None,
            total_usage: None,
        }
    }

    pub fn with_usage(mut self, usage: Vec<f64>) -> Self {
        self.usage = Some(usage);
        self
    }

    pub fn with_total_usage(mut self, total_usage: f64) -> Self {
        self.total_usage = Some(total_usage);
        self
    }

    /// Explicit total, else the sum of usage
    pub fn effective_total_usage(&self) -> Option<f64> {
        self.total_usage
            .or_else(|| self.usage.as_ref().map(|u| u.iter().sum()))
    }

    /// Schedule for a single method; `None` for units-of-production without usage
    pub fn schedule(&self, method: DepreciationMethod) -> Option<Vec<f64>> {
        match method {
            DepreciationMethod::StraightLine => {
                Some(straight_line(self.cost, self.salvage, self.useful_life))
            }
            DepreciationMethod::DecliningBalance => {
                Some(declining_balance(self.cost, self.salvage, self.useful_life))
            }
            DepreciationMethod::SumOfYearsDigits => {
                Some(sum_of_years_digits(self.cost, self.salvage, self.useful_life))
            }
            DepreciationMethod::UnitsOfProduction => {
                let usage = self.usage.as_ref()?;
                let total = self.effective_total_usage().unwrap_or(0.0);
                Some(units_of_production(self.cost, self.salvage, usage, total))
            }
        }
    }
}

/// Run every applicable method, in `DepreciationMethod::ALL` order
pub fn calculate_all(input: &AssetInput) -> MethodResults {
    let mut results = MethodResults::new();
    for method in DepreciationMethod::ALL {
        if let Some(schedule) = input.schedule(method) {
            results.insert(method, schedule);
        }
    }
    log::debug!("Calculated {} depreciation schedules", results.len());
    results
}
