//! Ranking of depreciation methods by a selection criterion

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{DepreciationMethod, MethodResults};

/// Label reported when no method could be selected
pub const NOT_APPLICABLE: &str = "NotApplicable";

/// Strategy for choosing the best depreciation method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SelectionCriterion {
    /// Largest first-period depreciation
    MaxInitialDepreciation,
    /// Smallest population variance across the schedule
    MinVariance,
}

impl SelectionCriterion {
    pub fn as_str(&self) -> &'static str {
        match self {
            SelectionCriterion::MaxInitialDepreciation => "max-initial-depreciation",
            SelectionCriterion::MinVariance => "min-variance",
        }
    }
}

impl fmt::Display for SelectionCriterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unrecognized criterion name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown selection criterion: {0}")]
pub struct UnknownCriterion(pub String);

impl FromStr for SelectionCriterion {
    type Err = UnknownCriterion;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "max-initial-depreciation" => Ok(SelectionCriterion::MaxInitialDepreciation),
            "min-variance" => Ok(SelectionCriterion::MinVariance),
            other => Err(UnknownCriterion(other.to_string())),
        }
    }
}

/// Outcome of a selection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Selection {
    NotApplicable,
    Selected {
        method: DepreciationMethod,
        schedule: Vec<f64>,
    },
}

impl Selection {
    /// Method name, or "NotApplicable"
    pub fn label(&self) -> &'static str {
        match self {
            Selection::NotApplicable => NOT_APPLICABLE,
            Selection::Selected { method, .. } => method.as_str(),
        }
    }

    /// Selected schedule; empty when not applicable
    pub fn schedule(&self) -> &[f64] {
        match self {
            Selection::NotApplicable => &[],
            Selection::Selected { schedule, .. } => schedule,
        }
    }

    pub fn method(&self) -> Option<DepreciationMethod> {
        match self {
            Selection::NotApplicable => None,
            Selection::Selected { method, .. } => Some(*method),
        }
    }

    pub fn is_applicable(&self) -> bool {
        matches!(self, Selection::Selected { .. })
    }
}

/// Population variance (divisor N). `None` for an empty slice.
pub fn population_variance(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }

    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let squared_deviations: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();

    Some(squared_deviations / n)
}

/// Pick the best method under `criterion`.
///
/// Ties go to the method encountered first in `methods`.
pub fn select_best(methods: &MethodResults, criterion: SelectionCriterion) -> Selection {
    if methods.is_empty() {
        return Selection::NotApplicable;
    }

    match criterion {
        SelectionCriterion::MaxInitialDepreciation => max_initial_depreciation(methods),
        SelectionCriterion::MinVariance => min_variance(methods),
    }
}

/// Like `select_best`, taking the criterion by name. Unknown names are not
/// applicable.
pub fn select_best_by_name(methods: &MethodResults, criterion: &str) -> Selection {
    match criterion.parse::<SelectionCriterion>() {
        Ok(criterion) => select_best(methods, criterion),
        Err(err) => {
            log::warn!("{err}");
            Selection::NotApplicable
        }
    }
}

fn max_initial_depreciation(methods: &MethodResults) -> Selection {
    let mut best: Option<(DepreciationMethod, &[f64])> = None;
    let mut best_value = f64::NEG_INFINITY;

    for (method, schedule) in methods.iter() {
        // Empty schedules count as -inf and never win
        if let Some(&first) = schedule.first() {
            if first > best_value {
                best_value = first;
                best = Some((method, schedule));
            }
        }
    }

    to_selection(best)
}

fn min_variance(methods: &MethodResults) -> Selection {
    let mut best: Option<(DepreciationMethod, &[f64])> = None;
    let mut best_variance = f64::INFINITY;

    for (method, schedule) in methods.iter() {
        if schedule.len() < 2 {
            continue;
        }
        if let Some(variance) = population_variance(schedule) {
            if variance < best_variance {
                best_variance = variance;
                best = Some((method, schedule));
            }
        }
    }

    to_selection(best)
}

fn to_selection(best: Option<(DepreciationMethod, &[f64])>) -> Selection {
    match best {
        Some((method, schedule)) => Selection::Selected {
            method,
            schedule: schedule.to_vec(),
        },
        None => Selection::NotApplicable,
    }
}
