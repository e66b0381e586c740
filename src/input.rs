//! Loading and validation of numeric inputs
//!
//! Cash-flow CSV files have the columns `Period,Amount`, with periods
//! numbered contiguously from 0.

use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InputError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("no values supplied")]
    Empty,

    #[error("value at position {index} is not a finite number")]
    NotANumber { index: usize },

    #[error("expected period {expected}, found {found}")]
    NonContiguous { expected: u32, found: u32 },

    #[error("cannot parse '{token}' as a number")]
    Parse { token: String },
}

/// Raw CSV row
#[derive(Debug, Deserialize)]
struct CashflowRecord {
    #[serde(rename = "Period")]
    period: u32,
    #[serde(rename = "Amount")]
    amount: f64,
}

/// Load a cash-flow series from a CSV file
pub fn load_cash_flows<P: AsRef<Path>>(path: P) -> Result<Vec<f64>, InputError> {
    let reader = csv::Reader::from_path(path)?;
    read_records(reader)
}

/// Load a cash-flow series from any reader (e.g., string buffer, stdin)
pub fn load_cash_flows_from_reader<R: Read>(reader: R) -> Result<Vec<f64>, InputError> {
    read_records(csv::Reader::from_reader(reader))
}

fn read_records<R: Read>(mut reader: csv::Reader<R>) -> Result<Vec<f64>, InputError> {
    let mut flows = Vec::new();

    for result in reader.deserialize() {
        let record: CashflowRecord = result?;
        let expected = flows.len() as u32;
        if record.period != expected {
            return Err(InputError::NonContiguous {
                expected,
                found: record.period,
            });
        }
        flows.push(record.amount);
    }

    validate_amounts(&flows)?;
    Ok(flows)
}

/// Parse a comma-separated list such as "-100, 60, 60"
pub fn parse_amounts(text: &str) -> Result<Vec<f64>, InputError> {
    let values = text
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(|token| {
            token.parse::<f64>().map_err(|_| InputError::Parse {
                token: token.to_string(),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    validate_amounts(&values)?;
    Ok(values)
}

/// Reject empty input and NaN/infinite values
pub fn validate_amounts(values: &[f64]) -> Result<(), InputError> {
    if values.is_empty() {
        return Err(InputError::Empty);
    }
    if let Some(index) = values.iter().position(|v| !v.is_finite()) {
        return Err(InputError::NotANumber { index });
    }
    Ok(())
}
