//! Tabular export of an alternative comparison
//!
//! Layout:
//!   Year, Alternative 1, Alternative 2
//!   one row per period with both flows
//!   IRR, <pct>, <pct>

use std::io::Write;

use serde::Serialize;

use crate::compare::{Alternative, Comparison};

pub const HEADER: [&str; 3] = ["Year", "Alternative 1", "Alternative 2"];

/// A single row of the comparison table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ReportRow {
    Header(Vec<String>),
    Flow {
        year: usize,
        first: Option<f64>,
        second: Option<f64>,
    },
    Result {
        label: String,
        first: String,
        second: String,
    },
}

impl ReportRow {
    fn to_record(&self) -> Vec<String> {
        match self {
            ReportRow::Header(labels) => labels.clone(),
            ReportRow::Flow { year, first, second } => vec![
                year.to_string(),
                format_flow(*first),
                format_flow(*second),
            ],
            ReportRow::Result { label, first, second } => {
                vec![label.clone(), first.clone(), second.clone()]
            }
        }
    }
}

fn format_flow(flow: Option<f64>) -> String {
    flow.map(|v| v.to_string()).unwrap_or_default()
}

/// Rate as a percentage with 2 decimals, e.g. 0.1 -> "10.00%"
pub fn format_pct(rate: f64) -> String {
    format!("{:.2}%", rate * 100.0)
}

/// Ordered comparison table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonReport {
    pub rows: Vec<ReportRow>,
}

impl ComparisonReport {
    /// Header, one row per period of the longer series, then the IRR row
    pub fn build(first: &Alternative, second: &Alternative, comparison: &Comparison) -> Self {
        let periods = first.cashflows.len().max(second.cashflows.len());

        let mut rows = Vec::with_capacity(periods + 2);
        rows.push(ReportRow::Header(HEADER.iter().map(|s| s.to_string()).collect()));

        for year in 0..periods {
            rows.push(ReportRow::Flow {
                year,
                first: first.cashflows.get(year).copied(),
                second: second.cashflows.get(year).copied(),
            });
        }

        rows.push(ReportRow::Result {
            label: "IRR".to_string(),
            first: format_pct(comparison.first_irr),
            second: format_pct(comparison.second_irr),
        });

        Self { rows }
    }

    /// Write as CSV. Rows are written without a separate header line since
    /// the header is the first row.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), csv::Error> {
        let mut csv_writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(writer);

        for row in &self.rows {
            csv_writer.write_record(row.to_record())?;
        }

        csv_writer.flush()?;
        Ok(())
    }

    pub fn to_csv_string(&self) -> Result<String, csv::Error> {
        let mut buffer = Vec::new();
        self.write_csv(&mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}
