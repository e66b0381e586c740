//! Capital Budgeting - numeric engine for investment appraisal
//!
//! This library provides:
//! - Internal Rate of Return via Newton-Raphson
//! - Depreciation schedules (straight-line, double-declining balance,
//!   sum-of-years'-digits, units of production)
//! - Selection of the best depreciation method by a ranking criterion
//! - Comparison of two investment alternatives and CSV export of the result

pub mod compare;
pub mod config;
pub mod depreciation;
pub mod input;
pub mod irr;
pub mod report;

// Re-export commonly used types
pub use compare::{compare_alternatives, Alternative, Comparison, Preference};
pub use config::{ConfigError, IrrOverrides};
pub use depreciation::{
    calculate_all, select_best, AssetInput, DepreciationMethod, MethodResults, Selection,
    SelectionCriterion,
};
pub use input::InputError;
pub use irr::{npv, solve_irr, IrrConfig, IrrError};
pub use report::{ComparisonReport, ReportRow};
