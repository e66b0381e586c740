//! Capital Budgeting CLI
//!
//! Command-line front-end for the IRR solver and depreciation engine.
//! Solver defaults can be set through IRR_MAX_ITERATIONS, IRR_TOLERANCE and
//! IRR_INITIAL_GUESS; command-line flags take precedence.

use std::fs::File;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use capital_budgeting::{
    calculate_all, compare_alternatives, depreciation::select_best_by_name, input,
    Alternative, AssetInput, ComparisonReport, IrrConfig, IrrOverrides,
};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;

#[derive(Parser)]
#[command(name = "capital_budgeting", version, about = "IRR and depreciation calculator")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Internal rate of return of a cash-flow series
    Irr {
        /// Comma-separated flows, period 0 first (e.g. -100,110)
        #[arg(long, allow_hyphen_values = true, required_unless_present = "flows_file")]
        flows: Option<String>,

        /// CSV file with Period,Amount columns
        #[arg(long, conflicts_with = "flows")]
        flows_file: Option<PathBuf>,

        #[command(flatten)]
        solver: SolverArgs,

        #[arg(long)]
        json: bool,
    },

    /// Compare two alternatives by IRR
    Compare {
        /// Flows of alternative 1: period 0 first, or annual flows when
        /// --investment-1 is given
        #[arg(long, allow_hyphen_values = true)]
        first: String,

        /// Flows of alternative 2: period 0 first, or annual flows when
        /// --investment-2 is given
        #[arg(long, allow_hyphen_values = true)]
        second: String,

        /// Initial investment of alternative 1, entered as a positive amount
        #[arg(long = "investment-1")]
        investment_1: Option<f64>,

        /// Initial investment of alternative 2, entered as a positive amount
        #[arg(long = "investment-2")]
        investment_2: Option<f64>,

        /// Write the comparison table to this CSV file
        #[arg(long)]
        export: Option<PathBuf>,

        #[command(flatten)]
        solver: SolverArgs,

        #[arg(long)]
        json: bool,
    },

    /// Depreciation schedules and the best method
    Depreciation {
        #[arg(long, allow_hyphen_values = true)]
        cost: f64,

        #[arg(long, allow_hyphen_values = true)]
        salvage: f64,

        /// Useful life in periods; fractional years are dropped
        #[arg(long)]
        life: f64,

        /// Comma-separated usage per period (enables units of production)
        #[arg(long)]
        usage: Option<String>,

        /// Lifetime usage; defaults to the sum of --usage
        #[arg(long, requires = "usage")]
        total_usage: Option<f64>,

        /// max-initial-depreciation or min-variance
        #[arg(long, default_value = "max-initial-depreciation")]
        criterion: String,

        #[arg(long)]
        json: bool,
    },
}

#[derive(Args)]
struct SolverArgs {
    #[arg(long)]
    max_iterations: Option<u32>,

    #[arg(long)]
    tolerance: Option<f64>,

    #[arg(long, allow_hyphen_values = true)]
    initial_guess: Option<f64>,
}

impl SolverArgs {
    fn resolve(&self) -> Result<IrrConfig> {
        let config = IrrConfig::from_env()
            .with_overrides(IrrOverrides {
                max_iterations: self.max_iterations,
                tolerance: self.tolerance,
                initial_guess: self.initial_guess,
            })
            .context("Invalid solver configuration")?;
        Ok(config)
    }
}

#[derive(Serialize)]
struct IrrResponse {
    cashflows: Vec<f64>,
    irr: f64,
    irr_pct: f64,
}

#[derive(Serialize)]
struct DepreciationResponse<'a> {
    schedules: &'a capital_budgeting::MethodResults,
    criterion: &'a str,
    applicable: bool,
    best_method: &'a str,
    best_schedule: &'a [f64],
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Command::Irr { flows, flows_file, solver, json } => {
            let config = solver.resolve()?;
            let cashflows = match (flows, flows_file) {
                (Some(text), _) => input::parse_amounts(&text).context("Invalid --flows")?,
                (None, Some(path)) => input::load_cash_flows(&path)
                    .with_context(|| format!("Failed to load {}", path.display()))?,
                (None, None) => bail!("Either --flows or --flows-file is required"),
            };
            run_irr(cashflows, &config, json)
        }
        Command::Compare { first, second, investment_1, investment_2, export, solver, json } => {
            let config = solver.resolve()?;
            let first = build_alternative(&first, investment_1).context("Invalid --first")?;
            let second = build_alternative(&second, investment_2).context("Invalid --second")?;
            run_compare(&first, &second, export, &config, json)
        }
        Command::Depreciation { cost, salvage, life, usage, total_usage, criterion, json } => {
            let mut asset = AssetInput::new(cost, salvage, life);
            if let Some(text) = usage {
                asset = asset.with_usage(input::parse_amounts(&text).context("Invalid --usage")?);
            }
            if let Some(total) = total_usage {
                asset = asset.with_total_usage(total);
            }
            run_depreciation(&asset, &criterion, json)
        }
    }
}

/// Full series, or the initial investment followed by annual flows
fn build_alternative(flows: &str, investment: Option<f64>) -> Result<Alternative> {
    let amounts = input::parse_amounts(flows)?;
    Ok(match investment {
        Some(initial) => Alternative::from_investment(initial, &amounts),
        None => Alternative::new(amounts),
    })
}

fn run_irr(cashflows: Vec<f64>, config: &IrrConfig, json: bool) -> Result<()> {
    let irr = capital_budgeting::solve_irr(&cashflows, config)
        .context("Could not calculate IRR (no solution found)")?;

    if json {
        let response = IrrResponse { cashflows, irr, irr_pct: irr * 100.0 };
        println!("{}", serde_json::to_string(&response)?);
    } else {
        println!("Periods: {}", cashflows.len());
        println!("IRR:     {:.4}%", irr * 100.0);
    }
    Ok(())
}

fn run_compare(
    first: &Alternative,
    second: &Alternative,
    export: Option<PathBuf>,
    config: &IrrConfig,
    json: bool,
) -> Result<()> {
    let comparison = compare_alternatives(first, second, config)
        .context("Could not calculate IRR for one or both alternatives")?;

    if let Some(path) = export {
        let file = File::create(&path)
            .with_context(|| format!("Unable to create {}", path.display()))?;
        ComparisonReport::build(first, second, &comparison).write_csv(file)?;
        if !json {
            println!("Comparison written to: {}", path.display());
        }
    }

    if json {
        println!("{}", serde_json::to_string(&comparison)?);
    } else {
        println!("Alternative 1 IRR: {:.4}", comparison.first_irr);
        println!("Alternative 2 IRR: {:.4}", comparison.second_irr);
        println!("{}.", comparison.preferred.describe());
    }
    Ok(())
}

fn run_depreciation(asset: &AssetInput, criterion: &str, json: bool) -> Result<()> {
    let schedules = calculate_all(asset);
    let selection = select_best_by_name(&schedules, criterion);

    if json {
        let response = DepreciationResponse {
            schedules: &schedules,
            criterion,
            applicable: selection.is_applicable(),
            best_method: selection.label(),
            best_schedule: selection.schedule(),
        };
        println!("{}", serde_json::to_string(&response)?);
        return Ok(());
    }

    for (method, schedule) in schedules.iter() {
        let total: f64 = schedule.iter().sum();
        println!("{:<18} total {:>12.2}", method.as_str(), total);
        for (year, amount) in schedule.iter().enumerate() {
            println!("  Year {:>3}: {:>12.2}", year + 1, amount);
        }
    }

    if selection.is_applicable() {
        println!("\nBest by {}: {}", criterion, selection.label());
    } else {
        println!("\nNo method applies for criterion '{}'", criterion);
    }
    Ok(())
}
