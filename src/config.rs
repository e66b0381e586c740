//! Solver configuration from the environment
//!
//! Reads:
//!   IRR_MAX_ITERATIONS, IRR_TOLERANCE, IRR_INITIAL_GUESS
//! Unset or unparsable variables fall back to the defaults.

use std::env;

use log::debug;
use thiserror::Error;

use crate::irr::IrrConfig;

pub const ENV_MAX_ITERATIONS: &str = "IRR_MAX_ITERATIONS";
pub const ENV_TOLERANCE: &str = "IRR_TOLERANCE";
pub const ENV_INITIAL_GUESS: &str = "IRR_INITIAL_GUESS";

/// Invalid solver parameters
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ConfigError {
    #[error("iteration cap must be at least 1")]
    ZeroIterations,

    #[error("tolerance must be positive and finite, got {0}")]
    InvalidTolerance(f64),

    #[error("initial guess must be finite and above -1, got {0}")]
    InvalidInitialGuess(f64),
}

/// Command-line overrides; `None` keeps the value from the environment
#[derive(Debug, Clone, Copy, Default)]
pub struct IrrOverrides {
    pub max_iterations: Option<u32>,
    pub tolerance: Option<f64>,
    pub initial_guess: Option<f64>,
}

impl IrrConfig {
    /// Defaults overlaid with any IRR_* environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (used by `from_env`)
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let config = Self {
            max_iterations: lookup(ENV_MAX_ITERATIONS)
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(defaults.max_iterations),
            tolerance: lookup(ENV_TOLERANCE)
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(defaults.tolerance),
            initial_guess: lookup(ENV_INITIAL_GUESS)
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(defaults.initial_guess),
        };

        debug!("IRR config: {:?}", config);
        config
    }

    /// Apply command-line overrides and validate the result
    pub fn with_overrides(self, overrides: IrrOverrides) -> Result<Self, ConfigError> {
        let config = Self {
            max_iterations: overrides.max_iterations.unwrap_or(self.max_iterations),
            tolerance: overrides.tolerance.unwrap_or(self.tolerance),
            initial_guess: overrides.initial_guess.unwrap_or(self.initial_guess),
        };
        config.validate()?;
        Ok(config)
    }
}
