// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Sampler configuration: retry ceilings and backtracking granularity.
//!
//! Defaults come from [`crate::geometry::constants`]; each field can be
//! overridden from the environment with [`SamplerConfig::from_env`].

use crate::error::{Result, SweepError};
use crate::geometry::constants::{
    DEFAULT_BACKTRACK_LIMIT, DEFAULT_ROW_ATTEMPTS, DEFAULT_SWEEP_ATTEMPTS,
};
use std::env;
use std::str::FromStr;
use strum_macros::{Display, EnumString};

const ENV_ROW_ATTEMPTS: &str = "SWEEP_ROW_ATTEMPTS";
const ENV_SWEEP_ATTEMPTS: &str = "SWEEP_SWEEP_ATTEMPTS";
const ENV_BACKTRACK: &str = "SWEEP_BACKTRACK";

/// What the random sampler does when a row runs out of attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum BacktrackPolicy {
    /// Throw the whole sweep away and start again at row 0.
    #[default]
    RestartSweep,
    /// Drop the last committed row and resample it.
    UnwindRow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SamplerConfig {
    /// Candidates drawn for one row before giving up on it.
    pub row_attempts: usize,
    /// Whole sweeps started before the search is exhausted (restart policy).
    pub sweep_attempts: usize,
    /// Rows unwound before the search is exhausted (unwind policy).
    pub backtrack_limit: usize,
    pub policy: BacktrackPolicy,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            row_attempts: DEFAULT_ROW_ATTEMPTS,
            sweep_attempts: DEFAULT_SWEEP_ATTEMPTS,
            backtrack_limit: DEFAULT_BACKTRACK_LIMIT,
            policy: BacktrackPolicy::default(),
        }
    }
}

impl SamplerConfig {
    /// Defaults overridden by `SWEEP_ROW_ATTEMPTS`, `SWEEP_SWEEP_ATTEMPTS`
    /// and `SWEEP_BACKTRACK` (`restart-sweep` or `unwind-row`).
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// As [`SamplerConfig::from_env`], reading variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();
        let set = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(value) = set(ENV_ROW_ATTEMPTS) {
            config.row_attempts = parse_positive(ENV_ROW_ATTEMPTS, &value)?;
        }
        if let Some(value) = set(ENV_SWEEP_ATTEMPTS) {
            config.sweep_attempts = parse_positive(ENV_SWEEP_ATTEMPTS, &value)?;
        }
        if let Some(value) = set(ENV_BACKTRACK) {
            config.policy = BacktrackPolicy::from_str(value.trim()).map_err(|_| {
                SweepError::configuration(format!(
                    "{} must be restart-sweep or unwind-row, got {:?}",
                    ENV_BACKTRACK, value
                ))
            })?;
        }
        config.validate()?;
        Ok(config)
    }

    pub fn with_policy(mut self, policy: BacktrackPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Every ceiling must allow at least one attempt.
    pub fn validate(&self) -> Result<()> {
        if self.row_attempts == 0 || self.sweep_attempts == 0 || self.backtrack_limit == 0 {
            return Err(SweepError::configuration(format!(
                "attempt ceilings must be positive: {:?}",
                self
            )));
        }
        Ok(())
    }
}

fn parse_positive(key: &str, value: &str) -> Result<usize> {
    match value.trim().parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(SweepError::configuration(format!(
            "{} must be a positive integer, got {:?}",
            key, value
        ))),
    }
}
