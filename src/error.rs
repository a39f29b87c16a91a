// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Error types for table construction and sampling.
//!
//! Rejected candidate rows are not errors: they are reported as
//! [`RowRejection`](crate::validation::RowRejection) values and drive the
//! samplers' retries. `SweepError` covers the three ways a request can end
//! without a result.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, SweepError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SweepError {
    /// The request cannot be served as given: a width beyond the supported
    /// ceiling, a column outside the grid, or a table that was never built.
    /// Retrying with the same parameters fails again.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Every bounded attempt failed. Vary the seed, the dimensions or the
    /// constraints and try again.
    #[error("Search exhausted after {attempts} attempts (furthest row reached: {furthest_row} of {height})")]
    SearchExhausted {
        attempts: usize,
        furthest_row: usize,
        height: usize,
    },

    /// Table or validator logic produced an impossible state.
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),
}

impl SweepError {
    pub fn configuration(message: impl Into<String>) -> Self {
        SweepError::Configuration(message.into())
    }

    pub fn invariant(message: impl Into<String>) -> Self {
        SweepError::InvariantViolation(message.into())
    }

    /// Whether retrying with another seed may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, SweepError::SearchExhausted { .. })
    }
}
