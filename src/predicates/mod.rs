// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Search predicates.
//!
//! - `sweep`: the row predicates of the exhaustive sampler, one per phase of
//!   a sweep (seed row, middle rows, terminal row, solution)
//! - Built-in predicates: `FailPredicate`, `SuspendPredicate`
//!
//! A program that collects every solution ends in `FailPredicate`; one that
//! stops at each solution ends in `SuspendPredicate`.

pub mod sweep;

pub use sweep::{RowPredicate, SeedRowPredicate, SolutionPredicate, TerminalRowPredicate};

use crate::context::SweepContext;
use crate::engine::{Predicate, PredicateResult, TerminalPredicate};

/// Built-in fail predicate (Prolog's `fail.`).
///
/// Always fails, forcing the engine through every remaining alternative.
#[derive(Debug)]
pub struct FailPredicate;

impl Predicate for FailPredicate {
    fn try_pred(&mut self, _ctx: &mut SweepContext, _round: usize) -> PredicateResult {
        PredicateResult::Failure
    }

    fn name(&self) -> &str {
        "Fail"
    }
}

impl TerminalPredicate for FailPredicate {}

/// Built-in suspend predicate: hands control back with the state intact.
#[derive(Debug)]
pub struct SuspendPredicate;

impl Predicate for SuspendPredicate {
    fn try_pred(&mut self, _ctx: &mut SweepContext, _round: usize) -> PredicateResult {
        PredicateResult::Suspend
    }

    fn name(&self) -> &str {
        "Suspend"
    }
}

impl TerminalPredicate for SuspendPredicate {}
