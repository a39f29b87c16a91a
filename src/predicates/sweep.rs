// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Row predicates: one sweep as a predicate program.
//!
//! ```text
//! SeedRowPredicate -> RowPredicate (one round per middle row)
//!                  -> TerminalRowPredicate -> SolutionPredicate -> Fail | Suspend
//! ```
//!
//! Candidates come from the transition table in table order, so the engine
//! visits every valid sweep exactly once. Invariant violations are stored in
//! the context and make every later predicate fail, draining the search.

use crate::context::SweepContext;
use crate::engine::{Predicate, PredicateResult};
use crate::error::Result;
use crate::geometry::row::bit;
use crate::geometry::RowBits;
use crate::memo::TransitionTable;
use crate::state::Counters;
use crate::validation::{validate_row, validate_terminal, RowRejection, Verdict};
use log::debug;
use std::sync::Arc;

/// Commit an accepted candidate, count a rejected one.
fn settle(ctx: &mut SweepContext, outflow: RowBits, verdict: Result<Verdict>) -> bool {
    ctx.statistics.increment(Counters::CandidatesTried);
    match verdict {
        Ok(Verdict::Accepted(transition)) => match ctx.commit(outflow, transition) {
            Ok(()) => {
                ctx.statistics.increment(Counters::RowsCommitted);
                true
            }
            Err(error) => {
                ctx.fail_with(error);
                false
            }
        },
        Ok(Verdict::Rejected(rejection)) => {
            ctx.statistics.record_rejection(&rejection);
            false
        }
        Err(error) => {
            ctx.fail_with(error);
            false
        }
    }
}

fn outcome(accepted: bool, on_success: PredicateResult) -> PredicateResult {
    if accepted {
        on_success
    } else {
        PredicateResult::Failure
    }
}

/// Candidate outflows for the next row, or `None` after recording an error.
fn candidates(ctx: &mut SweepContext) -> Option<(Arc<TransitionTable>, RowBits)> {
    let table = Arc::clone(&ctx.memo.table);
    let inflow = ctx.inflow();
    match table.outflows(inflow) {
        Ok(_) => Some((table, inflow)),
        Err(error) => {
            ctx.fail_with(error);
            None
        }
    }
}

/// Non-empty seed rows of a loop: every outflow the table allows above an
/// empty row, in table order.
pub fn loop_seeds(table: &TransitionTable) -> Result<Vec<RowBits>> {
    Ok(table
        .outflows(0)?
        .iter()
        .copied()
        .filter(|&seed| seed != 0)
        .collect())
}

/// Row 0. A path goes straight up from its start; a loop chooses among its
/// seed rows, each capped into strands by the validator.
#[derive(Debug)]
pub struct SeedRowPredicate;

impl Predicate for SeedRowPredicate {
    fn try_pred(&mut self, ctx: &mut SweepContext, _round: usize) -> PredicateResult {
        if ctx.error.is_some() {
            return PredicateResult::Failure;
        }
        match ctx.plan().start {
            Some(start) => {
                let verdict = validate_row(
                    ctx.inflow(),
                    bit(start),
                    &ctx.components(),
                    ctx.plan().max_nested,
                );
                outcome(settle(ctx, bit(start), verdict), PredicateResult::Success)
            }
            None => match loop_seeds(&ctx.memo.table) {
                Ok(seeds) if !seeds.is_empty() => PredicateResult::Choices(seeds.len()),
                Ok(_) => PredicateResult::Failure,
                Err(error) => {
                    ctx.fail_with(error);
                    PredicateResult::Failure
                }
            },
        }
    }

    fn retry_pred(&mut self, ctx: &mut SweepContext, _round: usize, choice: usize) -> PredicateResult {
        if ctx.error.is_some() {
            return PredicateResult::Failure;
        }
        let seed = match loop_seeds(&ctx.memo.table) {
            Ok(seeds) => seeds.get(choice).copied(),
            Err(error) => {
                ctx.fail_with(error);
                None
            }
        };
        let Some(seed) = seed else {
            return PredicateResult::Failure;
        };
        let verdict = validate_row(0, seed, &ctx.components(), ctx.plan().max_nested);
        outcome(settle(ctx, seed, verdict), PredicateResult::Success)
    }

    fn name(&self) -> &str {
        "SeedRow"
    }
}

/// Rows 1..height-1, one round per row, one choice per table outflow.
#[derive(Debug)]
pub struct RowPredicate;

impl Predicate for RowPredicate {
    fn try_pred(&mut self, ctx: &mut SweepContext, _round: usize) -> PredicateResult {
        if ctx.error.is_some() {
            return PredicateResult::Failure;
        }
        if ctx.current_row() + 1 >= ctx.plan().height {
            return PredicateResult::Success;
        }
        match candidates(ctx) {
            Some((table, inflow)) => match table.outflows(inflow) {
                Ok(outflows) if !outflows.is_empty() => PredicateResult::Choices(outflows.len()),
                _ => PredicateResult::Failure,
            },
            None => PredicateResult::Failure,
        }
    }

    fn retry_pred(&mut self, ctx: &mut SweepContext, _round: usize, choice: usize) -> PredicateResult {
        if ctx.error.is_some() {
            return PredicateResult::Failure;
        }
        let Some((table, inflow)) = candidates(ctx) else {
            return PredicateResult::Failure;
        };
        let Some(&outflow) = table.outflows(inflow).ok().and_then(|o| o.get(choice)) else {
            return PredicateResult::Failure;
        };
        let verdict = validate_row(inflow, outflow, &ctx.components(), ctx.plan().max_nested);
        outcome(
            settle(ctx, outflow, verdict),
            PredicateResult::SuccessSamePredicate,
        )
    }

    fn name(&self) -> &str {
        "Row"
    }
}

/// The last row: the outflow is fixed by the ending and must close it.
#[derive(Debug)]
pub struct TerminalRowPredicate;

impl Predicate for TerminalRowPredicate {
    fn try_pred(&mut self, ctx: &mut SweepContext, _round: usize) -> PredicateResult {
        if ctx.error.is_some() {
            return PredicateResult::Failure;
        }
        let Some((table, inflow)) = candidates(ctx) else {
            return PredicateResult::Failure;
        };
        let outflow = ctx.plan().exit();
        if !table.contains(inflow, outflow) {
            ctx.statistics.record_rejection(&RowRejection::ImpossibleTaper {
                open_ends: inflow.count_ones() as usize,
            });
            return PredicateResult::Failure;
        }
        let verdict = validate_terminal(inflow, outflow, &ctx.components(), ctx.plan().ending);
        outcome(settle(ctx, outflow, verdict), PredicateResult::Success)
    }

    fn name(&self) -> &str {
        "TerminalRow"
    }
}

/// Count a completed sweep and keep its matrices, up to `limit` of them.
#[derive(Debug)]
pub struct SolutionPredicate {
    limit: Option<usize>,
}

impl SolutionPredicate {
    pub fn keep_all() -> Self {
        Self { limit: None }
    }

    pub fn keep_first(limit: usize) -> Self {
        Self { limit: Some(limit) }
    }

    pub fn count_only() -> Self {
        Self::keep_first(0)
    }
}

impl Predicate for SolutionPredicate {
    fn try_pred(&mut self, ctx: &mut SweepContext, _round: usize) -> PredicateResult {
        if ctx.error.is_some() {
            return PredicateResult::Failure;
        }
        debug_assert!(ctx.is_complete());
        ctx.statistics.increment(Counters::Solutions);
        if self.limit.map_or(true, |limit| ctx.solutions.len() < limit) {
            let matrices = ctx.matrices();
            debug!("[SolutionPredicate] solution {}\n{}", ctx.solutions.len() + 1, matrices);
            ctx.solutions.push(matrices);
        }
        PredicateResult::Success
    }

    fn name(&self) -> &str {
        "Solution"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::EngineBuilder;
    use crate::geometry::MAX_TABLE_WIDTH;
    use crate::memo::TableCache;
    use crate::predicates::{FailPredicate, SuspendPredicate};
    use crate::request::SweepRequest;

    fn context(request: SweepRequest) -> SweepContext {
        let plan = request.resolve_fixed(MAX_TABLE_WIDTH).unwrap();
        SweepContext::new(plan, &TableCache::new(), None).unwrap()
    }

    fn run_all(ctx: &mut SweepContext) {
        let engine = EngineBuilder::new()
            .add(Box::new(SeedRowPredicate))
            .add(Box::new(RowPredicate))
            .add(Box::new(TerminalRowPredicate))
            .add(Box::new(SolutionPredicate::keep_all()))
            .terminal(Box::new(FailPredicate))
            .build();
        assert!(engine.search(ctx).is_none());
    }

    #[test]
    fn test_loop_seeds() {
        let table = TransitionTable::build(3, crate::geometry::Parity::Even, None).unwrap();
        assert_eq!(loop_seeds(&table).unwrap(), vec![0b011, 0b101, 0b110]);
    }

    #[test]
    fn test_straight_path() {
        let mut ctx = context(SweepRequest::path(1, 4).with_columns(0, 0));
        run_all(&mut ctx);
        assert_eq!(ctx.solutions.len(), 1);
        assert_eq!(ctx.solutions[0].vertical, vec![1, 1, 1, 1]);
        assert_eq!(ctx.statistics.get(Counters::Solutions), 1);
    }

    #[test]
    fn test_two_by_two_paths() {
        // The seed row goes straight up, so the only route turns right in
        // the top row.
        let mut ctx = context(SweepRequest::path(2, 2).with_columns(0, 1));
        run_all(&mut ctx);
        let mut horizontals: Vec<Vec<RowBits>> =
            ctx.solutions.iter().map(|m| m.horizontal.clone()).collect();
        horizontals.sort();
        assert_eq!(horizontals, vec![vec![0, 0b01]]);
    }

    #[test]
    fn test_suspend_at_first_solution() {
        let mut ctx = context(SweepRequest::looped(3, 3));
        let engine = EngineBuilder::new()
            .add(Box::new(SeedRowPredicate))
            .add(Box::new(RowPredicate))
            .add(Box::new(TerminalRowPredicate))
            .add(Box::new(SolutionPredicate::keep_all()))
            .terminal(Box::new(SuspendPredicate))
            .build();
        let engine = engine.search(&mut ctx);
        assert!(engine.is_some());
        assert_eq!(ctx.solutions.len(), 1);
        assert!(ctx.is_complete());
    }

    #[test]
    fn test_count_only_keeps_nothing() {
        let mut ctx = context(SweepRequest::looped(3, 2));
        let engine = EngineBuilder::new()
            .add(Box::new(SeedRowPredicate))
            .add(Box::new(RowPredicate))
            .add(Box::new(TerminalRowPredicate))
            .add(Box::new(SolutionPredicate::count_only()))
            .terminal(Box::new(FailPredicate))
            .build();
        assert!(engine.search(&mut ctx).is_none());
        assert!(ctx.solutions.is_empty());
        assert_eq!(ctx.statistics.get(Counters::Solutions), 3);
    }
}
