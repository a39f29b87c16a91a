// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Sweep context combining precomputed and mutable state.
//!
//! The context is the data passed through the predicate engine:
//! - `memo`: the plan and transition table, immutable and shareable
//! - `trail`: the committed rows, truncated on backtrack
//! - `statistics` and `solutions`: what the search has found so far
//!
//! Independent contexts can run on different threads over the same tables.

pub mod memoized;

pub use memoized::SweepMemo;

use crate::error::{Result, SweepError};
use crate::geometry::{ComponentId, RowBits};
use crate::matrices::SweepMatrices;
use crate::memo::{RowConstraint, TableCache};
use crate::request::SweepPlan;
use crate::state::Statistics;
use crate::trail::{RowFrame, Trail};
use crate::validation::RowTransition;

#[derive(Debug)]
pub struct SweepContext {
    pub memo: SweepMemo,
    pub trail: Trail,
    pub statistics: Statistics,
    /// Completed sweeps kept by the solution predicate.
    pub solutions: Vec<SweepMatrices>,
    /// The first invariant violation seen; the search suspends on it.
    pub error: Option<SweepError>,
}

impl SweepContext {
    pub fn new(
        plan: SweepPlan,
        cache: &TableCache,
        constraint: Option<&RowConstraint>,
    ) -> Result<Self> {
        Ok(Self::with_memo(SweepMemo::new(plan, cache, constraint)?))
    }

    /// A context sharing already built memo data.
    pub fn with_memo(memo: SweepMemo) -> Self {
        Self {
            memo,
            trail: Trail::new(),
            statistics: Statistics::new(),
            solutions: Vec::new(),
            error: None,
        }
    }

    pub fn plan(&self) -> &SweepPlan {
        &self.memo.plan
    }

    /// Index of the next row to commit.
    pub fn current_row(&self) -> usize {
        self.trail.len()
    }

    /// Pattern entering the next row.
    pub fn inflow(&self) -> RowBits {
        self.trail
            .last()
            .map_or_else(|| self.memo.plan.entry(), |frame| frame.outflow)
    }

    /// Labels of the strands entering the next row.
    pub fn components(&self) -> Vec<ComponentId> {
        self.trail
            .last()
            .map_or_else(|| self.memo.plan.entry_components(), |frame| frame.components.clone())
    }

    /// Commit an accepted row.
    pub fn commit(&mut self, outflow: RowBits, transition: RowTransition) -> Result<()> {
        self.memo
            .plan
            .check_open(self.current_row(), &transition.components)?;
        self.trail.push(RowFrame {
            outflow,
            horizontal: transition.horizontal,
            components: transition.components,
        })
    }

    /// The committed rows as matrices.
    pub fn matrices(&self) -> SweepMatrices {
        self.trail.to_matrices(self.memo.plan.width)
    }

    /// Whether every row of the plan has been committed.
    pub fn is_complete(&self) -> bool {
        self.trail.len() == self.memo.plan.height
    }

    /// Remember the first invariant violation.
    pub fn fail_with(&mut self, error: SweepError) {
        if self.error.is_none() {
            self.error = Some(error);
        }
    }

    /// Clear the trail and results for another run over the same memo.
    pub fn reset(&mut self) {
        self.trail.clear();
        self.statistics = Statistics::new();
        self.solutions.clear();
        self.error = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{MAX_TABLE_WIDTH, START_COMPONENT};
    use crate::request::SweepRequest;
    use crate::validation::validate_row;

    fn path_context() -> SweepContext {
        let plan = SweepRequest::path(3, 3)
            .with_columns(0, 2)
            .resolve_fixed(MAX_TABLE_WIDTH)
            .unwrap();
        SweepContext::new(plan, &TableCache::new(), None).unwrap()
    }

    #[test]
    fn test_entry_state() {
        let ctx = path_context();
        assert_eq!(ctx.current_row(), 0);
        assert_eq!(ctx.inflow(), 0b001);
        assert_eq!(ctx.components(), vec![START_COMPONENT, 0, 0]);
        assert!(!ctx.is_complete());
    }

    #[test]
    fn test_commit_and_reset() {
        let mut ctx = path_context();
        let verdict = validate_row(ctx.inflow(), 0b001, &ctx.components(), None).unwrap();
        let transition = verdict.transition().cloned().unwrap();
        ctx.commit(0b001, transition).unwrap();
        assert_eq!(ctx.current_row(), 1);
        assert_eq!(ctx.inflow(), 0b001);
        assert_eq!(ctx.matrices().vertical, vec![0b001]);

        ctx.fail_with(SweepError::invariant("first"));
        ctx.fail_with(SweepError::invariant("second"));
        assert_eq!(ctx.error, Some(SweepError::invariant("first")));

        ctx.reset();
        assert!(ctx.trail.is_empty());
        assert!(ctx.error.is_none());
    }

    #[test]
    fn test_commit_rejects_empty_row_below_top() {
        let plan = SweepRequest::looped(3, 3).resolve_fixed(MAX_TABLE_WIDTH).unwrap();
        let mut ctx = SweepContext::new(plan, &TableCache::new(), None).unwrap();
        let verdict = validate_row(0, 0, &ctx.components(), None).unwrap();
        let transition = verdict.transition().cloned().unwrap();
        assert!(matches!(
            ctx.commit(0, transition),
            Err(SweepError::InvariantViolation(_))
        ));
        assert!(ctx.trail.is_empty());
    }

    #[test]
    fn test_independent_contexts_share_tables() {
        let cache = TableCache::new();
        let plan = SweepRequest::looped(4, 3).resolve_fixed(MAX_TABLE_WIDTH).unwrap();
        let first = SweepContext::new(plan, &cache, None).unwrap();
        let second = SweepContext::with_memo(first.memo.clone());
        assert!(std::sync::Arc::ptr_eq(&first.memo.table, &second.memo.table));
        assert_eq!(cache.len(), 1);
    }
}
