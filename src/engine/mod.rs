// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Non-deterministic search engine.
//!
//! The engine runs predicates in sequence and backtracks through the row
//! trail. Each stack entry tracks:
//! - Which predicate is executing
//! - Current round number (for predicates that execute multiple times)
//! - Choice mode state and the current choice
//! - The trail length to restore before the entry runs again
//!
//! Execution model:
//! 1. Call try_pred(round) on each predicate
//! 2. If Success: advance to next predicate
//! 3. If SuccessSamePredicate: increment round, stay at same predicate
//! 4. If Choices(n): enter choice mode, call retry_pred(round, 0..n-1)
//! 5. If Failure: backtrack to previous stack entry
//! 6. If Suspend: pause and return control to caller
//!
//! # Example
//!
//! ```
//! use sweep_loops::context::SweepContext;
//! use sweep_loops::engine::EngineBuilder;
//! use sweep_loops::memo::TableCache;
//! use sweep_loops::predicates::{FailPredicate, SeedRowPredicate, RowPredicate, TerminalRowPredicate, SolutionPredicate};
//! use sweep_loops::SweepRequest;
//!
//! let plan = SweepRequest::looped(3, 2).resolve_fixed(12).unwrap();
//! let mut ctx = SweepContext::new(plan, &TableCache::new(), None).unwrap();
//! let engine = EngineBuilder::new()
//!     .add(Box::new(SeedRowPredicate))
//!     .add(Box::new(RowPredicate))
//!     .add(Box::new(TerminalRowPredicate))
//!     .add(Box::new(SolutionPredicate::keep_all()))
//!     .terminal(Box::new(FailPredicate))
//!     .build();
//!
//! // FailPredicate forces every alternative: the engine ends exhausted.
//! assert!(engine.search(&mut ctx).is_none());
//! assert_eq!(ctx.solutions.len(), 3);
//! ```

pub mod predicate;

pub use predicate::{Predicate, PredicateResult, TerminalPredicate};

use crate::context::SweepContext;
use log::trace;

/// Stack entry tracking the state of one predicate execution.
#[derive(Debug)]
struct StackEntry {
    predicate_index: usize,
    round: usize,
    in_choice_mode: bool,
    current_choice: usize,
    num_choices: usize,
    /// Trail length restored before this entry runs.
    trail_checkpoint: usize,
}

impl StackEntry {
    fn new(predicate_index: usize, round: usize, trail_checkpoint: usize) -> Self {
        Self {
            predicate_index,
            round,
            in_choice_mode: false,
            current_choice: 0,
            num_choices: 0,
            trail_checkpoint,
        }
    }
}

/// Engine that coordinates predicate execution and backtracking.
pub struct SweepEngine {
    predicates: Vec<Box<dyn Predicate>>,
    stack: Vec<StackEntry>,
    /// Number of try_pred calls.
    try_count: u64,
    /// Number of retry_pred calls.
    retry_count: u64,
}

impl SweepEngine {
    /// Create an engine over `predicates`, tried in order.
    ///
    /// Prefer [`EngineBuilder`], which guarantees a terminal predicate.
    pub fn new(predicates: Vec<Box<dyn Predicate>>) -> Self {
        Self {
            predicates,
            stack: Vec::new(),
            try_count: 0,
            retry_count: 0,
        }
    }

    /// Run until a predicate suspends or every alternative is exhausted.
    ///
    /// Returns `Some(engine)` when suspended; calling `resume` on it continues
    /// with the next alternative. Returns `None` when exhausted. Results are
    /// reported through `ctx`.
    ///
    /// # Panics
    ///
    /// Panics if the sequence runs past its last predicate, which only happens
    /// for programs not built with a terminal predicate.
    pub fn search(mut self, ctx: &mut SweepContext) -> Option<Self> {
        self.stack.clear();
        self.try_count = 0;
        self.retry_count = 0;

        if self.predicates.is_empty() {
            return None;
        }
        self.stack.push(StackEntry::new(0, 0, ctx.trail.len()));
        self.run(ctx)
    }

    /// Continue a suspended search from the predicate that suspended.
    pub fn resume(mut self, ctx: &mut SweepContext) -> Option<Self> {
        // The suspending entry counts as failed so the search moves on.
        self.stack.pop();
        self.run(ctx)
    }

    fn run(mut self, ctx: &mut SweepContext) -> Option<Self> {
        loop {
            let entry = self.stack.last_mut()?;
            ctx.trail.rewind_to(entry.trail_checkpoint);

            let pred_idx = entry.predicate_index;
            let round = entry.round;
            let result = if !entry.in_choice_mode {
                self.try_count += 1;
                self.predicates[pred_idx].try_pred(ctx, round)
            } else {
                if entry.current_choice >= entry.num_choices {
                    self.stack.pop();
                    continue;
                }
                let choice = entry.current_choice;
                entry.current_choice += 1;
                self.retry_count += 1;
                let result = self.predicates[pred_idx].retry_pred(ctx, round, choice);
                if matches!(result, PredicateResult::Choices(_) | PredicateResult::Suspend) {
                    panic!("retry_pred returned invalid result: {:?}", result);
                }
                result
            };

            trace!(
                "[SweepEngine] {} round {} -> {:?}",
                self.predicates[pred_idx].name(),
                round,
                result
            );

            match result {
                PredicateResult::Success => {
                    self.settle_top();
                    self.push_next_predicate(ctx)
                }
                PredicateResult::SuccessSamePredicate => {
                    self.settle_top();
                    self.push_same_predicate(ctx)
                }
                PredicateResult::Failure => {
                    // In choice mode the entry stays to try its next choice.
                    if self.stack.last().map_or(false, |e| !e.in_choice_mode) {
                        self.stack.pop();
                    }
                }
                PredicateResult::Choices(n) => {
                    if let Some(entry) = self.stack.last_mut() {
                        entry.in_choice_mode = true;
                        entry.current_choice = 0;
                        entry.num_choices = n;
                        entry.trail_checkpoint = ctx.trail.len();
                    }
                }
                PredicateResult::Suspend => return Some(self),
            }
        }
    }

    /// A deterministic success has no alternatives: backtracking into it
    /// pops it.
    fn settle_top(&mut self) {
        if let Some(entry) = self.stack.last_mut() {
            if !entry.in_choice_mode {
                entry.in_choice_mode = true;
                entry.num_choices = 0;
            }
        }
    }

    fn push_next_predicate(&mut self, ctx: &SweepContext) {
        let next_index = self.stack.last().map_or(0, |e| e.predicate_index + 1);
        if next_index >= self.predicates.len() {
            panic!(
                "Invalid predicate sequence: reached end without FAIL or SUSPEND. \
                 Every program must terminate with a FAIL or SUSPEND predicate."
            );
        }
        self.stack
            .push(StackEntry::new(next_index, 0, ctx.trail.len()));
    }

    fn push_same_predicate(&mut self, ctx: &SweepContext) {
        if let Some(current) = self.stack.last() {
            let entry = StackEntry::new(current.predicate_index, current.round + 1, ctx.trail.len());
            self.stack.push(entry);
        }
    }

    /// (try_count, retry_count) since the last `search`.
    pub fn statistics(&self) -> (u64, u64) {
        (self.try_count, self.retry_count)
    }
}

/// Builds a predicate program that always ends in a terminal predicate.
#[derive(Default)]
pub struct EngineBuilder {
    predicates: Vec<Box<dyn Predicate>>,
}

impl EngineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(mut self, predicate: Box<dyn Predicate>) -> Self {
        self.predicates.push(predicate);
        self
    }

    /// Close the program with a terminal predicate.
    pub fn terminal<T: TerminalPredicate + 'static>(self, predicate: Box<T>) -> TerminatedBuilder {
        let mut predicates = self.predicates;
        predicates.push(predicate);
        TerminatedBuilder { predicates }
    }
}

/// A builder whose program is complete.
pub struct TerminatedBuilder {
    predicates: Vec<Box<dyn Predicate>>,
}

impl TerminatedBuilder {
    pub fn build(self) -> SweepEngine {
        SweepEngine::new(self.predicates)
    }
}
