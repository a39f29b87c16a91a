// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Predicate trait for non-deterministic search.
//!
//! The engine works by trying predicates in sequence. Each predicate
//! represents a choice point in the search space. Predicates can succeed,
//! fail, or signal completion.

use crate::context::SweepContext;
use std::fmt::Debug;

/// Result of attempting a predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PredicateResult {
    /// Predicate succeeded. Move to next predicate in sequence.
    Success,

    /// Predicate succeeded but stay at same predicate with next round.
    /// Lets one predicate run once per row.
    SuccessSamePredicate,

    /// Predicate has no (more) valid choices. Backtrack to previous predicate.
    Failure,

    /// Predicate has `n` choices, explored through `retry_pred(round, 0..n)`.
    Choices(usize),

    /// Suspend execution. Engine returns control with state preserved.
    Suspend,
}

/// A predicate that ends a program: it never returns Success.
///
/// [`crate::engine::EngineBuilder::terminal`] only accepts these, so every
/// built program ends properly.
pub trait TerminalPredicate: Predicate {}

/// A choice point of the search.
///
/// The engine calls `try_pred` when it first reaches the predicate, and
/// `retry_pred` for each choice after `try_pred` returned `Choices(n)`.
///
/// Before each call the engine truncates the trail to the length it had when
/// the predicate was entered, so rows committed by an earlier choice are gone.
pub trait Predicate: Debug {
    /// Try this predicate for round `round`, starting at 0 and incremented
    /// each time the predicate returns `SuccessSamePredicate`.
    fn try_pred(&mut self, ctx: &mut SweepContext, round: usize) -> PredicateResult;

    /// Retry this predicate with choice `choice` of round `round`.
    ///
    /// May return `Success`, `SuccessSamePredicate` or `Failure`; never
    /// `Choices` or `Suspend`.
    #[allow(unused)]
    fn retry_pred(
        &mut self,
        ctx: &mut SweepContext,
        round: usize,
        choice: usize,
    ) -> PredicateResult {
        // Only predicates that return Choices are retried.
        panic!("{}::retry_pred should never be called", self.name());
    }

    /// Name for logging.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}
