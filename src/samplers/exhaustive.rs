// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Exhaustive enumeration of small grids through the predicate engine.
//!
//! Every sweep is visited exactly once, in table order. Paths must name their
//! columns: the count is over one fixed pair of endpoints.

use crate::context::SweepContext;
use crate::engine::{EngineBuilder, TerminatedBuilder};
use crate::error::Result;
use crate::geometry::MAX_TABLE_WIDTH;
use crate::matrices::SweepMatrices;
use crate::memo::TableCache;
use crate::predicates::{
    FailPredicate, RowPredicate, SeedRowPredicate, SolutionPredicate, SuspendPredicate,
    TerminalRowPredicate,
};
use crate::request::SweepRequest;
use crate::state::{Counters, Statistics};
use log::info;

/// Result of an exhaustive run.
#[derive(Debug, Clone)]
pub struct Enumeration {
    pub count: u64,
    /// The first solutions, as many as were asked for.
    pub solutions: Vec<SweepMatrices>,
    pub statistics: Statistics,
}

fn program(solution: SolutionPredicate) -> EngineBuilder {
    EngineBuilder::new()
        .add(Box::new(SeedRowPredicate))
        .add(Box::new(RowPredicate))
        .add(Box::new(TerminalRowPredicate))
        .add(Box::new(solution))
}

fn context(request: &SweepRequest, cache: &TableCache) -> Result<SweepContext> {
    let plan = request.resolve_fixed(MAX_TABLE_WIDTH)?;
    SweepContext::new(plan, cache, request.constraint.as_ref())
}

fn drain(ctx: &mut SweepContext, builder: TerminatedBuilder) -> Result<()> {
    let engine = builder.build();
    let _ = engine.search(ctx);
    match ctx.error.take() {
        Some(error) => Err(error),
        None => Ok(()),
    }
}

/// Visit every sweep, keeping the first `keep` of them (all when `None`).
pub fn enumerate(
    request: &SweepRequest,
    cache: &TableCache,
    keep: Option<usize>,
) -> Result<Enumeration> {
    let mut ctx = context(request, cache)?;
    let solution = match keep {
        Some(limit) => SolutionPredicate::keep_first(limit),
        None => SolutionPredicate::keep_all(),
    };
    drain(&mut ctx, program(solution).terminal(Box::new(FailPredicate)))?;
    let count = ctx.statistics.get(Counters::Solutions);
    info!(
        "[Exhaustive] {}x{} {}: {} sweeps",
        request.width,
        request.height,
        if ctx.plan().is_path() { "path" } else { "loop" },
        count
    );
    Ok(Enumeration {
        count,
        solutions: ctx.solutions,
        statistics: ctx.statistics,
    })
}

/// Number of sweeps of the request.
pub fn count_solutions(request: &SweepRequest, cache: &TableCache) -> Result<u64> {
    Ok(enumerate(request, cache, Some(0))?.count)
}

/// The first sweep in table order, if any.
pub fn first_solution(request: &SweepRequest, cache: &TableCache) -> Result<Option<SweepMatrices>> {
    let mut ctx = context(request, cache)?;
    drain(
        &mut ctx,
        program(SolutionPredicate::keep_first(1)).terminal(Box::new(SuspendPredicate)),
    )?;
    Ok(ctx.solutions.pop())
}
