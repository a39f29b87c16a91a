// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Samplers: stitch per-row choices into full-height sweeps.
//!
//! - `random`: uniform draws from one transition table, with restart or
//!   unwind backtracking
//! - `blocks`: rows wider than one table, drawn block by block
//! - `exhaustive`: every solution of a small grid, through the predicate engine
//! - `batch`: many independent random sweeps on the rayon pool
//!
//! Random sweeps move through `Init → RowInProgress → {Success, Backtrack,
//! Failed}`; [`sweeper::Sweeper`] holds that loop for both row sources.

pub mod batch;
pub mod blocks;
pub mod exhaustive;
pub mod random;
pub mod sweeper;

pub use crate::request::{Shape, SweepPlan, SweepRequest};
pub use sweeper::{AttemptOutcome, RowSource};

use crate::config::SamplerConfig;
use crate::error::Result;
use crate::geometry::MAX_TABLE_WIDTH;
use crate::matrices::SweepMatrices;
use crate::memo::TableCache;
use crate::state::SweepObserver;
use rand::Rng;

/// Sample one sweep, picking the sampler by width: one table up to
/// [`MAX_TABLE_WIDTH`], blocks beyond.
pub fn sample<R: Rng>(
    request: &SweepRequest,
    rng: &mut R,
    config: &SamplerConfig,
    cache: &TableCache,
) -> Result<SweepMatrices> {
    sample_observed(request, rng, config, cache, &mut crate::state::NoMetrics)
}

/// As [`sample`], reporting progress to `observer`.
pub fn sample_observed<R: Rng, O: SweepObserver>(
    request: &SweepRequest,
    rng: &mut R,
    config: &SamplerConfig,
    cache: &TableCache,
    observer: &mut O,
) -> Result<SweepMatrices> {
    if request.width <= MAX_TABLE_WIDTH {
        random::sample_observed(request, rng, config, cache, observer)
    } else {
        blocks::sample_observed(request, rng, config, cache, observer)
    }
}
