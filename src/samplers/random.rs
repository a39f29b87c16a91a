// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Random sampler over one transition table.
//!
//! Every candidate is drawn uniformly from the table entry of the current
//! inflow. The search is best-effort: the result is one valid sweep, not a
//! uniform sample over all of them.

use crate::config::SamplerConfig;
use crate::error::Result;
use crate::geometry::row::bit;
use crate::geometry::{Parity, RowBits, MAX_TABLE_WIDTH};
use crate::matrices::SweepMatrices;
use crate::memo::{TableCache, TransitionTable};
use crate::predicates::sweep::loop_seeds;
use crate::request::{SweepPlan, SweepRequest};
use crate::samplers::sweeper::{RowSource, Sweeper};
use crate::state::{NoMetrics, SweepObserver};
use rand::seq::SliceRandom;
use rand::Rng;
use std::sync::Arc;

/// Uniform draws from a transition table.
#[derive(Debug, Clone)]
pub struct TableSource {
    table: Arc<TransitionTable>,
    seeds: Vec<RowBits>,
}

impl TableSource {
    /// Seed rows are only drawn for loops, so only even tables carry them.
    pub fn new(table: Arc<TransitionTable>) -> Result<Self> {
        let seeds = match table.parity() {
            Parity::Even => loop_seeds(&table)?,
            Parity::Odd => Vec::new(),
        };
        Ok(Self { table, seeds })
    }
}

impl RowSource for TableSource {
    fn admits(&self, inflow: RowBits, outflow: RowBits) -> bool {
        self.table.contains(inflow, outflow)
    }

    fn draw<R: Rng>(
        &self,
        rng: &mut R,
        plan: &SweepPlan,
        row: usize,
        inflow: RowBits,
    ) -> Result<Option<RowBits>> {
        if row == 0 {
            return Ok(match plan.start {
                Some(start) => Some(bit(start)),
                None => self.seeds.choose(rng).copied(),
            });
        }
        Ok(self.table.outflows(inflow)?.choose(rng).copied())
    }
}

pub fn sample<R: Rng>(
    request: &SweepRequest,
    rng: &mut R,
    config: &SamplerConfig,
    cache: &TableCache,
) -> Result<SweepMatrices> {
    sample_observed(request, rng, config, cache, &mut NoMetrics)
}

pub fn sample_observed<R: Rng, O: SweepObserver>(
    request: &SweepRequest,
    rng: &mut R,
    config: &SamplerConfig,
    cache: &TableCache,
    observer: &mut O,
) -> Result<SweepMatrices> {
    let plan = request.resolve(MAX_TABLE_WIDTH, rng)?;
    let table = cache.table(plan.width, plan.parity(), request.constraint.as_ref())?;
    let source = TableSource::new(table)?;
    Sweeper::new(plan, *config, &source, rng, observer).run()
}
