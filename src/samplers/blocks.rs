// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Multi-block sampler for rows wider than one transition table.
//!
//! The row is cut into blocks of at most [`MAX_TABLE_WIDTH`] columns. Each
//! block draws its outflow from its own tables, one per parity. A seam between
//! two blocks may carry one horizontal segment: the carry is only offered
//! when neither seam cell (the highest cell of the left block, the lowest of
//! the right block) carries an inflow, and then:
//!
//! - the left block draws an outflow with its highest bit set and clears it,
//!   so its strand leaves through the seam instead of going up
//! - the right block draws for its inflow plus a virtual inflow at its lowest
//!   cell, the strand arriving through the seam
//!
//! The concatenated row is validated as one logical row. This is an
//! approximation: at most one segment crosses each seam, so some valid rows
//! are never proposed.

use crate::config::SamplerConfig;
use crate::error::{Result, SweepError};
use crate::geometry::row::{bit, is_set, mask};
use crate::geometry::{Parity, RowBits, MAX_ROW_WIDTH, MAX_TABLE_WIDTH};
use crate::matrices::SweepMatrices;
use crate::memo::{RowConstraint, TableCache, TransitionTable};
use crate::request::{SweepPlan, SweepRequest};
use crate::samplers::sweeper::{RowSource, Sweeper};
use crate::state::{NoMetrics, SweepObserver};
use rand::seq::SliceRandom;
use rand::Rng;
use std::sync::Arc;

/// Columns `offset..offset + width` of the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block {
    pub offset: usize,
    pub width: usize,
}

impl Block {
    fn lowest(&self) -> usize {
        self.offset
    }

    fn highest(&self) -> usize {
        self.offset + self.width - 1
    }

    fn local(&self, bits: RowBits) -> RowBits {
        (bits >> self.offset) & mask(self.width)
    }
}

/// Split `width` columns into the fewest blocks of at most `max_block`
/// columns, sizes differing by at most one.
pub fn split_blocks(width: usize, max_block: usize) -> Vec<Block> {
    if width == 0 || max_block == 0 {
        return Vec::new();
    }
    let count = width.div_ceil(max_block);
    let (base, extra) = (width / count, width % count);
    let mut offset = 0;
    (0..count)
        .map(|i| {
            let block = Block {
                offset,
                width: base + usize::from(i < extra),
            };
            offset += block.width;
            block
        })
        .collect()
}

/// Per-block draws stitched across seams.
#[derive(Debug, Clone)]
pub struct BlockSource {
    blocks: Vec<Block>,
    /// Even and odd tables per block.
    tables: Vec<[Arc<TransitionTable>; 2]>,
    constraint: Option<RowConstraint>,
}

impl BlockSource {
    pub fn new(
        width: usize,
        cache: &TableCache,
        constraint: Option<RowConstraint>,
    ) -> Result<Self> {
        let blocks = split_blocks(width, MAX_TABLE_WIDTH);
        let tables = blocks
            .iter()
            .map(|block| {
                Ok([
                    cache.table(block.width, Parity::Even, None)?,
                    cache.table(block.width, Parity::Odd, None)?,
                ])
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            blocks,
            tables,
            constraint,
        })
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    fn table(&self, index: usize, inflow: RowBits) -> &TransitionTable {
        match Parity::of(inflow) {
            Parity::Even => &self.tables[index][0],
            Parity::Odd => &self.tables[index][1],
        }
    }

    /// Draw the seam carries for `inflow`.
    fn carries<R: Rng>(&self, rng: &mut R, inflow: RowBits) -> Vec<bool> {
        self.blocks
            .windows(2)
            .map(|pair| {
                let free = !is_set(inflow, pair[0].highest()) && !is_set(inflow, pair[1].lowest());
                free && rng.gen_bool(0.5)
            })
            .collect()
    }

    fn compose<R: Rng>(&self, rng: &mut R, inflow: RowBits) -> Result<Option<RowBits>> {
        let carries = self.carries(rng, inflow);
        let mut outflow: RowBits = 0;
        for (index, block) in self.blocks.iter().enumerate() {
            let carry_in = index > 0 && carries[index - 1];
            let carry_out = index + 1 < self.blocks.len() && carries[index];
            let local_in = block.local(inflow) | if carry_in { 1 } else { 0 };
            let exit = bit(block.width - 1);
            let entry = self.table(index, local_in).outflows(local_in)?;
            let picked = if carry_out {
                let leaving: Vec<RowBits> =
                    entry.iter().copied().filter(|o| o & exit != 0).collect();
                leaving.choose(rng).map(|o| o & !exit)
            } else {
                entry.choose(rng).copied()
            };
            match picked {
                Some(local_out) => outflow |= local_out << block.offset,
                None => return Ok(None),
            }
        }
        Ok(Some(outflow))
    }
}

impl RowSource for BlockSource {
    fn admits(&self, _inflow: RowBits, outflow: RowBits) -> bool {
        match &self.constraint {
            Some(constraint) => constraint.allows(outflow),
            None => true,
        }
    }

    fn draw<R: Rng>(
        &self,
        rng: &mut R,
        plan: &SweepPlan,
        row: usize,
        inflow: RowBits,
    ) -> Result<Option<RowBits>> {
        if row == 0 {
            if let Some(start) = plan.start {
                return Ok(Some(bit(start)));
            }
        }
        let Some(outflow) = self.compose(rng, inflow)? else {
            return Ok(None);
        };
        if row == 0 && outflow == 0 {
            return Ok(None);
        }
        if !self.admits(inflow, outflow) {
            return Ok(None);
        }
        Ok(Some(outflow))
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
    let plan = request.resolve(MAX_ROW_WIDTH, rng)?;
    let source = BlockSource::new(plan.width, cache, request.constraint.clone())?;
    if source.blocks().is_empty() {
        return Err(SweepError::configuration("no blocks for an empty row"));
    }
    Sweeper::new(plan, *config, &source, rng, observer).run()
}
