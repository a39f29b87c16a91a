// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Immutable data for one sweep: the plan and its transition table.

use crate::error::Result;
use crate::memo::{RowConstraint, TableCache, TransitionTable};
use crate::request::SweepPlan;
use log::debug;
use std::sync::Arc;

/// Data computed before a sweep starts and never changed during it.
///
/// The table is shared through the cache, so cloning a `SweepMemo` for
/// another context is cheap.
#[derive(Debug, Clone)]
pub struct SweepMemo {
    pub plan: SweepPlan,
    pub table: Arc<TransitionTable>,
}

impl SweepMemo {
    pub fn new(
        plan: SweepPlan,
        cache: &TableCache,
        constraint: Option<&RowConstraint>,
    ) -> Result<Self> {
        let table = cache.table(plan.width, plan.parity(), constraint)?;
        debug!(
            "[SweepMemo] {}x{} {} sweep over {} transitions",
            plan.width,
            plan.height,
            plan.parity(),
            table.transition_count()
        );
        Ok(Self { plan, table })
    }
}
