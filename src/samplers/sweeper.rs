// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! The randomized sweep loop shared by the table and block samplers.
//!
//! Row 0 is the seed row. Rows `1..height-1` are drawn from a [`RowSource`]
//! and validated against the component row. The terminal row's outflow is
//! fixed by the ending, so it is checked together with the last free row:
//! a candidate for that row is kept only when the terminal row then closes.

use crate::config::{BacktrackPolicy, SamplerConfig};
use crate::error::{Result, SweepError};
use crate::geometry::{ComponentId, RowBits};
use crate::matrices::SweepMatrices;
use crate::request::SweepPlan;
use crate::state::SweepObserver;
use crate::trail::{RowFrame, Trail};
use crate::validation::{validate_row, validate_terminal, RowRejection, RowTransition, Verdict};
use log::{debug, info, trace};
use rand::Rng;

/// Source of candidate outflows for one row.
pub trait RowSource {
    /// Draw one candidate outflow for `row` above `inflow`. `None` spends
    /// the attempt without a candidate.
    fn draw<R: Rng>(
        &self,
        rng: &mut R,
        plan: &SweepPlan,
        row: usize,
        inflow: RowBits,
    ) -> Result<Option<RowBits>>;

    /// Whether `outflow` may follow `inflow`. Checked for the terminal row,
    /// whose outflow is fixed rather than drawn.
    fn admits(&self, _inflow: RowBits, _outflow: RowBits) -> bool {
        true
    }
}

/// Result of one sweep attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome {
    Success(SweepMatrices),
    /// The attempt ran out of row attempts (or unwinds).
    SearchExhausted { furthest_row: usize },
    InvariantViolation(SweepError),
}

pub struct Sweeper<'a, S: RowSource, R: Rng, O: SweepObserver> {
    plan: SweepPlan,
    config: SamplerConfig,
    source: &'a S,
    rng: &'a mut R,
    observer: &'a mut O,
    trail: Trail,
    furthest_row: usize,
    unwinds: usize,
}

impl<'a, S: RowSource, R: Rng, O: SweepObserver> Sweeper<'a, S, R, O> {
    pub fn new(
        plan: SweepPlan,
        config: SamplerConfig,
        source: &'a S,
        rng: &'a mut R,
        observer: &'a mut O,
    ) -> Self {
        Self {
            plan,
            config,
            source,
            rng,
            observer,
            trail: Trail::new(),
            furthest_row: 0,
            unwinds: 0,
        }
    }

    /// Attempt sweeps until one succeeds or the ceilings are reached.
    pub fn run(mut self) -> Result<SweepMatrices> {
        self.config.validate()?;
        let attempts = match self.config.policy {
            BacktrackPolicy::RestartSweep => self.config.sweep_attempts,
            BacktrackPolicy::UnwindRow => 1,
        };
        for attempt in 1..=attempts {
            match self.attempt() {
                AttemptOutcome::Success(matrices) => {
                    debug!(
                        "[Sweeper] {}x{} sweep after {} attempts, {} unwinds",
                        self.plan.width, self.plan.height, attempt, self.unwinds
                    );
                    self.observer.sweep_completed(&matrices, self.plan.entry());
                    return Ok(matrices);
                }
                AttemptOutcome::SearchExhausted { furthest_row } => {
                    trace!("[Sweeper] attempt {} stopped at row {}", attempt, furthest_row);
                    if attempt < attempts {
                        self.observer.sweep_restarted(attempt);
                    }
                }
                AttemptOutcome::InvariantViolation(error) => return Err(error),
            }
        }
        let attempts = match self.config.policy {
            BacktrackPolicy::RestartSweep => attempts,
            BacktrackPolicy::UnwindRow => self.unwinds,
        };
        info!(
            "[Sweeper] search exhausted: {} attempts, furthest row {} of {}",
            attempts, self.furthest_row, self.plan.height
        );
        Err(SweepError::SearchExhausted {
            attempts,
            furthest_row: self.furthest_row,
            height: self.plan.height,
        })
    }

    /// One sweep from an empty trail.
    pub fn attempt(&mut self) -> AttemptOutcome {
        match self.sweep() {
            Ok(Some(matrices)) => AttemptOutcome::Success(matrices),
            Ok(None) => AttemptOutcome::SearchExhausted {
                furthest_row: self.trail.len(),
            },
            Err(error) => AttemptOutcome::InvariantViolation(error),
        }
    }

    fn sweep(&mut self) -> Result<Option<SweepMatrices>> {
        self.trail.clear();
        while self.trail.len() < self.plan.height {
            let row = self.trail.len();
            if self.advance(row)? {
                self.furthest_row = self.furthest_row.max(self.trail.len());
                continue;
            }
            match self.config.policy {
                BacktrackPolicy::RestartSweep => return Ok(None),
                BacktrackPolicy::UnwindRow => {
                    if self.unwinds >= self.config.backtrack_limit {
                        return Ok(None);
                    }
                    self.unwinds += 1;
                    self.observer.row_unwound(row);
                    self.trail.unwind();
                }
            }
        }
        Ok(Some(self.trail.to_matrices(self.plan.width)))
    }

    fn entry_state(&self) -> (RowBits, Vec<ComponentId>) {
        match self.trail.last() {
            Some(frame) => (frame.outflow, frame.components.clone()),
            None => (self.plan.entry(), self.plan.entry_components()),
        }
    }

    /// Draw up to `row_attempts` candidates for `row`; commit the first that
    /// validates. Returns false when none did.
    fn advance(&mut self, row: usize) -> Result<bool> {
        let (inflow, components) = self.entry_state();
        let last_free = row + 2 == self.plan.height;
        let exit = self.plan.exit();

        for _ in 0..self.config.row_attempts {
            let Some(outflow) = self.source.draw(&mut *self.rng, &self.plan, row, inflow)? else {
                continue;
            };
            let transition =
                match validate_row(inflow, outflow, &components, self.plan.max_nested)? {
                    Verdict::Accepted(transition) => transition,
                    Verdict::Rejected(rejection) => {
                        self.observer.row_rejected(row, &rejection);
                        continue;
                    }
                };
            let terminal = if last_free {
                if !self.source.admits(outflow, exit) {
                    let open_ends = outflow.count_ones() as usize;
                    self.observer
                        .row_rejected(row + 1, &RowRejection::ImpossibleTaper { open_ends });
                    continue;
                }
                match validate_terminal(outflow, exit, &transition.components, self.plan.ending)? {
                    Verdict::Accepted(terminal) => Some(terminal),
                    Verdict::Rejected(rejection) => {
                        self.observer.row_rejected(row + 1, &rejection);
                        continue;
                    }
                }
            } else {
                None
            };
            self.commit(row, inflow, outflow, transition)?;
            if let Some(terminal) = terminal {
                self.commit(row + 1, outflow, exit, terminal)?;
            }
            return Ok(true);
        }
        Ok(false)
    }

    fn commit(
        &mut self,
        row: usize,
        inflow: RowBits,
        outflow: RowBits,
        transition: RowTransition,
    ) -> Result<()> {
        self.plan.check_open(row, &transition.components)?;
        self.observer.row_committed(row, inflow, outflow);
        self.trail.push(RowFrame {
            outflow,
            horizontal: transition.horizontal,
            components: transition.components,
        })
    }
}
