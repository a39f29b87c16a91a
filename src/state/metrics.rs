// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Path-quality metrics gathered while sweeping.
//!
//! Samplers report to a [`SweepObserver`]. Effort counters (rows committed,
//! rejections, unwinds, restarts) accumulate over the whole search; shape
//! counters describe the last completed sweep.

use crate::geometry::row::bridged_cells;
use crate::geometry::RowBits;
use crate::matrices::SweepMatrices;
use crate::validation::RowRejection;
use std::fmt;
use strum::EnumCount;

/// Callbacks from a running sampler. Every method defaults to doing nothing.
pub trait SweepObserver {
    fn row_committed(&mut self, _row: usize, _inflow: RowBits, _outflow: RowBits) {}
    fn row_rejected(&mut self, _row: usize, _rejection: &RowRejection) {}
    fn row_unwound(&mut self, _row: usize) {}
    fn sweep_restarted(&mut self, _attempt: usize) {}
    /// `entry` is the pattern entering row 0 from below.
    fn sweep_completed(&mut self, _matrices: &SweepMatrices, _entry: RowBits) {}
}

/// Observer that records nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoMetrics;

impl SweepObserver for NoMetrics {}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SweepingMetrics {
    pub rows_committed: u64,
    pub rejections: [u64; RowRejection::COUNT],
    pub unwinds: u64,
    pub restarts: u64,

    pub visited_cells: usize,
    /// Cells entered vertically and left horizontally, or the reverse.
    pub turns: usize,
    /// Cells passed straight through vertically.
    pub vertical_straights: usize,
    /// Cells passed straight through horizontally.
    pub horizontal_straights: usize,
    pub horizontal_runs: usize,
    pub longest_run: usize,
}

impl SweepingMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn total_rejections(&self) -> u64 {
        self.rejections.iter().sum()
    }

    fn measure(&mut self, matrices: &SweepMatrices, entry: RowBits) {
        self.visited_cells = 0;
        self.turns = 0;
        self.vertical_straights = 0;
        self.horizontal_straights = 0;
        self.horizontal_runs = 0;
        self.longest_run = 0;

        let mut inflow = entry;
        for (&outflow, &horizontal) in matrices.vertical.iter().zip(&matrices.horizontal) {
            let visited = (inflow | outflow | bridged_cells(horizontal)).count_ones() as usize;
            let turns = (inflow ^ outflow).count_ones() as usize;
            let straights = (inflow & outflow).count_ones() as usize;
            self.visited_cells += visited;
            self.turns += turns;
            self.vertical_straights += straights;
            self.horizontal_straights += visited - turns - straights;
            self.horizontal_runs += (horizontal & !(horizontal << 1)).count_ones() as usize;
            self.longest_run = self.longest_run.max(longest_run(horizontal));
            inflow = outflow;
        }
    }
}

fn longest_run(mut bits: RowBits) -> usize {
    let mut longest = 0;
    while bits != 0 {
        bits &= bits << 1;
        longest += 1;
    }
    longest
}

impl SweepObserver for SweepingMetrics {
    fn row_committed(&mut self, _row: usize, _inflow: RowBits, _outflow: RowBits) {
        self.rows_committed += 1;
    }

    fn row_rejected(&mut self, _row: usize, rejection: &RowRejection) {
        self.rejections[rejection.index()] += 1;
    }

    fn row_unwound(&mut self, _row: usize) {
        self.unwinds += 1;
    }

    fn sweep_restarted(&mut self, _attempt: usize) {
        self.restarts += 1;
    }

    fn sweep_completed(&mut self, matrices: &SweepMatrices, entry: RowBits) {
        self.measure(matrices, entry);
    }
}

impl fmt::Display for SweepingMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "cells {} | turns {} | straight {} vertical, {} horizontal | runs {} (longest {})",
            self.visited_cells,
            self.turns,
            self.vertical_straights,
            self.horizontal_straights,
            self.horizontal_runs,
            self.longest_run
        )?;
        write!(
            f,
            "rows committed {} | rejections {} | unwinds {} | restarts {}",
            self.rows_committed,
            self.total_rejections(),
            self.unwinds,
            self.restarts
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_counts() {
        let matrices = SweepMatrices {
            width: 3,
            vertical: vec![0b001, 0b100],
            horizontal: vec![0b000, 0b011],
        };
        let mut metrics = SweepingMetrics::new();
        metrics.sweep_completed(&matrices, 0b001);
        assert_eq!(metrics.visited_cells, 4);
        assert_eq!(metrics.turns, 2);
        assert_eq!(metrics.vertical_straights, 1);
        assert_eq!(metrics.horizontal_straights, 1);
        assert_eq!(metrics.horizontal_runs, 1);
        assert_eq!(metrics.longest_run, 2);
    }

    #[test]
    fn test_effort_counts() {
        let mut metrics = SweepingMetrics::new();
        metrics.row_committed(0, 0b1, 0b1);
        metrics.row_rejected(1, &RowRejection::UnpairedEndpoint { column: 2 });
        metrics.row_unwound(1);
        metrics.sweep_restarted(1);
        assert_eq!(metrics.rows_committed, 1);
        assert_eq!(metrics.total_rejections(), 1);
        assert_eq!(metrics.unwinds, 1);
        assert_eq!(metrics.restarts, 1);
    }

    #[test]
    fn test_longest_run() {
        assert_eq!(longest_run(0), 0);
        assert_eq!(longest_run(0b1011_1001), 3);
    }
}
