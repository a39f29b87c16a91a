// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! The finished sweep: one vertical and one horizontal pattern per row.
//!
//! `vertical[r]` holds the passages from row `r` up to row `r + 1`; the last
//! entry is the exit through the top boundary. `horizontal[r]` holds the
//! passages between column `c` and `c + 1` of row `r`. Consumers replay the
//! matrices through [`Carver`], one call per interior passage.

use crate::geometry::row::{self, bridged_cells, is_set};
use crate::geometry::RowBits;
use std::fmt;

/// A grid cell, row 0 at the bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Cell {
    pub row: usize,
    pub column: usize,
}

impl Cell {
    pub fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }
}

/// Receiver of carved passages between adjacent cells.
pub trait Carver {
    fn carve(&mut self, from: Cell, to: Cell);
}

impl<F: FnMut(Cell, Cell)> Carver for F {
    fn carve(&mut self, from: Cell, to: Cell) {
        self(from, to)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SweepMatrices {
    pub width: usize,
    pub vertical: Vec<RowBits>,
    pub horizontal: Vec<RowBits>,
}

impl SweepMatrices {
    pub fn height(&self) -> usize {
        self.vertical.len()
    }

    /// Pattern leaving the grid through the top boundary.
    pub fn exit(&self) -> RowBits {
        self.vertical.last().copied().unwrap_or(0)
    }

    /// Replay every interior passage: horizontal ones left to right, then the
    /// vertical ones to the next row, row by row from the bottom.
    pub fn carve(&self, carver: &mut impl Carver) {
        let height = self.height();
        for r in 0..height {
            for c in row::positions(self.horizontal[r]) {
                carver.carve(Cell::new(r, c), Cell::new(r, c + 1));
            }
            if r + 1 < height {
                for c in row::positions(self.vertical[r]) {
                    carver.carve(Cell::new(r, c), Cell::new(r + 1, c));
                }
            }
        }
    }

    /// Cells touched by row `r`'s passages.
    pub fn visited(&self, r: usize) -> RowBits {
        let below = if r > 0 { self.vertical[r - 1] } else { 0 };
        self.vertical[r] | below | bridged_cells(self.horizontal[r])
    }

    pub fn visited_cells(&self) -> usize {
        (0..self.height())
            .map(|r| self.visited(r).count_ones() as usize)
            .sum()
    }

    /// Interior passages, the number of times `carve` calls the carver.
    pub fn passage_count(&self) -> usize {
        let horizontal: u32 = self.horizontal.iter().map(|h| h.count_ones()).sum();
        let vertical: u32 = self
            .vertical
            .iter()
            .take(self.height().saturating_sub(1))
            .map(|v| v.count_ones())
            .sum();
        (horizontal + vertical) as usize
    }
}

/// Top row first: `o` marks a visited cell, `-` and `|` the passages.
impl fmt::Display for SweepMatrices {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let vertical_line = |bits: RowBits| -> String {
            (0..self.width)
                .map(|c| if is_set(bits, c) { "|" } else { " " })
                .collect::<Vec<_>>()
                .join(" ")
        };
        for r in (0..self.height()).rev() {
            writeln!(f, "{}", vertical_line(self.vertical[r]).trim_end())?;
            let visited = self.visited(r);
            let mut line = String::new();
            for c in 0..self.width {
                line.push(if is_set(visited, c) { 'o' } else { '.' });
                if c + 1 < self.width {
                    line.push(if is_set(self.horizontal[r], c) { '-' } else { ' ' });
                }
            }
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}
