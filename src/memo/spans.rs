// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Outflow patterns for the free cells between two fixed positions.
//!
//! A span is the run of cells strictly between two consecutive fixed positions
//! of a row: inflow columns or the grid edges. Scanning a span left to right, a
//! horizontal segment is open or closed; every outflow bit on a free cell is a
//! segment end and toggles it. So the outflow bits of a span are constrained
//! only by their count's parity:
//!
//! | left end             | right goes Right / edge | right goes Up        | right goes Left / dead |
//! |----------------------|-------------------------|----------------------|------------------------|
//! | Right, DeadGoesRight | odd                     | 1-prefixed even      | even                   |
//! | Left, Up, dead, edge | even                    | 1-prefixed odd       | odd                    |
//!
//! When the right end is an inflow, the pattern carries one extra most
//! significant bit for that inflow's own cell: set exactly when it goes Up.
//! A merge (DeadGoesRight followed by DeadGoesLeft) is only consistent with
//! itself; mixing a dead end with a live one yields nothing.

use crate::error::Result;
use crate::geometry::{OutflowState, Parity, RowBits};
use crate::memo::parity::{all_with_parity, ParityTables};

/// What bounds a span on one side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpanEnd {
    /// The grid edge; behaves like a closed segment.
    Edge,
    /// An inflow cell with its chosen exit.
    Inflow(OutflowState),
}

impl SpanEnd {
    fn opens_rightward(self) -> bool {
        matches!(self, SpanEnd::Inflow(state) if state.opens_rightward())
    }

    fn is_dead_right(self) -> bool {
        self == SpanEnd::Inflow(OutflowState::DeadGoesRight)
    }
}

/// Parity of the free bits and the prefix bit a span requires,
/// or `None` when the two ends cannot be combined.
fn span_rule(length: usize, left: SpanEnd, right: SpanEnd) -> Option<(Parity, RowBits)> {
    let dead_left = left.is_dead_right();
    let dead_right = right == SpanEnd::Inflow(OutflowState::DeadGoesLeft);
    if dead_left != dead_right {
        return None;
    }

    let arrives_open = match right {
        SpanEnd::Edge => false,
        SpanEnd::Inflow(state) => state.expects_from_left(),
    };
    // Each free bit toggles the segment; the count must carry the left
    // state to the right one.
    let free = if left.opens_rightward() == arrives_open {
        Parity::Even
    } else {
        Parity::Odd
    };
    let prefix = match right {
        SpanEnd::Inflow(OutflowState::Up) => 1 << length,
        _ => 0,
    };
    Some((free, prefix))
}

/// Every pattern consistent with a span of `length` free cells.
///
/// Stateless; allocates. The table builder uses [`SpanSolver`] instead.
pub fn solve_span(length: usize, left: SpanEnd, right: SpanEnd) -> Result<Vec<RowBits>> {
    match span_rule(length, left, right) {
        None => Ok(Vec::new()),
        Some((parity, prefix)) => Ok(all_with_parity(length, parity)?
            .map(|p| p | prefix)
            .collect()),
    }
}

/// Span solutions backed by materialized parity tables.
#[derive(Debug, Clone)]
pub struct SpanSolver {
    tables: ParityTables,
}

impl SpanSolver {
    /// Solver for spans of up to `width` cells.
    pub fn new(width: usize) -> Result<Self> {
        let mut tables = ParityTables::new();
        tables.build_tables(width)?;
        Ok(Self { tables })
    }

    /// Iterate the patterns of one span; empty when the ends are incompatible.
    pub fn solve(
        &self,
        length: usize,
        left: SpanEnd,
        right: SpanEnd,
    ) -> impl Iterator<Item = RowBits> + '_ {
        let (patterns, prefix): (&[RowBits], RowBits) = match span_rule(length, left, right) {
            Some((parity, prefix)) => (self.tables.get(length, parity).unwrap_or(&[]), prefix),
            None => (&[], 0),
        };
        patterns.iter().map(move |&p| p | prefix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::OutflowState::*;
    use std::collections::BTreeSet;

    const ENDS: [SpanEnd; 6] = [
        SpanEnd::Edge,
        SpanEnd::Inflow(Left),
        SpanEnd::Inflow(Right),
        SpanEnd::Inflow(Up),
        SpanEnd::Inflow(DeadGoesLeft),
        SpanEnd::Inflow(DeadGoesRight),
    ];

    /// Walk the cells and check that every segment is consistent.
    fn brute_force(length: usize, left: SpanEnd, right: SpanEnd) -> BTreeSet<RowBits> {
        let mut result = BTreeSet::new();
        let dead = left == SpanEnd::Inflow(DeadGoesRight);
        if dead != (right == SpanEnd::Inflow(DeadGoesLeft)) {
            return result;
        }
        for free in 0..(1u64 << length) {
            let mut open = left.opens_rightward();
            for column in 0..length {
                if (free >> column) & 1 == 1 {
                    open = !open;
                }
            }
            let wanted = matches!(right, SpanEnd::Inflow(Left) | SpanEnd::Inflow(DeadGoesLeft));
            if open != wanted {
                continue;
            }
            let up = if right == SpanEnd::Inflow(Up) { 1 << length } else { 0 };
            result.insert(free | up);
        }
        result
    }

    #[test]
    fn test_matches_segment_walk_for_small_spans() {
        let solver = SpanSolver::new(8).unwrap();
        for length in 0..=7 {
            for &left in &ENDS {
                for &right in &ENDS {
                    let expected = brute_force(length, left, right);
                    let stateless: BTreeSet<_> =
                        solve_span(length, left, right).unwrap().into_iter().collect();
                    let memoized: BTreeSet<_> = solver.solve(length, left, right).collect();
                    assert_eq!(stateless, expected, "{} {:?} {:?}", length, left, right);
                    assert_eq!(memoized, expected, "{} {:?} {:?}", length, left, right);
                }
            }
        }
    }

    #[test]
    fn test_zero_length_is_single_bit_check() {
        // Directly adjacent inflows: only Up needs a bit, only closed ends fit.
        assert_eq!(solve_span(0, SpanEnd::Edge, SpanEnd::Inflow(Up)).unwrap(), vec![1]);
        assert!(solve_span(0, SpanEnd::Edge, SpanEnd::Inflow(Left)).unwrap().is_empty());
        assert_eq!(solve_span(0, SpanEnd::Inflow(Up), SpanEnd::Inflow(Right)).unwrap(), vec![0]);
        assert_eq!(
            solve_span(0, SpanEnd::Inflow(DeadGoesRight), SpanEnd::Inflow(DeadGoesLeft)).unwrap(),
            vec![0]
        );
    }

    #[test]
    fn test_rightward_left_end() {
        // Open on the left, closed on the right: an odd number of ends.
        let odd = solve_span(3, SpanEnd::Inflow(Right), SpanEnd::Inflow(Right)).unwrap();
        assert!(odd.iter().all(|p| p.count_ones() % 2 == 1));
        assert_eq!(odd.len(), 4);

        // Right goes up: a 1-prefixed even pattern.
        let up = solve_span(3, SpanEnd::Inflow(Right), SpanEnd::Inflow(Up)).unwrap();
        assert!(up.iter().all(|p| p & 0b1000 != 0 && p.count_ones() % 2 == 0));
    }

    #[test]
    fn test_dead_ends_only_pair_with_each_other() {
        assert!(solve_span(2, SpanEnd::Inflow(DeadGoesRight), SpanEnd::Inflow(Left))
            .unwrap()
            .is_empty());
        assert!(solve_span(2, SpanEnd::Inflow(Up), SpanEnd::Inflow(DeadGoesLeft))
            .unwrap()
            .is_empty());
    }
}
