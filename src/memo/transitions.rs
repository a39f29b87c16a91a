// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Row transition tables.
//!
//! A transition table maps every inflow row of one width and parity to the
//! sorted set of outflow rows that can follow it. Entries do not depend on
//! component labels: merges of adjacent inflows are always offered and the
//! component validator rejects the ones that would close a loop.
//!
//! # Construction
//!
//! For each inflow:
//! 1. Decompose the pattern into inflow columns.
//! 2. Enumerate exit-state assignments ([`crate::memo::outflows`]).
//! 3. For each assignment, walk the spans between consecutive fixed positions
//!    (grid edges included) depth-first with an explicit stack of
//!    `(span, partial row)` frames, solving each span with
//!    [`crate::memo::spans`].
//! 4. Drop candidates rejected by the optional [`RowConstraint`], then sort
//!    and deduplicate.
//!
//! Entries are independent, so they are computed in parallel into disjoint
//! slots of the entry array.

use crate::error::{Result, SweepError};
use crate::geometry::constants::MAX_TABLE_WIDTH;
use crate::geometry::row::{self, bit};
use crate::geometry::{OutflowState, Parity, RowBits};
use crate::memo::outflows::outflow_assignments;
use crate::memo::parity::count_with_parity;
use crate::memo::spans::{SpanEnd, SpanSolver};
use log::{debug, info};
use rayon::prelude::*;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;

type RowPredicate = dyn Fn(RowBits) -> bool + Send + Sync;

/// A global predicate on candidate outflow rows, applied while tables are built.
///
/// The `id` distinguishes cached tables built with different predicates, so it
/// must change whenever the predicate's behaviour does.
#[derive(Clone)]
pub struct RowConstraint {
    id: String,
    predicate: Arc<RowPredicate>,
}

impl RowConstraint {
    pub fn new(
        id: impl Into<String>,
        predicate: impl Fn(RowBits) -> bool + Send + Sync + 'static,
    ) -> Self {
        Self {
            id: id.into(),
            predicate: Arc::new(predicate),
        }
    }

    /// Forbid single-bit corridors directly beside any of `columns`.
    ///
    /// A row whose only vertical passage sits next to a declared endpoint
    /// column is rejected.
    pub fn no_corridor_beside(columns: &[usize]) -> Self {
        let mut blocked: RowBits = 0;
        for &column in columns {
            if column > 0 {
                blocked |= bit(column - 1);
            }
            if column + 1 < RowBits::BITS as usize {
                blocked |= bit(column + 1);
            }
        }
        let id = format!(
            "no-corridor-beside:{}",
            columns.iter().map(|c| c.to_string()).collect::<Vec<_>>().join(",")
        );
        Self::new(id, move |row| !(row.count_ones() == 1 && row & blocked != 0))
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Whether `row` may appear as an outflow.
    pub fn allows(&self, row: RowBits) -> bool {
        (self.predicate)(row)
    }
}

impl fmt::Debug for RowConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RowConstraint").field("id", &self.id).finish()
    }
}

/// Valid outflow rows for every inflow row of one width and parity.
#[derive(Debug, Clone)]
pub struct TransitionTable {
    width: usize,
    parity: Parity,
    constraint: Option<String>,
    /// Indexed by inflow pattern; empty for patterns of the other parity.
    entries: Vec<Box<[RowBits]>>,
}

impl TransitionTable {
    /// Build the table for `width` and `parity`.
    pub fn build(width: usize, parity: Parity, constraint: Option<&RowConstraint>) -> Result<Self> {
        if width == 0 || width > MAX_TABLE_WIDTH {
            return Err(SweepError::configuration(format!(
                "transition tables support widths 1..={}, requested {}",
                MAX_TABLE_WIDTH, width
            )));
        }

        let started = Instant::now();
        let builder = EntryBuilder {
            width,
            spans: SpanSolver::new(width)?,
            constraint,
        };

        let mut entries: Vec<Box<[RowBits]>> = vec![Box::default(); 1 << width];
        entries
            .par_iter_mut()
            .enumerate()
            .filter(|(inflow, _)| parity.matches(*inflow as RowBits))
            .for_each(|(inflow, slot)| *slot = builder.entry(inflow as RowBits));

        let table = Self {
            width,
            parity,
            constraint: constraint.map(|c| c.id().to_string()),
            entries,
        };
        info!(
            "[TransitionTable] width {} {}: {} inflows, {} transitions in {:?}",
            width,
            parity,
            table.len(),
            table.transition_count(),
            started.elapsed()
        );
        Ok(table)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn parity(&self) -> Parity {
        self.parity
    }

    /// Identifier of the constraint the table was built with.
    pub fn constraint_id(&self) -> Option<&str> {
        self.constraint.as_deref()
    }

    /// Number of inflow rows (patterns of the table's parity).
    pub fn len(&self) -> usize {
        count_with_parity(self.width, self.parity) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total number of (inflow, outflow) pairs.
    pub fn transition_count(&self) -> usize {
        self.entries.iter().map(|e| e.len()).sum()
    }

    /// Valid outflows for `inflow`, sorted ascending.
    pub fn outflows(&self, inflow: RowBits) -> Result<&[RowBits]> {
        if inflow & !row::mask(self.width) != 0 {
            return Err(SweepError::configuration(format!(
                "inflow {:#b} does not fit a width-{} table",
                inflow, self.width
            )));
        }
        if !self.parity.matches(inflow) {
            return Err(SweepError::configuration(format!(
                "inflow {:#b} is not {} as the table requires",
                inflow, self.parity
            )));
        }
        Ok(&self.entries[inflow as usize])
    }

    /// Whether `outflow` may follow `inflow`.
    pub fn contains(&self, inflow: RowBits, outflow: RowBits) -> bool {
        self.outflows(inflow)
            .map(|entry| entry.binary_search(&outflow).is_ok())
            .unwrap_or(false)
    }

    /// Every inflow row with its outflows, in ascending inflow order.
    pub fn iter(&self) -> impl Iterator<Item = (RowBits, &[RowBits])> + '_ {
        self.entries
            .iter()
            .enumerate()
            .filter(move |(inflow, _)| self.parity.matches(*inflow as RowBits))
            .map(|(inflow, entry)| (inflow as RowBits, &entry[..]))
    }
}

/// Shared, read-only state of one table build.
struct EntryBuilder<'a> {
    width: usize,
    spans: SpanSolver,
    constraint: Option<&'a RowConstraint>,
}

impl EntryBuilder<'_> {
    fn entry(&self, inflow: RowBits) -> Box<[RowBits]> {
        let positions: Vec<usize> = row::positions(inflow).collect();
        let mut outflows = Vec::new();
        let mut assignments = 0usize;

        for assignment in outflow_assignments(&positions, self.width, None) {
            assignments += 1;
            self.expand(&positions, &assignment, &mut outflows);
        }

        outflows.sort_unstable();
        outflows.dedup();
        if let Some(constraint) = self.constraint {
            outflows.retain(|&row| constraint.allows(row));
        }
        debug!(
            "[TransitionTable] inflow {} -> {} outflows from {} assignments",
            row::format_row(inflow, self.width),
            outflows.len(),
            assignments
        );
        outflows.into_boxed_slice()
    }

    /// Depth-first concatenation of span solutions for one assignment.
    fn expand(&self, positions: &[usize], assignment: &[OutflowState], out: &mut Vec<RowBits>) {
        let spans = positions.len() + 1;
        let mut stack: Vec<(usize, RowBits)> = vec![(0, 0)];

        while let Some((span, partial)) = stack.pop() {
            if span == spans {
                out.push(partial);
                continue;
            }
            let start = if span == 0 { 0 } else { positions[span - 1] + 1 };
            let end = positions.get(span).copied().unwrap_or(self.width);
            let left = if span == 0 {
                SpanEnd::Edge
            } else {
                SpanEnd::Inflow(assignment[span - 1])
            };
            let right = match assignment.get(span) {
                Some(&state) => SpanEnd::Inflow(state),
                None => SpanEnd::Edge,
            };

            for pattern in self.spans.solve(end - start, left, right) {
                stack.push((span + 1, partial | (pattern << start)));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_width_one() {
        let odd = TransitionTable::build(1, Parity::Odd, None).unwrap();
        assert_eq!(odd.outflows(1).unwrap(), &[1]);

        let even = TransitionTable::build(1, Parity::Even, None).unwrap();
        assert_eq!(even.outflows(0).unwrap(), &[0]);
    }

    #[test]
    fn test_width_two_odd() {
        let table = TransitionTable::build(2, Parity::Odd, None).unwrap();
        // A single strand can go straight up or step sideways.
        assert_eq!(table.outflows(0b01).unwrap(), &[0b01, 0b10]);
        assert_eq!(table.outflows(0b10).unwrap(), &[0b01, 0b10]);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_width_three_even() {
        let table = TransitionTable::build(3, Parity::Even, None).unwrap();
        // Nothing below: open a cap on any two columns, or stay empty.
        assert_eq!(table.outflows(0b000).unwrap(), &[0b000, 0b011, 0b101, 0b110]);
        // Two strands at the edges: straight up, sideways into the middle, or merged.
        let entry = table.outflows(0b101).unwrap();
        assert!(entry.contains(&0b101));
        assert!(entry.contains(&0b011));
        assert!(entry.contains(&0b110));
        assert!(entry.contains(&0b000));
    }

    #[test]
    fn test_query_errors() {
        let table = TransitionTable::build(3, Parity::Odd, None).unwrap();
        assert!(matches!(table.outflows(0b011), Err(SweepError::Configuration(_))));
        assert!(matches!(table.outflows(0b1000), Err(SweepError::Configuration(_))));
        assert!(!table.contains(0b011, 0b001));
    }

    #[test]
    fn test_width_ceiling() {
        assert!(TransitionTable::build(MAX_TABLE_WIDTH + 1, Parity::Odd, None).is_err());
        assert!(TransitionTable::build(0, Parity::Odd, None).is_err());
    }

    #[test]
    fn test_outflows_keep_parity() {
        let table = TransitionTable::build(6, Parity::Odd, None).unwrap();
        for (inflow, outflows) in table.iter() {
            assert!(Parity::Odd.matches(inflow));
            assert!(!outflows.is_empty());
            assert!(outflows.windows(2).all(|w| w[0] < w[1]));
            assert!(outflows.iter().all(|&o| Parity::Odd.matches(o) && o < 1 << 6));
        }
        assert_eq!(table.iter().count(), 32);
    }

    #[test]
    fn test_constraint_prunes_rows() {
        let constraint = RowConstraint::no_corridor_beside(&[0]);
        let table = TransitionTable::build(4, Parity::Odd, Some(&constraint)).unwrap();
        assert_eq!(table.constraint_id(), Some("no-corridor-beside:0"));
        for (_, outflows) in table.iter() {
            assert!(!outflows.contains(&0b0010));
        }
        let plain = TransitionTable::build(4, Parity::Odd, None).unwrap();
        assert!(plain.contains(0b0001, 0b0010));
        assert!(!table.contains(0b0001, 0b0010));
    }
}
