// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Permitted exit directions for the inflows of one row.
//!
//! # Rules
//!
//! For inflow columns `p[0] < p[1] < ... < p[k-1]` in a row of `width` cells:
//! - `Up` is always permitted;
//! - `Left` needs a free cell between the previous inflow (or the left edge)
//!   and this one;
//! - `Right` needs a free cell between this inflow and the next one (or the
//!   right edge);
//! - two inflows exactly two columns apart share a single free cell, so they
//!   cannot take (Right, Left) together;
//! - adjacent inflows in different components may be merged, replacing their
//!   states with (DeadGoesRight, DeadGoesLeft). Every subset of
//!   non-overlapping adjacent-pair merges is enumerated.
//!
//! The assignments are the search space that [`crate::memo::spans`] filters.

use crate::geometry::{ComponentId, OutflowState, OutflowStateSet, NO_COMPONENT};

/// Per-inflow candidate sets, before merges are considered.
pub fn outflow_state_sets(positions: &[usize], width: usize) -> Vec<OutflowStateSet> {
    positions
        .iter()
        .enumerate()
        .map(|(i, &column)| {
            let previous = if i == 0 { -1 } else { positions[i - 1] as isize };
            let next = positions.get(i + 1).copied().unwrap_or(width) as isize;
            let column = column as isize;

            let mut set = OutflowStateSet::empty();
            if column - previous >= 2 {
                set.insert(OutflowState::Left);
            }
            if next - column >= 2 {
                set.insert(OutflowState::Right);
            }
            set.insert(OutflowState::Up);
            set
        })
        .collect()
}

/// Lazily enumerate every per-inflow assignment.
///
/// `components` is the component row (indexed by column). When it is given,
/// only inflows with different components may merge; without it every adjacent
/// pair may merge, which is what the component-independent transition tables
/// need.
pub fn outflow_assignments<'a>(
    positions: &'a [usize],
    width: usize,
    components: Option<&'a [ComponentId]>,
) -> OutflowAssignments<'a> {
    let sets = outflow_state_sets(positions, width);
    let mergeable = (0..positions.len())
        .map(|i| {
            let Some(&next) = positions.get(i + 1) else {
                return false;
            };
            match components {
                None => true,
                Some(row) => {
                    let (a, b) = (row[positions[i]], row[next]);
                    a != NO_COMPONENT && b != NO_COMPONENT && a != b
                }
            }
        })
        .collect();

    OutflowAssignments {
        positions,
        sets,
        mergeable,
        stack: Vec::with_capacity(positions.len()),
        current: Vec::with_capacity(positions.len()),
        started: false,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Single(OutflowState),
    Merge,
}

/// One decision point: the inflow being assigned and the steps left to try.
#[derive(Debug)]
struct Frame {
    index: usize,
    steps: Vec<Step>,
    next: usize,
}

/// Iterator returned by [`outflow_assignments`].
#[derive(Debug)]
pub struct OutflowAssignments<'a> {
    positions: &'a [usize],
    sets: Vec<OutflowStateSet>,
    mergeable: Vec<bool>,
    stack: Vec<Frame>,
    current: Vec<OutflowState>,
    started: bool,
}

impl OutflowAssignments<'_> {
    fn steps_at(&self, index: usize) -> Vec<Step> {
        let squeezed = index > 0
            && self.current[index - 1] == OutflowState::Right
            && self.positions[index] - self.positions[index - 1] == 2;

        let mut steps: Vec<Step> = self.sets[index]
            .iter()
            .filter(|&state| !(squeezed && state == OutflowState::Left))
            .map(Step::Single)
            .collect();
        if self.mergeable[index] {
            steps.push(Step::Merge);
        }
        steps
    }
}

impl Iterator for OutflowAssignments<'_> {
    type Item = Vec<OutflowState>;

    fn next(&mut self) -> Option<Vec<OutflowState>> {
        if !self.started {
            self.started = true;
            if self.positions.is_empty() {
                return Some(Vec::new());
            }
            let steps = self.steps_at(0);
            self.stack.push(Frame {
                index: 0,
                steps,
                next: 0,
            });
        }

        loop {
            let frame = self.stack.last_mut()?;
            if frame.next >= frame.steps.len() {
                self.stack.pop();
                continue;
            }
            let step = frame.steps[frame.next];
            frame.next += 1;
            let index = frame.index;

            self.current.truncate(index);
            match step {
                Step::Single(state) => self.current.push(state),
                Step::Merge => {
                    self.current.push(OutflowState::DeadGoesRight);
                    self.current.push(OutflowState::DeadGoesLeft);
                }
            }

            let next_index = self.current.len();
            if next_index == self.positions.len() {
                return Some(self.current.clone());
            }
            let steps = self.steps_at(next_index);
            self.stack.push(Frame {
                index: next_index,
                steps,
                next: 0,
            });
        }
    }
}
