// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Exit directions of an inflow strand within its row.
//!
//! Every strand entering a row from below leaves its cell in exactly one way:
//!
//! - `Up`: straight through, the cell carries an outflow bit as well;
//! - `Left` / `Right`: a horizontal segment to a free cell that carries an
//!   outflow bit;
//! - `DeadGoesRight` / `DeadGoesLeft`: the strand is joined with the adjacent
//!   inflow to its right / left and ends inside this row.
//!
//! [`OutflowState`] is the committed choice for one inflow. [`OutflowStateSet`]
//! is the candidate set computed before merges are decided; the two are kept
//! as distinct types.
//!
//! # Examples
//!
//! ```
//! use sweep_loops::geometry::{OutflowState, OutflowStateSet};
//!
//! let mut set = OutflowStateSet::empty();
//! set.insert(OutflowState::Up);
//! set.insert(OutflowState::Left);
//!
//! assert_eq!(set.len(), 2);
//! assert_eq!(format!("{}", set), "|LU|");
//! ```

use std::fmt;
use strum_macros::{EnumCount as EnumCountMacro, EnumIter};

/// Committed exit direction of one inflow strand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumCountMacro, EnumIter)]
#[repr(u8)]
pub enum OutflowState {
    Left,
    Right,
    Up,
    DeadGoesLeft,
    DeadGoesRight,
}

impl OutflowState {
    /// Whether a horizontal segment leaves this cell toward higher columns.
    ///
    /// Spans to the right of such a cell start with an open segment.
    pub fn opens_rightward(self) -> bool {
        matches!(self, OutflowState::Right | OutflowState::DeadGoesRight)
    }

    /// Whether this cell expects a horizontal segment arriving from lower columns.
    pub fn expects_from_left(self) -> bool {
        matches!(self, OutflowState::Left | OutflowState::DeadGoesLeft)
    }

    /// Whether the strand ends in this row by merging with a neighbour.
    pub fn is_dead(self) -> bool {
        matches!(self, OutflowState::DeadGoesLeft | OutflowState::DeadGoesRight)
    }

    /// One-letter label used in debug output.
    pub fn to_char(self) -> char {
        match self {
            OutflowState::Left => 'L',
            OutflowState::Right => 'R',
            OutflowState::Up => 'U',
            OutflowState::DeadGoesLeft => 'l',
            OutflowState::DeadGoesRight => 'r',
        }
    }
}

impl fmt::Display for OutflowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

/// A set of candidate exit directions, stored as a bitset.
///
/// Bit `s as u8` is set if state `s` is permitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct OutflowStateSet(u8);

impl OutflowStateSet {
    const ORDER: [OutflowState; 5] = [
        OutflowState::Left,
        OutflowState::Right,
        OutflowState::Up,
        OutflowState::DeadGoesLeft,
        OutflowState::DeadGoesRight,
    ];

    /// Create an empty set.
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Create a set from a slice of states.
    pub fn from_states(states: &[OutflowState]) -> Self {
        let mut set = Self::empty();
        for &state in states {
            set.insert(state);
        }
        set
    }

    pub fn contains(self, state: OutflowState) -> bool {
        (self.0 >> state as u8) & 1 != 0
    }

    pub fn insert(&mut self, state: OutflowState) {
        self.0 |= 1 << state as u8;
    }

    pub fn remove(&mut self, state: OutflowState) {
        self.0 &= !(1 << state as u8);
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn bits(self) -> u8 {
        self.0
    }

    /// Iterate the states in declaration order.
    pub fn iter(self) -> impl Iterator<Item = OutflowState> {
        Self::ORDER
            .into_iter()
            .filter(move |&state| self.contains(state))
    }
}

impl fmt::Display for OutflowStateSet {
    /// Format a state set as "|LRU|".
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "|")?;
        for state in self.iter() {
            write!(f, "{}", state)?;
        }
        write!(f, "|")
    }
}

impl From<&[OutflowState]> for OutflowStateSet {
    fn from(states: &[OutflowState]) -> Self {
        Self::from_states(states)
    }
}
