// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Row trail for backtracking sweeps.
//!
//! Each committed row pushes one [`RowFrame`]. Backtracking truncates the
//! trail to an earlier length, so restoring a partial sweep is a single
//! `truncate`. The trail length is the number of committed rows.

use crate::error::{Result, SweepError};
use crate::geometry::{ComponentId, RowBits, MAX_HEIGHT};
use crate::matrices::SweepMatrices;

/// One committed row: where its strands leave, its lateral passages, and the
/// component labels of the open ends above it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowFrame {
    pub outflow: RowBits,
    pub horizontal: RowBits,
    pub components: Vec<ComponentId>,
}

#[derive(Debug, Default)]
pub struct Trail {
    frames: Vec<RowFrame>,
}

impl Trail {
    pub fn new() -> Self {
        Self { frames: Vec::new() }
    }

    /// Commit a row.
    pub fn push(&mut self, frame: RowFrame) -> Result<()> {
        if self.frames.len() >= MAX_HEIGHT {
            return Err(SweepError::invariant(format!(
                "trail overflow: exceeded {} rows",
                MAX_HEIGHT
            )));
        }
        self.frames.push(frame);
        Ok(())
    }

    /// Truncate to `len` committed rows.
    pub fn rewind_to(&mut self, len: usize) {
        self.frames.truncate(len);
    }

    /// Drop the last committed row. Returns false when the trail is empty.
    pub fn unwind(&mut self) -> bool {
        self.frames.pop().is_some()
    }

    pub fn clear(&mut self) {
        self.frames.clear();
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn last(&self) -> Option<&RowFrame> {
        self.frames.last()
    }

    /// The committed rows as output matrices.
    pub fn to_matrices(&self, width: usize) -> SweepMatrices {
        SweepMatrices {
            width,
            vertical: self.frames.iter().map(|f| f.outflow).collect(),
            horizontal: self.frames.iter().map(|f| f.horizontal).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(outflow: RowBits) -> RowFrame {
        RowFrame {
            outflow,
            horizontal: 0,
            components: vec![],
        }
    }

    #[test]
    fn test_trail_new() {
        let trail = Trail::new();
        assert_eq!(trail.len(), 0);
        assert!(trail.is_empty());
        assert!(trail.last().is_none());
    }

    #[test]
    fn test_rewind_to_and_unwind() {
        let mut trail = Trail::new();
        for outflow in 1..=5 {
            trail.push(frame(outflow)).unwrap();
        }
        trail.rewind_to(3);
        assert_eq!(trail.len(), 3);
        assert!(trail.unwind());
        assert_eq!(trail.to_matrices(3).vertical, vec![1, 2]);
        trail.clear();
        assert!(trail.is_empty());
        assert!(!trail.unwind());
    }

    #[test]
    fn test_overflow() {
        let mut trail = Trail::new();
        for _ in 0..MAX_HEIGHT {
            trail.push(frame(1)).unwrap();
        }
        assert!(matches!(
            trail.push(frame(1)),
            Err(SweepError::InvariantViolation(_))
        ));
        assert_eq!(trail.len(), MAX_HEIGHT);
    }

    #[test]
    fn test_to_matrices() {
        let mut trail = Trail::new();
        trail
            .push(RowFrame {
                outflow: 0b01,
                horizontal: 0,
                components: vec![-1, 0],
            })
            .unwrap();
        trail
            .push(RowFrame {
                outflow: 0b10,
                horizontal: 0b01,
                components: vec![0, -1],
            })
            .unwrap();
        let m = trail.to_matrices(2);
        assert_eq!(m.vertical, vec![0b01, 0b10]);
        assert_eq!(m.horizontal, vec![0, 0b01]);
    }
}
