// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Row patterns of a given population-count parity.
//!
//! # Generation Order
//!
//! Patterns are produced recursively:
//! 1. Widths below 4 come from hard-coded base tables.
//! 2. For a larger width W, the sequence is every (W-1)-bit pattern of the
//!    same parity with a leading 0, followed by every (W-1)-bit pattern of the
//!    opposite parity with a leading 1.
//!
//! Both [`all_with_parity`] (lazy, one pattern at a time) and
//! [`ParityTables`] (materialized, extended width by width) follow that order,
//! so the k-th lazy pattern is the k-th table entry.
//!
//! # Example
//!
//! For width 3 the odd patterns are `001, 010, 100, 111`:
//!
//! ```
//! use sweep_loops::geometry::Parity;
//! use sweep_loops::memo::parity::all_with_parity;
//!
//! let odd: Vec<u64> = all_with_parity(3, Parity::Odd).unwrap().collect();
//! assert_eq!(odd, vec![0b001, 0b010, 0b100, 0b111]);
//! ```

use crate::error::{Result, SweepError};
use crate::geometry::constants::{MAX_PARITY_WIDTH, MAX_ROW_WIDTH};
use crate::geometry::{Parity, RowBits};

const EVEN_BASE: [&[RowBits]; 4] = [&[0], &[0], &[0b00, 0b11], &[0b000, 0b011, 0b101, 0b110]];
const ODD_BASE: [&[RowBits]; 4] = [&[], &[0b1], &[0b01, 0b10], &[0b001, 0b010, 0b100, 0b111]];

fn base(width: usize, parity: Parity) -> &'static [RowBits] {
    match parity {
        Parity::Even => EVEN_BASE[width],
        Parity::Odd => ODD_BASE[width],
    }
}

/// Number of `width`-bit patterns with the given parity.
pub fn count_with_parity(width: usize, parity: Parity) -> u64 {
    match (width, parity) {
        (0, Parity::Even) => 1,
        (0, Parity::Odd) => 0,
        _ => 1 << (width - 1),
    }
}

/// Lazy sequence of all `width`-bit patterns with the requested parity.
///
/// The sequence is finite and restartable: clone it, or call
/// [`ParityPatterns::restart`].
pub fn all_with_parity(width: usize, parity: Parity) -> Result<ParityPatterns> {
    if width > MAX_ROW_WIDTH - 1 {
        return Err(SweepError::configuration(format!(
            "parity patterns of width {} exceed the {}-bit row word",
            width, MAX_ROW_WIDTH
        )));
    }
    Ok(ParityPatterns {
        width,
        parity,
        index: 0,
        len: count_with_parity(width, parity),
    })
}

/// Iterator returned by [`all_with_parity`].
#[derive(Debug, Clone)]
pub struct ParityPatterns {
    width: usize,
    parity: Parity,
    index: u64,
    len: u64,
}

impl ParityPatterns {
    /// Rewind to the first pattern.
    pub fn restart(&mut self) {
        self.index = 0;
    }

    /// The `index`-th pattern of the recursive order.
    fn nth_pattern(mut width: usize, mut parity: Parity, mut index: u64) -> RowBits {
        let mut prefix: RowBits = 0;
        while width >= 4 {
            let half = 1u64 << (width - 2);
            if index >= half {
                prefix |= 1 << (width - 1);
                parity = parity.flip();
                index -= half;
            }
            width -= 1;
        }
        prefix | base(width, parity)[index as usize]
    }
}

impl Iterator for ParityPatterns {
    type Item = RowBits;

    fn next(&mut self) -> Option<RowBits> {
        if self.index >= self.len {
            return None;
        }
        let pattern = Self::nth_pattern(self.width, self.parity, self.index);
        self.index += 1;
        Some(pattern)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.len - self.index) as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for ParityPatterns {}

/// Materialized parity tables, extended on demand.
///
/// `build_tables(w)` reuses every table already built for smaller widths, so a
/// sequence of growing requests costs no more than the largest one.
#[derive(Debug, Clone)]
pub struct ParityTables {
    even: Vec<Vec<RowBits>>,
    odd: Vec<Vec<RowBits>>,
}

impl ParityTables {
    /// Tables holding the hard-coded base widths 0..4.
    pub fn new() -> Self {
        Self {
            even: EVEN_BASE.iter().map(|t| t.to_vec()).collect(),
            odd: ODD_BASE.iter().map(|t| t.to_vec()).collect(),
        }
    }

    /// Widest width materialized so far.
    pub fn built_width(&self) -> usize {
        self.even.len() - 1
    }

    /// Extend the cached tables up to `width`.
    pub fn build_tables(&mut self, width: usize) -> Result<()> {
        if width > MAX_PARITY_WIDTH {
            return Err(SweepError::configuration(format!(
                "parity tables are materialized up to width {}, requested {}",
                MAX_PARITY_WIDTH, width
            )));
        }
        while self.built_width() < width {
            let next = self.built_width() + 1;
            let lead: RowBits = 1 << (next - 1);
            let smaller_even = &self.even[next - 1];
            let smaller_odd = &self.odd[next - 1];

            let even: Vec<RowBits> = smaller_even
                .iter()
                .copied()
                .chain(smaller_odd.iter().map(|&p| p | lead))
                .collect();
            let odd: Vec<RowBits> = smaller_odd
                .iter()
                .copied()
                .chain(smaller_even.iter().map(|&p| p | lead))
                .collect();

            self.even.push(even);
            self.odd.push(odd);
        }
        Ok(())
    }

    /// Patterns of `width` with `parity`, building missing tables first.
    pub fn patterns(&mut self, width: usize, parity: Parity) -> Result<&[RowBits]> {
        self.build_tables(width)?;
        Ok(self.get(width, parity).unwrap_or(&[]))
    }

    /// Patterns of an already built width.
    pub fn get(&self, width: usize, parity: Parity) -> Option<&[RowBits]> {
        let tables = match parity {
            Parity::Even => &self.even,
            Parity::Odd => &self.odd,
        };
        tables.get(width).map(|t| t.as_slice())
    }
}

impl Default for ParityTables {
    fn default() -> Self {
        Self::new()
    }
}
