// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Row bit-patterns and their parity.
//!
//! A row pattern is a `width`-bit word where bit `i` marks column `i`.
//! Vertical patterns mark passages leaving a row upward; horizontal patterns
//! mark passages between column `i` and column `i + 1`.
//!
//! # Examples
//!
//! ```
//! use sweep_loops::geometry::{row, Parity};
//!
//! assert_eq!(Parity::of(0b1011), Parity::Odd);
//! assert_eq!(row::positions(0b1010).collect::<Vec<_>>(), vec![1, 3]);
//! assert_eq!(row::format_row(0b0011, 4), "1100");
//! ```

use std::fmt;

/// A packed row of per-column bits.
pub type RowBits = u64;

/// Population-count parity of a row pattern.
///
/// Open paths cross every row boundary an odd number of times; closed loops
/// cross every row boundary an even number of times.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Parity {
    Even,
    Odd,
}

impl Parity {
    /// Parity of the population count of `bits`.
    pub fn of(bits: RowBits) -> Self {
        if bits.count_ones() % 2 == 0 {
            Parity::Even
        } else {
            Parity::Odd
        }
    }

    /// The other parity.
    pub fn flip(self) -> Self {
        match self {
            Parity::Even => Parity::Odd,
            Parity::Odd => Parity::Even,
        }
    }

    /// Parity after adding one more bit when `toggle` is set.
    pub fn toggled(self, toggle: bool) -> Self {
        if toggle {
            self.flip()
        } else {
            self
        }
    }

    /// Whether `bits` has this parity.
    pub fn matches(self, bits: RowBits) -> bool {
        Parity::of(bits) == self
    }
}

impl fmt::Display for Parity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Parity::Even => write!(f, "even"),
            Parity::Odd => write!(f, "odd"),
        }
    }
}

/// Mask with the low `width` bits set.
#[inline]
pub fn mask(width: usize) -> RowBits {
    if width >= RowBits::BITS as usize {
        RowBits::MAX
    } else {
        (1 << width) - 1
    }
}

/// Whether column `column` is set in `bits`.
#[inline]
pub fn is_set(bits: RowBits, column: usize) -> bool {
    column < RowBits::BITS as usize && (bits >> column) & 1 != 0
}

/// Single-bit pattern for `column`.
#[inline]
pub fn bit(column: usize) -> RowBits {
    1 << column
}

/// Iterate the set columns of `bits` in ascending order.
pub fn positions(bits: RowBits) -> impl Iterator<Item = usize> + Clone {
    Positions { bits }
}

#[derive(Clone)]
struct Positions {
    bits: RowBits,
}

impl Iterator for Positions {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.bits == 0 {
            return None;
        }
        let column = self.bits.trailing_zeros() as usize;
        self.bits &= self.bits - 1;
        Some(column)
    }
}

/// Horizontal pattern covering the passages from column `from` to column `to`.
///
/// Sets bits `from..to`, i.e. one passage per step between adjacent columns.
#[inline]
pub fn bridge(from: usize, to: usize) -> RowBits {
    debug_assert!(from <= to);
    mask(to) & !mask(from)
}

/// Cells touched by a horizontal pattern (both ends of every passage).
#[inline]
pub fn bridged_cells(horizontal: RowBits) -> RowBits {
    horizontal | (horizontal << 1)
}

/// Render a row with column 0 first, as it appears left to right in the grid.
pub fn format_row(bits: RowBits, width: usize) -> String {
    (0..width)
        .map(|column| if is_set(bits, column) { '1' } else { '0' })
        .collect()
}
