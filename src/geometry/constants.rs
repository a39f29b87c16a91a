// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Compile-time ceilings for row patterns and transition tables.
//!
//! Rows are packed into a [`RowBits`](crate::geometry::RowBits) word, so the
//! validator and the multi-block sampler can handle up to [`MAX_ROW_WIDTH`]
//! columns. A single transition table materializes every inflow pattern of its
//! width, which is only practical up to [`MAX_TABLE_WIDTH`] columns.
//!
//! # Table sizes
//!
//! | width | inflows per parity | worst-case outflows per inflow |
//! |-------|--------------------|--------------------------------|
//! | 4     | 8                  | 8                              |
//! | 8     | 128                | 128                            |
//! | 12    | 2048               | 2048                           |

/// Widest row the validator accepts (bits in a `RowBits` word).
pub const MAX_ROW_WIDTH: usize = 64;

/// Widest row for which a single transition table is built.
///
/// Wider grids are split into blocks of at most this many columns
/// (see [`crate::samplers::blocks`]).
pub const MAX_TABLE_WIDTH: usize = 12;

/// Widest parity table that is materialized eagerly.
pub const MAX_PARITY_WIDTH: usize = 20;

/// Tallest grid a request may ask for; the row trail holds at most this many rows.
pub const MAX_HEIGHT: usize = 1 << 16;

/// Default number of candidate draws per row before the row is abandoned.
pub const DEFAULT_ROW_ATTEMPTS: usize = 64;

/// Default number of full sweeps before a sampler reports exhaustion.
pub const DEFAULT_SWEEP_ATTEMPTS: usize = 10_000;

/// Default number of single-row unwinds before a sampler reports exhaustion.
pub const DEFAULT_BACKTRACK_LIMIT: usize = 100_000;
