// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Precomputed data: immutable once built and shared between sweeps.
//!
//! Leaf to root:
//! - `parity`: all W-bit rows of one population-count parity
//! - `spans`: outflow patterns for the free cells between two fixed positions
//! - `outflows`: permitted exit directions for the inflows of a row
//! - `transitions`: per-width inflow → outflows tables
//! - `cache`: the table factory keyed by width, parity and constraint

pub mod cache;
pub mod outflows;
pub mod parity;
pub mod spans;
pub mod transitions;

pub use cache::{TableCache, TableKey};
pub use parity::{all_with_parity, ParityTables};
pub use spans::{SpanEnd, SpanSolver};
pub use transitions::{RowConstraint, TransitionTable};
