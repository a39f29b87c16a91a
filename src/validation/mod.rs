// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Row validation: does a candidate outflow keep the sweep topologically sound?

pub mod components;
pub mod rejection;

pub use components::{validate_row, validate_terminal, Ending, RowTransition, Verdict};
pub use rejection::RowRejection;
