// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Typed primitives shared by the tables, the validator and the samplers:
//! - RowBits / Parity: packed rows and their population-count parity
//! - OutflowState / OutflowStateSet: exit directions of inflow strands
//! - ComponentId: labels of open strand ends

pub mod component;
pub mod constants;
pub mod outflow_state;
pub mod row;

// Re-export for convenience
pub use component::{ComponentId, NO_COMPONENT, START_COMPONENT};
pub use constants::*;
pub use outflow_state::{OutflowState, OutflowStateSet};
pub use row::{Parity, RowBits};
