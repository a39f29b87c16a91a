// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Row-sweep generation of grid paths and loops.
//!
//! A grid of `width x height` cells is swept bottom to top. Each row is
//! described by the pattern of vertical passages entering it (the inflow) and
//! leaving it (the outflow); the horizontal passages inside the row follow from
//! the two. The generator produces either one simple path from a start cell in
//! the bottom row to an end cell in the top row, or one simple loop touching
//! every row.
//!
//! # Architecture
//!
//! The implementation uses a two-tier memory model:
//!
//! ## Tier 1: MEMO Data (Immutable)
//!
//! Precomputed data that never changes during a sweep:
//! - Parity patterns: every row of one population-count parity
//! - Transition tables: inflow → every outflow a row can join it to
//!
//! Tables are built once per `(width, parity, constraint)` in a [`TableCache`]
//! and shared between sweeps and threads.
//!
//! ## Tier 2: DYNAMIC Data (Mutable)
//!
//! Sweep state, tracked on the row trail:
//! - Committed outflows and horizontals, one frame per row
//! - The component row: which open strand each open end belongs to
//!
//! # Sweeping
//!
//! Tables know nothing of components; the component validator checks every
//! candidate row against the strands below it, rejecting premature loops,
//! crossings and excess nesting. Three samplers stitch rows together:
//!
//! 1. **Random**: one table, uniform draws, restart or unwind on dead ends
//! 2. **Blocks**: rows wider than one table, drawn block by block
//! 3. **Exhaustive**: every sweep of a small grid, through the predicate engine
//!
//! # Example
//!
//! ```
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha8Rng;
//! use sweep_loops::{samplers, SamplerConfig, SweepRequest, TableCache};
//!
//! let mut rng = ChaCha8Rng::seed_from_u64(7);
//! let request = SweepRequest::path(4, 4).with_columns(0, 3);
//! let m = samplers::sample(&request, &mut rng, &SamplerConfig::default(), &TableCache::new()).unwrap();
//! assert_eq!(m.vertical[0], 0b0001);
//! assert_eq!(m.exit(), 0b1000);
//! ```

pub mod config;
pub mod context;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod matrices;
pub mod memo;
pub mod predicates;
pub mod request;
pub mod samplers;
pub mod state;
pub mod trail;
pub mod validation;

// Re-export commonly used types
pub use config::{BacktrackPolicy, SamplerConfig};
pub use context::SweepContext;
pub use engine::{Predicate, PredicateResult, SweepEngine};
pub use error::{Result, SweepError};
pub use matrices::{Carver, Cell, SweepMatrices};
pub use memo::{RowConstraint, TableCache};
pub use request::{Shape, SweepRequest};
