// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Accumulated state of a search: counters kept in the context and the
//! optional observer metrics of the random sampler.

pub mod metrics;
pub mod statistics;

pub use metrics::{NoMetrics, SweepObserver, SweepingMetrics};
pub use statistics::{Counters, Statistics};
