// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Many independent random sweeps on the rayon pool.
//!
//! Job `i` samples with `ChaCha8Rng::seed_from_u64(base_seed + i)`, so a batch
//! is reproducible whatever the pool size. Results come back in job order.

use crate::config::SamplerConfig;
use crate::error::Result;
use crate::matrices::SweepMatrices;
use crate::memo::TableCache;
use crate::request::SweepRequest;
use crate::samplers::sample;
use log::info;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;

/// Sample `count` sweeps of the same request, one seed per job.
pub fn sample_batch(
    request: &SweepRequest,
    count: usize,
    base_seed: u64,
    config: &SamplerConfig,
    cache: &TableCache,
) -> Vec<Result<SweepMatrices>> {
    let results: Vec<Result<SweepMatrices>> = (0..count)
        .into_par_iter()
        .map(|i| {
            let mut rng = ChaCha8Rng::seed_from_u64(base_seed.wrapping_add(i as u64));
            sample(request, &mut rng, config, cache)
        })
        .collect();
    let succeeded = results.iter().filter(|r| r.is_ok()).count();
    info!(
        "[Batch] {}x{}: {} of {} sweeps succeeded",
        request.width, request.height, succeeded, count
    );
    results
}
