// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Integration tests for the random and multi-block samplers.
//!
//! Every sampled sweep is replayed through the carver and checked to be one
//! simple path or one simple loop.

mod common;

use common::{check_loop, check_path, rng};
use sweep_loops::geometry::row::is_set;
use sweep_loops::samplers::{self, blocks, exhaustive, random};
use sweep_loops::validation::RowRejection;
use sweep_loops::state::SweepingMetrics;
use sweep_loops::{
    BacktrackPolicy, RowConstraint, SamplerConfig, SweepError, SweepRequest, TableCache,
};

#[test]
fn test_small_path_endpoints() {
    let cache = TableCache::new();
    let request = SweepRequest::path(4, 4).with_columns(0, 3);
    let m = samplers::sample(&request, &mut rng(2025), &SamplerConfig::default(), &cache).unwrap();
    assert_eq!(m.vertical[0], 0b0001);
    assert_eq!(m.vertical[3], 0b1000);
    check_path(&m, 0, 3).unwrap();
}

#[test]
fn test_paths_across_seeds() {
    let cache = TableCache::new();
    let config = SamplerConfig::default();
    for seed in 0..20 {
        let request = SweepRequest::path(7, 6).with_columns(2, 5);
        let m = samplers::sample(&request, &mut rng(seed), &config, &cache).unwrap();
        check_path(&m, 2, 5).unwrap_or_else(|e| panic!("seed {}: {}\n{}", seed, e, m));
    }
}

#[test]
fn test_path_with_random_columns() {
    let cache = TableCache::new();
    let m = samplers::sample(
        &SweepRequest::path(6, 5),
        &mut rng(3),
        &SamplerConfig::default(),
        &cache,
    )
    .unwrap();
    let start = m.vertical[0].trailing_zeros() as usize;
    let end = m.exit().trailing_zeros() as usize;
    assert_eq!(m.vertical[0].count_ones(), 1);
    check_path(&m, start, end).unwrap();
}

#[test]
fn test_loops_across_seeds() {
    let cache = TableCache::new();
    let config = SamplerConfig::default();
    for seed in 0..20 {
        let m = samplers::sample(&SweepRequest::looped(6, 6), &mut rng(seed), &config, &cache)
            .unwrap();
        check_loop(&m).unwrap_or_else(|e| panic!("seed {}: {}\n{}", seed, e, m));
    }
}

#[test]
fn test_unwind_policy_loops() {
    let cache = TableCache::new();
    let config = SamplerConfig::default().with_policy(BacktrackPolicy::UnwindRow);
    for seed in 0..10 {
        let mut metrics = SweepingMetrics::new();
        let m = random::sample_observed(
            &SweepRequest::looped(5, 7),
            &mut rng(seed),
            &config,
            &cache,
            &mut metrics,
        )
        .unwrap();
        check_loop(&m).unwrap();
        assert_eq!(metrics.restarts, 0);
        assert_eq!(metrics.visited_cells, m.visited_cells());
    }
}

#[test]
fn test_nesting_bound_respected() {
    let cache = TableCache::new();
    let request = SweepRequest::looped(6, 5).with_max_nested(1);
    let m = samplers::sample(&request, &mut rng(8), &SamplerConfig::default(), &cache).unwrap();
    check_loop(&m).unwrap();
}

#[test]
fn test_no_corridor_constraint() {
    let cache = TableCache::new();
    let request = SweepRequest::path(6, 6)
        .with_columns(0, 5)
        .with_constraint(RowConstraint::no_corridor_beside(&[0, 5]));
    for seed in 0..5 {
        let m = samplers::sample(&request, &mut rng(seed), &SamplerConfig::default(), &cache)
            .unwrap();
        check_path(&m, 0, 5).unwrap();
        for r in 1..m.height() - 1 {
            let v = m.vertical[r];
            assert!(!(v.count_ones() == 1 && (is_set(v, 1) || is_set(v, 4))), "row {}: {:#b}", r, v);
        }
    }
}

#[test]
fn test_wide_path_uses_blocks() {
    let cache = TableCache::new();
    let request = SweepRequest::path(20, 6).with_columns(3, 17);
    let m = samplers::sample(&request, &mut rng(12), &SamplerConfig::default(), &cache).unwrap();
    assert_eq!(m.width, 20);
    check_path(&m, 3, 17).unwrap();
}

#[test]
fn test_wide_loop_uses_blocks() {
    let cache = TableCache::new();
    let m = blocks::sample(
        &SweepRequest::looped(26, 5),
        &mut rng(4),
        &SamplerConfig::default(),
        &cache,
    )
    .unwrap();
    check_loop(&m).unwrap();
}

#[test]
fn test_same_seed_same_sweep() {
    let cache = TableCache::new();
    let request = SweepRequest::looped(8, 8);
    let config = SamplerConfig::default();
    let a = samplers::sample(&request, &mut rng(99), &config, &cache).unwrap();
    let b = samplers::sample(&request, &mut rng(99), &config, &cache).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_configuration_errors() {
    let cache = TableCache::new();
    let config = SamplerConfig::default();
    let too_wide = SweepRequest::looped(65, 4);
    assert!(matches!(
        samplers::sample(&too_wide, &mut rng(0), &config, &cache),
        Err(SweepError::Configuration(_))
    ));
    let bad_column = SweepRequest::path(4, 4).with_columns(0, 4);
    assert!(matches!(
        samplers::sample(&bad_column, &mut rng(0), &config, &cache),
        Err(SweepError::Configuration(_))
    ));
    let too_short = SweepRequest::looped(4, 1);
    assert!(matches!(
        samplers::sample(&too_short, &mut rng(0), &config, &cache),
        Err(SweepError::Configuration(_))
    ));
}

/// A path whose exit column is forbidden by the row constraint.
fn blocked_exit() -> SweepRequest {
    SweepRequest::path(3, 3)
        .with_columns(0, 2)
        .with_constraint(RowConstraint::new("no-bare-column-2", |row| row != 0b100))
}

#[test]
fn test_exhaustion_reports_progress() {
    let cache = TableCache::new();
    let config = SamplerConfig {
        row_attempts: 4,
        sweep_attempts: 3,
        ..SamplerConfig::default()
    };
    let error = samplers::sample(&blocked_exit(), &mut rng(1), &config, &cache).unwrap_err();
    assert_eq!(
        error,
        SweepError::SearchExhausted {
            attempts: 3,
            furthest_row: 1,
            height: 3
        }
    );
}

#[test]
fn test_constraint_applies_to_terminal_row() {
    let cache = TableCache::new();
    let config = SamplerConfig {
        row_attempts: 8,
        sweep_attempts: 4,
        ..SamplerConfig::default()
    };
    assert_eq!(exhaustive::count_solutions(&blocked_exit(), &cache).unwrap(), 0);

    let mut metrics = SweepingMetrics::new();
    let random = random::sample_observed(&blocked_exit(), &mut rng(5), &config, &cache, &mut metrics);
    assert!(matches!(random, Err(SweepError::SearchExhausted { .. })));
    assert!(metrics.rejections[RowRejection::ImpossibleTaper { open_ends: 0 }.index()] > 0);

    let blocks = blocks::sample(&blocked_exit(), &mut rng(5), &config, &cache);
    assert!(matches!(blocks, Err(SweepError::SearchExhausted { .. })));

    // Without the constraint the same path exists.
    let free = SweepRequest::path(3, 3).with_columns(0, 2);
    let m = samplers::sample(&free, &mut rng(5), &SamplerConfig::default(), &cache).unwrap();
    check_path(&m, 0, 2).unwrap();
}
