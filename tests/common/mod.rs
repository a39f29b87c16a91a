// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Common test utilities shared across integration tests.
//!
//! The checkers replay a sweep through [`Carver`] into an adjacency map and
//! verify the result is one simple path or one simple loop.

#![allow(dead_code)]

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::{BTreeMap, BTreeSet};
use sweep_loops::{Cell, SweepMatrices};

pub type Adjacency = BTreeMap<Cell, BTreeSet<Cell>>;

pub fn rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// Replay the passages, failing on a passage carved twice or between cells
/// that are not neighbours inside the grid.
pub fn replay(m: &SweepMatrices) -> Result<Adjacency, String> {
    let mut adjacency = Adjacency::new();
    let mut problem = None;
    let (width, height) = (m.width, m.height());
    m.carve(&mut |a: Cell, b: Cell| {
        let neighbours = (a.row == b.row && a.column + 1 == b.column)
            || (a.column == b.column && a.row + 1 == b.row);
        if !neighbours || b.row >= height || b.column >= width {
            problem.get_or_insert(format!("bad passage {:?} -> {:?}", a, b));
        }
        if !adjacency.entry(a).or_default().insert(b) || !adjacency.entry(b).or_default().insert(a) {
            problem.get_or_insert(format!("passage {:?} -> {:?} carved twice", a, b));
        }
    });
    match problem {
        Some(problem) => Err(problem),
        None => Ok(adjacency),
    }
}

/// Walk from `from` without stepping back, until `stop` or a dead end.
fn walk(adjacency: &Adjacency, from: Cell, stop: impl Fn(Cell, usize) -> bool) -> Vec<Cell> {
    let mut cells = vec![from];
    let mut previous: Option<Cell> = None;
    let mut current = from;
    while cells.len() <= adjacency.len() + 1 {
        let next = adjacency
            .get(&current)
            .and_then(|n| n.iter().copied().find(|&c| Some(c) != previous));
        let Some(next) = next else { break };
        if stop(next, cells.len()) {
            cells.push(next);
            break;
        }
        cells.push(next);
        previous = Some(current);
        current = next;
    }
    cells
}

/// One simple path entering the bottom of `(0, start)` and leaving the top of
/// `(height - 1, end)`.
pub fn check_path(m: &SweepMatrices, start: usize, end: usize) -> Result<(), String> {
    let height = m.height();
    if m.exit() != 1 << end {
        return Err(format!("exit {:#b}, expected column {}", m.exit(), end));
    }
    let adjacency = replay(m)?;
    let first = Cell::new(0, start);
    let last = Cell::new(height - 1, end);
    for (cell, neighbours) in &adjacency {
        let boundary = usize::from(*cell == first) + usize::from(*cell == last);
        if neighbours.len() + boundary != 2 {
            return Err(format!("cell {:?} has degree {}", cell, neighbours.len() + boundary));
        }
    }
    if first == last {
        return if adjacency.is_empty() {
            Ok(())
        } else {
            Err("single-cell path carves passages".to_string())
        };
    }
    let route = walk(&adjacency, first, |cell, _| cell == last);
    if route.last() != Some(&last) {
        return Err(format!("path from {:?} never reaches {:?}", first, last));
    }
    if route.len() != adjacency.len() {
        return Err(format!(
            "path visits {} cells, {} carved",
            route.len(),
            adjacency.len()
        ));
    }
    Ok(())
}

/// One simple cycle touching every row, closed below the top boundary.
pub fn check_loop(m: &SweepMatrices) -> Result<(), String> {
    if m.exit() != 0 {
        return Err(format!("loop leaves the grid through {:#b}", m.exit()));
    }
    let adjacency = replay(m)?;
    if let Some((cell, n)) = adjacency.iter().find(|(_, n)| n.len() != 2) {
        return Err(format!("cell {:?} has degree {}", cell, n.len()));
    }
    let Some(&first) = adjacency.keys().next() else {
        return Err("empty loop".to_string());
    };
    let cycle = walk(&adjacency, first, |cell, _| cell == first);
    if cycle.last() != Some(&first) {
        return Err("walk does not return to its start".to_string());
    }
    if cycle.len() - 1 != adjacency.len() {
        return Err(format!(
            "cycle visits {} of {} cells",
            cycle.len() - 1,
            adjacency.len()
        ));
    }
    let rows: BTreeSet<usize> = adjacency.keys().map(|c| c.row).collect();
    if rows.len() != m.height() {
        return Err(format!("loop touches {} of {} rows", rows.len(), m.height()));
    }
    Ok(())
}
