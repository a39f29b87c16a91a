// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Component tracking across one row.
//!
//! A candidate row is checked in a single left-to-right sweep. The endpoint
//! cells (`inflow ^ outflow`) are paired consecutively into horizontal
//! segments and every pair is classified:
//!
//! - inflow with outflow: the strand continues upward
//! - outflow with outflow: a new strand opens with two fresh ends
//! - inflow with inflow: two strands merge, or close a loop when both ends
//!   already belong to the same strand
//!
//! Straight cells (`inflow & outflow`) may not lie inside a segment.

use crate::error::{Result, SweepError};
use crate::geometry::row::{self, bit, bridge, is_set, mask};
use crate::geometry::{ComponentId, RowBits, MAX_ROW_WIDTH, NO_COMPONENT, START_COMPONENT};
use crate::validation::RowRejection;
use log::trace;
use std::collections::HashMap;

/// How the terminal row must finish the sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ending {
    /// The start strand leaves through the top boundary at `end`.
    Path { end: usize },
    /// Exactly one loop closes and nothing stays open.
    Loop,
}

/// An accepted row: its lateral passages and the labels of the next row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowTransition {
    pub horizontal: RowBits,
    pub components: Vec<ComponentId>,
    pub closed_loops: usize,
}

/// The validator's answer for one candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Accepted(RowTransition),
    Rejected(RowRejection),
}

impl Verdict {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Verdict::Accepted(_))
    }

    pub fn transition(&self) -> Option<&RowTransition> {
        match self {
            Verdict::Accepted(transition) => Some(transition),
            Verdict::Rejected(_) => None,
        }
    }

    pub fn rejection(&self) -> Option<&RowRejection> {
        match self {
            Verdict::Accepted(_) => None,
            Verdict::Rejected(rejection) => Some(rejection),
        }
    }
}

/// Validate a non-terminal row.
///
/// `components` labels the inflow: non-zero exactly at the inflow columns.
/// With `max_nested` set, rows where a strand's two open ends are more than
/// that many open ends apart are rejected.
pub fn validate_row(
    inflow: RowBits,
    outflow: RowBits,
    components: &[ComponentId],
    max_nested: Option<usize>,
) -> Result<Verdict> {
    let transition = match sweep(inflow, outflow, components, 0)? {
        Ok(transition) => transition,
        Err(rejection) => return Ok(Verdict::Rejected(rejection)),
    };
    if let Some(max) = max_nested {
        if let Some(rejection) = nesting_violation(&transition.components, max) {
            return Ok(Verdict::Rejected(rejection));
        }
    }
    Ok(Verdict::Accepted(transition))
}

/// Validate the last row of a sweep against the declared ending.
pub fn validate_terminal(
    inflow: RowBits,
    outflow: RowBits,
    components: &[ComponentId],
    ending: Ending,
) -> Result<Verdict> {
    let open_ends = inflow.count_ones() as usize;
    let taper = RowRejection::ImpossibleTaper { open_ends };
    match ending {
        Ending::Path { end } => {
            if end >= components.len() {
                return Err(SweepError::configuration(format!(
                    "end column {} outside row of width {}",
                    end,
                    components.len()
                )));
            }
            if outflow != bit(end) {
                return Ok(Verdict::Rejected(taper));
            }
            match sweep(inflow, outflow, components, 0)? {
                Ok(transition) if transition.components[end] == START_COMPONENT => {
                    Ok(Verdict::Accepted(transition))
                }
                Ok(_) => Ok(Verdict::Rejected(taper)),
                Err(rejection) => Ok(Verdict::Rejected(rejection)),
            }
        }
        Ending::Loop => {
            if outflow != 0 {
                return Ok(Verdict::Rejected(taper));
            }
            match sweep(inflow, outflow, components, 1)? {
                Ok(transition) if transition.closed_loops == 1 => {
                    Ok(Verdict::Accepted(transition))
                }
                Ok(_) => Ok(Verdict::Rejected(taper)),
                Err(rejection) => Ok(Verdict::Rejected(rejection)),
            }
        }
    }
}

/// Union of strand labels. The smaller label wins, so the start sentinel
/// absorbs any strand merged into it.
#[derive(Debug, Default)]
struct Remap {
    links: HashMap<ComponentId, ComponentId>,
}

impl Remap {
    fn resolve(&self, mut id: ComponentId) -> ComponentId {
        while let Some(&next) = self.links.get(&id) {
            id = next;
        }
        id
    }

    fn union(&mut self, a: ComponentId, b: ComponentId) {
        let (a, b) = (self.resolve(a), self.resolve(b));
        if a != b {
            self.links.insert(a.max(b), a.min(b));
        }
    }
}

fn check_inputs(inflow: RowBits, outflow: RowBits, components: &[ComponentId]) -> Result<()> {
    let width = components.len();
    if width == 0 || width > MAX_ROW_WIDTH {
        return Err(SweepError::invariant(format!(
            "component row of width {} (expected 1..={})",
            width, MAX_ROW_WIDTH
        )));
    }
    let outside = !mask(width);
    if inflow & outside != 0 || outflow & outside != 0 {
        return Err(SweepError::invariant(format!(
            "row bits beyond width {}: inflow {:#b}, outflow {:#b}",
            width, inflow, outflow
        )));
    }
    for (column, &id) in components.iter().enumerate() {
        match (is_set(inflow, column), id == NO_COMPONENT) {
            (true, true) => {
                return Err(SweepError::invariant(format!(
                    "inflow at column {} has no component",
                    column
                )))
            }
            (false, false) => {
                return Err(SweepError::invariant(format!(
                    "component {} at column {} without inflow",
                    id, column
                )))
            }
            _ => {}
        }
    }
    Ok(())
}

/// The shared sweep. The outer `Result` carries invariant violations, the
/// inner one rejections. At most `closures` loops may close.
fn sweep(
    inflow: RowBits,
    outflow: RowBits,
    components: &[ComponentId],
    closures: usize,
) -> Result<std::result::Result<RowTransition, RowRejection>> {
    check_inputs(inflow, outflow, components)?;
    let width = components.len();
    let endpoints = inflow ^ outflow;
    let straights = inflow & outflow;

    let mut raw = vec![NO_COMPONENT; width];
    for column in row::positions(straights) {
        raw[column] = components[column];
    }

    let mut fresh = components.iter().copied().max().unwrap_or(0).max(0) + 1;
    let mut remap = Remap::default();
    let mut horizontal: RowBits = 0;
    let mut closed_loops = 0;

    let ends: Vec<usize> = row::positions(endpoints).collect();
    if ends.len() % 2 == 1 {
        let column = ends[ends.len() - 1];
        return Ok(Err(RowRejection::UnpairedEndpoint { column }));
    }

    for pair in ends.chunks_exact(2) {
        let (a, b) = (pair[0], pair[1]);
        let crossed = straights & bridge(a + 1, b);
        if crossed != 0 {
            let column = crossed.trailing_zeros() as usize;
            return Ok(Err(RowRejection::CrossedStraightStrand { column }));
        }
        match (is_set(inflow, a), is_set(inflow, b)) {
            (true, false) => raw[b] = components[a],
            (false, true) => raw[a] = components[b],
            (false, false) => {
                raw[a] = fresh;
                raw[b] = fresh;
                fresh += 1;
            }
            (true, true) => {
                let (left, right) = (components[a], components[b]);
                if remap.resolve(left) == remap.resolve(right) {
                    if closed_loops == closures {
                        return Ok(Err(RowRejection::PrematureLoop { column: a }));
                    }
                    closed_loops += 1;
                } else {
                    remap.union(left, right);
                }
            }
        }
        horizontal |= bridge(a, b);
    }

    if horizontal & !mask(width.saturating_sub(1)) != 0 {
        return Err(SweepError::invariant(format!(
            "horizontal passage {:#b} past column {}",
            horizontal,
            width - 1
        )));
    }

    let resolved: Vec<ComponentId> = raw
        .iter()
        .map(|&id| if id == NO_COMPONENT { id } else { remap.resolve(id) })
        .collect();
    let components = renumber(&resolved);
    trace!(
        "[ComponentValidator] {} -> {} accepted: {}",
        row::format_row(inflow, width),
        row::format_row(outflow, width),
        crate::geometry::component::format_components(&components)
    );
    Ok(Ok(RowTransition {
        horizontal,
        components,
        closed_loops,
    }))
}

/// Relabel positive ids 1, 2, ... by first occurrence from the left.
/// Sentinels keep their labels.
pub fn renumber(row: &[ComponentId]) -> Vec<ComponentId> {
    let mut relabel: HashMap<ComponentId, ComponentId> = HashMap::new();
    row.iter()
        .map(|&id| {
            if id <= NO_COMPONENT {
                id
            } else {
                let next = relabel.len() as ComponentId + 1;
                *relabel.entry(id).or_insert(next)
            }
        })
        .collect()
}

/// For each strand with two open ends, the index distance between them among
/// the open ends of the row. Returned left to right by first end.
pub fn nesting_distances(row: &[ComponentId]) -> Vec<(ComponentId, usize)> {
    let open: Vec<ComponentId> = row.iter().copied().filter(|&id| id != NO_COMPONENT).collect();
    let mut first: HashMap<ComponentId, usize> = HashMap::new();
    let mut distances = Vec::new();
    for (index, &id) in open.iter().enumerate() {
        if id < 0 {
            continue;
        }
        match first.get(&id) {
            Some(&start) => distances.push((id, start, index - start)),
            None => {
                first.insert(id, index);
            }
        }
    }
    distances.sort_by_key(|&(_, start, _)| start);
    distances
        .into_iter()
        .map(|(id, _, distance)| (id, distance))
        .collect()
}

fn nesting_violation(row: &[ComponentId], max: usize) -> Option<RowRejection> {
    nesting_distances(row)
        .into_iter()
        .find(|&(_, distance)| distance > max)
        .map(|(component, distance)| RowRejection::NestingTooDeep {
            component,
            distance,
            max,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Parity;
    use crate::memo::TransitionTable;

    /// Give every inflow its own strand, so no merge can close a loop.
    fn distinct(inflow: RowBits, width: usize) -> Vec<ComponentId> {
        let mut components = vec![NO_COMPONENT; width];
        for (i, column) in row::positions(inflow).enumerate() {
            components[column] = i as ComponentId + 1;
        }
        components
    }

    fn accepted(verdict: Verdict) -> RowTransition {
        match verdict {
            Verdict::Accepted(transition) => transition,
            Verdict::Rejected(rejection) => panic!("unexpected rejection: {}", rejection),
        }
    }

    #[test]
    fn test_seed_row_opens_caps() {
        let t = accepted(validate_row(0, 0b1001, &[0, 0, 0, 0], None).unwrap());
        assert_eq!(t.horizontal, 0b0111);
        assert_eq!(t.components, vec![1, 0, 0, 1]);
        assert_eq!(t.closed_loops, 0);
    }

    #[test]
    fn test_path_strand_continues() {
        let components = [START_COMPONENT, 0, 0, 0];
        let t = accepted(validate_row(0b0001, 0b0100, &components, None).unwrap());
        assert_eq!(t.horizontal, 0b0011);
        assert_eq!(t.components, vec![0, 0, START_COMPONENT, 0]);
    }

    #[test]
    fn test_start_absorbs_merged_strand() {
        // S at 0, strand 1 at 1 and 2: merging 0 and 1 hands the start to column 2.
        let components = [START_COMPONENT, 1, 1, 0];
        let t = accepted(validate_row(0b0111, 0b0100, &components, None).unwrap());
        assert_eq!(t.horizontal, 0b0001);
        assert_eq!(t.components, vec![0, 0, START_COMPONENT, 0]);
    }

    #[test]
    fn test_rejections() {
        assert_eq!(
            validate_row(0b001, 0b000, &[START_COMPONENT, 0, 0], None).unwrap(),
            Verdict::Rejected(RowRejection::UnpairedEndpoint { column: 0 })
        );
        // Segment 0..2 runs over the straight strand at column 1.
        assert_eq!(
            validate_row(0b011, 0b110, &[1, 1, 0], None).unwrap(),
            Verdict::Rejected(RowRejection::CrossedStraightStrand { column: 1 })
        );
        assert_eq!(
            validate_row(0b0011, 0b0000, &[1, 1, 0, 0], None).unwrap(),
            Verdict::Rejected(RowRejection::PrematureLoop { column: 0 })
        );
    }

    #[test]
    fn test_invariant_violations() {
        assert!(matches!(
            validate_row(0b01, 0b01, &[0, 0], None),
            Err(SweepError::InvariantViolation(_))
        ));
        assert!(matches!(
            validate_row(0b01, 0b100, &[1, 0], None),
            Err(SweepError::InvariantViolation(_))
        ));
        assert!(matches!(
            validate_row(0, 0, &[], None),
            Err(SweepError::InvariantViolation(_))
        ));
    }

    #[test]
    fn test_nesting_bound_three_rows() {
        // Seed: two caps at the outer columns.
        let seed = accepted(validate_row(0, 0b1001, &[0; 4], Some(1)).unwrap());
        assert_eq!(seed.components, vec![1, 0, 0, 1]);
        assert_eq!(nesting_distances(&seed.components), vec![(1, 1)]);

        // Middle: a new cap nested inside strand 1.
        let verdict = validate_row(0b1001, 0b1111, &seed.components, Some(1)).unwrap();
        assert_eq!(
            verdict,
            Verdict::Rejected(RowRejection::NestingTooDeep {
                component: 1,
                distance: 3,
                max: 1
            })
        );
        let middle = accepted(validate_row(0b1001, 0b1111, &seed.components, None).unwrap());
        assert_eq!(middle.components, vec![1, 2, 2, 1]);

        // Terminal: everything closes into one loop.
        let last = accepted(
            validate_terminal(0b1111, 0, &middle.components, Ending::Loop).unwrap(),
        );
        assert_eq!(last.closed_loops, 1);
        assert_eq!(last.horizontal, 0b0101);
    }

    #[test]
    fn test_terminal_loop_needs_exactly_one_closure() {
        assert_eq!(
            validate_terminal(0b1111, 0, &[1, 1, 2, 2], Ending::Loop).unwrap(),
            Verdict::Rejected(RowRejection::PrematureLoop { column: 2 })
        );
        assert_eq!(
            validate_terminal(0b0011, 0b0011, &[1, 1, 0, 0], Ending::Loop).unwrap(),
            Verdict::Rejected(RowRejection::ImpossibleTaper { open_ends: 2 })
        );
    }

    #[test]
    fn test_terminal_path() {
        let t = accepted(
            validate_terminal(0b0001, 0b1000, &[START_COMPONENT, 0, 0, 0], Ending::Path { end: 3 })
                .unwrap(),
        );
        assert_eq!(t.horizontal, 0b0111);
        assert_eq!(t.components, vec![0, 0, 0, START_COMPONENT]);

        assert_eq!(
            validate_terminal(0b0001, 0b0010, &[START_COMPONENT, 0, 0, 0], Ending::Path { end: 3 })
                .unwrap(),
            Verdict::Rejected(RowRejection::ImpossibleTaper { open_ends: 1 })
        );
        assert!(matches!(
            validate_terminal(0b0001, 0b0001, &[START_COMPONENT, 0], Ending::Path { end: 5 }),
            Err(SweepError::Configuration(_))
        ));
    }

    #[test]
    fn test_renumber_keeps_sentinels() {
        assert_eq!(renumber(&[5, START_COMPONENT, 3, 5, 3]), vec![1, -1, 2, 1, 2]);
    }

    #[test]
    fn test_table_entries_validate() {
        for width in 1..=6 {
            for parity in [Parity::Even, Parity::Odd] {
                let table = TransitionTable::build(width, parity, None).unwrap();
                for (inflow, outflows) in table.iter() {
                    let components = distinct(inflow, width);
                    for &outflow in outflows {
                        let verdict = validate_row(inflow, outflow, &components, None).unwrap();
                        assert!(
                            verdict.is_accepted(),
                            "width {} {} -> {} rejected",
                            width,
                            row::format_row(inflow, width),
                            row::format_row(outflow, width)
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_brute_force_matches_table() {
        for width in 1..=6 {
            for parity in [Parity::Even, Parity::Odd] {
                let table = TransitionTable::build(width, parity, None).unwrap();
                for (inflow, outflows) in table.iter() {
                    let components = distinct(inflow, width);
                    let brute: Vec<RowBits> = (0..1u64 << width)
                        .filter(|&outflow| {
                            validate_row(inflow, outflow, &components, None)
                                .unwrap()
                                .is_accepted()
                        })
                        .collect();
                    assert_eq!(
                        brute,
                        outflows.to_vec(),
                        "width {} inflow {}",
                        width,
                        row::format_row(inflow, width)
                    );
                }
            }
        }
    }
}
