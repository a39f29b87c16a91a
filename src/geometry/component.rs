// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Component labels for the open ends of a row.
//!
//! A component row holds one label per column. `0` means no open end in that
//! column. Equal positive labels mark the two open ends of one strand. Negative
//! labels are fixed sentinels owned by the caller: the start strand of a path
//! has a single open end and carries [`START_COMPONENT`].

/// Label of an open strand end.
pub type ComponentId = i32;

/// No open end in this column.
pub const NO_COMPONENT: ComponentId = 0;

/// Sentinel label of the strand attached to a path's start.
pub const START_COMPONENT: ComponentId = -1;

/// Whether `id` is a caller-fixed sentinel that renumbering must not touch.
#[inline]
pub fn is_sentinel(id: ComponentId) -> bool {
    id < 0
}

/// Number of distinct strands with at least one open end in `row`.
pub fn count_components(row: &[ComponentId]) -> usize {
    let mut seen: Vec<ComponentId> = row.iter().copied().filter(|&id| id != NO_COMPONENT).collect();
    seen.sort_unstable();
    seen.dedup();
    seen.len()
}

/// Render a component row as a compact string, `.` for empty columns.
pub fn format_components(row: &[ComponentId]) -> String {
    row.iter()
        .map(|&id| match id {
            NO_COMPONENT => ".".to_string(),
            START_COMPONENT => "S".to_string(),
            id => id.to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}
