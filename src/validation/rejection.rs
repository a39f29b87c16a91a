// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Reasons a candidate row is rejected.

use crate::geometry::ComponentId;
use std::fmt;
use strum_macros::{EnumCount as EnumCountMacro, IntoStaticStr};

/// Why the validator refused a candidate outflow.
///
/// These are ordinary outcomes of sampling, not errors.
#[derive(Debug, Clone, PartialEq, Eq, EnumCountMacro, IntoStaticStr)]
#[strum(serialize_all = "kebab-case")]
pub enum RowRejection {
    /// An odd number of endpoint cells: the last one has no partner.
    UnpairedEndpoint { column: usize },

    /// A horizontal segment would run through a cell carrying a straight strand.
    CrossedStraightStrand { column: usize },

    /// Two ends of the same strand meet before the sweep is over.
    PrematureLoop { column: usize },

    /// A strand's two open ends are further apart than allowed.
    NestingTooDeep {
        component: ComponentId,
        distance: usize,
        max: usize,
    },

    /// The terminal row cannot finish with the declared ending.
    ImpossibleTaper { open_ends: usize },
}

impl RowRejection {
    /// Dense index for per-reason counters.
    pub fn index(&self) -> usize {
        match self {
            RowRejection::UnpairedEndpoint { .. } => 0,
            RowRejection::CrossedStraightStrand { .. } => 1,
            RowRejection::PrematureLoop { .. } => 2,
            RowRejection::NestingTooDeep { .. } => 3,
            RowRejection::ImpossibleTaper { .. } => 4,
        }
    }

    /// Stable kebab-case name of the reason.
    pub fn label(&self) -> &'static str {
        self.into()
    }
}

impl fmt::Display for RowRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowRejection::UnpairedEndpoint { column } => {
                write!(f, "Endpoint at column {} has no partner", column)
            }
            RowRejection::CrossedStraightStrand { column } => {
                write!(f, "Segment crosses the straight strand at column {}", column)
            }
            RowRejection::PrematureLoop { column } => {
                write!(f, "Loop closed early at column {}", column)
            }
            RowRejection::NestingTooDeep {
                component,
                distance,
                max,
            } => {
                write!(
                    f,
                    "Component {} spans {} open ends (max {})",
                    component, distance, max
                )
            }
            RowRejection::ImpossibleTaper { open_ends } => {
                write!(
                    f,
                    "Terminal row cannot close {} open ends as declared",
                    open_ends
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::EnumCount;

    #[test]
    fn test_indices_are_dense() {
        let all = [
            RowRejection::UnpairedEndpoint { column: 0 },
            RowRejection::CrossedStraightStrand { column: 0 },
            RowRejection::PrematureLoop { column: 0 },
            RowRejection::NestingTooDeep {
                component: 1,
                distance: 3,
                max: 1,
            },
            RowRejection::ImpossibleTaper { open_ends: 2 },
        ];
        assert_eq!(all.len(), RowRejection::COUNT);
        for (i, rejection) in all.iter().enumerate() {
            assert_eq!(rejection.index(), i);
        }
    }

    #[test]
    fn test_label_and_display() {
        let rejection = RowRejection::NestingTooDeep {
            component: 1,
            distance: 3,
            max: 1,
        };
        assert_eq!(rejection.label(), "nesting-too-deep");
        assert_eq!(rejection.to_string(), "Component 1 spans 3 open ends (max 1)");
        assert_eq!(
            RowRejection::PrematureLoop { column: 2 }.label(),
            "premature-loop"
        );
    }
}
