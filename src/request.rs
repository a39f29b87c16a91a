// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! What to generate: grid size, shape and row-level restrictions.
//!
//! A [`SweepRequest`] may leave a path's columns open; [`SweepRequest::resolve`]
//! fixes them from the caller's rng and checks every range, producing a
//! [`SweepPlan`] the samplers run against.

use crate::error::{Result, SweepError};
use crate::geometry::row::bit;
use crate::geometry::component::count_components;
use crate::geometry::{ComponentId, Parity, RowBits, MAX_HEIGHT, NO_COMPONENT, START_COMPONENT};
use crate::memo::RowConstraint;
use crate::validation::Ending;
use rand::Rng;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// An open path entering at the bottom in `start`, leaving at the top in
    /// `end`. Missing columns are drawn from the rng.
    Path {
        start: Option<usize>,
        end: Option<usize>,
    },
    /// A simple closed loop.
    Loop,
}

#[derive(Debug, Clone)]
pub struct SweepRequest {
    pub width: usize,
    pub height: usize,
    pub shape: Shape,
    /// Largest allowed distance between the two open ends of a strand.
    pub max_nested: Option<usize>,
    pub constraint: Option<RowConstraint>,
}

impl SweepRequest {
    pub fn path(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            shape: Shape::Path {
                start: None,
                end: None,
            },
            max_nested: None,
            constraint: None,
        }
    }

    pub fn looped(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            shape: Shape::Loop,
            max_nested: None,
            constraint: None,
        }
    }

    /// Fix both path columns. Has no effect on a loop.
    pub fn with_columns(mut self, start: usize, end: usize) -> Self {
        if let Shape::Path { .. } = self.shape {
            self.shape = Shape::Path {
                start: Some(start),
                end: Some(end),
            };
        }
        self
    }

    pub fn with_max_nested(mut self, max_nested: usize) -> Self {
        self.max_nested = Some(max_nested);
        self
    }

    pub fn with_constraint(mut self, constraint: RowConstraint) -> Self {
        self.constraint = Some(constraint);
        self
    }

    pub fn parity(&self) -> Parity {
        match self.shape {
            Shape::Path { .. } => Parity::Odd,
            Shape::Loop => Parity::Even,
        }
    }

    /// Check ranges against a sampler's widest supported row.
    pub fn validate(&self, max_width: usize) -> Result<()> {
        let min_width = match self.shape {
            Shape::Path { .. } => 1,
            Shape::Loop => 2,
        };
        if self.width < min_width || self.width > max_width {
            return Err(SweepError::configuration(format!(
                "width {} outside {}..={}",
                self.width, min_width, max_width
            )));
        }
        if self.height < 2 || self.height > MAX_HEIGHT {
            return Err(SweepError::configuration(format!(
                "height {} outside 2..={}",
                self.height, MAX_HEIGHT
            )));
        }
        if self.max_nested == Some(0) {
            return Err(SweepError::configuration("max_nested must be positive"));
        }
        if let Shape::Path { start, end } = self.shape {
            for column in [start, end].into_iter().flatten() {
                if column >= self.width {
                    return Err(SweepError::configuration(format!(
                        "column {} outside grid of width {}",
                        column, self.width
                    )));
                }
            }
        }
        Ok(())
    }

    /// Validate and fix missing columns from `rng`.
    pub fn resolve<R: Rng>(&self, max_width: usize, rng: &mut R) -> Result<SweepPlan> {
        self.validate(max_width)?;
        match self.shape {
            Shape::Path { start, end } => {
                let start = start.unwrap_or_else(|| rng.gen_range(0..self.width));
                let end = end.unwrap_or_else(|| rng.gen_range(0..self.width));
                Ok(self.plan(Some(start), Ending::Path { end }))
            }
            Shape::Loop => Ok(self.plan(None, Ending::Loop)),
        }
    }

    /// Validate without an rng: a path must name both columns.
    pub fn resolve_fixed(&self, max_width: usize) -> Result<SweepPlan> {
        self.validate(max_width)?;
        match self.shape {
            Shape::Path {
                start: Some(start),
                end: Some(end),
            } => Ok(self.plan(Some(start), Ending::Path { end })),
            Shape::Path { .. } => Err(SweepError::configuration(
                "path columns must be given when no rng is supplied",
            )),
            Shape::Loop => Ok(self.plan(None, Ending::Loop)),
        }
    }

    fn plan(&self, start: Option<usize>, ending: Ending) -> SweepPlan {
        SweepPlan {
            width: self.width,
            height: self.height,
            start,
            ending,
            max_nested: self.max_nested,
        }
    }
}

/// A validated request with every column fixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SweepPlan {
    pub width: usize,
    pub height: usize,
    pub start: Option<usize>,
    pub ending: Ending,
    pub max_nested: Option<usize>,
}

impl SweepPlan {
    pub fn parity(&self) -> Parity {
        match self.ending {
            Ending::Path { .. } => Parity::Odd,
            Ending::Loop => Parity::Even,
        }
    }

    /// Pattern entering row 0 through the bottom boundary.
    pub fn entry(&self) -> RowBits {
        self.start.map_or(0, bit)
    }

    /// Labels of the strands entering row 0.
    pub fn entry_components(&self) -> Vec<ComponentId> {
        let mut components = vec![NO_COMPONENT; self.width];
        if let Some(start) = self.start {
            components[start] = START_COMPONENT;
        }
        components
    }

    /// Pattern the terminal row must leave through the top boundary.
    pub fn exit(&self) -> RowBits {
        match self.ending {
            Ending::Path { end } => bit(end),
            Ending::Loop => 0,
        }
    }

    pub fn is_path(&self) -> bool {
        matches!(self.ending, Ending::Path { .. })
    }

    /// Below the terminal row some strand must stay open: a loop closed or a
    /// path ended early can never reach the top boundary as planned.
    pub fn check_open(&self, row: usize, components: &[ComponentId]) -> Result<()> {
        if row + 1 < self.height && count_components(components) == 0 {
            return Err(SweepError::invariant(format!(
                "no open strand above row {} of {}",
                row, self.height
            )));
        }
        Ok(())
    }
}
