// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Geometry primitives used by the editing engine.
//!
//! Everything in here is a pure function over `kurbo` types in glyph design
//! space. Projections return coordinates (never indices) so callers can
//! compare them against click positions without touching the outline.

mod curve;
mod line;
mod sturm;

pub use curve::{
    curve_distance, curve_intersections, curve_projection, join_curves, qcurve_intersections,
};
pub use line::{line_distance, line_intersection, line_projection, rotate_point_around_ref_line};

use kurbo::Point;

/// Tolerance for treating a length or denominator as zero
pub const EPSILON: f64 = 1e-9;

/// A crossing between a line segment and another segment
///
/// `t_line` is the parameter on the line, `t_other` the parameter on the
/// second segment (line or curve). Both lie in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intersection {
    pub point: Point,
    pub t_line: f64,
    pub t_other: f64,
}
