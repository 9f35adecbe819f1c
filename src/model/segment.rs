// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Derived segment view of a path.
//!
//! A segment is a run of off-curve points terminated by one on-curve point.
//! Segments are never stored; `Path::segments` recomputes them from the
//! point list on demand.

use super::path::Path;
use super::point::SegmentType;
use kurbo::{CubicBez, Line, PathSeg, Point, QuadBez};

/// One segment of a path, expressed as indices into the point list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathSegment {
    /// On-curve point the segment starts from (equal to `end` for the
    /// `Move` segment of an open path)
    pub start: usize,
    /// Off-curve control points, in path order
    pub off_curves: Vec<usize>,
    /// On-curve point terminating the segment
    pub end: usize,
    pub kind: SegmentType,
}

impl PathSegment {
    /// True for the lone `Move` point that opens a path
    pub fn is_move(&self) -> bool {
        self.kind == SegmentType::Move
    }

    /// True for a segment with no control points
    pub fn is_line(&self) -> bool {
        !self.is_move() && self.off_curves.is_empty()
    }

    /// All point indices owned by the segment (controls then end)
    pub fn point_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.off_curves.iter().copied().chain(std::iter::once(self.end))
    }

    /// Geometry of the segment as kurbo primitives
    ///
    /// A quadratic run with several control points expands into one
    /// `QuadBez` per control point, split at the implied on-curve midpoints.
    pub fn to_path_segs(&self, path: &Path) -> Vec<PathSeg> {
        let points = path.points();
        let start = points[self.start].pos();
        let end = points[self.end].pos();
        let offs: Vec<Point> = self.off_curves.iter().map(|&i| points[i].pos()).collect();

        match (self.kind, offs.as_slice()) {
            (SegmentType::Move, _) => Vec::new(),
            (SegmentType::Line, _) | (_, []) => vec![PathSeg::Line(Line::new(start, end))],
            (SegmentType::Curve, [c]) => vec![PathSeg::Quad(QuadBez::new(start, *c, end))],
            (SegmentType::Curve, [c1, .., c2]) => {
                vec![PathSeg::Cubic(CubicBez::new(start, *c1, *c2, end))]
            }
            (SegmentType::QCurve, controls) => {
                let mut segs = Vec::with_capacity(controls.len());
                let mut from = start;
                for (k, c) in controls.iter().enumerate() {
                    let to = match controls.get(k + 1) {
                        Some(next) => c.midpoint(*next),
                        None => end,
                    };
                    segs.push(PathSeg::Quad(QuadBez::new(from, *c, to)));
                    from = to;
                }
                segs
            }
        }
    }

    /// The segment as a single cubic, when it is a line or a simple curve
    ///
    /// Lines get handles at one and two thirds; single-control curves are
    /// degree-raised. Multi-control quadratic runs return `None`.
    pub fn to_cubic(&self, path: &Path) -> Option<CubicBez> {
        let segs = self.to_path_segs(path);
        match segs.as_slice() {
            [PathSeg::Line(line)] => Some(CubicBez::new(
                line.p0,
                line.p0.lerp(line.p1, 1.0 / 3.0),
                line.p0.lerp(line.p1, 2.0 / 3.0),
                line.p1,
            )),
            [PathSeg::Quad(quad)] => Some(quad.raise()),
            [PathSeg::Cubic(cubic)] => Some(*cubic),
            _ => None,
        }
    }
}
