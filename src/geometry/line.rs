// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Straight-line projection, distance, rotation and intersection

use super::{EPSILON, Intersection};
use kurbo::{Line, Point};

/// Project `pt` onto the line through `p1` and `p2`
///
/// Returns the projected point and its parameter `t` (0 at `p1`, 1 at
/// `p2`). With `clamp_to_segment`, a `t` outside `[0, 1]` yields the nearest
/// endpoint together with the unclamped `t`. A degenerate line returns `p1`
/// with `t = 0`.
pub fn line_projection(p1: Point, p2: Point, pt: Point, clamp_to_segment: bool) -> (Point, f64) {
    let dir = p2 - p1;
    let len_sq = dir.hypot2();
    if len_sq < EPSILON * EPSILON {
        return (p1, 0.0);
    }

    let t = (pt - p1).dot(dir) / len_sq;
    if clamp_to_segment {
        if t < 0.0 {
            return (p1, t);
        }
        if t > 1.0 {
            return (p2, t);
        }
    }
    (p1 + dir * t, t)
}

/// Distance from `pt` to the segment `p1`-`p2` (not the infinite line)
pub fn line_distance(pt: Point, p1: Point, p2: Point) -> f64 {
    let (projected, _) = line_projection(p1, p2, pt, true);
    pt.distance(projected)
}

/// Rotate `pt` about `p2` onto the ray from `p1` through `p2`
///
/// The rotated point keeps its distance from `p2`. Used to keep the
/// handle opposite a moved handle collinear through a smooth point. A
/// zero-length reference line leaves `pt` where it is.
pub fn rotate_point_around_ref_line(p1: Point, p2: Point, pt: Point) -> Point {
    let dir = p2 - p1;
    let len = dir.hypot();
    if len < EPSILON {
        return pt;
    }
    let radius = pt.distance(p2);
    p2 + dir * (radius / len)
}

/// Intersection of two line segments
///
/// Parallel and zero-length segments never intersect; otherwise the
/// crossing is reported only when both parameters fall inside `[0, 1]`.
pub fn line_intersection(a: Line, b: Line) -> Option<Intersection> {
    let da = a.p1 - a.p0;
    let db = b.p1 - b.p0;
    let denom = da.cross(db);
    if denom.abs() < EPSILON {
        return None;
    }

    let offset = b.p0 - a.p0;
    let ta = offset.cross(db) / denom;
    let tb = offset.cross(da) / denom;
    if !(0.0..=1.0).contains(&ta) || !(0.0..=1.0).contains(&tb) {
        return None;
    }

    Some(Intersection {
        point: a.p0 + da * ta,
        t_line: ta,
        t_other: tb,
    })
}
