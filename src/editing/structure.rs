// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Structural edits on a single path: segment conversion, splitting,
//! point deletion and smooth toggling.
//!
//! Every function here keeps the open/closed invariants of [`Path`] and
//! marks the path dirty when it changes.

use crate::geometry::{join_curves, line_distance, rotate_point_around_ref_line};
use crate::model::{Path, PathPoint, PathSegment, SegmentType};
use kurbo::{ParamCurve, PathSeg, Point};

/// Handle positions used when a line is promoted to a curve
const LINE_TO_CURVE_HANDLES: (f64, f64) = (0.35, 0.65);

/// Control points closer than this to the chord count as a straight line
const STRAIGHT_TOLERANCE: f64 = 1e-6;

/// Turn the line ending at `index` into a cubic while the pen drags out a
/// handle
///
/// The handle next to the on-curve point mirrors `target` through it on
/// open paths, so the incoming tangent points away from the drag; on a
/// closed path it is placed at `target`. The handle next to the previous
/// on-curve point is the stashed off-curve, if any, or else a
/// zero-length handle on that point. A stash also restores the previous
/// point's smooth flag.
///
/// Returns the new index of the on-curve point.
pub fn coerce_segment_to_curve(
    path: &mut Path,
    index: usize,
    target: Point,
    stashed: Option<(PathPoint, bool)>,
) -> usize {
    let seg = line_segment_ending_at(path, index);
    let pos = path.points()[index].pos();

    let first = match stashed {
        Some((handle, _)) => PathPoint::off_curve(handle.pos()),
        None => PathPoint::off_curve(path.points()[seg.start].pos()),
    };
    let second = if path.is_open() {
        pos + (pos - target)
    } else {
        target
    };

    let at = splice_segment(path, &seg, vec![first, PathPoint::off_curve(second)]);
    let new_index = at + 2;
    let open = path.is_open();
    let point = &mut path.points_mut()[new_index];
    point.kind = Some(SegmentType::Curve);
    point.smooth = open;

    if let Some((_, smooth)) = stashed
        && let Some(prev) = path.prev_on_curve(new_index)
    {
        let prev_point = &mut path.points_mut()[prev];
        if !prev_point.is_move() {
            prev_point.smooth = smooth;
        }
    }
    path.mark_dirty();
    new_index
}

/// Promote the line ending at `index` to a cubic with handles on the line
///
/// Returns the new index of the on-curve point.
pub fn convert_line_to_curve(path: &mut Path, index: usize) -> usize {
    let seg = line_segment_ending_at(path, index);
    let a = path.points()[seg.start].pos();
    let b = path.points()[seg.end].pos();
    let (t1, t2) = LINE_TO_CURVE_HANDLES;

    let at = splice_segment(
        path,
        &seg,
        vec![
            PathPoint::off_curve(a.lerp(b, t1)),
            PathPoint::off_curve(a.lerp(b, t2)),
        ],
    );
    let new_index = at + 2;
    path.points_mut()[new_index].kind = Some(SegmentType::Curve);
    path.mark_dirty();
    new_index
}

/// Insert an on-curve point at parameter `t` of the segment ending at
/// `end`, preserving the segment's shape
///
/// Returns the index of the inserted on-curve point.
pub fn split_segment(path: &mut Path, end: usize, t: f64) -> usize {
    let seg = path
        .segment_ending_at(end)
        .filter(|seg| !seg.is_move())
        .unwrap_or_else(|| panic!("point {end} does not end a splittable segment"));
    let t = t.clamp(0.0, 1.0);
    let geometry = seg.to_path_segs(path);

    let (replacement, offset) = match geometry.as_slice() {
        [PathSeg::Line(line)] => (
            vec![PathPoint::on_curve(line.eval(t), SegmentType::Line)],
            0,
        ),
        [PathSeg::Cubic(cubic)] => {
            let left = cubic.subsegment(0.0..t);
            let right = cubic.subsegment(t..1.0);
            (
                vec![
                    PathPoint::off_curve(left.p1),
                    PathPoint::off_curve(left.p2),
                    PathPoint::on_curve(left.p3, SegmentType::Curve).with_smooth(true),
                    PathPoint::off_curve(right.p1),
                    PathPoint::off_curve(right.p2),
                ],
                2,
            )
        }
        [PathSeg::Quad(quad)] => {
            let left = quad.subsegment(0.0..t);
            let right = quad.subsegment(t..1.0);
            (
                vec![
                    PathPoint::off_curve(left.p1),
                    PathPoint::on_curve(left.p2, seg.kind).with_smooth(true),
                    PathPoint::off_curve(right.p1),
                ],
                1,
            )
        }
        quads => split_quad_run(quads, t),
    };

    let at = splice_segment(path, &seg, replacement);
    at + offset
}

/// Split a run of implied-on-curve quadratics
///
/// The piece containing `t` is split; the implied on-curve points that
/// bound it become explicit so the neighbouring pieces keep their shape.
fn split_quad_run(quads: &[PathSeg], t: f64) -> (Vec<PathPoint>, usize) {
    let quads: Vec<_> = quads
        .iter()
        .filter_map(|seg| match seg {
            PathSeg::Quad(q) => Some(*q),
            _ => None,
        })
        .collect();
    let count = quads.len();
    let scaled = t * count as f64;
    let k = (scaled.floor() as usize).min(count - 1);
    let u = scaled - k as f64;

    let mut points: Vec<PathPoint> = quads[..k]
        .iter()
        .map(|q| PathPoint::off_curve(q.p1))
        .collect();
    if k > 0 {
        points.push(PathPoint::on_curve(quads[k].p0, SegmentType::QCurve).with_smooth(true));
    }

    let left = quads[k].subsegment(0.0..u);
    let right = quads[k].subsegment(u..1.0);
    points.push(PathPoint::off_curve(left.p1));
    let offset = points.len();
    points.push(PathPoint::on_curve(left.p2, SegmentType::QCurve).with_smooth(true));
    points.push(PathPoint::off_curve(right.p1));

    if k + 1 < count {
        points.push(PathPoint::on_curve(quads[k].p2, SegmentType::QCurve).with_smooth(true));
    }
    points.extend(quads[k + 1..].iter().map(|q| PathPoint::off_curve(q.p1)));
    (points, offset)
}

/// Delete the selected points of `path`
///
/// With `preserve_shape`, removing an interior on-curve point between two
/// curves replaces both with a single fitted cubic. Endpoints of open
/// paths are always removed plainly.
///
/// Returns `false` when the deletion left fewer than two on-curve points
/// and the caller should remove the whole path.
pub fn delete_points(path: &mut Path, preserve_shape: bool) -> bool {
    let mut changed = false;
    while let Some(index) = path.points().iter().position(|p| p.selected) {
        changed = true;
        if path.points()[index].is_off_curve() {
            delete_off_curve(path, index);
        } else {
            delete_on_curve(path, index, preserve_shape);
        }
        path.mark_dirty();
        if path.on_curve_count() < 2 {
            return false;
        }
    }
    !changed || path.on_curve_count() >= 2
}

fn delete_off_curve(path: &mut Path, index: usize) {
    let trailing = path.trailing_off_curves();
    let kept = path.len() - trailing;
    if index >= kept {
        path.points_mut().truncate(kept);
        return;
    }

    let seg = path.segments().swap_remove(path.segment_index_at(index));
    if seg.kind == SegmentType::QCurve && seg.off_curves.len() > 1 {
        path.remove_point(index);
        return;
    }
    path.points_mut()[seg.end].kind = Some(SegmentType::Line);
    remove_indices(path, seg.off_curves);
}

fn delete_on_curve(path: &mut Path, index: usize, preserve_shape: bool) {
    if path.on_curve_count() <= 1 {
        path.points_mut().clear();
        return;
    }

    if path.is_open() {
        if Some(index) == path.first_on_curve() {
            if let Some(next) = path.next_on_curve(index) {
                path.points_mut().drain(index..next);
                if let Some(first) = path.points_mut().first_mut() {
                    first.kind = Some(SegmentType::Move);
                    first.smooth = false;
                }
            }
            return;
        }
        if Some(index) == path.last_on_curve() {
            if let Some(prev) = path.prev_on_curve(index) {
                path.points_mut().truncate(prev + 1);
            }
            return;
        }
    }

    let (Some(incoming), Some(next)) = (path.segment_ending_at(index), path.next_on_curve(index))
    else {
        path.remove_point(index);
        return;
    };
    let Some(outgoing) = path.segment_ending_at(next) else {
        path.remove_point(index);
        return;
    };

    if preserve_shape && !(incoming.is_line() && outgoing.is_line()) {
        if let (Some(a), Some(b)) = (incoming.to_cubic(path), outgoing.to_cubic(path)) {
            let joined = join_curves(a, b);
            let straight = line_distance(joined.p1, joined.p0, joined.p3) < STRAIGHT_TOLERANCE
                && line_distance(joined.p2, joined.p0, joined.p3) < STRAIGHT_TOLERANCE;
            let (replacement, kind) = if straight {
                (Vec::new(), SegmentType::Line)
            } else {
                (
                    vec![
                        PathPoint::off_curve(joined.p1),
                        PathPoint::off_curve(joined.p2),
                    ],
                    SegmentType::Curve,
                )
            };

            let mut removed = incoming.off_curves.clone();
            removed.push(index);
            removed.extend(&outgoing.off_curves);
            let at = shifted(next, &removed);
            let inserted = replacement.len();
            remove_indices(path, removed);
            path.points_mut().splice(at..at, replacement);
            path.points_mut()[at + inserted].kind = Some(kind);
            return;
        }
    }

    let mut removed = incoming.off_curves;
    removed.push(index);
    remove_indices(path, removed);
}

/// Toggle the smooth flag of the on-curve point at `index`
///
/// Turning a point smooth when exactly one neighbour is a handle rotates
/// that handle onto the line through the other neighbour. Points at the
/// ends of an open path and points between two handles only change the
/// flag.
pub fn toggle_smooth(path: &mut Path, index: usize) {
    let point = path.points()[index];
    assert!(point.is_on_curve(), "only on-curve points can be smooth");

    if point.smooth {
        path.points_mut()[index].smooth = false;
        path.mark_dirty();
        return;
    }
    path.points_mut()[index].smooth = true;
    path.mark_dirty();

    if point.is_move() {
        return;
    }
    let (Some(prev), Some(next)) = (path.prev_index(index), path.next_index(index)) else {
        return;
    };
    let handle = match (
        path.points()[prev].is_off_curve(),
        path.points()[next].is_off_curve(),
    ) {
        (true, false) => Some((prev, next)),
        (false, true) => Some((next, prev)),
        _ => None,
    };
    if let Some((h, o)) = handle {
        let rotated = rotate_point_around_ref_line(
            path.points()[o].pos(),
            point.pos(),
            path.points()[h].pos(),
        );
        path.points_mut()[h].set_pos(rotated);
    }
}

fn line_segment_ending_at(path: &Path, index: usize) -> PathSegment {
    path.segment_ending_at(index)
        .filter(PathSegment::is_line)
        .unwrap_or_else(|| panic!("point {index} does not end a line segment"))
}

/// Replace the off-curves of `seg` with `replacement`, inserted right
/// before the segment's end point
///
/// Returns the index of the first inserted point.
fn splice_segment(path: &mut Path, seg: &PathSegment, replacement: Vec<PathPoint>) -> usize {
    let at = shifted(seg.end, &seg.off_curves);
    remove_indices(path, seg.off_curves.clone());
    path.points_mut().splice(at..at, replacement);
    path.mark_dirty();
    at
}

/// Where `index` lands after the points in `removed` are deleted
fn shifted(index: usize, removed: &[usize]) -> usize {
    index - removed.iter().filter(|&&r| r < index).count()
}

fn remove_indices(path: &mut Path, mut indices: Vec<usize>) {
    indices.sort_unstable();
    indices.dedup();
    for &i in indices.iter().rev() {
        path.points_mut().remove(i);
    }
    path.mark_dirty();
}
