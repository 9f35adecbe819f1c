// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Move/constrain engine.
//!
//! `apply_move` translates the selected points of one path and repositions
//! unselected neighbours so smooth points stay smooth. It works in two
//! passes over the points, starting at the first on-curve point:
//!
//! 1. Move: selected points translate by `delta`. Unless sliding, the
//!    off-curve handles of a selected on-curve follow it. In nudge mode the
//!    handles of a cubic whose two ends differ in selection are rescaled
//!    instead (see [`nudge_curve`]).
//! 2. Constrain: for every smooth on-curve point, handles that did not move
//!    are rotated, projected or slid so the point stays tangent-continuous.
//!    Pass 2 reads the "moved" flags of pass 1 only and never touches a
//!    selected point, so every selected point ends exactly at
//!    `old + delta`.

use crate::geometry::{EPSILON, line_projection, rotate_point_around_ref_line};
use crate::model::Path;
use kurbo::{Point, Vec2};

/// Per-call bookkeeping shared by both passes
struct MoveState {
    delta: Vec2,
    slide: bool,
    selected: Vec<bool>,
    old: Vec<Point>,
    moved: Vec<bool>,
}

/// Translate the selected points of `path` by `delta`
///
/// `nudge` rescales the handles of partially selected cubic segments;
/// `slide` keeps handles on their original direction lines instead of
/// dragging them along. Nudge takes precedence when both are set.
///
/// Returns true (and marks the path dirty) if any point moved.
pub fn apply_move(path: &mut Path, delta: Vec2, nudge: bool, slide: bool) -> bool {
    if path.is_empty() || (delta.x == 0.0 && delta.y == 0.0) || !path.has_selection() {
        return false;
    }

    let len = path.len();
    let start = if path.is_closed() {
        path.first_on_curve().unwrap_or(0)
    } else {
        0
    };
    let order: Vec<usize> = (0..len).map(|k| (start + k) % len).collect();

    let mut state = MoveState {
        delta,
        slide: slide && !nudge,
        selected: path.points().iter().map(|p| p.selected).collect(),
        old: path.points().iter().map(|p| p.pos()).collect(),
        moved: vec![false; len],
    };

    let nudged = if nudge {
        nudge_partial_curves(path, &mut state)
    } else {
        vec![false; len]
    };

    move_pass(path, &order, &mut state, &nudged);

    if !state.moved.iter().any(|&m| m) {
        return false;
    }

    constrain_pass(path, &order, &state);
    path.mark_dirty();
    true
}

/// Rescale the handles of a cubic segment whose end `on2` moves by `delta`
///
/// `on1` stays fixed. Each axis is scaled about `on1` by the ratio of the
/// segment's new extent to its old extent, which maps `on2` onto its new
/// position and stretches both handles with it. An axis whose old extent
/// is zero cannot be scaled; there the handle next to `on2` translates with
/// it and the handle next to `on1` stays put.
///
/// Returns the new positions of `off1` and `off2`.
pub fn nudge_curve(on1: Point, off1: Point, off2: Point, on2: Point, delta: Vec2) -> (Point, Point) {
    let scale_axis = |fixed: f64, moving: f64, d: f64, handle: f64, near_moving: bool| {
        let extent = moving - fixed;
        if extent.abs() < EPSILON {
            if near_moving { handle + d } else { handle }
        } else {
            fixed + (handle - fixed) * (extent + d) / extent
        }
    };

    let flat_x = (on2.x - on1.x).abs() < EPSILON && delta.x != 0.0;
    let flat_y = (on2.y - on1.y).abs() < EPSILON && delta.y != 0.0;
    if flat_x || flat_y {
        tracing::warn!(
            "nudge: zero-extent curve axis (x: {}, y: {}), handle translated rigidly",
            flat_x,
            flat_y
        );
    }

    let new_off1 = Point::new(
        scale_axis(on1.x, on2.x, delta.x, off1.x, false),
        scale_axis(on1.y, on2.y, delta.y, off1.y, false),
    );
    let new_off2 = Point::new(
        scale_axis(on1.x, on2.x, delta.x, off2.x, true),
        scale_axis(on1.y, on2.y, delta.y, off2.y, true),
    );
    (new_off1, new_off2)
}

/// Apply [`nudge_curve`] to every cubic with exactly one selected end
///
/// Returns a mask of the handles it repositioned.
fn nudge_partial_curves(path: &mut Path, state: &mut MoveState) -> Vec<bool> {
    let mut nudged = vec![false; path.len()];
    for seg in path.segments() {
        if seg.is_move() || seg.off_curves.len() != 2 || seg.start == seg.end {
            continue;
        }
        if state.selected[seg.start] == state.selected[seg.end] {
            continue;
        }

        // Orient so the moving on-curve is `on2`
        let (on1, off1, off2, on2) = if state.selected[seg.end] {
            (seg.start, seg.off_curves[0], seg.off_curves[1], seg.end)
        } else {
            (seg.end, seg.off_curves[1], seg.off_curves[0], seg.start)
        };

        let (new1, new2) = nudge_curve(
            state.old[on1],
            state.old[off1],
            state.old[off2],
            state.old[on2],
            state.delta,
        );
        for (index, pos) in [(off1, new1), (off2, new2)] {
            if state.selected[index] {
                continue;
            }
            path.points_mut()[index].set_pos(pos);
            state.moved[index] = true;
            nudged[index] = true;
        }
    }
    nudged
}

/// Pass 1: translate the selection and the handles that follow it
fn move_pass(path: &mut Path, order: &[usize], state: &mut MoveState, nudged: &[bool]) {
    for &i in order {
        if !state.selected[i] {
            continue;
        }
        if !state.moved[i] {
            path.points_mut()[i].translate(state.delta);
            state.moved[i] = true;
        }
        if path.points()[i].is_off_curve() || state.slide {
            continue;
        }

        for neighbor in [path.prev_index(i), path.next_index(i)].into_iter().flatten() {
            let point = path.points()[neighbor];
            if point.is_on_curve()
                || state.selected[neighbor]
                || state.moved[neighbor]
                || nudged[neighbor]
            {
                continue;
            }
            path.points_mut()[neighbor].translate(state.delta);
            state.moved[neighbor] = true;
        }
    }
}

/// Pass 2: restore tangency around smooth on-curve points
fn constrain_pass(path: &mut Path, order: &[usize], state: &MoveState) {
    for &i in order {
        let point = path.points()[i];
        if point.is_off_curve() || !point.smooth || point.is_move() {
            continue;
        }
        let (Some(prev), Some(next)) = (path.prev_index(i), path.next_index(i)) else {
            continue;
        };
        if prev == next {
            continue;
        }

        let prev_off = path.points()[prev].is_off_curve();
        let next_off = path.points()[next].is_off_curve();
        match (prev_off, next_off) {
            (true, true) => constrain_handles(path, i, prev, next, state),
            (true, false) => constrain_straddle(path, i, prev, next, state),
            (false, true) => constrain_straddle(path, i, next, prev, state),
            (false, false) => {}
        }
    }
}

/// Smooth point between two off-curve handles
fn constrain_handles(path: &mut Path, i: usize, a: usize, b: usize, state: &MoveState) {
    let on = path.points()[i].pos();
    let (moved, selected) = (&state.moved, &state.selected);

    if moved[i] {
        if state.slide && !selected[a] && !selected[b] {
            for h in [a, b] {
                let slid = slide_handle(state.old[h], on, state.delta);
                path.points_mut()[h].set_pos(slid);
            }
        } else if selected[a] != selected[b] {
            let (anchor, other) = if selected[a] { (a, b) } else { (b, a) };
            rotate_onto_ray(path, anchor, i, other);
        }
    } else if moved[a] != moved[b] {
        let (anchor, other) = if moved[a] { (a, b) } else { (b, a) };
        if !selected[other] {
            rotate_onto_ray(path, anchor, i, other);
        }
    }
}

/// Smooth point between handle `h` and on-curve neighbour `o`
fn constrain_straddle(path: &mut Path, i: usize, h: usize, o: usize, state: &MoveState) {
    let on = path.points()[i].pos();
    let (moved, selected) = (&state.moved, &state.selected);

    if moved[i] {
        if selected[h] {
            return;
        }
        if state.slide {
            let slid = slide_handle(state.old[h], on, state.delta);
            path.points_mut()[h].set_pos(slid);
        }
        rotate_onto_ray(path, o, i, h);
    } else if moved[o] && !selected[h] {
        let other = path.points()[o].pos();
        let handle = path.points()[h].pos();
        let (projected, _) = line_projection(other, on, handle, false);
        path.points_mut()[h].set_pos(projected);
    } else if moved[h] && !selected[o] && !path.points()[o].is_move() {
        let handle = path.points()[h].pos();
        let other = path.points()[o].pos();
        let (projected, _) = line_projection(handle, on, other, false);
        path.points_mut()[o].set_pos(projected);
    }
}

/// Put `target` on the ray from `anchor` through `pivot`, keeping its
/// distance from `pivot`
fn rotate_onto_ray(path: &mut Path, anchor: usize, pivot: usize, target: usize) {
    let rotated = rotate_point_around_ref_line(
        path.points()[anchor].pos(),
        path.points()[pivot].pos(),
        path.points()[target].pos(),
    );
    path.points_mut()[target].set_pos(rotated);
}

/// Slide a handle along the line from its old position to the moved
/// on-curve point
///
/// The rigidly translated position is projected onto that line, so the
/// handle keeps the on-curve's new position in line with where it was.
fn slide_handle(old_handle: Point, new_on_curve: Point, delta: Vec2) -> Point {
    let (projected, _) = line_projection(old_handle, new_on_curve, old_handle + delta, false);
    projected
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{IdAllocator, PathPoint, SegmentType};

    fn path(points: Vec<PathPoint>, open: bool) -> Path {
        Path::new(IdAllocator::new().next_id(), points, open)
    }

    fn on(x: f64, y: f64, kind: SegmentType) -> PathPoint {
        PathPoint::on_curve((x, y), kind)
    }

    fn off(x: f64, y: f64) -> PathPoint {
        PathPoint::off_curve((x, y))
    }

    /// Closed cubic with a smooth point at index 2 flanked by handles 1 and 3
    fn six_point_closed() -> Path {
        path(
            vec![
                on(0.0, 0.0, SegmentType::Line),
                off(0.0, 50.0),
                on(50.0, 100.0, SegmentType::Curve).with_smooth(true),
                off(100.0, 100.0),
                off(150.0, 50.0),
                on(150.0, 0.0, SegmentType::Curve),
            ],
            false,
        )
    }

    fn positions(path: &Path) -> Vec<Point> {
        path.points().iter().map(|p| p.pos()).collect()
    }

    fn collinear(a: Point, b: Point, c: Point) -> bool {
        ((b - a).cross(c - a)).abs() < 1e-6
    }

    #[test]
    fn zero_delta_is_a_noop() {
        let mut p = six_point_closed();
        p.points_mut()[2].selected = true;
        let before = positions(&p);
        assert!(!apply_move(&mut p, Vec2::ZERO, false, false));
        assert_eq!(positions(&p), before);
        assert!(!p.is_dirty());
    }

    #[test]
    fn empty_selection_does_not_move() {
        let mut p = six_point_closed();
        assert!(!apply_move(&mut p, Vec2::new(5.0, 5.0), false, false));
        assert!(!p.is_dirty());
    }

    #[test]
    fn selected_points_move_exactly() {
        let delta = Vec2::new(7.25, -3.5);
        for selection in [vec![2], vec![1], vec![0, 3], vec![1, 2, 4]] {
            let mut p = six_point_closed();
            for &i in &selection {
                p.points_mut()[i].selected = true;
            }
            let before = positions(&p);
            assert!(apply_move(&mut p, delta, false, false));
            for &i in &selection {
                assert_eq!(p.points()[i].pos(), before[i] + delta);
            }
            assert!(p.is_dirty());
        }
    }

    #[test]
    fn smooth_point_carries_both_handles() {
        let mut p = six_point_closed();
        p.points_mut()[2].selected = true;
        let before = positions(&p);
        let delta = Vec2::new(10.0, 20.0);
        apply_move(&mut p, delta, false, false);
        assert_eq!(p.points()[1].pos(), before[1] + delta);
        assert_eq!(p.points()[3].pos(), before[3] + delta);
        assert_eq!(p.points()[4].pos(), before[4]);
    }

    #[test]
    fn slide_keeps_handles_on_their_lines() {
        let mut p = six_point_closed();
        p.points_mut()[2].selected = true;
        let before = positions(&p);
        let delta = Vec2::new(10.0, 0.0);
        apply_move(&mut p, delta, false, true);

        let new_on = p.points()[2].pos();
        assert_eq!(new_on, before[2] + delta);
        for h in [1, 3] {
            let new_handle = p.points()[h].pos();
            assert!(collinear(before[h], new_on, new_handle));
        }
        // Handle 3 sits on the horizontal through the point, so it slides
        // rigidly; handle 1 is off-axis and its distance changes.
        let old_dist = before[1].distance(before[2]);
        let new_dist = p.points()[1].pos().distance(new_on);
        assert!((old_dist - new_dist).abs() > 1e-6);
    }

    #[test]
    fn moving_one_handle_rotates_the_other() {
        let mut p = six_point_closed();
        p.points_mut()[1].selected = true;
        let before = positions(&p);
        apply_move(&mut p, Vec2::new(-20.0, 0.0), false, false);

        let on = p.points()[2].pos();
        let a = p.points()[1].pos();
        let b = p.points()[3].pos();
        assert!(collinear(a, on, b));
        assert!((b.distance(on) - before[3].distance(before[2])).abs() < 1e-9);
        // b is on the far side of the on-curve point from a
        assert!((a - on).dot(b - on) < 0.0);
    }

    #[test]
    fn corner_points_are_not_constrained() {
        let mut p = six_point_closed();
        p.points_mut()[2].smooth = false;
        p.points_mut()[1].selected = true;
        let before = positions(&p);
        apply_move(&mut p, Vec2::new(-20.0, 0.0), false, false);
        assert_eq!(p.points()[3].pos(), before[3]);
    }

    #[test]
    fn straddling_handle_follows_moved_point() {
        // line (0,0)->(100,0) meets curve at smooth (100,0)
        let mut p = path(
            vec![
                on(0.0, 0.0, SegmentType::Move),
                on(100.0, 0.0, SegmentType::Line).with_smooth(true),
                off(150.0, 0.0),
                off(200.0, 50.0),
                on(200.0, 100.0, SegmentType::Curve),
            ],
            true,
        );
        p.points_mut()[0].selected = true;
        apply_move(&mut p, Vec2::new(0.0, -50.0), false, false);

        let start = p.points()[0].pos();
        let smooth = p.points()[1].pos();
        let handle = p.points()[2].pos();
        assert_eq!(start, Point::new(0.0, -50.0));
        assert!(collinear(start, smooth, handle));
        assert!((handle - smooth).dot(smooth - start) > 0.0);
    }

    #[test]
    fn selected_handle_moves_neighbouring_line_point_onto_tangent() {
        let mut p = path(
            vec![
                on(0.0, 0.0, SegmentType::Move),
                on(100.0, 0.0, SegmentType::Line).with_smooth(true),
                off(150.0, 0.0),
                off(200.0, 50.0),
                on(200.0, 100.0, SegmentType::Curve),
            ],
            true,
        );
        p.points_mut()[2].selected = true;
        apply_move(&mut p, Vec2::new(0.0, 10.0), false, false);
        // The start point is a Move point and is never adjusted
        assert_eq!(p.points()[0].pos(), Point::new(0.0, 0.0));
        assert_eq!(p.points()[2].pos(), Point::new(150.0, 10.0));
    }

    #[test]
    fn open_path_handles_do_not_wrap() {
        let mut p = path(
            vec![
                on(0.0, 0.0, SegmentType::Move),
                off(0.0, 50.0),
                off(50.0, 100.0),
                on(100.0, 100.0, SegmentType::Curve),
                off(150.0, 100.0),
            ],
            true,
        );
        p.points_mut()[0].selected = true;
        let before = positions(&p);
        apply_move(&mut p, Vec2::new(5.0, 5.0), false, false);
        assert_eq!(p.points()[1].pos(), before[1] + Vec2::new(5.0, 5.0));
        assert_eq!(p.points()[4].pos(), before[4]);
    }

    #[test]
    fn nudge_rescales_handles() {
        let mut p = path(
            vec![
                on(0.0, 0.0, SegmentType::Move),
                off(0.0, 50.0),
                off(50.0, 100.0),
                on(100.0, 100.0, SegmentType::Curve),
            ],
            true,
        );
        p.points_mut()[3].selected = true;
        apply_move(&mut p, Vec2::new(100.0, 100.0), true, false);
        assert_eq!(p.points()[3].pos(), Point::new(200.0, 200.0));
        assert_eq!(p.points()[1].pos(), Point::new(0.0, 100.0));
        assert_eq!(p.points()[2].pos(), Point::new(100.0, 200.0));
    }

    #[test]
    fn nudge_with_zero_extent_falls_back_to_translation() {
        let (a, b) = nudge_curve(
            Point::new(0.0, 0.0),
            Point::new(10.0, 20.0),
            Point::new(10.0, 80.0),
            Point::new(0.0, 100.0),
            Vec2::new(5.0, 0.0),
        );
        assert_eq!(a, Point::new(10.0, 20.0));
        assert_eq!(b, Point::new(15.0, 80.0));
        assert!(a.x.is_finite() && b.x.is_finite());
    }
}
