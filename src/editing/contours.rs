// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Operations that create, merge or split whole paths of a glyph

use crate::geometry::EPSILON;
use crate::model::{EntityId, Glyph, Path, PathPoint, SegmentType};

/// One end of an open path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathEnd {
    Start,
    End,
}

/// Join two open path ends
///
/// Joining the two ends of the same path closes it. Otherwise `b` is
/// appended to `a` (after reversing either so the chosen ends meet) and
/// removed from the glyph. Coincident end points are merged into one. The
/// result closes itself if its first and last points coincide.
///
/// Returns the ID of the surviving path.
pub fn join_paths(glyph: &mut Glyph, a: EntityId, a_end: PathEnd, b: EntityId, b_end: PathEnd) -> EntityId {
    if a == b {
        if a_end != b_end
            && let Some(path) = glyph.path_mut(a)
        {
            close_path(path);
        }
        return a;
    }

    let Some(mut other) = glyph.path(b).filter(|p| p.is_open()).cloned() else {
        return a;
    };
    let Some(path) = glyph.path_mut(a).filter(|p| p.is_open()) else {
        return a;
    };

    if a_end == PathEnd::Start {
        path.reverse();
    }
    if b_end == PathEnd::End {
        other.reverse();
    }

    let mut incoming = other.points().to_vec();
    let seam = incoming[0];
    let dangling = path.trailing_off_curves();
    let last_on = path.last_on_curve().map(|i| path.points()[i].pos());

    if dangling == 0 && last_on.is_some_and(|p| p.distance(seam.pos()) < EPSILON) {
        incoming.remove(0);
    } else {
        if dangling == 1 {
            path.push_point(PathPoint::off_curve(seam.pos()));
        }
        incoming[0].kind = Some(if dangling > 0 {
            SegmentType::Curve
        } else {
            SegmentType::Line
        });
    }

    path.points_mut().extend(incoming);
    path.mark_dirty();
    if ends_coincide(path) {
        close_path(path);
    }
    glyph.remove_path(b);
    tracing::debug!("joined path {:?} into {:?}", b, a);
    a
}

/// Break a path at the on-curve point `index`
///
/// An open path splits into two open paths that both contain the break
/// point. A closed path opens at that point, which then appears at both
/// ends.
///
/// Returns the IDs of the resulting paths.
pub fn break_path(glyph: &mut Glyph, id: EntityId, index: usize) -> Vec<EntityId> {
    let Some(position) = glyph.path_index(id) else {
        return Vec::new();
    };
    let path = &mut glyph.paths[position];
    assert!(
        path.points()[index].is_on_curve(),
        "paths can only be broken at on-curve points"
    );

    if path.is_closed() {
        path.set_start_point(index);
        let first = path.points()[0];
        let mut tail = first;
        tail.selected = false;
        path.push_point(tail);
        let head = &mut path.points_mut()[0];
        head.kind = Some(SegmentType::Move);
        head.smooth = false;
        path.set_open(true);
        return vec![id];
    }

    if Some(index) == path.first_on_curve() || Some(index) == path.last_on_curve() {
        return vec![id];
    }

    let mut rest = path.points_mut().split_off(index + 1);
    let mut start = path.points()[index];
    start.kind = Some(SegmentType::Move);
    start.smooth = false;
    start.selected = false;
    rest.insert(0, start);
    path.mark_dirty();

    let new_id = glyph.next_path_id();
    glyph.insert_path(position + 1, Path::new(new_id, rest, true));
    vec![id, new_id]
}

/// Reverse path directions
///
/// Reverses `target` when given; otherwise every path holding a selected
/// point, or every path of the glyph when nothing is selected.
///
/// Returns the IDs of the reversed paths.
pub fn reverse_paths(glyph: &mut Glyph, target: Option<EntityId>) -> Vec<EntityId> {
    let any_selected = glyph.paths.iter().any(Path::has_selection);
    glyph
        .paths
        .iter_mut()
        .filter(|p| match target {
            Some(id) => p.id() == id,
            None => !any_selected || p.has_selection(),
        })
        .map(|p| {
            p.reverse();
            p.id()
        })
        .collect()
}

fn ends_coincide(path: &Path) -> bool {
    let (Some(first), Some(last)) = (path.first_on_curve(), path.last_on_curve()) else {
        return false;
    };
    first != last
        && path.trailing_off_curves() == 0
        && path.points()[first].pos().distance(path.points()[last].pos()) < EPSILON
}

/// Close an open path, merging a last point that sits on the first
fn close_path(path: &mut Path) {
    if !path.is_open() {
        return;
    }
    if ends_coincide(path) {
        let last = path.remove_point(path.len() - 1);
        if let Some(first) = path.points_mut().first_mut() {
            first.kind = last.kind;
            first.smooth = last.smooth;
        }
        path.set_open(false);
    } else {
        path.close();
    }
}
