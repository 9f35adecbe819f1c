// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Editable path: an ordered list of points, open or closed.
//!
//! Point order defines both geometry and winding. An open path starts with
//! a `Move` point and no other point is `Move`; a closed path has no `Move`
//! point and its last point connects back to the first.
//!
//! Index arithmetic never wraps implicitly. `prev_index` / `next_index`
//! wrap only for closed paths, and `point_at` rejects out-of-range indices
//! on open paths.

use super::entity_id::EntityId;
use super::point::{PathPoint, SegmentType};
use super::segment::PathSegment;
use kurbo::{BezPath, PathSeg};

/// A path in a glyph outline
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    id: EntityId,
    points: Vec<PathPoint>,
    open: bool,
    dirty: bool,
}

impl Path {
    pub fn new(id: EntityId, points: Vec<PathPoint>, open: bool) -> Self {
        Self {
            id,
            points,
            open,
            dirty: false,
        }
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn points(&self) -> &[PathPoint] {
        &self.points
    }

    /// Mutable access to the raw point list
    ///
    /// Callers are responsible for keeping the open/closed invariants and
    /// for calling [`Path::mark_dirty`].
    pub fn points_mut(&mut self) -> &mut Vec<PathPoint> {
        &mut self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn is_closed(&self) -> bool {
        !self.open
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Clear the dirty flag, returning its previous value
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    // ===== INDEXING =====

    /// Resolve a possibly negative or overflowing index
    ///
    /// Closed paths wrap (`index.rem_euclid(len)`); open paths must be
    /// addressed in range.
    pub fn wrap_index(&self, index: isize) -> usize {
        let len = self.points.len() as isize;
        assert!(len > 0, "indexing into an empty path");
        if self.open {
            assert!(
                (0..len).contains(&index),
                "index {index} out of range for open path of {len} points"
            );
            index as usize
        } else {
            index.rem_euclid(len) as usize
        }
    }

    pub fn point_at(&self, index: isize) -> &PathPoint {
        &self.points[self.wrap_index(index)]
    }

    pub fn point_at_mut(&mut self, index: isize) -> &mut PathPoint {
        let i = self.wrap_index(index);
        &mut self.points[i]
    }

    /// Previous index, wrapping only on closed paths
    pub fn prev_index(&self, index: usize) -> Option<usize> {
        if index > 0 {
            Some(index - 1)
        } else if !self.open && !self.points.is_empty() {
            Some(self.points.len() - 1)
        } else {
            None
        }
    }

    /// Next index, wrapping only on closed paths
    pub fn next_index(&self, index: usize) -> Option<usize> {
        if index + 1 < self.points.len() {
            Some(index + 1)
        } else if !self.open && !self.points.is_empty() {
            Some(0)
        } else {
            None
        }
    }

    /// Position of `point` in this path, by identity
    ///
    /// Panics if the reference does not point into this path's storage.
    pub fn index_of(&self, point: &PathPoint) -> usize {
        self.points
            .iter()
            .position(|p| std::ptr::eq(p, point))
            .unwrap_or_else(|| panic!("point does not belong to path {:?}", self.id))
    }

    /// Nearest on-curve point before `index`, following wrap rules
    pub fn prev_on_curve(&self, index: usize) -> Option<usize> {
        let mut i = index;
        for _ in 0..self.points.len() {
            i = self.prev_index(i)?;
            if self.points[i].is_on_curve() {
                return Some(i);
            }
        }
        None
    }

    /// Nearest on-curve point after `index`, following wrap rules
    pub fn next_on_curve(&self, index: usize) -> Option<usize> {
        let mut i = index;
        for _ in 0..self.points.len() {
            i = self.next_index(i)?;
            if self.points[i].is_on_curve() {
                return Some(i);
            }
        }
        None
    }

    pub fn first_on_curve(&self) -> Option<usize> {
        self.points.iter().position(|p| p.is_on_curve())
    }

    pub fn last_on_curve(&self) -> Option<usize> {
        self.points.iter().rposition(|p| p.is_on_curve())
    }

    pub fn on_curve_count(&self) -> usize {
        self.points.iter().filter(|p| p.is_on_curve()).count()
    }

    /// Off-curve points after the last on-curve of an open path
    ///
    /// These exist transiently while the pen tool drags out a handle.
    pub fn trailing_off_curves(&self) -> usize {
        if !self.open {
            return 0;
        }
        self.points.iter().rev().take_while(|p| p.is_off_curve()).count()
    }

    // ===== SEGMENTS =====

    /// The derived segment list
    ///
    /// On an open path segment 0 is the lone `Move` point and trailing
    /// off-curves belong to no segment. On a closed path segment 0 is the
    /// one ending at the first on-curve point.
    pub fn segments(&self) -> Vec<PathSegment> {
        let on_curves: Vec<(usize, SegmentType)> = self
            .points
            .iter()
            .enumerate()
            .filter_map(|(i, p)| p.kind.map(|k| (i, k)))
            .collect();
        if on_curves.is_empty() {
            return Vec::new();
        }

        let len = self.points.len();
        let mut segments = Vec::with_capacity(on_curves.len());

        if self.open {
            let (first, first_kind) = on_curves[0];
            segments.push(PathSegment {
                start: first,
                off_curves: Vec::new(),
                end: first,
                kind: first_kind,
            });
            for pair in on_curves.windows(2) {
                let (start, _) = pair[0];
                let (end, kind) = pair[1];
                segments.push(PathSegment {
                    start,
                    off_curves: (start + 1..end).collect(),
                    end,
                    kind,
                });
            }
        } else {
            let count = on_curves.len();
            for k in 0..count {
                let (end, kind) = on_curves[k];
                let (start, _) = on_curves[(k + count - 1) % count];
                let mut off_curves = Vec::new();
                let mut i = (start + 1) % len;
                while i != end {
                    off_curves.push(i);
                    i = (i + 1) % len;
                }
                segments.push(PathSegment {
                    start,
                    off_curves,
                    end,
                    kind,
                });
            }
        }
        segments
    }

    /// Index into [`Path::segments`] of the segment owning the point at
    /// `index`
    ///
    /// Off-curve points belong to the segment that ends at the next
    /// on-curve point. Trailing off-curves of an open path belong to no
    /// segment and panic.
    pub fn segment_index_at(&self, index: usize) -> usize {
        assert!(index < self.points.len(), "point index {index} out of range");
        self.segments()
            .iter()
            .position(|seg| seg.point_indices().any(|i| i == index))
            .unwrap_or_else(|| panic!("point {index} is not part of any segment"))
    }

    /// Segment index of a point held by reference
    pub fn segment_index_of(&self, point: &PathPoint) -> usize {
        self.segment_index_at(self.index_of(point))
    }

    /// The segment that ends at the on-curve point `index`
    pub fn segment_ending_at(&self, index: usize) -> Option<PathSegment> {
        self.segments().into_iter().find(|seg| seg.end == index)
    }

    // ===== MUTATION =====

    pub fn insert_point(&mut self, index: usize, point: PathPoint) {
        self.points.insert(index, point);
        self.dirty = true;
    }

    pub fn push_point(&mut self, point: PathPoint) {
        self.points.push(point);
        self.dirty = true;
    }

    pub fn remove_point(&mut self, index: usize) -> PathPoint {
        self.dirty = true;
        self.points.remove(index)
    }

    /// Reverse the path direction
    ///
    /// Each on-curve point takes over the segment type of the on-curve that
    /// followed it, so every segment keeps its type. On an open path the
    /// former last point becomes the new `Move`. Reversing twice restores
    /// the original list.
    ///
    /// A dangling handle left by the pen tool has no segment to belong to
    /// once its on-curve becomes the `Move` point, so it is dropped.
    pub fn reverse(&mut self) {
        let dangling = self.trailing_off_curves();
        if dangling > 0 {
            self.points.truncate(self.points.len() - dangling);
            self.dirty = true;
            tracing::debug!("reverse: dropped {} dangling handle point(s)", dangling);
        }
        if self.points.len() < 2 {
            return;
        }

        let new_kinds: Vec<Option<SegmentType>> = (0..self.points.len())
            .map(|i| {
                if self.points[i].is_off_curve() {
                    return None;
                }
                match self.next_on_curve(i) {
                    Some(next) if next != i => self.points[next].kind,
                    Some(_) => self.points[i].kind,
                    None => Some(SegmentType::Move),
                }
            })
            .collect();

        for (point, kind) in self.points.iter_mut().zip(new_kinds) {
            point.kind = kind;
        }
        self.points.reverse();
        self.dirty = true;
    }

    /// Rotate a closed path so `points[index]` becomes the first point
    pub fn set_start_point(&mut self, index: usize) {
        assert!(!self.open, "cannot set the start point of an open path");
        assert!(index < self.points.len(), "start index {index} out of range");
        assert!(
            self.points[index].is_on_curve(),
            "start point must be an on-curve point"
        );
        if index == 0 {
            return;
        }
        self.points.rotate_left(index);
        self.dirty = true;
    }

    /// Close an open path
    ///
    /// The former `Move` point terminates the closing segment, which is a
    /// curve when trailing handles exist and a line otherwise.
    pub fn close(&mut self) {
        if !self.open {
            return;
        }
        let kind = if self.trailing_off_curves() > 0 {
            SegmentType::Curve
        } else {
            SegmentType::Line
        };
        if let Some(first) = self.points.first_mut() {
            first.kind = Some(kind);
        }
        self.open = false;
        self.dirty = true;
    }

    /// Mark the path open or closed without touching the points
    pub fn set_open(&mut self, open: bool) {
        if self.open != open {
            self.open = open;
            self.dirty = true;
        }
    }

    // ===== SELECTION =====

    pub fn has_selection(&self) -> bool {
        self.points.iter().any(|p| p.selected)
    }

    pub fn set_all_selected(&mut self, selected: bool) {
        for p in &mut self.points {
            p.selected = selected;
        }
    }

    pub fn selected_indices(&self) -> Vec<usize> {
        self.points
            .iter()
            .enumerate()
            .filter(|(_, p)| p.selected)
            .map(|(i, _)| i)
            .collect()
    }

    // ===== RENDERING =====

    /// Convert this path to a kurbo BezPath for rendering
    pub fn to_bezpath(&self) -> BezPath {
        let mut bez = BezPath::new();
        let segments = self.segments();
        let Some(first) = segments.first() else {
            return bez;
        };

        bez.move_to(self.points[first.end].pos());
        let closing = (!self.open).then_some(first);
        for seg in segments.iter().skip(1).chain(closing) {
            for path_seg in seg.to_path_segs(self) {
                match path_seg {
                    PathSeg::Line(line) => bez.line_to(line.p1),
                    PathSeg::Quad(quad) => bez.quad_to(quad.p1, quad.p2),
                    PathSeg::Cubic(cubic) => bez.curve_to(cubic.p1, cubic.p2, cubic.p3),
                }
            }
        }
        if !self.open {
            bez.close_path();
        }
        bez
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::entity_id::IdAllocator;

    fn open_triangle() -> Path {
        Path::new(
            IdAllocator::new().next_id(),
            vec![
                PathPoint::on_curve((0.0, 0.0), SegmentType::Move),
                PathPoint::on_curve((3.0, 2.0), SegmentType::Line),
                PathPoint::on_curve((0.0, 3.0), SegmentType::Line),
            ],
            true,
        )
    }

    /// Closed path whose list starts with two off-curves
    fn closed_curvy() -> Path {
        Path::new(
            IdAllocator::new().next_id(),
            vec![
                PathPoint::off_curve((0.0, 5.0)),
                PathPoint::off_curve((5.0, 10.0)),
                PathPoint::on_curve((10.0, 10.0), SegmentType::Curve),
                PathPoint::on_curve((10.0, 0.0), SegmentType::Line),
                PathPoint::on_curve((0.0, 0.0), SegmentType::Line),
            ],
            false,
        )
    }

    #[test]
    fn closed_paths_wrap_indices() {
        let path = closed_curvy();
        assert_eq!(path.wrap_index(-1), 4);
        assert_eq!(path.wrap_index(7), 2);
        assert_eq!(path.point_at(-1).pos(), kurbo::Point::new(0.0, 0.0));
        assert_eq!(path.prev_index(0), Some(4));
        assert_eq!(path.next_index(4), Some(0));
    }

    #[test]
    fn open_paths_do_not_wrap() {
        let path = open_triangle();
        assert_eq!(path.prev_index(0), None);
        assert_eq!(path.next_index(2), None);
    }

    #[test]
    #[should_panic]
    fn open_path_rejects_negative_index() {
        open_triangle().point_at(-1);
    }

    #[test]
    fn index_of_uses_identity() {
        let path = open_triangle();
        let point = &path.points()[1];
        assert_eq!(path.index_of(point), 1);
    }

    #[test]
    #[should_panic]
    fn index_of_foreign_point_panics() {
        let path = open_triangle();
        let other = open_triangle();
        path.index_of(&other.points()[1]);
    }

    #[test]
    fn open_segments_start_with_move() {
        let segs = open_triangle().segments();
        assert_eq!(segs.len(), 3);
        assert!(segs[0].is_move());
        assert_eq!((segs[1].start, segs[1].end), (0, 1));
        assert_eq!((segs[2].start, segs[2].end), (1, 2));
    }

    #[test]
    fn closed_segments_start_at_first_on_curve() {
        let path = closed_curvy();
        let segs = path.segments();
        assert_eq!(segs.len(), 3);
        assert_eq!(segs[0].end, 2);
        assert_eq!(segs[0].start, 4);
        assert_eq!(segs[0].off_curves, vec![0, 1]);
        assert_eq!(segs[0].kind, SegmentType::Curve);
        assert_eq!(path.segment_index_at(0), 0);
        assert_eq!(path.segment_index_at(3), 1);
        assert_eq!(path.segment_index_at(4), 2);
    }

    #[test]
    fn reverse_twice_round_trips() {
        for original in [open_triangle(), closed_curvy()] {
            let mut path = original.clone();
            path.reverse();
            assert_ne!(path.points(), original.points());
            path.reverse();
            assert_eq!(path.points(), original.points());
            assert_eq!(path.is_open(), original.is_open());
        }
    }

    #[test]
    fn reverse_open_path_moves_the_move_point() {
        let mut path = open_triangle();
        path.reverse();
        let kinds: Vec<_> = path.points().iter().map(|p| p.kind).collect();
        assert_eq!(
            kinds,
            vec![
                Some(SegmentType::Move),
                Some(SegmentType::Line),
                Some(SegmentType::Line)
            ]
        );
        assert_eq!(path.points()[0].pos(), kurbo::Point::new(0.0, 3.0));
    }

    #[test]
    fn reverse_closed_path_keeps_segment_types() {
        let mut path = closed_curvy();
        path.reverse();
        // Reversed order: (0,0) (10,0) (10,10) off(5,10) off(0,5)
        let curve_end = path
            .points()
            .iter()
            .position(|p| p.kind == Some(SegmentType::Curve))
            .unwrap();
        assert_eq!(path.points()[curve_end].pos(), kurbo::Point::new(0.0, 0.0));
        assert_eq!(path.segments().iter().filter(|s| s.off_curves.len() == 2).count(), 1);
    }

    #[test]
    fn reverse_drops_a_dangling_handle() {
        let mut path = Path::new(
            IdAllocator::new().next_id(),
            vec![
                PathPoint::on_curve((0.0, 0.0), SegmentType::Move),
                PathPoint::off_curve((0.0, 50.0)),
                PathPoint::off_curve((50.0, -50.0)),
                PathPoint::on_curve((100.0, 0.0), SegmentType::Curve).with_smooth(true),
                PathPoint::off_curve((150.0, 50.0)),
            ],
            true,
        );
        path.reverse();

        assert_eq!(path.len(), 4);
        assert_eq!(path.trailing_off_curves(), 0);
        assert_eq!(path.points()[0].pos(), kurbo::Point::new(100.0, 0.0));
        assert_eq!(path.points()[0].kind, Some(SegmentType::Move));
        assert_eq!(path.points()[1].pos(), kurbo::Point::new(50.0, -50.0));
        assert_eq!(path.points()[3].pos(), kurbo::Point::new(0.0, 0.0));
        assert_eq!(path.points()[3].kind, Some(SegmentType::Curve));
        assert!(path.is_open());
        assert!(path.is_dirty());
    }

    #[test]
    fn set_start_point_rotates() {
        let mut path = closed_curvy();
        path.set_start_point(3);
        assert_eq!(path.points()[0].pos(), kurbo::Point::new(10.0, 0.0));
        assert_eq!(path.len(), 5);
        assert!(path.is_dirty());
    }

    #[test]
    #[should_panic]
    fn set_start_point_on_open_path_panics() {
        open_triangle().set_start_point(1);
    }

    #[test]
    fn close_turns_move_into_line() {
        let mut path = open_triangle();
        path.close();
        assert!(path.is_closed());
        assert_eq!(path.points()[0].kind, Some(SegmentType::Line));
        assert_eq!(path.segments().len(), 3);
    }

    #[test]
    fn bezpath_has_one_element_per_segment() {
        let bez = closed_curvy().to_bezpath();
        // move, curve, line, line, close
        assert_eq!(bez.elements().len(), 5);
    }
}
