// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Hit testing methods for EditSession

use super::EditSession;
use crate::editing::contours::PathEnd;
use crate::geometry::{EPSILON, curve_projection, line_projection};
use crate::model::{EntityId, ItemRef, Path};
use kurbo::{PathSeg, Point, Rect, Shape};

/// The nearest point on a segment to a probe position
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentHit {
    pub path: EntityId,
    /// Index of the on-curve point ending the segment
    pub end: usize,
    /// Parameter along the whole segment, 0.0 at its start
    pub t: f64,
    pub point: Point,
    pub distance: f64,
}

impl EditSession {
    /// Hit test for a point
    ///
    /// Returns the closest point within `max_dist` pixels (the configured
    /// point radius when `None`). On-curve points win ties.
    pub fn hit_test_point(&self, pos: Point, max_dist: Option<f64>) -> Option<ItemRef> {
        let max_dist = self.design_distance(max_dist.unwrap_or(self.settings.point_hit_radius_px));

        let mut best: Option<(f64, bool, ItemRef)> = None;
        for path in &self.glyph.paths {
            for (index, point) in path.points().iter().enumerate() {
                let dist = point.pos().distance(pos);
                if dist > max_dist {
                    continue;
                }
                let candidate = (dist, point.is_on_curve(), ItemRef::Point {
                    path: path.id(),
                    index,
                });
                let better = match best {
                    None => true,
                    Some((d, on, _)) => dist < d || (dist == d && candidate.1 && !on),
                };
                if better {
                    best = Some(candidate);
                }
            }
        }

        let result = best.map(|(_, _, item)| item);
        tracing::debug!("[hit_test_point] pos=({}, {}) -> {:?}", pos.x, pos.y, result);
        result
    }

    /// Hit test for an anchor within the point radius
    pub fn hit_test_anchor(&self, pos: Point) -> Option<usize> {
        let max_dist = self.design_distance(self.settings.point_hit_radius_px);
        self.glyph
            .anchors
            .iter()
            .enumerate()
            .map(|(i, a)| (i, a.pos().distance(pos)))
            .filter(|(_, d)| *d <= max_dist)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(i, _)| i)
    }

    /// Hit test for a component
    ///
    /// A component is hit when `pos` lies inside its filled outline, or
    /// near its origin when the base outline is unknown. Components are
    /// tested in reverse order so topmost components are hit first.
    pub fn hit_test_component(&self, pos: Point) -> Option<usize> {
        let max_dist = self.design_distance(self.settings.point_hit_radius_px);
        self.glyph
            .components
            .iter()
            .enumerate()
            .rev()
            .find(|(_, component)| match self.component_outlines.get(&component.base) {
                Some(outline) => (component.transform * outline.clone()).winding(pos) != 0,
                None => component.origin().distance(pos) <= max_dist,
            })
            .map(|(i, _)| i)
    }

    /// The topmost item under `pos`: points, then anchors, then components
    pub fn hit_test_item(&self, pos: Point) -> Option<ItemRef> {
        self.hit_test_point(pos, None)
            .or_else(|| self.hit_test_anchor(pos).map(ItemRef::Anchor))
            .or_else(|| self.hit_test_component(pos).map(ItemRef::Component))
    }

    /// Hit test for path segments
    ///
    /// Returns the closest segment within `max_dist` pixels (the configured
    /// segment radius when `None`), along with the parameter of the nearest
    /// point on it.
    pub fn hit_test_segment(&self, pos: Point, max_dist: Option<f64>) -> Option<SegmentHit> {
        let max_dist =
            self.design_distance(max_dist.unwrap_or(self.settings.segment_hit_radius_px));
        self.glyph
            .paths
            .iter()
            .filter_map(|path| closest_segment(path, pos))
            .filter(|hit| hit.distance <= max_dist)
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }

    /// The open-path endpoint under `pos`, if any
    pub fn hit_test_endpoint(&self, pos: Point) -> Option<(EntityId, PathEnd)> {
        let ItemRef::Point { path, index } = self.hit_test_point(pos, None)? else {
            return None;
        };
        let p = self.glyph.path(path)?;
        if !p.is_open() {
            return None;
        }
        if Some(index) == p.first_on_curve() {
            Some((path, PathEnd::Start))
        } else if Some(index) == p.last_on_curve() && p.trailing_off_curves() == 0 {
            Some((path, PathEnd::End))
        } else {
            None
        }
    }

    /// Items inside `rect`, edges included
    ///
    /// Covers points (optionally skipping off-curve points), anchors,
    /// guidelines and components. A component is inside when its whole
    /// outline is, or its origin when the base outline is unknown.
    pub fn items_in_rect(&self, rect: Rect, include_off_curves: bool) -> Vec<ItemRef> {
        let rect = rect.abs().inflate(EPSILON, EPSILON);
        let points = self.glyph.paths.iter().flat_map(|path| {
            path.points()
                .iter()
                .enumerate()
                .filter(move |(_, p)| {
                    (include_off_curves || p.is_on_curve()) && rect.contains(p.pos())
                })
                .map(|(index, _)| ItemRef::Point {
                    path: path.id(),
                    index,
                })
        });
        let anchors = self
            .glyph
            .anchors
            .iter()
            .enumerate()
            .filter(|(_, a)| rect.contains(a.pos()))
            .map(|(i, _)| ItemRef::Anchor(i));
        let guidelines = self
            .glyph
            .guidelines
            .iter()
            .enumerate()
            .filter(|(_, g)| rect.contains(g.pos()))
            .map(|(i, _)| ItemRef::Guideline(i));
        let components = self
            .glyph
            .components
            .iter()
            .enumerate()
            .filter(|(_, component)| match self.component_outlines.get(&component.base) {
                Some(outline) => {
                    let bounds = (component.transform * outline.clone()).bounding_box();
                    rect.contains(bounds.origin()) && rect.contains(Point::new(bounds.x1, bounds.y1))
                }
                None => rect.contains(component.origin()),
            })
            .map(|(i, _)| ItemRef::Component(i));
        points
            .chain(anchors)
            .chain(guidelines)
            .chain(components)
            .collect()
    }
}

// ===== PRIVATE HELPERS =====

fn closest_segment(path: &Path, pos: Point) -> Option<SegmentHit> {
    let mut best: Option<SegmentHit> = None;
    for seg in path.segments().iter().filter(|s| !s.is_move()) {
        let pieces = seg.to_path_segs(path);
        let count = pieces.len() as f64;
        for (k, piece) in pieces.into_iter().enumerate() {
            let (point, u) = match piece {
                PathSeg::Line(line) => {
                    let (point, t) = line_projection(line.p0, line.p1, pos, true);
                    (point, t.clamp(0.0, 1.0))
                }
                PathSeg::Quad(quad) => curve_projection(quad.raise(), pos),
                PathSeg::Cubic(cubic) => curve_projection(cubic, pos),
            };
            let distance = point.distance(pos);
            if best.is_none_or(|b| distance < b.distance) {
                best = Some(SegmentHit {
                    path: path.id(),
                    end: seg.end,
                    t: (k as f64 + u) / count,
                    point,
                    distance,
                });
            }
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Anchor, Component, Glyph, Guideline, PathPoint, SegmentType};
    use kurbo::Affine;

    fn session() -> (EditSession, EntityId) {
        let mut glyph = Glyph::new("a", 500.0);
        let id = glyph.add_path(
            vec![
                PathPoint::on_curve((0.0, 0.0), SegmentType::Move),
                PathPoint::off_curve((0.0, 50.0)),
                PathPoint::off_curve((50.0, 100.0)),
                PathPoint::on_curve((100.0, 100.0), SegmentType::Curve),
                PathPoint::on_curve((200.0, 100.0), SegmentType::Line),
            ],
            true,
        );
        glyph.anchors.push(Anchor::new("top", Point::new(300.0, 300.0)));
        (EditSession::new(glyph), id)
    }

    #[test]
    fn point_hit_respects_radius_and_zoom() {
        let (mut session, id) = session();
        let hit = session.hit_test_point(Point::new(3.0, 3.0), None);
        assert_eq!(hit, Some(ItemRef::Point { path: id, index: 0 }));

        session.set_zoom(4.0);
        assert_eq!(session.hit_test_point(Point::new(3.0, 3.0), None), None);
    }

    #[test]
    fn segment_hit_reports_parameter() {
        let (session, id) = session();
        let hit = session.hit_test_segment(Point::new(150.0, 103.0), None).unwrap();
        assert_eq!(hit.path, id);
        assert_eq!(hit.end, 4);
        assert!((hit.t - 0.5).abs() < 1e-9);
        assert!((hit.distance - 3.0).abs() < 1e-9);
        assert!(session.hit_test_segment(Point::new(150.0, 150.0), None).is_none());
    }

    #[test]
    fn endpoints_of_open_paths() {
        let (session, id) = session();
        assert_eq!(
            session.hit_test_endpoint(Point::new(200.0, 100.0)),
            Some((id, PathEnd::End))
        );
        assert_eq!(
            session.hit_test_endpoint(Point::new(0.0, 0.0)),
            Some((id, PathEnd::Start))
        );
        assert_eq!(session.hit_test_endpoint(Point::new(100.0, 100.0)), None);
    }

    #[test]
    fn rubber_band_can_skip_off_curves() {
        let (session, _) = session();
        let rect = Rect::new(-10.0, -10.0, 60.0, 110.0);
        assert_eq!(session.items_in_rect(rect, true).len(), 3);
        assert_eq!(session.items_in_rect(rect, false).len(), 1);
    }

    #[test]
    fn rubber_band_includes_its_edges() {
        let (session, id) = session();
        let rect = Rect::new(200.0, 100.0, 100.0, 0.0);
        let items = session.items_in_rect(rect, false);
        assert!(items.contains(&ItemRef::Point { path: id, index: 3 }));
        assert!(items.contains(&ItemRef::Point { path: id, index: 4 }));
        assert_eq!(items.len(), 2);
    }

    #[test]
    fn rubber_band_selects_guidelines_and_components() {
        let (mut session, _) = session();
        session
            .glyph
            .guidelines
            .push(Guideline::new(Point::new(420.0, 20.0), 90.0));
        session
            .glyph
            .components
            .push(Component::new("b", Affine::translate((400.0, 0.0))));
        session
            .glyph
            .components
            .push(Component::new("c", Affine::translate((400.0, 0.0))));
        let mut outline = kurbo::BezPath::new();
        outline.move_to((0.0, 0.0));
        outline.line_to((50.0, 0.0));
        outline.line_to((50.0, 150.0));
        outline.close_path();
        session
            .component_outlines
            .insert("c".to_string(), outline);

        let items = session.items_in_rect(Rect::new(390.0, -10.0, 460.0, 100.0), true);
        assert_eq!(items, vec![ItemRef::Guideline(0), ItemRef::Component(0)]);

        let items = session.items_in_rect(Rect::new(390.0, -10.0, 460.0, 160.0), true);
        assert_eq!(
            items,
            vec![
                ItemRef::Guideline(0),
                ItemRef::Component(0),
                ItemRef::Component(1)
            ]
        );
    }

    #[test]
    fn items_prefer_points_then_anchors_then_components() {
        let (mut session, _) = session();
        session
            .glyph
            .components
            .push(Component::new("b", Affine::translate((400.0, 0.0))));
        assert_eq!(
            session.hit_test_item(Point::new(301.0, 300.0)),
            Some(ItemRef::Anchor(0))
        );
        assert_eq!(
            session.hit_test_item(Point::new(402.0, 0.0)),
            Some(ItemRef::Component(0))
        );

        let mut outline = kurbo::BezPath::new();
        outline.move_to((0.0, 0.0));
        outline.line_to((50.0, 0.0));
        outline.line_to((50.0, 50.0));
        outline.close_path();
        session
            .component_outlines
            .insert("b".to_string(), outline);
        assert_eq!(
            session.hit_test_component(Point::new(440.0, 10.0)),
            Some(0)
        );
        assert_eq!(session.hit_test_component(Point::new(402.0, 40.0)), None);
    }
}
