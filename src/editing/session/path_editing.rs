// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Path editing methods for EditSession
//!
//! These are the entry points the tools (and context-menu actions) use.
//! They resolve path IDs, delegate to the structural operations and keep
//! the glyph's dirty tracking accurate. Stale IDs are ignored.

use super::EditSession;
use crate::editing::contours::{self, PathEnd};
use crate::editing::{movement, structure};
use crate::model::{Anchor, Component, EntityId, Guideline};
use kurbo::{Affine, Point, Vec2};

impl EditSession {
    /// Move every selected item by `delta`
    ///
    /// Points go through the move/constrain engine; anchors, components
    /// and guidelines translate rigidly. Returns true if anything moved.
    pub fn move_selection(&mut self, delta: Vec2, nudge: bool, slide: bool) -> bool {
        let mut moved = false;
        for path in &mut self.glyph.paths {
            moved |= movement::apply_move(path, delta, nudge, slide);
        }

        let mut moved_items = false;
        for anchor in self.glyph.anchors.iter_mut().filter(|a| a.selected) {
            anchor.x += delta.x;
            anchor.y += delta.y;
            moved_items = true;
        }
        for component in self.glyph.components.iter_mut().filter(|c| c.selected) {
            component.translate(delta);
            moved_items = true;
        }
        for guideline in self.glyph.guidelines.iter_mut().filter(|g| g.selected) {
            guideline.x += delta.x;
            guideline.y += delta.y;
            moved_items = true;
        }
        if moved_items && delta != Vec2::ZERO {
            self.glyph.mark_dirty();
            moved = true;
        }
        moved
    }

    /// Nudge the selection with an arrow key
    ///
    /// `dx`/`dy` are unit directions; the distance comes from the nudge
    /// settings.
    pub fn nudge_selection(&mut self, dx: f64, dy: f64, shift: bool, cmd: bool) -> bool {
        let amount = self.settings.nudge_amount(shift, cmd);
        self.move_selection(Vec2::new(dx * amount, dy * amount), false, false)
    }

    /// Delete the selection
    ///
    /// Paths left with fewer than two on-curve points are removed.
    /// Selected anchors, components and guidelines are removed too.
    pub fn delete_selection(&mut self, preserve_shape: bool) -> bool {
        if !self.glyph.has_selection() {
            return false;
        }

        let before = self.glyph.paths.len();
        self.glyph.paths.retain_mut(|path| {
            if !path.has_selection() {
                return true;
            }
            structure::delete_points(path, preserve_shape)
        });
        let removed_paths = before - self.glyph.paths.len();

        let items_before = self.glyph.anchors.len()
            + self.glyph.components.len()
            + self.glyph.guidelines.len();
        self.glyph.anchors.retain(|a| !a.selected);
        self.glyph.components.retain(|c| !c.selected);
        self.glyph.guidelines.retain(|g| !g.selected);
        let items_after = self.glyph.anchors.len()
            + self.glyph.components.len()
            + self.glyph.guidelines.len();

        if removed_paths > 0 || items_after != items_before {
            self.glyph.mark_dirty();
        }
        tracing::debug!(
            "deleted selection (preserve_shape={}, removed {} paths)",
            preserve_shape,
            removed_paths
        );
        self.glyph.clear_selection();
        true
    }

    /// Reverse a single path, or the selected paths, or all paths
    pub fn reverse_paths(&mut self, target: Option<EntityId>) -> Vec<EntityId> {
        contours::reverse_paths(&mut self.glyph, target)
    }

    /// Make the on-curve point at `index` the start of a closed path
    pub fn set_start_point(&mut self, path: EntityId, index: usize) -> bool {
        let Some(p) = self.glyph.path_mut(path) else {
            return false;
        };
        p.set_start_point(index);
        true
    }

    pub fn toggle_smooth(&mut self, path: EntityId, index: usize) -> bool {
        let Some(p) = self.glyph.path_mut(path) else {
            return false;
        };
        structure::toggle_smooth(p, index);
        true
    }

    /// Insert an on-curve point at parameter `t` of the segment ending at
    /// `end`; returns the new point's index
    pub fn split_segment(&mut self, path: EntityId, end: usize, t: f64) -> Option<usize> {
        let p = self.glyph.path_mut(path)?;
        Some(structure::split_segment(p, end, t))
    }

    /// Promote the line ending at `end` to a cubic
    pub fn convert_segment_to_curve(&mut self, path: EntityId, end: usize) -> Option<usize> {
        let p = self.glyph.path_mut(path)?;
        Some(structure::convert_line_to_curve(p, end))
    }

    pub fn join_paths(&mut self, a: EntityId, a_end: PathEnd, b: EntityId, b_end: PathEnd) -> EntityId {
        contours::join_paths(&mut self.glyph, a, a_end, b, b_end)
    }

    pub fn break_path(&mut self, path: EntityId, index: usize) -> Vec<EntityId> {
        contours::break_path(&mut self.glyph, path, index)
    }

    pub fn add_anchor(&mut self, name: impl Into<String>, pos: Point) -> usize {
        self.glyph.anchors.push(Anchor::new(name, pos));
        self.glyph.mark_dirty();
        self.glyph.anchors.len() - 1
    }

    pub fn add_guideline(&mut self, pos: Point, angle: f64) -> usize {
        self.glyph.guidelines.push(Guideline::new(pos, angle));
        self.glyph.mark_dirty();
        self.glyph.guidelines.len() - 1
    }

    /// Place a component of `base` with its origin at `pos`
    pub fn add_component(&mut self, base: impl Into<String>, pos: Point) -> usize {
        self.glyph
            .components
            .push(Component::new(base, Affine::translate(pos.to_vec2())));
        self.glyph.mark_dirty();
        self.glyph.components.len() - 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Glyph, ItemRef, PathPoint, SegmentType};

    fn square_session() -> (EditSession, EntityId) {
        let mut glyph = Glyph::new("a", 500.0);
        let id = glyph.add_path(
            vec![
                PathPoint::on_curve((0.0, 0.0), SegmentType::Line),
                PathPoint::on_curve((0.0, 100.0), SegmentType::Line),
                PathPoint::on_curve((100.0, 100.0), SegmentType::Line),
                PathPoint::on_curve((100.0, 0.0), SegmentType::Line),
            ],
            false,
        );
        glyph.take_changes();
        (EditSession::new(glyph), id)
    }

    #[test]
    fn move_selection_moves_points_and_anchors() {
        let (mut session, id) = square_session();
        let anchor = session.add_anchor("top", Point::new(50.0, 120.0));
        session.glyph.take_changes();
        session.glyph.set_selected(ItemRef::Point { path: id, index: 1 }, true);
        session.glyph.set_selected(ItemRef::Anchor(anchor), true);

        assert!(session.move_selection(Vec2::new(5.0, 5.0), false, false));
        assert_eq!(session.glyph.paths[0].points()[1].pos(), Point::new(5.0, 105.0));
        assert_eq!(session.glyph.anchors[0].pos(), Point::new(55.0, 125.0));
        assert_eq!(session.glyph.take_changes(), Some(vec![id]));
    }

    #[test]
    fn nudge_uses_settings() {
        let (mut session, id) = square_session();
        session.glyph.set_selected(ItemRef::Point { path: id, index: 0 }, true);
        session.nudge_selection(1.0, 0.0, true, false);
        assert_eq!(
            session.glyph.paths[0].points()[0].pos(),
            Point::new(crate::settings::nudge::SHIFT, 0.0)
        );
    }

    #[test]
    fn deleting_down_to_one_point_removes_path() {
        let (mut session, id) = square_session();
        for index in 0..3 {
            session.glyph.set_selected(ItemRef::Point { path: id, index }, true);
        }
        assert!(session.delete_selection(false));
        assert!(session.glyph.paths.is_empty());
        assert!(session.glyph.take_changes().is_some());
    }

    #[test]
    fn delete_without_selection_is_noop() {
        let (mut session, _) = square_session();
        assert!(!session.delete_selection(true));
        assert!(session.glyph.take_changes().is_none());
    }

    #[test]
    fn stale_ids_are_ignored() {
        let (mut session, _) = square_session();
        let stale = session.glyph.next_path_id();
        assert!(!session.toggle_smooth(stale, 0));
        assert_eq!(session.split_segment(stale, 0, 0.5), None);
    }

    #[test]
    fn add_component_places_origin() {
        let (mut session, _) = square_session();
        let index = session.add_component("b", Point::new(10.0, 20.0));
        assert_eq!(session.glyph.components[index].origin(), Point::new(10.0, 20.0));
    }
}
