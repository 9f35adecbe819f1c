// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Selection tool for selecting and moving points

use crate::editing::{
    Drag, EditSession, EditType, Key, KeyEvent, MouseDelegate, MouseEvent, Selection,
};
use crate::model::ItemRef;
use crate::tools::{Tool, ToolId, ToolOverlay};
use kurbo::{BezPath, Rect, Vec2};

// ===== SelectState =====

/// Internal state machine for the select tool
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SelectState {
    /// Not currently doing anything
    #[default]
    Idle,
    /// Moving the selected points, anchors and components
    DraggingItem,
    /// Dragging out a rubber-band rectangle
    RubberBandSelecting,
}

// ===== SelectTool Struct =====

/// The selection tool
#[derive(Debug, Clone, Default)]
pub struct SelectTool {
    state: SelectState,
    /// Item under the pointer when the press started
    drag_target: Option<ItemRef>,
    /// Selection when the rubber band started (for toggle semantics)
    old_selection: Selection,
    rubber_band: Option<Rect>,
    /// Outline before the move in progress
    ghost: Option<Vec<BezPath>>,
    /// Total delta already applied during the current drag
    applied: Vec2,
    /// Edit type of the last completed operation
    last_edit: Option<EditType>,
}

impl SelectTool {
    pub fn state(&self) -> SelectState {
        self.state
    }

    /// Toggle the smooth flag of the on-curve point under a double click
    ///
    /// Points at the ends of an open path have no pair of sides to make
    /// tangent and are left alone.
    fn double_click(&mut self, item: ItemRef, session: &mut EditSession) {
        let ItemRef::Point { path, index } = item else {
            return;
        };
        let Some(p) = session.glyph.path(path) else {
            return;
        };
        if !p.points()[index].is_on_curve() {
            return;
        }
        if p.is_open() && (p.prev_on_curve(index).is_none() || p.next_on_curve(index).is_none()) {
            tracing::debug!("select: not toggling smooth at open path boundary {}", index);
            return;
        }
        session.toggle_smooth(path, index);
        self.last_edit = Some(EditType::Normal);
    }

    fn reset(&mut self) {
        self.state = SelectState::Idle;
        self.drag_target = None;
        self.rubber_band = None;
        self.ghost = None;
        self.applied = Vec2::ZERO;
    }
}

// ===== Tool Implementation =====

impl Tool for SelectTool {
    fn id(&self) -> ToolId {
        ToolId::Select
    }

    fn overlay(&self) -> ToolOverlay {
        ToolOverlay {
            rubber_band: self.rubber_band,
            ghost: self.ghost.clone().unwrap_or_default(),
        }
    }

    fn edit_type(&self) -> Option<EditType> {
        match self.state {
            SelectState::DraggingItem => Some(EditType::Drag),
            _ => self.last_edit,
        }
    }

    fn key_down(&mut self, event: KeyEvent, session: &mut EditSession) -> bool {
        if let Some((dx, dy)) = event.arrow_direction() {
            let moved = session.nudge_selection(dx, dy, event.mods.shift, event.mods.command());
            if moved {
                self.last_edit = Some(EditType::for_nudge(dx, dy));
            }
            return true;
        }
        if event.is_delete() {
            if session.delete_selection(!event.mods.alt) {
                self.last_edit = Some(EditType::Normal);
            }
            return true;
        }
        if event.key == Key::Escape {
            session.clear_selection();
            return true;
        }
        false
    }

    fn deactivate(&mut self, _session: &mut EditSession) {
        self.reset();
    }
}

// ===== MouseDelegate Implementation =====

impl MouseDelegate for SelectTool {
    type Data = EditSession;

    fn left_down(&mut self, event: MouseEvent, session: &mut EditSession) {
        let pos = event.pos;
        let toggle = event.mods.toggle();
        self.applied = Vec2::ZERO;
        self.last_edit = None;

        if let Some(item) = session.hit_test_item(pos) {
            if event.count >= 2 {
                self.double_click(item, session);
                return;
            }
            if toggle {
                session.glyph.toggle_selected(item);
            } else if !session.glyph.is_selected(item) {
                session.select_only(item);
            }
            self.drag_target = Some(item);
            tracing::debug!("select: pressed {:?}", item);
            return;
        }

        if let Some(hit) = session.hit_test_segment(pos, None) {
            session.select_path(hit.path, toggle);
            self.drag_target = None;
            tracing::debug!("select: selected path {:?}", hit.path);
            return;
        }

        self.old_selection = if toggle {
            session.selection()
        } else {
            session.clear_selection();
            Selection::new()
        };
        self.state = SelectState::RubberBandSelecting;
    }

    fn left_drag_began(&mut self, event: MouseEvent, drag: Drag, session: &mut EditSession) {
        if self.state != SelectState::RubberBandSelecting && session.glyph.has_selection() {
            self.ghost = Some(session.to_bezpaths());
            self.state = SelectState::DraggingItem;
            tracing::debug!("select: drag began");
        }
        self.left_drag_changed(event, drag, session);
    }

    fn left_drag_changed(&mut self, event: MouseEvent, drag: Drag, session: &mut EditSession) {
        match self.state {
            SelectState::DraggingItem => {
                let total = drag.delta_from_start();
                let step = total - self.applied;
                session.move_selection(step, event.mods.nudge(), event.mods.slide());
                self.applied = total;
            }
            SelectState::RubberBandSelecting => {
                let rect = Rect::from_points(drag.start.pos, event.pos);
                self.rubber_band = Some(rect);
                let inside: Selection = session
                    .items_in_rect(rect, !event.mods.alt)
                    .into_iter()
                    .collect();
                let selection = if event.mods.toggle() {
                    inside.symmetric_difference(&self.old_selection)
                } else {
                    inside
                };
                session.set_selection(&selection);
            }
            SelectState::Idle => {}
        }
    }

    fn left_drag_ended(&mut self, _event: MouseEvent, _drag: Drag, _session: &mut EditSession) {
        if self.state == SelectState::DraggingItem {
            self.last_edit = Some(EditType::DragUp);
        }
    }

    fn left_up(&mut self, _event: MouseEvent, _session: &mut EditSession) {
        self.reset();
    }

    fn cancel(&mut self, _session: &mut EditSession) {
        self.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editing::{Modifiers, Mouse, MouseButton};
    use crate::model::{Anchor, EntityId, Glyph, PathPoint, SegmentType};
    use kurbo::Point;

    fn ctrl() -> Modifiers {
        if cfg!(target_os = "macos") {
            Modifiers {
                meta: true,
                ..Default::default()
            }
        } else {
            Modifiers {
                ctrl: true,
                ..Default::default()
            }
        }
    }

    struct Harness {
        mouse: Mouse,
        tool: SelectTool,
        session: EditSession,
        path: EntityId,
    }

    impl Harness {
        /// An open path with a smooth curve point between two lines
        fn new() -> Self {
            let mut glyph = Glyph::new("a", 500.0);
            let path = glyph.add_path(
                vec![
                    PathPoint::on_curve((0.0, 0.0), SegmentType::Move),
                    PathPoint::on_curve((100.0, 0.0), SegmentType::Line),
                    PathPoint::off_curve((100.0, 50.0)),
                    PathPoint::off_curve((150.0, 100.0)),
                    PathPoint::on_curve((200.0, 100.0), SegmentType::Curve),
                    PathPoint::on_curve((300.0, 100.0), SegmentType::Line),
                ],
                true,
            );
            glyph.anchors.push(Anchor::new("top", Point::new(150.0, 400.0)));
            Self {
                mouse: Mouse::new(),
                tool: SelectTool::default(),
                session: EditSession::new(glyph),
                path,
            }
        }

        fn event(x: f64, y: f64, mods: Modifiers) -> MouseEvent {
            MouseEvent::new(Point::new(x, y), Some(MouseButton::Left)).with_modifiers(mods)
        }

        fn click(&mut self, x: f64, y: f64, mods: Modifiers) {
            let e = Self::event(x, y, mods);
            self.mouse.mouse_down(e, &mut self.tool, &mut self.session);
            self.mouse.mouse_up(e, &mut self.tool, &mut self.session);
        }

        fn drag(&mut self, from: (f64, f64), to: (f64, f64), mods: Modifiers) {
            let down = Self::event(from.0, from.1, mods);
            let mid = Self::event((from.0 + to.0) / 2.0, (from.1 + to.1) / 2.0, mods);
            let up = Self::event(to.0, to.1, mods);
            let threshold = self.session.drag_threshold();
            self.mouse.mouse_down(down, &mut self.tool, &mut self.session);
            self.mouse.mouse_moved(mid, threshold, &mut self.tool, &mut self.session);
            self.mouse.mouse_moved(up, threshold, &mut self.tool, &mut self.session);
            self.mouse.mouse_up(up, &mut self.tool, &mut self.session);
        }

        fn point(&self, index: usize) -> ItemRef {
            ItemRef::Point {
                path: self.path,
                index,
            }
        }

        fn pos(&self, index: usize) -> Point {
            self.session.glyph.paths[0].points()[index].pos()
        }
    }

    #[test]
    fn click_selects_only_the_hit_point() {
        let mut h = Harness::new();
        h.click(100.0, 0.0, Modifiers::default());
        h.click(300.0, 100.0, Modifiers::default());
        assert_eq!(h.session.glyph.selected_items(), vec![h.point(5)]);
    }

    #[test]
    fn toggle_click_adds_and_removes() {
        let mut h = Harness::new();
        h.click(100.0, 0.0, Modifiers::default());
        h.click(300.0, 100.0, ctrl());
        assert_eq!(h.session.glyph.selected_items(), vec![h.point(1), h.point(5)]);
        h.click(100.0, 0.0, ctrl());
        assert_eq!(h.session.glyph.selected_items(), vec![h.point(5)]);
    }

    #[test]
    fn drag_moves_point_with_handles() {
        let mut h = Harness::new();
        h.drag((200.0, 100.0), (220.0, 130.0), Modifiers::default());

        assert_eq!(h.pos(4), Point::new(220.0, 130.0));
        assert_eq!(h.pos(3), Point::new(170.0, 130.0));
        assert_eq!(h.pos(5), Point::new(300.0, 100.0));
        assert_eq!(h.tool.state(), SelectState::Idle);
        assert_eq!(h.tool.edit_type(), Some(EditType::DragUp));
    }

    #[test]
    fn ghost_is_shown_while_dragging() {
        let mut h = Harness::new();
        let before = h.session.to_bezpaths();
        let threshold = h.session.drag_threshold();
        let down = Harness::event(300.0, 100.0, Modifiers::default());
        let moved = Harness::event(330.0, 100.0, Modifiers::default());
        h.mouse.mouse_down(down, &mut h.tool, &mut h.session);
        h.mouse.mouse_moved(moved, threshold, &mut h.tool, &mut h.session);

        assert_eq!(h.tool.state(), SelectState::DraggingItem);
        assert_eq!(h.tool.overlay().ghost, before);
        assert_eq!(h.tool.edit_type(), Some(EditType::Drag));

        h.mouse.mouse_up(moved, &mut h.tool, &mut h.session);
        assert!(h.tool.overlay().ghost.is_empty());
    }

    #[test]
    fn rubber_band_selects_enclosed_points() {
        let mut h = Harness::new();
        h.drag((-10.0, -10.0), (160.0, 60.0), Modifiers::default());
        assert_eq!(
            h.session.glyph.selected_items(),
            vec![h.point(0), h.point(1), h.point(2)]
        );
        assert_eq!(h.tool.overlay().rubber_band, None);
    }

    #[test]
    fn alt_rubber_band_skips_off_curves() {
        let mut h = Harness::new();
        let alt = Modifiers {
            alt: true,
            ..Default::default()
        };
        h.drag((-10.0, -10.0), (160.0, 60.0), alt);
        assert_eq!(h.session.glyph.selected_items(), vec![h.point(0), h.point(1)]);
    }

    #[test]
    fn toggle_rubber_band_xors_with_previous_selection() {
        let mut h = Harness::new();
        h.click(100.0, 0.0, Modifiers::default());
        h.click(300.0, 100.0, ctrl());
        h.drag((-10.0, -10.0), (160.0, 60.0), ctrl());
        assert_eq!(
            h.session.glyph.selected_items(),
            vec![h.point(0), h.point(2), h.point(5)]
        );
    }

    #[test]
    fn clicking_segment_selects_path() {
        let mut h = Harness::new();
        h.click(250.0, 102.0, Modifiers::default());
        assert_eq!(h.session.glyph.selected_items().len(), 6);
    }

    #[test]
    fn clicking_empty_canvas_clears_selection() {
        let mut h = Harness::new();
        h.click(100.0, 0.0, Modifiers::default());
        h.click(500.0, 500.0, Modifiers::default());
        assert!(!h.session.glyph.has_selection());
    }

    #[test]
    fn double_click_toggles_smooth() {
        let mut h = Harness::new();
        let e = Harness::event(200.0, 100.0, Modifiers::default()).with_count(2);
        h.mouse.mouse_down(e, &mut h.tool, &mut h.session);
        h.mouse.mouse_up(e, &mut h.tool, &mut h.session);
        assert!(h.session.glyph.paths[0].points()[4].smooth);
    }

    #[test]
    fn double_click_on_boundary_is_rejected() {
        let mut h = Harness::new();
        let e = Harness::event(300.0, 100.0, Modifiers::default()).with_count(2);
        h.mouse.mouse_down(e, &mut h.tool, &mut h.session);
        h.mouse.mouse_up(e, &mut h.tool, &mut h.session);
        assert!(!h.session.glyph.paths[0].points()[5].smooth);
    }

    #[test]
    fn arrow_keys_nudge_selection() {
        let mut h = Harness::new();
        h.click(300.0, 100.0, Modifiers::default());
        h.tool
            .key_down(KeyEvent::new(Key::ArrowRight), &mut h.session);
        assert_eq!(h.pos(5), Point::new(301.0, 100.0));
        assert_eq!(h.tool.edit_type(), Some(EditType::NudgeRight));

        let shift = Modifiers {
            shift: true,
            ..Default::default()
        };
        h.tool.key_down(
            KeyEvent::new(Key::ArrowUp).with_modifiers(shift),
            &mut h.session,
        );
        assert_eq!(h.pos(5), Point::new(301.0, 110.0));
    }

    #[test]
    fn delete_removes_selected_point() {
        let mut h = Harness::new();
        h.click(100.0, 0.0, Modifiers::default());
        assert!(h.tool.key_down(KeyEvent::new(Key::Delete), &mut h.session));
        assert_eq!(h.session.glyph.paths[0].on_curve_count(), 3);
        assert!(!h.session.glyph.has_selection());
    }

    #[test]
    fn escape_clears_selection() {
        let mut h = Harness::new();
        h.click(150.0, 400.0, Modifiers::default());
        assert_eq!(h.session.glyph.selected_items(), vec![ItemRef::Anchor(0)]);
        h.tool.key_down(KeyEvent::new(Key::Escape), &mut h.session);
        assert!(!h.session.glyph.has_selection());
    }
}
