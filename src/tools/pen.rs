// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Pen tool for drawing cubic paths
//!
//! Clicking places on-curve points; dragging after a click pulls out a
//! handle and turns the segment into a curve. Clicking the first point of
//! the path being drawn closes it, and clicking the end of another open
//! path joins the two.

use crate::editing::structure::coerce_segment_to_curve;
use crate::editing::{Drag, EditSession, Key, KeyEvent, MouseDelegate, MouseEvent, PathEnd};
use crate::geometry::EPSILON;
use crate::model::{EntityId, ItemRef, Path, PathPoint, SegmentType};
use crate::tools::{Tool, ToolId};
use kurbo::Point;

// ===== PenState =====

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PenState {
    #[default]
    Idle,
    /// A path is being drawn and waits for the next click
    DrawingOpenPath,
    /// The pointer is held past the drag threshold after placing a point
    DraggingHandle,
}

// ===== PenTool Struct =====

/// The pen tool
#[derive(Debug, Clone, Default)]
pub struct PenTool {
    state: PenState,
    /// Path currently being drawn
    target_path: Option<EntityId>,
    /// On-curve point placed by the current press
    active_point: Option<usize>,
    /// Dangling handle removed when closing a path, with the smooth flag
    /// of the point it belonged to
    stashed_off_curve: Option<(PathPoint, bool)>,
    /// Whether the current drag already turned its segment into a curve
    coerced: bool,
    /// Space held: dragging moves the placed point instead of its handle
    should_move_on_curve: bool,
}

impl PenTool {
    pub fn state(&self) -> PenState {
        self.state
    }

    pub fn target_path(&self) -> Option<EntityId> {
        self.target_path
    }

    pub fn should_move_on_curve(&self) -> bool {
        self.should_move_on_curve
    }

    /// Stop drawing the current path, dropping any dangling handle
    pub fn finish_path(&mut self, session: &mut EditSession) {
        if let Some(path) = self.target_path.and_then(|id| session.glyph.path_mut(id)) {
            while path.trailing_off_curves() > 0 {
                path.remove_point(path.len() - 1);
            }
        }
        if let Some(id) = self.target_path.take() {
            tracing::debug!("pen: finished path {:?}", id);
        }
        self.active_point = None;
        self.stashed_off_curve = None;
        self.coerced = false;
        self.state = PenState::Idle;
    }

    /// Whether `pos` hits the first point of the path being drawn
    fn hits_own_start(&self, pos: Point, session: &EditSession) -> Option<EntityId> {
        let target = self.target_path?;
        let path = session.glyph.path(target)?;
        if !path.is_open() || path.on_curve_count() < 2 {
            return None;
        }
        match session.hit_test_point(pos, None) {
            Some(ItemRef::Point { path: hit, index })
                if hit == target && Some(index) == path.first_on_curve() =>
            {
                Some(target)
            }
            _ => None,
        }
    }

    /// Close the target path; a dangling handle is stashed until the
    /// press ends or a drag reshapes the closing segment
    fn close_target(&mut self, target: EntityId, session: &mut EditSession) {
        let Some(path) = session.glyph.path_mut(target) else {
            return;
        };
        let mut stash = None;
        while path.trailing_off_curves() > 0 {
            stash = Some(path.remove_point(path.len() - 1));
        }
        self.stashed_off_curve = stash.map(|handle| {
            let smooth = path
                .last_on_curve()
                .is_some_and(|i| path.points()[i].smooth);
            (handle, smooth)
        });
        path.close();

        session.select_only(ItemRef::Point {
            path: target,
            index: 0,
        });
        self.active_point = Some(0);
        self.coerced = false;
        tracing::debug!("pen: closed path {:?}", target);
    }

    /// Click on an endpoint of an open path
    ///
    /// Joins it to the path being drawn, or starts continuing it.
    fn endpoint_clicked(&mut self, hit: EntityId, end: PathEnd, session: &mut EditSession) -> bool {
        match self.target_path {
            Some(target) if target != hit => {
                let joined = session.join_paths(target, PathEnd::End, hit, end);
                tracing::debug!("pen: joined {:?} into {:?}", hit, joined);
                session.clear_selection();
                self.target_path = None;
                self.active_point = None;
                self.state = PenState::Idle;
                true
            }
            Some(_) => true,
            None => {
                if end == PathEnd::Start {
                    session.reverse_paths(Some(hit));
                }
                let Some(last) = session.glyph.path(hit).map(|p| p.len() - 1) else {
                    return false;
                };
                session.select_only(ItemRef::Point {
                    path: hit,
                    index: last,
                });
                self.target_path = Some(hit);
                self.active_point = None;
                self.state = PenState::DrawingOpenPath;
                tracing::debug!("pen: continuing path {:?}", hit);
                true
            }
        }
    }

    /// Append an on-curve point at `pos`, starting a new path if needed
    fn append_point(&mut self, pos: Point, session: &mut EditSession) {
        let target = self
            .target_path
            .filter(|id| session.glyph.path(*id).is_some_and(Path::is_open));

        let (id, index) = match target {
            Some(id) => {
                let Some(path) = session.glyph.path_mut(id) else {
                    return;
                };
                let kind = if path.trailing_off_curves() > 0 {
                    path.push_point(PathPoint::off_curve(pos));
                    SegmentType::Curve
                } else {
                    SegmentType::Line
                };
                path.push_point(PathPoint::on_curve(pos, kind));
                (id, path.len() - 1)
            }
            None => {
                let id = session
                    .glyph
                    .add_path(vec![PathPoint::on_curve(pos, SegmentType::Move)], true);
                tracing::debug!("pen: started path {:?}", id);
                (id, 0)
            }
        };

        session.select_only(ItemRef::Point { path: id, index });
        self.target_path = Some(id);
        self.active_point = Some(index);
        self.coerced = false;
        self.state = PenState::DrawingOpenPath;
    }

    /// Shape the handles of the active point for a drag to `pos`
    fn drag_handle(&mut self, pos: Point, corner: bool, session: &mut EditSession) {
        let (Some(id), Some(mut active)) = (self.target_path, self.active_point) else {
            return;
        };
        let Some(path) = session.glyph.path_mut(id) else {
            return;
        };

        if !self.coerced {
            if path.segment_ending_at(active).is_some_and(|s| s.is_line()) {
                active = coerce_segment_to_curve(path, active, pos, self.stashed_off_curve.take());
            }
            self.coerced = true;
        }

        let on = path.points()[active].pos();
        let incoming = path
            .prev_index(active)
            .filter(|&i| path.points()[i].is_off_curve());

        if path.is_closed() {
            if let Some(h) = incoming {
                path.points_mut()[h].set_pos(pos);
            }
        } else {
            if path.trailing_off_curves() == 0 {
                path.push_point(PathPoint::off_curve(pos));
            } else if let Some(last) = path.points_mut().last_mut() {
                last.set_pos(pos);
            }
            let point = &mut path.points_mut()[active];
            point.smooth = !corner && !point.is_move();
            if !corner && let Some(h) = incoming {
                path.points_mut()[h].set_pos(on + (on - pos));
            }
        }
        path.mark_dirty();
        self.active_point = Some(active);
    }
}

// ===== Tool Implementation =====

impl Tool for PenTool {
    fn id(&self) -> ToolId {
        ToolId::Pen
    }

    fn key_down(&mut self, event: KeyEvent, session: &mut EditSession) -> bool {
        match event.key {
            Key::Space => {
                self.should_move_on_curve = true;
                true
            }
            Key::Escape => {
                self.finish_path(session);
                true
            }
            _ => false,
        }
    }

    fn key_up(&mut self, event: KeyEvent, _session: &mut EditSession) -> bool {
        if event.key == Key::Space {
            self.should_move_on_curve = false;
            return true;
        }
        false
    }

    fn deactivate(&mut self, session: &mut EditSession) {
        self.finish_path(session);
    }
}

// ===== MouseDelegate Implementation =====

impl MouseDelegate for PenTool {
    type Data = EditSession;

    fn left_down(&mut self, event: MouseEvent, session: &mut EditSession) {
        let pos = event.pos;

        if let Some(target) = self.hits_own_start(pos, session) {
            self.close_target(target, session);
            return;
        }

        if let Some((hit, end)) = session.hit_test_endpoint(pos)
            && self.endpoint_clicked(hit, end, session)
        {
            return;
        }

        if let Some(hit) = session.hit_test_segment(pos, None) {
            if let Some(index) = session.split_segment(hit.path, hit.end, hit.t) {
                session.select_only(ItemRef::Point {
                    path: hit.path,
                    index,
                });
                tracing::debug!("pen: inserted point {} on path {:?}", index, hit.path);
            }
            self.active_point = None;
            return;
        }

        self.append_point(pos, session);
    }

    fn left_drag_began(&mut self, event: MouseEvent, drag: Drag, session: &mut EditSession) {
        if self.active_point.is_some() {
            self.state = PenState::DraggingHandle;
        }
        self.left_drag_changed(event, drag, session);
    }

    fn left_drag_changed(&mut self, event: MouseEvent, drag: Drag, session: &mut EditSession) {
        let (Some(id), Some(active)) = (self.target_path, self.active_point) else {
            return;
        };
        if self.should_move_on_curve {
            session.select_only(ItemRef::Point {
                path: id,
                index: active,
            });
            session.move_selection(drag.delta_from_prev(), false, false);
            return;
        }
        self.drag_handle(event.pos, event.mods.alt, session);
    }

    fn left_up(&mut self, _event: MouseEvent, session: &mut EditSession) {
        if let Some(id) = self.target_path
            && let Some(path) = session.glyph.path_mut(id)
        {
            if path.is_closed() {
                if let (Some(stash), Some(active)) = (self.stashed_off_curve.take(), self.active_point)
                    && path.segment_ending_at(active).is_some_and(|s| s.is_line())
                {
                    let pos = path.points()[active].pos();
                    coerce_segment_to_curve(path, active, pos, Some(stash));
                }
                self.target_path = None;
            } else if path.trailing_off_curves() > 0
                && let Some(on) = path.last_on_curve()
            {
                let last = path.len() - 1;
                if path.points()[last].pos().distance(path.points()[on].pos()) < EPSILON {
                    path.remove_point(last);
                }
            }
        }

        self.active_point = None;
        self.stashed_off_curve = None;
        self.coerced = false;
        self.state = if self.target_path.is_some() {
            PenState::DrawingOpenPath
        } else {
            PenState::Idle
        };
    }

    fn cancel(&mut self, session: &mut EditSession) {
        self.finish_path(session);
    }
}
