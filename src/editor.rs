// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Glyph editor: routes input to the active tool and records undo history
//!
//! Every logical action (a press-drag-release, a key press, a tool switch,
//! a context-menu operation) captures the outline before it runs. When the
//! glyph comes out dirty, exactly one undo group is pushed and exactly one
//! [`GlyphChange`] is sent to the listener.

use crate::editing::{
    ChangeKind, ChangeListener, EditSession, EditType, GlyphChange, KeyEvent, Mouse, MouseEvent,
    OutlineSnapshot, UndoState,
};
use crate::model::Glyph;
use crate::settings::EditorSettings;
use crate::tools::{ToolBox, ToolId, ToolOverlay};

/// Interactive editor for a single glyph
pub struct GlyphEditor {
    session: EditSession,
    tool: ToolBox,
    mouse: Mouse,
    undo: UndoState<OutlineSnapshot>,
    /// Outline captured when the current action began
    pending: Option<OutlineSnapshot>,
    /// Edit type of the last committed action, for nudge coalescing
    last_edit: Option<EditType>,
    listener: Option<ChangeListener>,
}

impl GlyphEditor {
    pub fn new(glyph: Glyph) -> Self {
        Self::with_settings(glyph, EditorSettings::default())
    }

    pub fn with_settings(glyph: Glyph, settings: EditorSettings) -> Self {
        let undo = UndoState::new(settings.undo_depth);
        let mut session = EditSession::with_settings(glyph, settings);
        session.glyph.take_changes();
        Self {
            session,
            tool: ToolBox::for_id(ToolId::Select),
            mouse: Mouse::new(),
            undo,
            pending: None,
            last_edit: None,
            listener: None,
        }
    }

    pub fn session(&self) -> &EditSession {
        &self.session
    }

    pub fn glyph(&self) -> &Glyph {
        &self.session.glyph
    }

    pub fn set_zoom(&mut self, zoom: f64) {
        self.session.set_zoom(zoom);
    }

    /// Install the callback notified of every committed change
    pub fn set_listener(&mut self, listener: impl FnMut(&GlyphChange) + 'static) {
        self.listener = Some(Box::new(listener));
    }

    pub fn tool_id(&self) -> ToolId {
        self.tool.id()
    }

    pub fn tool(&self) -> &ToolBox {
        &self.tool
    }

    pub fn overlay(&self) -> ToolOverlay {
        self.tool.overlay()
    }

    /// Switch tools, letting the old one finish its work first
    pub fn set_tool(&mut self, id: ToolId) {
        if self.tool.id() == id {
            return;
        }
        self.begin_action();
        self.mouse.cancel(&mut self.tool, &mut self.session);
        self.tool.deactivate(&mut self.session);
        self.tool = ToolBox::for_id(id);
        tracing::debug!("editor: switched to {:?}", id);
        self.commit_action(EditType::Normal);
    }

    // ===== POINTER INPUT =====

    pub fn pointer_down(&mut self, event: MouseEvent) {
        self.begin_action();
        self.mouse
            .mouse_down(event, &mut self.tool, &mut self.session);
    }

    pub fn pointer_move(&mut self, event: MouseEvent) {
        let threshold = self.session.drag_threshold();
        self.mouse
            .mouse_moved(event, threshold, &mut self.tool, &mut self.session);
    }

    pub fn pointer_up(&mut self, event: MouseEvent) {
        self.mouse.mouse_up(event, &mut self.tool, &mut self.session);
        let edit = self.tool.edit_type().unwrap_or(EditType::Normal);
        self.commit_action(edit);
    }

    /// Abandon the press or drag in progress
    pub fn cancel(&mut self) {
        self.begin_action();
        self.mouse.cancel(&mut self.tool, &mut self.session);
        self.commit_action(EditType::Normal);
    }

    // ===== KEYBOARD INPUT =====

    /// Returns true if the active tool consumed the key
    pub fn key_down(&mut self, event: KeyEvent) -> bool {
        self.begin_action();
        let handled = self.tool.key_down(event, &mut self.session);
        let edit = self.tool.edit_type().unwrap_or(EditType::Normal);
        self.commit_action(edit);
        handled
    }

    pub fn key_up(&mut self, event: KeyEvent) -> bool {
        self.tool.key_up(event, &mut self.session)
    }

    // ===== DIRECT OPERATIONS =====

    /// Run a session operation (reverse, set start point, add anchor, ...)
    /// as one undoable action
    pub fn apply<R>(&mut self, operation: impl FnOnce(&mut EditSession) -> R) -> R {
        self.begin_action();
        let result = operation(&mut self.session);
        self.commit_action(EditType::Normal);
        result
    }

    // ===== UNDO =====

    pub fn can_undo(&self) -> bool {
        self.undo.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.undo.can_redo()
    }

    pub fn undo(&mut self) -> bool {
        self.restore_from_history(ChangeKind::Undo)
    }

    pub fn redo(&mut self) -> bool {
        self.restore_from_history(ChangeKind::Redo)
    }

    fn restore_from_history(&mut self, kind: ChangeKind) -> bool {
        if self.mouse.is_down() {
            self.mouse.cancel(&mut self.tool, &mut self.session);
            self.pending = None;
        }
        let current = OutlineSnapshot::capture(&self.session.glyph);
        let snapshot = match kind {
            ChangeKind::Redo => self.undo.redo(current),
            _ => self.undo.undo(current),
        };
        let Some(snapshot) = snapshot else {
            return false;
        };
        snapshot.restore(&mut self.session.glyph);
        self.last_edit = None;
        let paths = self.session.glyph.take_changes().unwrap_or_default();
        tracing::debug!("editor: {:?} on {}", kind, self.session.glyph.name);
        self.emit(GlyphChange {
            glyph: self.session.glyph.name.clone(),
            kind,
            paths,
        });
        true
    }

    // ===== ACTIONS =====

    fn begin_action(&mut self) {
        if self.pending.is_none() {
            self.pending = Some(OutlineSnapshot::capture(&self.session.glyph));
        }
    }

    fn commit_action(&mut self, edit: EditType) {
        let Some(before) = self.pending.take() else {
            return;
        };
        let Some(paths) = self.session.glyph.take_changes() else {
            return;
        };
        if !edit.coalesces_with(self.last_edit) {
            self.undo.add_undo_group(before);
        }
        self.last_edit = Some(edit);
        self.emit(GlyphChange {
            glyph: self.session.glyph.name.clone(),
            kind: ChangeKind::Edit(edit),
            paths,
        });
    }

    fn emit(&mut self, change: GlyphChange) {
        if let Some(listener) = self.listener.as_mut() {
            listener(&change);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editing::{Key, Modifiers, MouseButton};
    use crate::model::{PathPoint, SegmentType};
    use kurbo::Point;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn event(x: f64, y: f64) -> MouseEvent {
        MouseEvent::new(Point::new(x, y), Some(MouseButton::Left))
    }

    fn click(editor: &mut GlyphEditor, x: f64, y: f64) {
        editor.pointer_down(event(x, y));
        editor.pointer_up(event(x, y));
    }

    fn recorded(editor: &mut GlyphEditor) -> Rc<RefCell<Vec<GlyphChange>>> {
        let changes = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&changes);
        editor.set_listener(move |change| sink.borrow_mut().push(change.clone()));
        changes
    }

    fn line_glyph() -> Glyph {
        let mut glyph = Glyph::new("a", 500.0);
        glyph.add_path(
            vec![
                PathPoint::on_curve((0.0, 0.0), SegmentType::Move),
                PathPoint::on_curve((100.0, 0.0), SegmentType::Line),
            ],
            true,
        );
        glyph
    }

    #[test]
    fn pen_clicks_are_undoable_one_by_one() {
        let mut editor = GlyphEditor::new(Glyph::new("a", 500.0));
        let changes = recorded(&mut editor);
        editor.set_tool(ToolId::Pen);

        click(&mut editor, 0.0, 0.0);
        click(&mut editor, 100.0, 0.0);
        assert_eq!(editor.glyph().paths[0].len(), 2);
        assert_eq!(changes.borrow().len(), 2);

        assert!(editor.undo());
        assert_eq!(editor.glyph().paths[0].len(), 1);
        assert!(editor.undo());
        assert!(editor.glyph().paths.is_empty());
        assert!(!editor.undo());

        assert!(editor.redo());
        assert_eq!(editor.glyph().paths.len(), 1);
        assert_eq!(changes.borrow().last().map(|c| c.kind), Some(ChangeKind::Redo));
    }

    #[test]
    fn drag_emits_a_single_change() {
        let mut editor = GlyphEditor::new(line_glyph());
        let changes = recorded(&mut editor);

        editor.pointer_down(event(100.0, 0.0));
        for step in 1..=5 {
            editor.pointer_move(event(100.0 + 10.0 * step as f64, 0.0));
        }
        editor.pointer_up(event(150.0, 0.0));

        let changes = changes.borrow();
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].kind, ChangeKind::Edit(EditType::DragUp));
        assert_eq!(changes[0].paths, vec![editor.glyph().paths[0].id()]);
        assert_eq!(editor.glyph().paths[0].points()[1].pos(), Point::new(150.0, 0.0));
    }

    #[test]
    fn selection_only_clicks_emit_nothing() {
        let mut editor = GlyphEditor::new(line_glyph());
        let changes = recorded(&mut editor);
        click(&mut editor, 100.0, 0.0);
        click(&mut editor, 400.0, 400.0);
        assert!(changes.borrow().is_empty());
        assert!(!editor.can_undo());
    }

    #[test]
    fn repeated_nudges_coalesce() {
        let mut editor = GlyphEditor::new(line_glyph());
        click(&mut editor, 100.0, 0.0);

        for _ in 0..3 {
            editor.key_down(KeyEvent::new(Key::ArrowRight));
        }
        editor.key_down(KeyEvent::new(Key::ArrowUp));
        assert_eq!(editor.glyph().paths[0].points()[1].pos(), Point::new(103.0, 1.0));

        assert!(editor.undo());
        assert_eq!(editor.glyph().paths[0].points()[1].pos(), Point::new(103.0, 0.0));
        assert!(editor.undo());
        assert_eq!(editor.glyph().paths[0].points()[1].pos(), Point::new(100.0, 0.0));
        assert!(!editor.can_undo());
    }

    #[test]
    fn switching_tools_finishes_pen_path() {
        let mut editor = GlyphEditor::new(Glyph::new("a", 500.0));
        editor.set_tool(ToolId::Pen);
        click(&mut editor, 0.0, 0.0);
        editor.pointer_down(event(100.0, 0.0));
        editor.pointer_move(event(150.0, 50.0));
        editor.pointer_up(event(150.0, 50.0));
        assert_eq!(editor.glyph().paths[0].trailing_off_curves(), 1);

        editor.set_tool(ToolId::Select);
        assert_eq!(editor.tool_id(), ToolId::Select);
        assert_eq!(editor.glyph().paths[0].trailing_off_curves(), 0);
    }

    #[test]
    fn apply_runs_operation_as_one_action() {
        let mut editor = GlyphEditor::new(line_glyph());
        let changes = recorded(&mut editor);
        let id = editor.glyph().paths[0].id();

        let reversed = editor.apply(|session| session.reverse_paths(Some(id)));
        assert_eq!(reversed, vec![id]);
        assert_eq!(editor.glyph().paths[0].points()[0].pos(), Point::new(100.0, 0.0));
        assert_eq!(changes.borrow().len(), 1);

        editor.undo();
        assert_eq!(editor.glyph().paths[0].points()[0].pos(), Point::new(0.0, 0.0));
    }

    #[test]
    fn shift_nudge_uses_larger_step() {
        let mut editor = GlyphEditor::new(line_glyph());
        click(&mut editor, 100.0, 0.0);
        let shift = Modifiers {
            shift: true,
            ..Default::default()
        };
        editor.key_down(KeyEvent::new(Key::ArrowLeft).with_modifiers(shift));
        assert_eq!(editor.glyph().paths[0].points()[1].pos(), Point::new(90.0, 0.0));
    }
}
