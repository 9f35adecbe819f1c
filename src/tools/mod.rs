// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Tool system for glyph editing

use crate::editing::{Drag, EditSession, EditType, KeyEvent, MouseDelegate, MouseEvent};
use kurbo::{BezPath, Rect};

// ===== Tool Identifier =====

/// Tool identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolId {
    /// Select and move points
    Select,
    /// Draw new paths (cubic bezier)
    Pen,
}

// ===== Tool Overlay =====

/// Transient visuals a tool asks the renderer to draw over the glyph
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToolOverlay {
    /// Rubber-band selection rectangle
    pub rubber_band: Option<Rect>,
    /// Outline before the move in progress
    pub ghost: Vec<BezPath>,
}

// ===== Tool Trait =====

/// A tool for editing glyphs
pub trait Tool: MouseDelegate<Data = EditSession> {
    /// Get the tool identifier
    fn id(&self) -> ToolId;

    /// Overlays for the current interaction
    fn overlay(&self) -> ToolOverlay {
        ToolOverlay::default()
    }

    /// Get the edit type for the current operation (for undo grouping)
    fn edit_type(&self) -> Option<EditType> {
        None
    }

    /// Handle a key press; returns true if the key was consumed
    fn key_down(&mut self, _event: KeyEvent, _session: &mut EditSession) -> bool {
        false
    }

    /// Handle a key release; returns true if the key was consumed
    fn key_up(&mut self, _event: KeyEvent, _session: &mut EditSession) -> bool {
        false
    }

    /// Called before the tool is replaced
    fn deactivate(&mut self, _session: &mut EditSession) {}
}

// ===== ToolBox Enum =====

/// Enum wrapping all tool types
#[derive(Debug, Clone)]
pub enum ToolBox {
    Select(select::SelectTool),
    Pen(pen::PenTool),
}

// ===== ToolBox Implementation =====

impl ToolBox {
    /// Create a tool by ID
    pub fn for_id(id: ToolId) -> Self {
        match id {
            ToolId::Select => ToolBox::Select(select::SelectTool::default()),
            ToolId::Pen => ToolBox::Pen(pen::PenTool::default()),
        }
    }

    /// Get the tool ID
    pub fn id(&self) -> ToolId {
        match self {
            ToolBox::Select(tool) => tool.id(),
            ToolBox::Pen(tool) => tool.id(),
        }
    }

    pub fn overlay(&self) -> ToolOverlay {
        match self {
            ToolBox::Select(tool) => tool.overlay(),
            ToolBox::Pen(tool) => tool.overlay(),
        }
    }

    /// Get edit type
    pub fn edit_type(&self) -> Option<EditType> {
        match self {
            ToolBox::Select(tool) => tool.edit_type(),
            ToolBox::Pen(tool) => tool.edit_type(),
        }
    }

    pub fn key_down(&mut self, event: KeyEvent, session: &mut EditSession) -> bool {
        match self {
            ToolBox::Select(tool) => tool.key_down(event, session),
            ToolBox::Pen(tool) => tool.key_down(event, session),
        }
    }

    pub fn key_up(&mut self, event: KeyEvent, session: &mut EditSession) -> bool {
        match self {
            ToolBox::Select(tool) => tool.key_up(event, session),
            ToolBox::Pen(tool) => tool.key_up(event, session),
        }
    }

    pub fn deactivate(&mut self, session: &mut EditSession) {
        match self {
            ToolBox::Select(tool) => tool.deactivate(session),
            ToolBox::Pen(tool) => tool.deactivate(session),
        }
    }
}

// ===== MouseDelegate Implementation =====

/// Implement MouseDelegate for ToolBox so it can be used with the Mouse
/// state machine
impl MouseDelegate for ToolBox {
    type Data = EditSession;

    fn left_down(&mut self, event: MouseEvent, data: &mut EditSession) {
        match self {
            ToolBox::Select(tool) => tool.left_down(event, data),
            ToolBox::Pen(tool) => tool.left_down(event, data),
        }
    }

    fn left_up(&mut self, event: MouseEvent, data: &mut EditSession) {
        match self {
            ToolBox::Select(tool) => tool.left_up(event, data),
            ToolBox::Pen(tool) => tool.left_up(event, data),
        }
    }

    fn left_click(&mut self, event: MouseEvent, data: &mut EditSession) {
        match self {
            ToolBox::Select(tool) => tool.left_click(event, data),
            ToolBox::Pen(tool) => tool.left_click(event, data),
        }
    }

    fn mouse_moved(&mut self, event: MouseEvent, data: &mut EditSession) {
        match self {
            ToolBox::Select(tool) => tool.mouse_moved(event, data),
            ToolBox::Pen(tool) => tool.mouse_moved(event, data),
        }
    }

    fn left_drag_began(&mut self, event: MouseEvent, drag: Drag, data: &mut EditSession) {
        match self {
            ToolBox::Select(tool) => tool.left_drag_began(event, drag, data),
            ToolBox::Pen(tool) => tool.left_drag_began(event, drag, data),
        }
    }

    fn left_drag_changed(&mut self, event: MouseEvent, drag: Drag, data: &mut EditSession) {
        match self {
            ToolBox::Select(tool) => tool.left_drag_changed(event, drag, data),
            ToolBox::Pen(tool) => tool.left_drag_changed(event, drag, data),
        }
    }

    fn left_drag_ended(&mut self, event: MouseEvent, drag: Drag, data: &mut EditSession) {
        match self {
            ToolBox::Select(tool) => tool.left_drag_ended(event, drag, data),
            ToolBox::Pen(tool) => tool.left_drag_ended(event, drag, data),
        }
    }

    fn cancel(&mut self, data: &mut EditSession) {
        match self {
            ToolBox::Select(tool) => tool.cancel(data),
            ToolBox::Pen(tool) => tool.cancel(data),
        }
    }
}

// ===== Tool Modules =====

pub mod pen;
pub mod select;
