// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Change notifications sent from the editor to its embedder
//!
//! The editor emits exactly one [`GlyphChange`] per logical user action
//! that modified the glyph. Renderers and autosave hooks subscribe by
//! installing a listener with `GlyphEditor::set_listener`.

use super::edit_types::EditType;
use crate::model::EntityId;

/// What caused a change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    /// A tool or session operation edited the outline
    Edit(EditType),
    Undo,
    Redo,
}

/// A committed modification of the glyph outline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlyphChange {
    pub glyph: String,
    pub kind: ChangeKind,
    /// Paths whose points changed; empty when only glyph-level data
    /// (the path list, anchors, components, guidelines) changed
    pub paths: Vec<EntityId>,
}

/// Callback invoked for every committed change
pub type ChangeListener = Box<dyn FnMut(&GlyphChange)>;
