// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Undo/redo as a stack of before-snapshots

use crate::model::{Anchor, Component, Glyph, Guideline, Path};
use std::collections::VecDeque;

/// Bounded undo and redo stacks
///
/// Each undo group is the state *before* an edit. Undoing swaps the
/// current state onto the redo stack and hands back the stored one.
#[derive(Debug, Clone)]
pub struct UndoState<T> {
    undo: VecDeque<T>,
    redo: Vec<T>,
    max_depth: usize,
}

impl<T> UndoState<T> {
    pub fn new(max_depth: usize) -> Self {
        Self {
            undo: VecDeque::new(),
            redo: Vec::new(),
            max_depth: max_depth.max(1),
        }
    }

    /// Record the state before a new edit; clears the redo stack
    pub fn add_undo_group(&mut self, before: T) {
        if self.undo.len() == self.max_depth {
            self.undo.pop_front();
        }
        self.undo.push_back(before);
        self.redo.clear();
    }

    /// Step back, returning the state to restore
    pub fn undo(&mut self, current: T) -> Option<T> {
        let previous = self.undo.pop_back()?;
        self.redo.push(current);
        Some(previous)
    }

    /// Step forward again, returning the state to restore
    pub fn redo(&mut self, current: T) -> Option<T> {
        let next = self.redo.pop()?;
        self.undo.push_back(current);
        Some(next)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }
}

impl<T> Default for UndoState<T> {
    fn default() -> Self {
        Self::new(crate::settings::undo::MAX_DEPTH)
    }
}

/// The editable outline data of a glyph
#[derive(Debug, Clone, PartialEq)]
pub struct OutlineSnapshot {
    paths: Vec<Path>,
    anchors: Vec<Anchor>,
    components: Vec<Component>,
    guidelines: Vec<Guideline>,
}

impl OutlineSnapshot {
    pub fn capture(glyph: &Glyph) -> Self {
        Self {
            paths: glyph.paths.clone(),
            anchors: glyph.anchors.clone(),
            components: glyph.components.clone(),
            guidelines: glyph.guidelines.clone(),
        }
    }

    /// Put this outline back into `glyph`, marking it dirty
    pub fn restore(self, glyph: &mut Glyph) {
        glyph.paths = self.paths;
        glyph.anchors = self.anchors;
        glyph.components = self.components;
        glyph.guidelines = self.guidelines;
        for path in &mut glyph.paths {
            path.mark_dirty();
        }
        glyph.mark_dirty();
    }
}
