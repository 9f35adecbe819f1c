// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Keyboard input as seen by the editing tools

use super::mouse::Modifiers;

/// Keys the editing tools react to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Delete,
    Backspace,
    Escape,
    Space,
    Character(char),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: Key,
    pub mods: Modifiers,
}

impl KeyEvent {
    pub fn new(key: Key) -> Self {
        Self {
            key,
            mods: Modifiers::default(),
        }
    }

    pub fn with_modifiers(mut self, mods: Modifiers) -> Self {
        self.mods = mods;
        self
    }

    /// Unit direction of an arrow key, y pointing up in design space
    pub fn arrow_direction(&self) -> Option<(f64, f64)> {
        match self.key {
            Key::ArrowUp => Some((0.0, 1.0)),
            Key::ArrowDown => Some((0.0, -1.0)),
            Key::ArrowLeft => Some((-1.0, 0.0)),
            Key::ArrowRight => Some((1.0, 0.0)),
            _ => None,
        }
    }

    pub fn is_delete(&self) -> bool {
        matches!(self.key, Key::Delete | Key::Backspace)
    }
}
