// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Editing model and interaction

pub mod change;
pub mod contours;
pub mod edit_types;
pub mod keyboard;
pub mod mouse;
pub mod movement;
pub mod selection;
pub mod session;
pub mod structure;
pub mod undo;

pub use change::{ChangeKind, ChangeListener, GlyphChange};
pub use contours::PathEnd;
pub use edit_types::EditType;
pub use keyboard::{Key, KeyEvent};
pub use mouse::{Drag, Modifiers, Mouse, MouseButton, MouseDelegate, MouseEvent};
pub use movement::{apply_move, nudge_curve};
pub use selection::Selection;
pub use session::{EditSession, SegmentHit};
pub use undo::{OutlineSnapshot, UndoState};
