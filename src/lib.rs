// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Outline editing for UFO glyphs
//!
//! The outline model, the move/constrain engine behind point dragging,
//! structural path edits and the pen and selection tools, without any
//! windowing or rendering.

pub mod editing;
pub mod editor;
pub mod geometry;
pub mod model;
pub mod settings;
pub mod tools;

pub use editing::{EditSession, EditType, GlyphChange, Selection};
pub use editor::GlyphEditor;
pub use model::{Glyph, Path, PathPoint, SegmentType, Workspace};
pub use settings::EditorSettings;
pub use tools::{ToolBox, ToolId};

use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber
///
/// Controlled by `RUST_LOG`; defaults to `outline_edit=info`. Calling this
/// more than once is harmless.
pub fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("outline_edit=info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
