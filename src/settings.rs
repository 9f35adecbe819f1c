// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Editor settings and configuration constants.
//!
//! The constant modules at the bottom are the built-in defaults.
//! `EditorSettings` carries the subset a user may override from a TOML
//! file; every field falls back to its constant.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

// ============================================================================
// EDITOR SETTINGS
// ============================================================================
/// Minimum zoom level (2% of original size)
const MIN_ZOOM: f64 = 0.02;

/// Maximum zoom level (50x original size)
const MAX_ZOOM: f64 = 50.0;

// ============================================================================
// NUDGE SETTINGS
// ============================================================================
/// Base nudge amount in design units (arrow key)
const NUDGE_BASE: f64 = 1.0;

/// Shift-arrow nudge amount in design units
const NUDGE_SHIFT: f64 = 10.0;

/// Ctrl/Cmd-arrow nudge amount in design units
const NUDGE_CMD: f64 = 100.0;

// ============================================================================
// PEN SETTINGS
// ============================================================================
/// Distance the pointer must travel before a press becomes a drag
/// (device-independent pixels)
const DRAG_THRESHOLD_PX: f64 = 10.0;

// ============================================================================
// HIT TEST SETTINGS
// ============================================================================
/// Click radius for points, anchors and component origins (pixels)
const POINT_HIT_RADIUS_PX: f64 = 8.0;

/// Click distance for segments (pixels)
const SEGMENT_HIT_RADIUS_PX: f64 = 6.0;

// ============================================================================
// UNDO SETTINGS
// ============================================================================
/// Number of undo groups kept before the oldest is dropped
const UNDO_MAX_DEPTH: usize = 128;

// ============================================================================
// PUBLIC API - Don't edit below this line unless you know what you're doing
// ============================================================================

/// Editor settings (zoom, viewport, etc.)
pub mod editor {
    /// Minimum zoom level (2% of original size)
    pub const MIN_ZOOM: f64 = super::MIN_ZOOM;

    /// Maximum zoom level (50x original size)
    pub const MAX_ZOOM: f64 = super::MAX_ZOOM;
}

/// Nudge amounts for arrow key point movement
pub mod nudge {
    /// Base nudge (arrow key alone)
    pub const BASE: f64 = super::NUDGE_BASE;

    /// Shift-arrow nudge
    pub const SHIFT: f64 = super::NUDGE_SHIFT;

    /// Cmd-arrow nudge
    pub const CMD: f64 = super::NUDGE_CMD;
}

/// Pointer drag settings
pub mod pen {
    /// Anti-jitter drag threshold in pixels
    pub const DRAG_THRESHOLD_PX: f64 = super::DRAG_THRESHOLD_PX;
}

/// Hit testing tolerances in screen pixels
pub mod hit_test {
    pub const POINT_RADIUS_PX: f64 = super::POINT_HIT_RADIUS_PX;
    pub const SEGMENT_RADIUS_PX: f64 = super::SEGMENT_HIT_RADIUS_PX;
}

/// Undo history settings
pub mod undo {
    pub const MAX_DEPTH: usize = super::UNDO_MAX_DEPTH;
}

// ============================================================================
// USER OVERRIDES
// ============================================================================

/// Errors from loading a settings file
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse settings file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Arrow-key nudge amounts
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NudgeSettings {
    pub base: f64,
    pub shift: f64,
    pub cmd: f64,
}

impl Default for NudgeSettings {
    fn default() -> Self {
        Self {
            base: nudge::BASE,
            shift: nudge::SHIFT,
            cmd: nudge::CMD,
        }
    }
}

/// User-tunable editor settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorSettings {
    /// Anti-jitter drag threshold in pixels
    pub drag_threshold_px: f64,
    pub point_hit_radius_px: f64,
    pub segment_hit_radius_px: f64,
    pub undo_depth: usize,
    pub nudge: NudgeSettings,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            drag_threshold_px: pen::DRAG_THRESHOLD_PX,
            point_hit_radius_px: hit_test::POINT_RADIUS_PX,
            segment_hit_radius_px: hit_test::SEGMENT_RADIUS_PX,
            undo_depth: undo::MAX_DEPTH,
            nudge: NudgeSettings::default(),
        }
    }
}

impl EditorSettings {
    /// Read settings from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml(&text)
    }

    pub fn from_toml(text: &str) -> Result<Self, SettingsError> {
        Ok(toml::from_str(text)?)
    }

    /// Read settings, falling back to the defaults on any error
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(settings) => {
                tracing::info!("Loaded editor settings from {}", path.display());
                settings
            }
            Err(e) => {
                tracing::warn!("Using default editor settings ({}): {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Nudge distance for an arrow key with the given modifiers
    pub fn nudge_amount(&self, shift: bool, cmd: bool) -> f64 {
        if cmd {
            self.nudge.cmd
        } else if shift {
            self.nudge.shift
        } else {
            self.nudge.base
        }
    }
}
