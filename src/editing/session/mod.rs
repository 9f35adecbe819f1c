// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Edit session - manages editing state for a single glyph

mod hit_testing;
mod path_editing;

pub use hit_testing::SegmentHit;

use super::selection::Selection;
use crate::model::{EntityId, Glyph, ItemRef};
use crate::settings::{self, EditorSettings};
use kurbo::BezPath;
use std::collections::HashMap;

/// Editing session for one glyph
///
/// Holds the glyph being edited together with the view state the tools
/// need for hit testing. All coordinates passed to the session are in
/// design space; pixel tolerances from the settings are converted through
/// `zoom`.
#[derive(Debug, Clone)]
pub struct EditSession {
    /// The glyph being edited
    pub glyph: Glyph,

    /// Pixels per design unit
    pub zoom: f64,

    pub settings: EditorSettings,

    /// Outlines of component base glyphs, keyed by glyph name, used to
    /// hit test components
    pub component_outlines: HashMap<String, BezPath>,
}

impl EditSession {
    pub fn new(glyph: Glyph) -> Self {
        Self::with_settings(glyph, EditorSettings::default())
    }

    pub fn with_settings(glyph: Glyph, settings: EditorSettings) -> Self {
        Self {
            glyph,
            zoom: 1.0,
            settings,
            component_outlines: HashMap::new(),
        }
    }

    /// Set the zoom, clamped to the supported range
    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = zoom.clamp(settings::editor::MIN_ZOOM, settings::editor::MAX_ZOOM);
    }

    pub fn set_component_outlines(&mut self, outlines: HashMap<String, BezPath>) {
        self.component_outlines = outlines;
    }

    /// Convert a screen distance to design units
    pub fn design_distance(&self, pixels: f64) -> f64 {
        pixels / self.zoom
    }

    /// Drag threshold in design units
    pub fn drag_threshold(&self) -> f64 {
        self.design_distance(self.settings.drag_threshold_px)
    }

    // ===== SELECTION HELPERS =====

    pub fn selection(&self) -> Selection {
        Selection::capture(&self.glyph)
    }

    pub fn set_selection(&mut self, selection: &Selection) {
        selection.apply(&mut self.glyph);
    }

    pub fn clear_selection(&mut self) {
        self.glyph.clear_selection();
    }

    /// Make `item` the only selected item
    pub fn select_only(&mut self, item: ItemRef) {
        self.glyph.clear_selection();
        self.glyph.set_selected(item, true);
    }

    /// Select every point of a path, or toggle them all when `toggle` is
    /// set
    pub fn select_path(&mut self, id: EntityId, toggle: bool) {
        if !toggle {
            self.glyph.clear_selection();
        }
        if let Some(path) = self.glyph.path_mut(id) {
            let select = !(toggle && path.points().iter().all(|p| p.selected));
            path.set_all_selected(select);
        }
    }

    /// Current outline as one BezPath per path
    pub fn to_bezpaths(&self) -> Vec<BezPath> {
        self.glyph.paths.iter().map(|p| p.to_bezpath()).collect()
    }
}
