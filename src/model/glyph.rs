// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! The glyph being edited: paths plus anchors, components and guidelines.
//!
//! Selection lives on the elements themselves (`selected` flags). An
//! `ItemRef` names one selectable element so that snapshots of the
//! selection can be taken and restored.

use super::entity_id::{EntityId, IdAllocator};
use super::path::Path;
use super::point::PathPoint;
use kurbo::{Affine, Point, Vec2};
use serde::Serialize;

/// A named attachment point
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Anchor {
    pub name: String,
    pub x: f64,
    pub y: f64,
    #[serde(skip)]
    pub selected: bool,
}

impl Anchor {
    pub fn new(name: impl Into<String>, pos: Point) -> Self {
        Self {
            name: name.into(),
            x: pos.x,
            y: pos.y,
            selected: false,
        }
    }

    pub fn pos(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// A component reference to another glyph
#[derive(Debug, Clone, PartialEq)]
pub struct Component {
    /// Name of the referenced glyph (the "base" glyph)
    pub base: String,
    pub transform: Affine,
    pub selected: bool,
}

impl Component {
    pub fn new(base: impl Into<String>, transform: Affine) -> Self {
        Self {
            base: base.into(),
            transform,
            selected: false,
        }
    }

    /// Translate the component by a delta
    pub fn translate(&mut self, delta: Vec2) {
        self.transform = Affine::translate(delta) * self.transform;
    }

    /// Where the component's origin lands in the glyph
    pub fn origin(&self) -> Point {
        self.transform * Point::ORIGIN
    }
}

/// A guideline through a point at an angle (degrees)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Guideline {
    pub x: f64,
    pub y: f64,
    pub angle: f64,
    pub name: Option<String>,
    #[serde(skip)]
    pub selected: bool,
}

impl Guideline {
    pub fn new(pos: Point, angle: f64) -> Self {
        Self {
            x: pos.x,
            y: pos.y,
            angle,
            name: None,
            selected: false,
        }
    }

    pub fn pos(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// A selectable element of a glyph
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ItemRef {
    Point { path: EntityId, index: usize },
    Anchor(usize),
    Component(usize),
    Guideline(usize),
}

/// A glyph with editable outline data
#[derive(Debug, Clone)]
pub struct Glyph {
    pub name: String,
    pub width: f64,
    pub codepoints: Vec<char>,
    pub paths: Vec<Path>,
    pub anchors: Vec<Anchor>,
    pub components: Vec<Component>,
    pub guidelines: Vec<Guideline>,
    ids: IdAllocator,
    dirty: bool,
}

impl Glyph {
    pub fn new(name: impl Into<String>, width: f64) -> Self {
        Self {
            name: name.into(),
            width,
            codepoints: Vec::new(),
            paths: Vec::new(),
            anchors: Vec::new(),
            components: Vec::new(),
            guidelines: Vec::new(),
            ids: IdAllocator::new(),
            dirty: false,
        }
    }

    /// Allocate an ID for a path that is about to be created
    pub fn next_path_id(&mut self) -> EntityId {
        self.ids.next_id()
    }

    /// Append a new path built from `points`
    pub fn add_path(&mut self, points: Vec<PathPoint>, open: bool) -> EntityId {
        let id = self.ids.next_id();
        let mut path = Path::new(id, points, open);
        path.mark_dirty();
        self.paths.push(path);
        self.dirty = true;
        id
    }

    /// Insert an already-built path at `index`
    pub fn insert_path(&mut self, index: usize, mut path: Path) {
        path.mark_dirty();
        self.paths.insert(index.min(self.paths.len()), path);
        self.dirty = true;
    }

    pub fn path(&self, id: EntityId) -> Option<&Path> {
        self.paths.iter().find(|p| p.id() == id)
    }

    pub fn path_mut(&mut self, id: EntityId) -> Option<&mut Path> {
        self.paths.iter_mut().find(|p| p.id() == id)
    }

    pub fn path_index(&self, id: EntityId) -> Option<usize> {
        self.paths.iter().position(|p| p.id() == id)
    }

    pub fn remove_path(&mut self, id: EntityId) -> Option<Path> {
        let index = self.path_index(id)?;
        self.dirty = true;
        Some(self.paths.remove(index))
    }

    // ===== DIRTY TRACKING =====

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty || self.paths.iter().any(Path::is_dirty)
    }

    /// Clear all dirty flags
    ///
    /// Returns `None` when nothing changed, otherwise the IDs of the paths
    /// that were touched (possibly empty when only glyph-level data such as
    /// anchors or the path list itself changed).
    pub fn take_changes(&mut self) -> Option<Vec<EntityId>> {
        let glyph_dirty = std::mem::take(&mut self.dirty);
        let touched: Vec<EntityId> = self
            .paths
            .iter_mut()
            .filter_map(|p| p.take_dirty().then(|| p.id()))
            .collect();
        (glyph_dirty || !touched.is_empty()).then_some(touched)
    }

    // ===== SELECTION =====

    pub fn is_selected(&self, item: ItemRef) -> bool {
        match item {
            ItemRef::Point { path, index } => self
                .path(path)
                .and_then(|p| p.points().get(index))
                .is_some_and(|p| p.selected),
            ItemRef::Anchor(i) => self.anchors.get(i).is_some_and(|a| a.selected),
            ItemRef::Component(i) => self.components.get(i).is_some_and(|c| c.selected),
            ItemRef::Guideline(i) => self.guidelines.get(i).is_some_and(|g| g.selected),
        }
    }

    /// Set the selection flag of one item; stale references are ignored
    pub fn set_selected(&mut self, item: ItemRef, selected: bool) {
        match item {
            ItemRef::Point { path, index } => {
                if let Some(pt) = self
                    .path_mut(path)
                    .and_then(|p| p.points_mut().get_mut(index))
                {
                    pt.selected = selected;
                }
            }
            ItemRef::Anchor(i) => {
                if let Some(a) = self.anchors.get_mut(i) {
                    a.selected = selected;
                }
            }
            ItemRef::Component(i) => {
                if let Some(c) = self.components.get_mut(i) {
                    c.selected = selected;
                }
            }
            ItemRef::Guideline(i) => {
                if let Some(g) = self.guidelines.get_mut(i) {
                    g.selected = selected;
                }
            }
        }
    }

    pub fn toggle_selected(&mut self, item: ItemRef) {
        let selected = self.is_selected(item);
        self.set_selected(item, !selected);
    }

    /// Every currently selected item, in path/point order
    pub fn selected_items(&self) -> Vec<ItemRef> {
        let points = self.paths.iter().flat_map(|path| {
            path.points()
                .iter()
                .enumerate()
                .filter(|(_, p)| p.selected)
                .map(move |(index, _)| ItemRef::Point {
                    path: path.id(),
                    index,
                })
        });
        let anchors = self
            .anchors
            .iter()
            .enumerate()
            .filter(|(_, a)| a.selected)
            .map(|(i, _)| ItemRef::Anchor(i));
        let components = self
            .components
            .iter()
            .enumerate()
            .filter(|(_, c)| c.selected)
            .map(|(i, _)| ItemRef::Component(i));
        let guidelines = self
            .guidelines
            .iter()
            .enumerate()
            .filter(|(_, g)| g.selected)
            .map(|(i, _)| ItemRef::Guideline(i));
        points
            .chain(anchors)
            .chain(components)
            .chain(guidelines)
            .collect()
    }

    pub fn has_selection(&self) -> bool {
        self.paths.iter().any(Path::has_selection)
            || self.anchors.iter().any(|a| a.selected)
            || self.components.iter().any(|c| c.selected)
            || self.guidelines.iter().any(|g| g.selected)
    }

    pub fn clear_selection(&mut self) {
        for path in &mut self.paths {
            path.set_all_selected(false);
        }
        for a in &mut self.anchors {
            a.selected = false;
        }
        for c in &mut self.components {
            c.selected = false;
        }
        for g in &mut self.guidelines {
            g.selected = false;
        }
    }

    /// Position of a point-like item
    pub fn item_pos(&self, item: ItemRef) -> Option<Point> {
        match item {
            ItemRef::Point { path, index } => {
                self.path(path).and_then(|p| p.points().get(index)).map(PathPoint::pos)
            }
            ItemRef::Anchor(i) => self.anchors.get(i).map(Anchor::pos),
            ItemRef::Component(i) => self.components.get(i).map(Component::origin),
            ItemRef::Guideline(i) => self.guidelines.get(i).map(Guideline::pos),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SegmentType;

    fn glyph_with_line() -> (Glyph, EntityId) {
        let mut glyph = Glyph::new("a", 500.0);
        let id = glyph.add_path(
            vec![
                PathPoint::on_curve((0.0, 0.0), SegmentType::Move),
                PathPoint::on_curve((100.0, 0.0), SegmentType::Line),
            ],
            true,
        );
        (glyph, id)
    }

    #[test]
    fn add_path_assigns_fresh_ids() {
        let (mut glyph, first) = glyph_with_line();
        let second = glyph.add_path(Vec::new(), true);
        assert_ne!(first, second);
        assert_eq!(glyph.path_index(second), Some(1));
    }

    #[test]
    fn take_changes_reports_touched_paths_once() {
        let (mut glyph, id) = glyph_with_line();
        assert_eq!(glyph.take_changes(), Some(vec![id]));
        assert_eq!(glyph.take_changes(), None);

        glyph.anchors.push(Anchor::new("top", Point::new(50.0, 700.0)));
        glyph.mark_dirty();
        assert_eq!(glyph.take_changes(), Some(vec![]));
    }

    #[test]
    fn selection_round_trip_through_item_refs() {
        let (mut glyph, id) = glyph_with_line();
        glyph.anchors.push(Anchor::new("top", Point::new(50.0, 700.0)));
        let point = ItemRef::Point { path: id, index: 1 };

        glyph.set_selected(point, true);
        glyph.toggle_selected(ItemRef::Anchor(0));
        assert_eq!(glyph.selected_items(), vec![point, ItemRef::Anchor(0)]);

        glyph.clear_selection();
        assert!(!glyph.has_selection());
    }

    #[test]
    fn stale_item_refs_are_ignored() {
        let (mut glyph, id) = glyph_with_line();
        glyph.set_selected(ItemRef::Point { path: id, index: 9 }, true);
        glyph.set_selected(ItemRef::Guideline(3), true);
        assert!(!glyph.has_selection());
    }

    #[test]
    fn component_translation_moves_origin() {
        let mut component = Component::new("acute", Affine::IDENTITY);
        component.translate(Vec2::new(10.0, 20.0));
        assert_eq!(component.origin(), Point::new(10.0, 20.0));
    }
}
