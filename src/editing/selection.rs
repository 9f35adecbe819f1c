// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Immutable selection set for tracking which items are selected.
//!
//! The authoritative selection state lives in the `selected` flags of the
//! glyph's points, anchors, components and guidelines. `Selection` is a
//! snapshot of those flags: rubber-band selection captures the selection
//! at drag start and combines it with the items under the band, then
//! writes the result back with [`Selection::apply`].
//!
//! `Selection` wraps an `Arc<BTreeSet<ItemRef>>` so it can be cheaply
//! cloned. Mutations produce a new set. The `BTreeSet` gives deterministic
//! iteration order.

use crate::model::{Glyph, ItemRef};
use std::collections::BTreeSet;
use std::sync::Arc;

/// A set of selected items
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    inner: Arc<BTreeSet<ItemRef>>,
}

impl Selection {
    /// Create a new empty selection
    pub fn new() -> Self {
        Self {
            inner: Arc::new(BTreeSet::new()),
        }
    }

    /// Snapshot the selection flags of `glyph`
    pub fn capture(glyph: &Glyph) -> Self {
        glyph.selected_items().into_iter().collect()
    }

    /// Make `glyph`'s selection flags match this set exactly
    pub fn apply(&self, glyph: &mut Glyph) {
        glyph.clear_selection();
        for item in self.iter() {
            glyph.set_selected(*item, true);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn contains(&self, item: &ItemRef) -> bool {
        self.inner.contains(item)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ItemRef> {
        self.inner.iter()
    }

    /// Add an item to the selection
    pub fn insert(&mut self, item: ItemRef) {
        let mut set = (*self.inner).clone();
        set.insert(item);
        self.inner = Arc::new(set);
    }

    /// Remove an item from the selection
    pub fn remove(&mut self, item: &ItemRef) {
        let mut set = (*self.inner).clone();
        set.remove(item);
        self.inner = Arc::new(set);
    }

    /// Items in exactly one of the two sets (toggle semantics)
    pub fn symmetric_difference(&self, other: &Selection) -> Selection {
        self.inner.symmetric_difference(&other.inner).copied().collect()
    }

    /// Items in either set
    pub fn union(&self, other: &Selection) -> Selection {
        self.inner.union(&other.inner).copied().collect()
    }
}

impl Default for Selection {
    fn default() -> Self {
        Self::new()
    }
}

impl FromIterator<ItemRef> for Selection {
    fn from_iter<I: IntoIterator<Item = ItemRef>>(iter: I) -> Self {
        Self {
            inner: Arc::new(iter.into_iter().collect()),
        }
    }
}
