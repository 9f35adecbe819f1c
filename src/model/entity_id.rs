// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Unique identifiers for paths.
//!
//! Each glyph owns an `IdAllocator` that hands out monotonically increasing
//! `EntityId`s. IDs are never reused within a glyph, so tool state that
//! holds a path ID after the path is deleted simply fails to resolve
//! instead of pointing at a different path.

/// A unique identifier for a path within a glyph
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntityId(u64);

impl EntityId {
    /// Raw numeric value, for diagnostics and serialization
    pub fn raw(self) -> u64 {
        self.0
    }
}

/// Source of fresh `EntityId`s
#[derive(Debug, Clone)]
pub struct IdAllocator {
    next: u64,
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

impl IdAllocator {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    /// Create a new unique entity ID
    pub fn next_id(&mut self) -> EntityId {
        let id = EntityId(self.next);
        self.next += 1;
        id
    }
}
