// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Outline data model

pub mod entity_id;
pub mod glyph;
pub mod path;
pub mod point;
pub mod segment;
pub mod workspace;

pub use entity_id::{EntityId, IdAllocator};
pub use glyph::{Anchor, Component, Glyph, Guideline, ItemRef};
pub use path::Path;
pub use point::{PathPoint, SegmentType};
pub use segment::PathSegment;
pub use workspace::{FontMetrics, Workspace};
