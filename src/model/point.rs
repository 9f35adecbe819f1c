// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Points in an editable outline

use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

/// The kind of segment an on-curve point terminates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SegmentType {
    /// Start of an open path
    Move,
    /// Straight line
    Line,
    /// Cubic Bézier
    Curve,
    /// Quadratic (TrueType) curve
    QCurve,
}

/// A single point of a path
///
/// `kind` is `None` for off-curve control points. Only on-curve points
/// carry meaningful `smooth` flags.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PathPoint {
    pub x: f64,
    pub y: f64,
    pub kind: Option<SegmentType>,
    pub smooth: bool,
    pub selected: bool,
}

impl PathPoint {
    /// Create an on-curve point
    pub fn on_curve(pos: impl Into<Point>, kind: SegmentType) -> Self {
        let pos = pos.into();
        Self {
            x: pos.x,
            y: pos.y,
            kind: Some(kind),
            smooth: false,
            selected: false,
        }
    }

    /// Create an off-curve control point
    pub fn off_curve(pos: impl Into<Point>) -> Self {
        let pos = pos.into();
        Self {
            x: pos.x,
            y: pos.y,
            kind: None,
            smooth: false,
            selected: false,
        }
    }

    pub fn with_smooth(mut self, smooth: bool) -> Self {
        self.smooth = smooth;
        self
    }

    pub fn with_selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }

    pub fn pos(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn set_pos(&mut self, pos: Point) {
        self.x = pos.x;
        self.y = pos.y;
    }

    pub fn translate(&mut self, delta: Vec2) {
        self.x += delta.x;
        self.y += delta.y;
    }

    pub fn is_on_curve(&self) -> bool {
        self.kind.is_some()
    }

    pub fn is_off_curve(&self) -> bool {
        self.kind.is_none()
    }

    /// True for the `Move` point that starts an open path
    pub fn is_move(&self) -> bool {
        self.kind == Some(SegmentType::Move)
    }
}
