// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Pointer state machine
//!
//! `Mouse` turns raw down/move/up events into higher level callbacks
//! (click, drag began/changed/ended) on a [`MouseDelegate`]. A press only
//! becomes a drag once the pointer has travelled past the drag threshold,
//! so small jitters during a click never move anything.

use kurbo::{Point, Vec2};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Keyboard modifiers held during a pointer event
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    /// The platform's primary command modifier (Cmd on macOS, Ctrl
    /// elsewhere)
    pub fn command(&self) -> bool {
        if cfg!(target_os = "macos") {
            self.meta
        } else {
            self.ctrl
        }
    }

    /// Shift plus the command modifier selects nudge moves
    pub fn nudge(&self) -> bool {
        self.shift && self.command()
    }

    /// Alt selects slide moves
    pub fn slide(&self) -> bool {
        self.alt
    }

    /// Modifier that adds to or toggles the selection
    pub fn toggle(&self) -> bool {
        self.command()
    }
}

/// A pointer event in glyph (design) coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MouseEvent {
    pub pos: Point,
    pub button: Option<MouseButton>,
    pub mods: Modifiers,
    /// Click count reported by the platform (2 for a double click)
    pub count: u8,
}

impl MouseEvent {
    pub fn new(pos: Point, button: Option<MouseButton>) -> Self {
        Self {
            pos,
            button,
            mods: Modifiers::default(),
            count: 1,
        }
    }

    pub fn with_modifiers(mut self, mods: Modifiers) -> Self {
        self.mods = mods;
        self
    }

    pub fn with_count(mut self, count: u8) -> Self {
        self.count = count;
        self
    }
}

/// The three events that describe a drag in progress
#[derive(Debug, Clone, Copy)]
pub struct Drag {
    pub start: MouseEvent,
    pub prev: MouseEvent,
    pub current: MouseEvent,
}

impl Drag {
    /// Total movement since the press
    pub fn delta_from_start(&self) -> Vec2 {
        self.current.pos - self.start.pos
    }

    /// Movement since the previous drag event
    pub fn delta_from_prev(&self) -> Vec2 {
        self.current.pos - self.prev.pos
    }
}

/// Receiver of the callbacks produced by [`Mouse`]
///
/// All methods have empty defaults so tools implement only what they need.
#[allow(unused_variables)]
pub trait MouseDelegate {
    type Data;

    fn left_down(&mut self, event: MouseEvent, data: &mut Self::Data) {}
    fn left_up(&mut self, event: MouseEvent, data: &mut Self::Data) {}
    fn left_click(&mut self, event: MouseEvent, data: &mut Self::Data) {}
    fn mouse_moved(&mut self, event: MouseEvent, data: &mut Self::Data) {}
    fn left_drag_began(&mut self, event: MouseEvent, drag: Drag, data: &mut Self::Data) {}
    fn left_drag_changed(&mut self, event: MouseEvent, drag: Drag, data: &mut Self::Data) {}
    fn left_drag_ended(&mut self, event: MouseEvent, drag: Drag, data: &mut Self::Data) {}
    fn cancel(&mut self, data: &mut Self::Data) {}
}

#[derive(Debug, Clone, Copy, Default)]
enum MouseState {
    #[default]
    Idle,
    Down(MouseEvent),
    Drag {
        start: MouseEvent,
        prev: MouseEvent,
    },
}

/// Pointer state machine
#[derive(Debug, Clone, Default)]
pub struct Mouse {
    state: MouseState,
}

impl Mouse {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, MouseState::Drag { .. })
    }

    pub fn is_down(&self) -> bool {
        !matches!(self.state, MouseState::Idle)
    }

    pub fn mouse_down<D: MouseDelegate>(&mut self, event: MouseEvent, delegate: &mut D, data: &mut D::Data) {
        if event.button != Some(MouseButton::Left) {
            return;
        }
        self.state = MouseState::Down(event);
        delegate.left_down(event, data);
    }

    /// Handle pointer motion
    ///
    /// `threshold` is the drag threshold in glyph units.
    pub fn mouse_moved<D: MouseDelegate>(
        &mut self,
        event: MouseEvent,
        threshold: f64,
        delegate: &mut D,
        data: &mut D::Data,
    ) {
        match self.state {
            MouseState::Idle => delegate.mouse_moved(event, data),
            MouseState::Down(start) => {
                if start.pos.distance(event.pos) < threshold {
                    return;
                }
                self.state = MouseState::Drag { start, prev: event };
                delegate.left_drag_began(
                    event,
                    Drag {
                        start,
                        prev: start,
                        current: event,
                    },
                    data,
                );
            }
            MouseState::Drag { start, prev } => {
                self.state = MouseState::Drag { start, prev: event };
                delegate.left_drag_changed(
                    event,
                    Drag {
                        start,
                        prev,
                        current: event,
                    },
                    data,
                );
            }
        }
    }

    pub fn mouse_up<D: MouseDelegate>(&mut self, event: MouseEvent, delegate: &mut D, data: &mut D::Data) {
        match std::mem::take(&mut self.state) {
            MouseState::Idle => {}
            MouseState::Down(_) => {
                delegate.left_up(event, data);
                delegate.left_click(event, data);
            }
            MouseState::Drag { start, prev } => {
                delegate.left_drag_ended(
                    event,
                    Drag {
                        start,
                        prev,
                        current: event,
                    },
                    data,
                );
                delegate.left_up(event, data);
            }
        }
    }

    /// Abandon any press or drag in progress
    pub fn cancel<D: MouseDelegate>(&mut self, delegate: &mut D, data: &mut D::Data) {
        if !matches!(std::mem::take(&mut self.state), MouseState::Idle) {
            delegate.cancel(data);
        }
    }
}
