// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Edit types for undo grouping

/// Type of edit being performed
///
/// Used to group consecutive edits of the same type into a single undo
/// action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditType {
    /// Normal edit (creates new undo group)
    Normal,

    /// Drag operation in progress (updates current undo group)
    Drag,

    /// Drag operation completed (creates undo group if not already in
    /// one)
    DragUp,

    /// Nudge up (combines with other Up nudges)
    NudgeUp,

    /// Nudge down (combines with other Down nudges)
    NudgeDown,

    /// Nudge left (combines with other Left nudges)
    NudgeLeft,

    /// Nudge right (combines with other Right nudges)
    NudgeRight,
}

impl EditType {
    /// Whether an edit of this type folds into a preceding edit of the
    /// same type instead of opening a new undo group
    pub fn coalesces_with(self, previous: Option<EditType>) -> bool {
        matches!(
            self,
            EditType::NudgeUp | EditType::NudgeDown | EditType::NudgeLeft | EditType::NudgeRight
        ) && previous == Some(self)
    }

    /// Nudge type for an arrow-key delta
    pub fn for_nudge(dx: f64, dy: f64) -> EditType {
        if dx < 0.0 {
            EditType::NudgeLeft
        } else if dx > 0.0 {
            EditType::NudgeRight
        } else if dy > 0.0 {
            EditType::NudgeUp
        } else {
            EditType::NudgeDown
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nudges_in_one_direction_coalesce() {
        assert!(EditType::NudgeUp.coalesces_with(Some(EditType::NudgeUp)));
        assert!(!EditType::NudgeUp.coalesces_with(Some(EditType::NudgeLeft)));
        assert!(!EditType::NudgeUp.coalesces_with(None));
        assert!(!EditType::Normal.coalesces_with(Some(EditType::Normal)));
    }

    #[test]
    fn nudge_direction_from_delta() {
        assert_eq!(EditType::for_nudge(-1.0, 0.0), EditType::NudgeLeft);
        assert_eq!(EditType::for_nudge(10.0, 0.0), EditType::NudgeRight);
        assert_eq!(EditType::for_nudge(0.0, 1.0), EditType::NudgeUp);
        assert_eq!(EditType::for_nudge(0.0, -1.0), EditType::NudgeDown);
    }
}
