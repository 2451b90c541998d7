//! Visible-content anchoring.
//!
//! An anchor pins one item to a viewport-relative position. The engine captures one before
//! anything that moves items around (re-measurement, inserts, resizes, restore) and derives the
//! new offset from it afterwards, so the content under the user's eyes does not jump.

/// One item pinned at a position relative to the viewport's leading edge.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VisibleAnchor {
    pub index: usize,
    /// Item leading edge minus scroll offset. Negative when the item is partially scrolled past.
    pub position: f32,
}

impl VisibleAnchor {
    pub fn new(index: usize, position: f32) -> Self {
        Self { index, position }
    }

    /// Offset that puts an item whose leading edge is at `item_start` back at `position`.
    pub fn offset_for(&self, item_start: f32) -> f32 {
        item_start - self.position
    }

    /// Follows the anchored item through an insert (`count_delta > 0`) or removal at `start`.
    ///
    /// When the anchored item itself is removed, the first item after the removed run inherits
    /// its position.
    pub fn after_data_change(self, start: usize, count_delta: isize) -> Self {
        if self.index < start || count_delta == 0 {
            return self;
        }
        let index = if count_delta > 0 {
            self.index.saturating_add(count_delta.unsigned_abs())
        } else {
            let removed = count_delta.unsigned_abs();
            if self.index < start.saturating_add(removed) {
                start
            } else {
                self.index - removed
            }
        };
        Self { index, ..self }
    }
}
