use core::ops::Range;

/// Target position of an item relative to the viewport.
///
/// Used both for scroll-to-index requests and for snap alignment.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Align {
    /// Leading edge of the item at the leading edge of the viewport.
    #[default]
    Start,
    /// Center of the item at the center of the viewport.
    Center,
    /// Trailing edge of the item at the trailing edge of the viewport.
    End,
    /// Leave the offset alone if the item is fully visible, otherwise align to the nearer edge.
    Auto,
    /// No explicit alignment. Jumps place the item at the leading edge.
    None,
}

/// One of the two ends of the scrollable content.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Edge {
    Start,
    End,
}

/// How many lanes an item occupies in the cross axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ItemSpan {
    /// A fixed number of lanes (clamped to `[1, lane_count]`).
    Lanes(usize),
    /// Irregular placement: the item starts a fresh line and fills it.
    FullLine,
}

impl Default for ItemSpan {
    fn default() -> Self {
        Self::Lanes(1)
    }
}

/// A point in content space, split into main and cross axis components.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub main: f32,
    pub cross: f32,
}

impl Point {
    pub const ZERO: Self = Self {
        main: 0.0,
        cross: 0.0,
    };

    pub fn new(main: f32, cross: f32) -> Self {
        Self { main, cross }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IndexRange {
    pub start_index: usize,
    pub end_index: usize, // exclusive
}

impl IndexRange {
    pub const EMPTY: Self = Self {
        start_index: 0,
        end_index: 0,
    };

    pub fn new(start_index: usize, end_index: usize) -> Self {
        Self {
            start_index,
            end_index: end_index.max(start_index),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.start_index >= self.end_index
    }

    pub fn len(&self) -> usize {
        self.end_index.saturating_sub(self.start_index)
    }

    pub fn contains(&self, index: usize) -> bool {
        index >= self.start_index && index < self.end_index
    }

    /// Index of the last item in the range, if any.
    pub fn last(&self) -> Option<usize> {
        (!self.is_empty()).then(|| self.end_index - 1)
    }

    pub fn as_range(&self) -> Range<usize> {
        self.start_index..self.end_index
    }
}
