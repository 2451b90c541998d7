use core::fmt;
use core::num::{ParseFloatError, ParseIntError};
use core::str::FromStr;

use thiserror::Error;

/// A lightweight, serializable snapshot of the scroll state.
///
/// Written only by the scroll controller; everything else reads it.
/// With `feature = "serde"`, this type implements `Serialize`/`Deserialize`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScrollState {
    /// Distance the content has moved toward increasing indices.
    pub offset: f32,
    /// Content extent minus viewport extent, never negative.
    pub scrollable_distance: f32,
    /// `true` while `scrollable_distance` is extrapolated from a running average.
    pub distance_estimated: bool,
    pub at_start: bool,
    pub at_end: bool,
    pub is_dragging: bool,
    pub is_animating: bool,
}

impl ScrollState {
    /// Whether a "scroll forward" accessibility action is available.
    pub fn can_scroll_forward(&self) -> bool {
        !self.at_end
    }

    pub fn can_scroll_backward(&self) -> bool {
        !self.at_start
    }

    /// Amount the offset lies outside `[0, scrollable_distance]`. Negative past the start.
    pub fn overscroll(&self) -> f32 {
        if self.offset < 0.0 {
            self.offset
        } else if self.offset > self.scrollable_distance {
            self.offset - self.scrollable_distance
        } else {
            0.0
        }
    }
}

/// The minimal persisted scroll position: first visible item and how far it is scrolled past.
///
/// The text form is `"<start_index>:<item_start_offset>"`. A bare `"<start_index>"` is accepted
/// as well and restores to the item's leading edge.
///
/// ```
/// use scrollkit::RestoreInfo;
///
/// let info: RestoreInfo = "12:30.5".parse().unwrap();
/// assert_eq!(info, RestoreInfo::new(12, 30.5));
/// assert_eq!(info.to_string(), "12:30.5");
/// assert_eq!("7".parse::<RestoreInfo>().unwrap(), RestoreInfo::new(7, 0.0));
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RestoreInfo {
    pub start_index: usize,
    /// How far the first visible item's leading edge lies before the viewport's leading edge.
    pub item_start_offset: f32,
}

impl RestoreInfo {
    pub fn new(start_index: usize, item_start_offset: f32) -> Self {
        Self {
            start_index,
            item_start_offset,
        }
    }
}

impl fmt::Display for RestoreInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.start_index, self.item_start_offset)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RestoreInfoError {
    #[error("restore info is empty")]
    Empty,

    #[error("invalid start index: {0}")]
    InvalidIndex(#[source] ParseIntError),

    #[error("invalid item start offset: {0}")]
    InvalidOffset(#[source] ParseFloatError),

    #[error("item start offset is not finite")]
    NonFiniteOffset,
}

impl FromStr for RestoreInfo {
    type Err = RestoreInfoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(RestoreInfoError::Empty);
        }
        let (index, offset) = match s.split_once(':') {
            Some((index, offset)) => (index, Some(offset)),
            None => (s, None),
        };
        let start_index = index
            .trim()
            .parse::<usize>()
            .map_err(RestoreInfoError::InvalidIndex)?;
        let item_start_offset = match offset {
            Some(offset) => offset
                .trim()
                .parse::<f32>()
                .map_err(RestoreInfoError::InvalidOffset)?,
            None => 0.0,
        };
        if !item_start_offset.is_finite() {
            return Err(RestoreInfoError::NonFiniteOffset);
        }
        Ok(Self {
            start_index,
            item_start_offset,
        })
    }
}
