//! Scroll-to-index resolution.
//!
//! [`LayoutEngine::resolve`] answers "which offset shows item K at alignment A". Resident items
//! resolve exactly. Anything else resolves against estimated placement, and the caller is
//! expected to apply that offset, lay out, and resolve again until the answer is exact.

use crate::lanes::LaneLayout;
use crate::{Align, ItemSource, LayoutEngine};

/// The item a scroll-to-index request targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TargetIndex {
    Index(usize),
    /// Whatever the last item is when the request is resolved.
    Last,
}

impl TargetIndex {
    /// Maps a signed index: `-1` is the last item, anything below is invalid.
    pub fn from_signed(index: i64) -> Option<Self> {
        match index {
            -1 => Some(Self::Last),
            i if i < -1 => None,
            i => usize::try_from(i).ok().map(Self::Index),
        }
    }

    pub fn resolve(self, count: usize) -> Option<usize> {
        match self {
            Self::Index(i) if i < count => Some(i),
            Self::Index(_) => None,
            Self::Last => count.checked_sub(1),
        }
    }
}

/// A scroll-to-index request.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AlignTarget {
    pub index: TargetIndex,
    pub align: Align,
    /// Added after alignment and clamping.
    pub extra_offset: f32,
    /// Aligns a child of a grouped item instead of the whole item.
    pub index_in_group: Option<usize>,
    /// Lets `extra_offset` push the result outside `[0, scrollable_distance]`.
    pub can_overscroll: bool,
}

impl AlignTarget {
    pub fn new(index: usize, align: Align) -> Self {
        Self {
            index: TargetIndex::Index(index),
            align,
            extra_offset: 0.0,
            index_in_group: None,
            can_overscroll: false,
        }
    }

    pub fn last(align: Align) -> Self {
        Self {
            index: TargetIndex::Last,
            ..Self::new(0, align)
        }
    }

    /// `None` for indices below `-1`.
    pub fn from_signed(index: i64, align: Align) -> Option<Self> {
        let index = TargetIndex::from_signed(index)?;
        Some(Self {
            index,
            ..Self::new(0, align)
        })
    }

    pub fn with_extra_offset(mut self, extra_offset: f32) -> Self {
        self.extra_offset = extra_offset;
        self
    }

    pub fn with_index_in_group(mut self, child: usize) -> Self {
        self.index_in_group = Some(child);
        self
    }

    pub fn with_can_overscroll(mut self, can_overscroll: bool) -> Self {
        self.can_overscroll = can_overscroll;
        self
    }
}

/// Outcome of resolving an [`AlignTarget`].
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Resolution {
    /// The target is resident and measured; the offset is final.
    Exact(f32),
    /// The offset depends on estimated extents and may move once they are measured.
    Estimated(f32),
    /// The index does not exist. Nothing should change.
    NotFound,
}

impl Resolution {
    pub fn offset(self) -> Option<f32> {
        match self {
            Self::Exact(o) | Self::Estimated(o) => Some(o),
            Self::NotFound => None,
        }
    }

    pub fn is_exact(self) -> bool {
        matches!(self, Self::Exact(_))
    }
}

/// Viewport geometry an alignment is computed against.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AlignFrame {
    pub offset: f32,
    pub viewport: f32,
    pub start_inset: f32,
    pub end_inset: f32,
}

/// Offset that puts the span `[start, start + extent)` at `align`, before clamping.
///
/// [`Align::None`] behaves like [`Align::Start`]. [`Align::Auto`] keeps the current offset if
/// the span is already fully visible, otherwise aligns to the nearer edge.
pub fn align_offset(start: f32, extent: f32, align: Align, frame: AlignFrame) -> f32 {
    let end = start + extent;
    let to_start = start - frame.start_inset;
    let to_end = end + frame.end_inset - frame.viewport;
    match align {
        Align::Start | Align::None => to_start,
        Align::End => to_end,
        Align::Center => start + extent / 2.0 - frame.viewport / 2.0,
        Align::Auto => {
            let view_start = frame.offset + frame.start_inset;
            let view_end = frame.offset + frame.viewport - frame.end_inset;
            if start >= view_start && end <= view_end {
                frame.offset
            } else if start < view_start {
                to_start
            } else {
                to_end
            }
        }
    }
}

impl<L: LaneLayout> LayoutEngine<L> {
    /// Resolves `target` against the current layout.
    ///
    /// Calling this again with a target that is already satisfied returns the same offset.
    pub fn resolve<S: ItemSource + ?Sized>(
        &mut self,
        source: &S,
        target: &AlignTarget,
    ) -> Resolution {
        let count = source.item_count();
        let Some(index) = target.index.resolve(count) else {
            swarn!(target = ?target.index, count, "align target not found");
            return Resolution::NotFound;
        };
        let Some(p) = self.locate(source, index) else {
            return Resolution::NotFound;
        };

        let (start, extent) = match target
            .index_in_group
            .and_then(|child| source.group_child(index, child))
        {
            Some((within, child_extent)) => (p.start + within, child_extent),
            None => (p.start, p.extent),
        };

        let options = self.options();
        let frame = AlignFrame {
            offset: self.offset(),
            viewport: options.viewport_main,
            start_inset: options.content_start_offset,
            end_inset: options.content_end_offset,
        };
        let max = self.scrollable_distance();
        let mut offset = align_offset(start, extent, target.align, frame).clamp(0.0, max);
        offset += target.extra_offset;
        if !target.can_overscroll {
            offset = offset.clamp(0.0, max);
        }

        let exact = self.window().contains(index) && self.measured_extent(index).is_some();
        strace!(index, offset, exact, "LayoutEngine::resolve");
        if exact {
            Resolution::Exact(offset)
        } else {
            Resolution::Estimated(offset)
        }
    }
}
