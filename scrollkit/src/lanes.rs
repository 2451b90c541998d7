//! Lane strategies: how items are assigned to lanes and stacked along the main axis.
//!
//! The layout engine is written once against [`LaneLayout`]. Placement is sequential: item `i`
//! is placed from a [`LaneCursor`] that summarizes every item before it, so the engine can drop
//! placements past an index and resume from the remaining prefix.
//!
//! All three built-in strategies produce non-decreasing leading edges in index order, which the
//! engine relies on for offset lookups.

use alloc::vec;
use alloc::vec::Vec;

use crate::ItemSpan;

/// Where a single item was placed.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Placement {
    /// Leading edge in content space.
    pub start: f32,
    pub extent: f32,
    pub lane: usize,
    pub span: usize,
    pub line: usize,
}

impl Placement {
    pub fn end(&self) -> f32 {
        self.start + self.extent
    }
}

/// Running placement state after some prefix of items has been placed.
#[derive(Clone, Debug, PartialEq)]
pub struct LaneCursor {
    /// Trailing edge of each lane, `None` while the lane is still empty.
    pub lane_ends: Vec<Option<f32>>,
    /// Grid line currently being filled.
    pub line: usize,
    pub line_start: f32,
    pub line_extent: f32,
    /// Next free lane in the current grid line.
    pub next_lane: usize,
    /// Number of items placed so far.
    pub placed: usize,
    /// Leading edge of the first item.
    pub origin: f32,
}

impl LaneCursor {
    pub fn new(lanes: usize, origin: f32) -> Self {
        Self {
            lane_ends: vec![None; lanes.max(1)],
            line: 0,
            line_start: origin,
            line_extent: 0.0,
            next_lane: 0,
            placed: 0,
            origin,
        }
    }

    /// Leading edge available in `lane`: its trailing edge plus `gap`, or the origin when empty.
    pub fn lane_front(&self, lane: usize, gap: f32) -> f32 {
        match self.lane_ends.get(lane).copied().flatten() {
            Some(end) => end + gap,
            None => self.origin,
        }
    }
}

/// Capability interface implemented by list, grid and waterfall layouts.
pub trait LaneLayout {
    fn lane_count(&self) -> usize;

    /// Number of lanes item `index` occupies, given the data source's hint.
    fn lanes_for(&self, index: usize, span: ItemSpan) -> usize {
        let _ = index;
        let lanes = self.lane_count().max(1);
        match span {
            ItemSpan::Lanes(n) => n.clamp(1, lanes),
            ItemSpan::FullLine => lanes,
        }
    }

    /// Places the next item and advances `cursor`.
    fn place(&self, cursor: &mut LaneCursor, span: usize, extent: f32, gap: f32) -> Placement;

    /// Rebuilds the cursor that follows `placed` (a prefix of the placement table).
    fn resume(&self, placed: &[Placement], origin: f32, gap: f32) -> LaneCursor;

    /// Trailing edge of the content placed so far.
    fn content_end(&self, cursor: &LaneCursor) -> f32;

    /// Main-axis extent that `remaining` not yet placed items are expected to add.
    fn estimate_remaining(&self, cursor: &LaneCursor, remaining: usize, extent: f32, gap: f32)
    -> f32;
}

/// A single-lane linear list.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ListLanes;

impl LaneLayout for ListLanes {
    fn lane_count(&self) -> usize {
        1
    }

    fn place(&self, cursor: &mut LaneCursor, _span: usize, extent: f32, gap: f32) -> Placement {
        let start = cursor.lane_front(0, gap);
        cursor.lane_ends[0] = Some(start + extent);
        let line = cursor.placed;
        cursor.placed += 1;
        Placement {
            start,
            extent,
            lane: 0,
            span: 1,
            line,
        }
    }

    fn resume(&self, placed: &[Placement], origin: f32, _gap: f32) -> LaneCursor {
        let mut cursor = LaneCursor::new(1, origin);
        cursor.lane_ends[0] = placed.last().map(Placement::end);
        cursor.placed = placed.len();
        cursor
    }

    fn content_end(&self, cursor: &LaneCursor) -> f32 {
        cursor.lane_ends[0].unwrap_or(cursor.origin)
    }

    fn estimate_remaining(
        &self,
        cursor: &LaneCursor,
        remaining: usize,
        extent: f32,
        gap: f32,
    ) -> f32 {
        if remaining == 0 {
            return 0.0;
        }
        let total = remaining as f32 * (extent + gap);
        if cursor.placed == 0 { total - gap } else { total }
    }
}

/// A grid with a fixed lane count.
///
/// Items fill lines left to right. An item that does not fit in the remaining lanes of the
/// current line wraps to a new one. A line is as tall as its tallest member.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridLanes {
    lanes: usize,
}

impl GridLanes {
    pub fn new(lanes: usize) -> Self {
        Self {
            lanes: lanes.max(1),
        }
    }
}

impl LaneLayout for GridLanes {
    fn lane_count(&self) -> usize {
        self.lanes
    }

    fn place(&self, cursor: &mut LaneCursor, span: usize, extent: f32, gap: f32) -> Placement {
        let span = span.clamp(1, self.lanes);
        if cursor.placed == 0 {
            cursor.line = 0;
            cursor.line_start = cursor.origin;
            cursor.line_extent = 0.0;
            cursor.next_lane = 0;
        } else if cursor.next_lane + span > self.lanes {
            cursor.line += 1;
            cursor.line_start += cursor.line_extent + gap;
            cursor.line_extent = 0.0;
            cursor.next_lane = 0;
        }

        let lane = cursor.next_lane;
        cursor.next_lane += span;
        cursor.line_extent = cursor.line_extent.max(extent);
        let end = cursor.line_start + extent;
        for slot in &mut cursor.lane_ends[lane..lane + span] {
            *slot = Some(end);
        }
        cursor.placed += 1;
        Placement {
            start: cursor.line_start,
            extent,
            lane,
            span,
            line: cursor.line,
        }
    }

    fn resume(&self, placed: &[Placement], origin: f32, _gap: f32) -> LaneCursor {
        let mut cursor = LaneCursor::new(self.lanes, origin);
        let Some(last) = placed.last() else {
            return cursor;
        };
        cursor.line = last.line;
        cursor.line_start = last.start;
        cursor.next_lane = last.lane + last.span;
        cursor.placed = placed.len();
        for p in placed.iter().rev().take_while(|p| p.line == last.line) {
            cursor.line_extent = cursor.line_extent.max(p.extent);
            for slot in &mut cursor.lane_ends[p.lane..p.lane + p.span] {
                if slot.is_none() {
                    *slot = Some(p.end());
                }
            }
        }
        cursor
    }

    fn content_end(&self, cursor: &LaneCursor) -> f32 {
        if cursor.placed == 0 {
            cursor.origin
        } else {
            cursor.line_start + cursor.line_extent
        }
    }

    fn estimate_remaining(
        &self,
        cursor: &LaneCursor,
        remaining: usize,
        extent: f32,
        gap: f32,
    ) -> f32 {
        if remaining == 0 {
            return 0.0;
        }
        let lanes = self.lanes;
        let (free, lead) = if cursor.placed == 0 {
            (0, -gap)
        } else {
            let free = lanes.saturating_sub(cursor.next_lane);
            // Items landing in the current line only matter if they are taller than it.
            let grow = if remaining > 0 && free > 0 {
                (extent - cursor.line_extent).max(0.0)
            } else {
                0.0
            };
            (free, grow)
        };
        let rest = remaining.saturating_sub(free);
        let lines = rest.div_ceil(lanes);
        (lead + lines as f32 * (extent + gap)).max(0.0)
    }
}

/// A waterfall (staggered) layout: each item goes to the lane whose running extent is smallest.
///
/// Ties are broken by the lowest lane index. Items spanning every lane (or marked
/// [`ItemSpan::FullLine`]) start below the longest lane and level all lanes; partial multi-lane
/// spans are placed as single-lane items.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WaterfallLanes {
    lanes: usize,
}

impl WaterfallLanes {
    pub fn new(lanes: usize) -> Self {
        Self {
            lanes: lanes.max(1),
        }
    }

    fn shortest_lane(&self, cursor: &LaneCursor, gap: f32) -> (usize, f32) {
        let mut best = (0, cursor.lane_front(0, gap));
        for lane in 1..self.lanes {
            let front = cursor.lane_front(lane, gap);
            if front < best.1 {
                best = (lane, front);
            }
        }
        best
    }
}

impl LaneLayout for WaterfallLanes {
    fn lane_count(&self) -> usize {
        self.lanes
    }

    fn lanes_for(&self, _index: usize, span: ItemSpan) -> usize {
        match span {
            ItemSpan::Lanes(n) if n >= self.lanes => self.lanes,
            ItemSpan::Lanes(_) => 1,
            ItemSpan::FullLine => self.lanes,
        }
    }

    fn place(&self, cursor: &mut LaneCursor, span: usize, extent: f32, gap: f32) -> Placement {
        let line = cursor.placed;
        cursor.placed += 1;
        if span >= self.lanes && self.lanes > 1 {
            let start = (0..self.lanes)
                .map(|lane| cursor.lane_front(lane, gap))
                .fold(cursor.origin, f32::max);
            for slot in &mut cursor.lane_ends {
                *slot = Some(start + extent);
            }
            return Placement {
                start,
                extent,
                lane: 0,
                span: self.lanes,
                line,
            };
        }

        let (lane, start) = self.shortest_lane(cursor, gap);
        cursor.lane_ends[lane] = Some(start + extent);
        Placement {
            start,
            extent,
            lane,
            span: 1,
            line,
        }
    }

    fn resume(&self, placed: &[Placement], origin: f32, _gap: f32) -> LaneCursor {
        let mut cursor = LaneCursor::new(self.lanes, origin);
        cursor.placed = placed.len();
        let mut unresolved = self.lanes;
        for p in placed.iter().rev() {
            for slot in &mut cursor.lane_ends[p.lane..p.lane + p.span] {
                if slot.is_none() {
                    *slot = Some(p.end());
                    unresolved -= 1;
                }
            }
            if unresolved == 0 {
                break;
            }
        }
        cursor
    }

    fn content_end(&self, cursor: &LaneCursor) -> f32 {
        cursor
            .lane_ends
            .iter()
            .flatten()
            .copied()
            .fold(cursor.origin, f32::max)
    }

    fn estimate_remaining(
        &self,
        cursor: &LaneCursor,
        remaining: usize,
        extent: f32,
        gap: f32,
    ) -> f32 {
        if remaining == 0 {
            return 0.0;
        }
        // Remaining items first fill the lanes up to the longest one, then grow evenly.
        let longest = self.content_end(cursor);
        let slack: f32 = (0..self.lanes)
            .map(|lane| (longest - cursor.lane_front(lane, gap)).max(0.0))
            .sum();
        let total = remaining as f32 * (extent + gap) - slack;
        (total / self.lanes as f32).max(0.0)
    }
}

/// Cross-axis geometry of an item occupying `span` lanes starting at `lane`.
///
/// Returns `(cross_offset, cross_extent)`.
pub fn cross_geometry(
    lane: usize,
    span: usize,
    lanes: usize,
    cross_size: f32,
    cross_gap: f32,
) -> (f32, f32) {
    let lanes = lanes.max(1);
    let gaps = cross_gap * (lanes - 1) as f32;
    let lane_size = ((cross_size - gaps) / lanes as f32).max(0.0);
    let offset = lane as f32 * (lane_size + cross_gap);
    let extent = span as f32 * lane_size + span.saturating_sub(1) as f32 * cross_gap;
    (offset, extent)
}
