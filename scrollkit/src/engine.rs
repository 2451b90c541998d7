use alloc::vec::Vec;

use crate::anchor::VisibleAnchor;
use crate::lanes::{GridLanes, LaneCursor, LaneLayout, ListLanes, Placement, WaterfallLanes};
use crate::{
    IndexRange, ItemSource, LayoutItem, LayoutOptions, LayoutWindow, Point, RestoreInfo,
    cross_geometry,
};

/// What a single [`LayoutEngine::layout`] call did.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LayoutPass {
    /// The offset the window was laid out at. Differs from the requested one when anchoring
    /// corrected it.
    pub offset: f32,
    /// `offset` minus the requested offset.
    pub correction: f32,
    /// Number of `measure` calls made.
    pub measured: usize,
    /// Number of items that left the resident window.
    pub recycled: usize,
    /// `true` if the resident index range changed.
    pub window_changed: bool,
}

/// A headless, incremental layout engine for list, grid and waterfall containers.
///
/// The engine is UI-agnostic:
/// - It never holds item content, only a cache of measured main-axis extents.
/// - The caller drives it with scroll offsets and an [`ItemSource`].
/// - It produces a contiguous [`LayoutWindow`] of resident items.
///
/// Placement is sequential and cached. Items that were never measured are placed with a running
/// average extent, and replaced once they become resident and get measured. Whenever that moves
/// items, the first visible item stays where it was on screen and the offset absorbs the
/// difference (reported as [`LayoutPass::correction`]).
#[derive(Clone, Debug)]
pub struct LayoutEngine<L = ListLanes> {
    lanes: L,
    options: LayoutOptions,
    count: usize,
    offset: f32,

    extents: Vec<Option<f32>>,
    measured_sum: f64,
    measured_count: usize,

    placed: Vec<Placement>,
    cursor: LaneCursor,
    max_extent: f32,

    window: LayoutWindow,
    visible: IndexRange,
    pending_anchor: Option<VisibleAnchor>,
}

impl LayoutEngine<ListLanes> {
    /// Creates a single-lane list engine.
    pub fn list(options: LayoutOptions) -> Self {
        Self::with_lanes(ListLanes, options)
    }
}

impl LayoutEngine<GridLanes> {
    pub fn grid(lanes: usize, options: LayoutOptions) -> Self {
        Self::with_lanes(GridLanes::new(lanes), options)
    }
}

impl LayoutEngine<WaterfallLanes> {
    pub fn waterfall(lanes: usize, options: LayoutOptions) -> Self {
        Self::with_lanes(WaterfallLanes::new(lanes), options)
    }
}

impl<L: LaneLayout> LayoutEngine<L> {
    pub fn with_lanes(lanes: L, options: LayoutOptions) -> Self {
        let options = options.sanitized();
        sdebug!(
            lanes = lanes.lane_count(),
            viewport_main = options.viewport_main,
            viewport_cross = options.viewport_cross,
            "LayoutEngine::new"
        );
        let cursor = LaneCursor::new(lanes.lane_count(), options.content_start_offset);
        Self {
            lanes,
            options,
            count: 0,
            offset: 0.0,
            extents: Vec::new(),
            measured_sum: 0.0,
            measured_count: 0,
            placed: Vec::new(),
            cursor,
            max_extent: 0.0,
            window: LayoutWindow::default(),
            visible: IndexRange::EMPTY,
            pending_anchor: None,
        }
    }

    pub fn lanes(&self) -> &L {
        &self.lanes
    }

    pub fn options(&self) -> &LayoutOptions {
        &self.options
    }

    /// Replaces the options, dropping whatever cached geometry they invalidate.
    ///
    /// The first visible item keeps its on-screen position across the change.
    pub fn set_options(&mut self, options: LayoutOptions) {
        let options = options.sanitized();
        let prev = core::mem::replace(&mut self.options, options);
        if prev == self.options {
            return;
        }
        strace!(
            viewport_main = self.options.viewport_main,
            viewport_cross = self.options.viewport_cross,
            gap = self.options.gap,
            "LayoutEngine::set_options"
        );
        self.stage_anchor();
        if prev.viewport_cross != self.options.viewport_cross
            || prev.cross_gap != self.options.cross_gap
        {
            // Measurements were taken against the old cross-axis constraint.
            self.clear_extents();
        } else if prev.gap != self.options.gap
            || prev.content_start_offset != self.options.content_start_offset
        {
            self.truncate(0);
        }
    }

    /// Clones the current options, applies `f`, then delegates to [`Self::set_options`].
    pub fn update_options(&mut self, f: impl FnOnce(&mut LayoutOptions)) {
        let mut next = self.options.clone();
        f(&mut next);
        self.set_options(next);
    }

    /// Viewport resize. A cross-axis change invalidates every measurement.
    pub fn set_viewport(&mut self, main: f32, cross: f32) {
        self.update_options(|o| {
            o.viewport_main = main;
            o.viewport_cross = cross;
        });
    }

    pub fn item_count(&self) -> usize {
        self.count
    }

    /// The offset of the last layout pass.
    pub fn offset(&self) -> f32 {
        self.offset
    }

    pub fn window(&self) -> &LayoutWindow {
        &self.window
    }

    /// Items intersecting the viewport itself, without the cache margins.
    pub fn visible_range(&self) -> IndexRange {
        self.visible
    }

    /// Marks the window as (not) synced with an in-flight multi-step jump.
    pub fn set_synced(&mut self, synced: bool) {
        self.window.set_synced(synced);
    }

    /// The measured extent of `index`, if it has been measured.
    pub fn measured_extent(&self, index: usize) -> Option<f32> {
        self.extents.get(index).copied().flatten()
    }

    /// Extent assumed for unmeasured items: the running average of measured ones.
    pub fn estimated_extent(&self) -> f32 {
        if self.measured_count == 0 {
            self.options.estimated_extent
        } else {
            (self.measured_sum / self.measured_count as f64) as f32
        }
    }

    /// Total content extent including both content insets.
    ///
    /// Exact once every item is placed and measured, otherwise extrapolated (see
    /// [`Self::is_estimated`]).
    pub fn estimated_total_extent(&self) -> f32 {
        let remaining = self.count.saturating_sub(self.placed.len());
        let tail = self.lanes.estimate_remaining(
            &self.cursor,
            remaining,
            self.estimated_extent(),
            self.options.gap,
        );
        self.lanes.content_end(&self.cursor) + tail + self.options.content_end_offset
    }

    /// Content extent minus viewport extent, never negative.
    pub fn scrollable_distance(&self) -> f32 {
        if self.count == 0 {
            return 0.0;
        }
        (self.estimated_total_extent() - self.options.viewport_main).max(0.0)
    }

    /// `true` while [`Self::scrollable_distance`] is a running-average extrapolation.
    pub fn is_estimated(&self) -> bool {
        self.placed.len() < self.count || self.measured_count < self.count
    }

    /// Geometry of a resident item.
    pub fn item_rect(&self, index: usize) -> Option<LayoutItem> {
        self.window.get(index).copied()
    }

    /// Known or estimated geometry of any placed item, resident or not.
    pub fn placement(&self, index: usize) -> Option<Placement> {
        self.placed.get(index).copied()
    }

    /// Places items (with estimates where needed) until `index` has a position, and returns it.
    pub fn locate<S: ItemSource + ?Sized>(
        &mut self,
        source: &S,
        index: usize,
    ) -> Option<Placement> {
        self.sync_count(source.item_count());
        if index >= self.count {
            return None;
        }
        self.ensure_placed_through(source, index);
        self.placed.get(index).copied()
    }

    /// Item under a viewport-relative point, lane-aware. Only placed items are considered.
    pub fn index_at(&self, main: f32, cross: f32) -> Option<usize> {
        let pos = self.offset + main;
        let from = self.first_ending_after(pos);
        self.placed[from..]
            .iter()
            .take_while(|p| p.start <= pos)
            .position(|p| {
                let (c0, ce) = self.cross_of(p);
                p.end() > pos && cross >= c0 && cross < c0 + ce
            })
            .map(|i| from + i)
    }

    /// The resident item under a content-space point.
    pub fn hit_test(&self, point: Point) -> Option<&LayoutItem> {
        self.window.hit_test(point)
    }

    /// Notifies the engine that `count_delta` items were inserted (positive) or removed
    /// (negative) at `start`.
    ///
    /// Indices at and after `start` are renumbered. With
    /// [`LayoutOptions::maintain_visible_content_position`], the next layout pass compensates the
    /// offset so the first visible item stays in place.
    pub fn data_changed(&mut self, start: usize, count_delta: isize) {
        let start = start.min(self.count);
        sdebug!(start, count_delta, count = self.count, "LayoutEngine::data_changed");
        if count_delta == 0 {
            return;
        }
        let anchor = if self.options.maintain_visible_content_position {
            self.capture_anchor()
                .map(|a| a.after_data_change(start, count_delta))
        } else {
            None
        };

        if count_delta > 0 {
            let added = count_delta.unsigned_abs();
            self.extents
                .splice(start..start, core::iter::repeat_n(None, added));
            self.count += added;
        } else {
            let end = start
                .saturating_add(count_delta.unsigned_abs())
                .min(self.count);
            for extent in self.extents.drain(start..end).flatten() {
                self.measured_sum -= extent as f64;
                self.measured_count -= 1;
            }
            self.count -= end - start;
        }
        self.truncate(start);
        if anchor.is_some() {
            self.pending_anchor = anchor;
        }
    }

    /// Reports an externally observed size change of one item.
    pub fn report_extent(&mut self, index: usize, extent: f32) {
        if index >= self.count {
            swarn!(index, count = self.count, "report_extent: index out of range");
            return;
        }
        let extent = sanitize_extent(index, extent);
        if self.extents[index] == Some(extent) {
            return;
        }
        strace!(index, extent, "LayoutEngine::report_extent");
        self.stage_anchor();
        self.record_extent(index, extent);
        if self.placed.get(index).is_some_and(|p| p.extent != extent) {
            self.truncate(index);
        }
    }

    /// Drops the measurement of `index` and of every item sharing its line.
    pub fn invalidate(&mut self, index: usize) {
        if index >= self.count {
            return;
        }
        let (first, last) = match self.placed.get(index) {
            Some(p) => {
                let line = p.line;
                let first = self.placed[..index]
                    .iter()
                    .rposition(|q| q.line != line)
                    .map_or(0, |i| i + 1);
                let last = self.placed[index..]
                    .iter()
                    .position(|q| q.line != line)
                    .map_or(self.placed.len(), |i| index + i);
                (first, last)
            }
            None => (index, index + 1),
        };
        sdebug!(index, first, last, "LayoutEngine::invalidate");
        self.stage_anchor();
        for i in first..last {
            self.forget_extent(i);
        }
        self.truncate(first);
    }

    pub fn invalidate_all(&mut self) {
        sdebug!(count = self.count, "LayoutEngine::invalidate_all");
        self.stage_anchor();
        self.clear_extents();
    }

    /// Moves the cached measurement of `from` to `to`, mirroring an array move of the data.
    pub fn move_item(&mut self, from: usize, to: usize) {
        if from >= self.count || to >= self.count || from == to {
            return;
        }
        let extent = self.extents.remove(from);
        self.extents.insert(to, extent);
        self.truncate(from.min(to));
    }

    /// Snapshot of the first visible item and how far it is scrolled past.
    pub fn restore_info(&self) -> Option<RestoreInfo> {
        let anchor = self.capture_anchor()?;
        Some(RestoreInfo::new(anchor.index, -anchor.position))
    }

    /// Schedules `info` to be applied by the next layout pass.
    pub fn apply_restore_info(&mut self, info: RestoreInfo) {
        sdebug!(
            start_index = info.start_index,
            item_start_offset = info.item_start_offset,
            "LayoutEngine::apply_restore_info"
        );
        self.pending_anchor = Some(VisibleAnchor::new(
            info.start_index,
            -info.item_start_offset,
        ));
    }

    /// Lays out the window for the offset advanced by `delta`.
    pub fn scroll_by<S: ItemSource + ?Sized>(&mut self, source: &mut S, delta: f32) -> LayoutPass {
        let offset = self.offset + delta;
        self.layout(source, offset)
    }

    /// Computes the resident window for `offset`.
    ///
    /// Newly exposed items are measured, items that left the window plus cache margins are
    /// recycled. If measurement (or a staged anchor) moves items, the returned pass carries the
    /// corrected offset, which the caller should adopt.
    pub fn layout<S: ItemSource + ?Sized>(&mut self, source: &mut S, offset: f32) -> LayoutPass {
        let requested = if offset.is_finite() { offset } else { self.offset };
        self.sync_count(source.item_count());
        let old_range = self.window.range();
        let mut offset = requested;

        let mut anchor = None;
        if let Some(pending) = self.pending_anchor.take() {
            if self.count > 0 {
                let pending =
                    VisibleAnchor::new(pending.index.min(self.count - 1), pending.position);
                offset = self.anchored_offset(source, pending);
                anchor = Some(pending);
            }
        }

        let vp = self.options.viewport_main;
        if self.count == 0 || vp <= 0.0 {
            self.offset = offset;
            self.window = LayoutWindow::new(0, Vec::new(), offset, self.is_estimated());
            self.visible = IndexRange::EMPTY;
            return self.finish_pass(requested, 0, old_range);
        }

        let before = self.options.cache_before.resolve(vp);
        let after = self.options.cache_after.resolve(vp);
        // The same item stays pinned for the whole pass.
        self.ensure_placed_to(source, offset + vp + after);
        let anchor = anchor.or_else(|| self.anchor_at(offset));

        let mut measured = 0;
        // Every pass that does not break measures one more item, so this terminates.
        loop {
            let (lo, hi) = (offset - before, offset + vp + after);
            self.ensure_placed_to(source, hi);
            let range = self.range_between(lo, hi);

            let mut first_changed = None;
            for index in range.as_range() {
                if self.extents[index].is_some() {
                    continue;
                }
                let p = self.placed[index];
                let cross = self.cross_of(&p).1;
                let extent = sanitize_extent(index, source.measure(index, cross));
                measured += 1;
                self.record_extent(index, extent);
                if extent != p.extent {
                    first_changed = Some(index);
                    break;
                }
            }

            let Some(changed) = first_changed else {
                break;
            };
            self.truncate(changed);
            if let Some(anchor) = anchor {
                offset = self.anchored_offset(source, anchor);
            }
        }

        let range = self.range_between(offset - before, offset + vp + after);
        self.visible = self.range_between(offset, offset + vp);
        self.offset = offset;

        let items = range.as_range().map(|i| self.layout_item(i)).collect();
        let estimated = self.is_estimated();
        self.window = LayoutWindow::new(range.start_index, items, offset, estimated);
        strace!(
            offset,
            start = range.start_index,
            end = range.end_index,
            measured,
            estimated,
            "LayoutEngine::layout"
        );
        self.finish_pass(requested, measured, old_range)
    }

    fn finish_pass(&self, requested: f32, measured: usize, old_range: IndexRange) -> LayoutPass {
        let new_range = self.window.range();
        let kept = old_range
            .end_index
            .min(new_range.end_index)
            .saturating_sub(old_range.start_index.max(new_range.start_index));
        LayoutPass {
            offset: self.offset,
            correction: self.offset - requested,
            measured,
            recycled: old_range.len() - kept.min(old_range.len()),
            window_changed: old_range != new_range,
        }
    }

    fn layout_item(&self, index: usize) -> LayoutItem {
        let p = self.placed[index];
        let (cross_offset, cross_extent) = self.cross_of(&p);
        LayoutItem {
            index,
            offset: p.start,
            extent: p.extent,
            lane: p.lane,
            span: p.span,
            line: p.line,
            cross_offset,
            cross_extent,
        }
    }

    fn cross_of(&self, p: &Placement) -> (f32, f32) {
        cross_geometry(
            p.lane,
            p.span,
            self.lanes.lane_count(),
            self.options.viewport_cross,
            self.options.cross_gap,
        )
    }

    fn sync_count(&mut self, count: usize) {
        if count == self.count {
            return;
        }
        strace!(from = self.count, to = count, "LayoutEngine::sync_count");
        if count < self.count {
            for extent in self.extents.drain(count..).flatten() {
                self.measured_sum -= extent as f64;
                self.measured_count -= 1;
            }
            if self.placed.len() > count {
                self.truncate(count);
            }
        } else {
            self.extents.resize(count, None);
        }
        self.count = count;
    }

    fn record_extent(&mut self, index: usize, extent: f32) {
        self.forget_extent(index);
        self.extents[index] = Some(extent);
        self.measured_sum += extent as f64;
        self.measured_count += 1;
    }

    fn forget_extent(&mut self, index: usize) {
        if let Some(old) = self.extents[index].take() {
            self.measured_sum -= old as f64;
            self.measured_count -= 1;
        }
    }

    fn clear_extents(&mut self) {
        self.extents.iter_mut().for_each(|e| *e = None);
        self.measured_sum = 0.0;
        self.measured_count = 0;
        self.truncate(0);
    }

    /// Drops placements from `index` on and rebuilds the cursor from the remaining prefix.
    fn truncate(&mut self, index: usize) {
        if index >= self.placed.len() && index > 0 {
            return;
        }
        self.placed.truncate(index);
        if self.placed.is_empty() {
            self.max_extent = 0.0;
        }
        self.cursor = self.lanes.resume(
            &self.placed,
            self.options.content_start_offset,
            self.options.gap,
        );
    }

    fn place_next<S: ItemSource + ?Sized>(&mut self, source: &S) {
        let index = self.placed.len();
        let span = self.lanes.lanes_for(index, source.span(index));
        let extent = self.extents[index].unwrap_or_else(|| self.estimated_extent());
        let p = self
            .lanes
            .place(&mut self.cursor, span, extent, self.options.gap);
        self.max_extent = self.max_extent.max(p.extent);
        self.placed.push(p);
    }

    fn ensure_placed_through<S: ItemSource + ?Sized>(&mut self, source: &S, index: usize) {
        while self.placed.len() <= index && self.placed.len() < self.count {
            self.place_next(source);
        }
    }

    /// Places items until every item starting before `pos` has a position.
    fn ensure_placed_to<S: ItemSource + ?Sized>(&mut self, source: &S, pos: f32) {
        while self.placed.len() < self.count && self.placed.last().is_none_or(|p| p.start < pos) {
            self.place_next(source);
        }
    }

    /// First placed index whose trailing edge lies after `pos`.
    fn first_ending_after(&self, pos: f32) -> usize {
        let max_extent = self.max_extent;
        let from = self.placed.partition_point(|p| p.start + max_extent <= pos);
        self.placed[from..]
            .iter()
            .position(|p| p.end() > pos)
            .map_or(self.placed.len(), |i| from + i)
    }

    /// Contiguous range of placed items intersecting `(lo, hi)`.
    fn range_between(&self, lo: f32, hi: f32) -> IndexRange {
        let end = self.placed.partition_point(|p| p.start < hi);
        let start = self.first_ending_after(lo).min(end);
        IndexRange::new(start, end)
    }

    fn anchor_at(&self, offset: f32) -> Option<VisibleAnchor> {
        let range = self.range_between(offset, offset + self.options.viewport_main);
        if range.is_empty() {
            return None;
        }
        let p = self.placed[range.start_index];
        Some(VisibleAnchor::new(range.start_index, p.start - offset))
    }

    fn capture_anchor(&self) -> Option<VisibleAnchor> {
        if self.visible.is_empty() {
            return None;
        }
        self.anchor_at(self.offset)
    }

    fn stage_anchor(&mut self) {
        if self.pending_anchor.is_none() {
            self.pending_anchor = self.capture_anchor();
        }
    }

    fn anchored_offset<S: ItemSource + ?Sized>(
        &mut self,
        source: &S,
        anchor: VisibleAnchor,
    ) -> f32 {
        self.ensure_placed_through(source, anchor.index);
        match self.placed.get(anchor.index) {
            Some(p) => anchor.offset_for(p.start),
            None => self.offset,
        }
    }
}

#[cfg_attr(not(feature = "tracing"), allow(unused_variables))]
fn sanitize_extent(index: usize, extent: f32) -> f32 {
    if extent.is_finite() && extent >= 0.0 {
        extent
    } else {
        swarn!(index, extent, "measured extent is not a finite, non-negative value");
        0.0
    }
}
