use alloc::vec::Vec;

use crate::{IndexRange, Point};

/// A resident item: measured, placed, and owned by the layout engine.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LayoutItem {
    pub index: usize,
    /// Leading edge in content space (includes `content_start_offset`).
    pub offset: f32,
    /// Size in the main axis (excludes `gap`).
    pub extent: f32,
    pub lane: usize,
    pub span: usize,
    /// Line (row) index for grids. Lists and waterfalls use the item index.
    pub line: usize,
    pub cross_offset: f32,
    pub cross_extent: f32,
}

impl LayoutItem {
    pub fn end(&self) -> f32 {
        self.offset + self.extent
    }

    pub fn center(&self) -> Point {
        Point {
            main: self.offset + self.extent / 2.0,
            cross: self.cross_offset + self.cross_extent / 2.0,
        }
    }

    pub fn contains(&self, point: Point) -> bool {
        point.main >= self.offset
            && point.main < self.end()
            && point.cross >= self.cross_offset
            && point.cross < self.cross_offset + self.cross_extent
    }

    pub fn origin(&self) -> Point {
        Point {
            main: self.offset,
            cross: self.cross_offset,
        }
    }
}

/// The contiguous set of resident items produced by a layout pass.
///
/// Items are stored densely starting at `start_index`, so the window can never contain a gap.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LayoutWindow {
    start_index: usize,
    items: Vec<LayoutItem>,
    start_main_pos: f32,
    end_main_pos: f32,
    synced: bool,
    estimated: bool,
}

impl LayoutWindow {
    pub(crate) fn new(
        start_index: usize,
        items: Vec<LayoutItem>,
        offset: f32,
        estimated: bool,
    ) -> Self {
        debug_assert!(
            items
                .iter()
                .enumerate()
                .all(|(i, it)| it.index == start_index + i),
            "LayoutWindow items must be contiguous"
        );
        let start_main_pos = items
            .iter()
            .map(|it| it.offset)
            .fold(f32::INFINITY, f32::min);
        let end_main_pos = items
            .iter()
            .map(LayoutItem::end)
            .fold(f32::NEG_INFINITY, f32::max);
        let (start_main_pos, end_main_pos) = if items.is_empty() {
            (0.0, 0.0)
        } else {
            (start_main_pos - offset, end_main_pos - offset)
        };
        Self {
            start_index,
            items,
            start_main_pos,
            end_main_pos,
            synced: true,
            estimated,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn start_index(&self) -> usize {
        self.start_index
    }

    /// Index of the last resident item (inclusive).
    pub fn end_index(&self) -> Option<usize> {
        self.range().last()
    }

    pub fn range(&self) -> IndexRange {
        IndexRange::new(self.start_index, self.start_index + self.items.len())
    }

    /// Viewport-relative leading edge of the first resident item.
    pub fn start_main_pos(&self) -> f32 {
        self.start_main_pos
    }

    /// Viewport-relative trailing edge of the last resident item.
    pub fn end_main_pos(&self) -> f32 {
        self.end_main_pos
    }

    /// `false` while a multi-step jump is still converging on its target.
    pub fn is_synced(&self) -> bool {
        self.synced
    }

    pub(crate) fn set_synced(&mut self, synced: bool) {
        self.synced = synced;
    }

    /// `true` when the scrollable distance behind this window is extrapolated.
    pub fn is_estimated(&self) -> bool {
        self.estimated
    }

    pub fn contains(&self, index: usize) -> bool {
        self.range().contains(index)
    }

    pub fn get(&self, index: usize) -> Option<&LayoutItem> {
        let i = index.checked_sub(self.start_index)?;
        self.items.get(i)
    }

    pub fn items(&self) -> &[LayoutItem] {
        &self.items
    }

    pub fn iter(&self) -> impl Iterator<Item = &LayoutItem> + '_ {
        self.items.iter()
    }

    /// Returns the resident item under `point` (content space), if any.
    pub fn hit_test(&self, point: Point) -> Option<&LayoutItem> {
        self.items.iter().find(|it| it.contains(point))
    }
}
