//! Drag-to-reorder.
//!
//! The controller never touches item data. It tracks where the dragged item would land and
//! how its neighbors should be displaced while it hovers, and on drop it reports the move so
//! the caller can apply it to its own collection (see [`move_index`]).

use alloc::collections::BTreeMap;

use scrollkit::{LaneLayout, LayoutEngine, LayoutItem, Point};

use crate::{SpringAnimation, SpringParams};

/// State of an active drag.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DragReorderState {
    pub dragged_index: usize,
    /// Where the dragged item would be if dropped now.
    pub insert_index: usize,
    /// Pointer travel since the drag started.
    pub drag_offset: Point,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ReorderEvent {
    Started { index: usize },
    /// The insert position changed.
    Moved { from: usize, to: usize },
    /// The drop was accepted. `from == to` when the item was dropped where it started; the
    /// order is then unchanged.
    Committed { from: usize, to: usize },
    Cancelled,
}

#[derive(Clone, Copy, Debug)]
struct Displacement {
    main: SpringAnimation,
    cross: SpringAnimation,
}

impl Displacement {
    fn at(&self, now_ms: u64) -> Point {
        Point::new(self.main.sample(now_ms).0, self.cross.sample(now_ms).0)
    }
}

/// Reorders items of a list or grid by dragging one of them.
///
/// The item order is owned by the caller. On [`ReorderEvent::Committed`] the controller only
/// moves the engine's cached extent of the dragged item to its new index. The caller must apply
/// the same move to its data (for example with [`move_index`]) before the next layout pass, or
/// cached extents and data no longer line up.
#[derive(Clone, Debug)]
pub struct ReorderController {
    support_animation: bool,
    spring: SpringParams,
    state: Option<DragReorderState>,
    pointer_start: Point,
    displacements: BTreeMap<usize, Displacement>,
}

impl Default for ReorderController {
    fn default() -> Self {
        Self::new(false)
    }
}

impl ReorderController {
    /// With `support_animation`, displaced neighbors spring to their new slots instead of
    /// jumping there.
    pub fn new(support_animation: bool) -> Self {
        Self {
            support_animation,
            spring: SpringParams::default(),
            state: None,
            pointer_start: Point::ZERO,
            displacements: BTreeMap::new(),
        }
    }

    pub fn with_spring(mut self, spring: SpringParams) -> Self {
        self.spring = spring;
        self
    }

    pub fn state(&self) -> Option<&DragReorderState> {
        self.state.as_ref()
    }

    pub fn is_dragging(&self) -> bool {
        self.state.is_some()
    }

    /// Starts dragging the resident item `index`. `pointer` is in content space.
    pub fn drag_start<L: LaneLayout>(
        &mut self,
        engine: &LayoutEngine<L>,
        pointer: Point,
        index: usize,
    ) -> Option<ReorderEvent> {
        if engine.item_rect(index).is_none() {
            swarn!(index, "cannot drag an item that is not laid out");
            return None;
        }
        sdebug!(index, "ReorderController::drag_start");
        self.pointer_start = pointer;
        self.displacements.clear();
        self.state = Some(DragReorderState {
            dragged_index: index,
            insert_index: index,
            drag_offset: Point::ZERO,
        });
        Some(ReorderEvent::Started { index })
    }

    /// Updates the pointer position. Reports a move only when the insert position changes.
    pub fn drag_move<L: LaneLayout>(
        &mut self,
        engine: &LayoutEngine<L>,
        pointer: Point,
        now_ms: u64,
    ) -> Option<ReorderEvent> {
        let state = self.state.as_mut()?;
        state.drag_offset = Point::new(
            pointer.main - self.pointer_start.main,
            pointer.cross - self.pointer_start.cross,
        );
        let state = *state;
        let to = insert_index(engine, &state)?;
        if to == state.insert_index {
            return None;
        }
        let from = state.insert_index;
        strace!(from, to, "ReorderController: insert index");
        if let Some(s) = self.state.as_mut() {
            s.insert_index = to;
        }
        self.displace(engine, state.dragged_index, from, to, now_ms);
        Some(ReorderEvent::Moved { from, to })
    }

    /// Drops the item. The engine's cached extents follow the move; the data does not.
    pub fn drag_end<L: LaneLayout>(
        &mut self,
        engine: &mut LayoutEngine<L>,
    ) -> Option<ReorderEvent> {
        let state = self.state.take()?;
        self.displacements.clear();
        let (from, to) = (state.dragged_index, state.insert_index);
        sdebug!(from, to, "ReorderController::drag_end");
        if from != to {
            engine.move_item(from, to);
        }
        Some(ReorderEvent::Committed { from, to })
    }

    /// Abandons the drag. The order is unchanged and all displacement is dropped.
    pub fn drag_cancel(&mut self) -> Option<ReorderEvent> {
        self.state.take()?;
        self.displacements.clear();
        Some(ReorderEvent::Cancelled)
    }

    /// Visual shift of item `index` while a drag is active. The dragged item itself follows the
    /// pointer by [`DragReorderState::drag_offset`].
    pub fn displacement(&self, index: usize, now_ms: u64) -> Point {
        match self.state {
            Some(s) if s.dragged_index == index => s.drag_offset,
            _ => self
                .displacements
                .get(&index)
                .map_or(Point::ZERO, |d| d.at(now_ms)),
        }
    }

    pub fn is_settled(&self, now_ms: u64) -> bool {
        self.displacements
            .values()
            .all(|d| d.main.is_done(now_ms) && d.cross.is_done(now_ms))
    }

    fn displace<L: LaneLayout>(
        &mut self,
        engine: &LayoutEngine<L>,
        dragged: usize,
        from: usize,
        to: usize,
        now_ms: u64,
    ) {
        let lo = from.min(to).min(dragged);
        let hi = from.max(to).max(dragged);
        for index in lo..=hi {
            if index == dragged {
                continue;
            }
            let target = slot_shift(engine, dragged, to, index);
            let current = self.displacement(index, now_ms);
            let entry = if self.support_animation {
                let retarget = |pos: f32, target: f32, vel: f32| {
                    SpringAnimation::new(pos, target, vel, self.spring, now_ms)
                };
                let (vm, vc) = self.displacements.get(&index).map_or((0.0, 0.0), |d| {
                    (d.main.sample(now_ms).1, d.cross.sample(now_ms).1)
                });
                Displacement {
                    main: retarget(current.main, target.main, vm),
                    cross: retarget(current.cross, target.cross, vc),
                }
            } else {
                let at_rest = |v: f32| SpringAnimation::new(v, v, 0.0, self.spring, now_ms);
                Displacement {
                    main: at_rest(target.main),
                    cross: at_rest(target.cross),
                }
            };
            self.displacements.insert(index, entry);
        }
    }
}

/// Shift that moves `index` into the slot it occupies while `dragged` hovers at `to`.
fn slot_shift<L: LaneLayout>(
    engine: &LayoutEngine<L>,
    dragged: usize,
    to: usize,
    index: usize,
) -> Point {
    let neighbor = if dragged < index && index <= to {
        index - 1
    } else if to <= index && index < dragged {
        index + 1
    } else {
        return Point::ZERO;
    };
    match (engine.item_rect(index), engine.item_rect(neighbor)) {
        (Some(own), Some(slot)) => {
            let (a, b) = (own.origin(), slot.origin());
            Point::new(b.main - a.main, b.cross - a.cross)
        }
        _ => Point::ZERO,
    }
}

fn shifted_rect(item: &LayoutItem, by: Point) -> (f32, f32, Point) {
    let center = item.center();
    (
        item.offset + by.main,
        item.end() + by.main,
        Point::new(center.main + by.main, center.cross + by.cross),
    )
}

/// Where the dragged item lands if dropped now.
///
/// Lists move the item past a neighbor once its leading or trailing edge crosses that
/// neighbor's midpoint. Grids use the cell under the dragged item's center.
fn insert_index<L: LaneLayout>(
    engine: &LayoutEngine<L>,
    state: &DragReorderState,
) -> Option<usize> {
    let dragged = engine.item_rect(state.dragged_index)?;
    let (start, end, center) = shifted_rect(&dragged, state.drag_offset);

    if engine.lanes().lane_count() > 1 {
        return Some(
            engine
                .hit_test(center)
                .map_or(state.insert_index, |item| item.index),
        );
    }

    let from = state.dragged_index;
    let mut to = from;
    let mut i = from + 1;
    while let Some(item) = engine.item_rect(i) {
        if item.center().main >= end {
            break;
        }
        to = i;
        i += 1;
    }
    if to == from {
        let mut i = from;
        while i > 0 {
            i -= 1;
            match engine.item_rect(i) {
                Some(item) if item.center().main > start => to = i,
                _ => break,
            }
        }
    }
    Some(to)
}

/// Moves `order[from]` to position `to`, shifting the items in between. Returns `false` and
/// leaves `order` untouched if either index is out of range.
///
/// ```
/// use scrollkit_adapter::move_index;
///
/// let mut order = [0, 1, 2, 3];
/// assert!(move_index(&mut order, 1, 2));
/// assert_eq!(order, [0, 2, 1, 3]);
/// ```
pub fn move_index<T>(order: &mut [T], from: usize, to: usize) -> bool {
    if from >= order.len() || to >= order.len() {
        return false;
    }
    if from < to {
        order[from..=to].rotate_left(1);
    } else if to < from {
        order[to..=from].rotate_right(1);
    }
    true
}
