use alloc::vec::Vec;

use scrollkit::{Edge, IndexRange, ScrollState};

/// Notifications returned from [`crate::ScrollController::tick`].
///
/// All of them are edge-triggered: each fires once per transition, never repeatedly while a
/// condition holds.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ScrollEvent {
    ScrollStart,
    ScrollStop,
    ReachStart,
    ReachEnd,
    /// The visible range (without cache margins) changed.
    IndexRangeChanged { visible: IndexRange },
    /// A drag was clamped at `edge` with the `Fade` edge effect. `amount` is the distance that
    /// was clamped away.
    EdgeFade { edge: Edge, amount: f32 },
    /// A scroll-to-index request has been committed.
    JumpSettled { index: usize, offset: f32 },
}

/// Remembers the last observed state so events fire on transitions only.
#[derive(Clone, Debug, Default)]
pub(crate) struct EventTracker {
    scrolling: bool,
    at_start: Option<bool>,
    at_end: Option<bool>,
    visible: Option<IndexRange>,
}

impl EventTracker {
    /// Reports `ScrollStart` if motion began this frame.
    pub(crate) fn begin(&mut self, active: bool, out: &mut Vec<ScrollEvent>) {
        if active && !self.scrolling {
            self.scrolling = true;
            out.push(ScrollEvent::ScrollStart);
        }
    }

    /// Reports range and edge transitions, then `ScrollStop` if motion has ended.
    pub(crate) fn end(
        &mut self,
        active: bool,
        state: &ScrollState,
        visible: IndexRange,
        out: &mut Vec<ScrollEvent>,
    ) {
        if self.visible != Some(visible) {
            self.visible = Some(visible);
            out.push(ScrollEvent::IndexRangeChanged { visible });
        }
        if state.at_start && self.at_start != Some(true) {
            out.push(ScrollEvent::ReachStart);
        }
        if state.at_end && self.at_end != Some(true) {
            out.push(ScrollEvent::ReachEnd);
        }
        self.at_start = Some(state.at_start);
        self.at_end = Some(state.at_end);
        if !active && self.scrolling {
            self.scrolling = false;
            out.push(ScrollEvent::ScrollStop);
        }
    }
}
