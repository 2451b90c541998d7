//! Frame-driven controllers for the `scrollkit` layout engine.
//!
//! `scrollkit` computes which items are resident and where. This crate owns what changes over
//! time:
//!
//! - [`ScrollController`]: the scroll offset, drag with overscroll and edge effects, friction
//!   fling, spring-back, snap settling, smooth and timed programmatic scrolling, and convergent
//!   scroll-to-index jumps. Each [`ScrollController::tick`] returns edge-triggered
//!   [`ScrollEvent`]s.
//! - [`ReorderController`]: drag-to-reorder with optional displacement animation.
//! - [`ChainAnimation`]: neighbor spring propagation for lists.
//!
//! Like `scrollkit`, this crate is framework-agnostic. Time is passed in as milliseconds, so
//! adapters can drive it from any frame clock.
#![forbid(unsafe_code)]

extern crate alloc;

#[macro_use]
mod macros;

mod chain;
mod controller;
mod events;
mod options;
mod physics;
mod reorder;
mod snap;
mod tween;

#[cfg(test)]
mod tests;

pub use chain::{ChainAnimation, ChainOptions};
pub use controller::{JumpOutcome, ScrollController, ScrollPhase};
pub use events::ScrollEvent;
pub use options::{ControllerOptions, EdgeEffect, SnapOptions, SpringParams};
pub use physics::{FrictionFling, SpringAnimation, drag_with_overscroll, overscroll_friction};
pub use reorder::{DragReorderState, ReorderController, ReorderEvent, move_index};
pub use snap::{SnapBracket, bracket_snap_points, select_snap, snap_offset};
pub use tween::{Easing, Tween};
