//! A headless virtualized scroll container engine.
//!
//! For frame-driven controllers (scroll physics, snapping, reorder, chain animation), see the
//! `scrollkit-adapter` crate.
//!
//! This crate focuses on the layout side of a virtualized container: incremental measurement
//! and placement of list, grid and waterfall items, a contiguous resident window with cache
//! margins, visible-content anchoring, and scroll-to-index alignment.
//!
//! It is UI-agnostic. A TUI/GUI layer is expected to provide:
//! - viewport size (main and cross axis)
//! - scroll offset
//! - item count and a way to measure an item (see [`ItemSource`])
#![forbid(unsafe_code)]

extern crate alloc;

#[macro_use]
mod macros;

mod align;
mod anchor;
mod engine;
mod geometry;
mod lanes;
mod options;
mod source;
mod state;
mod types;


pub use align::{AlignFrame, AlignTarget, Resolution, TargetIndex, align_offset};
pub use anchor::VisibleAnchor;
pub use engine::{LayoutEngine, LayoutPass};
pub use geometry::{LayoutItem, LayoutWindow};
pub use lanes::{
    GridLanes, LaneCursor, LaneLayout, ListLanes, Placement, WaterfallLanes, cross_geometry,
};
pub use options::{CacheExtent, LayoutOptions};
pub use source::{FromFn, ItemSource, from_fn};
pub use state::{RestoreInfo, RestoreInfoError, ScrollState};
pub use types::{Align, Edge, IndexRange, ItemSpan, Point};
