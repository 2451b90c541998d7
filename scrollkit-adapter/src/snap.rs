//! Snap-point selection.
//!
//! Snap offsets are the offsets that put an item's leading edge, center or trailing edge at the
//! matching edge of the viewport. After a gesture the controller brackets the offset it would
//! come to rest at between two snap points and picks one of them here.

use scrollkit::{Align, AlignFrame, ItemSource, LaneLayout, LayoutEngine, align_offset};

use crate::SnapOptions;

/// The two snap points around an offset. Either side is `None` past the first or last item.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SnapBracket {
    pub lower: Option<f32>,
    pub upper: Option<f32>,
}

/// Chooses between the snap points bracketing `offset`.
///
/// Moving forward (`velocity > 0`), the upper point wins once `offset` has covered
/// `hysteresis` of the way to it, or when the speed exceeds `velocity_threshold`. Moving
/// backward mirrors that. Without velocity the nearer point wins.
pub fn select_snap(
    bracket: SnapBracket,
    offset: f32,
    velocity: f32,
    opts: &SnapOptions,
) -> Option<f32> {
    let (lower, upper) = match (bracket.lower, bracket.upper) {
        (Some(lower), Some(upper)) => (lower, upper),
        (one, None) | (None, one) => return one,
    };
    let span = upper - lower;
    if span <= f32::EPSILON {
        return Some(lower);
    }
    let progress = ((offset - lower) / span).clamp(0.0, 1.0);
    let hysteresis = opts.hysteresis.clamp(0.0, 1.0);
    let fast = velocity.abs() >= opts.velocity_threshold;

    let pick_upper = if velocity > 0.0 {
        fast || progress >= hysteresis
    } else if velocity < 0.0 {
        !(fast || 1.0 - progress >= hysteresis)
    } else {
        progress >= 0.5
    };
    Some(if pick_upper { upper } else { lower })
}

fn snap_align(align: Align) -> Align {
    match align {
        Align::Center => Align::Center,
        Align::End => Align::End,
        _ => Align::Start,
    }
}

/// Snap offset of item `index`, clamped to the scrollable range.
pub fn snap_offset<L: LaneLayout, S: ItemSource + ?Sized>(
    engine: &mut LayoutEngine<L>,
    source: &S,
    index: usize,
    align: Align,
) -> Option<f32> {
    let p = engine.locate(source, index)?;
    let options = engine.options();
    let frame = AlignFrame {
        offset: engine.offset(),
        viewport: options.viewport_main,
        start_inset: options.content_start_offset,
        end_inset: options.content_end_offset,
    };
    let max = engine.scrollable_distance();
    Some(align_offset(p.start, p.extent, snap_align(align), frame).clamp(0.0, max))
}

/// Finds the snap points around `offset`, walking from the first visible item.
pub fn bracket_snap_points<L: LaneLayout, S: ItemSource + ?Sized>(
    engine: &mut LayoutEngine<L>,
    source: &S,
    offset: f32,
    align: Align,
) -> SnapBracket {
    let count = source.item_count();
    if count == 0 {
        return SnapBracket::default();
    }
    let mut k = engine.visible_range().start_index.min(count - 1);
    let Some(mut s) = snap_offset(engine, source, k, align) else {
        return SnapBracket::default();
    };
    while s > offset && k > 0 {
        k -= 1;
        match snap_offset(engine, source, k, align) {
            Some(prev) => s = prev,
            None => break,
        }
    }
    if s > offset {
        return SnapBracket {
            lower: None,
            upper: Some(s),
        };
    }
    while k + 1 < count {
        let Some(next) = snap_offset(engine, source, k + 1, align) else {
            break;
        };
        if next > offset {
            return SnapBracket {
                lower: Some(s),
                upper: Some(next),
            };
        }
        k += 1;
        s = next;
    }
    SnapBracket {
        lower: Some(s),
        upper: None,
    }
}
