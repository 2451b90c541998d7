use crate::*;

use scrollkit::{
    Align, AlignTarget, Edge, ItemSource, LayoutEngine, LayoutOptions, Point, RestoreInfo,
};

#[derive(Clone, Copy, Debug)]
struct Lcg(u64);

impl Lcg {
    fn new(seed: u64) -> Self {
        Self(seed)
    }

    fn next_u64(&mut self) -> u64 {
        // Deterministic, dependency-free PRNG for tests.
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.0 >> 11
    }

    fn gen_f32(&mut self, start: f32, end: f32) -> f32 {
        let unit = (self.next_u64() % 1_000_000) as f32 / 1_000_000.0;
        start + unit * (end - start)
    }
}

#[derive(Clone, Debug)]
struct Fixed {
    sizes: Vec<f32>,
}

impl Fixed {
    fn uniform(count: usize, size: f32) -> Self {
        Self {
            sizes: vec![size; count],
        }
    }

    /// Ten tall items followed by ninety short ones. Early measurements overestimate the tail.
    fn tall_head() -> Self {
        let mut sizes = vec![200.0; 10];
        sizes.extend([10.0; 90]);
        Self { sizes }
    }
}

impl ItemSource for Fixed {
    fn item_count(&self) -> usize {
        self.sizes.len()
    }

    fn measure(&mut self, index: usize, _cross_extent: f32) -> f32 {
        self.sizes[index]
    }
}

fn layout(viewport: f32) -> LayoutOptions {
    LayoutOptions::new(viewport).with_viewport(viewport, 300.0)
}

fn list(options: ControllerOptions) -> ScrollController {
    ScrollController::list(layout(600.0), options)
}

/// Ticks every 16 ms until the controller is idle, collecting events. Returns the last time.
fn settle(
    c: &mut ScrollController,
    src: &mut Fixed,
    mut now: u64,
    events: &mut Vec<ScrollEvent>,
) -> u64 {
    for _ in 0..1000 {
        now += 16;
        events.extend(c.tick(src, now));
        if c.phase() == ScrollPhase::Idle && !c.is_animating() {
            return now;
        }
    }
    panic!("controller did not settle: {:?}", c.phase());
}

fn settled_jump(events: &[ScrollEvent]) -> Option<(usize, f32)> {
    events.iter().find_map(|e| match *e {
        ScrollEvent::JumpSettled { index, offset } => Some((index, offset)),
        _ => None,
    })
}

#[test]
fn overscroll_friction_shrinks_to_zero() {
    assert_eq!(overscroll_friction(0.0, 600.0, 1.0), 1.0);
    assert_eq!(overscroll_friction(300.0, 600.0, 1.0), 0.25);
    assert_eq!(overscroll_friction(-300.0, 600.0, 0.72), 0.18);
    assert_eq!(overscroll_friction(600.0, 600.0, 1.0), 0.0);
    assert_eq!(overscroll_friction(900.0, 600.0, 1.0), 0.0);
    assert_eq!(overscroll_friction(10.0, 0.0, 1.0), 0.0);
}

#[test]
fn drag_with_overscroll_scales_only_outward_motion() {
    assert_eq!(drag_with_overscroll(0.0, -10.0, 1000.0, 600.0, 1.0, 600.0), -10.0);
    assert_eq!(drag_with_overscroll(-300.0, -100.0, 1000.0, 600.0, 1.0, 600.0), -325.0);
    // Back toward the content is 1:1, and may continue into range.
    assert_eq!(drag_with_overscroll(-300.0, 100.0, 1000.0, 600.0, 1.0, 600.0), -200.0);
    assert_eq!(drag_with_overscroll(-50.0, 150.0, 1000.0, 600.0, 1.0, 600.0), 100.0);
    // Inside the range nothing is scaled until the bound.
    assert_eq!(drag_with_overscroll(990.0, 10.0, 1000.0, 600.0, 1.0, 600.0), 1000.0);
    assert_eq!(drag_with_overscroll(500.0, -200.0, 1000.0, 600.0, 1.0, 600.0), 300.0);
    // The hard limit holds even with a huge ratio.
    assert_eq!(drag_with_overscroll(0.0, -5000.0, 1000.0, 600.0, 10.0, 100.0), -100.0);
}

#[test]
fn fling_follows_constant_deceleration() {
    let f = FrictionFling::new(100.0, 1200.0, 2400.0, 0);
    assert_eq!(f.final_position(), 400.0);
    assert_eq!(f.duration(), 0.5);
    assert_eq!(f.position(500), 400.0);
    assert_eq!(f.position(10_000), 400.0);
    assert_eq!(f.velocity(250), 600.0);
    assert!(!f.is_done(499));
    assert!(f.is_done(500));

    let back = FrictionFling::new(100.0, -1200.0, 2400.0, 0);
    assert_eq!(back.final_position(), -200.0);
    assert_eq!(back.velocity(250), -600.0);

    // Invalid friction falls back to something that still terminates.
    assert!(FrictionFling::new(0.0, 10.0, f32::NAN, 0).duration().is_finite());
}

#[test]
fn springs_settle_on_target_in_every_regime() {
    let critical = SpringParams::default();
    assert!((critical.critical_damping() - critical.damping).abs() < 0.01);

    for params in [
        critical,
        SpringParams::new(300.0, 8.0),
        SpringParams::new(100.0, 60.0),
    ] {
        let s = SpringAnimation::new(0.0, 250.0, 0.0, params, 0);
        assert!(s.sample(0).0.abs() < 1e-3);
        assert!(!s.is_done(0));
        assert!(s.is_done(20_000), "{params:?}");
        assert!((s.sample(20_000).0 - 250.0).abs() < params.rest_displacement);
    }

    // Underdamped springs overshoot, critical ones don't.
    let bouncy = SpringAnimation::new(0.0, 100.0, 0.0, SpringParams::new(300.0, 8.0), 0);
    assert!((0..2000).step_by(10).any(|t| bouncy.sample(t).0 > 100.0));
    let calm = SpringAnimation::new(0.0, 100.0, 0.0, critical, 0);
    assert!((0..2000).step_by(10).all(|t| calm.sample(t).0 <= 100.0));
}

#[test]
fn spring_retarget_is_continuous() {
    let mut s = SpringAnimation::new(0.0, 100.0, 0.0, SpringParams::default(), 0);
    let (pos, vel) = s.sample(120);
    s.retarget(120, 300.0);
    let (pos2, vel2) = s.sample(120);
    assert!((pos - pos2).abs() < 1e-3);
    assert!((vel - vel2).abs() < 1e-2);
    assert_eq!(s.target, 300.0);
}

#[test]
fn easing_endpoints_and_tween_sampling() {
    for e in [
        Easing::Linear,
        Easing::SmoothStep,
        Easing::EaseInOutCubic,
        Easing::EaseOutCubic,
    ] {
        assert_eq!(e.sample(0.0), 0.0);
        assert_eq!(e.sample(1.0), 1.0);
        assert_eq!(e.sample(2.0), 1.0);
    }
    let t = Tween::new(0.0, 800.0, 0, 200, Easing::Linear);
    assert_eq!(t.sample(100), 400.0);
    assert!(t.is_done(200));
    // A zero duration still finishes.
    assert!(Tween::new(0.0, 1.0, 5, 0, Easing::Linear).is_done(6));
}

#[test]
fn snap_selection_uses_direction_and_hysteresis() {
    let opts = SnapOptions::new(Align::Start);
    let b = SnapBracket {
        lower: Some(0.0),
        upper: Some(100.0),
    };
    // Forward: advance only past the threshold.
    assert_eq!(select_snap(b, 40.0, 100.0, &opts), Some(0.0));
    assert_eq!(select_snap(b, 60.0, 100.0, &opts), Some(100.0));
    // Backward mirrors it.
    assert_eq!(select_snap(b, 60.0, -100.0, &opts), Some(100.0));
    assert_eq!(select_snap(b, 40.0, -100.0, &opts), Some(0.0));
    // Fast releases always advance.
    assert_eq!(select_snap(b, 5.0, 2000.0, &opts), Some(100.0));
    assert_eq!(select_snap(b, 95.0, -2000.0, &opts), Some(0.0));
    // No velocity: nearest.
    assert_eq!(select_snap(b, 49.0, 0.0, &opts), Some(0.0));
    assert_eq!(select_snap(b, 51.0, 0.0, &opts), Some(100.0));
    // Thresholds are configuration.
    let eager = opts.with_hysteresis(0.3).with_velocity_threshold(50.0);
    assert_eq!(select_snap(b, 35.0, 10.0, &eager), Some(100.0));
    assert_eq!(select_snap(b, 5.0, 60.0, &eager), Some(100.0));
    // One-sided brackets.
    let tail = SnapBracket {
        lower: Some(1400.0),
        upper: None,
    };
    assert_eq!(select_snap(tail, 1450.0, 500.0, &opts), Some(1400.0));
    assert_eq!(select_snap(SnapBracket::default(), 10.0, 0.0, &opts), None);
}

#[test]
fn snap_points_bracket_the_offset() {
    let mut src = Fixed::uniform(20, 100.0);
    let mut engine = LayoutEngine::list(layout(600.0));
    engine.layout(&mut src, 0.0);

    let b = bracket_snap_points(&mut engine, &src, 130.0, Align::Start);
    assert_eq!(b, SnapBracket { lower: Some(100.0), upper: Some(200.0) });

    // Centers: item 3 centered is 50, item 4 is 150.
    let b = bracket_snap_points(&mut engine, &src, 120.0, Align::Center);
    assert_eq!(b, SnapBracket { lower: Some(50.0), upper: Some(150.0) });

    // Past the clamped end there is nothing further.
    let b = bracket_snap_points(&mut engine, &src, 1400.0, Align::Start);
    assert_eq!(b.lower, Some(1400.0));
    assert_eq!(b.upper, None);

    assert_eq!(snap_offset(&mut engine, &src, 2, Align::End), Some(0.0));
    assert_eq!(snap_offset(&mut engine, &src, 9, Align::End), Some(400.0));
    assert_eq!(snap_offset(&mut engine, &src, 99, Align::End), None);
}

#[test]
fn overscroll_springs_back_monotonically() {
    let mut src = Fixed::uniform(20, 100.0);
    let mut c = list(ControllerOptions::new());
    c.tick(&mut src, 0);

    c.drag_start();
    c.drag_update(-10.0);
    assert_eq!(c.offset(), -10.0);
    assert_eq!(c.state().overscroll(), -10.0);
    assert!(c.state().is_dragging);
    c.drag_end(0.0);

    let mut prev = c.offset().abs();
    let mut now = 0;
    for _ in 0..200 {
        now += 16;
        c.tick(&mut src, now);
        let over = c.offset().abs();
        if prev > 0.0 {
            assert!(over < prev, "{over} !< {prev}");
        } else {
            assert_eq!(over, 0.0);
        }
        prev = over;
    }
    assert_eq!(c.offset(), 0.0);
    assert_eq!(c.phase(), ScrollPhase::Idle);
}

#[test]
fn fling_ends_at_the_projected_position() {
    let mut src = Fixed::uniform(100, 100.0);
    let mut c = list(ControllerOptions::new());
    c.tick(&mut src, 0);
    c.scroll_by(100.0);
    c.tick(&mut src, 0);

    c.fling(1200.0);
    assert_eq!(c.phase(), ScrollPhase::Fling);
    let mut events = Vec::new();
    settle(&mut c, &mut src, 0, &mut events);
    assert!((c.offset() - 400.0).abs() < 1.0, "{}", c.offset());
    assert_eq!(events.last(), Some(&ScrollEvent::ScrollStop));
}

#[test]
fn fling_into_the_end_springs_back() {
    let mut src = Fixed::uniform(20, 100.0);
    let mut c = list(ControllerOptions::new());
    c.tick(&mut src, 0);
    c.scroll_to_offset(1300.0, false);
    c.tick(&mut src, 0);

    c.fling(3000.0);
    let mut now = 0;
    let mut saw_spring_back = false;
    for _ in 0..500 {
        now += 16;
        c.tick(&mut src, now);
        saw_spring_back |= c.phase() == ScrollPhase::SpringBack;
        assert!(c.offset() <= 1400.0 + 600.0);
        if c.phase() == ScrollPhase::Idle {
            break;
        }
    }
    assert!(saw_spring_back);
    assert_eq!(c.offset(), 1400.0);
    assert!(c.state().at_end);
    assert!(!c.can_scroll_forward());
}

#[test]
fn fling_stops_at_the_bound_without_spring_edge() {
    let mut src = Fixed::uniform(20, 100.0);
    let mut c = list(ControllerOptions::new().with_edge_effect(EdgeEffect::None));
    c.tick(&mut src, 0);
    c.scroll_to_offset(1300.0, false);
    c.tick(&mut src, 0);

    c.fling(3000.0);
    let mut events = Vec::new();
    settle(&mut c, &mut src, 0, &mut events);
    assert_eq!(c.offset(), 1400.0);
}

#[test]
fn offset_stays_within_overscroll_bounds() {
    for (edge, limit) in [
        (EdgeEffect::Spring, 600.0),
        (EdgeEffect::None, 0.0),
        (EdgeEffect::Fade, 0.0),
    ] {
        for seed in [7, 11] {
            let mut rng = Lcg::new(seed);
            let mut src = if seed == 7 {
                Fixed::uniform(50, 100.0)
            } else {
                Fixed::tall_head()
            };
            let mut c = list(ControllerOptions::new().with_edge_effect(edge));
            let mut now = 0;
            c.tick(&mut src, now);

            let check = |c: &ScrollController| {
                let (o, max) = (c.offset(), c.state().scrollable_distance);
                assert!(
                    o >= -limit - 1e-3 && o <= max + limit + 1e-3,
                    "{edge:?}/{seed}: {o} max {max}"
                );
            };
            for round in 0..60 {
                c.drag_start();
                for _ in 0..8 {
                    c.drag_update(rng.gen_f32(-900.0, 900.0));
                    check(&c);
                    now += 16;
                    c.tick(&mut src, now);
                    check(&c);
                }
                c.drag_end(rng.gen_f32(-6000.0, 6000.0));
                for _ in 0..(round % 5) * 6 {
                    now += 16;
                    c.tick(&mut src, now);
                    check(&c);
                }
            }
            let mut events = Vec::new();
            settle(&mut c, &mut src, now, &mut events);
            let (o, max) = (c.offset(), c.state().scrollable_distance);
            assert!((0.0..=max).contains(&o), "{edge:?}/{seed}: {o} max {max}");
        }
    }
}

#[test]
fn uniform_list_scrollable_distance_is_exact() {
    let mut src = Fixed::uniform(50, 100.0);
    let mut c = list(ControllerOptions::new());
    c.tick(&mut src, 0);
    assert_eq!(c.state().scrollable_distance, 4400.0);
}

#[test]
fn held_drag_follows_a_shrinking_tail() {
    for edge in [EdgeEffect::None, EdgeEffect::Fade, EdgeEffect::Spring] {
        let mut src = Fixed::tall_head();
        let mut c = list(ControllerOptions::new().with_edge_effect(edge));
        c.tick(&mut src, 0);

        c.drag_start();
        c.drag_update(1e6);
        for frame in 1..=4 {
            c.tick(&mut src, frame * 16);
            assert_eq!(c.phase(), ScrollPhase::Dragging);
            let (o, max) = (c.offset(), c.state().scrollable_distance);
            let limit = if edge == EdgeEffect::Spring { 600.0 } else { 0.0 };
            assert!(o <= max + limit + 1e-3, "{edge:?}: offset {o} past {max}");
        }
        if edge != EdgeEffect::Spring {
            // The last item ends at the bottom of the viewport, no blank space below it.
            let last = c.window().items().last().copied();
            let last = last.map(|item| (item.index, item.end()));
            assert_eq!(last.map(|(index, _)| index), Some(99));
            let end = last.map_or(0.0, |(_, end)| end);
            assert!((end - c.offset() - 600.0).abs() < 1e-2, "{edge:?}: {end}");
        }
    }
}

#[test]
fn fade_edge_clamps_and_reports() {
    let mut src = Fixed::uniform(20, 100.0);
    let mut c = list(ControllerOptions::new().with_edge_effect(EdgeEffect::Fade));
    c.tick(&mut src, 0);

    c.drag_start();
    c.drag_update(-25.0);
    assert_eq!(c.offset(), 0.0);
    let events = c.tick(&mut src, 16);
    assert_eq!(events[0], ScrollEvent::ScrollStart);
    assert!(events.contains(&ScrollEvent::EdgeFade {
        edge: Edge::Start,
        amount: 25.0
    }));

    let mut none = list(ControllerOptions::new().with_edge_effect(EdgeEffect::None));
    none.tick(&mut src, 0);
    none.drag_update(-25.0);
    assert_eq!(none.offset(), 0.0);
    let events = none.tick(&mut src, 16);
    assert!(!events.iter().any(|e| matches!(e, ScrollEvent::EdgeFade { .. })));
}

#[test]
fn snap_settles_on_item_edges() {
    let mut src = Fixed::uniform(20, 100.0);
    let snap = SnapOptions::new(Align::Start);
    let mut c = list(ControllerOptions::new().with_snap(Some(snap)));
    let mut now = 0;
    c.tick(&mut src, now);
    let mut events = Vec::new();

    // Slow release short of half an item settles back.
    c.drag_start();
    c.drag_update(130.0);
    c.drag_end(0.0);
    now = settle(&mut c, &mut src, now, &mut events);
    assert_eq!(c.offset(), 100.0);

    // Past half, in the direction of travel, advances.
    c.drag_start();
    c.drag_update(60.0);
    c.drag_end(100.0);
    now += 16;
    c.tick(&mut src, now);
    assert_eq!(c.phase(), ScrollPhase::SnapSettle);
    settle(&mut c, &mut src, now, &mut events);
    assert_eq!(c.offset(), 200.0);
}

#[test]
fn jump_converges_then_auto_keeps_item_visible() {
    let mut src = Fixed::uniform(20, 100.0);
    let mut c = list(ControllerOptions::new());
    let mut now = 0;
    c.tick(&mut src, now);

    let first = c.scroll_to_index(&src, AlignTarget::new(19, Align::Start), false);
    assert!(matches!(first, JumpOutcome::Scheduled(_)));
    assert!(!c.window().is_synced());
    let mut events = Vec::new();
    now = settle(&mut c, &mut src, now, &mut events);
    assert_eq!(settled_jump(&events), Some((19, 1400.0)));
    assert_eq!(c.offset(), 1400.0);
    assert!(c.window().is_synced());

    events.clear();
    c.scroll_to_index(&src, AlignTarget::new(5, Align::Auto), false);
    now = settle(&mut c, &mut src, now, &mut events);
    assert_eq!(settled_jump(&events), Some((5, 500.0)));
    assert_eq!(c.offset(), 500.0);

    // Satisfied targets don't drift.
    events.clear();
    c.scroll_to_index(&src, AlignTarget::new(5, Align::Auto), false);
    settle(&mut c, &mut src, now, &mut events);
    assert_eq!(settled_jump(&events), Some((5, 500.0)));
    assert_eq!(c.offset(), 500.0);
}

#[test]
fn jump_far_into_unmeasured_content_settles_exactly() {
    let mut rng = Lcg::new(11);
    let sizes: Vec<f32> = (0..500).map(|_| rng.gen_f32(40.0, 160.0).round()).collect();
    let mut src = Fixed { sizes };
    let mut c = list(ControllerOptions::new());
    c.tick(&mut src, 0);

    c.scroll_to_index(&src, AlignTarget::new(300, Align::Start), false);
    let mut events = Vec::new();
    settle(&mut c, &mut src, 0, &mut events);

    let (index, offset) = settled_jump(&events).expect("jump settled");
    assert_eq!(index, 300);
    let item = c.engine().item_rect(300).expect("target is resident");
    assert!((item.offset - offset).abs() < 0.5, "{} vs {offset}", item.offset);
    assert_eq!(item.extent, src.sizes[300]);
    assert_eq!(c.engine().visible_range().start_index, 300);
}

#[test]
fn smooth_jump_animates_to_the_exact_offset() {
    let mut src = Fixed::uniform(20, 100.0);
    let mut c = list(ControllerOptions::new());
    c.tick(&mut src, 0);

    c.scroll_to_index(&src, AlignTarget::new(10, Align::Center), true);
    let mut events = Vec::new();
    let mut now = 16;
    events.extend(c.tick(&mut src, now));
    assert_eq!(c.phase(), ScrollPhase::Smooth);
    let mut prev = c.offset();
    while c.is_animating() {
        now += 16;
        events.extend(c.tick(&mut src, now));
        assert!(c.offset() >= prev);
        prev = c.offset();
        assert!(now < 10_000);
    }
    assert_eq!(settled_jump(&events), Some((10, 750.0)));
    assert_eq!(c.offset(), 750.0);
}

#[test]
fn invalid_jump_targets_are_no_ops() {
    let mut src = Fixed::uniform(20, 100.0);
    let mut c = list(ControllerOptions::new());
    c.tick(&mut src, 0);
    c.scroll_to_offset(300.0, false);
    c.tick(&mut src, 16);

    let out = c.scroll_to_index(&src, AlignTarget::new(20, Align::Start), false);
    assert_eq!(out, JumpOutcome::NotFound);
    assert!(AlignTarget::from_signed(-2, Align::Start).is_none());
    let events = c.tick(&mut src, 32);
    assert!(events.is_empty());
    assert_eq!(c.offset(), 300.0);

    let last = AlignTarget::from_signed(-1, Align::Start).expect("last sentinel");
    c.scroll_to_index(&src, last, false);
    let mut events = Vec::new();
    settle(&mut c, &mut src, 32, &mut events);
    assert_eq!(settled_jump(&events), Some((19, 1400.0)));
}

#[test]
fn drag_supersedes_a_pending_jump() {
    let mut src = Fixed::uniform(200, 100.0);
    let mut c = list(ControllerOptions::new());
    c.tick(&mut src, 0);

    c.scroll_to_index(&src, AlignTarget::new(150, Align::Start), true);
    c.tick(&mut src, 16);
    c.drag_start();
    assert_eq!(c.phase(), ScrollPhase::Dragging);
    assert!(c.window().is_synced());
    let at = c.offset();
    c.drag_end(0.0);

    let mut events = Vec::new();
    settle(&mut c, &mut src, 16, &mut events);
    assert_eq!(settled_jump(&events), None);
    assert_eq!(c.offset(), at);
}

#[test]
fn events_fire_once_per_transition() {
    let mut src = Fixed::uniform(20, 100.0);
    let mut c = list(ControllerOptions::new());

    let events = c.tick(&mut src, 0);
    assert!(matches!(events[0], ScrollEvent::IndexRangeChanged { .. }));
    assert!(events.contains(&ScrollEvent::ReachStart));
    assert!(!events.contains(&ScrollEvent::ScrollStart));
    assert!(c.tick(&mut src, 16).is_empty());

    c.scroll_by(250.0);
    let events = c.tick(&mut src, 32);
    assert_eq!(events.first(), Some(&ScrollEvent::ScrollStart));
    assert_eq!(events.last(), Some(&ScrollEvent::ScrollStop));
    assert!(events.iter().any(|e| matches!(e, ScrollEvent::IndexRangeChanged { .. })));
    assert!(!events.contains(&ScrollEvent::ReachStart));
    assert!(c.tick(&mut src, 48).is_empty());

    c.scroll_by(-250.0);
    let events = c.tick(&mut src, 64);
    assert_eq!(events.iter().filter(|e| **e == ScrollEvent::ReachStart).count(), 1);

    c.scroll_to_offset(1e6, false);
    let events = c.tick(&mut src, 80);
    assert!(events.contains(&ScrollEvent::ReachEnd));
    assert_eq!(c.offset(), 1400.0);
    assert!(c.tick(&mut src, 96).is_empty());
}

#[test]
fn stop_cancels_and_reports_scroll_stop() {
    let mut src = Fixed::uniform(100, 100.0);
    let mut c = list(ControllerOptions::new());
    c.tick(&mut src, 0);
    c.fling(5000.0);
    c.tick(&mut src, 16);
    c.tick(&mut src, 32);
    assert_eq!(c.phase(), ScrollPhase::Fling);

    let at = c.offset();
    c.stop();
    let events = c.tick(&mut src, 48);
    assert_eq!(events, vec![ScrollEvent::ScrollStop]);
    assert_eq!(c.offset(), at);
    assert_eq!(c.phase(), ScrollPhase::Idle);
}

#[test]
fn page_and_edge_scrolling() {
    let mut src = Fixed::uniform(20, 100.0);
    let mut c = list(ControllerOptions::new());
    c.tick(&mut src, 0);
    assert!(!c.can_scroll_backward());
    assert!(c.can_scroll_forward());

    assert_eq!(c.scroll_page(true, false), 600.0);
    c.tick(&mut src, 16);
    assert_eq!(c.offset(), 600.0);
    assert_eq!(c.scroll_page(false, false), 0.0);

    c.scroll_to_edge(&src, Edge::End, false);
    let mut events = Vec::new();
    let now = settle(&mut c, &mut src, 16, &mut events);
    assert_eq!(c.offset(), 1400.0);
    assert!(c.state().at_end);

    c.scroll_to_edge(&src, Edge::Start, true);
    settle(&mut c, &mut src, now, &mut events);
    assert_eq!(c.offset(), 0.0);
}

#[test]
fn timed_scroll_follows_its_easing() {
    let mut src = Fixed::uniform(20, 100.0);
    let mut c = list(ControllerOptions::new());
    c.tick(&mut src, 0);

    assert_eq!(c.scroll_to_offset_with_duration(800.0, 200, Easing::Linear), 800.0);
    assert_eq!(c.phase(), ScrollPhase::Tween);
    c.tick(&mut src, 100);
    assert_eq!(c.offset(), 400.0);
    c.tick(&mut src, 200);
    assert_eq!(c.offset(), 800.0);
    assert_eq!(c.phase(), ScrollPhase::Idle);

    // Targets are clamped.
    assert_eq!(c.scroll_to_offset_with_duration(9000.0, 100, Easing::EaseOutCubic), 1400.0);
}

#[test]
fn timed_scroll_restarts_from_the_current_position() {
    let mut src = Fixed::uniform(20, 100.0);
    let mut c = list(ControllerOptions::new());
    c.tick(&mut src, 0);

    c.scroll_to_offset_with_duration(800.0, 200, Easing::Linear);
    c.tick(&mut src, 100);
    assert_eq!(c.offset(), 400.0);

    // A new request mid-flight starts where the content is, not at the old origin.
    c.scroll_to_offset_with_duration(0.0, 100, Easing::Linear);
    assert_eq!(c.offset(), 400.0);
    assert_eq!(c.phase(), ScrollPhase::Tween);
    c.tick(&mut src, 150);
    assert_eq!(c.offset(), 200.0);
    c.tick(&mut src, 200);
    assert_eq!(c.offset(), 0.0);
    assert_eq!(c.phase(), ScrollPhase::Idle);
}

#[test]
fn restore_info_round_trips_through_text() {
    let mut src = Fixed::uniform(20, 100.0);
    let mut c = list(ControllerOptions::new());
    assert_eq!(c.provide_restore_info(), "0:0");
    c.tick(&mut src, 0);
    c.scroll_to_offset(730.0, false);
    c.tick(&mut src, 16);
    let blob = c.provide_restore_info();
    assert_eq!(blob, "7:30");

    let mut restored = list(ControllerOptions::new());
    assert!(restored.on_restore_info_str(&blob));
    restored.tick(&mut src, 0);
    assert!((restored.offset() - 730.0).abs() < 0.5, "{}", restored.offset());
    assert_eq!(restored.restore_info().map(|r| r.start_index), Some(7));

    assert!(!restored.on_restore_info_str("seven:thirty"));
    restored.tick(&mut src, 16);
    assert!((restored.offset() - 730.0).abs() < 0.5);

    restored.on_restore_info(RestoreInfo::new(2, 0.0));
    restored.tick(&mut src, 32);
    assert_eq!(restored.offset(), 200.0);
}

#[test]
fn chain_options_fall_back_to_defaults() {
    let o = ChainOptions::new()
        .with_conductivity(1.5)
        .with_intensity(-0.2)
        .with_space(20.0, 50.0, 10.0)
        .sanitized();
    assert_eq!(o.conductivity, ChainOptions::DEFAULT_CONDUCTIVITY);
    assert_eq!(o.intensity, ChainOptions::DEFAULT_INTENSITY);
    assert_eq!((o.min_space, o.max_space), (10.0, 40.0));

    let o = ChainOptions::new().with_conductivity(0.5).with_intensity(0.5).sanitized();
    assert_eq!(o.transfer(0), 1.0);
    assert_eq!(o.transfer(1), 0.5);
    assert_eq!(o.transfer(2), 0.125);

    let clamped = ChainOptions::new().with_space(80.0, 10.0, 40.0).sanitized();
    assert_eq!(clamped.space, 40.0);
}

#[test]
fn chain_gaps_stay_within_bounds_and_relax() {
    let mut chain = ChainAnimation::new(ChainOptions::new());
    chain.on_control_delta(100.0, 4, 0);
    assert_eq!(chain.delta(6, 0), 0.0);

    chain.set_control(Some(5));
    chain.on_control_delta(100.0, 4, 0);
    assert_eq!(chain.delta(5, 0), 0.0);
    // Item 6 lags by 30, which would squeeze its gap to -10; it is held at min_space.
    assert_eq!(chain.delta(6, 0), -10.0);
    // Item 4 lags by 30 too, which would stretch its gap to 50; it is held at max_space.
    assert_eq!(chain.delta(4, 0), -20.0);

    let o = *chain.options();
    let in_bounds = |gap: f32| gap >= o.min_space - 1e-3 && gap <= o.max_space + 1e-3;
    for index in 6..12 {
        assert!(in_bounds(o.space + chain.delta(index, 0) - chain.delta(index - 1, 0)));
    }
    for index in 0..5 {
        assert!(in_bounds(o.space + chain.delta(index + 1, 0) - chain.delta(index, 0)));
    }

    assert!(!chain.is_done(0));
    assert!(chain.is_done(5_000));
    assert!(chain.delta(6, 5_000).abs() < 0.5);
    chain.settle(5_000);
    assert_eq!(chain.delta(6, 5_000), 0.0);
}

#[test]
fn controller_feeds_chain_from_drag() {
    let mut src = Fixed::uniform(20, 100.0);
    let options = ControllerOptions::new().with_chain(Some(ChainOptions::new()));
    let mut c = list(options);
    c.tick(&mut src, 0);
    c.set_chain_control(Some(2));

    c.drag_start();
    c.drag_update(50.0);
    assert_eq!(c.chain_delta(2), 0.0);
    assert_eq!(c.chain_delta(3), -10.0);
    assert!(c.chain().is_some());

    let options = ControllerOptions::new().with_chain(Some(ChainOptions::new()));
    let mut grid = ScrollController::grid(3, layout(600.0), options);
    grid.tick(&mut Fixed::uniform(30, 100.0), 0);
    grid.set_chain_control(Some(1));
    grid.drag_update(50.0);
    assert_eq!(grid.chain_delta(4), 0.0);
}

fn laid_out_list(count: usize) -> (LayoutEngine, Fixed) {
    let mut src = Fixed::uniform(count, 100.0);
    let mut engine = LayoutEngine::list(layout(800.0));
    engine.layout(&mut src, 0.0);
    (engine, src)
}

#[test]
fn reorder_moves_item_once_past_neighbor_midpoint() {
    let (mut engine, _) = laid_out_list(8);
    let mut r = ReorderController::new(false);

    let start = Point::new(150.0, 10.0);
    assert_eq!(r.drag_start(&engine, start, 1), Some(ReorderEvent::Started { index: 1 }));
    assert_eq!(r.drag_move(&engine, Point::new(200.0, 10.0), 0), None);
    assert_eq!(
        r.drag_move(&engine, Point::new(201.0, 10.0), 0),
        Some(ReorderEvent::Moved { from: 1, to: 2 })
    );
    // Same slot: no repeat.
    assert_eq!(r.drag_move(&engine, Point::new(230.0, 10.0), 0), None);
    assert_eq!(r.displacement(2, 0), Point::new(-100.0, 0.0));
    assert_eq!(r.displacement(1, 0), Point::new(80.0, 0.0));
    assert_eq!(r.displacement(3, 0), Point::ZERO);

    let event = r.drag_end(&mut engine);
    assert_eq!(event, Some(ReorderEvent::Committed { from: 1, to: 2 }));
    let mut order: Vec<usize> = (0..8).collect();
    assert!(move_index(&mut order, 1, 2));
    assert_eq!(order, vec![0, 2, 1, 3, 4, 5, 6, 7]);
    assert!(!r.is_dragging());
    assert_eq!(r.displacement(2, 0), Point::ZERO);
}

#[test]
fn reorder_commit_moves_cached_extents_but_not_data() {
    let mut src = Fixed {
        sizes: vec![50.0, 80.0, 80.0, 80.0, 80.0],
    };
    let mut engine = LayoutEngine::list(layout(600.0));
    engine.layout(&mut src, 0.0);
    let mut r = ReorderController::new(false);

    r.drag_start(&engine, Point::new(10.0, 10.0), 0);
    assert_eq!(
        r.drag_move(&engine, Point::new(70.0, 10.0), 0),
        Some(ReorderEvent::Moved { from: 0, to: 1 })
    );
    let Some(ReorderEvent::Committed { from, to }) = r.drag_end(&mut engine) else {
        panic!("drop was not committed");
    };
    assert_eq!((from, to), (0, 1));
    assert_eq!(engine.measured_extent(0), Some(80.0));
    assert_eq!(engine.measured_extent(1), Some(50.0));

    // The item order is the caller's to change.
    assert_eq!(src.sizes[0], 50.0);
    assert!(move_index(&mut src.sizes, from, to));
    engine.layout(&mut src, 0.0);
    assert_eq!(engine.item_rect(1).map(|item| (item.offset, item.extent)), Some((80.0, 50.0)));
}

#[test]
fn reorder_moves_backward_and_cancels_cleanly() {
    let (engine, _) = laid_out_list(8);
    let mut r = ReorderController::new(false);

    r.drag_start(&engine, Point::new(550.0, 0.0), 5);
    assert_eq!(
        r.drag_move(&engine, Point::new(340.0, 0.0), 0),
        Some(ReorderEvent::Moved { from: 5, to: 3 })
    );
    assert_eq!(r.displacement(3, 0), Point::new(100.0, 0.0));
    assert_eq!(r.displacement(4, 0), Point::new(100.0, 0.0));
    assert_eq!(r.state().map(|s| s.insert_index), Some(3));

    // Dragging back restores the neighbors.
    assert_eq!(
        r.drag_move(&engine, Point::new(550.0, 0.0), 0),
        Some(ReorderEvent::Moved { from: 3, to: 5 })
    );
    assert_eq!(r.displacement(3, 0), Point::ZERO);

    assert_eq!(r.drag_cancel(), Some(ReorderEvent::Cancelled));
    assert_eq!(r.drag_cancel(), None);
    assert_eq!(r.displacement(4, 0), Point::ZERO);
}

#[test]
fn reorder_animates_displacement_when_supported() {
    let (engine, _) = laid_out_list(8);
    let mut r = ReorderController::new(true);
    r.drag_start(&engine, Point::new(150.0, 0.0), 1);
    r.drag_move(&engine, Point::new(260.0, 0.0), 1000);

    assert_eq!(r.displacement(2, 1000), Point::ZERO);
    let mid = r.displacement(2, 1050).main;
    assert!(mid < 0.0 && mid > -100.0);
    assert!((r.displacement(2, 4000).main + 100.0).abs() < 0.5);
    assert!(!r.is_settled(1000));
    assert!(r.is_settled(4000));
}

#[test]
fn reorder_in_grid_uses_the_cell_under_the_item() {
    let mut src = Fixed::uniform(9, 100.0);
    let mut engine = LayoutEngine::grid(3, layout(600.0));
    engine.layout(&mut src, 0.0);
    let mut r = ReorderController::new(false);

    r.drag_start(&engine, Point::new(50.0, 50.0), 0);
    assert_eq!(
        r.drag_move(&engine, Point::new(50.0, 150.0), 0),
        Some(ReorderEvent::Moved { from: 0, to: 1 })
    );
    assert_eq!(
        r.drag_move(&engine, Point::new(150.0, 50.0), 0),
        Some(ReorderEvent::Moved { from: 1, to: 3 })
    );
    // Items 1..=3 shift back one cell each.
    assert_eq!(r.displacement(1, 0), Point::new(0.0, -100.0));
    assert_eq!(r.displacement(3, 0), Point::new(-100.0, 200.0));

    assert_eq!(r.drag_end(&mut engine), Some(ReorderEvent::Committed { from: 0, to: 3 }));
}

#[test]
fn move_index_rejects_out_of_range() {
    let mut order = [0, 1, 2, 3];
    assert!(!move_index(&mut order, 4, 0));
    assert!(!move_index(&mut order, 0, 4));
    assert!(move_index(&mut order, 3, 0));
    assert_eq!(order, [3, 0, 1, 2]);
    assert!(move_index(&mut order, 2, 2));
    assert_eq!(order, [3, 0, 1, 2]);
}
