use alloc::string::{String, ToString};
use alloc::vec::Vec;

use scrollkit::{
    Align, AlignTarget, Edge, GridLanes, ItemSource, LaneLayout, LayoutEngine, LayoutOptions,
    LayoutWindow, ListLanes, Resolution, RestoreInfo, ScrollState, WaterfallLanes,
};

use crate::chain::ChainAnimation;
use crate::events::EventTracker;
use crate::snap::{bracket_snap_points, select_snap};
use crate::{
    ControllerOptions, EdgeEffect, Easing, FrictionFling, ScrollEvent, SpringAnimation, Tween,
    drag_with_overscroll,
};

const EDGE_EPSILON: f32 = 0.01;
const MAX_CLAMP_PASSES: usize = 8;

/// What the controller is doing with the offset.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ScrollPhase {
    #[default]
    Idle,
    Dragging,
    /// Decelerating after a release. Also reported for a release not yet processed by `tick`.
    Fling,
    /// Returning from overscroll to the nearest bound.
    SpringBack,
    /// Settling on a snap point.
    SnapSettle,
    /// Spring-driven programmatic scroll.
    Smooth,
    /// Timed programmatic scroll.
    Tween,
}

/// Outcome of a scroll-to-index request.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum JumpOutcome {
    /// The jump was scheduled. Carries the first (possibly estimated) target offset. The final
    /// offset is reported by [`ScrollEvent::JumpSettled`].
    Scheduled(f32),
    /// The index does not exist. Nothing changed.
    NotFound,
}

#[derive(Clone, Copy, Debug)]
enum Motion {
    Idle,
    Drag,
    Released { velocity: f32 },
    Fling(FrictionFling),
    SpringBack(SpringAnimation),
    Snap(SpringAnimation),
    Smooth(SpringAnimation),
    Tween(Tween),
}

impl Motion {
    fn phase(&self) -> ScrollPhase {
        match self {
            Self::Idle => ScrollPhase::Idle,
            Self::Drag => ScrollPhase::Dragging,
            Self::Released { .. } | Self::Fling(_) => ScrollPhase::Fling,
            Self::SpringBack(_) => ScrollPhase::SpringBack,
            Self::Snap(_) => ScrollPhase::SnapSettle,
            Self::Smooth(_) => ScrollPhase::Smooth,
            Self::Tween(_) => ScrollPhase::Tween,
        }
    }

    fn velocity(&self, now_ms: u64) -> f32 {
        match self {
            Self::Released { velocity } => *velocity,
            Self::Fling(f) => f.velocity(now_ms),
            Self::SpringBack(s) | Self::Snap(s) | Self::Smooth(s) => s.sample(now_ms).1,
            Self::Idle | Self::Drag | Self::Tween(_) => 0.0,
        }
    }

    fn shift(&mut self, by: f32) {
        match self {
            Self::Fling(f) => f.shift(by),
            Self::SpringBack(s) | Self::Snap(s) | Self::Smooth(s) => s.shift(by),
            Self::Tween(t) => t.shift(by),
            Self::Idle | Self::Drag | Self::Released { .. } => {}
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct PendingJump {
    target: AlignTarget,
    index: usize,
    smooth: bool,
    iterations: usize,
}

/// The single owner of the scroll offset of one container.
///
/// Adapters feed it gestures and programmatic requests, and call [`Self::tick`] once per frame.
/// Within a tick, gesture motion is applied first, then the layout engine lays out the window,
/// then pending scroll-to-index requests are resolved. Every tick returns the edge-triggered
/// [`ScrollEvent`]s of that frame.
///
/// New input always replaces the running animation. Nothing is queued, and a replaced
/// animation reports nothing.
#[derive(Clone, Debug)]
pub struct ScrollController<L = ListLanes> {
    engine: LayoutEngine<L>,
    options: ControllerOptions,
    offset: f32,
    motion: Motion,
    jump: Option<PendingJump>,
    chain: Option<ChainAnimation>,
    tracker: EventTracker,
    pending: Vec<ScrollEvent>,
    nudged: bool,
    now_ms: u64,
}

impl ScrollController<ListLanes> {
    pub fn list(layout: LayoutOptions, options: ControllerOptions) -> Self {
        Self::new(LayoutEngine::list(layout), options)
    }
}

impl ScrollController<GridLanes> {
    pub fn grid(lanes: usize, layout: LayoutOptions, options: ControllerOptions) -> Self {
        Self::new(LayoutEngine::grid(lanes, layout), options)
    }
}

impl ScrollController<WaterfallLanes> {
    pub fn waterfall(lanes: usize, layout: LayoutOptions, options: ControllerOptions) -> Self {
        Self::new(LayoutEngine::waterfall(lanes, layout), options)
    }
}

impl<L: LaneLayout> ScrollController<L> {
    pub fn new(engine: LayoutEngine<L>, options: ControllerOptions) -> Self {
        sdebug!(
            edge_effect = ?options.edge_effect,
            snap = options.snap.is_some(),
            chain = options.chain.is_some(),
            "ScrollController::new"
        );
        Self {
            offset: engine.offset(),
            chain: options.chain.map(ChainAnimation::new),
            engine,
            options,
            motion: Motion::Idle,
            jump: None,
            tracker: EventTracker::default(),
            pending: Vec::new(),
            nudged: false,
            now_ms: 0,
        }
    }

    pub fn engine(&self) -> &LayoutEngine<L> {
        &self.engine
    }

    /// Direct access to the engine, e.g. to change layout options. Offset changes made through
    /// the engine are overwritten by the next tick.
    pub fn engine_mut(&mut self) -> &mut LayoutEngine<L> {
        &mut self.engine
    }

    pub fn into_engine(self) -> LayoutEngine<L> {
        self.engine
    }

    pub fn options(&self) -> &ControllerOptions {
        &self.options
    }

    pub fn set_options(&mut self, options: ControllerOptions) {
        if options.chain != self.options.chain {
            self.chain = options.chain.map(ChainAnimation::new);
        }
        self.options = options;
    }

    /// The authoritative scroll offset. May lie outside `[0, scrollable_distance]` during
    /// overscroll.
    pub fn offset(&self) -> f32 {
        self.offset
    }

    /// The window laid out by the last tick.
    pub fn window(&self) -> &LayoutWindow {
        self.engine.window()
    }

    pub fn phase(&self) -> ScrollPhase {
        self.motion.phase()
    }

    pub fn is_animating(&self) -> bool {
        !matches!(self.motion, Motion::Idle | Motion::Drag) || self.jump.is_some()
    }

    pub fn state(&self) -> ScrollState {
        let max = self.max_offset();
        ScrollState {
            offset: self.offset,
            scrollable_distance: max,
            distance_estimated: self.engine.is_estimated(),
            at_start: self.offset <= EDGE_EPSILON,
            at_end: self.offset >= max - EDGE_EPSILON,
            is_dragging: matches!(self.motion, Motion::Drag),
            is_animating: self.is_animating(),
        }
    }

    pub fn can_scroll_forward(&self) -> bool {
        self.state().can_scroll_forward()
    }

    pub fn can_scroll_backward(&self) -> bool {
        self.state().can_scroll_backward()
    }

    fn max_offset(&self) -> f32 {
        self.engine.scrollable_distance()
    }

    fn viewport(&self) -> f32 {
        self.engine.options().viewport_main
    }

    /// How far past either bound the offset may go.
    fn overscroll_limit(&self) -> f32 {
        if self.options.edge_effect != EdgeEffect::Spring {
            return 0.0;
        }
        let vp = self.viewport();
        match self.options.max_overscroll {
            Some(limit) if limit.is_finite() => limit.max(0.0),
            _ => vp,
        }
    }

    fn clamp_velocity(&self, velocity: f32) -> f32 {
        if !velocity.is_finite() {
            return 0.0;
        }
        let max = self.options.max_fling_velocity;
        let max = if max.is_finite() && max > 0.0 {
            max
        } else {
            f32::MAX
        };
        velocity.clamp(-max, max)
    }

    fn settle_epsilon(&self) -> f32 {
        self.options.settle_epsilon.max(0.0)
    }

    fn transition(&mut self, motion: Motion) {
        strace!(
            from = ?self.motion.phase(),
            to = ?motion.phase(),
            offset = self.offset,
            "ScrollController: phase"
        );
        self.motion = motion;
    }

    fn cancel_jump(&mut self) {
        if self.jump.take().is_some() {
            self.engine.set_synced(true);
        }
    }

    fn cancel(&mut self) {
        self.cancel_jump();
        self.transition(Motion::Idle);
    }

    // Gestures.

    /// A new touch-down. Discards any running animation or pending jump.
    pub fn drag_start(&mut self) {
        self.cancel_jump();
        self.transition(Motion::Drag);
    }

    /// Moves the content by `delta` (positive toward increasing offsets).
    pub fn drag_update(&mut self, delta: f32) {
        if !delta.is_finite() {
            swarn!(delta, "ignoring non-finite drag delta");
            return;
        }
        if !matches!(self.motion, Motion::Drag) {
            self.drag_start();
        }
        let max = self.max_offset();
        let before = self.offset;
        match self.options.edge_effect {
            EdgeEffect::Spring => {
                self.offset = drag_with_overscroll(
                    self.offset,
                    delta,
                    max,
                    self.viewport(),
                    self.options.overscroll_ratio,
                    self.overscroll_limit(),
                );
            }
            EdgeEffect::None => self.offset = (self.offset + delta).clamp(0.0, max),
            EdgeEffect::Fade => {
                let wanted = self.offset + delta;
                let clamped = wanted.clamp(0.0, max);
                if wanted != clamped {
                    let edge = if wanted < 0.0 { Edge::Start } else { Edge::End };
                    self.pending.push(ScrollEvent::EdgeFade {
                        edge,
                        amount: (wanted - clamped).abs(),
                    });
                }
                self.offset = clamped;
            }
        }
        self.feed_chain(self.offset - before);
    }

    /// Ends the drag with a release velocity in units per second.
    ///
    /// The resulting fling, spring-back or snap starts on the next tick.
    pub fn drag_end(&mut self, velocity: f32) {
        if !matches!(self.motion, Motion::Drag) {
            return;
        }
        let velocity = self.clamp_velocity(velocity);
        self.transition(Motion::Released { velocity });
    }

    /// Ends the drag without momentum. Overscroll still springs back.
    pub fn drag_cancel(&mut self) {
        if matches!(self.motion, Motion::Drag) {
            self.transition(Motion::Released { velocity: 0.0 });
        }
    }

    /// Starts a fling without a preceding drag.
    pub fn fling(&mut self, velocity: f32) {
        self.cancel_jump();
        let velocity = self.clamp_velocity(velocity);
        self.transition(Motion::Released { velocity });
    }

    // Programmatic scrolling.

    /// Scrolls by `delta` right away, clamped to the scrollable range.
    pub fn scroll_by(&mut self, delta: f32) {
        if !delta.is_finite() {
            return;
        }
        self.cancel();
        self.offset = (self.offset + delta).clamp(0.0, self.max_offset());
        self.nudged = true;
    }

    /// Scrolls to `offset`, clamped. With `smooth` a spring animates there.
    ///
    /// Returns the clamped target.
    pub fn scroll_to_offset(&mut self, offset: f32, smooth: bool) -> f32 {
        if !offset.is_finite() {
            swarn!(offset, "ignoring non-finite scroll offset");
            return self.offset;
        }
        let target = offset.clamp(0.0, self.max_offset());
        self.cancel_jump();
        if smooth {
            let (now, spring) = (self.now_ms, self.options.spring);
            let velocity = self.motion.velocity(now);
            let spring = SpringAnimation::new(self.offset, target, velocity, spring, now);
            self.transition(Motion::Smooth(spring));
        } else {
            self.transition(Motion::Idle);
            self.offset = target;
            self.nudged = true;
        }
        target
    }

    /// Tweens to `offset` over `duration_ms`.
    ///
    /// Returns the clamped target.
    pub fn scroll_to_offset_with_duration(
        &mut self,
        offset: f32,
        duration_ms: u64,
        easing: Easing,
    ) -> f32 {
        if !offset.is_finite() {
            return self.offset;
        }
        let target = offset.clamp(0.0, self.max_offset());
        self.cancel_jump();
        let tween = Tween::new(self.offset, target, self.now_ms, duration_ms, easing);
        self.transition(Motion::Tween(tween));
        target
    }

    /// One viewport forward or backward.
    pub fn scroll_page(&mut self, forward: bool, smooth: bool) -> f32 {
        let vp = self.viewport();
        let target = if forward {
            self.offset + vp
        } else {
            self.offset - vp
        };
        self.scroll_to_offset(target, smooth)
    }

    pub fn scroll_to_edge<S: ItemSource + ?Sized>(
        &mut self,
        source: &S,
        edge: Edge,
        smooth: bool,
    ) -> JumpOutcome {
        match edge {
            Edge::Start => JumpOutcome::Scheduled(self.scroll_to_offset(0.0, smooth)),
            Edge::End if source.item_count() == 0 => {
                JumpOutcome::Scheduled(self.scroll_to_offset(self.max_offset(), smooth))
            }
            Edge::End => self.scroll_to_index(source, AlignTarget::last(Align::End), smooth),
        }
    }

    /// Schedules a jump (or with `smooth`, a spring animation) to `target`.
    ///
    /// Targets far from the laid-out window are resolved against estimated extents and
    /// corrected on following ticks, at most once per tick, until the target offset is exact or
    /// `max_align_iterations` is reached.
    pub fn scroll_to_index<S: ItemSource + ?Sized>(
        &mut self,
        source: &S,
        target: AlignTarget,
        smooth: bool,
    ) -> JumpOutcome {
        let resolution = self.engine.resolve(source, &target);
        let (Some(offset), Some(index)) = (
            resolution.offset(),
            target.index.resolve(source.item_count()),
        ) else {
            return JumpOutcome::NotFound;
        };
        sdebug!(index, offset, smooth, "ScrollController::scroll_to_index");
        if !(smooth && matches!(self.motion, Motion::Smooth(_))) {
            self.transition(Motion::Idle);
        }
        self.jump = Some(PendingJump {
            target,
            index,
            smooth,
            iterations: 0,
        });
        self.engine.set_synced(false);
        JumpOutcome::Scheduled(offset)
    }

    /// Cancels the running animation and any pending jump.
    pub fn stop(&mut self) {
        self.cancel();
        self.offset = self.offset.clamp(0.0, self.max_offset());
    }

    // Collaborator notifications.

    pub fn set_viewport(&mut self, main: f32, cross: f32) {
        self.engine.set_viewport(main, cross);
    }

    pub fn data_changed(&mut self, start: usize, count_delta: isize) {
        self.engine.data_changed(start, count_delta);
    }

    pub fn report_extent(&mut self, index: usize, extent: f32) {
        self.engine.report_extent(index, extent);
    }

    // Restore.

    pub fn restore_info(&self) -> Option<RestoreInfo> {
        self.engine.restore_info()
    }

    /// Text form of [`Self::restore_info`], `"0:0"` before the first layout.
    pub fn provide_restore_info(&self) -> String {
        self.restore_info().unwrap_or_default().to_string()
    }

    /// Restores a position on the next tick.
    pub fn on_restore_info(&mut self, info: RestoreInfo) {
        self.cancel();
        self.engine.apply_restore_info(info);
    }

    /// Parses and restores a position. A malformed blob is logged and ignored.
    #[cfg_attr(not(feature = "tracing"), allow(unused_variables))]
    pub fn on_restore_info_str(&mut self, blob: &str) -> bool {
        match blob.parse::<RestoreInfo>() {
            Ok(info) => {
                self.on_restore_info(info);
                true
            }
            Err(err) => {
                swarn!(error = %err, blob, "ignoring malformed restore info");
                false
            }
        }
    }

    // Chain.

    pub fn chain(&self) -> Option<&ChainAnimation> {
        self.chain.as_ref()
    }

    /// Sets the item the chain animation hangs off, usually the one under the pointer.
    pub fn set_chain_control(&mut self, index: Option<usize>) {
        if let Some(chain) = &mut self.chain {
            chain.set_control(index);
        }
    }

    /// Extra main-axis offset to paint item `index` with at the last tick.
    pub fn chain_delta(&self, index: usize) -> f32 {
        self.chain
            .as_ref()
            .map_or(0.0, |chain| chain.delta(index, self.now_ms))
    }

    fn feed_chain(&mut self, delta: f32) {
        // Chains only make sense for single-lane lists.
        if self.engine.lanes().lane_count() != 1 {
            return;
        }
        let reach = self.engine.visible_range().len().max(1);
        if let Some(chain) = &mut self.chain {
            chain.on_control_delta(delta, reach, self.now_ms);
        }
    }

    // Frame.

    /// Advances one frame: gesture motion, then layout, then pending jumps.
    pub fn tick<S: ItemSource + ?Sized>(
        &mut self,
        source: &mut S,
        now_ms: u64,
    ) -> Vec<ScrollEvent> {
        let was_active = self.is_animating() || self.nudged || matches!(self.motion, Motion::Drag);

        if let Motion::Released { velocity } = self.motion {
            self.release(&*source, velocity);
        }
        let now_ms = now_ms.max(self.now_ms);
        self.now_ms = now_ms;
        self.advance(now_ms);

        self.relayout(source);
        self.keep_in_bounds(source);

        self.step_jump(source);
        self.engine.set_synced(self.jump.is_none());
        if let Some(chain) = &mut self.chain {
            chain.settle(now_ms);
        }

        let active = self.is_animating() || matches!(self.motion, Motion::Drag);
        let mut events = Vec::new();
        self.tracker.begin(was_active || active, &mut events);
        events.append(&mut self.pending);
        let state = self.state();
        self.tracker
            .end(active, &state, self.engine.visible_range(), &mut events);
        self.nudged = false;
        events
    }

    fn relayout<S: ItemSource + ?Sized>(&mut self, source: &mut S) {
        let pass = self.engine.layout(source, self.offset);
        if pass.correction != 0.0 {
            strace!(correction = pass.correction, "ScrollController: layout correction");
            self.motion.shift(pass.correction);
        }
        self.offset = pass.offset;
    }

    /// Pulls the offset back into the range the current phase allows. Measuring the tail can
    /// shrink the scrollable distance under a held drag or a running animation, so this runs
    /// after every layout. Each pass measures more of the tail, so it settles within a few.
    fn keep_in_bounds<S: ItemSource + ?Sized>(&mut self, source: &mut S) {
        for _ in 0..MAX_CLAMP_PASSES {
            let limit = match self.motion {
                Motion::Idle => 0.0,
                _ => self.overscroll_limit(),
            };
            let max = self.max_offset();
            let clamped = self.offset.clamp(-limit, max + limit);
            if clamped == self.offset {
                return;
            }
            strace!(from = self.offset, to = clamped, max, "ScrollController: clamp");
            self.offset = clamped;
            self.relayout(source);
        }
    }

    /// Turns a release into the follow-up animation. Animations start at the previous frame
    /// time, so the first tick after a release already moves.
    fn release<S: ItemSource + ?Sized>(&mut self, source: &S, velocity: f32) {
        let max = self.max_offset();
        let now = self.now_ms;
        let spring = self.options.spring;

        if self.offset < 0.0 || self.offset > max {
            let bound = self.offset.clamp(0.0, max);
            if self.options.edge_effect == EdgeEffect::Spring {
                let back = SpringAnimation::new(self.offset, bound, velocity, spring, now);
                self.transition(Motion::SpringBack(back));
            } else {
                self.offset = bound;
                self.transition(Motion::Idle);
            }
            return;
        }

        let flinging = velocity.abs() >= self.options.min_fling_velocity;
        if let Some(snap) = self.options.snap {
            let rest = if flinging {
                FrictionFling::new(self.offset, velocity, self.options.friction, now)
                    .final_position()
                    .clamp(0.0, max)
            } else {
                self.offset
            };
            let bracket = bracket_snap_points(&mut self.engine, source, rest, snap.align);
            match select_snap(bracket, rest, velocity, &snap) {
                Some(target) if (target - self.offset).abs() > self.settle_epsilon() => {
                    let settle = SpringAnimation::new(self.offset, target, velocity, spring, now);
                    self.transition(Motion::Snap(settle));
                }
                Some(target) => {
                    self.offset = target;
                    self.transition(Motion::Idle);
                }
                None => self.transition(Motion::Idle),
            }
            return;
        }

        if flinging {
            let fling = FrictionFling::new(self.offset, velocity, self.options.friction, now);
            self.transition(Motion::Fling(fling));
        } else {
            self.transition(Motion::Idle);
        }
    }

    fn advance(&mut self, now_ms: u64) {
        let max = self.max_offset();
        match self.motion {
            Motion::Fling(fling) => {
                let pos = fling.position(now_ms);
                let vel = fling.velocity(now_ms);
                if pos < 0.0 || pos > max {
                    let bound = pos.clamp(0.0, max);
                    if self.options.edge_effect == EdgeEffect::Spring {
                        let limit = self.overscroll_limit();
                        self.offset = pos.clamp(-limit, max + limit);
                        let spring = self.options.spring;
                        let back = SpringAnimation::new(self.offset, bound, vel, spring, now_ms);
                        self.transition(Motion::SpringBack(back));
                    } else {
                        self.offset = bound;
                        self.transition(Motion::Idle);
                    }
                } else {
                    self.offset = pos;
                    if fling.is_done(now_ms) || vel.abs() < self.options.min_fling_velocity {
                        self.transition(Motion::Idle);
                    }
                }
            }
            Motion::SpringBack(spring) | Motion::Snap(spring) | Motion::Smooth(spring) => {
                if spring.is_done(now_ms) {
                    self.offset = spring.target;
                    self.transition(Motion::Idle);
                } else {
                    let limit = self.overscroll_limit();
                    self.offset = spring.sample(now_ms).0.clamp(-limit, max + limit);
                }
            }
            Motion::Tween(tween) => {
                self.offset = tween.sample(now_ms);
                if tween.is_done(now_ms) {
                    self.offset = tween.to;
                    self.transition(Motion::Idle);
                }
            }
            Motion::Idle | Motion::Drag | Motion::Released { .. } => {}
        }
    }

    fn step_jump<S: ItemSource + ?Sized>(&mut self, source: &mut S) {
        let Some(mut jump) = self.jump.take() else {
            return;
        };
        let resolution = self.engine.resolve(&*source, &jump.target);
        let Some(target) = resolution.offset() else {
            swarn!(index = jump.index, "scroll target disappeared");
            return;
        };
        let eps = self.settle_epsilon();
        let limit = self.options.max_align_iterations;
        strace!(
            index = jump.index,
            target,
            exact = resolution.is_exact(),
            iteration = jump.iterations,
            "ScrollController: align"
        );

        if jump.smooth {
            if let Motion::Smooth(spring) = &mut self.motion {
                if (spring.target - target).abs() > eps {
                    spring.retarget(self.now_ms, target);
                }
                self.jump = Some(jump);
            } else if (self.offset - target).abs() <= eps && resolution.is_exact() {
                self.settle_jump(jump);
            } else if jump.iterations >= limit {
                self.offset = target;
                self.relayout(source);
                self.settle_jump(jump);
            } else {
                jump.iterations += 1;
                let (now, spring) = (self.now_ms, self.options.spring);
                let spring = SpringAnimation::new(self.offset, target, 0.0, spring, now);
                self.transition(Motion::Smooth(spring));
                self.jump = Some(jump);
            }
            return;
        }

        if (self.offset - target).abs() <= eps && resolution.is_exact() {
            self.settle_jump(jump);
            return;
        }
        self.offset = target;
        self.relayout(source);
        if jump.iterations >= limit {
            self.settle_jump(jump);
            return;
        }
        jump.iterations += 1;
        match self.engine.resolve(&*source, &jump.target) {
            Resolution::Exact(offset) if (offset - self.offset).abs() <= eps => {
                self.settle_jump(jump);
            }
            _ => self.jump = Some(jump),
        }
    }

    fn settle_jump(&mut self, jump: PendingJump) {
        let index = jump
            .target
            .index
            .resolve(self.engine.item_count())
            .unwrap_or(jump.index);
        sdebug!(index, offset = self.offset, "ScrollController: jump settled");
        self.pending.push(ScrollEvent::JumpSettled {
            index,
            offset: self.offset,
        });
    }
}
