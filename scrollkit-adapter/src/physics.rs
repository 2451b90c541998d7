//! Closed-form motion models: constant-deceleration fling and a damped spring.
//!
//! Everything here is time-based (`now_ms`) and side-effect free, so controllers can sample
//! at whatever cadence frames arrive.

use crate::SpringParams;

fn elapsed_secs(start_ms: u64, now_ms: u64) -> f32 {
    now_ms.saturating_sub(start_ms) as f32 / 1000.0
}

/// A fling decelerating at a constant rate until it stops.
///
/// The resting position is `start + velocity² · sign(velocity) / (2 · friction)`.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FrictionFling {
    pub start: f32,
    /// Units per second. Positive moves toward increasing offsets.
    pub velocity: f32,
    /// Deceleration in units per second squared.
    pub friction: f32,
    pub start_ms: u64,
}

impl FrictionFling {
    pub fn new(start: f32, velocity: f32, friction: f32, start_ms: u64) -> Self {
        Self {
            start,
            velocity,
            friction: if friction.is_finite() && friction > 0.0 {
                friction
            } else {
                1.0
            },
            start_ms,
        }
    }

    /// Seconds until the fling comes to rest.
    pub fn duration(&self) -> f32 {
        self.velocity.abs() / self.friction
    }

    pub fn final_position(&self) -> f32 {
        self.start + self.velocity * self.velocity.abs() / (2.0 * self.friction)
    }

    pub fn position(&self, now_ms: u64) -> f32 {
        let t = elapsed_secs(self.start_ms, now_ms).min(self.duration());
        self.start + self.velocity * t - self.velocity.signum() * self.friction * t * t / 2.0
    }

    pub fn velocity(&self, now_ms: u64) -> f32 {
        let t = elapsed_secs(self.start_ms, now_ms);
        let speed = (self.velocity.abs() - self.friction * t).max(0.0);
        speed * self.velocity.signum()
    }

    pub fn is_done(&self, now_ms: u64) -> bool {
        elapsed_secs(self.start_ms, now_ms) >= self.duration()
    }

    pub(crate) fn shift(&mut self, by: f32) {
        self.start += by;
    }
}

/// A unit-mass damped spring pulling a value toward `target`.
///
/// Solved analytically for the under-, critically and over-damped regimes, so sampling is
/// stable at any frame interval.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpringAnimation {
    pub from: f32,
    pub target: f32,
    /// Initial velocity in units per second.
    pub velocity: f32,
    pub params: SpringParams,
    pub start_ms: u64,
}

impl SpringAnimation {
    pub fn new(from: f32, target: f32, velocity: f32, params: SpringParams, start_ms: u64) -> Self {
        Self {
            from,
            target,
            velocity: if velocity.is_finite() { velocity } else { 0.0 },
            params: params.sanitized(),
            start_ms,
        }
    }

    /// Displacement from the target and its rate of change, `t` seconds in.
    fn solve(&self, t: f32) -> (f32, f32) {
        let x0 = self.from - self.target;
        let v0 = self.velocity;
        let k = self.params.stiffness / self.params.mass;
        let c = self.params.damping / self.params.mass;
        let w0 = k.sqrt();
        let zeta = c / (2.0 * w0);

        if (zeta - 1.0).abs() < 1e-3 {
            let b = v0 + w0 * x0;
            let e = (-w0 * t).exp();
            let x = (x0 + b * t) * e;
            let v = (b - w0 * (x0 + b * t)) * e;
            (x, v)
        } else if zeta < 1.0 {
            let wd = w0 * (1.0 - zeta * zeta).sqrt();
            let b = (v0 + zeta * w0 * x0) / wd;
            let e = (-zeta * w0 * t).exp();
            let (sin, cos) = (wd * t).sin_cos();
            let x = e * (x0 * cos + b * sin);
            let v = e * ((b * wd - zeta * w0 * x0) * cos - (x0 * wd + zeta * w0 * b) * sin);
            (x, v)
        } else {
            let root = w0 * (zeta * zeta - 1.0).sqrt();
            let r1 = -zeta * w0 + root;
            let r2 = -zeta * w0 - root;
            let a = (v0 - r2 * x0) / (r1 - r2);
            let b = x0 - a;
            let (e1, e2) = ((r1 * t).exp(), (r2 * t).exp());
            (a * e1 + b * e2, a * r1 * e1 + b * r2 * e2)
        }
    }

    /// Position and velocity at `now_ms`.
    pub fn sample(&self, now_ms: u64) -> (f32, f32) {
        let (x, v) = self.solve(elapsed_secs(self.start_ms, now_ms));
        (self.target + x, v)
    }

    pub fn is_done(&self, now_ms: u64) -> bool {
        let (x, v) = self.solve(elapsed_secs(self.start_ms, now_ms));
        x.abs() < self.params.rest_displacement && v.abs() < self.params.rest_velocity
    }

    /// Restarts toward `target` from the current position, keeping the current velocity.
    pub fn retarget(&mut self, now_ms: u64, target: f32) {
        let (pos, vel) = self.sample(now_ms);
        *self = Self::new(pos, target, vel, self.params, now_ms);
    }

    pub(crate) fn shift(&mut self, by: f32) {
        self.from += by;
        self.target += by;
    }
}

/// Friction multiplier applied to drag deltas that push further into overscroll.
///
/// `ratio · (1 - gamma)²` with `gamma = |overscroll| / viewport` clamped to `[0, 1]`. Decreases
/// monotonically to zero, which bounds the reachable overscroll.
pub fn overscroll_friction(overscroll: f32, viewport: f32, ratio: f32) -> f32 {
    if viewport <= 0.0 {
        return 0.0;
    }
    let gamma = (overscroll.abs() / viewport).clamp(0.0, 1.0);
    ratio * (1.0 - gamma) * (1.0 - gamma)
}

/// Applies a drag `delta` to `offset` when overscroll is allowed.
///
/// Motion inside `[0, max]` is 1:1. The part of the delta that pushes past a bound is scaled by
/// [`overscroll_friction`]; motion back toward the bounds is not. The result never exceeds
/// `max_overscroll` past either bound.
pub fn drag_with_overscroll(
    offset: f32,
    delta: f32,
    max: f32,
    viewport: f32,
    ratio: f32,
    max_overscroll: f32,
) -> f32 {
    let mut pos = offset;
    if delta < 0.0 {
        let free = if pos > 0.0 { pos.min(-delta) } else { 0.0 };
        pos -= free;
        let rest = -delta - free;
        if rest > 0.0 {
            let over = pos.min(0.0);
            pos -= rest * overscroll_friction(over, viewport, ratio);
        }
    } else if delta > 0.0 {
        let free = if pos < max { (max - pos).min(delta) } else { 0.0 };
        pos += free;
        let rest = delta - free;
        if rest > 0.0 {
            let over = (pos - max).max(0.0);
            pos += rest * overscroll_friction(over, viewport, ratio);
        }
    }
    pos.clamp(-max_overscroll, max + max_overscroll)
}
