use scrollkit::Align;

use crate::ChainOptions;

/// What happens when a gesture pushes past either end of the content.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EdgeEffect {
    /// Clamp at the bound.
    None,
    /// Allow bounded overscroll with friction, then spring back.
    #[default]
    Spring,
    /// Clamp at the bound and report [`crate::ScrollEvent::EdgeFade`] for a cosmetic fade.
    Fade,
}

/// Damped spring constants.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpringParams {
    pub mass: f32,
    pub stiffness: f32,
    pub damping: f32,
    /// Rest threshold on the distance to the target.
    pub rest_displacement: f32,
    /// Rest threshold on speed, in units per second. Both thresholds must be met.
    pub rest_velocity: f32,
}

impl SpringParams {
    pub fn new(stiffness: f32, damping: f32) -> Self {
        Self {
            stiffness,
            damping,
            ..Self::default()
        }
    }

    /// The damping that makes this spring critically damped.
    pub fn critical_damping(&self) -> f32 {
        2.0 * (self.stiffness * self.mass).sqrt()
    }

    pub(crate) fn sanitized(self) -> Self {
        let d = Self::default();
        let pos = |v: f32, fallback: f32| if v.is_finite() && v > 0.0 { v } else { fallback };
        Self {
            mass: pos(self.mass, d.mass),
            stiffness: pos(self.stiffness, d.stiffness),
            damping: if self.damping.is_finite() && self.damping >= 0.0 {
                self.damping
            } else {
                d.damping
            },
            rest_displacement: pos(self.rest_displacement, d.rest_displacement),
            rest_velocity: pos(self.rest_velocity, d.rest_velocity),
        }
    }
}

impl Default for SpringParams {
    /// Slightly over critical damping: settles without overshooting.
    fn default() -> Self {
        Self {
            mass: 1.0,
            stiffness: 228.0,
            damping: 30.2,
            rest_displacement: 0.5,
            rest_velocity: 10.0,
        }
    }
}

/// Post-gesture snapping of an item edge (or center) to the viewport.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SnapOptions {
    /// [`Align::Start`], [`Align::Center`] or [`Align::End`]. Other values snap like `Start`.
    pub align: Align,
    /// Fraction of the distance between two snap points that has to be covered in the direction
    /// of travel to advance to the next one.
    pub hysteresis: f32,
    /// Release speed (units per second) that always advances in the direction of travel.
    pub velocity_threshold: f32,
}

impl SnapOptions {
    pub fn new(align: Align) -> Self {
        Self {
            align,
            hysteresis: 0.5,
            velocity_threshold: 1200.0,
        }
    }

    pub fn with_hysteresis(mut self, hysteresis: f32) -> Self {
        self.hysteresis = hysteresis;
        self
    }

    pub fn with_velocity_threshold(mut self, velocity_threshold: f32) -> Self {
        self.velocity_threshold = velocity_threshold;
        self
    }
}

impl Default for SnapOptions {
    fn default() -> Self {
        Self::new(Align::Start)
    }
}

/// Configuration for [`crate::ScrollController`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ControllerOptions {
    pub edge_effect: EdgeEffect,
    /// Used for spring-back, snap settling and smooth scrolling.
    pub spring: SpringParams,
    /// Fling deceleration in units per second squared.
    pub friction: f32,
    /// Flings slower than this (units per second) do not start, and running ones stop.
    pub min_fling_velocity: f32,
    /// Release velocities are clamped to this magnitude.
    pub max_fling_velocity: f32,
    /// Scale of the overscroll friction curve, see [`crate::overscroll_friction`].
    pub overscroll_ratio: f32,
    /// Maximum overscroll past either bound. `None` uses the viewport extent.
    pub max_overscroll: Option<f32>,
    pub snap: Option<SnapOptions>,
    /// Frames a jump may spend correcting toward an estimated target before it is committed.
    pub max_align_iterations: usize,
    /// Jumps and snaps closer than this are considered settled.
    pub settle_epsilon: f32,
    /// Neighbor chain animation for lists.
    pub chain: Option<ChainOptions>,
}

impl ControllerOptions {
    pub fn new() -> Self {
        Self {
            edge_effect: EdgeEffect::default(),
            spring: SpringParams::default(),
            friction: 2400.0,
            min_fling_velocity: 30.0,
            max_fling_velocity: 12_000.0,
            overscroll_ratio: 1.0,
            max_overscroll: None,
            snap: None,
            max_align_iterations: 8,
            settle_epsilon: 0.5,
            chain: None,
        }
    }

    pub fn with_edge_effect(mut self, edge_effect: EdgeEffect) -> Self {
        self.edge_effect = edge_effect;
        self
    }

    pub fn with_spring(mut self, spring: SpringParams) -> Self {
        self.spring = spring;
        self
    }

    pub fn with_friction(mut self, friction: f32) -> Self {
        self.friction = friction;
        self
    }

    pub fn with_fling_velocity_range(mut self, min: f32, max: f32) -> Self {
        self.min_fling_velocity = min;
        self.max_fling_velocity = max;
        self
    }

    pub fn with_overscroll_ratio(mut self, ratio: f32) -> Self {
        self.overscroll_ratio = ratio;
        self
    }

    pub fn with_max_overscroll(mut self, max_overscroll: Option<f32>) -> Self {
        self.max_overscroll = max_overscroll;
        self
    }

    pub fn with_snap(mut self, snap: Option<SnapOptions>) -> Self {
        self.snap = snap;
        self
    }

    pub fn with_max_align_iterations(mut self, iterations: usize) -> Self {
        self.max_align_iterations = iterations;
        self
    }

    pub fn with_chain(mut self, chain: Option<ChainOptions>) -> Self {
        self.chain = chain;
        self
    }
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self::new()
    }
}
