//! Neighbor chain animation for linear lists.
//!
//! When the control item moves by `d`, the item `k` hops away follows only part of that motion
//! and springs back into place afterwards. The transferred fraction shrinks with every hop, so
//! the list stretches like a chain of springs. Gaps between neighbors never leave
//! `[min_space, max_space]`.

use alloc::vec::Vec;

use crate::{SpringAnimation, SpringParams};

/// Chain animation parameters.
///
/// Out-of-range values fall back to the defaults instead of being rejected.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChainOptions {
    /// Resting gap between neighbors.
    pub space: f32,
    pub min_space: f32,
    pub max_space: f32,
    /// Fraction of a perturbation transferred to the next neighbor, in `[0, 1]`.
    pub conductivity: f32,
    /// Damping of the transferred amount per additional hop, in `[0, 1]`.
    pub intensity: f32,
    pub stiffness: f32,
    pub damping: f32,
}

impl ChainOptions {
    pub const DEFAULT_CONDUCTIVITY: f32 = 0.7;
    pub const DEFAULT_INTENSITY: f32 = 0.3;

    pub fn new() -> Self {
        Self {
            space: 20.0,
            min_space: 10.0,
            max_space: 40.0,
            conductivity: Self::DEFAULT_CONDUCTIVITY,
            intensity: Self::DEFAULT_INTENSITY,
            stiffness: 228.0,
            damping: 30.2,
        }
    }

    pub fn with_space(mut self, space: f32, min_space: f32, max_space: f32) -> Self {
        self.space = space;
        self.min_space = min_space;
        self.max_space = max_space;
        self
    }

    pub fn with_conductivity(mut self, conductivity: f32) -> Self {
        self.conductivity = conductivity;
        self
    }

    pub fn with_intensity(mut self, intensity: f32) -> Self {
        self.intensity = intensity;
        self
    }

    pub fn with_spring(mut self, stiffness: f32, damping: f32) -> Self {
        self.stiffness = stiffness;
        self.damping = damping;
        self
    }

    /// Replaces every out-of-range value by its default.
    pub fn sanitized(self) -> Self {
        let d = Self::default();
        let unit = |v: f32, fallback: f32| {
            if v.is_finite() && (0.0..=1.0).contains(&v) {
                v
            } else {
                fallback
            }
        };
        let non_negative = |v: f32| v.is_finite() && v >= 0.0;

        let (min_space, max_space) = if non_negative(self.min_space)
            && non_negative(self.max_space)
            && self.min_space <= self.max_space
        {
            (self.min_space, self.max_space)
        } else {
            (d.min_space, d.max_space)
        };
        let space = if non_negative(self.space) {
            self.space.clamp(min_space, max_space)
        } else {
            d.space.clamp(min_space, max_space)
        };

        Self {
            space,
            min_space,
            max_space,
            conductivity: unit(self.conductivity, d.conductivity),
            intensity: unit(self.intensity, d.intensity),
            stiffness: self.stiffness,
            damping: self.damping,
        }
    }

    /// Fraction of the control item's motion that reaches the item `hops` away.
    pub fn transfer(&self, hops: usize) -> f32 {
        match hops {
            0 => 1.0,
            k => {
                let k = k as i32;
                self.conductivity.powi(k) * (1.0 - self.intensity).powi(k - 1)
            }
        }
    }

    fn spring(&self) -> SpringParams {
        SpringParams::new(self.stiffness, self.damping)
    }
}

impl Default for ChainOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-hop lag springs around one control item.
#[derive(Clone, Debug)]
pub struct ChainAnimation {
    options: ChainOptions,
    control: Option<usize>,
    hops: Vec<Option<SpringAnimation>>,
}

impl ChainAnimation {
    pub fn new(options: ChainOptions) -> Self {
        Self {
            options: options.sanitized(),
            control: None,
            hops: Vec::new(),
        }
    }

    pub fn options(&self) -> &ChainOptions {
        &self.options
    }

    pub fn control(&self) -> Option<usize> {
        self.control
    }

    /// Sets the item the chain hangs off. Running springs are dropped.
    pub fn set_control(&mut self, index: Option<usize>) {
        if self.control != index {
            strace!(?index, "ChainAnimation::set_control");
            self.control = index;
            self.hops.clear();
        }
    }

    /// Feeds a main-axis motion of the control item to the chain, reaching up to `reach` hops.
    pub fn on_control_delta(&mut self, delta: f32, reach: usize, now_ms: u64) {
        if self.control.is_none() || !delta.is_finite() || delta == 0.0 {
            return;
        }
        if self.hops.len() < reach {
            self.hops.resize(reach, None);
        }
        let spring = self.options.spring();
        for k in 1..=reach {
            let kick = -delta * (1.0 - self.options.transfer(k));
            let (pos, vel) = match &self.hops[k - 1] {
                Some(s) => s.sample(now_ms),
                None => (0.0, 0.0),
            };
            self.hops[k - 1] = Some(SpringAnimation::new(pos + kick, 0.0, vel, spring, now_ms));
        }
    }

    fn raw(&self, hop: usize, now_ms: u64) -> f32 {
        hop.checked_sub(1)
            .and_then(|i| self.hops.get(i).copied().flatten())
            .map_or(0.0, |s| s.sample(now_ms).0)
    }

    /// Extra main-axis offset to paint item `index` with.
    ///
    /// The gap between each pair of neighbors is kept within `[min_space, max_space]`.
    pub fn delta(&self, index: usize, now_ms: u64) -> f32 {
        let Some(control) = self.control else {
            return 0.0;
        };
        let distance = index.abs_diff(control);
        // Items after the control widen their gap when they lag behind with a positive shift.
        let side = if index > control { 1.0 } else { -1.0 };
        let o = &self.options;

        let mut acc = 0.0;
        let mut prev_raw = 0.0;
        for k in 1..=distance.min(self.hops.len()) {
            let raw = self.raw(k, now_ms);
            let gap = o.space + side * (raw - prev_raw);
            acc += side * (gap.clamp(o.min_space, o.max_space) - o.space);
            prev_raw = raw;
        }
        acc
    }

    pub fn is_done(&self, now_ms: u64) -> bool {
        self.hops.iter().flatten().all(|s| s.is_done(now_ms))
    }

    /// Drops springs that have come to rest.
    pub fn settle(&mut self, now_ms: u64) {
        for hop in &mut self.hops {
            if hop.is_some_and(|s| s.is_done(now_ms)) {
                *hop = None;
            }
        }
    }
}
