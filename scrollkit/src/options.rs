/// Size of the cache margin kept resident beyond one edge of the viewport.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CacheExtent {
    /// A multiple of the viewport's main-axis extent.
    Viewports(f32),
    /// A fixed main-axis distance.
    Absolute(f32),
}

impl CacheExtent {
    pub fn resolve(self, viewport_main: f32) -> f32 {
        let v = match self {
            Self::Viewports(n) => n * viewport_main,
            Self::Absolute(v) => v,
        };
        if v.is_finite() { v.max(0.0) } else { 0.0 }
    }
}

impl Default for CacheExtent {
    fn default() -> Self {
        Self::Viewports(1.0)
    }
}

/// Configuration for [`crate::LayoutEngine`].
///
/// Cheap to clone. Adapters typically tweak a few fields through
/// [`crate::LayoutEngine::update_options`] and let the engine decide what has to be rebuilt.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LayoutOptions {
    /// Viewport size in the scroll axis.
    pub viewport_main: f32,
    /// Viewport size in the cross axis. Split between lanes for grids and waterfalls.
    pub viewport_cross: f32,

    /// Space between consecutive items (or grid lines) in the main axis.
    pub gap: f32,
    /// Space between lanes.
    pub cross_gap: f32,

    /// Padding before the first item. Also used as the leading inset for alignment.
    pub content_start_offset: f32,
    /// Padding after the last item. Also used as the trailing inset for alignment.
    pub content_end_offset: f32,

    pub cache_before: CacheExtent,
    pub cache_after: CacheExtent,

    /// Extent assumed for items that were never measured, until a running average exists.
    pub estimated_extent: f32,

    /// Keep the first visible item in place when items are inserted or removed before it.
    pub maintain_visible_content_position: bool,
}

impl LayoutOptions {
    pub fn new(viewport_main: f32) -> Self {
        Self {
            viewport_main,
            viewport_cross: 0.0,
            gap: 0.0,
            cross_gap: 0.0,
            content_start_offset: 0.0,
            content_end_offset: 0.0,
            cache_before: CacheExtent::default(),
            cache_after: CacheExtent::default(),
            estimated_extent: 48.0,
            maintain_visible_content_position: false,
        }
    }

    pub fn with_viewport(mut self, viewport_main: f32, viewport_cross: f32) -> Self {
        self.viewport_main = viewport_main;
        self.viewport_cross = viewport_cross;
        self
    }

    pub fn with_gap(mut self, gap: f32) -> Self {
        self.gap = gap;
        self
    }

    pub fn with_cross_gap(mut self, cross_gap: f32) -> Self {
        self.cross_gap = cross_gap;
        self
    }

    pub fn with_content_offsets(mut self, start: f32, end: f32) -> Self {
        self.content_start_offset = start;
        self.content_end_offset = end;
        self
    }

    pub fn with_cache(mut self, before: CacheExtent, after: CacheExtent) -> Self {
        self.cache_before = before;
        self.cache_after = after;
        self
    }

    /// Shorthand for a symmetric cache margin of `n` viewports.
    pub fn with_cache_viewports(self, n: f32) -> Self {
        self.with_cache(CacheExtent::Viewports(n), CacheExtent::Viewports(n))
    }

    pub fn with_estimated_extent(mut self, estimated_extent: f32) -> Self {
        self.estimated_extent = estimated_extent;
        self
    }

    pub fn with_maintain_visible_content_position(mut self, maintain: bool) -> Self {
        self.maintain_visible_content_position = maintain;
        self
    }

    /// Clamps negative or non-finite values to zero.
    pub(crate) fn sanitized(mut self) -> Self {
        fn fix(v: f32) -> f32 {
            if v.is_finite() { v.max(0.0) } else { 0.0 }
        }
        self.viewport_main = fix(self.viewport_main);
        self.viewport_cross = fix(self.viewport_cross);
        self.gap = fix(self.gap);
        self.cross_gap = fix(self.cross_gap);
        self.content_start_offset = fix(self.content_start_offset);
        self.content_end_offset = fix(self.content_end_offset);
        self.estimated_extent = fix(self.estimated_extent);
        self
    }
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self::new(0.0)
    }
}
