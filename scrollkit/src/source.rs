use crate::ItemSpan;

/// The data-side collaborator of the layout engine.
///
/// The engine never holds item content. It asks the source how many items exist, how large an
/// item is once it becomes relevant, and (optionally) how many lanes it spans.
pub trait ItemSource {
    fn item_count(&self) -> usize;

    /// Measures item `index` given the cross-axis extent available to it.
    ///
    /// Returns the main-axis extent. Non-finite or negative results are treated as `0.0`.
    fn measure(&mut self, index: usize, cross_extent: f32) -> f32;

    /// Lane span hint for grids and waterfalls.
    fn span(&self, index: usize) -> ItemSpan {
        let _ = index;
        ItemSpan::default()
    }

    /// Geometry of a child inside a grouped item, as `(start_within_item, extent)`.
    ///
    /// Used to align nested containers (`AlignTarget::index_in_group`).
    fn group_child(&self, index: usize, child: usize) -> Option<(f32, f32)> {
        let _ = (index, child);
        None
    }
}

impl<S: ItemSource + ?Sized> ItemSource for &mut S {
    fn item_count(&self) -> usize {
        (**self).item_count()
    }

    fn measure(&mut self, index: usize, cross_extent: f32) -> f32 {
        (**self).measure(index, cross_extent)
    }

    fn span(&self, index: usize) -> ItemSpan {
        (**self).span(index)
    }

    fn group_child(&self, index: usize, child: usize) -> Option<(f32, f32)> {
        (**self).group_child(index, child)
    }
}

/// An [`ItemSource`] backed by a closure.
///
/// ```
/// use scrollkit::{ItemSource, from_fn};
///
/// let mut source = from_fn(3, |i, _cross| 10.0 + i as f32);
/// assert_eq!(source.item_count(), 3);
/// assert_eq!(source.measure(2, 100.0), 12.0);
/// ```
pub fn from_fn<F>(count: usize, measure: F) -> FromFn<F>
where
    F: FnMut(usize, f32) -> f32,
{
    FromFn { count, measure }
}

/// See [`from_fn`].
#[derive(Clone, Debug)]
pub struct FromFn<F> {
    pub count: usize,
    measure: F,
}

impl<F> ItemSource for FromFn<F>
where
    F: FnMut(usize, f32) -> f32,
{
    fn item_count(&self) -> usize {
        self.count
    }

    fn measure(&mut self, index: usize, cross_extent: f32) -> f32 {
        (self.measure)(index, cross_extent)
    }
}
