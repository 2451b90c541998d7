// Example: the same data laid out as a 3-lane grid and a 3-lane waterfall.
use scrollkit::{ItemSource, ItemSpan, LayoutEngine, LayoutOptions, LaneLayout};

struct Photos {
    heights: Vec<f32>,
}

impl ItemSource for Photos {
    fn item_count(&self) -> usize {
        self.heights.len()
    }

    fn measure(&mut self, index: usize, cross_extent: f32) -> f32 {
        // Keep the aspect ratio for the lane width.
        self.heights[index] * cross_extent / 100.0
    }

    fn span(&self, index: usize) -> ItemSpan {
        if index % 10 == 0 {
            ItemSpan::FullLine
        } else {
            ItemSpan::Lanes(1)
        }
    }
}

fn dump<L: LaneLayout>(name: &str, engine: &LayoutEngine<L>) {
    println!("{name}:");
    for it in engine.window().iter().take(12) {
        println!(
            "  #{:<3} lane={} span={} main={:>7.1}..{:<7.1} cross={:>6.1}+{:.1}",
            it.index,
            it.lane,
            it.span,
            it.offset,
            it.end(),
            it.cross_offset,
            it.cross_extent
        );
    }
}

fn main() {
    let heights = (0..200).map(|i| 60.0 + ((i * 37) % 90) as f32).collect();
    let mut photos = Photos { heights };
    let options = LayoutOptions::new(800.0)
        .with_viewport(800.0, 360.0)
        .with_gap(8.0)
        .with_cross_gap(6.0);

    let mut grid = LayoutEngine::grid(3, options.clone());
    grid.layout(&mut photos, 0.0);
    dump("grid", &grid);

    let mut waterfall = LayoutEngine::waterfall(3, options);
    waterfall.layout(&mut photos, 0.0);
    dump("waterfall", &waterfall);
}
