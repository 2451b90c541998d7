// Example: prepending items while keeping the visible content in place, then restoring.
use scrollkit::{ItemSource, LayoutEngine, LayoutOptions, RestoreInfo};

struct Feed {
    sizes: Vec<f32>,
}

impl ItemSource for Feed {
    fn item_count(&self) -> usize {
        self.sizes.len()
    }

    fn measure(&mut self, index: usize, _cross_extent: f32) -> f32 {
        self.sizes[index]
    }
}

fn main() {
    let mut feed = Feed {
        sizes: (0..100).map(|i| 40.0 + (i % 3) as f32 * 10.0).collect(),
    };
    let options = LayoutOptions::new(400.0)
        .with_viewport(400.0, 300.0)
        .with_maintain_visible_content_position(true);
    let mut engine = LayoutEngine::list(options.clone());
    engine.layout(&mut feed, 0.0);
    engine.layout(&mut feed, 900.0);
    println!("before: visible={:?}", engine.visible_range());

    feed.sizes.splice(0..0, [55.0; 5]);
    engine.data_changed(0, 5);
    let pass = engine.layout(&mut feed, engine.offset());
    println!(
        "after prepend: visible={:?} correction={}",
        engine.visible_range(),
        pass.correction
    );

    let saved = engine.restore_info().map(|r| r.to_string()).unwrap_or_default();
    println!("saved restore info: {saved}");

    let mut restored = LayoutEngine::list(options);
    match saved.parse::<RestoreInfo>() {
        Ok(info) => restored.apply_restore_info(info),
        Err(err) => println!("ignoring restore info: {err}"),
    }
    restored.layout(&mut feed, 0.0);
    println!("restored: visible={:?}", restored.visible_range());
}
