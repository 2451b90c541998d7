// Example: drag, fling with snapping, then a far scroll-to-index, driven by a 60 Hz clock.
use scrollkit::{Align, AlignTarget, ItemSource, LayoutOptions};
use scrollkit_adapter::{ControllerOptions, EdgeEffect, ScrollController, SnapOptions};

struct Rows {
    sizes: Vec<f32>,
}

impl ItemSource for Rows {
    fn item_count(&self) -> usize {
        self.sizes.len()
    }

    fn measure(&mut self, index: usize, _cross_extent: f32) -> f32 {
        self.sizes[index]
    }
}

const FRAME_MS: u64 = 16;

fn run<S: ItemSource>(
    controller: &mut ScrollController,
    source: &mut S,
    now: &mut u64,
    label: &str,
) {
    for _ in 0..240 {
        *now += FRAME_MS;
        for event in controller.tick(source, *now) {
            println!("{label} t={now}: {event:?}");
        }
        if !controller.is_animating() {
            break;
        }
    }
    println!(
        "{label}: offset={:.1} phase={:?} visible={:?}",
        controller.offset(),
        controller.phase(),
        controller.engine().visible_range()
    );
}

fn main() {
    let mut rows = Rows {
        sizes: (0..1_000).map(|i| 60.0 + (i % 4) as f32 * 15.0).collect(),
    };
    let layout = LayoutOptions::new(600.0).with_viewport(600.0, 320.0);
    let options = ControllerOptions::new()
        .with_edge_effect(EdgeEffect::Spring)
        .with_snap(Some(SnapOptions::new(Align::Start)));
    let mut controller = ScrollController::list(layout, options);

    let mut now = 0;
    controller.tick(&mut rows, now);

    controller.drag_start();
    for _ in 0..5 {
        controller.drag_update(30.0);
        now += FRAME_MS;
        controller.tick(&mut rows, now);
    }
    controller.drag_end(1_800.0);
    run(&mut controller, &mut rows, &mut now, "fling");

    controller.drag_start();
    controller.drag_update(-controller.offset() - 120.0);
    controller.drag_end(0.0);
    run(&mut controller, &mut rows, &mut now, "spring back");

    let outcome = controller.scroll_to_index(&rows, AlignTarget::new(750, Align::Center), false);
    println!("jump scheduled: {outcome:?}");
    run(&mut controller, &mut rows, &mut now, "jump");
}
