// Example: dragging an item past its neighbors, then applying the drop to the data.
use scrollkit::{ItemSource, LayoutEngine, LayoutOptions, Point};
use scrollkit_adapter::{ReorderController, ReorderEvent, move_index};

struct Tasks {
    names: Vec<&'static str>,
}

impl ItemSource for Tasks {
    fn item_count(&self) -> usize {
        self.names.len()
    }

    fn measure(&mut self, _index: usize, _cross_extent: f32) -> f32 {
        50.0
    }
}

fn main() {
    let mut tasks = Tasks {
        names: vec!["write", "review", "test", "ship", "rest"],
    };
    let mut engine = LayoutEngine::list(LayoutOptions::new(400.0).with_viewport(400.0, 300.0));
    engine.layout(&mut tasks, 0.0);

    let mut reorder = ReorderController::new(true);
    let grab = Point::new(25.0, 10.0);
    println!("{:?}", reorder.drag_start(&engine, grab, 0));

    let mut now = 0;
    for step in 1..=8 {
        now += 16;
        let pointer = Point::new(grab.main + step as f32 * 15.0, grab.cross);
        if let Some(event) = reorder.drag_move(&engine, pointer, now) {
            println!("{event:?} shift(1)={:?}", reorder.displacement(1, now));
        }
    }

    if let Some(ReorderEvent::Committed { from, to }) = reorder.drag_end(&mut engine) {
        move_index(&mut tasks.names, from, to);
        println!("committed {from} -> {to}: {:?}", tasks.names);
    }
    engine.layout(&mut tasks, engine.offset());
    println!("visible after drop: {:?}", engine.visible_range());
}
