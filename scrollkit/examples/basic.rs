// Example: a million-item list, one layout pass, and a jump to the last item.
use scrollkit::{Align, AlignTarget, LayoutEngine, LayoutOptions, from_fn};

fn main() {
    let mut source = from_fn(1_000_000, |i, _cross| 20.0 + (i % 7) as f32 * 4.0);
    let mut engine = LayoutEngine::list(LayoutOptions::new(600.0).with_viewport(600.0, 320.0));

    let pass = engine.layout(&mut source, 0.0);
    println!("measured={} window={:?}", pass.measured, engine.window().range());
    println!("visible={:?}", engine.visible_range());
    println!(
        "scrollable_distance={} estimated={}",
        engine.scrollable_distance(),
        engine.is_estimated()
    );

    // Far jumps converge over a few passes as estimates get replaced by measurements.
    let target = AlignTarget::last(Align::End);
    for step in 0..4 {
        let Some(offset) = engine.resolve(&source, &target).offset() else {
            break;
        };
        let pass = engine.layout(&mut source, offset);
        println!(
            "step={step} offset={} visible={:?}",
            pass.offset,
            engine.visible_range()
        );
        if engine.resolve(&source, &target).is_exact() {
            break;
        }
    }
}
