//! A room with a door and a torch, reconciled against the in-memory host.
//!
//! Run with `RUST_LOG=debug` to watch each pass.

use fog_core::config::FogConfig;
use fog_core::door::ContourMarker;
use fog_core::id::ItemId;
use fog_core::light::LightConfig;
use fog_core::model::{AuthoritativeItem, ItemKind, Layer, ShapeType};
use fog_reconcile::{Host, InMemoryHost, LocalKind, ReconcileError, Reconciler, actions};
use kurbo::Point;

fn main() -> Result<(), ReconcileError> {
    env_logger::init();
    let config = FogConfig::default();

    let room = AuthoritativeItem::new(
        ItemId::intern("tavern"),
        ItemKind::Shape {
            shape_type: ShapeType::Rectangle,
            width: 400.0,
            height: 300.0,
        },
    )
    .on_layer(Layer::Fog);

    let mut torch = AuthoritativeItem::new(ItemId::intern("torch"), ItemKind::Image)
        .on_layer(Layer::Character)
        .at(Point::new(200.0, 150.0));
    torch.metadata.insert(&config.light_key(), &LightConfig::for_new_light(150.0));

    let mut reconciler =
        Reconciler::new(InMemoryHost::with_items(vec![room, torch]), config.clone()).with_default_reactors();
    reconciler.on_ready_change(true);
    report("initial", &reconciler);

    let tavern = ItemId::intern("tavern");
    actions::add_door(
        reconciler.host_mut(),
        &config,
        tavern,
        ContourMarker::new(0, 180.0),
        ContourMarker::new(0, 220.0),
    )?;
    resync(&mut reconciler);
    report("door added", &reconciler);

    actions::toggle_door(reconciler.host_mut(), &config, tavern, 0)?;
    resync(&mut reconciler);
    report("door opened", &reconciler);

    let host = reconciler.teardown();
    println!("after teardown: {} local items", host.local_items().len());
    Ok(())
}

fn resync(reconciler: &mut Reconciler<InMemoryHost>) {
    let items = reconciler.host().items();
    reconciler.on_items_change(items);
}

fn report(stage: &str, reconciler: &Reconciler<InMemoryHost>) {
    let local = reconciler.host().local_items();
    let walls = local
        .iter()
        .filter(|item| matches!(item.kind, LocalKind::Wall { .. }))
        .count();
    let polygon = local.iter().find_map(|item| match &item.kind {
        LocalKind::Polygon { points } => Some(points.len()),
        _ => None,
    });
    println!(
        "{stage}: {} local items, {walls} walls, light polygon with {} points",
        local.len(),
        polygon.unwrap_or(0)
    );
}
