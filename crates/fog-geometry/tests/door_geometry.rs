//! Integration tests: drawing → markers → door sub-paths → wall contours.

use fog_core::config::FogConfig;
use fog_core::door::{ContourMarker, Door};
use fog_core::id::ItemId;
use fog_core::model::{AuthoritativeItem, ItemKind, Layer, PathCmd, ShapeType, Transform};
use fog_geometry::{
    ScanParams, commands_between, contours, door_overlay, door_path, drawing_to_contours,
    drawing_to_path, path_intersection,
};
use kurbo::{Point, Vec2};

fn room() -> AuthoritativeItem {
    AuthoritativeItem::new(
        ItemId::intern("room"),
        ItemKind::Shape {
            shape_type: ShapeType::Rectangle,
            width: 200.0,
            height: 100.0,
        },
    )
    .on_layer(Layer::Fog)
}

fn two_rooms() -> AuthoritativeItem {
    let mut commands = Vec::new();
    for x in [0.0, 300.0] {
        commands.extend([
            PathCmd::MoveTo(x, 0.0),
            PathCmd::LineTo(x + 100.0, 0.0),
            PathCmd::LineTo(x + 100.0, 100.0),
            PathCmd::LineTo(x, 100.0),
            PathCmd::Close,
        ]);
    }
    AuthoritativeItem::new(
        ItemId::intern("two-rooms"),
        ItemKind::Path {
            commands,
            fill_rule: Default::default(),
        },
    )
    .on_layer(Layer::Fog)
}

// ─── markers ─────────────────────────────────────────────────────────────

#[test]
fn marker_round_trips_to_its_point() {
    let path = drawing_to_path(&room()).unwrap();
    for query in [
        Point::new(37.0, 0.0),
        Point::new(200.0, 61.0),
        Point::new(123.0, 100.0),
        Point::new(0.0, 12.5),
    ] {
        let hit = path_intersection(&path, query, ScanParams::default()).unwrap();
        let measure = &contours(&path)[hit.contour.index];
        let back = measure.position_at(hit.contour.distance);
        assert!(
            back.distance(query) <= 0.5,
            "marker {:?} maps to {back:?}, expected {query:?}",
            hit.contour
        );
    }
}

#[test]
fn markers_pick_the_nearest_contour() {
    let path = drawing_to_path(&two_rooms()).unwrap();
    let hit = path_intersection(&path, Point::new(310.0, -3.0), ScanParams::default()).unwrap();
    assert_eq!(hit.contour.index, 1);
    assert!((hit.distance - 3.0).abs() < 0.5);
}

// ─── doors ───────────────────────────────────────────────────────────────

#[test]
fn door_sub_path_ignores_marker_order() {
    let path = drawing_to_path(&room()).unwrap();
    let a = ContourMarker::new(0, 20.0);
    let b = ContourMarker::new(0, 260.0);
    assert_eq!(commands_between(&path, a, b), commands_between(&path, b, a));
}

#[test]
fn doors_across_contours_are_rejected() {
    let path = drawing_to_path(&two_rooms()).unwrap();
    let a = ContourMarker::new(0, 20.0);
    let b = ContourMarker::new(1, 20.0);
    assert!(Door::new(a, b).is_err());
    assert!(commands_between(&path, a, b).is_none());
}

#[test]
fn closed_doors_leave_walls_whole() {
    let config = FogConfig::default();
    let item = room();
    let whole = drawing_to_contours(&item, &[], &config);
    // A rectangle stroke is an outer and an inner loop.
    assert_eq!(whole.len(), 2);
}

#[test]
fn open_door_opens_a_gap_in_a_transformed_room() {
    let config = FogConfig::default();
    let mut item = room();
    item.transform = Transform {
        position: Point::new(500.0, 300.0),
        rotation: 30.0,
        scale: Vec2::new(2.0, 1.0),
    };
    let door = Door {
        open: true,
        start: ContourMarker::new(0, 80.0),
        end: ContourMarker::new(0, 120.0),
    };

    let cut = door_path(&item, &door, &config).unwrap();
    let contours = drawing_to_contours(&item, &[&cut], &config);

    // The gap joins the outer and inner loops into one ring.
    assert_eq!(contours.len(), 1);
    for p in contours.iter().flatten() {
        let in_gap = p.x > 80.0 + 1e-3 && p.x < 120.0 - 1e-3 && p.y.abs() < 3.0;
        assert!(!in_gap, "{p:?} lies inside the doorway");
    }
}

#[test]
fn overlay_centre_follows_the_transform() {
    let mut item = room();
    item.transform.position = Point::new(100.0, 100.0);
    let door = Door::new(ContourMarker::new(0, 0.0), ContourMarker::new(0, 200.0)).unwrap();
    let overlay = door_overlay(&item, &door).unwrap();
    assert!((overlay.center - Point::new(200.0, 100.0)).hypot() < 1e-6);
}
