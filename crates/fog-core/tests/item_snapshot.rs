//! Integration tests: host snapshot JSON → items → typed metadata.

use fog_core::config::FogConfig;
use fog_core::door::{ContourMarker, doors, toggle_door};
use fog_core::id::ItemId;
use fog_core::light::LightConfig;
use fog_core::model::{AuthoritativeItem, ItemKind, Layer, Player, PlayerRole, ShapeType};
use fog_core::timestamp::parse_timestamp;
use pretty_assertions::assert_eq;

fn snapshot() -> Vec<AuthoritativeItem> {
    serde_json::from_str(include_str!("fixtures/scene.json")).unwrap()
}

fn item(items: &[AuthoritativeItem], id: &str) -> AuthoritativeItem {
    let id = ItemId::intern(id);
    items.iter().find(|i| i.id == id).cloned().expect("item in fixture")
}

// ─── items ───────────────────────────────────────────────────────────────

#[test]
fn snapshot_parses_every_item() {
    let items = snapshot();
    assert_eq!(items.len(), 3);

    let room = item(&items, "wall-room");
    assert!(room.is_fog_drawing());
    assert_eq!(
        room.kind,
        ItemKind::Shape {
            shape_type: ShapeType::Rectangle,
            width: 300.0,
            height: 200.0
        }
    );

    let broken = item(&items, "broken-light");
    assert_eq!(broken.layer, Layer::Other);
    assert_eq!(broken.attached_to, Some(ItemId::intern("torch")));
}

#[test]
fn timestamps_compare_across_offsets() {
    let items = snapshot();
    let room = parse_timestamp(&item(&items, "wall-room").last_modified);
    let torch = parse_timestamp(&item(&items, "torch").last_modified);
    assert_eq!(room, torch);
    assert_eq!(parse_timestamp(&item(&items, "broken-light").last_modified), None);
}

// ─── metadata ────────────────────────────────────────────────────────────

#[test]
fn doors_read_in_stored_order() {
    let config = FogConfig::default();
    let mut room = item(&snapshot(), "wall-room");
    let list = doors(&room.metadata, &config.doors_key());
    assert_eq!(list.len(), 2);
    assert_eq!(list[0].start, ContourMarker::new(0, 40.0));
    assert!(list[1].open);

    assert_eq!(toggle_door(&mut room.metadata, &config.doors_key(), 0), Ok(true));
    assert!(doors(&room.metadata, &config.doors_key())[0].open);
}

#[test]
fn light_metadata_drives_visibility() {
    let config = FogConfig::default();
    let torch = item(&snapshot(), "torch");
    let light: LightConfig = torch.metadata.get(&config.light_key()).unwrap();
    assert_eq!(light.radius(), 300.0);
    assert!(light.wants_self_light());

    let owner = Player {
        id: "player-7".into(),
        role: PlayerRole::Player,
    };
    assert!(light.visible_to(&owner, &torch.created_user_id));
    assert!(!light.visible_to(&Player::default(), &torch.created_user_id));
}

#[test]
fn malformed_metadata_falls_back() {
    let config = FogConfig::default();
    let broken = item(&snapshot(), "broken-light");
    assert!(broken.metadata.contains_key(&config.light_key()));
    assert_eq!(broken.metadata.get::<LightConfig>(&config.light_key()), None);
    assert!(doors(&broken.metadata, &config.doors_key()).is_empty());
}
