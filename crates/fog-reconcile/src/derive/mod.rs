//! The concrete derivations: doors, walls, door overlays, lights, light
//! overlays and self lights.

mod door;
mod door_overlay;
mod light;
mod light_overlay;
mod self_light;
mod wall;

pub use door::{DoorActor, DoorPath, DoorReactor};
pub use door_overlay::{DoorOverlayActor, DoorOverlayReactor};
pub use light::{LightActor, LightReactor};
pub use light_overlay::{LightOverlayActor, LightOverlayReactor};
pub use self_light::{SelfLightActor, SelfLightReactor};
pub use wall::{WallActor, WallReactor};
