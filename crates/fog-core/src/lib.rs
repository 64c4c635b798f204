pub mod config;
pub mod door;
pub mod id;
pub mod light;
pub mod metadata;
pub mod model;
pub mod timestamp;

pub use config::{FogConfig, SelfLightConfig};
pub use door::{ContourMarker, Door, DoorError};
pub use id::ItemId;
pub use light::{LightConfig, LightType};
pub use metadata::Metadata;
pub use model::*;
pub use timestamp::{format_timestamp, parse_timestamp};

// Re-export kurbo primitives so downstream crates share one geometry vocabulary
pub use kurbo::{Affine, Point, Vec2};
