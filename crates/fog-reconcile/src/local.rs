//! Local (derived) items.
//!
//! Every `LocalItem` is created, mutated and destroyed by exactly one actor;
//! the host renders them but never persists them.

use fog_core::config::SelfLightConfig;
use fog_core::id::ItemId;
use fog_core::light::{LightConfig, LightType};
use fog_core::metadata::Metadata;
use fog_core::model::{Color, Layer, PathCmd, Transform};
use kurbo::Point;

/// Light parameters as the renderer consumes them, with defaults resolved.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightParams {
    pub attenuation_radius: f64,
    pub source_radius: f64,
    pub falloff: f64,
    pub inner_angle: f64,
    pub outer_angle: f64,
    pub light_type: LightType,
}

impl LightParams {
    pub fn from_config(config: &LightConfig) -> Self {
        Self {
            attenuation_radius: config.radius(),
            source_radius: config.source_radius(),
            falloff: config.falloff(),
            inner_angle: config.inner_angle(),
            outer_angle: config.outer_angle(),
            light_type: config.light_type(),
        }
    }

    /// The small omni light that lets an owner see their own token.
    pub fn self_light(config: &SelfLightConfig) -> Self {
        Self {
            attenuation_radius: config.attenuation_radius,
            source_radius: config.source_radius,
            falloff: config.falloff,
            inner_angle: 360.0,
            outer_angle: 360.0,
            light_type: LightType::Primary,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BillboardImage {
    DoorOpen,
    DoorClosed,
    Light,
}

impl BillboardImage {
    pub fn door(open: bool) -> Self {
        if open { Self::DoorOpen } else { Self::DoorClosed }
    }
}

/// Type-specific payload of a local item.
#[derive(Debug, Clone, PartialEq)]
pub enum LocalKind {
    /// An occluding polyline in the owner's local space.
    Wall { points: Vec<Point> },
    Light(LightParams),
    /// A closed polygon relative to the item position.
    Polygon { points: Vec<Point> },
    /// Shader uniforms drawn through a polygon.
    Effect { radius: f64, color: Color },
    Billboard { image: BillboardImage },
    Path {
        commands: Vec<PathCmd>,
        stroke_color: Color,
        stroke_width: f64,
    },
    /// A circular control point shown by the door tool.
    Handle { color: Color, diameter: f64 },
}

impl LocalKind {
    fn prefix(&self) -> &'static str {
        match self {
            LocalKind::Wall { .. } => "wall",
            LocalKind::Light(_) => "light",
            LocalKind::Polygon { .. } => "polygon",
            LocalKind::Effect { .. } => "effect",
            LocalKind::Billboard { .. } => "billboard",
            LocalKind::Path { .. } => "path",
            LocalKind::Handle { .. } => "handle",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LocalItem {
    pub id: ItemId,
    pub attached_to: Option<ItemId>,
    pub transform: Transform,
    pub visible: bool,
    pub layer: Layer,
    pub metadata: Metadata,
    pub kind: LocalKind,
}

impl LocalItem {
    /// A new item with a fresh id (`wall_12`, `billboard_3`, ...).
    pub fn new(kind: LocalKind) -> Self {
        Self {
            id: ItemId::with_prefix(kind.prefix()),
            attached_to: None,
            transform: Transform::default(),
            visible: true,
            layer: Layer::Other,
            metadata: Metadata::default(),
            kind,
        }
    }

    pub fn attached(mut self, parent: ItemId) -> Self {
        self.attached_to = Some(parent);
        self
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn at(mut self, position: Point) -> Self {
        self.transform.position = position;
        self
    }

    pub fn on_layer(mut self, layer: Layer) -> Self {
        self.layer = layer;
        self
    }

    pub fn visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    pub fn with_meta(mut self, key: &str, value: serde_json::Value) -> Self {
        self.metadata.insert_raw(key, value);
        self
    }

    /// Replace the points of a wall or polygon; other kinds are untouched.
    pub fn set_points(&mut self, next: Vec<Point>) {
        match &mut self.kind {
            LocalKind::Wall { points } | LocalKind::Polygon { points } => *points = next,
            _ => log::warn!("{} has no points to replace", self.id),
        }
    }

    pub fn points(&self) -> Option<&[Point]> {
        match &self.kind {
            LocalKind::Wall { points } | LocalKind::Polygon { points } => Some(points),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_carry_the_kind_prefix() {
        let wall = LocalItem::new(LocalKind::Wall { points: Vec::new() });
        let other = LocalItem::new(LocalKind::Wall { points: Vec::new() });
        assert!(wall.id.as_str().starts_with("wall_"));
        assert_ne!(wall.id, other.id);
    }

    #[test]
    fn set_points_only_touches_point_kinds() {
        let mut polygon = LocalItem::new(LocalKind::Polygon { points: Vec::new() });
        polygon.set_points(vec![Point::new(1.0, 2.0)]);
        assert_eq!(polygon.points(), Some(&[Point::new(1.0, 2.0)][..]));

        let mut billboard = LocalItem::new(LocalKind::Billboard {
            image: BillboardImage::Light,
        });
        billboard.set_points(vec![Point::ORIGIN]);
        assert_eq!(billboard.points(), None);
    }

    #[test]
    fn self_light_params_are_omni() {
        let params = LightParams::self_light(&SelfLightConfig::default());
        assert_eq!(params.attenuation_radius, 75.0);
        assert_eq!(params.falloff, 2.0);
        assert_eq!(params.source_radius, 0.0);
        assert_eq!(params.outer_angle, 360.0);
    }
}
