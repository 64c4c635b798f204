//! Authoritative item model.
//!
//! The host owns every `AuthoritativeItem`; this crate only reads snapshots
//! of them and describes mutation requests. Drawings (shapes, curves, paths
//! and lines) on the FOG layer are the sources of walls and doors; any item
//! carrying light metadata is a light source.

use crate::id::ItemId;
use crate::metadata::Metadata;
use kurbo::{Affine, Point, Vec2};
use serde::{Deserialize, Serialize};

// ─── Colors ──────────────────────────────────────────────────────────────

/// RGBA color. Stored as 4 × f32 [0.0, 1.0].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

/// Helper to parse a single hex digit.
pub fn hex_val(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

impl Color {
    pub const BLACK: Color = Color::rgba(0.0, 0.0, 0.0, 1.0);

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Parse a `#RRGGBB` hex color. The string may optionally start with `#`.
    ///
    /// Light colors are always opaque, so the short and alpha forms are
    /// rejected.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        let bytes = hex.as_bytes();
        if bytes.len() != 6 {
            return None;
        }
        let r = hex_val(bytes[0])? << 4 | hex_val(bytes[1])?;
        let g = hex_val(bytes[2])? << 4 | hex_val(bytes[3])?;
        let b = hex_val(bytes[4])? << 4 | hex_val(bytes[5])?;
        Some(Self::rgba(
            r as f32 / 255.0,
            g as f32 / 255.0,
            b as f32 / 255.0,
            1.0,
        ))
    }

    /// Emit as `#RRGGBB`, dropping alpha.
    pub fn to_hex(&self) -> String {
        let r = (self.r * 255.0).round() as u8;
        let g = (self.g * 255.0).round() as u8;
        let b = (self.b * 255.0).round() as u8;
        format!("#{r:02x}{g:02x}{b:02x}")
    }
}

// ─── Path data ───────────────────────────────────────────────────────────

/// A single path command, as produced by the host's path primitive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PathCmd {
    MoveTo(f64, f64),
    LineTo(f64, f64),
    QuadTo(f64, f64, f64, f64),            // control, end
    ConicTo(f64, f64, f64, f64, f64),      // control, end, weight
    CubicTo(f64, f64, f64, f64, f64, f64), // c1, c2, end
    Close,
}

impl PathCmd {
    /// The anchor (end) point of the command, `None` for `Close`.
    pub fn anchor(&self) -> Option<Point> {
        match *self {
            PathCmd::MoveTo(x, y) | PathCmd::LineTo(x, y) => Some(Point::new(x, y)),
            PathCmd::QuadTo(_, _, x, y) | PathCmd::ConicTo(_, _, x, y, _) => Some(Point::new(x, y)),
            PathCmd::CubicTo(_, _, _, _, x, y) => Some(Point::new(x, y)),
            PathCmd::Close => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FillRule {
    #[default]
    Nonzero,
    Evenodd,
}

// ─── Transform ───────────────────────────────────────────────────────────

/// Position, rotation (degrees) and scale of an item.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Point,
    pub rotation: f64,
    pub scale: Vec2,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Point::ORIGIN,
            rotation: 0.0,
            scale: Vec2::new(1.0, 1.0),
        }
    }
}

impl Transform {
    pub fn at(position: Point) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    /// Local → world matrix: scale, then rotate, then translate.
    pub fn to_affine(&self) -> Affine {
        Affine::translate(self.position.to_vec2())
            * Affine::rotate(self.rotation.to_radians())
            * Affine::scale_non_uniform(self.scale.x, self.scale.y)
    }
}

// ─── Items ───────────────────────────────────────────────────────────────

/// Scene layer an item lives on. Only the layers this crate reasons about
/// are named; everything else collapses to `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Layer {
    Map,
    Drawing,
    Prop,
    Character,
    Attachment,
    Fog,
    Control,
    #[default]
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShapeType {
    Rectangle,
    Circle,
    Triangle,
    Hexagon,
}

/// Type-specific payload of an authoritative item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ItemKind {
    Shape {
        shape_type: ShapeType,
        width: f64,
        height: f64,
    },
    Curve {
        points: Vec<Point>,
        tension: f64,
        closed: bool,
    },
    Path {
        commands: Vec<PathCmd>,
        fill_rule: FillRule,
    },
    Line {
        start: Point,
        end: Point,
    },
    Image,
    Other,
}

/// Stroke/fill parameters shared by all drawing kinds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DrawingStyle {
    pub stroke_width: f64,
    pub fill_opacity: f64,
}

impl Default for DrawingStyle {
    fn default() -> Self {
        Self {
            stroke_width: 5.0,
            fill_opacity: 0.0,
        }
    }
}

/// A host-owned item. The core only reads these and issues mutation
/// requests back through the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthoritativeItem {
    pub id: ItemId,
    /// RFC 3339 timestamp of the last mutation.
    pub last_modified: String,
    pub metadata: Metadata,
    pub transform: Transform,
    pub layer: Layer,
    pub kind: ItemKind,
    pub style: DrawingStyle,
    pub visible: bool,
    pub created_user_id: String,
    pub attached_to: Option<ItemId>,
}

impl AuthoritativeItem {
    pub fn new(id: ItemId, kind: ItemKind) -> Self {
        Self {
            id,
            last_modified: "1970-01-01T00:00:00.000Z".to_string(),
            metadata: Metadata::default(),
            transform: Transform::default(),
            layer: Layer::Drawing,
            kind,
            style: DrawingStyle::default(),
            visible: true,
            created_user_id: String::new(),
            attached_to: None,
        }
    }

    pub fn on_layer(mut self, layer: Layer) -> Self {
        self.layer = layer;
        self
    }

    pub fn at(mut self, position: Point) -> Self {
        self.transform.position = position;
        self
    }

    pub fn modified_at(mut self, timestamp: &str) -> Self {
        self.last_modified = timestamp.to_string();
        self
    }

    /// Whether the item is one of the kinds that can be stroked into walls.
    pub fn is_drawing(&self) -> bool {
        matches!(
            self.kind,
            ItemKind::Shape { .. }
                | ItemKind::Curve { .. }
                | ItemKind::Path { .. }
                | ItemKind::Line { .. }
        )
    }

    /// A drawing on the FOG layer, i.e. a wall source.
    pub fn is_fog_drawing(&self) -> bool {
        self.layer == Layer::Fog && self.is_drawing()
    }

    pub fn is_shape(&self) -> bool {
        matches!(self.kind, ItemKind::Shape { .. })
    }
}

// ─── Players ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlayerRole {
    Gm,
    #[default]
    Player,
}

/// The local player's identity, used by owner-only light filtering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: String,
    pub role: PlayerRole,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            id: "unset".to_string(),
            role: PlayerRole::Player,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_hex_roundtrip() {
        let c = Color::from_hex("#ff8000").unwrap();
        assert_eq!(c.r, 1.0);
        assert!((c.g - 128.0 / 255.0).abs() < 1e-6);
        assert_eq!(c.to_hex(), "#ff8000");
        assert!(Color::from_hex("#fff").is_none());
        assert!(Color::from_hex("zzzzzz").is_none());
    }

    #[test]
    fn transform_applies_scale_before_rotation() {
        let t = Transform {
            position: Point::new(10.0, 0.0),
            rotation: 90.0,
            scale: Vec2::new(2.0, 1.0),
        };
        let p = t.to_affine() * Point::new(1.0, 0.0);
        assert!((p.x - 10.0).abs() < 1e-9);
        assert!((p.y - 2.0).abs() < 1e-9);
    }

    #[test]
    fn fog_drawing_requires_layer_and_kind() {
        let line = ItemKind::Line {
            start: Point::ORIGIN,
            end: Point::new(1.0, 0.0),
        };
        let item = AuthoritativeItem::new(ItemId::intern("l"), line);
        assert!(item.is_drawing());
        assert!(!item.is_fog_drawing());
        assert!(item.clone().on_layer(Layer::Fog).is_fog_drawing());

        let image = AuthoritativeItem::new(ItemId::intern("img"), ItemKind::Image).on_layer(Layer::Fog);
        assert!(!image.is_fog_drawing());
    }

    #[test]
    fn unknown_layers_deserialize_as_other() {
        let layer: Layer = serde_json::from_str("\"POST_PROCESS\"").unwrap();
        assert_eq!(layer, Layer::Other);
        let fog: Layer = serde_json::from_str("\"FOG\"").unwrap();
        assert_eq!(fog, Layer::Fog);
    }
}
