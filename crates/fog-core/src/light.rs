//! Light configuration stored in item metadata.

use crate::model::{Color, Player, PlayerRole};
use serde::{Deserialize, Serialize};

pub const DEFAULT_ATTENUATION_RADIUS: f64 = 150.0;
pub const DEFAULT_SOURCE_RADIUS: f64 = 50.0;
pub const DEFAULT_FALLOFF: f64 = 1.0;
pub const FULL_CIRCLE: f64 = 360.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LightType {
    #[default]
    Primary,
    Secondary,
}

/// Every field is optional; absent fields fall back to the documented
/// defaults through the accessor methods.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LightConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attenuation_radius: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_radius: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub falloff: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inner_angle: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outer_angle: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub light_type: Option<LightType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub only_visible_to_owner: Option<bool>,
}

impl LightConfig {
    /// Config written by the "Add Light" action: a six-cell radius and a
    /// small source that fits through a one-cell door.
    pub fn for_new_light(grid_dpi: f64) -> Self {
        Self {
            attenuation_radius: Some(6.0 * grid_dpi),
            source_radius: Some(25.0),
            falloff: Some(0.2),
            ..Self::default()
        }
    }

    pub fn radius(&self) -> f64 {
        self.attenuation_radius.unwrap_or(DEFAULT_ATTENUATION_RADIUS)
    }

    pub fn source_radius(&self) -> f64 {
        self.source_radius.unwrap_or(DEFAULT_SOURCE_RADIUS)
    }

    pub fn falloff(&self) -> f64 {
        self.falloff.unwrap_or(DEFAULT_FALLOFF)
    }

    pub fn inner_angle(&self) -> f64 {
        self.inner_angle.unwrap_or(FULL_CIRCLE)
    }

    pub fn outer_angle(&self) -> f64 {
        self.outer_angle.unwrap_or(FULL_CIRCLE)
    }

    pub fn light_type(&self) -> LightType {
        self.light_type.unwrap_or_default()
    }

    /// Parsed `color`; missing or unparseable colors are `None`.
    pub fn rgb(&self) -> Option<Color> {
        self.color.as_deref().and_then(Color::from_hex)
    }

    /// True when the light only covers part of the circle.
    pub fn is_coned(&self) -> bool {
        self.outer_angle() < FULL_CIRCLE
    }

    /// Coned primary lights get a small omni "self" light for their owner.
    /// Only an explicit, non-full `outerAngle` qualifies.
    pub fn wants_self_light(&self) -> bool {
        matches!(self.outer_angle, Some(angle) if angle != FULL_CIRCLE)
            && self.light_type() == LightType::Primary
    }

    /// Whether `player` may see a light created by `created_user_id`.
    pub fn visible_to(&self, player: &Player, created_user_id: &str) -> bool {
        player.role == PlayerRole::Gm
            || !self.only_visible_to_owner.unwrap_or(false)
            || created_user_id == player.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_to_missing_fields() {
        let config: LightConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.radius(), 150.0);
        assert_eq!(config.falloff(), 1.0);
        assert_eq!(config.outer_angle(), 360.0);
        assert_eq!(config.light_type(), LightType::Primary);
        assert!(!config.is_coned());
    }

    #[test]
    fn camel_case_wire_format() {
        let config: LightConfig = serde_json::from_str(
            r##"{ "attenuationRadius": 300, "outerAngle": 90, "lightType": "SECONDARY", "color": "#ff0000", "onlyVisibleToOwner": true }"##,
        )
        .unwrap();
        assert_eq!(config.radius(), 300.0);
        assert!(config.is_coned());
        assert_eq!(config.light_type(), LightType::Secondary);
        assert_eq!(config.rgb().map(|c| c.r), Some(1.0));

        let out = serde_json::to_value(LightConfig::for_new_light(150.0)).unwrap();
        assert_eq!(
            out,
            serde_json::json!({ "attenuationRadius": 900.0, "sourceRadius": 25.0, "falloff": 0.2 })
        );
    }

    #[test]
    fn self_light_needs_explicit_cone_on_primary() {
        let mut config = LightConfig::default();
        assert!(!config.wants_self_light());
        config.outer_angle = Some(360.0);
        assert!(!config.wants_self_light());
        config.outer_angle = Some(60.0);
        assert!(config.wants_self_light());
        config.light_type = Some(LightType::Secondary);
        assert!(!config.wants_self_light());
    }

    #[test]
    fn owner_only_visibility() {
        let config = LightConfig {
            only_visible_to_owner: Some(true),
            ..LightConfig::default()
        };
        let owner = Player {
            id: "alice".into(),
            role: PlayerRole::Player,
        };
        let other = Player {
            id: "bob".into(),
            role: PlayerRole::Player,
        };
        let gm = Player {
            id: "gm".into(),
            role: PlayerRole::Gm,
        };
        assert!(config.visible_to(&owner, "alice"));
        assert!(!config.visible_to(&other, "alice"));
        assert!(config.visible_to(&gm, "alice"));
        assert!(LightConfig::default().visible_to(&other, "alice"));
    }
}
