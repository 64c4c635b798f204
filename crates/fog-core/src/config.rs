//! Tunables for the geometry pipeline and derivations.

use serde::Deserialize;

// ─── Config ───────────────────────────────────────────────────────────────

/// Configuration shared by every derivation.
///
/// Defaults match the values the geometry pipeline was tuned with; hosts
/// can override any subset through `FogConfig::from_json`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FogConfig {
    /// Metadata namespace; keys are `"{namespace}/{name}"`.
    pub namespace: String,

    /// Arc-length step of the coarse nearest-point scan. Default: **8**.
    pub scan_step: f64,

    /// Refinement stops once the step drops to this size. Default: **0.5**.
    pub refine_tolerance: f64,

    /// Hard cap on refinement iterations per contour. Default: **64**.
    pub max_refine_iterations: u32,

    /// Linear distance between samples when flattening curves. Default: **10**.
    pub sample_distance: f64,

    /// Flattening tolerance for boolean operations and strokes. Default: **0.1**.
    pub flatten_tolerance: f64,

    /// Extra width added to door strokes to cover curve segmentation. Default: **1**.
    pub door_stroke_buffer: f64,

    /// Radial samples per half-angle of a light cone. Default: **10**.
    pub cone_samples: usize,

    /// The door tool hides its start handle beyond this distance. Default: **75**.
    pub min_handle_distance: f64,

    /// Primary 360° lights skip the visibility polygon and rely on the
    /// renderer's line-of-sight test. Default: **false**.
    pub shader_occlusion_for_primary: bool,

    /// Omni light shown to the owner of a coned primary light.
    pub self_light: SelfLightConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SelfLightConfig {
    pub attenuation_radius: f64,
    pub falloff: f64,
    pub source_radius: f64,
}

impl Default for SelfLightConfig {
    fn default() -> Self {
        Self {
            attenuation_radius: 75.0,
            falloff: 2.0,
            source_radius: 0.0,
        }
    }
}

impl Default for FogConfig {
    fn default() -> Self {
        Self {
            namespace: "rodeo.owlbear.dynamic-fog".to_string(),
            scan_step: 8.0,
            refine_tolerance: 0.5,
            max_refine_iterations: 64,
            sample_distance: 10.0,
            flatten_tolerance: 0.1,
            door_stroke_buffer: 1.0,
            cone_samples: 10,
            min_handle_distance: 75.0,
            shader_occlusion_for_primary: false,
            self_light: SelfLightConfig::default(),
        }
    }
}

impl FogConfig {
    /// Parse a (possibly partial) JSON config; missing fields keep defaults.
    pub fn from_json(text: &str) -> Result<Self, String> {
        serde_json::from_str(text).map_err(|e| format!("Config parse error: {e}"))
    }

    /// Namespaced metadata key, e.g. `key("doors")`.
    pub fn key(&self, name: &str) -> String {
        format!("{}/{}", self.namespace, name)
    }

    pub fn doors_key(&self) -> String {
        self.key("doors")
    }

    pub fn light_key(&self) -> String {
        self.key("light")
    }

    pub fn door_index_key(&self) -> String {
        self.key("door-index")
    }

    pub fn light_overlay_key(&self) -> String {
        self.key("light-overlay")
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let config = FogConfig::from_json(r#"{ "scanStep": 4, "selfLight": { "falloff": 1.5 } }"#).unwrap();
        assert_eq!(config.scan_step, 4.0);
        assert_eq!(config.refine_tolerance, 0.5);
        assert_eq!(config.self_light.falloff, 1.5);
        assert_eq!(config.self_light.attenuation_radius, 75.0);
    }

    #[test]
    fn keys_are_namespaced() {
        let config = FogConfig {
            namespace: "ns".into(),
            ..FogConfig::default()
        };
        assert_eq!(config.doors_key(), "ns/doors");
        assert_eq!(config.light_key(), "ns/light");
    }

    #[test]
    fn invalid_json_is_an_error() {
        assert!(FogConfig::from_json("{ scanStep: }").is_err());
    }
}
