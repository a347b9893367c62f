//! Camera and environment descriptors carried by a build.

use cgmath::{InnerSpace, Vector3};
use serde::{Deserialize, Serialize};

/// Initial viewpoint for the perspective view.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub position: [f32; 3],
    pub target: [f32; 3],
    /// Vertical field of view in degrees
    pub fov: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: [5.0, 5.0, 5.0],
            target: [0.0; 3],
            fov: 50.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LightingPreset {
    #[default]
    Studio,
    Outdoor,
    Workshop,
    Dramatic,
}

/// Light parameters derived from a [`LightingPreset`] for the host renderer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightRig {
    pub ambient: f32,
    pub key_intensity: f32,
    /// Normalized direction the key light travels
    pub key_direction: Vector3<f32>,
    pub key_color: [f32; 3],
}

impl LightingPreset {
    pub fn light_rig(self) -> LightRig {
        let (ambient, key_intensity, direction, key_color) = match self {
            LightingPreset::Studio => (0.5, 1.0, Vector3::new(-1.0, -2.0, -1.0), [1.0, 1.0, 1.0]),
            LightingPreset::Outdoor => (0.35, 1.4, Vector3::new(-0.3, -1.0, -0.2), [1.0, 0.96, 0.88]),
            LightingPreset::Workshop => (0.6, 0.8, Vector3::new(0.0, -1.0, 0.0), [1.0, 0.92, 0.8]),
            LightingPreset::Dramatic => (0.1, 1.6, Vector3::new(-2.0, -1.0, 0.5), [0.9, 0.9, 1.0]),
        };
        LightRig {
            ambient,
            key_intensity,
            key_direction: direction.normalize(),
            key_color,
        }
    }
}

fn default_background() -> String {
    "#1a1a2e".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Environment {
    /// Free-form background descriptor (hex color or host preset name)
    pub background: String,
    pub lighting: LightingPreset,
    pub show_grid: bool,
    pub show_axes: bool,
}

impl Default for Environment {
    fn default() -> Self {
        Self {
            background: default_background(),
            lighting: LightingPreset::default(),
            show_grid: true,
            show_axes: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_light_rig_direction_normalized() {
        for preset in [
            LightingPreset::Studio,
            LightingPreset::Outdoor,
            LightingPreset::Workshop,
            LightingPreset::Dramatic,
        ] {
            let rig = preset.light_rig();
            assert!((rig.key_direction.magnitude() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_environment_json() {
        let env: Environment =
            serde_json::from_str(r#"{ "lighting": "dramatic", "showAxes": true }"#).unwrap();
        assert_eq!(env.lighting, LightingPreset::Dramatic);
        assert!(env.show_axes);
        assert!(env.show_grid);
    }
}
