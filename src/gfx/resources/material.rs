//! Surface descriptions for component rendering.
//!
//! Placeholder parts derive their material from the component color; loaded
//! assets bring their own factors. GPU buffers for materials are owned by the
//! [`ResourceTracker`](super::tracker::ResourceTracker), not by the material.

use crate::build::Color;

/// Layout of the per-material uniform block (std140, 48 bytes)
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MaterialUniform {
    pub rgba: [f32; 4],
    pub metalness: f32,
    pub roughness: f32,
    /// 1.0 when the wireframe override is active
    pub wireframe: f32,
    _pad0: f32,
    pub glow: [f32; 3],
    _pad1: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub label: String,
    pub rgba: [f32; 4],
    pub metalness: f32,
    pub roughness: f32,
    pub glow: [f32; 3],
    /// Global wireframe override, never part of the component data
    pub wireframe: bool,
}

impl Default for Material {
    /// Neutral grey used for primitives that reference no material
    fn default() -> Self {
        Self::new("unassigned", [0.8, 0.8, 0.8, 1.0], 0.0, 0.5)
    }
}

impl Material {
    /// Factors outside `0..=1` are clamped.
    pub fn new(label: &str, rgba: [f32; 4], metalness: f32, roughness: f32) -> Self {
        Self {
            label: label.to_string(),
            rgba: rgba.map(|c| c.clamp(0.0, 1.0)),
            metalness: metalness.clamp(0.0, 1.0),
            roughness: roughness.clamp(0.0, 1.0),
            glow: [0.0; 3],
            wireframe: false,
        }
    }

    /// Matte plastic look for generated stand-in geometry
    pub fn placeholder(label: &str, color: Color) -> Self {
        Self::new(label, color.with_alpha(1.0), 0.1, 0.7)
    }

    pub fn emissive(mut self, glow: [f32; 3]) -> Self {
        self.glow = glow.map(|c| c.max(0.0));
        self
    }

    pub fn alpha(&self) -> f32 {
        self.rgba[3]
    }

    /// Uniform block for upload. `opacity` scales the stored alpha so a fading
    /// component keeps its authored translucency.
    pub fn to_uniform(&self, opacity: f32) -> MaterialUniform {
        let [r, g, b, a] = self.rgba;
        MaterialUniform {
            rgba: [r, g, b, (a * opacity).clamp(0.0, 1.0)],
            metalness: self.metalness,
            roughness: self.roughness,
            wireframe: f32::from(u8::from(self.wireframe)),
            _pad0: 0.0,
            glow: self.glow,
            _pad1: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_clamps_factors() {
        let material = Material::new("hot", [2.0, 0.5, -1.0, 3.0], -1.0, 2.0).emissive([-1.0, 4.0, 0.0]);
        assert_eq!(material.rgba, [1.0, 0.5, 0.0, 1.0]);
        assert_eq!(material.metalness, 0.0);
        assert_eq!(material.roughness, 1.0);
        assert_eq!(material.glow, [0.0, 4.0, 0.0]);
    }

    #[test]
    fn test_uniform_applies_opacity_and_wireframe() {
        let mut material = Material::placeholder("motor", Color::rgb(1.0, 0.0, 0.0));
        material.wireframe = true;
        let uniform = material.to_uniform(0.25);
        assert_eq!(uniform.rgba, [1.0, 0.0, 0.0, 0.25]);
        assert_eq!(uniform.wireframe, 1.0);
        assert_eq!(std::mem::size_of::<MaterialUniform>(), 48);
    }
}
