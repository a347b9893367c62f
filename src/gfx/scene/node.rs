//! # Render Nodes
//!
//! A [`RenderNode`] is what the engine draws for one component: a set of
//! meshes with their materials, the component transform, and the transient
//! reveal state driven by the assembly animation.

use cgmath::{Deg, Matrix4, SquareMatrix, Vector3};

use crate::gfx::geometry::{GeometryData, PlaceholderShape};
use crate::gfx::picking::AABB;
use crate::gfx::resources::material::Material;

/// One drawable piece of a node, with its transform relative to the node
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    pub name: String,
    pub geometry: GeometryData,
    pub local_transform: Matrix4<f32>,
    /// Index into [`RenderNode::materials`]
    pub material_index: usize,
}

impl Mesh {
    pub fn new(name: impl Into<String>, geometry: GeometryData) -> Self {
        Self {
            name: name.into(),
            geometry,
            local_transform: Matrix4::identity(),
            material_index: 0,
        }
    }

    pub fn with_local_transform(mut self, transform: Matrix4<f32>) -> Self {
        self.local_transform = transform;
        self
    }

    pub fn with_material_index(mut self, index: usize) -> Self {
        self.material_index = index;
        self
    }
}

/// Where a node's geometry came from
#[derive(Debug, Clone, PartialEq)]
pub enum NodeSource {
    Placeholder(PlaceholderShape),
    Asset { reference: String },
    /// Empty stand-in while `reference` loads and no interim placeholder is wanted
    Pending { reference: String },
}

/// Animation-driven deviation from the resting pose
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reveal {
    /// Multiplies the node opacity
    pub opacity: f32,
    /// World-space translation added on top of the component transform
    pub offset: Vector3<f32>,
    /// Extra yaw around the component's local Y axis
    pub spin: Deg<f32>,
    pub scale: f32,
}

impl Reveal {
    pub const REST: Reveal = Reveal {
        opacity: 1.0,
        offset: Vector3 {
            x: 0.0,
            y: 0.0,
            z: 0.0,
        },
        spin: Deg(0.0),
        scale: 1.0,
    };

    pub const HIDDEN: Reveal = Reveal {
        opacity: 0.0,
        ..Reveal::REST
    };

    pub fn is_rest(&self) -> bool {
        *self == Reveal::REST
    }
}

impl Default for Reveal {
    fn default() -> Self {
        Reveal::REST
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderNode {
    pub name: String,
    pub meshes: Vec<Mesh>,
    pub materials: Vec<Material>,
    /// Component transform
    pub transform: Matrix4<f32>,
    /// Component opacity, applied on top of material alpha
    pub opacity: f32,
    pub visible: bool,
    pub selected: bool,
    pub source: NodeSource,
    pub reveal: Reveal,
}

impl RenderNode {
    pub fn new(name: impl Into<String>, source: NodeSource) -> Self {
        Self {
            name: name.into(),
            meshes: Vec::new(),
            materials: Vec::new(),
            transform: Matrix4::identity(),
            opacity: 1.0,
            visible: true,
            selected: false,
            source,
            reveal: Reveal::REST,
        }
    }

    pub fn with_mesh(mut self, mesh: Mesh) -> Self {
        self.meshes.push(mesh);
        self
    }

    pub fn with_material(mut self, material: Material) -> Self {
        self.materials.push(material);
        self
    }

    pub fn with_transform(mut self, transform: Matrix4<f32>) -> Self {
        self.transform = transform;
        self
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self.source, NodeSource::Placeholder(_))
    }

    pub fn placeholder_shape(&self) -> Option<PlaceholderShape> {
        match self.source {
            NodeSource::Placeholder(shape) => Some(shape),
            _ => None,
        }
    }

    pub fn asset_reference(&self) -> Option<&str> {
        match &self.source {
            NodeSource::Asset { reference } => Some(reference),
            _ => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.source, NodeSource::Pending { .. })
    }

    /// Material used by `mesh`, falling back to the first one
    pub fn material_for(&self, mesh: &Mesh) -> Option<&Material> {
        self.materials
            .get(mesh.material_index)
            .or_else(|| self.materials.first())
    }

    /// Opacity including animation state
    pub fn effective_opacity(&self) -> f32 {
        (self.opacity * self.reveal.opacity).clamp(0.0, 1.0)
    }

    /// Whether any part of this node needs alpha blending
    pub fn is_transparent(&self) -> bool {
        self.effective_opacity() < 1.0 || self.materials.iter().any(|m| m.alpha() < 1.0)
    }

    /// Whether the host should draw this node this frame
    pub fn is_rendered(&self) -> bool {
        self.visible && self.effective_opacity() > 0.0 && self.reveal.scale > 0.0
    }

    /// Model matrix including the reveal offset, spin and scale
    pub fn world_matrix(&self) -> Matrix4<f32> {
        if self.reveal.is_rest() {
            return self.transform;
        }
        Matrix4::from_translation(self.reveal.offset)
            * self.transform
            * Matrix4::from_angle_y(self.reveal.spin)
            * Matrix4::from_scale(self.reveal.scale)
    }

    pub fn set_wireframe(&mut self, enabled: bool) {
        for material in &mut self.materials {
            material.wireframe = enabled;
        }
    }

    pub fn triangle_count(&self) -> usize {
        self.meshes.iter().map(|m| m.geometry.triangle_count()).sum()
    }

    /// Bounds in node space (mesh local transforms applied)
    pub fn local_bounds(&self) -> Option<AABB> {
        self.meshes
            .iter()
            .filter(|m| !m.geometry.vertices.is_empty())
            .map(|m| m.geometry.bounds().transform(&m.local_transform))
            .reduce(|a, b| a.union(&b))
    }

    /// World-space bounds at the current world matrix
    pub fn world_bounds(&self) -> Option<AABB> {
        self.local_bounds().map(|b| b.transform(&self.world_matrix()))
    }

    /// Centre of the resting pose, used to frame a selection
    pub fn anchor(&self) -> Vector3<f32> {
        self.transform.w.truncate()
    }
}
