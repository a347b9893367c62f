//! # Placeholder Factory
//!
//! Maps a component's [`Category`] to a deterministic primitive and wraps it in
//! a [`RenderNode`] carrying the component's color, opacity and transform.
//! This path cannot fail: every category has a shape, and anything the host
//! does not recognise has already been folded into [`Category::Other`].

use crate::build::{Category, Component};
use crate::gfx::resources::material::Material;
use crate::gfx::scene::node::{Mesh, NodeSource, RenderNode};

use super::{generate_box, generate_cylinder, generate_torus, GeometryData};

const CYLINDER_SEGMENTS: u32 = 16;
const TORUS_RING_SEGMENTS: u32 = 32;
const TORUS_TUBE_SEGMENTS: u32 = 8;

/// Primitive used to stand in for a part
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlaceholderShape {
    /// Flattened box for frames
    Plate,
    /// Cylinder for motors
    Cylinder,
    /// Thin torus sweeping the prop disc
    Ring,
    /// Box variants for batteries, cameras and stacks
    Pack,
    CameraBox,
    StackBox,
    /// Generic small box
    SmallBox,
}

impl PlaceholderShape {
    /// Generate the mesh for this shape in local space
    pub fn geometry(self) -> GeometryData {
        match self {
            PlaceholderShape::Plate => generate_box(2.0, 0.1, 2.0),
            PlaceholderShape::Cylinder => generate_cylinder(0.15, 0.3, CYLINDER_SEGMENTS),
            PlaceholderShape::Ring => {
                generate_torus(0.4, 0.02, TORUS_RING_SEGMENTS, TORUS_TUBE_SEGMENTS)
            }
            PlaceholderShape::Pack => generate_box(0.8, 0.3, 0.4),
            PlaceholderShape::CameraBox => generate_box(0.3, 0.3, 0.3),
            PlaceholderShape::StackBox => generate_box(0.6, 0.15, 0.6),
            PlaceholderShape::SmallBox => generate_box(0.2, 0.2, 0.2),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            PlaceholderShape::Plate => "plate",
            PlaceholderShape::Cylinder => "cylinder",
            PlaceholderShape::Ring => "ring",
            PlaceholderShape::Pack => "pack",
            PlaceholderShape::CameraBox => "camera-box",
            PlaceholderShape::StackBox => "stack-box",
            PlaceholderShape::SmallBox => "small-box",
        }
    }
}

impl Category {
    pub fn placeholder_shape(self) -> PlaceholderShape {
        match self {
            Category::Frame => PlaceholderShape::Plate,
            Category::Motor => PlaceholderShape::Cylinder,
            Category::Prop => PlaceholderShape::Ring,
            Category::Battery => PlaceholderShape::Pack,
            Category::Camera => PlaceholderShape::CameraBox,
            Category::Stack => PlaceholderShape::StackBox,
            Category::Other => PlaceholderShape::SmallBox,
        }
    }
}

/// Build the placeholder node for `component`.
///
/// The shape depends only on the category. Color and opacity go to the
/// material and node, and the component transform is applied to the node.
pub fn create_placeholder(component: &Component) -> RenderNode {
    let shape = component.category.placeholder_shape();
    let mut node = RenderNode::new(component.id.clone(), NodeSource::Placeholder(shape))
        .with_mesh(Mesh::new(shape.name(), shape.geometry()))
        .with_material(Material::placeholder(component.category.as_str(), component.color))
        .with_transform(component.transform.to_matrix());
    node.opacity = component.opacity.clamp(0.0, 1.0);
    node.visible = component.visible;
    node
}

/// Refresh color, opacity and transform of an existing placeholder in place
pub fn update_placeholder(node: &mut RenderNode, component: &Component) {
    node.transform = component.transform.to_matrix();
    node.opacity = component.opacity.clamp(0.0, 1.0);
    if let Some(material) = node.materials.first_mut() {
        let [r, g, b] = component.color.0;
        material.rgba = [r, g, b, material.rgba[3]];
    }
}
