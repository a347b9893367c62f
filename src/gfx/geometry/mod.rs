//! # Procedural Geometry
//!
//! Mesh data generated in code rather than loaded from files, plus the
//! placeholder factory that turns a [`Component`](crate::build::Component)
//! into a render node when no external model is available.
//!
//! Shapes on offer:
//!
//! - **Box / Cube**: axis-aligned, flat-shaded faces
//! - **Cylinder**: capped, standing on the Y axis
//! - **Torus**: lying in the XZ plane
//!
//! ## Usage
//!
//! ```rust
//! use rotorscope::gfx::geometry::{generate_box, generate_cylinder};
//!
//! let frame = generate_box(2.0, 0.1, 2.0);
//! let motor = generate_cylinder(0.15, 0.3, 16);
//! assert_eq!(frame.triangle_count(), 12);
//! assert!(motor.vertex_count() > 0);
//! ```

pub mod placeholder;
pub mod primitives;

pub use placeholder::{create_placeholder, PlaceholderShape};
pub use primitives::*;

use crate::gfx::picking::AABB;
use crate::gfx::scene::vertex::Vertex3D;

/// Indexed triangle soup in separate attribute streams. `tex_coords` and
/// `normals` may be shorter than `vertices`; missing entries get defaults
/// when interleaved.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeometryData {
    pub vertices: Vec<[f32; 3]>,
    pub tex_coords: Vec<[f32; 2]>,
    pub normals: Vec<[f32; 3]>,
    /// Counter-clockwise triangles
    pub indices: Vec<u32>,
}

impl GeometryData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() || self.indices.is_empty()
    }

    /// Local-space bounding box
    pub fn bounds(&self) -> AABB {
        AABB::from_vertices(&self.vertices)
    }

    /// Fill in smooth normals for loaded meshes that ship without them.
    ///
    /// Face normals are accumulated per vertex (area weighted) and normalized;
    /// vertices not referenced by any triangle get +Y.
    pub fn compute_normals(&mut self) {
        use cgmath::{InnerSpace, Vector3, Zero};

        let mut accumulated = vec![Vector3::<f32>::zero(); self.vertices.len()];
        for tri in self.indices.chunks_exact(3) {
            let [ia, ib, ic] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
            if ia >= self.vertices.len() || ib >= self.vertices.len() || ic >= self.vertices.len() {
                continue;
            }
            let a = Vector3::from(self.vertices[ia]);
            let b = Vector3::from(self.vertices[ib]);
            let c = Vector3::from(self.vertices[ic]);
            let face = (b - a).cross(c - a);
            for i in [ia, ib, ic] {
                accumulated[i] += face;
            }
        }

        self.normals = accumulated
            .into_iter()
            .map(|n| {
                if n.magnitude2() > f32::EPSILON {
                    n.normalize().into()
                } else {
                    [0.0, 1.0, 0.0]
                }
            })
            .collect();
    }

    /// Interleave into the vertex format consumed by the renderer
    pub fn to_vertices(&self) -> Vec<Vertex3D> {
        self.vertices
            .iter()
            .enumerate()
            .map(|(i, position)| {
                Vertex3D::new(
                    *position,
                    self.normals.get(i).copied().unwrap_or([0.0, 1.0, 0.0]),
                    self.tex_coords.get(i).copied().unwrap_or([0.0, 0.0]),
                )
            })
            .collect()
    }
}
