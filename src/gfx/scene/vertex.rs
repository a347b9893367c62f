//! # Vertex Data Structures
//!
//! GPU vertex format shared by placeholder primitives and loaded assets.

use std::mem;

/// Interleaved vertex uploaded by the resource tracker.
///
/// `#[repr(C)]` keeps the layout stable for [`Vertex3D::desc`].
///
/// ```no_run
/// use rotorscope::gfx::scene::vertex::Vertex3D;
///
/// let vertex = Vertex3D::new([0.0, 1.0, 0.0], [0.0, 1.0, 0.0], [0.5, 0.5]);
/// ```
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex3D {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    /// Zero when the source mesh has no texture coordinates
    pub tex_coords: [f32; 2],
}

impl Vertex3D {
    const ATTRIBUTES: [wgpu::VertexAttribute; 3] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3, 2 => Float32x2];

    pub fn new(position: [f32; 3], normal: [f32; 3], tex_coords: [f32; 2]) -> Self {
        Self {
            position,
            normal,
            tex_coords,
        }
    }

    /// Buffer layout: position at location 0, normal at 1, UV at 2
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<Vertex3D>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}
