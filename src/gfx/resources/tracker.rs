//! # Resource Lifecycle
//!
//! [`ResourceTracker`] records the GPU-backed resources that belong to each
//! scene entry and frees them deterministically. A [`ResourceSet`] holds one
//! geometry resource per mesh, one material resource per material, and an
//! asset-tree resource for nodes realised from an external model.
//!
//! With a device in the [`RenderContext`] geometry resources own vertex and
//! index buffers and material resources own a uniform buffer. Releasing a set
//! destroys those buffers immediately. Headless contexts track the same
//! handles without allocating anything.
//!
//! Release can never fail and is a no-op for unknown ids, so teardown paths
//! can call it unconditionally.

use std::collections::HashMap;

use wgpu::util::DeviceExt;

use crate::context::RenderContext;
use crate::gfx::scene::node::RenderNode;

pub type ResourceHandle = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Geometry,
    Material,
    AssetTree,
}

/// Vertex and index buffers for one mesh
#[derive(Debug)]
pub struct MeshBuffers {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub index_count: u32,
    /// Index into the owning node's meshes
    pub mesh_index: usize,
}

#[derive(Debug)]
enum GpuResource {
    Mesh(MeshBuffers),
    Material {
        uniform: wgpu::Buffer,
        material_index: usize,
    },
}

impl GpuResource {
    fn destroy(self) {
        match self {
            GpuResource::Mesh(buffers) => {
                buffers.vertex_buffer.destroy();
                buffers.index_buffer.destroy();
            }
            GpuResource::Material { uniform, .. } => uniform.destroy(),
        }
    }
}

#[derive(Debug)]
pub struct TrackedResource {
    pub handle: ResourceHandle,
    pub kind: ResourceKind,
    gpu: Option<GpuResource>,
}

/// Everything one scene entry must release
#[derive(Debug, Default)]
pub struct ResourceSet {
    resources: Vec<TrackedResource>,
}

impl ResourceSet {
    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    pub fn count(&self, kind: ResourceKind) -> usize {
        self.resources.iter().filter(|r| r.kind == kind).count()
    }

    pub fn handles(&self) -> impl Iterator<Item = (ResourceHandle, ResourceKind)> + '_ {
        self.resources.iter().map(|r| (r.handle, r.kind))
    }

    fn destroy(self) -> usize {
        let count = self.resources.len();
        for resource in self.resources {
            if let Some(gpu) = resource.gpu {
                gpu.destroy();
            }
        }
        count
    }
}

/// Counters for leak checks and host statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResourceStats {
    /// Entries currently holding a set
    pub tracked_sets: usize,
    /// Resources inside those sets
    pub live_handles: usize,
    /// GPU buffers alive inside those sets
    pub gpu_buffers: usize,
    pub total_tracked: u64,
    pub total_released: u64,
}

#[derive(Debug, Default)]
pub struct ResourceTracker {
    next_handle: ResourceHandle,
    sets: HashMap<String, ResourceSet>,
    total_tracked: u64,
    total_released: u64,
}

impl ResourceTracker {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_handle(&mut self) -> ResourceHandle {
        self.next_handle += 1;
        self.next_handle
    }

    /// Allocate the resources `node` needs. GPU buffers are only created when
    /// the context has a device.
    pub fn upload(&mut self, ctx: &RenderContext, node: &RenderNode) -> ResourceSet {
        let mut resources = Vec::with_capacity(node.meshes.len() + node.materials.len() + 1);

        for (mesh_index, mesh) in node.meshes.iter().enumerate() {
            let gpu = ctx.device().map(|device| {
                let vertices = mesh.geometry.to_vertices();
                let vertex_label = format!("{} Vertex Buffer", node.name);
                let index_label = format!("{} Index Buffer", node.name);
                let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some(vertex_label.as_str()),
                    contents: bytemuck::cast_slice(&vertices),
                    usage: wgpu::BufferUsages::VERTEX,
                });
                let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some(index_label.as_str()),
                    contents: bytemuck::cast_slice(&mesh.geometry.indices),
                    usage: wgpu::BufferUsages::INDEX,
                });
                GpuResource::Mesh(MeshBuffers {
                    vertex_buffer,
                    index_buffer,
                    index_count: mesh.geometry.indices.len() as u32,
                    mesh_index,
                })
            });
            resources.push(TrackedResource {
                handle: self.next_handle(),
                kind: ResourceKind::Geometry,
                gpu,
            });
        }

        for (material_index, material) in node.materials.iter().enumerate() {
            let gpu = ctx.device().map(|device| {
                let uniform = material.to_uniform(node.effective_opacity());
                let label = format!("{} Material Uniform", node.name);
                GpuResource::Material {
                    uniform: device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                        label: Some(label.as_str()),
                        contents: bytemuck::cast_slice(&[uniform]),
                        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                    }),
                    material_index,
                }
            });
            resources.push(TrackedResource {
                handle: self.next_handle(),
                kind: ResourceKind::Material,
                gpu,
            });
        }

        if node.asset_reference().is_some() {
            resources.push(TrackedResource {
                handle: self.next_handle(),
                kind: ResourceKind::AssetTree,
                gpu: None,
            });
        }

        ResourceSet { resources }
    }

    /// Record `set` for `entry_id`, releasing whatever the entry held before
    pub fn track(&mut self, entry_id: &str, set: ResourceSet) {
        self.total_tracked += set.len() as u64;
        if let Some(previous) = self.sets.insert(entry_id.to_string(), set) {
            self.total_released += previous.destroy() as u64;
        }
    }

    /// Upload and track in one step
    pub fn track_node(&mut self, ctx: &RenderContext, entry_id: &str, node: &RenderNode) {
        let set = self.upload(ctx, node);
        self.track(entry_id, set);
    }

    /// Free everything held for `entry_id`. Unknown or already released ids are ignored.
    pub fn release(&mut self, entry_id: &str) -> usize {
        match self.sets.remove(entry_id) {
            Some(set) => {
                let released = set.destroy();
                self.total_released += released as u64;
                released
            }
            None => 0,
        }
    }

    pub fn release_all(&mut self) -> usize {
        let released: usize = self.sets.drain().map(|(_, set)| set.destroy()).sum();
        self.total_released += released as u64;
        released
    }

    pub fn is_tracked(&self, entry_id: &str) -> bool {
        self.sets.contains_key(entry_id)
    }

    pub fn tracked_sets(&self) -> usize {
        self.sets.len()
    }

    pub fn set_for(&self, entry_id: &str) -> Option<&ResourceSet> {
        self.sets.get(entry_id)
    }

    /// Buffers to draw `entry_id` with; empty when headless
    pub fn mesh_buffers(&self, entry_id: &str) -> impl Iterator<Item = &MeshBuffers> + '_ {
        self.sets
            .get(entry_id)
            .into_iter()
            .flat_map(|set| set.resources.iter())
            .filter_map(|r| match &r.gpu {
                Some(GpuResource::Mesh(buffers)) => Some(buffers),
                _ => None,
            })
    }

    /// Push current material state (color, opacity, wireframe) to the GPU
    pub fn write_materials(&self, ctx: &RenderContext, entry_id: &str, node: &RenderNode) {
        let (Some(queue), Some(set)) = (ctx.queue(), self.sets.get(entry_id)) else {
            return;
        };
        for resource in &set.resources {
            if let Some(GpuResource::Material {
                uniform,
                material_index,
            }) = &resource.gpu
            {
                if let Some(material) = node.materials.get(*material_index) {
                    let data = material.to_uniform(node.effective_opacity());
                    queue.write_buffer(uniform, 0, bytemuck::cast_slice(&[data]));
                }
            }
        }
    }

    pub fn stats(&self) -> ResourceStats {
        let live_handles = self.sets.values().map(ResourceSet::len).sum();
        let gpu_buffers = self
            .sets
            .values()
            .flat_map(|set| set.resources.iter())
            .map(|r| match r.gpu {
                Some(GpuResource::Mesh(_)) => 2,
                Some(GpuResource::Material { .. }) => 1,
                None => 0,
            })
            .sum();

        ResourceStats {
            tracked_sets: self.sets.len(),
            live_handles,
            gpu_buffers,
            total_tracked: self.total_tracked,
            total_released: self.total_released,
        }
    }
}

impl Drop for ResourceTracker {
    fn drop(&mut self) {
        if !self.sets.is_empty() {
            log::debug!("releasing {} resource sets on drop", self.sets.len());
            self.release_all();
        }
    }
}
