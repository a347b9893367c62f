//! glTF 2.0 parsing (`.gltf` with external buffers or binary `.glb`).
//!
//! Node hierarchies are flattened: every mesh primitive becomes a [`Mesh`]
//! whose local transform is the product of its node chain. Materials keep
//! their PBR base color, metallic and roughness factors.

use anyhow::{anyhow, bail, Context};
use cgmath::{Matrix4, SquareMatrix};

use crate::gfx::geometry::GeometryData;
use crate::gfx::resources::material::Material;
use crate::gfx::scene::node::Mesh;

use super::LoadedAsset;

/// Parse glTF or GLB bytes. `sidecar` resolves external buffer URIs.
pub fn parse_gltf(
    name: &str,
    bytes: &[u8],
    sidecar: &dyn Fn(&str) -> Option<Vec<u8>>,
) -> anyhow::Result<LoadedAsset> {
    let gltf = gltf::Gltf::from_slice(bytes).with_context(|| format!("failed to parse glTF `{name}`"))?;

    let mut buffer_data: Vec<Vec<u8>> = Vec::new();
    for buffer in gltf.buffers() {
        match buffer.source() {
            gltf::buffer::Source::Bin => {
                let blob = gltf
                    .blob
                    .as_deref()
                    .ok_or_else(|| anyhow!("`{name}` references a missing binary chunk"))?;
                buffer_data.push(blob.to_vec());
            }
            gltf::buffer::Source::Uri(uri) => {
                if uri.starts_with("data:") {
                    bail!("`{name}` uses an embedded data URI buffer, which is not supported");
                }
                let bin = sidecar(uri).ok_or_else(|| anyhow!("buffer `{uri}` for `{name}` not found"))?;
                buffer_data.push(bin);
            }
        }
    }

    let mut asset = LoadedAsset::default();
    for (i, material) in gltf.materials().enumerate() {
        let pbr = material.pbr_metallic_roughness();
        let material_name = material
            .name()
            .map(str::to_string)
            .unwrap_or_else(|| format!("material_{i}"));
        asset.materials.push(
            Material::new(
                &material_name,
                pbr.base_color_factor(),
                pbr.metallic_factor(),
                pbr.roughness_factor(),
            )
            .emissive(material.emissive_factor()),
        );
    }
    // Primitives without a material use the glTF default material
    let default_material = asset.materials.len();
    asset.materials.push(Material::default());

    let scene = gltf
        .default_scene()
        .or_else(|| gltf.scenes().next())
        .ok_or_else(|| anyhow!("`{name}` contains no scene"))?;

    for node in scene.nodes() {
        collect_node(&node, Matrix4::identity(), &buffer_data, default_material, &mut asset);
    }

    Ok(asset)
}

fn collect_node(
    node: &gltf::Node,
    parent: Matrix4<f32>,
    buffers: &[Vec<u8>],
    default_material: usize,
    asset: &mut LoadedAsset,
) {
    let transform = parent * Matrix4::from(node.transform().matrix());

    if let Some(mesh) = node.mesh() {
        for (p, primitive) in mesh.primitives().enumerate() {
            if primitive.mode() != gltf::mesh::Mode::Triangles {
                log::debug!("skipping non-triangle primitive {p} of mesh {}", mesh.index());
                continue;
            }

            let reader = primitive.reader(|buffer| buffers.get(buffer.index()).map(Vec::as_slice));
            let Some(positions) = reader.read_positions() else {
                continue;
            };

            let mut geometry = GeometryData::new();
            geometry.vertices = positions.collect();
            geometry.indices = match reader.read_indices() {
                Some(indices) => indices.into_u32().collect(),
                None => (0..geometry.vertices.len() as u32).collect(),
            };
            if let Some(tex_coords) = reader.read_tex_coords(0) {
                geometry.tex_coords = tex_coords.into_f32().collect();
            }
            match reader.read_normals() {
                Some(normals) => geometry.normals = normals.collect(),
                None => geometry.compute_normals(),
            }

            let material_index = primitive.material().index().unwrap_or(default_material);
            let mesh_name = match mesh.name() {
                Some(name) => format!("{name}.{p}"),
                None => format!("mesh_{}.{p}", mesh.index()),
            };
            asset.meshes.push(
                Mesh::new(mesh_name, geometry)
                    .with_local_transform(transform)
                    .with_material_index(material_index),
            );
        }
    }

    for child in node.children() {
        collect_node(&child, transform, buffers, default_material, asset);
    }
}
