//! Wavefront OBJ parsing via `tobj`.

use std::io::{BufReader, Cursor};
use std::path::Path;

use anyhow::Context;

use crate::gfx::geometry::GeometryData;
use crate::gfx::resources::material::Material;
use crate::gfx::scene::node::Mesh;

use super::LoadedAsset;

/// Parse OBJ bytes. `sidecar` resolves `mtllib` names relative to the OBJ
/// file; a missing or broken MTL only costs the materials, not the mesh.
pub fn parse_obj(
    name: &str,
    bytes: &[u8],
    sidecar: &dyn Fn(&str) -> Option<Vec<u8>>,
) -> anyhow::Result<LoadedAsset> {
    let mut reader = BufReader::new(Cursor::new(bytes));
    let (models, materials) = tobj::load_obj_buf(
        &mut reader,
        &tobj::LoadOptions {
            triangulate: true,
            single_index: true,
            ..Default::default()
        },
        |mtl_path: &Path| {
            let mtl_name = mtl_path.to_string_lossy();
            let mtl = sidecar(&mtl_name).ok_or(tobj::LoadError::OpenFileFailed)?;
            tobj::load_mtl_buf(&mut BufReader::new(Cursor::new(mtl)))
        },
    )
    .with_context(|| format!("failed to parse OBJ `{name}`"))?;

    let materials = materials.unwrap_or_else(|err| {
        log::debug!("no usable MTL for `{name}`: {err}");
        Vec::new()
    });

    let mut asset = LoadedAsset::default();
    for (i, mtl) in materials.iter().enumerate() {
        let material_name = if mtl.name.is_empty() {
            format!("material_{i}")
        } else {
            mtl.name.clone()
        };
        let [r, g, b] = mtl.diffuse.unwrap_or([0.8, 0.8, 0.8]);
        let alpha = mtl.dissolve.unwrap_or(1.0);
        asset
            .materials
            .push(Material::new(&material_name, [r, g, b, alpha], 0.0, 0.5));
    }
    if asset.materials.is_empty() {
        asset.materials.push(Material::default());
    }

    for model in models {
        let mesh = model.mesh;
        if mesh.positions.is_empty() || mesh.indices.is_empty() {
            continue;
        }

        let mut geometry = GeometryData::new();
        geometry.vertices = mesh.positions.chunks_exact(3).map(|p| [p[0], p[1], p[2]]).collect();
        geometry.tex_coords = mesh.texcoords.chunks_exact(2).map(|t| [t[0], t[1]]).collect();
        geometry.indices = mesh.indices;

        if mesh.normals.len() == mesh.positions.len() {
            geometry.normals = mesh.normals.chunks_exact(3).map(|n| [n[0], n[1], n[2]]).collect();
        } else {
            geometry.compute_normals();
        }

        let material_index = mesh
            .material_id
            .filter(|&id| id < asset.materials.len())
            .unwrap_or(0);
        asset
            .meshes
            .push(Mesh::new(model.name, geometry).with_material_index(material_index));
    }

    Ok(asset)
}
