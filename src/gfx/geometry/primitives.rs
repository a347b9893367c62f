//! Procedural meshes used for placeholder parts. All shapes are Y-up, centered
//! on the origin, with outward normals and counter-clockwise winding.

use super::GeometryData;
use std::f32::consts::PI;

/// Box with extents `width` x `height` x `depth` along X, Y and Z. Each face
/// gets its own four vertices so normals stay flat.
pub fn generate_box(width: f32, height: f32, depth: f32) -> GeometryData {
    let mut data = GeometryData::new();
    let (hx, hy, hz) = (width * 0.5, height * 0.5, depth * 0.5);

    // (normal, tangent u, tangent v) per face; corners are n ± u ± v
    let faces: [([f32; 3], [f32; 3], [f32; 3]); 6] = [
        ([0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
        ([0.0, 0.0, -1.0], [-1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
        ([1.0, 0.0, 0.0], [0.0, 0.0, -1.0], [0.0, 1.0, 0.0]),
        ([-1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 0.0]),
        ([0.0, 1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, -1.0]),
        ([0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
    ];
    let corners = [(-1.0, -1.0, [0.0, 0.0]), (1.0, -1.0, [1.0, 0.0]), (1.0, 1.0, [1.0, 1.0]), (-1.0, 1.0, [0.0, 1.0])];

    for (normal, u, v) in faces {
        let base = data.vertices.len() as u32;
        for (su, sv, uv) in corners {
            let position = [
                (normal[0] + su * u[0] + sv * v[0]) * hx,
                (normal[1] + su * u[1] + sv * v[1]) * hy,
                (normal[2] + su * u[2] + sv * v[2]) * hz,
            ];
            data.vertices.push(position);
            data.normals.push(normal);
            data.tex_coords.push(uv);
        }
        data.indices
            .extend_from_slice(&[base, base + 1, base + 2, base + 2, base + 3, base]);
    }

    data
}

/// Generate a unit cube centered at the origin (-0.5 to 0.5 on all axes)
pub fn generate_cube() -> GeometryData {
    generate_box(1.0, 1.0, 1.0)
}

/// Generate a capped cylinder standing on the Y axis
///
/// `segments` is raised to at least 3.
pub fn generate_cylinder(radius: f32, height: f32, segments: u32) -> GeometryData {
    let mut data = GeometryData::new();

    let segs = segments.max(3);
    let half_height = height * 0.5;

    // Side ring pairs: even index = bottom, odd index = top
    for i in 0..=segs {
        let angle = i as f32 * 2.0 * PI / segs as f32;
        let (sin_a, cos_a) = angle.sin_cos();
        let (x, z) = (radius * cos_a, radius * sin_a);
        let u = i as f32 / segs as f32;

        data.vertices.push([x, -half_height, z]);
        data.normals.push([cos_a, 0.0, sin_a]);
        data.tex_coords.push([u, 0.0]);

        data.vertices.push([x, half_height, z]);
        data.normals.push([cos_a, 0.0, sin_a]);
        data.tex_coords.push([u, 1.0]);
    }

    for i in 0..segs {
        let bottom = i * 2;
        let top = bottom + 1;
        let bottom_next = bottom + 2;
        let top_next = bottom + 3;

        data.indices.extend_from_slice(&[bottom, top, bottom_next]);
        data.indices.extend_from_slice(&[top, top_next, bottom_next]);
    }

    // Caps get their own rims so their normals stay flat
    for (y, ny) in [(-half_height, -1.0_f32), (half_height, 1.0)] {
        let center = data.vertices.len() as u32;
        data.vertices.push([0.0, y, 0.0]);
        data.normals.push([0.0, ny, 0.0]);
        data.tex_coords.push([0.5, 0.5]);

        for i in 0..segs {
            let angle = i as f32 * 2.0 * PI / segs as f32;
            let (sin_a, cos_a) = angle.sin_cos();
            data.vertices.push([radius * cos_a, y, radius * sin_a]);
            data.normals.push([0.0, ny, 0.0]);
            data.tex_coords.push([0.5 + cos_a * 0.5, 0.5 + sin_a * 0.5]);
        }

        for i in 0..segs {
            let current = center + 1 + i;
            let next = center + 1 + (i + 1) % segs;
            if ny > 0.0 {
                data.indices.extend_from_slice(&[center, next, current]);
            } else {
                data.indices.extend_from_slice(&[center, current, next]);
            }
        }
    }

    data
}

/// Generate a torus lying in the XZ plane
///
/// # Arguments
/// * `major_radius` - Distance from the center to the middle of the tube
/// * `minor_radius` - Radius of the tube
/// * `major_segments` - Segments around the ring (minimum 3)
/// * `minor_segments` - Segments around the tube (minimum 3)
pub fn generate_torus(
    major_radius: f32,
    minor_radius: f32,
    major_segments: u32,
    minor_segments: u32,
) -> GeometryData {
    let mut data = GeometryData::new();

    let ring_segs = major_segments.max(3);
    let tube_segs = minor_segments.max(3);

    for i in 0..=ring_segs {
        let u = i as f32 / ring_segs as f32;
        let (sin_theta, cos_theta) = (u * 2.0 * PI).sin_cos();

        for j in 0..=tube_segs {
            let v = j as f32 / tube_segs as f32;
            let (sin_phi, cos_phi) = (v * 2.0 * PI).sin_cos();

            let ring = major_radius + minor_radius * cos_phi;
            data.vertices.push([ring * cos_theta, minor_radius * sin_phi, ring * sin_theta]);
            data.normals.push([cos_phi * cos_theta, sin_phi, cos_phi * sin_theta]);
            data.tex_coords.push([u, v]);
        }
    }

    let stride = tube_segs + 1;
    for i in 0..ring_segs {
        for j in 0..tube_segs {
            let a = i * stride + j;
            let b = a + stride;

            data.indices.extend_from_slice(&[a, a + 1, b]);
            data.indices.extend_from_slice(&[b, a + 1, b + 1]);
        }
    }

    data
}
