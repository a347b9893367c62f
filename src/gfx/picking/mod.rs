//! Pointer picking.
//!
//! A click is unprojected into a world-space ray and tested against the
//! world bounds of every rendered node; the nearest hit wins. Hidden
//! components have no bounds and can never be picked.
//!
//! ```rust
//! use rotorscope::gfx::picking::{Ray, AABB};
//! use cgmath::Vector3;
//!
//! let unit = AABB::new(Vector3::new(-1.0, -1.0, -1.0), Vector3::new(1.0, 1.0, 1.0));
//! let ray = Ray::new(Vector3::new(0.0, 0.0, -5.0), Vector3::new(0.0, 0.0, 1.0));
//! assert_eq!(unit.intersect_ray(&ray), Some(4.0));
//! ```

use cgmath::{InnerSpace, Matrix4, SquareMatrix, Vector3, Vector4, Zero};

use crate::gfx::camera::orbit_camera::OrbitCamera;
use crate::gfx::scene::registry::SceneRegistry;

#[derive(Debug, Clone, Copy)]
pub struct Ray {
    pub origin: Vector3<f32>,
    /// Unit length
    pub direction: Vector3<f32>,
}

impl Ray {
    pub fn new(origin: Vector3<f32>, direction: Vector3<f32>) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    pub fn point_at(&self, t: f32) -> Vector3<f32> {
        self.origin + self.direction * t
    }
}

fn lower(a: Vector3<f32>, b: Vector3<f32>) -> Vector3<f32> {
    Vector3::new(a.x.min(b.x), a.y.min(b.y), a.z.min(b.z))
}

fn upper(a: Vector3<f32>, b: Vector3<f32>) -> Vector3<f32> {
    Vector3::new(a.x.max(b.x), a.y.max(b.y), a.z.max(b.z))
}

/// Axis-aligned box, `min <= max` on every axis
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AABB {
    pub min: Vector3<f32>,
    pub max: Vector3<f32>,
}

impl AABB {
    pub fn new(min: Vector3<f32>, max: Vector3<f32>) -> Self {
        Self { min, max }
    }

    /// Tightest box around `points`; a degenerate box at the origin when empty
    pub fn from_vertices(points: &[[f32; 3]]) -> Self {
        let mut points = points.iter().copied().map(Vector3::from);
        match points.next() {
            Some(first) => points.fold(Self::new(first, first), |acc, p| {
                Self::new(lower(acc.min, p), upper(acc.max, p))
            }),
            None => Self::new(Vector3::zero(), Vector3::zero()),
        }
    }

    pub fn center(&self) -> Vector3<f32> {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vector3<f32> {
        self.max - self.min
    }

    pub fn union(&self, other: &AABB) -> AABB {
        AABB::new(lower(self.min, other.min), upper(self.max, other.max))
    }

    /// Slab test. Yields the entry distance, or the exit distance when the
    /// ray starts inside; `None` on a miss or when the box lies behind.
    pub fn intersect_ray(&self, ray: &Ray) -> Option<f32> {
        let mut enter = f32::NEG_INFINITY;
        let mut exit = f32::INFINITY;
        for axis in 0..3 {
            let (origin, dir) = (ray.origin[axis], ray.direction[axis]);
            let (lo, hi) = (self.min[axis], self.max[axis]);
            if dir.abs() <= f32::EPSILON {
                // Parallel to this slab: must already be between its planes
                if origin < lo || origin > hi {
                    return None;
                }
                continue;
            }
            let (a, b) = ((lo - origin) / dir, (hi - origin) / dir);
            enter = enter.max(a.min(b));
            exit = exit.min(a.max(b));
        }

        if enter > exit || exit < 0.0 {
            None
        } else if enter >= 0.0 {
            Some(enter)
        } else {
            Some(exit)
        }
    }

    /// Box around the eight corners after `matrix` is applied
    pub fn transform(&self, matrix: &Matrix4<f32>) -> Self {
        let corners: Vec<[f32; 3]> = (0..8)
            .map(|bits| {
                let pick = |bit: u32, lo: f32, hi: f32| if bits & bit == 0 { lo } else { hi };
                let corner = Vector4::new(
                    pick(1, self.min.x, self.max.x),
                    pick(2, self.min.y, self.max.y),
                    pick(4, self.min.z, self.max.z),
                    1.0,
                );
                let p = matrix * corner;
                [p.x / p.w, p.y / p.w, p.z / p.w]
            })
            .collect();
        Self::from_vertices(&corners)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PickResult {
    pub component_id: String,
    /// Along the pick ray, from the near plane
    pub distance: f32,
    pub intersection_point: Vector3<f32>,
}

/// Ray through a pointer position given in pixels from the top-left corner
pub fn screen_to_ray(screen_pos: (f32, f32), screen_size: (f32, f32), camera: &OrbitCamera) -> Ray {
    let (width, height) = (screen_size.0.max(1.0), screen_size.1.max(1.0));
    let ndc_x = screen_pos.0 / width * 2.0 - 1.0;
    let ndc_y = 1.0 - screen_pos.1 / height * 2.0;

    // Unproject with the GL projection, so NDC depth spans -1..1
    let inverse = (camera.projection_matrix() * camera.view_matrix())
        .invert()
        .unwrap_or_else(Matrix4::identity);
    let world_at = |depth: f32| {
        let p = inverse * Vector4::new(ndc_x, ndc_y, depth, 1.0);
        p.truncate() / p.w
    };
    let near = world_at(-1.0);
    Ray::new(near, world_at(1.0) - near)
}

/// Pick the closest rendered component under the pointer
pub fn pick_component(
    screen_pos: (f32, f32),
    screen_size: (f32, f32),
    camera: &OrbitCamera,
    registry: &SceneRegistry,
) -> Option<PickResult> {
    let ray = screen_to_ray(screen_pos, screen_size, camera);

    registry
        .rendered_nodes()
        .filter_map(|(id, node)| {
            let bounds = node.world_bounds()?;
            let distance = bounds.intersect_ray(&ray)?;
            Some(PickResult {
                component_id: id.to_string(),
                distance,
                intersection_point: ray.point_at(distance),
            })
        })
        .min_by(|a, b| a.distance.total_cmp(&b.distance))
}
