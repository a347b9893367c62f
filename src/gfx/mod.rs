//! # Graphics Module
//!
//! Everything between a [`Build`](crate::build::Build) and the pixels the host
//! draws: placeholder geometry, asset loading, the scene registry, GPU
//! resource tracking, cameras and picking.
//!
//! ## Architecture Overview
//!
//! - **Geometry** ([`geometry`]) - procedural primitives and the placeholder factory
//! - **Assets** ([`assets`]) - host loader capability, resolver, OBJ and glTF parsing
//! - **Scene** ([`scene`]) - render nodes and the component registry
//! - **Resources** ([`resources`]) - materials and per-entry GPU resource tracking
//! - **Camera** ([`camera`]) - orbit camera and the view-mode state machine
//! - **Picking** ([`picking`]) - ray casting from screen coordinates

pub mod assets;
pub mod camera;
pub mod geometry;
pub mod picking;
pub mod resources;
pub mod scene;

pub use camera::orbit_camera::OrbitCamera;
pub use scene::registry::SceneRegistry;
