//! # Scene Management Module
//!
//! Render nodes and the registry that maps build components onto them.
//!
//! - [`RenderNode`] - meshes, materials, transform and reveal state for one component
//! - [`SceneRegistry`] - one entry per component, kept in step with the current build
//! - [`Vertex3D`] - GPU vertex format

pub mod node;
pub mod registry;
pub mod vertex;

pub use node::{Mesh, NodeSource, RenderNode, Reveal};
pub use registry::{LoadEvent, RegistryStats, SceneEntry, SceneRegistry, SyncReport};
pub use vertex::Vertex3D;
