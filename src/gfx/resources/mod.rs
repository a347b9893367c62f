//! GPU resource management
//!
//! Materials and the per-entry resource tracker.

pub mod material;
pub mod tracker;

pub use material::{Material, MaterialUniform};
pub use tracker::{ResourceHandle, ResourceKind, ResourceSet, ResourceStats, ResourceTracker};
