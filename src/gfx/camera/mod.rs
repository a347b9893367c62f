//! Orbit camera and the named-view state machine driving it.

pub mod orbit_camera;
pub mod view_controller;

pub use orbit_camera::{CameraUniform, OrbitCamera, OrbitLimits};
pub use view_controller::{ViewController, ViewMode, ViewState, Viewpoint};
