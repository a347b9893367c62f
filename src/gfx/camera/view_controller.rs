//! # View Controller
//!
//! Finite state machine over the named view modes plus a free navigation
//! state. Selecting a named mode snaps the orbit camera to that mode's fixed
//! `(position, target)` pair; any orbit, pan or zoom switches to
//! [`ViewState::Free`]. Every state can reach every other one.
//!
//! ```rust
//! use rotorscope::config::EngineConfig;
//! use rotorscope::gfx::camera::{ViewController, ViewMode, ViewState};
//!
//! let mut views = ViewController::new(&EngineConfig::default(), 16.0 / 9.0);
//! views.select_mode(ViewMode::Top);
//! assert_eq!(views.state(), ViewState::Named(ViewMode::Top));
//! views.orbit(12.0, 0.0);
//! assert_eq!(views.state(), ViewState::Free);
//! ```

use std::fmt;

use cgmath::{Deg, Vector3, Zero};
use serde::{Deserialize, Serialize};

use crate::build::CameraConfig;
use crate::config::EngineConfig;

use super::orbit_camera::{CameraUniform, OrbitCamera, OrbitLimits};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ViewMode {
    Perspective,
    Top,
    Front,
    Side,
}

impl ViewMode {
    pub const ALL: [ViewMode; 4] = [
        ViewMode::Perspective,
        ViewMode::Top,
        ViewMode::Front,
        ViewMode::Side,
    ];
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ViewMode::Perspective => "perspective",
            ViewMode::Top => "top",
            ViewMode::Front => "front",
            ViewMode::Side => "side",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewState {
    Named(ViewMode),
    /// Entered on any manual orbit, pan or zoom
    Free,
}

/// Read-only snapshot of the live camera
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewpoint {
    pub position: Vector3<f32>,
    pub target: Vector3<f32>,
    pub fov: Deg<f32>,
}

pub struct ViewController {
    camera: OrbitCamera,
    state: ViewState,
    view_distance: f32,
    perspective_pose: (Vector3<f32>, Vector3<f32>),
    default_pose: (Vector3<f32>, Vector3<f32>),
    default_fov: Deg<f32>,
    /// Perspective pose came from a build rather than the config
    custom_perspective: bool,
    rotate_speed: f32,
    pan_speed: f32,
    zoom_speed: f32,
}

impl ViewController {
    /// Controller in perspective mode at the configured default viewpoint
    pub fn new(config: &EngineConfig, aspect: f32) -> Self {
        let half = config.view_distance * 0.5;
        let perspective_pose = (Vector3::new(half, half, half), Vector3::zero());

        let mut camera = OrbitCamera::looking_at(perspective_pose.0, perspective_pose.1, aspect);
        camera.fovy = Deg(config.default_fov).into();
        camera.limits = OrbitLimits {
            min_distance: config.min_distance,
            max_distance: config.max_distance,
            ..Default::default()
        };

        let mut controller = Self {
            camera,
            state: ViewState::Named(ViewMode::Perspective),
            view_distance: config.view_distance,
            perspective_pose,
            default_pose: perspective_pose,
            default_fov: Deg(config.default_fov),
            custom_perspective: false,
            rotate_speed: config.rotate_speed,
            pan_speed: config.pan_speed,
            zoom_speed: config.zoom_speed,
        };
        controller.select_mode(ViewMode::Perspective);
        controller
    }

    /// Take the perspective pose and field of view from a build, then snap to
    /// perspective mode.
    pub fn apply_build_camera(&mut self, camera: &CameraConfig) {
        self.perspective_pose = (camera.position.into(), camera.target.into());
        self.custom_perspective = true;
        if camera.fov.is_finite() && camera.fov > 1.0 && camera.fov < 179.0 {
            self.camera.fovy = Deg(camera.fov).into();
        }
        self.select_mode(ViewMode::Perspective);
    }

    /// Return to the configured perspective pose and field of view, for
    /// builds that carry no camera of their own.
    pub fn reset_perspective(&mut self) {
        self.perspective_pose = self.default_pose;
        self.custom_perspective = false;
        self.camera.fovy = self.default_fov.into();
        self.select_mode(ViewMode::Perspective);
    }

    /// Adopt new navigation settings and presets. A build camera keeps its
    /// perspective pose; a named view is re-snapped to its updated pose.
    pub fn apply_config(&mut self, config: &EngineConfig) {
        let half = config.view_distance * 0.5;
        self.default_pose = (Vector3::new(half, half, half), Vector3::zero());
        self.default_fov = Deg(config.default_fov);
        self.view_distance = config.view_distance;
        self.rotate_speed = config.rotate_speed;
        self.pan_speed = config.pan_speed;
        self.zoom_speed = config.zoom_speed;
        self.camera.limits.min_distance = config.min_distance;
        self.camera.limits.max_distance = config.max_distance;

        if !self.custom_perspective {
            self.perspective_pose = self.default_pose;
            self.camera.fovy = self.default_fov.into();
        }
        if let ViewState::Named(mode) = self.state {
            self.select_mode(mode);
        }
    }

    /// Fixed `(position, target)` for a named mode
    pub fn pose_for(&self, mode: ViewMode) -> (Vector3<f32>, Vector3<f32>) {
        let d = self.view_distance;
        match mode {
            ViewMode::Perspective => self.perspective_pose,
            ViewMode::Top => (Vector3::new(0.0, d, 0.0), Vector3::zero()),
            ViewMode::Front => (Vector3::new(0.0, 0.0, d), Vector3::zero()),
            ViewMode::Side => (Vector3::new(d, 0.0, 0.0), Vector3::zero()),
        }
    }

    pub fn select_mode(&mut self, mode: ViewMode) {
        let (position, target) = self.pose_for(mode);
        self.camera.look_from(position, target);
        self.state = ViewState::Named(mode);
        log::debug!("view mode -> {mode}");
    }

    /// Drag rotation in pixels
    pub fn orbit(&mut self, dx: f32, dy: f32) {
        self.camera.orbit_by(-dx * self.rotate_speed, dy * self.rotate_speed);
        self.state = ViewState::Free;
    }

    /// Pan in view-relative units
    pub fn pan(&mut self, dx: f32, dy: f32) {
        self.camera.pan_by(dx * self.pan_speed, dy * self.pan_speed);
        self.state = ViewState::Free;
    }

    /// Wheel zoom; positive moves away from the target
    pub fn zoom(&mut self, delta: f32) {
        self.camera.zoom_by(delta * self.zoom_speed);
        self.state = ViewState::Free;
    }

    pub fn state(&self) -> ViewState {
        self.state
    }

    pub fn mode(&self) -> Option<ViewMode> {
        match self.state {
            ViewState::Named(mode) => Some(mode),
            ViewState::Free => None,
        }
    }

    pub fn viewpoint(&self) -> Viewpoint {
        Viewpoint {
            position: self.camera.eye,
            target: self.camera.target,
            fov: self.camera.fovy.into(),
        }
    }

    pub fn camera(&self) -> &OrbitCamera {
        &self.camera
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.camera.resize(width, height);
    }

    /// Uniform for the host's camera buffer
    pub fn uniform(&self) -> CameraUniform {
        self.camera.uniform()
    }
}
