//! # Rotorscope Prelude
//!
//! The types a typical host needs to display a build:
//!
//! ```rust
//! use rotorscope::prelude::*;
//!
//! let mut viewer = BuildViewer::new(RenderContext::headless(640, 480), EngineConfig::default());
//! viewer
//!     .set_build(Build::new(vec![Component::new("frame", Category::Frame)]))
//!     .unwrap();
//! viewer.select_view_mode(ViewMode::Top);
//! assert_eq!(viewer.stats().entries, 1);
//! ```

// Engine and configuration
pub use crate::config::EngineConfig;
pub use crate::context::RenderContext;
pub use crate::engine::{BuildViewer, FrameReport, SceneStats};
pub use crate::error::{AssetError, BuildError, EngineError};

// Build description
pub use crate::build::{
    AnimationConfig, AnimationStep, Build, CameraConfig, Category, Color, Component, Environment,
    LightingPreset, RevealStyle, Transform,
};

// Assets, scene and camera
pub use crate::animation::{Easing, SequencerEvent};
pub use crate::gfx::assets::{AssetFuture, AssetLoader, FileAssetLoader, LoadedAsset};
pub use crate::gfx::camera::{ViewMode, ViewState, Viewpoint};
pub use crate::gfx::scene::{LoadEvent, RenderNode};

// Common external types
pub use cgmath::Vector3;
