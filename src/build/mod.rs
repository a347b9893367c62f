//! # Build Description
//!
//! A [`Build`] is the aggregate the host hands to the engine: an ordered list
//! of [`Component`]s plus camera, environment and optional animation settings.
//! The engine treats every build as a wholesale replacement of its state and
//! never persists one; component-level edits are applied to a copy that is
//! handed back to the host.
//!
//! ## Validity
//!
//! A build is valid when component ids are unique and every opacity lies in
//! `[0, 1]`. [`Build::validate`] reports the first violation, while
//! [`Build::normalized`] produces a corrected copy (later duplicates dropped,
//! opacity clamped) together with everything it had to fix.
//!
//! ```rust
//! use rotorscope::build::Build;
//!
//! let build = Build::from_json(r##"{
//!     "components": [
//!         { "id": "frame", "category": "frame", "color": "#333333" },
//!         { "id": "m1", "category": "motor", "transform": { "position": [1, 0, 1] } }
//!     ]
//! }"##).unwrap();
//! assert_eq!(build.components.len(), 2);
//! assert!(build.validate().is_ok());
//! ```

pub mod animation;
pub mod component;
pub mod environment;

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

pub use animation::{AnimationConfig, AnimationStep, RevealStyle};
pub use component::{Category, Color, Component, ComponentMetadata, MountingPoint, Transform};
pub use environment::{CameraConfig, Environment, LightRig, LightingPreset};

use crate::config::EngineConfig;
use crate::error::BuildError;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Build {
    /// Component order is the default assembly order
    pub components: Vec<Component>,
    /// Perspective viewpoint; the engine's configured default when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub camera: Option<CameraConfig>,
    pub environment: Environment,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub animation: Option<AnimationConfig>,
}

impl Build {
    pub fn new(components: Vec<Component>) -> Self {
        Self {
            components,
            ..Default::default()
        }
    }

    pub fn from_json(json: &str) -> Result<Self, BuildError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, BuildError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn with_camera(mut self, camera: CameraConfig) -> Self {
        self.camera = Some(camera);
        self
    }

    pub fn with_animation(mut self, animation: AnimationConfig) -> Self {
        self.animation = Some(animation);
        self
    }

    pub fn component(&self, id: &str) -> Option<&Component> {
        self.components.iter().find(|c| c.id == id)
    }

    pub fn component_mut(&mut self, id: &str) -> Option<&mut Component> {
        self.components.iter_mut().find(|c| c.id == id)
    }

    /// Returns the first contract violation, if any.
    pub fn validate(&self) -> Result<(), BuildError> {
        let mut seen = HashSet::new();
        for component in &self.components {
            if !seen.insert(component.id.as_str()) {
                return Err(BuildError::DuplicateId(component.id.clone()));
            }
            if !(0.0..=1.0).contains(&component.opacity) {
                return Err(BuildError::OpacityOutOfRange {
                    id: component.id.clone(),
                    opacity: component.opacity,
                });
            }
        }
        Ok(())
    }

    /// Corrected copy of this build plus the issues that were fixed.
    ///
    /// The first occurrence of a duplicated id wins. Out-of-range opacity is
    /// clamped; NaN becomes fully opaque.
    pub fn normalized(&self) -> (Build, Vec<BuildError>) {
        let mut issues = Vec::new();
        let mut seen = HashSet::new();
        let mut components = Vec::with_capacity(self.components.len());

        for component in &self.components {
            if !seen.insert(component.id.clone()) {
                issues.push(BuildError::DuplicateId(component.id.clone()));
                continue;
            }
            let mut component = component.clone();
            if !(0.0..=1.0).contains(&component.opacity) {
                issues.push(BuildError::OpacityOutOfRange {
                    id: component.id.clone(),
                    opacity: component.opacity,
                });
                component.opacity = if component.opacity.is_nan() {
                    1.0
                } else {
                    component.opacity.clamp(0.0, 1.0)
                };
            }
            components.push(component);
        }

        let build = Build {
            components,
            camera: self.camera,
            environment: self.environment.clone(),
            animation: self.animation.clone(),
        };
        (build, issues)
    }

    /// Steps for the assembly animation: the build's own, or one reveal per
    /// component in component order.
    pub fn assembly_steps(&self, config: &EngineConfig) -> Vec<AnimationStep> {
        match &self.animation {
            Some(animation) => animation.steps.clone(),
            None => self
                .components
                .iter()
                .map(|c| {
                    AnimationStep::new(
                        c.id.clone(),
                        config.default_step_delay,
                        config.default_step_duration,
                    )
                })
                .collect(),
        }
    }
}
