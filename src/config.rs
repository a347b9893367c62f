//! # Engine Configuration
//!
//! [`EngineConfig`] collects the tunables for camera navigation, named view
//! presets, reveal animation and build handling. Every field has a default, so
//! hosts can start from [`EngineConfig::default`] and override what they need,
//! either with the `with_*` builder methods or by deserializing JSON.
//!
//! ```rust
//! use rotorscope::config::EngineConfig;
//!
//! let config = EngineConfig::default()
//!     .with_view_distance(12.0)
//!     .with_strict_builds(true);
//! assert_eq!(config.view_distance, 12.0);
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::animation::easing::Easing;
use crate::build::animation::millis;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    /// Show the category placeholder while an external model is still loading
    pub placeholder_while_loading: bool,
    /// Reject invalid builds outright instead of clamping/deduplicating them
    pub strict_builds: bool,

    /// Distance from the origin used by the named view presets
    pub view_distance: f32,
    /// Vertical field of view in degrees when the build does not specify one
    pub default_fov: f32,
    pub rotate_speed: f32,
    pub pan_speed: f32,
    pub zoom_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,

    pub easing: Easing,
    /// Starting height offset for slide-in reveals
    pub slide_distance: f32,
    /// Starting yaw in degrees for rotate-in reveals
    pub rotate_degrees: f32,
    /// Step duration used when a build carries no animation block
    #[serde(with = "millis")]
    pub default_step_duration: Duration,
    #[serde(with = "millis")]
    pub default_step_delay: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            placeholder_while_loading: true,
            strict_builds: false,
            view_distance: 10.0,
            default_fov: 50.0,
            rotate_speed: 0.01,
            pan_speed: 1.0,
            zoom_speed: 1.0,
            min_distance: 0.5,
            max_distance: 50.0,
            easing: Easing::EaseOutCubic,
            slide_distance: 1.5,
            rotate_degrees: 90.0,
            default_step_duration: Duration::from_millis(500),
            default_step_delay: Duration::from_millis(100),
        }
    }
}

impl EngineConfig {
    /// Parse a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn with_placeholder_while_loading(mut self, enabled: bool) -> Self {
        self.placeholder_while_loading = enabled;
        self
    }

    pub fn with_strict_builds(mut self, strict: bool) -> Self {
        self.strict_builds = strict;
        self
    }

    pub fn with_view_distance(mut self, distance: f32) -> Self {
        self.view_distance = distance.max(f32::EPSILON);
        self
    }

    /// Builder pattern: Set orbit, pan and zoom sensitivity together
    pub fn with_navigation_speeds(mut self, rotate: f32, pan: f32, zoom: f32) -> Self {
        self.rotate_speed = rotate;
        self.pan_speed = pan;
        self.zoom_speed = zoom;
        self
    }

    pub fn with_distance_bounds(mut self, min: f32, max: f32) -> Self {
        self.min_distance = min.max(f32::EPSILON);
        self.max_distance = max.max(self.min_distance);
        self
    }

    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    pub fn with_default_step_timing(mut self, delay: Duration, duration: Duration) -> Self {
        self.default_step_delay = delay;
        self.default_step_duration = duration;
        self
    }
}
