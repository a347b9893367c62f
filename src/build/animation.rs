//! Assembly animation descriptors.
//!
//! Timings are exchanged as milliseconds and held as [`Duration`].

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// How a component transitions from hidden to its resting state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RevealStyle {
    #[default]
    #[serde(alias = "fade")]
    FadeIn,
    #[serde(alias = "slide")]
    SlideIn,
    #[serde(alias = "rotate")]
    RotateIn,
    #[serde(alias = "scale")]
    ScaleIn,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimationStep {
    pub component_id: String,
    /// Wait after the previous step completed before this one starts
    #[serde(default, with = "millis")]
    pub delay: Duration,
    #[serde(with = "millis")]
    pub duration: Duration,
    #[serde(default)]
    pub reveal_style: RevealStyle,
}

impl AnimationStep {
    pub fn new(component_id: impl Into<String>, delay: Duration, duration: Duration) -> Self {
        Self {
            component_id: component_id.into(),
            delay,
            duration,
            reveal_style: RevealStyle::default(),
        }
    }

    pub fn with_reveal_style(mut self, style: RevealStyle) -> Self {
        self.reveal_style = style;
        self
    }
}

fn default_kind() -> String {
    "sequential".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimationConfig {
    #[serde(rename = "type", default = "default_kind")]
    pub kind: String,
    /// Informational; the sequencer derives timing from the steps
    #[serde(default, with = "millis")]
    pub total_duration: Duration,
    #[serde(default)]
    pub steps: Vec<AnimationStep>,
}

impl AnimationConfig {
    pub fn sequential(steps: Vec<AnimationStep>) -> Self {
        let total_duration = steps.iter().map(|s| s.delay + s.duration).sum();
        Self {
            kind: default_kind(),
            total_duration,
            steps,
        }
    }
}

pub(crate) mod millis {
    use std::time::Duration;

    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(value.as_secs_f64() * 1000.0)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let ms = f64::deserialize(deserializer)?;
        if !ms.is_finite() {
            return Err(D::Error::custom(format!("invalid duration {ms}ms")));
        }
        Duration::try_from_secs_f64(ms.max(0.0) / 1000.0).map_err(D::Error::custom)
    }
}
