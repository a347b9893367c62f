//! Reveal interpolation: how a component looks part way through its step.

use cgmath::{Deg, Vector3};

use crate::build::RevealStyle;
use crate::config::EngineConfig;
use crate::gfx::scene::node::Reveal;

use super::easing::Easing;

/// Curve and travel distances shared by every reveal style
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RevealParams {
    pub easing: Easing,
    pub slide_distance: f32,
    pub rotate_degrees: f32,
}

impl RevealParams {
    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            easing: config.easing,
            slide_distance: config.slide_distance,
            rotate_degrees: config.rotate_degrees,
        }
    }

    /// Reveal state at linear step progress `t` (clamped to `0..=1`)
    pub fn reveal_at(&self, style: RevealStyle, t: f32) -> Reveal {
        let e = self.easing.apply(t);
        let remaining = 1.0 - e;
        let mut reveal = Reveal {
            opacity: e,
            ..Reveal::REST
        };
        match style {
            RevealStyle::FadeIn => {}
            RevealStyle::SlideIn => {
                reveal.offset = Vector3::new(0.0, self.slide_distance * remaining, 0.0);
            }
            RevealStyle::RotateIn => reveal.spin = Deg(self.rotate_degrees * remaining),
            RevealStyle::ScaleIn => reveal.scale = e,
        }
        reveal
    }

    /// State a target sits in before its step begins
    pub fn start(&self, style: RevealStyle) -> Reveal {
        self.reveal_at(style, 0.0)
    }
}

impl Default for RevealParams {
    fn default() -> Self {
        Self::from_config(&EngineConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_style_starts_hidden_and_ends_at_rest() {
        let params = RevealParams::default();
        for style in [
            RevealStyle::FadeIn,
            RevealStyle::SlideIn,
            RevealStyle::RotateIn,
            RevealStyle::ScaleIn,
        ] {
            assert_eq!(params.start(style).opacity, 0.0);
            assert!(params.reveal_at(style, 1.0).is_rest(), "{style:?}");
        }
    }

    #[test]
    fn test_slide_descends_from_above() {
        let params = RevealParams {
            easing: Easing::Linear,
            slide_distance: 2.0,
            rotate_degrees: 90.0,
        };
        assert_eq!(params.start(RevealStyle::SlideIn).offset.y, 2.0);
        let half = params.reveal_at(RevealStyle::SlideIn, 0.5);
        assert_eq!(half.offset.y, 1.0);
        assert_eq!(half.opacity, 0.5);
        assert_eq!(params.reveal_at(RevealStyle::RotateIn, 0.5).spin, Deg(45.0));
    }
}
