//! Easing curves for reveal interpolation.
//!
//! All reveal styles share one curve per engine instance. The default is
//! ease-out cubic: parts move quickly at first and settle gently into place.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Easing {
    Linear,
    #[default]
    EaseOutCubic,
    EaseInOutCubic,
    /// Hermite smoothstep
    Smoothstep,
}

impl Easing {
    /// Map normalized time `t` to eased progress. Input is clamped to [0, 1];
    /// the output always satisfies `f(0) == 0` and `f(1) == 1`.
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::EaseOutCubic => 1.0 - (1.0 - t).powi(3),
            Easing::EaseInOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
            Easing::Smoothstep => t * t * (3.0 - 2.0 * t),
        }
    }
}
