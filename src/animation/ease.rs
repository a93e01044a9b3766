/// Easing curves applied to normalized phase progress.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ease {
    /// Cubic ease-out. Used for every opacity ramp.
    #[default]
    OutCubic,
    /// Cubic ease-in/out. Used for the zoom scale ramp.
    InOutCubic,
}

impl Ease {
    /// Apply this easing function to `t`, clamped into `[0, 1]` first.
    pub fn apply(self, t: f64) -> f64 {
        let t = crate::foundation::math::clamp01(t);
        match self {
            Self::OutCubic => 1.0 - (1.0 - t).powi(3),
            Self::InOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - ((-2.0 * t + 2.0).powi(3) / 2.0)
                }
            }
        }
    }
}

/// Ease-out curve shared by fades and panel offsets.
pub(crate) fn ease_out(t: f64) -> f64 {
    Ease::OutCubic.apply(t)
}

/// Ease-in/out curve used for the zoom scale.
pub(crate) fn ease_in_out(t: f64) -> f64 {
    Ease::InOutCubic.apply(t)
}

#[cfg(test)]
#[path = "../../tests/unit/animation/ease.rs"]
mod tests;
