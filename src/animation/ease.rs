use std::str::FromStr;

use crate::foundation::error::MorphError;

/// Re-parameterization of the linear frame parameter `t` before it reaches the compositor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ease {
    /// Identity.
    Linear,
    /// `t^2`.
    InQuad,
    /// Mirror of [`Ease::InQuad`].
    OutQuad,
    /// Piecewise quadratic, slow at both ends.
    InOutQuad,
    /// `t^3`.
    InCubic,
    /// Mirror of [`Ease::InCubic`].
    OutCubic,
    /// Piecewise cubic, slow at both ends.
    InOutCubic,
    /// `t^2 (3 - 2t)`: zero slope at both endpoints.
    #[default]
    Smoothstep,
}

impl Ease {
    /// Every variant, in declaration order.
    pub const ALL: [Ease; 8] = [
        Ease::Linear,
        Ease::InQuad,
        Ease::OutQuad,
        Ease::InOutQuad,
        Ease::InCubic,
        Ease::OutCubic,
        Ease::InOutCubic,
        Ease::Smoothstep,
    ];

    /// Map `t` (clamped to `[0, 1]`) through the curve.
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::InQuad => t * t,
            Self::OutQuad => 1.0 - (1.0 - t) * (1.0 - t),
            Self::InOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - ((-2.0 * t + 2.0).powi(2) / 2.0)
                }
            }
            Self::InCubic => t * t * t,
            Self::OutCubic => 1.0 - (1.0 - t).powi(3),
            Self::InOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - ((-2.0 * t + 2.0).powi(3) / 2.0)
                }
            }
            Self::Smoothstep => t * t * (3.0 - 2.0 * t),
        }
    }

    /// Snake-case name accepted by [`Ease::from_str`].
    pub fn name(self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::InQuad => "in_quad",
            Self::OutQuad => "out_quad",
            Self::InOutQuad => "in_out_quad",
            Self::InCubic => "in_cubic",
            Self::OutCubic => "out_cubic",
            Self::InOutCubic => "in_out_cubic",
            Self::Smoothstep => "smoothstep",
        }
    }
}

impl FromStr for Ease {
    type Err = MorphError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase().replace('-', "_");
        Ease::ALL
            .into_iter()
            .find(|e| e.name() == key)
            .ok_or_else(|| MorphError::parse(format!("unknown ease '{}'", s.trim())))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/ease.rs"]
mod tests;
