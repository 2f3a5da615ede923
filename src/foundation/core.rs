use crate::foundation::math::{lerp_f32, unit_to_u8};

pub use kurbo::{Point, Vec2};

/// Vector rotated a quarter turn counter-clockwise: `(-y, x)`.
pub fn perp(v: Vec2) -> Vec2 {
    Vec2::new(-v.y, v.x)
}

/// Index of a frame within a generated sequence (0-based).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FrameIndex(pub u64);

/// Straight-alpha RGBA8, the storage format of image pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rgba8 {
    /// Red.
    pub r: u8,
    /// Green.
    pub g: u8,
    /// Blue.
    pub b: u8,
    /// Alpha.
    pub a: u8,
}

impl Rgba8 {
    /// Transparent black. Also the value of pixels a warp cannot sample.
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);

    /// Build a color from its four channels.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Fully opaque color.
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Channels in `[r, g, b, a]` order.
    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Inverse of [`Rgba8::to_array`].
    pub fn from_array(px: [u8; 4]) -> Self {
        Self::new(px[0], px[1], px[2], px[3])
    }
}

/// Floating-point RGBA with channels normalized to `[0, 1]`, used for interpolation.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RgbaF {
    /// Red.
    pub r: f32,
    /// Green.
    pub g: f32,
    /// Blue.
    pub b: f32,
    /// Alpha.
    pub a: f32,
}

impl RgbaF {
    /// Per-channel `self + t * (other - self)`. Alpha is treated like any other channel.
    pub fn lerp(self, other: Self, t: f32) -> Self {
        Self {
            r: lerp_f32(self.r, other.r, t),
            g: lerp_f32(self.g, other.g, t),
            b: lerp_f32(self.b, other.b, t),
            a: lerp_f32(self.a, other.a, t),
        }
    }
}

impl From<Rgba8> for RgbaF {
    fn from(c: Rgba8) -> Self {
        Self {
            r: f32::from(c.r) / 255.0,
            g: f32::from(c.g) / 255.0,
            b: f32::from(c.b) / 255.0,
            a: f32::from(c.a) / 255.0,
        }
    }
}

impl From<RgbaF> for Rgba8 {
    /// Rounds to the nearest step and clamps to `[0, 255]`.
    fn from(c: RgbaF) -> Self {
        Self::new(
            unit_to_u8(c.r),
            unit_to_u8(c.g),
            unit_to_u8(c.b),
            unit_to_u8(c.a),
        )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
