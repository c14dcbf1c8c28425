use serde::{Deserialize, Serialize};

/// Four-component single-precision vector, the unit of shader uniform and attribute data.
///
/// Components are IEEE-754 `f32` and may hold NaN or either infinity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec4 {
    /// First component.
    pub x: f32,
    /// Second component.
    pub y: f32,
    /// Third component.
    pub z: f32,
    /// Fourth component.
    pub w: f32,
}

impl Vec4 {
    /// All components zero.
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0, 0.0);

    /// Build a vector from its four components.
    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    /// Build a vector with the same value in every component.
    pub const fn splat(v: f32) -> Self {
        Self::new(v, v, v, v)
    }

    /// Components in `x, y, z, w` order.
    pub const fn to_array(self) -> [f32; 4] {
        [self.x, self.y, self.z, self.w]
    }

    /// Build a vector from `x, y, z, w` components.
    pub const fn from_array(a: [f32; 4]) -> Self {
        Self::new(a[0], a[1], a[2], a[3])
    }
}

impl From<[f32; 4]> for Vec4 {
    fn from(a: [f32; 4]) -> Self {
        Self::from_array(a)
    }
}

/// Screen-space pixel coordinate with the origin at the bottom-left corner.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PixelCoord {
    /// Column, left to right.
    pub x: u32,
    /// Row, bottom to top.
    pub y: u32,
}

impl PixelCoord {
    /// Bottom-left pixel, the readback location of every built-in suite.
    pub const ORIGIN: Self = Self { x: 0, y: 0 };

    /// Build a coordinate.
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

/// Straight RGBA8 color, used for clear colors.
pub type Rgba8 = [u8; 4];

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
