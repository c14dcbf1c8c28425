//! Float ⇄ 8-bit channel quantization.
//!
//! The color output path of the rasterizer clamps every channel to `[0, 1]` and stores it as
//! an unsigned byte. Expected values are encoded with the same rule before comparison, so the
//! rule here must match the fixed-point rounding of the rasterizer under test.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::color::Channel;
use crate::table::ExpectedColor;

/// Largest byte value, the encoding of `1.0`.
pub const CHANNEL_MAX: u8 = 0xFF;

/// Rounding applied when scaling a clamped channel value into `0..=255`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundingRule {
    /// Round to nearest, ties away from zero (`0.5 -> 0x80`).
    #[default]
    NearestTiesAway,
    /// Drop the fractional part (`0.5 -> 0x7F`).
    Truncate,
}

impl RoundingRule {
    fn apply(self, scaled: f32) -> f32 {
        match self {
            // `f32::round` rounds half-way cases away from zero.
            Self::NearestTiesAway => scaled.round(),
            Self::Truncate => scaled.trunc(),
        }
    }
}

/// Quantize one channel value.
///
/// `f` is clamped into `[0, 1]` first. NaN maps to `0`, `+inf` to `0xFF` and `-inf` to `0`.
pub fn quantize(f: f32, rule: RoundingRule) -> u8 {
    if f.is_nan() {
        return 0;
    }
    let scaled = f.clamp(0.0, 1.0) * f32::from(CHANNEL_MAX);
    // Saturating float->int cast; the value is already inside 0..=255.
    rule.apply(scaled) as u8
}

/// Inverse of [`quantize`]: the channel value a stored byte represents.
pub fn dequantize(b: u8) -> f32 {
    f32::from(b) / f32::from(CHANNEL_MAX)
}

/// Channel bytes of one pixel, in logical `r, g, b[, a]` order.
///
/// Created transiently by the verifier and dropped after comparison.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct QuantizedColor {
    channels: SmallVec<[u8; 4]>,
}

impl QuantizedColor {
    /// Wrap bytes given in logical channel order. Accepts 3 (rgb) or 4 (rgba) channels.
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if !(3..=4).contains(&bytes.len()) {
            return None;
        }
        Some(Self {
            channels: SmallVec::from_slice(bytes),
        })
    }

    /// Encode a case's expected color.
    pub fn from_expected(expected: &ExpectedColor, rule: RoundingRule) -> Self {
        let channels = expected.channels().iter().map(|&v| quantize(v, rule)).collect();
        Self { channels }
    }

    /// Number of channels (3 or 4).
    pub fn len(&self) -> usize {
        self.channels.len()
    }

    /// Always `false`; present for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// Byte for `channel`, if the color has it.
    pub fn get(&self, channel: Channel) -> Option<u8> {
        self.channels.get(channel.index()).copied()
    }

    /// Bytes in logical channel order.
    pub fn as_slice(&self) -> &[u8] {
        &self.channels
    }
}

impl std::fmt::Display for QuantizedColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "(")?;
        for (i, b) in self.channels.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{b:02X}")?;
        }
        write!(f, ")")
    }
}

#[cfg(test)]
#[path = "../../tests/unit/color/quantize.rs"]
mod tests;
