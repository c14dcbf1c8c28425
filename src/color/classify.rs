//! Marker colors for classified floating-point results.
//!
//! The color path cannot carry NaN or infinities, so the shader under test maps its scalar
//! result onto one of these markers before rasterization. All marker components are exactly
//! `0.0` or `1.0`, which quantize identically under every [`RoundingRule`](crate::RoundingRule).

use serde::{Deserialize, Serialize};

/// Classification of a scalar shader result.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FpClass {
    /// Any NaN.
    Nan,
    /// Positive infinity.
    PosInf,
    /// Negative infinity.
    NegInf,
    /// Positive or negative zero.
    Zero,
    /// Exactly one.
    One,
    /// Any other finite value.
    Number,
}

impl FpClass {
    /// Every class, in marker-table order.
    pub const ALL: [FpClass; 6] = [
        Self::PosInf,
        Self::NegInf,
        Self::Nan,
        Self::Number,
        Self::Zero,
        Self::One,
    ];

    /// Classify `v`. NaN is tested first, then the infinities, then the exact values.
    pub fn of(v: f32) -> Self {
        if v.is_nan() {
            Self::Nan
        } else if v == f32::INFINITY {
            Self::PosInf
        } else if v == f32::NEG_INFINITY {
            Self::NegInf
        } else if v == 0.0 {
            Self::Zero
        } else if v == 1.0 {
            Self::One
        } else {
            Self::Number
        }
    }

    /// Marker color written by the shader for this class, as `[r, g, b]`.
    pub const fn marker(self) -> [f32; 3] {
        match self {
            Self::PosInf => [1.0, 0.0, 0.0],
            Self::NegInf => [0.0, 1.0, 0.0],
            Self::Nan => [0.0, 0.0, 0.0],
            Self::Number => [1.0, 0.0, 1.0],
            Self::Zero => [1.0, 1.0, 0.0],
            Self::One => [1.0, 1.0, 1.0],
        }
    }

    /// Short label used in diagnostics.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Nan => "NaN",
            Self::PosInf => "+inf",
            Self::NegInf => "-inf",
            Self::Zero => "0",
            Self::One => "1",
            Self::Number => "num",
        }
    }
}

impl std::fmt::Display for FpClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/color/classify.rs"]
mod tests;
