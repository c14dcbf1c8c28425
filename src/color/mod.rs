pub(crate) mod classify;
pub(crate) mod quantize;

use serde::{Deserialize, Serialize};

/// Logical color channel of a pixel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    /// Red, fed by the shader output `x` component.
    Red,
    /// Green, fed by `y`.
    Green,
    /// Blue, fed by `z`.
    Blue,
    /// Alpha, fed by `w`.
    Alpha,
}

impl Channel {
    /// Channels in logical order.
    pub const RGBA: [Channel; 4] = [Self::Red, Self::Green, Self::Blue, Self::Alpha];

    /// Position in logical `r, g, b, a` order.
    pub const fn index(self) -> usize {
        match self {
            Self::Red => 0,
            Self::Green => 1,
            Self::Blue => 2,
            Self::Alpha => 3,
        }
    }

    /// Shader output component feeding this channel.
    pub const fn component(self) -> char {
        match self {
            Self::Red => 'x',
            Self::Green => 'y',
            Self::Blue => 'z',
            Self::Alpha => 'w',
        }
    }
}

impl std::fmt::Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Red => "r",
            Self::Green => "g",
            Self::Blue => "b",
            Self::Alpha => "a",
        };
        write!(f, "{s}({})", self.component())
    }
}
