use serde::{Deserialize, Serialize};

use crate::color::Channel;
use crate::foundation::core::PixelCoord;
use crate::foundation::error::{ConformError, ConformResult};

/// Byte layout of one framebuffer pixel, in memory order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PixelFormat {
    /// Three bytes: blue, green, red.
    Bgr8,
    /// Four bytes: alpha, blue, green, red.
    Abgr8,
}

impl PixelFormat {
    /// Bytes occupied by one pixel.
    pub const fn bytes_per_pixel(self) -> usize {
        match self {
            Self::Bgr8 => 3,
            Self::Abgr8 => 4,
        }
    }

    /// Channels stored, in memory order.
    pub const fn memory_order(self) -> &'static [Channel] {
        match self {
            Self::Bgr8 => &[Channel::Blue, Channel::Green, Channel::Red],
            Self::Abgr8 => &[Channel::Alpha, Channel::Blue, Channel::Green, Channel::Red],
        }
    }

    /// Number of logical channels carried (3 or 4).
    pub const fn channel_count(self) -> usize {
        self.memory_order().len()
    }

    /// Byte offset of `channel` inside one pixel, if the format stores it.
    pub fn offset_of(self, channel: Channel) -> Option<usize> {
        self.memory_order().iter().position(|&c| c == channel)
    }
}

/// How pixels are laid out across memory.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    /// Columns stored one after another, each from the bottom pixel upwards.
    ///
    /// This is the rotated layout of a landscape screen scanned out in portrait; byte 0 is
    /// the bottom-left pixel.
    ColumnMajorBottomUp,
    /// Rows stored top to bottom, each left to right.
    RowMajorTopDown,
}

/// Explicit readback contract: dimensions, channel order and orientation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FramebufferLayout {
    /// Screen width in pixels (landscape).
    pub width: u32,
    /// Screen height in pixels.
    pub height: u32,
    /// Per-pixel byte layout.
    pub format: PixelFormat,
    /// Pixel ordering across memory.
    pub orientation: Orientation,
}

impl FramebufferLayout {
    /// Top screen, left eye: 400x240 BGR8, rotated column-major.
    pub const TOP_SCREEN: Self = Self {
        width: 400,
        height: 240,
        format: PixelFormat::Bgr8,
        orientation: Orientation::ColumnMajorBottomUp,
    };

    /// Build a validated layout.
    pub fn new(
        width: u32,
        height: u32,
        format: PixelFormat,
        orientation: Orientation,
    ) -> ConformResult<Self> {
        if width == 0 || height == 0 {
            return Err(ConformError::validation(
                "framebuffer dimensions must be non-zero",
            ));
        }
        Ok(Self {
            width,
            height,
            format,
            orientation,
        })
    }

    /// Total bytes covered by the layout.
    pub fn byte_len(&self) -> usize {
        (self.width as usize)
            .saturating_mul(self.height as usize)
            .saturating_mul(self.format.bytes_per_pixel())
    }

    /// Return `true` when `at` lies on screen.
    pub fn contains(&self, at: PixelCoord) -> bool {
        at.x < self.width && at.y < self.height
    }

    /// Byte offset of the first byte of the pixel at `at`.
    pub fn pixel_offset(&self, at: PixelCoord) -> ConformResult<usize> {
        if !self.contains(at) {
            return Err(ConformError::readback(format!(
                "pixel ({}, {}) outside {}x{} framebuffer",
                at.x, at.y, self.width, self.height
            )));
        }
        let (x, y) = (at.x as usize, at.y as usize);
        let (w, h) = (self.width as usize, self.height as usize);
        let index = match self.orientation {
            Orientation::ColumnMajorBottomUp => x * h + y,
            Orientation::RowMajorTopDown => (h - 1 - y) * w + x,
        };
        Ok(index * self.format.bytes_per_pixel())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/framebuffer/layout.rs"]
mod tests;
