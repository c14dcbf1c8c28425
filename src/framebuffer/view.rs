use crate::color::Channel;
use crate::color::quantize::QuantizedColor;
use crate::foundation::core::PixelCoord;
use crate::foundation::error::{ConformError, ConformResult};
use crate::framebuffer::layout::FramebufferLayout;

/// Bounds-checked read access to CPU-visible framebuffer memory.
///
/// All offsets come from the [`FramebufferLayout`]; no caller does pointer arithmetic.
#[derive(Clone, Copy, Debug)]
pub struct PixelView<'a> {
    bytes: &'a [u8],
    layout: FramebufferLayout,
}

impl<'a> PixelView<'a> {
    /// Wrap `bytes`, which must cover the whole layout.
    pub fn new(bytes: &'a [u8], layout: FramebufferLayout) -> ConformResult<Self> {
        if bytes.len() < layout.byte_len() {
            return Err(ConformError::readback(format!(
                "framebuffer holds {} bytes, layout needs {}",
                bytes.len(),
                layout.byte_len()
            )));
        }
        Ok(Self { bytes, layout })
    }

    /// Layout this view reads through.
    pub fn layout(&self) -> FramebufferLayout {
        self.layout
    }

    /// Raw bytes of one pixel, in memory order.
    pub fn raw(&self, at: PixelCoord) -> ConformResult<&'a [u8]> {
        let off = self.layout.pixel_offset(at)?;
        let len = self.layout.format.bytes_per_pixel();
        self.bytes
            .get(off..off + len)
            .ok_or_else(|| ConformError::readback(format!("pixel offset {off} out of range")))
    }

    /// Byte of `channel` at `at`.
    pub fn channel(&self, at: PixelCoord, channel: Channel) -> ConformResult<u8> {
        let off = self.layout.format.offset_of(channel).ok_or_else(|| {
            ConformError::readback(format!(
                "channel {channel} not stored in {:?} framebuffer",
                self.layout.format
            ))
        })?;
        Ok(self.raw(at)?[off])
    }

    /// Snapshot one pixel in logical `r, g, b[, a]` order.
    pub fn pixel(&self, at: PixelCoord) -> ConformResult<QuantizedColor> {
        let n = self.layout.format.channel_count();
        let mut bytes = [0u8; 4];
        for (slot, &ch) in bytes.iter_mut().zip(Channel::RGBA[..n].iter()) {
            *slot = self.channel(at, ch)?;
        }
        QuantizedColor::from_bytes(&bytes[..n])
            .ok_or_else(|| ConformError::readback("unsupported channel count"))
    }

    /// Whole screen as tightly packed RGBA8, top row first (alpha 255 for 3-channel formats).
    pub fn to_rgba8_top_down(&self) -> ConformResult<Vec<u8>> {
        let (w, h) = (self.layout.width, self.layout.height);
        let mut out = Vec::with_capacity(w as usize * h as usize * 4);
        for y in (0..h).rev() {
            for x in 0..w {
                let px = self.pixel(PixelCoord::new(x, y))?;
                let s = px.as_slice();
                out.extend_from_slice(&[s[0], s[1], s[2], s.get(3).copied().unwrap_or(0xFF)]);
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/framebuffer/view.rs"]
mod tests;
