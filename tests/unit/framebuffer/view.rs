use super::*;
use crate::framebuffer::layout::{Orientation, PixelFormat};

fn tiny_bgr() -> FramebufferLayout {
    FramebufferLayout::new(2, 2, PixelFormat::Bgr8, Orientation::ColumnMajorBottomUp).unwrap()
}

#[test]
fn short_buffer_is_rejected() {
    let bytes = vec![0u8; 11];
    assert!(matches!(
        PixelView::new(&bytes, tiny_bgr()),
        Err(ConformError::Readback(_))
    ));
}

#[test]
fn pixel_reorders_memory_bgr_into_logical_rgb() {
    // Origin pixel stored as B=0x11, G=0x22, R=0x33.
    let mut bytes = vec![0u8; 12];
    bytes[..3].copy_from_slice(&[0x11, 0x22, 0x33]);
    let v = PixelView::new(&bytes, tiny_bgr()).unwrap();

    assert_eq!(v.raw(PixelCoord::ORIGIN).unwrap(), &[0x11, 0x22, 0x33]);
    assert_eq!(v.pixel(PixelCoord::ORIGIN).unwrap().as_slice(), &[0x33, 0x22, 0x11]);
    assert_eq!(v.channel(PixelCoord::ORIGIN, Channel::Blue).unwrap(), 0x11);
    assert!(v.channel(PixelCoord::ORIGIN, Channel::Alpha).is_err());
}

#[test]
fn abgr_pixel_has_four_channels() {
    let layout =
        FramebufferLayout::new(1, 1, PixelFormat::Abgr8, Orientation::RowMajorTopDown).unwrap();
    let bytes = [0x44, 0x33, 0x22, 0x11];
    let v = PixelView::new(&bytes, layout).unwrap();
    assert_eq!(v.pixel(PixelCoord::ORIGIN).unwrap().as_slice(), &[0x11, 0x22, 0x33, 0x44]);
}

#[test]
fn rgba_export_is_top_down() {
    let mut bytes = vec![0u8; 12];
    // (0,1) is the top-left pixel; stored right after the origin in column 0.
    bytes[3..6].copy_from_slice(&[0x00, 0x00, 0xFF]);
    let v = PixelView::new(&bytes, tiny_bgr()).unwrap();
    let rgba = v.to_rgba8_top_down().unwrap();
    assert_eq!(rgba.len(), 16);
    assert_eq!(&rgba[..4], &[0xFF, 0x00, 0x00, 0xFF]);
    assert_eq!(&rgba[8..12], &[0x00, 0x00, 0x00, 0xFF]);
}
