use super::*;

#[test]
fn bgr8_stores_blue_first() {
    let f = PixelFormat::Bgr8;
    assert_eq!(f.bytes_per_pixel(), 3);
    assert_eq!(f.offset_of(Channel::Blue), Some(0));
    assert_eq!(f.offset_of(Channel::Green), Some(1));
    assert_eq!(f.offset_of(Channel::Red), Some(2));
    assert_eq!(f.offset_of(Channel::Alpha), None);
}

#[test]
fn abgr8_stores_alpha_first() {
    let f = PixelFormat::Abgr8;
    assert_eq!(f.bytes_per_pixel(), 4);
    assert_eq!(f.channel_count(), 4);
    assert_eq!(f.offset_of(Channel::Alpha), Some(0));
    assert_eq!(f.offset_of(Channel::Red), Some(3));
}

#[test]
fn top_screen_origin_is_byte_zero() {
    let l = FramebufferLayout::TOP_SCREEN;
    assert_eq!(l.byte_len(), 400 * 240 * 3);
    assert_eq!(l.pixel_offset(PixelCoord::ORIGIN).unwrap(), 0);
    // One pixel up stays in the first column.
    assert_eq!(l.pixel_offset(PixelCoord::new(0, 1)).unwrap(), 3);
    // One pixel right skips a whole 240-pixel column.
    assert_eq!(l.pixel_offset(PixelCoord::new(1, 0)).unwrap(), 240 * 3);
}

#[test]
fn row_major_origin_is_last_row() {
    let l = FramebufferLayout::new(4, 2, PixelFormat::Abgr8, Orientation::RowMajorTopDown).unwrap();
    assert_eq!(l.pixel_offset(PixelCoord::new(0, 1)).unwrap(), 0);
    assert_eq!(l.pixel_offset(PixelCoord::ORIGIN).unwrap(), 4 * 4);
    assert_eq!(l.pixel_offset(PixelCoord::new(3, 0)).unwrap(), (4 + 3) * 4);
}

#[test]
fn out_of_bounds_is_readback_error() {
    let l = FramebufferLayout::TOP_SCREEN;
    let err = l.pixel_offset(PixelCoord::new(400, 0)).unwrap_err();
    assert!(matches!(err, ConformError::Readback(_)));
    assert!(l.pixel_offset(PixelCoord::new(0, 240)).is_err());
}

#[test]
fn zero_sized_layout_is_rejected() {
    assert!(FramebufferLayout::new(0, 1, PixelFormat::Bgr8, Orientation::RowMajorTopDown).is_err());
}
