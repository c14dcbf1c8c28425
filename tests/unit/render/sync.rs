use super::*;
use crate::foundation::core::{PixelCoord, Rgba8};
use crate::framebuffer::layout::{FramebufferLayout, Orientation, PixelFormat};

struct MockDisplay {
    calls: Vec<&'static str>,
    bytes: Vec<u8>,
}

impl MockDisplay {
    fn new() -> Self {
        Self {
            calls: Vec::new(),
            bytes: vec![0xAB; 3],
        }
    }
}

impl Display for MockDisplay {
    fn begin_frame(&mut self) -> ConformResult<()> {
        self.calls.push("begin_frame");
        Ok(())
    }

    fn end_frame(&mut self) -> ConformResult<()> {
        self.calls.push("end_frame");
        Ok(())
    }

    fn wait_vblank(&mut self) -> ConformResult<()> {
        self.calls.push("wait_vblank");
        Ok(())
    }

    fn swap_buffers(&mut self) -> ConformResult<()> {
        self.calls.push("swap_buffers");
        Ok(())
    }

    fn clear(&mut self, _color: Rgba8) -> ConformResult<()> {
        self.calls.push("clear");
        Ok(())
    }
}

impl FramebufferAccess for MockDisplay {
    fn framebuffer_layout(&self) -> FramebufferLayout {
        FramebufferLayout::new(1, 1, PixelFormat::Bgr8, Orientation::RowMajorTopDown).unwrap()
    }

    fn invalidate_cache(&mut self) -> ConformResult<()> {
        self.calls.push("invalidate_cache");
        Ok(())
    }

    fn framebuffer_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

#[test]
fn full_cycle_calls_platform_in_order() {
    let mut d = MockDisplay::new();
    let mut s = FrameSync::new();

    s.begin(&mut d).unwrap();
    assert_eq!(s.state(), FrameState::Issue);
    s.submit(&mut d).unwrap();
    assert_eq!(s.state(), FrameState::Pending);
    {
        let ready = s.wait_ready(&mut d).unwrap();
        assert_eq!(ready.frame(), 0);
        assert_eq!(ready.view().raw(PixelCoord::ORIGIN).unwrap(), &[0xAB; 3]);
    }
    assert_eq!(s.state(), FrameState::Ready);
    s.present(&mut d).unwrap();
    assert_eq!(s.state(), FrameState::Idle);
    assert_eq!(s.frames_presented(), 1);

    assert_eq!(
        d.calls,
        vec![
            "begin_frame",
            "end_frame",
            "wait_vblank",
            "invalidate_cache",
            "swap_buffers"
        ]
    );
}

#[test]
fn readback_before_submit_is_rejected() {
    let mut d = MockDisplay::new();
    let mut s = FrameSync::new();
    s.begin(&mut d).unwrap();
    let err = s.wait_ready(&mut d).unwrap_err();
    assert!(matches!(err, ConformError::Sync(_)));
    assert!(!d.calls.contains(&"wait_vblank"));
}

#[test]
fn out_of_order_transitions_are_rejected() {
    let mut d = MockDisplay::new();
    let mut s = FrameSync::new();
    assert!(s.submit(&mut d).is_err());
    assert!(s.present(&mut d).is_err());
    s.begin(&mut d).unwrap();
    assert!(s.begin(&mut d).is_err());
    assert_eq!(d.calls, vec!["begin_frame"]);
}
