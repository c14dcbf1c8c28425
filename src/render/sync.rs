use crate::foundation::error::{ConformError, ConformResult};
use crate::framebuffer::view::PixelView;
use crate::platform::{Display, FramebufferAccess};

/// Where the current frame is in its issue → readback → present cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameState {
    /// No frame in flight.
    Idle,
    /// Commands are being recorded.
    Issue,
    /// Commands submitted; framebuffer contents not yet final.
    Pending,
    /// Framebuffer contents final and visible to the CPU.
    Ready,
}

/// Serializes one case per display frame.
///
/// The only way to read the framebuffer is through the [`ReadyFrame`] returned by
/// [`FrameSync::wait_ready`], which holds the platform borrowed until it is dropped, so the next
/// frame cannot be issued while a readback is alive.
#[derive(Debug)]
pub struct FrameSync {
    state: FrameState,
    frame: u64,
}

impl Default for FrameSync {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameSync {
    /// Start idle at frame 0.
    pub fn new() -> Self {
        Self {
            state: FrameState::Idle,
            frame: 0,
        }
    }

    /// Current state.
    pub fn state(&self) -> FrameState {
        self.state
    }

    /// Frames presented so far.
    pub fn frames_presented(&self) -> u64 {
        self.frame
    }

    fn expect(&self, want: FrameState, op: &str) -> ConformResult<()> {
        if self.state != want {
            return Err(ConformError::sync(format!(
                "{op} requires {want:?}, frame {} is {:?}",
                self.frame, self.state
            )));
        }
        Ok(())
    }

    /// Idle → Issue: open the frame's command list.
    pub fn begin<D: Display + ?Sized>(&mut self, display: &mut D) -> ConformResult<()> {
        self.expect(FrameState::Idle, "begin")?;
        display.begin_frame()?;
        self.state = FrameState::Issue;
        Ok(())
    }

    /// Issue → Pending: hand the command list to the GPU.
    pub fn submit<D: Display + ?Sized>(&mut self, display: &mut D) -> ConformResult<()> {
        self.expect(FrameState::Issue, "submit")?;
        display.end_frame()?;
        self.state = FrameState::Pending;
        Ok(())
    }

    /// Pending → Ready: block on vblank, invalidate the CPU cache, expose the framebuffer.
    ///
    /// Blocks for as long as the platform's vblank wait does; there is no timeout.
    pub fn wait_ready<'p, P>(&mut self, platform: &'p mut P) -> ConformResult<ReadyFrame<'p>>
    where
        P: Display + FramebufferAccess + ?Sized,
    {
        self.expect(FrameState::Pending, "wait_ready")?;
        platform.wait_vblank()?;
        platform.invalidate_cache()?;
        self.state = FrameState::Ready;

        let platform: &'p P = platform;
        let view = PixelView::new(platform.framebuffer_bytes(), platform.framebuffer_layout())?;
        Ok(ReadyFrame {
            view,
            frame: self.frame,
        })
    }

    /// Ready → Idle: present the frame and prepare the next one.
    pub fn present<D: Display + ?Sized>(&mut self, display: &mut D) -> ConformResult<()> {
        self.expect(FrameState::Ready, "present")?;
        display.swap_buffers()?;
        self.frame += 1;
        self.state = FrameState::Idle;
        Ok(())
    }
}

/// Proof that the framebuffer holds final contents for the current frame.
#[derive(Debug)]
pub struct ReadyFrame<'a> {
    view: PixelView<'a>,
    frame: u64,
}

impl<'a> ReadyFrame<'a> {
    /// Bounds-checked pixel access.
    pub fn view(&self) -> &PixelView<'a> {
        &self.view
    }

    /// Index of the frame this readback belongs to.
    pub fn frame(&self) -> u64 {
        self.frame
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/sync.rs"]
mod tests;
