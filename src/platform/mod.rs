//! Collaborator interface between the harness and the graphics platform.
//!
//! The harness only talks to the GPU, display, input and device memory through these traits.
//! A hardware port implements them over the console's system libraries; [`crate::soft`]
//! implements them in software.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::color::quantize::RoundingRule;
use crate::foundation::core::{Rgba8, Vec4};
use crate::foundation::error::ConformResult;
use crate::framebuffer::layout::FramebufferLayout;

/// A compiled-in shader program, identified by name, and the uniforms it declares.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ShaderModule {
    /// Program name, resolved by the platform to its binary.
    pub name: &'static str,
    /// Uniform names the program exposes.
    pub uniforms: &'static [&'static str],
}

/// Loaded program.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProgramHandle(pub u32);

/// Uniform register index inside a program.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct UniformLocation(pub u8);

/// Device-visible (linear) memory allocation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BufferHandle(pub u32);

/// Primitive assembly mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Primitive {
    /// Each vertex after the second forms a triangle with the two before it.
    TriangleStrip,
    /// Independent triangles.
    Triangles,
}

/// One float vertex attribute.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AttributeDesc {
    /// Shader input register receiving the attribute.
    pub register: u8,
    /// Number of `f32` components (1..=4); missing components read as `(0, 0, 0, 1)`.
    pub components: u8,
}

/// Interleaved vertex layout, attributes packed in declaration order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VertexLayout {
    /// Attributes in buffer order.
    pub attributes: SmallVec<[AttributeDesc; 4]>,
}

impl VertexLayout {
    /// Bytes per vertex.
    pub fn stride(&self) -> usize {
        self.attributes
            .iter()
            .map(|a| usize::from(a.components) * std::mem::size_of::<f32>())
            .sum()
    }
}

/// Bitset of buttons pressed since the previous scan.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Keys(pub u32);

impl Keys {
    /// No buttons.
    pub const NONE: Self = Self(0);
    /// The A button.
    pub const A: Self = Self(1 << 0);
    /// The Start button.
    pub const START: Self = Self(1 << 3);
    /// Every button.
    pub const ALL: Self = Self(u32::MAX);

    /// Return `true` when every key in `other` is set.
    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl std::ops::BitOr for Keys {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// Graphics subsystem bring-up and teardown.
pub trait Lifecycle {
    /// Initialize the GPU, displays and console.
    fn init_graphics(&mut self) -> ConformResult<()>;
    /// Tear down everything `init_graphics` brought up.
    fn shutdown_graphics(&mut self) -> ConformResult<()>;
}

/// Device-visible buffer allocation.
pub trait DeviceMemory {
    /// Allocate `size` bytes the GPU can read.
    fn alloc_device_buffer(&mut self, size: usize) -> ConformResult<BufferHandle>;
    /// Release a buffer from [`DeviceMemory::alloc_device_buffer`].
    fn free_buffer(&mut self, buffer: BufferHandle) -> ConformResult<()>;
}

/// Shader and vertex pipeline control.
///
/// State-setting calls made between [`Display::begin_frame`] and [`Display::end_frame`] are
/// recorded into the frame's command list.
pub trait Pipeline {
    /// Load and link a compiled-in program.
    fn load_program(&mut self, module: &ShaderModule) -> ConformResult<ProgramHandle>;
    /// Resolve a uniform name in a loaded program.
    fn uniform_location(
        &self,
        program: ProgramHandle,
        name: &str,
    ) -> ConformResult<UniformLocation>;
    /// Release a loaded program.
    fn free_program(&mut self, program: ProgramHandle) -> ConformResult<()>;
    /// Make `program` current.
    fn bind_program(&mut self, program: ProgramHandle) -> ConformResult<()>;
    /// Set one float uniform register.
    fn set_uniform(&mut self, location: UniformLocation, value: Vec4) -> ConformResult<()>;
    /// Copy `bytes` to the start of `buffer` and flush them out of the CPU cache.
    fn write_buffer(&mut self, buffer: BufferHandle, bytes: &[u8]) -> ConformResult<()>;
    /// Point vertex fetch at `buffer` with `layout`.
    fn set_vertex_attributes(
        &mut self,
        buffer: BufferHandle,
        layout: &VertexLayout,
    ) -> ConformResult<()>;
    /// Draw `vertex_count` vertices.
    fn draw(&mut self, primitive: Primitive, vertex_count: u32) -> ConformResult<()>;
}

/// Frame and presentation control.
pub trait Display {
    /// Start recording a frame's command list.
    fn begin_frame(&mut self) -> ConformResult<()>;
    /// Finish the command list and hand it to the GPU.
    fn end_frame(&mut self) -> ConformResult<()>;
    /// Block until the next vertical blank. Work submitted before the call has retired and
    /// been transferred to the framebuffer when it returns.
    fn wait_vblank(&mut self) -> ConformResult<()>;
    /// Make the rendered framebuffer visible.
    fn swap_buffers(&mut self) -> ConformResult<()>;
    /// Fill the render target with `color`.
    fn clear(&mut self, color: Rgba8) -> ConformResult<()>;
}

/// CPU-side access to the framebuffer the GPU renders into.
pub trait FramebufferAccess {
    /// Byte layout of [`FramebufferAccess::framebuffer_bytes`].
    fn framebuffer_layout(&self) -> FramebufferLayout;
    /// Drop CPU-cached copies of framebuffer memory so later reads see GPU writes.
    fn invalidate_cache(&mut self) -> ConformResult<()>;
    /// CPU view of the framebuffer memory.
    fn framebuffer_bytes(&self) -> &[u8];
}

/// Button input.
pub trait InputSource {
    /// Scan the buttons and return those newly pressed.
    fn scan_keys_down(&mut self) -> Keys;
}

/// Everything the harness needs from a platform.
pub trait Platform:
    Lifecycle + DeviceMemory + Pipeline + Display + FramebufferAccess + InputSource
{
}

impl<T> Platform for T where
    T: Lifecycle + DeviceMemory + Pipeline + Display + FramebufferAccess + InputSource + ?Sized
{
}

/// Available platform implementations.
///
/// - `Soft` is always available.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlatformKind {
    /// Software reference model.
    Soft,
}

/// Platform-agnostic settings.
#[derive(Clone, Debug)]
pub struct PlatformSettings {
    /// Fixed-point color rounding performed by the rasterizer.
    pub rounding: RoundingRule,
    /// Readback layout of the render target.
    pub layout: FramebufferLayout,
    /// Keys reported once per scan, in order; after the script runs out every scan reports
    /// `idle_keys`.
    pub key_script: Vec<Keys>,
    /// Keys reported once the script is exhausted.
    pub idle_keys: Keys,
}

impl Default for PlatformSettings {
    fn default() -> Self {
        Self {
            rounding: RoundingRule::default(),
            layout: FramebufferLayout::TOP_SCREEN,
            key_script: Vec::new(),
            idle_keys: Keys::ALL,
        }
    }
}

/// Create a platform implementation.
pub fn create_platform(
    kind: PlatformKind,
    settings: &PlatformSettings,
) -> ConformResult<Box<dyn Platform>> {
    match kind {
        PlatformKind::Soft => Ok(Box::new(crate::soft::SoftPlatform::new(settings.clone())?)),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/platform/mod.rs"]
mod tests;
