//! pica-conform is a render-and-readback conformance harness for the PICA200 vertex shader.
//!
//! Each test case programs one draw whose color output encodes the result of a single shader
//! instruction, waits for the frame to retire, reads the bottom-left framebuffer pixel back
//! and compares it byte for byte against an expected color quantized the way the rasterizer
//! quantizes.
//!
//! # Loop overview
//!
//! 1. **Table**: built-in suites of [`TestCase`]s (`dph`, `sge`, `fp`), validated up front.
//! 2. **Drive**: [`RenderDriver`] overwrites the uniform and vertex data, then issues one draw.
//! 3. **Sync**: [`FrameSync`] walks Idle → Issue → Pending → Ready; readback is only possible
//!    through the [`ReadyFrame`] it hands out.
//! 4. **Verify**: [`Verifier`] quantizes the expectation and compares channels in framebuffer
//!    byte order, producing an [`Outcome`].
//! 5. **Report**: a [`ReportSink`] receives every [`CaseRecord`].
//!
//! The GPU, display, input and memory sit behind the traits in [`Platform`]. The [`soft`]
//! module implements them in software so the whole loop runs off hardware.
//!
//! Design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Mismatches are data**: a failing case is an [`Outcome::Mismatch`], never an error.
//! - **No state across cases**: every case rewrites everything its draw reads.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod color;
mod config;
mod foundation;
mod framebuffer;
mod platform;
mod render;
mod report;
mod runner;
mod table;
mod verify;

pub mod soft;

pub use color::Channel;
pub use color::classify::FpClass;
pub use color::quantize::{CHANNEL_MAX, QuantizedColor, RoundingRule, dequantize, quantize};
pub use config::HarnessConfig;
pub use foundation::core::{PixelCoord, Rgba8, Vec4};
pub use foundation::error::{ConformError, ConformResult};
pub use framebuffer::layout::{FramebufferLayout, Orientation, PixelFormat};
pub use framebuffer::view::PixelView;
pub use platform::{
    AttributeDesc, BufferHandle, DeviceMemory, Display, FramebufferAccess, InputSource, Keys,
    Lifecycle, Pipeline, Platform, PlatformKind, PlatformSettings, Primitive, ProgramHandle,
    ShaderModule, UniformLocation, VertexLayout, create_platform,
};
pub use render::driver::{
    COLOR_REGISTER, POSITION_REGISTER, QUAD_VERTICES, RenderDriver, SuiteResources,
};
pub use render::sync::{FrameState, FrameSync, ReadyFrame};
pub use report::snapshot::{snapshot_name, write_png};
pub use report::{CaseRecord, InMemoryReport, ReportSink, RunReport, RunSummary, Tee, TextReporter};
pub use runner::{Acquired, ResourceStack, Runner, block_until_key, platform_settings};
pub use soft::{Release, SoftPlatform};
pub use table::fp::SELECTOR_COUNT;
pub use table::{
    CaseInputs, Delivery, DrawRegion, ExpectedColor, Suite, SuiteKind, TestCase, all_suites, suite,
};
pub use verify::{ChannelMismatch, MismatchPolicy, Outcome, Verifier};
