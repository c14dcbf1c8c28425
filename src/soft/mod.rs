//! Software reference platform.
//!
//! Models the parts of the console the harness depends on:
//!
//! - Pipeline state calls made inside a frame are recorded, not applied. `end_frame` queues
//!   the list and `wait_vblank` retires every queued list, then copies the render target into
//!   the back framebuffer in the readback layout.
//! - The CPU sees framebuffer memory through a cached copy that only `invalidate_cache`
//!   refreshes. Reading without invalidating returns stale bytes.
//! - `clear` fills the render target immediately.
//! - Uniform registers are global and persist across frames; binding a program reloads its
//!   constants.
//! - Keys come from a script, then `idle_keys` forever.

pub mod alu;
pub mod programs;
pub mod raster;
pub mod shader;

use std::collections::{BTreeMap, VecDeque};

use crate::foundation::core::{PixelCoord, Rgba8, Vec4};
use crate::foundation::error::{ConformError, ConformResult};
use crate::framebuffer::layout::FramebufferLayout;
use crate::platform::{
    BufferHandle, DeviceMemory, Display, FramebufferAccess, InputSource, Keys, Lifecycle,
    Pipeline, PlatformSettings, Primitive, ProgramHandle, ShaderModule, UniformLocation,
    VertexLayout,
};
use crate::soft::raster::{RenderTarget, ShadedVertex};
use crate::soft::shader::{FLOAT_UNIFORMS, INPUT_REGISTERS, OUT_COLOR, OUT_POSITION, Program};

/// Default size of the device-visible heap.
pub const DEFAULT_DEVICE_HEAP: usize = 32 << 20;

/// A release performed on the platform, in call order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Release {
    /// `free_buffer`.
    Buffer(BufferHandle),
    /// `free_program`.
    Program(ProgramHandle),
    /// `shutdown_graphics`.
    Graphics,
}

#[derive(Clone, Debug, PartialEq)]
enum Command {
    Bind(ProgramHandle),
    Uniform(UniformLocation, Vec4),
    Attributes(BufferHandle, VertexLayout),
    Draw(Primitive, u32),
}

#[derive(Debug, Default)]
struct GpuState {
    program: Option<ProgramHandle>,
    uniforms: Vec<Vec4>,
    attributes: Option<(BufferHandle, VertexLayout)>,
}

/// In-process implementation of every platform trait.
#[derive(Debug)]
pub struct SoftPlatform {
    settings: PlatformSettings,
    initialized: bool,
    heap_limit: usize,
    heap_used: usize,
    programs: BTreeMap<ProgramHandle, Program>,
    next_program: u32,
    buffers: BTreeMap<BufferHandle, Vec<u8>>,
    next_buffer: u32,
    gpu: GpuState,
    recording: Option<Vec<Command>>,
    queue: VecDeque<Vec<Command>>,
    target: RenderTarget,
    framebuffers: [Vec<u8>; 2],
    back: usize,
    cpu_view: Vec<u8>,
    keys: VecDeque<Keys>,
    vblanks: u64,
    draws: u64,
    releases: Vec<Release>,
}

impl SoftPlatform {
    /// Build a platform with `settings`. Graphics still need [`Lifecycle::init_graphics`].
    pub fn new(settings: PlatformSettings) -> ConformResult<Self> {
        let layout = settings.layout;
        FramebufferLayout::new(layout.width, layout.height, layout.format, layout.orientation)?;
        let len = layout.byte_len();
        Ok(Self {
            keys: settings.key_script.iter().copied().collect(),
            settings,
            initialized: false,
            heap_limit: DEFAULT_DEVICE_HEAP,
            heap_used: 0,
            programs: BTreeMap::new(),
            next_program: 1,
            buffers: BTreeMap::new(),
            next_buffer: 1,
            gpu: GpuState {
                uniforms: vec![Vec4::ZERO; FLOAT_UNIFORMS],
                ..GpuState::default()
            },
            recording: None,
            queue: VecDeque::new(),
            target: RenderTarget::new(layout.width, layout.height),
            framebuffers: [vec![0; len], vec![0; len]],
            back: 0,
            cpu_view: vec![0; len],
            vblanks: 0,
            draws: 0,
            releases: Vec::new(),
        })
    }

    /// Cap the device heap at `bytes`.
    pub fn with_device_heap(mut self, bytes: usize) -> Self {
        self.heap_limit = bytes;
        self
    }

    /// Vertical blanks waited so far.
    pub fn vblanks(&self) -> u64 {
        self.vblanks
    }

    /// Draw calls retired so far.
    pub fn draws_retired(&self) -> u64 {
        self.draws
    }

    /// Releases in call order.
    pub fn releases(&self) -> &[Release] {
        &self.releases
    }

    /// Number of programs and buffers still held.
    pub fn live_resources(&self) -> usize {
        self.programs.len() + self.buffers.len()
    }

    /// Render target contents, bypassing the display transfer.
    pub fn render_target(&self) -> &RenderTarget {
        &self.target
    }

    /// Framebuffer currently scanned out.
    pub fn front_buffer(&self) -> &[u8] {
        &self.framebuffers[1 - self.back]
    }

    fn require_init(&self, op: &str) -> ConformResult<()> {
        if !self.initialized {
            return Err(ConformError::resource(format!(
                "{op} before graphics initialization"
            )));
        }
        Ok(())
    }

    fn program(&self, handle: ProgramHandle) -> ConformResult<&Program> {
        self.programs
            .get(&handle)
            .ok_or_else(|| ConformError::pipeline(format!("unknown program {handle:?}")))
    }

    fn apply_or_record(&mut self, cmd: Command) -> ConformResult<()> {
        if let Some(list) = &mut self.recording {
            list.push(cmd);
            return Ok(());
        }
        self.execute(cmd)
    }

    fn execute(&mut self, cmd: Command) -> ConformResult<()> {
        match cmd {
            Command::Bind(handle) => {
                let constants = self.program(handle)?.constants.clone();
                for (reg, value) in constants {
                    if let Some(slot) = self.gpu.uniforms.get_mut(usize::from(reg)) {
                        *slot = value;
                    }
                }
                self.gpu.program = Some(handle);
            }
            Command::Uniform(loc, value) => {
                let slot = self.gpu.uniforms.get_mut(usize::from(loc.0)).ok_or_else(|| {
                    ConformError::pipeline(format!("uniform register {} out of range", loc.0))
                })?;
                *slot = value;
            }
            Command::Attributes(buffer, layout) => {
                self.gpu.attributes = Some((buffer, layout));
            }
            Command::Draw(primitive, count) => self.execute_draw(primitive, count)?,
        }
        Ok(())
    }

    fn execute_draw(&mut self, primitive: Primitive, count: u32) -> ConformResult<()> {
        let handle = self
            .gpu
            .program
            .ok_or_else(|| ConformError::pipeline("draw with no program bound"))?;
        let (buffer, layout) = self
            .gpu
            .attributes
            .clone()
            .ok_or_else(|| ConformError::pipeline("draw with no vertex attributes"))?;
        let program = self.program(handle)?;
        let bytes = self
            .buffers
            .get(&buffer)
            .ok_or_else(|| ConformError::pipeline(format!("unknown buffer {buffer:?}")))?;

        let mut uniforms = [Vec4::ZERO; FLOAT_UNIFORMS];
        for (dst, src) in uniforms.iter_mut().zip(&self.gpu.uniforms) {
            *dst = *src;
        }

        let stride = layout.stride();
        let mut shaded = Vec::with_capacity(count as usize);
        for i in 0..count as usize {
            let inputs = fetch_vertex(bytes, i * stride, &layout)?;
            let out = program.execute(&uniforms, &inputs)?;
            shaded.push(ShadedVertex {
                position: out[usize::from(OUT_POSITION)],
                color: out[usize::from(OUT_COLOR)],
            });
        }

        let rule = self.settings.rounding;
        for tri in raster::assemble(primitive, &shaded)? {
            raster::draw_triangle(&mut self.target, &tri, rule);
        }
        self.draws += 1;
        Ok(())
    }

    /// Copy the render target into the back framebuffer in the readback layout.
    fn display_transfer(&mut self) -> ConformResult<()> {
        let layout = self.settings.layout;
        let order = layout.format.memory_order();
        let fb = &mut self.framebuffers[self.back];
        for y in 0..layout.height {
            for x in 0..layout.width {
                let rgba = self.target.get(x, y).unwrap_or_default();
                let off = layout.pixel_offset(PixelCoord::new(x, y))?;
                for (i, ch) in order.iter().enumerate() {
                    if let Some(b) = fb.get_mut(off + i) {
                        *b = rgba[ch.index()];
                    }
                }
            }
        }
        Ok(())
    }
}

/// Read one vertex starting at byte `base`; missing components default to `(0, 0, 0, 1)`.
fn fetch_vertex(
    bytes: &[u8],
    base: usize,
    layout: &VertexLayout,
) -> ConformResult<[Vec4; INPUT_REGISTERS]> {
    let mut inputs = [Vec4::new(0.0, 0.0, 0.0, 1.0); INPUT_REGISTERS];
    let mut off = base;
    for attr in &layout.attributes {
        let n = usize::from(attr.components);
        if !(1..=4).contains(&n) {
            return Err(ConformError::pipeline(format!(
                "attribute v{} has {n} components",
                attr.register
            )));
        }
        let slot = inputs.get_mut(usize::from(attr.register)).ok_or_else(|| {
            ConformError::pipeline(format!("attribute register v{} out of range", attr.register))
        })?;
        let mut v = [0.0, 0.0, 0.0, 1.0];
        for c in v.iter_mut().take(n) {
            let raw: [u8; 4] = bytes
                .get(off..off + 4)
                .and_then(|s| s.try_into().ok())
                .ok_or_else(|| {
                    ConformError::pipeline(format!("vertex fetch at byte {off} past buffer end"))
                })?;
            *c = f32::from_le_bytes(raw);
            off += 4;
        }
        *slot = Vec4::from_array(v);
    }
    Ok(inputs)
}

impl Lifecycle for SoftPlatform {
    fn init_graphics(&mut self) -> ConformResult<()> {
        if self.initialized {
            return Err(ConformError::resource("graphics already initialized"));
        }
        self.initialized = true;
        tracing::info!(
            width = self.settings.layout.width,
            height = self.settings.layout.height,
            "soft graphics up"
        );
        Ok(())
    }

    fn shutdown_graphics(&mut self) -> ConformResult<()> {
        self.require_init("shutdown_graphics")?;
        if self.live_resources() > 0 {
            return Err(ConformError::resource(format!(
                "shutdown with {} programs and {} buffers still held",
                self.programs.len(),
                self.buffers.len()
            )));
        }
        self.initialized = false;
        self.releases.push(Release::Graphics);
        tracing::info!("soft graphics down");
        Ok(())
    }
}

impl DeviceMemory for SoftPlatform {
    fn alloc_device_buffer(&mut self, size: usize) -> ConformResult<BufferHandle> {
        self.require_init("alloc_device_buffer")?;
        if size == 0 || self.heap_used.saturating_add(size) > self.heap_limit {
            return Err(ConformError::resource(format!(
                "cannot allocate {size} bytes ({} of {} in use)",
                self.heap_used, self.heap_limit
            )));
        }
        let handle = BufferHandle(self.next_buffer);
        self.next_buffer += 1;
        self.heap_used += size;
        self.buffers.insert(handle, vec![0; size]);
        Ok(handle)
    }

    fn free_buffer(&mut self, buffer: BufferHandle) -> ConformResult<()> {
        let bytes = self
            .buffers
            .remove(&buffer)
            .ok_or_else(|| ConformError::pipeline(format!("free of unknown buffer {buffer:?}")))?;
        self.heap_used -= bytes.len();
        self.releases.push(Release::Buffer(buffer));
        Ok(())
    }
}

impl Pipeline for SoftPlatform {
    fn load_program(&mut self, module: &ShaderModule) -> ConformResult<ProgramHandle> {
        self.require_init("load_program")?;
        let program = programs::lookup(module.name).ok_or_else(|| {
            ConformError::resource(format!("no program named '{}'", module.name))
        })?;
        if let Some(missing) = module
            .uniforms
            .iter()
            .find(|u| program.uniform_register(u).is_none())
        {
            return Err(ConformError::resource(format!(
                "program '{}' does not declare uniform '{missing}'",
                module.name
            )));
        }
        let handle = ProgramHandle(self.next_program);
        self.next_program += 1;
        self.programs.insert(handle, program);
        Ok(handle)
    }

    fn uniform_location(
        &self,
        program: ProgramHandle,
        name: &str,
    ) -> ConformResult<UniformLocation> {
        let p = self.program(program)?;
        p.uniform_register(name).map(UniformLocation).ok_or_else(|| {
            ConformError::resource(format!("program '{}' has no uniform '{name}'", p.name))
        })
    }

    fn free_program(&mut self, program: ProgramHandle) -> ConformResult<()> {
        self.programs.remove(&program).ok_or_else(|| {
            ConformError::pipeline(format!("free of unknown program {program:?}"))
        })?;
        if self.gpu.program == Some(program) {
            self.gpu.program = None;
        }
        self.releases.push(Release::Program(program));
        Ok(())
    }

    fn bind_program(&mut self, program: ProgramHandle) -> ConformResult<()> {
        self.program(program)?;
        self.apply_or_record(Command::Bind(program))
    }

    fn set_uniform(&mut self, location: UniformLocation, value: Vec4) -> ConformResult<()> {
        self.apply_or_record(Command::Uniform(location, value))
    }

    fn write_buffer(&mut self, buffer: BufferHandle, bytes: &[u8]) -> ConformResult<()> {
        let dst = self
            .buffers
            .get_mut(&buffer)
            .ok_or_else(|| ConformError::pipeline(format!("write to unknown buffer {buffer:?}")))?;
        if bytes.len() > dst.len() {
            return Err(ConformError::pipeline(format!(
                "write of {} bytes into {}-byte buffer",
                bytes.len(),
                dst.len()
            )));
        }
        dst[..bytes.len()].copy_from_slice(bytes);
        Ok(())
    }

    fn set_vertex_attributes(
        &mut self,
        buffer: BufferHandle,
        layout: &VertexLayout,
    ) -> ConformResult<()> {
        self.apply_or_record(Command::Attributes(buffer, layout.clone()))
    }

    fn draw(&mut self, primitive: Primitive, vertex_count: u32) -> ConformResult<()> {
        let Some(list) = &mut self.recording else {
            return Err(ConformError::pipeline("draw outside begin_frame/end_frame"));
        };
        list.push(Command::Draw(primitive, vertex_count));
        Ok(())
    }
}

impl Display for SoftPlatform {
    fn begin_frame(&mut self) -> ConformResult<()> {
        self.require_init("begin_frame")?;
        if self.recording.is_some() {
            return Err(ConformError::sync("begin_frame while a frame is open"));
        }
        self.recording = Some(Vec::new());
        Ok(())
    }

    fn end_frame(&mut self) -> ConformResult<()> {
        let list = self
            .recording
            .take()
            .ok_or_else(|| ConformError::sync("end_frame without begin_frame"))?;
        self.queue.push_back(list);
        Ok(())
    }

    fn wait_vblank(&mut self) -> ConformResult<()> {
        self.vblanks += 1;
        if self.queue.is_empty() {
            return Ok(());
        }
        while let Some(list) = self.queue.pop_front() {
            for cmd in list {
                self.execute(cmd)?;
            }
        }
        self.display_transfer()
    }

    fn swap_buffers(&mut self) -> ConformResult<()> {
        self.back = 1 - self.back;
        Ok(())
    }

    fn clear(&mut self, color: Rgba8) -> ConformResult<()> {
        self.target.fill(color);
        Ok(())
    }
}

impl FramebufferAccess for SoftPlatform {
    fn framebuffer_layout(&self) -> FramebufferLayout {
        self.settings.layout
    }

    fn invalidate_cache(&mut self) -> ConformResult<()> {
        self.cpu_view.clone_from(&self.framebuffers[self.back]);
        Ok(())
    }

    fn framebuffer_bytes(&self) -> &[u8] {
        &self.cpu_view
    }
}

impl InputSource for SoftPlatform {
    fn scan_keys_down(&mut self) -> Keys {
        self.keys.pop_front().unwrap_or(self.settings.idle_keys)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/soft/mod.rs"]
mod tests;
