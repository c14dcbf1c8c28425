use super::*;
use crate::platform::ShaderModule;
use crate::table::{SuiteKind, suite};

#[derive(Debug, Clone, PartialEq)]
enum Call {
    Bind(ProgramHandle),
    Uniform(UniformLocation, Vec4),
    Write(BufferHandle, Vec<u8>),
    Attributes(BufferHandle, usize),
    Draw(Primitive, u32),
}

#[derive(Default)]
struct MockPipeline {
    calls: Vec<Call>,
}

impl Pipeline for MockPipeline {
    fn load_program(&mut self, _module: &ShaderModule) -> ConformResult<ProgramHandle> {
        Ok(ProgramHandle(0))
    }

    fn uniform_location(
        &self,
        _program: ProgramHandle,
        _name: &str,
    ) -> ConformResult<UniformLocation> {
        Ok(UniformLocation(0))
    }

    fn free_program(&mut self, _program: ProgramHandle) -> ConformResult<()> {
        Ok(())
    }

    fn bind_program(&mut self, program: ProgramHandle) -> ConformResult<()> {
        self.calls.push(Call::Bind(program));
        Ok(())
    }

    fn set_uniform(&mut self, location: UniformLocation, value: Vec4) -> ConformResult<()> {
        self.calls.push(Call::Uniform(location, value));
        Ok(())
    }

    fn write_buffer(&mut self, buffer: BufferHandle, bytes: &[u8]) -> ConformResult<()> {
        self.calls.push(Call::Write(buffer, bytes.to_vec()));
        Ok(())
    }

    fn set_vertex_attributes(
        &mut self,
        buffer: BufferHandle,
        layout: &VertexLayout,
    ) -> ConformResult<()> {
        self.calls.push(Call::Attributes(buffer, layout.stride()));
        Ok(())
    }

    fn draw(&mut self, primitive: Primitive, vertex_count: u32) -> ConformResult<()> {
        self.calls.push(Call::Draw(primitive, vertex_count));
        Ok(())
    }
}

fn resources() -> SuiteResources {
    SuiteResources {
        program: ProgramHandle(7),
        uniform: UniformLocation(3),
        vertex_buffer: BufferHandle(9),
    }
}

fn f32_at(bytes: &[u8], idx: usize) -> f32 {
    let b: [u8; 4] = bytes[idx * 4..idx * 4 + 4].try_into().unwrap();
    f32::from_le_bytes(b)
}

#[test]
fn color_suite_rewrites_whole_buffer_then_draws_once() {
    let s = suite(SuiteKind::Dph);
    let d = RenderDriver::new(&s, resources(), FramebufferLayout::TOP_SCREEN);
    let mut p = MockPipeline::default();
    d.configure(&mut p, &s.tests()[7]).unwrap();

    assert_eq!(p.calls.len(), 5);
    assert_eq!(p.calls[0], Call::Bind(ProgramHandle(7)));
    assert_eq!(
        p.calls[1],
        Call::Uniform(UniformLocation(3), Vec4::new(0.5, 0.0, 0.5, 0.0))
    );
    let Call::Write(buf, bytes) = &p.calls[2] else {
        panic!("expected buffer write, got {:?}", p.calls[2]);
    };
    assert_eq!(*buf, BufferHandle(9));
    assert_eq!(bytes.len(), RenderDriver::vertex_buffer_size(&s));
    assert_eq!(p.calls[3], Call::Attributes(BufferHandle(9), 28));
    assert_eq!(p.calls[4], Call::Draw(Primitive::TriangleStrip, 4));

    // Every vertex carries the full 4-component color after its position.
    for v in 0..4 {
        let base = v * 7;
        assert_eq!(f32_at(bytes, base + 3), 0.5);
        assert_eq!(f32_at(bytes, base + 5), 0.5);
        assert_eq!(f32_at(bytes, base + 6), 0.5);
    }
}

#[test]
fn uniform_suite_uploads_positions_once_in_prepare() {
    let s = suite(SuiteKind::Fp);
    let d = RenderDriver::new(&s, resources(), FramebufferLayout::TOP_SCREEN);
    let mut p = MockPipeline::default();

    d.prepare(&mut p).unwrap();
    assert!(matches!(&p.calls[..], [Call::Write(_, b)] if b.len() == 4 * 12));

    p.calls.clear();
    d.configure(&mut p, &s.tests()[3]).unwrap();
    assert!(!p.calls.iter().any(|c| matches!(c, Call::Write(..))));
    assert_eq!(
        p.calls[1],
        Call::Uniform(UniformLocation(3), Vec4::new(3.0, 0.0, 0.0, 0.0))
    );
}

#[test]
fn single_pixel_quad_spans_exactly_one_pixel_in_ndc() {
    let s = suite(SuiteKind::Sge);
    let d = RenderDriver::new(&s, resources(), FramebufferLayout::TOP_SCREEN);
    let bytes = d.vertex_bytes(Some(Vec4::ZERO)).unwrap();
    // Stride is 6 floats: xyz + rgb. Vertex 3 is the top-right corner.
    let x = f32_at(&bytes, 3 * 6);
    let y = f32_at(&bytes, 3 * 6 + 1);
    assert!((x - (-1.0 + 2.0 / 400.0)).abs() < 1e-6);
    assert!((y - (-1.0 + 2.0 / 240.0)).abs() < 1e-6);
}

#[test]
fn missing_color_is_a_validation_error() {
    let s = suite(SuiteKind::Sge);
    let d = RenderDriver::new(&s, resources(), FramebufferLayout::TOP_SCREEN);
    let mut case = s.tests()[0].clone();
    case.inputs.vertex_color = None;
    let mut p = MockPipeline::default();
    assert!(matches!(
        d.configure(&mut p, &case),
        Err(ConformError::Validation(_))
    ));
    assert!(!p.calls.iter().any(|c| matches!(c, Call::Draw(..))));
}
