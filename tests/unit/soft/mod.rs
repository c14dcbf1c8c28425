use smallvec::smallvec;

use super::*;
use crate::framebuffer::layout::{Orientation, PixelFormat};
use crate::framebuffer::view::PixelView;
use crate::platform::AttributeDesc;
use crate::table::{SuiteKind, suite};

fn small_settings() -> PlatformSettings {
    PlatformSettings {
        layout: FramebufferLayout::new(8, 4, PixelFormat::Bgr8, Orientation::ColumnMajorBottomUp)
            .unwrap(),
        ..PlatformSettings::default()
    }
}

fn up(settings: PlatformSettings) -> SoftPlatform {
    let mut p = SoftPlatform::new(settings).unwrap();
    p.init_graphics().unwrap();
    p
}

fn position_layout() -> VertexLayout {
    VertexLayout {
        attributes: smallvec![AttributeDesc {
            register: 0,
            components: 3,
        }],
    }
}

fn full_screen_positions() -> Vec<u8> {
    let corners = [[-1.0f32, -1.0, 0.5], [1.0, -1.0, 0.5], [-1.0, 1.0, 0.5], [1.0, 1.0, 0.5]];
    corners
        .iter()
        .flatten()
        .flat_map(|f| f.to_le_bytes())
        .collect()
}

/// Load the fp program and a full-screen quad; returns (program, uniform, buffer).
fn fp_setup(p: &mut SoftPlatform) -> (ProgramHandle, UniformLocation, BufferHandle) {
    let prog = p.load_program(&suite(SuiteKind::Fp).module).unwrap();
    let loc = p.uniform_location(prog, "src1_uniform").unwrap();
    let buf = p.alloc_device_buffer(4 * 12).unwrap();
    p.write_buffer(buf, &full_screen_positions()).unwrap();
    (prog, loc, buf)
}

fn draw_selector(p: &mut SoftPlatform, setup: (ProgramHandle, UniformLocation, BufferHandle), sel: f32) {
    let (prog, loc, buf) = setup;
    p.begin_frame().unwrap();
    p.bind_program(prog).unwrap();
    p.set_uniform(loc, Vec4::new(sel, 0.0, 0.0, 0.0)).unwrap();
    p.set_vertex_attributes(buf, &position_layout()).unwrap();
    p.draw(Primitive::TriangleStrip, 4).unwrap();
    p.end_frame().unwrap();
}

fn origin_bgr(p: &SoftPlatform) -> Vec<u8> {
    PixelView::new(p.framebuffer_bytes(), p.framebuffer_layout())
        .unwrap()
        .raw(PixelCoord::ORIGIN)
        .unwrap()
        .to_vec()
}

#[test]
fn draw_outside_a_frame_is_rejected() {
    let mut p = up(small_settings());
    let err = p.draw(Primitive::TriangleStrip, 4).unwrap_err();
    assert!(matches!(err, ConformError::Pipeline(_)));
}

#[test]
fn nothing_executes_before_vblank() {
    let mut p = up(small_settings());
    let setup = fp_setup(&mut p);
    draw_selector(&mut p, setup, 0.0);
    assert_eq!(p.draws_retired(), 0);
    assert_eq!(p.render_target().get(0, 0), Some([0, 0, 0, 0]));

    p.wait_vblank().unwrap();
    assert_eq!(p.draws_retired(), 1);
    // rcp(0) -> +inf marker.
    assert_eq!(p.render_target().get(7, 3), Some([0xFF, 0x00, 0x00, 0xFF]));
}

#[test]
fn reads_without_invalidate_are_stale() {
    let mut p = up(small_settings());
    let setup = fp_setup(&mut p);
    draw_selector(&mut p, setup, 0.0);
    p.wait_vblank().unwrap();

    assert_eq!(origin_bgr(&p), vec![0, 0, 0]);
    p.invalidate_cache().unwrap();
    assert_eq!(origin_bgr(&p), vec![0x00, 0x00, 0xFF]);
}

#[test]
fn clear_is_immediate_and_uniforms_persist_across_frames() {
    let mut p = up(small_settings());
    let setup = fp_setup(&mut p);
    p.clear([9, 9, 9, 9]).unwrap();
    assert_eq!(p.render_target().get(3, 2), Some([9, 9, 9, 9]));

    draw_selector(&mut p, setup, 4.0);
    p.wait_vblank().unwrap();

    // Second frame draws without setting the uniform again.
    let (prog, _, buf) = setup;
    p.begin_frame().unwrap();
    p.bind_program(prog).unwrap();
    p.set_vertex_attributes(buf, &position_layout()).unwrap();
    p.draw(Primitive::TriangleStrip, 4).unwrap();
    p.end_frame().unwrap();
    p.clear([0, 0, 0, 0]).unwrap();
    p.wait_vblank().unwrap();
    p.invalidate_cache().unwrap();
    // rsq(1) -> one marker.
    assert_eq!(origin_bgr(&p), vec![0xFF, 0xFF, 0xFF]);
}

#[test]
fn swap_alternates_back_buffers() {
    let mut p = up(small_settings());
    let setup = fp_setup(&mut p);
    draw_selector(&mut p, setup, 0.0);
    p.wait_vblank().unwrap();
    p.swap_buffers().unwrap();
    assert_eq!(&p.front_buffer()[..3], &[0x00, 0x00, 0xFF]);
}

#[test]
fn key_script_runs_out_into_idle_keys() {
    let settings = PlatformSettings {
        key_script: vec![Keys::NONE, Keys::A],
        idle_keys: Keys::START,
        ..small_settings()
    };
    let mut p = up(settings);
    assert_eq!(p.scan_keys_down(), Keys::NONE);
    assert_eq!(p.scan_keys_down(), Keys::A);
    assert_eq!(p.scan_keys_down(), Keys::START);
    assert_eq!(p.scan_keys_down(), Keys::START);
}

#[test]
fn acquisition_requires_initialized_graphics() {
    let mut p = SoftPlatform::new(small_settings()).unwrap();
    assert!(matches!(
        p.alloc_device_buffer(16),
        Err(ConformError::Resource(_))
    ));
    assert!(matches!(
        p.load_program(&suite(SuiteKind::Dph).module),
        Err(ConformError::Resource(_))
    ));
}

#[test]
fn device_heap_is_finite() {
    let mut p = up(small_settings()).with_device_heap(64);
    let a = p.alloc_device_buffer(48).unwrap();
    assert!(matches!(
        p.alloc_device_buffer(48),
        Err(ConformError::Resource(_))
    ));
    p.free_buffer(a).unwrap();
    p.alloc_device_buffer(48).unwrap();
}

#[test]
fn unknown_program_and_uniform_are_resource_errors() {
    let mut p = up(small_settings());
    let missing = ShaderModule {
        name: "vshader_missing",
        uniforms: &[],
    };
    assert!(matches!(
        p.load_program(&missing),
        Err(ConformError::Resource(_))
    ));
    let undeclared = ShaderModule {
        name: "vshader_dph",
        uniforms: &["nope"],
    };
    assert!(matches!(
        p.load_program(&undeclared),
        Err(ConformError::Resource(_))
    ));
    let prog = p.load_program(&suite(SuiteKind::Dph).module).unwrap();
    assert!(p.uniform_location(prog, "nope").is_err());
}

#[test]
fn shutdown_refuses_leaks_and_logs_releases() {
    let mut p = up(small_settings());
    let (prog, _, buf) = fp_setup(&mut p);
    assert!(p.shutdown_graphics().is_err());

    p.free_buffer(buf).unwrap();
    p.free_program(prog).unwrap();
    p.shutdown_graphics().unwrap();
    assert_eq!(
        p.releases(),
        &[Release::Buffer(buf), Release::Program(prog), Release::Graphics]
    );
    assert!(p.free_buffer(buf).is_err());
}

#[test]
fn short_vertex_buffer_fails_at_retire() {
    let mut p = up(small_settings());
    let (prog, loc, _) = fp_setup(&mut p);
    let tiny = p.alloc_device_buffer(12).unwrap();
    draw_selector(&mut p, (prog, loc, tiny), 0.0);
    assert!(matches!(p.wait_vblank(), Err(ConformError::Pipeline(_))));
}
