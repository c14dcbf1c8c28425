use crate::foundation::core::Vec4;
use crate::platform::ShaderModule;
use crate::table::{Delivery, DrawRegion, ExpectedColor, Suite, SuiteKind, TestCase};
use crate::verify::MismatchPolicy;

/// Program computing `dph outclr.xyz, src1_uniform, src2_in_color`.
pub const MODULE: ShaderModule = ShaderModule {
    name: "vshader_dph",
    uniforms: &["src1_uniform"],
};

// `dph` = src1.xyz . src2.xyz + src2.w, written to all three color channels.
fn case(id: u32, name: &str, src1: [f32; 4], src2: [f32; 4], expected: f32) -> TestCase {
    TestCase::with_color(
        id,
        name,
        Vec4::from(src1),
        Vec4::from(src2),
        ExpectedColor::gray(expected),
    )
}

pub(crate) fn suite() -> Suite {
    let cases = vec![
        case(0, "DPH_Zeros", [0.0; 4], [0.0; 4], 0.0),
        case(
            1,
            "DPH_Zeros2",
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 1.0, 0.0],
            0.0,
        ),
        case(2, "DPH_X", [1.0, 0.0, 0.0, 0.0], [1.0, 0.0, 0.0, 0.0], 1.0),
        case(3, "DPH_Y", [0.0, 1.0, 0.0, 0.0], [0.0, 1.0, 0.0, 0.0], 1.0),
        case(4, "DPH_Z", [0.0, 0.0, 1.0, 0.0], [0.0, 0.0, 1.0, 0.0], 1.0),
        case(5, "DPH_W", [0.0; 4], [0.0, 0.0, 0.0, 1.0], 1.0),
        // src1.w never participates.
        case(6, "DPH_W2", [0.0, 0.0, 0.0, 1.0], [0.0; 4], 0.0),
        case(
            7,
            "DPH_Simple",
            [0.5, 0.0, 0.5, 0.0],
            [0.5, 0.0, 0.5, 0.5],
            1.0,
        ),
        case(
            8,
            "DPH_Simple2",
            [0.0, 0.5, 0.0, 0.0],
            [0.0, 0.5, 0.0, 0.5],
            0.75,
        ),
        case(
            9,
            "DPH_Simple3",
            [0.0, 0.0, 0.0, 0.5],
            [0.0, 0.0, 0.0, 1.0],
            1.0,
        ),
    ];

    Suite {
        kind: SuiteKind::Dph,
        instruction: "dph outclr.xyz, src1_uniform, src2_in_color",
        module: MODULE,
        uniform: "src1_uniform",
        delivery: Delivery::UniformAndVertexColor { components: 4 },
        region: DrawRegion::SinglePixel,
        policy: MismatchPolicy::ReportAll,
        cases,
    }
}
