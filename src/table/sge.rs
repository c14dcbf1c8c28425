use crate::foundation::core::Vec4;
use crate::platform::ShaderModule;
use crate::table::{Delivery, DrawRegion, ExpectedColor, Suite, SuiteKind, TestCase};
use crate::verify::MismatchPolicy;

/// Program computing `sge outclr.xyz, test_vector, in_color`.
pub const MODULE: ShaderModule = ShaderModule {
    name: "vshader_sge",
    uniforms: &["test_vector"],
};

fn case(id: u32, name: &str, test_vector: [f32; 3], in_color: [f32; 3], expected: [f32; 3]) -> TestCase {
    let [x, y, z] = test_vector;
    let [r, g, b] = in_color;
    TestCase::with_color(
        id,
        name,
        Vec4::new(x, y, z, 0.0),
        Vec4::new(r, g, b, 1.0),
        ExpectedColor::Rgb(expected),
    )
}

pub(crate) fn suite() -> Suite {
    let cases = vec![
        case(
            0,
            "SGE_ThreeComponents_Greater",
            [1.0, 1.0, 1.0],
            [0.0, 0.0, 0.0],
            [1.0, 1.0, 1.0],
        ),
        case(
            1,
            "SGE_ThreeComponents_Equal",
            [1.0, 1.0, 1.0],
            [1.0, 1.0, 1.0],
            [1.0, 1.0, 1.0],
        ),
        case(
            2,
            "SGE_ThreeComponents_Less",
            [0.0, 0.0, 0.0],
            [1.0, 1.0, 1.0],
            [0.0, 0.0, 0.0],
        ),
        case(
            3,
            "SGE_ThreeComponents_Mixed",
            [0.52, 0.82, 0.01],
            [0.21, 0.82, 0.23],
            [1.0, 1.0, 0.0],
        ),
        case(
            4,
            "SGE_ThreeComponents_BigNums",
            [-1e20, 1e20, 1e20],
            [1e20, -1e20, 1e20],
            [0.0, 1.0, 1.0],
        ),
    ];

    Suite {
        kind: SuiteKind::Sge,
        instruction: "sge outclr.xyz, test_vector, in_color",
        module: MODULE,
        uniform: "test_vector",
        delivery: Delivery::UniformAndVertexColor { components: 3 },
        region: DrawRegion::SinglePixel,
        policy: MismatchPolicy::StopAtFirst,
        cases,
    }
}
