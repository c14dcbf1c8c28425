use crate::color::classify::FpClass::{self, Nan, NegInf, Number, One, PosInf, Zero};
use crate::platform::ShaderModule;
use crate::table::{Delivery, DrawRegion, Suite, SuiteKind, TestCase};
use crate::verify::MismatchPolicy;

/// Program running one floating-point edge case per selector value and classifying the result.
pub const MODULE: ShaderModule = ShaderModule {
    name: "vshader_fp",
    uniforms: &["src1_uniform"],
};

const CASES: &[(u32, FpClass, &str)] = &[
    (0, PosInf, "rcp(0) -> +inf"),
    (1, Zero, "rcp(+inf) -> 0"),
    (2, Nan, "rcp(NaN) -> NaN"),
    (3, PosInf, "rsq(0) -> +inf"),
    (4, One, "rsq(1) -> 1"),
    (5, Nan, "rsq(-1) -> NaN"),
    (6, Zero, "rsq(+inf) -> 0"),
    (7, Nan, "rsq(-inf) -> NaN"),
    (8, Nan, "rsq(NaN) -> NaN"),
    (9, PosInf, "max(0, +inf) -> +inf"),
    (10, Zero, "max(0, -inf) -> 0"),
    (11, Nan, "max(0, NaN) -> NaN"),
    (12, Zero, "max(NaN, 0) -> 0"),
    (13, PosInf, "max(-inf, +inf) -> +inf"),
    (14, Zero, "min(0, +inf) -> 0"),
    (15, NegInf, "min(0, -inf) -> -inf"),
    (16, Nan, "min(0, NaN) -> NaN"),
    (17, Zero, "min(NaN, 0) -> 0"),
    (18, NegInf, "min(-inf, +inf) -> -inf"),
    (19, Nan, "+inf - +inf -> NaN"),
    (20, Zero, "+inf * 0 -> 0"),
    (21, Zero, "0 * +inf -> 0"),
    (22, Nan, "NaN * 0 -> NaN"),
    (23, Nan, "0 * NaN -> NaN"),
    (24, One, "mad(+inf, 0, 1) -> 1"),
    (25, Number, "dp4([1,1,0,0], [1,1,+inf,+inf]) -> 2"),
    (26, Zero, "dp3([0,0,0], [+inf,+inf,+inf]) -> 0"),
    (27, One, "dph([0,0,0], [+inf,+inf,+inf,1]) -> 1"),
    (28, Zero, "sge(0, NaN) -> 0"),
    (29, Zero, "sge(NaN, 0) -> 0"),
    (30, Zero, "sgei(0, NaN) -> 0"),
    (31, Zero, "sgei(NaN, 0) -> 0"),
    (32, Zero, "slt(0, NaN) -> 0"),
    (33, Zero, "slt(NaN, 0) -> 0"),
    (34, Zero, "slti(0, NaN) -> 0"),
    (35, Zero, "slti(NaN, 0) -> 0"),
    (36, One, "-flr(-0.1) -> 1"),
    (37, PosInf, "rsq(rcp(-inf)) -> +inf"),
    (38, Zero, "exp2(-inf) -> 0"),
    (39, NegInf, "log2(rcp(-inf)) -> -inf"),
    (40, Nan, "log2(-1) -> NaN"),
];

/// Number of selector values the program understands.
pub const SELECTOR_COUNT: u32 = CASES.len() as u32;

pub(crate) fn suite() -> Suite {
    Suite {
        kind: SuiteKind::Fp,
        instruction: "<selected by src1_uniform.x>; classify -> outclr.xyz",
        module: MODULE,
        uniform: "src1_uniform",
        delivery: Delivery::Uniform,
        region: DrawRegion::FullScreen,
        policy: MismatchPolicy::ReportAll,
        cases: CASES
            .iter()
            .map(|&(id, class, desc)| TestCase::selector(id, desc, class))
            .collect(),
    }
}
