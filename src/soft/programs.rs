//! Built-in programs, looked up by module name.
//!
//! Every program passes `v0` through to `o0` and writes its result color to `o1`.

use crate::foundation::core::Vec4;
use crate::soft::shader::{
    BinaryOp, Dst, DstReg, Instr, Mask, Program, Reg, Src, Swizzle, UnaryOp,
};

/// Names of every built-in program.
pub const NAMES: [&str; 3] = ["vshader_dph", "vshader_sge", "vshader_fp"];

/// Build the program registered as `name`.
pub fn lookup(name: &str) -> Option<Program> {
    match name {
        "vshader_dph" => Some(dph()),
        "vshader_sge" => Some(sge()),
        "vshader_fp" => Some(fp()),
        _ => None,
    }
}

const fn c(i: u8) -> Src {
    Src::new(Reg::Uniform(i))
}

const fn v(i: u8) -> Src {
    Src::new(Reg::Input(i))
}

const fn t(i: u8) -> Src {
    Src::new(Reg::Temp(i))
}

const fn r(i: u8) -> Dst {
    Dst::new(DstReg::Temp(i))
}

const fn o(i: u8) -> Dst {
    Dst::new(DstReg::Output(i))
}

// c1 = (0, 1, -1, 0.5)
const ZERO: Src = c(1).swz(Swizzle::XXXX);
const ONE: Src = c(1).swz(Swizzle::YYYY);
const NEG_ONE: Src = c(1).swz(Swizzle::ZZZZ);
const CONSTANTS: Vec4 = Vec4::new(0.0, 1.0, -1.0, 0.5);

fn passthrough() -> Instr {
    Instr::unary(UnaryOp::Mov, o(0), v(0))
}

fn opaque() -> Instr {
    Instr::unary(UnaryOp::Mov, o(1), ONE)
}

fn dph() -> Program {
    Program {
        name: "vshader_dph",
        uniforms: &[("src1_uniform", 0)],
        constants: vec![(1, CONSTANTS)],
        code: vec![
            passthrough(),
            opaque(),
            Instr::binary(BinaryOp::Dph, o(1).mask(Mask::XYZ), c(0), v(1)),
        ],
    }
}

fn sge() -> Program {
    Program {
        name: "vshader_sge",
        uniforms: &[("test_vector", 0)],
        constants: vec![(1, CONSTANTS)],
        code: vec![
            passthrough(),
            opaque(),
            Instr::binary(BinaryOp::Sge, o(1).mask(Mask::XYZ), c(0), v(1)),
        ],
    }
}

// r10 = (+inf, -inf, NaN, _), built at run time from c1.
const INF: Src = t(10).swz(Swizzle::XXXX);
const NEG_INF: Src = t(10).swz(Swizzle::YYYY);
const NAN: Src = t(10).swz(Swizzle::ZZZZ);
// r11 = (1, 1, +inf, +inf), r12 = (+inf, +inf, +inf, 1)
const ONES_THEN_INF: Src = t(11);
const INF_THEN_ONE: Src = t(12);

fn fp() -> Program {
    use BinaryOp::{Add, Dp3, Dp4, Dph, Max, Min, Mul, Sge, Sgei, Slt, Slti};
    use UnaryOp::{Ex2, Flr, Lg2, Mov, Rcp, Rsq};

    let res = r(0);
    let un = |op, src| vec![Instr::unary(op, res, src)];
    let bin = |op, a, b| vec![Instr::binary(op, res, a, b)];

    let arms = vec![
        un(Rcp, ZERO),
        un(Rcp, INF),
        un(Rcp, NAN),
        un(Rsq, ZERO),
        un(Rsq, ONE),
        un(Rsq, NEG_ONE),
        un(Rsq, INF),
        un(Rsq, NEG_INF),
        un(Rsq, NAN),
        bin(Max, ZERO, INF),
        bin(Max, ZERO, NEG_INF),
        bin(Max, ZERO, NAN),
        bin(Max, NAN, ZERO),
        bin(Max, NEG_INF, INF),
        bin(Min, ZERO, INF),
        bin(Min, ZERO, NEG_INF),
        bin(Min, ZERO, NAN),
        bin(Min, NAN, ZERO),
        bin(Min, NEG_INF, INF),
        bin(Add, INF, INF.neg()),
        bin(Mul, INF, ZERO),
        bin(Mul, ZERO, INF),
        bin(Mul, NAN, ZERO),
        bin(Mul, ZERO, NAN),
        vec![Instr::Mad {
            dst: res,
            a: INF,
            b: ZERO,
            c: ONE,
        }],
        bin(Dp4, c(3), ONES_THEN_INF),
        bin(Dp3, ZERO, ONES_THEN_INF.swz(Swizzle::ZZZZ)),
        bin(Dph, ZERO, INF_THEN_ONE),
        bin(Sge, ZERO, NAN),
        bin(Sge, NAN, ZERO),
        bin(Sgei, ZERO, NAN),
        bin(Sgei, NAN, ZERO),
        bin(Slt, ZERO, NAN),
        bin(Slt, NAN, ZERO),
        bin(Slti, ZERO, NAN),
        bin(Slti, NAN, ZERO),
        vec![
            Instr::unary(Flr, res, c(2).swz(Swizzle::XXXX).neg()),
            Instr::unary(Mov, res, t(0).neg()),
        ],
        vec![
            Instr::unary(Rcp, res, NEG_INF),
            Instr::unary(Rsq, res, t(0)),
        ],
        un(Ex2, NEG_INF),
        vec![
            Instr::unary(Rcp, res, NEG_INF),
            Instr::unary(Lg2, res, t(0)),
        ],
        un(Lg2, NEG_ONE),
    ];

    let code = vec![
        passthrough(),
        Instr::unary(Rcp, r(10).mask(Mask::X), ZERO),
        Instr::unary(Mov, r(10).mask(Mask::Y), INF.neg()),
        Instr::binary(Add, r(10).mask(Mask::Z), INF, INF.neg()),
        Instr::unary(Mov, r(11).mask(Mask::XY), ONE),
        Instr::unary(Mov, r(11).mask(Mask::ZW), INF),
        Instr::unary(Mov, r(12).mask(Mask::XYZ), INF),
        Instr::unary(Mov, r(12).mask(Mask::W), ONE),
        Instr::Switch {
            selector: c(0),
            arms,
        },
        Instr::Classify {
            dst: o(1),
            src: t(0),
        },
    ];

    Program {
        name: "vshader_fp",
        uniforms: &[("src1_uniform", 0)],
        constants: vec![
            (1, CONSTANTS),
            (2, Vec4::new(0.1, 0.0, 0.0, 0.0)),
            (3, Vec4::new(1.0, 1.0, 0.0, 0.0)),
        ],
        code,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/soft/programs.rs"]
mod tests;
